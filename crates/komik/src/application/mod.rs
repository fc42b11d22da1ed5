pub mod carousel;
pub mod controller;
pub mod state;
pub mod token;

pub use controller::{ClientController, ControllerBuilder, RenderOutcome, ViewOptions};
