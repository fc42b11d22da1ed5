pub mod navigation;
pub mod render;
pub mod route;
#[cfg(feature = "server")]
pub mod server;
pub mod surface;
pub mod view;

#[cfg(feature = "server")]
pub use server::{Server, ServerBuilder};
