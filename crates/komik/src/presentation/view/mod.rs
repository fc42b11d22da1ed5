pub mod card;
pub mod detail;
pub mod error;
pub mod grid;
pub mod home;
pub mod identity;
pub mod reader;

pub use card::Card;
pub use detail::DetailView;
pub use error::ErrorView;
pub use grid::GridView;
pub use home::HomeView;
pub use identity::IdentityView;
pub use reader::{ImageState, ReaderEvent, ReaderState, ReaderView};
