pub mod envelope;
pub use envelope::*;

pub mod catalogue;
pub use catalogue::*;

pub mod chapter;
pub use chapter::*;

pub mod history;
pub use history::*;

pub mod bookmark;
pub use bookmark::*;

pub mod mapping;
pub use mapping::*;

pub mod user;
pub use user::*;
