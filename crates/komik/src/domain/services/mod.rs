pub mod library;
pub mod mapping;
pub mod sync;
