pub mod catalogue;
pub mod cloud;
pub mod mapping;
pub mod resolver;
pub mod storage;
