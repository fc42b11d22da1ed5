pub mod cloud;
pub mod config;
pub mod database;
pub mod proxy;
pub mod repositories;
pub mod resolver;
pub mod storage;
