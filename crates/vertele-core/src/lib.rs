pub mod categories;
pub mod channel;
pub mod config;
pub mod error;
pub mod platform;
pub mod player;
pub mod seed;
pub mod service;
pub mod store;
