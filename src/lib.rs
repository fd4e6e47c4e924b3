pub mod config;
pub mod request;
pub mod service;
pub mod translation;
pub mod version;
