pub mod client;
pub mod config;
pub mod proto;
pub mod server;
pub mod service;
pub mod status;
pub mod version;
