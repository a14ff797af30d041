pub mod config;
pub mod network;
