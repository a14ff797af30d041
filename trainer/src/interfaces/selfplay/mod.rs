pub mod archive;
pub mod config;
pub mod environment;
pub mod error;
pub mod frozen;
pub mod layout;
pub mod pool;
pub mod promoter;
pub mod selfplay;
