pub mod baseline;
pub mod config;
pub mod environment;
pub mod error;
pub mod pong;
pub mod side;

pub use baseline::Baseline;
pub use config::Config;
pub use environment::{Action, Environment, Info, Observation, Policy, Step, TwoPlayerEnvironment};
pub use error::StepError;
pub use pong::Pong;
pub use side::Side;
