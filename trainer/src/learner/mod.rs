
pub mod config;
pub mod evolution;

use std::path::Path;

use crate::neural::network::Network;

use duel::{Environment, Policy};

use utils::error::*;

///
/// A policy whose current parameters can be persisted, either in full 
/// (a checkpoint the learner can resume from) or in the portable form 
/// that an opponent pool loads.
///
pub trait Checkpoint : Policy 
{
    ///
    /// The file extension of full checkpoints, without the dot.
    ///
    fn extension (& self) -> & 'static str;

    ///
    /// Writes a full checkpoint to the given path, atomically.
    ///
    fn save (& self, path: & Path) -> Result<()>;

    ///
    /// Returns the current parameters in portable form.
    ///
    fn export (& self) -> Network;

    ///
    /// The number of environment steps taken so far.
    ///
    fn num_timesteps (& self) -> usize;
}

///
/// A hook that the learner invokes after every environment step.
///
pub trait Callback 
{
    ///
    /// Returns false to ask the learner to stop early.
    ///
    fn on_step (& mut self, learner: & dyn Checkpoint) -> Result<bool>;
}

///
/// An optimizer that improves its policy by interacting with an environment.
///
pub trait Learner : Checkpoint 
{
    ///
    /// Trains until the learner has taken total_timesteps environment steps 
    /// in its lifetime, or until the callback asks it to stop.
    ///
    fn learn (& mut self, env: & mut dyn Environment, total_timesteps: usize, callback: & mut dyn Callback) -> Result<()>;
}
