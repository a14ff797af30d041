
use std::collections::BTreeMap;

use utils::error::Result;

///
/// What a player sees of the environment, as an ordered numeric vector.
///
pub type Observation = Vec<f64>;

///
/// What a player does, as an ordered numeric vector.
///
pub type Action = Vec<f64>;

///
/// Auxiliary per-step diagnostics, keyed by name.
///
pub type Info = BTreeMap<String, f64>;

///
/// The result of advancing an environment by one step, from the 
/// perspective of the player that submitted the action.
///
#[derive(Clone, Debug, PartialEq)]
pub struct Step 
{
    pub observation: Observation,
    pub reward: f64,
    pub done: bool,
    pub info: Info
}

///
/// Anything that maps an observation to an action.
///
/// Implementors must be pure: the same observation always produces the 
/// same action, and predicting never mutates shared state.
///
pub trait Policy 
{
    fn predict (& self, observation: & Observation) -> Action;
}

///
/// A single-agent environment, as seen by a learner.
///
pub trait Environment 
{
    ///
    /// Starts a new episode and returns its first observation.
    ///
    fn reset (& mut self) -> Result<Observation>;

    ///
    /// Applies the agent's action and advances the episode by one step.
    ///
    fn step (& mut self, action: & Action) -> Result<Step>;

    ///
    /// Reseeds every random source in the environment.
    ///
    fn seed (& mut self, seed: u64);

    ///
    /// Returns a human-readable picture of the current state.
    ///
    fn render (& self) -> String;
}

///
/// A two-player environment, in which the caller supplies both players' 
/// actions on each step. Observations, rewards and info returned by 
/// reset() and step() are from the first player's perspective; the second 
/// player's view is available through opponent_observation().
///
pub trait TwoPlayerEnvironment 
{
    ///
    /// The width of each player's observation vector.
    ///
    fn observation_size (& self) -> usize;

    ///
    /// The width of each player's action vector.
    ///
    fn action_size (& self) -> usize;

    fn reset (& mut self) -> Result<Observation>;

    ///
    /// Returns the current observation from the second player's perspective.
    ///
    fn opponent_observation (& self) -> Observation;

    fn step (& mut self, action: & Action, opponent_action: & Action) -> Result<Step>;

    fn seed (& mut self, seed: u64);

    fn render (& self) -> String;
}
