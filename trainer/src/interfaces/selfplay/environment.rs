
use duel::{Action, Environment, Observation, Step, StepError, TwoPlayerEnvironment};

use super::pool::{Opponent, OpponentPool};

use utils::error::*;
use utils::log;

///
/// Where a self-play environment is in its episode lifecycle.
///
#[derive(Debug)]
enum Phase
{
    Idle,
    Playing(Opponent)
}

///
/// Turns a two-player environment into a single-player one by playing the
/// second seat with an opponent drawn from a pool.
///
/// The opponent is drawn once, when the episode is reset, and every step
/// of that episode is answered by the same policy instance. A promotion
/// mid-episode is therefore only observed from the next reset onwards.
///
pub struct SelfPlayEnv<E: TwoPlayerEnvironment>
{
    env: E,
    pool: OpponentPool,
    phase: Phase,
    episodes: usize
}

impl<E: TwoPlayerEnvironment> SelfPlayEnv<E>
{
    pub fn new (env: E, pool: OpponentPool) -> SelfPlayEnv<E>
    {
        SelfPlayEnv { env, pool, phase: Phase::Idle, episodes: 0 }
    }

    ///
    /// Returns the opponent of the episode in progress, if there is one.
    ///
    pub fn opponent (& self) -> Option<& Opponent>
    {
        match & self.phase
        {
            Phase::Playing(opponent) => Some(opponent),
            Phase::Idle              => None
        }
    }

    ///
    /// Returns the number of episodes started so far.
    ///
    pub fn episodes (& self) -> usize
    {
        self.episodes
    }

    pub fn inner (& self) -> & E
    {
        & self.env
    }
}

impl<E: TwoPlayerEnvironment> Environment for SelfPlayEnv<E>
{
    fn reset (& mut self) -> Result<Observation>
    {
        let opponent = self.pool.select()?;
        let observation = self.env.reset()?;

        self.episodes += 1;
        log::trace!("Episode {} is played against the {}.", self.episodes, opponent.slot);

        self.phase = Phase::Playing(opponent);
        Ok(observation)
    }

    fn step (& mut self, action: & Action) -> Result<Step>
    {
        let opponent = match & self.phase
        {
            Phase::Playing(opponent) => opponent,
            Phase::Idle              => return Err(StepError::EpisodeOver.into())
        };

        let opponent_action = opponent.policy.predict(& self.env.opponent_observation());
        let step = self.env.step(action, & opponent_action)?;

        if step.done
        {
            self.phase = Phase::Idle;
        }

        Ok(step)
    }

    fn seed (& mut self, seed: u64)
    {
        self.env.seed(seed);
    }

    fn render (& self) -> String
    {
        self.env.render()
    }
}
