
use std::path::Path;

use crate::config::*;
use crate::neural::network::Network;

use duel::{Action, Environment, Observation, Policy};

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use rand_distr::StandardNormal;

use super::{Callback, Checkpoint, Learner};

use utils::error::*;
use utils::log;
use utils::{Serialize, Deserialize};

///
/// The extension of evolution strategy checkpoints.
///
pub const EXTENSION : & str = "ckpt";

///
/// The on-disk form of a learner, from which training can resume.
///
#[derive(Clone, Debug, Serialize, Deserialize)]
struct Snapshot
{
    num_timesteps: usize,
    config: LearnerConfig,
    network: Network
}

///
/// How a batch of candidate episodes ended.
///
enum Rollouts
{
    Finished(f64),
    Interrupted
}

///
/// An antithetic evolution strategy over the parameters of a network.
///
/// Each iteration samples a Gaussian direction, plays the parameters
/// displaced by +sigma and -sigma along it, and moves the parameters along
/// the direction in proportion to the difference in returns. The policy
/// presented to callbacks is always the undisplaced parameters.
///
#[derive(Debug)]
pub struct EvolutionStrategy
{
    config: LearnerConfig,
    network: Network,
    rng: StdRng,
    num_timesteps: usize
}

impl Policy for EvolutionStrategy
{
    fn predict (& self, observation: & Observation) -> Action
    {
        self.network.forward(observation)
    }
}

impl Checkpoint for EvolutionStrategy
{
    fn extension (& self) -> & 'static str
    {
        EXTENSION
    }

    fn save (& self, path: & Path) -> Result<()>
    {
        let snapshot = Snapshot { num_timesteps: self.num_timesteps, config: self.config, network: self.network.clone() };
        utils::write_json_atomic(path, & snapshot).context(format!("Failed to save learner to '{}'.", path.display()))
    }

    fn export (& self) -> Network
    {
        self.network.clone()
    }

    fn num_timesteps (& self) -> usize
    {
        self.num_timesteps
    }
}

impl Learner for EvolutionStrategy
{
    fn learn (& mut self, env: & mut dyn Environment, total_timesteps: usize, callback: & mut dyn Callback) -> Result<()>
    {
        let sigma = self.config.sigma;
        let mut iteration = 0_usize;

        while self.num_timesteps < total_timesteps
        {
            let base = self.network.parameters();
            let noise : Vec<f64> = (0 .. base.len()).map(|_| self.rng.sample(StandardNormal)).collect();

            let plus = self.network.with_parameters(& displace(& base, & noise, sigma))?;
            let minus = self.network.with_parameters(& displace(& base, & noise, - sigma))?;

            let r_plus = match self.rollouts(env, & plus, total_timesteps, callback)?
            {
                Rollouts::Finished(r) => r,
                Rollouts::Interrupted => break
            };
            let r_minus = match self.rollouts(env, & minus, total_timesteps, callback)?
            {
                Rollouts::Finished(r) => r,
                Rollouts::Interrupted => break
            };

            let scale = self.config.learning_rate * (r_plus - r_minus) / (2.0 * sigma);
            self.network = self.network.with_parameters(& displace(& base, & noise, scale))?;

            iteration += 1;
            log::debug!("ES iteration {}: r+ = {:.3}, r- = {:.3}, timesteps = {}.", iteration, r_plus, r_minus, self.num_timesteps);
        }

        Ok(())
    }
}

impl EvolutionStrategy
{
    ///
    /// Creates a learner with freshly-initialized parameters.
    ///
    pub fn new (config: & Config, observation_size: usize, action_size: usize) -> EvolutionStrategy
    {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let network = Network::new(& config.neural, observation_size, action_size, & mut rng);

        EvolutionStrategy { config: config.learner, network, rng, num_timesteps: 0 }
    }

    ///
    /// Resumes a learner from a full checkpoint. Hyperparameters come from
    /// the checkpoint; only the random stream is reseeded.
    ///
    pub fn from_checkpoint (path: & Path, seed: u64) -> Result<EvolutionStrategy>
    {
        let snapshot : Snapshot = utils::read_json(path).context(format!("Failed to resume learner from '{}'.", path.display()))?;
        snapshot.network.validate()?;

        Ok(EvolutionStrategy
        {
            config: snapshot.config,
            network: snapshot.network,
            rng: StdRng::seed_from_u64(seed),
            num_timesteps: snapshot.num_timesteps
        })
    }

    ///
    /// Plays the configured number of episodes with the candidate and
    /// returns its mean return, invoking the callback after every step.
    ///
    fn rollouts (& mut self, env: & mut dyn Environment, candidate: & Network, total_timesteps: usize, callback: & mut dyn Callback) -> Result<Rollouts>
    {
        let episodes = self.config.episodes_per_candidate;
        let mut total = 0.0;

        for _ in 0 .. episodes
        {
            let mut obs = env.reset()?;
            loop
            {
                let step = env.step(& candidate.forward(& obs))?;
                total += step.reward;
                self.num_timesteps += 1;

                if ! callback.on_step(& * self)? || self.num_timesteps >= total_timesteps
                {
                    return Ok(Rollouts::Interrupted);
                }

                if step.done
                {
                    break;
                }
                obs = step.observation;
            }
        }

        Ok(Rollouts::Finished(total / episodes as f64))
    }
}

///
/// Returns base + scale * direction.
///
fn displace (base: & [f64], direction: & [f64], scale: f64) -> Vec<f64>
{
    base.iter().zip(direction).map(|(b, d)| b + scale * d).collect()
}
