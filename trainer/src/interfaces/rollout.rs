
use duel::{Environment, Policy};

use utils::error::*;
use utils::log;
use utils::{Serialize, Deserialize};

///
/// The outcome of one complete episode.
///
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Episode 
{
    pub reward: f64,
    pub length: usize
}

///
/// Plays one agent against the environment until the episode ends, 
/// optionally rendering every frame to the log.
///
pub fn rollout<E, P> (env: & mut E, policy: & P, render: bool) -> Result<Episode>
    where E: Environment + ?Sized, 
          P: Policy + ?Sized
{
    let mut obs = env.reset()?;
    let mut episode = Episode { reward: 0.0, length: 0 };

    loop 
    {
        let step = env.step(& policy.predict(& obs))?;
        episode.reward += step.reward;
        episode.length += 1;

        if render 
        {
            log::info!("\n{}", env.render());
        }

        if step.done 
        {
            return Ok(episode);
        }
        obs = step.observation;
    }
}

///
/// Summary statistics over a batch of episodes.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Summary 
{
    pub mean_reward: f64,
    pub std_reward: f64,
    pub rewards: Vec<f64>,
    pub lengths: Vec<usize>
}

///
/// Plays the given number of episodes and summarizes their returns.
///
pub fn evaluate<E, P> (env: & mut E, policy: & P, episodes: usize, render: bool) -> Result<Summary>
    where E: Environment + ?Sized, 
          P: Policy + ?Sized
{
    let mut rewards = Vec::with_capacity(episodes);
    let mut lengths = Vec::with_capacity(episodes);

    for _ in 0 .. episodes 
    {
        let episode = rollout(env, policy, render)?;
        rewards.push(episode.reward);
        lengths.push(episode.length);
    }

    let n = rewards.len().max(1) as f64;
    let mean_reward = rewards.iter().sum::<f64>() / n;
    let std_reward = (rewards.iter().map(|r| (r - mean_reward).powi(2)).sum::<f64>() / n).sqrt();

    Ok(Summary { mean_reward, std_reward, rewards, lengths })
}

#[cfg(test)]
mod tests 
{
    use super::*;

    use duel::{Action, Info, Observation, Step};

    ///
    /// Pays a fixed schedule of returns, one episode per entry, each lasting 
    /// two steps.
    ///
    struct Scripted 
    {
        returns: Vec<f64>,
        episode: usize,
        t: usize
    }

    impl Environment for Scripted 
    {
        fn reset (& mut self) -> Result<Observation>
        {
            self.t = 0;
            Ok(vec![0.0])
        }

        fn step (& mut self, _action: & Action) -> Result<Step>
        {
            self.t += 1;
            let done = self.t == 2;
            let reward = match done 
            {
                true  => 
                {
                    self.episode += 1;
                    self.returns[self.episode - 1]
                },
                false => 0.0
            };
            Ok(Step { observation: vec![0.0], reward, done, info: Info::new() })
        }

        fn seed (& mut self, _seed: u64) {}

        fn render (& self) -> String 
        {
            String::new()
        }
    }

    struct Idle;

    impl Policy for Idle 
    {
        fn predict (& self, _observation: & Observation) -> Action 
        {
            vec![0.0]
        }
    }

    #[test]
    fn evaluation_summarizes_returns ()
    {
        let mut env = Scripted { returns: vec![1.0, -1.0, 3.0, 1.0], episode: 0, t: 0 };

        let summary = evaluate(& mut env, & Idle, 4, false).unwrap();

        assert_eq!(summary.rewards, vec![1.0, -1.0, 3.0, 1.0]);
        assert_eq!(summary.lengths, vec![2; 4]);
        assert_eq!(summary.mean_reward, 1.0);
        assert!((summary.std_reward - 2.0_f64.sqrt()).abs() < 1e-12);
    }
}
