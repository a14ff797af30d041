
use utils::{Serialize, Deserialize};

///
/// What to do when the champion artifact does not exist yet.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingChampion 
{
    /// Refuse to start.
    Fail,

    /// Play the baseline until a champion exists. Also covers a champion 
    /// file that exists but cannot be loaded.
    Baseline,

    /// Export the learner's initial parameters as generation zero.
    Bootstrap
}

///
/// Represents a selfplay config.
///
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Config 
{
    #[serde(default = "total_timesteps")]
    pub total_timesteps: usize,

    #[serde(default = "eval_freq")]
    pub eval_freq: usize,

    #[serde(default = "eval_episodes")]
    pub eval_episodes: usize,

    #[serde(default = "best_threshold")]
    pub best_threshold: f64,

    #[serde(default = "epsilon")]
    pub epsilon: f64,

    #[serde(default = "missing_champion")]
    pub missing_champion: MissingChampion,

    #[serde(default = "resume_generations")]
    pub resume_generations: bool
}

impl Default for Config 
{
    fn default () -> Config 
    { 
        Config 
        {
            total_timesteps: total_timesteps(),
            eval_freq: eval_freq(),
            eval_episodes: eval_episodes(),
            best_threshold: best_threshold(),
            epsilon: epsilon(),
            missing_champion: missing_champion(),
            resume_generations: resume_generations()
        }
    }
}

fn total_timesteps () -> usize 
{
    10_000_000
}

fn eval_freq () -> usize 
{
    100_000
}

fn eval_episodes () -> usize 
{
    100
}

///
/// The learner must average strictly more than this against the champion 
/// to replace it.
///
fn best_threshold () -> f64 
{
    -0.5
}

fn epsilon () -> f64 
{
    0.0
}

fn missing_champion () -> MissingChampion 
{
    MissingChampion::Baseline
}

fn resume_generations () -> bool 
{
    true
}
