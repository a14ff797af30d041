
use utils::{Serialize, Deserialize};
use utils::error::*;

pub use crate::learner::config::Config as LearnerConfig;
pub use crate::neural::config::Config as NeuralConfig;
pub use crate::interfaces::selfplay::config::Config as SelfplayConfig;
pub use crate::interfaces::selfplay::config::MissingChampion;
pub use duel::Config as PongConfig;

///
/// Represents a full configuration.
///
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config 
{
    #[serde(default)]
    pub selfplay: SelfplayConfig,

    #[serde(default)]
    pub learner: LearnerConfig,

    #[serde(default)]
    pub neural: NeuralConfig,

    #[serde(default)]
    pub pong: PongConfig,

    #[serde(default = "log_path")]
    pub log_path: String,

    #[serde(default = "log_level")]
    pub log_level: String,

    #[serde(default = "seed")]
    pub seed: u64,

    #[serde(default = "render")]
    pub render: bool
}

impl Default for Config 
{
    fn default () -> Config 
    {
        Config 
        {
            selfplay: SelfplayConfig::default(),
            learner: LearnerConfig::default(),
            neural: NeuralConfig::default(),
            pong: PongConfig::default(),
            log_path: log_path(),
            log_level: log_level(),
            seed: seed(),
            render: render()
        }
    }
}

impl Config 
{
    ///
    /// Rejects configurations that would make the run meaningless or panic 
    /// partway through.
    ///
    pub fn validate (& self) -> Result<()>
    {
        let selfplay = & self.selfplay;

        if ! (0.0 ..= 1.0).contains(& selfplay.epsilon)
        {
            bail!("selfplay.epsilon must lie in [0, 1], found {}.", selfplay.epsilon);
        }
        if ! selfplay.best_threshold.is_finite()
        {
            bail!("selfplay.best_threshold must be finite.");
        }
        if selfplay.eval_episodes == 0 
        {
            bail!("selfplay.eval_episodes must be positive.");
        }
        if self.learner.sigma <= 0.0 
        {
            bail!("learner.sigma must be positive, found {}.", self.learner.sigma);
        }
        if self.learner.episodes_per_candidate == 0 
        {
            bail!("learner.episodes_per_candidate must be positive.");
        }
        if self.pong.lives == 0 || self.pong.max_steps == 0 
        {
            bail!("pong.lives and pong.max_steps must be positive.");
        }
        if self.pong.ball_speed <= 0.0 || self.pong.paddle_half <= 0.0 || self.pong.paddle_half >= 0.5
        {
            bail!("pong.ball_speed must be positive and pong.paddle_half must lie in (0, 0.5).");
        }
        if self.log_path.is_empty()
        {
            bail!("log_path must not be empty.");
        }

        Ok(())
    }
}

///
/// Returns the default log path, which doubles as the artifact directory.
///
fn log_path () -> String 
{
    "best_opponent_ga".to_owned()
}

fn log_level () -> String 
{
    "info".to_owned()
}

fn seed () -> u64 
{
    17
}

fn render () -> bool 
{
    false
}
