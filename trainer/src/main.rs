mod config;
mod interfaces;
mod learner;
mod neural;

use std::path::Path;
use std::rc::Rc;

use clap::Parser;

use duel::{Baseline, Environment, Pong, TwoPlayerEnvironment};

use interfaces::rollout;
use interfaces::selfplay::environment::SelfPlayEnv;
use interfaces::selfplay::frozen::FrozenPolicy;
use interfaces::selfplay::layout::Layout;
use interfaces::selfplay::pool::OpponentPool;
use interfaces::selfplay::selfplay::Selfplay;
use learner::evolution::{self, EvolutionStrategy};

use utils::*;

///
/// A structure representing command line arguments.
///
#[derive(Parser)]
struct CLIArgs
{
    #[clap(short, long, default_value = "train")]
    mode: String,

    #[clap(short, long, default_value = "config/config.toml")]
    config: String,

    /// Resume training from a full checkpoint.
    #[clap(short, long)]
    resume: Option<String>,

    /// Log every frame of every evaluation episode.
    #[clap(long)]
    render: bool
}

fn main () -> Result<()>
{
    let args = CLIArgs::parse();

    let config_str = utils::read_string(Path::new(& args.config))?;
    let mut config : config::Config = toml::from_str(& config_str)?;
    config.render |= args.render;
    config.validate()?;

    std::fs::create_dir_all(& config.log_path)?;
    let _logger = log::initialize(& config.log_path, "trainer", & config.log_level)?;

    match args.mode.as_str()
    {
        "train" =>
        {
            train(& config, args.resume.as_deref())?;
        },
        "evaluate" =>
        {
            evaluate(& config)?;
        },
        _ =>
        {
            return Err(error::error!("Mode '{}' is unsupported.", & args.mode));
        }
    };

    Ok(())
}

///
/// Runs self-play training with an evolution strategy on Pong.
///
fn train (config: & config::Config, resume: Option<& str>) -> Result<()>
{
    let env = Pong::new(config.pong);
    let eval_env = Pong::new(config.pong);

    let learner = match resume
    {
        Some(path) => EvolutionStrategy::from_checkpoint(Path::new(path), config.seed)?,
        None       => EvolutionStrategy::new(config, env.observation_size(), env.action_size())
    };

    let mut selfplay = Selfplay::new(config, env, eval_env, learner, Rc::new(Baseline::default()))?;
    let summary = selfplay.run()?;

    log::info!(
        "Run {} finished after {} timesteps at generation {} (best mean reward {:.3}).",
        summary.run, summary.timesteps, summary.generation, summary.best_mean_reward
    );

    Ok(())
}

///
/// Plays the current champion against the baseline.
///
fn evaluate (config: & config::Config) -> Result<()>
{
    let layout = Layout::new(& config.log_path, evolution::EXTENSION);
    let pong = Pong::new(config.pong);
    let shape = (pong.observation_size(), pong.action_size());

    let champion = FrozenPolicy::load(& layout.champion())?.expect_shape(shape.0, shape.1)?;

    let selfplay = config::SelfplayConfig { epsilon: 1.0, missing_champion: config::MissingChampion::Baseline, ..config.selfplay };
    let pool = OpponentPool::new(& layout.champion(), Rc::new(Baseline::default()), & selfplay, shape, config.seed)?;

    let mut env = SelfPlayEnv::new(pong, pool);
    env.seed(config.seed);

    let summary = rollout::evaluate(& mut env, & champion, config.selfplay.eval_episodes, config.render)?;
    log::info!(
        "Champion '{}' against the baseline over {} episodes: {:.3} +/- {:.3}.",
        champion.source().display(), summary.rewards.len(), summary.mean_reward, summary.std_reward
    );

    Ok(())
}
