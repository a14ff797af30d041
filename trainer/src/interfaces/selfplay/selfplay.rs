
use crate::config::*;
use crate::learner::Learner;

use std::fs;
use std::rc::Rc;

use duel::{Environment, Policy, TwoPlayerEnvironment};

use super::archive::{Archive, Generation};
use super::environment::SelfPlayEnv;
use super::layout::Layout;
use super::pool::OpponentPool;
use super::promoter::{Evaluator, Promotion};

use tabled::Table;

use utils::error::*;
use utils::log;

use uuid::Uuid;

///
/// What a finished self-play run reports.
///
#[derive(Clone, Debug)]
pub struct Summary
{
    pub run: Uuid,
    pub timesteps: usize,
    pub generation: Generation,
    pub best_mean_reward: f64,
    pub promotions: Vec<Promotion>
}

///
/// A self-play training run: a learner plays against a pool made of the
/// current champion and a baseline, and is periodically evaluated against
/// that same pool to decide whether it becomes the next champion.
///
pub struct Selfplay<E: TwoPlayerEnvironment, L: Learner>
{
    config: Config,
    run: Uuid,
    layout: Layout,

    env: SelfPlayEnv<E>,
    evaluator: Evaluator<E>,
    learner: L
}

impl<E: TwoPlayerEnvironment, L: Learner> Selfplay<E, L>
{
    ///
    /// Prepares a run in the configured log directory. The training and
    /// evaluation environments must be two instances of the same game, and
    /// the learner must read and produce vectors of that game's widths.
    ///
    pub fn new (config: & Config, env: E, eval_env: E, learner: L, baseline: Rc<dyn Policy>) -> Result<Selfplay<E, L>>
    {
        config.validate()?;

        let shape = (env.observation_size(), env.action_size());
        let network = learner.export();
        if (network.input_size(), network.output_size()) != shape
        {
            bail!(
                "The learner is a {} -> {} policy, but the environment needs a {} -> {} policy.",
                network.input_size(), network.output_size(), shape.0, shape.1
            );
        }

        let run = Uuid::new_v4();
        let layout = Layout::new(& config.log_path, learner.extension());
        fs::create_dir_all(layout.root()).context(format!("Failed to create the log directory '{}'.", layout.root().display()))?;

        if config.selfplay.missing_champion == MissingChampion::Bootstrap && ! layout.champion().exists()
        {
            utils::write_json_atomic(& layout.champion(), & learner.export())?;
            log::info!("SELFPLAY: no champion at '{}', bootstrapped one from the learner.", layout.champion().display());
        }

        let generation = match config.selfplay.resume_generations
        {
            true  => Archive::new(& layout).latest()?.unwrap_or_default(),
            false => Generation::default()
        };
        if generation > Generation::default()
        {
            log::info!("SELFPLAY: resuming after archived generation {}.", generation);
        }

        let eval_seed = config.seed.wrapping_add(1);

        let pool = OpponentPool::new(& layout.champion(), baseline.clone(), & config.selfplay, shape, config.seed)?;
        let eval_pool = OpponentPool::new(& layout.champion(), baseline, & config.selfplay, shape, eval_seed)?;

        let mut env = SelfPlayEnv::new(env, pool);
        let mut eval_env = SelfPlayEnv::new(eval_env, eval_pool);
        env.seed(config.seed);
        eval_env.seed(eval_seed);

        let evaluator = Evaluator::new(config, run, eval_env, & layout, generation);

        Ok(Selfplay { config: config.clone(), run, layout, env, evaluator, learner })
    }

    pub fn learner (& self) -> & L
    {
        & self.learner
    }

    pub fn layout (& self) -> & Layout
    {
        & self.layout
    }

    ///
    /// Trains for the configured number of timesteps and saves the final
    /// model.
    ///
    pub fn run (& mut self) -> Result<Summary>
    {
        log::info!("SELFPLAY: starting run {} in '{}'.", self.run, self.layout.root().display());

        let total_timesteps = self.config.selfplay.total_timesteps;
        self.learner.learn(& mut self.env, total_timesteps, & mut self.evaluator)?;

        let final_model = self.layout.final_model();
        self.learner.save(& final_model)?;
        log::info!("SELFPLAY: saved the final model to '{}' after {} episodes.", final_model.display(), self.env.episodes());

        let state = self.evaluator.state();
        let summary = Summary
        {
            run: self.run,
            timesteps: self.learner.num_timesteps(),
            generation: state.generation,
            best_mean_reward: state.best_mean_reward,
            promotions: self.evaluator.promotions().to_vec()
        };

        match summary.promotions.is_empty()
        {
            true  => log::info!("SELFPLAY: the champion was never replaced."),
            false => log::info!("SELFPLAY: promotions\n{}", Table::new(summary.promotions.clone()))
        };

        Ok(summary)
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    use crate::interfaces::selfplay::error::SelfplayError;
    use crate::learner::Checkpoint;
    use crate::learner::evolution::EvolutionStrategy;

    use duel::{Baseline, Pong};

    fn config (root: & std::path::Path, missing: MissingChampion) -> Config
    {
        let mut config = Config::default();
        config.log_path = root.to_string_lossy().into_owned();
        config.selfplay.total_timesteps = 600;
        config.selfplay.eval_freq = 200;
        config.selfplay.eval_episodes = 2;
        config.selfplay.missing_champion = missing;
        config.pong.lives = 1;
        config.pong.max_steps = 80;
        config
    }

    fn build (config: & Config) -> Result<Selfplay<Pong, EvolutionStrategy>>
    {
        let env = Pong::new(config.pong);
        let learner = EvolutionStrategy::new(config, env.observation_size(), env.action_size());
        Selfplay::new(config, env, Pong::new(config.pong), learner, Rc::new(Baseline::default()))
    }

    #[test]
    fn missing_champion_fails_before_training ()
    {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), MissingChampion::Fail);

        let err = build(& config).err().unwrap();

        assert!(matches!(err.downcast_ref::<SelfplayError>(), Some(SelfplayError::MissingChampion { .. })));
        assert!(! dir.path().join("evaluations.jsonl").exists());
    }

    #[test]
    fn learner_of_the_wrong_width_is_rejected_before_anything_is_written ()
    {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), MissingChampion::Bootstrap);

        let checkpoint = dir.path().join("wide.ckpt");
        EvolutionStrategy::new(& config, 8, 1).save(& checkpoint).unwrap();
        let learner = EvolutionStrategy::from_checkpoint(& checkpoint, config.seed).unwrap();

        let result = Selfplay::new(& config, Pong::new(config.pong), Pong::new(config.pong), learner, Rc::new(Baseline::default()));

        assert!(result.is_err());
        assert!(! dir.path().join("opponent.json").exists());
    }

    #[test]
    fn bootstrap_publishes_the_initial_learner ()
    {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), MissingChampion::Bootstrap);

        let selfplay = build(& config).unwrap();

        let champion : crate::neural::network::Network = utils::read_json(& selfplay.layout().champion()).unwrap();
        assert_eq!(champion, selfplay.learner().export());
    }

    #[test]
    fn run_trains_to_the_budget_and_logs_every_evaluation ()
    {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), MissingChampion::Baseline);

        let mut selfplay = build(& config).unwrap();
        let summary = selfplay.run().unwrap();

        assert_eq!(summary.timesteps, 600);
        assert_eq!(summary.generation, Generation(summary.promotions.len() as u64));
        assert!(dir.path().join("final_model.ckpt").exists());

        let log = utils::read_string(& dir.path().join("evaluations.jsonl")).unwrap();
        assert_eq!(log.lines().count(), 3);

        for promotion in & summary.promotions
        {
            assert!(promotion.archived);
            assert!(selfplay.layout().history(promotion.generation).exists());
        }
    }

    #[test]
    fn generations_continue_from_the_archive ()
    {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), MissingChampion::Baseline);

        let layout = Layout::new(dir.path(), "ckpt");
        fs::write(layout.history(Generation(12)), b"earlier run").unwrap();

        let mut selfplay = build(& config).unwrap();
        let summary = selfplay.run().unwrap();

        assert_eq!(summary.generation, Generation(12 + summary.promotions.len() as u64));
        assert_eq!(fs::read(layout.history(Generation(12))).unwrap(), b"earlier run");
    }
}
