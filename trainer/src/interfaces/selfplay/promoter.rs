
use crate::config::*;
use crate::interfaces::rollout;
use crate::learner::{Callback, Checkpoint};

use duel::TwoPlayerEnvironment;

use super::archive::{Archive, Generation};
use super::environment::SelfPlayEnv;
use super::layout::Layout;

use tabled::Tabled;

use utils::error::*;
use utils::log;
use utils::{Serialize, Deserialize};

use uuid::Uuid;

///
/// The state carried by the promotion protocol from one evaluation to the
/// next.
///
/// The running best starts at the threshold and is put back to the
/// threshold after every promotion, so each generation is measured against
/// the same absolute bar rather than against the score that crowned the
/// previous one.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PromotionState
{
    pub best_mean_reward: f64,
    pub generation: Generation,
    threshold: f64
}

impl PromotionState
{
    pub fn new (threshold: f64, generation: Generation) -> PromotionState
    {
        PromotionState { best_mean_reward: threshold, generation, threshold }
    }

    pub fn threshold (& self) -> f64
    {
        self.threshold
    }

    ///
    /// A mean promotes only if it is strictly above both the running best
    /// and the threshold.
    ///
    pub fn should_promote (& self, mean_reward: f64) -> bool
    {
        mean_reward > self.best_mean_reward && mean_reward > self.threshold
    }

    ///
    /// Records a promotion and returns the new generation.
    ///
    pub fn promote (& mut self) -> Generation
    {
        self.best_mean_reward = self.threshold;
        self.generation = self.generation.next();
        self.generation
    }
}

///
/// A row of the promotion history.
///
#[derive(Clone, Debug, PartialEq, Tabled)]
pub struct Promotion
{
    pub generation: Generation,
    pub timesteps: usize,
    pub mean_reward: f64,
    pub archived: bool
}

///
/// One line of the evaluation log.
///
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EvaluationRecord
{
    pub run: Uuid,
    pub timesteps: usize,
    pub mean_reward: f64,
    pub std_reward: f64,
    pub rewards: Vec<f64>,
    pub lengths: Vec<usize>,
    pub best_mean_reward: f64,
    pub generation: Generation,
    pub promoted: bool
}

///
/// Applies the promotion rule to an evaluation mean.
///
/// On promotion the learner becomes the champion: its full checkpoint is
/// written to the best model and its portable form to the champion file,
/// both atomically, before the state advances to the next generation and
/// the best model is archived under that generation. A failed archive copy
/// is logged and leaves the promotion in place.
///
/// A failure to publish the champion file is returned before the state
/// advances. The best model on disk is then already the new one while the
/// champion file and the generation are still the previous ones.
///
pub fn promote_if_better (state: & mut PromotionState, mean_reward: f64, learner: & dyn Checkpoint, layout: & Layout, archive: & Archive) -> Result<Option<Promotion>>
{
    if ! state.should_promote(mean_reward)
    {
        return Ok(None);
    }

    log::info!("SELFPLAY: mean reward {:.4} beats the running best {:.4}.", mean_reward, state.best_mean_reward);

    learner.save(& layout.best_model())?;
    utils::write_json_atomic(& layout.champion(), & learner.export()).context(format!("Failed to publish the champion to '{}'.", layout.champion().display()))?;

    let generation = state.promote();
    log::info!("SELFPLAY: new best model, bumping up generation to {}.", generation);

    let archived = match archive.archive(generation)
    {
        Ok(path) =>
        {
            log::debug!("Archived generation {} to '{}'.", generation, path.display());
            true
        },
        Err(e) =>
        {
            log::warn!("{}; the promotion stands but the history is incomplete.", e);
            false
        }
    };

    Ok(Some(Promotion { generation, timesteps: learner.num_timesteps(), mean_reward, archived }))
}

///
/// Periodically evaluates the learner against the champion and promotes it
/// when it clears the bar.
///
/// Evaluation runs on its own self-play environment, so the training
/// episode in progress is left untouched; its pool reads the same champion
/// file as the training pool.
///
pub struct Evaluator<E: TwoPlayerEnvironment>
{
    config: SelfplayConfig,
    render: bool,
    run: Uuid,

    env: SelfPlayEnv<E>,
    layout: Layout,
    archive: Archive,

    state: PromotionState,
    promotions: Vec<Promotion>
}

impl<E: TwoPlayerEnvironment> Callback for Evaluator<E>
{
    fn on_step (& mut self, learner: & dyn Checkpoint) -> Result<bool>
    {
        let eval_freq = self.config.eval_freq;
        if eval_freq > 0 && learner.num_timesteps() % eval_freq == 0
        {
            self.evaluate(learner)?;
        }

        Ok(true)
    }
}

impl<E: TwoPlayerEnvironment> Evaluator<E>
{
    pub fn new (config: & Config, run: Uuid, env: SelfPlayEnv<E>, layout: & Layout, generation: Generation) -> Evaluator<E>
    {
        Evaluator
        {
            config: config.selfplay,
            render: config.render,
            run,
            env,
            layout: layout.clone(),
            archive: Archive::new(layout),
            state: PromotionState::new(config.selfplay.best_threshold, generation),
            promotions: vec![]
        }
    }

    pub fn state (& self) -> & PromotionState
    {
        & self.state
    }

    pub fn promotions (& self) -> & [Promotion]
    {
        & self.promotions
    }

    ///
    /// Runs one evaluation cycle: play the learner against the champion,
    /// apply the promotion rule, and log the result.
    ///
    pub fn evaluate (& mut self, learner: & dyn Checkpoint) -> Result<EvaluationRecord>
    {
        let timesteps = learner.num_timesteps();
        let summary = rollout::evaluate(& mut self.env, learner, self.config.eval_episodes, self.render)
            .context(format!("Evaluation at timestep {} failed.", timesteps))?;

        log::info!(
            "Eval num_timesteps={}, episode_reward={:.2} +/- {:.2}, mean episode length {:.1}.",
            timesteps, summary.mean_reward, summary.std_reward,
            summary.lengths.iter().sum::<usize>() as f64 / summary.lengths.len().max(1) as f64
        );

        let promotion = promote_if_better(& mut self.state, summary.mean_reward, learner, & self.layout, & self.archive)?;

        let record = EvaluationRecord
        {
            run: self.run,
            timesteps,
            mean_reward: summary.mean_reward,
            std_reward: summary.std_reward,
            rewards: summary.rewards,
            lengths: summary.lengths,
            best_mean_reward: self.state.best_mean_reward,
            generation: self.state.generation,
            promoted: promotion.is_some()
        };
        utils::append_json_line(& self.layout.evaluations(), & record)?;

        self.promotions.extend(promotion);
        Ok(record)
    }
}
