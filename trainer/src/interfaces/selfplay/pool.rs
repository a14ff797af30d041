
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::config::*;

use duel::Policy;

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

use super::error::SelfplayError;
use super::frozen::FrozenPolicy;

use utils::error::*;
use utils::log;

///
/// The fixed slots of an opponent pool.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot
{
    Champion,
    Baseline
}

impl std::fmt::Display for Slot
{
    fn fmt (& self, f: & mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        match self
        {
            Slot::Champion => write!(f, "champion"),
            Slot::Baseline => write!(f, "baseline")
        }
    }
}

///
/// An opponent chosen for one episode.
///
#[derive(Clone)]
pub struct Opponent
{
    pub slot: Slot,
    pub policy: Rc<dyn Policy>
}

impl std::fmt::Debug for Opponent
{
    fn fmt (& self, f: & mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("Opponent").field("slot", & self.slot).finish_non_exhaustive()
    }
}

///
/// The last champion that was successfully loaded, with the bytes it was
/// loaded from.
///
struct Loaded
{
    bytes: Vec<u8>,
    policy: Rc<FrozenPolicy>
}

///
/// A pool of two opponents: the champion, which lives on disk and is
/// re-resolved on every selection, and a fixed baseline.
///
/// Selection picks the baseline with probability epsilon and the champion
/// otherwise. When the champion cannot be resolved, the configured
/// MissingChampion policy decides between failing and using the baseline.
///
pub struct OpponentPool
{
    champion_path: PathBuf,
    champion: Option<Loaded>,
    baseline: Rc<dyn Policy>,

    epsilon: f64,
    missing: MissingChampion,
    shape: (usize, usize),
    rng: StdRng,

    // Whether the previous selection had to fall back to the baseline.

    degraded: bool
}

impl OpponentPool
{
    ///
    /// Creates a pool for policies with the given observation and action
    /// widths. Fails with MissingChampion if there is no champion and the
    /// config says not to start without one.
    ///
    pub fn new (champion_path: & Path, baseline: Rc<dyn Policy>, config: & SelfplayConfig, shape: (usize, usize), seed: u64) -> Result<OpponentPool>
    {
        if config.missing_champion == MissingChampion::Fail && ! champion_path.exists()
        {
            return Err(SelfplayError::MissingChampion { path: champion_path.to_path_buf() }.into());
        }

        Ok(OpponentPool
        {
            champion_path: champion_path.to_path_buf(),
            champion: None,
            baseline,
            epsilon: config.epsilon,
            missing: config.missing_champion,
            shape,
            rng: StdRng::seed_from_u64(seed),
            degraded: false
        })
    }

    ///
    /// Picks the opponent for the next episode.
    ///
    pub fn select (& mut self) -> Result<Opponent>
    {
        if self.epsilon > 0.0 && self.rng.gen_bool(self.epsilon)
        {
            return Ok(self.baseline());
        }

        match self.resolve_champion()?
        {
            Some(policy) =>
            {
                if self.degraded
                {
                    log::info!("Champion at '{}' is available again.", self.champion_path.display());
                    self.degraded = false;
                }
                Ok(Opponent { slot: Slot::Champion, policy })
            },
            None => Ok(self.baseline())
        }
    }

    fn baseline (& self) -> Opponent
    {
        Opponent { slot: Slot::Baseline, policy: self.baseline.clone() }
    }

    ///
    /// Reads the champion file and reparses it if it changed since the last
    /// load. Returns None when the baseline should stand in for it.
    ///
    fn resolve_champion (& mut self) -> Result<Option<Rc<dyn Policy>>>
    {
        let bytes = match fs::read(& self.champion_path)
        {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return match self.missing
            {
                MissingChampion::Baseline => Ok(self.fall_back("it does not exist yet")),
                _                         => Err(SelfplayError::MissingChampion { path: self.champion_path.clone() }.into())
            },
            Err(e) => return Err(SelfplayError::Load { path: self.champion_path.clone(), reason: e.to_string() }.into())
        };

        if let Some(loaded) = & self.champion
        {
            if loaded.bytes == bytes
            {
                let policy : Rc<dyn Policy> = loaded.policy.clone();
                return Ok(Some(policy));
            }
        }

        let (observation_size, action_size) = self.shape;
        let parsed = FrozenPolicy::from_bytes(& bytes, & self.champion_path)
            .and_then(|policy| policy.expect_shape(observation_size, action_size));

        match parsed
        {
            Ok(policy) =>
            {
                log::debug!("Loaded a new champion from '{}'.", policy.source().display());
                let policy = Rc::new(policy);
                self.champion = Some(Loaded { bytes, policy: policy.clone() });

                let policy : Rc<dyn Policy> = policy;
                Ok(Some(policy))
            },
            Err(e) if self.missing == MissingChampion::Baseline =>
            {
                self.champion = None;
                Ok(self.fall_back(& format!("{:#}", e)))
            },
            Err(e) => Err(e)
        }
    }

    fn fall_back (& mut self, reason: & str) -> Option<Rc<dyn Policy>>
    {
        if ! self.degraded
        {
            log::warn!("Playing the baseline instead of the champion at '{}': {}", self.champion_path.display(), reason);
            self.degraded = true;
        }
        None
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    use crate::neural::network::Network;

    use duel::{Action, Baseline, Observation};

    struct Constant (f64);

    impl Policy for Constant
    {
        fn predict (& self, _observation: & Observation) -> Action
        {
            vec![self.0]
        }
    }

    fn config (epsilon: f64, missing: MissingChampion) -> SelfplayConfig
    {
        SelfplayConfig { epsilon, missing_champion: missing, ..SelfplayConfig::default() }
    }

    fn write_champion (path: & Path, seed: u64) -> Network
    {
        let network = Network::new(& NeuralConfig::default(), 6, 1, & mut StdRng::seed_from_u64(seed));
        utils::write_json_atomic(path, & network).unwrap();
        network
    }

    fn make_pool (path: & Path, epsilon: f64, missing: MissingChampion) -> Result<OpponentPool>
    {
        OpponentPool::new(path, Rc::new(Constant(-7.0)), & config(epsilon, missing), (6, 1), 99)
    }

    #[test]
    fn epsilon_zero_always_selects_the_champion ()
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opponent.json");
        write_champion(& path, 1);

        let mut pool = make_pool(& path, 0.0, MissingChampion::Fail).unwrap();
        for _ in 0 .. 200
        {
            assert_eq!(pool.select().unwrap().slot, Slot::Champion);
        }
    }

    #[test]
    fn epsilon_one_always_selects_the_baseline ()
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opponent.json");
        write_champion(& path, 1);

        let mut pool = make_pool(& path, 1.0, MissingChampion::Fail).unwrap();
        for _ in 0 .. 200
        {
            let opponent = pool.select().unwrap();
            assert_eq!(opponent.slot, Slot::Baseline);
            assert_eq!(opponent.policy.predict(& vec![0.0; 6]), vec![-7.0]);
        }
    }

    #[test]
    fn epsilon_half_splits_selections_evenly ()
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opponent.json");
        write_champion(& path, 1);

        let mut pool = make_pool(& path, 0.5, MissingChampion::Fail).unwrap();
        let trials = 10_000;
        let baseline = (0 .. trials).filter(|_| pool.select().unwrap().slot == Slot::Baseline).count();

        // Five standard deviations either side of 5000.

        assert!((4750 ..= 5250).contains(& baseline), "baseline picked {} times", baseline);
    }

    #[test]
    fn unchanged_champion_is_not_reloaded ()
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opponent.json");
        write_champion(& path, 1);

        let mut pool = make_pool(& path, 0.0, MissingChampion::Fail).unwrap();
        let first = pool.select().unwrap();
        let second = pool.select().unwrap();

        assert!(Rc::ptr_eq(& first.policy, & second.policy));
    }

    #[test]
    fn replaced_champion_is_observed_by_the_next_selection ()
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opponent.json");
        let old = write_champion(& path, 1);
        let obs = vec![0.5, 0.5, 0.2, 0.7, -0.02, 0.01];

        let mut pool = make_pool(& path, 0.0, MissingChampion::Fail).unwrap();
        let before = pool.select().unwrap();
        assert_eq!(before.policy.predict(& obs), old.forward(& obs));

        let new = write_champion(& path, 2);
        let after = pool.select().unwrap();

        assert_eq!(after.slot, Slot::Champion);
        assert_eq!(after.policy.predict(& obs), new.forward(& obs));
        assert_ne!(after.policy.predict(& obs), before.policy.predict(& obs));
    }

    #[test]
    fn missing_champion_fails_fast_when_configured ()
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opponent.json");

        let err = make_pool(& path, 0.0, MissingChampion::Fail).err().unwrap();
        assert!(matches!(err.downcast_ref::<SelfplayError>(), Some(SelfplayError::MissingChampion { .. })));
    }

    #[test]
    fn missing_champion_falls_back_to_the_baseline_until_one_appears ()
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opponent.json");

        let mut pool = OpponentPool::new(& path, Rc::new(Baseline::default()), & config(0.0, MissingChampion::Baseline), (6, 1), 0).unwrap();
        assert_eq!(pool.select().unwrap().slot, Slot::Baseline);

        write_champion(& path, 4);
        assert_eq!(pool.select().unwrap().slot, Slot::Champion);
    }

    #[test]
    fn corrupt_champion_is_fatal_without_a_fallback ()
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opponent.json");
        fs::write(& path, b"[1, 2, 3]").unwrap();

        let mut strict = make_pool(& path, 0.0, MissingChampion::Fail).unwrap();
        let err = strict.select().unwrap_err();
        assert!(matches!(err.downcast_ref::<SelfplayError>(), Some(SelfplayError::Load { .. })));

        let mut lenient = make_pool(& path, 0.0, MissingChampion::Baseline).unwrap();
        assert_eq!(lenient.select().unwrap().slot, Slot::Baseline);
    }

    #[test]
    fn wrongly_shaped_champion_is_rejected ()
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opponent.json");
        let network = Network::new(& NeuralConfig::default(), 4, 1, & mut StdRng::seed_from_u64(0));
        utils::write_json_atomic(& path, & network).unwrap();

        let mut pool = make_pool(& path, 0.0, MissingChampion::Fail).unwrap();
        assert!(pool.select().is_err());
    }
}
