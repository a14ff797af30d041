
use std::path::{Path, PathBuf};

use crate::neural::network::Network;

use duel::{Action, Observation, Policy};

use super::error::SelfplayError;

use utils::error::*;

///
/// A policy loaded from the portable format. Its parameters never change 
/// after loading; a newer champion is a new FrozenPolicy.
///
#[derive(Clone, Debug)]
pub struct FrozenPolicy 
{
    network: Network,
    source: PathBuf
}

impl Policy for FrozenPolicy 
{
    fn predict (& self, observation: & Observation) -> Action 
    {
        self.network.forward(observation)
    }
}

impl FrozenPolicy 
{
    ///
    /// Loads a policy from a file, failing if the file is absent, unreadable 
    /// or structurally invalid.
    ///
    pub fn load (path: & Path) -> Result<FrozenPolicy>
    {
        let bytes = std::fs::read(path).map_err(|e| SelfplayError::Load { path: path.to_path_buf(), reason: e.to_string() })?;
        FrozenPolicy::from_bytes(& bytes, path)
    }

    ///
    /// Parses a policy that was read from the given path.
    ///
    pub fn from_bytes (bytes: & [u8], path: & Path) -> Result<FrozenPolicy>
    {
        match Network::from_slice(bytes)
        {
            Ok(network) => Ok(FrozenPolicy { network, source: path.to_path_buf() }),
            Err(e)      => Err(SelfplayError::Load { path: path.to_path_buf(), reason: format!("{:#}", e) }.into())
        }
    }

    ///
    /// Checks that this policy reads observations and produces actions of 
    /// the given widths.
    ///
    pub fn expect_shape (self, observation_size: usize, action_size: usize) -> Result<FrozenPolicy>
    {
        if self.network.input_size() != observation_size || self.network.output_size() != action_size 
        {
            let reason = format!(
                "expected a {} -> {} policy, found {} -> {}", 
                observation_size, action_size, self.network.input_size(), self.network.output_size()
            );
            return Err(SelfplayError::Load { path: self.source, reason }.into());
        }

        Ok(self)
    }

    pub fn source (& self) -> & Path 
    {
        & self.source
    }
}

#[cfg(test)]
mod tests 
{
    use super::*;

    use crate::config::NeuralConfig;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn write_network (path: & Path) -> Network 
    {
        let network = Network::new(& NeuralConfig::default(), 6, 1, & mut StdRng::seed_from_u64(2));
        utils::write_json_atomic(path, & network).unwrap();
        network
    }

    #[test]
    fn predictions_match_the_saved_network ()
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opponent.json");
        let network = write_network(& path);

        let policy = FrozenPolicy::load(& path).unwrap();
        let obs = vec![0.5, 0.4, 0.3, 0.2, 0.01, -0.01];

        assert_eq!(policy.predict(& obs), network.forward(& obs));
        assert_eq!(policy.predict(& obs), policy.predict(& obs));
    }

    #[test]
    fn missing_and_corrupt_files_are_load_errors ()
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opponent.json");

        let err = FrozenPolicy::load(& path).unwrap_err();
        assert!(matches!(err.downcast_ref::<SelfplayError>(), Some(SelfplayError::Load { .. })));

        std::fs::write(& path, b"{\"activation\": \"tanh\"").unwrap();
        let err = FrozenPolicy::load(& path).unwrap_err();
        assert!(matches!(err.downcast_ref::<SelfplayError>(), Some(SelfplayError::Load { .. })));
    }

    #[test]
    fn shape_mismatch_is_a_load_error ()
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opponent.json");
        write_network(& path);

        let policy = FrozenPolicy::load(& path).unwrap();
        assert!(policy.clone().expect_shape(6, 1).is_ok());

        let err = policy.expect_shape(8, 1).unwrap_err();
        assert!(err.to_string().contains("expected a 8 -> 1 policy"));
    }
}
