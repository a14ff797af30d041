
use std::path::PathBuf;

use thiserror::Error;

///
/// Failures specific to the self-play loop. Environment failures are not 
/// listed here; they pass through untouched.
///
#[derive(Debug, Error)]
pub enum SelfplayError 
{
    #[error("Failed to load a policy from '{path}': {reason}")]
    Load { path: PathBuf, reason: String },

    #[error("No champion exists at '{path}', and missing_champion is set to fail.")]
    MissingChampion { path: PathBuf },

    #[error("Failed to archive generation {generation} to '{path}': {source}")]
    ArchiveIo 
    { 
        generation: u64, 
        path: PathBuf, 
        #[source] source: std::io::Error 
    }
}
