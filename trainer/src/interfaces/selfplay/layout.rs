
use std::path::{Path, PathBuf};

use super::archive::Generation;

use utils::notate::Notate;

pub const CHAMPION_FILE : & str = "opponent.json";
pub const HISTORY_PREFIX : & str = "history_";

///
/// The files a run produces inside its log directory.
///
/// Full checkpoints share the learner's extension; the champion is always 
/// stored in the portable JSON form.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout 
{
    root: PathBuf,
    extension: String
}

impl Layout 
{
    pub fn new<P: AsRef<Path>> (root: P, extension: & str) -> Layout 
    {
        Layout { root: root.as_ref().to_path_buf(), extension: extension.to_owned() }
    }

    pub fn root (& self) -> & Path 
    {
        & self.root
    }

    ///
    /// The portable champion read by opponent pools.
    ///
    pub fn champion (& self) -> PathBuf 
    {
        self.root.join(CHAMPION_FILE)
    }

    ///
    /// The full checkpoint of the current champion.
    ///
    pub fn best_model (& self) -> PathBuf 
    {
        self.root.join(format!("best_model.{}", self.extension))
    }

    ///
    /// The archived checkpoint of the given generation.
    ///
    pub fn history (& self, generation: Generation) -> PathBuf 
    {
        self.root.join(format!("{}{}{}", HISTORY_PREFIX, generation.notate(), self.history_suffix()))
    }

    pub fn history_suffix (& self) -> String 
    {
        format!(".{}", self.extension)
    }

    pub fn final_model (& self) -> PathBuf 
    {
        self.root.join(format!("final_model.{}", self.extension))
    }

    pub fn evaluations (& self) -> PathBuf 
    {
        self.root.join("evaluations.jsonl")
    }
}
