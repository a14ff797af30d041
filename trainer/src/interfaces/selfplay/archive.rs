
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::PathBuf;

use super::error::SelfplayError;
use super::layout::{Layout, HISTORY_PREFIX};

use utils::error::*;
use utils::log;
use utils::notate::Notate;
use utils::{Serialize, Deserialize};

///
/// The number of a promoted champion. Generation 0 is whatever the run
/// started with; every promotion produces the next generation.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Generation (pub u64);

impl std::fmt::Display for Generation
{
    fn fmt (& self, f: & mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        write!(f, "{}", self.0)
    }
}

impl Notate for Generation
{
    fn notate (& self) -> String
    {
        format!("{:08}", self.0)
    }

    fn parse (s: & str) -> Result<Generation>
    {
        let context = format!("Invalid notation '{}' for generation.", s);

        if s.len() < 8 || ! s.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(error!("Expected at least 8 decimal digits.")).context(context);
        }

        let value = s.parse::<u64>().context(context)?;
        Ok(Generation(value))
    }
}

impl Generation
{
    pub fn next (& self) -> Generation
    {
        Generation(self.0 + 1)
    }
}

///
/// The immutable history of champions.
///
/// Entries are byte-for-byte copies of the best model at the moment of
/// promotion, and are created with create-new semantics: an existing
/// entry is never overwritten.
///
#[derive(Clone, Debug)]
pub struct Archive
{
    layout: Layout
}

impl Archive
{
    pub fn new (layout: & Layout) -> Archive
    {
        Archive { layout: layout.clone() }
    }

    ///
    /// Copies the current best model into the slot for the given generation.
    ///
    pub fn archive (& self, generation: Generation) -> std::result::Result<PathBuf, SelfplayError>
    {
        let destination = self.layout.history(generation);
        let failure = |source: io::Error| SelfplayError::ArchiveIo { generation: generation.0, path: destination.clone(), source };

        let mut input = File::open(self.layout.best_model()).map_err(failure)?;
        let mut output = OpenOptions::new().write(true).create_new(true).open(& destination).map_err(failure)?;

        if let Err(e) = io::copy(& mut input, & mut output).and_then(|_| output.sync_all())
        {
            // Only this call could have created the file, so it is safe to remove.

            drop(output);
            let _ = fs::remove_file(& destination);
            return Err(failure(e));
        }

        Ok(destination)
    }

    ///
    /// Returns the highest generation present in the archive, if any.
    ///
    pub fn latest (& self) -> Result<Option<Generation>>
    {
        let root = self.layout.root();
        if ! root.exists()
        {
            return Ok(None);
        }

        let suffix = self.layout.history_suffix();
        let mut latest = None;

        for entry in fs::read_dir(root).context(format!("Failed to scan '{}' for archived generations.", root.display()))?
        {
            let name = entry?.file_name();
            let name = match name.to_str()
            {
                Some(name) if name.starts_with(HISTORY_PREFIX) => name.to_owned(),
                _                                              => continue
            };

            match Generation::parse_framed(& name, HISTORY_PREFIX, & suffix)
            {
                Ok(generation) => latest = latest.max(Some(generation)),
                Err(e)         => log::debug!("Ignoring '{}' while scanning the archive: {:#}", name, e)
            }
        }

        Ok(latest)
    }
}
