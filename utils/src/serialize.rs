
use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::Path;

use super::error::*;

use tempfile::NamedTempFile;

pub use serde::{Serialize, Deserialize};
pub use serde::de::DeserializeOwned;

///
/// Reads a whole file into a string, naming the file on failure.
///
pub fn read_string (path: & Path) -> Result<String>
{
    let mut buffer = String::new();
    OpenOptions::new().read(true).open(path)
        .and_then(|mut file| file.read_to_string(& mut buffer))
        .context(format!("Failed to read '{}'.", path.display()))?;

    Ok(buffer)
}

///
/// Deserializes a JSON document from the given file.
///
pub fn read_json<T: DeserializeOwned> (path: & Path) -> Result<T>
{
    let contents = read_string(path)?;
    serde_json::from_str(& contents).context(format!("Malformed JSON in '{}'.", path.display()))
}

///
/// Replaces the file at the given path with the given bytes, all or nothing.
///
/// The bytes are written to a temporary file in the destination directory 
/// and renamed over the destination, so a concurrent reader sees either the 
/// previous contents or the new contents, never a partial write.
///
pub fn write_atomic (path: & Path, bytes: & [u8]) -> Result<()>
{
    let directory = match path.parent()
    {
        Some(parent) if ! parent.as_os_str().is_empty() => parent,
        _                                               => Path::new(".")
    };

    let mut staged = NamedTempFile::new_in(directory).context(format!("Failed to stage a write in '{}'.", directory.display()))?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    staged.persist(path).context(format!("Failed to move the staged write onto '{}'.", path.display()))?;

    Ok(())
}

///
/// Serializes a value as pretty JSON and writes it atomically.
///
pub fn write_json_atomic<T: Serialize> (path: & Path, value: & T) -> Result<()>
{
    let json = serde_json::to_vec_pretty(value)?;
    write_atomic(path, & json)
}

///
/// Appends a value as a single JSON line, creating the file if needed.
///
pub fn append_json_line<T: Serialize> (path: & Path, value: & T) -> Result<()>
{
    let mut line = serde_json::to_string(value)?;
    line.push('\n');

    let mut file = OpenOptions::new().create(true).append(true).open(path).context(format!("Failed to open '{}' for appending.", path.display()))?;
    file.write_all(line.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests 
{
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record 
    {
        step: usize,
        value: f64
    }

    #[test]
    fn write_atomic_replaces_previous_contents ()
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifact.bin");

        write_atomic(& path, b"first version").unwrap();
        write_atomic(& path, b"second").unwrap();

        assert_eq!(std::fs::read(& path).unwrap(), b"second");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn json_lines_accumulate ()
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.jsonl");

        append_json_line(& path, & Record { step: 1, value: 0.5 }).unwrap();
        append_json_line(& path, & Record { step: 2, value: -1.0 }).unwrap();

        let contents = read_string(& path).unwrap();
        let records : Vec<Record> = contents.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(records, vec![Record { step: 1, value: 0.5 }, Record { step: 2, value: -1.0 }]);
    }

    #[test]
    fn read_json_names_missing_file ()
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let err = read_json::<Record>(& path).unwrap_err();
        assert!(format!("{:#}", err).contains("absent.json"));
    }
}
