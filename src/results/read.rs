use std::{fs, io};
use std::io::Error;
use std::path::{Path, PathBuf};

use log::warn;
use serde::de::DeserializeOwned;

pub fn get_entry_paths(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    fs::read_dir(dir)?
        .map(|res| res.map(|e| e.path()))
        .collect::<Result<Vec<PathBuf>, io::Error>>()
}

/// A folder that doesn't exist, isn't a directory, or has nothing in it
pub fn is_empty_dir(path: &Path) -> bool {
    if !path.is_dir() {
        return true;
    }
    match fs::read_dir(path) {
        Ok(mut entries) => entries.next().is_none(),
        Err(err) => {
            warn!("Can't list {}: {}", path.display(), err);
            true
        }
    }
}

/// Deserialise a JSON result file, warning and returning None if it can't be read or parsed
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let json_string = fs::read_to_string(path)
        .map_err(|err| warn!("Could not read {}: {}", path.display(), err))
        .ok()?;
    serde_json::from_str::<T>(&json_string)
        .map_err(|err| warn!("Could not read {}: {}", path.display(), err))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_plain_files_count_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(is_empty_dir(&dir.path().join("Replicate_0")));

        let file = dir.path().join("Replicate_1");
        fs::write(&file, "").unwrap();
        assert!(is_empty_dir(&file));
    }

    #[test]
    fn directory_with_a_file_is_not_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(is_empty_dir(dir.path()));
        fs::write(dir.path().join("log.txt"), "done").unwrap();
        assert!(!is_empty_dir(dir.path()));
        assert_eq!(get_entry_paths(dir.path()).unwrap(), vec![dir.path().join("log.txt")]);
    }

    #[test]
    fn unparseable_json_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(read_json::<serde_json::Value>(&path), None);
    }
}
