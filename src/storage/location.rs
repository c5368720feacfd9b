use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use crate::storage::JsonFileSnapshot;

/// Name of the per-user data directory under the home directory
const DATA_DIR_NAME: &str = ".blocktodo";

/// Resolves where the todo file lives
pub struct DataLocation;

impl DataLocation {
    /// Get the per-user data directory
    pub fn data_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(DATA_DIR_NAME))
    }

    /// Get the default todo file path
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("todos.json"))
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("rc"))
    }

    /// Read `data.location=` from a configuration file.
    ///
    /// Relative locations resolve against the configuration file's directory.
    pub fn location_from_config(config_path: &Path) -> Option<PathBuf> {
        let config = std::fs::read_to_string(config_path).ok()?;
        let value = config
            .lines()
            .map(str::trim)
            .find_map(|line| line.strip_prefix("data.location="))?
            .trim();

        if value.is_empty() {
            return None;
        }

        let path = PathBuf::from(value);
        if path.is_relative() {
            let base = config_path.parent().unwrap_or_else(|| Path::new("."));
            Some(base.join(path))
        } else {
            Some(path)
        }
    }

    /// Get the todo file path from configuration file or default
    pub fn resolve_path() -> Result<PathBuf> {
        let config_path = Self::config_path()?;
        match Self::location_from_config(&config_path) {
            Some(path) => Ok(path),
            None => Self::default_path(),
        }
    }

    /// Open the snapshot at `override_path`, or at the configured location
    pub fn open(override_path: Option<PathBuf>) -> Result<JsonFileSnapshot> {
        let path = match override_path {
            Some(path) => path,
            None => Self::resolve_path()?,
        };
        log::debug!("Using todo file {}", path.display());
        Ok(JsonFileSnapshot::new(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_location_from_config_relative() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("rc");
        fs::write(&config_file, "# comment\ndata.location=./custom.json\n").unwrap();

        let path = DataLocation::location_from_config(&config_file).unwrap();
        assert_eq!(path, temp_dir.path().join("./custom.json"));
    }

    #[test]
    fn test_location_from_config_absolute() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("rc");
        let target = temp_dir.path().join("elsewhere").join("t.json");
        fs::write(&config_file, format!("  data.location={}  \n", target.display())).unwrap();

        assert_eq!(DataLocation::location_from_config(&config_file), Some(target));
    }

    #[test]
    fn test_location_from_config_missing_or_blank() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("rc");
        assert_eq!(DataLocation::location_from_config(&config_file), None);

        fs::write(&config_file, "data.location=\n").unwrap();
        assert_eq!(DataLocation::location_from_config(&config_file), None);
    }

    #[test]
    fn test_open_with_override() {
        let snapshot = DataLocation::open(Some(PathBuf::from("/tmp/x/todos.json"))).unwrap();
        assert_eq!(snapshot.path(), Path::new("/tmp/x/todos.json"));
    }
}
