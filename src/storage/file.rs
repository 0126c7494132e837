use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::{
    domain::{Config, Person},
    storage::{AppData, Backend, ImportError, PersistenceError, config_path, data_path},
};

/// Keeps the store in a JSON file on disk.
///
/// The file has the same shape as an exported backup, so a backup can be
/// dropped in as the data file and vice versa.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBackend {
    path: PathBuf,
    dark_mode: bool,
}

impl FileBackend {
    /// A backend for the data file at `path`.
    ///
    /// `dark_mode` is written alongside the people on every save.
    #[must_use]
    pub const fn new(path: PathBuf, dark_mode: bool) -> Self {
        Self { path, dark_mode }
    }

    /// The backend for the data file in `root`, using the preferences saved
    /// there.
    #[must_use]
    pub fn in_root(root: &Path) -> Self {
        let config = load_config(root);
        Self::new(data_path(root), config.dark_mode)
    }

    /// The data file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The dark-mode flag written with the data.
    #[must_use]
    pub const fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    fn read(&self) -> Result<AppData, ImportError> {
        let text = fs::read_to_string(&self.path)?;
        AppData::from_json(&text)
    }
}

impl Backend for FileBackend {
    fn load(&self) -> Vec<Person> {
        match self.read() {
            Ok(data) => data.people,
            Err(ImportError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No data file at {}", self.path.display());
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Error loading data from {}: {e}", self.path.display());
                Vec::new()
            }
        }
    }

    fn save(&self, people: &[Person]) -> Result<(), PersistenceError> {
        let data = AppData {
            people: people.to_vec(),
            dark_mode: self.dark_mode,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, data.to_json()?)?;
        tracing::debug!("Saved {} people to {}", people.len(), self.path.display());
        Ok(())
    }
}

/// Load the preferences for `root`, falling back to the defaults.
pub fn load_config(root: &Path) -> Config {
    let path = config_path(root);
    Config::load(&path).unwrap_or_else(|e| {
        tracing::debug!("Failed to load config: {e}");
        Config::default()
    })
}
