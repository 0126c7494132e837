//! Persistence of the record store: the saved data file, backups, and
//! import of backup files.

use std::path::{Path, PathBuf};

use crate::domain::Person;

/// JSON encoding of the saved data and of backup files.
pub mod backup;
pub use backup::{AppData, ImportError, backup_file_name, export, import, import_str};

mod file;
pub use file::{FileBackend, load_config};

/// Where a store's data is loaded from and saved to.
///
/// The store calls [`Backend::save`] after every change. A failed save is
/// logged and otherwise ignored: the in-memory change stands.
pub trait Backend {
    /// Load the saved people.
    ///
    /// Missing or unreadable data yields an empty collection.
    fn load(&self) -> Vec<Person>;

    /// Persist the full collection, replacing whatever was saved before.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be written.
    fn save(&self, people: &[Person]) -> Result<(), PersistenceError>;
}

/// A backend that keeps nothing: loads are empty and saves are discarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Detached;

impl Backend for Detached {
    fn load(&self) -> Vec<Person> {
        Vec::new()
    }

    fn save(&self, _people: &[Person]) -> Result<(), PersistenceError> {
        Ok(())
    }
}

/// Failure to read or write saved data.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// The file could not be read or written.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The data could not be encoded or decoded.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Name of the saved data file inside the root directory.
pub const DATA_FILE: &str = "giftwise-data.json";

/// The saved data file for a root directory.
#[must_use]
pub fn data_path(root: &Path) -> PathBuf {
    root.join(DATA_FILE)
}

/// The configuration file for a root directory.
#[must_use]
pub fn config_path(root: &Path) -> PathBuf {
    root.join(".giftwise").join("config.toml")
}
