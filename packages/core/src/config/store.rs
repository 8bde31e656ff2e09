//! Single-record config store
//!
//! Every save rewrites the whole document. There is no locking, so two
//! concurrent invocations doing load-modify-save race with last-write-wins.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::ConfigError;
use super::paths::resolve_config_path;
use super::schema::LocalConfig;

/// Handle to the persisted config document
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store backed by an explicit file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the resolved per-user location
    pub fn locate(explicit: Option<PathBuf>) -> Result<Self, ConfigError> {
        resolve_config_path(explicit)
            .map(Self::new)
            .ok_or(ConfigError::NoHomeDirectory)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the config
    ///
    /// A missing file is reported as [`ConfigError::NotFound`] so callers can
    /// tell "never authenticated" apart from a corrupt document.
    pub fn load(&self) -> Result<LocalConfig, ConfigError> {
        debug!("Loading config from {}", self.path.display());
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(self.path.clone()));
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        serde_json::from_str(&contents).map_err(|source| ConfigError::Decode {
            path: self.path.clone(),
            source,
        })
    }

    /// Load the config, treating a missing file as `None`
    pub fn load_optional(&self) -> Result<Option<LocalConfig>, ConfigError> {
        match self.load() {
            Ok(config) => Ok(Some(config)),
            Err(ConfigError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Overwrite the config with `config`
    pub fn save(&self, config: &LocalConfig) -> Result<(), ConfigError> {
        let data = serde_json::to_string_pretty(config).map_err(ConfigError::Encode)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut file = open_owner_only(&self.path)?;
        file.write_all(data.as_bytes())?;
        file.write_all(b"\n")?;
        file.sync_all()?;

        debug!("Saved config to {}", self.path.display());
        Ok(())
    }
}

#[cfg(unix)]
fn open_owner_only(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies on creation; tighten files written by older versions
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_owner_only(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}
