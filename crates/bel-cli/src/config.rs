//! Locating and reading the engine configuration.
//!
//! An explicit `--config` path must exist. Otherwise `bel/config.toml` in the
//! working directory is tried, then `config.toml` in the per-user config
//! directory, and the defaults apply when neither is present.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use bel::{BelError, config::AppConfig};

/// Local configuration path, relative to the working directory.
const LOCAL_CONFIG: &str = "bel/config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Missing configuration file: {}", .0.display())]
    MissingFile(PathBuf),
}

impl From<ConfigError> for BelError {
    fn from(err: ConfigError) -> Self {
        BelError::InvalidConfig(err.to_string())
    }
}

/// Load the configuration, searching the usual places when no path is given.
///
/// # Errors
///
/// Fails when an explicit path is missing, or when the file found cannot be
/// read or decoded.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, BelError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::MissingFile(path.to_path_buf()).into());
        }
        info!(path:? = path; "Loading configuration from explicit path");
        return read_config(path);
    }

    match search_paths().into_iter().find(|path| path.exists()) {
        Some(path) => {
            info!(path:? = path; "Loading configuration");
            read_config(&path)
        }
        None => {
            debug!("No configuration file found, using defaults");
            Ok(AppConfig::default())
        }
    }
}

/// Candidate locations, most specific first.
fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
    match ProjectDirs::from("org", "bel", "bel") {
        Some(dirs) => paths.push(dirs.config_dir().join("config.toml")),
        None => debug!("No per-user configuration directory on this platform"),
    }
    paths
}

fn read_config(path: &Path) -> Result<AppConfig, BelError> {
    let content = fs::read_to_string(path)?;
    let config = toml::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[canonicalize]\nHGNC = [\"EG\"]").unwrap();

        let config = load_config(Some(file.path())).unwrap();

        assert_eq!(config.canonicalize().targets("HGNC"), ["EG"]);
    }

    #[test]
    fn test_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = load_config(Some(&path)).unwrap_err();

        assert!(matches!(err, BelError::InvalidConfig(_)), "{err}");
        assert!(err.to_string().contains("Missing configuration file"));
    }

    #[test]
    fn test_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[lookup]\ntimeout_ms = \"soon\"").unwrap();

        let err = load_config(Some(file.path())).unwrap_err();

        assert!(err.to_string().contains("Failed to parse TOML configuration"));
    }

    #[test]
    fn test_local_path_searched_first() {
        assert_eq!(search_paths()[0], PathBuf::from(LOCAL_CONFIG));
    }
}
