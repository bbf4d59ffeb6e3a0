//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const PROJECT_FILE_NAMES: [&str; 2] = ["duet.toml", ".duet.toml"];

/// Prefix for environment overrides; `__` separates nested keys
/// (`DUET_ROUTING__SMALL_THRESHOLD=4000`).
const ENV_PREFIX: &str = "DUET_";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `DUET_*` environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./duet.toml` or `./.duet.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/duet/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, ConfigError> {
        Self::load_from(
            Self::global_config_path().as_deref(),
            Self::project_config_path().as_deref(),
            config_path.map(PathBuf::as_path),
        )
    }

    /// Merge the given files over the defaults. Missing implicit files are
    /// skipped; a missing explicit file is an error.
    pub fn load_from(
        global: Option<&Path>,
        project: Option<&Path>,
        explicit: Option<&Path>,
    ) -> Result<FileConfig, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        for path in [global, project].into_iter().flatten() {
            if path.exists() {
                debug!(path = %path.display(), "Merging config file");
                figment = figment.merge(Toml::file(path));
            }
        }

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            debug!(path = %path.display(), "Merging explicit config file");
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment.extract().map_err(|e| ConfigError::Invalid(Box::new(e)))
    }

    /// Load only default configuration
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// `$XDG_CONFIG_HOME/duet/config.toml`, falling back to `~/.config/duet/config.toml`
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("duet").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILE_NAMES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert!(config.verification.enabled);
        assert_eq!(config.routing.small_threshold, 8000);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path().unwrap();
        assert!(path.ends_with("duet/config.toml"));
    }

    #[test]
    fn test_missing_implicit_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigLoader::load_from(
            Some(&dir.path().join("nope.toml")),
            Some(&dir.path().join("also-nope.toml")),
            None,
        )
        .unwrap();
        assert_eq!(config.routing, FileConfig::default().routing);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let err = ConfigLoader::load_from(None, None, Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(path) if path == missing));
    }

    #[test]
    fn test_later_files_override_earlier_ones() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("duet.toml");
        let explicit = dir.path().join("explicit.toml");
        fs::write(
            &global,
            "[routing]\nsmall_threshold = 1000\nmedium_threshold = 5000\n",
        )
        .unwrap();
        fs::write(&project, "[routing]\nsmall_threshold = 2000\n").unwrap();
        fs::write(&explicit, "[verification]\nmax_iterations = 7\n").unwrap();

        let config =
            ConfigLoader::load_from(Some(&global), Some(&project), Some(&explicit)).unwrap();

        assert_eq!(config.routing.small_threshold, 2000);
        assert_eq!(config.routing.medium_threshold, 5000);
        assert_eq!(config.verification.max_iterations, 7);
        assert!(config.verification.enabled);
    }

    #[test]
    fn test_malformed_file_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[routing]\nsmall_threshold = \"lots\"\n").unwrap();
        let err = ConfigLoader::load_from(None, None, Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
