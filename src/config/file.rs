//! Configuration file discovery
//!
//! Handles finding and loading the configuration file for a run.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{AppConfig, EnvConfig};

/// Configuration file locations (in order of precedence)
const CONFIG_LOCATIONS: &[&str] = &[
    "./parfetch.yaml",
    "./parfetch.yml",
    "./parfetch.json",
    "~/.config/parfetch/config.yaml",
    "~/.parfetch.yaml",
];

/// Where the effective configuration came from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    Defaults,
    File(PathBuf),
}

/// Find configuration file in standard locations
pub fn find_config_file() -> Option<PathBuf> {
    CONFIG_LOCATIONS
        .iter()
        .map(|location| expand_path(location))
        .find(|path| path.exists())
}

/// Build the effective configuration: file (explicit path, `PARFETCH_CONFIG`,
/// or a standard location) with environment overrides applied.
pub fn resolve(explicit: Option<&Path>, env: &EnvConfig) -> Result<(AppConfig, ConfigSource)> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| env.config_file.as_deref().map(expand_path))
        .or_else(find_config_file);

    let (mut config, source) = match path {
        Some(path) => {
            debug!("Loading config from {}", path.display());
            (AppConfig::load(&path)?, ConfigSource::File(path))
        }
        None => (AppConfig::default(), ConfigSource::Defaults),
    };

    config.apply_env(env);
    config.validate()?;
    Ok((config, source))
}

/// Expand ~ to home directory
fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_explicit_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.json");
        std::fs::write(&path, r#"{"pool_size": 3, "urls": ["https://a.test"]}"#).unwrap();

        let env = EnvConfig {
            rounds: Some(5),
            ..Default::default()
        };
        let (config, source) = resolve(Some(&path), &env).unwrap();

        assert_eq!(source, ConfigSource::File(path));
        assert_eq!(config.pool_size, 3);
        assert_eq!(config.rounds, 5);
        assert_eq!(config.urls, vec!["https://a.test".to_string()]);
    }

    #[test]
    fn test_resolve_rejects_invalid_override() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ok.yaml");
        std::fs::write(&path, "rounds: 1\n").unwrap();

        let env = EnvConfig {
            pool_size: Some(0),
            ..Default::default()
        };
        assert!(resolve(Some(&path), &env).is_err());
    }

    #[test]
    fn test_resolve_missing_file_is_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.yaml");
        assert!(resolve(Some(&missing), &EnvConfig::default()).is_err());
    }

    #[test]
    fn test_expand_path() {
        assert_eq!(expand_path("./test.yaml"), PathBuf::from("./test.yaml"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~/x.yaml"), home.join("x.yaml"));
        }
    }
}
