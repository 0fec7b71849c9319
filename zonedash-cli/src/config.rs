//! Layered configuration: built-in defaults, then the TOML file, then the
//! environment, then command-line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use zonedash_api::{ApiConfig, ENV_BASE_URL, ENV_TIMEOUT_SECS};

use crate::adapters::FileTokenStore;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Contents of `<config_dir>/zonedash/config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub token_path: Option<PathBuf>,
}

impl FileConfig {
    /// Platform default location of the config file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("zonedash").join(CONFIG_FILE_NAME))
    }

    /// Read `path`. A missing file yields the empty config.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config file at {}", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };
        toml::from_str(&raw).with_context(|| format!("Invalid config file {}", path.display()))
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct FlagOverrides {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub token_path: Option<PathBuf>,
}

/// Fully resolved settings of one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api: ApiConfig,
    pub token_path: PathBuf,
}

impl Settings {
    pub fn resolve(
        file: &FileConfig,
        env: impl Fn(&str) -> Option<String>,
        flags: &FlagOverrides,
    ) -> Result<Self> {
        let mut api = ApiConfig::default();

        if let Some(url) = &file.api_url {
            api = api.with_base_url(url.as_str());
        }
        if let Some(secs) = file.timeout_secs.filter(|s| *s > 0) {
            api = api.with_timeout(Duration::from_secs(secs));
        }

        if let Some(url) = env(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            api = api.with_base_url(url);
        }
        if let Some(raw) = env(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => api = api.with_timeout(Duration::from_secs(secs)),
                _ => tracing::warn!("Ignoring invalid {ENV_TIMEOUT_SECS}={raw}"),
            }
        }

        if let Some(url) = &flags.api_url {
            api = api.with_base_url(url.as_str());
        }
        if let Some(secs) = flags.timeout_secs.filter(|s| *s > 0) {
            api = api.with_timeout(Duration::from_secs(secs));
        }

        let token_path = flags
            .token_path
            .clone()
            .or_else(|| file.token_path.clone())
            .or_else(FileTokenStore::default_path)
            .context("Cannot determine a data directory for the session token; pass --token-file")?;

        Ok(Self { api, token_path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_without_any_source() {
        let flags = FlagOverrides {
            token_path: Some(PathBuf::from("/tmp/t")),
            ..FlagOverrides::default()
        };
        let settings = Settings::resolve(&FileConfig::default(), no_env, &flags).unwrap();
        assert_eq!(settings.api, ApiConfig::default());
        assert_eq!(settings.token_path, PathBuf::from("/tmp/t"));
    }

    #[test]
    fn env_beats_file_and_flags_beat_env() {
        let file = FileConfig {
            api_url: Some("https://file.example/api".to_string()),
            timeout_secs: Some(10),
            token_path: Some(PathBuf::from("/file/token")),
        };
        let env = |key: &str| match key {
            ENV_BASE_URL => Some("https://env.example/api".to_string()),
            ENV_TIMEOUT_SECS => Some("20".to_string()),
            _ => None,
        };

        let settings = Settings::resolve(&file, env, &FlagOverrides::default()).unwrap();
        assert_eq!(settings.api.base_url, "https://env.example/api");
        assert_eq!(settings.api.timeout, Duration::from_secs(20));
        assert_eq!(settings.token_path, PathBuf::from("/file/token"));

        let flags = FlagOverrides {
            api_url: Some("https://flag.example/api/".to_string()),
            timeout_secs: Some(3),
            token_path: Some(PathBuf::from("/flag/token")),
        };
        let settings = Settings::resolve(&file, env, &flags).unwrap();
        assert_eq!(settings.api.base_url, "https://flag.example/api");
        assert_eq!(settings.api.timeout, Duration::from_secs(3));
        assert_eq!(settings.token_path, PathBuf::from("/flag/token"));
    }

    #[test]
    fn invalid_env_timeout_keeps_file_value() {
        let file = FileConfig {
            timeout_secs: Some(12),
            token_path: Some(PathBuf::from("/t")),
            ..FileConfig::default()
        };
        let env = |key: &str| (key == ENV_TIMEOUT_SECS).then(|| "never".to_string());
        let settings = Settings::resolve(&file, env, &FlagOverrides::default()).unwrap();
        assert_eq!(settings.api.timeout, Duration::from_secs(12));
    }

    #[test]
    fn load_reads_toml_and_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert_eq!(FileConfig::load(&path).unwrap(), FileConfig::default());

        std::fs::write(
            &path,
            "api_url = \"https://dns.example.org/api\"\ntimeout_secs = 15\n",
        )
        .unwrap();
        let file = FileConfig::load(&path).unwrap();
        assert_eq!(file.api_url.as_deref(), Some("https://dns.example.org/api"));
        assert_eq!(file.timeout_secs, Some(15));
        assert!(file.token_path.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_ulr = \"typo\"\n").unwrap();
        assert!(FileConfig::load(&path).is_err());
    }
}
