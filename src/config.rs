//! Configuration file plus environment overrides.
//!
//! Read from `~/.config/stencil/config.toml` (or `--config <path>`).
//! A missing default file just means defaults; a missing explicit file
//! is an error. `STENCIL_API_URL` and `STENCIL_API_KEY` override the
//! file, so the key never has to live on disk.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::error::AppError;

const DEFAULT_API_URL: &str = "https://api.novu.co";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: Url,
    pub api_key: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_API_URL).expect("default API URL parses"),
            api_key: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub readonly: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default directive for the log filter, e.g. `info` or `stencil=debug`.
    pub level: String,
    /// Log file path. Defaults to `stencil.log` in the user data dir.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    pub fn load(explicit: Option<&Path>) -> Result<Config, AppError> {
        let mut config = match explicit {
            Some(path) => Self::read_file(path)?,
            None => {
                let path = default_path();
                if path.exists() {
                    Self::read_file(&path)?
                } else {
                    Config::default()
                }
            }
        };
        config.override_from(
            std::env::var("STENCIL_API_URL").ok(),
            std::env::var("STENCIL_API_KEY").ok(),
        )?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Config, AppError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    fn override_from(
        &mut self,
        base_url: Option<String>,
        api_key: Option<String>,
    ) -> Result<(), AppError> {
        if let Some(raw) = base_url {
            self.api.base_url = Url::parse(&raw)
                .map_err(|e| AppError::Config(format!("STENCIL_API_URL: {e}")))?;
        }
        if let Some(key) = api_key {
            self.api.api_key = key;
        }
        Ok(())
    }
}

fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stencil")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"http://localhost:3000\"\napi_key = \"k1\"\n\n[ui]\nreadonly = true"
        )
        .unwrap();

        let config = Config::read_file(file.path()).unwrap();
        assert_eq!(config.api.base_url.as_str(), "http://localhost:3000/");
        assert_eq!(config.api.api_key, "k1");
        assert!(config.ui.readonly);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"debug\"").unwrap();

        let config = Config::read_file(file.path()).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.api.base_url.as_str(), "https://api.novu.co/");
        assert!(!config.ui.readonly);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api = not toml").unwrap();
        assert!(matches!(
            Config::read_file(file.path()),
            Err(AppError::Toml(_))
        ));
    }

    #[test]
    fn env_values_override_the_file() {
        let mut config = Config::default();
        config
            .override_from(Some("http://127.0.0.1:8080".to_string()), Some("k2".to_string()))
            .unwrap();
        assert_eq!(config.api.base_url.as_str(), "http://127.0.0.1:8080/");
        assert_eq!(config.api.api_key, "k2");
    }

    #[test]
    fn bad_env_url_is_an_error() {
        let mut config = Config::default();
        let result = config.override_from(Some("not a url".to_string()), None);
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
