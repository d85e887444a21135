use crate::error::{FetchError, Result};
use crate::utils::fs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Overrides `curl_path` for every invocation when set.
pub const CURL_ENV_VAR: &str = "CURLFETCH_CURL";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Program run for each transfer.
    pub curl_path: String,
    /// Passed to the tool ahead of the fixed download arguments.
    pub extra_args: Vec<String>,
    pub follow_redirects: bool,
    /// Kill the tool when the download is interrupted instead of letting it
    /// run to completion.
    pub kill_on_interrupt: bool,
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            curl_path: "curl".to_string(),
            extra_args: Vec::new(),
            follow_redirects: true,
            kill_on_interrupt: true,
            show_progress: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&get_config_path()?)?;
        config.apply_env_override(std::env::var(CURL_ENV_VAR).ok());
        Ok(config)
    }

    /// Read the config at `config_path`, writing defaults there first if it
    /// does not exist yet.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = config_path.parent() {
            fs::ensure_dir_exists(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;

        Ok(())
    }

    pub fn set_curl_path(&mut self, curl_path: String) -> Result<()> {
        self.curl_path = curl_path;
        self.save()
    }

    pub fn apply_env_override(&mut self, value: Option<String>) {
        if let Some(curl_path) = value.filter(|v| !v.trim().is_empty()) {
            self.curl_path = curl_path;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.curl_path.trim().is_empty() {
            return Err(FetchError::config_error("curl_path must not be empty"));
        }
        Ok(())
    }
}

pub fn get_curlfetch_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".curlfetch"))
        .ok_or(FetchError::HomeDirectoryNotFound)
}

pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_curlfetch_dir()?.join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_first_load_writes_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.json");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn test_round_trip_through_disk() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");

        let config = Config {
            curl_path: "/opt/curl/bin/curl".to_string(),
            extra_args: vec!["--retry".to_string(), "0".to_string()],
            follow_redirects: false,
            kill_on_interrupt: false,
            show_progress: false,
        };
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        std::fs::write(&path, r#"{ "curl_path": "curl-impersonate" }"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.curl_path, "curl-impersonate");
        assert!(config.follow_redirects);
        assert!(config.kill_on_interrupt);
    }

    #[test]
    fn test_empty_curl_path_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        std::fs::write(&path, r#"{ "curl_path": "  " }"#).unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(FetchError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_env_override() {
        let mut config = Config::default();
        config.apply_env_override(None);
        assert_eq!(config.curl_path, "curl");

        config.apply_env_override(Some(String::new()));
        assert_eq!(config.curl_path, "curl");

        config.apply_env_override(Some("/usr/local/bin/curl".to_string()));
        assert_eq!(config.curl_path, "/usr/local/bin/curl");
    }
}
