use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
};

/// Environment variable that overrides the configured API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Credentials for the OpenWeatherMap API.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OpenWeatherConfig {
    /// Secret. Never logged, never hard-coded.
    pub api_key: String,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// bind_address = "127.0.0.1:8080"
///
/// [openweather]
/// api_key = "..."
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    #[serde(default)]
    pub openweather: OpenWeatherConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            openweather: OpenWeatherConfig::default(),
        }
    }
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

impl Config {
    /// Load config from the platform config directory, or return defaults
    /// if the file doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    /// Load config from an explicit path, or defaults if the file is absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-gateway", "weather-server")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Resolve the upstream API key.
    ///
    /// The `OPENWEATHER_API_KEY` environment variable wins over the config
    /// file, so hosting environments can supply the secret without touching
    /// disk.
    pub fn api_key(&self) -> Result<String> {
        if let Ok(key) = std::env::var(API_KEY_ENV)
            && !key.is_empty()
        {
            return Ok(key);
        }

        if self.openweather.api_key.is_empty() {
            return Err(anyhow!(
                "No OpenWeatherMap API key configured.\n\
                 Hint: set {API_KEY_ENV} or add `api_key` under [openweather] in the config file."
            ));
        }

        Ok(self.openweather.api_key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_when_file_is_absent() {
        let dir = tempfile::tempdir().expect("tempdir must be created");
        let cfg = Config::load_from(&dir.path().join("missing.toml")).expect("load must succeed");

        assert_eq!(cfg.bind_address, default_bind_address());
        assert!(cfg.openweather.api_key.is_empty());
    }

    #[test]
    fn parses_full_config_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile must be created");
        writeln!(
            file,
            "bind_address = \"0.0.0.0:9090\"\n\n[openweather]\napi_key = \"FILE_KEY\"\n"
        )
        .expect("write must succeed");

        let cfg = Config::load_from(file.path()).expect("load must succeed");

        assert_eq!(cfg.bind_address, "0.0.0.0:9090".parse().expect("valid addr"));
        assert_eq!(cfg.openweather.api_key, "FILE_KEY");
    }

    #[test]
    fn rejects_malformed_config_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile must be created");
        writeln!(file, "bind_address = [not toml").expect("write must succeed");

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    // Single test for the whole env-override ladder: env mutation is process
    // global, so the steps must not run as separate parallel tests.
    #[test]
    fn api_key_resolution_order() {
        unsafe { std::env::remove_var(API_KEY_ENV) };

        let mut cfg = Config::default();
        let err = cfg.api_key().unwrap_err();
        assert!(err.to_string().contains("No OpenWeatherMap API key configured"));

        cfg.openweather.api_key = "FILE_KEY".to_string();
        assert_eq!(cfg.api_key().expect("file key must resolve"), "FILE_KEY");

        unsafe { std::env::set_var(API_KEY_ENV, "ENV_KEY") };
        assert_eq!(cfg.api_key().expect("env key must resolve"), "ENV_KEY");

        unsafe { std::env::remove_var(API_KEY_ENV) };
    }
}
