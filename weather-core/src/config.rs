use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf, time::Duration};

/// Environment variable the API key is injected from.
pub const API_KEY_ENV: &str = "APIKEY";

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Forecast refresh period: 10 minutes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(600_000);

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// refresh_interval_secs = 600
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,

    /// Overrides the provider endpoint root, e.g. for a proxy.
    pub base_url: Option<String>,

    pub refresh_interval_secs: Option<u64>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-widget", "weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Key precedence: explicit override (flag or `APIKEY`), then the file, then empty.
    ///
    /// An empty key is not rejected here; the provider refuses it upstream.
    pub fn effective_api_key(&self, override_key: Option<&str>) -> String {
        override_key
            .or(self.api_key.as_deref())
            .unwrap_or_default()
            .to_string()
    }

    pub fn effective_base_url(&self, override_url: Option<&str>) -> String {
        override_url
            .or(self.base_url.as_deref())
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string()
    }

    pub fn effective_refresh_interval(&self, override_secs: Option<u64>) -> Duration {
        override_secs
            .or(self.refresh_interval_secs)
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REFRESH_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_yields_empty_string() {
        let cfg = Config::default();
        assert_eq!(cfg.effective_api_key(None), "");
    }

    #[test]
    fn override_key_beats_file_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        assert_eq!(cfg.effective_api_key(None), "FILE_KEY");
        assert_eq!(cfg.effective_api_key(Some("ENV_KEY")), "ENV_KEY");
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = Config::default();
        assert_eq!(cfg.effective_base_url(None), DEFAULT_BASE_URL);
        assert_eq!(cfg.effective_refresh_interval(None), Duration::from_secs(600));
    }

    #[test]
    fn zero_interval_falls_back_to_default() {
        let cfg = Config {
            refresh_interval_secs: Some(0),
            ..Config::default()
        };
        assert_eq!(cfg.effective_refresh_interval(None), DEFAULT_REFRESH_INTERVAL);
        assert_eq!(cfg.effective_refresh_interval(Some(30)), Duration::from_secs(30));
    }

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let cfg = Config::default();
        assert_eq!(
            cfg.effective_base_url(Some("http://127.0.0.1:9000/")),
            "http://127.0.0.1:9000"
        );
    }

    #[test]
    fn load_from_missing_file_returns_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from(&dir.path().join("absent.toml")).expect("load");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load_preserves_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config {
            api_key: Some("KEY".into()),
            base_url: None,
            refresh_interval_secs: Some(120),
        };
        cfg.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = [").expect("write");

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
