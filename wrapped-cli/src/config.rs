use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use wrapped_core::DEFAULT_TRANSITION_MS;
use wrapped_ingest::DEFAULT_BASE_URL;

use crate::state::ensure_wrapped_home;

/// Overrides `api.base_url`.
pub const API_URL_ENV: &str = "WRAPPED_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub viewer: ViewerSection,
    #[serde(default)]
    pub log: LogSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            // PDF parsing on the service side can take a while.
            timeout_secs: 120,
        }
    }
}

impl ApiSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSection {
    /// Lock window per slide move.
    pub transition_ms: u64,
    pub mouse: bool,
}

impl Default for ViewerSection {
    fn default() -> Self {
        Self {
            transition_ms: DEFAULT_TRANSITION_MS,
            mouse: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// EnvFilter directive; `RUST_LOG` wins when set.
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml(s: &str) -> Result<Self> {
        toml::from_str(s).context("parse config.toml")
    }

    fn apply_env(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
        self
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_wrapped_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    let cfg = if p.exists() {
        let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
        Config::from_toml(&s)?
    } else {
        Config::default()
    };
    Ok(cfg.apply_env(std::env::var(API_URL_ENV).ok()))
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let cfg = load_config()?;
    println!("# {}", config_path()?.display());
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_defaults() {
        let cfg = Config::from_toml("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.viewer.transition_ms, 500);
        assert_eq!(cfg.api.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let cfg = Config::from_toml(
            r#"
[api]
base_url = "https://wrapped.example.com"

[viewer]
mouse = false
"#,
        )
        .unwrap();
        assert_eq!(cfg.api.base_url, "https://wrapped.example.com");
        assert_eq!(cfg.api.timeout_secs, 120);
        assert!(!cfg.viewer.mouse);
        assert_eq!(cfg.viewer.transition_ms, 500);
        assert_eq!(cfg.log.level, "info");
    }

    #[test]
    fn test_env_overrides_base_url() {
        let cfg = Config::default().apply_env(Some(" http://10.0.0.2:8000 ".to_string()));
        assert_eq!(cfg.api.base_url, "http://10.0.0.2:8000");

        let cfg = Config::default().apply_env(Some("".to_string()));
        assert_eq!(cfg.api.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_round_trips_through_toml() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(s.contains("[viewer]"));
        assert_eq!(Config::from_toml(&s).unwrap(), Config::default());
    }

    #[test]
    fn test_zero_timeout_is_clamped() {
        let api = ApiSection {
            timeout_secs: 0,
            ..ApiSection::default()
        };
        assert_eq!(api.timeout(), Duration::from_secs(1));
    }
}
