use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// Endpoint of the jinrishici info API (weather, region and poetry tokens).
pub const DEFAULT_ENDPOINT: &str = "https://v2.jinrishici.com/info";

/// Ten minutes between scheduled refreshes.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 600;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Host-owned switch for the widget. Absent means disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WidgetConfig {
    pub enabled: bool,
}

impl WidgetConfig {
    /// `None` and `enabled = false` are the same thing to the widget.
    pub fn is_enabled(config: Option<&WidgetConfig>) -> bool {
        config.is_some_and(|c| c.enabled)
    }
}

/// What to do with a fetch that is still in flight when the next one starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OverlapPolicy {
    /// Every fetch runs to completion; whichever resolves last owns the state.
    #[default]
    LastResolvedWins,
    /// A new fetch cancels the previous one before it can touch the state.
    CancelStale,
}

/// Remote endpoint and polling settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub endpoint: String,
    pub refresh_interval_secs: u64,
    pub timeout_secs: u64,
    pub overlap: OverlapPolicy,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            overlap: OverlapPolicy::default(),
        }
    }
}

impl SourceConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Responsive policy, expressed in terminal columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breakpoints {
    /// Below this width nothing is rendered.
    pub hide_below: u16,
    /// Below this width only the icon and temperature are rendered.
    pub text_below: u16,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self { hide_below: 40, text_below: 80 }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [widget]
/// enabled = true
///
/// [source]
/// refresh_interval_secs = 600
/// overlap = "cancel-stale"
///
/// [display]
/// hide_below = 40
/// text_below = 80
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Missing section means the widget stays off.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<WidgetConfig>,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub display: Breakpoints,
}

impl Config {
    pub fn is_enabled(&self) -> bool {
        WidgetConfig::is_enabled(self.widget.as_ref())
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.widget = Some(WidgetConfig { enabled });
    }

    /// Reject settings the scheduler or renderer cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.source.refresh_interval_secs == 0 {
            bail!("source.refresh_interval_secs must be greater than zero");
        }
        if self.source.timeout_secs == 0 {
            bail!("source.timeout_secs must be greater than zero");
        }
        if self.display.hide_below > self.display.text_below {
            bail!(
                "display.hide_below ({}) must not exceed display.text_below ({})",
                self.display.hide_below,
                self.display.text_below
            );
        }

        let url = Url::parse(&self.source.endpoint)
            .with_context(|| format!("Invalid source.endpoint: {}", self.source.endpoint))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("source.endpoint must be an http(s) URL, got '{}'", url.scheme());
        }

        Ok(())
    }

    /// Load config from the platform config directory, or return an empty
    /// default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config directory.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    /// Save config to `path`, creating parent directories as needed.
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
        let dirs = ProjectDirs::from("dev", "weather-widget", "weather-widget")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
