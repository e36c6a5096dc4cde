use crate::error::ConfigError;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Deadline of whatever sits above the transport (a gateway, a hosting
/// platform). The transport timeout must stay below it.
pub const CALLER_DEADLINE_SECS: u64 = 60;

/// Hard cap on follow-up rounds.
pub const DEFAULT_MAX_ROUNDS: u32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub dialog: DialogConfig,

    #[serde(default)]
    pub handoff: HandoffConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Service credential. Only ever sourced from the environment.
    #[serde(skip)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://open.bigmodel.cn/api/paas/v4".into()
}

fn default_model() -> String {
    "glm-4-flash".into()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_top_p() -> f64 {
    0.95
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_timeout_secs() -> u64 {
    55
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogConfig {
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
}

fn default_max_rounds() -> u32 {
    DEFAULT_MAX_ROUNDS
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            max_rounds: default_max_rounds(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandoffConfig {
    /// Directory holding the persisted `options` / `letters` entries.
    /// `~` is expanded.
    #[serde(default = "default_handoff_dir")]
    pub dir: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_deadline_secs")]
    pub deadline_secs: u64,
}

fn default_handoff_dir() -> String {
    "~/.aiself/handoff".into()
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_deadline_secs() -> u64 {
    100
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            dir: default_handoff_dir(),
            poll_interval_ms: default_poll_interval_ms(),
            deadline_secs: default_deadline_secs(),
        }
    }
}

impl HandoffConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }

    pub fn resolved_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.dir).into_owned())
    }
}

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());

        Self {
            config_path: home.join(".aiself").join("config.toml"),
            provider: ProviderConfig::default(),
            dialog: DialogConfig::default(),
            handoff: HandoffConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let provider = &self.provider;
        if provider.model.trim().is_empty() {
            return Err(ConfigError::Validation("provider.model is empty".into()));
        }
        if !(0.0..=2.0).contains(&provider.temperature) {
            return Err(ConfigError::Validation(format!(
                "provider.temperature {} outside 0.0..=2.0",
                provider.temperature
            )));
        }
        if !(provider.top_p > 0.0 && provider.top_p <= 1.0) {
            return Err(ConfigError::Validation(format!(
                "provider.top_p {} outside (0.0, 1.0]",
                provider.top_p
            )));
        }
        if !(3000..=4096).contains(&provider.max_tokens) {
            return Err(ConfigError::Validation(format!(
                "provider.max_tokens {} outside 3000..=4096",
                provider.max_tokens
            )));
        }
        if provider.timeout_secs == 0 || provider.timeout_secs >= CALLER_DEADLINE_SECS {
            return Err(ConfigError::Validation(format!(
                "provider.timeout_secs must be between 1 and {}",
                CALLER_DEADLINE_SECS - 1
            )));
        }
        if self.dialog.max_rounds == 0 {
            return Err(ConfigError::Validation(
                "dialog.max_rounds must be at least 1".into(),
            ));
        }
        if self.handoff.poll_interval_ms == 0
            || self.handoff.poll_interval() >= self.handoff.deadline()
        {
            return Err(ConfigError::Validation(
                "handoff.poll_interval_ms must be non-zero and shorter than handoff.deadline_secs"
                    .into(),
            ));
        }
        Ok(())
    }
}
