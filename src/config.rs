//! Configuration types for kickoff

use crate::contest::{RelevanceFilter, ASSUMED_MATCH_DURATION_MINS};
use crate::highlight::DiffPolicy;
use crate::notify::SlackConfig;
use crate::scheduler::SchedulerConfig;
use crate::source::{SfgConfig, SFG_TODAY_URL};
use crate::telemetry::LogFormat;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the Slack bot token
pub const SLACK_TOKEN_ENV: &str = "KICKOFF_SLACK_TOKEN";

const BUNDLED_CONFIG: &str = include_str!("../config.toml.example");

/// Configuration errors, fatal at start-up
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub scheduler: SchedulerSection,
    #[serde(default)]
    pub highlights: DiffPolicy,
    #[serde(default)]
    pub notifier: NotifierConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Match feed configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_url")]
    pub url: String,

    /// Request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Width of the pre-game and post-game windows (seconds)
    #[serde(default = "default_relevance_threshold_secs")]
    pub relevance_threshold_secs: i64,

    /// Assumed kick-off to final whistle duration (minutes)
    #[serde(default = "default_assumed_duration_mins")]
    pub assumed_duration_mins: i64,
}

fn default_url() -> String {
    SFG_TODAY_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_relevance_threshold_secs() -> i64 {
    20
}
fn default_assumed_duration_mins() -> i64 {
    ASSUMED_MATCH_DURATION_MINS
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
            relevance_threshold_secs: default_relevance_threshold_secs(),
            assumed_duration_mins: default_assumed_duration_mins(),
        }
    }
}

impl SourceConfig {
    pub fn sfg(&self) -> SfgConfig {
        SfgConfig {
            url: self.url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    pub fn relevance_filter(&self) -> RelevanceFilter {
        RelevanceFilter::new(chrono::Duration::seconds(self.relevance_threshold_secs))
            .with_assumed_duration(chrono::Duration::minutes(self.assumed_duration_mins))
    }
}

/// Poll loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerSection {
    /// Wait between polls (seconds)
    #[serde(default = "default_polling_interval_secs")]
    pub polling_interval_secs: u64,

    /// Growth ratio of the wait after each failed fetch
    #[serde(default = "default_backoff_ratio")]
    pub backoff_ratio: f64,

    /// Upper bound of the wait (seconds)
    #[serde(default = "default_max_interval_secs")]
    pub max_interval_secs: u64,

    /// Post a start-up notice
    #[serde(default = "default_true")]
    pub greeting: bool,
}

fn default_polling_interval_secs() -> u64 {
    10
}
fn default_backoff_ratio() -> f64 {
    1.0
}
fn default_max_interval_secs() -> u64 {
    600
}
fn default_true() -> bool {
    true
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            polling_interval_secs: default_polling_interval_secs(),
            backoff_ratio: default_backoff_ratio(),
            max_interval_secs: default_max_interval_secs(),
            greeting: true,
        }
    }
}

impl From<&SchedulerSection> for SchedulerConfig {
    fn from(section: &SchedulerSection) -> Self {
        Self {
            polling_interval: Duration::from_secs(section.polling_interval_secs),
            backoff_ratio: section.backoff_ratio,
            max_interval: Some(Duration::from_secs(section.max_interval_secs)),
            greeting: section.greeting,
        }
    }
}

/// Notification sink kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    #[default]
    Stdout,
    Slack,
}

/// Notification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NotifierConfig {
    #[serde(default)]
    pub kind: NotifierKind,
    #[serde(default)]
    pub slack_token: Option<String>,
    #[serde(default)]
    pub slack_channel: String,
    #[serde(default = "default_slack_username")]
    pub slack_username: String,
    #[serde(default)]
    pub slack_icon_url: Option<String>,
}

fn default_slack_username() -> String {
    "FIFA World Cup 2018".to_string()
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            kind: NotifierKind::Stdout,
            slack_token: None,
            slack_channel: String::new(),
            slack_username: default_slack_username(),
            slack_icon_url: None,
        }
    }
}

impl NotifierConfig {
    /// Slack settings, if the token and channel are present
    pub fn slack(&self) -> Option<SlackConfig> {
        let token = self.slack_token.as_ref()?;
        if self.slack_channel.is_empty() {
            return None;
        }
        Some(
            SlackConfig::new(token.clone(), self.slack_channel.clone())
                .username(self.slack_username.clone())
                .icon_url(self.slack_icon_url.clone()),
        )
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Prometheus exporter port, disabled when absent
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, then apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.apply_env();
        Ok(config)
    }

    /// Load `path`, or the bundled example configuration when the file does
    /// not exist. Any other read, parse or validation error is returned.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = match Self::load(path) {
            Ok(config) => config,
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                let mut config = Self::bundled()?;
                config.apply_env();
                config
            }
            Err(e) => return Err(e),
        };
        config.validate()?;
        Ok(config)
    }

    /// Configuration shipped in `config.toml.example`
    pub fn bundled() -> Result<Self, ConfigError> {
        Ok(toml::from_str(BUNDLED_CONFIG)?)
    }

    /// Pick up secrets from the environment
    pub fn apply_env(&mut self) {
        if let Ok(token) = std::env::var(SLACK_TOKEN_ENV) {
            if !token.is_empty() {
                self.notifier.slack_token = Some(token);
            }
        }
    }

    /// Reject settings the scheduler cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.scheduler;
        if s.polling_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "scheduler.polling_interval_secs must be positive".to_string(),
            ));
        }
        if !s.backoff_ratio.is_finite() || s.backoff_ratio < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "scheduler.backoff_ratio must be a non-negative number, got {}",
                s.backoff_ratio
            )));
        }
        if s.max_interval_secs < s.polling_interval_secs {
            return Err(ConfigError::Invalid(
                "scheduler.max_interval_secs must not be below polling_interval_secs".to_string(),
            ));
        }
        if self.source.relevance_threshold_secs < 0 {
            return Err(ConfigError::Invalid(
                "source.relevance_threshold_secs must not be negative".to_string(),
            ));
        }
        if self.notifier.kind == NotifierKind::Slack && self.notifier.slack().is_none() {
            return Err(ConfigError::Invalid(format!(
                "notifier.kind = \"slack\" needs slack_channel and a token (slack_token or {})",
                SLACK_TOKEN_ENV
            )));
        }
        Ok(())
    }
}
