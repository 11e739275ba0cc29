//! Configuration types for the viewer.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Drawing parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Width of the world area drawn, in world units
    pub width: f64,
    /// Height of the world area drawn, in world units
    pub height: f64,
    /// Radius of the body circle
    pub body_radius: f64,
    /// Radius of a food pellet
    pub food_radius: f64,
    /// Organ radius = organ size * organ_scale
    pub organ_scale: f64,
    /// Width of body-to-organ connector lines
    pub line_width: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 500.0,
            body_radius: 8.0,
            food_radius: 2.0,
            organ_scale: 1.0,
            line_width: 1.0,
        }
    }
}

/// Update cadence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Minimum time between two poll+render cycles (milliseconds)
    pub min_update_interval_ms: u64,
    /// Rate of display refresh callbacks (Hz)
    pub refresh_rate_hz: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_update_interval_ms: 100, // 10 updates per second
            refresh_rate_hz: 60,
        }
    }
}

/// Where frames end up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Braille canvas in the controlling terminal
    Terminal,
    /// Render off-screen and log frame summaries
    Headless,
}

impl FromStr for DisplayMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "terminal" => Ok(DisplayMode::Terminal),
            "headless" => Ok(DisplayMode::Headless),
            other => Err(Error::Config(format!("unknown display mode '{}'", other))),
        }
    }
}

/// Viewer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Simulation server URL
    pub server_url: String,
    /// Path of the state endpoint
    pub state_path: String,
    /// Path of the sprite table endpoint, used when the state document has no sprites
    pub sprites_path: String,
    /// Per-request timeout (milliseconds)
    pub request_timeout_ms: u64,
    /// Output surface
    pub display: DisplayMode,
    /// OpenTelemetry endpoint
    pub otel_endpoint: Option<String>,
    /// Log file; terminal mode logs here instead of stderr
    pub log_file: Option<String>,
    pub render: RenderConfig,
    pub scheduler: SchedulerConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".to_string(),
            state_path: "/getstate".to_string(),
            sprites_path: "/getsprites".to_string(),
            request_timeout_ms: 2000,
            display: DisplayMode::Terminal,
            otel_endpoint: None,
            log_file: None,
            render: RenderConfig::default(),
            scheduler: SchedulerConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Defaults overlaid with `EVOLVIT_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("EVOLVIT_SERVER_URL") {
            config.server_url = url.trim_end_matches('/').to_string();
        }
        if let Some(path) = lookup("EVOLVIT_STATE_PATH") {
            config.state_path = path;
        }
        if let Some(path) = lookup("EVOLVIT_SPRITES_PATH") {
            config.sprites_path = path;
        }
        if let Some(ms) = lookup("EVOLVIT_TIMEOUT_MS") {
            config.request_timeout_ms = parse_number("EVOLVIT_TIMEOUT_MS", &ms)?;
        }
        if let Some(ms) = lookup("EVOLVIT_MIN_INTERVAL_MS") {
            config.scheduler.min_update_interval_ms = parse_number("EVOLVIT_MIN_INTERVAL_MS", &ms)?;
        }
        if let Some(mode) = lookup("EVOLVIT_DISPLAY") {
            config.display = mode.parse()?;
        }
        config.otel_endpoint = lookup("EVOLVIT_OTEL_ENDPOINT");
        config.log_file = lookup("EVOLVIT_LOG_FILE");

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.server_url.starts_with("http://") && !self.server_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "server url '{}' must start with http:// or https://",
                self.server_url
            )));
        }
        if self.scheduler.refresh_rate_hz == 0 {
            return Err(Error::Config("refresh rate must be positive".to_string()));
        }
        if self.render.width <= 0.0 || self.render.height <= 0.0 {
            return Err(Error::Config("world size must be positive".to_string()));
        }
        Ok(())
    }

    pub fn state_url(&self) -> String {
        format!("{}{}", self.server_url, self.state_path)
    }

    pub fn sprites_url(&self) -> String {
        format!("{}{}", self.server_url, self.sprites_path)
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{} must be an integer, got '{}'", key, value)))
}
