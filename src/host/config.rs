// Configuration module for the xbro overlay

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::color::{parse_hex_color, to_hex_color};
use crate::core::constants::{
    API_BASE_URL, BROWSER_USER_AGENT, FAST_TICK_INTERVAL, REQUEST_TIMEOUT, SLOW_TICK_INTERVAL,
    XP_BAR_SEGMENTS,
};
use crate::core::layout::{BarLayout, SegmentPalette};
use crate::core::protocol::ApiEndpoints;
use crate::core::session::{OverlaySettings, SessionOptions};

// =============================================================================
// CONFIGURATION STRUCTURES
// =============================================================================

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingSettings {
    /// Mirror logs to stdout
    #[serde(default)]
    pub console: bool,
    /// Log file path (relative to the config file or absolute). Empty = no file logging.
    #[serde(default)]
    pub log_file: String,
}

/// Ranked API access
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    API_BASE_URL.to_string()
}
fn default_user_agent() -> String {
    BROWSER_USER_AGENT.to_string()
}
fn default_timeout_secs() -> u64 {
    REQUEST_TIMEOUT.as_secs()
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Segment colors as "#RRGGBB"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteSettings {
    #[serde(default = "default_win_color")]
    pub win: String,
    #[serde(default = "default_loss_color")]
    pub loss: String,
    #[serde(default = "default_draw_color")]
    pub draw: String,
}

fn default_win_color() -> String {
    "#00FF00".to_string()
}
fn default_loss_color() -> String {
    "#FF0000".to_string()
}
fn default_draw_color() -> String {
    "#0000FF".to_string()
}

impl Default for PaletteSettings {
    fn default() -> Self {
        Self {
            win: default_win_color(),
            loss: default_loss_color(),
            draw: default_draw_color(),
        }
    }
}

impl PaletteSettings {
    /// Convert to host ABGR colors
    pub fn to_palette(&self) -> SegmentPalette {
        SegmentPalette {
            win: parse_hex_color(&self.win),
            loss: parse_hex_color(&self.loss),
            draw: parse_hex_color(&self.draw),
        }
    }
}

/// Bar layout settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutSettings {
    /// Number of match segments on the bar
    #[serde(default = "default_segment_count")]
    pub segment_count: usize,
    /// Directory containing xp-bar.png (relative to the config file or absolute)
    #[serde(default = "default_asset_dir")]
    pub asset_dir: String,
}

fn default_segment_count() -> usize {
    XP_BAR_SEGMENTS
}
fn default_asset_dir() -> String {
    "assets".to_string()
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            segment_count: default_segment_count(),
            asset_dir: default_asset_dir(),
        }
    }
}

/// Tick intervals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSettings {
    #[serde(default = "default_slow_interval_ms")]
    pub slow_interval_ms: u64,
    #[serde(default = "default_fast_interval_ms")]
    pub fast_interval_ms: u64,
}

fn default_slow_interval_ms() -> u64 {
    SLOW_TICK_INTERVAL.as_millis() as u64
}
fn default_fast_interval_ms() -> u64 {
    FAST_TICK_INTERVAL.as_millis() as u64
}

/// Shortest accepted tick interval; a zero interval would spin the timer thread
pub const MIN_TICK_INTERVAL_MS: u64 = 10;

fn clamp_interval(key: &str, ms: u64) -> Duration {
    if ms < MIN_TICK_INTERVAL_MS {
        warn!(
            key,
            configured = ms,
            used = MIN_TICK_INTERVAL_MS,
            "[config] Tick interval too short, clamping"
        );
        return Duration::from_millis(MIN_TICK_INTERVAL_MS);
    }
    Duration::from_millis(ms)
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            slow_interval_ms: default_slow_interval_ms(),
            fast_interval_ms: default_fast_interval_ms(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub overlay: OverlaySettings,
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub palette: PaletteSettings,
    #[serde(default)]
    pub layout: LayoutSettings,
    #[serde(default)]
    pub timers: TimerSettings,
    /// Directory relative paths are resolved against; set by `load`
    #[serde(skip)]
    pub base_dir: PathBuf,
}

// =============================================================================
// CONFIG LOADING
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

impl Config {
    pub const CONFIG_FILENAME: &'static str = "xbro_overlay.toml";

    /// Load configuration from `path`; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "[config] Looking for config");

        let mut config: Config = if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            info!(path = %path.display(), "[config] Loaded config");
            config
        } else {
            debug!("[config] No config found, using defaults");
            Config::default()
        };

        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.log_palette();
        Ok(config)
    }

    /// Resolve a configured path against the config file's directory
    pub fn resolve_path(&self, configured: &str) -> PathBuf {
        let path = Path::new(configured);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Log file path, `None` when file logging is off
    pub fn log_file_path(&self) -> Option<PathBuf> {
        if self.logging.log_file.is_empty() {
            None
        } else {
            Some(self.resolve_path(&self.logging.log_file))
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            endpoints: ApiEndpoints::new(&self.api.base_url),
            layout: BarLayout::with_segment_count(self.layout.segment_count),
            palette: self.palette.to_palette(),
            asset_dir: self.resolve_path(&self.layout.asset_dir),
            slow_interval: clamp_interval("slow_interval_ms", self.timers.slow_interval_ms),
            fast_interval: clamp_interval("fast_interval_ms", self.timers.fast_interval_ms),
        }
    }

    fn log_palette(&self) {
        let palette = self.palette.to_palette();
        debug!(
            win = %to_hex_color(palette.win),
            loss = %to_hex_color(palette.loss),
            draw = %to_hex_color(palette.draw),
            "[config] Segment palette"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::PlayerName;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(&dir.path().join(Config::CONFIG_FILENAME)).unwrap();
        assert!(!config.overlay.enabled);
        assert_eq!(config.api.base_url, API_BASE_URL);
        assert_eq!(config.layout.segment_count, 18);
        assert_eq!(config.timers.slow_interval_ms, 5000);
        assert_eq!(config.timers.fast_interval_ms, 41);
        assert_eq!(config.base_dir, dir.path());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r##"
[overlay]
mc_name = "Feinberg"
mc_source = "Game Capture"
enabled = true

[palette]
win = "#FFFFFF"
"##
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.overlay.player, PlayerName::new("feinberg"));
        assert_eq!(config.overlay.source_name, "Game Capture");
        assert!(config.overlay.is_active());
        assert_eq!(config.palette.draw, "#0000FF");

        let palette = config.palette.to_palette();
        assert_eq!(palette.win, 0xFFFFFFFF);
        assert_eq!(palette, SegmentPalette { win: 0xFFFFFFFF, ..SegmentPalette::default() });
    }

    #[test]
    fn test_default_palette_matches_host_colors() {
        assert_eq!(PaletteSettings::default().to_palette(), SegmentPalette::default());
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[overlay\nenabled = ").unwrap();
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_relative_paths_resolve_against_config_dir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(Config::CONFIG_FILENAME);
        fs::write(&path, "[logging]\nlog_file = \"logs/overlay.log\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(
            config.log_file_path(),
            Some(dir.path().join("logs/overlay.log"))
        );
        let options = config.session_options();
        assert_eq!(options.asset_dir, dir.path().join("assets"));
        assert_eq!(options.slow_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_zero_tick_interval_is_clamped() {
        let mut config = Config::default();
        config.timers.fast_interval_ms = 0;
        config.timers.slow_interval_ms = 3;
        let options = config.session_options();
        assert_eq!(options.fast_interval, Duration::from_millis(MIN_TICK_INTERVAL_MS));
        assert_eq!(options.slow_interval, Duration::from_millis(MIN_TICK_INTERVAL_MS));

        config.timers.fast_interval_ms = 41;
        assert_eq!(config.session_options().fast_interval, Duration::from_millis(41));
    }

    #[test]
    fn test_empty_log_file_disables_file_logging() {
        let config = Config::default();
        assert_eq!(config.log_file_path(), None);
    }

    #[test]
    fn test_sample_config_parses() {
        let contents = include_str!("../../xbro_overlay.toml");
        let config: Config = toml::from_str(contents).unwrap();
        assert_eq!(config.layout.segment_count, 18);
        assert_eq!(config.palette.to_palette(), SegmentPalette::default());
        assert_eq!(config.api.timeout(), REQUEST_TIMEOUT);
    }
}
