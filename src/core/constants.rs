//! Overlay constants - API endpoints, element names, geometry, timings
//!
//! Reference values for a 1920x1080 canvas. Geometry and palette can be
//! overridden from the config file; names and the fullscreen reference cannot.

use std::time::Duration;

// =============================================================================
// MCSR RANKED API
// =============================================================================

/// Base URL of the MCSR Ranked public API
pub const API_BASE_URL: &str = "https://api.mcsrranked.com";

/// Match type filter for ranked matches
pub const RANKED_MATCH_TYPE: u32 = 2;

/// The API rejects requests with an empty or library-default user agent
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Per-request timeout for API calls
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// =============================================================================
// HOST ELEMENT NAMES
// =============================================================================

/// Scene holding every overlay element
pub const SCENE_NAME: &str = "xbro";

/// Image element drawing the empty experience bar
pub const XP_BAR_ELEMENT_NAME: &str = "xp-bar";

/// Segment elements are named `{prefix}-{index}`
pub const XP_BAR_SEGMENT_NAME_PREFIX: &str = "xp-bar-segment";

/// File name of the bar image inside the asset directory
pub const XP_BAR_ASSET_FILE: &str = "xp-bar.png";

// =============================================================================
// GEOMETRY (pixels)
// =============================================================================

pub const XP_BAR_POS_X: f32 = 596.0;
pub const XP_BAR_POS_Y: f32 = 964.0;
pub const XP_BAR_WIDTH: u32 = 728;
pub const XP_BAR_HEIGHT: u32 = 20;

/// Number of match segments drawn on the bar
pub const XP_BAR_SEGMENTS: usize = 18;

pub const XP_BAR_SEGMENT_WIDTH: u32 = 36;
pub const XP_BAR_SEGMENT_HEIGHT: u32 = 12;

/// Inset of the first segment from the bar's top-left corner
pub const XP_BAR_SEGMENT_BORDER_SIZE: u32 = 4;

// =============================================================================
// SEGMENT COLORS (host ABGR)
// =============================================================================

pub const SEGMENT_COLOR_WIN: u32 = 0xFF00FF00;
pub const SEGMENT_COLOR_LOSS: u32 = 0xFF0000FF;
pub const SEGMENT_COLOR_DRAW: u32 = 0xFFFF0000;

// =============================================================================
// TIMERS
// =============================================================================

/// Live status and match history polling
pub const SLOW_TICK_INTERVAL: Duration = Duration::from_millis(5_000);

/// Monitored source resolution check (roughly once per frame at 24 fps)
pub const FAST_TICK_INTERVAL: Duration = Duration::from_millis(1_000 / 24);

// =============================================================================
// FULLSCREEN DETECTION
// =============================================================================

/// Only this exact source size counts as fullscreen
pub const FULLSCREEN_WIDTH: u32 = 1920;
pub const FULLSCREEN_HEIGHT: u32 = 1080;
