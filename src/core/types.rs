//! Core types - platform-independent data structures
//!
//! These types describe players, match outcomes and the monitored source
//! size, and are used throughout the overlay.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::constants::{FULLSCREEN_HEIGHT, FULLSCREEN_WIDTH};

// =============================================================================
// PLAYER NAME
// =============================================================================

/// An MCSR Ranked nickname
///
/// Equality is case-insensitive; the spelling as entered is kept for URLs and
/// logs.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Case-insensitive comparison against a nickname reported by the API
    pub fn matches(&self, nickname: &str) -> bool {
        self.0.to_lowercase() == nickname.to_lowercase()
    }
}

impl PartialEq for PlayerName {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.0)
    }
}

impl Eq for PlayerName {}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// MATCH OUTCOME
// =============================================================================

/// Result of one past match from the configured player's point of view
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatchOutcome {
    Win,
    Loss,
    Draw,
    /// No match for this slot (fewer matches than requested)
    Unknown,
}

impl MatchOutcome {
    pub fn is_known(self) -> bool {
        self != MatchOutcome::Unknown
    }

    /// Single-letter form used in logs
    pub fn letter(self) -> char {
        match self {
            MatchOutcome::Win => 'W',
            MatchOutcome::Loss => 'L',
            MatchOutcome::Draw => 'D',
            MatchOutcome::Unknown => '-',
        }
    }
}

/// Compact "WWLD--" rendering of an outcome sequence
pub fn outcome_summary(outcomes: &[MatchOutcome]) -> String {
    outcomes.iter().map(|o| o.letter()).collect()
}

// =============================================================================
// SOURCE SIZE
// =============================================================================

/// Current pixel size of the monitored video source
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceSize {
    pub width: u32,
    pub height: u32,
}

impl SourceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether the source is at the reference fullscreen resolution
    ///
    /// Only 1920x1080 counts; every other size is treated as not ready.
    pub fn is_fullscreen(&self) -> bool {
        self.width == FULLSCREEN_WIDTH && self.height == FULLSCREEN_HEIGHT
    }
}

// =============================================================================
// POSITION
// =============================================================================

/// Element position in canvas pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_name_case_insensitive() {
        let name = PlayerName::new("Feinberg");
        assert!(name.matches("feinberg"));
        assert!(name.matches("FEINBERG"));
        assert!(!name.matches("feinberg2"));
        assert_eq!(PlayerName::new("foo"), PlayerName::new("FOO"));
    }

    #[test]
    fn test_player_name_keeps_spelling_and_trims() {
        let name = PlayerName::new("  CoolGuy_99 ");
        assert_eq!(name.as_str(), "CoolGuy_99");
        assert_eq!(name.to_string(), "CoolGuy_99");
        assert!(PlayerName::new("   ").is_empty());
    }

    #[test]
    fn test_player_name_deserializes_from_string() {
        let name: PlayerName = serde_json::from_str(r#""Steve""#).unwrap();
        assert_eq!(name.as_str(), "Steve");
    }

    #[test]
    fn test_outcome_summary() {
        let outcomes = [
            MatchOutcome::Win,
            MatchOutcome::Loss,
            MatchOutcome::Draw,
            MatchOutcome::Unknown,
        ];
        assert_eq!(outcome_summary(&outcomes), "WLD-");
        assert!(MatchOutcome::Draw.is_known());
        assert!(!MatchOutcome::Unknown.is_known());
    }

    #[test]
    fn test_source_size_fullscreen_only_1080p() {
        assert!(SourceSize::new(1920, 1080).is_fullscreen());
        assert!(!SourceSize::new(2560, 1440).is_fullscreen());
        assert!(!SourceSize::new(1080, 1920).is_fullscreen());
        assert!(!SourceSize::new(0, 0).is_fullscreen());
    }
}
