//! Experience bar layout and segment states
//!
//! Pure geometry and outcome-to-segment mapping; `renderer` applies the
//! results to the host.

use super::constants::{
    SEGMENT_COLOR_DRAW, SEGMENT_COLOR_LOSS, SEGMENT_COLOR_WIN, XP_BAR_POS_X, XP_BAR_POS_Y,
    XP_BAR_SEGMENTS, XP_BAR_SEGMENT_BORDER_SIZE, XP_BAR_SEGMENT_HEIGHT,
    XP_BAR_SEGMENT_NAME_PREFIX, XP_BAR_SEGMENT_WIDTH, XP_BAR_WIDTH,
};
use super::types::{MatchOutcome, Position};

// =============================================================================
// PALETTE
// =============================================================================

/// Segment fill colors (host ABGR)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentPalette {
    pub win: u32,
    pub loss: u32,
    pub draw: u32,
}

impl SegmentPalette {
    /// Color for an outcome, `None` for `Unknown`
    pub fn color_for(&self, outcome: MatchOutcome) -> Option<u32> {
        match outcome {
            MatchOutcome::Win => Some(self.win),
            MatchOutcome::Loss => Some(self.loss),
            MatchOutcome::Draw => Some(self.draw),
            MatchOutcome::Unknown => None,
        }
    }
}

impl Default for SegmentPalette {
    fn default() -> Self {
        Self {
            win: SEGMENT_COLOR_WIN,
            loss: SEGMENT_COLOR_LOSS,
            draw: SEGMENT_COLOR_DRAW,
        }
    }
}

// =============================================================================
// GEOMETRY
// =============================================================================

/// Position and size of the bar and its segments
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarLayout {
    pub bar_position: Position,
    pub bar_width: u32,
    pub segment_count: usize,
    pub segment_width: u32,
    pub segment_height: u32,
    pub border: u32,
}

impl BarLayout {
    pub fn with_segment_count(segment_count: usize) -> Self {
        Self {
            segment_count,
            ..Self::default()
        }
    }

    /// Horizontal distance between segment origins
    ///
    /// FIXME: integer division, so the trailing segments drift from the bar
    /// end whenever the bar width is not a multiple of the segment count.
    pub fn segment_spacing(&self) -> u32 {
        if self.segment_count == 0 {
            return 0;
        }
        self.bar_width / self.segment_count as u32
    }

    pub fn segment_position(&self, index: usize) -> Position {
        let offset = self.border + index as u32 * self.segment_spacing();
        Position::new(
            self.bar_position.x + offset as f32,
            self.bar_position.y + self.border as f32,
        )
    }

    pub fn segment_name(index: usize) -> String {
        format!("{}-{}", XP_BAR_SEGMENT_NAME_PREFIX, index)
    }

    pub fn segment_names(&self) -> impl Iterator<Item = String> {
        (0..self.segment_count).map(Self::segment_name)
    }
}

impl Default for BarLayout {
    fn default() -> Self {
        Self {
            bar_position: Position::new(XP_BAR_POS_X, XP_BAR_POS_Y),
            bar_width: XP_BAR_WIDTH,
            segment_count: XP_BAR_SEGMENTS,
            segment_width: XP_BAR_SEGMENT_WIDTH,
            segment_height: XP_BAR_SEGMENT_HEIGHT,
            border: XP_BAR_SEGMENT_BORDER_SIZE,
        }
    }
}

// =============================================================================
// SEGMENT STATES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentState {
    Colored(u32),
    Hidden,
}

/// Map most-recent-first outcomes onto `count` segments, oldest on the left
///
/// Known outcomes are reversed into chronological order and fill the bar
/// from index 0; the remaining segments are hidden. With a full history the
/// most recent match lands on the last segment.
pub fn segment_states(
    outcomes: &[MatchOutcome],
    palette: &SegmentPalette,
    count: usize,
) -> Vec<SegmentState> {
    let mut states: Vec<SegmentState> = outcomes
        .iter()
        .take(count)
        .filter_map(|outcome| palette.color_for(*outcome))
        .rev()
        .map(SegmentState::Colored)
        .collect();
    states.resize(count, SegmentState::Hidden);
    states
}
