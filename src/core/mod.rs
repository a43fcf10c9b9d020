//! Core module - platform-independent overlay logic
//!
//! Everything here talks to the outside world through `JsonFetcher`,
//! `OverlayHost` and `TimerHost`, so it can be tested without a network or a
//! streaming host.

pub mod color;
pub mod constants;
pub mod io_traits;
pub mod layout;
pub mod live;
pub mod protocol;
pub mod renderer;
pub mod resolver;
pub mod session;
pub mod timers;
pub mod traits;
pub mod types;
pub mod visibility;

pub use color::{parse_hex_color, to_hex_color};
pub use io_traits::{FetchError, Fetched, JsonFetcher};
pub use layout::{BarLayout, SegmentPalette, SegmentState};
pub use protocol::ApiEndpoints;
pub use session::{OverlaySession, OverlaySettings, SessionIo, SessionOptions};
pub use traits::{ElementKind, HostError, OverlayHost, TimerHost, TimerKind};
pub use types::{MatchOutcome, PlayerName, Position, SourceSize};
pub use visibility::{Effect, VisibilityContext, VisibilityEvent, VisibilityState};
