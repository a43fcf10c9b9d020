//! Overlay session - the context every host callback runs against
//!
//! OverlaySession owns the settings, the visibility state, the renderer, the
//! two scheduled tasks and the monitored source handle. Host callbacks map
//! 1:1 onto its methods:
//! 1. settings changed → `apply_settings`
//! 2. slow timer → `on_slow_tick` (live check, results polling)
//! 3. fast timer → `on_fast_tick` (fullscreen detection)
//! 4. "generate" button → `generate_layout`
//! 5. unload → `unload`
//!
//! Decisions come from the pure `visibility::reduce`; this module only runs
//! the effects it returns. The session is platform-independent and can be
//! tested with mocks.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::constants::{FAST_TICK_INTERVAL, SLOW_TICK_INTERVAL};
use super::io_traits::JsonFetcher;
use super::layout::{BarLayout, SegmentPalette};
use super::live::is_player_live;
use super::protocol::ApiEndpoints;
use super::renderer::OverlayRenderer;
use super::resolver::recent_results;
use super::timers::ScheduledTask;
use super::traits::{HostError, OverlayHost, TimerHost, TimerKind};
use super::types::PlayerName;
use super::visibility::{reduce, Effect, VisibilityContext, VisibilityEvent, VisibilityState};

// =============================================================================
// SETTINGS
// =============================================================================

/// User-facing settings, keyed as the host stores them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlaySettings {
    /// Player to follow
    #[serde(rename = "mc_name", default)]
    pub player: PlayerName,
    /// Host source whose size tells whether the game is fullscreen
    #[serde(rename = "mc_source", default)]
    pub source_name: String,
    #[serde(default)]
    pub enabled: bool,
}

impl OverlaySettings {
    /// Parse the host's JSON settings object
    pub fn from_host_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Enabled and with a player to follow
    pub fn is_active(&self) -> bool {
        self.enabled && !self.player.is_empty()
    }
}

/// Fixed parameters of a session
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub endpoints: ApiEndpoints,
    pub layout: BarLayout,
    pub palette: SegmentPalette,
    pub asset_dir: PathBuf,
    pub slow_interval: Duration,
    pub fast_interval: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            endpoints: ApiEndpoints::default(),
            layout: BarLayout::default(),
            palette: SegmentPalette::default(),
            asset_dir: PathBuf::from("assets"),
            slow_interval: SLOW_TICK_INTERVAL,
            fast_interval: FAST_TICK_INTERVAL,
        }
    }
}

// =============================================================================
// COLLABORATORS
// =============================================================================

/// The outside world a session callback may touch
pub struct SessionIo<'a, F: ?Sized, H, T: ?Sized> {
    pub fetcher: &'a F,
    pub host: &'a H,
    pub timers: &'a T,
}

impl<'a, F: ?Sized, H, T: ?Sized> SessionIo<'a, F, H, T> {
    pub fn new(fetcher: &'a F, host: &'a H, timers: &'a T) -> Self {
        Self {
            fetcher,
            host,
            timers,
        }
    }
}

// =============================================================================
// OVERLAY SESSION
// =============================================================================

/// `S` is the host's source handle type
pub struct OverlaySession<S> {
    settings: OverlaySettings,
    visibility: VisibilityContext,
    renderer: OverlayRenderer,
    endpoints: ApiEndpoints,
    slow_task: ScheduledTask,
    fast_task: ScheduledTask,
    /// Monitored source, acquired lazily on the first fast tick
    source: Option<S>,
}

impl<S> OverlaySession<S> {
    /// Create a disabled session; call `apply_settings` to start it
    pub fn new(options: SessionOptions) -> Self {
        Self {
            settings: OverlaySettings::default(),
            visibility: VisibilityContext::default(),
            renderer: OverlayRenderer::new(options.layout, options.palette, &options.asset_dir),
            endpoints: options.endpoints,
            slow_task: ScheduledTask::new(TimerKind::Slow, options.slow_interval),
            fast_task: ScheduledTask::new(TimerKind::Fast, options.fast_interval),
            source: None,
        }
    }

    pub fn settings(&self) -> &OverlaySettings {
        &self.settings
    }

    pub fn visibility(&self) -> VisibilityContext {
        self.visibility
    }

    pub fn renderer(&self) -> &OverlayRenderer {
        &self.renderer
    }

    pub fn timers_running(&self) -> bool {
        self.slow_task.is_running() && self.fast_task.is_running()
    }

    pub fn holds_source(&self) -> bool {
        self.source.is_some()
    }

    /// Settings changed: hide, reset, then reapply enabled state and timers
    pub fn apply_settings<F, H, T>(
        &mut self,
        settings: OverlaySettings,
        io: &SessionIo<'_, F, H, T>,
    ) -> Vec<Effect>
    where
        F: JsonFetcher + ?Sized,
        H: OverlayHost<Source = S>,
        T: TimerHost + ?Sized,
    {
        if settings.enabled && settings.player.is_empty() {
            warn!("[session] Enabled without a player name, staying disabled");
        }
        info!(
            player = %settings.player,
            source = %settings.source_name,
            enabled = settings.is_active(),
            "[session] Settings updated"
        );

        let enabled = settings.is_active();
        self.settings = settings;
        self.dispatch(VisibilityEvent::Configured { enabled }, io)
    }

    /// Slow tick: refresh live status, poll results while live
    pub fn on_slow_tick<F, H, T>(&mut self, io: &SessionIo<'_, F, H, T>) -> Vec<Effect>
    where
        F: JsonFetcher + ?Sized,
        H: OverlayHost<Source = S>,
        T: TimerHost + ?Sized,
    {
        if self.visibility.state == VisibilityState::Disabled {
            return Vec::new();
        }
        let live = is_player_live(io.fetcher, &self.endpoints, &self.settings.player);
        self.dispatch(VisibilityEvent::LiveChecked(live), io)
    }

    /// Fast tick: sample the monitored source size while live
    pub fn on_fast_tick<F, H, T>(&mut self, io: &SessionIo<'_, F, H, T>) -> Vec<Effect>
    where
        F: JsonFetcher + ?Sized,
        H: OverlayHost<Source = S>,
        T: TimerHost + ?Sized,
    {
        if !self.visibility.samples_source() {
            return Vec::new();
        }
        let size = match self.monitored_source(io.host) {
            Ok(source) => io.host.source_size(source),
            Err(e) => {
                debug!(error = %e, "[session] Skipping source sample");
                return Vec::new();
            }
        };
        self.dispatch(VisibilityEvent::SourceSampled(size), io)
    }

    /// Manual action: build the scene, then fill it if a player is set
    pub fn generate_layout<F, H, T>(&mut self, io: &SessionIo<'_, F, H, T>)
    where
        F: JsonFetcher + ?Sized,
        H: OverlayHost<Source = S>,
        T: TimerHost + ?Sized,
    {
        if let Err(e) = self.renderer.setup(io.host) {
            warn!(error = %e, "[session] Failed generating overlay layout");
            return;
        }
        if self.settings.player.is_empty() {
            debug!("[session] No player configured, segments left empty");
            return;
        }
        self.poll_results(io);
    }

    /// Host unload: stop timers and drop the source handle
    pub fn unload<F, H, T>(&mut self, io: &SessionIo<'_, F, H, T>) -> Vec<Effect>
    where
        F: JsonFetcher + ?Sized,
        H: OverlayHost<Source = S>,
        T: TimerHost + ?Sized,
    {
        info!("[session] Unloading");
        self.dispatch(VisibilityEvent::Unloaded, io)
    }

    fn dispatch<F, H, T>(&mut self, event: VisibilityEvent, io: &SessionIo<'_, F, H, T>) -> Vec<Effect>
    where
        F: JsonFetcher + ?Sized,
        H: OverlayHost<Source = S>,
        T: TimerHost + ?Sized,
    {
        let (next, effects) = reduce(self.visibility, event);
        if next.state != self.visibility.state {
            info!(from = ?self.visibility.state, to = ?next.state, "[session] Visibility changed");
        }
        self.visibility = next;

        for effect in &effects {
            self.run_effect(*effect, io);
        }
        effects
    }

    fn run_effect<F, H, T>(&mut self, effect: Effect, io: &SessionIo<'_, F, H, T>)
    where
        F: JsonFetcher + ?Sized,
        H: OverlayHost<Source = S>,
        T: TimerHost + ?Sized,
    {
        match effect {
            Effect::HideOverlay => {
                if let Err(e) = self.renderer.hide(io.host) {
                    warn!(error = %e, "[session] Cannot hide overlay");
                }
            }
            Effect::ShowOverlay => {
                if let Err(e) = self.renderer.show(io.host) {
                    warn!(error = %e, "[session] Cannot show overlay");
                }
            }
            Effect::PollResults => self.poll_results(io),
            Effect::StartTimers => {
                self.slow_task.start(io.timers);
                self.fast_task.start(io.timers);
            }
            Effect::StopTimers => {
                self.slow_task.stop(io.timers);
                self.fast_task.stop(io.timers);
            }
            Effect::ReleaseSource => {
                if let Some(source) = self.source.take() {
                    debug!("[session] Releasing monitored source");
                    io.host.release_source(source);
                }
            }
        }
    }

    /// Fetch results and render them; on no data the segments are left as is
    fn poll_results<F, H, T>(&mut self, io: &SessionIo<'_, F, H, T>)
    where
        F: JsonFetcher + ?Sized,
        H: OverlayHost<Source = S>,
        T: TimerHost + ?Sized,
    {
        let count = self.renderer.layout().segment_count;
        let Some(outcomes) =
            recent_results(io.fetcher, &self.endpoints, &self.settings.player, count).ready()
        else {
            debug!("[session] No match results, keeping previous segments");
            return;
        };
        if let Err(e) = self.renderer.render(io.host, &outcomes) {
            warn!(error = %e, "[session] Skipping segment render");
        }
    }

    fn monitored_source<H>(&mut self, host: &H) -> Result<&S, HostError>
    where
        H: OverlayHost<Source = S>,
    {
        if self.source.is_none() && !self.settings.source_name.is_empty() {
            self.source = host.acquire_source(&self.settings.source_name);
        }
        self.source
            .as_ref()
            .ok_or_else(|| HostError::MissingSource(self.settings.source_name.clone()))
    }
}
