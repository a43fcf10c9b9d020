//! Visibility state machine
//!
//! Pure reducer deciding when the overlay is shown. It never touches the
//! host or the network: it returns the effects the session must run, in
//! order.
//!
//! The overlay is visible iff the player is live AND the monitored source
//! was last seen at fullscreen resolution.

use super::types::SourceSize;

// =============================================================================
// STATE
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum VisibilityState {
    /// Feature off or unconfigured, timers stopped
    #[default]
    Disabled,
    /// Enabled, overlay hidden
    Hidden,
    /// Enabled, overlay visible
    Showing,
}

/// Everything the reducer needs to remember between ticks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct VisibilityContext {
    pub state: VisibilityState,
    /// Player is in a live match (refreshed every slow tick)
    pub live: bool,
    /// Monitored source at reference resolution; `None` until first sampled
    pub fullscreen: Option<bool>,
}

impl VisibilityContext {
    /// Derived visibility, never stored on its own
    pub fn overlay_visible(&self) -> bool {
        self.live && self.fullscreen == Some(true)
    }

    /// Fast ticks only do work while enabled and live
    pub fn samples_source(&self) -> bool {
        self.state != VisibilityState::Disabled && self.live
    }

    fn apply_visibility(&mut self, effects: &mut Vec<Effect>) {
        if self.overlay_visible() {
            self.state = VisibilityState::Showing;
            effects.push(Effect::ShowOverlay);
        } else {
            self.state = VisibilityState::Hidden;
            effects.push(Effect::HideOverlay);
        }
    }
}

// =============================================================================
// EVENTS & EFFECTS
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisibilityEvent {
    /// Settings applied (first load or any later change)
    Configured { enabled: bool },
    /// Host is unloading the plugin
    Unloaded,
    /// Slow tick finished its live check
    LiveChecked(bool),
    /// Fast tick read the monitored source size
    SourceSampled(SourceSize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Hide every element of the managed scene
    HideOverlay,
    /// Reapply segment contents, then show every element of the managed scene
    ShowOverlay,
    /// Fetch recent results and render them into the segments
    PollResults,
    StartTimers,
    StopTimers,
    /// Drop the handle on the monitored source
    ReleaseSource,
}

// =============================================================================
// REDUCER
// =============================================================================

/// `(previous, event) -> (next, effects)`
pub fn reduce(ctx: VisibilityContext, event: VisibilityEvent) -> (VisibilityContext, Vec<Effect>) {
    let mut next = ctx;
    let mut effects = Vec::new();

    match event {
        VisibilityEvent::Configured { enabled } => {
            next = VisibilityContext {
                state: if enabled {
                    VisibilityState::Hidden
                } else {
                    VisibilityState::Disabled
                },
                live: false,
                fullscreen: None,
            };
            effects.extend([Effect::HideOverlay, Effect::StopTimers, Effect::ReleaseSource]);
            if enabled {
                effects.push(Effect::StartTimers);
            }
        }
        VisibilityEvent::Unloaded => {
            next = VisibilityContext::default();
            effects.extend([Effect::StopTimers, Effect::ReleaseSource]);
        }
        VisibilityEvent::LiveChecked(_) if ctx.state == VisibilityState::Disabled => {}
        VisibilityEvent::LiveChecked(false) => {
            next.live = false;
            next.state = VisibilityState::Hidden;
            effects.push(Effect::HideOverlay);
        }
        VisibilityEvent::LiveChecked(true) => {
            next.live = true;
            effects.push(Effect::PollResults);
            next.apply_visibility(&mut effects);
        }
        VisibilityEvent::SourceSampled(size) => {
            if !ctx.samples_source() {
                return (ctx, effects);
            }
            let fullscreen = size.is_fullscreen();
            if ctx.fullscreen != Some(fullscreen) {
                next.fullscreen = Some(fullscreen);
                next.apply_visibility(&mut effects);
            }
        }
    }

    (next, effects)
}
