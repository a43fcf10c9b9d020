//! Overlay renderer - applies the bar layout and segment states to the host

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::constants::{SCENE_NAME, XP_BAR_ASSET_FILE, XP_BAR_ELEMENT_NAME};
use super::layout::{segment_states, BarLayout, SegmentPalette, SegmentState};
use super::traits::{ElementKind, HostError, OverlayHost};
use super::types::MatchOutcome;

/// Owns the managed scene's elements and the last segment states applied
pub struct OverlayRenderer {
    scene: String,
    layout: BarLayout,
    palette: SegmentPalette,
    bar_asset: PathBuf,
    /// Last rendered states; `None` until results were rendered once
    last_states: Option<Vec<SegmentState>>,
}

impl OverlayRenderer {
    pub fn new(layout: BarLayout, palette: SegmentPalette, asset_dir: &Path) -> Self {
        Self {
            scene: SCENE_NAME.to_string(),
            layout,
            palette,
            bar_asset: asset_dir.join(XP_BAR_ASSET_FILE),
            last_states: None,
        }
    }

    pub fn scene(&self) -> &str {
        &self.scene
    }

    pub fn layout(&self) -> &BarLayout {
        &self.layout
    }

    pub fn last_states(&self) -> Option<&[SegmentState]> {
        self.last_states.as_deref()
    }

    /// Create or reuse the scene, bar and segments, and place them
    ///
    /// Safe to call repeatedly: every element is looked up by name first.
    pub fn setup<H: OverlayHost>(&self, host: &H) -> Result<(), HostError> {
        if !host.has_scene(&self.scene) {
            info!(scene = %self.scene, "[overlay] Creating scene");
            host.create_scene(&self.scene)?;
        }

        match image::image_dimensions(&self.bar_asset) {
            Ok((width, height)) => {
                debug!(path = %self.bar_asset.display(), width, height, "[overlay] Bar asset")
            }
            Err(e) => warn!(
                path = %self.bar_asset.display(),
                error = %e,
                "[overlay] Bar asset unreadable, bar will be blank"
            ),
        }

        let bar = ElementKind::Image {
            file: self.bar_asset.clone(),
        };
        host.ensure_element(&self.scene, XP_BAR_ELEMENT_NAME, &bar)?;
        host.set_position(&self.scene, XP_BAR_ELEMENT_NAME, self.layout.bar_position)?;

        let segment = ElementKind::Color {
            width: self.layout.segment_width,
            height: self.layout.segment_height,
        };
        for (index, name) in self.layout.segment_names().enumerate() {
            host.ensure_element(&self.scene, &name, &segment)?;
            host.set_position(&self.scene, &name, self.layout.segment_position(index))?;
            host.move_to_top(&self.scene, &name)?;
        }

        info!(
            scene = %self.scene,
            segments = self.layout.segment_count,
            "[overlay] Layout generated"
        );
        Ok(())
    }

    /// Color segments from most-recent-first outcomes and hide empty slots
    ///
    /// Visible segments keep their current visibility; the next bulk show
    /// reveals them.
    pub fn render<H: OverlayHost>(
        &mut self,
        host: &H,
        outcomes: &[MatchOutcome],
    ) -> Result<(), HostError> {
        self.last_states = Some(segment_states(
            outcomes,
            &self.palette,
            self.layout.segment_count,
        ));
        self.require_scene(host)?;
        self.paint(host);
        self.hide_empty(host);
        Ok(())
    }

    /// Refresh segment colors, then show every element except empty slots
    ///
    /// Each element gets a single visibility write, so an empty slot is never
    /// shown even briefly.
    pub fn show<H: OverlayHost>(&self, host: &H) -> Result<(), HostError> {
        self.require_scene(host)?;
        self.paint(host);
        let hidden = self.empty_segments();
        for name in host.scene_elements(&self.scene)? {
            host.set_visible(&self.scene, &name, !hidden.contains(&name))?;
        }
        Ok(())
    }

    /// Hide every element of the managed scene
    pub fn hide<H: OverlayHost>(&self, host: &H) -> Result<(), HostError> {
        host.set_scene_visible(&self.scene, false)
    }

    fn require_scene<H: OverlayHost>(&self, host: &H) -> Result<(), HostError> {
        if host.has_scene(&self.scene) {
            Ok(())
        } else {
            Err(HostError::MissingScene(self.scene.clone()))
        }
    }

    fn paint<H: OverlayHost>(&self, host: &H) {
        let Some(states) = &self.last_states else {
            return;
        };
        for (name, state) in self.layout.segment_names().zip(states) {
            if let SegmentState::Colored(color) = state {
                if let Err(e) = host.set_color(&name, *color) {
                    warn!(segment = %name, error = %e, "[overlay] Failed to color segment");
                }
            }
        }
    }

    /// Names of segments whose cached state is hidden
    fn empty_segments(&self) -> HashSet<String> {
        let Some(states) = &self.last_states else {
            return HashSet::new();
        };
        self.layout
            .segment_names()
            .zip(states)
            .filter(|(_, state)| **state == SegmentState::Hidden)
            .map(|(name, _)| name)
            .collect()
    }

    fn hide_empty<H: OverlayHost>(&self, host: &H) {
        for name in self.empty_segments() {
            if let Err(e) = host.set_visible(&self.scene, &name, false) {
                warn!(segment = %name, error = %e, "[overlay] Failed to hide segment");
            }
        }
    }
}
