//! Core traits - abstractions over the streaming host
//!
//! These traits define everything the overlay needs from the host
//! application: named scene elements, the monitored video source and
//! periodic timers. The real implementations belong to the host embedding;
//! `host::ticker` provides timers for hosts that have none. For testing,
//! mock implementations are provided.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use super::types::{Position, SourceSize};

// =============================================================================
// ERRORS
// =============================================================================

/// A host object the overlay expected is missing or refused an update
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("scene '{0}' not found")]
    MissingScene(String),
    #[error("element '{0}' not found")]
    MissingElement(String),
    #[error("source '{0}' not found")]
    MissingSource(String),
    #[error("host rejected {operation} on '{name}'")]
    Rejected {
        operation: &'static str,
        name: String,
    },
}

// =============================================================================
// OVERLAY HOST
// =============================================================================

/// What a named element is and the settings it is created with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// Image file drawn at its natural size
    Image { file: PathBuf },
    /// Solid color rectangle
    Color { width: u32, height: u32 },
}

/// Scene/element operations of the streaming host
///
/// Element names are global in the host; an element appears in a scene
/// through a scene item carrying position, visibility and draw order.
pub trait OverlayHost {
    /// Handle on a host source, held between ticks and released explicitly
    type Source;

    fn has_scene(&self, scene: &str) -> bool;

    fn create_scene(&self, scene: &str) -> Result<(), HostError>;

    /// Create the element if no element with that name exists, apply the
    /// kind's settings, and add it to `scene` if it is not already there
    fn ensure_element(&self, scene: &str, name: &str, kind: &ElementKind)
        -> Result<(), HostError>;

    fn set_position(&self, scene: &str, name: &str, position: Position) -> Result<(), HostError>;

    /// Raise the element above every other element of the scene
    fn move_to_top(&self, scene: &str, name: &str) -> Result<(), HostError>;

    /// Set the fill color (host ABGR) of a color element
    fn set_color(&self, name: &str, color: u32) -> Result<(), HostError>;

    fn set_visible(&self, scene: &str, name: &str, visible: bool) -> Result<(), HostError>;

    /// Names of every element in the scene, bottom to top
    fn scene_elements(&self, scene: &str) -> Result<Vec<String>, HostError>;

    /// Show or hide every element of the scene in one pass
    fn set_scene_visible(&self, scene: &str, visible: bool) -> Result<(), HostError> {
        for name in self.scene_elements(scene)? {
            self.set_visible(scene, &name, visible)?;
        }
        Ok(())
    }

    fn acquire_source(&self, name: &str) -> Option<Self::Source>;

    /// Current pixel size of a held source
    fn source_size(&self, source: &Self::Source) -> SourceSize;

    fn release_source(&self, source: Self::Source);
}

// =============================================================================
// TIMER HOST
// =============================================================================

/// The two periodic callbacks the overlay runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Live status and results polling
    Slow,
    /// Monitored source resolution check
    Fast,
}

/// Periodic callback registration
///
/// Registering an already registered kind replaces it.
pub trait TimerHost {
    fn register_timer(&self, timer: TimerKind, interval: Duration);

    fn unregister_timer(&self, timer: TimerKind);
}

// =============================================================================
// TEST MOCKS
// =============================================================================

#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Scene item of the mock host
    #[derive(Debug, Clone, PartialEq)]
    pub struct MockItem {
        pub name: String,
        pub visible: bool,
        pub position: Option<Position>,
    }

    /// In-memory host with scenes, elements and sources
    pub struct MockHost {
        /// Scene name -> items, bottom to top
        pub scenes: RefCell<HashMap<String, Vec<MockItem>>>,
        pub elements: RefCell<HashMap<String, ElementKind>>,
        pub colors: RefCell<HashMap<String, u32>>,
        /// Source name -> current size
        pub sources: RefCell<HashMap<String, SourceSize>>,
        pub acquired: RefCell<Vec<String>>,
        pub released: RefCell<Vec<String>>,
        /// Number of element creations (not reuses)
        pub created: RefCell<usize>,
        /// Every `set_visible` call, in call order
        pub visibility_writes: RefCell<Vec<(String, bool)>>,
    }

    impl MockHost {
        pub fn new() -> Self {
            Self {
                scenes: RefCell::new(HashMap::new()),
                elements: RefCell::new(HashMap::new()),
                colors: RefCell::new(HashMap::new()),
                sources: RefCell::new(HashMap::new()),
                acquired: RefCell::new(Vec::new()),
                released: RefCell::new(Vec::new()),
                created: RefCell::new(0),
                visibility_writes: RefCell::new(Vec::new()),
            }
        }

        pub fn with_source(self, name: &str, width: u32, height: u32) -> Self {
            self.set_source_size(name, width, height);
            self
        }

        pub fn set_source_size(&self, name: &str, width: u32, height: u32) {
            self.sources
                .borrow_mut()
                .insert(name.to_string(), SourceSize::new(width, height));
        }

        pub fn item(&self, scene: &str, name: &str) -> Option<MockItem> {
            self.scenes
                .borrow()
                .get(scene)?
                .iter()
                .find(|i| i.name == name)
                .cloned()
        }

        pub fn is_visible(&self, scene: &str, name: &str) -> bool {
            self.item(scene, name).is_some_and(|i| i.visible)
        }

        pub fn color(&self, name: &str) -> Option<u32> {
            self.colors.borrow().get(name).copied()
        }

        pub fn item_names(&self, scene: &str) -> Vec<String> {
            self.scenes
                .borrow()
                .get(scene)
                .map(|items| items.iter().map(|i| i.name.clone()).collect())
                .unwrap_or_default()
        }

        fn with_item<R>(
            &self,
            scene: &str,
            name: &str,
            f: impl FnOnce(&mut Vec<MockItem>, usize) -> R,
        ) -> Result<R, HostError> {
            let mut scenes = self.scenes.borrow_mut();
            let items = scenes
                .get_mut(scene)
                .ok_or_else(|| HostError::MissingScene(scene.to_string()))?;
            let index = items
                .iter()
                .position(|i| i.name == name)
                .ok_or_else(|| HostError::MissingElement(name.to_string()))?;
            Ok(f(items, index))
        }
    }

    impl Default for MockHost {
        fn default() -> Self {
            Self::new()
        }
    }

    impl OverlayHost for MockHost {
        type Source = String;

        fn has_scene(&self, scene: &str) -> bool {
            self.scenes.borrow().contains_key(scene)
        }

        fn create_scene(&self, scene: &str) -> Result<(), HostError> {
            self.scenes
                .borrow_mut()
                .entry(scene.to_string())
                .or_default();
            Ok(())
        }

        fn ensure_element(
            &self,
            scene: &str,
            name: &str,
            kind: &ElementKind,
        ) -> Result<(), HostError> {
            let mut scenes = self.scenes.borrow_mut();
            let items = scenes
                .get_mut(scene)
                .ok_or_else(|| HostError::MissingScene(scene.to_string()))?;

            let mut elements = self.elements.borrow_mut();
            if !elements.contains_key(name) {
                *self.created.borrow_mut() += 1;
            }
            elements.insert(name.to_string(), kind.clone());

            if !items.iter().any(|i| i.name == name) {
                items.push(MockItem {
                    name: name.to_string(),
                    visible: true,
                    position: None,
                });
            }
            Ok(())
        }

        fn set_position(
            &self,
            scene: &str,
            name: &str,
            position: Position,
        ) -> Result<(), HostError> {
            self.with_item(scene, name, |items, i| items[i].position = Some(position))
        }

        fn move_to_top(&self, scene: &str, name: &str) -> Result<(), HostError> {
            self.with_item(scene, name, |items, i| {
                let item = items.remove(i);
                items.push(item);
            })
        }

        fn set_color(&self, name: &str, color: u32) -> Result<(), HostError> {
            match self.elements.borrow().get(name) {
                Some(ElementKind::Color { .. }) => {
                    self.colors.borrow_mut().insert(name.to_string(), color);
                    Ok(())
                }
                Some(ElementKind::Image { .. }) => Err(HostError::Rejected {
                    operation: "set_color",
                    name: name.to_string(),
                }),
                None => Err(HostError::MissingElement(name.to_string())),
            }
        }

        fn set_visible(&self, scene: &str, name: &str, visible: bool) -> Result<(), HostError> {
            self.visibility_writes
                .borrow_mut()
                .push((name.to_string(), visible));
            self.with_item(scene, name, |items, i| items[i].visible = visible)
        }

        fn scene_elements(&self, scene: &str) -> Result<Vec<String>, HostError> {
            if !self.has_scene(scene) {
                return Err(HostError::MissingScene(scene.to_string()));
            }
            Ok(self.item_names(scene))
        }

        fn acquire_source(&self, name: &str) -> Option<String> {
            if !self.sources.borrow().contains_key(name) {
                return None;
            }
            self.acquired.borrow_mut().push(name.to_string());
            Some(name.to_string())
        }

        fn source_size(&self, source: &String) -> SourceSize {
            self.sources
                .borrow()
                .get(source)
                .copied()
                .unwrap_or(SourceSize::new(0, 0))
        }

        fn release_source(&self, source: String) {
            self.released.borrow_mut().push(source);
        }
    }

    /// Timer registration call, in call order
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum TimerCall {
        Register(TimerKind, Duration),
        Unregister(TimerKind),
    }

    /// Mock TimerHost recording registrations
    pub struct MockTimers {
        pub active: RefCell<HashMap<TimerKind, Duration>>,
        pub calls: RefCell<Vec<TimerCall>>,
    }

    impl MockTimers {
        pub fn new() -> Self {
            Self {
                active: RefCell::new(HashMap::new()),
                calls: RefCell::new(Vec::new()),
            }
        }

        pub fn is_active(&self, timer: TimerKind) -> bool {
            self.active.borrow().contains_key(&timer)
        }

        pub fn interval(&self, timer: TimerKind) -> Option<Duration> {
            self.active.borrow().get(&timer).copied()
        }
    }

    impl Default for MockTimers {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TimerHost for MockTimers {
        fn register_timer(&self, timer: TimerKind, interval: Duration) {
            self.active.borrow_mut().insert(timer, interval);
            self.calls
                .borrow_mut()
                .push(TimerCall::Register(timer, interval));
        }

        fn unregister_timer(&self, timer: TimerKind) {
            self.active.borrow_mut().remove(&timer);
            self.calls.borrow_mut().push(TimerCall::Unregister(timer));
        }
    }
}
