use bevy::prelude::*;

/// Device a [`PointerSample`] was taken from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PointerSource {
    #[default]
    None,
    Mouse,
    /// Touch with the id the platform reported when the finger went down.
    Touch(u64),
}

/// The single pointer the orbit rig listens to, sampled once per frame.
///
/// Written by `sample_pointer` from mouse, cursor and touch input and read by the rig
/// system. `position` is in logical window pixels with y pointing down.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerSample {
    /// Whether the drag button or the tracked touch is held.
    pub held: bool,
    /// Pointer position, `None` when the cursor is outside the window.
    pub position: Option<Vec2>,
    pub source: PointerSource,
}

impl PointerSample {

    pub fn held_at(position: Vec2) -> Self {
        Self { held: true, position: Some(position), source: PointerSource::Mouse }
    }

    pub fn touch_at(id: u64, position: Vec2) -> Self {
        Self { held: true, position: Some(position), source: PointerSource::Touch(id) }
    }

    /// The held position, if the pointer is both held and located.
    /// A held button without a cursor position counts as released.
    pub fn active_position(&self) -> Option<Vec2> {
        self.position.filter(|_| self.held)
    }

    /// Whether `next` continues the drag of `self` with another device or finger.
    /// Deltas between two different pointers are meaningless.
    pub fn is_handover_to(&self, next: &PointerSample) -> bool {
        self.held && next.held && self.source != next.source
    }
}
