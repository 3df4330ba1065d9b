use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::invariants::{
    check_ground_position_preserved, check_height_preserved, check_tilt_in_range, debug_enforce,
};
use crate::pose::{angle_between_degrees, PoseMutator};

// =================================================================================================
//
//                                            Settings
//
// =================================================================================================

/// Tunables of an [`OrbitCameraRig`]. All angles are in degrees.
///
/// Everything is public so the values can be edited at runtime (world inspector, config
/// reload). Use [`OrbitCameraRig::set_settings`] when the values come from outside and
/// still need validation.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitRigSettings {
    /// Height of the plane the translate band is centered on.
    pub reference_height: f32,
    /// Half-height of the band around `reference_height` where vertical input translates
    /// the camera instead of rotating it.
    pub max_vertical_translation: f32,
    /// How far the vertical orbit may tilt away from horizontal. Must lie in (0, 90).
    pub max_vertical_rotation_angle: f32,
    /// Degrees of horizontal orbit per pixel of horizontal drag.
    pub horizontal_rotate_rate: f32,
    /// Degrees of vertical orbit per pixel of vertical drag.
    pub vertical_rotate_rate: f32,
    /// World units of vertical translation per pixel of vertical drag.
    pub vertical_translate_rate: f32,
}

impl Default for OrbitRigSettings {
    fn default() -> Self {
        Self {
            reference_height: 0.0,
            max_vertical_translation: 1.0,
            max_vertical_rotation_angle: 80.0,
            horizontal_rotate_rate: 0.5,
            vertical_rotate_rate: 0.5,
            vertical_translate_rate: 0.01,
        }
    }
}

/// Rejected [`OrbitRigSettings`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RigConfigError {
    #[error("max_vertical_rotation_angle must lie in (0, 90), got {0}")]
    RotationAngleOutOfRange(f32),

    #[error("max_vertical_translation must not be negative, got {0}")]
    NegativeTranslationBand(f32),

    #[error("vertical_rotate_rate must not be negative, got {0}")]
    NegativeVerticalRotateRate(f32),

    #[error("{name} must be a finite number, got {value}")]
    NotFinite { name: &'static str, value: f32 },
}

impl OrbitRigSettings {

    /// Checks the settings against the rig's invariants.
    ///
    /// # Errors
    /// - [`RigConfigError::NotFinite`] when any value is `NaN` or infinite.
    /// - [`RigConfigError::RotationAngleOutOfRange`] when the rotation limit is not in (0, 90).
    /// - [`RigConfigError::NegativeTranslationBand`] when the band height is negative.
    /// - [`RigConfigError::NegativeVerticalRotateRate`] when the vertical rate would invert
    ///   the direction the clamp is checked against.
    pub fn validate(&self) -> Result<(), RigConfigError> {
        let fields = [
            ("reference_height", self.reference_height),
            ("max_vertical_translation", self.max_vertical_translation),
            ("max_vertical_rotation_angle", self.max_vertical_rotation_angle),
            ("horizontal_rotate_rate", self.horizontal_rotate_rate),
            ("vertical_rotate_rate", self.vertical_rotate_rate),
            ("vertical_translate_rate", self.vertical_translate_rate),
        ];
        if let Some((name, value)) = fields.into_iter().find(|(_, value)| !value.is_finite()) {
            return Err(RigConfigError::NotFinite { name, value });
        }

        if self.max_vertical_rotation_angle <= 0.0 || self.max_vertical_rotation_angle >= 90.0 {
            return Err(RigConfigError::RotationAngleOutOfRange(self.max_vertical_rotation_angle));
        }
        if self.max_vertical_translation < 0.0 {
            return Err(RigConfigError::NegativeTranslationBand(self.max_vertical_translation));
        }
        if self.vertical_rotate_rate < 0.0 {
            return Err(RigConfigError::NegativeVerticalRotateRate(self.vertical_rotate_rate));
        }
        Ok(())
    }

    /// Largest tilt angle (camera above the pivot, looking down).
    pub fn max_top_angle(&self) -> f32 {
        90.0 + self.max_vertical_rotation_angle
    }

    /// Smallest tilt angle (camera below the pivot, looking up).
    pub fn max_bottom_angle(&self) -> f32 {
        90.0 - self.max_vertical_rotation_angle
    }
}

// =================================================================================================
//
//                                          Rig State
//
// =================================================================================================

/// Drag session of a rig. The previous pointer sample only exists while dragging.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        previous_pointer_position: Vec2,
    },
}

/// What the vertical part of a drag step did.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalMotion {
    /// Inside the translate band: camera and pivot moved along world up.
    Translated,
    /// Outside the band: camera orbited around the pivot's horizontal axis.
    Rotated,
    /// Outside the band and already at the tilt limit in the requested direction.
    Clamped,
}

/// Result of one [`OrbitCameraRig::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// No input this frame and no drag to end.
    Idle,
    /// First held frame. No motion because there is no previous sample yet.
    Started,
    /// Held frame of a running drag. The pose was updated.
    Moved(VerticalMotion),
    /// Input went away. The drag state has been discarded.
    Released,
}

/// Touch/mouse-drag camera rig.
///
/// Horizontal drag orbits the camera around `pivot` about world up. Vertical drag either
/// translates camera and pivot together (while the camera is inside the translate band)
/// or orbits over the pivot, clamped so the tilt angle stays within
/// `90 ± max_vertical_rotation_angle`.
///
/// `settings` is public so the inspector can tune it. Such edits are not validated on
/// write; call [`OrbitCameraRig::enforce_valid_settings`] to reject them.
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
pub struct OrbitCameraRig {
    /// World-space point the camera orbits around.
    pub pivot: Vec3,
    pub settings: OrbitRigSettings,
    #[reflect(ignore)]
    last_valid_settings: OrbitRigSettings,
    drag: DragState,
    last_vertical_motion: Option<VerticalMotion>,
}

impl OrbitCameraRig {

    /// Creates an idle rig orbiting around `pivot`.
    ///
    /// # Errors
    /// Returns the [`RigConfigError`] from [`OrbitRigSettings::validate`].
    pub fn new(pivot: Vec3, settings: OrbitRigSettings) -> Result<Self, RigConfigError> {
        settings.validate()?;
        Ok(Self {
            pivot,
            settings,
            last_valid_settings: settings,
            drag: DragState::Idle,
            last_vertical_motion: None,
        })
    }

    /// Replaces the settings after validating them. The old settings stay active on error.
    ///
    /// # Errors
    /// Returns the [`RigConfigError`] from [`OrbitRigSettings::validate`].
    pub fn set_settings(&mut self, settings: OrbitRigSettings) -> Result<(), RigConfigError> {
        settings.validate()?;
        self.settings = settings;
        self.last_valid_settings = settings;
        Ok(())
    }

    /// Checks settings that were written directly, e.g. from the inspector. Valid
    /// settings are remembered, invalid ones are replaced by the last valid settings.
    ///
    /// # Errors
    /// Returns the [`RigConfigError`] of the rejected settings.
    pub fn enforce_valid_settings(&mut self) -> Result<(), RigConfigError> {
        match self.settings.validate() {
            Ok(()) => {
                self.last_valid_settings = self.settings;
                Ok(())
            }
            Err(err) => {
                self.settings = self.last_valid_settings;
                Err(err)
            }
        }
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    pub fn previous_pointer_position(&self) -> Option<Vec2> {
        match self.drag {
            DragState::Dragging { previous_pointer_position } => Some(previous_pointer_position),
            DragState::Idle => None,
        }
    }

    /// Advances the drag state machine by one frame.
    ///
    /// # Parameters
    /// * `input_held` - Whether the primary button or touch is held this frame.
    /// * `pointer_position` - Pointer position in screen pixels, y pointing down.
    /// * `pose` - The camera pose to move.
    pub fn tick<P: PoseMutator + ?Sized>(
        &mut self,
        input_held: bool,
        pointer_position: Vec2,
        pose: &mut P,
    ) -> DragOutcome {
        if !input_held {
            return match std::mem::take(&mut self.drag) {
                DragState::Dragging { .. } => {
                    debug!("Orbit drag released, pivot at {}", self.pivot);
                    self.last_vertical_motion = None;
                    DragOutcome::Released
                }
                DragState::Idle => DragOutcome::Idle,
            };
        }

        match self.drag {
            DragState::Idle => {
                debug!("Orbit drag started at {}", pointer_position);
                self.drag = DragState::Dragging { previous_pointer_position: pointer_position };
                DragOutcome::Started
            }
            DragState::Dragging { previous_pointer_position } => {
                let delta = pointer_position - previous_pointer_position;
                let motion = self.apply_delta(delta, pose);
                self.drag = DragState::Dragging { previous_pointer_position: pointer_position };
                DragOutcome::Moved(motion)
            }
        }
    }

    /// Applies one pointer delta (screen pixels, y down) to `pose`.
    pub fn apply_delta<P: PoseMutator + ?Sized>(&mut self, delta: Vec2, pose: &mut P) -> VerticalMotion {
        self.rotate_horizontally(delta.x, pose);
        let motion = self.move_vertically(-delta.y, pose);

        if self.last_vertical_motion != Some(motion) {
            debug!("Vertical orbit mode {:?} -> {:?}", self.last_vertical_motion, motion);
            self.last_vertical_motion = Some(motion);
        }
        trace!("Orbit delta {} applied, camera at {}", delta, pose.position());
        motion
    }

    /// Orbits `pose` around the pivot about world up. Height is left untouched.
    pub fn rotate_horizontally<P: PoseMutator + ?Sized>(&self, horizontal_input: f32, pose: &mut P) {
        let before = pose.position();
        pose.rotate_around(self.pivot, Vec3::Y, self.settings.horizontal_rotate_rate * horizontal_input);
        debug_enforce(|| check_height_preserved(before, pose.position()));
    }

    /// Picks translation or rotation from the current height and applies it.
    /// Positive `vertical_input` moves the camera up.
    pub fn move_vertically<P: PoseMutator + ?Sized>(&mut self, vertical_input: f32, pose: &mut P) -> VerticalMotion {
        if self.is_in_translate_band(pose.position().y) {
            self.translate_vertically(vertical_input, pose);
            VerticalMotion::Translated
        } else if self.rotate_vertically(vertical_input, pose) {
            VerticalMotion::Rotated
        } else {
            VerticalMotion::Clamped
        }
    }

    /// Whether `height` lies strictly inside the translate band.
    pub fn is_in_translate_band(&self, height: f32) -> bool {
        (height - self.settings.reference_height).abs() < self.settings.max_vertical_translation
    }

    /// Moves camera and pivot along world up by the same vector.
    pub fn translate_vertically<P: PoseMutator + ?Sized>(&mut self, vertical_input: f32, pose: &mut P) {
        let translation = Vec3::Y * (vertical_input * self.settings.vertical_translate_rate);
        let before = pose.position();
        pose.translate_world(translation);
        self.pivot += translation;
        debug_enforce(|| check_ground_position_preserved(before, pose.position()));
    }

    /// Angle between world up and the camera's forward axis, in degrees.
    pub fn tilt_angle<P: PoseMutator + ?Sized>(&self, pose: &P) -> f32 {
        angle_between_degrees(Vec3::Y, pose.forward())
    }

    /// Clamp rule for vertical orbit. At `vertical_input == 0` both directions count as
    /// requested, which is harmless because the rotation is zero.
    pub fn can_rotate_vertically(&self, tilt_angle: f32, vertical_input: f32) -> bool {
        let can_rotate_down = tilt_angle > self.settings.max_bottom_angle();
        let can_rotate_up = tilt_angle < self.settings.max_top_angle();

        let is_rotating_down = vertical_input <= 0.0;
        let is_rotating_up = vertical_input >= 0.0;

        (can_rotate_down && is_rotating_down) || (can_rotate_up && is_rotating_up)
    }

    /// Orbits `pose` over the pivot about its own right axis. Positive input raises the
    /// camera, which increases the tilt angle.
    ///
    /// A single step never crosses the limit that allowed it. Returns `false` when the
    /// clamp rule refused the rotation.
    pub fn rotate_vertically<P: PoseMutator + ?Sized>(&self, vertical_input: f32, pose: &mut P) -> bool {
        let angle = self.tilt_angle(pose);
        if !self.can_rotate_vertically(angle, vertical_input) {
            return false;
        }

        let max_top = self.settings.max_top_angle();
        let max_bottom = self.settings.max_bottom_angle();

        let mut degrees = self.settings.vertical_rotate_rate * vertical_input;
        if degrees > 0.0 {
            degrees = degrees.min(max_top - angle);
        } else if degrees < 0.0 {
            degrees = degrees.max(max_bottom - angle);
        }

        let axis = pose.right();
        // rotating about +right pitches forward up, the rig's positive direction is down
        pose.rotate_around(self.pivot, axis, -degrees);

        debug_enforce(|| check_tilt_in_range(angle, self.tilt_angle(pose), max_bottom, max_top));
        true
    }
}
