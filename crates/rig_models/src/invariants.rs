//! Geometric post-conditions of the orbit rig.
//!
//! Every check is a pure function returning a [`Result`]. The rig evaluates them only
//! in builds with `debug_assertions` and panics on a violation there; release builds
//! never run them.

use bevy::prelude::*;
use thiserror::Error;

/// Tolerance in degrees for tilt-angle comparisons.
pub const ANGLE_TOLERANCE: f32 = 0.05;

/// Relative tolerance for world-space coordinates.
const LENGTH_TOLERANCE: f32 = 1.0e-4;

/// A broken geometric post-condition. Always a bug in the rig, never a user error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    #[error("horizontal rotation changed camera height from {before} to {after}")]
    HeightChanged { before: f32, after: f32 },

    #[error("vertical translation moved camera on the ground plane from {before} to {after}")]
    GroundPositionChanged { before: Vec3, after: Vec3 },

    #[error("vertical rotation left the tilt range [{min}, {max}] with angle {angle}")]
    TiltOutOfRange { angle: f32, min: f32, max: f32 },
}

fn length_tolerance(a: Vec3, b: Vec3) -> f32 {
    LENGTH_TOLERANCE * (1.0 + a.abs().max_element().max(b.abs().max_element()))
}

/// Horizontal orbit happens around a vertical axis, so the height must survive it.
pub fn check_height_preserved(before: Vec3, after: Vec3) -> Result<(), InvariantViolation> {
    if (before.y - after.y).abs() > length_tolerance(before, after) {
        return Err(InvariantViolation::HeightChanged { before: before.y, after: after.y });
    }
    Ok(())
}

/// Vertical translation only moves along world up.
pub fn check_ground_position_preserved(before: Vec3, after: Vec3) -> Result<(), InvariantViolation> {
    let tolerance = length_tolerance(before, after);
    if (before.x - after.x).abs() > tolerance || (before.z - after.z).abs() > tolerance {
        return Err(InvariantViolation::GroundPositionChanged { before, after });
    }
    Ok(())
}

/// A tilt that started inside `[min, max]` has to stay there.
///
/// Angles that were already outside the range before the rotation (e.g. the camera was
/// placed there by someone else) are only required not to move further away.
pub fn check_tilt_in_range(before: f32, after: f32, min: f32, max: f32) -> Result<(), InvariantViolation> {
    let was_inside = before >= min - ANGLE_TOLERANCE && before <= max + ANGLE_TOLERANCE;
    let is_inside = after >= min - ANGLE_TOLERANCE && after <= max + ANGLE_TOLERANCE;

    let drifted_out = if was_inside {
        !is_inside
    } else if before < min {
        after < before - ANGLE_TOLERANCE
    } else {
        after > before + ANGLE_TOLERANCE
    };

    if drifted_out {
        return Err(InvariantViolation::TiltOutOfRange { angle: after, min, max });
    }
    Ok(())
}

/// Runs `check` and panics with the violation message in debug builds.
/// In release builds `check` is never called.
#[inline]
pub fn debug_enforce(check: impl FnOnce() -> Result<(), InvariantViolation>) {
    if cfg!(debug_assertions) {
        if let Err(violation) = check() {
            panic!("orbit rig invariant violated: {violation}");
        }
    }
}
