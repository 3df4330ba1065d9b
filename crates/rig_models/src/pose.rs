use bevy::prelude::*;

/// Tolerance used when comparing world-space lengths produced by rotations.
pub const EPSILON: f32 = 0.001;

/// Rigid pose capability the orbit rig drives every frame.
///
/// The rig never owns the camera pose. It reads and mutates it through this trait, so
/// the same state machine works on a Bevy [`Transform`] inside a running app and on a
/// plain `Transform` in unit tests.
pub trait PoseMutator {
    /// World-space position of the pose.
    fn position(&self) -> Vec3;

    /// Unit vector the pose is looking along.
    fn forward(&self) -> Vec3;

    /// Unit vector pointing to the right of the pose.
    fn right(&self) -> Vec3;

    /// Moves the pose by `offset` in world space.
    fn translate_world(&mut self, offset: Vec3);

    /// Rotates the pose around `point` about `axis` by `degrees`.
    /// Position and orientation are both rotated, like an orbit.
    fn rotate_around(&mut self, point: Vec3, axis: Vec3, degrees: f32);
}

impl PoseMutator for Transform {
    fn position(&self) -> Vec3 {
        self.translation
    }

    fn forward(&self) -> Vec3 {
        *Transform::forward(self)
    }

    fn right(&self) -> Vec3 {
        *Transform::right(self)
    }

    fn translate_world(&mut self, offset: Vec3) {
        self.translation += offset;
    }

    fn rotate_around(&mut self, point: Vec3, axis: Vec3, degrees: f32) {
        if degrees == 0.0 {
            return;
        }
        let Some(axis) = axis.try_normalize() else {
            return;
        };
        let rotation = Quat::from_axis_angle(axis, degrees.to_radians());
        Transform::rotate_around(self, point, rotation);
        // long drags accumulate quaternion drift
        self.rotation = self.rotation.normalize();
    }
}

/// Angle between `a` and `b` in degrees, in the range `[0, 180]`.
///
/// Returns `0.0` when either vector has zero length.
pub fn angle_between_degrees(a: Vec3, b: Vec3) -> f32 {
    if a.length_squared() == 0.0 || b.length_squared() == 0.0 {
        return 0.0;
    }
    a.angle_between(b).to_degrees().clamp(0.0, 180.0)
}

/// Checks whether two floats are equal within [`EPSILON`].
pub fn approx_equal(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}
