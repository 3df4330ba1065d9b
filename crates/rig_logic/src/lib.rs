#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod camera_logic;
pub mod debug_logic;

use bevy::prelude::*;
use crate::camera_logic::CameraLogicComponent;
use crate::debug_logic::DebugLogicComponent;

/// Systems driving the orbit camera: scene setup, pointer sampling, the per-frame rig
/// tick and the debug overlays. Expects [`rig_models::RigCorePlugin`] and a
/// `GlobalConfig` resource.
pub struct RigLogicPlugin;

impl Plugin for RigLogicPlugin {

    #[cfg_attr(coverage_nightly, coverage(off))]
    fn build(&self, app: &mut App) {
        app.add_plugins((CameraLogicComponent, DebugLogicComponent));
    }
}
