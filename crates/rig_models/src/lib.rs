#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod camera;
pub mod config;
pub mod debug;
pub mod input;
pub mod invariants;
pub mod key_utils;
pub mod pose;

use bevy::prelude::*;
use crate::camera::{DragState, OrbitCameraRig, OrbitRigSettings, VerticalMotion};
use crate::debug::{DebugGizmoState, WorldInspectorState};
use crate::input::PointerSample;

/// Core of all rig relevant resources and structures. This Plugin initializes resources
/// with `init_resource` from bevy and registers the reflected rig types, so the world
/// inspector can edit them. It is registered at `ManagerPlugin` which is a part of the
/// main.rs file.
pub struct RigCorePlugin;

impl Plugin for RigCorePlugin {

    #[cfg_attr(coverage_nightly, coverage(off))]
    fn build(&self, app: &mut App) {
        app
            .register_type::<OrbitCameraRig>()
            .register_type::<OrbitRigSettings>()
            .register_type::<DragState>()
            .register_type::<VerticalMotion>();

        app
            .init_resource::<PointerSample>()
            .init_resource::<WorldInspectorState>()
            .init_resource::<DebugGizmoState>();
    }

}
