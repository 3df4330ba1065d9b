use bevy::prelude::*;

/// Represents the state of the World Inspector UI.
///
/// This resource holds a single boolean value indicating whether the World Inspector UI
/// is currently visible or hidden. The state is toggled by the inspector key from
/// [`InputConfig`](crate::config::InputConfig). While visible, the public settings of
/// every `OrbitCameraRig` can be edited at runtime.
///
/// The `WorldInspectorState` is initialized to `false` (hidden) by default.
#[derive(Resource, Default, Debug)]
pub struct WorldInspectorState(pub bool);

/// Whether the pivot and the translate band are drawn with gizmos.
#[derive(Resource, Default, Debug)]
pub struct DebugGizmoState(pub bool);

#[derive(Resource, Clone, Debug)]
pub struct BuildInfo {
    pub app_name: &'static str,
    pub app_version: &'static str,
    pub bevy_version: &'static str,
}
