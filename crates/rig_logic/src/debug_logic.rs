use bevy::prelude::*;
use rig_models::camera::OrbitCameraRig;
use rig_models::config::GlobalConfig;
use rig_models::debug::{BuildInfo, DebugGizmoState, WorldInspectorState};

const PIVOT_COLOR: Color = Color::srgb(1.0, 0.55, 0.1);
const BAND_COLOR: Color = Color::srgb(0.2, 0.9, 0.4);
const LINK_COLOR: Color = Color::srgb(0.6, 0.6, 0.6);

pub struct DebugLogicComponent;

impl Plugin for DebugLogicComponent {

    #[cfg_attr(coverage_nightly, coverage(off))]
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, log_build_info);
        app.add_systems(Update, (
            toggle_debug_states,
            draw_rig_gizmos.run_if(gizmos_visible),
        ).chain());
    }

}

/// Logs name and version of the running build once at startup.
///
/// # Parameters
/// * `build` - Optional build metadata (app name/version, Bevy version).
#[cfg_attr(coverage_nightly, coverage(off))]
fn log_build_info(build: Option<Res<BuildInfo>>) {
    let (app_name, app_ver, bevy_ver) = if let Some(b) = build {
        (b.app_name, b.app_version, b.bevy_version)
    } else { ("<app>", "?", "0.17.3") };

    info!("{} {} running on bevy {}", app_name, app_ver, bevy_ver);
}

/// Flips the inspector and gizmo overlays when their configured keys are pressed.
///
/// # Parameters
/// * `keys` - Keyboard state, checked for just pressed toggle keys.
/// * `global_config` - Source of the toggle key bindings.
/// * `inspector` - Visibility of the world inspector.
/// * `gizmos` - Visibility of the rig gizmos.
pub fn toggle_debug_states(
    keys: Res<ButtonInput<KeyCode>>,
    global_config: Res<GlobalConfig>,
    mut inspector: ResMut<WorldInspectorState>,
    mut gizmos: ResMut<DebugGizmoState>,
) {
    let input_config = &global_config.input_config;

    if keys.just_pressed(input_config.get_inspector_key()) {
        inspector.0 = !inspector.0;
        debug!("World inspector visible: {}", inspector.0);
    }

    if keys.just_pressed(input_config.get_gizmo_key()) {
        gizmos.0 = !gizmos.0;
        debug!("Rig gizmos visible: {}", gizmos.0);
    }
}

/// Draws every rig's pivot, the vertical extent of its translate band and a line from
/// the camera to the pivot.
#[cfg_attr(coverage_nightly, coverage(off))]
fn draw_rig_gizmos(mut gizmos: Gizmos, rigs: Query<(&OrbitCameraRig, &Transform)>) {
    for (rig, transform) in &rigs {
        gizmos.sphere(Isometry3d::from_translation(rig.pivot), 0.15, PIVOT_COLOR);

        let band_center = Vec3::new(rig.pivot.x, rig.settings.reference_height, rig.pivot.z);
        let half_band = Vec3::Y * rig.settings.max_vertical_translation;
        gizmos.line(band_center - half_band, band_center + half_band, BAND_COLOR);
        for edge in [band_center - half_band, band_center + half_band] {
            gizmos.line(edge - Vec3::X * 0.5, edge + Vec3::X * 0.5, BAND_COLOR);
            gizmos.line(edge - Vec3::Z * 0.5, edge + Vec3::Z * 0.5, BAND_COLOR);
        }

        gizmos.line(transform.translation, rig.pivot, LINK_COLOR);
    }
}

/// Returns whether the world inspector is currently visible.
/// Safe to call when the resource is absent; defaults to `false`.
///
/// # Parameters
/// * `state` - Optional `WorldInspectorState` resource to read the flag from.
pub fn inspector_visible(state: Option<Res<WorldInspectorState>>) -> bool {
    state.is_some_and(|s| s.0)
}

/// Returns whether the rig gizmos are currently drawn.
/// Safe to call when the resource is absent; defaults to `false`.
pub fn gizmos_visible(state: Option<Res<DebugGizmoState>>) -> bool {
    state.is_some_and(|s| s.0)
}
