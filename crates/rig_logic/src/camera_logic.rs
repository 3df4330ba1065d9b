use bevy::input::touch::Touches;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use rig_models::camera::OrbitCameraRig;
use rig_models::config::GlobalConfig;
use rig_models::input::{PointerSample, PointerSource};

pub struct CameraLogicComponent;

impl Plugin for CameraLogicComponent {

    #[cfg_attr(coverage_nightly, coverage(off))]
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_scene);
        app.add_systems(Update, (sample_pointer, guard_rig_settings, drive_orbit_rig).chain());
    }
}

/// Spawns the orbit camera with its rig, a body at the pivot, a ground plane and a light.
/// Invalid rig settings fall back to the defaults around the configured pivot.
#[cfg_attr(coverage_nightly, coverage(off))]
pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    global_config: Res<GlobalConfig>,
) {
    let camera_config = &global_config.camera_config;
    let pivot = camera_config.get_pivot();

    let rig = camera_config.build_rig().unwrap_or_else(|err| {
        warn!("{err}, spawning orbit camera with default settings");
        let mut rig = OrbitCameraRig::default();
        rig.pivot = pivot;
        rig
    });

    commands.spawn((
        Mesh3d(meshes.add(Mesh::from(Cuboid::new(1.0, 1.0, 1.0)))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.3, 0.6, 0.9),
            ..default()
        })),
        Transform::from_translation(pivot),
        Name::new("Pivot Body"),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(40.0, 40.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.25, 0.27, 0.25),
            ..default()
        })),
        Transform::from_xyz(0.0, rig.settings.reference_height - 3.0, 0.0),
        Name::new("Ground"),
    ));

    commands.spawn((
        PointLight {
            intensity: 1500.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0),
    ));

    info!("Orbit camera spawned, pivot at {}", rig.pivot);
    commands.spawn((
        Camera3d::default(),
        camera_config.get_camera_transform(),
        rig,
        Name::new("Orbit Camera"),
    ));
}

/// Writes this frame's drag pointer into [`PointerSample`].
///
/// A held touch wins over the mouse when touch dragging is enabled. The finger that
/// started the drag is followed by its id until it lifts; a new drag picks the lowest
/// pressed id. Otherwise the configured mouse button together with the primary window
/// cursor is used.
///
/// When the pointer changes hands mid drag (another finger, or mouse to touch) one
/// released frame is written instead, so the rig starts a fresh drag on the next frame.
///
/// # Parameters
/// * `mouse_buttons` - Mouse button state, checked for the configured drag button.
/// * `touches` - Pressed touches.
/// * `windows` - The primary window, read for the cursor position.
/// * `global_config` - Source of the drag button and the touch toggle.
/// * `pointer` - Last frame's sample, overwritten for [`drive_orbit_rig`].
pub fn sample_pointer(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    global_config: Res<GlobalConfig>,
    mut pointer: ResMut<PointerSample>,
) {
    let input_config = &global_config.input_config;

    let touch = input_config
        .touch_drag
        .then(|| {
            let tracked = match pointer.source {
                PointerSource::Touch(id) => touches.get_pressed(id),
                _ => None,
            };
            tracked.or_else(|| touches.iter().min_by_key(|touch| touch.id()))
        })
        .flatten();

    let next = match touch {
        Some(touch) => PointerSample::touch_at(touch.id(), touch.position()),
        None => {
            let held = mouse_buttons.pressed(input_config.get_drag_button());
            let position = windows.single().ok().and_then(|window| window.cursor_position());
            let source = if held { PointerSource::Mouse } else { PointerSource::None };
            PointerSample { held, position, source }
        }
    };

    if pointer.is_handover_to(&next) {
        debug!("Drag pointer changed from {:?} to {:?}", pointer.source, next.source);
        *pointer = PointerSample { held: false, position: next.position, source: PointerSource::None };
        return;
    }
    *pointer = next;
}

/// Re-validates rig settings after direct edits such as the world inspector. Rejected
/// settings are rolled back to the last valid ones.
pub fn guard_rig_settings(mut rigs: Query<&mut OrbitCameraRig, Changed<OrbitCameraRig>>) {
    for mut rig in rigs.iter_mut() {
        if let Err(err) = rig.bypass_change_detection().enforce_valid_settings() {
            warn!("Rejected orbit rig settings edit: {err}");
        }
    }
}

/// Ticks every orbit rig with the current [`PointerSample`]. Idle rigs without input are
/// skipped so their transforms are not flagged as changed.
pub fn drive_orbit_rig(
    pointer: Res<PointerSample>,
    mut rigs: Query<(&mut OrbitCameraRig, &mut Transform)>,
) {
    let active = pointer.active_position();

    for (mut rig, mut transform) in rigs.iter_mut() {
        if active.is_none() && !rig.is_dragging() {
            continue;
        }
        rig.tick(active.is_some(), active.unwrap_or_default(), &mut *transform);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::input::touch::{touch_screen_input_system, TouchInput, TouchPhase};
    use rig_models::camera::OrbitRigSettings;
    use rig_models::pose::approx_equal;

    fn rig_app() -> App {
        let mut app = App::new();
        app.init_resource::<PointerSample>();
        app.add_systems(Update, drive_orbit_rig);
        app
    }

    fn set_pointer(app: &mut App, sample: PointerSample) {
        app.world_mut().insert_resource(sample);
        app.update();
    }

    #[test]
    fn test_drag_translates_camera_inside_band() {
        let mut app = rig_app();
        let camera = app
            .world_mut()
            .spawn((Transform::from_xyz(0.0, 0.5, 6.0), OrbitCameraRig::default()))
            .id();

        set_pointer(&mut app, PointerSample::held_at(Vec2::new(200.0, 200.0)));
        assert_eq!(app.world().get::<Transform>(camera).unwrap().translation.y, 0.5);

        set_pointer(&mut app, PointerSample::held_at(Vec2::new(200.0, 190.0)));
        let transform = app.world().get::<Transform>(camera).unwrap();
        assert!(approx_equal(transform.translation.y, 0.6));

        let rig = app.world().get::<OrbitCameraRig>(camera).unwrap();
        assert!(approx_equal(rig.pivot.y, 0.1));
        assert!(rig.is_dragging());
    }

    #[test]
    fn test_release_ends_drag() {
        let mut app = rig_app();
        let camera = app
            .world_mut()
            .spawn((Transform::from_xyz(0.0, 0.5, 6.0), OrbitCameraRig::default()))
            .id();

        set_pointer(&mut app, PointerSample::held_at(Vec2::new(10.0, 10.0)));
        set_pointer(&mut app, PointerSample::default());
        assert!(!app.world().get::<OrbitCameraRig>(camera).unwrap().is_dragging());

        // re-press far away: no jump on the first frame
        let before = *app.world().get::<Transform>(camera).unwrap();
        set_pointer(&mut app, PointerSample::held_at(Vec2::new(600.0, 400.0)));
        assert_eq!(*app.world().get::<Transform>(camera).unwrap(), before);
    }

    #[test]
    fn test_held_without_cursor_counts_as_released() {
        let mut app = rig_app();
        let camera = app
            .world_mut()
            .spawn((Transform::from_xyz(0.0, 0.5, 6.0), OrbitCameraRig::default()))
            .id();

        set_pointer(&mut app, PointerSample::held_at(Vec2::new(10.0, 10.0)));
        set_pointer(&mut app, PointerSample { held: true, position: None, ..default() });

        assert!(!app.world().get::<OrbitCameraRig>(camera).unwrap().is_dragging());
    }

    #[test]
    fn test_sample_pointer_reads_configured_mouse_button() {
        let mut app = App::new();
        app.init_resource::<PointerSample>()
            .init_resource::<ButtonInput<MouseButton>>()
            .init_resource::<Touches>()
            .init_resource::<GlobalConfig>()
            .add_systems(Update, sample_pointer);

        app.world_mut().resource_mut::<ButtonInput<MouseButton>>().press(MouseButton::Right);
        app.update();
        assert!(!app.world().resource::<PointerSample>().held);

        app.world_mut().resource_mut::<ButtonInput<MouseButton>>().press(MouseButton::Left);
        app.update();
        let sample = *app.world().resource::<PointerSample>();
        assert!(sample.held);
        // no window in a headless app
        assert_eq!(sample.position, None);
    }

    fn sampling_app(touch_drag: bool) -> App {
        let mut global_config = GlobalConfig::default();
        global_config.input_config.touch_drag = touch_drag;

        let mut app = App::new();
        app.add_message::<TouchInput>()
            .init_resource::<PointerSample>()
            .init_resource::<ButtonInput<MouseButton>>()
            .init_resource::<Touches>()
            .insert_resource(global_config)
            .add_systems(
                Update,
                (touch_screen_input_system, sample_pointer, guard_rig_settings, drive_orbit_rig).chain(),
            );
        app
    }

    fn touch(app: &mut App, id: u64, phase: TouchPhase, position: Vec2) {
        app.world_mut().write_message(TouchInput {
            phase,
            position,
            window: Entity::PLACEHOLDER,
            force: None,
            id,
        });
    }

    fn spawn_rig(app: &mut App) -> Entity {
        app.world_mut()
            .spawn((Transform::from_xyz(0.0, 0.5, 6.0), OrbitCameraRig::default()))
            .id()
    }

    #[test]
    fn test_first_touch_is_the_pointer() {
        let mut app = sampling_app(true);

        touch(&mut app, 3, TouchPhase::Started, Vec2::new(40.0, 60.0));
        app.update();

        assert_eq!(
            *app.world().resource::<PointerSample>(),
            PointerSample::touch_at(3, Vec2::new(40.0, 60.0))
        );
    }

    #[test]
    fn test_touch_takes_precedence_over_mouse() {
        let mut app = sampling_app(true);
        app.world_mut().resource_mut::<ButtonInput<MouseButton>>().press(MouseButton::Left);
        app.update();
        assert_eq!(app.world().resource::<PointerSample>().source, PointerSource::Mouse);

        // switching device mid drag releases for one frame
        touch(&mut app, 1, TouchPhase::Started, Vec2::new(10.0, 10.0));
        app.update();
        let sample = *app.world().resource::<PointerSample>();
        assert!(!sample.held);
        assert_eq!(sample.source, PointerSource::None);

        app.update();
        assert_eq!(
            *app.world().resource::<PointerSample>(),
            PointerSample::touch_at(1, Vec2::new(10.0, 10.0))
        );
    }

    #[test]
    fn test_touch_drag_disabled_ignores_touches() {
        let mut app = sampling_app(false);

        touch(&mut app, 1, TouchPhase::Started, Vec2::new(10.0, 10.0));
        app.update();
        assert_eq!(*app.world().resource::<PointerSample>(), PointerSample::default());

        app.world_mut().resource_mut::<ButtonInput<MouseButton>>().press(MouseButton::Left);
        app.update();
        let sample = *app.world().resource::<PointerSample>();
        assert!(sample.held);
        assert_eq!(sample.source, PointerSource::Mouse);
    }

    #[test]
    fn test_tracked_touch_is_followed_by_id() {
        let mut app = sampling_app(true);

        touch(&mut app, 7, TouchPhase::Started, Vec2::new(100.0, 100.0));
        app.update();
        // a lower id joining later does not take over
        touch(&mut app, 2, TouchPhase::Started, Vec2::new(600.0, 400.0));
        touch(&mut app, 7, TouchPhase::Moved, Vec2::new(110.0, 100.0));
        app.update();

        assert_eq!(
            *app.world().resource::<PointerSample>(),
            PointerSample::touch_at(7, Vec2::new(110.0, 100.0))
        );
    }

    #[test]
    fn test_lifting_first_of_two_fingers_moves_nothing() {
        let mut app = sampling_app(true);
        let camera = spawn_rig(&mut app);
        let before = *app.world().get::<Transform>(camera).unwrap();

        touch(&mut app, 1, TouchPhase::Started, Vec2::new(100.0, 100.0));
        app.update();
        touch(&mut app, 2, TouchPhase::Started, Vec2::new(600.0, 400.0));
        app.update();
        assert!(app.world().get::<OrbitCameraRig>(camera).unwrap().is_dragging());

        touch(&mut app, 1, TouchPhase::Ended, Vec2::new(100.0, 100.0));
        app.update();
        assert!(!app.world().get::<OrbitCameraRig>(camera).unwrap().is_dragging());
        assert_eq!(*app.world().get::<Transform>(camera).unwrap(), before);

        // the remaining finger starts a fresh drag from its own position
        app.update();
        let rig = app.world().get::<OrbitCameraRig>(camera).unwrap();
        assert_eq!(rig.previous_pointer_position(), Some(Vec2::new(600.0, 400.0)));
        assert_eq!(*app.world().get::<Transform>(camera).unwrap(), before);
    }

    #[test]
    fn test_invalid_settings_edit_is_rolled_back() {
        let mut app = sampling_app(true);
        let camera = spawn_rig(&mut app);
        app.update();

        app.world_mut()
            .get_mut::<OrbitCameraRig>(camera)
            .unwrap()
            .settings
            .max_vertical_rotation_angle = 120.0;
        app.update();

        let rig = app.world().get::<OrbitCameraRig>(camera).unwrap();
        assert_eq!(rig.settings, OrbitRigSettings::default());
    }
}
