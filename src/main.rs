use std::env;
use std::fs::{create_dir_all, File};
use std::path::PathBuf;
use std::sync::Mutex;
use bevy::log::{BoxedLayer, LogPlugin};
use bevy::prelude::*;
use bevy_inspector_egui::bevy_egui::EguiPlugin;
use bevy_inspector_egui::quick::WorldInspectorPlugin;
use chrono::Local;
use tracing_subscriber::Layer;
use rig_logic::debug_logic::inspector_visible;
use rig_logic::RigLogicPlugin;
use rig_models::config::GlobalConfig;
use rig_models::debug::BuildInfo;
use rig_models::RigCorePlugin;

const APP_NAME: &str = env!("CARGO_PKG_NAME");
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const LOG_FILTER_ENV: &str = "RIG_LOG_FILTER";
const LOG_DIR_ENV: &str = "RIG_LOG_DIR";
const DEFAULT_LOG_FILTER: &str = "wgpu=error,naga=warn,rig_models=debug,rig_logic=debug";

fn main() {
    // .env is optional, the variables may come from the shell as well
    let _ = dotenvy::dotenv();

    let global_config = GlobalConfig::new();

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: String::from("Freebody Camera"),
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    filter: env::var(LOG_FILTER_ENV).unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
                    custom_layer: file_log_layer,
                    ..default()
                }),
        )
        .insert_resource(global_config)
        .insert_resource(BuildInfo {
            app_name: APP_NAME,
            app_version: APP_VERSION,
            bevy_version: "0.17.3",
        })
        .add_plugins(ManagerPlugin)
        .run();
}

/// Bundles all plugins of the project. Core resources first, then the logic, then the
/// developer tools.
struct ManagerPlugin;

impl Plugin for ManagerPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((RigCorePlugin, RigLogicPlugin));
        app.add_plugins(EguiPlugin::default());
        app.add_plugins(WorldInspectorPlugin::new().run_if(inspector_visible));
    }
}

/// Extra log layer that writes plain text into `logs/<app>_<timestamp>.log`.
/// The directory can be moved with `RIG_LOG_DIR`. Logging to the console keeps working
/// when the file cannot be created.
fn file_log_layer(_app: &mut App) -> Option<BoxedLayer> {
    let dir = env::var_os(LOG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("logs"));

    if let Err(err) = create_dir_all(&dir) {
        eprintln!("Unable to create log directory {}: {err}", dir.display());
        return None;
    }

    let path = dir.join(format!("{}_{}.log", APP_NAME, Local::now().format("%Y-%m-%d_%H-%M-%S")));
    let file = match File::create(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Unable to create log file {}: {err}", path.display());
            return None;
        }
    };

    Some(
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .boxed(),
    )
}
