//! Interactive farm viewer.
//!
//! Walk around the farm, click a horse or a cow to ride it, and press Esc
//! to get off. All simulation lives in the `granja` crate; this binary only
//! renders it and feeds it input.

mod farm;
mod hud;
mod input;
mod launch_params;
mod scene;

use bevy::prelude::*;
use farm::FarmPlugin;
use hud::HudPlugin;
use input::FarmInputPlugin;

/// Per-frame ordering: input is forwarded before the controller ticks, and
/// the scene mirrors the controller after it.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FarmSet {
    Input,
    Simulate,
    Sync,
}

/// Plugin for the main application.
pub struct AppPlugin;

impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (FarmSet::Input, FarmSet::Simulate, FarmSet::Sync).chain(),
        )
        .add_plugins((FarmInputPlugin, FarmPlugin, HudPlugin))
        .add_systems(Startup, scene::setup_farm);
    }
}

fn main() {
    // Initialize tracing for native platforms.
    #[cfg(not(target_family = "wasm"))]
    {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    // Initialize tracing for WASM (logs to browser console).
    #[cfg(target_family = "wasm")]
    {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
    }

    let params = launch_params::parse();

    let mut app = App::new();

    #[allow(unused_mut)]
    let mut window = Window {
        title: "granja".to_string(),
        resolution: (1280, 720).into(),
        position: WindowPosition::Centered(MonitorSelection::Primary),
        ..Default::default()
    };

    // WASM: Fit canvas to parent element and prevent browser event handling.
    #[cfg(target_family = "wasm")]
    {
        window.fit_canvas_to_parent = true;
        window.prevent_default_event_handling = true;
    }

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(window),
        ..Default::default()
    }))
    .insert_resource(params)
    .add_plugins(AppPlugin)
    .run();
}
