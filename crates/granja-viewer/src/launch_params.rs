//! Launch parameter parsing for the viewer.
//!
//! On native, parameters are parsed from command-line arguments using clap.
//! On WASM, defaults are used (CLI argument parsing is not available).

use std::path::PathBuf;

use bevy::prelude::*;
use granja::LocomotionMode;

/// Default avatar spawn (x, z), next to the path.
const DEFAULT_START: (f32, f32) = (-2.0, 10.0);

/// Launch parameters for the viewer.
#[derive(Resource, Debug, Clone)]
pub struct LaunchParams {
    /// Avatar spawn position on the ground plane (x, z).
    pub start: (f32, f32),
    /// Avatar spawn yaw in radians.
    pub start_yaw: f32,
    /// RON file with movement profile overrides.
    pub profiles: Option<PathBuf>,
    /// Start riding the first mount of this kind.
    pub mount: Option<LocomotionMode>,
}

impl Default for LaunchParams {
    fn default() -> Self {
        Self {
            start: DEFAULT_START,
            start_yaw: 0.0,
            profiles: None,
            mount: None,
        }
    }
}

#[cfg(not(target_family = "wasm"))]
mod native {
    use clap::Parser;

    use super::*;

    /// Parse a mount kind. Walking is not a mount.
    fn parse_mount(s: &str) -> Result<LocomotionMode, String> {
        match s.parse::<LocomotionMode>() {
            Ok(LocomotionMode::Foot) => Err("'foot' is not a mount".to_string()),
            Ok(mode) => Ok(mode),
            Err(e) => Err(e.to_string()),
        }
    }

    #[derive(Parser)]
    #[command(about = "Walk around a low-poly farm and ride its animals")]
    struct CliArgs {
        /// Avatar spawn x coordinate.
        #[arg(long, default_value_t = DEFAULT_START.0, allow_negative_numbers = true)]
        start_x: f32,

        /// Avatar spawn z coordinate.
        #[arg(long, default_value_t = DEFAULT_START.1, allow_negative_numbers = true)]
        start_z: f32,

        /// Avatar spawn yaw in degrees.
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        start_yaw: f32,

        /// RON file with movement profile overrides.
        #[arg(long)]
        profiles: Option<PathBuf>,

        /// Start riding the first mount of this kind (horse or cow).
        #[arg(long, value_parser = parse_mount)]
        mount: Option<LocomotionMode>,
    }

    pub fn parse() -> LaunchParams {
        let args = CliArgs::parse();
        LaunchParams {
            start: (args.start_x, args.start_z),
            start_yaw: args.start_yaw.to_radians(),
            profiles: args.profiles,
            mount: args.mount,
        }
    }
}

/// Parse launch parameters from CLI args (native) or use defaults (WASM).
pub fn parse() -> LaunchParams {
    #[cfg(not(target_family = "wasm"))]
    {
        native::parse()
    }
    #[cfg(target_family = "wasm")]
    {
        LaunchParams::default()
    }
}
