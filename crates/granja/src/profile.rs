//! Movement profiles for each locomotion mode.
//!
//! A profile bundles the kinematic limits and camera framing used while a
//! given kind of entity is being controlled. The set of modes is closed:
//! adding a mode means extending [`LocomotionMode`] and [`ProfileTable`],
//! and every `match` over modes is checked by the compiler.

use std::{fmt, path::Path, str::FromStr};

use glam::Vec3;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Locomotion mode of the current control target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum LocomotionMode {
    /// Walking avatar.
    #[default]
    Foot,
    /// Riding a horse.
    Horse,
    /// Riding a cow.
    Cow,
}

impl LocomotionMode {
    /// Every mode.
    pub const ALL: [LocomotionMode; 3] = [
        LocomotionMode::Foot,
        LocomotionMode::Horse,
        LocomotionMode::Cow,
    ];

    /// Stable string key, as used by scene descriptions and config files.
    pub fn key(self) -> &'static str {
        match self {
            LocomotionMode::Foot => "foot",
            LocomotionMode::Horse => "horse",
            LocomotionMode::Cow => "cow",
        }
    }
}

impl fmt::Display for LocomotionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for LocomotionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        LocomotionMode::ALL
            .into_iter()
            .find(|mode| mode.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownProfile { key: s.to_string() })
    }
}

/// Kinematic and camera parameters for one locomotion mode.
#[derive(Clone, Debug, PartialEq)]
pub struct MovementProfile {
    /// Walking speed in world units per second.
    pub base_speed: f32,
    /// Speed while boost is held.
    pub boost_speed: f32,
    /// Turn rate in radians per second.
    pub turn_speed: f32,
    /// Fraction of the speed used when backing up.
    pub backward_factor: f32,
    /// Horizontal bound: x and z are clamped to `[-limit, limit]`.
    pub position_limit: f32,
    /// Camera offset in the target's yaw frame.
    pub camera_offset: Vec3,
    /// Look-at offset from the target position (world aligned).
    pub look_offset: Vec3,
    /// Fraction of the camera error remaining after one second.
    /// Smaller values catch up faster.
    pub camera_smoothing: f32,
    /// Status line shown while this mode is active.
    pub status: String,
    /// Tip line shown while this mode is active.
    pub tip: String,
}

impl MovementProfile {
    /// Default walking profile.
    pub fn foot() -> Self {
        Self {
            base_speed: 5.0,
            boost_speed: 8.0,
            turn_speed: 3.2,
            backward_factor: 0.6,
            position_limit: 32.0,
            camera_offset: Vec3::new(0.0, 4.5, 8.0),
            look_offset: Vec3::new(0.0, 2.0, 0.0),
            camera_smoothing: 0.0015,
            status: "Camina por la granja con WASD o las flechas. Haz clic en un caballo o vaca para montarlos.".to_string(),
            tip: "Haz clic en un caballo o una vaca para montarlos. Espacio para correr, Esc para desmontar.".to_string(),
        }
    }

    /// Default horse riding profile.
    pub fn horse() -> Self {
        Self {
            base_speed: 6.5,
            boost_speed: 12.0,
            turn_speed: 2.4,
            backward_factor: 0.5,
            position_limit: 32.0,
            camera_offset: Vec3::new(0.0, 5.8, 11.0),
            look_offset: Vec3::new(0.0, 2.6, 0.0),
            camera_smoothing: 0.001,
            status: "¡Estás montando un caballo! Usa WASD o las flechas y mantén espacio para galopar.".to_string(),
            tip: "Mantén espacio para galopar rápido. Presiona Esc para bajar del caballo.".to_string(),
        }
    }

    /// Default cow riding profile.
    pub fn cow() -> Self {
        Self {
            base_speed: 4.8,
            boost_speed: 8.0,
            turn_speed: 1.7,
            backward_factor: 0.5,
            position_limit: 32.0,
            camera_offset: Vec3::new(0.0, 5.2, 9.5),
            look_offset: Vec3::new(0.0, 2.3, 0.0),
            camera_smoothing: 0.0012,
            status: "¡Montas una vaca! WASD o las flechas para pasearla y espacio para trotar más rápido.".to_string(),
            tip: "Las vacas son tranquilas: mantén espacio para trotar. Presiona Esc para desmontar.".to_string(),
        }
    }

    /// Speed for the current boost state.
    pub fn speed(&self, boost: bool) -> f32 {
        if boost {
            self.boost_speed
        } else {
            self.base_speed
        }
    }

    fn validate(&self, mode: LocomotionMode) -> Result<()> {
        let invalid = |detail: String| Error::InvalidProfile {
            mode: mode.key(),
            detail,
        };

        if !(self.base_speed > 0.0 && self.boost_speed > 0.0) {
            return Err(invalid(format!(
                "speeds must be positive (base {}, boost {})",
                self.base_speed, self.boost_speed
            )));
        }
        if !(self.turn_speed >= 0.0 && self.backward_factor >= 0.0) {
            return Err(invalid(format!(
                "turn speed and backward factor must not be negative (turn {}, backward {})",
                self.turn_speed, self.backward_factor
            )));
        }
        if !(self.position_limit > 0.0) {
            return Err(invalid(format!(
                "position limit must be positive, got {}",
                self.position_limit
            )));
        }
        if !(self.camera_smoothing > 0.0 && self.camera_smoothing < 1.0) {
            return Err(invalid(format!(
                "camera smoothing must be in (0, 1), got {}",
                self.camera_smoothing
            )));
        }
        Ok(())
    }

    fn apply(&mut self, overrides: ProfileOverride) {
        let ProfileOverride {
            base_speed,
            boost_speed,
            turn_speed,
            backward_factor,
            position_limit,
            camera_offset,
            look_offset,
            camera_smoothing,
            status,
            tip,
        } = overrides;

        if let Some(v) = base_speed {
            self.base_speed = v;
        }
        if let Some(v) = boost_speed {
            self.boost_speed = v;
        }
        if let Some(v) = turn_speed {
            self.turn_speed = v;
        }
        if let Some(v) = backward_factor {
            self.backward_factor = v;
        }
        if let Some(v) = position_limit {
            self.position_limit = v;
        }
        if let Some(v) = camera_offset {
            self.camera_offset = v;
        }
        if let Some(v) = look_offset {
            self.look_offset = v;
        }
        if let Some(v) = camera_smoothing {
            self.camera_smoothing = v;
        }
        if let Some(v) = status {
            self.status = v;
        }
        if let Some(v) = tip {
            self.tip = v;
        }
    }
}

/// Profiles for every locomotion mode.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileTable {
    foot: MovementProfile,
    horse: MovementProfile,
    cow: MovementProfile,
}

impl Default for ProfileTable {
    fn default() -> Self {
        Self {
            foot: MovementProfile::foot(),
            horse: MovementProfile::horse(),
            cow: MovementProfile::cow(),
        }
    }
}

impl ProfileTable {
    /// Look up the profile for a mode.
    pub fn get(&self, mode: LocomotionMode) -> &MovementProfile {
        match mode {
            LocomotionMode::Foot => &self.foot,
            LocomotionMode::Horse => &self.horse,
            LocomotionMode::Cow => &self.cow,
        }
    }

    fn get_mut(&mut self, mode: LocomotionMode) -> &mut MovementProfile {
        match mode {
            LocomotionMode::Foot => &mut self.foot,
            LocomotionMode::Horse => &mut self.horse,
            LocomotionMode::Cow => &mut self.cow,
        }
    }

    /// Replace the profile for a mode.
    pub fn with(mut self, mode: LocomotionMode, profile: MovementProfile) -> Self {
        *self.get_mut(mode) = profile;
        self
    }

    /// Check every profile for values that would break the integrator.
    pub fn validate(&self) -> Result<()> {
        for mode in LocomotionMode::ALL {
            self.get(mode).validate(mode)?;
        }
        Ok(())
    }

    /// Build a table from the defaults plus RON overrides.
    ///
    /// Every field is optional; modes and fields that are not mentioned
    /// keep their default values.
    ///
    /// ```
    /// let table = granja::ProfileTable::from_ron_str("(horse: (boost_speed: 15.0))").unwrap();
    /// assert_eq!(table.get(granja::LocomotionMode::Horse).boost_speed, 15.0);
    /// ```
    pub fn from_ron_str(source: &str) -> Result<Self> {
        let overrides: TableOverride = ron::Options::default()
            .with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
            .from_str(source)?;

        let mut table = Self::default();
        for (mode, profile) in [
            (LocomotionMode::Foot, overrides.foot),
            (LocomotionMode::Horse, overrides.horse),
            (LocomotionMode::Cow, overrides.cow),
        ] {
            if let Some(profile) = profile {
                table.get_mut(mode).apply(profile);
            }
        }

        table.validate()?;
        Ok(table)
    }

    /// Load RON overrides from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| Error::Config {
            origin: path.display().to_string(),
            message: e.to_string(),
        })?;

        Self::from_ron_str(&source).map_err(|e| match e {
            Error::Config { message, .. } => Error::Config {
                origin: path.display().to_string(),
                message,
            },
            other => other,
        })
    }
}

/// On-disk shape of the override file.
#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct TableOverride {
    foot: Option<ProfileOverride>,
    horse: Option<ProfileOverride>,
    cow: Option<ProfileOverride>,
}

#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct ProfileOverride {
    base_speed: Option<f32>,
    boost_speed: Option<f32>,
    turn_speed: Option<f32>,
    backward_factor: Option<f32>,
    position_limit: Option<f32>,
    camera_offset: Option<Vec3>,
    look_offset: Option<Vec3>,
    camera_smoothing: Option<f32>,
    status: Option<String>,
    tip: Option<String>,
}
