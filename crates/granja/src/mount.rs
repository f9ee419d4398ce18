//! Mount/dismount state machine.
//!
//! ```text
//! OnFoot --(pick mountable)--> Mounted(entity)
//! Mounted(entity) --(dismount)--> OnFoot
//! ```
//!
//! Mounting while mounted and dismounting while on foot are no-ops. The
//! avatar is hidden, never removed, while riding.

use std::f32::consts::PI;

use glam::Vec3;

use crate::{
    kinematics::{GROUND_HEIGHT, clamp_horizontal},
    profile::{LocomotionMode, ProfileTable},
    registry::{EntityId, Registry, World},
};

/// Distance behind the mount at which the avatar is placed on dismount.
pub const EXIT_DISTANCE: f32 = 2.0;

/// Who is being controlled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MountState {
    /// The avatar is walking.
    #[default]
    OnFoot,
    /// A registered mount is being ridden.
    Mounted {
        /// The ridden entity.
        entity: EntityId,
        /// Its locomotion mode.
        mode: LocomotionMode,
    },
}

/// A state change that the caller must react to (camera, status).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transition {
    /// The avatar climbed onto `entity`.
    Mounted {
        /// The new control target.
        entity: EntityId,
        /// Its locomotion mode.
        mode: LocomotionMode,
    },
    /// The avatar got off `entity` and now stands at `exit`.
    Dismounted {
        /// The mount that was left behind.
        entity: EntityId,
        /// Where the avatar was placed.
        exit: Vec3,
    },
}

/// Owner of the mount state.
#[derive(Clone, Debug, Default)]
pub struct MountMachine {
    state: MountState,
}

impl MountMachine {
    /// Machine in the initial on-foot state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> MountState {
        self.state
    }

    /// Whether a mount is being ridden.
    pub fn is_mounted(&self) -> bool {
        matches!(self.state, MountState::Mounted { .. })
    }

    /// The ridden entity, if any.
    pub fn current_mount(&self) -> Option<EntityId> {
        match self.state {
            MountState::OnFoot => None,
            MountState::Mounted { entity, .. } => Some(entity),
        }
    }

    /// Entity that receives kinematic input.
    pub fn control_target(&self, world: &World) -> EntityId {
        self.current_mount().unwrap_or_else(|| world.avatar())
    }

    /// Locomotion mode of the control target.
    pub fn active_mode(&self) -> LocomotionMode {
        match self.state {
            MountState::OnFoot => LocomotionMode::Foot,
            MountState::Mounted { mode, .. } => mode,
        }
    }

    /// Climb onto a registered mount.
    ///
    /// Ignored while already mounted or if `entity` is not mountable.
    pub fn mount(
        &mut self,
        world: &mut World,
        registry: &Registry,
        entity: EntityId,
    ) -> Option<Transition> {
        if let MountState::Mounted { entity: current, .. } = self.state {
            tracing::debug!("Ignoring mount of {entity}: already riding {current}");
            return None;
        }
        let Some(registration) = registry.get(entity) else {
            tracing::debug!("Ignoring mount of {entity}: not a registered mount");
            return None;
        };

        let avatar = world.avatar();
        if let Some(body) = world.get_mut(avatar) {
            body.visible = false;
        }

        let mode = registration.mode;
        self.state = MountState::Mounted { entity, mode };
        tracing::info!("Mounted {} {entity} ({mode})", registration.label);
        Some(Transition::Mounted { entity, mode })
    }

    /// Get off the current mount.
    ///
    /// The avatar is placed [`EXIT_DISTANCE`] behind the mount, clamped to
    /// the walking bounds, on the ground, facing the mount's yaw.
    pub fn dismount(&mut self, world: &mut World, profiles: &ProfileTable) -> Option<Transition> {
        let MountState::Mounted { entity, .. } = self.state else {
            tracing::debug!("Ignoring dismount: not mounted");
            return None;
        };

        // Registrations only ever reference spawned entities.
        let mount = *world.get(entity)?;
        let behind = mount.yaw + PI;
        let exit_offset = Vec3::new(behind.sin(), 0.0, behind.cos()) * EXIT_DISTANCE;

        let avatar = world.avatar();
        let body = world.get_mut(avatar)?;
        body.position = mount.position + exit_offset;
        clamp_horizontal(body, profiles.get(LocomotionMode::Foot).position_limit);
        body.position.y = GROUND_HEIGHT;
        body.yaw = mount.yaw;
        body.visible = true;
        let exit = body.position;

        self.state = MountState::OnFoot;
        tracing::info!("Dismounted {entity}, avatar at ({:.1}, {:.1})", exit.x, exit.z);
        Some(Transition::Dismounted { entity, exit })
    }
}
