//! Entity arena and mount registrations.
//!
//! Entities are identified by stable [`EntityId`]s into a [`World`] arena and
//! are never removed. Mount metadata lives in a separate [`Registry`] keyed by
//! id, so nothing is attached to the render representation.

use std::fmt;

use glam::{Quat, Vec3};

use crate::{
    error::{Error, Result},
    picking::PickBox,
    profile::LocomotionMode,
};

/// Stable handle to an entity in the [`World`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    /// Raw index into the arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Positionable, yaw-rotatable entity state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    /// World position.
    pub position: Vec3,
    /// Rotation around the world up axis, in radians.
    pub yaw: f32,
    /// Whether the renderer should draw this entity.
    pub visible: bool,
}

impl Body {
    /// A visible body at `position` facing `yaw`.
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self {
            position,
            yaw,
            visible: true,
        }
    }

    /// Rotation corresponding to the yaw.
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    /// Unit vector along the facing direction, `(sin yaw, 0, cos yaw)`.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, self.yaw.cos())
    }
}

/// Arena of every controllable entity. Slot 0 is always the avatar.
#[derive(Clone, Debug)]
pub struct World {
    bodies: Vec<Body>,
}

impl World {
    /// Create a world containing only the avatar.
    pub fn new(avatar: Body) -> Self {
        Self {
            bodies: vec![avatar],
        }
    }

    /// Id of the avatar.
    pub fn avatar(&self) -> EntityId {
        EntityId(0)
    }

    /// Add an entity and return its id.
    #[allow(clippy::cast_possible_truncation)]
    pub fn spawn(&mut self, body: Body) -> EntityId {
        let id = EntityId(self.bodies.len() as u32);
        self.bodies.push(body);
        id
    }

    /// Look up an entity.
    pub fn get(&self, id: EntityId) -> Option<&Body> {
        self.bodies.get(id.index())
    }

    /// Look up an entity mutably.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Body> {
        self.bodies.get_mut(id.index())
    }

    /// Whether the id refers to an existing entity.
    pub fn contains(&self, id: EntityId) -> bool {
        id.index() < self.bodies.len()
    }

    /// Number of entities, avatar included.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Always false: the avatar exists for the world's lifetime.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Iterate over all entities.
    #[allow(clippy::cast_possible_truncation)]
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Body)> {
        self.bodies
            .iter()
            .enumerate()
            .map(|(i, body)| (EntityId(i as u32), body))
    }
}

/// Static metadata binding a mountable entity to its locomotion mode.
#[derive(Clone, Debug, PartialEq)]
pub struct MountRegistration {
    /// The mountable entity.
    pub entity: EntityId,
    /// Profile used while mounted.
    pub mode: LocomotionMode,
    /// Display label ("caballo", "vaca", ...).
    pub label: String,
    /// Pick volume in the entity's local frame.
    pub bounds: Vec<PickBox>,
}

/// All mount registrations, populated once at setup.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    mounts: Vec<MountRegistration>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mountable entity.
    pub fn register(
        &mut self,
        world: &World,
        entity: EntityId,
        mode: LocomotionMode,
        label: impl Into<String>,
        bounds: Vec<PickBox>,
    ) -> Result<&MountRegistration> {
        if !world.contains(entity) {
            return Err(Error::UnknownEntity(entity));
        }
        if entity == world.avatar() {
            return Err(Error::AvatarNotMountable);
        }
        if self.get(entity).is_some() {
            return Err(Error::DuplicateMount(entity));
        }

        let label = label.into();
        tracing::debug!("Registered {label} {entity} as {mode} mount");
        self.mounts.push(MountRegistration {
            entity,
            mode,
            label,
            bounds,
        });
        Ok(&self.mounts[self.mounts.len() - 1])
    }

    /// Register a mountable entity using a string profile key.
    pub fn register_by_key(
        &mut self,
        world: &World,
        entity: EntityId,
        key: &str,
        label: impl Into<String>,
        bounds: Vec<PickBox>,
    ) -> Result<&MountRegistration> {
        let mode = key.parse()?;
        self.register(world, entity, mode, label, bounds)
    }

    /// Registration for an entity, if it is mountable.
    pub fn get(&self, entity: EntityId) -> Option<&MountRegistration> {
        self.mounts.iter().find(|m| m.entity == entity)
    }

    /// Iterate over all registrations in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &MountRegistration> {
        self.mounts.iter()
    }

    /// Number of mountable entities.
    pub fn len(&self) -> usize {
        self.mounts.len()
    }

    /// Whether there are no mountable entities.
    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }
}
