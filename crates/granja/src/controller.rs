//! The locomotion & mount-switching controller.
//!
//! [`FarmController`] owns every piece of mutable core state. Hosts drive it
//! through four entry points:
//!
//! - [`FarmController::on_key_down`] / [`FarmController::on_key_up`]
//! - [`FarmController::on_pointer_down`]
//! - [`FarmController::tick`], once per rendered frame
//!
//! Events take effect immediately; their visible consequences (movement,
//! camera follow) appear after the next `tick`. Within a tick the target is
//! integrated before the camera follows it.

use crate::{
    camera_rig::{CameraRig, CameraView, Lens},
    input::{InputState, KeySource, LogicalKey},
    kinematics::{self, Vertical},
    mount::{MountMachine, MountState, Transition},
    picking::{self, PointerEvent, Ray},
    profile::{LocomotionMode, MovementProfile, ProfileTable},
    registry::{Body, EntityId, Registry, World},
    status::StatusSnapshot,
};

/// Single owner of the controller state.
#[derive(Clone, Debug)]
pub struct FarmController {
    world: World,
    registry: Registry,
    profiles: ProfileTable,
    input: InputState,
    mount: MountMachine,
    camera: CameraRig,
    status: StatusSnapshot,
    status_revision: u64,
}

impl FarmController {
    /// Start on foot, with the camera snapped behind the avatar.
    pub fn new(world: World, registry: Registry, profiles: ProfileTable) -> Self {
        Self::with_lens(world, registry, profiles, Lens::default())
    }

    /// Like [`new`](Self::new) with explicit projection parameters.
    pub fn with_lens(world: World, registry: Registry, profiles: ProfileTable, lens: Lens) -> Self {
        let mut controller = Self {
            world,
            registry,
            profiles,
            input: InputState::default(),
            mount: MountMachine::new(),
            camera: CameraRig::new(lens),
            status: StatusSnapshot::default(),
            status_revision: 0,
        };
        controller.refresh_target();
        tracing::info!(
            "Controller ready with {} mountable entities",
            controller.registry.len()
        );
        controller
    }

    // ------------------------------------------------------------------------
    // Entry points
    // ------------------------------------------------------------------------

    /// Handle a key press given its platform identifier.
    ///
    /// Returns the logical key so the host can decide whether to suppress
    /// the platform default (see [`LogicalKey::suppresses_default`]).
    pub fn on_key_down(&mut self, key_name: &str) -> Option<LogicalKey> {
        let (key, source) = LogicalKey::binding(key_name)?;
        self.press_from(key, source);
        Some(key)
    }

    /// Handle a key release given its platform identifier.
    ///
    /// Only that physical key is released: with both `"w"` and `"ArrowUp"`
    /// down, releasing `"w"` keeps moving forward.
    pub fn on_key_up(&mut self, key_name: &str) -> Option<LogicalKey> {
        let (key, source) = LogicalKey::binding(key_name)?;
        self.input.release_from(key, source);
        Some(key)
    }

    /// Press a logical key. Dismount fires immediately instead of being held.
    pub fn press(&mut self, key: LogicalKey) {
        self.press_from(key, KeySource::LOGICAL);
    }

    fn press_from(&mut self, key: LogicalKey, source: KeySource) {
        if key == LogicalKey::Dismount {
            self.dismount();
            return;
        }
        self.input.press_from(key, source);
    }

    /// Release a logical key, whichever physical keys were holding it.
    pub fn release(&mut self, key: LogicalKey) {
        self.input.release(key);
    }

    /// Release every held key, e.g. when the window loses focus.
    pub fn focus_lost(&mut self) {
        self.input.clear();
    }

    /// Handle a pointer press: pick and mount what is under the cursor.
    ///
    /// Ignored while mounted. Returns the mounted entity on success.
    pub fn on_pointer_down(&mut self, pointer: PointerEvent) -> Option<EntityId> {
        let hit = self.pick(pointer)?;
        self.mount(hit)
    }

    /// Resolve a pointer press to a mountable entity without mounting it.
    ///
    /// Always `None` while mounted.
    pub fn pick(&self, pointer: PointerEvent) -> Option<EntityId> {
        if self.mount.is_mounted() {
            tracing::debug!("Ignoring pick while mounted");
            return None;
        }
        if self.registry.is_empty() {
            return None;
        }

        let ndc = pointer.to_ndc()?;
        let ray = Ray::from_viewport(ndc, self.camera.view(), self.camera.lens());
        match picking::pick(&ray, &self.registry, &self.world) {
            Some(hit) => {
                tracing::debug!("Picked {} at distance {:.2}", hit.entity, hit.distance);
                Some(hit.entity)
            }
            None => {
                tracing::debug!("Pick missed at ({:.2}, {:.2})", ndc.x, ndc.y);
                None
            }
        }
    }

    /// Advance one frame: integrate the control target, then follow it
    /// with the camera.
    pub fn tick(&mut self, delta: f32) {
        if !delta.is_finite() || delta < 0.0 {
            tracing::debug!("Skipping tick with delta {delta}");
            return;
        }

        let target = self.control_target();
        let vertical = if self.mount.is_mounted() {
            Vertical::Free
        } else {
            Vertical::Pinned
        };
        let profile = self.profiles.get(self.mount.active_mode());
        let Some(body) = self.world.get_mut(target) else {
            return;
        };

        kinematics::integrate(body, &self.input, profile, delta, vertical);
        self.camera.follow(body, delta);
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    /// Mount a registered entity. No-op while mounted or for non-mounts.
    pub fn mount(&mut self, entity: EntityId) -> Option<EntityId> {
        let transition = self.mount.mount(&mut self.world, &self.registry, entity)?;
        self.apply(transition);
        Some(entity)
    }

    /// Dismount. No-op while on foot.
    pub fn dismount(&mut self) -> bool {
        match self.mount.dismount(&mut self.world, &self.profiles) {
            Some(transition) => {
                self.apply(transition);
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, transition: Transition) {
        tracing::trace!("Applying {transition:?}");
        self.refresh_target();
    }

    /// Snap the camera to the control target and republish the status.
    fn refresh_target(&mut self) {
        let target = self.control_target();
        let profile = self.profiles.get(self.mount.active_mode());
        if let Some(body) = self.world.get(target) {
            self.camera.retarget(profile, body);
        }

        self.status = StatusSnapshot::for_state(self.mount.state(), &self.registry, &self.profiles);
        self.status_revision += 1;
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Entity arena.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mount registrations.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Profile table.
    pub fn profiles(&self) -> &ProfileTable {
        &self.profiles
    }

    /// Held keys.
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Current mount state.
    pub fn state(&self) -> MountState {
        self.mount.state()
    }

    /// Whether a mount is being ridden.
    pub fn is_mounted(&self) -> bool {
        self.mount.is_mounted()
    }

    /// The ridden entity, if any.
    pub fn current_mount(&self) -> Option<EntityId> {
        self.mount.current_mount()
    }

    /// Entity receiving kinematic input.
    pub fn control_target(&self) -> EntityId {
        self.mount.control_target(&self.world)
    }

    /// Body of the control target.
    pub fn control_body(&self) -> Option<&Body> {
        self.world.get(self.control_target())
    }

    /// Locomotion mode of the control target.
    pub fn active_mode(&self) -> LocomotionMode {
        self.mount.active_mode()
    }

    /// Profile of the control target.
    pub fn active_profile(&self) -> &MovementProfile {
        self.profiles.get(self.active_mode())
    }

    /// Camera transform for the renderer.
    pub fn camera(&self) -> &CameraView {
        self.camera.view()
    }

    /// Full camera rig, including follow offsets.
    pub fn camera_rig(&self) -> &CameraRig {
        &self.camera
    }

    /// Projection parameters.
    pub fn lens(&self) -> &Lens {
        self.camera.lens()
    }

    /// Update the projection aspect ratio after a resize.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.camera.set_aspect(aspect);
    }

    /// Current HUD text.
    pub fn status(&self) -> &StatusSnapshot {
        &self.status
    }

    /// Counter bumped on every status change.
    pub fn status_revision(&self) -> u64 {
        self.status_revision
    }
}
