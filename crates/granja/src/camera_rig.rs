//! Third-person camera that trails the control target.
//!
//! The desired camera position is the target position plus the profile's
//! camera offset rotated by the target yaw. On mount and dismount the camera
//! snaps there; every other frame it is exponentially damped toward it. The
//! look-at point is recomputed every frame without damping.

use glam::{Quat, Vec3};

use crate::{profile::MovementProfile, registry::Body};

/// Camera transform consumed by the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraView {
    /// Eye position.
    pub position: Vec3,
    /// Point the camera looks at.
    pub look_at: Vec3,
}

impl CameraView {
    /// Unit view direction, falling back to -Z if eye and target coincide.
    pub fn forward(&self) -> Vec3 {
        (self.look_at - self.position).normalize_or(Vec3::NEG_Z)
    }
}

impl Default for CameraView {
    fn default() -> Self {
        Self {
            position: Vec3::new(25.0, 18.0, 25.0),
            look_at: Vec3::ZERO,
        }
    }
}

/// Perspective projection parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lens {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width over height.
    pub aspect: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
}

impl Default for Lens {
    fn default() -> Self {
        Self {
            fov_y: 60f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 400.0,
        }
    }
}

/// Offsets in use for the current control target.
///
/// Copied from the active profile on every mount or dismount and held
/// constant until the next one.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraFollowState {
    /// Camera offset in the target's yaw frame.
    pub offset: Vec3,
    /// Look-at offset from the target position.
    pub look_offset: Vec3,
}

/// Follow camera state.
#[derive(Clone, Debug)]
pub struct CameraRig {
    view: CameraView,
    lens: Lens,
    follow: CameraFollowState,
    smoothing: f32,
}

impl CameraRig {
    /// Rig with the given lens, framing nothing until the first
    /// [`retarget`](Self::retarget).
    pub fn new(lens: Lens) -> Self {
        Self {
            view: CameraView::default(),
            lens,
            follow: CameraFollowState::default(),
            smoothing: 0.001,
        }
    }

    /// Current camera transform.
    pub fn view(&self) -> &CameraView {
        &self.view
    }

    /// Projection parameters.
    pub fn lens(&self) -> &Lens {
        &self.lens
    }

    /// Offsets currently applied.
    pub fn follow_state(&self) -> &CameraFollowState {
        &self.follow
    }

    /// Update the aspect ratio after a viewport resize.
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.lens.aspect = aspect;
        }
    }

    /// Take the framing of a new profile and snap onto `target`.
    pub fn retarget(&mut self, profile: &MovementProfile, target: &Body) {
        self.follow = CameraFollowState {
            offset: profile.camera_offset,
            look_offset: profile.look_offset,
        };
        self.smoothing = profile.camera_smoothing;
        self.snap(target);
    }

    /// Jump straight to the desired position for `target`.
    pub fn snap(&mut self, target: &Body) {
        self.view = CameraView {
            position: self.desired_position(target),
            look_at: self.look_target(target),
        };
    }

    /// Damp the camera toward the desired position for `target`.
    pub fn follow(&mut self, target: &Body, delta: f32) {
        if delta > 0.0 {
            let desired = self.desired_position(target);
            let t = damping_factor(self.smoothing, delta);
            self.view.position = self.view.position.lerp(desired, t);
        }
        self.view.look_at = self.look_target(target);
    }

    /// Camera position the rig converges to for `target`.
    pub fn desired_position(&self, target: &Body) -> Vec3 {
        target.position + Quat::from_rotation_y(target.yaw) * self.follow.offset
    }

    fn look_target(&self, target: &Body) -> Vec3 {
        target.position + self.follow.look_offset
    }
}

/// Frame-rate independent lerp factor: `1 - smoothing^delta`.
pub fn damping_factor(smoothing: f32, delta: f32) -> f32 {
    1.0 - smoothing.powf(delta)
}
