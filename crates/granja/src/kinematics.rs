//! Per-frame keyboard kinematics.
//!
//! Turning and translation are applied directly to the control target's
//! [`Body`]; there is no velocity state and no physics.

use crate::{
    input::{InputState, LogicalKey},
    profile::MovementProfile,
    registry::Body,
};

/// Height of the ground plane.
pub const GROUND_HEIGHT: f32 = 0.0;

/// How the integrator treats the vertical axis of the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Vertical {
    /// Reset `y` to [`GROUND_HEIGHT`] every frame (the avatar).
    Pinned,
    /// Leave `y` alone (mounts are placed on the ground once at setup).
    Free,
}

/// Signed speed multiplier from the forward/backward keys.
///
/// Holding both adds up (`1 - backward_factor`) rather than cancelling.
pub fn move_factor(input: &InputState, profile: &MovementProfile) -> f32 {
    let mut factor = 0.0;
    if input.is_held(LogicalKey::Forward) {
        factor += 1.0;
    }
    if input.is_held(LogicalKey::Backward) {
        factor -= profile.backward_factor;
    }
    factor
}

/// Yaw change for this frame.
///
/// Left is checked first: holding both left and right turns left.
pub fn turn_delta(input: &InputState, profile: &MovementProfile, delta: f32) -> f32 {
    if input.is_held(LogicalKey::Left) {
        profile.turn_speed * delta
    } else if input.is_held(LogicalKey::Right) {
        -profile.turn_speed * delta
    } else {
        0.0
    }
}

/// Advance `body` by one frame of held input.
pub fn integrate(
    body: &mut Body,
    input: &InputState,
    profile: &MovementProfile,
    delta: f32,
    vertical: Vertical,
) {
    body.yaw += turn_delta(input, profile, delta);

    let factor = move_factor(input, profile);
    if factor != 0.0 {
        let speed = profile.speed(input.is_held(LogicalKey::Boost));
        body.position += body.forward() * (factor * speed * delta);
        clamp_horizontal(body, profile.position_limit);
    }

    if vertical == Vertical::Pinned {
        body.position.y = GROUND_HEIGHT;
    }
}

/// Clamp `x` and `z` independently to `[-limit, limit]`.
pub fn clamp_horizontal(body: &mut Body, limit: f32) {
    body.position.x = body.position.x.clamp(-limit, limit);
    body.position.z = body.position.z.clamp(-limit, limit);
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn held(keys: &[LogicalKey]) -> InputState {
        let mut input = InputState::default();
        for key in keys {
            input.press(*key);
        }
        input
    }

    #[test]
    fn test_forward_one_second_on_foot() {
        let mut body = Body::new(Vec3::ZERO, 0.0);
        let foot = MovementProfile::foot();
        integrate(
            &mut body,
            &held(&[LogicalKey::Forward]),
            &foot,
            1.0,
            Vertical::Pinned,
        );
        assert!((body.position - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-5);
    }

    #[test]
    fn test_boost_uses_boost_speed() {
        let mut body = Body::new(Vec3::ZERO, 0.0);
        let horse = MovementProfile::horse();
        integrate(
            &mut body,
            &held(&[LogicalKey::Forward, LogicalKey::Boost]),
            &horse,
            0.5,
            Vertical::Free,
        );
        assert!((body.position.z - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_backward_is_scaled() {
        let mut body = Body::new(Vec3::ZERO, 0.0);
        let foot = MovementProfile::foot();
        integrate(
            &mut body,
            &held(&[LogicalKey::Backward]),
            &foot,
            1.0,
            Vertical::Pinned,
        );
        assert!((body.position.z + 3.0).abs() < 1e-5);
    }

    // Pinned behavior: forward and backward together are additive.
    #[test]
    fn test_forward_and_backward_add_up() {
        let foot = MovementProfile::foot();
        let input = held(&[LogicalKey::Forward, LogicalKey::Backward]);
        assert!((move_factor(&input, &foot) - 0.4).abs() < 1e-6);

        let mut body = Body::new(Vec3::ZERO, 0.0);
        integrate(&mut body, &input, &foot, 1.0, Vertical::Pinned);
        assert!((body.position.z - 2.0).abs() < 1e-5);
    }

    // Pinned behavior: left wins when both turn keys are held.
    #[test]
    fn test_left_takes_precedence_over_right() {
        let foot = MovementProfile::foot();
        let mut body = Body::new(Vec3::ZERO, 0.0);
        integrate(
            &mut body,
            &held(&[LogicalKey::Left, LogicalKey::Right]),
            &foot,
            0.5,
            Vertical::Pinned,
        );
        assert!((body.yaw - 1.6).abs() < 1e-6);
    }

    #[test]
    fn test_right_turns_negative() {
        let foot = MovementProfile::foot();
        let mut body = Body::new(Vec3::ZERO, 0.0);
        integrate(
            &mut body,
            &held(&[LogicalKey::Right]),
            &foot,
            0.25,
            Vertical::Pinned,
        );
        assert!((body.yaw + 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_turn_applies_before_translation() {
        let foot = MovementProfile::foot();
        let mut body = Body::new(Vec3::ZERO, 0.0);
        let input = held(&[LogicalKey::Left, LogicalKey::Forward]);
        integrate(&mut body, &input, &foot, 0.5, Vertical::Pinned);

        let expected = Vec3::new(1.6f32.sin(), 0.0, 1.6f32.cos()) * 2.5;
        assert!((body.position - expected).length() < 1e-5);
    }

    #[test]
    fn test_position_is_clamped() {
        let horse = MovementProfile::horse();
        let mut body = Body::new(Vec3::new(30.0, 0.0, -31.0), std::f32::consts::FRAC_PI_4);
        let input = held(&[LogicalKey::Forward, LogicalKey::Boost]);
        for _ in 0..120 {
            integrate(&mut body, &input, &horse, 1.0 / 30.0, Vertical::Free);
            assert!(body.position.x.abs() <= horse.position_limit);
            assert!(body.position.z.abs() <= horse.position_limit);
        }
        assert_eq!(body.position.x, horse.position_limit);
    }

    #[test]
    fn test_vertical_pinning() {
        let foot = MovementProfile::foot();
        let idle = InputState::default();

        let mut avatar = Body::new(Vec3::new(0.0, 0.3, 0.0), 0.0);
        integrate(&mut avatar, &idle, &foot, 0.016, Vertical::Pinned);
        assert_eq!(avatar.position.y, GROUND_HEIGHT);

        let mut mount = Body::new(Vec3::new(0.0, 0.3, 0.0), 0.0);
        integrate(&mut mount, &idle, &foot, 0.016, Vertical::Free);
        assert_eq!(mount.position.y, 0.3);
    }

    #[test]
    fn test_idle_input_changes_nothing() {
        let foot = MovementProfile::foot();
        let mut body = Body::new(Vec3::new(1.0, 0.0, 2.0), 0.7);
        let before = body;
        integrate(&mut body, &InputState::default(), &foot, 1.0, Vertical::Pinned);
        assert_eq!(body, before);
    }
}
