//! End-to-end controller scenarios.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;
use granja::{
    Body, EntityId, FarmController, LocomotionMode, LogicalKey, PickBox, PointerEvent,
    ProfileTable, Registry, World,
};

const WIDTH: f32 = 1280.0;
const HEIGHT: f32 = 720.0;

fn center_click() -> PointerEvent {
    PointerEvent::new(WIDTH / 2.0, HEIGHT / 2.0, WIDTH, HEIGHT)
}

fn horse_bounds() -> Vec<PickBox> {
    vec![
        PickBox::new(Vec3::new(0.0, 1.7, 0.0), Vec3::new(0.9, 1.2, 3.0)),
        PickBox::new(Vec3::new(0.0, 2.5, 2.4), Vec3::new(0.6, 0.8, 0.8)),
    ]
}

/// Avatar at `avatar_pos`, plus one horse and one cow.
fn farm(avatar_pos: Vec3, horse: Body, cow: Body) -> (FarmController, EntityId, EntityId) {
    let mut world = World::new(Body::new(avatar_pos, 0.0));
    let horse = world.spawn(horse);
    let cow = world.spawn(cow);

    let mut registry = Registry::new();
    registry
        .register(&world, horse, LocomotionMode::Horse, "caballo", horse_bounds())
        .unwrap();
    registry
        .register_by_key(&world, cow, "cow", "vaca", horse_bounds())
        .unwrap();

    (
        FarmController::new(world, registry, ProfileTable::default()),
        horse,
        cow,
    )
}

fn assert_invariants(c: &FarmController) {
    assert_eq!(c.is_mounted(), c.current_mount().is_some());
    assert_eq!(c.control_target() == c.world().avatar(), !c.is_mounted());
    let expected_mode = c
        .current_mount()
        .and_then(|m| c.registry().get(m))
        .map_or(LocomotionMode::Foot, |r| r.mode);
    assert_eq!(c.active_mode(), expected_mode);
    assert_eq!(c.status().mounted, c.is_mounted());
}

#[test]
fn test_forward_one_second_on_foot() {
    let (mut c, _, _) = farm(
        Vec3::ZERO,
        Body::new(Vec3::new(20.0, 0.0, 20.0), 0.0),
        Body::new(Vec3::new(-20.0, 0.0, 20.0), 0.0),
    );
    c.on_key_down("w");
    c.tick(1.0);

    let avatar = c.control_body().unwrap();
    assert!((avatar.position - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-5);
    assert_invariants(&c);
}

#[test]
fn test_both_turn_keys_turn_left() {
    let (mut c, _, _) = farm(
        Vec3::ZERO,
        Body::new(Vec3::new(20.0, 0.0, 20.0), 0.0),
        Body::new(Vec3::new(-20.0, 0.0, 20.0), 0.0),
    );
    c.on_key_down("a");
    c.on_key_down("d");
    c.tick(0.5);

    let turn_speed = c.active_profile().turn_speed;
    assert!((c.control_body().unwrap().yaw - turn_speed * 0.5).abs() < 1e-6);
}

#[test]
fn test_click_center_mounts_horse_in_view() {
    // Avatar at the origin facing +Z: the camera sits at (0, 4.5, 8) looking
    // at (0, 2, 0). A horse straddling the look target fills the center.
    let (mut c, horse, _) = farm(
        Vec3::ZERO,
        Body::new(Vec3::new(0.0, 0.0, 0.5), 0.0),
        Body::new(Vec3::new(-20.0, 0.0, -20.0), 0.0),
    );

    assert_eq!(c.pick(center_click()), Some(horse));
    assert_eq!(c.on_pointer_down(center_click()), Some(horse));
    assert!(c.is_mounted());
    assert_eq!(c.current_mount(), Some(horse));
    assert_eq!(c.active_mode(), LocomotionMode::Horse);
    assert!(!c.world().get(c.world().avatar()).unwrap().visible);
    assert_invariants(&c);
}

#[test]
fn test_click_on_empty_sky_does_nothing() {
    let (mut c, _, _) = farm(
        Vec3::ZERO,
        Body::new(Vec3::new(0.0, 0.0, 0.5), 0.0),
        Body::new(Vec3::new(-20.0, 0.0, -20.0), 0.0),
    );
    let top = PointerEvent::new(WIDTH / 2.0, 0.0, WIDTH, HEIGHT);
    assert_eq!(c.on_pointer_down(top), None);
    assert!(!c.is_mounted());
    assert_eq!(c.status_revision(), 1);
}

#[test]
fn test_click_while_mounted_is_ignored() {
    let (mut c, horse, cow) = farm(
        Vec3::ZERO,
        Body::new(Vec3::new(0.0, 0.0, 0.5), 0.0),
        Body::new(Vec3::new(-20.0, 0.0, -20.0), 0.0),
    );
    c.mount(horse).unwrap();

    let look = c.camera().look_at;
    assert!(c.pick(center_click()).is_none());
    assert!(c.mount(cow).is_none());
    assert_eq!(c.current_mount(), Some(horse));
    assert_eq!(c.camera().look_at, look);
}

#[test]
fn test_dismount_behind_mount_facing_negative_z() {
    let (mut c, horse, _) = farm(
        Vec3::new(-2.0, 0.0, 10.0),
        Body::new(Vec3::new(10.0, 0.0, 10.0), PI),
        Body::new(Vec3::new(-20.0, 0.0, -20.0), 0.0),
    );
    c.mount(horse).unwrap();
    c.on_key_down("Escape");

    let avatar = c.world().get(c.world().avatar()).unwrap();
    assert!((avatar.position - Vec3::new(10.0, 0.0, 12.0)).length() < 1e-4);
    assert!((avatar.yaw - PI).abs() < 1e-6);
    assert!(avatar.visible);
    assert_invariants(&c);
}

#[test]
fn test_mount_then_dismount_round_trip() {
    let (mut c, _, cow) = farm(
        Vec3::new(-2.0, 0.0, 10.0),
        Body::new(Vec3::new(10.0, 0.0, 10.0), PI),
        Body::new(Vec3::new(-12.0, 0.0, 6.0), FRAC_PI_2),
    );
    c.mount(cow).unwrap();
    c.press(LogicalKey::Right);
    c.tick(0.25);
    c.release(LogicalKey::Right);
    let cow_yaw = c.world().get(cow).unwrap().yaw;

    assert!(c.dismount());
    assert_eq!(c.control_target(), c.world().avatar());
    assert_eq!(c.active_mode(), LocomotionMode::Foot);
    assert_eq!(c.active_profile(), c.profiles().get(LocomotionMode::Foot));
    assert!((c.control_body().unwrap().yaw - cow_yaw).abs() < 1e-6);
    assert_eq!(c.status().tip, c.profiles().get(LocomotionMode::Foot).tip);
    assert_invariants(&c);

    // Second dismount is a no-op.
    let revision = c.status_revision();
    let avatar = *c.control_body().unwrap();
    assert!(!c.dismount());
    assert_eq!(c.status_revision(), revision);
    assert_eq!(*c.control_body().unwrap(), avatar);
}

#[test]
fn test_bounds_hold_over_long_ride() {
    let (mut c, horse, _) = farm(
        Vec3::new(-2.0, 0.0, 10.0),
        Body::new(Vec3::new(10.0, 0.0, 10.0), 0.3),
        Body::new(Vec3::new(-12.0, 0.0, 6.0), FRAC_PI_2),
    );
    c.mount(horse).unwrap();
    c.on_key_down("w");
    c.on_key_down(" ");

    let limit = c.active_profile().position_limit;
    for frame in 0..600 {
        if frame % 90 == 0 {
            c.on_key_down("a");
        } else if frame % 90 == 30 {
            c.on_key_up("a");
        }
        c.tick(1.0 / 60.0);
        let body = c.control_body().unwrap();
        assert!(body.position.x.abs() <= limit);
        assert!(body.position.z.abs() <= limit);
    }
}

#[test]
fn test_camera_converges_behind_target() {
    let (mut c, _, _) = farm(
        Vec3::ZERO,
        Body::new(Vec3::new(20.0, 0.0, 20.0), 0.0),
        Body::new(Vec3::new(-20.0, 0.0, 20.0), 0.0),
    );
    c.on_key_down("w");
    for _ in 0..60 {
        c.tick(1.0 / 60.0);
    }
    c.on_key_up("w");
    for _ in 0..240 {
        c.tick(1.0 / 60.0);
    }

    let desired = c.camera_rig().desired_position(c.control_body().unwrap());
    assert!((c.camera().position - desired).length() < 1e-3);
    let look = c.control_body().unwrap().position + Vec3::new(0.0, 2.0, 0.0);
    assert!((c.camera().look_at - look).length() < 1e-5);
}

#[test]
fn test_empty_registry_never_picks() {
    let world = World::new(Body::new(Vec3::ZERO, 0.0));
    let mut c = FarmController::new(world, Registry::new(), ProfileTable::default());
    assert_eq!(c.on_pointer_down(center_click()), None);
    assert!(!c.is_mounted());
}

#[test]
fn test_dismount_snaps_camera_to_avatar() {
    let (mut c, horse, _) = farm(
        Vec3::new(-2.0, 0.0, 10.0),
        Body::new(Vec3::new(10.0, 0.0, 10.0), PI),
        Body::new(Vec3::new(-20.0, 0.0, -20.0), 0.0),
    );
    c.mount(horse).unwrap();
    c.on_key_down("w");
    c.tick(0.5);
    c.on_key_up("w");
    let riding_camera = c.camera().position;

    c.on_key_down("Escape");

    let avatar = *c.control_body().unwrap();
    let foot = c.profiles().get(LocomotionMode::Foot);
    let expected = c.camera_rig().desired_position(&avatar);
    assert!((c.camera().position - expected).length() < 1e-4);
    assert!((c.camera().look_at - (avatar.position + foot.look_offset)).length() < 1e-4);
    assert!((riding_camera - expected).length() > 1.0);
}

#[test]
fn test_releasing_one_of_two_forward_keys_keeps_moving() {
    let (mut c, _, _) = farm(
        Vec3::new(0.0, 0.0, 10.0),
        Body::new(Vec3::new(20.0, 0.0, -20.0), 0.0),
        Body::new(Vec3::new(-20.0, 0.0, -20.0), 0.0),
    );
    c.on_key_down("w");
    c.on_key_down("ArrowUp");
    c.on_key_up("w");
    c.tick(1.0);

    let avatar = c.control_body().unwrap();
    assert!((avatar.position - Vec3::new(0.0, 0.0, 15.0)).length() < 1e-4);

    c.on_key_up("ArrowUp");
    assert!(c.input().is_empty());
}
