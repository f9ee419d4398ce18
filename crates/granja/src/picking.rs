//! Pointer picking against mountable entities.
//!
//! A click is turned into a ray leaving the camera through the clicked
//! screen point. Each mountable entity carries a handful of boxes in its own
//! yaw frame; the nearest box the ray enters decides the hit.

use glam::{Vec2, Vec3};

use crate::{
    camera_rig::{CameraView, Lens},
    registry::{EntityId, Registry, World},
};

/// Axis-aligned box in an entity's local (yaw) frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickBox {
    /// Box center relative to the entity origin.
    pub center: Vec3,
    /// Half the box size along each local axis.
    pub half_extents: Vec3,
}

impl PickBox {
    /// Box from a local center and full size.
    pub fn new(center: Vec3, size: Vec3) -> Self {
        Self {
            center,
            half_extents: size * 0.5,
        }
    }

    /// Distance along `ray` at which it enters the box (0 if it starts
    /// inside), or `None` if it misses or the box is behind the origin.
    ///
    /// The ray must already be expressed in the box's frame.
    fn intersect_local(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        let origin = origin - self.center;
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            let h = self.half_extents[axis];

            if d.abs() < 1e-8 {
                // Parallel to this slab: must already be between the planes.
                if o.abs() > h {
                    return None;
                }
                continue;
            }

            let t1 = (-h - o) / d;
            let t2 = (h - o) / d;
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
        }

        if t_max < t_min.max(0.0) {
            return None;
        }
        Some(t_min.max(0.0))
    }
}

/// Half-line in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Ray from `origin` along `direction` (normalized here).
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or(Vec3::NEG_Z),
        }
    }

    /// Ray from the camera through a point in normalized device
    /// coordinates (`x` right, `y` up, both in `[-1, 1]`).
    pub fn from_viewport(ndc: Vec2, view: &CameraView, lens: &Lens) -> Self {
        let forward = view.forward();
        let right = forward.cross(Vec3::Y).normalize_or(Vec3::X);
        let up = right.cross(forward);

        let half_height = (lens.fov_y * 0.5).tan();
        let half_width = half_height * lens.aspect;
        let direction = forward + right * (ndc.x * half_width) + up * (ndc.y * half_height);

        Self::new(view.position, direction)
    }

    /// Point at distance `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// A pointer press in client (pixel) coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// Horizontal position from the left edge.
    pub x: f32,
    /// Vertical position from the top edge.
    pub y: f32,
    /// Viewport width.
    pub width: f32,
    /// Viewport height.
    pub height: f32,
}

impl PointerEvent {
    /// Pointer press at `(x, y)` inside a `width` × `height` viewport.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalized device coordinates, or `None` for an empty viewport.
    pub fn to_ndc(&self) -> Option<Vec2> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        Some(Vec2::new(
            (self.x / self.width) * 2.0 - 1.0,
            -(self.y / self.height) * 2.0 + 1.0,
        ))
    }
}

/// Result of a successful pick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickHit {
    /// The mountable entity that was hit.
    pub entity: EntityId,
    /// Distance from the ray origin to the hit.
    pub distance: f32,
}

/// Find the nearest mountable entity hit by `ray`.
///
/// Returns `None` when the registry is empty or nothing is hit.
pub fn pick(ray: &Ray, registry: &Registry, world: &World) -> Option<PickHit> {
    registry
        .iter()
        .filter_map(|mount| {
            let body = world.get(mount.entity)?;
            let inverse = body.rotation().inverse();
            let origin = inverse * (ray.origin - body.position);
            let direction = inverse * ray.direction;

            mount
                .bounds
                .iter()
                .filter_map(|b| b.intersect_local(origin, direction))
                .min_by(f32::total_cmp)
                .map(|distance| PickHit {
                    entity: mount.entity,
                    distance,
                })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        profile::LocomotionMode,
        registry::{Body, World},
    };

    fn unit_box() -> Vec<PickBox> {
        vec![PickBox::new(Vec3::new(0.0, 1.0, 0.0), Vec3::splat(2.0))]
    }

    #[test]
    fn test_pointer_to_ndc() {
        let center = PointerEvent::new(400.0, 300.0, 800.0, 600.0).to_ndc().unwrap();
        assert!(center.length() < 1e-6);

        let top_left = PointerEvent::new(0.0, 0.0, 800.0, 600.0).to_ndc().unwrap();
        assert_eq!(top_left, Vec2::new(-1.0, 1.0));

        assert!(PointerEvent::new(1.0, 1.0, 0.0, 600.0).to_ndc().is_none());
    }

    #[test]
    fn test_box_hit_from_outside() {
        let b = PickBox::new(Vec3::ZERO, Vec3::splat(2.0));
        let t = b
            .intersect_local(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z)
            .unwrap();
        assert!((t - 9.0).abs() < 1e-5);
    }

    #[test]
    fn test_box_miss_and_behind() {
        let b = PickBox::new(Vec3::ZERO, Vec3::splat(2.0));
        assert!(
            b.intersect_local(Vec3::new(5.0, 0.0, 10.0), Vec3::NEG_Z)
                .is_none()
        );
        assert!(b.intersect_local(Vec3::new(0.0, 0.0, 10.0), Vec3::Z).is_none());
    }

    #[test]
    fn test_box_hit_from_inside() {
        let b = PickBox::new(Vec3::ZERO, Vec3::splat(2.0));
        assert_eq!(b.intersect_local(Vec3::ZERO, Vec3::X), Some(0.0));
    }

    #[test]
    fn test_center_ray_points_at_look_target() {
        let view = CameraView {
            position: Vec3::new(0.0, 5.0, 10.0),
            look_at: Vec3::new(0.0, 1.0, 0.0),
        };
        let ray = Ray::from_viewport(Vec2::ZERO, &view, &Lens::default());
        let expected = (view.look_at - view.position).normalize();
        assert!((ray.direction - expected).length() < 1e-5);
        assert_eq!(ray.origin, view.position);
    }

    #[test]
    fn test_viewport_edges_bend_the_ray() {
        let view = CameraView {
            position: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
        };
        let lens = Lens::default();
        let right = Ray::from_viewport(Vec2::new(1.0, 0.0), &view, &lens);
        let up = Ray::from_viewport(Vec2::new(0.0, 1.0), &view, &lens);
        assert!(right.direction.x > 0.0);
        assert!(up.direction.y > 0.0);

        // Top edge of the frustum sits at half the vertical field of view.
        let angle = up.direction.angle_between(Vec3::NEG_Z);
        assert!((angle - lens.fov_y * 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_pick_empty_registry() {
        let world = World::new(Body::new(Vec3::ZERO, 0.0));
        let ray = Ray::new(Vec3::new(0.0, 1.0, 10.0), Vec3::NEG_Z);
        assert!(pick(&ray, &Registry::new(), &world).is_none());
    }

    #[test]
    fn test_pick_nearest_wins() {
        let mut world = World::new(Body::new(Vec3::new(20.0, 0.0, 20.0), 0.0));
        let far = world.spawn(Body::new(Vec3::new(0.0, 0.0, -10.0), 0.0));
        let near = world.spawn(Body::new(Vec3::new(0.0, 0.0, 0.0), 0.0));
        let mut registry = Registry::new();
        registry
            .register(&world, far, LocomotionMode::Cow, "vaca", unit_box())
            .unwrap();
        registry
            .register(&world, near, LocomotionMode::Horse, "caballo", unit_box())
            .unwrap();

        let ray = Ray::new(Vec3::new(0.0, 1.0, 10.0), Vec3::NEG_Z);
        let hit = pick(&ray, &registry, &world).unwrap();
        assert_eq!(hit.entity, near);
        assert!((hit.distance - 9.0).abs() < 1e-4);
        assert!((ray.at(hit.distance).z - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_pick_respects_entity_yaw() {
        // A long thin box along local X. Rotated by 90° it lies along world Z.
        let mut world = World::new(Body::new(Vec3::new(20.0, 0.0, 20.0), 0.0));
        let horse = world.spawn(Body::new(Vec3::ZERO, std::f32::consts::FRAC_PI_2));
        let mut registry = Registry::new();
        registry
            .register(
                &world,
                horse,
                LocomotionMode::Horse,
                "caballo",
                vec![PickBox::new(Vec3::ZERO, Vec3::new(6.0, 1.0, 1.0))],
            )
            .unwrap();

        // Straight down at (0, 0, 2.5): inside the rotated box, outside the unrotated one.
        let ray = Ray::new(Vec3::new(0.0, 10.0, 2.5), Vec3::NEG_Y);
        assert_eq!(pick(&ray, &registry, &world).unwrap().entity, horse);

        let ray = Ray::new(Vec3::new(2.5, 10.0, 0.0), Vec3::NEG_Y);
        assert!(pick(&ray, &registry, &world).is_none());
    }
}
