//! Bridge between the farm controller and the Bevy world.
//!
//! The controller owns all simulation state. Bevy entities only mirror it:
//! each frame the controller is ticked, then every linked transform and the
//! camera are copied out of it.

use bevy::{prelude::*, window::PrimaryWindow};
use granja::{EntityId, FarmController};

use crate::FarmSet;

/// The controller, shared as a resource.
#[derive(Resource, Deref, DerefMut)]
pub struct Farm(pub FarmController);

/// Links a Bevy entity to its slot in the controller's world.
#[derive(Component, Clone, Copy, Debug)]
pub struct FarmEntity(pub EntityId);

/// Marker for the camera driven by the controller's rig.
#[derive(Component)]
pub struct FarmCamera;

/// Ticks the controller and mirrors its state onto the scene.
pub struct FarmPlugin;

impl Plugin for FarmPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                track_viewport_aspect.in_set(FarmSet::Input),
                tick_farm.in_set(FarmSet::Simulate),
                (sync_bodies, sync_camera).in_set(FarmSet::Sync),
            )
                .run_if(resource_exists::<Farm>),
        );
    }
}

fn tick_farm(time: Res<Time>, mut farm: ResMut<Farm>) {
    farm.tick(time.delta_secs());
}

/// Keep the picking lens in step with the window shape.
fn track_viewport_aspect(window: Single<&Window, With<PrimaryWindow>>, mut farm: ResMut<Farm>) {
    let (width, height) = (window.width(), window.height());
    if height <= 0.0 {
        return;
    }

    let aspect = width / height;
    if (farm.lens().aspect - aspect).abs() > f32::EPSILON {
        farm.set_aspect(aspect);
    }
}

fn sync_bodies(
    farm: Res<Farm>,
    mut query: Query<(&FarmEntity, &mut Transform, &mut Visibility)>,
) {
    for (link, mut transform, mut visibility) in &mut query {
        let Some(body) = farm.world().get(link.0) else {
            continue;
        };

        transform.translation = body.position;
        transform.rotation = body.rotation();

        let wanted = if body.visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        visibility.set_if_neq(wanted);
    }
}

fn sync_camera(farm: Res<Farm>, mut camera: Single<&mut Transform, With<FarmCamera>>) {
    let view = farm.camera();
    **camera = Transform::from_translation(view.position).looking_at(view.look_at, Vec3::Y);
}
