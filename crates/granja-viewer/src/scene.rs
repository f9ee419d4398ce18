//! Farm scene assembly.
//!
//! Everything here is one-shot setup: scenery meshes, lights, the camera,
//! and the controllable entities. Each controllable model is linked to its
//! slot in the controller's [`World`] through [`FarmEntity`], and every
//! mountable model's box parts double as its pick volume.

use std::collections::HashMap;

use bevy::{
    camera::ClearColorConfig,
    pbr::{DistanceFog, FogFalloff},
    prelude::*,
};
use granja::{
    Body, FarmController, Lens, LocomotionMode, PickBox, ProfileTable, Registry, World,
};

use crate::{
    farm::{Farm, FarmCamera, FarmEntity},
    launch_params::LaunchParams,
};

// ============================================================================
// Model parts
// ============================================================================

#[derive(Clone, Copy)]
enum Shape {
    Cuboid(Vec3),
    Cylinder { radius: f32, height: f32 },
    Sphere(f32),
}

/// One primitive of a model, placed relative to the model origin.
/// Models face +Z.
#[derive(Clone, Copy)]
struct Part {
    shape: Shape,
    offset: Vec3,
    /// Rotation around the local Z axis.
    tilt: f32,
    color: u32,
}

const fn cuboid(size: [f32; 3], offset: [f32; 3], color: u32) -> Part {
    Part {
        shape: Shape::Cuboid(Vec3::from_array(size)),
        offset: Vec3::from_array(offset),
        tilt: 0.0,
        color,
    }
}

const fn cylinder(radius: f32, height: f32, offset: [f32; 3], tilt: f32, color: u32) -> Part {
    Part {
        shape: Shape::Cylinder { radius, height },
        offset: Vec3::from_array(offset),
        tilt,
        color,
    }
}

const HORSE_COAT: u32 = 0x8d_5524;
const HORSE_MANE: u32 = 0x2f_1b0c;
const SADDLE: u32 = 0x3c_3b3d;

const HORSE: &[Part] = &[
    cuboid([0.9, 1.2, 3.0], [0.0, 1.7, 0.0], HORSE_COAT),
    cuboid([0.7, 1.2, 0.7], [0.0, 2.2, 1.7], HORSE_COAT),
    cuboid([0.6, 0.8, 0.8], [0.0, 2.5, 2.4], HORSE_COAT),
    cuboid([0.5, 0.4, 0.4], [0.0, 2.3, 2.8], SADDLE),
    cuboid([0.8, 1.5, 0.2], [0.0, 2.5, 1.1], HORSE_MANE),
    cuboid([0.3, 1.8, 0.3], [0.0, 1.4, -1.6], HORSE_MANE),
    cuboid([0.9, 0.25, 1.4], [0.0, 2.4, 0.2], SADDLE),
    cuboid([0.35, 1.6, 0.35], [0.3, 0.8, 1.0], HORSE_COAT),
    cuboid([0.35, 1.6, 0.35], [-0.3, 0.8, 1.0], HORSE_COAT),
    cuboid([0.35, 1.6, 0.35], [0.3, 0.8, -0.8], HORSE_COAT),
    cuboid([0.35, 1.6, 0.35], [-0.3, 0.8, -0.8], HORSE_COAT),
];

const COW_COAT: u32 = 0xff_ffff;
const COW_SPOT: u32 = 0x2d_3436;
const COW_SNOUT: u32 = 0xff_c4c4;
const COW_HORN: u32 = 0xe1_d5c8;

const COW: &[Part] = &[
    cuboid([1.6, 1.4, 3.0], [0.0, 1.4, 0.0], COW_COAT),
    cuboid([1.0, 0.9, 0.9], [0.0, 2.0, 1.9], COW_COAT),
    cuboid([0.7, 0.5, 0.6], [0.0, 1.7, 2.4], COW_SNOUT),
    cylinder(0.1, 0.5, [0.35, 2.6, 2.05], -0.4, COW_HORN),
    cylinder(0.1, 0.5, [-0.35, 2.6, 2.05], 0.4, COW_HORN),
    cuboid([0.6, 0.4, 0.2], [0.6, 2.1, 1.7], COW_SPOT),
    cuboid([0.6, 0.4, 0.2], [-0.6, 2.1, 1.7], COW_SPOT),
    cuboid([0.15, 1.4, 0.15], [0.0, 1.4, -1.6], COW_SPOT),
    cuboid([0.45, 1.2, 0.45], [0.6, 0.6, 1.0], COW_COAT),
    cuboid([0.45, 1.2, 0.45], [-0.6, 0.6, 1.0], COW_COAT),
    cuboid([0.45, 1.2, 0.45], [0.6, 0.6, -1.0], COW_COAT),
    cuboid([0.45, 1.2, 0.45], [-0.6, 0.6, -1.0], COW_COAT),
    cuboid([0.5, 0.25, 0.5], [0.6, 0.2, 1.0], COW_SPOT),
    cuboid([0.5, 0.25, 0.5], [-0.6, 0.2, 1.0], COW_SPOT),
    cuboid([0.5, 0.25, 0.5], [0.6, 0.2, -1.0], COW_SPOT),
    cuboid([0.5, 0.25, 0.5], [-0.6, 0.2, -1.0], COW_SPOT),
    cuboid([0.2, 0.9, 1.1], [0.8, 1.7, -0.4], COW_SPOT),
    cuboid([0.2, 0.9, 1.1], [-0.8, 1.4, 0.6], COW_SPOT),
];

const PANTS: u32 = 0x27_3c75;
const BOOTS: u32 = 0x3e_2723;
const SHIRT: u32 = 0xff_6b6b;
const SKIN: u32 = 0xff_d8c2;
const HAT: u32 = 0xc2_7c2c;

const FARMER: &[Part] = &[
    cuboid([0.5, 1.2, 0.5], [-0.3, 0.6, 0.0], PANTS),
    cuboid([0.5, 1.2, 0.5], [0.3, 0.6, 0.0], PANTS),
    cuboid([0.55, 0.4, 0.8], [-0.3, 0.2, 0.15], BOOTS),
    cuboid([0.55, 0.4, 0.8], [0.3, 0.2, 0.15], BOOTS),
    cuboid([1.4, 1.6, 0.8], [0.0, 1.9, 0.0], SHIRT),
    cuboid([0.2, 1.6, 0.15], [-0.45, 2.1, 0.45], PANTS),
    cuboid([0.2, 1.6, 0.15], [0.45, 2.1, 0.45], PANTS),
    cylinder(0.25, 1.4, [-0.95, 2.1, 0.0], std::f32::consts::PI / 2.4, SHIRT),
    cylinder(0.25, 1.4, [0.95, 2.1, 0.0], -std::f32::consts::PI / 2.4, SHIRT),
    cuboid([0.9, 0.9, 0.8], [0.0, 2.9, 0.0], SKIN),
    cylinder(0.9, 0.12, [0.0, 3.3, 0.0], 0.0, HAT),
    cylinder(0.6, 0.6, [0.0, 3.6, 0.0], 0.0, HAT),
];

/// Pick volume of a model: its box parts. Box parts are never tilted.
fn pick_boxes(parts: &[Part]) -> Vec<PickBox> {
    parts
        .iter()
        .filter_map(|part| match part.shape {
            Shape::Cuboid(size) => Some(PickBox::new(part.offset, size)),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Mount placement
// ============================================================================

struct MountSpawn {
    /// Profile key, as a scene description would carry it.
    profile: &'static str,
    label: &'static str,
    position: (f32, f32),
    yaw: f32,
}

const MOUNT_SPAWNS: &[MountSpawn] = &[
    MountSpawn {
        profile: "horse",
        label: "caballo",
        position: (-4.0, 4.0),
        yaw: std::f32::consts::PI / 8.0,
    },
    MountSpawn {
        profile: "horse",
        label: "caballo",
        position: (12.0, -2.0),
        yaw: -std::f32::consts::PI / 2.5,
    },
    MountSpawn {
        profile: "cow",
        label: "vaca",
        position: (-12.0, 6.0),
        yaw: std::f32::consts::FRAC_PI_2,
    },
    MountSpawn {
        profile: "cow",
        label: "vaca",
        position: (6.0, -12.0),
        yaw: std::f32::consts::PI,
    },
];

fn model_for(profile: &str) -> &'static [Part] {
    match profile {
        "cow" => COW,
        _ => HORSE,
    }
}

// ============================================================================
// Mesh and material cache
// ============================================================================

fn hex(rgb: u32) -> Color {
    let [_, r, g, b] = rgb.to_be_bytes();
    Color::srgb_u8(r, g, b)
}

/// Shares materials between parts of the same colour.
struct Palette<'a> {
    meshes: &'a mut Assets<Mesh>,
    materials: &'a mut Assets<StandardMaterial>,
    by_color: HashMap<u32, Handle<StandardMaterial>>,
}

impl<'a> Palette<'a> {
    fn new(meshes: &'a mut Assets<Mesh>, materials: &'a mut Assets<StandardMaterial>) -> Self {
        Self {
            meshes,
            materials,
            by_color: HashMap::new(),
        }
    }

    fn material(&mut self, color: u32) -> Handle<StandardMaterial> {
        self.by_color
            .entry(color)
            .or_insert_with(|| {
                self.materials.add(StandardMaterial {
                    base_color: hex(color),
                    perceptual_roughness: 0.9,
                    ..default()
                })
            })
            .clone()
    }

    fn mesh(&mut self, shape: Shape) -> Handle<Mesh> {
        match shape {
            Shape::Cuboid(size) => self.meshes.add(Cuboid::from_size(size)),
            Shape::Cylinder { radius, height } => self.meshes.add(Cylinder::new(radius, height)),
            Shape::Sphere(radius) => self.meshes.add(Sphere::new(radius)),
        }
    }

    fn part_bundle(
        &mut self,
        part: &Part,
    ) -> (Mesh3d, MeshMaterial3d<StandardMaterial>, Transform) {
        (
            Mesh3d(self.mesh(part.shape)),
            MeshMaterial3d(self.material(part.color)),
            Transform::from_translation(part.offset).with_rotation(Quat::from_rotation_z(part.tilt)),
        )
    }
}

/// Spawn a model as a parent transform with one child per part.
fn spawn_model(
    commands: &mut Commands,
    palette: &mut Palette,
    parts: &[Part],
    transform: Transform,
) -> Entity {
    commands
        .spawn((transform, Visibility::default()))
        .with_children(|parent| {
            for part in parts {
                parent.spawn(palette.part_bundle(part));
            }
        })
        .id()
}

// ============================================================================
// Setup
// ============================================================================

const SKY: u32 = 0x87_ceeb;

/// Build the farm, the controller and the camera.
pub fn setup_farm(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    params: Res<LaunchParams>,
) {
    let mut palette = Palette::new(&mut meshes, &mut materials);
    spawn_scenery(&mut commands, &mut palette);

    let (start_x, start_z) = params.start;
    let mut world = World::new(Body::new(Vec3::new(start_x, 0.0, start_z), params.start_yaw));
    let avatar = world.avatar();
    let avatar_entity = spawn_model(&mut commands, &mut palette, FARMER, Transform::default());
    commands.entity(avatar_entity).insert(FarmEntity(avatar));

    let mut registry = Registry::new();
    for spawn in MOUNT_SPAWNS {
        let (x, z) = spawn.position;
        let id = world.spawn(Body::new(Vec3::new(x, 0.0, z), spawn.yaw));
        let parts = model_for(spawn.profile);
        let entity = spawn_model(&mut commands, &mut palette, parts, Transform::default());
        commands.entity(entity).insert(FarmEntity(id));

        if let Err(e) =
            registry.register_by_key(&world, id, spawn.profile, spawn.label, pick_boxes(parts))
        {
            tracing::warn!("{} at ({x}, {z}) will not be rideable: {e}", spawn.label);
        }
    }

    let profiles = load_profiles(&params);
    let lens = Lens::default();
    let mut controller = FarmController::with_lens(world, registry, profiles, lens);

    if let Some(mode) = params.mount {
        start_mounted(&mut controller, mode);
    }

    let view = controller.camera();
    let sky = hex(SKY);
    commands.spawn((
        Camera3d::default(),
        Camera {
            clear_color: ClearColorConfig::Custom(sky),
            ..default()
        },
        Projection::Perspective(PerspectiveProjection {
            fov: lens.fov_y,
            near: lens.near,
            far: lens.far,
            ..default()
        }),
        Transform::from_translation(view.position).looking_at(view.look_at, Vec3::Y),
        DistanceFog {
            color: sky,
            falloff: FogFalloff::Linear {
                start: 45.0,
                end: 160.0,
            },
            ..default()
        },
        FarmCamera,
    ));

    commands.insert_resource(Farm(controller));
    tracing::info!("Farm ready - WASD or arrows to move, click an animal to ride, Esc to get off");
}

fn load_profiles(params: &LaunchParams) -> ProfileTable {
    let Some(path) = &params.profiles else {
        return ProfileTable::default();
    };

    match ProfileTable::load(path) {
        Ok(table) => {
            tracing::info!("Loaded movement profiles from {}", path.display());
            table
        }
        Err(e) => {
            tracing::warn!("{e}; using built-in profiles");
            ProfileTable::default()
        }
    }
}

fn start_mounted(controller: &mut FarmController, mode: LocomotionMode) {
    let first = controller
        .registry()
        .iter()
        .find(|r| r.mode == mode)
        .map(|r| r.entity);

    match first {
        Some(entity) => {
            controller.mount(entity);
        }
        None => tracing::warn!("No {mode} to start on"),
    }
}

fn spawn_scenery(commands: &mut Commands, palette: &mut Palette) {
    // Sun and a soft fill standing in for sky light.
    commands.spawn((
        DirectionalLight {
            color: hex(0xff_f4c1),
            illuminance: 10_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(35.0, 50.0, 20.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        DirectionalLight {
            color: hex(0xdd_eeff),
            illuminance: 2_500.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(-30.0, 40.0, -25.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Ground and dirt path.
    commands.spawn((
        Mesh3d(
            palette
                .meshes
                .add(Plane3d::default().mesh().size(200.0, 200.0)),
        ),
        MeshMaterial3d(palette.material(0x6a_b04c)),
        Transform::default(),
    ));
    commands.spawn(palette.part_bundle(&cuboid([60.0, 0.2, 6.0], [0.0, 0.05, 0.0], 0xc4_9b63)));

    // Crop fields.
    for (x, color) in [(-18.0, 0xa6_6a2c), (-5.0, 0xc9_7c38), (8.0, 0xa6_6a2c)] {
        commands.spawn(palette.part_bundle(&cuboid([10.0, 0.4, 16.0], [x, 0.2, -18.0], color)));
    }

    // Trees.
    for (x, z) in [
        (-25.0, 10.0),
        (-30.0, -5.0),
        (30.0, 5.0),
        (22.0, -12.0),
        (28.0, -25.0),
        (-15.0, 25.0),
    ] {
        let tree = [
            cylinder(0.7, 4.0, [0.0, 2.0, 0.0], 0.0, 0x8b_5a2b),
            Part {
                shape: Shape::Sphere(2.3),
                offset: Vec3::new(0.0, 4.3, 0.0),
                tilt: 0.0,
                color: 0x2e_7d32,
            },
        ];
        spawn_model(commands, palette, &tree, Transform::from_xyz(x, 0.0, z));
    }

    spawn_fence(commands, palette, 32.0);
    spawn_pen_animals(commands, palette);
}

fn spawn_fence(commands: &mut Commands, palette: &mut Palette, size: f32) {
    const WOOD: u32 = 0xe1_c699;
    let mut parts = Vec::new();

    let mut i = -size;
    while i <= size {
        parts.push(cuboid([0.4, 2.8, 0.4], [i, 1.4, size], WOOD));
        parts.push(cuboid([0.4, 2.8, 0.4], [i, 1.4, -size], WOOD));
        i += 4.0;
    }
    let mut i = -size + 4.0;
    while i < size {
        parts.push(cuboid([0.4, 2.8, 0.4], [size, 1.4, i], WOOD));
        parts.push(cuboid([0.4, 2.8, 0.4], [-size, 1.4, i], WOOD));
        i += 4.0;
    }

    let span = size * 2.0;
    parts.push(cuboid([span, 0.25, 0.25], [0.0, 2.1, size], WOOD));
    parts.push(cuboid([span, 0.25, 0.25], [0.0, 2.1, -size], WOOD));
    parts.push(cuboid([0.25, 0.25, span], [size, 2.1, 0.0], WOOD));
    parts.push(cuboid([0.25, 0.25, span], [-size, 2.1, 0.0], WOOD));

    spawn_model(commands, palette, &parts, Transform::default());
}

/// Small decorative animals that cannot be ridden.
fn spawn_pen_animals(commands: &mut Commands, palette: &mut Palette) {
    const LEGS: u32 = 0x4a_2f1b;

    for (body, accent, scale, (x, z)) in [
        (0xff_ffff, 0xff_c0cb, 1.0, (-10.0, -6.0)),
        (0xf8_a5c2, 0xff_d1dc, 0.9, (-6.0, -9.0)),
        (0xf9_f7cf, 0xf6_e58d, 0.6, (4.0, -5.0)),
        (0xc7_ecee, 0x95_afc0, 0.85, (7.0, -8.0)),
    ] {
        let mut parts = vec![
            cuboid([1.0, 1.0, 1.8], [0.0, 0.9, 0.0], body),
            cuboid([0.8, 0.8, 0.8], [0.0, 1.3, 1.2], body),
            cuboid([0.5, 0.4, 0.5], [0.0, 1.1, 1.55], accent),
        ];
        for (lx, lz) in [(-0.3, -0.6), (0.3, -0.6), (-0.3, 0.6), (0.3, 0.6)] {
            parts.push(cuboid([0.3, 0.8, 0.3], [lx, 0.4, lz], LEGS));
        }

        spawn_model(
            commands,
            palette,
            &parts,
            Transform::from_xyz(x, 0.0, z).with_scale(Vec3::splat(scale)),
        );
    }
}
