//! Locomotion and mount-switching controller for the farm scene.
//!
//! The crate is engine-agnostic: the host owns rendering and windowing, and
//! feeds key, pointer and frame events into a [`FarmController`]. Each frame
//! the host reads back entity transforms, the [`CameraView`] and the
//! [`StatusSnapshot`] for the HUD.
//!
//! ```
//! use glam::Vec3;
//! use granja::{Body, FarmController, LocomotionMode, PickBox, ProfileTable, Registry, World};
//!
//! let mut world = World::new(Body::new(Vec3::new(-2.0, 0.0, 10.0), 0.0));
//! let horse = world.spawn(Body::new(Vec3::new(-4.0, 0.0, 4.0), 0.0));
//!
//! let mut registry = Registry::new();
//! let bounds = vec![PickBox::new(Vec3::new(0.0, 1.7, 0.0), Vec3::new(0.9, 1.2, 3.0))];
//! registry
//!     .register(&world, horse, LocomotionMode::Horse, "caballo", bounds)
//!     .unwrap();
//!
//! let mut controller = FarmController::new(world, registry, ProfileTable::default());
//! controller.on_key_down("w");
//! controller.tick(1.0 / 60.0);
//! assert!(!controller.is_mounted());
//! ```

pub mod camera_rig;
pub mod controller;
pub mod error;
pub mod input;
pub mod kinematics;
pub mod mount;
pub mod picking;
pub mod profile;
pub mod registry;
pub mod status;

pub use camera_rig::{CameraFollowState, CameraRig, CameraView, Lens};
pub use controller::FarmController;
pub use error::{Error, Result};
pub use input::{InputState, KeySource, LogicalKey};
pub use mount::{MountState, Transition};
pub use picking::{PickBox, PickHit, PointerEvent, Ray};
pub use profile::{LocomotionMode, MovementProfile, ProfileTable};
pub use registry::{Body, EntityId, MountRegistration, Registry, World};
pub use status::StatusSnapshot;
