//! Guidance text for the HUD.

use crate::{
    mount::MountState,
    profile::{LocomotionMode, ProfileTable},
    registry::Registry,
};

/// What the HUD should show. Read by the presentation layer, never pushed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Main status line.
    pub status: String,
    /// Secondary hint line.
    pub tip: String,
    /// Whether a mount is being ridden (drives highlight styling).
    pub mounted: bool,
    /// Label of the ridden mount.
    pub label: Option<String>,
}

impl StatusSnapshot {
    /// Snapshot for a mount state.
    pub fn for_state(state: MountState, registry: &Registry, profiles: &ProfileTable) -> Self {
        match state {
            MountState::OnFoot => {
                let profile = profiles.get(LocomotionMode::Foot);
                Self {
                    status: profile.status.clone(),
                    tip: profile.tip.clone(),
                    mounted: false,
                    label: None,
                }
            }
            MountState::Mounted { entity, mode } => {
                let profile = profiles.get(mode);
                Self {
                    status: profile.status.clone(),
                    tip: profile.tip.clone(),
                    mounted: true,
                    label: registry.get(entity).map(|r| r.label.clone()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::registry::{Body, World};

    #[test]
    fn test_on_foot_uses_foot_text() {
        let profiles = ProfileTable::default();
        let snapshot = StatusSnapshot::for_state(MountState::OnFoot, &Registry::new(), &profiles);
        assert!(!snapshot.mounted);
        assert_eq!(snapshot.status, profiles.get(LocomotionMode::Foot).status);
        assert_eq!(snapshot.tip, profiles.get(LocomotionMode::Foot).tip);
        assert_eq!(snapshot.label, None);
    }

    #[test]
    fn test_mounted_uses_mount_text_and_label() {
        let mut world = World::new(Body::new(Vec3::ZERO, 0.0));
        let cow = world.spawn(Body::new(Vec3::X, 0.0));
        let mut registry = Registry::new();
        registry
            .register(&world, cow, LocomotionMode::Cow, "vaca", vec![])
            .unwrap();
        let profiles = ProfileTable::default();

        let snapshot = StatusSnapshot::for_state(
            MountState::Mounted {
                entity: cow,
                mode: LocomotionMode::Cow,
            },
            &registry,
            &profiles,
        );
        assert!(snapshot.mounted);
        assert_eq!(snapshot.tip, profiles.get(LocomotionMode::Cow).tip);
        assert_eq!(snapshot.label.as_deref(), Some("vaca"));
    }
}
