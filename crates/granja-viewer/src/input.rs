//! Keyboard and pointer bindings for the farm.
//!
//! Bindings are declared with `leafwing-input-manager` and forwarded into
//! the controller as logical keys, so the controller's held-key set stays
//! the single source of truth for movement.

use bevy::{
    prelude::*,
    window::{PrimaryWindow, WindowFocused},
};
use bevy_egui::EguiContexts;
use granja::{LogicalKey, PointerEvent};
use leafwing_input_manager::prelude::*;

use crate::farm::Farm;

// ============================================================================
// Actions
// ============================================================================

/// Player actions on the farm.
#[derive(Actionlike, PartialEq, Eq, Hash, Clone, Copy, Debug, Reflect)]
pub enum FarmAction {
    /// W / up arrow.
    Forward,
    /// S / down arrow.
    Backward,
    /// A / left arrow.
    Left,
    /// D / right arrow.
    Right,
    /// Run or gallop (Space).
    Boost,
    /// Get off the current mount (Esc).
    Dismount,
    /// Choose an animal to ride (left click).
    Pick,
}

impl FarmAction {
    /// Logical key this action drives, if it is a key action.
    pub fn logical_key(self) -> Option<LogicalKey> {
        match self {
            Self::Forward => Some(LogicalKey::Forward),
            Self::Backward => Some(LogicalKey::Backward),
            Self::Left => Some(LogicalKey::Left),
            Self::Right => Some(LogicalKey::Right),
            Self::Boost => Some(LogicalKey::Boost),
            Self::Dismount => Some(LogicalKey::Dismount),
            Self::Pick => None,
        }
    }
}

const KEY_ACTIONS: [FarmAction; 6] = [
    FarmAction::Forward,
    FarmAction::Backward,
    FarmAction::Left,
    FarmAction::Right,
    FarmAction::Boost,
    FarmAction::Dismount,
];

/// Create the default input map for farm actions.
pub fn default_farm_input_map() -> InputMap<FarmAction> {
    InputMap::default()
        .with(FarmAction::Forward, KeyCode::KeyW)
        .with(FarmAction::Forward, KeyCode::ArrowUp)
        .with(FarmAction::Backward, KeyCode::KeyS)
        .with(FarmAction::Backward, KeyCode::ArrowDown)
        .with(FarmAction::Left, KeyCode::KeyA)
        .with(FarmAction::Left, KeyCode::ArrowLeft)
        .with(FarmAction::Right, KeyCode::KeyD)
        .with(FarmAction::Right, KeyCode::ArrowRight)
        .with(FarmAction::Boost, KeyCode::Space)
        .with(FarmAction::Dismount, KeyCode::Escape)
        .with(FarmAction::Pick, MouseButton::Left)
}

// ============================================================================
// Plugin
// ============================================================================

/// Registers farm actions and forwards them to the controller.
pub struct FarmInputPlugin;

impl Plugin for FarmInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(InputManagerPlugin::<FarmAction>::default())
            .add_systems(Startup, spawn_input_map)
            .add_systems(
                Update,
                (forward_keys, forward_pointer, release_on_focus_loss)
                    .in_set(crate::FarmSet::Input)
                    .run_if(resource_exists::<Farm>),
            );
    }
}

fn spawn_input_map(mut commands: Commands) {
    commands.spawn((Name::new("farm input"), default_farm_input_map()));
}

fn forward_keys(action_query: Query<&ActionState<FarmAction>>, mut farm: ResMut<Farm>) {
    let Ok(action_state) = action_query.single() else {
        return;
    };

    for action in KEY_ACTIONS {
        let Some(key) = action.logical_key() else {
            continue;
        };
        if action_state.just_pressed(&action) {
            farm.press(key);
        }
        if action_state.just_released(&action) {
            farm.release(key);
        }
    }
}

fn forward_pointer(
    action_query: Query<&ActionState<FarmAction>>,
    window: Single<&Window, With<PrimaryWindow>>,
    mut contexts: EguiContexts,
    mut farm: ResMut<Farm>,
) {
    let Ok(action_state) = action_query.single() else {
        return;
    };
    if !action_state.just_pressed(&FarmAction::Pick) {
        return;
    }

    // Clicks on the status panel belong to the panel.
    let over_ui = contexts
        .ctx_mut()
        .ok()
        .is_some_and(|ctx| ctx.is_pointer_over_area());
    if over_ui {
        return;
    }

    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let event = PointerEvent::new(cursor.x, cursor.y, window.width(), window.height());
    if let Some(entity) = farm.on_pointer_down(event) {
        tracing::debug!("Clicked {entity}");
    }
}

/// Held keys are forgotten when the window loses focus, since the
/// matching key-up will never arrive.
fn release_on_focus_loss(mut focus_events: MessageReader<WindowFocused>, mut farm: ResMut<Farm>) {
    if focus_events.read().any(|event| !event.focused) {
        farm.focus_lost();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_actions_cover_every_logical_key() {
        let keys: Vec<_> = KEY_ACTIONS
            .iter()
            .filter_map(|a| a.logical_key())
            .collect();
        for key in LogicalKey::ALL {
            assert!(keys.contains(&key), "{key:?} has no binding");
        }
        assert_eq!(FarmAction::Pick.logical_key(), None);
    }
}
