//! Status panel.
//!
//! Shows what the controller's status snapshot says: the current activity,
//! a hint, and the control reference. The "get off" button is the pointer
//! equivalent of the dismount key.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPlugin, EguiPrimaryContextPass, egui};
use granja::StatusSnapshot;

use crate::farm::Farm;

/// Key and action pairs listed in the controls grid.
const CONTROLS: &[(&str, &str)] = &[
    ("W / ↑", "Avanza"),
    ("S / ↓", "Retrocede suave"),
    ("A / ←", "Gira a la izquierda"),
    ("D / →", "Gira a la derecha"),
    ("Espacio", "Correr / galopar"),
    ("Esc", "Desmontar"),
];

const MOUNTED_COLOR: egui::Color32 = egui::Color32::from_rgb(0xff, 0xd1, 0x66);

/// Plugin for the status panel.
pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin::default())
            .add_systems(EguiPrimaryContextPass, status_panel_system);
    }
}

/// Panel heading naming the ridden animal.
fn mount_heading(status: &StatusSnapshot) -> Option<String> {
    if !status.mounted {
        return None;
    }
    status
        .label
        .as_deref()
        .map(|label| format!("Montando: {label}"))
}

fn status_panel_system(mut contexts: EguiContexts, farm: Option<ResMut<Farm>>) -> Result {
    let Some(mut farm) = farm else {
        return Ok(());
    };
    let ctx = contexts.ctx_mut()?;

    let status = farm.status().clone();
    let mut dismount_clicked = false;

    egui::Window::new("Granjita interactiva")
        .default_pos([12.0, 12.0])
        .resizable(false)
        .show(ctx, |ui| {
            if let Some(heading) = mount_heading(&status) {
                ui.heading(egui::RichText::new(heading).color(MOUNTED_COLOR));
            }
            let text = egui::RichText::new(&status.status).strong();
            if status.mounted {
                ui.label(text.color(MOUNTED_COLOR));
            } else {
                ui.label(text);
            }
            ui.label(egui::RichText::new(&status.tip).italics());

            ui.separator();

            egui::Grid::new("controls")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui| {
                    for (keys, action) in CONTROLS {
                        ui.monospace(*keys);
                        ui.label(*action);
                        ui.end_row();
                    }
                });

            ui.separator();

            ui.add_enabled_ui(status.mounted, |ui| {
                if ui.button("Bajar (Esc)").clicked() {
                    dismount_clicked = true;
                }
            });
        });

    if dismount_clicked {
        farm.dismount();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_only_while_mounted() {
        let mut status = StatusSnapshot {
            status: "A caballo".to_string(),
            tip: String::new(),
            mounted: true,
            label: Some("caballo".to_string()),
        };
        assert_eq!(mount_heading(&status).as_deref(), Some("Montando: caballo"));

        status.mounted = false;
        status.label = None;
        assert_eq!(mount_heading(&status), None);
    }
}
