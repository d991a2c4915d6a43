use std::collections::HashSet;

use crate::config::{
    ConfigChange, FieldRange, SceneConfig, CAMERA_DISTANCE, LIGHT_INTENSITY, ROTATION_SPEED,
};
use crate::core::{Button, Controller};
use crate::geometry::GeometryKind;
use crate::material::MaterialKind;
use crate::math::Color;

/// Stepped slider; yields the new value only for a move of at least half a step,
/// so grid snapping of the initial value is not reported as an edit
fn slider(ui: &mut egui::Ui, value: f32, range: FieldRange, text: &str) -> Option<f32> {
    let mut edited = value;
    let response = ui.add(
        egui::Slider::new(&mut edited, range.min..=range.max)
            .step_by(range.step as f64)
            .text(text),
    );
    (response.changed() && (edited - value).abs() > range.step * 0.5).then_some(edited)
}

/// Draw the control panel; returns one change per edited widget
pub fn show_panel(ctx: &egui::Context, config: &SceneConfig) -> Vec<ConfigChange> {
    let mut changes = Vec::new();

    egui::Window::new("Scene")
        .resizable(false)
        .default_pos(egui::pos2(10.0, 10.0))
        .show(ctx, |ui| {
            changes = panel_ui(ui, config);
        });

    changes
}

pub fn panel_ui(ui: &mut egui::Ui, config: &SceneConfig) -> Vec<ConfigChange> {
    let mut changes = Vec::new();

    let mut geometry = config.geometry;
    egui::ComboBox::from_label("Geometry")
        .selected_text(geometry.label())
        .show_ui(ui, |ui| {
            for kind in GeometryKind::ALL {
                ui.selectable_value(&mut geometry, kind, kind.label());
            }
        });
    if geometry != config.geometry {
        changes.push(ConfigChange::Geometry(geometry));
    }

    let mut material = config.material;
    egui::ComboBox::from_label("Material")
        .selected_text(material.label())
        .show_ui(ui, |ui| {
            for kind in MaterialKind::ALL {
                ui.selectable_value(&mut material, kind, kind.label());
            }
        });
    if material != config.material {
        changes.push(ConfigChange::Material(material));
    }

    ui.horizontal(|ui| {
        let mut rgb = [config.color.r, config.color.g, config.color.b];
        if ui.color_edit_button_srgb(&mut rgb).changed() {
            changes.push(ConfigChange::Color(Color::new(rgb[0], rgb[1], rgb[2])));
        }
        ui.label(config.color.to_string());
        if ui.button("Random").clicked() {
            changes.push(ConfigChange::Color(Color::random()));
        }
    });

    if let Some(speed) = slider(ui, config.rotation_speed, ROTATION_SPEED, "Rotation speed") {
        changes.push(ConfigChange::RotationSpeed(speed));
    }
    if let Some(intensity) = slider(ui, config.light_intensity, LIGHT_INTENSITY, "Light intensity") {
        changes.push(ConfigChange::LightIntensity(intensity));
    }
    if let Some(distance) = slider(ui, config.camera_distance, CAMERA_DISTANCE, "Camera distance") {
        changes.push(ConfigChange::CameraDistance(distance));
    }

    let mut flat = config.flat_shading;
    if ui.checkbox(&mut flat, "Flat shading").changed() {
        changes.push(ConfigChange::FlatShading(flat));
    }

    let mut wireframe = config.wireframe;
    if ui.checkbox(&mut wireframe, "Wireframe").changed() {
        changes.push(ConfigChange::Wireframe(wireframe));
    }

    let label = if config.paused { "Resume" } else { "Pause" };
    if ui.button(label).clicked() {
        changes.push(ConfigChange::Paused(!config.paused));
    }

    changes
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyAction {
    Change(ConfigChange),
    Quit,
}

/// Keyboard shortcuts for the panel controls
///
/// Discrete actions fire on the pressed edge only; W/S zoom steps once per
/// update while held.
#[derive(Debug, Clone, Default)]
pub struct KeyBindings {
    previous: HashSet<Button>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, controller: &impl Controller, config: &SceneConfig) -> Vec<KeyAction> {
        let down: HashSet<Button> = controller.get_down_keys().iter().copied().collect();
        let mut actions = Vec::new();

        // Button::ALL order keeps the output deterministic
        for button in Button::ALL {
            let held = down.contains(&button);
            let pressed = held && !self.previous.contains(&button);

            let action = match button {
                Button::KeyW if held => Some(KeyAction::Change(ConfigChange::CameraDistance(
                    CAMERA_DISTANCE.step_down(config.camera_distance),
                ))),
                Button::KeyS if held => Some(KeyAction::Change(ConfigChange::CameraDistance(
                    CAMERA_DISTANCE.step_up(config.camera_distance),
                ))),
                Button::KeyQ if pressed => Some(KeyAction::Change(ConfigChange::Geometry(config.geometry.prev()))),
                Button::KeyE if pressed => Some(KeyAction::Change(ConfigChange::Geometry(config.geometry.next()))),
                Button::KeyA if pressed => Some(KeyAction::Change(ConfigChange::Material(config.material.prev()))),
                Button::KeyD if pressed => Some(KeyAction::Change(ConfigChange::Material(config.material.next()))),
                Button::KeyC if pressed => Some(KeyAction::Change(ConfigChange::Color(Color::random()))),
                Button::Space if pressed => Some(KeyAction::Change(ConfigChange::Paused(!config.paused))),
                Button::Escape if pressed => Some(KeyAction::Quit),
                _ => None,
            };
            actions.extend(action);
        }

        self.previous = down;
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HeldButtons;

    #[test]
    fn idle_panel_emits_nothing() {
        let ctx = egui::Context::default();
        let config = SceneConfig::default();
        let mut changes = vec![ConfigChange::Paused(true)];
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            changes = show_panel(ctx, &config);
        });
        assert!(changes.is_empty());
    }

    #[test]
    fn off_grid_values_do_not_report_edits() {
        let ctx = egui::Context::default();
        let config = SceneConfig {
            rotation_speed: 0.0123,
            light_intensity: 0.72,
            camera_distance: 3.33,
            ..SceneConfig::default()
        };
        for _ in 0..3 {
            let mut changes = Vec::new();
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                changes = show_panel(ctx, &config);
            });
            assert!(changes.is_empty(), "{:?}", changes);
        }
    }

    #[test]
    fn discrete_keys_fire_once_per_press() {
        let mut bindings = KeyBindings::new();
        let config = SceneConfig::default();
        let held = HeldButtons(vec![Button::Space]);

        assert_eq!(
            bindings.update(&held, &config),
            vec![KeyAction::Change(ConfigChange::Paused(true))]
        );
        assert!(bindings.update(&held, &config).is_empty());

        bindings.update(&HeldButtons::default(), &config);
        assert_eq!(bindings.update(&held, &config).len(), 1);
    }

    #[test]
    fn geometry_and_material_cycle() {
        let mut bindings = KeyBindings::new();
        let config = SceneConfig::default();
        let actions = bindings.update(&HeldButtons(vec![Button::KeyE, Button::KeyA]), &config);
        assert_eq!(
            actions,
            vec![
                KeyAction::Change(ConfigChange::Material(MaterialKind::Phong)),
                KeyAction::Change(ConfigChange::Geometry(GeometryKind::Sphere)),
            ]
        );
    }

    #[test]
    fn zoom_repeats_while_held() {
        let mut bindings = KeyBindings::new();
        let config = SceneConfig::default();
        let held = HeldButtons(vec![Button::KeyS]);
        for _ in 0..3 {
            let actions = bindings.update(&held, &config);
            assert_eq!(actions.len(), 1);
            match actions[0] {
                KeyAction::Change(ConfigChange::CameraDistance(d)) => assert!((d - 5.1).abs() < 1e-5),
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn escape_quits_and_c_recolors() {
        let mut bindings = KeyBindings::new();
        let actions = bindings.update(
            &HeldButtons(vec![Button::Escape, Button::KeyC]),
            &SceneConfig::default(),
        );
        assert!(matches!(actions[0], KeyAction::Change(ConfigChange::Color(_))));
        assert_eq!(actions[1], KeyAction::Quit);
    }
}
