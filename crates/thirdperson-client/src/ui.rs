//! On-screen UI: the aim crosshair and a debug window with controller state.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPlugin, EguiPrimaryContextPass, egui};
use leafwing_input_manager::prelude::*;
use thirdperson_core::AnimationParam;

use crate::{
    camera::CameraRig,
    input::PlayerAction,
    player::{Player, PlayerAnimation, PlayerController},
};

/// Crosshair arm length in points.
const CROSSHAIR_SIZE: f32 = 8.0;

/// Gap between the crosshair center and its arms.
const CROSSHAIR_GAP: f32 = 3.0;

/// Resource controlling whether the debug window is visible.
#[derive(Resource)]
pub struct UiVisible(pub bool);

impl Default for UiVisible {
    fn default() -> Self {
        Self(true)
    }
}

/// Plugin for the UI overlay.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin::default())
            .init_resource::<UiVisible>()
            .add_systems(Update, toggle_ui_visible)
            .add_systems(
                EguiPrimaryContextPass,
                (
                    crosshair_system.run_if(|rig: Res<CameraRig>| rig.crosshair),
                    debug_ui_system.run_if(|visible: Res<UiVisible>| visible.0),
                ),
            );
    }
}

/// Toggle the debug window with Q.
fn toggle_ui_visible(
    action_query: Query<&ActionState<PlayerAction>>,
    mut visible: ResMut<UiVisible>,
) {
    let Ok(action_state) = action_query.single() else {
        return;
    };

    if action_state.just_pressed(&PlayerAction::ToggleUi) {
        visible.0 = !visible.0;
    }
}

/// Paint the crosshair at the center of the screen.
fn crosshair_system(mut contexts: EguiContexts) -> Result {
    let ctx = contexts.ctx_mut()?;
    let center = ctx.available_rect().center();
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Foreground,
        egui::Id::new("crosshair"),
    ));
    let stroke = egui::Stroke::new(2.0, egui::Color32::WHITE);

    for direction in [
        egui::vec2(1.0, 0.0),
        egui::vec2(-1.0, 0.0),
        egui::vec2(0.0, 1.0),
        egui::vec2(0.0, -1.0),
    ] {
        painter.line_segment(
            [
                center + direction * CROSSHAIR_GAP,
                center + direction * (CROSSHAIR_GAP + CROSSHAIR_SIZE),
            ],
            stroke,
        );
    }

    Ok(())
}

/// Render the controller state window.
fn debug_ui_system(
    mut contexts: EguiContexts,
    rig: Res<CameraRig>,
    player_query: Query<(&PlayerController, &PlayerAnimation), With<Player>>,
) -> Result {
    let ctx = contexts.ctx_mut()?;
    let Ok((controller, animation)) = player_query.single() else {
        return Ok(());
    };

    let motion = controller.motion();
    let vertical = controller.vertical();
    let camera = controller.camera();
    let signals = &animation.0;

    egui::Window::new("Controller")
        .default_pos([10.0, 10.0])
        .show(ctx, |ui| {
            ui.heading("Locomotion");
            egui::Grid::new("locomotion").num_columns(2).show(ui, |ui| {
                row(ui, "Speed", format!("{:.2} m/s", motion.current_speed));
                row(ui, "Blend", format!("{:.3}", motion.animation_blend));
                row(ui, "Facing", format!("{:.1}°", motion.facing_yaw));
                row(ui, "Target heading", format!("{:.1}°", motion.target_rotation));
            });

            ui.separator();
            ui.heading("Vertical");
            egui::Grid::new("vertical").num_columns(2).show(ui, |ui| {
                row(ui, "Velocity", format!("{:.2} m/s", vertical.vertical_velocity));
                row(ui, "Grounded", vertical.grounded.to_string());
                row(ui, "Double jump", vertical.double_jump_available.to_string());
                row(ui, "Cooldown", format!("{:.2} s", vertical.jump_cooldown_remaining));
            });

            ui.separator();
            ui.heading("Camera");
            egui::Grid::new("camera").num_columns(2).show(ui, |ui| {
                row(ui, "Yaw", format!("{:.1}°", camera.yaw));
                row(ui, "Pitch", format!("{:.1}°", rig.pitch));
                row(ui, "View", format!("{:?}", camera.view));
                row(ui, "Sensitivity", format!("{:.1}", camera.sensitivity));
                let target = controller.aim_target();
                row(
                    ui,
                    "Aim target",
                    format!("{:.1}, {:.1}, {:.1}", target.x, target.y, target.z),
                );
                row(ui, "Shots", controller.shots().to_string());
            });

            ui.separator();
            ui.heading("Animation");
            egui::Grid::new("animation").num_columns(2).show(ui, |ui| {
                for param in AnimationParam::ALL {
                    row(ui, param.name(), signals.value(param).to_string());
                }
                row(ui, "Jumps", signals.jumps.to_string());
            });

            ui.separator();
            ui.label("Q: toggle this window, Esc: release cursor");
        });

    Ok(())
}

fn row(ui: &mut egui::Ui, label: &str, value: String) {
    ui.label(label);
    ui.label(value);
    ui.end_row();
}
