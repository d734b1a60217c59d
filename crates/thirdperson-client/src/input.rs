//! Centralized input action definitions and management.
//!
//! Defines all gameplay actions using `leafwing-input-manager` for declarative,
//! rebindable input mapping, and turns the action state into the controller's
//! per-tick [`RawInput`].

use bevy::{
    prelude::*,
    window::{CursorGrabMode, CursorOptions, PrimaryWindow},
};
use bevy_egui::EguiContexts;
use leafwing_input_manager::{plugin::InputManagerSystem, prelude::*};
use thirdperson_core::RawInput;

use crate::launch_params::LaunchParams;

/// Gamepad right-stick scale, bringing stick deflection in line with mouse deltas.
const STICK_LOOK_SCALE: f32 = 10.0;

// ============================================================================
// Action enum
// ============================================================================

/// Actions for the player character.
#[derive(Actionlike, PartialEq, Eq, Hash, Clone, Copy, Debug, Reflect)]
pub enum PlayerAction {
    /// WASD / left stick movement.
    #[actionlike(DualAxis)]
    Move,
    /// Mouse / right stick look.
    #[actionlike(DualAxis)]
    Look,
    /// Jump (Space), double jump while airborne.
    Jump,
    /// Sprint (Shift).
    Sprint,
    /// Aim (right click).
    Aim,
    /// Shoot while aiming (left click).
    Shoot,
    /// Toggle the debug window (Q).
    ToggleUi,
    /// Grab cursor (left click when ungrabbed).
    GrabCursor,
    /// Release cursor (ESC).
    ReleaseCursor,
}

/// Create the default input map for player actions.
pub fn default_input_map() -> InputMap<PlayerAction> {
    InputMap::default()
        .with_dual_axis(PlayerAction::Move, VirtualDPad::wasd())
        .with_dual_axis(PlayerAction::Move, GamepadStick::LEFT)
        .with_dual_axis(PlayerAction::Look, MouseMove::default())
        .with_dual_axis(
            PlayerAction::Look,
            GamepadStick::RIGHT
                .inverted_y()
                .sensitivity(STICK_LOOK_SCALE),
        )
        .with(PlayerAction::Jump, KeyCode::Space)
        .with(PlayerAction::Jump, GamepadButton::South)
        .with(PlayerAction::Sprint, KeyCode::ShiftLeft)
        .with(PlayerAction::Sprint, KeyCode::ShiftRight)
        .with(PlayerAction::Sprint, GamepadButton::LeftThumb)
        .with(PlayerAction::Aim, MouseButton::Right)
        .with(PlayerAction::Aim, GamepadButton::LeftTrigger2)
        .with(PlayerAction::Shoot, MouseButton::Left)
        .with(PlayerAction::Shoot, GamepadButton::RightTrigger2)
        .with(PlayerAction::ToggleUi, KeyCode::KeyQ)
        .with(PlayerAction::GrabCursor, MouseButton::Left)
        .with(PlayerAction::ReleaseCursor, KeyCode::Escape)
}

/// Sample the action state into the controller's input snapshot.
///
/// Buttons are reported as held; the controller derives press edges itself.
pub fn raw_input(action_state: &ActionState<PlayerAction>) -> RawInput {
    RawInput {
        movement: action_state.clamped_axis_pair(&PlayerAction::Move),
        look: action_state.axis_pair(&PlayerAction::Look),
        jump_held: action_state.pressed(&PlayerAction::Jump),
        sprint_held: action_state.pressed(&PlayerAction::Sprint),
        aim_held: action_state.pressed(&PlayerAction::Aim),
        shoot_held: action_state.pressed(&PlayerAction::Shoot),
    }
}

// ============================================================================
// Plugin
// ============================================================================

/// Plugin that registers the action type, input focus management and cursor grab.
pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(InputManagerPlugin::<PlayerAction>::default())
            .add_systems(Startup, grab_cursor_on_startup)
            .add_systems(
                PreUpdate,
                manage_input_focus.after(InputManagerSystem::Update),
            )
            .add_systems(Update, cursor_grab_system);
    }
}

// ============================================================================
// Cursor grab
// ============================================================================

/// Set cursor grab state, centering the cursor when grabbing.
pub fn set_cursor_grab(cursor: &mut CursorOptions, window: &mut Window, grabbed: bool) {
    if grabbed {
        // Native: Use Locked mode for true mouse capture.
        // WASM: Use Confined mode (Locked not supported in browsers).
        #[cfg(not(target_family = "wasm"))]
        {
            cursor.grab_mode = CursorGrabMode::Locked;
        }
        #[cfg(target_family = "wasm")]
        {
            cursor.grab_mode = CursorGrabMode::Confined;
        }
        cursor.visible = false;
        let center = Vec2::new(window.width() / 2.0, window.height() / 2.0);
        window.set_cursor_position(Some(center));
    } else {
        cursor.grab_mode = CursorGrabMode::None;
        cursor.visible = true;
    }
}

fn is_grabbed(cursor: &CursorOptions) -> bool {
    matches!(
        cursor.grab_mode,
        CursorGrabMode::Locked | CursorGrabMode::Confined
    )
}

fn grab_cursor_on_startup(
    params: Res<LaunchParams>,
    mut cursor: Single<&mut CursorOptions>,
    mut window: Single<&mut Window, With<PrimaryWindow>>,
) {
    if !params.no_cursor_lock {
        set_cursor_grab(&mut cursor, &mut window, true);
    }
}

/// Handle cursor grab/ungrab with ESC and left-click.
fn cursor_grab_system(
    action_query: Query<&ActionState<PlayerAction>>,
    mut cursor: Single<&mut CursorOptions>,
    mut window: Single<&mut Window, With<PrimaryWindow>>,
    mut contexts: EguiContexts,
) {
    let Ok(action_state) = action_query.single() else {
        return;
    };

    if action_state.just_pressed(&PlayerAction::ReleaseCursor) {
        set_cursor_grab(&mut cursor, &mut window, false);
        return;
    }

    if action_state.just_pressed(&PlayerAction::GrabCursor) {
        // Don't grab if clicking on egui UI.
        let egui_wants_pointer = contexts
            .ctx_mut()
            .ok()
            .is_some_and(|ctx| ctx.is_pointer_over_area());

        if !egui_wants_pointer {
            set_cursor_grab(&mut cursor, &mut window, true);
        }
    }
}

// ============================================================================
// Input focus management
// ============================================================================

/// Keyboard-bound actions that should be disabled when egui wants keyboard input.
const KEYBOARD_ACTIONS: &[PlayerAction] = &[
    PlayerAction::Move,
    PlayerAction::Jump,
    PlayerAction::Sprint,
];

/// Mouse-bound actions that remain active even when egui wants keyboard input.
const MOUSE_ACTIONS: &[PlayerAction] = &[
    PlayerAction::Look,
    PlayerAction::Aim,
    PlayerAction::Shoot,
];

/// All gameplay actions (keyboard + mouse). Disabled when cursor is not grabbed.
const GAMEPLAY_ACTIONS: &[PlayerAction] = &[
    // Keyboard.
    PlayerAction::Move,
    PlayerAction::Jump,
    PlayerAction::Sprint,
    // Mouse.
    PlayerAction::Look,
    PlayerAction::Aim,
    PlayerAction::Shoot,
];

fn set_actions(
    action_state: &mut ActionState<PlayerAction>,
    actions: &[PlayerAction],
    enabled: bool,
) {
    for action in actions {
        if enabled {
            action_state.enable_action(action);
        } else {
            action_state.disable_action(action);
        }
    }
}

/// Manage input focus based on UI state and cursor grab.
///
/// `ToggleUi` is always kept enabled.
fn manage_input_focus(
    mut query: Query<&mut ActionState<PlayerAction>>,
    mut contexts: EguiContexts,
    cursor: Single<&CursorOptions>,
) {
    let egui_wants_kb = contexts
        .ctx_mut()
        .ok()
        .is_some_and(|ctx| ctx.wants_keyboard_input());

    let grabbed = is_grabbed(&cursor);

    for mut action_state in &mut query {
        action_state.enable_action(&PlayerAction::ToggleUi);

        if !grabbed {
            set_actions(&mut action_state, GAMEPLAY_ACTIONS, false);
            action_state.enable_action(&PlayerAction::GrabCursor);
            action_state.disable_action(&PlayerAction::ReleaseCursor);
        } else if egui_wants_kb {
            set_actions(&mut action_state, KEYBOARD_ACTIONS, false);
            set_actions(&mut action_state, MOUSE_ACTIONS, true);
            action_state.disable_action(&PlayerAction::GrabCursor);
            action_state.enable_action(&PlayerAction::ReleaseCursor);
        } else {
            set_actions(&mut action_state, GAMEPLAY_ACTIONS, true);
            action_state.disable_action(&PlayerAction::GrabCursor);
            action_state.enable_action(&PlayerAction::ReleaseCursor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_action_state_is_idle_input() {
        let action_state = ActionState::<PlayerAction>::default();
        assert_eq!(raw_input(&action_state), RawInput::default());
    }

    #[test]
    fn test_buttons_map_to_held_flags() {
        let mut action_state = ActionState::<PlayerAction>::default();
        action_state.press(&PlayerAction::Jump);
        action_state.press(&PlayerAction::Aim);

        let input = raw_input(&action_state);
        assert!(input.jump_held);
        assert!(input.aim_held);
        assert!(!input.sprint_held);
        assert!(!input.shoot_held);
    }

    #[test]
    fn test_default_map_binds_every_gameplay_action() {
        let map = default_input_map();
        for action in GAMEPLAY_ACTIONS {
            assert!(map.get(action).is_some(), "{action:?} is unbound");
        }
    }
}
