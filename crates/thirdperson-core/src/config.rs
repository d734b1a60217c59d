//! Controller tuning.
//!
//! Set once when the controller is built and never changed during a session.
//! Every field has a default, so a tuning file only needs to list overrides.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::physics::LayerMask;

/// Tuning values for the whole controller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // Movement.
    /// Walk speed in m/s.
    pub walk_speed: f32,
    /// Sprint speed in m/s.
    pub sprint_speed: f32,
    /// How long the facing takes to catch up with the movement direction, in `[0, 0.3]`.
    pub rotation_smooth_time: f32,
    /// Acceleration and deceleration rate (per second).
    pub speed_change_rate: f32,
    /// Use the stick magnitude to scale speed instead of treating input as digital.
    pub analog_movement: bool,

    // Jump and gravity.
    /// Height reached by a jump, in meters.
    pub jump_height: f32,
    /// Gravity acceleration. Negative.
    pub gravity: f32,
    /// Lowest vertical velocity the character can fall at. Negative.
    pub terminal_velocity: f32,
    /// Seconds that must pass on the ground before jumping again.
    pub jump_cooldown: f32,
    /// Seconds airborne before the free-fall animation state kicks in.
    pub fall_timeout: f32,
    /// Seconds airborne before a double jump is allowed.
    pub double_jump_timeout: f32,
    /// Whether the character may double jump at all.
    pub double_jump_enabled: bool,

    // Grounded probe.
    /// Vertical offset of the probe sphere. Negative values raise it above the feet.
    pub grounded_offset: f32,
    /// Radius of the probe sphere. Should match the body radius.
    pub grounded_radius: f32,
    /// Layers that count as ground.
    pub ground_layers: LayerMask,

    // Camera.
    /// Highest pitch in degrees.
    pub top_clamp: f32,
    /// Lowest pitch in degrees.
    pub bottom_clamp: f32,
    /// Extra pitch applied on top of the accumulated pitch.
    pub camera_angle_override: f32,
    /// Freeze the camera orientation.
    pub lock_camera_position: bool,
    /// Whether look input rotates the camera.
    pub cursor_input_for_look: bool,
    /// Look sensitivity outside of aim mode.
    pub normal_sensitivity: f32,
    /// Look sensitivity while aiming.
    pub aim_sensitivity: f32,

    // Aiming and shooting.
    /// Rate at which the character turns to face the aim target.
    pub rotation_speed: f32,
    /// Layers hit by the aim ray. Defaults to the ground layer only.
    pub aim_layer_mask: LayerMask,
    /// Maximum distance of the aim ray.
    pub aim_max_distance: f32,
    /// Projectile spawn point relative to the character, in its facing frame
    /// (x = right, y = up, z = forward).
    pub projectile_spawn_offset: Vec3,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            walk_speed: 2.0,
            sprint_speed: 5.335,
            rotation_smooth_time: 0.12,
            speed_change_rate: 10.0,
            analog_movement: false,

            jump_height: 1.2,
            gravity: -15.0,
            terminal_velocity: -53.0,
            jump_cooldown: 0.5,
            fall_timeout: 0.15,
            double_jump_timeout: 0.1,
            double_jump_enabled: true,

            grounded_offset: -0.14,
            grounded_radius: 0.28,
            ground_layers: LayerMask(0b1),

            top_clamp: 70.0,
            bottom_clamp: -30.0,
            camera_angle_override: 0.0,
            lock_camera_position: false,
            cursor_input_for_look: true,
            normal_sensitivity: 12.0,
            aim_sensitivity: 5.0,

            rotation_speed: 20.0,
            aim_layer_mask: LayerMask(0b1),
            aim_max_distance: 1000.0,
            projectile_spawn_offset: Vec3::new(0.35, 1.4, 0.6),
        }
    }
}

impl ControllerConfig {
    /// Velocity needed to reach `jump_height` under `gravity`.
    pub fn jump_velocity(&self) -> f32 {
        (self.jump_height * -2.0 * self.gravity).sqrt()
    }

    /// Check the configuration contract once, before the first tick.
    pub fn validate(&self) -> Result<()> {
        if self.gravity >= 0.0 {
            return Err(ConfigError::NonNegativeGravity {
                gravity: self.gravity,
            });
        }
        if self.terminal_velocity >= 0.0 {
            return Err(ConfigError::NonNegativeTerminalVelocity {
                terminal_velocity: self.terminal_velocity,
            });
        }
        for (field, value) in [
            ("jump_cooldown", self.jump_cooldown),
            ("fall_timeout", self.fall_timeout),
            ("double_jump_timeout", self.double_jump_timeout),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativeDuration { field, value });
            }
        }
        if !(0.0..=0.3).contains(&self.rotation_smooth_time) {
            return Err(ConfigError::RotationSmoothTimeOutOfRange {
                value: self.rotation_smooth_time,
            });
        }
        if self.bottom_clamp > self.top_clamp {
            return Err(ConfigError::InvertedPitchClamp {
                bottom: self.bottom_clamp,
                top: self.top_clamp,
            });
        }
        for (field, value) in [
            ("walk_speed", self.walk_speed),
            ("sprint_speed", self.sprint_speed),
            ("speed_change_rate", self.speed_change_rate),
            ("jump_height", self.jump_height),
            ("rotation_speed", self.rotation_speed),
            ("normal_sensitivity", self.normal_sensitivity),
            ("aim_sensitivity", self.aim_sensitivity),
            ("aim_max_distance", self.aim_max_distance),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativeSpeed { field, value });
            }
        }
        if self.grounded_radius < 0.0 {
            return Err(ConfigError::NegativeRadius {
                radius: self.grounded_radius,
            });
        }
        Ok(())
    }
}
