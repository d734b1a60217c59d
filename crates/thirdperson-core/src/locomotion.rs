//! Ground movement and facing.
//!
//! Speed changes follow the body's actually-resolved velocity rather than the
//! speed requested last tick, so running into a wall bleeds speed off the way
//! the physics dictates.

use glam::Vec3;

use crate::animation::{AnimationSignal, Animator};
use crate::config::ControllerConfig;
use crate::input::InputSnapshot;
use crate::math::{forward_from_heading, lerp, repeat, round_to_millis, smooth_damp_angle};

/// Within this many m/s of the target speed, speed snaps to the target.
pub const SPEED_OFFSET: f32 = 0.1;

/// Horizontal motion state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MotionState {
    /// Horizontal speed requested this tick, in m/s.
    pub current_speed: f32,
    /// Smoothed target speed fed to the animation graph.
    pub animation_blend: f32,
    /// Heading the body faces, in degrees, wrapped to `[0, 360]`.
    pub facing_yaw: f32,
    /// Smoothing accumulator for `facing_yaw`.
    pub rotation_velocity: f32,
    /// Heading of the last movement input, relative to the world.
    pub target_rotation: f32,
}

/// Owns [`MotionState`] and produces the per-tick move.
#[derive(Clone, Debug)]
pub struct LocomotionController {
    walk_speed: f32,
    sprint_speed: f32,
    speed_change_rate: f32,
    rotation_smooth_time: f32,
    analog_movement: bool,
    state: MotionState,
}

impl LocomotionController {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            walk_speed: config.walk_speed,
            sprint_speed: config.sprint_speed,
            speed_change_rate: config.speed_change_rate,
            rotation_smooth_time: config.rotation_smooth_time,
            analog_movement: config.analog_movement,
            state: MotionState::default(),
        }
    }

    pub fn state(&self) -> &MotionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut MotionState {
        &mut self.state
    }

    /// Turn the body to `yaw` immediately.
    ///
    /// Used by aim mode, which steers facing toward the aim target instead of
    /// the movement direction.
    pub fn face(&mut self, yaw: f32) {
        self.state.facing_yaw = yaw;
    }

    /// Speed the input is asking for, before smoothing.
    pub fn target_speed(&self, input: &InputSnapshot) -> f32 {
        if !input.has_movement() {
            0.0
        } else if input.sprint_held {
            self.sprint_speed
        } else {
            self.walk_speed
        }
    }

    /// Advance one tick and return the displacement to hand to the mover.
    ///
    /// `resolved_velocity` is the body velocity after the previous move.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        input: &InputSnapshot,
        camera_yaw: f32,
        aim_active: bool,
        resolved_velocity: Vec3,
        vertical_velocity: f32,
        dt: f32,
        animator: &mut Animator,
    ) -> Vec3 {
        let target_speed = self.target_speed(input);
        let current_horizontal_speed =
            Vec3::new(resolved_velocity.x, 0.0, resolved_velocity.z).length();
        let input_magnitude = if self.analog_movement {
            input.movement.length()
        } else {
            1.0
        };

        let state = &mut self.state;
        let rate = dt * self.speed_change_rate;

        state.current_speed = if (current_horizontal_speed - target_speed).abs() > SPEED_OFFSET {
            round_to_millis(lerp(current_horizontal_speed, target_speed * input_magnitude, rate))
        } else {
            target_speed
        };
        state.animation_blend = lerp(state.animation_blend, target_speed, rate);

        if input.has_movement() {
            let direction = input.movement.normalize_or_zero();
            state.target_rotation = direction.x.atan2(direction.y).to_degrees() + camera_yaw;
            let rotation = smooth_damp_angle(
                state.facing_yaw,
                state.target_rotation,
                &mut state.rotation_velocity,
                self.rotation_smooth_time,
                dt,
            );
            if !aim_active {
                state.facing_yaw = repeat(rotation, 360.0);
            }
        }

        animator.send(AnimationSignal::Speed(state.animation_blend));
        animator.send(AnimationSignal::MotionSpeed(input_magnitude));

        let horizontal = forward_from_heading(state.target_rotation) * (state.current_speed * dt);
        horizontal + Vec3::new(0.0, vertical_velocity * dt, 0.0)
    }
}
