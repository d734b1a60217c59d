//! Gravity, jumping and double jumping.
//!
//! The controller is a two-state machine (grounded or airborne) driven entirely
//! by the grounded probe result for the tick. Timers count down in seconds and
//! are reset by the events that arm them.

use crate::animation::{AnimationSignal, Animator};
use crate::config::ControllerConfig;

/// Vertical velocity held while grounded, so the body stays pressed to the floor.
pub const GROUNDED_VELOCITY: f32 = -2.0;

/// Vertical motion state.
#[derive(Clone, Debug, PartialEq)]
pub struct VerticalState {
    /// Signed vertical velocity in m/s.
    pub vertical_velocity: f32,
    pub grounded: bool,
    /// Seconds until a ground jump is allowed. May dip slightly below zero.
    pub jump_cooldown_remaining: f32,
    /// Seconds until a double jump is allowed after leaving the ground.
    pub double_jump_window_remaining: f32,
    /// Seconds airborne left before the free-fall animation state.
    pub fall_timeout_remaining: f32,
    /// Whether the double jump for this airborne period is still unused.
    pub double_jump_available: bool,
}

/// Which kind of jump was triggered this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Jump {
    Ground,
    Double,
}

/// Owns [`VerticalState`] and advances it once per simulation tick.
#[derive(Clone, Debug)]
pub struct VerticalMotionController {
    jump_velocity: f32,
    gravity: f32,
    terminal_velocity: f32,
    jump_cooldown: f32,
    fall_timeout: f32,
    double_jump_timeout: f32,
    double_jump_enabled: bool,
    state: VerticalState,
}

impl VerticalMotionController {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            jump_velocity: config.jump_velocity(),
            gravity: config.gravity,
            terminal_velocity: config.terminal_velocity,
            jump_cooldown: config.jump_cooldown,
            fall_timeout: config.fall_timeout,
            double_jump_timeout: config.double_jump_timeout,
            double_jump_enabled: config.double_jump_enabled,
            state: VerticalState {
                vertical_velocity: 0.0,
                grounded: true,
                jump_cooldown_remaining: config.jump_cooldown,
                double_jump_window_remaining: config.double_jump_timeout,
                fall_timeout_remaining: config.fall_timeout,
                double_jump_available: false,
            },
        }
    }

    pub fn state(&self) -> &VerticalState {
        &self.state
    }

    /// Direct access to the state, for restoring or scripting a situation.
    pub fn state_mut(&mut self) -> &mut VerticalState {
        &mut self.state
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.state.vertical_velocity
    }

    /// Advance one tick.
    ///
    /// `grounded` is this tick's probe result, `jump_edge` is true only on the
    /// tick the jump button went down.
    pub fn update(
        &mut self,
        grounded: bool,
        jump_edge: bool,
        dt: f32,
        animator: &mut Animator,
    ) -> Option<Jump> {
        if grounded != self.state.grounded {
            if grounded {
                tracing::debug!(velocity = self.state.vertical_velocity, "landed");
            } else {
                tracing::debug!("left the ground");
            }
        }
        self.state.grounded = grounded;

        let jump = if grounded {
            self.update_grounded(jump_edge, dt, animator)
        } else {
            self.update_airborne(jump_edge, dt, animator)
        };

        self.apply_gravity(dt);
        jump
    }

    fn update_grounded(
        &mut self,
        jump_edge: bool,
        dt: f32,
        animator: &mut Animator,
    ) -> Option<Jump> {
        let state = &mut self.state;
        state.fall_timeout_remaining = self.fall_timeout;
        state.double_jump_window_remaining = self.double_jump_timeout;
        state.double_jump_available = self.double_jump_enabled;

        animator.send(AnimationSignal::Jump(false));
        animator.send(AnimationSignal::FreeFall(false));

        if state.vertical_velocity < 0.0 {
            state.vertical_velocity = GROUNDED_VELOCITY;
        }

        let mut jump = None;
        if jump_edge && state.jump_cooldown_remaining <= 0.0 {
            state.vertical_velocity = self.jump_velocity;
            animator.send(AnimationSignal::Jump(true));
            tracing::debug!(velocity = self.jump_velocity, "jump");
            jump = Some(Jump::Ground);
        }

        if state.jump_cooldown_remaining >= 0.0 {
            state.jump_cooldown_remaining -= dt;
        }
        jump
    }

    fn update_airborne(
        &mut self,
        jump_edge: bool,
        dt: f32,
        animator: &mut Animator,
    ) -> Option<Jump> {
        let state = &mut self.state;
        let mut jump = None;

        if jump_edge && state.double_jump_window_remaining <= 0.0 && state.double_jump_available {
            state.vertical_velocity = self.jump_velocity;
            state.double_jump_available = false;
            animator.send(AnimationSignal::Flip);
            tracing::debug!(velocity = self.jump_velocity, "double jump");
            jump = Some(Jump::Double);
        } else {
            // Landing after any airborne period needs the full cooldown again.
            state.jump_cooldown_remaining = self.jump_cooldown;

            if state.fall_timeout_remaining > 0.0 {
                state.fall_timeout_remaining -= dt;
            }
            if state.fall_timeout_remaining <= 0.0 {
                animator.send(AnimationSignal::FreeFall(true));
            }
        }

        if state.double_jump_window_remaining >= 0.0 {
            state.double_jump_window_remaining -= dt;
        }
        jump
    }

    /// Accelerate downward until terminal velocity is reached.
    ///
    /// Runs every tick after the branch logic, on top of any jump assignment.
    /// A non-negative terminal velocity stops integration entirely.
    fn apply_gravity(&mut self, dt: f32) {
        let state = &mut self.state;
        if state.vertical_velocity > self.terminal_velocity {
            state.vertical_velocity =
                (state.vertical_velocity + self.gravity * dt).max(self.terminal_velocity);
        }
    }
}
