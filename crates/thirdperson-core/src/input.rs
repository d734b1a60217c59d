//! Per-tick input.
//!
//! Adapters report what is held right now ([`RawInput`]). The controller turns
//! that into an [`InputSnapshot`] with press edges by comparing against the
//! previous tick, so "pressed this tick" means the same thing regardless of
//! which input backend produced the sample.

use glam::Vec2;

/// Input as sampled from the device layer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RawInput {
    /// Movement axes: x = right, y = forward. Each in `[-1, 1]`.
    pub movement: Vec2,
    /// Look delta for this tick, in device units.
    pub look: Vec2,
    pub jump_held: bool,
    pub sprint_held: bool,
    pub aim_held: bool,
    pub shoot_held: bool,
}

/// Input for a single controller tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    pub movement: Vec2,
    pub look: Vec2,
    /// True only on the tick the jump button went down.
    pub jump_edge: bool,
    pub sprint_held: bool,
    pub aim_held: bool,
    /// True only on the tick the shoot button went down.
    pub shoot_edge: bool,
}

impl InputSnapshot {
    pub fn has_movement(&self) -> bool {
        self.movement != Vec2::ZERO
    }
}

/// Derives press edges from held buttons.
#[derive(Clone, Copy, Debug, Default)]
pub struct EdgeDetector {
    jump_was_held: bool,
    shoot_was_held: bool,
}

impl EdgeDetector {
    /// Build the snapshot for this tick and remember the held state.
    pub fn snapshot(&mut self, raw: &RawInput) -> InputSnapshot {
        let snapshot = InputSnapshot {
            movement: raw.movement,
            look: raw.look,
            jump_edge: raw.jump_held && !self.jump_was_held,
            sprint_held: raw.sprint_held,
            aim_held: raw.aim_held,
            shoot_edge: raw.shoot_held && !self.shoot_was_held,
        };
        self.jump_was_held = raw.jump_held;
        self.shoot_was_held = raw.shoot_held;
        snapshot
    }
}
