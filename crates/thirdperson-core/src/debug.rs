//! Optional debug visualization.

use glam::Vec3;

/// Draws controller internals. Only called when debug drawing is enabled.
pub trait DebugDraw {
    /// The grounded probe sphere, colored by the probe result.
    fn grounded_probe(&mut self, center: Vec3, radius: f32, grounded: bool);
    /// The point under the crosshair.
    fn aim_target(&mut self, point: Vec3);
}
