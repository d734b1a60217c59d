//! Gizmo rendering of controller internals.

use bevy::color::palettes::css::{GREEN, RED, YELLOW};
use bevy::prelude::*;
use thirdperson_core::DebugDraw;

use crate::launch_params::LaunchParams;

/// Radius of the aim target marker.
const AIM_MARKER_RADIUS: f32 = 0.08;

/// Whether controller internals are drawn.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct DebugDrawSettings {
    pub enabled: bool,
}

impl From<&LaunchParams> for DebugDrawSettings {
    fn from(params: &LaunchParams) -> Self {
        Self {
            enabled: params.debug_draw,
        }
    }
}

/// Draws the grounded probe and aim target with immediate-mode gizmos.
pub struct GizmoDebugDraw<'a, 'w, 's> {
    gizmos: &'a mut Gizmos<'w, 's>,
}

impl<'a, 'w, 's> GizmoDebugDraw<'a, 'w, 's> {
    pub fn new(gizmos: &'a mut Gizmos<'w, 's>) -> Self {
        Self { gizmos }
    }
}

impl DebugDraw for GizmoDebugDraw<'_, '_, '_> {
    fn grounded_probe(&mut self, center: Vec3, radius: f32, grounded: bool) {
        let color = if grounded { GREEN } else { RED };
        self.gizmos
            .sphere(Isometry3d::from_translation(center), radius, color);
    }

    fn aim_target(&mut self, point: Vec3) {
        self.gizmos
            .sphere(Isometry3d::from_translation(point), AIM_MARKER_RADIUS, YELLOW);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_by_launch_flag() {
        let params = LaunchParams {
            debug_draw: true,
            ..Default::default()
        };
        assert!(DebugDrawSettings::from(&params).enabled);
        assert!(!DebugDrawSettings::from(&LaunchParams::default()).enabled);
    }
}
