//! Physics integration using Avian 3D.
//!
//! Provides the collision layers and answers the controller's collision
//! queries against Avian's spatial query pipeline.

use avian3d::debug_render::{PhysicsDebugPlugin, PhysicsGizmos};
use avian3d::prelude::*;
use bevy::color::palettes::css::LIME;
use bevy::gizmos::config::{GizmoConfig, GizmoConfigStore};
use bevy::prelude::*;
use thirdperson_core::CollisionQueries;

use crate::launch_params::LaunchParams;

/// Collision layers.
///
/// The bit of each layer is what the controller's layer masks refer to:
/// `Ground` is bit 0, matching the default ground mask.
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    /// Walkable surfaces and static obstacles.
    #[default]
    Ground,
    /// The player body.
    Player,
    /// Projectiles fired by the player.
    Projectile,
    /// Sensor volumes. Never count as ground.
    Trigger,
}

/// Plugin for the physics world.
pub struct PhysicsIntegrationPlugin;

impl Plugin for PhysicsIntegrationPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(PhysicsPlugins::default())
            .add_plugins(PhysicsDebugPlugin)
            .add_systems(Startup, configure_physics_debug_on_startup);
    }
}

/// Show collider outlines only when debug drawing was requested.
fn configure_physics_debug_on_startup(
    params: Res<LaunchParams>,
    mut config_store: ResMut<GizmoConfigStore>,
) {
    let physics_gizmos = PhysicsGizmos {
        collider_color: Some(LIME.into()),
        ..Default::default()
    };

    // Use negative depth_bias to render gizmos on top of geometry.
    let gizmo_config = GizmoConfig {
        enabled: params.debug_draw,
        depth_bias: -1.0,
        ..Default::default()
    };

    config_store.insert(gizmo_config, physics_gizmos);
}

/// Convert a controller layer mask into Avian's.
fn layer_mask(mask: thirdperson_core::LayerMask) -> LayerMask {
    LayerMask(mask.0)
}

/// Whether any of `hits` is a solid collider rather than a sensor.
fn touches_solid(
    hits: impl IntoIterator<Item = Entity>,
    sensors: &Query<(), With<Sensor>>,
) -> bool {
    hits.into_iter().any(|entity| !sensors.contains(entity))
}

/// The controller's view of the physics world for one character.
///
/// Queries ignore the character's own collider. Sphere overlaps also ignore
/// sensors, so trigger volumes never count as ground.
pub struct AvianQueries<'a, 'w, 's> {
    spatial_query: &'a SpatialQuery<'w, 's>,
    sensors: &'a Query<'w, 's, (), With<Sensor>>,
    character: Entity,
}

impl<'a, 'w, 's> AvianQueries<'a, 'w, 's> {
    pub fn new(
        spatial_query: &'a SpatialQuery<'w, 's>,
        sensors: &'a Query<'w, 's, (), With<Sensor>>,
        character: Entity,
    ) -> Self {
        Self {
            spatial_query,
            sensors,
            character,
        }
    }

    fn filter(&self, mask: thirdperson_core::LayerMask) -> SpatialQueryFilter {
        SpatialQueryFilter::from_mask(layer_mask(mask)).with_excluded_entities([self.character])
    }
}

impl CollisionQueries for AvianQueries<'_, '_, '_> {
    fn overlap_sphere(
        &self,
        center: Vec3,
        radius: f32,
        mask: thirdperson_core::LayerMask,
    ) -> bool {
        let hits = self.spatial_query.shape_intersections(
            &Collider::sphere(radius),
            center,
            Quat::IDENTITY,
            &self.filter(mask),
        );
        touches_solid(hits, self.sensors)
    }

    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: thirdperson_core::LayerMask,
    ) -> Option<Vec3> {
        let dir = Dir3::new(direction).ok()?;
        self.spatial_query
            .cast_ray(origin, dir, max_distance, true, &self.filter(mask))
            .map(|hit| origin + dir * hit.distance)
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::system::SystemState;
    use thirdperson_core::ControllerConfig;

    use super::*;

    #[test]
    fn test_ground_layer_matches_default_ground_mask() {
        let config = ControllerConfig::default();
        assert_eq!(GameLayer::Ground.to_bits(), config.ground_layers.0);
        assert_eq!(
            layer_mask(config.ground_layers),
            LayerMask::from(GameLayer::Ground)
        );
    }

    #[test]
    fn test_trigger_layer_is_not_ground() {
        let config = ControllerConfig::default();
        assert_eq!(GameLayer::Trigger.to_bits() & config.ground_layers.0, 0);
    }

    #[test]
    fn test_default_aim_mask_skips_projectiles_and_triggers() {
        let aim = ControllerConfig::default().aim_layer_mask;
        assert_eq!(layer_mask(aim), LayerMask::from(GameLayer::Ground));
        assert_eq!(aim.0 & GameLayer::Projectile.to_bits(), 0);
        assert_eq!(aim.0 & GameLayer::Trigger.to_bits(), 0);
    }

    #[test]
    fn test_sensor_overlap_is_not_ground() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);

        let trigger = app.world_mut().spawn(Sensor).id();
        let floor = app.world_mut().spawn(Transform::default()).id();

        let mut state: SystemState<Query<(), With<Sensor>>> =
            SystemState::new(app.world_mut());
        let sensors = state.get(app.world());

        assert!(!touches_solid([trigger], &sensors));
        assert!(touches_solid([trigger, floor], &sensors));
        assert!(!touches_solid(std::iter::empty(), &sensors));
    }
}
