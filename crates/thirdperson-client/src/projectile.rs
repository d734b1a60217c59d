//! Projectile spawning and lifecycle management.
//!
//! Turns the controller's spawn requests into physics-enabled spheres.
//! Projectiles despawn after a fixed lifetime.

use avian3d::prelude::*;
use bevy::prelude::*;
use rand::Rng;

use crate::{physics::GameLayer, player::SpawnProjectile};

/// Base projectile radius in meters.
const PROJECTILE_RADIUS_BASE: f32 = 0.12;

/// Minimum radius scale factor.
const PROJECTILE_RADIUS_MIN_SCALE: f32 = 0.75;

/// Maximum radius scale factor.
const PROJECTILE_RADIUS_MAX_SCALE: f32 = 1.25;

/// Initial projectile speed in m/s.
const PROJECTILE_SPEED: f32 = 40.0;

/// Seconds before a projectile despawns.
const PROJECTILE_LIFETIME_SECS: f32 = 8.0;

/// Component marking an entity as a physics projectile.
#[derive(Component)]
pub struct Projectile {
    /// Counts down to despawn.
    pub lifetime: Timer,
}

/// Plugin for projectile spawning and despawning.
pub struct ProjectilePlugin;

impl Plugin for ProjectilePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (spawn_projectiles, despawn_projectiles));
    }
}

/// Spawn a sphere for every request the controller made this frame.
fn spawn_projectiles(
    mut commands: Commands,
    mut requests: MessageReader<SpawnProjectile>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mut rng = rand::rng();

    for request in requests.read() {
        let radius_scale =
            rng.random_range(PROJECTILE_RADIUS_MIN_SCALE..=PROJECTILE_RADIUS_MAX_SCALE);
        let radius = PROJECTILE_RADIUS_BASE * radius_scale;

        // Generate pastel color using HSL.
        let hue = rng.random_range(0.0..360.0);
        let color = Color::hsl(hue, 0.7, 0.85);

        let mesh = meshes.add(Sphere::new(radius));
        let material = materials.add(StandardMaterial {
            base_color: color,
            emissive: color.to_linear() * 0.5,
            ..default()
        });

        let direction = request.orientation * Vec3::NEG_Z;

        commands.spawn((
            Mesh3d(mesh),
            MeshMaterial3d(material),
            Transform::from_translation(request.position).with_rotation(request.orientation),
            RigidBody::Dynamic,
            Collider::sphere(radius),
            CollisionLayers::new(GameLayer::Projectile, [GameLayer::Ground, GameLayer::Projectile]),
            LinearVelocity(direction * PROJECTILE_SPEED),
            // Scale mass with volume (radius^3).
            Mass(radius_scale.powi(3)),
            Projectile {
                lifetime: Timer::from_seconds(PROJECTILE_LIFETIME_SECS, TimerMode::Once),
            },
        ));

        tracing::debug!(position = ?request.position, "Spawned projectile");
    }
}

/// Despawn projectiles whose lifetime ran out.
fn despawn_projectiles(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Projectile)>,
) {
    for (entity, mut projectile) in &mut query {
        if projectile.lifetime.tick(time.delta()).is_finished() {
            commands.entity(entity).despawn();
        }
    }
}
