//! The player character.
//!
//! Wraps [`CharacterControllerCore`] in a component and runs it against the
//! Avian world. The simulation pass runs in `Update` and turns the controller's
//! displacement into the body's velocity; the late pass runs in `PostUpdate`
//! once the frame's input and camera state are settled.

use std::f32::consts::TAU;

use avian3d::prelude::*;
use bevy::prelude::*;
use bevy::transform::TransformSystems;
use leafwing_input_manager::prelude::*;
use thirdperson_core::{
    AimRay, AnimationSignals, BodyState, CharacterControllerCore, Collaborators, ControllerConfig,
    DebugDraw, ProjectileSpawner,
};

use crate::{
    camera::{CameraRig, FollowCamera},
    debug::{DebugDrawSettings, GizmoDebugDraw},
    input::{PlayerAction, default_input_map, raw_input},
    physics::{AvianQueries, GameLayer},
};

/// Body capsule radius.
const BODY_RADIUS: f32 = 0.3;

/// Body capsule segment length (total height minus the two caps).
const BODY_SEGMENT: f32 = 1.2;

/// Feet position the player starts at.
const SPAWN_POSITION: Vec3 = Vec3::new(0.0, 0.5, 0.0);

/// Seconds a double-jump flip takes.
const FLIP_DURATION: f32 = 0.45;

/// Vertical amplitude of the walk bob at full sprint.
const BOB_AMPLITUDE: f32 = 0.06;

/// Walk bob cycles per meter travelled.
const BOB_FREQUENCY: f32 = 0.8;

/// Tuning the player controller is built from.
#[derive(Resource, Clone, Debug, Default)]
pub struct ControllerSettings(pub ControllerConfig);

/// Marker for the player's physics body.
#[derive(Component)]
pub struct Player;

/// The character controller driving the player.
#[derive(Component, Deref, DerefMut)]
pub struct PlayerController(pub CharacterControllerCore);

/// Latest animation signals from the controller.
#[derive(Component, Default)]
pub struct PlayerAnimation(pub AnimationSignals);

/// Geometry of the player's body.
#[derive(Component)]
pub struct PlayerBody {
    /// Distance from the body's center down to its feet.
    pub feet_offset: f32,
}

impl PlayerBody {
    pub fn feet(&self, center: Vec3) -> Vec3 {
        center - Vec3::Y * self.feet_offset
    }
}

/// Child of the player that carries the facing rotation.
#[derive(Component)]
pub struct PlayerModel;

/// Procedural body animation driven by the animation signals.
#[derive(Component, Default)]
pub struct BodyAnimation {
    /// Flip count already played.
    seen_flips: u32,
    /// Progress of the running flip in `[0, 1)`, if any.
    flip: Option<f32>,
    /// Walk cycle phase in radians.
    phase: f32,
}

impl BodyAnimation {
    /// Advance by `dt` and return the mesh's local offset and rotation.
    pub fn advance(
        &mut self,
        signals: &AnimationSignals,
        sprint_speed: f32,
        dt: f32,
    ) -> (Vec3, Quat) {
        if signals.flips > self.seen_flips {
            self.seen_flips = signals.flips;
            self.flip = Some(0.0);
        }

        let rotation = match self.flip {
            Some(progress) => {
                let progress = progress + dt / FLIP_DURATION;
                if progress >= 1.0 {
                    self.flip = None;
                    Quat::IDENTITY
                } else {
                    self.flip = Some(progress);
                    Quat::from_rotation_x(-progress * TAU)
                }
            }
            None => Quat::IDENTITY,
        };

        let offset = if signals.grounded && signals.speed > 0.0 {
            self.phase = (self.phase + signals.speed * BOB_FREQUENCY * TAU * dt) % TAU;
            let amplitude =
                BOB_AMPLITUDE * (signals.speed / sprint_speed.max(f32::EPSILON)).min(1.0);
            Vec3::Y * self.phase.sin().abs() * amplitude
        } else {
            self.phase = 0.0;
            Vec3::ZERO
        };

        (offset, rotation)
    }
}

/// A projectile the controller asked for.
#[derive(Message, Clone, Copy, Debug)]
pub struct SpawnProjectile {
    pub position: Vec3,
    pub orientation: Quat,
}

/// Forwards spawn requests as [`SpawnProjectile`] messages.
struct ProjectileQueue<'a, 'w>(&'a mut MessageWriter<'w, SpawnProjectile>);

impl ProjectileSpawner for ProjectileQueue<'_, '_> {
    fn spawn(&mut self, position: Vec3, orientation: Quat) {
        self.0.write(SpawnProjectile {
            position,
            orientation,
        });
    }
}

/// Ordering of the two controller passes.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlayerSet {
    /// Input, ground probe, vertical motion and locomotion.
    Simulate,
    /// Aim, shooting and camera.
    Late,
}

/// Plugin for the player character.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ControllerSettings>()
            .add_message::<SpawnProjectile>()
            .add_systems(Startup, spawn_player)
            .add_systems(
                Update,
                (
                    simulate_player.in_set(PlayerSet::Simulate),
                    animate_body.after(PlayerSet::Simulate),
                ),
            )
            .add_systems(
                PostUpdate,
                late_update_player
                    .in_set(PlayerSet::Late)
                    .before(TransformSystems::Propagate),
            );
    }
}

fn spawn_player(
    mut commands: Commands,
    settings: Res<ControllerSettings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let controller = match CharacterControllerCore::new(settings.0.clone(), 0.0) {
        Ok(controller) => controller,
        Err(e) => {
            tracing::error!("Cannot spawn player: {e}");
            return;
        }
    };

    let feet_offset = BODY_RADIUS + BODY_SEGMENT / 2.0;
    let body_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.9, 0.55, 0.3),
        ..default()
    });
    let visor_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.15, 0.2, 0.3),
        ..default()
    });

    commands.spawn((
        Player,
        PlayerController(controller),
        PlayerAnimation::default(),
        PlayerBody { feet_offset },
        Transform::from_translation(SPAWN_POSITION + Vec3::Y * feet_offset),
        Visibility::default(),
        (
            RigidBody::Dynamic,
            Collider::capsule(BODY_RADIUS, BODY_SEGMENT),
            CollisionLayers::new(GameLayer::Player, [GameLayer::Ground]),
            LockedAxes::ROTATION_LOCKED,
            GravityScale(0.0),
            Friction::ZERO.with_combine_rule(CoefficientCombine::Min),
            LinearVelocity::default(),
        ),
        (default_input_map(), ActionState::<PlayerAction>::default()),
        children![(
            PlayerModel,
            Transform::default(),
            Visibility::default(),
            children![(
                BodyAnimation::default(),
                Mesh3d(meshes.add(Capsule3d::new(BODY_RADIUS, BODY_SEGMENT))),
                MeshMaterial3d(body_material),
                Transform::default(),
                children![(
                    // Visor, so the facing reads at a glance.
                    Mesh3d(meshes.add(Cuboid::new(0.35, 0.12, 0.1))),
                    MeshMaterial3d(visor_material),
                    Transform::from_xyz(0.0, 0.55, -BODY_RADIUS),
                )],
            )],
        )],
    ));

    tracing::info!("Player spawned - WASD to move, right click to aim, left click to shoot");
}

/// Simulation pass: feed the controller and hand its displacement to physics.
#[allow(clippy::type_complexity)]
fn simulate_player(
    time: Res<Time>,
    debug_draw: Res<DebugDrawSettings>,
    spatial_query: SpatialQuery,
    sensors: Query<(), With<Sensor>>,
    mut gizmos: Gizmos,
    mut query: Query<
        (
            Entity,
            &Transform,
            &PlayerBody,
            &ActionState<PlayerAction>,
            &mut PlayerController,
            &mut PlayerAnimation,
            &mut LinearVelocity,
        ),
        With<Player>,
    >,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }

    for (entity, transform, body, action_state, mut controller, mut animation, mut velocity) in
        &mut query
    {
        let physics = AvianQueries::new(&spatial_query, &sensors, entity);
        let mut debug = debug_draw.enabled.then(|| GizmoDebugDraw::new(&mut gizmos));
        let mut collaborators = Collaborators {
            animation: Some(&mut animation.0),
            debug: debug.as_mut().map(|d| d as &mut dyn DebugDraw),
            ..Default::default()
        };

        let state = BodyState {
            position: body.feet(transform.translation),
            velocity: velocity.0,
        };
        let output = controller.tick(
            &raw_input(action_state),
            state,
            dt,
            &physics,
            &mut collaborators,
        );

        velocity.0 = output.displacement / dt;
    }
}

/// Late pass: aim from the camera, shoot, turn the body and push the camera rig.
#[allow(clippy::too_many_arguments, clippy::type_complexity)]
fn late_update_player(
    time: Res<Time>,
    debug_draw: Res<DebugDrawSettings>,
    spatial_query: SpatialQuery,
    sensors: Query<(), With<Sensor>>,
    mut gizmos: Gizmos,
    mut rig: ResMut<CameraRig>,
    mut projectiles: MessageWriter<SpawnProjectile>,
    camera_query: Query<&GlobalTransform, With<FollowCamera>>,
    mut query: Query<
        (
            Entity,
            &Transform,
            &PlayerBody,
            &Children,
            &mut PlayerController,
            &mut PlayerAnimation,
        ),
        With<Player>,
    >,
    mut model_query: Query<&mut Transform, (With<PlayerModel>, Without<Player>)>,
) {
    let dt = time.delta_secs();
    let Ok(camera) = camera_query.single() else {
        return;
    };
    let aim_ray = AimRay::new(camera.translation(), camera.forward().as_vec3());

    for (entity, transform, body, children, mut controller, mut animation) in &mut query {
        let physics = AvianQueries::new(&spatial_query, &sensors, entity);
        let mut debug = debug_draw.enabled.then(|| GizmoDebugDraw::new(&mut gizmos));
        let mut queue = ProjectileQueue(&mut projectiles);
        let mut collaborators = Collaborators {
            animation: Some(&mut animation.0),
            camera_rig: Some(&mut *rig),
            spawner: Some(&mut queue),
            debug: debug.as_mut().map(|d| d as &mut dyn DebugDraw),
        };

        let output = controller.late_tick(
            body.feet(transform.translation),
            aim_ray,
            dt,
            &physics,
            &mut collaborators,
        );

        for child in children.iter() {
            if let Ok(mut model) = model_query.get_mut(child) {
                model.rotation = output.body_rotation;
            }
        }
    }
}

/// Play the walk bob and the double-jump flip on the body mesh.
fn animate_body(
    time: Res<Time>,
    settings: Res<ControllerSettings>,
    player_query: Query<&PlayerAnimation, With<Player>>,
    mut mesh_query: Query<(&mut Transform, &mut BodyAnimation)>,
) {
    let Ok(animation) = player_query.single() else {
        return;
    };

    for (mut transform, mut body) in &mut mesh_query {
        let (offset, rotation) =
            body.advance(&animation.0, settings.0.sprint_speed, time.delta_secs());
        transform.translation = offset;
        transform.rotation = rotation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_feet_below_center() {
        let body = PlayerBody { feet_offset: 0.9 };
        assert_eq!(body.feet(Vec3::new(1.0, 1.4, 2.0)), Vec3::new(1.0, 0.5, 2.0));
    }

    #[test]
    fn test_flip_plays_once_per_trigger() {
        let mut animation = BodyAnimation::default();
        let mut signals = AnimationSignals {
            flips: 1,
            ..Default::default()
        };

        let (_, rotation) = animation.advance(&signals, 5.0, DT);
        assert!(rotation.angle_between(Quat::IDENTITY) > 0.0);

        // Runs to completion, then rests until the next trigger.
        for _ in 0..60 {
            animation.advance(&signals, 5.0, DT);
        }
        let (_, rotation) = animation.advance(&signals, 5.0, DT);
        assert_eq!(rotation, Quat::IDENTITY);

        signals.flips = 2;
        let (_, rotation) = animation.advance(&signals, 5.0, DT);
        assert!(rotation.angle_between(Quat::IDENTITY) > 0.0);
    }

    #[test]
    fn test_bob_only_while_moving_on_ground() {
        let mut animation = BodyAnimation::default();
        let idle = AnimationSignals {
            grounded: true,
            ..Default::default()
        };
        assert_eq!(animation.advance(&idle, 5.0, DT).0, Vec3::ZERO);

        let airborne = AnimationSignals {
            speed: 5.0,
            ..Default::default()
        };
        assert_eq!(animation.advance(&airborne, 5.0, DT).0, Vec3::ZERO);

        let running = AnimationSignals {
            speed: 5.0,
            grounded: true,
            ..Default::default()
        };
        let (offset, _) = animation.advance(&running, 5.0, DT);
        assert!(offset.y > 0.0 && offset.y <= BOB_AMPLITUDE);
    }
}
