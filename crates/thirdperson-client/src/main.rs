//! Third-person character sandbox using Bevy and Avian.
//!
//! A capsule character walks, sprints, jumps and double jumps around a small
//! test level, with an orbiting camera that switches to an over-the-shoulder
//! view while aiming.

mod camera;
mod debug;
mod input;
mod launch_params;
mod physics;
mod player;
mod projectile;
mod ui;

use avian3d::prelude::*;
use bevy::prelude::*;
use camera::CameraRigPlugin;
use debug::DebugDrawSettings;
use input::InputPlugin;
use physics::{GameLayer, PhysicsIntegrationPlugin};
use player::{ControllerSettings, PlayerPlugin};
use projectile::ProjectilePlugin;
use ui::UiPlugin;

/// Plugin for the main application.
pub struct AppPlugin;

impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            PhysicsIntegrationPlugin,
            InputPlugin,
            PlayerPlugin,
            CameraRigPlugin,
            ProjectilePlugin,
            UiPlugin,
        ))
        .add_systems(Startup, setup_scene);
    }
}

/// Static box on the ground layer.
fn spawn_block(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    material: &Handle<StandardMaterial>,
    size: Vec3,
    transform: Transform,
) {
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::from_size(size))),
        MeshMaterial3d(material.clone()),
        transform,
        RigidBody::Static,
        Collider::cuboid(size.x, size.y, size.z),
        CollisionLayers::new(GameLayer::Ground, LayerMask::ALL),
    ));
}

/// Set up the test level: ground, obstacles, a trigger volume and lighting.
fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let ground_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.35, 0.45, 0.35),
        perceptual_roughness: 0.9,
        ..default()
    });
    let block_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.6, 0.6, 0.65),
        ..default()
    });

    // Ground plane using a large cuboid, top face at y = 0.
    spawn_block(
        &mut commands,
        &mut meshes,
        &ground_material,
        Vec3::new(200.0, 1.0, 200.0),
        Transform::from_xyz(0.0, -0.5, 0.0),
    );

    // Crates to jump onto.
    for (i, height) in [0.5_f32, 1.0, 1.5].into_iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let x = 4.0 + i as f32 * 2.5;
        spawn_block(
            &mut commands,
            &mut meshes,
            &block_material,
            Vec3::new(2.0, height, 2.0),
            Transform::from_xyz(x, height / 2.0, -8.0),
        );
    }

    // Ramp.
    spawn_block(
        &mut commands,
        &mut meshes,
        &block_material,
        Vec3::new(3.0, 0.3, 8.0),
        Transform::from_xyz(-6.0, 1.0, -8.0).with_rotation(Quat::from_rotation_x(0.25)),
    );

    // Wall to shoot at.
    spawn_block(
        &mut commands,
        &mut meshes,
        &block_material,
        Vec3::new(12.0, 4.0, 0.5),
        Transform::from_xyz(0.0, 2.0, -20.0),
    );

    // Trigger volume: the character walks through it and never stands on it.
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(3.0, 2.0, 3.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgba(0.3, 0.6, 1.0, 0.25),
            alpha_mode: AlphaMode::Blend,
            ..default()
        })),
        Transform::from_xyz(-6.0, 1.0, 4.0),
        RigidBody::Static,
        Collider::cuboid(3.0, 2.0, 3.0),
        Sensor,
        CollisionLayers::new(GameLayer::Trigger, [GameLayer::Player]),
    ));

    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(8.0, 16.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    tracing::info!("Scene setup complete");
}

fn main() {
    // Initialize tracing for native platforms.
    #[cfg(not(target_family = "wasm"))]
    {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    // Initialize tracing for WASM (logs to browser console).
    #[cfg(target_family = "wasm")]
    {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
    }

    let params = launch_params::parse();
    let config = match thirdperson_client::settings::load(params.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    };

    let mut app = App::new();

    #[allow(unused_mut)]
    let mut window = Window {
        title: "thirdperson".to_string(),
        resolution: (1280, 720).into(),
        ..Default::default()
    };

    // WASM: Fit canvas to parent element and prevent browser event handling.
    #[cfg(target_family = "wasm")]
    {
        window.fit_canvas_to_parent = true;
        window.prevent_default_event_handling = true;
    }

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(window),
        ..Default::default()
    }))
    .insert_resource(ClearColor(Color::srgb(0.55, 0.7, 0.9)))
    .insert_resource(DebugDrawSettings::from(&params))
    .insert_resource(ControllerSettings(config))
    .insert_resource(params)
    .add_plugins(AppPlugin)
    .run();
}
