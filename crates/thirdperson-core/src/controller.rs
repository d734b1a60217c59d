//! The per-tick orchestrator.
//!
//! [`CharacterControllerCore`] owns every sub-controller and runs them in a
//! fixed order. The host calls [`CharacterControllerCore::tick`] once per
//! simulation step and [`CharacterControllerCore::late_tick`] once afterwards
//! in the same frame. Collaborators are lent for the duration of each call.

use glam::{Quat, Vec3};

use crate::animation::{AnimationSignal, AnimationSink, Animator};
use crate::camera::{CameraRigController, CameraRigSink, CameraState};
use crate::config::ControllerConfig;
use crate::debug::DebugDraw;
use crate::error::Result;
use crate::input::{EdgeDetector, InputSnapshot, RawInput};
use crate::locomotion::{LocomotionController, MotionState};
use crate::math::rotation_from_heading;
use crate::physics::{AimRay, AimTargetResolver, CollisionQueries, GroundedProbe};
use crate::shoot::{ProjectileSpawner, ShootTrigger, SpawnRequest};
use crate::vertical::{Jump, VerticalMotionController, VerticalState};

/// Body state as resolved by the mover after the previous tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BodyState {
    /// Feet position.
    pub position: Vec3,
    /// Velocity the previous move actually achieved.
    pub velocity: Vec3,
}

/// Optional output collaborators. Absent ones are skipped.
#[derive(Default)]
pub struct Collaborators<'a> {
    pub animation: Option<&'a mut dyn AnimationSink>,
    pub camera_rig: Option<&'a mut dyn CameraRigSink>,
    pub spawner: Option<&'a mut dyn ProjectileSpawner>,
    /// Only set when debug drawing is enabled.
    pub debug: Option<&'a mut dyn DebugDraw>,
}

/// Result of a simulation tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickOutput {
    /// Displacement to hand to the mover, already scaled by `dt`.
    pub displacement: Vec3,
    pub grounded: bool,
    pub jump: Option<Jump>,
}

/// Result of a late tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LateTickOutput {
    pub aim_target: Vec3,
    /// Body rotation after aim facing.
    pub body_rotation: Quat,
    pub shot: Option<SpawnRequest>,
}

/// Locomotion and camera-aim controller for one character.
#[derive(Clone, Debug)]
pub struct CharacterControllerCore {
    config: ControllerConfig,
    edges: EdgeDetector,
    probe: GroundedProbe,
    vertical: VerticalMotionController,
    locomotion: LocomotionController,
    camera: CameraRigController,
    aim: AimTargetResolver,
    shoot: ShootTrigger,
    input: InputSnapshot,
    /// A shoot press seen by `tick`, waiting for `late_tick`.
    shoot_pending: bool,
}

impl CharacterControllerCore {
    /// Build the controller, facing `initial_yaw` degrees.
    pub fn new(config: ControllerConfig, initial_yaw: f32) -> Result<Self> {
        config.validate()?;

        let mut locomotion = LocomotionController::new(&config);
        locomotion.face(initial_yaw);
        locomotion.state_mut().target_rotation = initial_yaw;

        tracing::info!(
            walk_speed = config.walk_speed,
            sprint_speed = config.sprint_speed,
            jump_velocity = config.jump_velocity(),
            "character controller ready"
        );

        Ok(Self {
            edges: EdgeDetector::default(),
            probe: GroundedProbe::new(
                config.grounded_offset,
                config.grounded_radius,
                config.ground_layers,
            ),
            vertical: VerticalMotionController::new(&config),
            locomotion,
            camera: CameraRigController::new(&config, initial_yaw),
            aim: AimTargetResolver::new(config.aim_layer_mask, config.aim_max_distance),
            shoot: ShootTrigger::default(),
            input: InputSnapshot::default(),
            shoot_pending: false,
            config,
        })
    }

    /// Simulation pass: input, ground probe, vertical motion, locomotion.
    pub fn tick(
        &mut self,
        raw: &RawInput,
        body: BodyState,
        dt: f32,
        physics: &dyn CollisionQueries,
        collaborators: &mut Collaborators,
    ) -> TickOutput {
        self.input = self.edges.snapshot(raw);
        self.shoot_pending |= self.input.shoot_edge;

        let grounded = self.probe.is_grounded(physics, body.position);
        if let Some(debug) = collaborators.debug.as_deref_mut() {
            debug.grounded_probe(
                self.probe.sphere_center(body.position),
                self.probe.radius(),
                grounded,
            );
        }

        let mut animator = Animator::new(&mut collaborators.animation);
        animator.send(AnimationSignal::Grounded(grounded));

        let jump = self.vertical.update(grounded, self.input.jump_edge, dt, &mut animator);
        let displacement = self.locomotion.update(
            &self.input,
            self.camera.yaw(),
            self.input.aim_held,
            body.velocity,
            self.vertical.vertical_velocity(),
            dt,
            &mut animator,
        );

        TickOutput {
            displacement,
            grounded,
            jump,
        }
    }

    /// Late pass: aim target, camera, aim facing, shooting.
    ///
    /// `position` is the feet position after this frame's move. `aim_ray` is
    /// the ray through the screen center.
    pub fn late_tick(
        &mut self,
        position: Vec3,
        aim_ray: AimRay,
        dt: f32,
        physics: &dyn CollisionQueries,
        collaborators: &mut Collaborators,
    ) -> LateTickOutput {
        let aim_target = self.aim.resolve(physics, aim_ray);
        if let Some(debug) = collaborators.debug.as_deref_mut() {
            debug.aim_target(aim_target);
        }

        let aiming = self.input.aim_held;
        let shoot_edge = std::mem::take(&mut self.shoot_pending);
        self.camera.set_aiming(aiming);

        let mut shot = None;
        if aiming {
            let facing = self.locomotion.state().facing_yaw;
            if let Some(yaw) = self.camera.aim_facing(facing, position, aim_target, dt) {
                self.locomotion.face(yaw);
            }
            let spawn_point = self.spawn_point(position);
            shot = self.shoot.update(true, shoot_edge, spawn_point, aim_target);
            if let (Some(request), Some(spawner)) = (shot, collaborators.spawner.as_deref_mut()) {
                request.send_to(spawner);
            }
        }

        self.camera.look(self.input.look, dt);
        if let Some(rig) = collaborators.camera_rig.as_deref_mut() {
            self.camera.apply(rig);
        }

        LateTickOutput {
            aim_target,
            body_rotation: self.body_rotation(),
            shot,
        }
    }

    /// World-space projectile spawn point for a body at `position`.
    pub fn spawn_point(&self, position: Vec3) -> Vec3 {
        let offset = self.config.projectile_spawn_offset;
        position + self.body_rotation() * Vec3::new(offset.x, offset.y, -offset.z)
    }

    pub fn body_rotation(&self) -> Quat {
        rotation_from_heading(self.locomotion.state().facing_yaw)
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Input snapshot of the last simulation tick.
    pub fn input(&self) -> &InputSnapshot {
        &self.input
    }

    pub fn vertical(&self) -> &VerticalState {
        self.vertical.state()
    }

    pub fn vertical_mut(&mut self) -> &mut VerticalState {
        self.vertical.state_mut()
    }

    pub fn motion(&self) -> &MotionState {
        self.locomotion.state()
    }

    pub fn camera(&self) -> &CameraState {
        self.camera.state()
    }

    pub fn pivot_pitch(&self) -> f32 {
        self.camera.pivot_pitch()
    }

    pub fn aim_target(&self) -> Vec3 {
        self.aim.target()
    }

    pub fn shots(&self) -> u32 {
        self.shoot.shots()
    }
}
