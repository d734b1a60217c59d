//! Locomotion and camera-aim controller for a third-person character.
//!
//! This crate is engine-agnostic: it only depends on `glam` for math. A host
//! engine feeds it input samples and physics query answers, and receives a
//! displacement to apply, animation signals, camera rig updates and projectile
//! spawn requests in return.
//!
//! # Tick structure
//!
//! Every frame the host runs two passes, in order:
//!
//! 1. [`CharacterControllerCore::tick`]: edge detection, ground probe, vertical
//!    motion, then locomotion. Returns the displacement for the mover.
//! 2. [`CharacterControllerCore::late_tick`]: aim ray, view switch, aim
//!    facing, shooting, then camera yaw/pitch.
//!
//! The velocity the mover actually achieved is fed back into the next `tick`
//! through [`BodyState`].

mod animation;
mod camera;
mod config;
mod controller;
mod debug;
mod error;
mod input;
mod locomotion;
pub mod math;
mod physics;
mod shoot;
mod vertical;

pub use animation::{
    AnimationParam, AnimationSignal, AnimationSignals, AnimationSink, AnimationValue, Animator,
};
pub use camera::{
    CameraRigController, CameraRigSink, CameraState, CameraView, LOOK_THRESHOLD, clamp_angle,
};
pub use config::ControllerConfig;
pub use controller::{BodyState, CharacterControllerCore, Collaborators, LateTickOutput, TickOutput};
pub use debug::DebugDraw;
pub use error::{ConfigError, Result};
pub use input::{EdgeDetector, InputSnapshot, RawInput};
pub use locomotion::{LocomotionController, MotionState, SPEED_OFFSET};
pub use physics::{AimRay, AimTargetResolver, CollisionQueries, GroundedProbe, LayerMask};
pub use shoot::{ProjectileSpawner, ShootTrigger, SpawnRequest};
pub use vertical::{GROUNDED_VELOCITY, Jump, VerticalMotionController, VerticalState};
