//! Camera rig: yaw/pitch accumulation and the free-look/aim view switch.
//!
//! Pitch follows the pivot convention of the rig: positive pitch tilts the view
//! downward. Yaw uses the heading convention from [`crate::math`].

use glam::{Vec2, Vec3};

use crate::config::ControllerConfig;
use crate::math::{forward_from_heading, heading_from_direction};

/// Squared look magnitude below which look input is ignored.
pub const LOOK_THRESHOLD: f32 = 0.01;

/// Which virtual camera is live. Exactly one is active at any time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CameraView {
    #[default]
    FreeLook,
    Aim,
}

impl CameraView {
    pub fn is_aim(self) -> bool {
        self == Self::Aim
    }
}

/// Receives camera rig updates.
pub trait CameraRigSink {
    /// Pivot orientation as Euler angles in degrees: (pitch, yaw, 0).
    fn set_pivot_rotation(&mut self, pitch: f32, yaw: f32);
    fn set_view(&mut self, view: CameraView);
    fn set_crosshair(&mut self, visible: bool);
}

/// Camera state.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraState {
    pub yaw: f32,
    /// Always within `[bottom_clamp, top_clamp]`.
    pub pitch: f32,
    pub view: CameraView,
    /// Look sensitivity currently in effect.
    pub sensitivity: f32,
}

/// Wrap once into `[-360, 360]`, then clamp to `[min, max]`.
///
/// A single correction pass is enough because the angle only ever moves by
/// one tick of look input between calls.
pub fn clamp_angle(angle: f32, min: f32, max: f32) -> f32 {
    let mut angle = angle;
    if angle < -360.0 {
        angle += 360.0;
    }
    if angle > 360.0 {
        angle -= 360.0;
    }
    angle.max(min).min(max)
}

/// Owns [`CameraState`].
#[derive(Clone, Debug)]
pub struct CameraRigController {
    top_clamp: f32,
    bottom_clamp: f32,
    camera_angle_override: f32,
    lock_camera_position: bool,
    cursor_input_for_look: bool,
    normal_sensitivity: f32,
    aim_sensitivity: f32,
    rotation_speed: f32,
    state: CameraState,
}

impl CameraRigController {
    pub fn new(config: &ControllerConfig, initial_yaw: f32) -> Self {
        Self {
            top_clamp: config.top_clamp,
            bottom_clamp: config.bottom_clamp,
            camera_angle_override: config.camera_angle_override,
            lock_camera_position: config.lock_camera_position,
            cursor_input_for_look: config.cursor_input_for_look,
            normal_sensitivity: config.normal_sensitivity,
            aim_sensitivity: config.aim_sensitivity,
            rotation_speed: config.rotation_speed,
            state: CameraState {
                yaw: initial_yaw,
                pitch: 0.0,
                view: CameraView::FreeLook,
                sensitivity: config.normal_sensitivity,
            },
        }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn yaw(&self) -> f32 {
        self.state.yaw
    }

    /// Pivot pitch including the fixed override.
    pub fn pivot_pitch(&self) -> f32 {
        self.state.pitch + self.camera_angle_override
    }

    /// Switch view and sensitivity for this tick's aim flag.
    pub fn set_aiming(&mut self, aiming: bool) {
        let view = if aiming {
            CameraView::Aim
        } else {
            CameraView::FreeLook
        };
        if view != self.state.view {
            tracing::debug!(?view, "camera view changed");
        }
        self.state.view = view;
        self.state.sensitivity = if aiming {
            self.aim_sensitivity
        } else {
            self.normal_sensitivity
        };
    }

    /// Accumulate look input, then clamp.
    pub fn look(&mut self, look: Vec2, dt: f32) {
        let state = &mut self.state;
        if self.cursor_input_for_look
            && !self.lock_camera_position
            && look.length_squared() >= LOOK_THRESHOLD
        {
            state.yaw += look.x * dt * state.sensitivity;
            state.pitch += look.y * dt * state.sensitivity;
        }

        state.yaw = clamp_angle(state.yaw, f32::MIN, f32::MAX);
        state.pitch = clamp_angle(state.pitch, self.bottom_clamp, self.top_clamp);
    }

    /// Heading the body should take this tick while aiming at `target`.
    ///
    /// The target is flattened to the body's height, and the body forward is
    /// blended toward it at `rotation_speed`. Returns `None` when the target
    /// sits directly above or below the body.
    pub fn aim_facing(
        &self,
        facing_yaw: f32,
        position: Vec3,
        target: Vec3,
        dt: f32,
    ) -> Option<f32> {
        let flattened = Vec3::new(target.x, position.y, target.z);
        let aim_direction = (flattened - position).try_normalize()?;
        let forward = forward_from_heading(facing_yaw);
        let blended = forward.lerp(aim_direction, (dt * self.rotation_speed).clamp(0.0, 1.0));
        if blended.length_squared() < 1e-8 {
            return None;
        }
        Some(heading_from_direction(blended))
    }

    /// Push the current state to the rig.
    pub fn apply(&self, rig: &mut dyn CameraRigSink) {
        rig.set_view(self.state.view);
        rig.set_crosshair(self.state.view.is_aim());
        rig.set_pivot_rotation(self.pivot_pitch(), self.state.yaw);
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::math::delta_angle;

    const DT: f32 = 1.0 / 60.0;

    #[derive(Default)]
    struct RecordingRig {
        pivot: (f32, f32),
        view: Option<CameraView>,
        crosshair: bool,
    }

    impl CameraRigSink for RecordingRig {
        fn set_pivot_rotation(&mut self, pitch: f32, yaw: f32) {
            self.pivot = (pitch, yaw);
        }

        fn set_view(&mut self, view: CameraView) {
            self.view = Some(view);
        }

        fn set_crosshair(&mut self, visible: bool) {
            self.crosshair = visible;
        }
    }

    #[test]
    fn test_clamp_angle_wraps_once() {
        assert!((clamp_angle(370.0, f32::MIN, f32::MAX) - 10.0).abs() < 1e-4);
        assert!((clamp_angle(-370.0, f32::MIN, f32::MAX) + 10.0).abs() < 1e-4);
        assert!((clamp_angle(360.0, f32::MIN, f32::MAX) - 360.0).abs() < 1e-4);
        assert!((clamp_angle(80.0, -30.0, 70.0) - 70.0).abs() < f32::EPSILON);
        assert!((clamp_angle(-45.0, -30.0, 70.0) + 30.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_sensitivity_follows_aim() {
        let mut camera = CameraRigController::new(&ControllerConfig::default(), 0.0);
        camera.set_aiming(true);
        assert_eq!(camera.state().view, CameraView::Aim);
        assert!((camera.state().sensitivity - 5.0).abs() < f32::EPSILON);

        camera.set_aiming(false);
        assert_eq!(camera.state().view, CameraView::FreeLook);
        assert!((camera.state().sensitivity - 12.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_look_accumulates_with_sensitivity() {
        let mut camera = CameraRigController::new(&ControllerConfig::default(), 0.0);
        camera.look(Vec2::new(6.0, 3.0), DT);
        assert!((camera.state().yaw - 6.0 * DT * 12.0).abs() < 1e-5);
        assert!((camera.state().pitch - 3.0 * DT * 12.0).abs() < 1e-5);
    }

    #[test]
    fn test_small_look_is_ignored() {
        let mut camera = CameraRigController::new(&ControllerConfig::default(), 0.0);
        camera.look(Vec2::new(0.05, 0.05), DT);
        assert!(camera.state().yaw.abs() < f32::EPSILON);
        assert!(camera.state().pitch.abs() < f32::EPSILON);
    }

    #[test]
    fn test_locked_camera_ignores_look() {
        for config in [
            ControllerConfig {
                lock_camera_position: true,
                ..Default::default()
            },
            ControllerConfig {
                cursor_input_for_look: false,
                ..Default::default()
            },
        ] {
            let mut camera = CameraRigController::new(&config, 15.0);
            camera.look(Vec2::new(100.0, 100.0), DT);
            assert!((camera.state().yaw - 15.0).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn test_apply_pushes_override() {
        let mut camera = CameraRigController::new(
            &ControllerConfig {
                camera_angle_override: 10.0,
                ..Default::default()
            },
            30.0,
        );
        camera.set_aiming(true);
        let mut rig = RecordingRig::default();
        camera.apply(&mut rig);
        assert_eq!(rig.view, Some(CameraView::Aim));
        assert!(rig.crosshair);
        assert!((rig.pivot.0 - 10.0).abs() < f32::EPSILON);
        assert!((rig.pivot.1 - 30.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_aim_facing_turns_toward_target() {
        let camera = CameraRigController::new(&ControllerConfig::default(), 0.0);
        // Facing -Z, target off to +X and above.
        let mut facing = 0.0;
        for _ in 0..120 {
            facing = camera
                .aim_facing(facing, Vec3::ZERO, Vec3::new(10.0, 5.0, 0.0), DT)
                .unwrap();
        }
        assert!(delta_angle(facing, 90.0).abs() < 0.5);
    }

    #[test]
    fn test_aim_facing_ignores_target_overhead() {
        let camera = CameraRigController::new(&ControllerConfig::default(), 0.0);
        assert_eq!(
            camera.aim_facing(0.0, Vec3::ONE, Vec3::new(1.0, 10.0, 1.0), DT),
            None
        );
    }

    proptest! {
        #[test]
        fn prop_clamp_is_idempotent(
            angle in -720.0f32..720.0,
            bottom in -90.0f32..0.0,
            top in 0.0f32..90.0,
        ) {
            let yaw = clamp_angle(angle, f32::MIN, f32::MAX);
            prop_assert_eq!(clamp_angle(yaw, f32::MIN, f32::MAX), yaw);

            let pitch = clamp_angle(angle, bottom, top);
            prop_assert!(pitch >= bottom && pitch <= top);
            prop_assert_eq!(clamp_angle(pitch, bottom, top), pitch);
        }

        #[test]
        fn prop_pitch_stays_in_bounds(
            looks in proptest::collection::vec((-500.0f32..500.0, -500.0f32..500.0), 1..100),
        ) {
            let config = ControllerConfig::default();
            let mut camera = CameraRigController::new(&config, 0.0);
            for (x, y) in looks {
                camera.look(Vec2::new(x, y), DT);
                let pitch = camera.state().pitch;
                prop_assert!(pitch >= config.bottom_clamp && pitch <= config.top_clamp);
                prop_assert!(camera.state().yaw.abs() <= 360.0 + 500.0 * DT * 12.0);
            }
        }
    }
}
