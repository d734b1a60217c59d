//! Third-person camera rig.
//!
//! A pivot entity follows the player at shoulder height and takes the yaw and
//! pitch the controller pushes through [`CameraRig`]. The camera itself is a
//! child of the pivot and eases between the free-look and aim offsets.

use bevy::prelude::*;
use bevy::transform::TransformSystems;
use thirdperson_core::{CameraRigSink, CameraView};

use crate::player::{Player, PlayerSet};

/// Pivot height above the player's feet.
const PIVOT_HEIGHT: f32 = 1.4;

/// Camera offset from the pivot in free-look view.
const FREE_LOOK_OFFSET: Vec3 = Vec3::new(0.0, 0.3, 4.0);

/// Camera offset from the pivot in aim view: closer, over the right shoulder.
const AIM_OFFSET: Vec3 = Vec3::new(0.6, 0.1, 1.6);

/// Rate at which the camera eases toward the active view's offset (per second).
const VIEW_BLEND_RATE: f32 = 10.0;

/// Camera rig state as last pushed by the controller.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct CameraRig {
    /// Pivot pitch in degrees. Positive looks down.
    pub pitch: f32,
    /// Pivot yaw in degrees, clockwise from above.
    pub yaw: f32,
    pub view: CameraView,
    pub crosshair: bool,
}

impl CameraRigSink for CameraRig {
    fn set_pivot_rotation(&mut self, pitch: f32, yaw: f32) {
        self.pitch = pitch;
        self.yaw = yaw;
    }

    fn set_view(&mut self, view: CameraView) {
        self.view = view;
    }

    fn set_crosshair(&mut self, visible: bool) {
        self.crosshair = visible;
    }
}

/// Marker for the entity the camera orbits around.
#[derive(Component)]
pub struct CameraPivot;

/// The gameplay camera, a child of [`CameraPivot`].
#[derive(Component)]
pub struct FollowCamera {
    /// View the camera is currently easing toward.
    pub view: CameraView,
}

/// Plugin for the third-person camera.
pub struct CameraRigPlugin;

impl Plugin for CameraRigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraRig>()
            .add_systems(Startup, spawn_camera_rig)
            .add_systems(
                PostUpdate,
                (follow_player, blend_camera_view)
                    .chain()
                    .after(PlayerSet::Late)
                    .before(TransformSystems::Propagate),
            );
    }
}

/// Pivot rotation for Euler angles (pitch, yaw, 0) in degrees.
pub fn pivot_rotation(pitch: f32, yaw: f32) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        -yaw.to_radians(),
        -pitch.to_radians(),
        0.0,
    )
}

/// Camera offset from the pivot for `view`.
pub fn view_offset(view: CameraView) -> Vec3 {
    match view {
        CameraView::FreeLook => FREE_LOOK_OFFSET,
        CameraView::Aim => AIM_OFFSET,
    }
}

fn spawn_camera_rig(mut commands: Commands) {
    commands.spawn((
        CameraPivot,
        Transform::from_translation(Vec3::Y * PIVOT_HEIGHT),
        Visibility::default(),
        children![(
            Camera3d::default(),
            Projection::Perspective(PerspectiveProjection {
                fov: std::f32::consts::FRAC_PI_3,
                ..Default::default()
            }),
            Transform::from_translation(FREE_LOOK_OFFSET),
            FollowCamera {
                view: CameraView::FreeLook,
            },
        )],
    ));
}

/// Keep the pivot on the player and apply the controller's orientation.
fn follow_player(
    rig: Res<CameraRig>,
    player_query: Query<&Transform, (With<Player>, Without<CameraPivot>)>,
    mut pivot_query: Query<&mut Transform, With<CameraPivot>>,
) {
    let Ok(player) = player_query.single() else {
        return;
    };

    for mut pivot in &mut pivot_query {
        pivot.translation = player.translation + Vec3::Y * PIVOT_HEIGHT;
        pivot.rotation = pivot_rotation(rig.pitch, rig.yaw);
    }
}

/// Ease the camera toward the active view's offset.
fn blend_camera_view(
    time: Res<Time>,
    rig: Res<CameraRig>,
    mut camera_query: Query<(&mut Transform, &mut FollowCamera)>,
) {
    let t = (VIEW_BLEND_RATE * time.delta_secs()).clamp(0.0, 1.0);
    for (mut transform, mut camera) in &mut camera_query {
        camera.view = rig.view;
        let target = view_offset(camera.view);
        transform.translation = transform.translation.lerp(target, t);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pivot_rotation_follows_heading() {
        let forward = pivot_rotation(0.0, 90.0) * Vec3::NEG_Z;
        assert!(forward.abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn test_positive_pitch_looks_down() {
        let forward = pivot_rotation(30.0, 0.0) * Vec3::NEG_Z;
        assert!(forward.y < 0.0);
        assert!((forward.y + 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_rig_records_pushes() {
        let mut rig = CameraRig::default();
        rig.set_pivot_rotation(10.0, 45.0);
        rig.set_view(CameraView::Aim);
        rig.set_crosshair(true);
        assert_eq!(
            rig,
            CameraRig {
                pitch: 10.0,
                yaw: 45.0,
                view: CameraView::Aim,
                crosshair: true,
            }
        );
    }

    #[test]
    fn test_aim_offset_is_closer() {
        assert!(view_offset(CameraView::Aim).length() < view_offset(CameraView::FreeLook).length());
    }
}
