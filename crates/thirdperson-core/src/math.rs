//! Scalar and angle helpers shared by the controllers.
//!
//! Headings are in degrees, measured clockwise when viewed from above, with
//! zero facing `-Z` (the Bevy forward axis). A heading of 90 faces `+X`.

use glam::{Mat3, Quat, Vec3};

/// Linear interpolation with `t` clamped to `[0, 1]`.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Round to three decimal places.
pub fn round_to_millis(value: f32) -> f32 {
    (value * 1000.0).round() / 1000.0
}

/// Wrap `t` into `[0, length)`.
pub fn repeat(t: f32, length: f32) -> f32 {
    (t - (t / length).floor() * length).clamp(0.0, length)
}

/// Shortest signed difference from `current` to `target`, in degrees.
pub fn delta_angle(current: f32, target: f32) -> f32 {
    let mut delta = repeat(target - current, 360.0);
    if delta > 180.0 {
        delta -= 360.0;
    }
    delta
}

/// Critically damped spring toward `target`.
///
/// `velocity` is the smoothing accumulator and must persist between calls.
/// The result never overshoots `target`.
pub fn smooth_damp(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    dt: f32,
) -> f32 {
    let smooth_time = smooth_time.max(0.0001);
    let omega = 2.0 / smooth_time;

    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);
    let change = current - target;

    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * exp;
    let mut output = target + (change + temp) * exp;

    // Clamp overshoot.
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = if dt > 0.0 { (output - target) / dt } else { 0.0 };
    }
    output
}

/// [`smooth_damp`] for angles in degrees, taking the short way round.
pub fn smooth_damp_angle(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    dt: f32,
) -> f32 {
    let target = current + delta_angle(current, target);
    smooth_damp(current, target, velocity, smooth_time, dt)
}

/// Horizontal unit vector for a heading.
pub fn forward_from_heading(heading_deg: f32) -> Vec3 {
    let radians = heading_deg.to_radians();
    Vec3::new(radians.sin(), 0.0, -radians.cos())
}

/// Heading of a direction, ignoring its vertical component.
pub fn heading_from_direction(direction: Vec3) -> f32 {
    direction.x.atan2(-direction.z).to_degrees()
}

/// Body rotation for a heading (rotation about `+Y`).
pub fn rotation_from_heading(heading_deg: f32) -> Quat {
    Quat::from_rotation_y(-heading_deg.to_radians())
}

/// Rotation whose forward (`-Z`) axis points along `direction`, with `+Y` up.
///
/// Falls back to `+Z` as the up hint when `direction` is vertical, and to the
/// identity for a zero direction.
pub fn look_rotation(direction: Vec3) -> Quat {
    let Some(forward) = direction.try_normalize() else {
        return Quat::IDENTITY;
    };
    let back = -forward;
    let up_hint = if back.cross(Vec3::Y).length_squared() < 1e-8 {
        Vec3::Z
    } else {
        Vec3::Y
    };
    let right = up_hint.cross(back).normalize();
    let up = back.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, up, back))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_lerp_clamps_t() {
        assert!((lerp(0.0, 10.0, 2.0) - 10.0).abs() < 1e-6);
        assert!((lerp(0.0, 10.0, -1.0)).abs() < 1e-6);
        assert!((lerp(2.0, 4.0, 0.5) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_round_to_millis() {
        assert!((round_to_millis(1.234_56) - 1.235).abs() < 1e-6);
        assert!((round_to_millis(-0.000_4)).abs() < 1e-6);
    }

    #[test]
    fn test_delta_angle_takes_short_way() {
        assert!((delta_angle(350.0, 10.0) - 20.0).abs() < 1e-4);
        assert!((delta_angle(10.0, 350.0) + 20.0).abs() < 1e-4);
        assert!((delta_angle(0.0, 180.0) - 180.0).abs() < 1e-4);
    }

    #[test]
    fn test_heading_round_trip() {
        for heading in [-135.0_f32, -90.0, 0.0, 45.0, 90.0, 170.0] {
            let direction = forward_from_heading(heading);
            let back = heading_from_direction(direction);
            assert!(delta_angle(heading, back).abs() < 1e-3, "{heading} -> {back}");
        }
    }

    #[test]
    fn test_heading_axes() {
        assert!(forward_from_heading(0.0).abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert!(forward_from_heading(90.0).abs_diff_eq(Vec3::X, 1e-6));
        assert!((rotation_from_heading(90.0) * Vec3::NEG_Z).abs_diff_eq(Vec3::X, 1e-6));
    }

    #[test]
    fn test_look_rotation_faces_direction() {
        let direction = Vec3::new(1.0, 0.5, -2.0).normalize();
        let rotation = look_rotation(direction);
        assert!((rotation * Vec3::NEG_Z).abs_diff_eq(direction, 1e-5));
        assert!((rotation * Vec3::Y).y > 0.0);
    }

    #[test]
    fn test_look_rotation_vertical() {
        let rotation = look_rotation(Vec3::NEG_Y);
        assert!((rotation * Vec3::NEG_Z).abs_diff_eq(Vec3::NEG_Y, 1e-5));
        assert_eq!(look_rotation(Vec3::ZERO), Quat::IDENTITY);
    }

    #[test]
    fn test_smooth_damp_converges() {
        let mut velocity = 0.0;
        let mut value = 0.0;
        for _ in 0..200 {
            value = smooth_damp(value, 10.0, &mut velocity, 0.12, 1.0 / 60.0);
        }
        assert!((value - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_smooth_damp_angle_wraps() {
        let mut velocity = 0.0;
        let value = smooth_damp_angle(350.0, 10.0, &mut velocity, 0.12, 1.0 / 60.0);
        // Moves upward through 360 rather than down through 180.
        assert!(value > 350.0);
    }

    proptest! {
        #[test]
        fn prop_smooth_damp_never_overshoots(
            current in -100.0f32..100.0,
            target in -100.0f32..100.0,
            smooth_time in 0.0f32..0.3,
            dt in 0.001f32..0.1,
        ) {
            let mut velocity = 0.0;
            let mut value = current;
            for _ in 0..20 {
                value = smooth_damp(value, target, &mut velocity, smooth_time, dt);
                if current <= target {
                    prop_assert!(value <= target + 1e-3);
                } else {
                    prop_assert!(value >= target - 1e-3);
                }
            }
        }
    }
}
