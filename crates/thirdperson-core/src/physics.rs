//! Physics queries used by the controller.
//!
//! The controller never touches a physics world directly. It asks two
//! questions through [`CollisionQueries`]: "does this sphere overlap solid
//! ground?" and "where does this ray hit?". [`GroundedProbe`] and
//! [`AimTargetResolver`] are the only callers.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Bit mask of collision layers.
///
/// The bit layout is owned by the physics adapter; the controller only passes
/// masks through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Mask matching every layer.
    pub const ALL: Self = Self(u32::MAX);
    /// Mask matching no layer.
    pub const NONE: Self = Self(0);

    /// Whether the mask selects no layers at all.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Collision queries the physics adapter must answer synchronously.
pub trait CollisionQueries {
    /// Whether a sphere overlaps any solid collider in `mask`.
    ///
    /// Triggers and other non-solid volumes must not count.
    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> bool;

    /// First point hit by a ray against colliders in `mask`.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: LayerMask)
    -> Option<Vec3>;
}

/// Sphere overlap test that decides whether the character stands on ground.
///
/// An empty ground mask never reports ground, leaving the character
/// permanently airborne. Choosing a mask that contains the walkable layers is
/// part of the configuration contract; neither the probe nor
/// [`crate::ControllerConfig::validate`] checks it.
#[derive(Clone, Debug)]
pub struct GroundedProbe {
    offset: f32,
    radius: f32,
    mask: LayerMask,
}

impl GroundedProbe {
    pub fn new(offset: f32, radius: f32, mask: LayerMask) -> Self {
        Self {
            offset,
            radius,
            mask,
        }
    }

    /// Center of the probe sphere for a character whose feet are at `position`.
    pub fn sphere_center(&self, position: Vec3) -> Vec3 {
        position - Vec3::new(0.0, self.offset, 0.0)
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Query the physics world for ground contact.
    pub fn is_grounded(&self, physics: &dyn CollisionQueries, position: Vec3) -> bool {
        physics.overlap_sphere(self.sphere_center(position), self.radius, self.mask)
    }
}

/// A ray in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AimRay {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl AimRay {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }
}

/// Keeps track of the world point under the crosshair.
///
/// A miss leaves the previous point in place, so the target is never reset
/// to the origin once something has been hit.
#[derive(Clone, Debug)]
pub struct AimTargetResolver {
    mask: LayerMask,
    max_distance: f32,
    target: Vec3,
    has_hit: bool,
}

impl AimTargetResolver {
    pub fn new(mask: LayerMask, max_distance: f32) -> Self {
        Self {
            mask,
            max_distance,
            target: Vec3::ZERO,
            has_hit: false,
        }
    }

    /// Cast the screen-center ray and return the (possibly stale) target.
    pub fn resolve(&mut self, physics: &dyn CollisionQueries, ray: AimRay) -> Vec3 {
        if let Some(point) =
            physics.raycast(ray.origin, ray.direction, self.max_distance, self.mask)
        {
            self.target = point;
            self.has_hit = true;
        }
        self.target
    }

    /// Last resolved aim point.
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Whether any ray has hit since the controller was created.
    pub fn has_hit(&self) -> bool {
        self.has_hit
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    /// Physics stub with a single answer for each query.
    struct Fixed {
        overlap: bool,
        hit: Option<Vec3>,
        last_center: Cell<Vec3>,
    }

    impl CollisionQueries for Fixed {
        fn overlap_sphere(&self, center: Vec3, _radius: f32, mask: LayerMask) -> bool {
            self.last_center.set(center);
            self.overlap && !mask.is_empty()
        }

        fn raycast(&self, _: Vec3, _: Vec3, _: f32, _: LayerMask) -> Option<Vec3> {
            self.hit
        }
    }

    #[test]
    fn test_probe_sphere_center_uses_offset() {
        let physics = Fixed {
            overlap: true,
            hit: None,
            last_center: Cell::new(Vec3::ZERO),
        };
        let probe = GroundedProbe::new(-0.14, 0.28, LayerMask(1));
        assert!(probe.is_grounded(&physics, Vec3::new(1.0, 2.0, 3.0)));
        let center = physics.last_center.get();
        assert!((center.y - 2.14).abs() < 1e-6);
        assert!((center.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_mask_is_never_grounded() {
        let physics = Fixed {
            overlap: true,
            hit: None,
            last_center: Cell::new(Vec3::ZERO),
        };
        let probe = GroundedProbe::new(0.0, 0.28, LayerMask::NONE);
        assert!(!probe.is_grounded(&physics, Vec3::ZERO));
    }

    #[test]
    fn test_aim_miss_keeps_last_point() {
        let mut physics = Fixed {
            overlap: false,
            hit: Some(Vec3::new(4.0, 0.5, -10.0)),
            last_center: Cell::new(Vec3::ZERO),
        };
        let mut resolver = AimTargetResolver::new(LayerMask::ALL, 100.0);
        let ray = AimRay::new(Vec3::ZERO, Vec3::NEG_Z);

        assert_eq!(resolver.resolve(&physics, ray), Vec3::new(4.0, 0.5, -10.0));

        physics.hit = None;
        assert_eq!(resolver.resolve(&physics, ray), Vec3::new(4.0, 0.5, -10.0));
        assert!(resolver.has_hit());
    }

    #[test]
    fn test_aim_target_starts_at_origin() {
        let physics = Fixed {
            overlap: false,
            hit: None,
            last_center: Cell::new(Vec3::ZERO),
        };
        let mut resolver = AimTargetResolver::new(LayerMask::ALL, 100.0);
        let target = resolver.resolve(&physics, AimRay::new(Vec3::ONE, Vec3::X));
        assert_eq!(target, Vec3::ZERO);
        assert!(!resolver.has_hit());
    }
}
