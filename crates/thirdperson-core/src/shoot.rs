//! Projectile spawn requests.

use glam::{Quat, Vec3};

use crate::math::look_rotation;

/// Creates projectiles. Flight and collision are entirely the spawner's concern.
pub trait ProjectileSpawner {
    fn spawn(&mut self, position: Vec3, orientation: Quat);
}

/// A single spawn request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnRequest {
    pub position: Vec3,
    pub orientation: Quat,
}

impl SpawnRequest {
    /// Request a projectile at `spawn_point` facing `target`.
    pub fn toward(spawn_point: Vec3, target: Vec3) -> Self {
        Self {
            position: spawn_point,
            orientation: look_rotation(target - spawn_point),
        }
    }

    /// Unit direction of travel.
    pub fn direction(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    pub fn send_to(&self, spawner: &mut dyn ProjectileSpawner) {
        spawner.spawn(self.position, self.orientation);
    }
}

/// Fires one projectile per shoot press while aiming. There is no cooldown.
#[derive(Clone, Debug, Default)]
pub struct ShootTrigger {
    shots: u32,
}

impl ShootTrigger {
    /// Total projectiles requested so far.
    pub fn shots(&self) -> u32 {
        self.shots
    }

    pub fn update(
        &mut self,
        aiming: bool,
        shoot_edge: bool,
        spawn_point: Vec3,
        target: Vec3,
    ) -> Option<SpawnRequest> {
        if !aiming || !shoot_edge {
            return None;
        }

        let request = SpawnRequest::toward(spawn_point, target);
        self.shots += 1;
        tracing::debug!(position = ?request.position, direction = ?request.direction(), "shoot");
        Some(request)
    }
}
