//! OrbitCamera component and system: auto-rotate plus left-drag, no zoom.

use std::f32::consts::{FRAC_PI_2, TAU};

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;

use crate::render::GauntletSet;

const AUTO_ROTATE: f32 = TAU / 30.0;
const DRAG_SENSITIVITY: f32 = 0.005;
const DAMPING: f32 = 0.1;
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.05;

/// Yaw/pitch orbit around `focus` at a fixed radius.
#[derive(Component, Clone, Debug)]
pub struct OrbitCamera {
    pub focus: Vec3,
    pub radius: f32,
    pub yaw: f32,
    pub pitch: f32,
    /// Radians per second added to yaw when idle.
    pub auto_rotate: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
}

impl OrbitCamera {
    pub fn new(radius: f32) -> Self {
        Self {
            focus: Vec3::ZERO,
            radius,
            yaw: 0.0,
            pitch: 0.0,
            auto_rotate: AUTO_ROTATE,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
        }
    }

    pub fn eye(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.focus + self.radius * Vec3::new(cp * sy, sp, cp * cy)
    }

    /// Feeds a drag delta in pixels.
    pub fn drag(&mut self, delta: Vec2) {
        self.yaw_velocity -= delta.x * DRAG_SENSITIVITY;
        self.pitch_velocity += delta.y * DRAG_SENSITIVITY;
    }

    /// Advances by `dt` seconds and returns the new camera transform.
    pub fn advance(&mut self, dt: f32) -> Transform {
        self.yaw += self.auto_rotate * dt + self.yaw_velocity;
        self.pitch = (self.pitch + self.pitch_velocity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.yaw_velocity *= 1.0 - DAMPING;
        self.pitch_velocity *= 1.0 - DAMPING;
        Transform::from_translation(self.eye()).looking_at(self.focus, Vec3::Y)
    }
}

pub fn orbit_camera_plugin(app: &mut App) {
    app.add_systems(Update, orbit_camera_system.in_set(GauntletSet::Camera));
}

pub fn orbit_camera_system(
    time: Res<Time>,
    mouse: Option<Res<ButtonInput<MouseButton>>>,
    mut motion: EventReader<MouseMotion>,
    mut cameras: Query<(&mut OrbitCamera, &mut Transform)>,
) {
    let dragging = mouse.is_some_and(|m| m.pressed(MouseButton::Left));
    let delta: Vec2 = motion.read().map(|m| m.delta).sum();
    for (mut orbit, mut transform) in &mut cameras {
        if dragging {
            orbit.drag(delta);
        }
        *transform = orbit.advance(time.delta_secs());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_the_positive_z_axis() {
        let orbit = OrbitCamera::new(8.0);
        assert!(orbit.eye().abs_diff_eq(Vec3::new(0.0, 0.0, 8.0), 1e-5));
    }

    #[test]
    fn auto_rotation_keeps_the_radius() {
        let mut orbit = OrbitCamera::new(8.0);
        let transform = orbit.advance(7.5);
        assert!((transform.translation.length() - 8.0).abs() < 1e-4);
        assert!((orbit.yaw - FRAC_PI_2).abs() < 1e-4);
        assert!(transform.forward().dot(-transform.translation.normalize()) > 0.9999);
    }

    #[test]
    fn drag_decays_and_pitch_is_limited() {
        let mut orbit = OrbitCamera::new(8.0);
        orbit.auto_rotate = 0.0;
        orbit.drag(Vec2::new(0.0, 10_000.0));
        for _ in 0..200 {
            orbit.advance(0.016);
        }
        assert!(orbit.pitch <= PITCH_LIMIT);
        let settled = orbit.pitch;
        orbit.advance(0.016);
        assert!((orbit.pitch - settled).abs() < 1e-4);
    }
}
