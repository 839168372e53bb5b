//! Typed animation channels and the pose they write into.

use bevy::prelude::*;

use crate::scene::rig::{Digit, ARM_REST_ROTATION};

/// Scalar properties the timeline can drive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarChannel {
    WristPitch,
    FingerCurl(Digit),
    ReactorIntensity,
    ReactorGlow,
    ShockwaveOpacity,
    ShockwaveScale,
    BeamOpacity,
    BeamScale,
    Flash,
}

/// Vector properties the timeline can drive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VectorChannel {
    /// Euler XYZ angles of the arm group.
    ArmRotation,
    /// Palm translation relative to the wrist.
    PalmOffset,
}

/// Complete animated state of the gauntlet at one timeline progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub arm_rotation: Vec3,
    pub wrist_pitch: f32,
    pub palm_offset: Vec3,
    /// Proximal hinge angle per digit, indexed by [`Digit::index`].
    /// Negative values bend the digit back.
    pub finger_curl: [f32; 5],
    pub reactor_intensity: f32,
    pub reactor_glow: f32,
    pub shockwave_opacity: f32,
    pub shockwave_scale: f32,
    pub beam_opacity: f32,
    pub beam_scale: f32,
    /// 0 = normal clear color, 1 = white.
    pub flash: f32,
}

impl Pose {
    /// Raised, relaxed hand with every effect hidden.
    pub const REST: Pose = Pose {
        arm_rotation: ARM_REST_ROTATION,
        wrist_pitch: 0.0,
        palm_offset: Vec3::ZERO,
        finger_curl: [0.0; 5],
        reactor_intensity: 1.0,
        reactor_glow: 1.0,
        shockwave_opacity: 0.0,
        shockwave_scale: 0.2,
        beam_opacity: 0.0,
        beam_scale: 0.1,
        flash: 0.0,
    };

    pub fn scalar(&self, channel: ScalarChannel) -> f32 {
        match channel {
            ScalarChannel::WristPitch => self.wrist_pitch,
            ScalarChannel::FingerCurl(digit) => self.finger_curl[digit.index()],
            ScalarChannel::ReactorIntensity => self.reactor_intensity,
            ScalarChannel::ReactorGlow => self.reactor_glow,
            ScalarChannel::ShockwaveOpacity => self.shockwave_opacity,
            ScalarChannel::ShockwaveScale => self.shockwave_scale,
            ScalarChannel::BeamOpacity => self.beam_opacity,
            ScalarChannel::BeamScale => self.beam_scale,
            ScalarChannel::Flash => self.flash,
        }
    }

    pub fn set_scalar(&mut self, channel: ScalarChannel, value: f32) {
        let slot = match channel {
            ScalarChannel::WristPitch => &mut self.wrist_pitch,
            ScalarChannel::FingerCurl(digit) => &mut self.finger_curl[digit.index()],
            ScalarChannel::ReactorIntensity => &mut self.reactor_intensity,
            ScalarChannel::ReactorGlow => &mut self.reactor_glow,
            ScalarChannel::ShockwaveOpacity => &mut self.shockwave_opacity,
            ScalarChannel::ShockwaveScale => &mut self.shockwave_scale,
            ScalarChannel::BeamOpacity => &mut self.beam_opacity,
            ScalarChannel::BeamScale => &mut self.beam_scale,
            ScalarChannel::Flash => &mut self.flash,
        };
        *slot = value;
    }

    pub fn vector(&self, channel: VectorChannel) -> Vec3 {
        match channel {
            VectorChannel::ArmRotation => self.arm_rotation,
            VectorChannel::PalmOffset => self.palm_offset,
        }
    }

    pub fn set_vector(&mut self, channel: VectorChannel, value: Vec3) {
        match channel {
            VectorChannel::ArmRotation => self.arm_rotation = value,
            VectorChannel::PalmOffset => self.palm_offset = value,
        }
    }

    pub fn curl(&self, digit: Digit) -> f32 {
        self.finger_curl[digit.index()]
    }

    /// Largest absolute difference across every channel.
    pub fn max_delta(&self, other: &Pose) -> f32 {
        let vectors = [
            (self.arm_rotation - other.arm_rotation).abs().max_element(),
            (self.palm_offset - other.palm_offset).abs().max_element(),
        ];
        let curls = self
            .finger_curl
            .iter()
            .zip(other.finger_curl.iter())
            .map(|(a, b)| (a - b).abs());
        let scalars = [
            (self.wrist_pitch - other.wrist_pitch).abs(),
            (self.reactor_intensity - other.reactor_intensity).abs(),
            (self.reactor_glow - other.reactor_glow).abs(),
            (self.shockwave_opacity - other.shockwave_opacity).abs(),
            (self.shockwave_scale - other.shockwave_scale).abs(),
            (self.beam_opacity - other.beam_opacity).abs(),
            (self.beam_scale - other.beam_scale).abs(),
            (self.flash - other.flash).abs(),
        ];
        vectors
            .into_iter()
            .chain(curls)
            .chain(scalars)
            .fold(0.0, f32::max)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::REST
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_setters_round_trip_through_getters() {
        let mut pose = Pose::REST;
        pose.set_scalar(ScalarChannel::FingerCurl(Digit::Ring), -0.4);
        pose.set_scalar(ScalarChannel::Flash, 0.7);

        assert_eq!(pose.curl(Digit::Ring), -0.4);
        assert_eq!(pose.curl(Digit::Index), 0.0);
        assert_eq!(pose.scalar(ScalarChannel::Flash), 0.7);
    }

    #[test]
    fn max_delta_sees_every_channel() {
        let mut pose = Pose::REST;
        pose.set_vector(VectorChannel::PalmOffset, Vec3::new(0.0, 0.0, -0.3));
        assert!((pose.max_delta(&Pose::REST) - 0.3).abs() < 1e-6);
        assert_eq!(Pose::REST.max_delta(&Pose::REST), 0.0);
    }
}
