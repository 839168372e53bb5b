//! The charge → fire → relax sequence played by scroll.

use bevy::prelude::*;

use crate::scene::rig::{Digit, ARM_REST_ROTATION};
use crate::timeline::easing::Easing;
use crate::timeline::pose::{Pose, ScalarChannel, VectorChannel};
use crate::timeline::track::{Phase, PhaseTrack, Timeline};

pub const CHARGE: &str = "charge";
pub const FIRE: &str = "fire";
pub const RELAX: &str = "relax";

/// Relative phase durations: charge ends at 0.45, fire spans 0.45 to 0.50.
const CHARGE_DURATION: f32 = 4.5;
const FIRE_DURATION: f32 = 0.5;
const RELAX_DURATION: f32 = 5.0;

/// Progress at which the fire phase triggers.
pub const FIRE_AT: f32 = CHARGE_DURATION / (CHARGE_DURATION + FIRE_DURATION + RELAX_DURATION);

const AIM_ROTATION: Vec3 = Vec3::new(-0.15, 0.05, 0.0);
const WRIST_COCKED: f32 = -0.35;
const FINGER_TENSION: f32 = -0.6;
const THUMB_TENSION: f32 = -0.3;
const REACTOR_PEAK: f32 = 4.0;
const REACTOR_SPENT: f32 = 1.5;
const GLOW_PEAK: f32 = 1.6;
const RECOIL: Vec3 = Vec3::new(0.0, 0.0, -0.6);
const SHOCKWAVE_BURST: f32 = 1.0;
const SHOCKWAVE_MAX: f32 = 6.0;
const BEAM_EXTENDED: f32 = 1.0;
const BEAM_MAX: f32 = 3.0;

fn tension(digit: Digit) -> f32 {
    match digit {
        Digit::Thumb => THUMB_TENSION,
        _ => FINGER_TENSION,
    }
}

fn charge() -> Phase {
    let mut tracks = vec![
        PhaseTrack::vector(VectorChannel::ArmRotation, ARM_REST_ROTATION, AIM_ROTATION)
            .ease(Easing::QuadInOut),
        PhaseTrack::scalar(ScalarChannel::WristPitch, 0.0, WRIST_COCKED)
            .window(0.3, 0.7)
            .ease(Easing::QuadOut),
        PhaseTrack::scalar(ScalarChannel::ReactorIntensity, Pose::REST.reactor_intensity, REACTOR_PEAK)
            .window(0.4, 0.6)
            .ease(Easing::QuadIn),
        PhaseTrack::scalar(ScalarChannel::ReactorGlow, Pose::REST.reactor_glow, GLOW_PEAK)
            .window(0.4, 0.6)
            .ease(Easing::QuadIn),
    ];
    // Staggered curl, every digit locked in by the end of the phase.
    for (i, digit) in Digit::ALL.into_iter().enumerate() {
        let offset = 0.2 + 0.05 * i as f32;
        tracks.push(
            PhaseTrack::scalar(ScalarChannel::FingerCurl(digit), 0.0, tension(digit))
                .window(offset, 1.0 - offset)
                .ease(Easing::QuadOut),
        );
    }
    Phase {
        label: CHARGE,
        duration: CHARGE_DURATION,
        tracks,
    }
}

fn fire() -> Phase {
    let rest = Pose::REST;
    Phase {
        label: FIRE,
        duration: FIRE_DURATION,
        tracks: vec![
            PhaseTrack::vector(VectorChannel::PalmOffset, Vec3::ZERO, RECOIL)
                .window(0.0, 0.2)
                .ease(Easing::QuadOut),
            PhaseTrack::vector(VectorChannel::PalmOffset, RECOIL, Vec3::ZERO)
                .window(0.2, 0.8)
                .ease(Easing::SpringSnap),
            PhaseTrack::scalar(ScalarChannel::ShockwaveOpacity, 0.0, 1.0).window(0.0, 0.2),
            PhaseTrack::scalar(ScalarChannel::ShockwaveScale, rest.shockwave_scale, SHOCKWAVE_BURST)
                .window(0.0, 0.2),
            PhaseTrack::scalar(ScalarChannel::ShockwaveScale, SHOCKWAVE_BURST, SHOCKWAVE_MAX)
                .window(0.2, 0.8)
                .ease(Easing::QuadOut),
            PhaseTrack::scalar(ScalarChannel::ShockwaveOpacity, 1.0, 0.0)
                .window(0.2, 0.8)
                .ease(Easing::QuadOut),
            PhaseTrack::scalar(ScalarChannel::BeamOpacity, 0.0, 1.0).window(0.0, 0.2),
            PhaseTrack::scalar(ScalarChannel::BeamScale, rest.beam_scale, BEAM_EXTENDED)
                .window(0.0, 0.2)
                .ease(Easing::QuadOut),
            PhaseTrack::scalar(ScalarChannel::BeamScale, BEAM_EXTENDED, BEAM_MAX)
                .window(0.2, 0.8)
                .ease(Easing::QuadOut),
            PhaseTrack::scalar(ScalarChannel::BeamOpacity, 1.0, 0.0)
                .window(0.4, 0.6)
                .ease(Easing::QuadOut),
            PhaseTrack::scalar(ScalarChannel::Flash, 0.0, 1.0).window(0.0, 0.1),
            PhaseTrack::scalar(ScalarChannel::Flash, 1.0, 0.0)
                .window(0.1, 0.9)
                .ease(Easing::QuadOut),
            PhaseTrack::scalar(ScalarChannel::ReactorIntensity, REACTOR_PEAK, REACTOR_SPENT)
                .ease(Easing::QuadOut),
            PhaseTrack::scalar(ScalarChannel::ReactorGlow, GLOW_PEAK, rest.reactor_glow)
                .ease(Easing::QuadOut),
        ],
    }
}

fn relax() -> Phase {
    let mut tracks = vec![
        PhaseTrack::vector(VectorChannel::ArmRotation, AIM_ROTATION, ARM_REST_ROTATION)
            .ease(Easing::QuadInOut),
        PhaseTrack::scalar(ScalarChannel::WristPitch, WRIST_COCKED, 0.0)
            .window(0.0, 0.6)
            .ease(Easing::QuadInOut),
        PhaseTrack::scalar(ScalarChannel::ReactorIntensity, REACTOR_SPENT, Pose::REST.reactor_intensity)
            .window(0.0, 0.6),
        // Both effects are transparent by now; shrink them back out of sight.
        PhaseTrack::scalar(ScalarChannel::ShockwaveScale, SHOCKWAVE_MAX, Pose::REST.shockwave_scale)
            .window(0.0, 0.2),
        PhaseTrack::scalar(ScalarChannel::BeamScale, BEAM_MAX, Pose::REST.beam_scale)
            .window(0.0, 0.2),
    ];
    for digit in Digit::ALL {
        tracks.push(
            PhaseTrack::scalar(ScalarChannel::FingerCurl(digit), tension(digit), 0.0)
                .window(0.0, 0.6)
                .ease(Easing::QuadInOut),
        );
    }
    Phase {
        label: RELAX,
        duration: RELAX_DURATION,
        tracks,
    }
}

/// Builds the full gauntlet timeline, playhead at 0.
pub fn gauntlet_timeline() -> Timeline {
    Timeline::new(Pose::REST, vec![charge(), fire(), relax()])
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn fire_triggers_at_forty_five_percent() {
        let timeline = gauntlet_timeline();
        assert!((FIRE_AT - 0.45).abs() < 1e-6);
        let windows = timeline.windows();
        assert_eq!(windows[1].label, FIRE);
        assert!((windows[1].start - 0.45).abs() < 1e-6);
        assert!((windows[1].end - 0.50).abs() < 1e-6);
    }

    #[test]
    fn every_channel_hands_off_without_jumps() {
        let timeline = gauntlet_timeline();
        assert!(timeline.discontinuities().is_empty());
    }

    #[test]
    fn progress_zero_is_the_rest_pose() {
        let pose = gauntlet_timeline().sample(0.0);
        assert_eq!(pose.arm_rotation, ARM_REST_ROTATION);
        for digit in Digit::ALL {
            assert_eq!(pose.curl(digit), 0.0);
        }
        assert_eq!(pose.shockwave_opacity, 0.0);
        assert_eq!(pose.beam_opacity, 0.0);
        assert_eq!(pose.flash, 0.0);
    }

    #[test]
    fn charge_peaks_exactly_at_the_trigger() {
        let timeline = gauntlet_timeline();
        let pose = timeline.sample(FIRE_AT);
        for digit in Digit::ALL {
            assert!((pose.curl(digit) - tension(digit)).abs() < EPS, "{}", digit.name());
        }
        assert!((pose.reactor_intensity - REACTOR_PEAK).abs() < EPS);
        assert!(pose.reactor_intensity >= timeline.sample(0.3).reactor_intensity);
        assert!(pose.arm_rotation.abs_diff_eq(AIM_ROTATION, EPS));
    }

    #[test]
    fn fire_visuals_fade_in_after_the_trigger() {
        let timeline = gauntlet_timeline();
        let at = timeline.sample(FIRE_AT);
        let soon = timeline.sample(FIRE_AT + 0.005);
        let peak = timeline.sample(FIRE_AT + 0.01);

        assert!(at.shockwave_opacity < soon.shockwave_opacity);
        assert!(soon.shockwave_opacity < peak.shockwave_opacity);
        assert!((peak.shockwave_opacity - 1.0).abs() < EPS);
        assert!((peak.beam_opacity - 1.0).abs() < EPS);
        assert!(soon.flash > 0.0);
    }

    #[test]
    fn palm_recoils_and_springs_back() {
        let timeline = gauntlet_timeline();
        let recoiled = timeline.sample(FIRE_AT + 0.01);
        assert!((recoiled.palm_offset - RECOIL).length() < EPS);
        let settled = timeline.sample(0.5);
        assert!(settled.palm_offset.length() < EPS);
        let midway = timeline.sample(0.47);
        assert!(midway.palm_offset.z > RECOIL.z && midway.palm_offset.z < 0.0);
    }

    #[test]
    fn effects_are_gone_after_fire() {
        let pose = gauntlet_timeline().sample(0.55);
        assert!(pose.shockwave_opacity.abs() < EPS);
        assert!(pose.beam_opacity.abs() < EPS);
        assert!(pose.flash.abs() < EPS);
    }

    #[test]
    fn relax_returns_to_the_raised_pose() {
        let pose = gauntlet_timeline().sample(1.0);
        assert!(pose.arm_rotation.abs_diff_eq(ARM_REST_ROTATION, EPS));
        assert!(pose.max_delta(&Pose::REST) < EPS);
    }

    #[test]
    fn sampling_is_continuous() {
        let timeline = gauntlet_timeline();
        let steps = 10_000;
        let mut prev = timeline.sample(0.0);
        for step in 1..=steps {
            let pose = timeline.sample(step as f32 / steps as f32);
            let delta = pose.max_delta(&prev);
            assert!(delta < 0.1, "jump of {delta} at step {step}");
            prev = pose;
        }
    }

    #[test]
    fn seeking_twice_is_idempotent() {
        let mut timeline = gauntlet_timeline();
        timeline.seek(0.47);
        let once = timeline.pose();
        timeline.seek(0.47);
        assert_eq!(timeline.pose(), once);
    }

    #[test]
    fn phase_labels_follow_progress() {
        let timeline = gauntlet_timeline();
        assert_eq!(timeline.phase_at(0.2), Some(CHARGE));
        assert_eq!(timeline.phase_at(0.46), Some(FIRE));
        assert_eq!(timeline.phase_at(0.8), Some(RELAX));
    }
}
