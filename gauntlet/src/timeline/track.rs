//! Tracks, phases and the progress-keyed timeline that evaluates them.

use bevy::prelude::*;

use crate::timeline::easing::Easing;
use crate::timeline::pose::{Pose, ScalarChannel, VectorChannel};

/// A typed from → to interpolation on one channel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tween {
    Scalar {
        channel: ScalarChannel,
        from: f32,
        to: f32,
    },
    Vector {
        channel: VectorChannel,
        from: Vec3,
        to: Vec3,
    },
}

impl Tween {
    fn apply(&self, pose: &mut Pose, eased: f32) {
        match *self {
            Tween::Scalar { channel, from, to } => {
                pose.set_scalar(channel, from + (to - from) * eased);
            }
            Tween::Vector { channel, from, to } => {
                pose.set_vector(channel, from.lerp(to, eased));
            }
        }
    }

    fn same_channel(&self, other: &Tween) -> bool {
        match (self, other) {
            (Tween::Scalar { channel: a, .. }, Tween::Scalar { channel: b, .. }) => a == b,
            (Tween::Vector { channel: a, .. }, Tween::Vector { channel: b, .. }) => a == b,
            _ => false,
        }
    }
}

/// One animation inside a phase. `offset` and `length` are fractions of
/// the phase window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseTrack {
    pub tween: Tween,
    pub offset: f32,
    pub length: f32,
    pub easing: Easing,
}

impl PhaseTrack {
    pub fn scalar(channel: ScalarChannel, from: f32, to: f32) -> Self {
        Self {
            tween: Tween::Scalar { channel, from, to },
            offset: 0.0,
            length: 1.0,
            easing: Easing::Linear,
        }
    }

    pub fn vector(channel: VectorChannel, from: Vec3, to: Vec3) -> Self {
        Self {
            tween: Tween::Vector { channel, from, to },
            offset: 0.0,
            length: 1.0,
            easing: Easing::Linear,
        }
    }

    /// Restricts the track to `[offset, offset + length]` of its phase.
    pub fn window(mut self, offset: f32, length: f32) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }

    pub fn ease(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

/// A labeled group of parallel tracks with a relative duration.
#[derive(Clone, Debug)]
pub struct Phase {
    pub label: &'static str,
    pub duration: f32,
    pub tracks: Vec<PhaseTrack>,
}

/// A track resolved to absolute progress coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Track {
    pub tween: Tween,
    pub start: f32,
    pub duration: f32,
    pub easing: Easing,
}

impl Track {
    fn eased(&self, progress: f32) -> f32 {
        let t = if self.duration <= f32::EPSILON {
            if progress >= self.start {
                1.0
            } else {
                0.0
            }
        } else {
            ((progress - self.start) / self.duration).clamp(0.0, 1.0)
        };
        self.easing.apply(t)
    }
}

/// Absolute progress window of a phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseWindow {
    pub label: &'static str,
    pub start: f32,
    pub end: f32,
}

/// Progress-keyed timeline. The only state is the current progress; the
/// pose at any progress is a pure function of the track list.
#[derive(Resource, Clone, Debug)]
pub struct Timeline {
    tracks: Vec<Track>,
    windows: Vec<PhaseWindow>,
    rest: Pose,
    progress: f32,
}

impl Timeline {
    /// Lays phases end to end, normalizing their durations so the whole
    /// timeline spans progress [0, 1].
    pub fn new(rest: Pose, phases: Vec<Phase>) -> Self {
        let total: f32 = phases.iter().map(|p| p.duration).sum();
        debug_assert!(total > 0.0, "timeline needs a positive total duration");
        let mut cursor = 0.0;
        let mut tracks = Vec::new();
        let mut windows = Vec::with_capacity(phases.len());
        for phase in phases {
            let span = phase.duration / total;
            windows.push(PhaseWindow {
                label: phase.label,
                start: cursor,
                end: cursor + span,
            });
            for track in phase.tracks {
                tracks.push(Track {
                    tween: track.tween,
                    start: cursor + track.offset * span,
                    duration: track.length * span,
                    easing: track.easing,
                });
            }
            cursor += span;
        }
        // Stable: tracks starting together keep their declaration order.
        tracks.sort_by(|a, b| a.start.total_cmp(&b.start));
        Self {
            tracks,
            windows,
            rest,
            progress: 0.0,
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn windows(&self) -> &[PhaseWindow] {
        &self.windows
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Moves the playhead, clamped to [0, 1].
    pub fn seek(&mut self, progress: f32) {
        self.progress = unit_progress(progress);
    }

    /// Pose at the current playhead.
    pub fn pose(&self) -> Pose {
        self.sample(self.progress)
    }

    /// Pose at `progress`. A track owns its channel from its start onward
    /// until a later track on the same channel starts.
    pub fn sample(&self, progress: f32) -> Pose {
        let progress = unit_progress(progress);
        let mut pose = self.rest;
        for track in &self.tracks {
            if progress < track.start {
                break;
            }
            track.tween.apply(&mut pose, track.eased(progress));
        }
        pose
    }

    /// Label of the phase containing `progress`.
    pub fn phase_at(&self, progress: f32) -> Option<&'static str> {
        self.windows
            .iter()
            .find(|w| progress >= w.start && progress < w.end)
            .or_else(|| self.windows.last().filter(|w| progress >= w.end))
            .map(|w| w.label)
    }

    /// Pairs of consecutive tracks on the same channel whose values do not
    /// meet (the later `from` differs from the earlier `to`), plus first
    /// tracks that do not start from the rest pose.
    pub fn discontinuities(&self) -> Vec<(Track, Option<Track>)> {
        let mut broken = Vec::new();
        for (i, track) in self.tracks.iter().enumerate() {
            let previous = self.tracks[..i]
                .iter()
                .rev()
                .find(|t| t.tween.same_channel(&track.tween));
            let expected = match previous {
                Some(prev) => end_value(&prev.tween),
                None => rest_value(&self.rest, &track.tween),
            };
            if !values_meet(start_value(&track.tween), expected) {
                broken.push((*track, previous.copied()));
            }
        }
        broken
    }
}

#[derive(Clone, Copy, Debug)]
enum Value {
    Scalar(f32),
    Vector(Vec3),
}

fn start_value(tween: &Tween) -> Value {
    match *tween {
        Tween::Scalar { from, .. } => Value::Scalar(from),
        Tween::Vector { from, .. } => Value::Vector(from),
    }
}

fn end_value(tween: &Tween) -> Value {
    match *tween {
        Tween::Scalar { to, .. } => Value::Scalar(to),
        Tween::Vector { to, .. } => Value::Vector(to),
    }
}

/// Clamps into [0, 1]; NaN and infinities collapse to 0.
pub fn unit_progress(progress: f32) -> f32 {
    if progress.is_finite() {
        progress.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn rest_value(rest: &Pose, tween: &Tween) -> Value {
    match *tween {
        Tween::Scalar { channel, .. } => Value::Scalar(rest.scalar(channel)),
        Tween::Vector { channel, .. } => Value::Vector(rest.vector(channel)),
    }
}

fn values_meet(a: Value, b: Value) -> bool {
    match (a, b) {
        (Value::Scalar(a), Value::Scalar(b)) => (a - b).abs() < 1e-5,
        (Value::Vector(a), Value::Vector(b)) => a.abs_diff_eq(b, 1e-5),
        _ => false,
    }
}
