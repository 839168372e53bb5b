//! Scroll-keyed animation timeline.

pub mod easing;
pub mod gauntlet;
pub mod pose;
pub mod scroll;
mod track;

pub use easing::Easing;
pub use gauntlet::{gauntlet_timeline, CHARGE, FIRE, FIRE_AT, RELAX};
pub use pose::{Pose, ScalarChannel, VectorChannel};
pub use scroll::{ScrollLayout, ScrubDriver};
pub use track::{Phase, PhaseTrack, PhaseWindow, Timeline, Track, Tween};
