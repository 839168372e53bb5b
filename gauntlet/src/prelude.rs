//! Minimal prelude for SDK consumers.

pub use crate::config::{gauntlet_config, GauntletConfig, Variant};
pub use crate::scatter::ScatterSettings;
pub use crate::scene::icons::{default_skills, Skill};
pub use crate::sdk::{run_from_env, GauntletBuilder};
pub use crate::timeline::{gauntlet_timeline, Pose, Timeline};
