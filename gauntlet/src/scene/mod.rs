pub mod graph;
pub mod icons;
pub mod labels;
pub(crate) mod materials;
pub mod rig;
pub(crate) mod screenshot;
pub mod setup;

pub use graph::{NodeId, SceneGraph, TransformNode};
pub use icons::{default_skills, home_positions, HologramField, IconPanel, IconStats, Skill, SkillSet};
pub use labels::{spawn_skill_label, track_skill_labels, SkillLabel};
pub use rig::{build_gauntlet, Digit, FingerRig, RigHandles};
pub use screenshot::{screenshot_plugin, ScreenshotMode};
pub use setup::{setup_scene, RigEntities};
