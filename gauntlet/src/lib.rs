//! Skills 3D: a procedural Iron Man gauntlet fired by page scroll, with a
//! hologram cloud of skill icons that scatters on the blast.
//!
//! Library root: timeline, scatter, SDK builder and config modules.

mod camera;
pub mod config;
pub mod render;
pub mod scatter;
pub mod scene;
pub mod timeline;
mod ui;

pub mod prelude;
pub mod sdk;

pub use config::{gauntlet_config, ConfigError, ConfigReport, GauntletConfig, Variant};
pub use render::init_skills_3d;
pub use sdk::GauntletBuilder;
