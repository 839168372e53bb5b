//! SDK entry points and builder for composing the skills 3D app.

use std::path::PathBuf;

use bevy::prelude::*;

use crate::camera::orbit_camera_plugin;
use crate::config::{self, report_config, ConfigReport, GauntletConfig, Variant};
use crate::render::{render_plugin, scroll_plugin, Backdrop, InitialProgress};
use crate::scatter::{ScatterRng, ScatterSettings};
use crate::scene::icons::{Skill, SkillSet};
use crate::scene::{screenshot_plugin, ScreenshotMode};
use crate::ui::hud_plugin;

/// Builder for a skills 3D app.
pub struct GauntletBuilder {
    config: GauntletConfig,
    report: Option<ConfigReport>,
    window_title: String,
    window_resolution: (f32, f32),
    clear_color: Color,
    scatter: ScatterSettings,
    enable_orbit_camera: bool,
}

impl Default for GauntletBuilder {
    fn default() -> Self {
        Self {
            config: GauntletConfig::default(),
            report: None,
            window_title: "Skills 3D".to_string(),
            window_resolution: (1280.0, 720.0),
            clear_color: Backdrop::default().0,
            scatter: ScatterSettings::default(),
            enable_orbit_camera: true,
        }
    }
}

impl GauntletBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from the `GAUNTLET_*` environment. Rejected values are logged
    /// once the app starts.
    pub fn from_env() -> Self {
        let (config, report) = config::gauntlet_config();
        Self {
            report: Some(report),
            ..Self::new().config(config)
        }
    }

    pub fn config(mut self, config: GauntletConfig) -> Self {
        self.config = config;
        self
    }

    pub fn variant(mut self, variant: Variant) -> Self {
        self.config.variant = variant;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn skills(mut self, skills: Vec<Skill>) -> Self {
        self.config.skills = skills;
        self
    }

    pub fn scatter_settings(mut self, settings: ScatterSettings) -> Self {
        self.scatter = settings;
        self
    }

    pub fn window_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = title.into();
        self
    }

    pub fn window_resolution(mut self, width: f32, height: f32) -> Self {
        self.window_resolution = (width, height);
        self
    }

    pub fn clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    pub fn enable_hud(mut self) -> Self {
        self.config.hud = true;
        self
    }

    pub fn disable_orbit_camera(mut self) -> Self {
        self.enable_orbit_camera = false;
        self
    }

    /// Saves one frame at `progress` to `path`, then exits.
    pub fn screenshot(mut self, path: impl Into<PathBuf>, progress: f32) -> Self {
        self.config.screenshot = Some(path.into());
        self.config.progress = Some(progress);
        self
    }

    /// Build the Bevy app with the selected configuration and plugins.
    pub fn build(self) -> App {
        let GauntletConfig {
            variant,
            seed,
            skills,
            hud,
            screenshot,
            progress,
        } = self.config;

        let mut scatter = self.scatter;
        if variant == Variant::Simple {
            scatter.flicker = 0.0;
        }

        let mut app = App::new();
        app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: self.window_title,
                resolution: self.window_resolution.into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(self.clear_color))
        .insert_resource(Backdrop(self.clear_color))
        .insert_resource(SkillSet(skills))
        .insert_resource(scatter)
        .insert_resource(ScatterRng::new(seed))
        .add_plugins(render_plugin);

        if let Some(report) = self.report {
            app.insert_resource(report)
                .add_systems(Startup, report_config);
        }
        if variant == Variant::Elaborated {
            app.add_plugins(scroll_plugin);
            if let Some(progress) = progress {
                app.insert_resource(InitialProgress(progress));
            }
        }
        if self.enable_orbit_camera {
            app.add_plugins(orbit_camera_plugin);
        }
        if hud {
            app.add_plugins(hud_plugin);
        }
        if let Some(path) = screenshot {
            app.insert_resource(ScreenshotMode::new(path))
                .add_plugins(screenshot_plugin);
        }

        app
    }
}

/// Builds the app from the environment and runs it.
pub fn run_from_env() -> AppExit {
    GauntletBuilder::from_env().build().run()
}
