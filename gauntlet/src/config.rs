//! Environment parsing and configuration errors.

use std::num::{ParseFloatError, ParseIntError};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use bevy::prelude::*;
use thiserror::Error;

use crate::scene::icons::{default_skills, load_skill_manifest, Skill};

const VARIANT_ENV: &str = "GAUNTLET_VARIANT";
const SEED_ENV: &str = "GAUNTLET_SEED";
const SKILLS_ENV: &str = "GAUNTLET_SKILLS";
const HUD_ENV: &str = "GAUNTLET_HUD";
const SCREENSHOT_ENV: &str = "GAUNTLET_SCREENSHOT";
const PROGRESS_ENV: &str = "GAUNTLET_PROGRESS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown variant {0:?}, expected `simple` or `elaborated`")]
    InvalidVariant(String),
    #[error("invalid seed {raw:?}: {source}")]
    InvalidSeed {
        raw: String,
        #[source]
        source: ParseIntError,
    },
    #[error("invalid number in {key}: {raw:?}: {source}")]
    InvalidFloat {
        key: &'static str,
        raw: String,
        #[source]
        source: ParseFloatError,
    },
    #[error("{key} must be a finite number, got {raw:?}")]
    NonFinite { key: &'static str, raw: String },
    #[error("invalid flag in {key}: {raw:?}")]
    InvalidFlag { key: &'static str, raw: String },
    #[error("cannot read skill manifest {path:?}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed skill manifest {path:?}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("skill manifest {0:?} lists no skills")]
    EmptyManifest(PathBuf),
}

/// Which rendition of the scene to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Variant {
    /// Idle sway and a rotating icon cloud only.
    Simple,
    /// Scroll timeline, firing sequence and icon scatter.
    #[default]
    Elaborated,
}

impl FromStr for Variant {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "elaborated" => Ok(Self::Elaborated),
            _ => Err(ConfigError::InvalidVariant(raw.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GauntletConfig {
    pub variant: Variant,
    /// Fixed RNG seed; entropy when absent.
    pub seed: Option<u64>,
    pub skills: Vec<Skill>,
    pub hud: bool,
    pub screenshot: Option<PathBuf>,
    /// Scroll progress to start at.
    pub progress: Option<f32>,
}

impl Default for GauntletConfig {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            seed: None,
            skills: default_skills(),
            hud: false,
            screenshot: None,
            progress: None,
        }
    }
}

pub fn parse_seed(raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|source| ConfigError::InvalidSeed {
        raw: raw.to_string(),
        source,
    })
}

pub fn parse_progress(raw: &str) -> Result<f32, ConfigError> {
    let value: f32 = raw.trim().parse().map_err(|source| ConfigError::InvalidFloat {
        key: PROGRESS_ENV,
        raw: raw.to_string(),
        source,
    })?;
    if !value.is_finite() {
        return Err(ConfigError::NonFinite {
            key: PROGRESS_ENV,
            raw: raw.to_string(),
        });
    }
    Ok(value.clamp(0.0, 1.0))
}

pub fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            key,
            raw: raw.to_string(),
        }),
    }
}

/// Environment values that were rejected while reading the config. Config
/// is read before the app's log subscriber exists, so these are held and
/// logged by `report_config` at startup.
#[derive(Resource, Debug, Default)]
pub struct ConfigReport {
    pub rejected: Vec<(&'static str, ConfigError)>,
    pub summary: String,
}

impl ConfigReport {
    pub fn warnings(&self) -> Vec<String> {
        self.rejected
            .iter()
            .map(|(key, err)| format!("ignoring {key}: {err}"))
            .collect()
    }

    fn read<T>(
        &mut self,
        key: &'static str,
        parse: impl FnOnce(&str) -> Result<T, ConfigError>,
    ) -> Option<T> {
        let raw = std::env::var(key).ok()?;
        match parse(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                self.rejected.push((key, err));
                None
            }
        }
    }
}

pub fn report_config(report: Res<ConfigReport>) {
    for warning in report.warnings() {
        warn!("{warning}");
    }
    info!("{}", report.summary);
}

/// Reads the `GAUNTLET_*` environment. Bad values are replaced by their
/// defaults and listed in the returned report.
pub fn gauntlet_config() -> (GauntletConfig, ConfigReport) {
    let defaults = GauntletConfig::default();
    let mut report = ConfigReport::default();
    let skills = report.read(SKILLS_ENV, |raw| load_skill_manifest(Path::new(raw)));

    let config = GauntletConfig {
        variant: report
            .read(VARIANT_ENV, |raw| raw.parse::<Variant>())
            .unwrap_or(defaults.variant),
        seed: report.read(SEED_ENV, parse_seed),
        skills: skills.unwrap_or(defaults.skills),
        hud: report
            .read(HUD_ENV, |raw| parse_flag(HUD_ENV, raw))
            .unwrap_or(defaults.hud),
        screenshot: std::env::var_os(SCREENSHOT_ENV).map(PathBuf::from),
        progress: report.read(PROGRESS_ENV, parse_progress),
    };
    report.summary = format!(
        "gauntlet config: {:?} variant, {} skills, seed {:?}",
        config.variant,
        config.skills.len(),
        config.seed
    );
    (config, report)
}
