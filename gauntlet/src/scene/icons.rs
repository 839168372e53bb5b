//! Hologram skill icons: spherical placement, async texture loads and
//! camera-facing panels.

use std::f32::consts::PI;
use std::path::Path;

use bevy::asset::LoadState;
use bevy::prelude::*;
use serde::Deserialize;

use crate::config::ConfigError;
use crate::scatter::{IconField, ScatterSettings};
use crate::scene::labels::spawn_skill_label;

pub const FIELD_RADIUS: f32 = 4.5;
pub const FIELD_LIFT: f32 = 0.5;
const PANEL_SIZE: f32 = 1.5;

/// One skill shown in the hologram field.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Skill {
    pub name: String,
    /// Hex brand color, `#rrggbb`.
    pub color: String,
    /// Texture path relative to the asset root.
    pub texture: String,
}

impl Skill {
    fn builtin(name: &str, color: &str, slug: &str) -> Self {
        Self {
            name: name.to_string(),
            color: color.to_string(),
            texture: format!("icons/{slug}.png"),
        }
    }

    pub fn tint(&self) -> Color {
        Srgba::hex(&self.color)
            .map(Color::Srgba)
            .unwrap_or(Color::WHITE)
    }
}

pub fn default_skills() -> Vec<Skill> {
    vec![
        Skill::builtin("VS Code", "#007acc", "vscode"),
        Skill::builtin("TS", "#3178c6", "typescript"),
        Skill::builtin("Angular", "#dd0031", "angular"),
        Skill::builtin(".NET", "#512bd4", "dotnet"),
        Skill::builtin("C#", "#9b4f96", "csharp"),
        Skill::builtin("SQL", "#00bcff", "sql"),
        Skill::builtin("Git", "#f05032", "git"),
        Skill::builtin("HTML", "#e34f26", "html"),
        Skill::builtin("CSS", "#1572b6", "css"),
    ]
}

/// Reads a skill manifest: a JSON array of `{ name, color, texture }`.
pub fn load_skill_manifest(path: &Path) -> Result<Vec<Skill>, ConfigError> {
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;
    let skills: Vec<Skill> =
        serde_json::from_str(&json).map_err(|source| ConfigError::ManifestParse {
            path: path.to_path_buf(),
            source,
        })?;
    if skills.is_empty() {
        return Err(ConfigError::EmptyManifest(path.to_path_buf()));
    }
    Ok(skills)
}

/// Even spherical spiral: `phi = acos(-1 + 2i/n)`, `theta = sqrt(n·π)·phi`.
pub fn home_positions(count: usize, radius: f32, lift: f32) -> Vec<Vec3> {
    let n = count as f32;
    (0..count)
        .map(|i| {
            let phi = (-1.0 + (2.0 * i as f32) / n).acos();
            let theta = (n * PI).sqrt() * phi;
            radius
                * Vec3::new(
                    theta.cos() * phi.sin(),
                    theta.sin() * phi.sin(),
                    phi.cos(),
                )
                + Vec3::new(0.0, lift, 0.0)
        })
        .collect()
}

/// Local rotation that makes a panel's +Z face point at `camera` in world
/// space, rolled by `roll` about that axis.
pub fn billboard_rotation(world_position: Vec3, camera: Vec3, parent_rotation: Quat, roll: f32) -> Option<Quat> {
    let to_camera = camera - world_position;
    if to_camera.length_squared() < 1e-8 {
        return None;
    }
    // looking_to points -Z along the direction, so look away from the camera.
    let facing = Transform::IDENTITY.looking_to(-to_camera, Vec3::Y).rotation;
    Some(parent_rotation.inverse() * facing * Quat::from_rotation_z(roll))
}

/// Marker for the group every panel hangs from.
#[derive(Component)]
pub struct HologramField;

/// A spawned icon panel and the side-table slot that drives it.
#[derive(Component)]
pub struct IconPanel {
    pub index: usize,
    pub material: Handle<StandardMaterial>,
}

/// Texture requests that have not resolved yet.
#[derive(Resource, Default)]
pub struct PendingIcons {
    pub loads: Vec<(usize, Handle<Image>)>,
}

/// Where one texture request stands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IconLoad {
    Ready,
    Failed(String),
    Waiting,
}

impl From<LoadState> for IconLoad {
    fn from(state: LoadState) -> Self {
        match state {
            LoadState::Loaded => IconLoad::Ready,
            LoadState::Failed(err) => IconLoad::Failed(err.to_string()),
            _ => IconLoad::Waiting,
        }
    }
}

/// Slots that resolved this frame.
#[derive(Debug, Default)]
pub struct ResolvedIcons {
    pub ready: Vec<(usize, Handle<Image>)>,
    pub failed: Vec<(usize, String)>,
}

impl PendingIcons {
    /// Takes every resolved slot out of the queue. Waiting slots stay queued
    /// and get nothing spawned for them.
    pub fn resolve(&mut self, mut state_of: impl FnMut(usize, &Handle<Image>) -> IconLoad) -> ResolvedIcons {
        let mut resolved = ResolvedIcons::default();
        self.loads.retain(|(index, handle)| match state_of(*index, handle) {
            IconLoad::Ready => {
                resolved.ready.push((*index, handle.clone()));
                false
            }
            IconLoad::Failed(reason) => {
                resolved.failed.push((*index, reason));
                false
            }
            IconLoad::Waiting => true,
        });
        resolved
    }
}

/// The skill list in use, in field order.
#[derive(Resource, Clone, Debug)]
pub struct SkillSet(pub Vec<Skill>);

impl Default for SkillSet {
    fn default() -> Self {
        Self(default_skills())
    }
}

/// Counts of spawned and dropped panels, for the HUD.
#[derive(Resource, Default, Debug)]
pub struct IconStats {
    pub visible: usize,
    pub failed: usize,
}

/// Spawns the field group, seeds the scatter side table and requests every
/// texture.
pub fn setup_icon_field(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    skills: Res<SkillSet>,
    settings: Res<ScatterSettings>,
) {
    let homes = home_positions(skills.0.len(), FIELD_RADIUS, FIELD_LIFT);
    commands.insert_resource(IconField::new(&homes, &settings));
    commands.insert_resource(IconStats::default());
    commands.spawn((
        HologramField,
        Transform::IDENTITY,
        Visibility::Visible,
        Name::new("hologram_field"),
    ));

    let loads = skills
        .0
        .iter()
        .enumerate()
        .map(|(i, skill)| (i, asset_server.load::<Image>(skill.texture.clone())))
        .collect();
    commands.insert_resource(PendingIcons { loads });
}

/// Polls pending textures: loaded ones become panels, failed ones are
/// dropped without affecting the rest.
#[allow(clippy::too_many_arguments)]
pub fn spawn_loaded_icons(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut pending: ResMut<PendingIcons>,
    mut stats: ResMut<IconStats>,
    skills: Res<SkillSet>,
    field: Res<IconField>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    groups: Query<Entity, With<HologramField>>,
) {
    if pending.loads.is_empty() {
        return;
    }
    let Ok(group) = groups.get_single() else {
        return;
    };

    let resolved = pending.resolve(|_, handle| asset_server.load_state(handle).into());
    for (index, reason) in &resolved.failed {
        warn!("skipping hologram icon {:?}: {reason}", skills.0[*index].name);
        stats.failed += 1;
    }
    if resolved.ready.is_empty() {
        return;
    }

    let quad = meshes.add(Rectangle::new(PANEL_SIZE, PANEL_SIZE));
    for (index, texture) in resolved.ready {
        let skill = &skills.0[index];
        let motion = &field.motions[index];
        let material = materials.add(StandardMaterial {
            base_color: Color::WHITE.with_alpha(motion.opacity),
            base_color_texture: Some(texture),
            unlit: true,
            alpha_mode: AlphaMode::Blend,
            double_sided: true,
            cull_mode: None,
            ..default()
        });
        let panel = commands
            .spawn((
                IconPanel {
                    index,
                    material: material.clone(),
                },
                Mesh3d(quad.clone()),
                MeshMaterial3d(material.clone()),
                Transform::from_translation(motion.position),
                Name::new(skill.name.clone()),
            ))
            .id();
        commands.entity(group).add_child(panel);
        spawn_skill_label(&mut commands, index, skill, material);
        stats.visible += 1;
        debug!("hologram icon {:?} ready", skill.name);
    }
}
