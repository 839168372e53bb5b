//! Hologram field per-frame work: scatter, billboarding with flicker, idle spin.

use bevy::prelude::*;

use crate::scatter::{flicker, IconField, ScatterRng, ScatterSettings};
use crate::scene::icons::{billboard_rotation, HologramField, IconPanel};
use crate::timeline::Timeline;

/// Per-frame field rotation about Y and Z while the page is idle.
pub const IDLE_SPIN: Vec2 = Vec2::new(0.005, 0.002);
const IDLE_FADE: f32 = 0.05;

/// Advances every icon's scatter state from the timeline progress.
pub fn scatter_step(
    timeline: Res<Timeline>,
    settings: Res<ScatterSettings>,
    mut field: ResMut<IconField>,
    mut rng: ResMut<ScatterRng>,
    cameras: Query<&Transform, With<Camera3d>>,
    groups: Query<&Transform, With<HologramField>>,
) {
    let (Ok(camera), Ok(group)) = (cameras.get_single(), groups.get_single()) else {
        return;
    };
    // Icons live in the field's space; so must the camera direction.
    let local_camera = group.compute_matrix().inverse().transform_point3(camera.translation);
    let toward_camera = local_camera.normalize_or_zero();

    let was_scattered = field.scattered();
    field.step(timeline.progress(), toward_camera, &settings, &mut rng.0);
    let scattered = field.scattered();
    if was_scattered == 0 && scattered > 0 {
        debug!("hologram field scattering at {:.3}", timeline.progress());
    } else if was_scattered > 0 && scattered == 0 {
        debug!("hologram field settled");
    }
}

/// Places each panel from its scatter state, turns it toward the camera and
/// writes its flickered alpha.
pub fn billboard_icons(
    field: Res<IconField>,
    settings: Res<ScatterSettings>,
    mut rng: ResMut<ScatterRng>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cameras: Query<&Transform, (With<Camera3d>, Without<IconPanel>)>,
    groups: Query<&Transform, (With<HologramField>, Without<IconPanel>)>,
    mut panels: Query<(&IconPanel, &mut Transform)>,
) {
    let (Ok(camera), Ok(group)) = (cameras.get_single(), groups.get_single()) else {
        return;
    };
    for (panel, mut transform) in &mut panels {
        let Some(motion) = field.motions.get(panel.index) else {
            continue;
        };
        transform.translation = motion.position;
        transform.scale = Vec3::splat(motion.scale);
        let world = group.transform_point(motion.position);
        if let Some(rotation) =
            billboard_rotation(world, camera.translation, group.rotation, motion.tumble.z)
        {
            transform.rotation = rotation;
        }
        if let Some(material) = materials.get_mut(&panel.material) {
            let alpha = flicker(motion.opacity, settings.flicker, &mut rng.0);
            material.base_color.set_alpha(alpha);
        }
    }
}

/// Slowly turns the icon cloud while the page sits at the top.
pub fn idle_cloud_spin(
    timeline: Option<Res<Timeline>>,
    mut groups: Query<&mut Transform, With<HologramField>>,
) {
    let progress = timeline.map_or(0.0, |t| t.progress());
    let weight = (1.0 - progress / IDLE_FADE).clamp(0.0, 1.0);
    if weight == 0.0 {
        return;
    }
    for mut transform in &mut groups {
        transform.rotate_local_y(IDLE_SPIN.x * weight);
        transform.rotate_local_z(IDLE_SPIN.y * weight);
    }
}
