//! HUD overlay: scroll progress, timeline phase, hologram counts, FPS.

use bevy::color::ColorToPacked;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPlugin};

use crate::render::{GauntletSet, Mounted};
use crate::scatter::IconField;
use crate::scene::icons::{IconStats, SkillSet};
use crate::timeline::{ScrubDriver, Timeline};

/// Snapshot of the animation state shown by the overlay.
#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct HudState {
    pub progress: f32,
    pub target: f32,
    pub phase: Option<&'static str>,
    pub scattered: usize,
    pub visible: usize,
    pub failed: usize,
}

pub fn hud_plugin(app: &mut App) {
    app.add_plugins(EguiPlugin)
        .add_plugins(FrameTimeDiagnosticsPlugin)
        .init_resource::<HudState>()
        .add_systems(
            Update,
            (update_hud_state, hud_overlay_system)
                .chain()
                .after(GauntletSet::Billboard)
                .run_if(resource_exists::<Mounted>),
        );
}

pub fn update_hud_state(
    mut hud: ResMut<HudState>,
    timeline: Res<Timeline>,
    scrub: Res<ScrubDriver>,
    field: Option<Res<IconField>>,
    stats: Option<Res<IconStats>>,
) {
    let progress = timeline.progress();
    let next = HudState {
        progress,
        target: scrub.target(),
        phase: timeline.phase_at(progress),
        scattered: field.map_or(0, |f| f.scattered()),
        visible: stats.as_ref().map_or(0, |s| s.visible),
        failed: stats.as_ref().map_or(0, |s| s.failed),
    };
    if *hud != next {
        *hud = next;
    }
}

fn hud_overlay_system(
    mut contexts: EguiContexts,
    hud: Res<HudState>,
    skills: Res<SkillSet>,
    diagnostics: Res<DiagnosticsStore>,
) {
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|d| d.smoothed())
        .unwrap_or(0.0);

    egui::Window::new("Skills 3D")
        .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0])
        .resizable(false)
        .collapsible(false)
        .title_bar(false)
        .frame(
            egui::Frame::default()
                .fill(egui::Color32::from_rgba_premultiplied(10, 15, 25, 210))
                .inner_margin(egui::Margin::same(12))
                .corner_radius(egui::CornerRadius::same(6)),
        )
        .show(contexts.ctx_mut(), |ui| {
            ui.style_mut().override_text_style = Some(egui::TextStyle::Monospace);
            ui.visuals_mut().override_text_color = Some(egui::Color32::from_rgb(200, 220, 240));

            ui.label(
                egui::RichText::new(hud.phase.unwrap_or("idle").to_uppercase())
                    .size(16.0)
                    .color(egui::Color32::from_rgb(0, 220, 255)),
            );
            ui.add_space(4.0);

            ui.add(
                egui::ProgressBar::new(hud.progress)
                    .text(format!("{:.1}%", hud.progress * 100.0))
                    .fill(egui::Color32::from_rgb(180, 30, 30)),
            );
            ui.label(format!("Target  {:.3}", hud.target));
            ui.add_space(4.0);

            ui.label(format!("Icons  {}/{}", hud.visible, skills.0.len()));
            if hud.failed > 0 {
                ui.label(
                    egui::RichText::new(format!("Failed  {}", hud.failed))
                        .color(egui::Color32::from_rgb(240, 120, 80)),
                );
            }
            ui.label(format!("Scattered  {}", hud.scattered));
            ui.horizontal_wrapped(|ui| {
                for skill in &skills.0 {
                    let [r, g, b, _] = skill.tint().to_srgba().to_u8_array();
                    ui.label(egui::RichText::new(&skill.name).color(egui::Color32::from_rgb(r, g, b)));
                }
            });

            ui.separator();
            ui.label(format!("FPS  {fps:.0}"));
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scatter::ScatterSettings;
    use crate::scene::icons::home_positions;
    use crate::timeline::gauntlet_timeline;

    #[test]
    fn hud_state_mirrors_the_animation() {
        let mut timeline = gauntlet_timeline();
        timeline.seek(0.47);
        let mut scrub = ScrubDriver::default();
        scrub.set_target(0.6);

        let mut app = App::new();
        app.init_resource::<HudState>()
            .insert_resource(timeline)
            .insert_resource(scrub)
            .insert_resource(IconField::new(
                &home_positions(9, 4.5, 0.5),
                &ScatterSettings::default(),
            ))
            .insert_resource(IconStats { visible: 7, failed: 2 })
            .add_systems(Update, update_hud_state);
        app.update();

        let hud = app.world().resource::<HudState>();
        assert!((hud.progress - 0.47).abs() < 1e-6);
        assert_eq!(hud.target, 0.6);
        assert_eq!(hud.phase, Some("fire"));
        assert_eq!(hud.scattered, 0);
        assert_eq!((hud.visible, hud.failed), (7, 2));
    }
}
