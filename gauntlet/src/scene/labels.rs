//! Skill names drawn over each hologram panel.

use bevy::prelude::*;

use crate::scatter::IconField;
use crate::scene::icons::{HologramField, Skill};

const LABEL_WIDTH: f32 = 120.0;
const LABEL_FONT_SIZE: f32 = 18.0;

/// Screen-space name tag pinned to the panel in field slot `index`.
#[derive(Component, Debug)]
pub struct SkillLabel {
    pub index: usize,
    pub tint: Color,
    /// The panel's material; the label fades with its alpha.
    pub material: Handle<StandardMaterial>,
}

pub fn spawn_skill_label(
    commands: &mut Commands,
    index: usize,
    skill: &Skill,
    material: Handle<StandardMaterial>,
) -> Entity {
    let tint = skill.tint();
    commands
        .spawn((
            SkillLabel {
                index,
                tint,
                material,
            },
            Text::new(skill.name.clone()),
            TextFont {
                font_size: LABEL_FONT_SIZE,
                ..default()
            },
            TextColor(tint),
            TextLayout::new_with_justify(JustifyText::Center),
            Node {
                position_type: PositionType::Absolute,
                width: Val::Px(LABEL_WIDTH),
                ..default()
            },
            Visibility::Hidden,
            Name::new(format!("{} label", skill.name)),
        ))
        .id()
}

/// Top-left corner that centres a label on `screen`.
pub fn label_origin(screen: Vec2) -> Vec2 {
    screen - Vec2::new(LABEL_WIDTH, LABEL_FONT_SIZE) / 2.0
}

/// Moves each label onto its panel's on-screen centre and copies the panel's
/// flickered alpha. Labels whose panel cannot be projected are hidden.
#[allow(clippy::type_complexity)]
pub fn track_skill_labels(
    field: Res<IconField>,
    materials: Res<Assets<StandardMaterial>>,
    cameras: Query<(&Camera, &Transform), (With<Camera3d>, Without<SkillLabel>)>,
    groups: Query<&Transform, (With<HologramField>, Without<SkillLabel>)>,
    mut labels: Query<(&SkillLabel, &mut Node, &mut TextColor, &mut Visibility)>,
) {
    let camera = cameras.get_single().ok();
    let group = groups.get_single().ok();

    for (label, mut node, mut color, mut visibility) in &mut labels {
        let screen = match (camera, group, field.motions.get(label.index)) {
            (Some((camera, eye)), Some(group), Some(motion)) => {
                let world = group.transform_point(motion.position);
                camera.world_to_viewport(&GlobalTransform::from(*eye), world).ok()
            }
            _ => None,
        };
        let Some(screen) = screen else {
            *visibility = Visibility::Hidden;
            continue;
        };

        let origin = label_origin(screen);
        node.left = Val::Px(origin.x);
        node.top = Val::Px(origin.y);
        let alpha = materials
            .get(&label.material)
            .map_or(1.0, |m| m.base_color.alpha());
        color.0 = label.tint.with_alpha(alpha);
        *visibility = Visibility::Inherited;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scatter::ScatterSettings;
    use crate::scene::icons::{default_skills, home_positions};

    #[test]
    fn label_carries_the_skill_name_and_brand_color() {
        let skill = default_skills().remove(3);
        let mut app = App::new();
        app.add_systems(Startup, move |mut commands: Commands| {
            spawn_skill_label(&mut commands, 3, &skill, Handle::default());
        });
        app.update();

        let mut query = app
            .world_mut()
            .query::<(&SkillLabel, &Text, &TextColor, &Visibility)>();
        let (label, text, color, visibility) = query.single(app.world());
        assert_eq!(label.index, 3);
        assert_eq!(text.0, ".NET");
        assert_eq!(color.0, Srgba::hex("#512bd4").map(Color::Srgba).unwrap());
        assert_eq!(*visibility, Visibility::Hidden);
    }

    #[test]
    fn origin_centres_the_label_box() {
        let origin = label_origin(Vec2::new(400.0, 300.0));
        assert_eq!(origin, Vec2::new(400.0 - LABEL_WIDTH / 2.0, 300.0 - LABEL_FONT_SIZE / 2.0));
    }

    #[test]
    fn labels_stay_hidden_without_a_projectable_camera() {
        let settings = ScatterSettings::default();
        let mut app = App::new();
        app.insert_resource(IconField::new(&home_positions(9, 4.5, 0.5), &settings))
            .init_resource::<Assets<StandardMaterial>>()
            .add_systems(Update, track_skill_labels);
        // No render target has been computed, so projection fails.
        app.world_mut()
            .spawn((Camera3d::default(), Transform::from_xyz(0.0, 0.0, 8.0)));
        app.world_mut().spawn((HologramField, Transform::IDENTITY));
        let label = app
            .world_mut()
            .spawn((
                SkillLabel {
                    index: 0,
                    tint: Color::WHITE,
                    material: Handle::default(),
                },
                Node::default(),
                TextColor(Color::WHITE),
                Visibility::Inherited,
            ))
            .id();
        app.update();

        assert_eq!(
            *app.world().get::<Visibility>(label).unwrap(),
            Visibility::Hidden
        );
    }
}
