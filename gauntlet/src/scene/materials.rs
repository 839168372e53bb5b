//! Shared materials and meshes for gauntlet parts.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::scene::graph::{Finish, Shape};

/// One material handle per [`Finish`]. Effect finishes start transparent;
/// the pose writes their alpha every frame.
#[derive(Resource, Clone, Debug)]
pub struct FinishMaterials {
    handles: HashMap<Finish, Handle<StandardMaterial>>,
}

impl FinishMaterials {
    pub fn new(materials: &mut Assets<StandardMaterial>) -> Self {
        let handles = [
            Finish::Armor,
            Finish::Trim,
            Finish::Glow,
            Finish::Shockwave,
            Finish::Beam,
        ]
        .into_iter()
        .map(|finish| (finish, materials.add(finish_material(finish))))
        .collect();
        Self { handles }
    }

    pub fn get(&self, finish: Finish) -> Handle<StandardMaterial> {
        self.handles[&finish].clone()
    }
}

fn finish_material(finish: Finish) -> StandardMaterial {
    match finish {
        Finish::Armor => StandardMaterial {
            base_color: Color::srgb_u8(0x7a, 0x00, 0x00),
            metallic: 0.6,
            perceptual_roughness: 0.3,
            ..default()
        },
        Finish::Trim => StandardMaterial {
            base_color: Color::srgb_u8(0xff, 0xd7, 0x00),
            metallic: 0.8,
            perceptual_roughness: 0.2,
            ..default()
        },
        Finish::Glow => StandardMaterial {
            base_color: Color::srgb(0.0, 1.0, 1.0),
            unlit: true,
            ..default()
        },
        Finish::Shockwave => effect_material(Color::srgba(0.6, 1.0, 1.0, 0.0)),
        Finish::Beam => effect_material(Color::srgba(0.3, 0.9, 1.0, 0.0)),
    }
}

fn effect_material(color: Color) -> StandardMaterial {
    StandardMaterial {
        base_color: color,
        emissive: color.to_linear().with_alpha(1.0) * 4.0,
        unlit: true,
        alpha_mode: AlphaMode::Add,
        double_sided: true,
        cull_mode: None,
        ..default()
    }
}

/// Sets the alpha of an effect material.
pub fn set_opacity(
    materials: &mut Assets<StandardMaterial>,
    handle: &Handle<StandardMaterial>,
    opacity: f32,
) {
    if let Some(material) = materials.get_mut(handle) {
        material.base_color.set_alpha(opacity.clamp(0.0, 1.0));
    }
}

pub fn shape_mesh(shape: Shape) -> Mesh {
    match shape {
        Shape::Box { x, y, z } => Cuboid::new(x, y, z).into(),
        Shape::Disc { radius } => Circle::new(radius).into(),
        Shape::Ring { inner, outer } => Torus::new(inner, outer).into(),
        Shape::Rod { radius, length } => Cylinder::new(radius, length).into(),
    }
}
