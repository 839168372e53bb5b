//! Scroll input, scrub playback and writing the sampled pose onto the rig.

use bevy::color::Mix;
use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;

use crate::scene::graph::{Finish, NodeId, SceneGraph};
use crate::scene::materials::{set_opacity, FinishMaterials};
use crate::scene::rig::{euler, RigHandles};
use crate::scene::setup::{ReactorLight, RigEntities, RigNode, REACTOR_LUMENS};
use crate::timeline::{Pose, ScrollLayout, ScrubDriver, Timeline};

/// Progress over which the idle sway fades out.
const SWAY_FADE: f32 = 0.05;
const SWAY_PITCH: f32 = 0.1;
const SWAY_YAW: f32 = 0.2;

/// Share of the proximal curl applied to each joint, base to tip.
const JOINT_FOLLOW: [f32; 3] = [1.0, 0.6, 0.4];

/// Clear color with no flash applied.
#[derive(Resource, Clone, Copy, Debug)]
pub struct Backdrop(pub Color);

impl Default for Backdrop {
    fn default() -> Self {
        Self(Color::srgb(0.02, 0.02, 0.05))
    }
}

pub fn scroll_input(
    mut wheel: EventReader<MouseWheel>,
    mut layout: ResMut<ScrollLayout>,
    mut scrub: ResMut<ScrubDriver>,
) {
    for event in wheel.read() {
        layout.scroll_wheel(event.unit, event.y);
    }
    scrub.set_target(layout.progress());
}

pub fn advance_timeline(
    time: Res<Time>,
    mut scrub: ResMut<ScrubDriver>,
    mut timeline: ResMut<Timeline>,
) {
    let progress = scrub.tick(time.delta_secs());
    timeline.seek(progress);
}

/// Hand sway around the rest rotation, full strength at the top of the
/// page and gone by `SWAY_FADE`.
pub fn idle_sway(elapsed: f32, progress: f32) -> Vec3 {
    let weight = (1.0 - progress / SWAY_FADE).clamp(0.0, 1.0);
    Vec3::new(elapsed.cos() * SWAY_PITCH, elapsed.sin() * SWAY_YAW, 0.0) * weight
}

/// Local transforms of every animated node for `pose`, starting from the
/// rest transforms stored in the graph.
pub fn posed_transforms(
    graph: &SceneGraph,
    handles: &RigHandles,
    pose: &Pose,
    sway: Vec3,
) -> Vec<(NodeId, Transform)> {
    let rest = |id: NodeId| graph.node(id).transform;
    let mut posed = Vec::with_capacity(16);

    posed.push((
        handles.arm,
        rest(handles.arm).with_rotation(euler(pose.arm_rotation + sway)),
    ));

    let wrist = rest(handles.wrist);
    posed.push((
        handles.wrist,
        wrist.with_rotation(wrist.rotation * Quat::from_rotation_x(pose.wrist_pitch)),
    ));

    let palm = rest(handles.palm);
    posed.push((
        handles.palm,
        palm.with_translation(palm.translation + pose.palm_offset),
    ));

    posed.push((
        handles.repulsor,
        rest(handles.repulsor).with_scale(Vec3::splat(pose.reactor_glow)),
    ));
    posed.push((
        handles.shockwave,
        rest(handles.shockwave).with_scale(Vec3::splat(pose.shockwave_scale)),
    ));
    posed.push((
        handles.beam,
        rest(handles.beam).with_scale(Vec3::new(1.0, pose.beam_scale, 1.0)),
    ));

    for rig in &handles.digits {
        let curl = pose.curl(rig.digit);
        for (joint, follow) in rig.joints.iter().zip(JOINT_FOLLOW) {
            let base = rest(*joint);
            posed.push((
                *joint,
                base.with_rotation(base.rotation * Quat::from_rotation_x(curl * follow)),
            ));
        }
    }
    posed
}

/// Writes the current pose into rig transforms, the reactor light, effect
/// materials and the clear color.
#[allow(clippy::too_many_arguments)]
pub fn apply_pose(
    time: Res<Time>,
    timeline: Res<Timeline>,
    rig: Res<RigEntities>,
    finishes: Res<FinishMaterials>,
    backdrop: Res<Backdrop>,
    mut clear: ResMut<ClearColor>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut nodes: Query<&mut Transform, With<RigNode>>,
    mut lights: Query<&mut PointLight, With<ReactorLight>>,
) {
    let progress = timeline.progress();
    let pose = timeline.pose();
    let sway = idle_sway(time.elapsed_secs(), progress);

    for (id, transform) in posed_transforms(&rig.graph, &rig.handles, &pose, sway) {
        if let Ok(mut node) = nodes.get_mut(rig.entity(id)) {
            *node = transform;
        }
    }
    for mut light in &mut lights {
        light.intensity = pose.reactor_intensity * REACTOR_LUMENS;
    }

    set_opacity(&mut materials, &finishes.get(Finish::Shockwave), pose.shockwave_opacity);
    set_opacity(&mut materials, &finishes.get(Finish::Beam), pose.beam_opacity);

    let flashed = backdrop
        .0
        .to_linear()
        .mix(&LinearRgba::WHITE, pose.flash.clamp(0.0, 1.0));
    clear.0 = Color::LinearRgba(flashed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::rig::{build_gauntlet, Digit};
    use crate::timeline::{gauntlet_timeline, FIRE_AT};

    fn transform_of(posed: &[(NodeId, Transform)], id: NodeId) -> Transform {
        posed
            .iter()
            .find(|(node, _)| *node == id)
            .map(|(_, t)| *t)
            .expect("node is posed")
    }

    #[test]
    fn rest_pose_reproduces_the_built_rig() {
        let (graph, handles) = build_gauntlet();
        let posed = posed_transforms(&graph, &handles, &Pose::REST, Vec3::ZERO);
        for (id, transform) in posed {
            let rest = graph.node(id).transform;
            assert!(transform.translation.abs_diff_eq(rest.translation, 1e-6));
            assert!(transform.rotation.abs_diff_eq(rest.rotation, 1e-6), "{}", graph.node(id).name);
            assert!(transform.scale.abs_diff_eq(rest.scale, 1e-6), "{}", graph.node(id).name);
        }
    }

    #[test]
    fn peak_charge_curls_fingers_and_brightens_the_repulsor() {
        let (graph, handles) = build_gauntlet();
        let pose = gauntlet_timeline().sample(FIRE_AT);
        let posed = posed_transforms(&graph, &handles, &pose, Vec3::ZERO);

        let index = handles.digit(Digit::Index);
        let proximal = transform_of(&posed, index.proximal());
        let expected = index.base_rotation * Quat::from_rotation_x(pose.curl(Digit::Index));
        assert!(proximal.rotation.abs_diff_eq(expected, 1e-6));

        let repulsor = transform_of(&posed, handles.repulsor);
        assert!(repulsor.scale.x > 1.0);
    }

    #[test]
    fn sway_fades_out_once_scrolling_starts() {
        assert!(idle_sway(0.0, 0.0).abs_diff_eq(Vec3::new(SWAY_PITCH, 0.0, 0.0), 1e-6));
        assert!(idle_sway(1.3, 0.025).length() > 0.0);
        assert_eq!(idle_sway(1.3, SWAY_FADE), Vec3::ZERO);
        assert_eq!(idle_sway(1.3, 0.8), Vec3::ZERO);
    }
}
