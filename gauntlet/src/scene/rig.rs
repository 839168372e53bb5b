//! Procedural gauntlet: arm, palm, repulsor and five jointed digits.

use std::f32::consts::FRAC_PI_4;

use bevy::prelude::*;

use crate::scene::graph::{Finish, Fixture, NodeId, Part, SceneGraph, Shape};

/// Rest orientation of the arm group: raised and turned toward the viewer.
pub const ARM_REST_ROTATION: Vec3 = Vec3::new(0.5, -0.5, 0.0);

const PALM_SIZE: Vec3 = Vec3::new(2.2, 2.5, 0.8);
const REPULSOR_RADIUS: f32 = 0.6;
const REPULSOR_Z: f32 = 0.41;
const REPULSOR_LIGHT_Z: f32 = 1.0;
const BEAM_LENGTH: f32 = 12.0;

/// The five digits of the hand, in the order their curl is stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Digit {
    Index,
    Middle,
    Ring,
    Pinky,
    Thumb,
}

impl Digit {
    pub const ALL: [Digit; 5] = [
        Digit::Index,
        Digit::Middle,
        Digit::Ring,
        Digit::Pinky,
        Digit::Thumb,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Digit::Index => "index",
            Digit::Middle => "middle",
            Digit::Ring => "ring",
            Digit::Pinky => "pinky",
            Digit::Thumb => "thumb",
        }
    }
}

/// Placement of one finger on the top edge of the palm.
#[derive(Clone, Copy, Debug)]
pub struct FingerParams {
    pub digit: Digit,
    pub lateral: f32,
    pub vertical: f32,
    pub scale: f32,
}

pub const FINGERS: [FingerParams; 4] = [
    FingerParams { digit: Digit::Pinky, lateral: 0.9, vertical: 1.2, scale: 0.85 },
    FingerParams { digit: Digit::Ring, lateral: 0.3, vertical: 1.3, scale: 0.95 },
    FingerParams { digit: Digit::Middle, lateral: -0.3, vertical: 1.3, scale: 1.0 },
    FingerParams { digit: Digit::Index, lateral: -0.9, vertical: 1.2, scale: 0.95 },
];

/// Segment sizes and alternating finishes, base to tip: gold, red, gold.
const FINGER_SEGMENTS: [(Vec3, Finish); 3] = [
    (Vec3::new(0.5, 0.8, 0.5), Finish::Trim),
    (Vec3::new(0.45, 0.7, 0.45), Finish::Armor),
    (Vec3::new(0.4, 0.6, 0.4), Finish::Trim),
];

const THUMB_SEGMENTS: [(Vec3, Finish); 2] = [
    (Vec3::new(0.6, 0.9, 0.6), Finish::Trim),
    (Vec3::new(0.5, 0.8, 0.5), Finish::Armor),
];

const THUMB_BASE: Vec3 = Vec3::new(-1.2, 0.0, 0.2);
const JOINT_GAP: f32 = 0.05;

/// Hinge joints of one digit, base first.
#[derive(Clone, Debug)]
pub struct FingerRig {
    pub digit: Digit,
    pub joints: Vec<NodeId>,
    /// Rest rotation of the base joint; curl is applied on top of it.
    /// Outer joints rest at identity.
    pub base_rotation: Quat,
}

impl FingerRig {
    pub fn proximal(&self) -> NodeId {
        self.joints[0]
    }
}

/// Handles to every node the timeline animates.
#[derive(Clone, Debug)]
pub struct RigHandles {
    pub arm: NodeId,
    pub wrist: NodeId,
    pub palm: NodeId,
    pub repulsor: NodeId,
    pub repulsor_light: NodeId,
    pub shockwave: NodeId,
    pub beam: NodeId,
    pub digits: Vec<FingerRig>,
}

impl RigHandles {
    pub fn digit(&self, digit: Digit) -> &FingerRig {
        self.digits
            .iter()
            .find(|rig| rig.digit == digit)
            .unwrap_or_else(|| panic!("gauntlet rig has no {} digit", digit.name()))
    }
}

pub(crate) fn euler(v: Vec3) -> Quat {
    Quat::from_euler(EulerRot::XYZ, v.x, v.y, v.z)
}

/// Builds the gauntlet hierarchy. Pure: every call yields the same tree.
pub fn build_gauntlet() -> (SceneGraph, RigHandles) {
    let mut graph = SceneGraph::new(
        "arm",
        Transform::from_rotation(euler(ARM_REST_ROTATION)),
    );
    let arm = graph.root();

    let forearm = graph.add_part(
        arm,
        "forearm",
        Transform::from_xyz(0.0, -2.6, -0.1),
        Part {
            shape: Shape::Rod { radius: 0.75, length: 2.8 },
            finish: Finish::Armor,
        },
    );
    graph.add_part(
        forearm,
        "forearm_band",
        Transform::from_xyz(0.0, 1.1, 0.0),
        Part {
            shape: Shape::Rod { radius: 0.8, length: 0.25 },
            finish: Finish::Trim,
        },
    );

    let wrist = graph.add_group(arm, "wrist", Transform::IDENTITY);
    let palm = graph.add_part(
        wrist,
        "palm",
        Transform::IDENTITY,
        Part {
            shape: Shape::Box { x: PALM_SIZE.x, y: PALM_SIZE.y, z: PALM_SIZE.z },
            finish: Finish::Armor,
        },
    );

    let repulsor = graph.add_part(
        palm,
        "repulsor",
        Transform::from_xyz(0.0, 0.0, REPULSOR_Z),
        Part {
            shape: Shape::Disc { radius: REPULSOR_RADIUS },
            finish: Finish::Glow,
        },
    );
    let repulsor_light = graph.add_fixture(
        palm,
        "repulsor_light",
        Transform::from_xyz(0.0, 0.0, REPULSOR_LIGHT_Z),
        Fixture {
            color: Color::srgb(0.0, 1.0, 1.0),
            intensity: 1.0,
            range: 10.0,
        },
    );
    // Ring lies in the palm plane; torus meshes are built around local Y.
    let shockwave = graph.add_part(
        palm,
        "shockwave",
        Transform::from_xyz(0.0, 0.0, 0.6)
            .with_rotation(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2))
            .with_scale(Vec3::splat(0.2)),
        Part {
            shape: Shape::Ring { inner: 0.5, outer: 0.7 },
            finish: Finish::Shockwave,
        },
    );
    // Pivot at the palm face; the rod starts there and grows along +Z only.
    let beam = graph.add_group(
        palm,
        "beam",
        Transform::from_xyz(0.0, 0.0, 0.5)
            .with_rotation(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2))
            .with_scale(Vec3::new(1.0, 0.1, 1.0)),
    );
    graph.add_part(
        beam,
        "beam_rod",
        Transform::from_xyz(0.0, BEAM_LENGTH / 2.0, 0.0),
        Part {
            shape: Shape::Rod { radius: 0.35, length: BEAM_LENGTH },
            finish: Finish::Beam,
        },
    );

    let mut digits: Vec<FingerRig> = FINGERS
        .iter()
        .map(|params| build_finger(&mut graph, palm, params))
        .collect();
    digits.push(build_thumb(&mut graph, palm));
    digits.sort_by_key(|rig| rig.digit.index());

    let handles = RigHandles {
        arm,
        wrist,
        palm,
        repulsor,
        repulsor_light,
        shockwave,
        beam,
        digits,
    };
    (graph, handles)
}

fn finger_names(digit: Digit) -> &'static [(&'static str, &'static str)] {
    match digit {
        Digit::Index => &[
            ("index_proximal", "index_proximal_plate"),
            ("index_middle", "index_middle_plate"),
            ("index_distal", "index_distal_plate"),
        ],
        Digit::Middle => &[
            ("middle_proximal", "middle_proximal_plate"),
            ("middle_middle", "middle_middle_plate"),
            ("middle_distal", "middle_distal_plate"),
        ],
        Digit::Ring => &[
            ("ring_proximal", "ring_proximal_plate"),
            ("ring_middle", "ring_middle_plate"),
            ("ring_distal", "ring_distal_plate"),
        ],
        Digit::Pinky => &[
            ("pinky_proximal", "pinky_proximal_plate"),
            ("pinky_middle", "pinky_middle_plate"),
            ("pinky_distal", "pinky_distal_plate"),
        ],
        Digit::Thumb => &[
            ("thumb_proximal", "thumb_proximal_plate"),
            ("thumb_distal", "thumb_distal_plate"),
        ],
    }
}

/// Chains joint → plate → next joint. The first joint takes `base`; every
/// later joint sits at the tip of the previous plate so a hinge rotation
/// bends everything above it.
fn build_chain(
    graph: &mut SceneGraph,
    palm: NodeId,
    digit: Digit,
    base: Transform,
    segments: &[(Vec3, Finish)],
) -> FingerRig {
    let names = finger_names(digit);
    let mut joints = Vec::with_capacity(segments.len());
    let mut parent = palm;
    let mut transform = base;
    for ((size, finish), (joint_name, plate_name)) in segments.iter().zip(names.iter().copied()) {
        debug_assert!(size.min_element() > 0.0, "segment sizes must be positive");
        let joint = graph.add_group(parent, joint_name, transform);
        graph.add_part(
            joint,
            plate_name,
            Transform::from_xyz(0.0, size.y / 2.0, 0.0),
            Part {
                shape: Shape::Box { x: size.x, y: size.y, z: size.z },
                finish: *finish,
            },
        );
        joints.push(joint);
        parent = joint;
        transform = Transform::from_xyz(0.0, size.y + JOINT_GAP, 0.0);
    }
    FingerRig {
        digit,
        joints,
        base_rotation: base.rotation,
    }
}

fn build_finger(graph: &mut SceneGraph, palm: NodeId, params: &FingerParams) -> FingerRig {
    debug_assert!(params.scale > 0.0, "finger scale must be positive");
    let base = Transform::from_xyz(params.lateral, params.vertical, 0.0)
        .with_scale(Vec3::splat(params.scale));
    build_chain(graph, palm, params.digit, base, &FINGER_SEGMENTS)
}

fn build_thumb(graph: &mut SceneGraph, palm: NodeId) -> FingerRig {
    let base = Transform::from_translation(THUMB_BASE)
        .with_rotation(Quat::from_euler(EulerRot::XYZ, 0.5, 0.0, -FRAC_PI_4));
    build_chain(graph, palm, Digit::Thumb, base, &THUMB_SEGMENTS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_the_same_tree_every_time() {
        let (a, _) = build_gauntlet();
        let (b, _) = build_gauntlet();

        assert_eq!(a.len(), b.len());
        for ((_, left), (_, right)) in a.nodes().zip(b.nodes()) {
            assert_eq!(left.name, right.name);
            assert_eq!(left.children, right.children);
            assert_eq!(left.transform, right.transform);
        }
    }

    #[test]
    fn fingers_have_three_chained_joints_and_thumb_two() {
        let (graph, handles) = build_gauntlet();

        assert_eq!(handles.digits.len(), 5);
        for rig in &handles.digits {
            let expected = if rig.digit == Digit::Thumb { 2 } else { 3 };
            assert_eq!(rig.joints.len(), expected, "{}", rig.digit.name());
            for pair in rig.joints.windows(2) {
                assert_eq!(graph.node(pair[1]).parent, Some(pair[0]));
            }
        }
    }

    #[test]
    fn digits_are_stored_in_curl_order() {
        let (_, handles) = build_gauntlet();
        let order: Vec<Digit> = handles.digits.iter().map(|rig| rig.digit).collect();
        assert_eq!(order, Digit::ALL.to_vec());
    }

    #[test]
    fn finger_tuples_place_proximal_joints_on_the_palm() {
        let (graph, handles) = build_gauntlet();

        for params in FINGERS {
            let proximal = handles.digit(params.digit).proximal();
            let node = graph.node(proximal);
            assert_eq!(node.parent, Some(handles.palm));
            assert_eq!(node.transform.translation.x, params.lateral);
            assert_eq!(node.transform.translation.y, params.vertical);
            assert_eq!(node.transform.scale, Vec3::splat(params.scale));
        }
    }

    #[test]
    fn distal_joints_sit_above_their_middle_plate() {
        let (graph, handles) = build_gauntlet();
        let middle = handles.digit(Digit::Middle);
        let distal = graph.node(middle.joints[2]);
        assert!(distal.transform.translation.y > 0.7);
    }

    #[test]
    fn every_node_name_is_unique() {
        let (graph, _) = build_gauntlet();
        let mut names: Vec<&str> = graph.nodes().map(|(_, n)| n.name).collect();
        names.sort_unstable();
        let before = names.len();
        names.dedup();
        assert_eq!(before, names.len());
    }

    #[test]
    fn effects_hang_off_the_palm() {
        let (graph, handles) = build_gauntlet();
        for id in [handles.repulsor, handles.repulsor_light, handles.shockwave, handles.beam] {
            assert_eq!(graph.node(id).parent, Some(handles.palm));
        }
        assert_eq!(graph.node(handles.palm).parent, Some(handles.wrist));
        assert_eq!(graph.node(handles.wrist).parent, Some(handles.arm));
        assert!(graph.node(handles.repulsor_light).fixture.is_some());
    }

    #[test]
    fn beam_only_extends_out_of_the_palm() {
        let (graph, handles) = build_gauntlet();
        let pivot = graph.node(handles.beam);
        let [rod] = pivot.children[..] else {
            panic!("beam pivot holds one rod");
        };
        let rod = graph.node(rod).transform;
        let near = rod.translation - Vec3::Y * BEAM_LENGTH / 2.0;
        let far = rod.translation + Vec3::Y * BEAM_LENGTH / 2.0;

        for stretch in [0.1, 1.0, 3.0] {
            let scaled = pivot.transform.with_scale(Vec3::new(1.0, stretch, 1.0));
            let near = scaled.transform_point(near);
            let far = scaled.transform_point(far);
            assert!((near.z - pivot.transform.translation.z).abs() < 1e-5);
            assert!(far.z > near.z, "stretch {stretch}");
            assert!((far.z - near.z - BEAM_LENGTH * stretch).abs() < 1e-4);
        }
    }
}
