//! Startup: camera, lights and the gauntlet entity tree.

use bevy::prelude::*;

use crate::camera::OrbitCamera;
use crate::scene::graph::{NodeId, SceneGraph};
use crate::scene::materials::{shape_mesh, FinishMaterials};
use crate::scene::rig::{build_gauntlet, RigHandles};

/// Lumens per unit of pose reactor intensity.
pub const REACTOR_LUMENS: f32 = 150_000.0;

/// Marker for the key-light that tracks the arc-reactor glow.
#[derive(Component)]
pub struct ReactorLight;

/// Marker on every entity spawned from the gauntlet graph.
#[derive(Component, Clone, Copy, Debug)]
pub struct RigNode(pub NodeId);

/// Gauntlet graph as built, its handles, and the entity of every node.
#[derive(Resource, Clone, Debug)]
pub struct RigEntities {
    pub graph: SceneGraph,
    pub handles: RigHandles,
    entities: Vec<Entity>,
}

impl RigEntities {
    pub fn entity(&self, id: NodeId) -> Entity {
        self.entities[id.index()]
    }
}

pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 75f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            ..default()
        }),
        Transform::from_xyz(0.0, 0.0, 8.0).looking_at(Vec3::ZERO, Vec3::Y),
        OrbitCamera::new(8.0),
    ));
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 400.0,
    });
    commands.spawn((
        PointLight {
            color: Color::srgb_u8(0xff, 0xaa, 0x00),
            intensity: 2.0 * REACTOR_LUMENS,
            range: 50.0,
            ..default()
        },
        Transform::from_xyz(5.0, 5.0, 5.0),
    ));
    commands.spawn((
        PointLight {
            color: Color::srgb_u8(0x00, 0xaa, 0xff),
            intensity: 3.0 * REACTOR_LUMENS,
            range: 50.0,
            ..default()
        },
        Transform::from_xyz(-5.0, -5.0, 5.0),
    ));

    let finishes = FinishMaterials::new(&mut materials);
    let (graph, handles) = build_gauntlet();
    let entities = spawn_graph(&mut commands, &mut meshes, &finishes, &graph);
    info!("gauntlet rig spawned with {} nodes", graph.len());

    commands.insert_resource(finishes);
    commands.insert_resource(RigEntities {
        graph,
        handles,
        entities,
    });
}

/// Instantiates every graph node as an entity and rebuilds the hierarchy.
pub fn spawn_graph(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    finishes: &FinishMaterials,
    graph: &SceneGraph,
) -> Vec<Entity> {
    let mut entities: Vec<Entity> = Vec::with_capacity(graph.len());
    for (id, node) in graph.nodes() {
        let mut entity = commands.spawn((
            RigNode(id),
            Name::new(node.name),
            node.transform,
            Visibility::Visible,
        ));
        if let Some(part) = node.part {
            entity.insert((
                Mesh3d(meshes.add(shape_mesh(part.shape))),
                MeshMaterial3d(finishes.get(part.finish)),
            ));
        }
        if let Some(fixture) = node.fixture {
            entity.insert((
                PointLight {
                    color: fixture.color,
                    intensity: fixture.intensity * REACTOR_LUMENS,
                    range: fixture.range,
                    ..default()
                },
                ReactorLight,
            ));
        }
        let spawned = entity.id();
        if let Some(parent) = node.parent {
            commands.entity(entities[parent.index()]).add_child(spawned);
        }
        entities.push(spawned);
    }
    entities
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let mut app = App::new();
        app.init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<StandardMaterial>>()
            .add_systems(Startup, setup_scene);
        app.update();
        app
    }

    #[test]
    fn setup_scene_spawns_camera_lights_and_rig() {
        let mut app = app();
        assert!(app.world().get_resource::<FinishMaterials>().is_some());
        let rig = app.world().resource::<RigEntities>().clone();

        let world = app.world_mut();
        assert_eq!(world.query::<&Camera3d>().iter(world).count(), 1);
        assert_eq!(world.query::<&ReactorLight>().iter(world).count(), 1);
        assert_eq!(world.query::<&RigNode>().iter(world).count(), rig.graph.len());
    }

    #[test]
    fn spawned_hierarchy_mirrors_the_graph() {
        let mut app = app();
        let rig = app.world().resource::<RigEntities>().clone();
        let world = app.world();

        for (id, node) in rig.graph.nodes() {
            let entity = rig.entity(id);
            let parent = world.get::<Parent>(entity).map(|p| p.get());
            assert_eq!(parent, node.parent.map(|p| rig.entity(p)), "{}", node.name);
            assert_eq!(world.get::<Transform>(entity), Some(&node.transform));
        }
    }
}
