//! Arena scene graph: transform nodes addressed by stable indices.

use bevy::prelude::*;

/// Stable index of a node inside a [`SceneGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Primitive mesh carried by a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Box { x: f32, y: f32, z: f32 },
    Disc { radius: f32 },
    Ring { inner: f32, outer: f32 },
    Rod { radius: f32, length: f32 },
}

/// Which shared material a part is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Finish {
    Armor,
    Trim,
    Glow,
    Shockwave,
    Beam,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Part {
    pub shape: Shape,
    pub finish: Finish,
}

/// Point light attached to a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fixture {
    pub color: Color,
    pub intensity: f32,
    pub range: f32,
}

#[derive(Clone, Debug)]
pub struct TransformNode {
    pub name: &'static str,
    pub transform: Transform,
    pub part: Option<Part>,
    pub fixture: Option<Fixture>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl TransformNode {
    fn new(name: &'static str, transform: Transform) -> Self {
        Self {
            name,
            transform,
            part: None,
            fixture: None,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// A strict tree of [`TransformNode`]s stored parent-first.
///
/// Nodes are only ever appended under an existing node and never moved, so
/// iterating `nodes()` in order always visits a parent before its children.
#[derive(Clone, Debug)]
pub struct SceneGraph {
    nodes: Vec<TransformNode>,
}

impl SceneGraph {
    pub fn new(root_name: &'static str, transform: Transform) -> Self {
        Self {
            nodes: vec![TransformNode::new(root_name, transform)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Appends an empty group node under `parent`.
    pub fn add_group(
        &mut self,
        parent: NodeId,
        name: &'static str,
        transform: Transform,
    ) -> NodeId {
        debug_assert!(parent.0 < self.nodes.len(), "unknown parent node");
        let id = NodeId(self.nodes.len());
        let mut node = TransformNode::new(name, transform);
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Appends a mesh-carrying node under `parent`.
    pub fn add_part(
        &mut self,
        parent: NodeId,
        name: &'static str,
        transform: Transform,
        part: Part,
    ) -> NodeId {
        let id = self.add_group(parent, name, transform);
        self.nodes[id.0].part = Some(part);
        id
    }

    /// Appends a point-light node under `parent`.
    pub fn add_fixture(
        &mut self,
        parent: NodeId,
        name: &'static str,
        transform: Transform,
        fixture: Fixture,
    ) -> NodeId {
        let id = self.add_group(parent, name, transform);
        self.nodes[id.0].fixture = Some(fixture);
        id
    }

    pub fn node(&self, id: NodeId) -> &TransformNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates `(id, node)` pairs parent-first.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &TransformNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }
}
