//! A flat-storage tree of transform-bearing nodes.

use glam::{Mat4, Vec3};
use orrery_math::Transform;

use crate::error::SceneError;
use crate::light::{AmbientLight, PointLight};
use crate::material::MeshHandle;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Dense index in insertion order, usable for side tables.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub name: String,
    /// Transform relative to the parent, or to the world for roots.
    pub local: Transform,
    pub mesh: Option<MeshHandle>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    /// `None` for roots.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Nodes plus the lights that illuminate them.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    point_lights: Vec<PointLight>,
    pub ambient: AmbientLight,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a root node.
    pub fn add_node(&mut self, name: impl Into<String>, local: Transform) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            name: name.into(),
            local,
            mesh: None,
            parent: None,
            children: Vec::new(),
        });
        self.roots.push(id);
        id
    }

    /// Moves `child` under `parent`, detaching it from wherever it was.
    ///
    /// The child's local transform is kept as is, so its world placement
    /// changes to be relative to the new parent.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.check(parent)?;
        self.check(child)?;
        if self.is_ancestor_or_self(child, parent) {
            return Err(SceneError::Cycle { parent, child });
        }

        match self.nodes[child.0 as usize].parent {
            Some(old) => self.nodes[old.0 as usize].children.retain(|&c| c != child),
            None => self.roots.retain(|&r| r != child),
        }
        self.nodes[child.0 as usize].parent = Some(parent);
        self.nodes[parent.0 as usize].children.push(child);
        Ok(())
    }

    /// Attaches the mesh drawn at this node, replacing any previous one.
    pub fn set_mesh(&mut self, node: NodeId, mesh: MeshHandle) -> Result<(), SceneError> {
        self.node_mut(node)?.mesh = Some(mesh);
        Ok(())
    }

    /// Replaces the node's transform relative to its parent.
    pub fn set_local(&mut self, node: NodeId, local: Transform) -> Result<(), SceneError> {
        self.node_mut(node)?.local = local;
        Ok(())
    }

    /// `None` for an id from another scene.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    /// Mutable access, or [`SceneError::UnknownNode`].
    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, SceneError> {
        self.nodes
            .get_mut(id.0 as usize)
            .ok_or(SceneError::UnknownNode(id))
    }

    /// First node with this name, in insertion order.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.name == name)
            .map(|i| NodeId(i as u32))
    }

    /// Nodes without a parent.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// World transform composed from the root down. Unknown ids yield identity.
    pub fn world_transform(&self, id: NodeId) -> Transform {
        let Some(node) = self.node(id) else {
            return Transform::IDENTITY;
        };
        let mut world = node.local;
        let mut next = node.parent;
        while let Some(parent) = next {
            let p = &self.nodes[parent.0 as usize];
            world = p.local * world;
            next = p.parent;
        }
        world
    }

    /// Single-precision world matrix for GPU upload.
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        self.world_transform(id).to_matrix().as_mat4()
    }

    /// Visits every node depth-first, parents before children, roots in
    /// insertion order. The callback receives the node's world transform.
    pub fn traverse(&self, mut visit: impl FnMut(NodeId, &Node, &Transform)) {
        let mut stack: Vec<(NodeId, Transform)> = self
            .roots
            .iter()
            .rev()
            .map(|&r| (r, self.nodes[r.0 as usize].local))
            .collect();
        while let Some((id, world)) = stack.pop() {
            let node = &self.nodes[id.0 as usize];
            visit(id, node, &world);
            for &child in node.children.iter().rev() {
                stack.push((child, world * self.nodes[child.0 as usize].local));
            }
        }
    }

    /// Only the first point light reaches the shader.
    pub fn add_point_light(&mut self, light: PointLight) {
        self.point_lights.push(light);
    }

    pub fn point_lights(&self) -> &[PointLight] {
        &self.point_lights
    }

    /// World position of a point light, following its node if attached.
    pub fn light_position(&self, light: &PointLight) -> Vec3 {
        match light.attached_to {
            Some(node) => self.world_transform(node).position.as_vec3() + light.position,
            None => light.position,
        }
    }

    fn check(&self, id: NodeId) -> Result<(), SceneError> {
        if (id.0 as usize) < self.nodes.len() {
            Ok(())
        } else {
            Err(SceneError::UnknownNode(id))
        }
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.nodes[node.0 as usize].parent {
                Some(p) => node = p,
                None => return false,
            }
        }
    }
}
