//! Scene arena
//!
//! The parsed scene is stored as flat `SlotMap` arenas of nodes and meshes.
//! Parent/child relationships are keys into the node arena, which keeps the
//! single traversal pass free of dangling references and lets ancestor walks
//! run as plain loops.

use glam::Affine3A;
use slotmap::SlotMap;

use crate::animation::clip::AnimationClip;
use crate::errors::{Result, RigbakeError};
use crate::scene::mesh::Mesh;
use crate::scene::node::SceneNode;
use crate::scene::{MeshKey, NodeKey};

/// The read-only input of the pipeline: node tree, meshes and animations.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    pub nodes: SlotMap<NodeKey, SceneNode>,
    pub meshes: SlotMap<MeshKey, Mesh>,
    pub animations: Vec<AnimationClip>,

    root: NodeKey,
}

impl SceneGraph {
    /// Creates a scene holding only its root node.
    #[must_use]
    pub fn new(root_name: &str, root_transform: Affine3A) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode::new(root_name, root_transform));
        Self {
            nodes,
            meshes: SlotMap::with_key(),
            animations: Vec::new(),
            root,
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeKey {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, key: NodeKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    #[inline]
    #[must_use]
    pub fn get_mesh(&self, key: MeshKey) -> Option<&Mesh> {
        self.meshes.get(key)
    }

    /// Adds a new node as the last child of `parent`.
    pub fn add_child(
        &mut self,
        parent: NodeKey,
        name: &str,
        local_transform: Affine3A,
    ) -> Result<NodeKey> {
        if !self.nodes.contains_key(parent) {
            return Err(RigbakeError::UnknownNode(format!("{parent:?}")));
        }

        let mut node = SceneNode::new(name, local_transform);
        node.parent = Some(parent);
        let key = self.nodes.insert(node);

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(key);
        }

        Ok(key)
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshKey {
        self.meshes.insert(mesh)
    }

    /// Instances `mesh` on `node`.
    pub fn attach_mesh(&mut self, node: NodeKey, mesh: MeshKey) -> Result<()> {
        if !self.meshes.contains_key(mesh) {
            return Err(RigbakeError::UnknownMesh(format!("{mesh:?}")));
        }
        let Some(n) = self.nodes.get_mut(node) else {
            return Err(RigbakeError::UnknownNode(format!("{node:?}")));
        };
        n.meshes.push(mesh);
        Ok(())
    }

    /// Pre-order depth-first walk from the root, children in source order.
    #[must_use]
    pub fn depth_first(&self) -> DepthFirst<'_> {
        DepthFirst {
            graph: self,
            stack: vec![self.root],
        }
    }

    /// First node named `name` in depth-first order.
    #[must_use]
    pub fn find_node_by_name(&self, name: &str) -> Option<NodeKey> {
        self.depth_first()
            .find(|&key| self.nodes.get(key).is_some_and(|n| n.name == name))
    }

    /// Every node instancing at least one mesh, in depth-first order.
    ///
    /// This is the default "used nodes" set when the caller exports the whole
    /// scene.
    #[must_use]
    pub fn mesh_nodes(&self) -> Vec<NodeKey> {
        self.depth_first()
            .filter(|&key| self.nodes.get(key).is_some_and(|n| !n.meshes.is_empty()))
            .collect()
    }

    /// Composes local transforms from the root down to `key`.
    #[must_use]
    pub fn world_transform(&self, key: NodeKey) -> Option<Affine3A> {
        let mut node = self.nodes.get(key)?;
        let mut world = node.local_transform;
        while let Some(parent) = node.parent {
            node = self.nodes.get(parent)?;
            world = node.local_transform * world;
        }
        Some(world)
    }
}

/// Iterator returned by [`SceneGraph::depth_first`].
///
/// Uses an explicit stack so deep hierarchies cannot overflow the call stack.
pub struct DepthFirst<'a> {
    graph: &'a SceneGraph,
    stack: Vec<NodeKey>,
}

impl Iterator for DepthFirst<'_> {
    type Item = NodeKey;

    fn next(&mut self) -> Option<NodeKey> {
        let key = self.stack.pop()?;
        if let Some(node) = self.graph.nodes.get(key) {
            self.stack.extend(node.children.iter().rev().copied());
        }
        Some(key)
    }
}
