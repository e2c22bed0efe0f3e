use glam::Affine3A;
use smallvec::SmallVec;

use crate::scene::{MeshKey, NodeKey};

/// A node of the source transform hierarchy.
///
/// Nodes live in the [`SceneGraph`](crate::scene::SceneGraph) arena and refer
/// to each other by [`NodeKey`]. The parent link is a plain key, so there is no
/// ownership cycle between a node and its children.
///
/// Names come straight from the source file and are not guaranteed unique.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    /// Transform relative to the parent node.
    pub local_transform: Affine3A,

    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: SmallVec<[NodeKey; 4]>,
    pub(crate) meshes: SmallVec<[MeshKey; 1]>,
}

impl SceneNode {
    #[must_use]
    pub fn new(name: impl Into<String>, local_transform: Affine3A) -> Self {
        Self {
            name: name.into(),
            local_transform,
            parent: None,
            children: SmallVec::new(),
            meshes: SmallVec::new(),
        }
    }

    /// Returns the parent node key, if any.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// Returns the child node keys in source order.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// Returns the meshes instanced by this node.
    #[inline]
    #[must_use]
    pub fn meshes(&self) -> &[MeshKey] {
        &self.meshes
    }
}
