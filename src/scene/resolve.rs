//! Animation-relevant node resolution.
//!
//! A node is *relevant* when an animation channel targets it or a used mesh is
//! skinned to it. Every relevant node gets a transform relative to its nearest
//! relevant ancestor, with all irrelevant nodes in between folded into that
//! transform:
//!
//! ```text
//! root (irrelevant)            relative(hips)  = S(model_scale) * root * armature
//! └─ armature (irrelevant)
//!    └─ hips (relevant)        relative(thigh) = offset
//!       └─ offset (irrelevant)
//!          └─ thigh (relevant)
//! ```

use glam::{Affine3A, Vec3};
use log::debug;
use rustc_hash::FxHashSet;
use slotmap::SecondaryMap;

use crate::animation::clip::AnimationClip;
use crate::errors::{Result, RigbakeError};
use crate::scene::graph::SceneGraph;
use crate::scene::{MeshKey, NodeKey};

/// One animation-relevant node and its transform relative to `parent`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationNodeInfo {
    pub node: NodeKey,
    /// Product of every irrelevant ancestor's local transform between `node`
    /// and `parent`. When `parent` is `None` the model scale is the outermost
    /// factor. The node's own local transform is not included.
    pub relative_transform: Affine3A,
    /// Nearest relevant ancestor.
    pub parent: Option<NodeKey>,
}

/// Relevant nodes in depth-first visitation order of the source tree.
#[derive(Debug, Clone, Default)]
pub struct NodeAnimationInfo {
    pub nodes_with_animation: Vec<AnimationNodeInfo>,
}

impl NodeAnimationInfo {
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes_with_animation.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes_with_animation.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AnimationNodeInfo> {
        self.nodes_with_animation.iter()
    }

    #[must_use]
    pub fn find(&self, node: NodeKey) -> Option<&AnimationNodeInfo> {
        self.nodes_with_animation.iter().find(|info| info.node == node)
    }
}

impl<'a> IntoIterator for &'a NodeAnimationInfo {
    type Item = &'a AnimationNodeInfo;
    type IntoIter = std::slice::Iter<'a, AnimationNodeInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct HierarchyResolver;

impl HierarchyResolver {
    /// Resolves the relevant nodes of `scene`.
    ///
    /// Relevance is the union of every channel target in `scene.animations`
    /// and every bone of the meshes instanced by `used_nodes`.
    pub fn resolve(
        scene: &SceneGraph,
        used_nodes: &[NodeKey],
        model_scale: f32,
    ) -> Result<NodeAnimationInfo> {
        let mut relevant = collect_animated_names(&scene.animations);
        relevant.extend(collect_bone_names(scene, used_nodes)?);
        Ok(Self::resolve_with_names(scene, &relevant, model_scale))
    }

    /// Resolves against an explicit set of relevant node names.
    ///
    /// The output order depends only on the tree, never on the iteration order
    /// of `relevant`.
    #[must_use]
    pub fn resolve_with_names(
        scene: &SceneGraph,
        relevant: &FxHashSet<String>,
        model_scale: f32,
    ) -> NodeAnimationInfo {
        // Pass 1: relevance and visitation order of every reachable node.
        let mut order: SecondaryMap<NodeKey, usize> = SecondaryMap::new();
        let mut relevant_nodes: Vec<NodeKey> = Vec::new();

        for (visit_index, key) in scene.depth_first().enumerate() {
            order.insert(key, visit_index);
            if scene
                .get_node(key)
                .is_some_and(|node| relevant.contains(&node.name))
            {
                relevant_nodes.push(key);
            }
        }

        let is_relevant: FxHashSet<NodeKey> = relevant_nodes.iter().copied().collect();

        let root_scale = Affine3A::from_scale(Vec3::splat(model_scale));

        // Pass 2: walk each relevant node up to its nearest relevant ancestor.
        let mut nodes_with_animation = Vec::with_capacity(relevant_nodes.len());
        for &node in &relevant_nodes {
            let mut relative_transform = Affine3A::IDENTITY;
            let mut current = node;
            let parent = loop {
                let Some(parent) = scene.get_node(current).and_then(|n| n.parent()) else {
                    relative_transform = root_scale * relative_transform;
                    break None;
                };
                if is_relevant.contains(&parent) {
                    break Some(parent);
                }
                current = parent;
                if let Some(ancestor) = scene.get_node(current) {
                    relative_transform = ancestor.local_transform * relative_transform;
                }
            };

            nodes_with_animation.push(AnimationNodeInfo {
                node,
                relative_transform,
                parent,
            });
        }

        // Already in traversal order; the sort keeps that guarantee explicit.
        nodes_with_animation
            .sort_by_key(|info| order.get(info.node).copied().unwrap_or(usize::MAX));

        debug!(
            "Resolved {} animation-relevant nodes out of {} relevant names",
            nodes_with_animation.len(),
            relevant.len()
        );

        NodeAnimationInfo {
            nodes_with_animation,
        }
    }
}

/// Every node name targeted by a channel of any clip.
#[must_use]
pub fn collect_animated_names(clips: &[AnimationClip]) -> FxHashSet<String> {
    clips
        .iter()
        .flat_map(|clip| clip.target_names())
        .map(str::to_owned)
        .collect()
}

/// Bone names of the meshes instanced by `used_nodes`, each mesh counted once.
pub fn collect_bone_names(scene: &SceneGraph, used_nodes: &[NodeKey]) -> Result<FxHashSet<String>> {
    let mut used_meshes: FxHashSet<MeshKey> = FxHashSet::default();
    for &key in used_nodes {
        let Some(node) = scene.get_node(key) else {
            return Err(RigbakeError::UnknownNode(format!("{key:?}")));
        };
        used_meshes.extend(node.meshes().iter().copied());
    }

    let mut names = FxHashSet::default();
    for key in used_meshes {
        let Some(mesh) = scene.get_mesh(key) else {
            return Err(RigbakeError::UnknownMesh(format!("{key:?}")));
        };
        names.extend(mesh.bone_names.iter().cloned());
    }
    Ok(names)
}
