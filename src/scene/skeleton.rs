use glam::{Affine3A, Quat, Vec3};
use rustc_hash::FxHashMap;

use crate::errors::{Result, RigbakeError};
use crate::scene::graph::SceneGraph;
use crate::scene::resolve::NodeAnimationInfo;
use crate::scene::NodeKey;

/// Parent index written for root bones in the bone parent table.
pub const NO_PARENT: u16 = 0xFFFF;

/// A canonical skeletal joint.
#[derive(Debug, Clone)]
pub struct Bone {
    pub index: usize,
    pub name: String,
    /// Always smaller than `index`.
    pub parent: Option<usize>,

    // Rest pose, relative to the parent bone (or the model root for roots).
    pub rest_position: Vec3,
    pub rest_rotation: Quat,
    pub rest_scale: Vec3,
}

impl Bone {
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// The runtime skeleton: bones in a stable order, parents before children.
///
/// `bones[i].index == i` for every bone. This ordering is the one used for
/// every resampled frame and for the bone parent table.
#[derive(Debug, Clone, Default)]
pub struct BoneHierarchy {
    bones: Vec<Bone>,
    by_name: FxHashMap<String, usize>,
}

impl BoneHierarchy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds one bone per resolved node, in resolution order.
    ///
    /// The rest transform of each bone is its relative transform composed
    /// with the node's own local transform.
    pub fn from_animation_info(scene: &SceneGraph, info: &NodeAnimationInfo) -> Result<Self> {
        let mut hierarchy = Self::new();
        let mut bone_of_node: FxHashMap<NodeKey, usize> = FxHashMap::default();

        for node_info in info {
            let Some(node) = scene.get_node(node_info.node) else {
                return Err(RigbakeError::UnknownNode(format!("{:?}", node_info.node)));
            };

            let parent = match node_info.parent {
                Some(parent_key) => Some(*bone_of_node.get(&parent_key).ok_or_else(|| {
                    RigbakeError::UnknownNode(format!(
                        "{parent_key:?} (parent of '{}') was not resolved before its child",
                        node.name
                    ))
                })?),
                None => None,
            };

            let rest = node_info.relative_transform * node.local_transform;
            let index = hierarchy.add_bone(&node.name, parent, rest)?;
            bone_of_node.insert(node_info.node, index);
        }

        Ok(hierarchy)
    }

    /// Appends a bone and returns its index.
    ///
    /// `parent` must name a bone that is already in the hierarchy.
    pub fn add_bone(&mut self, name: &str, parent: Option<usize>, rest: Affine3A) -> Result<usize> {
        let index = self.bones.len();
        if let Some(p) = parent
            && p >= index
        {
            return Err(RigbakeError::UnknownBone {
                context: format!("parent of bone '{name}'"),
                index: p,
            });
        }

        let (rest_scale, rest_rotation, rest_position) = rest.to_scale_rotation_translation();

        self.bones.push(Bone {
            index,
            name: name.to_string(),
            parent,
            rest_position,
            rest_rotation,
            rest_scale,
        });
        // Names are not unique; lookups resolve to the first bone.
        self.by_name.entry(name.to_string()).or_insert(index);

        Ok(index)
    }

    #[inline]
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    #[inline]
    #[must_use]
    pub fn bone_by_index(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    #[must_use]
    pub fn bone_by_name(&self, name: &str) -> Option<&Bone> {
        self.by_name.get(name).and_then(|&i| self.bones.get(i))
    }

    /// Parent index of every bone, [`NO_PARENT`] for roots.
    #[must_use]
    pub fn parent_table(&self) -> Vec<u16> {
        self.bones
            .iter()
            .map(|bone| bone.parent.map_or(NO_PARENT, |p| p as u16))
            .collect()
    }
}
