//! Scene graph module
//!
//! Holds the parsed input hierarchy and everything derived from it:
//! - SceneGraph: arena of nodes, meshes and source animations
//! - SceneNode: a transform node with index-based parent/children
//! - HierarchyResolver: picks the animation-relevant nodes
//! - BoneHierarchy: the canonical, indexed bone ordering

pub mod graph;
pub mod mesh;
pub mod node;
pub mod resolve;
pub mod skeleton;

pub use graph::SceneGraph;
pub use mesh::Mesh;
pub use node::SceneNode;
pub use resolve::{AnimationNodeInfo, HierarchyResolver, NodeAnimationInfo};
pub use skeleton::{Bone, BoneHierarchy, NO_PARENT};

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeKey;
    pub struct MeshKey;
}
