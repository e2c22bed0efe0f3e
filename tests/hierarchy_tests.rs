//! Hierarchy Resolution Tests
//!
//! Tests for:
//! - Relevance from animation channels and mesh bones
//! - Folding of irrelevant ancestors into relative transforms
//! - Model scale at the root
//! - Stable depth-first ordering of the resulting bones

use glam::{Affine3A, Vec3};
use rustc_hash::FxHashSet;

use rigbake::animation::clip::{AnimationClip, NodeChannel};
use rigbake::animation::tracks::KeyframeTrack;
use rigbake::errors::RigbakeError;
use rigbake::scene::{BoneHierarchy, HierarchyResolver, Mesh, NO_PARENT, SceneGraph};

const EPSILON: f32 = 1e-5;

fn translation(x: f32, y: f32, z: f32) -> Affine3A {
    Affine3A::from_translation(Vec3::new(x, y, z))
}

fn names(list: &[&str]) -> FxHashSet<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

/// root -> armature -> hips -> offset -> thigh, plus a `body` mesh node
/// skinned to `hips` and `thigh`.
fn skinned_leg() -> (SceneGraph, rigbake::scene::NodeKey) {
    let mut scene = SceneGraph::new("root", Affine3A::IDENTITY);
    let root = scene.root();
    let armature = scene.add_child(root, "armature", translation(0.0, 0.0, 1.0)).unwrap();
    let hips = scene.add_child(armature, "hips", translation(0.0, 1.0, 0.0)).unwrap();
    let offset = scene.add_child(hips, "offset", translation(1.0, 0.0, 0.0)).unwrap();
    scene.add_child(offset, "thigh", translation(0.0, 0.0, 2.0)).unwrap();

    let body = scene.add_child(root, "body", Affine3A::IDENTITY).unwrap();
    let mesh = scene.add_mesh(Mesh::new("body_mesh", ["hips", "thigh"]));
    scene.attach_mesh(body, mesh).unwrap();

    (scene, body)
}

// ============================================================================
// Relative transforms
// ============================================================================

#[test]
fn translation_chain_folds_skipped_node() {
    let mut scene = SceneGraph::new("a", translation(1.0, 0.0, 0.0));
    let a = scene.root();
    let b = scene.add_child(a, "b", translation(0.0, 1.0, 0.0)).unwrap();
    let c = scene.add_child(b, "c", translation(0.0, 0.0, 1.0)).unwrap();

    let info = HierarchyResolver::resolve_with_names(&scene, &names(&["a", "c"]), 1.0);

    assert_eq!(info.len(), 2);
    let c_info = info.find(c).unwrap();
    assert_eq!(c_info.parent, Some(a));
    assert!(
        Vec3::from(c_info.relative_transform.translation).abs_diff_eq(Vec3::new(0.0, 1.0, 0.0), EPSILON)
    );

    // The root's own local transform is not part of its relative transform.
    let a_info = info.find(a).unwrap();
    assert_eq!(a_info.parent, None);
    assert!(a_info.relative_transform.abs_diff_eq(Affine3A::IDENTITY, EPSILON));
}

#[test]
fn bones_resolve_through_used_meshes() {
    let (scene, body) = skinned_leg();

    let info = HierarchyResolver::resolve(&scene, &[body], 1.0).unwrap();
    let resolved: Vec<_> = info
        .iter()
        .map(|n| scene.get_node(n.node).unwrap().name.as_str())
        .collect();
    assert_eq!(resolved, vec!["hips", "thigh"]);

    let hips = info.iter().next().unwrap();
    assert_eq!(hips.parent, None);
    assert!(
        Vec3::from(hips.relative_transform.translation).abs_diff_eq(Vec3::new(0.0, 0.0, 1.0), EPSILON)
    );

    let thigh = info.iter().nth(1).unwrap();
    assert_eq!(thigh.parent, Some(hips.node));
    assert!(
        Vec3::from(thigh.relative_transform.translation).abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), EPSILON)
    );
}

#[test]
fn unused_meshes_do_not_contribute() {
    let (scene, _body) = skinned_leg();

    let info = HierarchyResolver::resolve(&scene, &[], 1.0).unwrap();
    assert!(info.is_empty());
}

#[test]
fn animated_nodes_are_relevant_without_meshes() {
    let (mut scene, _body) = skinned_leg();
    scene.animations.push(AnimationClip::new(
        "kick",
        10.0,
        30.0,
        vec![NodeChannel::new(
            "offset",
            KeyframeTrack::from_keys([(0.0, Vec3::ZERO)]),
            KeyframeTrack::default(),
        )],
    ));

    let info = HierarchyResolver::resolve(&scene, &[], 1.0).unwrap();
    assert_eq!(info.len(), 1);
    assert_eq!(
        scene.get_node(info.iter().next().unwrap().node).unwrap().name,
        "offset"
    );
}

#[test]
fn model_scale_applies_only_at_roots() {
    let (scene, body) = skinned_leg();

    let info = HierarchyResolver::resolve(&scene, &[body], 2.0).unwrap();
    let hips = info.iter().next().unwrap();
    let thigh = info.iter().nth(1).unwrap();

    let (scale, _, translation) = hips.relative_transform.to_scale_rotation_translation();
    assert!(scale.abs_diff_eq(Vec3::splat(2.0), EPSILON));
    assert!(translation.abs_diff_eq(Vec3::new(0.0, 0.0, 2.0), EPSILON));

    let (scale, _, _) = thigh.relative_transform.to_scale_rotation_translation();
    assert!(scale.abs_diff_eq(Vec3::ONE, EPSILON));
}

#[test]
fn unknown_used_node_is_an_error() {
    let (mut scene, body) = skinned_leg();
    scene.nodes.remove(body);

    let result = HierarchyResolver::resolve(&scene, &[body], 1.0);
    assert!(matches!(result, Err(RigbakeError::UnknownNode(_))));
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn order_follows_tree_not_name_set() {
    let mut scene = SceneGraph::new("root", Affine3A::IDENTITY);
    let root = scene.root();
    let z = scene.add_child(root, "z", Affine3A::IDENTITY).unwrap();
    let y = scene.add_child(z, "y", Affine3A::IDENTITY).unwrap();
    let x = scene.add_child(root, "x", Affine3A::IDENTITY).unwrap();

    let relevant = names(&["x", "y", "z"]);
    let first = HierarchyResolver::resolve_with_names(&scene, &relevant, 1.0);
    let second = HierarchyResolver::resolve_with_names(&scene, &relevant, 1.0);

    let order: Vec<_> = first.iter().map(|n| n.node).collect();
    assert_eq!(order, vec![z, y, x]);
    assert_eq!(order, second.iter().map(|n| n.node).collect::<Vec<_>>());
}

#[test]
fn duplicate_names_are_all_relevant() {
    let mut scene = SceneGraph::new("root", Affine3A::IDENTITY);
    let root = scene.root();
    let a = scene.add_child(root, "dup", Affine3A::IDENTITY).unwrap();
    let b = scene.add_child(root, "dup", Affine3A::IDENTITY).unwrap();

    let info = HierarchyResolver::resolve_with_names(&scene, &names(&["dup"]), 1.0);
    assert_eq!(info.iter().map(|n| n.node).collect::<Vec<_>>(), vec![a, b]);
}

// ============================================================================
// Bone hierarchy
// ============================================================================

#[test]
fn bone_hierarchy_keeps_parents_first() {
    let (scene, body) = skinned_leg();
    let info = HierarchyResolver::resolve(&scene, &[body], 1.0).unwrap();
    let bones = BoneHierarchy::from_animation_info(&scene, &info).unwrap();

    assert_eq!(bones.bone_count(), 2);
    assert_eq!(bones.parent_table(), vec![NO_PARENT, 0]);

    let hips = bones.bone_by_name("hips").unwrap();
    assert!(hips.is_root());
    assert!(hips.rest_position.abs_diff_eq(Vec3::new(0.0, 1.0, 1.0), EPSILON));

    let thigh = bones.bone_by_name("thigh").unwrap();
    assert_eq!(thigh.parent, Some(0));
    assert!(thigh.rest_position.abs_diff_eq(Vec3::new(1.0, 0.0, 2.0), EPSILON));

    for (i, bone) in bones.bones().iter().enumerate() {
        assert_eq!(bone.index, i);
        if let Some(p) = bone.parent {
            assert!(p < i);
        }
    }
}
