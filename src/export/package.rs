//! Clip packaging and scene-level generation.
//!
//! [`ClipPackager`] turns resampled clips into definitions, one clip at a
//! time, and accumulates the header table. [`generate_animation_for_scene`]
//! runs the whole pipeline for a scene: hierarchy resolution, bone ordering,
//! rest pose, resampling, packaging and the bone/attachment tables.

use glam::Vec3;
use log::{debug, info, warn};

use crate::animation::clip::AnimationClip;
use crate::animation::quantize::BoneFrame;
use crate::animation::resample::{AnimationResampler, ResampledClip};
use crate::errors::{Result, RigbakeError};
use crate::export::records::{ClipHeader, ClipRecord, PackagedClip};
use crate::export::sink::{DataDefinition, DataPayload, DefinitionSink, Segment};
use crate::scene::graph::SceneGraph;
use crate::scene::resolve::HierarchyResolver;
use crate::scene::skeleton::{BoneHierarchy, NO_PARENT};
use crate::scene::NodeKey;
use crate::settings::AnimationSettings;

/// Everything the emitted definitions are referenced by.
#[derive(Debug, Clone)]
pub struct AnimationResults {
    pub bones: BoneHierarchy,
    /// Rest pose table, one [`BoneFrame`] per bone.
    pub initial_pose_reference: String,
    pub bone_parent_reference: String,
    pub bone_count_macro: String,
    pub animations_reference: String,
    pub attachment_count_macro: String,
    pub clips: Vec<PackagedClip>,
}

/// Packages resampled clips in the order they are handed in.
pub struct ClipPackager<'a, S: DefinitionSink> {
    sink: &'a mut S,
    ticks_per_second: u16,
    headers: Vec<ClipHeader>,
}

impl<'a, S: DefinitionSink> ClipPackager<'a, S> {
    #[must_use]
    pub fn new(sink: &'a mut S, ticks_per_second: u16) -> Self {
        Self {
            sink,
            ticks_per_second,
            headers: Vec::new(),
        }
    }

    /// Emits the frame block, clip record and index constant of `clip` and
    /// appends its header entry.
    pub fn package(&mut self, clip: ResampledClip) -> Result<PackagedClip> {
        let bone_count = to_u16(clip.bone_count, "bone count")?;
        let frame_count = u32::try_from(clip.frame_count).map_err(|_| RigbakeError::ValueOverflow {
            context: format!("frame count of clip '{}'", clip.name),
            value: clip.frame_count as u64,
        })?;
        let first_chunk_size = to_u16(
            clip.bone_count * std::mem::size_of::<BoneFrame>(),
            "first chunk size",
        )?;
        let max_ticks = to_u16(clip.frame_count, "max ticks")?;

        let frames_name = self.sink.add_data_definition(
            &format!("{}_data", clip.name),
            Segment::Animation,
            DataPayload::BoneFrames(clip.frames),
        );

        let clip_name = self.sink.add_data_definition(
            &format!("{}_clip", clip.name),
            Segment::Model,
            DataPayload::Clip(ClipRecord {
                frame_count,
                bone_count,
                frames: frames_name.clone(),
                ticks_per_second: self.ticks_per_second,
            }),
        );

        let index = self.headers.len();
        let index_macro = self.sink.unique_macro_name(&format!("{}_INDEX", clip.name));
        self.sink.add_macro(index_macro.clone(), index.to_string());

        self.headers.push(ClipHeader {
            first_chunk_size,
            ticks_per_second: self.ticks_per_second,
            max_ticks,
            data: frames_name.clone(),
        });

        debug!(
            "Packaged clip '{}' as '{}': {} frames x {} bones",
            clip.name, frames_name, frame_count, bone_count
        );

        Ok(PackagedClip {
            source_name: clip.name,
            frames_name,
            clip_name,
            index_macro,
            index,
        })
    }

    #[must_use]
    pub fn headers(&self) -> &[ClipHeader] {
        &self.headers
    }

    /// Emits the header table under the already reserved `name`.
    pub fn finish(self, name: &str) -> Vec<ClipHeader> {
        self.sink.add_definition(DataDefinition {
            name: name.to_string(),
            segment: Segment::Model,
            payload: DataPayload::ClipHeaders(self.headers.clone()),
        });
        self.headers
    }
}

/// Runs the pipeline for `scene`, exporting the meshes of `used_nodes`.
pub fn generate_animation_for_scene<S: DefinitionSink>(
    scene: &SceneGraph,
    used_nodes: &[NodeKey],
    settings: &AnimationSettings,
    sink: &mut S,
) -> Result<AnimationResults> {
    settings.validate()?;

    let info = HierarchyResolver::resolve(scene, used_nodes, settings.model_scale)?;
    let bones = BoneHierarchy::from_animation_info(scene, &info)?;

    generate_for_bones(&scene.animations, bones, settings, sink)
}

/// Runs resampling and packaging against an existing bone ordering.
///
/// `settings.model_scale` is applied to animated root positions only. The
/// rest transforms of `bones` are taken as already scaled, which is what
/// [`generate_animation_for_scene`] produces; hand-built roots must carry the
/// model scale in their rest transform.
pub fn generate_for_bones<S: DefinitionSink>(
    clips: &[AnimationClip],
    bones: BoneHierarchy,
    settings: &AnimationSettings,
    sink: &mut S,
) -> Result<AnimationResults> {
    settings.validate()?;

    // 0xFFFF is the no-parent sentinel, so the last valid index is 0xFFFE.
    if bones.bone_count() >= usize::from(NO_PARENT) {
        return Err(RigbakeError::ValueOverflow {
            context: "bone count".to_string(),
            value: bones.bone_count() as u64,
        });
    }

    let resampler = AnimationResampler::new(&bones, settings);

    // Rest pose
    let bones_name = sink.unique_name("default_bones");
    let bone_parent_name = sink.unique_name("bone_parent");

    let rest_pose: Vec<BoneFrame> = bones
        .bones()
        .iter()
        .map(|bone| {
            if !bone.rest_scale.abs_diff_eq(Vec3::ONE, 1e-3) {
                warn!(
                    "Bone '{}' has rest scale {}; scale is not stored in the pose data",
                    bone.name, bone.rest_scale
                );
            }
            resampler.rest_frame(bone)
        })
        .collect();
    sink.add_definition(DataDefinition {
        name: bones_name.clone(),
        segment: Segment::Model,
        payload: DataPayload::BoneFrames(rest_pose),
    });

    let bone_count_macro = format!("{bones_name}_COUNT").to_uppercase();
    sink.add_macro(bone_count_macro.clone(), bones.bone_count().to_string());

    // Clips
    let animations_name = sink.unique_name("animations");
    let mut packaged = Vec::new();
    {
        let mut packager = ClipPackager::new(sink, settings.ticks_per_second);
        for clip in clips {
            if let Some(resampled) = resampler.resample(clip)? {
                packaged.push(packager.package(resampled)?);
            }
        }
        packager.finish(&animations_name);
    }

    // Bone parents
    sink.add_definition(DataDefinition {
        name: bone_parent_name.clone(),
        segment: Segment::Model,
        payload: DataPayload::U16Array(bones.parent_table()),
    });

    // Attachments
    let mut attachment_count = 0usize;
    let prefix = settings.attachment_prefix.as_str();
    if !prefix.is_empty() {
        for bone in bones.bones() {
            if let Some(slot) = bone.name.strip_prefix(prefix) {
                let name = sink.unique_macro_name(&format!("ATTACHMENT_{slot}"));
                sink.add_macro(name, attachment_count.to_string());
                attachment_count += 1;
            }
        }
    }
    let attachment_count_macro = sink.unique_macro_name("ATTACHMENT_COUNT");
    sink.add_macro(attachment_count_macro.clone(), attachment_count.to_string());

    info!(
        "Baked {} of {} clips over {} bones ({} attachments)",
        packaged.len(),
        clips.len(),
        bones.bone_count(),
        attachment_count
    );

    Ok(AnimationResults {
        bones,
        initial_pose_reference: bones_name,
        bone_parent_reference: bone_parent_name,
        bone_count_macro,
        animations_reference: animations_name,
        attachment_count_macro,
        clips: packaged,
    })
}

fn to_u16(value: usize, context: &str) -> Result<u16> {
    u16::try_from(value).map_err(|_| RigbakeError::ValueOverflow {
        context: context.to_string(),
        value: value as u64,
    })
}
