//! Fixed-rate resampling of source clips.
//!
//! Source clips are sparse and keyed on their own clock. The runtime wants a
//! dense pose for every bone on every tick of a single fixed clock, so each
//! clip is re-evaluated at `frame × source_rate / target_rate` source ticks
//! and quantized into [`BoneFrame`]s.
//!
//! Output layout is frame-major: `frames[frame * bone_count + bone]`.

use glam::{Quat, Vec3};
use log::debug;
use rustc_hash::FxHashMap;

use crate::animation::clip::{AnimationClip, NodeChannel};
use crate::animation::quantize::BoneFrame;
use crate::errors::{Result, RigbakeError};
use crate::scene::skeleton::{Bone, BoneHierarchy};
use crate::settings::{AnimationSettings, MissingChannelPolicy};

/// A dense, quantized clip on the target clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResampledClip {
    /// Name of the source clip.
    pub name: String,
    pub frame_count: usize,
    pub bone_count: usize,
    pub frames: Vec<BoneFrame>,
}

impl ResampledClip {
    /// All bone poses of `frame`, in bone order.
    #[must_use]
    pub fn frame(&self, frame: usize) -> Option<&[BoneFrame]> {
        let start = frame.checked_mul(self.bone_count)?;
        self.frames.get(start..start + self.bone_count)
    }

    #[must_use]
    pub fn bone_frame(&self, frame: usize, bone: usize) -> Option<&BoneFrame> {
        if bone >= self.bone_count {
            return None;
        }
        self.frame(frame).map(|poses| &poses[bone])
    }
}

/// Number of target frames covering `duration` source ticks.
///
/// `ceil(duration × target_rate / source_rate)`, never less than 1. Callers
/// must have rejected a zero `source_rate`.
#[must_use]
pub fn frame_count(duration: f64, source_rate: f64, target_rate: u16) -> usize {
    let frames = (duration * f64::from(target_rate) / source_rate).ceil();
    // NaN and negatives land on 0 through the saturating cast.
    (frames as usize).max(1)
}

/// Resamples source clips against a fixed bone ordering.
///
/// Holds only shared references, so one resampler can serve every clip of a
/// scene.
pub struct AnimationResampler<'a> {
    bones: &'a BoneHierarchy,
    settings: &'a AnimationSettings,
}

impl<'a> AnimationResampler<'a> {
    #[must_use]
    pub fn new(bones: &'a BoneHierarchy, settings: &'a AnimationSettings) -> Self {
        Self { bones, settings }
    }

    /// Resamples `clip`, or returns `Ok(None)` when none of its channels
    /// drives a bone.
    pub fn resample(&self, clip: &AnimationClip) -> Result<Option<ResampledClip>> {
        let source_rate = clip.ticks_per_second;
        if !(source_rate.is_finite() && source_rate > 0.0) {
            return Err(RigbakeError::InvalidTickRate {
                context: format!("clip '{}'", clip.name),
                rate: source_rate,
            });
        }
        let target_rate = self.settings.ticks_per_second;
        if target_rate == 0 {
            return Err(RigbakeError::InvalidTickRate {
                context: "target ticks_per_second".to_string(),
                rate: 0.0,
            });
        }

        // First channel wins when a node name repeats.
        let mut channels: FxHashMap<&str, &NodeChannel> = FxHashMap::default();
        for channel in &clip.channels {
            channels.entry(channel.node_name.as_str()).or_insert(channel);
        }

        let bone_channels: Vec<Option<&NodeChannel>> = self
            .bones
            .bones()
            .iter()
            .map(|bone| channels.get(bone.name.as_str()).copied())
            .collect();

        let matched = bone_channels.iter().filter(|c| c.is_some()).count();
        if matched == 0 {
            debug!(
                "Skipping clip '{}': none of its {} channels targets a bone",
                clip.name,
                clip.channels.len()
            );
            return Ok(None);
        }
        if matched < clip.channels.len() {
            debug!(
                "Clip '{}': {} of {} channels target a bone",
                clip.name,
                matched,
                clip.channels.len()
            );
        }

        let frame_count = frame_count(clip.duration, source_rate, target_rate);
        let bone_count = self.bones.bone_count();

        // The header stores the frame count as u16; reject before allocating.
        if frame_count > usize::from(u16::MAX) {
            return Err(RigbakeError::ValueOverflow {
                context: format!("frame count of clip '{}'", clip.name),
                value: frame_count as u64,
            });
        }

        // Every slot starts at the missing-channel default and is overwritten
        // for bones that have a channel.
        let defaults: Vec<BoneFrame> = self
            .bones
            .bones()
            .iter()
            .map(|bone| self.missing_channel_frame(bone))
            .collect();
        let slots = frame_count
            .checked_mul(bone_count)
            .ok_or_else(|| RigbakeError::ValueOverflow {
                context: format!("frame slots of clip '{}'", clip.name),
                value: frame_count as u64,
            })?;
        let mut frames = Vec::with_capacity(slots);
        for _ in 0..frame_count {
            frames.extend_from_slice(&defaults);
        }

        let fixed_point_scale = self.settings.fixed_point_scale;
        for (bone, channel) in self.bones.bones().iter().zip(&bone_channels) {
            let Some(channel) = channel else {
                continue;
            };

            for frame in 0..frame_count {
                let at = frame as f64 * source_rate / f64::from(target_rate);
                let (position, rotation) = channel.evaluate(at);
                let (position, rotation) = self.correct_root(bone, position, rotation);
                frames[frame * bone_count + bone.index] =
                    BoneFrame::encode(position, rotation, fixed_point_scale);
            }
        }

        Ok(Some(ResampledClip {
            name: clip.name.clone(),
            frame_count,
            bone_count,
            frames,
        }))
    }

    /// Quantized rest pose of `bone`.
    ///
    /// The resolved relative transform of a root bone already carries the
    /// model scale, so only the root rotation is applied here.
    #[must_use]
    pub fn rest_frame(&self, bone: &Bone) -> BoneFrame {
        let (position, rotation) = if bone.is_root() {
            let rotate = self.settings.rotate_model;
            (rotate * bone.rest_position, rotate * bone.rest_rotation)
        } else {
            (bone.rest_position, bone.rest_rotation)
        };

        BoneFrame::encode(position, rotation, self.settings.fixed_point_scale)
    }

    fn missing_channel_frame(&self, bone: &Bone) -> BoneFrame {
        match self.settings.missing_channel {
            MissingChannelPolicy::Identity => BoneFrame::IDENTITY,
            MissingChannelPolicy::RestPose => self.rest_frame(bone),
        }
    }

    /// Folds the model orientation and scale into root bones only.
    fn correct_root(&self, bone: &Bone, position: Vec3, rotation: Quat) -> (Vec3, Quat) {
        if !bone.is_root() {
            return (position, rotation);
        }
        let rotate = self.settings.rotate_model;
        (
            (rotate * position) * self.settings.model_scale,
            rotate * rotation,
        )
    }
}
