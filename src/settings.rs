//! Bake Settings
//!
//! This module defines the target-side configuration of the animation bake.
//!
//! Settings are plain data: they can be built in code or deserialized from
//! JSON. Missing JSON fields fall back to [`AnimationSettings::default`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use rigbake::settings::AnimationSettings;
//!
//! let settings = AnimationSettings::from_json_str(r#"{ "ticks_per_second": 20 }"#)?;
//! settings.validate()?;
//! ```
//!
//! # Root correction
//!
//! `model_scale` and `rotate_model` are folded into root bones only. Child
//! bones are expressed relative to their parent and inherit the correction
//! at runtime.

use glam::Quat;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, RigbakeError};

/// Default name prefix marking attachment-point bones.
pub const DEFAULT_ATTACHMENT_PREFIX: &str = "attachment ";

/// What a bone holds in a clip that has no channel for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingChannelPolicy {
    /// Zero position, identity rotation.
    #[default]
    Identity,
    /// The bone's rest pose.
    RestPose,
}

/// Target-side configuration of one bake.
///
/// Every field has a default, so a JSON document only needs the values it
/// overrides. Call [`AnimationSettings::validate`] before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Playback rate of the baked clips.
    pub ticks_per_second: u16,
    /// Multiplier applied to positions before truncation to `i16`.
    pub fixed_point_scale: f32,
    /// Uniform scale folded into root bones.
    pub model_scale: f32,
    /// Orientation correction folded into root bones.
    pub rotate_model: Quat,
    /// Pose written for bones a clip has no channel for.
    pub missing_channel: MissingChannelPolicy,
    /// Bones whose name starts with this prefix get an attachment constant.
    pub attachment_prefix: String,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            ticks_per_second: 30,
            fixed_point_scale: 256.0,
            model_scale: 1.0,
            rotate_model: Quat::IDENTITY,
            missing_channel: MissingChannelPolicy::default(),
            attachment_prefix: DEFAULT_ATTACHMENT_PREFIX.to_string(),
        }
    }
}

impl AnimationSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Rejects values the pipeline would divide by or that would collapse
    /// every pose.
    pub fn validate(&self) -> Result<()> {
        if self.ticks_per_second == 0 {
            return Err(RigbakeError::InvalidTickRate {
                context: "target ticks_per_second".to_string(),
                rate: 0.0,
            });
        }
        if !self.fixed_point_scale.is_finite() || self.fixed_point_scale == 0.0 {
            return Err(RigbakeError::InvalidSettings(format!(
                "fixed_point_scale must be finite and non-zero, got {}",
                self.fixed_point_scale
            )));
        }
        if !self.model_scale.is_finite() || self.model_scale == 0.0 {
            return Err(RigbakeError::InvalidSettings(format!(
                "model_scale must be finite and non-zero, got {}",
                self.model_scale
            )));
        }
        if !self.rotate_model.is_normalized() {
            return Err(RigbakeError::InvalidSettings(format!(
                "rotate_model must be a unit quaternion, got {:?}",
                self.rotate_model
            )));
        }
        Ok(())
    }
}
