//! Keyframe evaluation, resampling and fixed-point encoding.

pub mod clip;
pub mod quantize;
pub mod resample;
pub mod tracks;
pub mod values;

pub use clip::{AnimationClip, NodeChannel};
pub use quantize::BoneFrame;
pub use resample::{AnimationResampler, ResampledClip, frame_count};
pub use tracks::KeyframeTrack;
pub use values::Interpolatable;
