#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod animation;
pub mod errors;
pub mod export;
pub mod scene;
pub mod settings;

pub use animation::{AnimationClip, AnimationResampler, BoneFrame, KeyframeTrack, NodeChannel, ResampledClip};
pub use errors::{Result, RigbakeError};
pub use export::{AnimationResults, ClipPackager, DefinitionFile, DefinitionSink, generate_animation_for_scene};
pub use scene::{BoneHierarchy, HierarchyResolver, Mesh, SceneGraph};
pub use settings::{AnimationSettings, MissingChannelPolicy};
