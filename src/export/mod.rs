//! Output side of the baker: typed records, the definition sink and the
//! clip packager.

pub mod package;
pub mod records;
pub mod sink;

pub use package::{AnimationResults, ClipPackager, generate_animation_for_scene, generate_for_bones};
pub use records::{ClipHeader, ClipRecord, PackagedClip};
pub use sink::{DataDefinition, DataPayload, DefinitionFile, DefinitionSink, Segment};
