use serde::{Deserialize, Serialize};

/// Per-clip metadata record read by the runtime player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipRecord {
    pub frame_count: u32,
    pub bone_count: u16,
    /// Name of the frame block definition.
    pub frames: String,
    pub ticks_per_second: u16,
}

/// One entry of the clip header table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipHeader {
    /// Bytes the runtime reads before the first pose is usable: one full
    /// frame of bone records.
    pub first_chunk_size: u16,
    pub ticks_per_second: u16,
    /// Clip length in target ticks.
    pub max_ticks: u16,
    /// Name of the frame block definition.
    pub data: String,
}

/// Names emitted for one packaged clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagedClip {
    /// Source clip name.
    pub source_name: String,
    pub frames_name: String,
    pub clip_name: String,
    pub index_macro: String,
    /// Position in the header table.
    pub index: usize,
}
