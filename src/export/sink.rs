//! Definition sink
//!
//! The baker never writes files. Everything it produces is handed to a
//! [`DefinitionSink`] as named data blocks and named integer constants; the
//! sink owns naming and decides how the result is emitted.
//!
//! [`DefinitionFile`] is the in-memory sink: it guarantees unique names,
//! sanitizes constant names and keeps definitions in insertion order.

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::animation::quantize::BoneFrame;
use crate::export::records::{ClipHeader, ClipRecord};

/// Memory segment a definition is placed in by the runtime linker script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    /// Streamed animation frame data.
    Animation,
    /// Resident model data: clip records, headers, bone tables.
    Model,
}

impl Segment {
    /// Suffix the emission layer appends to section names.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Segment::Animation => "_anim",
            Segment::Model => "_geo",
        }
    }
}

/// Typed payload of a definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum DataPayload {
    BoneFrames(Vec<BoneFrame>),
    Clip(ClipRecord),
    ClipHeaders(Vec<ClipHeader>),
    U16Array(Vec<u16>),
}

impl DataPayload {
    /// Runtime type name of one element of the payload.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            DataPayload::BoneFrames(_) => "struct AnimBoneFrame",
            DataPayload::Clip(_) => "struct AnimClip",
            DataPayload::ClipHeaders(_) => "struct AnimClipHeader",
            DataPayload::U16Array(_) => "unsigned short",
        }
    }

    #[must_use]
    pub fn is_array(&self) -> bool {
        !matches!(self, DataPayload::Clip(_))
    }
}

/// A named block of data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataDefinition {
    pub name: String,
    pub segment: Segment,
    pub payload: DataPayload,
}

/// Receiver of everything the baker emits.
pub trait DefinitionSink {
    /// Returns a name derived from `requested` that nothing else in this sink
    /// uses, and reserves it.
    fn unique_name(&mut self, requested: &str) -> String;

    /// Returns the constant name for `requested` in this sink's namespace.
    fn macro_name(&self, requested: &str) -> String;

    /// Like [`macro_name`](Self::macro_name), but made unique against every
    /// name in the sink after case folding, and reserved.
    fn unique_macro_name(&mut self, requested: &str) -> String;

    fn add_definition(&mut self, definition: DataDefinition);

    fn add_macro(&mut self, name: String, value: String);

    /// Reserves a unique name for `requested`, stores the payload under it and
    /// returns the name.
    fn add_data_definition(
        &mut self,
        requested: &str,
        segment: Segment,
        payload: DataPayload,
    ) -> String {
        let name = self.unique_name(requested);
        self.add_definition(DataDefinition {
            name: name.clone(),
            segment,
            payload,
        });
        name
    }
}

/// In-memory [`DefinitionSink`].
///
/// Names are `<prefix>_<requested>` with every character outside
/// `[A-Za-z0-9_]` replaced by `_`. Collisions get `_1`, `_2`, ... appended.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DefinitionFile {
    prefix: String,
    definitions: Vec<DataDefinition>,
    macros: Vec<(String, String)>,
    #[serde(skip)]
    used_names: FxHashSet<String>,
}

impl DefinitionFile {
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: sanitize_identifier(prefix),
            ..Default::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[inline]
    #[must_use]
    pub fn definitions(&self) -> &[DataDefinition] {
        &self.definitions
    }

    #[inline]
    #[must_use]
    pub fn macros(&self) -> &[(String, String)] {
        &self.macros
    }

    #[must_use]
    pub fn definition(&self, name: &str) -> Option<&DataDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    #[must_use]
    pub fn macro_value(&self, name: &str) -> Option<&str> {
        self.macros
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn qualify(&self, requested: &str) -> String {
        if self.prefix.is_empty() {
            sanitize_identifier(requested)
        } else {
            sanitize_identifier(&format!("{}_{requested}", self.prefix))
        }
    }
}

impl DefinitionSink for DefinitionFile {
    fn unique_name(&mut self, requested: &str) -> String {
        let base = self.qualify(requested);
        let mut name = base.clone();
        let mut suffix = 1;
        while self.used_names.contains(&name) {
            name = format!("{base}_{suffix}");
            suffix += 1;
        }
        self.used_names.insert(name.clone());
        name
    }

    fn macro_name(&self, requested: &str) -> String {
        self.qualify(requested).to_uppercase()
    }

    fn unique_macro_name(&mut self, requested: &str) -> String {
        let base = self.macro_name(requested);
        let mut name = base.clone();
        let mut suffix = 1;
        while self.used_names.contains(&name) {
            name = format!("{base}_{suffix}");
            suffix += 1;
        }
        self.used_names.insert(name.clone());
        name
    }

    fn add_definition(&mut self, definition: DataDefinition) {
        self.used_names.insert(definition.name.clone());
        self.definitions.push(definition);
    }

    fn add_macro(&mut self, name: String, value: String) {
        self.used_names.insert(name.clone());
        self.macros.push((name, value));
    }
}

/// Maps `name` onto a C-style identifier.
#[must_use]
pub fn sanitize_identifier(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}
