/// A skinned mesh as seen by the animation pipeline.
///
/// Only the bone names matter here: vertex data and materials belong to the
/// display-list side of the exporter.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub name: String,
    /// Names of the nodes this mesh is skinned to.
    pub bone_names: Vec<String>,
}

impl Mesh {
    #[must_use]
    pub fn new<S: Into<String>>(name: impl Into<String>, bone_names: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            bone_names: bone_names.into_iter().map(Into::into).collect(),
        }
    }
}
