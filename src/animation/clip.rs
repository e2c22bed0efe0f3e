use glam::{Quat, Vec3};

use crate::animation::tracks::KeyframeTrack;

/// Keyframe data driving one scene node.
///
/// Position and rotation are keyed independently; either may be empty.
#[derive(Debug, Clone, Default)]
pub struct NodeChannel {
    pub node_name: String,
    pub positions: KeyframeTrack<Vec3>,
    pub rotations: KeyframeTrack<Quat>,
}

impl NodeChannel {
    #[must_use]
    pub fn new(
        node_name: impl Into<String>,
        positions: KeyframeTrack<Vec3>,
        rotations: KeyframeTrack<Quat>,
    ) -> Self {
        Self {
            node_name: node_name.into(),
            positions,
            rotations,
        }
    }

    /// Samples both tracks at `at` source ticks.
    #[inline]
    #[must_use]
    pub fn evaluate(&self, at: f64) -> (Vec3, Quat) {
        (self.positions.evaluate(at), self.rotations.evaluate(at))
    }
}

/// A source animation as handed over by the scene parser.
///
/// `duration` is expressed in source ticks and `ticks_per_second` is the
/// source clock. Channels are matched to bones by exact node name.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f64,
    pub ticks_per_second: f64,
    pub channels: Vec<NodeChannel>,
}

impl AnimationClip {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        duration: f64,
        ticks_per_second: f64,
        channels: Vec<NodeChannel>,
    ) -> Self {
        Self {
            name: name.into(),
            duration,
            ticks_per_second,
            channels,
        }
    }

    /// Builds a clip whose duration is the latest key time over all channels.
    #[must_use]
    pub fn with_inferred_duration(
        name: impl Into<String>,
        ticks_per_second: f64,
        channels: Vec<NodeChannel>,
    ) -> Self {
        let duration = channels
            .iter()
            .flat_map(|c| {
                [
                    c.positions.times.last().copied(),
                    c.rotations.times.last().copied(),
                ]
            })
            .flatten()
            .fold(0.0_f64, f64::max);

        Self::new(name, duration, ticks_per_second, channels)
    }

    /// First channel targeting `node_name`, if any.
    #[must_use]
    pub fn channel(&self, node_name: &str) -> Option<&NodeChannel> {
        self.channels.iter().find(|c| c.node_name == node_name)
    }

    /// Names of every node this clip animates.
    pub fn target_names(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(|c| c.node_name.as_str())
    }
}
