use crate::animation::values::Interpolatable;

/// A key pair whose time delta equals this value is sampled as a step.
///
/// Exporters emit unit-spaced placeholder keys for tracks that were never
/// really authored; holding the earlier key keeps those placeholders from
/// blending. Only this exact delta is affected.
const PLACEHOLDER_KEY_DELTA: f64 = 1.0;

/// A sparse, time-keyed track.
///
/// `times` is non-decreasing and parallel to `values`. Times are in source
/// ticks.
#[derive(Debug, Clone, Default)]
pub struct KeyframeTrack<T: Interpolatable> {
    pub times: Vec<f64>,
    pub values: Vec<T>,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    #[must_use]
    pub fn new(times: Vec<f64>, values: Vec<T>) -> Self {
        debug_assert_eq!(times.len(), values.len(), "times/values length mismatch");
        debug_assert!(
            times.windows(2).all(|w| w[0] <= w[1]),
            "keyframe times must be non-decreasing"
        );
        Self { times, values }
    }

    /// Builds a track from `(time, value)` pairs.
    #[must_use]
    pub fn from_keys(keys: impl IntoIterator<Item = (f64, T)>) -> Self {
        let (times, values) = keys.into_iter().unzip();
        Self::new(times, values)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len().min(self.values.len())
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Evaluates the track at `at` source ticks.
    ///
    /// - no keys: [`Interpolatable::IDENTITY`]
    /// - one key: that key, whatever `at` is
    /// - before the first key: the first key
    /// - on or past the last key: exactly the last key, no extrapolation
    #[must_use]
    pub fn evaluate(&self, at: f64) -> T {
        let len = self.len();
        match len {
            0 => return T::IDENTITY,
            1 => return self.values[0],
            _ => {}
        }

        // Landing on or past the final key returns it untouched rather than
        // through the blend, which could be off by an ulp. This also wins over
        // the unit-delta hold below when the query sits exactly on the last key.
        if at >= self.times[len - 1] {
            return self.values[len - 1];
        }

        // First key whose time is >= at.
        let next_idx = self.times[..len].partition_point(|&t| t < at);
        if next_idx == 0 {
            return self.values[0];
        }

        let start = next_idx - 1;
        let t0 = self.times[start];
        let dt = self.times[next_idx] - t0;

        #[allow(clippy::float_cmp)]
        let lerp = if dt == PLACEHOLDER_KEY_DELTA {
            0.0
        } else {
            (at - t0) / dt
        };

        T::interpolate_linear(self.values[start], self.values[next_idx], lerp as f32)
    }
}
