//! Fixed-point pose encoding.
//!
//! A bone pose is stored in 12 bytes:
//!
//! | Field      | Type       | Encoding                                   |
//! |------------|------------|--------------------------------------------|
//! | `position` | `[i16; 3]` | `p * fixed_point_scale`, truncated         |
//! | `rotation` | `[i16; 3]` | `(x, y, z) * i16::MAX`, truncated, `w >= 0` |
//!
//! The scalar part of the rotation is dropped. `q` and `-q` are the same
//! rotation, so the encoder flips the vector part whenever `w < 0` and the
//! runtime rebuilds `w = sqrt(1 - x² - y² - z²)`.
//!
//! Truncation is toward zero, matching a C-style cast. Out-of-range values
//! saturate at the `i16` bounds.

use bytemuck::{Pod, Zeroable};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

const ROTATION_SCALE: f32 = i16::MAX as f32;

/// One bone's pose for one frame, laid out as the runtime reads it.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
pub struct BoneFrame {
    pub position: [i16; 3],
    pub rotation: [i16; 3],
}

impl BoneFrame {
    /// Zero translation and identity rotation.
    pub const IDENTITY: Self = Self {
        position: [0; 3],
        rotation: [0; 3],
    };

    /// Encodes a pose whose position is in model units.
    #[inline]
    #[must_use]
    pub fn encode(position: Vec3, rotation: Quat, fixed_point_scale: f32) -> Self {
        Self {
            position: quantize_position(position, fixed_point_scale),
            rotation: quantize_rotation(rotation),
        }
    }

    /// Rebuilds the floating-point rotation, `w` non-negative.
    #[inline]
    #[must_use]
    pub fn decoded_rotation(&self) -> Quat {
        dequantize_rotation(self.rotation)
    }

    /// Rebuilds the position in model units.
    #[inline]
    #[must_use]
    pub fn decoded_position(&self, fixed_point_scale: f32) -> Vec3 {
        Vec3::new(
            f32::from(self.position[0]),
            f32::from(self.position[1]),
            f32::from(self.position[2]),
        ) / fixed_point_scale
    }
}

#[inline]
#[must_use]
pub fn quantize_position(position: Vec3, fixed_point_scale: f32) -> [i16; 3] {
    let scaled = position * fixed_point_scale;
    [scaled.x as i16, scaled.y as i16, scaled.z as i16]
}

#[inline]
#[must_use]
pub fn quantize_rotation(rotation: Quat) -> [i16; 3] {
    if rotation.w < 0.0 {
        [
            (-rotation.x * ROTATION_SCALE) as i16,
            (-rotation.y * ROTATION_SCALE) as i16,
            (-rotation.z * ROTATION_SCALE) as i16,
        ]
    } else {
        [
            (rotation.x * ROTATION_SCALE) as i16,
            (rotation.y * ROTATION_SCALE) as i16,
            (rotation.z * ROTATION_SCALE) as i16,
        ]
    }
}

#[must_use]
pub fn dequantize_rotation(rotation: [i16; 3]) -> Quat {
    let x = f32::from(rotation[0]) / ROTATION_SCALE;
    let y = f32::from(rotation[1]) / ROTATION_SCALE;
    let z = f32::from(rotation[2]) / ROTATION_SCALE;
    let w = (1.0 - x * x - y * y - z * z).max(0.0).sqrt();
    Quat::from_xyzw(x, y, z, w)
}

/// Raw bytes of a frame block, native endian.
#[inline]
#[must_use]
pub fn frames_as_bytes(frames: &[BoneFrame]) -> &[u8] {
    bytemuck::cast_slice(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_is_twelve_bytes() {
        assert_eq!(std::mem::size_of::<BoneFrame>(), 12);
        let frames = [BoneFrame::IDENTITY; 3];
        assert_eq!(frames_as_bytes(&frames).len(), 36);
    }

    #[test]
    fn position_truncates_toward_zero() {
        let q = quantize_position(Vec3::new(1.999, -1.999, 0.5), 10.0);
        assert_eq!(q, [19, -19, 5]);
    }

    #[test]
    fn position_saturates() {
        let q = quantize_position(Vec3::new(1e6, -1e6, 0.0), 1.0);
        assert_eq!(q, [i16::MAX, i16::MIN, 0]);
    }

    #[test]
    fn identity_rotation_encodes_to_zero() {
        assert_eq!(quantize_rotation(Quat::IDENTITY), [0, 0, 0]);
        assert_eq!(BoneFrame::encode(Vec3::ZERO, Quat::IDENTITY, 256.0), BoneFrame::IDENTITY);
    }
}
