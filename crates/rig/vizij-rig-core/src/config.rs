//! Configuration for bone association.

use serde::{Deserialize, Serialize};

/// Tuning for [`associate_possible_bones`](crate::associate_possible_bones)
/// and [`associate_segments`](crate::associate_segments).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssociationConfig {
    /// Only consider bones flagged visible.
    pub visible_only: bool,
    /// Segments whose x-extent is at or below this are clipped as vertical lines.
    /// Defaults to the smallest positive subnormal, so only exactly vertical
    /// segments skip the slope.
    pub vertical_epsilon: f32,
    /// When nothing intersects, return the single nearest bone instead of nothing.
    pub fallback_to_nearest: bool,
}

impl Default for AssociationConfig {
    fn default() -> Self {
        Self {
            visible_only: true,
            vertical_epsilon: f32::from_bits(1),
            fallback_to_nearest: true,
        }
    }
}
