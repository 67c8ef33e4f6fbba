//! Mapping a sprite rectangle to the bones that should influence it.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::AssociationConfig;
use crate::geometry::{point_segment_distance_squared, rect_intersects_segment, Rect, Vec2};
use crate::ids::BoneId;
use crate::skeleton::Skeleton;

/// A bone reduced to the segment it spans.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoneSegment {
    pub bone: BoneId,
    pub start: Vec2,
    pub end: Vec2,
}

/// A sprite placed in character space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpritePart {
    pub name: String,
    pub position: Vec2,
    /// Texture rect width and height.
    pub size: Vec2,
}

impl SpritePart {
    pub fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.size.x, self.size.y)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Association {
    /// Bones whose segment touches the rectangle, in input order.
    Intersecting { bones: Vec<BoneId> },
    /// Nothing touched; the closest bone by squared distance.
    Nearest { bone: BoneId, distance_squared: f32 },
    Empty,
}

impl Association {
    pub fn bones(&self) -> Vec<BoneId> {
        match self {
            Association::Intersecting { bones } => bones.clone(),
            Association::Nearest { bone, .. } => vec![*bone],
            Association::Empty => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Association::Intersecting { bones } => bones.len(),
            Association::Nearest { .. } => 1,
            Association::Empty => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Squared distance between a segment and the rectangle outline, measured from
/// the segment's endpoints to each edge and from each corner to the segment.
fn outline_distance_squared(rect: &Rect, seg: &BoneSegment) -> f32 {
    let mut best = f32::MAX;
    for point in [seg.start, seg.end] {
        for (a, b) in rect.edges() {
            best = best.min(point_segment_distance_squared(point, a, b));
        }
    }
    for corner in rect.corners() {
        best = best.min(point_segment_distance_squared(corner, seg.start, seg.end));
    }
    best
}

/// Bones relevant to `rect`: every intersecting segment, or failing that the
/// single nearest one. Ties go to the earlier segment.
pub fn associate_segments(
    rect: &Rect,
    segments: &[BoneSegment],
    config: &AssociationConfig,
) -> Association {
    let hits: Vec<BoneId> = segments
        .iter()
        .filter(|s| rect_intersects_segment(rect, s.start, s.end, config.vertical_epsilon))
        .map(|s| s.bone)
        .collect();
    if !hits.is_empty() {
        debug!("{} of {} bones intersect {:?}", hits.len(), segments.len(), rect);
        return Association::Intersecting { bones: hits };
    }
    if !config.fallback_to_nearest {
        return Association::Empty;
    }

    let mut nearest: Option<(BoneId, f32)> = None;
    let mut best = f32::MAX;
    for seg in segments {
        let d = outline_distance_squared(rect, seg);
        if d < best {
            best = d;
            nearest = Some((seg.bone, d));
        }
    }
    match nearest {
        Some((bone, distance_squared)) => {
            debug!("no bone intersects {:?}; nearest is {bone}", rect);
            Association::Nearest {
                bone,
                distance_squared,
            }
        }
        None => Association::Empty,
    }
}

fn segments(skeleton: &Skeleton, config: &AssociationConfig) -> Vec<BoneSegment> {
    skeleton
        .bones()
        .filter(|(_, b)| b.visible || !config.visible_only)
        .map(|(bone, b)| BoneSegment {
            bone,
            start: b.position,
            end: b.end_position,
        })
        .collect()
}

/// [`associate_segments`] over the skeleton's bones.
pub fn associate_possible_bones(
    skeleton: &Skeleton,
    rect: &Rect,
    config: &AssociationConfig,
) -> Association {
    associate_segments(rect, &segments(skeleton, config), config)
}

/// Every bone eligible under `config`, regardless of geometry.
pub fn associate_all_bones(skeleton: &Skeleton, config: &AssociationConfig) -> Vec<BoneId> {
    segments(skeleton, config).into_iter().map(|s| s.bone).collect()
}
