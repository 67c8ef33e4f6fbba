//! Vizij Rig Core (engine-agnostic)
//!
//! Topology statistics and sprite-to-bone association for 2D skeletal rigs.
//! Bones live in an index-based arena ([`Skeleton`]) validated at construction;
//! every analysis over it is a pure function of that arena.

pub mod association;
pub mod config;
pub mod error;
pub mod geometry;
pub mod ids;
pub mod json;
pub mod report;
pub mod skeleton;
pub mod topology;

// Re-exports for consumers (adapters)
pub use association::{
    associate_all_bones, associate_possible_bones, associate_segments, Association, BoneSegment,
    SpritePart,
};
pub use config::AssociationConfig;
pub use error::RigError;
pub use geometry::{point_segment_distance_squared, rect_intersects_segment, Rect, Vec2};
pub use ids::BoneId;
pub use json::{parse_skeleton_json, skeleton_to_json, BoneRef, DocBone, DocPoint, SkeletonDoc};
pub use report::ApplyReport;
pub use skeleton::{Bone, BoneDesc, ChainLinkViolation, Skeleton, SkeletonBuilder};
pub use topology::{chain_statistics, root_statistics, ChainStatistics, RootStatistics};
