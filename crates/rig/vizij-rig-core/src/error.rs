use thiserror::Error;

use crate::ids::BoneId;

/// Errors produced while building or loading a skeleton.
///
/// Analyses over a built [`Skeleton`](crate::Skeleton) never fail; only
/// construction and parsing return this type.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RigError {
    #[error("parent cycle detected at bone {bone}")]
    ParentCycle { bone: BoneId },
    #[error("chain cycle detected at bone {bone}")]
    ChainCycle { bone: BoneId },
    #[error("bone {bone} chains to {chained_child}, which is not one of its children")]
    ChainLinkNotChild { bone: BoneId, chained_child: BoneId },
    #[error("skeleton json parse error: {0}")]
    Parse(String),
    #[error("serialize skeleton: {0}")]
    Serialize(String),
}
