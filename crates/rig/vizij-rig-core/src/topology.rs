//! Per-root chain statistics over a skeleton.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::ids::BoneId;
use crate::skeleton::Skeleton;

/// Parallel per-root sequences, indexed by the order roots appear in the skeleton.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainStatistics {
    /// Number of branches (bones that are not their parent's chained child) under each root.
    pub chain_bone_count: Vec<u32>,
    /// Longest chain seen under each root, the root's own chain included.
    pub max_chain_depth: Vec<u32>,
    /// Bones under each root, the root included.
    pub bone_count: Vec<u32>,
    pub root_count: u32,
}

/// One root's slice of [`ChainStatistics`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootStatistics {
    pub root: BoneId,
    pub chain_count: u32,
    pub max_chain_depth: u32,
    pub bone_count: u32,
}

impl ChainStatistics {
    pub fn is_empty(&self) -> bool {
        self.root_count == 0
    }

    /// Zip the sequences back together with the skeleton's roots.
    pub fn iter_roots<'a>(
        &'a self,
        skeleton: &'a Skeleton,
    ) -> impl Iterator<Item = RootStatistics> + 'a {
        skeleton
            .roots()
            .iter()
            .zip(&self.chain_bone_count)
            .zip(&self.max_chain_depth)
            .zip(&self.bone_count)
            .map(|(((&root, &chain_count), &max_chain_depth), &bone_count)| RootStatistics {
                root,
                chain_count,
                max_chain_depth,
                bone_count,
            })
    }
}

/// Count branches, deepest chain, and bones for every root of `skeleton`.
///
/// Every bone is tested against every root by walking its ancestors, so the
/// cost is roots x bones x depth. Rigs are small enough for that to be fine.
pub fn chain_statistics(skeleton: &Skeleton) -> ChainStatistics {
    for v in skeleton.chain_link_violations() {
        warn!(
            "bone {} chains to {} whose parent is {:?}; branch counts assume chained bones are children",
            v.bone, v.chained_child, v.actual_parent
        );
    }

    let mut stats = ChainStatistics::default();
    for &root in skeleton.roots() {
        stats.root_count += 1;

        let mut chain = 0u32;
        let mut count = 1u32;
        let mut depth = skeleton.chain_depth(root);

        for (bone, _) in skeleton.bones() {
            if !skeleton.is_descendant_of(bone, root) {
                continue;
            }
            count += 1;

            let continues_parent_chain = skeleton
                .parent(bone)
                .is_some_and(|p| skeleton.chained_child(p) == Some(bone));
            if !continues_parent_chain {
                chain += 1;
                depth = depth.max(skeleton.chain_depth(bone));
            }
        }

        stats.chain_bone_count.push(chain);
        stats.max_chain_depth.push(depth as u32);
        stats.bone_count.push(count);
    }

    debug!(
        "chain statistics: {} roots over {} bones",
        stats.root_count,
        skeleton.len()
    );
    stats
}

pub fn root_statistics(skeleton: &Skeleton) -> Vec<RootStatistics> {
    chain_statistics(skeleton).iter_roots(skeleton).collect()
}
