//! Summary record produced when a rig is applied.
//!
//! This is the payload only; where it is sent is up to the host.

use serde::{Deserialize, Serialize};

use crate::association::Association;
use crate::skeleton::Skeleton;
use crate::topology::chain_statistics;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyReport {
    pub character_mode: bool,
    pub sprite_count: u32,
    /// Bones bound to each sprite.
    pub bone_sprite_count: Vec<u32>,
    pub bone_count: Vec<u32>,
    pub bone_depth: Vec<u32>,
    pub bone_chain_count: Vec<u32>,
    pub bone_root_count: u32,
}

impl ApplyReport {
    pub fn new(character_mode: bool, sprite_bone_counts: &[u32], skeleton: &Skeleton) -> Self {
        let stats = chain_statistics(skeleton);
        ApplyReport {
            character_mode,
            sprite_count: sprite_bone_counts.len() as u32,
            bone_sprite_count: sprite_bone_counts.to_vec(),
            bone_count: stats.bone_count,
            bone_depth: stats.max_chain_depth,
            bone_chain_count: stats.chain_bone_count,
            bone_root_count: stats.root_count,
        }
    }

    /// One sprite per association result.
    pub fn from_associations(
        character_mode: bool,
        associations: &[Association],
        skeleton: &Skeleton,
    ) -> Self {
        let counts: Vec<u32> = associations.iter().map(|a| a.len() as u32).collect();
        Self::new(character_mode, &counts, skeleton)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec2;
    use crate::ids::BoneId;

    #[test]
    fn carries_statistics_and_sprite_counts() {
        let mut b = Skeleton::builder();
        let root = b.add_bone("root", Vec2::ZERO, Vec2::new(0.0, 1.0));
        let arm = b.add_bone("arm", Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0));
        b.parent(arm, root);
        let sk = b.build().unwrap();

        let associations = [
            Association::Intersecting {
                bones: vec![root, arm],
            },
            Association::Nearest {
                bone: BoneId(1),
                distance_squared: 2.0,
            },
            Association::Empty,
        ];
        let report = ApplyReport::from_associations(true, &associations, &sk);
        assert_eq!(report.sprite_count, 3);
        assert_eq!(report.bone_sprite_count, vec![2, 1, 0]);
        assert_eq!(report.bone_root_count, 1);
        assert_eq!(report.bone_chain_count, vec![1]);
        assert_eq!(report.bone_depth, vec![1]);
        assert_eq!(report.bone_count, vec![2]);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["bone_root_count"], 1);
        assert_eq!(json["character_mode"], true);
    }
}
