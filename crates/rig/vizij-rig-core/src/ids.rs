//! Identifiers for bones inside a [`Skeleton`](crate::Skeleton) arena.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Dense index of a bone in its skeleton. Ids are only meaningful for the
/// skeleton that produced them.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoneId(pub u32);

impl BoneId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        BoneId(index as u32)
    }
}

impl fmt::Display for BoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
