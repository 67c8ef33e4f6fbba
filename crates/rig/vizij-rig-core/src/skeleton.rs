//! Index-based bone arena.
//!
//! Parent and chain links are stored as [`BoneId`]s into the arena rather than
//! as references, and the relations are checked for cycles once, when the
//! skeleton is built. After that a [`Skeleton`] is immutable.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::RigError;
use crate::geometry::Vec2;
use crate::ids::BoneId;

fn default_visible() -> bool {
    true
}

/// Input record for one bone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoneDesc {
    pub name: String,
    #[serde(default)]
    pub parent: Option<BoneId>,
    /// The next bone of an unbranched chain. Expected to be one of this bone's children.
    #[serde(default)]
    pub chained_child: Option<BoneId>,
    #[serde(default)]
    pub position: Vec2,
    #[serde(default)]
    pub end_position: Vec2,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

impl BoneDesc {
    pub fn new(name: impl Into<String>) -> Self {
        BoneDesc {
            name: name.into(),
            parent: None,
            chained_child: None,
            position: Vec2::ZERO,
            end_position: Vec2::ZERO,
            visible: true,
        }
    }
}

/// A bone after validation. Links are guaranteed to point inside the arena.
#[derive(Clone, Debug, PartialEq)]
pub struct Bone {
    pub name: String,
    pub parent: Option<BoneId>,
    pub chained_child: Option<BoneId>,
    pub position: Vec2,
    pub end_position: Vec2,
    pub visible: bool,
}

/// A bone whose `chained_child` is not actually one of its children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainLinkViolation {
    pub bone: BoneId,
    pub chained_child: BoneId,
    /// The parent the chained bone really has.
    pub actual_parent: Option<BoneId>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Skeleton {
    bones: Vec<Bone>,
    children: Vec<Vec<BoneId>>,
    roots: Vec<BoneId>,
}

impl Skeleton {
    /// Build a skeleton from bone records, ids being positions in `descs`.
    ///
    /// Parent or chain references that point outside the arena (or at the bone
    /// itself) are dropped with a warning; such a bone becomes a root. Cycles in
    /// either relation are rejected.
    pub fn new(descs: Vec<BoneDesc>) -> Result<Self, RigError> {
        let len = descs.len();
        let valid = |own: usize, link: Option<BoneId>| -> Result<Option<BoneId>, BoneId> {
            match link {
                Some(id) if id.index() < len && id.index() != own => Ok(Some(id)),
                Some(id) => Err(id),
                None => Ok(None),
            }
        };

        let mut bones = Vec::with_capacity(len);
        for (index, desc) in descs.into_iter().enumerate() {
            let parent = valid(index, desc.parent).unwrap_or_else(|id| {
                warn!("bone '{}' has dangling parent {id}; treating it as a root", desc.name);
                None
            });
            let chained_child = valid(index, desc.chained_child).unwrap_or_else(|id| {
                warn!("bone '{}' has dangling chained child {id}; ignoring it", desc.name);
                None
            });
            bones.push(Bone {
                name: desc.name,
                parent,
                chained_child,
                position: desc.position,
                end_position: desc.end_position,
                visible: desc.visible,
            });
        }

        if let Some(i) = find_cycle(len, |i| bones[i].parent.map(BoneId::index)) {
            return Err(RigError::ParentCycle {
                bone: BoneId::from_index(i),
            });
        }
        if let Some(i) = find_cycle(len, |i| bones[i].chained_child.map(BoneId::index)) {
            return Err(RigError::ChainCycle {
                bone: BoneId::from_index(i),
            });
        }

        let mut children = vec![Vec::new(); len];
        let mut roots = Vec::new();
        for (index, bone) in bones.iter().enumerate() {
            let id = BoneId::from_index(index);
            match bone.parent {
                Some(parent) => children[parent.index()].push(id),
                None => roots.push(id),
            }
        }

        Ok(Skeleton {
            bones,
            children,
            roots,
        })
    }

    pub fn builder() -> SkeletonBuilder {
        SkeletonBuilder::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn bone(&self, id: BoneId) -> Option<&Bone> {
        self.bones.get(id.index())
    }

    pub fn bones(&self) -> impl Iterator<Item = (BoneId, &Bone)> + '_ {
        self.bones
            .iter()
            .enumerate()
            .map(|(i, b)| (BoneId::from_index(i), b))
    }

    pub fn visible_bones(&self) -> impl Iterator<Item = (BoneId, &Bone)> + '_ {
        self.bones().filter(|(_, b)| b.visible)
    }

    /// Bones without a parent, in input order.
    pub fn roots(&self) -> &[BoneId] {
        &self.roots
    }

    /// Direct children in input order.
    pub fn children(&self, id: BoneId) -> &[BoneId] {
        self.children
            .get(id.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn parent(&self, id: BoneId) -> Option<BoneId> {
        self.bone(id).and_then(|b| b.parent)
    }

    pub fn chained_child(&self, id: BoneId) -> Option<BoneId> {
        self.bone(id).and_then(|b| b.chained_child)
    }

    pub fn find(&self, name: &str) -> Option<BoneId> {
        self.bones().find(|(_, b)| b.name == name).map(|(id, _)| id)
    }

    /// Walks parent links upward from `id`, excluding `id` itself.
    pub fn ancestors(&self, id: BoneId) -> Links<'_> {
        Links {
            skeleton: self,
            next: self.parent(id),
            link: |b| b.parent,
        }
    }

    /// Walks chain links from `id`, including `id` itself.
    pub fn chain(&self, id: BoneId) -> Links<'_> {
        Links {
            skeleton: self,
            next: self.bone(id).map(|_| id),
            link: |b| b.chained_child,
        }
    }

    /// Number of bones along the chain starting at `id` (the bone included).
    pub fn chain_depth(&self, id: BoneId) -> usize {
        self.chain(id).count()
    }

    pub fn is_descendant_of(&self, id: BoneId, ancestor: BoneId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    pub fn root_of(&self, id: BoneId) -> BoneId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Bones whose chain link does not point at one of their own children.
    ///
    /// Branch detection in [`chain_statistics`](crate::chain_statistics)
    /// assumes there are none; this reports them instead of repairing them.
    pub fn chain_link_violations(&self) -> Vec<ChainLinkViolation> {
        self.bones()
            .filter_map(|(id, bone)| {
                let chained = bone.chained_child?;
                let actual_parent = self.parent(chained);
                (actual_parent != Some(id)).then_some(ChainLinkViolation {
                    bone: id,
                    chained_child: chained,
                    actual_parent,
                })
            })
            .collect()
    }

    /// Strict form of [`Skeleton::chain_link_violations`].
    pub fn validate_chain_links(&self) -> Result<(), RigError> {
        match self.chain_link_violations().first() {
            Some(v) => Err(RigError::ChainLinkNotChild {
                bone: v.bone,
                chained_child: v.chained_child,
            }),
            None => Ok(()),
        }
    }

    /// Records that rebuild this skeleton through [`Skeleton::new`].
    pub fn descs(&self) -> Vec<BoneDesc> {
        self.bones
            .iter()
            .map(|b| BoneDesc {
                name: b.name.clone(),
                parent: b.parent,
                chained_child: b.chained_child,
                position: b.position,
                end_position: b.end_position,
                visible: b.visible,
            })
            .collect()
    }
}

/// Iterator following one kind of link through a skeleton.
pub struct Links<'a> {
    skeleton: &'a Skeleton,
    next: Option<BoneId>,
    link: fn(&Bone) -> Option<BoneId>,
}

impl Iterator for Links<'_> {
    type Item = BoneId;

    fn next(&mut self) -> Option<BoneId> {
        let current = self.next?;
        self.next = self.skeleton.bone(current).and_then(self.link);
        Some(current)
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// First node found on a cycle of the functional graph `next`, if any.
fn find_cycle(len: usize, next: impl Fn(usize) -> Option<usize>) -> Option<usize> {
    let mut marks = vec![Mark::Unvisited; len];
    let mut path = Vec::new();
    for start in 0..len {
        let mut cursor = Some(start);
        while let Some(i) = cursor {
            match marks[i] {
                Mark::Done => break,
                Mark::OnPath => return Some(i),
                Mark::Unvisited => {
                    marks[i] = Mark::OnPath;
                    path.push(i);
                    cursor = next(i);
                }
            }
        }
        for i in path.drain(..) {
            marks[i] = Mark::Done;
        }
    }
    None
}

/// Incremental construction of a [`Skeleton`].
#[derive(Clone, Debug, Default)]
pub struct SkeletonBuilder {
    bones: Vec<BoneDesc>,
}

impl SkeletonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_bone(&mut self, name: impl Into<String>, position: Vec2, end_position: Vec2) -> BoneId {
        let id = BoneId::from_index(self.bones.len());
        self.bones.push(BoneDesc {
            position,
            end_position,
            ..BoneDesc::new(name)
        });
        id
    }

    pub fn add_desc(&mut self, desc: BoneDesc) -> BoneId {
        let id = BoneId::from_index(self.bones.len());
        self.bones.push(desc);
        id
    }

    /// Make `child` a branch under `parent`.
    pub fn parent(&mut self, child: BoneId, parent: BoneId) -> &mut Self {
        if let Some(desc) = self.bones.get_mut(child.index()) {
            desc.parent = Some(parent);
        }
        self
    }

    /// Make `child` the chain continuation of `parent` (also parents it).
    pub fn chain(&mut self, parent: BoneId, child: BoneId) -> &mut Self {
        self.parent(child, parent);
        if let Some(desc) = self.bones.get_mut(parent.index()) {
            desc.chained_child = Some(child);
        }
        self
    }

    pub fn visible(&mut self, bone: BoneId, visible: bool) -> &mut Self {
        if let Some(desc) = self.bones.get_mut(bone.index()) {
            desc.visible = visible;
        }
        self
    }

    pub fn build(&self) -> Result<Skeleton, RigError> {
        Skeleton::new(self.bones.clone())
    }
}
