//! JSON documents for skeletons.
//!
//! Documents may reference bones by index or by name; references are resolved
//! before the arena is validated.

use hashbrown::HashMap;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::RigError;
use crate::geometry::Vec2;
use crate::ids::BoneId;
use crate::skeleton::{BoneDesc, Skeleton};

/// Reference to another bone in a document, by index or by name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoneRef {
    Index(u32),
    Name(String),
}

/// A point written either as `{ "x": .., "y": .. }` or as `[x, y]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocPoint {
    Object { x: f32, y: f32 },
    Array([f32; 2]),
}

impl Default for DocPoint {
    fn default() -> Self {
        DocPoint::Object { x: 0.0, y: 0.0 }
    }
}

impl From<DocPoint> for Vec2 {
    fn from(p: DocPoint) -> Vec2 {
        match p {
            DocPoint::Object { x, y } => Vec2::new(x, y),
            DocPoint::Array(v) => Vec2::from(v),
        }
    }
}

fn default_visible() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocBone {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<BoneRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chained_child: Option<BoneRef>,
    #[serde(default)]
    pub position: DocPoint,
    #[serde(default)]
    pub end_position: DocPoint,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

/// On-disk skeleton layout.
///
/// ```json
/// { "bones": [
///     { "name": "hip", "chained_child": "spine", "position": [0, 0], "end_position": [0, 1] },
///     { "name": "spine", "parent": 0, "position": { "x": 0, "y": 1 }, "end_position": [0, 2] }
/// ] }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SkeletonDoc {
    pub bones: Vec<DocBone>,
}

impl SkeletonDoc {
    pub fn from_skeleton(skeleton: &Skeleton) -> Self {
        let bones = skeleton
            .bones()
            .map(|(_, b)| DocBone {
                name: b.name.clone(),
                parent: b.parent.map(|p| BoneRef::Index(p.0)),
                chained_child: b.chained_child.map(|c| BoneRef::Index(c.0)),
                position: DocPoint::Object {
                    x: b.position.x,
                    y: b.position.y,
                },
                end_position: DocPoint::Object {
                    x: b.end_position.x,
                    y: b.end_position.y,
                },
                visible: b.visible,
            })
            .collect();
        SkeletonDoc { bones }
    }

    /// Resolve name references and build the skeleton.
    ///
    /// Names that match no bone are treated like any other dangling link.
    /// With duplicate names, the first bone carrying the name wins.
    pub fn into_skeleton(self) -> Result<Skeleton, RigError> {
        let mut by_name: HashMap<String, BoneId> = HashMap::with_capacity(self.bones.len());
        for (i, b) in self.bones.iter().enumerate() {
            by_name
                .entry(b.name.clone())
                .or_insert(BoneId::from_index(i));
        }

        let resolve = |owner: &str, r: Option<BoneRef>| -> Option<BoneId> {
            match r? {
                BoneRef::Index(i) => Some(BoneId(i)),
                BoneRef::Name(name) => {
                    let found = by_name.get(&name).copied();
                    if found.is_none() {
                        warn!("bone '{owner}' references unknown bone '{name}'");
                    }
                    found
                }
            }
        };

        let descs = self
            .bones
            .into_iter()
            .map(|b| BoneDesc {
                parent: resolve(&b.name, b.parent),
                chained_child: resolve(&b.name, b.chained_child),
                position: b.position.into(),
                end_position: b.end_position.into(),
                visible: b.visible,
                name: b.name,
            })
            .collect();
        Skeleton::new(descs)
    }
}

/// Parse a [`SkeletonDoc`] JSON string into a validated [`Skeleton`].
pub fn parse_skeleton_json(s: &str) -> Result<Skeleton, RigError> {
    let doc: SkeletonDoc =
        serde_json::from_str(s).map_err(|e| RigError::Parse(e.to_string()))?;
    doc.into_skeleton()
}

pub fn skeleton_to_json(skeleton: &Skeleton) -> Result<String, RigError> {
    serde_json::to_string(&SkeletonDoc::from_skeleton(skeleton))
        .map_err(|e| RigError::Serialize(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_references_and_point_shapes() {
        let sk = parse_skeleton_json(
            r#"{ "bones": [
                { "name": "hip", "chained_child": "spine", "position": [0, 0], "end_position": [0, 1] },
                { "name": "spine", "parent": 0, "position": { "x": 0, "y": 1 }, "end_position": [0, 2] },
                { "name": "tail", "parent": "hip", "visible": false }
            ] }"#,
        )
        .unwrap();
        assert_eq!(sk.len(), 3);
        assert_eq!(sk.chained_child(BoneId(0)), Some(BoneId(1)));
        assert_eq!(sk.parent(BoneId(2)), Some(BoneId(0)));
        let spine = sk.bone(BoneId(1)).unwrap();
        assert_eq!(spine.position, Vec2::new(0.0, 1.0));
        assert_eq!(spine.end_position, Vec2::new(0.0, 2.0));
        assert!(!sk.bone(BoneId(2)).unwrap().visible);
    }

    #[test]
    fn document_built_in_code_resolves_names() {
        let doc = SkeletonDoc {
            bones: vec![
                DocBone {
                    name: "hip".into(),
                    parent: None,
                    chained_child: Some(BoneRef::Name("spine".into())),
                    position: DocPoint::Array([0.0, 0.0]),
                    end_position: DocPoint::Object { x: 0.0, y: 1.0 },
                    visible: true,
                },
                DocBone {
                    name: "spine".into(),
                    parent: Some(BoneRef::Index(0)),
                    chained_child: None,
                    position: DocPoint::Array([0.0, 1.0]),
                    end_position: DocPoint::Array([0.0, 2.0]),
                    visible: true,
                },
            ],
        };
        let sk = doc.into_skeleton().unwrap();
        assert_eq!(sk.chained_child(BoneId(0)), Some(BoneId(1)));
        assert_eq!(sk.bone(BoneId(0)).unwrap().end_position, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn unknown_name_is_a_root() {
        let sk = parse_skeleton_json(r#"{ "bones": [ { "name": "a", "parent": "ghost" } ] }"#)
            .unwrap();
        assert_eq!(sk.roots(), &[BoneId(0)]);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = parse_skeleton_json(r#"{ "bones": 3 }"#).unwrap_err();
        assert!(matches!(err, RigError::Parse(_)));
    }

    #[test]
    fn written_json_reads_back() {
        let sk = parse_skeleton_json(
            r#"{ "bones": [ { "name": "a", "chained_child": 1 }, { "name": "b", "parent": 0 } ] }"#,
        )
        .unwrap();
        let text = skeleton_to_json(&sk).unwrap();
        assert_eq!(parse_skeleton_json(&text).unwrap(), sk);
    }
}
