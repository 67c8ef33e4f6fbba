use js_sys::Array;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use vizij_rig_core::{
    associate_all_bones, associate_possible_bones, chain_statistics, parse_skeleton_json,
    skeleton_to_json, ApplyReport, Association, AssociationConfig, Rect, Skeleton, SpritePart,
};

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn config_from_js(config: JsValue) -> Result<AssociationConfig, JsError> {
    if jsvalue_is_undefined_or_null(&config) {
        Ok(AssociationConfig::default())
    } else {
        swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))
    }
}

/// Associate every part with the skeleton, in part order.
pub fn associate_parts(
    skeleton: &Skeleton,
    parts: &[SpritePart],
    config: &AssociationConfig,
) -> Vec<Association> {
    parts
        .iter()
        .map(|p| associate_possible_bones(skeleton, &p.rect(), config))
        .collect()
}

/// A validated skeleton held on the JS side.
#[wasm_bindgen]
pub struct VizijRig {
    skeleton: Skeleton,
}

#[wasm_bindgen]
impl VizijRig {
    /// Build from skeleton JSON:
    ///   new VizijRig('{"bones":[{"name":"hip"},{"name":"spine","parent":"hip"}]}')
    #[wasm_bindgen(constructor)]
    pub fn new(skeleton_json: &str) -> Result<VizijRig, JsError> {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        let skeleton = parse_skeleton_json(skeleton_json).map_err(|e| JsError::new(&e.to_string()))?;
        Ok(VizijRig { skeleton })
    }

    #[wasm_bindgen(getter)]
    pub fn bone_count(&self) -> u32 {
        self.skeleton.len() as u32
    }

    /// Bone names indexed by bone id.
    pub fn bone_names(&self) -> Array {
        self.skeleton
            .bones()
            .map(|(_, b)| JsValue::from_str(&b.name))
            .collect()
    }

    /// `{ chain_bone_count, max_chain_depth, bone_count, root_count }`
    pub fn chain_statistics(&self) -> Result<JsValue, JsError> {
        swb::to_value(&chain_statistics(&self.skeleton))
            .map_err(|e| JsError::new(&format!("statistics error: {e}")))
    }

    pub fn chain_link_violations(&self) -> Result<JsValue, JsError> {
        swb::to_value(&self.skeleton.chain_link_violations())
            .map_err(|e| JsError::new(&format!("violations error: {e}")))
    }

    /// Associate a `{ x, y, width, height }` rect. `config` may be undefined.
    pub fn associate(&self, rect: JsValue, config: JsValue) -> Result<JsValue, JsError> {
        let rect: Rect =
            swb::from_value(rect).map_err(|e| JsError::new(&format!("rect error: {e}")))?;
        let cfg = config_from_js(config)?;
        let out = associate_possible_bones(&self.skeleton, &rect, &cfg);
        swb::to_value(&out).map_err(|e| JsError::new(&format!("association error: {e}")))
    }

    pub fn associate_all(&self, config: JsValue) -> Result<Vec<u32>, JsError> {
        let cfg = config_from_js(config)?;
        Ok(associate_all_bones(&self.skeleton, &cfg)
            .into_iter()
            .map(|id| id.0)
            .collect())
    }

    /// Associate each sprite part, then summarize the result as an apply report.
    pub fn apply_report(
        &self,
        character_mode: bool,
        parts: JsValue,
        config: JsValue,
    ) -> Result<JsValue, JsError> {
        let parts: Vec<SpritePart> =
            swb::from_value(parts).map_err(|e| JsError::new(&format!("parts error: {e}")))?;
        let cfg = config_from_js(config)?;
        let associations = associate_parts(&self.skeleton, &parts, &cfg);
        let report = ApplyReport::from_associations(character_mode, &associations, &self.skeleton);
        swb::to_value(&report).map_err(|e| JsError::new(&format!("report error: {e}")))
    }

    pub fn to_json(&self) -> Result<String, JsError> {
        skeleton_to_json(&self.skeleton).map_err(|e| JsError::new(&e.to_string()))
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use vizij_rig_core::{BoneId, Vec2};

    #[test]
    fn parts_are_associated_in_order() {
        let sk = parse_skeleton_json(
            r#"{ "bones": [
                { "name": "a", "position": [0, 0], "end_position": [1, 0] },
                { "name": "b", "position": [5, 5], "end_position": [6, 5] }
            ] }"#,
        )
        .unwrap();
        let parts = vec![
            SpritePart {
                name: "near_b".into(),
                position: Vec2::new(4.5, 4.5),
                size: Vec2::new(1.0, 1.0),
            },
            SpritePart {
                name: "on_a".into(),
                position: Vec2::new(-0.5, -0.5),
                size: Vec2::new(1.0, 1.0),
            },
        ];
        let got = associate_parts(&sk, &parts, &AssociationConfig::default());
        assert_eq!(got[0].bones(), vec![BoneId(1)]);
        assert_eq!(got[1].bones(), vec![BoneId(0)]);
    }
}
