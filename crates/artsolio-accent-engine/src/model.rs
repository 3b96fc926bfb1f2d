//! Canonical accent configuration.
//!
//! [`AccentConfig::normalize`] is the one place that knows about the three
//! attribute schemas. Everything downstream (style synthesis, anchoring,
//! markup) reads only this model. [`AccentConfig::to_attributes`] writes the
//! model back in the newest schema so a block migrates once, on mount.

use artsolio_accent_config::{PresetConfig, PresetLabel, PresetTable};
use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;

use crate::anchor::AnchorLayer;
use crate::attributes::BlockAttributes;
use crate::resolve::{pick_offset, resolve_image};
use crate::store::Attributes;

/// Corner of the anchor container the accent sits in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    TopLeft,
    TopRight,
    #[default]
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// Parse a stored corner; anything unrecognized is bottom-right
    pub fn parse_lossy(value: &str) -> Self {
        match value.trim() {
            "top-left" => Corner::TopLeft,
            "top-right" => Corner::TopRight,
            "bottom-left" => Corner::BottomLeft,
            _ => Corner::BottomRight,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Corner::TopLeft => "top-left",
            Corner::TopRight => "top-right",
            Corner::BottomLeft => "bottom-left",
            Corner::BottomRight => "bottom-right",
        }
    }

    /// Inspector label
    pub fn label(self) -> &'static str {
        match self {
            Corner::TopLeft => "Position A",
            Corner::TopRight => "Position B",
            Corner::BottomLeft => "Position C",
            Corner::BottomRight => "Position D",
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of preset or custom governs a value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueMode {
    #[default]
    Preset,
    Custom,
}

impl ValueMode {
    pub fn parse_lossy(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("custom") {
            ValueMode::Custom
        } else {
            ValueMode::Preset
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueMode::Preset => "preset",
            ValueMode::Custom => "custom",
        }
    }
}

/// Canonical image; `url` and `alt` are always present, possibly empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageDescriptor {
    pub url: String,
    pub alt: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub srcset: Option<String>,
    pub sizes: Option<String>,
}

impl ImageDescriptor {
    pub fn is_empty(&self) -> bool {
        self.url.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SizeSetting {
    pub mode: ValueMode,
    pub preset: Option<PresetLabel>,
    pub custom: String,
    /// Snapshot of the preset value taken when the preset was selected
    pub resolved: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OffsetSetting {
    /// One value for both axes
    Uniform {
        mode: ValueMode,
        preset: Option<PresetLabel>,
        custom: String,
        resolved: String,
    },
    /// Independent axes; custom wins over the resolved preset per axis
    Split {
        x_custom: String,
        y_custom: String,
        x_resolved: String,
        y_resolved: String,
    },
}

impl Default for OffsetSetting {
    fn default() -> Self {
        OffsetSetting::Uniform {
            mode: ValueMode::Preset,
            preset: None,
            custom: String::new(),
            resolved: String::new(),
        }
    }
}

impl OffsetSetting {
    pub fn is_split(&self) -> bool {
        matches!(self, OffsetSetting::Split { .. })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParentAnchor {
    pub enabled: bool,
    /// `Some` once the block uses stacking layers
    pub layer: Option<AnchorLayer>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccentConfig {
    pub corner: Corner,
    pub hide_on_mobile: bool,
    pub image: ImageDescriptor,
    pub size: SizeSetting,
    pub offset: OffsetSetting,
    pub anchor: ParentAnchor,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn owned(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

/// Keep a stored snapshot; fill it from the table only when it is missing
fn snapshot_preset(
    mode: ValueMode,
    preset: Option<PresetLabel>,
    resolved: &Option<String>,
    table: &PresetTable,
) -> String {
    match (non_empty(resolved), mode, preset) {
        (Some(resolved), _, _) => resolved.trim().to_string(),
        (None, ValueMode::Preset, Some(label)) => table.get(label).to_string(),
        _ => String::new(),
    }
}

impl AccentConfig {
    /// Fold any of the three attribute schemas into the canonical model.
    ///
    /// Newer keys win over older ones when both are present, so a block that
    /// was migrated and still carries its legacy keys reads the same.
    pub fn normalize(attrs: &BlockAttributes, presets: &PresetConfig) -> Self {
        Self {
            corner: attrs
                .corner
                .as_deref()
                .map(Corner::parse_lossy)
                .unwrap_or_default(),
            hide_on_mobile: attrs.hide_on_mobile.unwrap_or(false),
            image: resolve_image(attrs),
            size: normalize_size(attrs, &presets.size),
            offset: normalize_offset(attrs, &presets.offset),
            anchor: normalize_anchor(attrs),
        }
    }

    pub fn from_attributes(attributes: &Attributes, presets: &PresetConfig) -> Self {
        Self::normalize(&BlockAttributes::from_map(attributes), presets)
    }

    /// Attributes in the newest schema, ready for a merge write
    pub fn to_attributes(&self) -> Attributes {
        let mut out = Attributes::new();
        out.insert("corner".into(), json!(self.corner.as_str()));
        out.insert("hideOnMobile".into(), json!(self.hide_on_mobile));

        if !self.image.is_empty() {
            out.insert("image".into(), image_to_value(&self.image));
            out.insert("url".into(), json!(self.image.url));
        }

        out.insert("sizeMode".into(), json!(self.size.mode.as_str()));
        if let Some(preset) = self.size.preset {
            out.insert("sizePreset".into(), json!(preset.as_str()));
        }
        out.insert("sizeCustom".into(), json!(self.size.custom));
        out.insert("sizeResolved".into(), json!(self.size.resolved));

        match &self.offset {
            OffsetSetting::Uniform {
                mode,
                preset,
                custom,
                resolved,
            } => {
                out.insert("offsetSplit".into(), json!(false));
                out.insert("offsetMode".into(), json!(mode.as_str()));
                if let Some(preset) = preset {
                    out.insert("offsetPreset".into(), json!(preset.as_str()));
                }
                out.insert("offsetCustom".into(), json!(custom));
                out.insert("offsetResolved".into(), json!(resolved));
            }
            OffsetSetting::Split {
                x_custom,
                y_custom,
                x_resolved,
                y_resolved,
            } => {
                out.insert("offsetSplit".into(), json!(true));
                out.insert("offsetXCustom".into(), json!(x_custom));
                out.insert("offsetYCustom".into(), json!(y_custom));
                out.insert("offsetXResolved".into(), json!(x_resolved));
                out.insert("offsetYResolved".into(), json!(y_resolved));
            }
        }

        match self.anchor.layer {
            Some(layer) => {
                out.insert("parentAnchoring".into(), json!(self.anchor.enabled));
                out.insert("anchorLayer".into(), json!(layer.value()));
            }
            None => {
                out.insert("markParent".into(), json!(self.anchor.enabled));
            }
        }

        out
    }
}

pub(crate) fn image_to_value(image: &ImageDescriptor) -> Value {
    let mut object = serde_json::Map::new();
    object.insert("url".into(), json!(image.url));
    object.insert("alt".into(), json!(image.alt));
    if let Some(width) = image.width {
        object.insert("width".into(), json!(width));
    }
    if let Some(height) = image.height {
        object.insert("height".into(), json!(height));
    }
    if let Some(srcset) = &image.srcset {
        object.insert("srcset".into(), json!(srcset));
    }
    if let Some(sizes) = &image.sizes {
        object.insert("sizes".into(), json!(sizes));
    }
    Value::Object(object)
}

fn normalize_size(attrs: &BlockAttributes, table: &PresetTable) -> SizeSetting {
    let preset_schema = attrs.size_mode.is_some()
        || attrs.size_preset.is_some()
        || attrs.size_custom.is_some()
        || attrs.size_resolved.is_some();

    if preset_schema {
        let mode = match attrs.size_mode.as_deref() {
            Some(mode) => ValueMode::parse_lossy(mode),
            None if non_empty(&attrs.size_custom).is_some() => ValueMode::Custom,
            None => ValueMode::Preset,
        };
        let preset = attrs.size_preset.as_deref().and_then(PresetLabel::parse);
        return SizeSetting {
            mode,
            preset,
            custom: owned(&attrs.size_custom),
            resolved: snapshot_preset(mode, preset, &attrs.size_resolved, table),
        };
    }

    match &attrs.size_value {
        Some(value) => SizeSetting {
            mode: ValueMode::Custom,
            preset: None,
            custom: value.trim().to_string(),
            resolved: String::new(),
        },
        None => SizeSetting::default(),
    }
}

fn normalize_offset(attrs: &BlockAttributes, table: &PresetTable) -> OffsetSetting {
    if attrs.offset_split == Some(true) {
        return OffsetSetting::Split {
            x_custom: owned(&attrs.offset_x_custom),
            y_custom: owned(&attrs.offset_y_custom),
            x_resolved: owned(&attrs.offset_x_resolved),
            y_resolved: owned(&attrs.offset_y_resolved),
        };
    }

    let preset_schema = attrs.offset_split.is_some()
        || attrs.offset_mode.is_some()
        || attrs.offset_preset.is_some()
        || attrs.offset_custom.is_some()
        || attrs.offset_resolved.is_some();

    if preset_schema {
        let mode = match attrs.offset_mode.as_deref() {
            Some(mode) => ValueMode::parse_lossy(mode),
            None if non_empty(&attrs.offset_custom).is_some() => ValueMode::Custom,
            None => ValueMode::Preset,
        };
        let preset = attrs.offset_preset.as_deref().and_then(PresetLabel::parse);
        return OffsetSetting::Uniform {
            mode,
            preset,
            custom: owned(&attrs.offset_custom),
            resolved: snapshot_preset(mode, preset, &attrs.offset_resolved, table),
        };
    }

    let legacy_schema =
        attrs.offset_uniform.is_some() || attrs.offset_x.is_some() || attrs.offset_y.is_some();
    if !legacy_schema {
        return OffsetSetting::default();
    }

    let uniform = owned(&attrs.offset_uniform);
    let x = owned(&attrs.offset_x);
    let y = owned(&attrs.offset_y);
    if x.is_empty() && y.is_empty() {
        OffsetSetting::Uniform {
            mode: ValueMode::Custom,
            preset: None,
            custom: pick_offset("", &uniform),
            resolved: String::new(),
        }
    } else {
        OffsetSetting::Split {
            x_custom: pick_offset(&x, &uniform),
            y_custom: pick_offset(&y, &uniform),
            x_resolved: String::new(),
            y_resolved: String::new(),
        }
    }
}

fn normalize_anchor(attrs: &BlockAttributes) -> ParentAnchor {
    let layered = attrs.parent_anchoring.is_some() || attrs.anchor_layer.is_some();
    ParentAnchor {
        enabled: attrs.parent_anchoring.or(attrs.mark_parent).unwrap_or(false),
        layer: layered.then(|| AnchorLayer::new(attrs.anchor_layer.unwrap_or(0))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::attributes;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn normalize(value: serde_json::Value) -> AccentConfig {
        AccentConfig::from_attributes(&attributes(value), &PresetConfig::default())
    }

    #[rstest]
    #[case("top-left", Corner::TopLeft)]
    #[case("top-right", Corner::TopRight)]
    #[case("bottom-left", Corner::BottomLeft)]
    #[case("bottom-right", Corner::BottomRight)]
    #[case("middle", Corner::BottomRight)]
    #[case("", Corner::BottomRight)]
    fn test_corner_parse_lossy(#[case] input: &str, #[case] expected: Corner) {
        assert_eq!(Corner::parse_lossy(input), expected);
    }

    #[test]
    fn test_defaults_for_empty_attributes() {
        let config = normalize(json!({}));

        assert_eq!(config.corner, Corner::BottomLeft);
        assert!(!config.hide_on_mobile);
        assert_eq!(config.image, ImageDescriptor::default());
        assert_eq!(config.size, SizeSetting::default());
        assert_eq!(config.offset, OffsetSetting::default());
        assert_eq!(config.anchor, ParentAnchor::default());
    }

    #[test]
    fn test_first_generation_size_is_custom() {
        let config = normalize(json!({ "sizeValue": " clamp(8rem, 10vw, 16rem) " }));

        assert_eq!(config.size.mode, ValueMode::Custom);
        assert_eq!(config.size.custom, "clamp(8rem, 10vw, 16rem)");
    }

    #[test]
    fn test_first_generation_uniform_offset() {
        let config = normalize(json!({ "offsetUniform": "12px", "offsetX": "", "offsetY": "" }));

        assert_eq!(
            config.offset,
            OffsetSetting::Uniform {
                mode: ValueMode::Custom,
                preset: None,
                custom: "12px".into(),
                resolved: String::new(),
            }
        );
    }

    #[test]
    fn test_first_generation_axis_override_becomes_split() {
        let config = normalize(json!({ "offsetUniform": "10px", "offsetX": "5px" }));

        assert_eq!(
            config.offset,
            OffsetSetting::Split {
                x_custom: "5px".into(),
                y_custom: "10px".into(),
                x_resolved: String::new(),
                y_resolved: String::new(),
            }
        );
    }

    #[test]
    fn test_first_generation_without_values_is_zero() {
        let config = normalize(json!({ "offsetUniform": "" }));
        assert!(matches!(
            config.offset,
            OffsetSetting::Uniform { ref custom, .. } if custom == "0"
        ));
    }

    #[test]
    fn test_preset_snapshot_is_kept() {
        let config = normalize(json!({
            "sizeMode": "preset",
            "sizePreset": "M",
            "sizeResolved": "9rem"
        }));

        assert_eq!(config.size.resolved, "9rem");
    }

    #[test]
    fn test_missing_snapshot_is_filled_from_table() {
        let config = normalize(json!({ "sizeMode": "preset", "sizePreset": "M" }));
        assert_eq!(config.size.resolved, "clamp(80px, 12cqi, 160px)");

        let config = normalize(json!({ "offsetMode": "preset", "offsetPreset": "XL" }));
        assert!(matches!(
            config.offset,
            OffsetSetting::Uniform { ref resolved, .. } if resolved == "1.5rem"
        ));
    }

    #[test]
    fn test_newer_keys_win_over_legacy_keys() {
        let config = normalize(json!({
            "sizeValue": "1px",
            "sizeMode": "custom",
            "sizeCustom": "2px",
            "offsetUniform": "3px",
            "offsetSplit": false,
            "offsetMode": "custom",
            "offsetCustom": "4px",
            "markParent": false,
            "parentAnchoring": true
        }));

        assert_eq!(config.size.custom, "2px");
        assert!(matches!(
            config.offset,
            OffsetSetting::Uniform { ref custom, .. } if custom == "4px"
        ));
        assert!(config.anchor.enabled);
    }

    #[test]
    fn test_split_offsets() {
        let config = normalize(json!({
            "offsetSplit": true,
            "offsetXCustom": "1rem",
            "offsetYResolved": "0.5rem"
        }));

        assert_eq!(
            config.offset,
            OffsetSetting::Split {
                x_custom: "1rem".into(),
                y_custom: String::new(),
                x_resolved: String::new(),
                y_resolved: "0.5rem".into(),
            }
        );
    }

    #[test]
    fn test_anchor_generations() {
        assert_eq!(
            normalize(json!({ "markParent": true })).anchor,
            ParentAnchor {
                enabled: true,
                layer: None
            }
        );
        assert_eq!(
            normalize(json!({ "parentAnchoring": true })).anchor,
            ParentAnchor {
                enabled: true,
                layer: Some(AnchorLayer::new(0))
            }
        );
        assert_eq!(
            normalize(json!({ "parentAnchoring": false, "anchorLayer": 12 })).anchor,
            ParentAnchor {
                enabled: false,
                layer: Some(AnchorLayer::new(4))
            }
        );
    }

    #[test]
    fn test_migration_is_stable() {
        let legacy = normalize(json!({
            "corner": "top-right",
            "hideOnMobile": true,
            "url": "a.png",
            "alt": "Accent",
            "sizeValue": "10rem",
            "offsetUniform": "12px",
            "offsetY": "4px",
            "markParent": true
        }));

        let mut migrated_attrs = attributes(json!({
            "corner": "top-right",
            "hideOnMobile": true,
            "url": "a.png",
            "alt": "Accent",
            "sizeValue": "10rem",
            "offsetUniform": "12px",
            "offsetY": "4px",
            "markParent": true
        }));
        migrated_attrs.extend(legacy.to_attributes());
        let migrated = AccentConfig::from_attributes(&migrated_attrs, &PresetConfig::default());

        assert_eq!(migrated, legacy);
    }

    #[test]
    fn test_to_attributes_uses_newest_schema() {
        let config = normalize(json!({ "parentAnchoring": true, "anchorLayer": 2 }));
        let attrs = config.to_attributes();

        assert_eq!(attrs.get("parentAnchoring"), Some(&json!(true)));
        assert_eq!(attrs.get("anchorLayer"), Some(&json!(2)));
        assert_eq!(attrs.get("markParent"), None);
        assert_eq!(attrs.get("offsetSplit"), Some(&json!(false)));
        assert_eq!(attrs.get("sizeMode"), Some(&json!("preset")));
    }
}
