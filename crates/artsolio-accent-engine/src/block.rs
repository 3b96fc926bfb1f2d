//! Accent block lifecycle.
//!
//! [`AccentBlock`] binds one placed accent to the host store and the preset
//! tables for the session. It migrates attributes on mount, keeps the parent
//! anchor in sync when anchoring attributes change, and offers the setters
//! the inspector drives.

use artsolio_accent_config::{PresetConfig, PresetLabel};
use serde_json::{Value, json};

use crate::anchor::{AnchorLayer, ClassList, set_parent_anchor};
use crate::model::{AccentConfig, Corner, ImageDescriptor, image_to_value};
use crate::render::{EditorView, render_editor, render_static};
use crate::resolve::resolve_offsets;
use crate::store::{AttributeStore, Attributes, EditorStore, EntityId};
use crate::style::{RenderProps, synthesize};

pub const ACCENT_BLOCK_NAME: &str = "artsolio/accent";

/// Attribute keys whose change may require touching the parent
pub const ANCHOR_KEYS: [&str; 3] = ["markParent", "parentAnchoring", "anchorLayer"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

fn partial<const N: usize>(pairs: [(&str, Value); N]) -> Attributes {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

pub struct AccentBlock<'a, S: AttributeStore> {
    store: &'a mut S,
    id: EntityId,
    presets: &'a PresetConfig,
}

impl<'a, S: AttributeStore> AccentBlock<'a, S> {
    pub fn new(store: &'a mut S, id: EntityId, presets: &'a PresetConfig) -> Self {
        Self { store, id, presets }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Canonical config for the current attributes
    pub fn config(&self) -> AccentConfig {
        self.store
            .attributes(self.id)
            .map(|attrs| AccentConfig::from_attributes(attrs, self.presets))
            .unwrap_or_default()
    }

    /// Migrate to the newest schema and anchor the parent when enabled.
    ///
    /// Only keys whose stored value differs are written back.
    pub fn on_mount(&mut self) -> AccentConfig {
        let Some(attrs) = self.store.attributes(self.id) else {
            log::debug!("Accent {} is not in the store, skipping mount", self.id);
            return AccentConfig::default();
        };

        let config = AccentConfig::from_attributes(attrs, self.presets);
        let stale: Attributes = config
            .to_attributes()
            .into_iter()
            .filter(|(key, value)| attrs.get(key) != Some(value))
            .collect();
        if !stale.is_empty() {
            log::debug!("Migrating {} attribute(s) of accent {}", stale.len(), self.id);
            self.write(stale);
        }
        if config.anchor.enabled {
            self.sync_parent(true, config.anchor.layer);
        }
        config
    }

    /// React to an attribute write. Returns whether the parent was updated.
    ///
    /// A layer change alone only matters while anchoring is on.
    pub fn on_attributes_changed(&mut self, changed: &[&str]) -> bool {
        if !changed.iter().any(|key| ANCHOR_KEYS.contains(key)) {
            return false;
        }
        let toggled = changed
            .iter()
            .any(|key| *key == "markParent" || *key == "parentAnchoring");

        let anchor = self.config().anchor;
        if toggled || anchor.enabled {
            self.sync_parent(anchor.enabled, anchor.layer)
        } else {
            false
        }
    }

    fn sync_parent(&mut self, enable: bool, layer: Option<AnchorLayer>) -> bool {
        let Some(parent_id) = self.store.parent_id(self.id) else {
            log::debug!("Accent {} has no parent to anchor", self.id);
            return false;
        };
        let Some(parent) = self.store.entity(parent_id) else {
            log::debug!("Parent {parent_id} of accent {} is gone", self.id);
            return false;
        };

        let current = ClassList::parse(parent.class_name());
        let next = set_parent_anchor(&current, enable, layer);
        if next == current {
            return false;
        }

        log::debug!("Parent {parent_id} className: '{current}' -> '{next}'");
        self.store
            .set_attributes(parent_id, partial([("className", json!(next.to_string()))]));
        true
    }

    fn write(&mut self, attrs: Attributes) {
        self.store.set_attributes(self.id, attrs);
    }

    /// Toggle anchoring, keeping whichever anchoring schema the block uses
    pub fn set_parent_anchoring(&mut self, enabled: bool) -> bool {
        let key = match self.config().anchor.layer {
            Some(_) => "parentAnchoring",
            None => "markParent",
        };
        self.write(partial([(key, json!(enabled))]));
        self.on_attributes_changed(&[key])
    }

    /// Pick a stacking layer; moves a legacy block onto the layered schema
    pub fn set_anchor_layer(&mut self, value: i64) -> bool {
        let enabled = self.config().anchor.enabled;
        let layer = AnchorLayer::new(value);
        self.write(partial([
            ("parentAnchoring", json!(enabled)),
            ("anchorLayer", json!(layer.value())),
        ]));
        self.on_attributes_changed(&["anchorLayer"])
    }

    pub fn set_corner(&mut self, corner: Corner) {
        self.write(partial([("corner", json!(corner.as_str()))]));
    }

    pub fn set_hide_on_mobile(&mut self, hide: bool) {
        self.write(partial([("hideOnMobile", json!(hide))]));
    }

    /// Store a picked media item as the structured image plus its url
    pub fn set_image(&mut self, image: &ImageDescriptor) {
        self.write(partial([
            ("image", image_to_value(image)),
            ("url", json!(image.url)),
        ]));
    }

    /// Select a size preset, snapshotting its current table value
    pub fn select_size_preset(&mut self, label: PresetLabel) {
        let resolved = self.presets.size.get(label);
        self.write(partial([
            ("sizeMode", json!("preset")),
            ("sizePreset", json!(label.as_str())),
            ("sizeResolved", json!(resolved)),
        ]));
    }

    pub fn set_size_custom(&mut self, value: &str) {
        self.write(partial([
            ("sizeMode", json!("custom")),
            ("sizeCustom", json!(value)),
        ]));
    }

    /// Select a uniform offset preset, snapshotting its current table value
    pub fn select_offset_preset(&mut self, label: PresetLabel) {
        let resolved = self.presets.offset.get(label);
        self.write(partial([
            ("offsetSplit", json!(false)),
            ("offsetMode", json!("preset")),
            ("offsetPreset", json!(label.as_str())),
            ("offsetResolved", json!(resolved)),
        ]));
    }

    pub fn set_offset_custom(&mut self, value: &str) {
        self.write(partial([
            ("offsetSplit", json!(false)),
            ("offsetMode", json!("custom")),
            ("offsetCustom", json!(value)),
        ]));
    }

    /// Switch between uniform and per-axis offsets.
    ///
    /// Splitting seeds both axes with the offset currently in effect so the
    /// accent does not move.
    pub fn set_offset_split(&mut self, split: bool) {
        let config = self.config();
        if split == config.offset.is_split() {
            return;
        }

        if split {
            let current = resolve_offsets(&config.offset);
            self.write(partial([
                ("offsetSplit", json!(true)),
                ("offsetXResolved", json!(current.x)),
                ("offsetYResolved", json!(current.y)),
            ]));
        } else {
            self.write(partial([("offsetSplit", json!(false))]));
        }
    }

    /// Set one axis's custom offset, splitting first so the other axis stays put
    pub fn set_offset_axis_custom(&mut self, axis: Axis, value: &str) {
        self.set_offset_split(true);
        let key = match axis {
            Axis::X => "offsetXCustom",
            Axis::Y => "offsetYCustom",
        };
        self.write(partial([(key, json!(value))]));
    }

    pub fn render_props(&self) -> RenderProps {
        synthesize(&self.config(), self.presets.offset_style)
    }

    pub fn render_editor(&self) -> EditorView {
        render_editor(&self.config(), self.presets.offset_style)
    }

    pub fn render_static(&self) -> String {
        render_static(&self.config(), self.presets.offset_style)
    }
}

/// Mount every accent block in document order; returns their ids
pub fn mount_accent_blocks(store: &mut EditorStore, presets: &PresetConfig) -> Vec<EntityId> {
    let ids = store.find_by_name(ACCENT_BLOCK_NAME);
    for id in &ids {
        AccentBlock::new(store, *id, presets).on_mount();
    }
    log::info!("Mounted {} accent block(s)", ids.len());
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OffsetSetting, ValueMode};
    use crate::resolve::AxisOffsets;
    use crate::store::Entity;
    use crate::tests::{accent_in_group, attributes, class_name_of};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    /// Store that records every attribute write it forwards
    struct RecordingStore {
        inner: EditorStore,
        writes: Vec<(EntityId, Attributes)>,
    }

    impl AttributeStore for RecordingStore {
        fn attributes(&self, id: EntityId) -> Option<&Attributes> {
            self.inner.attributes(id)
        }

        fn set_attributes(&mut self, id: EntityId, partial: Attributes) {
            self.writes.push((id, partial.clone()));
            self.inner.set_attributes(id, partial);
        }

        fn parent_id(&self, id: EntityId) -> Option<EntityId> {
            self.inner.parent_id(id)
        }

        fn entity(&self, id: EntityId) -> Option<&Entity> {
            self.inner.entity(id)
        }
    }

    #[test]
    fn test_mount_migrates_legacy_attributes() {
        let presets = PresetConfig::default();
        let (mut store, _, accent) = accent_in_group(
            "x",
            json!({ "sizeValue": "10rem", "offsetUniform": "8px", "markParent": false }),
        );

        AccentBlock::new(&mut store, accent, &presets).on_mount();

        let attrs = store.attributes(accent).unwrap();
        assert_eq!(attrs.get("sizeMode"), Some(&json!("custom")));
        assert_eq!(attrs.get("sizeCustom"), Some(&json!("10rem")));
        assert_eq!(attrs.get("offsetMode"), Some(&json!("custom")));
        assert_eq!(attrs.get("offsetCustom"), Some(&json!("8px")));
        assert_eq!(attrs.get("corner"), Some(&json!("bottom-left")));
    }

    #[test]
    fn test_mount_writes_only_stale_keys() {
        let presets = PresetConfig::default();
        let (inner, group, accent) =
            accent_in_group("x", json!({ "sizeValue": "10rem", "markParent": true }));
        let mut store = RecordingStore {
            inner,
            writes: Vec::new(),
        };

        AccentBlock::new(&mut store, accent, &presets).on_mount();
        let first_mount = store.writes.len();
        AccentBlock::new(&mut store, accent, &presets).on_mount();

        // Migration plus the parent class list, then nothing on remount
        assert_eq!(first_mount, 2);
        assert_eq!(store.writes.len(), first_mount);
        assert_eq!(store.writes[0].0, accent);
        assert_eq!(store.writes[0].1.get("sizeCustom"), Some(&json!("10rem")));
        assert!(!store.writes[0].1.contains_key("sizeValue"));
        assert_eq!(store.writes[1].0, group);
    }

    #[test]
    fn test_mount_anchors_parent_once() {
        let presets = PresetConfig::default();
        let (mut store, group, accent) =
            accent_in_group("x y", json!({ "parentAnchoring": true, "anchorLayer": 2 }));

        AccentBlock::new(&mut store, accent, &presets).on_mount();
        AccentBlock::new(&mut store, accent, &presets).on_mount();

        assert_eq!(
            class_name_of(&store, group),
            "x y is-accent-anchor artsolio_is-accent-anchor artsolio-layer-2"
        );
    }

    #[test]
    fn test_mount_without_anchoring_leaves_parent_alone() {
        let presets = PresetConfig::default();
        let (mut store, group, accent) =
            accent_in_group("x is-accent-anchor", json!({ "markParent": false }));

        AccentBlock::new(&mut store, accent, &presets).on_mount();

        assert_eq!(class_name_of(&store, group), "x is-accent-anchor");
    }

    #[test]
    fn test_mount_without_parent_is_a_no_op_for_anchoring() {
        let presets = PresetConfig::default();
        let mut store = EditorStore::new();
        let accent = store
            .insert_block(ACCENT_BLOCK_NAME, attributes(json!({ "markParent": true })), None)
            .unwrap();

        let config = AccentBlock::new(&mut store, accent, &presets).on_mount();

        assert!(config.anchor.enabled);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_toggle_round_trip() {
        let presets = PresetConfig::default();
        let (mut store, group, accent) = accent_in_group("x y", json!({}));
        let mut block = AccentBlock::new(&mut store, accent, &presets);

        assert!(block.set_parent_anchoring(true));
        assert!(block.set_parent_anchoring(false));
        assert!(block.set_parent_anchoring(true));
        assert!(!block.set_parent_anchoring(true));

        assert_eq!(
            class_name_of(&store, group),
            "x y is-accent-anchor artsolio_is-accent-anchor"
        );
    }

    #[test]
    fn test_layer_change_only_applies_while_anchored() {
        let presets = PresetConfig::default();
        let (mut store, group, accent) = accent_in_group("x", json!({}));
        let mut block = AccentBlock::new(&mut store, accent, &presets);

        assert!(!block.set_anchor_layer(3));
        assert!(block.set_parent_anchoring(true));
        assert!(block.set_anchor_layer(1));

        assert_eq!(
            class_name_of(&store, group),
            "x is-accent-anchor artsolio_is-accent-anchor artsolio-layer-1"
        );
        let attrs = store.attributes(accent).unwrap();
        assert_eq!(attrs.get("parentAnchoring"), Some(&json!(true)));
        assert_eq!(attrs.get("anchorLayer"), Some(&json!(1)));
    }

    #[test]
    fn test_unrelated_changes_do_not_touch_parent() {
        let presets = PresetConfig::default();
        let (mut store, _, accent) = accent_in_group("x", json!({ "markParent": true }));
        let mut block = AccentBlock::new(&mut store, accent, &presets);

        assert!(!block.on_attributes_changed(&["corner", "sizeCustom"]));
    }

    #[test]
    fn test_preset_selection_snapshots_table_value() {
        let mut presets = PresetConfig::default();
        let (mut store, _, accent) = accent_in_group("", json!({}));
        AccentBlock::new(&mut store, accent, &presets).select_size_preset(PresetLabel::M);

        presets.size.set(PresetLabel::M, "999px");
        let config = AccentBlock::new(&mut store, accent, &presets).config();

        assert_eq!(config.size.mode, ValueMode::Preset);
        assert_eq!(config.size.resolved, "clamp(80px, 12cqi, 160px)");
    }

    #[test]
    fn test_split_keeps_current_offset() {
        let presets = PresetConfig::default();
        let (mut store, _, accent) = accent_in_group("", json!({}));
        let mut block = AccentBlock::new(&mut store, accent, &presets);

        block.select_offset_preset(PresetLabel::L);
        block.set_offset_split(true);
        block.set_offset_axis_custom(Axis::Y, "3px");

        assert_eq!(
            block.config().offset,
            OffsetSetting::Split {
                x_custom: String::new(),
                y_custom: "3px".into(),
                x_resolved: "1rem".into(),
                y_resolved: "1rem".into(),
            }
        );

        block.set_offset_custom("2px");
        assert!(!block.config().offset.is_split());
    }

    #[test]
    fn test_axis_setter_on_uniform_offset_keeps_other_axis() {
        let presets = PresetConfig::default();
        let (mut store, _, accent) = accent_in_group("", json!({}));
        let mut block = AccentBlock::new(&mut store, accent, &presets);
        block.select_offset_preset(PresetLabel::L);

        block.set_offset_axis_custom(Axis::X, "3px");

        assert_eq!(
            resolve_offsets(&block.config().offset),
            AxisOffsets {
                x: "3px".into(),
                y: "1rem".into(),
            }
        );
    }

    #[test]
    fn test_setters_flow_into_render_props() {
        let presets = PresetConfig::default();
        let (mut store, _, accent) = accent_in_group("", json!({}));
        let mut block = AccentBlock::new(&mut store, accent, &presets);

        block.set_corner(Corner::TopRight);
        block.set_hide_on_mobile(true);
        block.set_size_custom("5rem");

        let props = block.render_props();
        assert_eq!(
            props.class_name,
            "artsolio-accent is-top-right is-hidden-mobile"
        );
        assert_eq!(props.style.get("--artsolio_accent_size"), Some("5rem"));
    }

    #[test]
    fn test_set_image_writes_object_and_url() {
        let presets = PresetConfig::default();
        let (mut store, _, accent) = accent_in_group("", json!({}));
        let image = ImageDescriptor {
            url: "a.png".into(),
            alt: "A".into(),
            width: Some(10),
            ..ImageDescriptor::default()
        };

        AccentBlock::new(&mut store, accent, &presets).set_image(&image);

        let attrs = store.attributes(accent).unwrap();
        assert_eq!(attrs.get("url"), Some(&json!("a.png")));
        assert_eq!(
            attrs.get("image"),
            Some(&json!({ "url": "a.png", "alt": "A", "width": 10 }))
        );
    }

    #[test]
    fn test_mount_accent_blocks_finds_nested_blocks() {
        let presets = PresetConfig::default();
        let mut store = EditorStore::new();
        let outer = store.insert_block("core/group", Attributes::new(), None).unwrap();
        let inner = store
            .insert_block("core/group", Attributes::new(), Some(outer))
            .unwrap();
        store
            .insert_block(ACCENT_BLOCK_NAME, attributes(json!({ "markParent": true })), Some(inner))
            .unwrap();
        store
            .insert_block("core/paragraph", Attributes::new(), Some(outer))
            .unwrap();

        let mounted = mount_accent_blocks(&mut store, &presets);

        assert_eq!(mounted.len(), 1);
        assert_eq!(
            class_name_of(&store, inner),
            "is-accent-anchor artsolio_is-accent-anchor"
        );
        assert_eq!(class_name_of(&store, outer), "");
    }
}
