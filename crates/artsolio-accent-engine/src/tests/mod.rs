use serde_json::{Value, json};

use crate::block::ACCENT_BLOCK_NAME;
use crate::store::{AttributeStore, Attributes, EditorStore, EntityId};


/// Attributes from a JSON object literal
pub fn attributes(value: Value) -> Attributes {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// A `core/group` with the given class list holding one accent block.
/// Returns the store, the group id and the accent id.
pub fn accent_in_group(class_name: &str, accent: Value) -> (EditorStore, EntityId, EntityId) {
    let mut store = EditorStore::new();
    let group = store
        .insert_block(
            "core/group",
            attributes(json!({ "className": class_name })),
            None,
        )
        .unwrap();
    let accent = store
        .insert_block(ACCENT_BLOCK_NAME, attributes(accent), Some(group))
        .unwrap();
    (store, group, accent)
}

pub fn class_name_of(store: &EditorStore, id: EntityId) -> String {
    store.entity(id).unwrap().class_name().to_string()
}
