//! `core/group` variation that inserts a ready-made anchor container.

use artsolio_accent_config::PresetConfig;
use serde::Serialize;

use crate::anchor::{ANCHOR_CLASS, NAMESPACED_ANCHOR_CLASS};

pub const GROUP_BLOCK_NAME: &str = "core/group";
pub const VARIATION_NAME: &str = "artsolio-accent-section";
pub const GUTTER_CLASS: &str = "has-accent-gutter";
pub const NAMESPACED_GUTTER_CLASS: &str = "artsolio_has-accent-gutter";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationAttributes {
    pub class_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockVariation {
    pub block_name: &'static str,
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub attributes: VariationAttributes,
    pub scope: Vec<&'static str>,
}

/// The variation to register, or `None` when the site turned it off
pub fn group_variation(presets: &PresetConfig) -> Option<BlockVariation> {
    if !presets.enable_group_variation {
        log::debug!("Group variation disabled");
        return None;
    }

    Some(BlockVariation {
        block_name: GROUP_BLOCK_NAME,
        name: VARIATION_NAME,
        title: "Accent Section (WP Core)",
        description: "A Group preconfigured as an anchor for Accent Image blocks.",
        icon: "layout",
        attributes: VariationAttributes {
            class_name: [
                ANCHOR_CLASS,
                NAMESPACED_ANCHOR_CLASS,
                GUTTER_CLASS,
                NAMESPACED_GUTTER_CLASS,
            ]
            .join(" "),
        },
        scope: vec!["inserter", "transform"],
    })
}
