//! Parent anchoring.
//!
//! An accent positions itself against its nearest anchored ancestor. The
//! accent block marks its parent by adding a fixed pair of marker classes to
//! the parent's `className`, plus at most one numbered layer class that
//! lifts the parent's stacking tier. The parent's class list is shared with
//! everything else on the page, so only our own tokens are ever touched.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Generic marker the stylesheet keys `position: relative` on
pub const ANCHOR_CLASS: &str = "is-accent-anchor";
/// Namespaced twin of [`ANCHOR_CLASS`], robust against theme collisions
pub const NAMESPACED_ANCHOR_CLASS: &str = "artsolio_is-accent-anchor";
pub const LAYER_CLASS_PREFIX: &str = "artsolio-layer-";

/// Stacking tier applied to the parent, `0..=4`
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct AnchorLayer(u8);

impl AnchorLayer {
    pub const MAX: u8 = 4;

    pub const ALL: [AnchorLayer; 5] = [
        AnchorLayer(0),
        AnchorLayer(1),
        AnchorLayer(2),
        AnchorLayer(3),
        AnchorLayer(4),
    ];

    /// Build a layer, clamping out-of-range input into `0..=4`
    pub fn new(value: i64) -> Self {
        Self(value.clamp(0, i64::from(Self::MAX)) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn class_name(self) -> String {
        format!("{LAYER_CLASS_PREFIX}{}", self.0)
    }

    /// Inspector label
    pub fn label(self) -> &'static str {
        match self.0 {
            0 => "Auto",
            1 => "Lift",
            2 => "High",
            3 => "Higher",
            _ => "Max",
        }
    }
}

impl fmt::Display for AnchorLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// True for the layer classes this block owns (`artsolio-layer-0` ..= `-4`)
pub fn is_layer_class(token: &str) -> bool {
    token
        .strip_prefix(LAYER_CLASS_PREFIX)
        .and_then(|n| n.parse::<u8>().ok())
        .is_some_and(|n| n <= AnchorLayer::MAX && token.len() == LAYER_CLASS_PREFIX.len() + 1)
}

/// Ordered, whitespace-separated class tokens, each present at most once
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    tokens: Vec<String>,
}

impl ClassList {
    /// Split on whitespace, keeping the first occurrence of a repeated token
    pub fn parse(class_name: &str) -> Self {
        class_name.split_whitespace().collect()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Append `token` unless it is already present
    pub fn insert(&mut self, token: impl Into<String>) {
        let token = token.into();
        if !self.contains(&token) {
            self.tokens.push(token);
        }
    }

    pub fn remove(&mut self, token: &str) {
        self.tokens.retain(|t| t != token);
    }

    pub fn retain(&mut self, keep: impl FnMut(&String) -> bool) {
        self.tokens.retain(keep);
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn has_anchor(&self) -> bool {
        self.contains(ANCHOR_CLASS) && self.contains(NAMESPACED_ANCHOR_CLASS)
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens.join(" "))
    }
}

impl From<&str> for ClassList {
    fn from(class_name: &str) -> Self {
        Self::parse(class_name)
    }
}

impl<S: Into<String>> FromIterator<S> for ClassList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = Self::default();
        for token in iter {
            list.insert(token);
        }
        list
    }
}

/// Compute the parent's class list after an anchor instruction.
///
/// Layer classes are always stripped first. Enabling appends the marker
/// pair and, when `layer` is given, exactly one layer class; disabling drops
/// the markers. Unrelated tokens keep their order. Applying the same
/// instruction twice yields the same list.
pub fn set_parent_anchor(
    current: &ClassList,
    enable: bool,
    layer: Option<AnchorLayer>,
) -> ClassList {
    let mut next = current.clone();
    next.retain(|token| !is_layer_class(token));

    if enable {
        next.insert(ANCHOR_CLASS);
        next.insert(NAMESPACED_ANCHOR_CLASS);
        if let Some(layer) = layer {
            next.insert(layer.class_name());
        }
    } else {
        next.remove(ANCHOR_CLASS);
        next.remove(NAMESPACED_ANCHOR_CLASS);
    }

    next
}
