//! Host attribute store.
//!
//! The accent logic only ever reads and merges attributes through
//! [`AttributeStore`], so it runs the same against the editor's store or the
//! in-memory [`EditorStore`] used by the CLI and the tests.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

pub type Attributes = serde_json::Map<String, Value>;

/// Stable identifier for a placed block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Unknown parent block: {0}")]
    UnknownParent(EntityId),
    #[error("Unknown block: {0}")]
    UnknownEntity(EntityId),
    #[error("Invalid block tree: {0}")]
    InvalidBlockTree(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub attributes: Attributes,
    pub parent: Option<EntityId>,
    pub children: Vec<EntityId>,
}

impl Entity {
    /// The `className` attribute, or an empty string
    pub fn class_name(&self) -> &str {
        self.attributes
            .get("className")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }
}

/// What the accent logic needs from the host
pub trait AttributeStore {
    fn attributes(&self, id: EntityId) -> Option<&Attributes>;

    /// Shallow-merge `partial` into the entity's attributes.
    ///
    /// Unknown ids are ignored.
    fn set_attributes(&mut self, id: EntityId, partial: Attributes);

    fn parent_id(&self, id: EntityId) -> Option<EntityId>;

    fn entity(&self, id: EntityId) -> Option<&Entity>;
}

/// In-memory block tree
#[derive(Debug, Clone, Default)]
pub struct EditorStore {
    entities: HashMap<EntityId, Entity>,
    roots: Vec<EntityId>,
}

impl EditorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_block(
        &mut self,
        name: impl Into<String>,
        attributes: Attributes,
        parent: Option<EntityId>,
    ) -> Result<EntityId, StoreError> {
        let id = EntityId::new();
        match parent {
            Some(parent_id) => {
                let parent = self
                    .entities
                    .get_mut(&parent_id)
                    .ok_or(StoreError::UnknownParent(parent_id))?;
                parent.children.push(id);
            }
            None => self.roots.push(id),
        }

        self.entities.insert(
            id,
            Entity {
                id,
                name: name.into(),
                attributes,
                parent,
                children: Vec::new(),
            },
        );
        Ok(id)
    }

    /// Remove a block and its subtree. Classes it wrote on its parent stay.
    pub fn remove_block(&mut self, id: EntityId) -> Result<Entity, StoreError> {
        let entity = self
            .entities
            .remove(&id)
            .ok_or(StoreError::UnknownEntity(id))?;

        match entity.parent.and_then(|p| self.entities.get_mut(&p)) {
            Some(parent) => parent.children.retain(|child| *child != id),
            None => self.roots.retain(|root| *root != id),
        }

        let mut pending = entity.children.clone();
        while let Some(child) = pending.pop() {
            if let Some(removed) = self.entities.remove(&child) {
                pending.extend(removed.children);
            }
        }

        Ok(entity)
    }

    pub fn roots(&self) -> &[EntityId] {
        &self.roots
    }

    pub fn children(&self, id: EntityId) -> &[EntityId] {
        self.entities
            .get(&id)
            .map(|e| e.children.as_slice())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// All ids in document order (pre-order, depth first)
    pub fn ids_in_order(&self) -> Vec<EntityId> {
        let mut ordered = Vec::with_capacity(self.entities.len());
        let mut stack: Vec<EntityId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            ordered.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        ordered
    }

    /// Ids of every block named `name`, in document order
    pub fn find_by_name(&self, name: &str) -> Vec<EntityId> {
        self.ids_in_order()
            .into_iter()
            .filter(|id| self.entities.get(id).is_some_and(|e| e.name == name))
            .collect()
    }

    /// Load the host's parsed-block JSON: a block object or an array of them
    pub fn from_block_json(json: &str) -> Result<Self, StoreError> {
        let blocks = match serde_json::from_str::<ParsedBlocks>(json)? {
            ParsedBlocks::Many(blocks) => blocks,
            ParsedBlocks::One(block) => vec![block],
        };

        let mut store = Self::new();
        for block in blocks {
            store.insert_parsed(block, None)?;
        }
        Ok(store)
    }

    fn insert_parsed(
        &mut self,
        block: ParsedBlock,
        parent: Option<EntityId>,
    ) -> Result<EntityId, StoreError> {
        let id = self.insert_block(block.block_name.unwrap_or_default(), block.attrs, parent)?;
        for inner in block.inner_blocks {
            self.insert_parsed(inner, Some(id))?;
        }
        Ok(id)
    }

    /// Dump the tree back into parsed-block JSON
    pub fn to_block_json(&self) -> Value {
        let blocks: Vec<ParsedBlock> = self
            .roots
            .iter()
            .filter_map(|id| self.to_parsed(*id))
            .collect();
        serde_json::to_value(blocks).unwrap_or(Value::Null)
    }

    fn to_parsed(&self, id: EntityId) -> Option<ParsedBlock> {
        let entity = self.entities.get(&id)?;
        Some(ParsedBlock {
            block_name: Some(entity.name.clone()),
            attrs: entity.attributes.clone(),
            inner_blocks: entity
                .children
                .iter()
                .filter_map(|child| self.to_parsed(*child))
                .collect(),
        })
    }
}

impl AttributeStore for EditorStore {
    fn attributes(&self, id: EntityId) -> Option<&Attributes> {
        self.entities.get(&id).map(|e| &e.attributes)
    }

    fn set_attributes(&mut self, id: EntityId, partial: Attributes) {
        match self.entities.get_mut(&id) {
            Some(entity) => entity.attributes.extend(partial),
            None => log::debug!("Ignoring attribute write to unknown block {id}"),
        }
    }

    fn parent_id(&self, id: EntityId) -> Option<EntityId> {
        self.entities.get(&id).and_then(|e| e.parent)
    }

    fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum ParsedBlocks {
    Many(Vec<ParsedBlock>),
    One(ParsedBlock),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParsedBlock {
    block_name: Option<String>,
    #[serde(default)]
    attrs: Attributes,
    #[serde(default)]
    inner_blocks: Vec<ParsedBlock>,
}
