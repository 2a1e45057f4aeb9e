//! Category tree nodes and the read-only category store port.

use crate::error::CatalogError;
use crate::types::CategoryId;
use serde::{Deserialize, Serialize};

/// A node in the category tree.
///
/// The parent is referenced by id only; ascending the tree always goes back
/// through a [`CategoryStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Tree depth; root is 1
    pub level: u32,
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
}

impl Category {
    pub fn new(id: CategoryId, name: impl Into<String>, level: u32) -> Self {
        Self {
            id,
            name: name.into(),
            level,
            parent_id: None,
        }
    }

    pub fn with_parent(mut self, parent_id: CategoryId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Parent id, treating `0` as "no parent".
    pub fn parent(&self) -> Option<CategoryId> {
        self.parent_id.filter(|id| *id != 0)
    }
}

/// Category store port.
pub trait CategoryStore: Send + Sync {
    /// Load a category; `CatalogError::NotFound` when the id does not exist.
    fn get(&self, id: CategoryId) -> Result<Category, CatalogError>;
}
