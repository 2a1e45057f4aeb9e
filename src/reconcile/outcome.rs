//! Typed outcomes of reconciliation runs.
//!
//! Every per-file step returns an [`AssetOutcome`]; reports aggregate them,
//! so "did anything change" is derived rather than threaded through calls.

use crate::brand::BrandPath;
use crate::catalog::{AssetKind, FileSlot};
use crate::diff::{ScheduledMove, StaleFile};
use crate::error::ApiError;
use crate::types::{AssetId, CategoryId, ProductId};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Restricts a run to one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconcileAction {
    /// Entering-brand path only
    Move,
    /// Leaving-brand path only
    Remove,
}

impl FromStr for ReconcileAction {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "move" => Ok(ReconcileAction::Move),
            "remove" => Ok(ReconcileAction::Remove),
            _ => Err(ApiError::InvalidAction(s.to_string())),
        }
    }
}

impl fmt::Display for ReconcileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileAction::Move => f.write_str("move"),
            ReconcileAction::Remove => f.write_str("remove"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    IntoBrand,
    ToDispersion,
}

/// One file that changed location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relocation {
    pub kind: AssetKind,
    pub asset_id: Option<AssetId>,
    pub index: usize,
    pub slot: FileSlot,
    pub direction: Direction,
    pub from: String,
    pub to: String,
}

/// A file operation that failed; the asset keeps its old reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelocationFailure {
    pub kind: AssetKind,
    pub asset_id: Option<AssetId>,
    pub slot: FileSlot,
    pub path: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetOutcome {
    Unchanged,
    Relocated(Relocation),
    Failed(RelocationFailure),
}

/// Result of reconciling one product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub product_id: ProductId,
    /// Brand the entering path targeted
    pub brand: Option<BrandPath>,
    /// Brand the leaving path moved files out of
    pub left_brand: Option<BrandPath>,
    pub relocations: Vec<Relocation>,
    pub failures: Vec<RelocationFailure>,
    pub saved: bool,
    pub save_error: Option<String>,
}

impl ReconcileReport {
    pub fn new(product_id: ProductId) -> Self {
        Self {
            product_id,
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: AssetOutcome) {
        match outcome {
            AssetOutcome::Unchanged => {}
            AssetOutcome::Relocated(relocation) => self.relocations.push(relocation),
            AssetOutcome::Failed(failure) => self.failures.push(failure),
        }
    }

    pub fn changed(&self) -> bool {
        !self.relocations.is_empty()
    }

    /// Successful renames performed during the run.
    pub fn file_operations(&self) -> usize {
        self.relocations.len()
    }

    /// Fold a follow-up run on the same product into this report.
    pub fn merge(&mut self, other: ReconcileReport) {
        if other.brand.is_some() {
            self.brand = other.brand;
        }
        if other.left_brand.is_some() {
            self.left_brand = other.left_brand;
        }
        self.relocations.extend(other.relocations);
        self.failures.extend(other.failures);
        self.saved |= other.saved;
        if other.save_error.is_some() {
            self.save_error = other.save_error;
        }
    }
}

/// Result of preparing a product before it is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BeforeSaveReport {
    pub product_id: ProductId,
    /// Reentrant save by the engine itself; nothing was done
    pub skipped: bool,
    /// Product stopped being downloadable; its link and sample files were dropped
    pub type_transition: bool,
    pub scheduled: Vec<ScheduledMove>,
    pub deleted: Vec<StaleFile>,
    pub failures: Vec<RelocationFailure>,
}

/// Result of a category save touching product assignments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategorySaveReport {
    pub category_id: CategoryId,
    /// `None` when the category is not a branded digital-assets category
    pub brand: Option<BrandPath>,
    pub moved: Vec<ReconcileReport>,
    pub removed: Vec<ReconcileReport>,
    /// Products that could not be loaded
    pub missing_products: Vec<ProductId>,
}

impl CategorySaveReport {
    pub fn file_operations(&self) -> usize {
        self.moved
            .iter()
            .chain(&self.removed)
            .map(ReconcileReport::file_operations)
            .sum()
    }
}
