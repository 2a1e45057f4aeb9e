//! Core identifier types for the catalog.

/// CategoryID: Identity of a node in the category tree
pub type CategoryId = u64;

/// ProductID: Identity of a persisted product
pub type ProductId = u64;

/// AssetID: Persisted identity of a gallery entry, link or sample
pub type AssetId = u64;
