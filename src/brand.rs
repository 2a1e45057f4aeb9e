//! Brand detection
//!
//! A product belongs to a brand when one of its categories is a "digital
//! assets" category whose ancestry contains a category at the brand level.
//! The brand's files live under `/<BrandName>/<folder_name>` inside every
//! slot base directory.

use crate::catalog::{Category, CategoryStore};
use crate::config::{BrandConfig, ConflictPolicy};
use crate::error::CatalogError;
use crate::media::layout::normalize_separators;
use crate::types::CategoryId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Brand storage subdirectory, e.g. `/Acme/DigitalAssets`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrandPath(String);

impl BrandPath {
    /// `None` when the escaped brand name is empty.
    pub fn from_brand_name(brand_name: &str, folder_name: &str) -> Option<Self> {
        let escaped = escape_brand_name(brand_name);
        if escaped.is_empty() {
            return None;
        }
        Some(BrandPath(format!("/{}/{}", escaped, folder_name)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a stored reference already lives under this brand path.
    pub fn contains(&self, stored_path: &str) -> bool {
        let normalized = normalize_separators(&format!("/{}", stored_path));
        normalized.contains(&format!("{}/", self.0))
    }
}

impl fmt::Display for BrandPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BrandPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Brand names become directory names with spaces removed.
pub fn escape_brand_name(brand_name: &str) -> String {
    brand_name.replace(' ', "")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Literal(char),
    Whitespace,
}

/// Case-insensitive substring matcher for category names.
///
/// Each whitespace run in the pattern matches exactly one whitespace
/// character in the name.
#[derive(Debug, Clone)]
pub struct CategoryNameMatcher {
    tokens: Vec<Token>,
}

impl CategoryNameMatcher {
    pub fn new(pattern: &str) -> Self {
        let mut tokens = Vec::new();
        for c in pattern.trim().chars() {
            if c.is_whitespace() {
                if tokens.last() != Some(&Token::Whitespace) {
                    tokens.push(Token::Whitespace);
                }
            } else {
                tokens.extend(c.to_lowercase().map(Token::Literal));
            }
        }
        Self { tokens }
    }

    pub fn is_match(&self, name: &str) -> bool {
        if self.tokens.is_empty() {
            return false;
        }
        let chars: Vec<char> = name.chars().flat_map(char::to_lowercase).collect();
        if chars.len() < self.tokens.len() {
            return false;
        }
        (0..=chars.len() - self.tokens.len()).any(|start| {
            self.tokens
                .iter()
                .zip(&chars[start..])
                .all(|(token, c)| match token {
                    Token::Literal(expected) => expected == c,
                    Token::Whitespace => c.is_whitespace(),
                })
        })
    }
}

/// Outcome of resolving a set of category ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrandResolution {
    NoBrand,
    Brand(BrandPath),
    /// Distinct brands, in category order.
    Conflict(Vec<BrandPath>),
}

/// Resolves category ids to a brand path through the category store.
pub struct BrandPathResolver {
    categories: Arc<dyn CategoryStore>,
    matcher: CategoryNameMatcher,
    folder_name: String,
    brand_level: u32,
    max_ancestry_depth: u32,
    conflict_policy: ConflictPolicy,
}

impl BrandPathResolver {
    pub fn new(categories: Arc<dyn CategoryStore>, config: &BrandConfig) -> Self {
        Self {
            categories,
            matcher: CategoryNameMatcher::new(&config.category_pattern),
            folder_name: config.folder_name.clone(),
            brand_level: config.brand_level,
            max_ancestry_depth: config.max_ancestry_depth,
            conflict_policy: config.conflict_policy,
        }
    }

    /// Brand path of the product's categories, applying the conflict policy.
    /// Lookup failures never propagate; they count as "no brand".
    pub fn resolve(&self, category_ids: &[CategoryId]) -> Option<BrandPath> {
        match self.resolve_detailed(category_ids) {
            BrandResolution::NoBrand => None,
            BrandResolution::Brand(path) => Some(path),
            BrandResolution::Conflict(paths) => match self.conflict_policy {
                ConflictPolicy::FirstMatch => {
                    warn!(
                        categories = ?category_ids,
                        brands = ?paths.iter().map(BrandPath::as_str).collect::<Vec<_>>(),
                        "Categories resolve to more than one brand; using the first"
                    );
                    paths.into_iter().next()
                }
                ConflictPolicy::Reject => {
                    warn!(
                        categories = ?category_ids,
                        "Categories resolve to more than one brand; treating as unbranded"
                    );
                    None
                }
            },
        }
    }

    /// Scan every id and report all distinct brands found.
    ///
    /// A failed category lookup anywhere in the scan, including the ancestry
    /// ascent, makes the whole call `NoBrand`.
    pub fn resolve_detailed(&self, category_ids: &[CategoryId]) -> BrandResolution {
        let mut found = match self.scan(category_ids) {
            Ok(found) => found,
            Err(e) => {
                error!(
                    categories = ?category_ids,
                    error = %e,
                    "Failed to load category while resolving brand; treating as unbranded"
                );
                return BrandResolution::NoBrand;
            }
        };
        match found.len() {
            0 => BrandResolution::NoBrand,
            1 => BrandResolution::Brand(found.remove(0)),
            _ => BrandResolution::Conflict(found),
        }
    }

    fn scan(&self, category_ids: &[CategoryId]) -> Result<Vec<BrandPath>, CatalogError> {
        let mut found: Vec<BrandPath> = Vec::new();
        for id in category_ids {
            let category = self.categories.get(*id)?;
            if !self.is_digital_assets(&category) {
                continue;
            }
            if let Some(path) = self.ascend(&category)? {
                if !found.contains(&path) {
                    found.push(path);
                }
            }
        }
        Ok(found)
    }

    pub fn is_digital_assets(&self, category: &Category) -> bool {
        self.matcher.is_match(&category.name)
    }

    /// Ascend from `category` to the brand-level ancestor.
    ///
    /// The walk is bounded by the configured depth and stops on a cycle. A
    /// parent that cannot be loaded yields `None`.
    pub fn brand_path_for_category(&self, category: &Category) -> Option<BrandPath> {
        self.ascend(category).unwrap_or_else(|e| {
            error!(category_id = category.id, error = %e, "Failed to load parent category");
            None
        })
    }

    fn ascend(&self, category: &Category) -> Result<Option<BrandPath>, CatalogError> {
        let mut visited: HashSet<CategoryId> = HashSet::new();
        let mut current = category.clone();
        for _ in 0..=self.max_ancestry_depth {
            if !visited.insert(current.id) {
                warn!(category_id = current.id, "Cycle in category ancestry");
                return Ok(None);
            }
            if current.level == self.brand_level {
                let path = BrandPath::from_brand_name(&current.name, &self.folder_name);
                if path.is_none() {
                    warn!(category_id = current.id, "Brand category has an empty name");
                }
                return Ok(path);
            }
            let Some(parent_id) = current.parent() else {
                return Ok(None);
            };
            current = self.load_parent(parent_id)?;
        }
        warn!(
            category_id = category.id,
            max_depth = self.max_ancestry_depth,
            "Category ancestry exceeds maximum depth"
        );
        Ok(None)
    }

    fn load_parent(&self, id: CategoryId) -> Result<Category, CatalogError> {
        let parent = self.categories.get(id)?;
        debug!(category_id = id, level = parent.level, "Ascending category tree");
        Ok(parent)
    }
}
