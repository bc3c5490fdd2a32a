// This file is part of the product Stockyard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One entry in the category tree. Roots and subcategories are the same
/// entity; "subcategory" is only a route-level word for a non-root node.
///
/// `parent` is the single source of truth for tree shape. `level`, `path`
/// and `subcategories` are derived by the tree operations and are never
/// accepted from client input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryNode {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub parent: Option<Uuid>,
    /// Tree depth; `0` for roots, `parent.level + 1` otherwise.
    #[serde(default)]
    pub level: u32,
    /// Ancestor ids from root down to the immediate parent, exclusive of
    /// this node. Empty for roots.
    #[serde(default)]
    pub path: Vec<Uuid>,
    /// Direct child ids, kept in sync with each child's `parent`.
    #[serde(default)]
    pub subcategories: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CategoryNode {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn summary(&self) -> CategorySummary {
        CategorySummary {
            id: self.id,
            name: self.name.clone(),
            slug: self.slug.clone(),
            description: self.description.clone(),
            level: self.level,
        }
    }
}

/// Shallow view of a node, used when listing a parent's direct children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub level: u32,
}

/// A node with its direct children populated one level deep, the shape the
/// admin UI renders as a category card.
#[derive(Debug, Clone, Serialize)]
pub struct PopulatedCategory {
    #[serde(flatten)]
    pub node: CategoryNode,
    pub children: Vec<CategorySummary>,
}
