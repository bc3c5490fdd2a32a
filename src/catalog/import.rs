// This file is part of the product Stockyard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::catalog::hierarchy::{CatalogError, CategoryTree, NewCategory};
use crate::catalog::node::CategoryNode;
use serde::Deserialize;
use std::error::Error;
use std::fmt;
use uuid::Uuid;

/// One item of a nested subcategory batch.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubtreeSpec {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub subcategories: Vec<SubtreeSpec>,
}

/// A batch stopped partway. There is no global rollback: `created` holds
/// every node the batch managed to create before `item` failed, and those
/// nodes stay in place. The caller decides whether to clean up.
#[derive(Debug)]
pub struct BulkImportError {
    pub item: String,
    pub error: CatalogError,
    pub created: Vec<CategoryNode>,
}

impl fmt::Display for BulkImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Subcategory \"{}\" could not be created: {}",
            self.item, self.error
        )
    }
}

impl Error for BulkImportError {}

/// Creates a nested subcategory tree under `root`, depth-first: each spec
/// becomes a child of its enclosing node via the single-create primitive,
/// so every item gets the full validation path (empty name, sibling name,
/// slug). The first failure aborts the rest of the batch.
pub fn import_subtree(
    tree: &CategoryTree,
    root: Uuid,
    specs: &[SubtreeSpec],
) -> Result<Vec<CategoryNode>, BulkImportError> {
    let mut created = Vec::new();
    match walk(tree, root, specs, &mut created) {
        Ok(()) => Ok(created),
        Err((item, error)) => Err(BulkImportError {
            item,
            error,
            created,
        }),
    }
}

fn walk(
    tree: &CategoryTree,
    parent: Uuid,
    specs: &[SubtreeSpec],
    created: &mut Vec<CategoryNode>,
) -> Result<(), (String, CatalogError)> {
    for spec in specs {
        let node = tree
            .create(NewCategory {
                name: spec.name.clone(),
                description: spec.description.clone(),
                parent: Some(parent),
            })
            .map_err(|error| (spec.name.clone(), error))?;
        let id = node.id;
        created.push(node);
        walk(tree, id, &spec.subcategories, created)?;
    }
    Ok(())
}
