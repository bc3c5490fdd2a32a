// This file is part of the product Stockyard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::catalog::node::CategoryNode;
use crate::catalog::yaml_file::{read_yaml_file, write_yaml_file};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockWriteGuard};
use uuid::Uuid;

const CATEGORIES_LABEL: &str = "categories";

/// Which uniqueness constraint a write violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    /// `name` unique within one sibling scope (same parent).
    SiblingName,
    /// `slug` unique across the whole collection.
    Slug,
}

#[derive(Debug, Clone)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write. Kept at the storage
    /// layer as a last line of defense against racing writers; callers
    /// normally catch duplicates with a pre-check first.
    DuplicateKey(DuplicateField),
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::DuplicateKey(DuplicateField::SiblingName) => {
                write!(f, "Duplicate category name within the same parent")
            }
            StoreError::DuplicateKey(DuplicateField::Slug) => {
                write!(f, "Duplicate category slug")
            }
            StoreError::Unavailable(message) => write!(f, "Category storage error: {}", message),
        }
    }
}

impl Error for StoreError {}

/// Durable storage for category nodes and the sole authority for primary
/// key lookups and uniqueness checks. Does not enforce tree-wide
/// invariants; that is the tree operations' job. Performs no retries —
/// storage errors propagate unchanged.
pub trait CategoryStore: Send + Sync {
    fn find_by_id(&self, id: Uuid) -> Result<Option<CategoryNode>, StoreError>;
    /// Sibling-scoped name lookup, used for uniqueness pre-checks.
    fn find_by_name(
        &self,
        name: &str,
        parent: Option<Uuid>,
    ) -> Result<Option<CategoryNode>, StoreError>;
    /// Global slug lookup.
    fn find_by_slug(&self, slug: &str) -> Result<Option<CategoryNode>, StoreError>;
    /// Direct children of `parent`, name-ascending with creation-order
    /// tiebreak for stable listings.
    fn find_children(&self, parent: Option<Uuid>) -> Result<Vec<CategoryNode>, StoreError>;
    fn find_roots(&self) -> Result<Vec<CategoryNode>, StoreError> {
        self.find_children(None)
    }
    fn insert(&self, node: &CategoryNode) -> Result<(), StoreError>;
    fn update(&self, node: &CategoryNode) -> Result<(), StoreError>;
    /// Returns whether a node was present to delete.
    fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCategory {
    /// Monotonic creation counter; breaks ordering ties between equal names.
    seq: u64,
    #[serde(flatten)]
    node: CategoryNode,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    next_seq: u64,
    #[serde(default)]
    categories: BTreeMap<Uuid, StoredCategory>,
}

/// File-backed category store: an in-memory map guarded by a lock, with
/// every committed write persisted as an atomic YAML snapshot. Suited to
/// the product's scale (hundreds of nodes, not millions).
pub struct YamlCategoryStore {
    file: PathBuf,
    state: RwLock<StoreDocument>,
}

impl YamlCategoryStore {
    pub fn open(file: PathBuf) -> Result<Self, StoreError> {
        let document: StoreDocument = read_yaml_file(&file, CATEGORIES_LABEL)
            .map_err(|err| StoreError::Unavailable(err.to_string()))?
            .unwrap_or_default();
        Ok(Self {
            file,
            state: RwLock::new(document),
        })
    }

    fn read_state(&self) -> Result<StoreDocument, StoreError> {
        self.state
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| StoreError::Unavailable("category store lock poisoned".to_string()))
    }

    /// Write guard for a mutation. Held across the uniqueness check, the
    /// file write, and the in-memory swap, so racing writers are fully
    /// serialized and never validate against a stale snapshot.
    fn lock_for_write(&self) -> Result<RwLockWriteGuard<'_, StoreDocument>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::Unavailable("category store lock poisoned".to_string()))
    }

    /// Persists the new document to disk before swapping it in, so memory
    /// never runs ahead of the file. Callers hold the write guard.
    fn commit(
        &self,
        guard: &mut RwLockWriteGuard<'_, StoreDocument>,
        document: StoreDocument,
    ) -> Result<(), StoreError> {
        write_yaml_file(&self.file, CATEGORIES_LABEL, &document)
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        **guard = document;
        Ok(())
    }

    fn check_unique(
        document: &StoreDocument,
        node: &CategoryNode,
        exclude: Option<Uuid>,
    ) -> Result<(), StoreError> {
        for stored in document.categories.values() {
            if Some(stored.node.id) == exclude {
                continue;
            }
            if stored.node.slug == node.slug {
                return Err(StoreError::DuplicateKey(DuplicateField::Slug));
            }
            if stored.node.parent == node.parent && stored.node.name == node.name {
                return Err(StoreError::DuplicateKey(DuplicateField::SiblingName));
            }
        }
        Ok(())
    }

    fn sorted_by_listing_order(mut children: Vec<(u64, CategoryNode)>) -> Vec<CategoryNode> {
        children.sort_by(|(seq_a, node_a), (seq_b, node_b)| {
            node_a.name.cmp(&node_b.name).then(seq_a.cmp(seq_b))
        });
        children.into_iter().map(|(_, node)| node).collect()
    }
}

impl CategoryStore for YamlCategoryStore {
    fn find_by_id(&self, id: Uuid) -> Result<Option<CategoryNode>, StoreError> {
        let document = self.read_state()?;
        Ok(document.categories.get(&id).map(|stored| stored.node.clone()))
    }

    fn find_by_name(
        &self,
        name: &str,
        parent: Option<Uuid>,
    ) -> Result<Option<CategoryNode>, StoreError> {
        let document = self.read_state()?;
        Ok(document
            .categories
            .values()
            .find(|stored| stored.node.parent == parent && stored.node.name == name)
            .map(|stored| stored.node.clone()))
    }

    fn find_by_slug(&self, slug: &str) -> Result<Option<CategoryNode>, StoreError> {
        let document = self.read_state()?;
        Ok(document
            .categories
            .values()
            .find(|stored| stored.node.slug == slug)
            .map(|stored| stored.node.clone()))
    }

    fn find_children(&self, parent: Option<Uuid>) -> Result<Vec<CategoryNode>, StoreError> {
        let document = self.read_state()?;
        let children = document
            .categories
            .values()
            .filter(|stored| stored.node.parent == parent)
            .map(|stored| (stored.seq, stored.node.clone()))
            .collect();
        Ok(Self::sorted_by_listing_order(children))
    }

    fn insert(&self, node: &CategoryNode) -> Result<(), StoreError> {
        let mut guard = self.lock_for_write()?;
        if guard.categories.contains_key(&node.id) {
            return Err(StoreError::Unavailable(format!(
                "category id {} already present",
                node.id
            )));
        }
        Self::check_unique(&guard, node, None)?;
        let mut document = (*guard).clone();
        let seq = document.next_seq;
        document.next_seq += 1;
        document.categories.insert(
            node.id,
            StoredCategory {
                seq,
                node: node.clone(),
            },
        );
        self.commit(&mut guard, document)
    }

    fn update(&self, node: &CategoryNode) -> Result<(), StoreError> {
        let mut guard = self.lock_for_write()?;
        let seq = match guard.categories.get(&node.id) {
            Some(stored) => stored.seq,
            None => {
                return Err(StoreError::Unavailable(format!(
                    "category id {} not present for update",
                    node.id
                )));
            }
        };
        Self::check_unique(&guard, node, Some(node.id))?;
        let mut document = (*guard).clone();
        document.categories.insert(
            node.id,
            StoredCategory {
                seq,
                node: node.clone(),
            },
        );
        self.commit(&mut guard, document)
    }

    fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut guard = self.lock_for_write()?;
        if !guard.categories.contains_key(&id) {
            return Ok(false);
        }
        let mut document = (*guard).clone();
        document.categories.remove(&id);
        self.commit(&mut guard, document)?;
        Ok(true)
    }
}
