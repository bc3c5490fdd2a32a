// This file is part of the product Stockyard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::catalog::node::{CategoryNode, PopulatedCategory};
use crate::catalog::slug::slugify;
use crate::catalog::store::{CategoryStore, DuplicateField, StoreError};
use chrono::Utc;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    InvalidInput(String),
    ParentNotFound,
    /// Name already taken within the target sibling scope.
    DuplicateName(String),
    /// Slug already taken anywhere in the collection. Distinct names can
    /// collapse to the same slug, so this is not implied by DuplicateName.
    DuplicateSlug(String),
    /// Reparenting into the node itself or one of its descendants.
    CycleRejected,
    NotFound,
    Storage(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::InvalidInput(message) => write!(f, "{}", message),
            CatalogError::ParentNotFound => write!(f, "Parent category not found."),
            CatalogError::DuplicateName(name) => write!(
                f,
                "Category \"{}\" already exists under the same parent.",
                name
            ),
            CatalogError::DuplicateSlug(slug) => {
                write!(f, "Category slug \"{}\" is already in use.", slug)
            }
            CatalogError::CycleRejected => {
                write!(f, "A category cannot be moved into its own subtree.")
            }
            CatalogError::NotFound => write!(f, "Category not found."),
            CatalogError::Storage(message) => write!(f, "Category storage error: {}", message),
        }
    }
}

impl Error for CatalogError {}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        CatalogError::Storage(err.to_string())
    }
}

/// New-node input. `level`, `path` and child lists are always derived,
/// never part of the input.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub parent: Option<Uuid>,
}

/// Partial update. Omitted fields are left unchanged; `description:
/// Some("")` clears the description; `parent: Some(None)` moves the node to
/// root.
#[derive(Debug, Clone, Default)]
pub struct CategoryChange {
    pub name: Option<String>,
    pub description: Option<String>,
    pub parent: Option<Option<Uuid>>,
}

/// Tree-consistent operations over the category collection.
///
/// Holds no state beyond the injected store handle; every operation is a
/// short sequence of store reads and writes. `parent` is the source of
/// truth for tree shape — `level`, `path` and `subcategories` are
/// recomputed here on every mutation that could affect them.
#[derive(Clone)]
pub struct CategoryTree {
    store: Arc<dyn CategoryStore>,
}

impl CategoryTree {
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        Self { store }
    }

    pub fn create(&self, input: NewCategory) -> Result<CategoryNode, CatalogError> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(CatalogError::InvalidInput(
                "Name is required and cannot be empty.".to_string(),
            ));
        }

        let parent = match input.parent {
            Some(parent_id) => Some(
                self.store
                    .find_by_id(parent_id)?
                    .ok_or(CatalogError::ParentNotFound)?,
            ),
            None => None,
        };
        let (level, path) = placement(parent.as_ref());

        if self.store.find_by_name(&name, input.parent)?.is_some() {
            return Err(CatalogError::DuplicateName(name));
        }
        let slug = slugify(&name);
        if slug.is_empty() {
            return Err(CatalogError::InvalidInput(
                "Name must contain at least one URL-safe character.".to_string(),
            ));
        }
        if self.store.find_by_slug(&slug)?.is_some() {
            return Err(CatalogError::DuplicateSlug(slug));
        }

        let now = Utc::now();
        let node = CategoryNode {
            id: Uuid::new_v4(),
            name,
            slug,
            description: normalize_description(input.description),
            parent: input.parent,
            level,
            path,
            subcategories: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        // Pre-checks can race another writer; the store's uniqueness
        // backstop resolves the loser here.
        self.store
            .insert(&node)
            .map_err(|err| write_error(err, &node.name, &node.slug))?;

        if let Some(mut parent) = parent {
            parent.subcategories.push(node.id);
            parent.updated_at = now;
            if let Err(err) = self.store.update(&parent) {
                // Keep the back-reference consistent: without the parent's
                // child entry the insert must not stand.
                let _ = self.store.delete(node.id);
                return Err(err.into());
            }
        }
        Ok(node)
    }

    pub fn update(&self, id: Uuid, change: CategoryChange) -> Result<CategoryNode, CatalogError> {
        let mut node = self.store.find_by_id(id)?.ok_or(CatalogError::NotFound)?;
        let old_parent = node.parent;

        let reparent = match change.parent {
            Some(target) if target != node.parent => Some(target),
            _ => None,
        };
        let new_parent = match reparent {
            Some(Some(parent_id)) => {
                if parent_id == node.id {
                    return Err(CatalogError::CycleRejected);
                }
                let parent = self
                    .store
                    .find_by_id(parent_id)?
                    .ok_or(CatalogError::ParentNotFound)?;
                if parent.path.contains(&node.id) {
                    return Err(CatalogError::CycleRejected);
                }
                Some(parent)
            }
            _ => None,
        };
        let target_parent_id = reparent.unwrap_or(node.parent);

        let mut new_name = None;
        if let Some(raw) = &change.name {
            let name = raw.trim();
            if name.is_empty() {
                return Err(CatalogError::InvalidInput(
                    "Name is required and cannot be empty.".to_string(),
                ));
            }
            if name != node.name {
                new_name = Some(name.to_string());
            }
        }

        // Renaming to the current name in place is a no-op and must not
        // trip its own uniqueness checks.
        if new_name.is_some() || reparent.is_some() {
            let effective_name = new_name.as_deref().unwrap_or(&node.name);
            if let Some(existing) = self.store.find_by_name(effective_name, target_parent_id)?
                && existing.id != node.id
            {
                return Err(CatalogError::DuplicateName(effective_name.to_string()));
            }
        }
        if let Some(name) = new_name {
            let slug = slugify(&name);
            if slug.is_empty() {
                return Err(CatalogError::InvalidInput(
                    "Name must contain at least one URL-safe character.".to_string(),
                ));
            }
            if let Some(existing) = self.store.find_by_slug(&slug)?
                && existing.id != node.id
            {
                return Err(CatalogError::DuplicateSlug(slug));
            }
            node.name = name;
            node.slug = slug;
        }

        if let Some(description) = change.description {
            node.description = normalize_description(Some(description));
        }

        let now = Utc::now();
        let mut descendant_updates = Vec::new();
        if let Some(target) = reparent {
            let (level, path) = placement(new_parent.as_ref());
            node.parent = target;
            node.level = level;
            node.path = path;
            // The whole subtree shifts: pre-flight collect the rewritten
            // descendants before any write, fail fast on a read error.
            self.rebuild_descendants(&node, &mut descendant_updates)?;
        }

        node.updated_at = now;
        self.store
            .update(&node)
            .map_err(|err| write_error(err, &node.name, &node.slug))?;
        // Ordered write pass, parents before children.
        for descendant in &descendant_updates {
            self.store.update(descendant)?;
        }

        if reparent.is_some() {
            if let Some(old_parent_id) = old_parent
                && let Some(mut parent) = self.store.find_by_id(old_parent_id)?
            {
                parent.subcategories.retain(|child| *child != node.id);
                parent.updated_at = now;
                self.store.update(&parent)?;
            }
            if let Some(mut parent) = new_parent {
                parent.subcategories.push(node.id);
                parent.updated_at = now;
                self.store.update(&parent)?;
            }
        }
        Ok(node)
    }

    /// Cascade delete: the node and its entire subtree go, children before
    /// parents, so no node is ever left referencing a deleted parent.
    /// Returns how many nodes were removed.
    pub fn delete(&self, id: Uuid) -> Result<usize, CatalogError> {
        let node = self.store.find_by_id(id)?.ok_or(CatalogError::NotFound)?;

        // Pre-flight read pass over the whole subtree; nothing is deleted
        // if any read fails.
        let mut subtree = Vec::new();
        self.collect_subtree(&node, &mut subtree)?;

        // Pre-order reversed puts every child before its parent.
        for victim in subtree.iter().rev() {
            // A concurrent delete may have raced us past this node.
            self.store.delete(victim.id)?;
        }

        if let Some(parent_id) = node.parent
            && let Some(mut parent) = self.store.find_by_id(parent_id)?
        {
            parent.subcategories.retain(|child| *child != id);
            parent.updated_at = Utc::now();
            self.store.update(&parent)?;
        }
        Ok(subtree.len())
    }

    /// Direct children of `parent` (roots when `None`), each populated one
    /// level deep — the shape a category card renders.
    pub fn list(&self, parent: Option<Uuid>) -> Result<Vec<PopulatedCategory>, CatalogError> {
        let nodes = match parent {
            Some(parent_id) => {
                if self.store.find_by_id(parent_id)?.is_none() {
                    return Err(CatalogError::NotFound);
                }
                self.store.find_children(Some(parent_id))?
            }
            None => self.store.find_roots()?,
        };
        nodes.into_iter().map(|node| self.populate(node)).collect()
    }

    pub fn get(&self, id: Uuid) -> Result<PopulatedCategory, CatalogError> {
        let node = self.store.find_by_id(id)?.ok_or(CatalogError::NotFound)?;
        self.populate(node)
    }

    /// Bare fetch without child population.
    pub fn get_node(&self, id: Uuid) -> Result<CategoryNode, CatalogError> {
        self.store.find_by_id(id)?.ok_or(CatalogError::NotFound)
    }

    fn populate(&self, node: CategoryNode) -> Result<PopulatedCategory, CatalogError> {
        let children = self
            .store
            .find_children(Some(node.id))?
            .iter()
            .map(CategoryNode::summary)
            .collect();
        Ok(PopulatedCategory { node, children })
    }

    /// Pre-order subtree collection rooted at `node` (inclusive).
    fn collect_subtree(
        &self,
        node: &CategoryNode,
        out: &mut Vec<CategoryNode>,
    ) -> Result<(), CatalogError> {
        out.push(node.clone());
        for child in self.store.find_children(Some(node.id))? {
            self.collect_subtree(&child, out)?;
        }
        Ok(())
    }

    /// Recomputes `path`/`level` for every descendant of `parent` from the
    /// parent's (already updated) placement, top-down.
    fn rebuild_descendants(
        &self,
        parent: &CategoryNode,
        out: &mut Vec<CategoryNode>,
    ) -> Result<(), CatalogError> {
        for mut child in self.store.find_children(Some(parent.id))? {
            let mut path = parent.path.clone();
            path.push(parent.id);
            child.path = path;
            child.level = parent.level + 1;
            out.push(child.clone());
            self.rebuild_descendants(&child, out)?;
        }
        Ok(())
    }
}

fn placement(parent: Option<&CategoryNode>) -> (u32, Vec<Uuid>) {
    match parent {
        Some(parent) => {
            let mut path = parent.path.clone();
            path.push(parent.id);
            (parent.level + 1, path)
        }
        None => (0, Vec::new()),
    }
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn write_error(err: StoreError, name: &str, slug: &str) -> CatalogError {
    match err {
        StoreError::DuplicateKey(DuplicateField::SiblingName) => {
            CatalogError::DuplicateName(name.to_string())
        }
        StoreError::DuplicateKey(DuplicateField::Slug) => {
            CatalogError::DuplicateSlug(slug.to_string())
        }
        StoreError::Unavailable(message) => CatalogError::Storage(message),
    }
}
