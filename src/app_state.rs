// This file is part of the product Stockyard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::sync::Arc;

use crate::catalog::{CategoryStore, CategoryTree};
use crate::runtime_paths::RuntimePaths;

/// Per-process shared state handed to request handlers. The tree operations
/// themselves are stateless; the store handle is the only shared mutable
/// resource.
pub struct AppState {
    pub catalog: CategoryTree,
    pub runtime_paths: RuntimePaths,
}

impl AppState {
    pub fn new(categories: Arc<dyn CategoryStore>, runtime_paths: RuntimePaths) -> Self {
        Self {
            catalog: CategoryTree::new(categories),
            runtime_paths,
        }
    }
}
