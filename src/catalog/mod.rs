// This file is part of the product Stockyard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod hierarchy;
pub mod import;
pub mod node;
pub mod slug;
pub mod store;
mod yaml_file;

pub use hierarchy::{CatalogError, CategoryChange, CategoryTree, NewCategory};
pub use import::{BulkImportError, SubtreeSpec, import_subtree};
pub use node::{CategoryNode, CategorySummary, PopulatedCategory};
pub use store::{CategoryStore, StoreError, YamlCategoryStore};
