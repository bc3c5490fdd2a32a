// This file is part of the product Stockyard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

/// Derives a URL-safe identifier from a display name.
///
/// Lowercases, turns whitespace runs into single hyphens, drops everything
/// outside `[a-z0-9_-]`, collapses repeated hyphens and trims hyphens from
/// both ends. Distinct names may collapse to the same slug ("Café" and
/// "Cafe"); the tree operations treat that as a collision to reject, never
/// something to repair here.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for ch in text.to_lowercase().chars() {
        if ch.is_whitespace() || ch == '-' {
            pending_hyphen = !slug.is_empty();
            continue;
        }
        if !(ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_') {
            continue;
        }
        if pending_hyphen {
            slug.push('-');
            pending_hyphen = false;
        }
        slug.push(ch);
    }
    slug
}
