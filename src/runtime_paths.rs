// This file is part of the product Stockyard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Canonical locations inside the runtime root (`-C <root>`): the config
/// file and the state directory holding the store files.
#[derive(Debug, Clone)]
pub struct RuntimePaths {
    pub root: PathBuf,
    pub config_file: PathBuf,
    pub state_dir: PathBuf,
    pub categories_file: PathBuf,
}

impl RuntimePaths {
    /// Builds the layout under `root`, creating the state directory if
    /// needed. The root itself must already exist.
    pub fn from_root(root: &Path) -> io::Result<Self> {
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("runtime root {} is not a directory", root.display()),
            ));
        }
        let root = root.canonicalize()?;
        let state_dir = root.join("state");
        fs::create_dir_all(&state_dir)?;
        Ok(Self {
            config_file: root.join("config.yaml"),
            categories_file: state_dir.join("categories.yaml"),
            state_dir,
            root,
        })
    }
}
