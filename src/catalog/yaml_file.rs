// This file is part of the product Stockyard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::error::Error;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const MAX_TEMP_ATTEMPTS: u32 = 100;

#[derive(Debug)]
pub(crate) struct YamlFileError {
    message: String,
}

impl YamlFileError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for YamlFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for YamlFileError {}

/// Reads a YAML document, treating a missing or empty file as `None`.
pub(crate) fn read_yaml_file<T: DeserializeOwned>(
    path: &Path,
    label: &str,
) -> Result<Option<T>, YamlFileError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|err| YamlFileError::new(format!("Failed to read {} file: {}", label, err)))?;
    if content.trim().is_empty() {
        return Ok(None);
    }
    let decoded = serde_yaml::from_str(&content)
        .map_err(|err| YamlFileError::new(format!("Failed to parse {} file: {}", label, err)))?;
    Ok(Some(decoded))
}

/// Replaces the file atomically: serialize to a sibling temp file, sync it,
/// rename over the target. A crash leaves either the old or the new
/// document, never a torn one.
pub(crate) fn write_yaml_file<T: Serialize>(
    path: &Path,
    label: &str,
    value: &T,
) -> Result<(), YamlFileError> {
    let content = serde_yaml::to_string(value)
        .map_err(|err| YamlFileError::new(format!("Failed to serialize {}: {}", label, err)))?;
    let parent = path
        .parent()
        .ok_or_else(|| YamlFileError::new(format!("{} file path has no parent directory", label)))?;
    let file_name = path
        .file_name()
        .ok_or_else(|| YamlFileError::new(format!("{} file path has no file name", label)))?;
    let (mut file, temp_path) = create_temp_file(parent, file_name, label)?;

    if let Err(err) = file.write_all(content.as_bytes()) {
        let _ = fs::remove_file(&temp_path);
        return Err(YamlFileError::new(format!(
            "Failed to write {} temp file: {}",
            label, err
        )));
    }
    if let Err(err) = file.sync_all() {
        let _ = fs::remove_file(&temp_path);
        return Err(YamlFileError::new(format!(
            "Failed to sync {} temp file: {}",
            label, err
        )));
    }
    if let Err(err) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(YamlFileError::new(format!(
            "Failed to replace {} file: {}",
            label, err
        )));
    }
    Ok(())
}

fn create_temp_file(
    parent: &Path,
    file_name: &std::ffi::OsStr,
    label: &str,
) -> Result<(fs::File, PathBuf), YamlFileError> {
    for attempt in 0..MAX_TEMP_ATTEMPTS {
        let mut temp_name = file_name.to_os_string();
        temp_name.push(format!(".tmp-{}", attempt));
        let temp_path = parent.join(temp_name);
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)
        {
            Ok(file) => return Ok((file, temp_path)),
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(err) => {
                return Err(YamlFileError::new(format!(
                    "Failed to create {} temp file: {}",
                    label, err
                )));
            }
        }
    }
    Err(YamlFileError::new(format!(
        "Exhausted temp file name attempts for {} file",
        label
    )))
}
