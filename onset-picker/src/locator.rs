//! Result file discovery

use crate::config::PickerConfig;
use crate::types::{PickerError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// List the task result files directly inside `dir`
///
/// Only regular files whose name ends with the configured extension and
/// contains the task marker are returned. Subdirectories are not searched.
/// Paths are sorted so repeated runs report files in the same order.
pub fn locate_task_files(dir: &Path, config: &PickerConfig) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(PickerError::DirectoryNotFound {
            path: dir.to_path_buf(),
            source: None,
        });
    }

    let entries = fs::read_dir(dir).map_err(|e| PickerError::DirectoryNotFound {
        path: dir.to_path_buf(),
        source: Some(e),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let name = entry.file_name();
        match name.to_str() {
            Some(name) if config.matches_file_name(name) => files.push(path),
            Some(_) => {}
            None => log::trace!("Skipping non UTF-8 file name: {:?}", name),
        }
    }

    files.sort();
    log::debug!("Found {} task file(s) in {:?}", files.len(), dir);
    Ok(files)
}
