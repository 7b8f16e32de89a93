// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Bulk reading of executor specifications from models folders.

use super::{ExecutorSpecification, WorkerLoader};
use crate::errors::{LoaderError, LoaderResult};
use crate::observability::messages::loader::{
    SpecificationLoadFailed, SpecificationSkipped, SpecificationsLoaded,
};
use crate::observability::messages::StructuredLog;
use std::path::Path;
use walkdir::WalkDir;

/// Reads every allowed file at `path` with `reader`.
///
/// `path` may be a single file or a folder; folders are walked in file-name
/// order, recursively when `recursive` is set, otherwise only their direct
/// files are read. Linked files are read, linked folders are not walked
/// into. A reader returning `Ok(None)` declines the file. A missing `path`
/// yields an empty list.
pub fn read_all_if_valid<T, R, P>(
    path: &Path,
    recursive: bool,
    mut reader: R,
    is_allowed: P,
) -> LoaderResult<Vec<T>>
where
    R: FnMut(&Path) -> LoaderResult<Option<T>>,
    P: Fn(&Path) -> bool,
{
    let mut result = Vec::new();
    if !path.exists() {
        return Ok(result);
    }
    let walker = WalkDir::new(path)
        .sort_by_file_name()
        .max_depth(if recursive { usize::MAX } else { 1 });
    for entry in walker {
        let entry = entry.map_err(|e| LoaderError::Io {
            path: e.path().unwrap_or(path).to_path_buf(),
            source: e.into(),
        })?;
        if entry.path().is_file() && is_allowed(entry.path()) {
            if let Some(item) = reader(entry.path())? {
                result.push(item);
            }
        }
    }
    Ok(result)
}

/// [`read_all_if_valid`] over `*.json` files (any letter case), recursively.
pub fn read_all_json_if_valid<T, R>(path: &Path, reader: R) -> LoaderResult<Vec<T>>
where
    R: FnMut(&Path) -> LoaderResult<Option<T>>,
{
    read_all_if_valid(path, true, reader, is_json_file)
}

/// Registers every executor specification found under `folder`.
///
/// JSON files that are not executor specifications are skipped; a malformed
/// specification fails the whole folder. Returns the number registered.
pub fn load_specifications(
    folder: &Path,
    loader: &WorkerLoader<ExecutorSpecification>,
) -> LoaderResult<usize> {
    let specifications = read_all_json_if_valid(folder, |file| {
        let result = ExecutorSpecification::load_from_file_if_recognized(file);
        match &result {
            Ok(None) => SpecificationSkipped {
                file: &file.display().to_string(),
            }
            .log(),
            Err(error) => SpecificationLoadFailed {
                file: &file.display().to_string(),
                error,
            }
            .log(),
            Ok(Some(_)) => {}
        }
        result
    })?;
    let count = specifications.len();
    for specification in specifications {
        loader.register(specification.id().to_string(), specification);
    }
    SpecificationsLoaded {
        folder: &folder.display().to_string(),
        count,
    }
    .log();
    Ok(count)
}

fn is_json_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}
