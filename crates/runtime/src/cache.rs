// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Delegate cache housekeeping.

use std::path::Path;

/// Deletes files in `dir` whose names do not contain `model_token`.
///
/// Delegate data written for an older model token is never read again, so
/// it only takes up space. A missing directory is not an error. Returns the
/// number of files removed.
pub fn prune_delegate_cache(dir: &Path, model_token: &str) -> std::io::Result<usize> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };

    let mut removed = 0;
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        if name.to_string_lossy().contains(model_token) {
            continue;
        }
        match std::fs::remove_file(entry.path()) {
            Ok(()) => {
                tracing::info!(file = %name.to_string_lossy(), "deleted stale delegate cache file");
                removed += 1;
            }
            Err(e) => {
                tracing::warn!(file = %name.to_string_lossy(), error = %e, "cannot delete stale delegate cache file");
            }
        }
    }
    Ok(removed)
}
