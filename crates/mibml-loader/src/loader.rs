//! File-backed template resolution.
//!
//! Templates live in two places: an editable output directory and the
//! read-only default assets shipped with the game (possibly resolved
//! through a [`HostAdapter`](crate::host::HostAdapter)). The output copy
//! is preferred; the default asset is copied there once on first use.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{LoaderError, Result};

/// Resolves the on-disk file for a template name.
///
/// - The copy in `output_dir` wins when it exists.
/// - Otherwise the `input` default asset (a directory containing
///   `file_name`, or the file itself) is copied into `output_dir` once
///   and that copy is used.
/// - Without an output directory the input path is used in place.
/// - If neither exists the error names the missing template.
pub fn resolve_template_file(
    file_name: &str,
    output_dir: Option<&Path>,
    input: Option<&Path>,
) -> Result<PathBuf> {
    if let Some(dir) = output_dir {
        let target = dir.join(file_name);
        if target.exists() {
            return Ok(target);
        }
        if let Some(source) = input_candidate(file_name, input) {
            fs::create_dir_all(dir)?;
            fs::copy(&source, &target)?;
            log::debug!(
                "copied default template {} -> {}",
                source.display(),
                target.display()
            );
            return Ok(target);
        }
        return Err(LoaderError::NotFound(file_name.to_string()));
    }

    input_candidate(file_name, input).ok_or_else(|| LoaderError::NotFound(file_name.to_string()))
}

fn input_candidate(file_name: &str, input: Option<&Path>) -> Option<PathBuf> {
    let input = input?;
    let candidate = if input.is_dir() {
        input.join(file_name)
    } else {
        input.to_path_buf()
    };
    candidate.exists().then_some(candidate)
}
