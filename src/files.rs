use anyhow::{bail, Context, Result};

use std::{
    fs,
    path::{Path, PathBuf},
};

/// Lists the export files to process.
///
/// Keeps the immediate entries of `dir` that are regular files and whose name
/// contains `pattern`, compared case-insensitively, and returns them sorted
/// by file name, so the same directory and pattern always produce the same
/// processing order.
///
/// # Examples
///
/// ```
/// let paths = lcatotals::matching_files("testdata", "LCA_EXPORT").unwrap();
/// assert!(!paths.is_empty());
/// ```
///
/// # Errors
///
/// Returns errors if:
/// * `dir` does not exist or is not a directory
/// * the directory cannot be read
/// * no file name contains `pattern`
pub fn matching_files(dir: impl AsRef<Path>, pattern: &str) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        bail!("Directory not found: {}", dir.display());
    }
    let needle = pattern.to_lowercase();
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry
            .with_context(|| format!("reading {}", dir.display()))?
            .path();
        if path.is_file() && display_name(&path).to_lowercase().contains(&needle) {
            files.push(path);
        }
    }
    if files.is_empty() {
        bail!(
            "No files matching pattern '{pattern}' found in {}",
            dir.display()
        );
    }
    files.sort();
    Ok(files)
}

/// Returns the file-name portion of `path`, the form every progress and
/// warning message uses.
#[must_use]
pub fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}
