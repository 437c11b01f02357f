//! Folder structure rendering and sidecar files.
//!
//! A folder is added to the selection by rendering its directory tree to text,
//! writing that text next to the folder as `.<name>_structure.txt`, and then
//! selecting the sidecar like any other file.
//!
//! ```text
//! Folder Structure: /work/project
//! ==================================================
//!
//! ├── project/
//! │   ├── Cargo.toml (512.00 B)
//! │   ├── src/
//! │   │   ├── main.rs (2.00 KB)
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

/// Indentation repeated once per nesting level
pub const TREE_INDENT: &str = "│   ";

/// Marker in front of every directory and file name
pub const TREE_BRANCH: &str = "├── ";

/// Width of the `=` rule under the sidecar title line
const TITLE_RULE_WIDTH: usize = 50;

/// Errors raised while rendering a folder or writing its sidecar file
#[derive(Error, Debug)]
pub enum FolderRenderError {
    #[error("Folder not found: {0}")]
    NotFound(Utf8PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(Utf8PathBuf),

    #[error("Folder {0} has no parent directory to hold its structure file")]
    NoParent(Utf8PathBuf),

    #[error("Failed to read folder {path}: {source}")]
    Walk {
        path: Utf8PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to write structure file {path}: {source}")]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Format a byte count with binary prefixes and two decimals.
///
/// ```ignore
/// assert_eq!(format_file_size(500), "500.00 B");
/// assert_eq!(format_file_size(2048), "2.00 KB");
/// ```
pub fn format_file_size(size_in_bytes: u64) -> String {
    let mut size = size_in_bytes as f64;

    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{size:.2} {unit}");
        }
        size /= 1024.0;
    }

    format!("{size:.2} TB")
}

/// Path of the sidecar file for `folder`: `<parent>/.<name>_structure.txt`
pub fn structure_file_path(folder: &Utf8Path) -> Result<Utf8PathBuf, FolderRenderError> {
    let name = folder
        .file_name()
        .ok_or_else(|| FolderRenderError::NoParent(folder.to_path_buf()))?;
    let parent = folder
        .parent()
        .ok_or_else(|| FolderRenderError::NoParent(folder.to_path_buf()))?;

    Ok(parent.join(format!(".{name}_structure.txt")))
}

/// Render the full sidecar text for `folder`: title line, rule, blank line, tree.
pub fn render_folder_structure(folder: &Utf8Path) -> Result<String, FolderRenderError> {
    if !folder.exists() {
        return Err(FolderRenderError::NotFound(folder.to_path_buf()));
    }
    if !folder.is_dir() {
        return Err(FolderRenderError::NotADirectory(folder.to_path_buf()));
    }

    let mut content = format!("Folder Structure: {folder}\n");
    content.push_str(&"=".repeat(TITLE_RULE_WIDTH));
    content.push_str("\n\n");
    content.push_str(&render_tree(folder)?);

    Ok(content)
}

/// Render the directory tree rooted at `folder`.
///
/// Within a directory, files are listed (sorted by name) before any
/// subdirectory is descended into; subdirectories are visited in name order.
pub fn render_tree(folder: &Utf8Path) -> Result<String, FolderRenderError> {
    let walker = WalkDir::new(folder).sort_by(|a, b| {
        a.file_type()
            .is_dir()
            .cmp(&b.file_type().is_dir())
            .then_with(|| a.file_name().cmp(b.file_name()))
    });

    let mut tree = String::new();

    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(FolderRenderError::Walk {
                    path: folder.to_path_buf(),
                    source: err,
                });
            }
            Err(err) => {
                tracing::warn!("Skipping unreadable entry under {}: {}", folder, err);
                continue;
            }
        };

        let indent = TREE_INDENT.repeat(entry.depth());
        let name = entry.file_name().to_string_lossy();

        if entry.file_type().is_dir() {
            tree.push_str(&format!("{indent}{TREE_BRANCH}{name}/\n"));
        } else if let Some(size) = listed_file_size(&entry) {
            tree.push_str(&format!(
                "{indent}{TREE_BRANCH}{name} ({})\n",
                format_file_size(size)
            ));
        }
    }

    Ok(tree)
}

/// Size to print for a non-directory entry, or `None` if it should not be listed.
///
/// Symlinks are resolved: links to directories are left out (they are not
/// descended either), links to files report the target's size.
fn listed_file_size(entry: &DirEntry) -> Option<u64> {
    match fs::metadata(entry.path()) {
        Ok(meta) if meta.is_dir() => None,
        Ok(meta) => Some(meta.len()),
        Err(err) => {
            tracing::warn!("Skipping {}: {}", entry.path().display(), err);
            None
        }
    }
}

/// Render `folder` and write the result to its sidecar file, overwriting any
/// previous one. Returns the sidecar path.
pub fn write_structure_file(folder: &Utf8Path) -> Result<Utf8PathBuf, FolderRenderError> {
    // Resolve the target first so a root folder fails before any walk
    let sidecar = structure_file_path(folder)?;
    let content = render_folder_structure(folder)?;

    fs::write(&sidecar, content).map_err(|source| FolderRenderError::Write {
        path: sidecar.clone(),
        source,
    })?;

    tracing::info!("Wrote folder structure of {} to {}", folder, sidecar);
    Ok(sidecar)
}
