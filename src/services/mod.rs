//! Services module - Pure logic for collecting and combining files.
//!
//! The services are **framework-agnostic**: no Slint, no dialogs, only file
//! system work over a [`Selection`](crate::models::Selection).
//!
//! # Components
//!
//! - [`folder_structure`]: Renders a directory tree to text and writes it to a
//!   sidecar file so a folder can be selected like a file.
//! - [`combine`]: Builds the per-entry blocks used by the preview and the
//!   export, and writes exports atomically.
//!
//! # Usage Example
//!
//! ```ignore
//! use codecollector::services::{combine, folder_structure};
//!
//! let sidecar = folder_structure::write_structure_file("/work/project".into())?;
//! let preview = combine::render_preview(&selection, Some(10));
//! combine::export(&selection, "/tmp/combined.txt".into())?;
//! ```

pub mod combine;
pub mod folder_structure;

pub use combine::{ExportError, NO_FILES_SELECTED, export, render_combined, render_preview};
pub use folder_structure::{
    FolderRenderError, format_file_size, render_folder_structure, structure_file_path,
    write_structure_file,
};
