//! Combined preview and export of the selection.
//!
//! Every entry becomes one block: the header line, the file's text (optionally
//! cut to the first N lines), then a blank separator:
//!
//! ```text
//! /src/main.rs
//! fn main() {}
//!
//!
//! ```

use crate::models::{Selection, SelectionEntry};
use camino::{Utf8Path, Utf8PathBuf};
use std::borrow::Cow;
use std::fs;
use std::io::{self, Write};
use tempfile::Builder;
use thiserror::Error;

/// Preview text shown when nothing is selected
pub const NO_FILES_SELECTED: &str = "No files selected.";

/// Errors that can occur while exporting the combined content
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No files selected to export.")]
    EmptySelection,

    #[error("{path}: {source}")]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Render the truncated preview of the selection.
///
/// Returns [`NO_FILES_SELECTED`] for an empty selection.
pub fn render_preview(selection: &Selection, max_lines: Option<usize>) -> String {
    if selection.is_empty() {
        return NO_FILES_SELECTED.to_string();
    }
    render_combined(selection.iter(), max_lines)
}

/// Concatenate the given entries into blocks.
///
/// Structure entries are never truncated. A file that cannot be read is
/// replaced by an inline error line and the remaining entries still render.
pub fn render_combined<'a, I>(entries: I, max_lines: Option<usize>) -> String
where
    I: IntoIterator<Item = &'a SelectionEntry>,
{
    let mut combined = String::new();

    for entry in entries {
        combined.push_str(&entry.header_label());
        combined.push('\n');

        match read_text(&entry.path) {
            Ok(text) => {
                let limit = if entry.is_structure() { None } else { max_lines };
                combined.push_str(&truncate_lines(&text, limit));
                combined.push_str("\n\n");
            }
            Err(err) => {
                tracing::warn!("Error reading {}: {}", entry.path, err);
                combined.push_str(&format!("Error reading file: {err}\n\n"));
            }
        }
    }

    combined
}

/// Keep the first `max_lines` lines of `text` and append a summary of how
/// many were dropped. `None` or `Some(0)` keeps everything.
pub fn truncate_lines(text: &str, max_lines: Option<usize>) -> Cow<'_, str> {
    let Some(limit) = max_lines.filter(|&n| n > 0) else {
        return Cow::Borrowed(text);
    };

    let total = text.split_inclusive('\n').count();
    if total <= limit {
        return Cow::Borrowed(text);
    }

    let kept: String = text.split_inclusive('\n').take(limit).collect();
    Cow::Owned(format!("{kept}\n... ({} more lines) ...\n", total - limit))
}

/// Read a file as UTF-8 with `\r\n` and lone `\r` turned into `\n`
fn read_text(path: &Utf8Path) -> io::Result<String> {
    let text = fs::read_to_string(path)?;
    if text.contains('\r') {
        Ok(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Ok(text)
    }
}

/// Write the full, untruncated combination of the selection to `output`.
///
/// The content is written to a temporary file in the destination directory
/// and renamed over `output`, so a failure leaves any existing file intact.
/// Returns the number of bytes written.
pub fn export(selection: &Selection, output: &Utf8Path) -> Result<usize, ExportError> {
    if selection.is_empty() {
        return Err(ExportError::EmptySelection);
    }

    let content = render_combined(selection.iter(), None);
    write_atomically(output, content.as_bytes()).map_err(|source| ExportError::Write {
        path: output.to_path_buf(),
        source,
    })?;

    tracing::info!(
        "Exported {} entries ({} bytes) to {}",
        selection.len(),
        content.len(),
        output
    );
    Ok(content.len())
}

fn write_atomically(output: &Utf8Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };

    // A replaced file keeps its mode
    let existing = fs::metadata(output)
        .ok()
        .filter(|meta| meta.is_file())
        .map(|meta| meta.permissions());

    let mut temp = temp_file_builder().tempfile_in(dir)?;
    temp.write_all(bytes)?;
    if let Some(permissions) = existing {
        temp.as_file().set_permissions(permissions)?;
    }
    temp.as_file().sync_all()?;
    temp.persist(output).map_err(|err| err.error)?;

    Ok(())
}

/// Temp files default to 0600; new exports get 0644 minus the umask instead
#[cfg(unix)]
fn temp_file_builder() -> Builder<'static, 'static> {
    use std::os::unix::fs::PermissionsExt;

    let mut builder = Builder::new();
    builder.permissions(fs::Permissions::from_mode(0o644));
    builder
}

#[cfg(not(unix))]
fn temp_file_builder() -> Builder<'static, 'static> {
    Builder::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryKind;
    use tempfile::TempDir;

    fn utf8_temp_dir() -> (TempDir, Utf8PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        (temp_dir, path)
    }

    fn numbered_lines(count: usize) -> String {
        (1..=count).map(|i| format!("line {i}\n")).collect()
    }

    #[test]
    fn test_truncate_keeps_head_and_reports_omitted() {
        let text = numbered_lines(15);
        let truncated = truncate_lines(&text, Some(10));
        assert_eq!(
            truncated,
            format!("{}\n... (5 more lines) ...\n", numbered_lines(10))
        );
    }

    #[test]
    fn test_truncate_is_verbatim_at_or_under_limit() {
        let text = numbered_lines(10);
        assert_eq!(truncate_lines(&text, Some(10)), text.as_str());
        assert_eq!(truncate_lines(&text, Some(50)), text.as_str());
        assert_eq!(truncate_lines(&text, None), text.as_str());
        assert_eq!(truncate_lines(&text, Some(0)), text.as_str());
    }

    #[test]
    fn test_truncate_counts_last_line_without_newline() {
        let truncated = truncate_lines("a\nb\nc", Some(2));
        assert_eq!(truncated, "a\nb\n\n... (1 more lines) ...\n");
    }

    #[test]
    fn test_empty_selection_preview() {
        assert_eq!(render_preview(&Selection::new(), Some(10)), "No files selected.");
    }

    #[test]
    fn test_read_failure_is_inlined_and_rendering_continues() {
        let (_temp_dir, root) = utf8_temp_dir();
        let good = root.join("good.py");
        fs::write(&good, "ok\n").unwrap();

        let mut selection = Selection::new();
        selection.push(root.join("missing.py"), EntryKind::File);
        selection.push(good.clone(), EntryKind::File);

        let preview = render_preview(&selection, Some(10));
        let missing_header = format!("{}\nError reading file: ", root.join("missing.py"));
        assert!(preview.starts_with(&missing_header));
        assert!(preview.ends_with(&format!("{good}\nok\n\n\n")));
    }

    #[test]
    fn test_structure_entries_are_never_truncated() {
        let (_temp_dir, root) = utf8_temp_dir();
        let sidecar = root.join(".proj_structure.txt");
        let text = numbered_lines(30);
        fs::write(&sidecar, &text).unwrap();

        let mut selection = Selection::new();
        selection.push(
            sidecar,
            EntryKind::Structure {
                source_folder: root.join("proj"),
            },
        );

        let preview = render_preview(&selection, Some(10));
        assert_eq!(preview, format!("FOLDER STRUCTURE: proj\n{text}\n\n"));
    }

    #[test]
    fn test_crlf_is_normalized() {
        let (_temp_dir, root) = utf8_temp_dir();
        let file = root.join("win.c");
        fs::write(&file, "a\r\nb\r\n").unwrap();

        let mut selection = Selection::new();
        selection.push(file.clone(), EntryKind::File);

        assert_eq!(render_preview(&selection, None), format!("{file}\na\nb\n\n\n"));
    }

    #[test]
    fn test_export_empty_selection_writes_nothing() {
        let (_temp_dir, root) = utf8_temp_dir();
        let output = root.join("out.txt");

        let result = export(&Selection::new(), &output);

        assert!(matches!(result, Err(ExportError::EmptySelection)));
        assert!(!output.exists());
    }

    #[test]
    fn test_export_write_failure_is_reported() {
        let (_temp_dir, root) = utf8_temp_dir();
        let file = root.join("a.py");
        fs::write(&file, "x\n").unwrap();
        let mut selection = Selection::new();
        selection.push(file, EntryKind::File);

        // Destination directory does not exist, so the temp file cannot be created
        let output = root.join("no_such_dir").join("out.txt");
        let result = export(&selection, &output);

        assert!(matches!(result, Err(ExportError::Write { .. })));
        assert!(!output.exists());
    }

    #[test]
    fn test_export_replaces_existing_file() {
        let (_temp_dir, root) = utf8_temp_dir();
        let file = root.join("a.py");
        fs::write(&file, "x\n").unwrap();
        let mut selection = Selection::new();
        selection.push(file.clone(), EntryKind::File);

        let output = root.join("out.txt");
        fs::write(&output, "previous export").unwrap();

        let written = export(&selection, &output).unwrap();

        let content = fs::read_to_string(&output).unwrap();
        assert_eq!(content, format!("{file}\nx\n\n\n"));
        assert_eq!(written, content.len());
    }

    #[test]
    fn test_failed_export_keeps_existing_target() {
        let (_temp_dir, root) = utf8_temp_dir();
        let file = root.join("a.py");
        fs::write(&file, "x\n").unwrap();
        let mut selection = Selection::new();
        selection.push(file, EntryKind::File);

        // A non-empty directory cannot be replaced by a file
        let output = root.join("out.txt");
        fs::create_dir(&output).unwrap();
        fs::write(output.join("keep.txt"), "previous").unwrap();

        let result = export(&selection, &output);

        assert!(matches!(result, Err(ExportError::Write { .. })));
        assert!(output.is_dir());
        assert_eq!(fs::read_to_string(output.join("keep.txt")).unwrap(), "previous");

        let mut names: Vec<String> = fs::read_dir(&root)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.py", "out.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_export_keeps_mode_of_replaced_file() {
        use std::os::unix::fs::PermissionsExt;

        let (_temp_dir, root) = utf8_temp_dir();
        let file = root.join("a.py");
        fs::write(&file, "x\n").unwrap();
        let mut selection = Selection::new();
        selection.push(file, EntryKind::File);

        let output = root.join("out.txt");
        fs::write(&output, "previous export").unwrap();
        fs::set_permissions(&output, fs::Permissions::from_mode(0o640)).unwrap();

        export(&selection, &output).unwrap();

        let mode = fs::metadata(&output).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn test_new_export_follows_umask() {
        use std::os::unix::fs::PermissionsExt;

        let (_temp_dir, root) = utf8_temp_dir();
        let file = root.join("a.py");
        fs::write(&file, "x\n").unwrap();
        let mut selection = Selection::new();
        selection.push(file.clone(), EntryKind::File);

        // fs::write creates with 0666 minus the umask
        let umask_mode = fs::metadata(&file).unwrap().permissions().mode() & 0o777;

        let output = root.join("new.txt");
        export(&selection, &output).unwrap();

        let mode = fs::metadata(&output).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644 & umask_mode);
    }
}
