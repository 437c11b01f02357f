// Native dialogs
//
// Pickers and message boxes are behind the `Dialogs` trait so the command
// layer can be driven by a mock in tests. `NativeDialogs` is the `rfd`-backed
// implementation used by the running application.

use camino::Utf8PathBuf;
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};
use std::path::PathBuf;

/// Severity of a user notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// External collaborators the commands talk to
///
/// Every method blocks until the user has answered. Cancelling a picker is
/// reported as an empty result, never as an error.
#[cfg_attr(test, mockall::automock)]
pub trait Dialogs {
    /// Multi-select file chooser filtered to `extensions`
    fn pick_files(&self, extensions: &[String]) -> Vec<Utf8PathBuf>;

    /// Single directory chooser
    fn pick_folder(&self) -> Option<Utf8PathBuf>;

    /// Save target chooser filtered to text files
    fn pick_save_target(&self) -> Option<Utf8PathBuf>;

    /// Modal message with a title and body
    fn notify(&self, level: NoticeLevel, title: &str, message: &str);
}

/// [`Dialogs`] implementation using native dialogs from the `rfd` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeDialogs;

impl Dialogs for NativeDialogs {
    fn pick_files(&self, extensions: &[String]) -> Vec<Utf8PathBuf> {
        FileDialog::new()
            .set_title("Add Files")
            .add_filter("Code Files", extensions)
            .pick_files()
            .unwrap_or_default()
            .into_iter()
            .filter_map(to_utf8)
            .collect()
    }

    fn pick_folder(&self) -> Option<Utf8PathBuf> {
        FileDialog::new()
            .set_title("Select Folder")
            .pick_folder()
            .and_then(to_utf8)
    }

    fn pick_save_target(&self) -> Option<Utf8PathBuf> {
        FileDialog::new()
            .set_title("Save Combined Code")
            .add_filter("Text Files", &["txt"])
            .save_file()
            .and_then(to_utf8)
    }

    fn notify(&self, level: NoticeLevel, title: &str, message: &str) {
        let level = match level {
            NoticeLevel::Info => MessageLevel::Info,
            NoticeLevel::Warning => MessageLevel::Warning,
            NoticeLevel::Error => MessageLevel::Error,
        };

        MessageDialog::new()
            .set_level(level)
            .set_title(title)
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show();
    }
}

fn to_utf8(path: PathBuf) -> Option<Utf8PathBuf> {
    Utf8PathBuf::try_from(path)
        .map_err(|e| {
            tracing::error!("Failed to convert path to UTF-8: {}", e);
            e
        })
        .ok()
}
