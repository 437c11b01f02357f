// Command table
//
// Each button of the main window maps to one `UserCommand`. `execute` runs
// the command against the state manager and the dialog collaborators and
// reports problems to the user; it never touches the window itself.

use crate::services::{ExportError, combine, folder_structure};
use crate::state::{SelectionChange, StateManager};
use crate::ui::dialogs::{Dialogs, NoticeLevel};

/// Warning shown when exporting with nothing selected
pub const NOTHING_TO_EXPORT: &str = "No files selected to export.";

/// One user action from the main window
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    AddFiles,
    AddFolder,
    /// Rows of the list widget, in selection order
    RemoveSelected(Vec<usize>),
    ClearAll,
    Export,
}

/// Result of running a [`UserCommand`]
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// A picker was dismissed; nothing happened
    Cancelled,

    /// The command ran; these are the state changes it produced
    Applied(Vec<SelectionChange>),

    /// The command was refused or failed; the user has been notified
    Failed(String),
}

/// Run `command` against `state`, using `dialogs` for pickers and messages
pub fn execute(command: UserCommand, state: &StateManager, dialogs: &dyn Dialogs) -> CommandOutcome {
    tracing::debug!("Executing command: {:?}", command);

    match command {
        UserCommand::AddFiles => add_files(state, dialogs),
        UserCommand::AddFolder => add_folder(state, dialogs),
        UserCommand::RemoveSelected(rows) => CommandOutcome::Applied(state.remove_rows(&rows)),
        UserCommand::ClearAll => CommandOutcome::Applied(state.clear()),
        UserCommand::Export => export(state, dialogs),
    }
}

fn add_files(state: &StateManager, dialogs: &dyn Dialogs) -> CommandOutcome {
    let extensions = state.read(|s| s.settings.code_extensions.clone());
    let picked = dialogs.pick_files(&extensions);

    if picked.is_empty() {
        return CommandOutcome::Cancelled;
    }

    tracing::info!("Adding {} picked file(s)", picked.len());
    CommandOutcome::Applied(state.add_files(picked))
}

fn add_folder(state: &StateManager, dialogs: &dyn Dialogs) -> CommandOutcome {
    let Some(folder) = dialogs.pick_folder() else {
        return CommandOutcome::Cancelled;
    };

    match folder_structure::write_structure_file(&folder) {
        Ok(sidecar) => CommandOutcome::Applied(state.add_structure(sidecar, folder)),
        Err(e) => {
            tracing::error!("Failed to add folder structure for {}: {}", folder, e);
            let message = format!("Failed to add folder structure: {e}");
            dialogs.notify(NoticeLevel::Error, "Error", &message);
            CommandOutcome::Failed(message)
        }
    }
}

fn export(state: &StateManager, dialogs: &dyn Dialogs) -> CommandOutcome {
    if !state.read(|s| s.has_selection()) {
        dialogs.notify(NoticeLevel::Warning, "Warning", NOTHING_TO_EXPORT);
        return CommandOutcome::Failed(NOTHING_TO_EXPORT.to_string());
    }

    let Some(target) = dialogs.pick_save_target() else {
        return CommandOutcome::Cancelled;
    };

    // Render from a snapshot so the lock is not held during file I/O
    let selection = state.read(|s| s.selection.clone());

    match combine::export(&selection, &target) {
        Ok(_) => {
            let changes = state.record_export(target.clone());
            dialogs.notify(
                NoticeLevel::Info,
                "Success",
                &format!("Combined code exported to:\n{target}"),
            );
            CommandOutcome::Applied(changes)
        }
        Err(ExportError::EmptySelection) => {
            dialogs.notify(NoticeLevel::Warning, "Warning", NOTHING_TO_EXPORT);
            CommandOutcome::Failed(NOTHING_TO_EXPORT.to_string())
        }
        Err(e) => {
            tracing::error!("Export failed: {}", e);
            let message = format!("Failed to export: {e}");
            dialogs.notify(NoticeLevel::Error, "Error", &message);
            CommandOutcome::Failed(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::dialogs::MockDialogs;
    use camino::Utf8PathBuf;
    use std::fs;
    use tempfile::TempDir;

    fn utf8_temp_dir() -> (TempDir, Utf8PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        (temp_dir, path)
    }

    #[test]
    fn test_add_files_passes_configured_extensions() {
        let state = StateManager::new();
        let mut dialogs = MockDialogs::new();
        dialogs
            .expect_pick_files()
            .withf(|extensions| extensions.iter().any(|e| e == "swift"))
            .times(1)
            .returning(|_| vec!["/a.py".into(), "/b.py".into(), "/a.py".into()]);

        let outcome = execute(UserCommand::AddFiles, &state, &dialogs);

        assert_eq!(
            outcome,
            CommandOutcome::Applied(vec![SelectionChange::EntriesAdded { count: 2, total: 2 }])
        );
    }

    #[test]
    fn test_cancelled_pickers_are_noops() {
        let state = StateManager::new();
        let mut dialogs = MockDialogs::new();
        dialogs.expect_pick_files().returning(|_| Vec::new());
        dialogs.expect_pick_folder().returning(|| None);
        dialogs.expect_notify().never();

        assert_eq!(execute(UserCommand::AddFiles, &state, &dialogs), CommandOutcome::Cancelled);
        assert_eq!(execute(UserCommand::AddFolder, &state, &dialogs), CommandOutcome::Cancelled);
        assert!(state.read(|s| s.selection.is_empty()));
    }

    #[test]
    fn test_add_folder_selects_sidecar() {
        let (_temp_dir, root) = utf8_temp_dir();
        let folder = root.join("proj");
        fs::create_dir(&folder).unwrap();
        fs::write(folder.join("main.rs"), "fn main() {}\n").unwrap();

        let state = StateManager::new();
        let mut dialogs = MockDialogs::new();
        let picked = folder.clone();
        dialogs.expect_pick_folder().returning(move || Some(picked.clone()));

        let outcome = execute(UserCommand::AddFolder, &state, &dialogs);

        assert!(matches!(outcome, CommandOutcome::Applied(_)));
        let entry = state.read(|s| s.selection.iter().next().cloned()).unwrap();
        assert!(entry.is_structure());
        assert_eq!(entry.path, root.join(".proj_structure.txt"));
        assert!(entry.path.exists());
    }

    #[test]
    fn test_add_folder_failure_is_reported_and_session_continues() {
        let (_temp_dir, root) = utf8_temp_dir();
        let missing = root.join("missing");

        let state = StateManager::new();
        state.add_files(vec![root.join("kept.py")]);

        let mut dialogs = MockDialogs::new();
        dialogs.expect_pick_folder().returning(move || Some(missing.clone()));
        dialogs
            .expect_notify()
            .withf(|level, title, message| {
                *level == NoticeLevel::Error
                    && title == "Error"
                    && message.starts_with("Failed to add folder structure: Folder not found")
            })
            .times(1)
            .return_const(());

        let outcome = execute(UserCommand::AddFolder, &state, &dialogs);

        assert!(matches!(outcome, CommandOutcome::Failed(_)));
        assert_eq!(state.read(|s| s.selection.len()), 1);
    }

    #[test]
    fn test_export_with_empty_selection_warns_without_picker() {
        let state = StateManager::new();
        let mut dialogs = MockDialogs::new();
        dialogs.expect_pick_save_target().never();
        dialogs
            .expect_notify()
            .withf(|level, title, message| {
                *level == NoticeLevel::Warning && title == "Warning" && message == NOTHING_TO_EXPORT
            })
            .times(1)
            .return_const(());

        let outcome = execute(UserCommand::Export, &state, &dialogs);
        assert_eq!(outcome, CommandOutcome::Failed(NOTHING_TO_EXPORT.to_string()));
    }

    #[test]
    fn test_export_writes_file_and_reports_success() {
        let (_temp_dir, root) = utf8_temp_dir();
        let source = root.join("file1.py");
        fs::write(&source, "x\n").unwrap();
        let output = root.join("combined.txt");

        let state = StateManager::new();
        state.add_files(vec![source.clone()]);

        let mut dialogs = MockDialogs::new();
        let target = output.clone();
        dialogs
            .expect_pick_save_target()
            .returning(move || Some(target.clone()));
        dialogs
            .expect_notify()
            .withf(|level, title, message| {
                *level == NoticeLevel::Info
                    && title == "Success"
                    && message.starts_with("Combined code exported to:\n")
            })
            .times(1)
            .return_const(());

        let outcome = execute(UserCommand::Export, &state, &dialogs);

        assert_eq!(
            outcome,
            CommandOutcome::Applied(vec![SelectionChange::ExportCompleted {
                path: output.clone()
            }])
        );
        assert_eq!(fs::read_to_string(&output).unwrap(), format!("{source}\nx\n\n\n"));
        assert_eq!(state.read(|s| s.last_export_path.clone()), Some(output));
    }

    #[test]
    fn test_export_write_failure_is_reported() {
        let (_temp_dir, root) = utf8_temp_dir();
        let source = root.join("file1.py");
        fs::write(&source, "x\n").unwrap();

        let state = StateManager::new();
        state.add_files(vec![source]);

        let mut dialogs = MockDialogs::new();
        let target = root.join("missing_dir").join("out.txt");
        dialogs
            .expect_pick_save_target()
            .returning(move || Some(target.clone()));
        dialogs
            .expect_notify()
            .withf(|level, _, message| {
                *level == NoticeLevel::Error && message.starts_with("Failed to export: ")
            })
            .times(1)
            .return_const(());

        let outcome = execute(UserCommand::Export, &state, &dialogs);

        assert!(matches!(outcome, CommandOutcome::Failed(_)));
        assert!(state.read(|s| s.last_export_path.is_none()));
    }

    #[test]
    fn test_remove_and_clear() {
        let state = StateManager::new();
        state.add_files(vec!["/a".into(), "/b".into()]);
        let dialogs = MockDialogs::new();

        let outcome = execute(UserCommand::RemoveSelected(vec![0]), &state, &dialogs);
        assert_eq!(
            outcome,
            CommandOutcome::Applied(vec![SelectionChange::EntriesRemoved { count: 1, total: 1 }])
        );
        assert_eq!(state.read(|s| s.selection.paths()), vec![Utf8PathBuf::from("/b")]);

        let outcome = execute(UserCommand::ClearAll, &state, &dialogs);
        assert_eq!(
            outcome,
            CommandOutcome::Applied(vec![SelectionChange::SelectionCleared])
        );
    }
}
