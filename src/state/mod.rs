// State management module
//
// This module provides the StateManager which wraps AppState with thread-safe access
// using Arc<RwLock<T>> and emits change events for GUI updates.

use crate::models::{AppState, EntryId, EntryKind, UserConfig};
use camino::Utf8PathBuf;
use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;

/// Change events emitted when state is modified
///
/// The UI shell drains these after every command and re-renders only from
/// state; it never writes to the list widget on its own.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectionChange {
    /// New entries were appended to the selection
    EntriesAdded { count: usize, total: usize },

    /// Entries were removed from a non-empty selection
    EntriesRemoved { count: usize, total: usize },

    /// The selection went from non-empty to empty
    SelectionCleared,

    /// An already selected structure sidecar was written again
    StructureRegenerated { path: Utf8PathBuf },

    /// Settings have been updated
    SettingsChanged,

    /// The combined content was written to disk
    ExportCompleted { path: Utf8PathBuf },
}

impl SelectionChange {
    /// Whether the preview text is stale after this change
    pub fn affects_preview(&self) -> bool {
        !matches!(self, SelectionChange::ExportCompleted { .. })
    }
}

/// Thread-safe state manager with event emission
///
/// - [`read()`](Self::read) for reading state
/// - [`update()`](Self::update) for mutations with automatic event emission
/// - [`subscribe()`](Self::subscribe) for listening to state changes
pub struct StateManager {
    /// The application state protected by RwLock
    state: Arc<RwLock<AppState>>,

    /// Broadcast channel for emitting state change events
    state_tx: broadcast::Sender<SelectionChange>,
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl StateManager {
    /// Create a new StateManager with an empty selection and default settings
    ///
    /// The broadcast channel buffers 100 events.
    pub fn new() -> Self {
        let (state_tx, _) = broadcast::channel(100);
        Self {
            state: Arc::new(RwLock::new(AppState::default())),
            state_tx,
        }
    }

    /// Get a cloned snapshot of the current state
    pub fn snapshot(&self) -> AppState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Execute a function with read access to the state
    ///
    /// # Example
    /// ```ignore
    /// let count = state_manager.read(|state| state.selection.len());
    /// ```
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&AppState) -> R,
    {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    /// Update the state and emit change events
    ///
    /// Captures the old state, applies `update_fn`, diffs the two and sends one
    /// event per detected change. Returns the emitted events.
    pub fn update<F>(&self, update_fn: F) -> Vec<SelectionChange>
    where
        F: FnOnce(&mut AppState),
    {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let old_state = state.clone();

        update_fn(&mut state);

        let changes = Self::detect_changes(&old_state, &state);
        for change in &changes {
            self.emit(change.clone());
        }

        changes
    }

    /// Subscribe to state change events
    pub fn subscribe(&self) -> broadcast::Receiver<SelectionChange> {
        self.state_tx.subscribe()
    }

    fn emit(&self, change: SelectionChange) {
        // No subscriber is fine
        let _ = self.state_tx.send(change);
    }

    fn detect_changes(old: &AppState, new: &AppState) -> Vec<SelectionChange> {
        let mut changes = Vec::new();

        let old_ids: HashSet<EntryId> = old.selection.iter().map(|e| e.id).collect();
        let new_ids: HashSet<EntryId> = new.selection.iter().map(|e| e.id).collect();
        let removed = old_ids.difference(&new_ids).count();
        let added = new_ids.difference(&old_ids).count();

        if removed > 0 {
            if new.selection.is_empty() && added == 0 {
                changes.push(SelectionChange::SelectionCleared);
            } else {
                changes.push(SelectionChange::EntriesRemoved {
                    count: removed,
                    total: new.selection.len(),
                });
            }
        }

        if added > 0 {
            changes.push(SelectionChange::EntriesAdded {
                count: added,
                total: new.selection.len(),
            });
        }

        if old.settings != new.settings {
            changes.push(SelectionChange::SettingsChanged);
        }

        if old.last_export_path != new.last_export_path {
            if let Some(path) = &new.last_export_path {
                changes.push(SelectionChange::ExportCompleted { path: path.clone() });
            }
        }

        changes
    }

    // Convenience methods for common state updates

    /// Append files in order, skipping paths that are already selected
    pub fn add_files<I>(&self, paths: I) -> Vec<SelectionChange>
    where
        I: IntoIterator<Item = Utf8PathBuf>,
    {
        self.update(|state| {
            for path in paths {
                if state.selection.push(path.clone(), EntryKind::File).is_none() {
                    tracing::debug!("Skipping already selected file: {}", path);
                }
            }
        })
    }

    /// Select a freshly written structure sidecar for `source_folder`
    ///
    /// If the sidecar is already selected no entry is added, but a
    /// [`SelectionChange::StructureRegenerated`] event tells the UI to re-render.
    /// A sidecar that was picked earlier as a plain file becomes a structure entry.
    pub fn add_structure(
        &self,
        sidecar: Utf8PathBuf,
        source_folder: Utf8PathBuf,
    ) -> Vec<SelectionChange> {
        let mut changes = self.update(|state| {
            if !state.selection.mark_structure(&sidecar, source_folder.clone()) {
                state
                    .selection
                    .push(sidecar.clone(), EntryKind::Structure { source_folder });
            }
        });

        if changes.is_empty() {
            let event = SelectionChange::StructureRegenerated { path: sidecar };
            self.emit(event.clone());
            changes.push(event);
        }

        changes
    }

    /// Remove the entries shown at the given list rows; rows past the end are ignored
    pub fn remove_rows(&self, rows: &[usize]) -> Vec<SelectionChange> {
        self.update(|state| {
            let ids: Vec<EntryId> = rows
                .iter()
                .filter_map(|&row| state.selection.id_at(row))
                .collect();
            state.selection.remove_ids(&ids);
        })
    }

    /// Empty the selection
    pub fn clear(&self) -> Vec<SelectionChange> {
        self.update(|state| state.selection.clear())
    }

    /// Remember a successful export
    pub fn record_export(&self, path: Utf8PathBuf) -> Vec<SelectionChange> {
        let mut changes = self.update(|state| {
            state.last_export_path = Some(path.clone());
        });

        // Exporting to the same path twice still reports completion
        if changes.is_empty() {
            let event = SelectionChange::ExportCompleted { path };
            self.emit(event.clone());
            changes.push(event);
        }

        changes
    }

    /// Load settings from UserConfig
    pub fn load_from_user_config(&self, user_config: &UserConfig) -> Vec<SelectionChange> {
        self.update(|state| {
            state.settings = user_config.collector_settings.clone();

            tracing::info!(
                "Loaded user config: preview_lines={}, extensions={}, debug={}",
                state.settings.preview_lines,
                state.settings.code_extensions.len(),
                state.settings.debug_mode
            );
        })
    }
}
