use super::config::CollectorSettings;
use super::selection::Selection;
use camino::Utf8PathBuf;

/// Single source of truth for the running session.
///
/// # Thread Safety
///
/// `AppState` is wrapped in `Arc<RwLock<AppState>>` by [`crate::state::StateManager`].
/// Never mutate it directly - go through [`StateManager`](crate::state::StateManager)
/// so that the UI receives a [`crate::state::SelectionChange`] for every mutation.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    /// Entries staged for combination, in list order
    pub selection: Selection,

    /// Settings loaded from the user config
    pub settings: CollectorSettings,

    /// Destination of the most recent successful export
    pub last_export_path: Option<Utf8PathBuf>,
}

impl AppState {
    /// Preview line limit, `None` when truncation is disabled
    pub fn preview_limit(&self) -> Option<usize> {
        self.settings.preview_limit()
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }
}
