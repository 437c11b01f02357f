// GUI Controller - Bridges the Slint window with the command table
//
// The window only raises callbacks. Each callback becomes a `UserCommand`,
// runs through `commands::execute`, and the controller then drains the
// StateManager's change events and re-renders list and preview from state.

use crate::services::combine;
use crate::state::{SelectionChange, StateManager};
use crate::ui::commands::{self, CommandOutcome, UserCommand};
use crate::ui::dialogs::{Dialogs, NativeDialogs};
use anyhow::{Context, Result};
use slint::{ComponentHandle, ModelRc, SharedString, StandardListViewItem, VecModel};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::TryRecvError};

// Include the generated Slint code
slint::include_modules!();

/// GUI Controller that wires the Slint window to the state manager
///
/// # Example
/// ```ignore
/// let state_manager = Arc::new(StateManager::new());
/// let controller = GuiController::new(state_manager)?;
/// controller.run()?; // Blocks until window is closed
/// ```
pub struct GuiController {
    /// The Slint UI window
    ui: MainWindow,

    /// Shared state manager
    state_manager: Arc<StateManager>,
}

/// Everything a window callback needs to run a command
struct CommandContext {
    ui_weak: slint::Weak<MainWindow>,
    state_manager: Arc<StateManager>,
    dialogs: Box<dyn Dialogs>,
    changes: RefCell<broadcast::Receiver<SelectionChange>>,
}

impl GuiController {
    /// Create a new GUI controller using native dialogs
    pub fn new(state_manager: Arc<StateManager>) -> Result<Self> {
        Self::with_dialogs(state_manager, Box::new(NativeDialogs))
    }

    /// Create a new GUI controller with a custom dialog implementation
    pub fn with_dialogs(state_manager: Arc<StateManager>, dialogs: Box<dyn Dialogs>) -> Result<Self> {
        let ui = MainWindow::new().context("Failed to create Slint UI")?;

        let context = Rc::new(CommandContext {
            ui_weak: ui.as_weak(),
            changes: RefCell::new(state_manager.subscribe()),
            state_manager: Arc::clone(&state_manager),
            dialogs,
        });

        Self::sync_ui_with_state(&ui, &state_manager);
        Self::setup_callbacks(&ui, &context);

        tracing::info!("GUI controller initialized");

        Ok(Self { ui, state_manager })
    }

    /// Run the GUI (blocks until window is closed)
    pub fn run(self) -> Result<(), slint::PlatformError> {
        tracing::info!("Starting GUI event loop");
        let result = self.ui.run();
        tracing::info!(
            "GUI event loop finished with {} selected entries",
            self.state_manager.read(|s| s.selection.len())
        );
        result
    }

    /// Render list and preview from the current state
    fn sync_ui_with_state(ui: &MainWindow, state_manager: &StateManager) {
        let state = state_manager.snapshot();

        let items: Vec<StandardListViewItem> = state
            .selection
            .iter()
            .map(|entry| StandardListViewItem::from(entry.list_label().as_str()))
            .collect();
        ui.set_entries(ModelRc::new(VecModel::from(items)));
        ui.set_selected_index(-1);

        let preview = combine::render_preview(&state.selection, state.preview_limit());
        ui.set_preview_text(SharedString::from(preview));

        tracing::debug!("UI synchronized with {} entries", state.selection.len());
    }

    /// Connect window callbacks to the command table
    fn setup_callbacks(ui: &MainWindow, context: &Rc<CommandContext>) {
        let ctx = Rc::clone(context);
        ui.on_add_files(move || ctx.run(UserCommand::AddFiles));

        let ctx = Rc::clone(context);
        ui.on_add_folder(move || ctx.run(UserCommand::AddFolder));

        let ctx = Rc::clone(context);
        ui.on_remove_selected(move |row| {
            let Ok(row) = usize::try_from(row) else {
                return;
            };
            ctx.run(UserCommand::RemoveSelected(vec![row]));
        });

        let ctx = Rc::clone(context);
        ui.on_clear_all(move || ctx.run(UserCommand::ClearAll));

        let ctx = Rc::clone(context);
        ui.on_export_combined(move || ctx.run(UserCommand::Export));
    }
}

impl CommandContext {
    fn run(&self, command: UserCommand) {
        let outcome = commands::execute(command, &self.state_manager, self.dialogs.as_ref());

        let Some(ui) = self.ui_weak.upgrade() else {
            return;
        };

        let needs_render = self.drain_changes();
        if needs_render {
            GuiController::sync_ui_with_state(&ui, &self.state_manager);
        }

        let status = match &outcome {
            CommandOutcome::Cancelled => return,
            CommandOutcome::Failed(message) => message.clone(),
            CommandOutcome::Applied(changes) => Self::status_message(changes, &self.state_manager),
        };
        ui.set_status_message(SharedString::from(status));
    }

    /// Consume pending change events; true if the view must be re-rendered
    fn drain_changes(&self) -> bool {
        let mut changes = self.changes.borrow_mut();
        let mut needs_render = false;

        loop {
            match changes.try_recv() {
                Ok(change) => {
                    tracing::trace!("State change received: {:?}", change);
                    needs_render |= change.affects_preview();
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!("Missed {} state change events, re-rendering", skipped);
                    needs_render = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }

        needs_render
    }

    fn status_message(changes: &[SelectionChange], state_manager: &StateManager) -> String {
        let exported = changes.iter().find_map(|change| match change {
            SelectionChange::ExportCompleted { path } => Some(path),
            _ => None,
        });

        match exported {
            Some(path) => format!("Exported to {path}"),
            None => {
                let count = state_manager.read(|s| s.selection.len());
                format!("{count} selected")
            }
        }
    }
}
