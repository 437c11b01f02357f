// UI module - window wiring and user-facing collaborators
//
// This module contains:
// - commands: one command per button, executed against the StateManager
// - dialogs: file/folder/save pickers and message boxes behind a trait
// - controller: GuiController, which connects the Slint window to the commands

pub mod commands;
pub mod controller;
pub mod dialogs;

pub use commands::{CommandOutcome, UserCommand, execute};
pub use controller::GuiController;
pub use dialogs::{Dialogs, NativeDialogs, NoticeLevel};
