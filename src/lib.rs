// Code Collector - combine source files and folder structures into one text file
//
// This is the library crate containing the selection logic, rendering and export.
// The binary crate (main.rs) provides the GUI entry point.

pub mod config;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;
pub mod ui;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use models::{AppState, EntryId, EntryKind, Selection, SelectionEntry, UserConfig};
pub use state::{SelectionChange, StateManager};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// Directory holding `CodeCollector Config.yaml`
pub const CONFIG_DIR: &str = "CodeCollector Data";

/// Directory for rolling log files
pub const LOG_DIR: &str = "logs";
