//! Data models for the Code Collector application.
//!
//! - [`AppState`]: The session state (selection list plus loaded settings)
//! - [`Selection`]: Ordered, duplicate-free list of [`SelectionEntry`] values keyed by [`EntryId`]
//! - [`UserConfig`]: User preferences loaded from `CodeCollector Config.yaml`
//!
//! State updates go through [`StateManager`](crate::state::StateManager) so the
//! UI is notified of every change.

pub mod app_state;
pub mod config;
pub mod selection;

pub use app_state::AppState;
pub use config::{CollectorSettings, DEFAULT_CODE_EXTENSIONS, DEFAULT_PREVIEW_LINES, UserConfig};
pub use selection::{EntryId, EntryKind, Selection, SelectionEntry};
