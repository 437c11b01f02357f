//! Code Collector - main entry point for the GUI application.
//!
//! # Execution Flow
//!
//! 1. Load `CodeCollector Data/CodeCollector Config.yaml` (defaults if missing)
//! 2. Initialize logging → logs/codecollector.<date>
//! 3. Create the StateManager and load settings into it
//! 4. Create the GuiController (wires the Slint window to the command table)
//! 5. Run the Slint event loop (blocks until the window is closed)

use anyhow::Result;
use codecollector::ui::GuiController;
use codecollector::{APP_NAME, CONFIG_DIR, ConfigManager, LOG_DIR, StateManager, VERSION};
use std::sync::Arc;

fn main() -> Result<()> {
    let config_manager = ConfigManager::new(CONFIG_DIR)?;
    let user_config = config_manager.load_user_config()?;
    let settings = &user_config.collector_settings;

    // Held until exit so buffered log lines are flushed
    let _log_guard = codecollector::logging::setup_logging(
        LOG_DIR,
        APP_NAME,
        settings.debug_mode,
        settings.console_logging,
    )?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);
    tracing::info!("Using config {}", config_manager.user_config_path());

    let state_manager = Arc::new(StateManager::new());
    state_manager.load_from_user_config(&user_config);

    let gui_controller = GuiController::new(Arc::clone(&state_manager))?;

    tracing::info!("GUI controller initialized, launching window");
    let result = gui_controller.run();

    tracing::info!("Application shutdown complete");

    result.map_err(|e| {
        tracing::error!("GUI error: {}", e);
        anyhow::anyhow!("GUI error: {}", e)
    })
}
