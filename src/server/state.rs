//! Application state shared across all request handlers.
//!
//! The state is built once during startup and cloned into each handler through axum's
//! state extraction. Every field is cheap to clone and clones share the same underlying
//! resources.

use tokio_util::task::TaskTracker;

use crate::server::service::clear::ClearCommand;

/// Application state containing shared resources and dependencies.
#[derive(Clone)]
pub struct AppState {
    /// Handler for `/clear`, holding the Discord client and run pacing.
    pub clear: ClearCommand,

    /// Registry of background clear runs.
    ///
    /// Shutdown closes the tracker and waits for it so runs in progress are not cut off.
    pub tasks: TaskTracker,
}

impl AppState {
    /// Creates a new application state with the provided dependencies.
    ///
    /// # Arguments
    /// - `clear` - The `/clear` command handler
    /// - `tasks` - Tracker the command spawns its runs on
    ///
    /// # Returns
    /// - `AppState` - Initialized application state ready for use
    pub fn new(clear: ClearCommand, tasks: TaskTracker) -> Self {
        Self { clear, tasks }
    }
}
