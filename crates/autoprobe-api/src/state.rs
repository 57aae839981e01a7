//! Application state.

use std::path::PathBuf;
use std::sync::Arc;

use autoprobe_runtime::SessionController;

/// State shared across handlers.
pub struct AppState {
    pub controller: Arc<SessionController>,
    /// Used when `/init` does not name a root directory.
    pub default_root_dir: PathBuf,
}

impl AppState {
    pub fn new(controller: Arc<SessionController>, default_root_dir: impl Into<PathBuf>) -> Self {
        Self {
            controller,
            default_root_dir: default_root_dir.into(),
        }
    }
}
