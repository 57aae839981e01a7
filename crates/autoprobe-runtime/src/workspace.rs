//! On-disk layout of one exploration task.
//!
//! ```text
//! <root>/apps/<app>/demos/self_explore_<timestamp>/   task artifacts
//! <root>/apps/<app>/auto_docs/                        element documentation
//! ```

use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Local};

/// Paths for one task.
#[derive(Debug, Clone)]
pub struct TaskWorkspace {
    pub app: String,
    pub task_name: String,
    pub task_dir: PathBuf,
    pub docs_dir: PathBuf,
}

impl TaskWorkspace {
    /// Compute the layout without touching the filesystem.
    pub fn layout(root: &Path, app: &str, started: DateTime<Local>) -> Self {
        let app_dir = root.join("apps").join(app);
        let task_name = format!("self_explore_{}", started.format("%Y-%m-%d_%H-%M-%S"));
        Self {
            app: app.to_string(),
            task_dir: app_dir.join("demos").join(&task_name),
            docs_dir: app_dir.join("auto_docs"),
            task_name,
        }
    }

    /// Create the task and documentation directories.
    pub async fn create(root: &Path, app: &str, started: DateTime<Local>) -> std::io::Result<Self> {
        let workspace = Self::layout(root, app, started);
        tokio::fs::create_dir_all(&workspace.task_dir).await?;
        tokio::fs::create_dir_all(&workspace.docs_dir).await?;
        Ok(workspace)
    }

    pub fn explore_log(&self) -> PathBuf {
        self.task_dir.join(format!("log_explore_{}.txt", self.task_name))
    }

    pub fn reflect_log(&self) -> PathBuf {
        self.task_dir.join(format!("log_reflect_{}.txt", self.task_name))
    }

    pub fn report(&self) -> PathBuf {
        self.task_dir.join(format!("log_report_{}.md", self.task_name))
    }

    pub fn before(&self, round: u32) -> PathBuf {
        self.task_dir.join(Self::before_name(round))
    }

    pub fn before_name(round: u32) -> String {
        format!("{}_before.png", round)
    }

    pub fn before_labeled(&self, round: u32) -> PathBuf {
        self.task_dir.join(Self::before_labeled_name(round))
    }

    pub fn before_labeled_name(round: u32) -> String {
        format!("{}_before_labeled.png", round)
    }

    pub fn before_labeled_action(&self, round: u32) -> PathBuf {
        self.task_dir.join(Self::before_labeled_action_name(round))
    }

    pub fn before_labeled_action_name(round: u32) -> String {
        format!("{}_before_labeled_action.png", round)
    }

    pub fn after(&self, round: u32) -> PathBuf {
        self.task_dir.join(format!("{}_after.png", round))
    }

    pub fn after_labeled(&self, round: u32) -> PathBuf {
        self.task_dir.join(Self::after_labeled_name(round))
    }

    pub fn after_labeled_name(round: u32) -> String {
        format!("{}_after_labeled.png", round)
    }

    pub fn snapshot(&self, round: u32) -> PathBuf {
        self.task_dir.join(format!("{}.json", round))
    }

    /// Resolve a file name relative to the task directory.
    ///
    /// Absolute paths and any `..` component are rejected.
    pub fn resolve_artifact(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        let safe = !name.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        safe.then(|| self.task_dir.join(relative))
    }
}
