use anyhow::Context;
use std::path::{Path, PathBuf};
use stepwise_core::Registry;
use stepwise_store::{ProgressStore, StepwisePaths};

use crate::cmd_config::read_config;

pub const DEFAULT_TUTORIALS_DIR: &str = "content/tutorials";

/// Paths given on the command line. Used as-is, relative to the cwd.
#[derive(Debug, Default)]
pub struct Overrides {
    pub tutorials: Option<PathBuf>,
    pub progress: Option<PathBuf>,
}

/// Resolved locations for one invocation.
///
/// Precedence: command line, then `.stepwise/config.json` (relative to the
/// workspace root), then defaults.
#[derive(Debug)]
pub struct Workspace {
    pub paths: StepwisePaths,
    pub tutorials_dir: PathBuf,
    pub progress: ProgressStore,
}

impl Workspace {
    pub fn resolve(root: &Path, overrides: &Overrides) -> anyhow::Result<Self> {
        let paths = StepwisePaths::discover(root);
        let config = read_config(&paths.config_json)
            .with_context(|| format!("reading {}", paths.config_json.display()))?;

        let tutorials_dir = overrides
            .tutorials
            .clone()
            .or_else(|| config.tutorials_dir.as_deref().map(|p| paths.resolve(p)))
            .unwrap_or_else(|| root.join(DEFAULT_TUTORIALS_DIR));
        let progress_file = overrides
            .progress
            .clone()
            .or_else(|| config.progress_file.as_deref().map(|p| paths.resolve(p)))
            .unwrap_or_else(|| paths.default_progress_file());

        tracing::debug!(
            tutorials = %tutorials_dir.display(),
            progress = %progress_file.display(),
            "resolved workspace"
        );
        Ok(Self {
            paths,
            tutorials_dir,
            progress: ProgressStore::open(progress_file),
        })
    }

    pub fn registry(&self) -> anyhow::Result<Registry> {
        Registry::load(&self.tutorials_dir)
    }
}
