use std::path::{Path, PathBuf};

/// Well-known paths under a workspace's `.stepwise/` directory.
#[derive(Debug, Clone)]
pub struct StepwisePaths {
    pub root: PathBuf,
    pub stepwise_dir: PathBuf,
    pub config_json: PathBuf,
    pub lock_file: PathBuf,
}

impl StepwisePaths {
    /// Derive all paths from a workspace root. Pure computation, no I/O.
    pub fn discover(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let stepwise_dir = root.join(".stepwise");
        Self {
            config_json: stepwise_dir.join("config.json"),
            lock_file: stepwise_dir.join("LOCK"),
            stepwise_dir,
            root,
        }
    }

    /// Create `.stepwise/`. Idempotent.
    pub fn ensure_layout(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.stepwise_dir)
    }

    pub fn is_initialized(&self) -> bool {
        self.stepwise_dir.is_dir()
    }

    /// Default progress file, kept per user outside the workspace:
    /// `<user data dir>/projects/<workspace key>/progress.json`.
    pub fn default_progress_file(&self) -> PathBuf {
        Self::user_data_dir()
            .join("projects")
            .join(self.workspace_key())
            .join("progress.json")
    }

    /// Stable 32-hex-digit key for this workspace, hashed from the
    /// canonical root so `.` and its absolute spelling agree.
    pub fn workspace_key(&self) -> String {
        let root = self.root.canonicalize().unwrap_or_else(|_| self.root.clone());
        let mut spelled = root.to_string_lossy().replace('\\', "/");
        if cfg!(windows) {
            spelled = spelled.to_lowercase();
        }
        blake3::hash(spelled.as_bytes()).to_hex()[..32].to_string()
    }

    /// Where per-user state lives. Falls back from the platform data dir to
    /// `~/.stepwise`, then to `.stepwise-store` in the cwd.
    pub fn user_data_dir() -> PathBuf {
        match (dirs::data_dir(), dirs::home_dir()) {
            (Some(data), _) => data.join("stepwise"),
            (None, Some(home)) => home.join(".stepwise"),
            (None, None) => PathBuf::from(".stepwise-store"),
        }
    }

    /// Resolve a configured path against the workspace root.
    pub fn resolve(&self, configured: &Path) -> PathBuf {
        if configured.is_absolute() {
            configured.to_path_buf()
        } else {
            self.root.join(configured)
        }
    }

    /// Walk up from `start` looking for a directory containing `.stepwise/`.
    pub fn find_root(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .find(|dir| dir.join(".stepwise").is_dir())
            .map(Path::to_path_buf)
    }
}
