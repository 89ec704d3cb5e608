use anyhow::Context;
use clap::Subcommand;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stepwise_store::StepwisePaths;

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Set a config value
    Set {
        /// Config key (tutorials_dir or progress_file)
        key: String,
        /// Path, relative to the workspace root or absolute
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// Remove a config value
    Unset {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
}

// ── Config File ──

pub const KEY_TUTORIALS_DIR: &str = "tutorials_dir";
pub const KEY_PROGRESS_FILE: &str = "progress_file";
const KEYS: &[&str] = &[KEY_TUTORIALS_DIR, KEY_PROGRESS_FILE];

/// Contents of `.stepwise/config.json`. Every key is a path.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tutorials_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_file: Option<PathBuf>,
}

impl Config {
    fn slot(&mut self, key: &str) -> anyhow::Result<&mut Option<PathBuf>> {
        match key {
            KEY_TUTORIALS_DIR => Ok(&mut self.tutorials_dir),
            KEY_PROGRESS_FILE => Ok(&mut self.progress_file),
            _ => anyhow::bail!("unknown config key `{key}` (expected one of: {})", KEYS.join(", ")),
        }
    }

    pub fn get(&self, key: &str) -> anyhow::Result<Option<&Path>> {
        match key {
            KEY_TUTORIALS_DIR => Ok(self.tutorials_dir.as_deref()),
            KEY_PROGRESS_FILE => Ok(self.progress_file.as_deref()),
            _ => anyhow::bail!("unknown config key `{key}` (expected one of: {})", KEYS.join(", ")),
        }
    }

    /// Values are stored verbatim as paths, whatever they look like.
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        *self.slot(key)? = Some(PathBuf::from(value));
        Ok(())
    }

    pub fn unset(&mut self, key: &str) -> anyhow::Result<bool> {
        Ok(self.slot(key)?.take().is_some())
    }

    fn entries(&self) -> impl Iterator<Item = (&'static str, &Path)> {
        [
            (KEY_TUTORIALS_DIR, self.tutorials_dir.as_deref()),
            (KEY_PROGRESS_FILE, self.progress_file.as_deref()),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k, v)))
    }
}

/// Read `.stepwise/config.json`. A missing file is the default config;
/// unknown keys and non-string values are errors.
pub(crate) fn read_config(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(path)?;
    let config = serde_json::from_str(&content)
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}

pub(crate) fn write_config(path: &Path, config: &Config) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    stepwise_store::write_atomic(path, json.as_bytes())?;
    Ok(())
}

// ── Dispatch ──

pub fn run(cmd: ConfigCmd, root: &Path) -> anyhow::Result<()> {
    match cmd {
        ConfigCmd::Set { key, value } => set(root, &key, &value),
        ConfigCmd::Get { key } => get(root, &key),
        ConfigCmd::Unset { key } => unset(root, &key),
        ConfigCmd::List => list(root),
    }
}

// ── Command Implementations ──

fn initialized_paths(root: &Path) -> anyhow::Result<StepwisePaths> {
    let paths = StepwisePaths::discover(root);
    if !paths.is_initialized() {
        anyhow::bail!("No .stepwise/ workspace found. Run `stepwise init` first.");
    }
    Ok(paths)
}

/// `stepwise config set <key> <value>`
pub fn set(root: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let paths = initialized_paths(root)?;
    let _lock = stepwise_store::lock_file(&paths.lock_file)?;
    let mut config = read_config(&paths.config_json)?;
    config.set(key, value)?;
    write_config(&paths.config_json, &config)?;
    println!("{key} = {value}");
    Ok(())
}

/// `stepwise config get <key>`
pub fn get(root: &Path, key: &str) -> anyhow::Result<()> {
    let paths = initialized_paths(root)?;
    let config = read_config(&paths.config_json)?;
    match config.get(key)? {
        Some(val) => println!("{}", val.display()),
        None => println!("(not set)"),
    }
    Ok(())
}

/// `stepwise config unset <key>`
pub fn unset(root: &Path, key: &str) -> anyhow::Result<()> {
    let paths = initialized_paths(root)?;
    let _lock = stepwise_store::lock_file(&paths.lock_file)?;
    let mut config = read_config(&paths.config_json)?;
    if config.unset(key)? {
        write_config(&paths.config_json, &config)?;
        println!("Unset {key}");
    } else {
        println!("{key} was not set");
    }
    Ok(())
}

/// `stepwise config list`
pub fn list(root: &Path) -> anyhow::Result<()> {
    let paths = initialized_paths(root)?;
    let config = read_config(&paths.config_json)?;
    let mut any = false;
    for (k, v) in config.entries() {
        println!("{k} = {}", v.display());
        any = true;
    }
    if !any {
        println!("(no config set)");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init(tmp: &tempfile::TempDir) -> StepwisePaths {
        let paths = StepwisePaths::discover(tmp.path());
        paths.ensure_layout().unwrap();
        paths
    }

    #[test]
    fn set_requires_init() {
        let tmp = tempfile::tempdir().unwrap();
        let err = set(tmp.path(), KEY_TUTORIALS_DIR, "docs").unwrap_err();
        assert!(err.to_string().contains("stepwise init"));
    }

    #[test]
    fn set_then_read() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = init(&tmp);

        set(tmp.path(), KEY_TUTORIALS_DIR, "docs/tutorials").unwrap();
        let config = read_config(&paths.config_json).unwrap();
        assert_eq!(config.tutorials_dir.as_deref(), Some(Path::new("docs/tutorials")));
    }

    #[test]
    fn numeric_looking_values_stay_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = init(&tmp);

        set(tmp.path(), KEY_TUTORIALS_DIR, "2024").unwrap();
        set(tmp.path(), KEY_PROGRESS_FILE, "true").unwrap();
        let raw = std::fs::read_to_string(&paths.config_json).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["tutorials_dir"], "2024");
        assert_eq!(json["progress_file"], "true");
    }

    #[test]
    fn unknown_key_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = init(&tmp);

        let err = set(tmp.path(), "tutorial_dir", "docs").unwrap_err();
        assert!(err.to_string().contains("unknown config key `tutorial_dir`"));
        assert!(!paths.config_json.exists());
        assert!(get(tmp.path(), "tutorial_dir").is_err());
    }

    #[test]
    fn unset_removes_value() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = init(&tmp);

        set(tmp.path(), KEY_PROGRESS_FILE, "state/progress.json").unwrap();
        unset(tmp.path(), KEY_PROGRESS_FILE).unwrap();
        assert_eq!(read_config(&paths.config_json).unwrap(), Config::default());
    }

    #[test]
    fn wrong_value_type_in_file_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{"tutorials_dir": 2024}"#).unwrap();
        assert!(read_config(&path).is_err());

        std::fs::write(&path, r#"{"tutorial_dir": "docs"}"#).unwrap();
        assert!(read_config(&path).is_err());
    }

    #[test]
    fn empty_config_serialises_as_empty_object() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        write_config(&path, &Config::default()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }
}
