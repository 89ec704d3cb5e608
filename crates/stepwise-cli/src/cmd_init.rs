use std::path::Path;
use stepwise_store::StepwisePaths;

use crate::cmd_config::{write_config, Config};

pub fn execute(root: &Path) -> anyhow::Result<()> {
    let paths = StepwisePaths::discover(root);
    if paths.is_initialized() {
        println!("Already initialized: {}", paths.stepwise_dir.display());
        return Ok(());
    }

    paths.ensure_layout()?;
    if !paths.config_json.exists() {
        write_config(&paths.config_json, &Config::default())?;
    }

    println!("Initialized {}", paths.stepwise_dir.display());
    println!("Progress: {}", paths.default_progress_file().display());
    Ok(())
}
