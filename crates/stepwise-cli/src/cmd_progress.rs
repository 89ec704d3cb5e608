use anyhow::Context;
use clap::Subcommand;
use std::path::PathBuf;
use stepwise_core::{find_nearest_incomplete_prerequisite, ProgressStats, Registry};

use crate::workspace::Workspace;

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum ProgressCmd {
    /// Print stored progress as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace stored progress with a previously exported file
    Import {
        /// JSON file produced by `progress export`
        file: PathBuf,
    },
    /// Delete all stored progress
    Clear,
}

// ── Dispatch ──

pub fn run(cmd: ProgressCmd, ws: &Workspace) -> anyhow::Result<()> {
    match cmd {
        ProgressCmd::Export { out } => export(ws, out),
        ProgressCmd::Import { file } => import(ws, file),
        ProgressCmd::Clear => clear(ws),
    }
}

// ── Command Implementations ──

fn require_known(registry: &Registry, slug: &str) -> anyhow::Result<()> {
    if registry.get(slug).is_none() {
        anyhow::bail!("unknown tutorial: {slug}");
    }
    Ok(())
}

/// `stepwise complete <slug> [--time-spent N]`
pub fn complete(ws: &Workspace, slug: &str, time_spent: Option<u64>) -> anyhow::Result<()> {
    let registry = ws.registry()?;
    require_known(&registry, slug)?;
    let record = ws.progress.mark_complete(slug, time_spent)?;
    println!("Completed {slug} at {}", record.timestamp);

    let map = registry.map();
    if let Some(tutorial) = map.get(slug) {
        let progress = ws.progress.load();
        if let Some(next) =
            find_nearest_incomplete_prerequisite(&tutorial.prerequisites, &map, &progress)
        {
            println!("note: earlier steps are unfinished, next is {} ({})", next.title, next.slug);
        }
    }
    Ok(())
}

/// `stepwise reset <slug>`
pub fn reset(ws: &Workspace, slug: &str) -> anyhow::Result<()> {
    let registry = ws.registry()?;
    require_known(&registry, slug)?;
    if ws.progress.mark_incomplete(slug)? {
        println!("Reset {slug}");
    } else {
        println!("{slug} was not complete");
    }
    Ok(())
}

/// `stepwise status`
pub fn status(ws: &Workspace) -> anyhow::Result<()> {
    let registry = ws.registry()?;
    let stats = ws.progress.stats(&registry.slugs());
    print!("{}", render_stats(&stats));
    Ok(())
}

fn render_stats(stats: &ProgressStats) -> String {
    let mut out = format!(
        "Completed {} of {} tutorials ({}%)\n",
        stats.completed_tutorials, stats.total_tutorials, stats.percent_complete
    );
    if let Some(last) = &stats.last_updated {
        out.push_str(&format!("Last updated: {last}\n"));
    }
    out
}

fn export(ws: &Workspace, out: Option<PathBuf>) -> anyhow::Result<()> {
    let json = ws.progress.export()?;
    match out {
        Some(path) => {
            stepwise_store::write_atomic(&path, json.as_bytes())?;
            println!("Exported to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn import(ws: &Workspace, file: PathBuf) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(&file)
        .with_context(|| format!("reading {}", file.display()))?;
    let count = ws
        .progress
        .import(&json)
        .with_context(|| format!("importing {}", file.display()))?;
    println!("Imported {count} record(s)");
    Ok(())
}

fn clear(ws: &Workspace) -> anyhow::Result<()> {
    ws.progress.clear()?;
    println!("Cleared {}", ws.progress.path().display());
    Ok(())
}
