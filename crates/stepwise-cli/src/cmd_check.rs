use serde::Serialize;
use std::fmt::Write as _;
use stepwise_core::{
    collect_all_incomplete_prerequisites, is_tutorial_chain_complete, should_show_prerequisites,
    IncompletePrerequisites, Progress, TutorialInfo,
};

use crate::workspace::Workspace;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckReport<'a> {
    slug: &'a str,
    completed: bool,
    chain_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    prerequisites: Option<IncompletePrerequisites>,
}

/// `stepwise check <slug> [--json]`
pub fn execute(ws: &Workspace, slug: &str, json: bool) -> anyhow::Result<()> {
    let registry = ws.registry()?;
    let map = registry.map();
    let Some(tutorial) = map.get(slug) else {
        anyhow::bail!("unknown tutorial: {slug}");
    };
    let progress = ws.progress.load();

    let prereqs = Some(tutorial.prerequisites.as_slice());
    let blocking = if should_show_prerequisites(prereqs, &map, &progress) {
        collect_all_incomplete_prerequisites(prereqs, &map, &progress)
    } else {
        None
    };
    let report = CheckReport {
        slug,
        completed: progress.is_completed(slug),
        chain_complete: is_tutorial_chain_complete(slug, &map, &progress),
        prerequisites: blocking,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render(tutorial, &report));
    }
    Ok(())
}

fn label(t: &TutorialInfo) -> String {
    match &t.estimated_time {
        Some(time) => format!("{} ({}, {time})", t.title, t.slug),
        None => format!("{} ({})", t.title, t.slug),
    }
}

fn render(tutorial: &TutorialInfo, report: &CheckReport<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", label(tutorial));

    let status = match (report.completed, report.chain_complete) {
        (true, true) => "complete",
        (true, false) => "complete, but earlier steps are not",
        (false, _) => "not complete",
    };
    let _ = writeln!(out, "Status: {status}");

    match &report.prerequisites {
        None => {
            let _ = writeln!(out, "All prerequisites complete.");
        }
        Some(incomplete) => {
            let _ = writeln!(out, "Start with: {}", label(&incomplete.primary));
            if !incomplete.others.is_empty() {
                let _ = writeln!(out, "Also incomplete:");
                for other in &incomplete.others {
                    let _ = writeln!(out, "  - {}", label(other));
                }
            }
        }
    }
    out
}
