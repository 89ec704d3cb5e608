use stepwise_core::registry::{sidebar, SidebarSection};
use stepwise_core::Progress;

use crate::workspace::Workspace;

/// `stepwise list`
pub fn execute(ws: &Workspace) -> anyhow::Result<()> {
    if !ws.paths.is_initialized() {
        tracing::info!(root = %ws.paths.root.display(), "no .stepwise/ workspace, using defaults");
    }
    let registry = ws.registry()?;
    let progress = ws.progress.load();
    let sections = sidebar(&registry.tutorials());
    if sections.is_empty() {
        println!("No tutorials in {}", ws.tutorials_dir.display());
        return Ok(());
    }
    print!("{}", render(&sections, &progress));
    Ok(())
}

fn render<P: Progress + ?Sized>(sections: &[SidebarSection], progress: &P) -> String {
    let mut out = String::new();
    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let name = if section.section.is_empty() {
            "(no section)"
        } else {
            section.section.as_str()
        };
        out.push_str(name);
        out.push('\n');

        for t in &section.tutorials {
            let mark = if progress.is_completed(&t.slug) { 'x' } else { ' ' };
            let step = match t.step_number.filter(|_| !t.is_appendix) {
                Some(n) => format!("{n}."),
                None => "-".to_string(),
            };
            out.push_str(&format!("  [{mark}] {step} {} ({})\n", t.title, t.slug));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use stepwise_core::TutorialInfo;

    fn step(slug: &str, section: &str, n: u32) -> TutorialInfo {
        let mut t = TutorialInfo::new(slug, slug.to_uppercase());
        t.section = Some(section.into());
        t.step_number = Some(n);
        t
    }

    #[test]
    fn marks_completed_and_appendices() {
        let mut glossary = TutorialInfo::new("glossary", "Glossary").appendix();
        glossary.section = Some("Basics".into());
        let tutorials = vec![step("setup", "Basics", 1), glossary, step("deploy", "Ship", 1)];
        let progress: HashMap<String, bool> = [("setup".to_string(), true)].into();

        let out = render(&sidebar(&tutorials), &progress);
        assert_eq!(
            out,
            "Basics\n  [x] 1. SETUP (setup)\n  [ ] - Glossary (glossary)\n\nShip\n  [ ] 1. DEPLOY (deploy)\n"
        );
    }
}
