use serde::Serialize;
use std::cmp::Ordering;

use crate::tutorial::TutorialInfo;

/// Tutorials of one section in reading order.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SidebarSection {
    pub section: String,
    pub tutorials: Vec<TutorialInfo>,
}

fn is_appendix(t: &TutorialInfo) -> bool {
    t.is_appendix || t.step_number.is_none()
}

/// Numbered steps first by step number, then appendices by title.
fn reading_order(a: &TutorialInfo, b: &TutorialInfo) -> Ordering {
    match (is_appendix(a), is_appendix(b)) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => match (a.step_number, b.step_number) {
            (Some(x), Some(y)) if x != y => x.cmp(&y),
            _ => a.title.cmp(&b.title),
        },
    }
}

/// Group tutorials by section, sections in order of first appearance.
pub fn sidebar(tutorials: &[TutorialInfo]) -> Vec<SidebarSection> {
    let mut sections: Vec<SidebarSection> = Vec::new();
    for t in tutorials {
        let name = t.section.clone().unwrap_or_default();
        match sections.iter_mut().find(|s| s.section == name) {
            Some(section) => section.tutorials.push(t.clone()),
            None => sections.push(SidebarSection {
                section: name,
                tutorials: vec![t.clone()],
            }),
        }
    }
    for section in &mut sections {
        section.tutorials.sort_by(reading_order);
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(slug: &str, section: &str, step: u32) -> TutorialInfo {
        let mut t = TutorialInfo::new(slug, format!("Step {step}"));
        t.section = Some(section.into());
        t.step_number = Some(step);
        t
    }

    fn appendix(slug: &str, section: &str, title: &str) -> TutorialInfo {
        let mut t = TutorialInfo::new(slug, title).appendix();
        t.section = Some(section.into());
        t
    }

    fn slugs(section: &SidebarSection) -> Vec<&str> {
        section.tutorials.iter().map(|t| t.slug.as_str()).collect()
    }

    #[test]
    fn groups_by_first_appearance() {
        let out = sidebar(&[
            numbered("gs-2", "Getting Started", 2),
            numbered("adv-1", "Advanced", 1),
            numbered("gs-1", "Getting Started", 1),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].section, "Getting Started");
        assert_eq!(slugs(&out[0]), vec!["gs-1", "gs-2"]);
        assert_eq!(out[1].section, "Advanced");
    }

    #[test]
    fn appendices_after_numbered_steps_by_title() {
        let out = sidebar(&[
            appendix("appendix-b", "Host Setup", "Appendix B: Automation"),
            numbered("step-2", "Host Setup", 2),
            numbered("step-1", "Host Setup", 1),
            appendix("appendix-a", "Host Setup", "Appendix A: Troubleshooting"),
        ]);
        assert_eq!(
            slugs(&out[0]),
            vec!["step-1", "step-2", "appendix-a", "appendix-b"]
        );
    }

    #[test]
    fn missing_step_number_sorts_as_appendix() {
        let mut unnumbered = TutorialInfo::new("loose", "Loose Ends");
        unnumbered.section = Some("S".into());
        let out = sidebar(&[unnumbered, numbered("one", "S", 1)]);
        assert_eq!(slugs(&out[0]), vec!["one", "loose"]);
    }
}
