use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use super::topo::topo_order;
use super::Registry;

/// Longest allowed description, in characters.
pub const DESCRIPTION_MAX: usize = 200;

const DIFFICULTIES: &[&str] = &["beginner", "intermediate", "advanced"];

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("tag pattern is valid"));

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#+ ").expect("heading pattern is valid"));

/// `[text](/tutorial/<slug>)`
static TUTORIAL_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[[^\]]+\]\(/tutorial/([a-z0-9-]+)\)").expect("link pattern is valid")
});

/// A content-authoring problem found in the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryIssue {
    #[error("{slug}: missing {field}")]
    MissingField { slug: String, field: &'static str },

    #[error("{slug}: description is {len} characters, limit is {max}", max = DESCRIPTION_MAX)]
    DescriptionTooLong { slug: String, len: usize },

    #[error("{slug}: numbered tutorial needs a positive {field}")]
    MissingStep { slug: String, field: &'static str },

    #[error("{slug}: lastUpdated \"{value}\" is not a YYYY-MM-DD date")]
    InvalidDate { slug: String, value: String },

    #[error("{slug}: difficulty \"{value}\" must be one of {}", DIFFICULTIES.join("/"))]
    InvalidDifficulty { slug: String, value: String },

    #[error("{slug}: tag \"{tag}\" must match [a-z0-9-]+")]
    InvalidTag { slug: String, tag: String },

    #[error("{slug}: prerequisite \"{prerequisite}\" does not exist")]
    UnknownPrerequisite { slug: String, prerequisite: String },

    #[error("{slug}: body has no markdown heading")]
    MissingHeading { slug: String },

    #[error("{slug}: body has no fenced code block")]
    MissingCodeBlock { slug: String },

    #[error("{slug}: link to /tutorial/{target} points to no tutorial")]
    BrokenLink { slug: String, target: String },

    #[error("{slug}: tutorial cannot be its own prerequisite")]
    SelfPrerequisite { slug: String },

    #[error(
        "{slug}: prerequisite \"{prerequisite}\" (step {prerequisite_step}) should come before step {step}"
    )]
    StepOrder {
        slug: String,
        prerequisite: String,
        prerequisite_step: u32,
        step: u32,
    },

    #[error("section \"{section}\" should start at step 1, starts at {first}")]
    SectionStart { section: String, first: u32 },

    #[error("{slug}: totalSteps {found} differs from {expected} used elsewhere in \"{section}\"")]
    TotalStepsMismatch {
        slug: String,
        section: String,
        expected: u32,
        found: u32,
    },

    #[error("dependency cycle detected among tutorials: [{}]", .members.join(", "))]
    Cycle { members: Vec<String> },
}

/// Run every content check over the registry. Issues come back grouped by
/// check, in registry order within each group.
pub fn validate(registry: &Registry) -> Vec<RegistryIssue> {
    let mut issues = Vec::new();
    check_fields(registry, &mut issues);
    check_content(registry, &mut issues);
    check_prerequisites(registry, &mut issues);
    check_sections(registry, &mut issues);
    if let Err(cycle) = topo_order(&registry.tutorials()) {
        issues.push(cycle);
    }
    issues
}

fn check_fields(registry: &Registry, issues: &mut Vec<RegistryIssue>) {
    let date_format = time::format_description::well_known::Iso8601::DATE;

    for entry in &registry.entries {
        let fm = &entry.frontmatter;
        let slug = &entry.slug;
        let missing = |field| RegistryIssue::MissingField {
            slug: slug.clone(),
            field,
        };

        if fm.title.trim().is_empty() {
            issues.push(missing("title"));
        }
        if fm.description.trim().is_empty() {
            issues.push(missing("description"));
        }
        if fm.section.trim().is_empty() {
            issues.push(missing("section"));
        }

        let len = fm.description.chars().count();
        if len > DESCRIPTION_MAX {
            issues.push(RegistryIssue::DescriptionTooLong {
                slug: slug.clone(),
                len,
            });
        }

        if !fm.is_appendix() {
            for (field, value) in [("stepNumber", fm.step_number), ("totalSteps", fm.total_steps)] {
                if value.unwrap_or(0) == 0 {
                    issues.push(RegistryIssue::MissingStep {
                        slug: slug.clone(),
                        field,
                    });
                }
            }
        }

        match fm.last_updated.as_deref() {
            None => issues.push(missing("lastUpdated")),
            Some(value) => {
                let well_formed = value.len() == 10 && time::Date::parse(value, &date_format).is_ok();
                if !well_formed {
                    issues.push(RegistryIssue::InvalidDate {
                        slug: slug.clone(),
                        value: value.to_string(),
                    });
                }
            }
        }

        match fm.difficulty.as_deref() {
            None => issues.push(missing("difficulty")),
            Some(value) if !DIFFICULTIES.contains(&value) => {
                issues.push(RegistryIssue::InvalidDifficulty {
                    slug: slug.clone(),
                    value: value.to_string(),
                });
            }
            Some(_) => {}
        }

        for tag in &fm.tags {
            if !TAG_PATTERN.is_match(tag) {
                issues.push(RegistryIssue::InvalidTag {
                    slug: slug.clone(),
                    tag: tag.clone(),
                });
            }
        }
    }
}

fn check_content(registry: &Registry, issues: &mut Vec<RegistryIssue>) {
    let known: HashSet<&str> = registry.entries.iter().map(|e| e.slug.as_str()).collect();

    for entry in &registry.entries {
        let body = entry.body.as_str();
        if !HEADING.is_match(body) {
            issues.push(RegistryIssue::MissingHeading {
                slug: entry.slug.clone(),
            });
        }
        if !body.contains("```") {
            issues.push(RegistryIssue::MissingCodeBlock {
                slug: entry.slug.clone(),
            });
        }
        for link in TUTORIAL_LINK.captures_iter(body) {
            let target = &link[1];
            if !known.contains(target) {
                issues.push(RegistryIssue::BrokenLink {
                    slug: entry.slug.clone(),
                    target: target.to_string(),
                });
            }
        }
    }
}

fn check_prerequisites(registry: &Registry, issues: &mut Vec<RegistryIssue>) {
    let known: HashSet<&str> = registry.entries.iter().map(|e| e.slug.as_str()).collect();

    for entry in &registry.entries {
        let fm = &entry.frontmatter;
        for prereq in &fm.prerequisites {
            if !known.contains(prereq.as_str()) {
                issues.push(RegistryIssue::UnknownPrerequisite {
                    slug: entry.slug.clone(),
                    prerequisite: prereq.clone(),
                });
                continue;
            }
            if *prereq == entry.slug {
                issues.push(RegistryIssue::SelfPrerequisite {
                    slug: entry.slug.clone(),
                });
                continue;
            }

            // Within a section, prerequisites come earlier in the step order.
            let (Some(step), Some(other)) = (fm.step_number, registry.get(prereq)) else {
                continue;
            };
            let other = &other.frontmatter;
            if other.section == fm.section {
                if let Some(prereq_step) = other.step_number {
                    if prereq_step >= step {
                        issues.push(RegistryIssue::StepOrder {
                            slug: entry.slug.clone(),
                            prerequisite: prereq.clone(),
                            prerequisite_step: prereq_step,
                            step,
                        });
                    }
                }
            }
        }
    }
}

fn check_sections(registry: &Registry, issues: &mut Vec<RegistryIssue>) {
    let mut first_step: BTreeMap<&str, u32> = BTreeMap::new();
    let mut totals: BTreeMap<&str, u32> = BTreeMap::new();

    for entry in &registry.entries {
        let fm = &entry.frontmatter;
        let section = fm.section.as_str();

        // Appendices may keep a stepNumber; it does not start a section.
        if let Some(step) = fm.step_number.filter(|_| !fm.is_appendix) {
            let first = first_step.entry(section).or_insert(step);
            *first = (*first).min(step);
        }

        if let Some(total) = fm.total_steps {
            match totals.get(section) {
                Some(&expected) if expected != total => {
                    issues.push(RegistryIssue::TotalStepsMismatch {
                        slug: entry.slug.clone(),
                        section: section.to_string(),
                        expected,
                        found: total,
                    });
                }
                Some(_) => {}
                None => {
                    totals.insert(section, total);
                }
            }
        }
    }

    for (section, first) in first_step {
        if first != 1 {
            issues.push(RegistryIssue::SectionStart {
                section: section.to_string(),
                first,
            });
        }
    }
}
