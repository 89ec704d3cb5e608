use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::tutorial::TutorialInfo;

/// YAML frontmatter of a tutorial file.
///
/// Every field is optional at parse time; missing required fields are
/// reported by validation instead of failing the load.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Frontmatter {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub section: String,
    /// `null` marks an appendix.
    #[serde(default)]
    pub step_number: Option<u32>,
    #[serde(default)]
    pub total_steps: Option<u32>,
    #[serde(default)]
    pub is_appendix: bool,
    /// `YYYY-MM-DD`.
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub estimated_time: Option<String>,
}

impl Frontmatter {
    /// Appendices are either flagged or have no step number.
    pub fn is_appendix(&self) -> bool {
        self.is_appendix || self.step_number.is_none()
    }

    pub fn to_info(&self, slug: &str) -> TutorialInfo {
        TutorialInfo {
            slug: slug.to_string(),
            title: self.title.clone(),
            description: self.description.clone(),
            estimated_time: self.estimated_time.clone(),
            prerequisites: self.prerequisites.clone(),
            is_appendix: self.is_appendix(),
            section: (!self.section.is_empty()).then(|| self.section.clone()),
            step_number: self.step_number,
        }
    }
}

/// Split `---`-delimited frontmatter from the body.
/// Returns `None` if the content does not open with a frontmatter block.
pub fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix("---")?;
    let rest = strip_newline(rest)?;

    // Empty block: closing fence right away.
    if let Some(after) = rest.strip_prefix("---") {
        return Some(("", strip_newline(after).unwrap_or(after)));
    }

    let end = rest.find("\n---")?;
    let yaml = rest[..end].trim_end_matches('\r');
    let after = &rest[end + "\n---".len()..];
    Some((yaml, strip_newline(after).unwrap_or(after)))
}

fn strip_newline(s: &str) -> Option<&str> {
    s.strip_prefix("\r\n").or_else(|| s.strip_prefix('\n'))
}

/// Parse a tutorial file into frontmatter and body.
pub fn parse_tutorial(content: &str) -> Result<(Frontmatter, String)> {
    let (yaml, body) =
        split_frontmatter(content).context("missing `---` frontmatter block")?;
    let frontmatter = if yaml.trim().is_empty() {
        Frontmatter::default()
    } else {
        serde_yaml::from_str(yaml).context("invalid frontmatter")?
    };
    Ok((frontmatter, body.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = "---
title: \"Step 2: Install the Host\"
description: Prepare a TDX-capable host
section: Host Setup
stepNumber: 2
totalSteps: 4
lastUpdated: 2024-01-15
prerequisites:
  - host-intro
tags:
  - host
  - tdx
difficulty: intermediate
estimatedTime: 20 minutes
---

## Install

```bash
apt install qemu
```
";

    #[test]
    fn parse_full_frontmatter() {
        let (fm, body) = parse_tutorial(FULL).unwrap();
        assert_eq!(fm.title, "Step 2: Install the Host");
        assert_eq!(fm.section, "Host Setup");
        assert_eq!(fm.step_number, Some(2));
        assert_eq!(fm.total_steps, Some(4));
        assert_eq!(fm.last_updated.as_deref(), Some("2024-01-15"));
        assert_eq!(fm.prerequisites, vec!["host-intro"]);
        assert_eq!(fm.tags, vec!["host", "tdx"]);
        assert_eq!(fm.difficulty.as_deref(), Some("intermediate"));
        assert!(!fm.is_appendix());
        assert!(body.starts_with("\n## Install"));
    }

    #[test]
    fn null_step_number_is_appendix() {
        let content = "---\ntitle: Appendix A\nstepNumber: null\ntotalSteps: null\n---\nbody\n";
        let (fm, body) = parse_tutorial(content).unwrap();
        assert!(fm.step_number.is_none());
        assert!(fm.is_appendix());
        assert_eq!(body, "body\n");
    }

    #[test]
    fn flagged_appendix_keeps_step_number() {
        let content = "---\ntitle: Extra\nstepNumber: 9\nisAppendix: true\n---\n";
        let (fm, _) = parse_tutorial(content).unwrap();
        assert_eq!(fm.step_number, Some(9));
        assert!(fm.is_appendix());
    }

    #[test]
    fn missing_frontmatter_is_error() {
        let err = parse_tutorial("# Just a heading\n").unwrap_err();
        assert!(err.to_string().contains("frontmatter"));
    }

    #[test]
    fn unclosed_frontmatter_is_error() {
        assert!(parse_tutorial("---\ntitle: x\n").is_err());
    }

    #[test]
    fn empty_frontmatter_uses_defaults() {
        let (fm, body) = parse_tutorial("---\n---\nhello").unwrap();
        assert_eq!(fm, Frontmatter::default());
        assert_eq!(body, "hello");
    }

    #[test]
    fn crlf_line_endings() {
        let content = "---\r\ntitle: Windows\r\nstepNumber: 1\r\n---\r\nbody";
        let (fm, body) = parse_tutorial(content).unwrap();
        assert_eq!(fm.title, "Windows");
        assert_eq!(body, "body");
    }

    #[test]
    fn to_info_maps_fields() {
        let (fm, _) = parse_tutorial(FULL).unwrap();
        let info = fm.to_info("host-install");
        assert_eq!(info.slug, "host-install");
        assert_eq!(info.prerequisites, vec!["host-intro"]);
        assert_eq!(info.section.as_deref(), Some("Host Setup"));
        assert_eq!(info.step_number, Some(2));
        assert_eq!(info.estimated_time.as_deref(), Some("20 minutes"));
        assert!(!info.is_appendix);
    }
}
