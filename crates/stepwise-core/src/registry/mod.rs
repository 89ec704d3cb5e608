//! Tutorial registry: the on-disk tutorial collection.
//!
//! A registry is a directory of `<slug>.md` files, each opening with a YAML
//! frontmatter block. Files are read in file-name order, which fixes the
//! order of [`Registry::tutorials`].

pub mod frontmatter;
pub mod sidebar;
pub mod topo;
pub mod validate;

use anyhow::{Context, Result};
use std::path::Path;

use crate::tutorial::{build_tutorial_map, TutorialInfo, TutorialMap};
pub use frontmatter::Frontmatter;
pub use sidebar::{sidebar, SidebarSection};
pub use topo::topo_order;
pub use validate::RegistryIssue;

/// One tutorial file.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub slug: String,
    pub frontmatter: Frontmatter,
    pub body: String,
}

impl RegistryEntry {
    pub fn info(&self) -> TutorialInfo {
        self.frontmatter.to_info(&self.slug)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    pub entries: Vec<RegistryEntry>,
}

impl Registry {
    /// Load every `*.md` file in `dir`. The slug is the file stem.
    pub fn load(dir: &Path) -> Result<Self> {
        let read = std::fs::read_dir(dir)
            .with_context(|| format!("reading tutorials dir {}", dir.display()))?;

        let mut paths = Vec::new();
        for item in read {
            let path = item?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut entries = Vec::with_capacity(paths.len());
        for path in paths {
            let Some(slug) = path.file_stem().and_then(|s| s.to_str()) else {
                tracing::warn!(path = %path.display(), "skipping tutorial with non-UTF-8 name");
                continue;
            };
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let (frontmatter, body) = frontmatter::parse_tutorial(&content)
                .with_context(|| format!("parsing {}", path.display()))?;
            entries.push(RegistryEntry {
                slug: slug.to_string(),
                frontmatter,
                body,
            });
        }

        tracing::debug!(dir = %dir.display(), count = entries.len(), "loaded tutorial registry");
        Ok(Self { entries })
    }

    pub fn get(&self, slug: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.slug == slug)
    }

    pub fn slugs(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.slug.as_str()).collect()
    }

    pub fn tutorials(&self) -> Vec<TutorialInfo> {
        self.entries.iter().map(RegistryEntry::info).collect()
    }

    pub fn map(&self) -> TutorialMap {
        build_tutorial_map(self.tutorials())
    }

    pub fn validate(&self) -> Vec<RegistryIssue> {
        validate::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prereq::find_nearest_incomplete_prerequisite;
    use crate::progress::ProgressData;
    use std::fs;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn tutorial_file(title: &str, step: u32, prereqs: &[&str]) -> String {
        let mut s = format!(
            "---\ntitle: {title}\ndescription: {title} walkthrough\nsection: Basics\n\
             stepNumber: {step}\ntotalSteps: 3\nlastUpdated: 2024-01-15\ndifficulty: beginner\n"
        );
        if !prereqs.is_empty() {
            s.push_str("prerequisites:\n");
            for p in prereqs {
                s.push_str(&format!("  - {p}\n"));
            }
        }
        s.push_str("---\n\n## Steps\n\n```bash\necho hi\n```\n");
        s
    }

    #[test]
    fn load_reads_markdown_in_name_order() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "b-setup.md", &tutorial_file("Setup", 2, &["a-intro"]));
        write(tmp.path(), "a-intro.md", &tutorial_file("Intro", 1, &[]));
        write(tmp.path(), "c-deploy.md", &tutorial_file("Deploy", 3, &["b-setup"]));
        write(tmp.path(), "notes.txt", "ignored");

        let reg = Registry::load(tmp.path()).unwrap();
        assert_eq!(reg.slugs(), vec!["a-intro", "b-setup", "c-deploy"]);
        assert!(reg.validate().is_empty(), "{:?}", reg.validate());
        assert!(reg.get("b-setup").unwrap().body.contains("## Steps"));

        let map = reg.map();
        let next = find_nearest_incomplete_prerequisite(
            &map["c-deploy"].prerequisites,
            &map,
            &ProgressData::new(),
        )
        .unwrap();
        assert_eq!(next.slug, "a-intro");
    }

    #[test]
    fn load_missing_dir_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Registry::load(&tmp.path().join("nope")).unwrap_err();
        assert!(err.to_string().contains("reading tutorials dir"));
    }

    #[test]
    fn load_names_file_without_frontmatter() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "broken.md", "# no frontmatter\n");
        let err = Registry::load(tmp.path()).unwrap_err();
        assert!(format!("{err:#}").contains("broken.md"));
    }

    #[test]
    fn empty_dir_is_empty_registry() {
        let tmp = tempfile::tempdir().unwrap();
        let reg = Registry::load(tmp.path()).unwrap();
        assert!(reg.entries.is_empty());
        assert!(reg.map().is_empty());
    }
}
