use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One node in the prerequisite graph.
///
/// Field names follow the site's content schema (`isAppendix`, `estimatedTime`)
/// so registry exports load without translation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TutorialInfo {
    pub slug: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,
    /// Direct prerequisites in declared order. Absent and empty are the same.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prerequisites: Vec<String>,
    /// Appendices never block anything they are a prerequisite of.
    #[serde(default)]
    pub is_appendix: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_number: Option<u32>,
}

impl TutorialInfo {
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            description: String::new(),
            estimated_time: None,
            prerequisites: Vec::new(),
            is_appendix: false,
            section: None,
            step_number: None,
        }
    }

    pub fn with_prerequisites<I, S>(mut self, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prerequisites = prerequisites.into_iter().map(Into::into).collect();
        self
    }

    pub fn appendix(mut self) -> Self {
        self.is_appendix = true;
        self
    }
}

/// Slug-keyed lookup table. Edges stay as slug strings and are resolved
/// through the map during traversal.
pub type TutorialMap = HashMap<String, TutorialInfo>;

/// Build a slug-keyed map from a tutorial list.
///
/// Duplicate slugs are not an error: the later record replaces the earlier one.
pub fn build_tutorial_map<I>(tutorials: I) -> TutorialMap
where
    I: IntoIterator<Item = TutorialInfo>,
{
    let mut map = TutorialMap::new();
    for tutorial in tutorials {
        if let Some(previous) = map.insert(tutorial.slug.clone(), tutorial) {
            tracing::debug!(slug = %previous.slug, "duplicate tutorial slug, keeping the later record");
        }
    }
    map
}
