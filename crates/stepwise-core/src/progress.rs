use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

// ── Records ──

/// Completion record for one tutorial.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TutorialProgress {
    pub completed: bool,
    /// RFC 3339 time of the last change.
    pub timestamp: String,
    /// Seconds spent, when the caller measured it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_spent: Option<u64>,
}

/// Snapshot of every completion record, keyed by slug.
/// Serialises as a plain JSON object.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ProgressData(BTreeMap<String, TutorialProgress>);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStats {
    pub total_tutorials: usize,
    pub completed_tutorials: usize,
    pub percent_complete: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl ProgressData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slug: &str) -> Option<&TutorialProgress> {
        self.0.get(slug)
    }

    pub fn insert(&mut self, slug: impl Into<String>, record: TutorialProgress) {
        self.0.insert(slug.into(), record);
    }

    pub fn remove(&mut self, slug: &str) -> Option<TutorialProgress> {
        self.0.remove(slug)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TutorialProgress)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Summarise completion over `all_slugs`.
    ///
    /// Only slugs in `all_slugs` count towards completion, but `last_updated`
    /// looks at every record, stale ones included.
    pub fn stats<S: AsRef<str>>(&self, all_slugs: &[S]) -> ProgressStats {
        let total = all_slugs.len();
        let completed = all_slugs
            .iter()
            .filter(|slug| self.is_completed(slug.as_ref()))
            .count();
        let percent = if total > 0 {
            ((completed as f64 / total as f64) * 100.0).round() as u32
        } else {
            0
        };
        // Compared as instants: `time` trims trailing fraction digits, so the
        // strings do not sort. Unparseable timestamps are skipped.
        let last_updated = self
            .0
            .values()
            .filter_map(|p| {
                OffsetDateTime::parse(&p.timestamp, &Rfc3339)
                    .ok()
                    .map(|at| (at, &p.timestamp))
            })
            .max_by_key(|(at, _)| *at)
            .map(|(_, ts)| ts.clone());

        ProgressStats {
            total_tutorials: total,
            completed_tutorials: completed,
            percent_complete: percent,
            last_updated,
        }
    }
}

impl From<BTreeMap<String, TutorialProgress>> for ProgressData {
    fn from(map: BTreeMap<String, TutorialProgress>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, TutorialProgress)> for ProgressData {
    fn from_iter<T: IntoIterator<Item = (String, TutorialProgress)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ── Read contract ──

/// What the resolvers need from a progress store: is this slug done?
/// A slug with no record is not done.
pub trait Progress {
    fn is_completed(&self, slug: &str) -> bool;
}

impl Progress for ProgressData {
    fn is_completed(&self, slug: &str) -> bool {
        self.0.get(slug).is_some_and(|p| p.completed)
    }
}

impl Progress for HashMap<String, bool> {
    fn is_completed(&self, slug: &str) -> bool {
        self.get(slug).copied().unwrap_or(false)
    }
}

impl Progress for BTreeMap<String, bool> {
    fn is_completed(&self, slug: &str) -> bool {
        self.get(slug).copied().unwrap_or(false)
    }
}

impl<P: Progress + ?Sized> Progress for &P {
    fn is_completed(&self, slug: &str) -> bool {
        (**self).is_completed(slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn done(ts: &str) -> TutorialProgress {
        TutorialProgress {
            completed: true,
            timestamp: ts.into(),
            time_spent: None,
        }
    }

    #[test]
    fn missing_entry_is_not_completed() {
        let data = ProgressData::new();
        assert!(!data.is_completed("a"));
    }

    #[test]
    fn explicit_false_is_not_completed() {
        let mut data = ProgressData::new();
        data.insert(
            "a",
            TutorialProgress {
                completed: false,
                timestamp: "2024-01-01T00:00:00Z".into(),
                time_spent: None,
            },
        );
        assert!(!data.is_completed("a"));
    }

    #[test]
    fn bool_maps_implement_read_contract() {
        let mut hm = HashMap::new();
        hm.insert("a".to_string(), true);
        assert!(hm.is_completed("a"));
        assert!(!hm.is_completed("b"));

        let mut bm = BTreeMap::new();
        bm.insert("a".to_string(), false);
        assert!(!bm.is_completed("a"));
    }

    #[test]
    fn json_shape_matches_site_storage() {
        let json = r#"{
            "intro": {"completed": true, "timestamp": "2024-01-01T00:00:00Z", "timeSpent": 300},
            "setup": {"completed": true, "timestamp": "2024-01-02T00:00:00Z"}
        }"#;
        let data: ProgressData = serde_json::from_str(json).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.get("intro").unwrap().time_spent, Some(300));

        let out = serde_json::to_value(&data).unwrap();
        assert!(out["setup"].get("timeSpent").is_none());
    }

    #[test]
    fn stats_with_no_completion() {
        let data = ProgressData::new();
        let stats = data.stats(&["a", "b", "c"]);
        assert_eq!(stats.total_tutorials, 3);
        assert_eq!(stats.completed_tutorials, 0);
        assert_eq!(stats.percent_complete, 0);
        assert!(stats.last_updated.is_none());
    }

    #[test]
    fn stats_rounds_percentage() {
        let mut data = ProgressData::new();
        data.insert("a", done("2024-01-01T00:00:00Z"));
        let stats = data.stats(&["a", "b", "c"]);
        assert_eq!(stats.completed_tutorials, 1);
        assert_eq!(stats.percent_complete, 33);

        data.insert("b", done("2024-01-02T00:00:00Z"));
        assert_eq!(data.stats(&["a", "b", "c"]).percent_complete, 67);
    }

    #[test]
    fn stats_all_complete() {
        let mut data = ProgressData::new();
        data.insert("a", done("2024-01-01T00:00:00Z"));
        data.insert("b", done("2024-01-01T00:00:00Z"));
        assert_eq!(data.stats(&["a", "b"]).percent_complete, 100);
    }

    #[test]
    fn stats_empty_tutorial_list() {
        let mut data = ProgressData::new();
        data.insert("a", done("2024-01-01T00:00:00Z"));
        let stats = data.stats::<&str>(&[]);
        assert_eq!(stats.total_tutorials, 0);
        assert_eq!(stats.percent_complete, 0);
    }

    #[test]
    fn stats_ignore_unlisted_slugs_for_count_but_not_last_updated() {
        let mut data = ProgressData::new();
        data.insert("a", done("2024-01-01T00:00:00Z"));
        data.insert("retired", done("2024-03-01T00:00:00Z"));
        data.insert("b", done("2024-02-01T00:00:00Z"));
        let stats = data.stats(&["a", "b"]);
        assert_eq!(stats.completed_tutorials, 2);
        assert_eq!(stats.last_updated.as_deref(), Some("2024-03-01T00:00:00Z"));
    }

    #[test]
    fn last_updated_compares_instants_not_strings() {
        let mut data = ProgressData::new();
        data.insert("a", done("2024-05-01T10:00:05Z"));
        data.insert("b", done("2024-05-01T10:00:05.5Z"));
        data.insert("c", done("2024-05-01T12:00:00+02:00"));
        let stats = data.stats(&["a", "b", "c"]);
        assert_eq!(stats.last_updated.as_deref(), Some("2024-05-01T10:00:05.5Z"));
    }

    #[test]
    fn last_updated_skips_unparseable_timestamps() {
        let mut data = ProgressData::new();
        data.insert("a", done("2024-01-01T00:00:00Z"));
        data.insert("b", done("yesterday"));
        let stats = data.stats(&["a", "b"]);
        assert_eq!(stats.last_updated.as_deref(), Some("2024-01-01T00:00:00Z"));
    }
}
