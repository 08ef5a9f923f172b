use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// One historical change pulled from the version control history.
///
/// Everything except the affected paths is fixed at construction; paths can
/// only be appended with [`ChangeEntry::add_path`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    date: Option<DateTime<Utc>>,
    user: String,
    version: String,
    event_description: String,
    operation: String,
    comment: String,
    affected_paths: Vec<String>,
}

impl ChangeEntry {
    pub fn new(date: Option<DateTime<Utc>>, user: impl Into<String>) -> Self {
        Self {
            date,
            user: user.into(),
            version: String::new(),
            event_description: String::new(),
            operation: String::new(),
            comment: String::new(),
            affected_paths: Vec::new(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_event_description(mut self, event_description: impl Into<String>) -> Self {
        self.event_description = event_description.into();
        self
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = operation.into();
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Single-path convenience form used by most callers.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.add_path(path);
        self
    }

    pub fn add_path(&mut self, path: impl Into<String>) {
        self.affected_paths.push(path.into());
    }

    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.date
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn event_description(&self) -> &str {
        &self.event_description
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn affected_paths(&self) -> &[String] {
        &self.affected_paths
    }

    /// Literal, case-sensitive prefix match against every affected path.
    pub fn contains_path_with_prefix(&self, rule: &str) -> bool {
        self.affected_paths.iter().any(|p| p.starts_with(rule))
    }

    /// The subset of `rules` this entry touches, in the order given.
    pub fn matching_rules<'a, S: AsRef<str>>(&self, rules: &'a [S]) -> Vec<&'a str> {
        rules
            .iter()
            .map(|rule| rule.as_ref())
            .filter(|rule| self.contains_path_with_prefix(rule))
            .collect()
    }
}

/// Last synchronized timestamp per load rule.
///
/// A rule that is not present has never been synchronized. There is no
/// sentinel value for that state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadRuleWatermarks {
    rules: BTreeMap<String, DateTime<Utc>>,
}

impl LoadRuleWatermarks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, rule: &str) -> Option<DateTime<Utc>> {
        self.rules.get(rule).copied()
    }

    pub fn set(&mut self, rule: impl Into<String>, date: DateTime<Utc>) {
        self.rules.insert(rule.into(), date);
    }

    pub fn remove(&mut self, rule: &str) -> Option<DateTime<Utc>> {
        self.rules.remove(rule)
    }

    pub fn contains(&self, rule: &str) -> bool {
        self.rules.contains_key(rule)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates rules in lexical order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, DateTime<Utc>> {
        self.rules.iter()
    }

    /// Folds `other` into `self`, keeping the later timestamp for each rule.
    /// A watermark never moves backwards.
    pub fn merge_latest(&mut self, other: &LoadRuleWatermarks) {
        for (rule, date) in other.iter() {
            match self.rules.get_mut(rule) {
                Some(current) if *current >= *date => {}
                Some(current) => *current = *date,
                None => {
                    self.rules.insert(rule.clone(), *date);
                }
            }
        }
    }
}

impl<'a> IntoIterator for &'a LoadRuleWatermarks {
    type Item = (&'a String, &'a DateTime<Utc>);
    type IntoIter = btree_map::Iter<'a, String, DateTime<Utc>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// A list of change entries with a few read-only summaries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeLog {
    entries: Vec<ChangeEntry>,
}

impl ChangeLog {
    pub fn new(entries: Vec<ChangeEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ChangeEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ChangeEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct users in first-seen order.
    pub fn authors(&self) -> Vec<&str> {
        let mut authors: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !authors.contains(&entry.user()) {
                authors.push(entry.user());
            }
        }
        authors
    }
}

impl From<Vec<ChangeEntry>> for ChangeLog {
    fn from(entries: Vec<ChangeEntry>) -> Self {
        Self::new(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn june(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2013, 6, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_entry_creation() {
        let entry = ChangeEntry::new(Some(june(1)), "fubar")
            .with_version("/main/3")
            .with_event_description("create version")
            .with_operation("checkin")
            .with_comment("improved build performance")
            .with_path("/vobs/source/apps/java/project/build.gradle");

        assert_eq!(entry.date(), Some(june(1)));
        assert_eq!(entry.user(), "fubar");
        assert_eq!(entry.version(), "/main/3");
        assert_eq!(entry.operation(), "checkin");
        assert_eq!(entry.affected_paths().len(), 1);
    }

    #[test]
    fn test_entry_without_paths() {
        let entry = ChangeEntry::new(None, "fubar");
        assert!(entry.affected_paths().is_empty());
        assert!(!entry.contains_path_with_prefix("/vobs"));
    }

    #[test]
    fn test_add_path_preserves_order() {
        let mut entry = ChangeEntry::new(None, "fubar").with_path("/vobs/b");
        entry.add_path("/vobs/a");
        entry.add_path("/vobs/c");
        assert_eq!(entry.affected_paths(), ["/vobs/b", "/vobs/a", "/vobs/c"]);
    }

    #[test]
    fn test_contains_path_with_prefix() {
        let entry = ChangeEntry::new(None, "fubar")
            .with_path("/vobs/source/apps/java/project/build.gradle");

        assert!(entry.contains_path_with_prefix("/vobs/source/apps/java"));
        assert!(entry.contains_path_with_prefix("/vobs/source/apps/ja"));
        assert!(!entry.contains_path_with_prefix("/vobs/source/apps/JAVA"));
        assert!(!entry.contains_path_with_prefix("/vobs/repo"));
    }

    #[test]
    fn test_matching_rules() {
        let entry = ChangeEntry::new(None, "fubar")
            .with_path("/vobs/source/apps/java/Main.java")
            .with_path("/vobs/source/libs/common/common.properties");
        let rules = ["/vobs/source/libs/common", "/vobs/repo", "/vobs/source"];

        assert_eq!(
            entry.matching_rules(&rules),
            vec!["/vobs/source/libs/common", "/vobs/source"]
        );
    }

    #[test]
    fn test_watermarks_absence() {
        let mut watermarks = LoadRuleWatermarks::new();
        assert!(watermarks.is_empty());
        assert_eq!(watermarks.get("/vobs/source"), None);

        watermarks.set("/vobs/source", june(1));
        assert!(watermarks.contains("/vobs/source"));
        assert_eq!(watermarks.len(), 1);

        assert_eq!(watermarks.remove("/vobs/source"), Some(june(1)));
        assert!(!watermarks.contains("/vobs/source"));
    }

    #[test]
    fn test_merge_latest_never_regresses() {
        let mut current = LoadRuleWatermarks::new();
        current.set("/vobs/java", june(10));
        current.set("/vobs/common", june(1));

        let mut incoming = LoadRuleWatermarks::new();
        incoming.set("/vobs/java", june(5));
        incoming.set("/vobs/common", june(7));
        incoming.set("/vobs/repo", june(3));

        current.merge_latest(&incoming);

        assert_eq!(current.get("/vobs/java"), Some(june(10)));
        assert_eq!(current.get("/vobs/common"), Some(june(7)));
        assert_eq!(current.get("/vobs/repo"), Some(june(3)));
    }

    #[test]
    fn test_change_log_authors() {
        let log = ChangeLog::from(vec![
            ChangeEntry::new(None, "bob"),
            ChangeEntry::new(None, "alice"),
            ChangeEntry::new(None, "bob"),
        ]);

        assert_eq!(log.len(), 3);
        assert_eq!(log.authors(), vec!["bob", "alice"]);
    }
}
