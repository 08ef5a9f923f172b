//! Incremental reconciliation of change entries against load rule watermarks.
//!
//! A reconciliation pass takes a freshly collected batch of entries, drops
//! the ones an earlier pass already accounted for, and advances the
//! watermark of every load rule the surviving entries touch.

use crate::models::{ChangeEntry, LoadRuleWatermarks};
use crate::ordering::{sort_by_date, SortOrder};
use tracing::{debug, info};

/// Latest entry date per load rule.
///
/// Undated entries are skipped. Rules that no dated entry touches are left
/// out of the result entirely.
pub fn latest_watermarks<S: AsRef<str>>(
    entries: &[ChangeEntry],
    load_rules: &[S],
) -> LoadRuleWatermarks {
    let mut watermarks = LoadRuleWatermarks::new();

    for rule in load_rules.iter().map(|r| r.as_ref()) {
        let latest = entries
            .iter()
            .filter(|e| e.contains_path_with_prefix(rule))
            .filter_map(|e| e.date())
            .max();

        if let Some(date) = latest {
            debug!("Latest change for load rule {} at {}", rule, date);
            watermarks.set(rule, date);
        }
    }

    watermarks
}

/// Whether `entry` is at or before the watermark of any load rule it touches.
///
/// Undated entries and rules without a watermark never make an entry stale.
pub fn is_stale<S: AsRef<str>>(
    entry: &ChangeEntry,
    watermarks: &LoadRuleWatermarks,
    load_rules: &[S],
) -> bool {
    let Some(date) = entry.date() else {
        return false;
    };

    load_rules
        .iter()
        .map(|r| r.as_ref())
        .filter(|rule| entry.contains_path_with_prefix(rule))
        .filter_map(|rule| watermarks.get(rule))
        .any(|watermark| date <= watermark)
}

/// Drops every stale entry from `entries`. Returns true if anything was removed.
pub fn remove_stale_entries<S: AsRef<str>>(
    entries: &mut Vec<ChangeEntry>,
    watermarks: &LoadRuleWatermarks,
    load_rules: &[S],
) -> bool {
    if entries.is_empty() || watermarks.is_empty() {
        return false;
    }

    let before = entries.len();
    entries.retain(|entry| {
        let stale = is_stale(entry, watermarks, load_rules);
        if stale {
            debug!(
                "Dropping already synchronized change {} by {}",
                entry.version(),
                entry.user()
            );
        }
        !stale
    });

    entries.len() < before
}

/// Result of a full reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Entries that were not yet accounted for.
    pub entries: Vec<ChangeEntry>,
    /// Prior watermarks advanced by the new entries; persist for the next pass.
    pub watermarks: LoadRuleWatermarks,
    /// Number of entries dropped as already synchronized.
    pub removed: usize,
}

/// Runs one reconciliation pass over a batch of entries.
///
/// `prior` is left untouched. When `order` is given, the new entries are
/// sorted by date with undated entries last.
pub fn reconcile<S: AsRef<str>>(
    mut entries: Vec<ChangeEntry>,
    prior: &LoadRuleWatermarks,
    load_rules: &[S],
    order: Option<SortOrder>,
) -> ReconcileOutcome {
    let total = entries.len();
    remove_stale_entries(&mut entries, prior, load_rules);
    let removed = total - entries.len();

    let mut watermarks = prior.clone();
    watermarks.merge_latest(&latest_watermarks(&entries, load_rules));

    if let Some(order) = order {
        entries = sort_by_date(entries, order);
    }

    info!(
        "Reconciled {} change(s): {} new, {} already synchronized",
        total,
        entries.len(),
        removed
    );

    ReconcileOutcome {
        entries,
        watermarks,
        removed,
    }
}
