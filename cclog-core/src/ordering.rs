use crate::models::ChangeEntry;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Increasing,
    Decreasing,
}

impl SortOrder {
    pub fn as_str(&self) -> &str {
        match self {
            SortOrder::Increasing => "increasing",
            SortOrder::Decreasing => "decreasing",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "increasing" | "asc" => Some(SortOrder::Increasing),
            "decreasing" | "desc" => Some(SortOrder::Decreasing),
            _ => None,
        }
    }
}

/// Orders change entries by date in a fixed direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateOrder {
    order: SortOrder,
}

impl DateOrder {
    pub fn new(order: SortOrder) -> Self {
        Self { order }
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// Compares two entries by date.
    ///
    /// # Panics
    ///
    /// Panics if either entry has no date. Callers must filter undated
    /// entries out before sorting with this comparator.
    pub fn compare(&self, e1: &ChangeEntry, e2: &ChangeEntry) -> Ordering {
        self.try_compare(e1, e2)
            .unwrap_or_else(|| panic!("cannot order change entries without a date"))
    }

    /// Like [`DateOrder::compare`], but returns `None` when a date is missing.
    pub fn try_compare(&self, e1: &ChangeEntry, e2: &ChangeEntry) -> Option<Ordering> {
        let ordering = e1.date()?.cmp(&e2.date()?);
        Some(match self.order {
            SortOrder::Increasing => ordering,
            SortOrder::Decreasing => ordering.reverse(),
        })
    }
}

/// Stable sort of dated entries.
///
/// # Panics
///
/// Panics if any entry has no date.
pub fn sort_entries(entries: &mut [ChangeEntry], order: SortOrder) {
    let cmp = DateOrder::new(order);
    entries.sort_by(|a, b| cmp.compare(a, b));
}

/// Stable sort that tolerates undated entries, which keep their relative
/// order and go after every dated entry.
pub fn sort_by_date(entries: Vec<ChangeEntry>, order: SortOrder) -> Vec<ChangeEntry> {
    let (mut dated, undated): (Vec<_>, Vec<_>) =
        entries.into_iter().partition(|e| e.date().is_some());
    sort_entries(&mut dated, order);
    dated.extend(undated);
    dated
}
