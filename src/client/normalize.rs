//! Merging loosely-shaped records with the starter set.

use std::cmp::Ordering;

use crate::models::{Project, ProjectRecord};

/// Fill the gaps of `record` from the starter project with the same slug.
pub fn normalize_record(record: ProjectRecord, starters: &[Project]) -> Project {
    record.complete(starters)
}

pub fn normalize_projects<I>(records: I, starters: &[Project]) -> Vec<Project>
where
    I: IntoIterator<Item = ProjectRecord>,
{
    records
        .into_iter()
        .map(|record| normalize_record(record, starters))
        .collect()
}

/// Newest first; undated records follow, by title descending.
pub fn compare_newest_first(a: &Project, b: &Project) -> Ordering {
    match (a.sort_date(), b.sort_date()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.title.cmp(&a.title),
    }
}
