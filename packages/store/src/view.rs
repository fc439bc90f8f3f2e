//! Pure functions over the store's collections.

use std::cmp::Reverse;

use civic_portal_api::PortalError;
use civic_portal_models::{CategoryFilter, Report, SortKey};

/// Returns the reports passing `filter`, ordered by `sort`.
///
/// The sort is stable, so ties keep collection order. `source` is never
/// modified.
#[must_use]
pub fn filter_and_sort(source: &[Report], filter: CategoryFilter, sort: SortKey) -> Vec<Report> {
    let mut reports: Vec<Report> = source
        .iter()
        .filter(|r| filter.matches(r.category))
        .cloned()
        .collect();

    match sort {
        SortKey::Latest => reports.sort_by_key(|r| Reverse(r.created_at)),
        SortKey::Likes | SortKey::Comments => reports.sort_by_key(|r| Reverse(r.likes)),
    }

    reports
}

/// Picks the fetched collection, or the fallback when the fetch failed.
#[must_use]
pub fn select<T>(fetched: Result<Vec<T>, PortalError>, fallback: impl FnOnce() -> Vec<T>) -> Vec<T> {
    fetched.unwrap_or_else(|_| fallback())
}
