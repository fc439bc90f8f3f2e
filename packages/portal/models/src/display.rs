//! Presentation helpers shared by front-ends.

use chrono::{DateTime, Utc};

use crate::REPORT_IMAGE_PREVIEW_LIMIT;

/// Formats `instant` relative to `now` the way report cards show it.
///
/// Under an hour (or a missing instant) is "방금 전", under a day is hours,
/// under a week is days, and anything older is the calendar date.
#[must_use]
pub fn format_relative(instant: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(instant) = instant else {
        return "방금 전".to_string();
    };

    let hours = (now - instant).num_hours();
    if hours < 1 {
        return "방금 전".to_string();
    }
    if hours < 24 {
        return format!("{hours}시간 전");
    }
    let days = hours / 24;
    if days < 7 {
        return format!("{days}일 전");
    }

    instant.format("%Y. %-m. %-d.").to_string()
}

/// Builds the link shared for a report.
#[must_use]
pub fn share_url(origin: &str, report_id: &str) -> String {
    format!("{}?report={report_id}", origin.trim_end_matches('/'))
}

/// Splits `images` into the ones shown inline and the number left over.
#[must_use]
pub fn preview_images(images: &[String]) -> (&[String], usize) {
    let shown = images.len().min(REPORT_IMAGE_PREVIEW_LIMIT);
    (&images[..shown], images.len() - shown)
}
