#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Report, assistance case, and reference types for the civic complaint
//! portal.
//!
//! These types mirror the JSON contract of the portal's REST API. Every
//! enumerated tag (category, status) is a closed enum so that display
//! labels are resolved by exhaustive `match` rather than a lookup table.

pub mod display;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Reporter name sent and displayed for anonymous reports and comments.
pub const ANONYMOUS_REPORTER: &str = "anonymous";

/// Minimum like count for a resolved report to count as a best practice.
pub const BEST_PRACTICE_MIN_LIKES: u32 = 50;

/// Number of best practices shown on the best-practices tab.
pub const BEST_PRACTICE_DISPLAY_LIMIT: usize = 10;

/// Number of images shown inline on a report card.
pub const REPORT_IMAGE_PREVIEW_LIMIT: usize = 3;

/// Category of a citizen report.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ReportCategory {
    /// Hazards to people (broken signals, unsafe crossings)
    Safety,
    /// Buses, traffic, and road usage
    Transport,
    /// Public facilities and structures
    Infrastructure,
    /// Anything not fitting the other categories
    Other,
}

impl ReportCategory {
    /// Returns the display label shown in the portal UI.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Safety => "안전",
            Self::Transport => "교통",
            Self::Infrastructure => "시설",
            Self::Other => "기타",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Safety,
            Self::Transport,
            Self::Infrastructure,
            Self::Other,
        ]
    }
}

/// Processing status of a report. Transitions happen server-side.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ReportStatus {
    /// Received, not yet picked up
    Pending,
    /// Being handled by the responsible agency
    InProgress,
    /// Closed as fixed
    Resolved,
}

impl ReportStatus {
    /// Returns the display label shown in the portal UI.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "접수됨",
            Self::InProgress => "처리중",
            Self::Resolved => "해결됨",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Pending, Self::InProgress, Self::Resolved]
    }
}

/// Processing status of an assistance case.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AssistanceStatus {
    /// Waiting to be accepted
    Pending,
    /// Under review
    Review,
    /// Being processed
    Processing,
    /// Completed
    Resolved,
}

impl AssistanceStatus {
    /// Returns the display label shown in the portal UI.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "접수 대기",
            Self::Review => "검토중",
            Self::Processing => "처리중",
            Self::Resolved => "완료",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Pending,
            Self::Review,
            Self::Processing,
            Self::Resolved,
        ]
    }
}

/// Category selector for the report list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    /// Every category.
    #[default]
    All,
    /// A single category.
    Only(ReportCategory),
}

impl CategoryFilter {
    /// Returns `true` if a report in `category` passes this filter.
    #[must_use]
    pub fn matches(self, category: ReportCategory) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(category) => write!(f, "{category}"),
        }
    }
}

/// Ordering applied to the report list.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum SortKey {
    /// Newest first by creation time.
    Latest,
    /// Most liked first.
    #[default]
    Likes,
    /// Selectable in the UI, but ordered by likes: comment counts are not
    /// fetched in bulk.
    Comments,
}

impl SortKey {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Latest, Self::Likes, Self::Comments]
    }
}

/// A citizen-submitted complaint as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Opaque identifier assigned by the server.
    pub id: String,
    /// Short headline.
    pub title: String,
    /// Free-text body.
    pub description: String,
    /// Where the problem is, if given.
    #[serde(default)]
    pub location: Option<String>,
    /// Report category.
    pub category: ReportCategory,
    /// Processing status.
    pub status: ReportStatus,
    /// Reporter display name (or the anonymous sentinel).
    #[serde(default)]
    pub reporter: Option<String>,
    /// Whether the reporter asked to stay anonymous.
    #[serde(default)]
    pub is_anonymous: bool,
    /// Server-authoritative like count.
    #[serde(default)]
    pub likes: u32,
    /// Whether this client has liked the report. Not persisted across
    /// sessions.
    #[serde(default)]
    pub liked: bool,
    /// Image URIs in upload order.
    #[serde(default)]
    pub images: Vec<String>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
}

impl Report {
    /// Returns the name shown as the reporter.
    ///
    /// Anonymous reports, and reports without a usable name, show
    /// [`ANONYMOUS_REPORTER`].
    #[must_use]
    pub fn display_reporter(&self) -> &str {
        if self.is_anonymous {
            return ANONYMOUS_REPORTER;
        }
        match self.reporter.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => ANONYMOUS_REPORTER,
        }
    }

    /// Returns `true` if this report qualifies as a best practice: resolved
    /// and liked at least [`BEST_PRACTICE_MIN_LIKES`] times.
    #[must_use]
    pub const fn is_best_practice(&self) -> bool {
        matches!(self.status, ReportStatus::Resolved) && self.likes >= BEST_PRACTICE_MIN_LIKES
    }
}

/// An image file attached to a report submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    /// File name sent in the multipart part.
    pub file_name: String,
    /// MIME type, e.g. `image/png`.
    pub mime_type: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

/// A report as entered by the user, before the server assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDraft {
    /// Short headline.
    pub title: String,
    /// Report category.
    pub category: ReportCategory,
    /// Where the problem is. Sent as an empty field when absent.
    pub location: Option<String>,
    /// Free-text body.
    pub description: String,
    /// Whether to hide the reporter name.
    pub is_anonymous: bool,
    /// Name typed by the user; ignored when anonymous.
    pub reporter_name: Option<String>,
    /// Attached images, possibly none.
    pub images: Vec<ImageAttachment>,
}

impl ReportDraft {
    /// Returns the value sent in the `reporter` field.
    #[must_use]
    pub fn reporter_field(&self) -> &str {
        if self.is_anonymous {
            ANONYMOUS_REPORTER
        } else {
            self.reporter_name.as_deref().unwrap_or_default()
        }
    }
}

/// A tracked request for help with a civic complaint process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistanceCase {
    /// Opaque identifier assigned by the server.
    pub id: String,
    /// Human-readable tracking code, e.g. `CASE-2024-001`.
    pub case_number: String,
    /// Short headline.
    pub title: String,
    /// Free-text body.
    pub description: String,
    /// Who asked for help.
    pub applicant: String,
    /// Server-managed status.
    pub status: AssistanceStatus,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /assistance-cases`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistanceDraft {
    /// Short headline.
    pub title: String,
    /// Free-text body.
    pub description: String,
    /// Who asks for help.
    pub applicant: String,
}

/// A comment on a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Author display name.
    pub author: String,
    /// Comment text.
    pub content: String,
    /// Whether this is a response from an official agency.
    #[serde(default)]
    pub is_official: bool,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Avatar text for the comment: `관` for official responses, otherwise
    /// the author's first character.
    #[must_use]
    pub fn avatar(&self) -> String {
        if self.is_official {
            return "관".to_string();
        }
        self.author.chars().next().map(String::from).unwrap_or_default()
    }
}

/// Body of `POST /reports/{id}/comments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDraft {
    /// Author display name.
    pub author: String,
    /// Comment text.
    pub content: String,
}

impl CommentDraft {
    /// Creates a draft authored by [`ANONYMOUS_REPORTER`]. The portal never
    /// collects a name for comments.
    #[must_use]
    pub fn anonymous(content: impl Into<String>) -> Self {
        Self {
            author: ANONYMOUS_REPORTER.to_string(),
            content: content.into(),
        }
    }
}

/// A resolved, well-liked report promoted as an exemplar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestPractice {
    /// Identifier of the underlying report.
    pub id: String,
    /// Short headline.
    pub title: String,
    /// Free-text body.
    pub description: String,
    /// Report category.
    pub category: ReportCategory,
    /// Like count.
    #[serde(default)]
    pub likes: u32,
    /// Before/after images.
    #[serde(default)]
    pub images: Vec<String>,
    /// When the case was resolved. Only curated server lists carry it.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Report> for BestPractice {
    fn from(report: &Report) -> Self {
        Self {
            id: report.id.clone(),
            title: report.title.clone(),
            description: report.description.clone(),
            category: report.category,
            likes: report.likes,
            images: report.images.clone(),
            updated_at: None,
        }
    }
}

/// A static reference to an external government resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficialLink {
    /// Identifier, if the server provides one.
    #[serde(default)]
    pub id: Option<String>,
    /// Resource name.
    pub name: String,
    /// One-line summary.
    pub description: String,
    /// Target URL.
    pub url: String,
    /// Icon name (Font Awesome, without the `fa-` prefix).
    pub icon: String,
    /// Grouping, e.g. `government`.
    #[serde(default)]
    pub category: Option<String>,
}
