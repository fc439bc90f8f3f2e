#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory report store synchronized with the civic portal API.
//!
//! [`ReportStore`] owns the portal's four collections (reports, assistance
//! cases, best practices, official links) and mediates every read and
//! mutation through the [`PortalApi`]. All mutations take `&mut self`, so a
//! find-then-replace is never interleaved with another store operation.
//!
//! Startup loading never fails: each collection that cannot be fetched is
//! replaced by its [`fallback`] dataset. Every other operation returns the
//! [`PortalError`] to the caller and leaves the collections untouched on
//! failure.

pub mod fallback;
pub mod view;

use std::collections::BTreeMap;
use std::sync::Arc;

use civic_portal_api::{PortalApi, PortalError};
use civic_portal_models::{
    AssistanceCase, AssistanceDraft, BEST_PRACTICE_DISPLAY_LIMIT, BestPractice, CategoryFilter,
    Comment, CommentDraft, OfficialLink, Report, ReportDraft, SortKey, display,
};

/// Where a collection's contents came from after [`ReportStore::load_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// Fetched from the API.
    Remote,
    /// The fetch failed and the fallback dataset was used.
    Fallback,
}

impl DataSource {
    fn of<T>(result: &Result<T, PortalError>) -> Self {
        if result.is_ok() {
            Self::Remote
        } else {
            Self::Fallback
        }
    }
}

/// Outcome of [`ReportStore::load_all`], one entry per collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    /// Source of the reports collection.
    pub reports: DataSource,
    /// Source of the official links collection.
    pub official_links: DataSource,
    /// Source of the best practices collection.
    pub best_practices: DataSource,
    /// Source of the assistance cases collection.
    pub assistance_cases: DataSource,
}

/// Owner of the portal's in-memory collections.
pub struct ReportStore {
    api: Arc<dyn PortalApi>,
    reports: Vec<Report>,
    assistance_cases: Vec<AssistanceCase>,
    best_practices: Vec<BestPractice>,
    official_links: Vec<OfficialLink>,
    comment_counts: BTreeMap<String, usize>,
}

impl ReportStore {
    /// Creates an empty store backed by `api`. Call [`Self::load_all`]
    /// before rendering.
    #[must_use]
    pub fn new(api: Arc<dyn PortalApi>) -> Self {
        Self {
            api,
            reports: Vec::new(),
            assistance_cases: Vec::new(),
            best_practices: Vec::new(),
            official_links: Vec::new(),
            comment_counts: BTreeMap::new(),
        }
    }

    /// Reports, most recently submitted first.
    #[must_use]
    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// Assistance cases, most recently submitted first.
    #[must_use]
    pub fn assistance_cases(&self) -> &[AssistanceCase] {
        &self.assistance_cases
    }

    /// All best practices.
    #[must_use]
    pub fn best_practices(&self) -> &[BestPractice] {
        &self.best_practices
    }

    /// The best practices shown on the best-practices tab.
    #[must_use]
    pub fn best_practices_top(&self) -> &[BestPractice] {
        let shown = self.best_practices.len().min(BEST_PRACTICE_DISPLAY_LIMIT);
        &self.best_practices[..shown]
    }

    /// Official reference links.
    #[must_use]
    pub fn official_links(&self) -> &[OfficialLink] {
        &self.official_links
    }

    /// Looks up a report by id.
    #[must_use]
    pub fn find_report(&self, report_id: &str) -> Option<&Report> {
        self.reports.iter().find(|r| r.id == report_id)
    }

    /// Number of comments seen on the last successful
    /// [`Self::load_comments`] for this report, or 0 if never loaded.
    #[must_use]
    pub fn comment_count(&self, report_id: &str) -> usize {
        self.comment_counts.get(report_id).copied().unwrap_or(0)
    }

    /// Link for sharing a known report, or `None` if the id is not in the
    /// collection.
    #[must_use]
    pub fn share_url(&self, origin: &str, report_id: &str) -> Option<String> {
        self.find_report(report_id)
            .map(|r| display::share_url(origin, &r.id))
    }

    /// Fetches all four collections concurrently.
    ///
    /// The fetches are independent: a failure only replaces that
    /// collection with its fallback dataset. Derived best practices are
    /// computed from the reports collection once the reports fetch has
    /// settled. Returns after all four have settled.
    pub async fn load_all(&mut self) -> LoadSummary {
        let api = Arc::clone(&self.api);
        let (reports, official_links, best_practices, assistance_cases) = tokio::join!(
            api.list_reports(),
            api.list_official_links(),
            api.list_best_practices(),
            api.list_assistance_cases(),
        );

        let summary = LoadSummary {
            reports: DataSource::of(&reports),
            official_links: DataSource::of(&official_links),
            best_practices: DataSource::of(&best_practices),
            assistance_cases: DataSource::of(&assistance_cases),
        };

        log_fallback("reports", &reports);
        log_fallback("official links", &official_links);
        log_fallback("best practices", &best_practices);
        log_fallback("assistance cases", &assistance_cases);

        self.reports = view::select(reports, fallback::reports);
        self.official_links = view::select(official_links, fallback::official_links);
        self.best_practices =
            view::select(best_practices, || fallback::best_practices(&self.reports));
        self.assistance_cases = view::select(assistance_cases, fallback::assistance_cases);

        log::debug!(
            "loaded {} reports, {} links, {} best practices, {} assistance cases",
            self.reports.len(),
            self.official_links.len(),
            self.best_practices.len(),
            self.assistance_cases.len(),
        );

        summary
    }

    /// Reports in `filter`, ordered by `sort`. See [`view::filter_and_sort`].
    #[must_use]
    pub fn filtered_reports(&self, filter: CategoryFilter, sort: SortKey) -> Vec<Report> {
        view::filter_and_sort(&self.reports, filter, sort)
    }

    /// Submits a new report and puts the server's record first.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError`] if the request fails; the collection is left
    /// unchanged.
    pub async fn submit_report(&mut self, draft: &ReportDraft) -> Result<&Report, PortalError> {
        let created = self.api.create_report(draft).await?;
        log::info!("report {} created", created.id);

        let before = self.reports.len();
        self.reports.retain(|r| r.id != created.id);
        if self.reports.len() != before {
            log::debug!("replaced existing report {} with created record", created.id);
        }

        self.reports.insert(0, created);
        Ok(&self.reports[0])
    }

    /// Flips the like state of a report on the server and stores the
    /// server's record.
    ///
    /// Returns `Ok(None)` when the report is no longer in the collection or
    /// the server answers with a different report; the server's update is
    /// then dropped, so ids stay unique.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError`] if the request fails.
    pub async fn toggle_like(&mut self, report_id: &str) -> Result<Option<&Report>, PortalError> {
        let updated = self.api.like_report(report_id).await?;
        if updated.id != report_id {
            log::warn!(
                "like for report {report_id} answered with report {}; update dropped",
                updated.id
            );
            return Ok(None);
        }

        let Some(index) = self.reports.iter().position(|r| r.id == report_id) else {
            log::debug!("like update for unknown report {report_id} dropped");
            return Ok(None);
        };

        self.reports[index] = updated;
        Ok(Some(&self.reports[index]))
    }

    /// Fetches the comments of a report, in server order. Nothing is
    /// cached: every call hits the API.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError`] if the request fails. Callers should show a
    /// load error rather than an empty comment list.
    pub async fn load_comments(&mut self, report_id: &str) -> Result<Vec<Comment>, PortalError> {
        let comments = self.api.list_comments(report_id).await?;
        self.comment_counts
            .insert(report_id.to_string(), comments.len());
        Ok(comments)
    }

    /// Posts an anonymous comment on a report.
    ///
    /// Surrounding whitespace is trimmed. The local comment list is not
    /// touched; call [`Self::load_comments`] to refresh it.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Validation`] without contacting the server if
    /// `content` is blank, or [`PortalError`] if the request fails.
    pub async fn submit_comment(
        &self,
        report_id: &str,
        content: &str,
    ) -> Result<Comment, PortalError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(PortalError::Validation {
                message: "comment content is empty".to_string(),
            });
        }

        self.api
            .create_comment(report_id, &CommentDraft::anonymous(content))
            .await
    }

    /// Submits an assistance request and puts the server's record first.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError`] if the request fails; the collection is left
    /// unchanged.
    pub async fn submit_assistance_case(
        &mut self,
        draft: &AssistanceDraft,
    ) -> Result<&AssistanceCase, PortalError> {
        let created = self.api.create_assistance_case(draft).await?;
        log::info!("assistance case {} created", created.case_number);
        self.assistance_cases.insert(0, created);
        Ok(&self.assistance_cases[0])
    }
}

fn log_fallback<T>(what: &str, result: &Result<T, PortalError>) {
    if let Err(e) = result {
        log::warn!("Failed to load {what}, using fallback data: {e}");
    }
}
