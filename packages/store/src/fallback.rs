//! Constant datasets substituted when a startup fetch fails.
//!
//! The datasets are TOML files under `fallback/`, embedded at compile time
//! so the portal always has something to show without a backend.

use civic_portal_models::{AssistanceCase, BestPractice, OfficialLink, Report};
use serde::Deserialize;

const REPORTS_TOML: &str = include_str!("../fallback/reports.toml");
const OFFICIAL_LINKS_TOML: &str = include_str!("../fallback/official_links.toml");
const ASSISTANCE_CASES_TOML: &str = include_str!("../fallback/assistance_cases.toml");

#[derive(Deserialize)]
struct ReportsFile {
    reports: Vec<Report>,
}

#[derive(Deserialize)]
struct OfficialLinksFile {
    links: Vec<OfficialLink>,
}

#[derive(Deserialize)]
struct AssistanceCasesFile {
    cases: Vec<AssistanceCase>,
}

/// Sample reports shown when `GET /reports` fails.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed.
#[must_use]
pub fn reports() -> Vec<Report> {
    let file: ReportsFile = toml::de::from_str(REPORTS_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse fallback reports: {e}"));
    file.reports
}

/// Links shown when `GET /official-links` fails.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed.
#[must_use]
pub fn official_links() -> Vec<OfficialLink> {
    let file: OfficialLinksFile = toml::de::from_str(OFFICIAL_LINKS_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse fallback official links: {e}"));
    file.links
}

/// Cases shown when `GET /assistance-cases` fails.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed.
#[must_use]
pub fn assistance_cases() -> Vec<AssistanceCase> {
    let file: AssistanceCasesFile = toml::de::from_str(ASSISTANCE_CASES_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse fallback assistance cases: {e}"));
    file.cases
}

/// Best practices derived from `reports` when `GET /best-practices` fails:
/// every resolved report with enough likes, in collection order.
#[must_use]
pub fn best_practices(reports: &[Report]) -> Vec<BestPractice> {
    reports
        .iter()
        .filter(|r| r.is_best_practice())
        .map(BestPractice::from)
        .collect()
}
