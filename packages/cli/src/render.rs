//! Plain-text rendering of portal collections and user notices.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use civic_portal_models::display::{format_relative, preview_images};
use civic_portal_models::{
    AssistanceCase, BestPractice, Comment, OfficialLink, Report, ReportStatus,
};
use civic_portal_store::{DataSource, LoadSummary};

/// Shown when the filtered report list is empty.
pub const EMPTY_REPORTS: &str = "등록된 제보가 없습니다. 첫 번째 제보를 등록해보세요!";

/// Shown when there are no best practices.
pub const EMPTY_BEST_PRACTICES: &str =
    "아직 우수 사례가 없습니다. 해결된 제보 중 많은 공감을 받은 사례가 여기에 표시됩니다.";

/// Shown when there are no assistance cases.
pub const EMPTY_CASES: &str =
    "처리 중인 민원이 없습니다. 민원 도움이 필요하시면 도움 요청을 작성해주세요.";

/// Shown when a report has no comments yet.
pub const EMPTY_COMMENTS: &str = "아직 댓글이 없습니다. 첫 번째 댓글을 작성해보세요!";

/// Shown when comments could not be loaded. Distinct from [`EMPTY_COMMENTS`].
pub const COMMENTS_UNAVAILABLE: &str = "댓글을 불러올 수 없습니다.";

/// A user-triggered operation whose outcome is announced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    LoadData,
    SubmitReport,
    ToggleLike,
    SubmitComment,
    SubmitAssistance,
    Share,
}

impl Action {
    /// Message shown when the action succeeds.
    #[must_use]
    pub const fn success_message(self) -> &'static str {
        match self {
            Self::LoadData => "데이터를 불러왔습니다.",
            Self::SubmitReport => "제보가 성공적으로 등록되었습니다!",
            Self::ToggleLike => "공감이 반영되었습니다.",
            Self::SubmitComment => "댓글이 등록되었습니다!",
            Self::SubmitAssistance => "민원 도움 요청이 등록되었습니다!",
            Self::Share => "링크가 생성되었습니다!",
        }
    }

    /// Message shown when the action fails.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::LoadData => "데이터를 불러오는데 실패했습니다.",
            Self::SubmitReport => "제보 등록에 실패했습니다. 다시 시도해주세요.",
            Self::ToggleLike => "공감하기에 실패했습니다.",
            Self::SubmitComment => "댓글 등록에 실패했습니다. 다시 시도해주세요.",
            Self::SubmitAssistance => "민원 도움 요청 등록에 실패했습니다. 다시 시도해주세요.",
            Self::Share => "제보를 찾을 수 없습니다.",
        }
    }
}

/// Renders one report card.
#[must_use]
pub fn report_card(report: &Report, comment_count: usize, now: DateTime<Utc>) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "[{}] [{}] {}  #{}",
        report.category.label(),
        report.status.label(),
        format_relative(Some(report.created_at), now),
        report.id,
    );
    let _ = writeln!(out, "  {}", report.title);
    if let Some(location) = report.location.as_deref().filter(|l| !l.is_empty()) {
        let _ = writeln!(out, "  위치: {location}");
    }
    let _ = writeln!(out, "  {}", report.description);

    let (shown, rest) = preview_images(&report.images);
    if !shown.is_empty() {
        let _ = write!(out, "  이미지: {}", shown.join(", "));
        if rest > 0 {
            let _ = write!(out, " (+{rest}개 더)");
        }
        out.push('\n');
    }

    let liked = if report.liked { " (공감함)" } else { "" };
    let resolved = if report.status == ReportStatus::Resolved {
        "✔ "
    } else {
        ""
    };
    let _ = writeln!(
        out,
        "  공감 {}{liked} · 댓글 {comment_count} · {resolved}신고자: {}",
        report.likes,
        report.display_reporter(),
    );

    out
}

/// Renders one best-practice card.
#[must_use]
pub fn best_practice_card(practice: &BestPractice, now: DateTime<Utc>) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "🏆 우수사례 [{}] 해결일: {}",
        practice.category.label(),
        format_relative(practice.updated_at, now),
    );
    let _ = writeln!(out, "  {}", practice.title);
    let _ = writeln!(out, "  {}", practice.description);

    for (index, image) in practice.images.iter().take(2).enumerate() {
        let label = if index == 0 { "개선 전" } else { "개선 후" };
        let _ = writeln!(out, "  {label}: {image}");
    }

    let _ = writeln!(out, "  {}명이 공감 · 처리기관: 관련 기관", practice.likes);
    out
}

/// Renders one assistance case card.
#[must_use]
pub fn assistance_case_card(case: &AssistanceCase, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "사건번호: {} [{}]",
        case.case_number,
        case.status.label()
    );
    let _ = writeln!(out, "  {}", case.title);
    let _ = writeln!(out, "  {}", case.description);
    let _ = writeln!(
        out,
        "  신청자: {} | 접수일: {}",
        case.applicant,
        format_relative(Some(case.created_at), now),
    );
    out
}

/// Renders one official link.
#[must_use]
pub fn official_link_line(link: &OfficialLink) -> String {
    format!("[{}] {} - {}\n  {}\n", link.icon, link.name, link.description, link.url)
}

/// Renders one comment.
#[must_use]
pub fn comment_line(comment: &Comment, now: DateTime<Utc>) -> String {
    let official = if comment.is_official { " [공식]" } else { "" };
    format!(
        "({}) {}{official} · {}\n  {}\n",
        comment.avatar(),
        comment.author,
        format_relative(Some(comment.created_at), now),
        comment.content,
    )
}

/// Describes the outcome of the initial load.
///
/// # Errors
///
/// Returns the notice naming the collections that fell back to sample
/// data, if any did.
pub fn load_summary(summary: &LoadSummary) -> Result<&'static str, String> {
    let fallbacks: Vec<&str> = [
        ("reports", summary.reports),
        ("official links", summary.official_links),
        ("best practices", summary.best_practices),
        ("assistance cases", summary.assistance_cases),
    ]
    .into_iter()
    .filter(|(_, source)| *source == DataSource::Fallback)
    .map(|(name, _)| name)
    .collect();

    if fallbacks.is_empty() {
        return Ok(Action::LoadData.success_message());
    }
    Err(format!(
        "{} (sample data shown for: {})",
        Action::LoadData.failure_message(),
        fallbacks.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use civic_portal_models::{ANONYMOUS_REPORTER, AssistanceStatus, ReportCategory};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap()
    }

    fn report() -> Report {
        Report {
            id: "42".to_string(),
            title: "Broken light".to_string(),
            description: "Out since Monday".to_string(),
            location: Some("Main St".to_string()),
            category: ReportCategory::Safety,
            status: ReportStatus::Resolved,
            reporter: Some("Kim".to_string()),
            is_anonymous: true,
            likes: 7,
            liked: true,
            images: (1..=5).map(|i| format!("/uploads/{i}.png")).collect(),
            created_at: now() - Duration::hours(3),
        }
    }

    #[test]
    fn report_card_shows_labels_and_hides_anonymous_reporter() {
        let card = report_card(&report(), 2, now());
        assert!(card.contains("[안전] [해결됨] 3시간 전"));
        assert!(card.contains("위치: Main St"));
        assert!(card.contains("(+2개 더)"));
        assert!(card.contains("공감 7 (공감함) · 댓글 2"));
        assert!(card.contains(&format!("신고자: {ANONYMOUS_REPORTER}")));
        assert!(!card.contains("Kim"));
    }

    #[test]
    fn best_practice_card_marks_before_and_after() {
        let practice = BestPractice::from(&report());
        let card = best_practice_card(&practice, now());
        assert!(card.contains("해결일: 방금 전"));
        assert!(card.contains("개선 전: /uploads/1.png"));
        assert!(card.contains("개선 후: /uploads/2.png"));
        assert!(!card.contains("/uploads/3.png"));
        assert!(card.contains("7명이 공감"));
    }

    #[test]
    fn assistance_card_shows_case_number() {
        let case = AssistanceCase {
            id: "1".to_string(),
            case_number: "CASE-2024-001".to_string(),
            title: "통학로 안전시설 개선 요청".to_string(),
            description: "...".to_string(),
            applicant: "학부모연합회".to_string(),
            status: AssistanceStatus::Review,
            created_at: now() - Duration::days(3),
        };
        let card = assistance_case_card(&case, now());
        assert!(card.starts_with("사건번호: CASE-2024-001 [검토중]"));
        assert!(card.contains("접수일: 3일 전"));
    }

    #[test]
    fn official_comments_are_marked() {
        let comment = Comment {
            author: "시청".to_string(),
            content: "조치했습니다".to_string(),
            is_official: true,
            created_at: now(),
        };
        let line = comment_line(&comment, now());
        assert!(line.starts_with("(관) 시청 [공식]"));
    }

    #[test]
    fn load_summary_lists_fallbacks() {
        let all_remote = LoadSummary {
            reports: DataSource::Remote,
            official_links: DataSource::Remote,
            best_practices: DataSource::Remote,
            assistance_cases: DataSource::Remote,
        };
        assert_eq!(
            load_summary(&all_remote),
            Ok(Action::LoadData.success_message())
        );

        let partial = LoadSummary {
            official_links: DataSource::Fallback,
            ..all_remote
        };
        let message = load_summary(&partial).unwrap_err();
        assert!(message.ends_with("(sample data shown for: official links)"));
    }
}
