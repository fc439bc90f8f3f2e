//! Non-interactive subcommand handlers.

use chrono::Utc;
use civic_portal_api::PortalError;
use civic_portal_models::{AssistanceDraft, CategoryFilter, ReportDraft, SortKey};
use civic_portal_store::ReportStore;

use crate::render::{self, Action};
use crate::{Commands, attachments};

/// Runs one subcommand against a loaded store.
///
/// # Errors
///
/// Returns an error if the command's API call fails. The user-facing
/// failure message has already been printed.
pub async fn run(store: &mut ReportStore, command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Reports { category, sort } => print_reports(store, category, sort),
        Commands::BestPractices => print_best_practices(store),
        Commands::Links => print_links(store),
        Commands::Cases => print_cases(store),
        Commands::SubmitReport {
            title,
            category,
            description,
            location,
            reporter,
            images,
        } => {
            let images = attachments::load_images(&images)?;
            let draft = ReportDraft {
                title,
                category,
                location,
                description,
                is_anonymous: reporter.is_none(),
                reporter_name: reporter,
                images,
            };
            let report = announce(Action::SubmitReport, store.submit_report(&draft).await)?;
            print!("{}", render::report_card(report, 0, Utc::now()));
        }
        Commands::Like { id } => like(store, &id).await?,
        Commands::Comments { id } => print_comments(store, &id).await?,
        Commands::Comment { id, content } => {
            announce(Action::SubmitComment, store.submit_comment(&id, &content).await)?;
            if let Err(e) = print_comments(store, &id).await {
                log::warn!("comments for report {id} could not be reloaded: {e}");
            }
        }
        Commands::RequestAssistance {
            title,
            description,
            applicant,
        } => {
            let draft = AssistanceDraft {
                title,
                description,
                applicant,
            };
            let case = announce(
                Action::SubmitAssistance,
                store.submit_assistance_case(&draft).await,
            )?;
            print!("{}", render::assistance_case_card(case, Utc::now()));
        }
        Commands::Share { id, origin } => {
            let Some(url) = store.share_url(&origin, &id) else {
                eprintln!("{}", Action::Share.failure_message());
                return Err(format!("Unknown report: {id}").into());
            };
            println!("{url}");
        }
    }

    Ok(())
}

/// Prints the outcome of `action` and converts its error for `main`.
///
/// # Errors
///
/// Returns the operation's error after printing the failure message.
pub fn announce<T>(action: Action, result: Result<T, PortalError>) -> Result<T, Box<dyn std::error::Error>> {
    match result {
        Ok(value) => {
            println!("{}", action.success_message());
            Ok(value)
        }
        Err(e) => {
            eprintln!("{}", action.failure_message());
            Err(e.into())
        }
    }
}

/// Toggles the like on a report and prints its refreshed card.
///
/// # Errors
///
/// Returns the request error after printing the failure message.
pub async fn like(store: &mut ReportStore, report_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    match announce(Action::ToggleLike, store.toggle_like(report_id).await)?.cloned() {
        Some(report) => {
            let count = store.comment_count(&report.id);
            print!("{}", render::report_card(&report, count, Utc::now()));
        }
        None => log::info!("report {report_id} is not in the current list"),
    }
    Ok(())
}

/// Prints the filtered report list.
pub fn print_reports(store: &ReportStore, category: CategoryFilter, sort: SortKey) {
    let reports = store.filtered_reports(category, sort);
    if reports.is_empty() {
        println!("{}", render::EMPTY_REPORTS);
        return;
    }

    let now = Utc::now();
    for report in &reports {
        println!("{}", render::report_card(report, store.comment_count(&report.id), now));
    }
}

/// Prints the best practices shown on the best-practices tab.
pub fn print_best_practices(store: &ReportStore) {
    let practices = store.best_practices_top();
    if practices.is_empty() {
        println!("{}", render::EMPTY_BEST_PRACTICES);
        return;
    }

    let now = Utc::now();
    for practice in practices {
        println!("{}", render::best_practice_card(practice, now));
    }
}

/// Prints the assistance cases.
pub fn print_cases(store: &ReportStore) {
    let cases = store.assistance_cases();
    if cases.is_empty() {
        println!("{}", render::EMPTY_CASES);
        return;
    }

    let now = Utc::now();
    for case in cases {
        println!("{}", render::assistance_case_card(case, now));
    }
}

/// Prints the official links.
pub fn print_links(store: &ReportStore) {
    for link in store.official_links() {
        println!("{}", render::official_link_line(link));
    }
}

/// Fetches and prints the comments on a report.
///
/// # Errors
///
/// Returns the fetch error after printing the "unavailable" notice.
pub async fn print_comments(store: &mut ReportStore, report_id: &str) -> Result<(), PortalError> {
    let comments = match store.load_comments(report_id).await {
        Ok(comments) => comments,
        Err(e) => {
            eprintln!("{}", render::COMMENTS_UNAVAILABLE);
            return Err(e);
        }
    };

    if comments.is_empty() {
        println!("{}", render::EMPTY_COMMENTS);
        return Ok(());
    }

    let now = Utc::now();
    for comment in &comments {
        print!("{}", render::comment_line(comment, now));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::TimeZone;
    use civic_portal_api::PortalApi;
    use civic_portal_models::{
        AssistanceCase, BestPractice, Comment, CommentDraft, OfficialLink, Report, ReportCategory,
        ReportStatus,
    };

    use super::*;

    /// Serves a single report. Comment reads always fail with HTTP 500.
    struct FlakyCommentsApi {
        like_reply_id: &'static str,
        posted: Mutex<Vec<String>>,
    }

    impl FlakyCommentsApi {
        fn new(like_reply_id: &'static str) -> Self {
            Self {
                like_reply_id,
                posted: Mutex::new(vec![]),
            }
        }
    }

    fn report(id: &str) -> Report {
        Report {
            id: id.to_string(),
            title: "가로등 고장".to_string(),
            description: "...".to_string(),
            location: None,
            category: ReportCategory::Safety,
            status: ReportStatus::Pending,
            reporter: None,
            is_anonymous: true,
            likes: 3,
            liked: false,
            images: vec![],
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
        }
    }

    #[async_trait]
    impl PortalApi for FlakyCommentsApi {
        async fn list_reports(&self) -> Result<Vec<Report>, PortalError> {
            Ok(vec![report("1")])
        }

        async fn create_report(&self, _draft: &ReportDraft) -> Result<Report, PortalError> {
            Err(PortalError::Network { status: 500 })
        }

        async fn like_report(&self, _report_id: &str) -> Result<Report, PortalError> {
            let mut liked = report(self.like_reply_id);
            liked.likes += 1;
            liked.liked = true;
            Ok(liked)
        }

        async fn list_comments(&self, _report_id: &str) -> Result<Vec<Comment>, PortalError> {
            Err(PortalError::Network { status: 500 })
        }

        async fn create_comment(
            &self,
            _report_id: &str,
            draft: &CommentDraft,
        ) -> Result<Comment, PortalError> {
            self.posted.lock().unwrap().push(draft.content.clone());
            Ok(Comment {
                author: draft.author.clone(),
                content: draft.content.clone(),
                is_official: false,
                created_at: Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap(),
            })
        }

        async fn list_official_links(&self) -> Result<Vec<OfficialLink>, PortalError> {
            Ok(vec![])
        }

        async fn list_best_practices(&self) -> Result<Vec<BestPractice>, PortalError> {
            Ok(vec![])
        }

        async fn list_assistance_cases(&self) -> Result<Vec<AssistanceCase>, PortalError> {
            Ok(vec![])
        }

        async fn create_assistance_case(
            &self,
            _draft: &AssistanceDraft,
        ) -> Result<AssistanceCase, PortalError> {
            Err(PortalError::Network { status: 500 })
        }
    }

    async fn loaded_store(api: &Arc<FlakyCommentsApi>) -> ReportStore {
        let mut store = ReportStore::new(api.clone());
        store.load_all().await;
        store
    }

    #[tokio::test]
    async fn posted_comment_succeeds_even_if_reload_fails() {
        let api = Arc::new(FlakyCommentsApi::new("1"));
        let mut store = loaded_store(&api).await;

        let command = Commands::Comment {
            id: "1".to_string(),
            content: "  저도 봤어요  ".to_string(),
        };
        assert!(run(&mut store, command).await.is_ok());
        assert_eq!(*api.posted.lock().unwrap(), ["저도 봤어요"]);
    }

    #[tokio::test]
    async fn blank_comment_fails_without_posting() {
        let api = Arc::new(FlakyCommentsApi::new("1"));
        let mut store = loaded_store(&api).await;

        let command = Commands::Comment {
            id: "1".to_string(),
            content: "   ".to_string(),
        };
        assert!(run(&mut store, command).await.is_err());
        assert!(api.posted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn like_stores_refreshed_report() {
        let api = Arc::new(FlakyCommentsApi::new("1"));
        let mut store = loaded_store(&api).await;

        like(&mut store, "1").await.unwrap();
        let report = store.find_report("1").unwrap();
        assert!(report.liked);
        assert_eq!(report.likes, 4);
    }

    #[tokio::test]
    async fn like_answered_with_other_report_changes_nothing() {
        let api = Arc::new(FlakyCommentsApi::new("2"));
        let mut store = loaded_store(&api).await;

        like(&mut store, "1").await.unwrap();
        assert_eq!(store.reports(), [report("1")].as_slice());
    }
}
