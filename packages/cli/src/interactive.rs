//! Interactive menu over the portal's tabs.
//!
//! Loops until the user quits. A failed API call prints its notice and
//! returns to the menu; only prompt failures (e.g. a closed terminal) end
//! the session.

use civic_portal_models::{
    AssistanceDraft, CategoryFilter, ReportCategory, ReportDraft, SortKey,
};
use civic_portal_store::ReportStore;
use dialoguer::{Confirm, Input, Select};

use crate::commands::{
    announce, like, print_best_practices, print_cases, print_comments, print_links, print_reports,
};
use crate::render::Action;
use crate::{DEFAULT_SHARE_ORIGIN, attachments, render};

/// Top-level tabs of the portal.
enum Tab {
    Reports,
    NewReport,
    Assistance,
    BestPractices,
    Resources,
    Quit,
}

impl Tab {
    const ALL: &[Self] = &[
        Self::Reports,
        Self::NewReport,
        Self::Assistance,
        Self::BestPractices,
        Self::Resources,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Reports => "제보 목록",
            Self::NewReport => "새 제보 등록",
            Self::Assistance => "민원 도움",
            Self::BestPractices => "우수 사례",
            Self::Resources => "공식 링크",
            Self::Quit => "종료",
        }
    }
}

/// Actions available on a selected report.
enum ReportAction {
    Like,
    Comments,
    Comment,
    Share,
    Back,
}

impl ReportAction {
    const ALL: &[Self] = &[
        Self::Like,
        Self::Comments,
        Self::Comment,
        Self::Share,
        Self::Back,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Like => "공감하기",
            Self::Comments => "댓글 보기",
            Self::Comment => "댓글 쓰기",
            Self::Share => "공유",
            Self::Back => "뒤로",
        }
    }
}

/// Runs the interactive menu until the user quits.
///
/// # Errors
///
/// Returns an error if a user prompt fails.
pub async fn run(store: &mut ReportStore) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = Tab::ALL.iter().map(Tab::label).collect();

    loop {
        println!();
        let idx = Select::new()
            .with_prompt("시민 제보 포털")
            .items(&labels)
            .default(0)
            .interact()?;

        match Tab::ALL[idx] {
            Tab::Reports => handle_reports(store).await?,
            Tab::NewReport => handle_new_report(store).await?,
            Tab::Assistance => handle_assistance(store).await?,
            Tab::BestPractices => print_best_practices(store),
            Tab::Resources => print_links(store),
            Tab::Quit => return Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Shows the filtered report list and lets the user act on one report.
async fn handle_reports(store: &mut ReportStore) -> Result<(), Box<dyn std::error::Error>> {
    let filter = pick_category_filter()?;
    let sort = pick_sort_key()?;

    print_reports(store, filter, sort);

    let reports = store.filtered_reports(filter, sort);
    if reports.is_empty() {
        return Ok(());
    }

    let mut labels: Vec<String> = reports
        .iter()
        .map(|r| format!("#{} {}", r.id, r.title))
        .collect();
    labels.push("뒤로".to_string());

    let idx = Select::new()
        .with_prompt("제보 선택")
        .items(&labels)
        .default(0)
        .interact()?;
    let Some(report) = reports.get(idx) else {
        return Ok(());
    };

    handle_report_action(store, &report.id).await
}

async fn handle_report_action(
    store: &mut ReportStore,
    report_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = ReportAction::ALL.iter().map(ReportAction::label).collect();
    let idx = Select::new()
        .with_prompt("작업 선택")
        .items(&labels)
        .default(0)
        .interact()?;

    match ReportAction::ALL[idx] {
        ReportAction::Like => {
            let _ = like(store, report_id).await;
        }
        ReportAction::Comments => {
            let _ = print_comments(store, report_id).await;
        }
        ReportAction::Comment => {
            let content: String = Input::new()
                .with_prompt("댓글")
                .allow_empty(true)
                .interact_text()?;
            if announce(
                Action::SubmitComment,
                store.submit_comment(report_id, &content).await,
            )
            .is_ok()
            {
                let _ = print_comments(store, report_id).await;
            }
        }
        ReportAction::Share => match store.share_url(DEFAULT_SHARE_ORIGIN, report_id) {
            Some(url) => {
                println!("{}", Action::Share.success_message());
                println!("{url}");
            }
            None => eprintln!("{}", Action::Share.failure_message()),
        },
        ReportAction::Back => {}
    }

    Ok(())
}

/// Prompts for a new report and submits it.
async fn handle_new_report(store: &mut ReportStore) -> Result<(), Box<dyn std::error::Error>> {
    let title: String = Input::new().with_prompt("제목").interact_text()?;

    let category_labels: Vec<&str> = ReportCategory::all()
        .iter()
        .map(|c| c.label())
        .collect();
    let category_idx = Select::new()
        .with_prompt("분류")
        .items(&category_labels)
        .default(0)
        .interact()?;
    let category = ReportCategory::all()[category_idx];

    let location: String = Input::new()
        .with_prompt("위치 (선택)")
        .allow_empty(true)
        .interact_text()?;
    let description: String = Input::new().with_prompt("내용").interact_text()?;

    let is_anonymous = Confirm::new()
        .with_prompt("익명으로 제보하시겠습니까?")
        .default(true)
        .interact()?;
    let reporter_name = if is_anonymous {
        None
    } else {
        let name: String = Input::new().with_prompt("이름").interact_text()?;
        Some(name)
    };

    let image_input: String = Input::new()
        .with_prompt("이미지 파일 (쉼표로 구분, 선택)")
        .allow_empty(true)
        .interact_text()?;
    let images = match attachments::load_images(&attachments::parse_path_list(&image_input)) {
        Ok(images) => images,
        Err(e) => {
            eprintln!("{} ({e})", Action::SubmitReport.failure_message());
            return Ok(());
        }
    };

    let draft = ReportDraft {
        title,
        category,
        location: Some(location).filter(|l| !l.trim().is_empty()),
        description,
        is_anonymous,
        reporter_name,
        images,
    };

    if let Ok(report) = announce(Action::SubmitReport, store.submit_report(&draft).await) {
        print!("{}", render::report_card(report, 0, chrono::Utc::now()));
    }
    Ok(())
}

/// Lists assistance cases and optionally files a new request.
async fn handle_assistance(store: &mut ReportStore) -> Result<(), Box<dyn std::error::Error>> {
    print_cases(store);

    let file_new = Confirm::new()
        .with_prompt("민원 도움을 요청하시겠습니까?")
        .default(false)
        .interact()?;
    if !file_new {
        return Ok(());
    }

    let title: String = Input::new().with_prompt("제목").interact_text()?;
    let description: String = Input::new().with_prompt("내용").interact_text()?;
    let applicant: String = Input::new().with_prompt("신청자").interact_text()?;

    let draft = AssistanceDraft {
        title,
        description,
        applicant,
    };
    if let Ok(case) = announce(
        Action::SubmitAssistance,
        store.submit_assistance_case(&draft).await,
    ) {
        print!("{}", render::assistance_case_card(case, chrono::Utc::now()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Pickers
// ---------------------------------------------------------------------------

fn pick_category_filter() -> Result<CategoryFilter, Box<dyn std::error::Error>> {
    let filters: Vec<CategoryFilter> = std::iter::once(CategoryFilter::All)
        .chain(ReportCategory::all().iter().copied().map(CategoryFilter::Only))
        .collect();
    let labels: Vec<&str> = filters
        .iter()
        .map(|f| match f {
            CategoryFilter::All => "전체",
            CategoryFilter::Only(category) => category.label(),
        })
        .collect();

    let idx = Select::new()
        .with_prompt("분류")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(filters[idx])
}

fn pick_sort_key() -> Result<SortKey, Box<dyn std::error::Error>> {
    let labels: Vec<&str> = SortKey::all()
        .iter()
        .map(|key| match key {
            SortKey::Latest => "최신순",
            SortKey::Likes => "공감순",
            SortKey::Comments => "댓글순",
        })
        .collect();

    let idx = Select::new()
        .with_prompt("정렬")
        .items(&labels)
        .default(1)
        .interact()?;
    Ok(SortKey::all()[idx])
}
