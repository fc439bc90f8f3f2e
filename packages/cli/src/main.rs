#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal front-end for the civic complaint portal.
//!
//! Every invocation loads the portal's collections first (falling back to
//! sample data when the API is unreachable), then runs one subcommand. With
//! no subcommand, an interactive menu walks the same tabs as the web
//! portal: reports, assistance, best practices, and resources.

mod attachments;
mod commands;
mod interactive;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use civic_portal_api::{ApiConfig, HttpPortalApi};
use civic_portal_models::{CategoryFilter, ReportCategory, SortKey};
use civic_portal_store::ReportStore;
use clap::{Parser, Subcommand};

/// Origin used for share links when `--origin` is not given.
pub const DEFAULT_SHARE_ORIGIN: &str = "http://127.0.0.1:8080";

#[derive(Parser)]
#[command(name = "civic_portal", about = "Civic complaint portal client")]
struct Cli {
    /// API base URL (overrides `CIVIC_PORTAL_API_BASE`)
    #[arg(long, global = true)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List reports
    Reports {
        /// Category to show: `all`, `safety`, `transport`, `infrastructure`, or `other`
        #[arg(long, default_value = "all")]
        category: CategoryFilter,
        /// Ordering: `latest`, `likes`, or `comments`
        #[arg(long, default_value = "likes")]
        sort: SortKey,
    },
    /// List best practices (resolved, well-liked reports)
    BestPractices,
    /// List official government links
    Links,
    /// List assistance cases
    Cases,
    /// Submit a new report
    SubmitReport {
        /// Short headline
        title: String,
        /// Report category
        #[arg(long)]
        category: ReportCategory,
        /// Free-text body
        description: String,
        /// Where the problem is
        #[arg(long)]
        location: Option<String>,
        /// Reporter name; the report is anonymous when omitted
        #[arg(long)]
        reporter: Option<String>,
        /// Image file to attach (repeatable)
        #[arg(long = "image")]
        images: Vec<PathBuf>,
    },
    /// Like or unlike a report
    Like {
        /// Report ID
        id: String,
    },
    /// Show the comments on a report
    Comments {
        /// Report ID
        id: String,
    },
    /// Comment on a report (always anonymous)
    Comment {
        /// Report ID
        id: String,
        /// Comment text
        content: String,
    },
    /// Ask for help with a civic complaint process
    RequestAssistance {
        /// Short headline
        title: String,
        /// Free-text body
        description: String,
        /// Who is asking
        applicant: String,
    },
    /// Print the share link of a report
    Share {
        /// Report ID
        id: String,
        /// Portal origin the link points at
        #[arg(long, default_value = DEFAULT_SHARE_ORIGIN)]
        origin: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let mut config = ApiConfig::from_env()?;
    if let Some(base) = &cli.api_base {
        config = config.with_base_url(base);
    }
    log::debug!("using API at {}", config.base_url);

    let api = HttpPortalApi::new(&config)?;
    let mut store = ReportStore::new(Arc::new(api));

    let summary = store.load_all().await;
    match render::load_summary(&summary) {
        Ok(message) => log::info!("{message}"),
        Err(message) => eprintln!("{message}"),
    }

    let Some(command) = cli.command else {
        return interactive::run(&mut store).await;
    };

    commands::run(&mut store, command).await
}
