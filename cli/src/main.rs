//! Interactive CLI for issue-ferry.
//!
//! Migrates issues and their comments from one GitHub repository to
//! another: pick a mode, confirm, and watch the transfer happen.

mod prompt;

use clap::Parser;
use issue_ferry::octocrab::models::issues::Issue;
use issue_ferry::octocrab::models::IssueState;
use issue_ferry::{load_settings, MigrateError, Migrator, RunSummary};
use prompt::Mode;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Issue Ferry - migrate issues and their comments between GitHub repositories.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the settings file.
    #[arg(long, env = "ISSUE_FERRY_CONFIG", default_value = "issue-ferry.toml")]
    config: PathBuf,

    /// Preview batch migrations without writing anything.
    #[arg(long)]
    dry_run: bool,

    /// Migrations kept in flight at once for label batches.
    #[arg(long, default_value_t = 1)]
    concurrency: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    init_tracing();

    // Parse arguments
    let args = Args::parse();

    // Run the main logic
    match run(args).await {
        Ok(true) => ExitCode::from(0),
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic. Returns whether every migration succeeded.
async fn run(args: Args) -> Result<bool, MigrateError> {
    let settings = load_settings(&args.config)?;
    let migrator = Migrator::new(&settings)?.with_concurrency(args.concurrency);

    println!(
        "Migrating issues from {} to {}",
        migrator.source().full_name(),
        migrator.destination().full_name()
    );
    match migrator.rate_limit().await {
        Ok(info) => println!("API rate limit: {}/{} remaining", info.remaining, info.limit),
        Err(e) => warn!(error = %e, "Could not fetch rate limit status"),
    }

    let mut clean = true;
    loop {
        match prompt::mode() {
            Mode::SingleIssue => clean &= run_single(&migrator).await,
            Mode::ByLabels => clean &= run_by_labels(&migrator, args.dry_run).await?,
            Mode::AllIssues => clean &= run_all(&migrator, args.dry_run).await?,
            Mode::Quit => break,
        }
    }
    Ok(clean)
}

/// One-issue-at-a-time mode: prompt, fetch, confirm, migrate, repeat.
async fn run_single(migrator: &Migrator) -> bool {
    let mut clean = true;
    loop {
        let number = prompt::issue_number();
        match migrator.fetch_issue(number).await {
            Ok(issue) => {
                print_issue(&issue);
                if prompt::confirm("Migrate this issue?", true) {
                    clean &= migrate_one(migrator, &issue).await;
                }
            }
            Err(e) => {
                println!("Could not fetch issue #{number}: {e}");
                clean = false;
            }
        }
        if !prompt::confirm("Migrate another issue?", true) {
            break;
        }
    }
    clean
}

async fn migrate_one(migrator: &Migrator, issue: &Issue) -> bool {
    match migrator.migrate_issue(issue).await {
        Ok(migrated) => {
            println!(
                "Migrated #{} -> {}#{} ({} comments)",
                migrated.source_number,
                migrator.destination().full_name(),
                migrated.number,
                migrated.comments
            );
            if prompt::confirm("Open the new issue in your browser?", false) {
                if let Err(e) = open::that(&migrated.url) {
                    warn!(error = %e, "Could not open browser");
                }
            }
            true
        }
        Err(e) => {
            println!("Migration of #{} failed: {e}", issue.number);
            false
        }
    }
}

/// Label mode: open issues matching every label, migrated as one batch.
async fn run_by_labels(migrator: &Migrator, dry_run: bool) -> Result<bool, MigrateError> {
    loop {
        let labels = prompt::labels();
        if labels.is_empty() {
            println!("No labels given");
            if !prompt::confirm("Try again?", true) {
                return Ok(true);
            }
            continue;
        }

        let issues = migrator.open_issues_with_labels(&labels).await?;
        if issues.is_empty() {
            println!("No open issues match labels: {}", labels.join(", "));
            if !prompt::confirm("Search again?", true) {
                return Ok(true);
            }
            continue;
        }

        print_issue_list(&issues);
        if dry_run {
            print_dry_run_preview(migrator, &issues);
            return Ok(true);
        }
        if !prompt::confirm(&format!("Migrate these {} issues?", issues.len()), false) {
            return Ok(true);
        }

        let summary = migrator.migrate_bounded(issues).await;
        print_summary(&summary);
        return Ok(summary.all_success());
    }
}

/// Everything mode: every issue, ascending, strictly sequential.
async fn run_all(migrator: &Migrator, dry_run: bool) -> Result<bool, MigrateError> {
    let issues = migrator.all_issues().await?;
    if issues.is_empty() {
        println!("No issues to migrate");
        return Ok(true);
    }

    print_issue_list(&issues);
    if dry_run {
        print_dry_run_preview(migrator, &issues);
        return Ok(true);
    }
    if !prompt::confirm(&format!("Migrate all {} issues?", issues.len()), false) {
        return Ok(true);
    }

    let summary = migrator.migrate_sequential(&issues).await;
    if summary.has_failures() {
        println!("Batch aborted on first failure; remaining issues were not migrated.");
    }
    print_summary(&summary);
    Ok(summary.all_success())
}

fn print_issue(issue: &Issue) {
    println!();
    println!("#{} {}", issue.number, issue.title);
    println!("  state:  {}", state_str(&issue.state));
    println!("  author: @{}", issue.user.login);
    println!("  url:    {}", issue.html_url);
    if !issue.labels.is_empty() {
        let names: Vec<&str> = issue.labels.iter().map(|label| label.name.as_str()).collect();
        println!("  labels: {}", names.join(", "));
    }
}

fn print_issue_list(issues: &[Issue]) {
    println!();
    for (i, issue) in issues.iter().enumerate() {
        println!(
            "  [{}/{}] #{} {} ({})",
            i + 1,
            issues.len(),
            issue.number,
            issue.title,
            state_str(&issue.state)
        );
    }
}

fn print_dry_run_preview(migrator: &Migrator, issues: &[Issue]) {
    println!("\n[DRY RUN] Would migrate {} issues:", issues.len());
    for issue in issues {
        println!(
            "  #{} would become \"[{}] {}\"",
            issue.number,
            migrator.source().name,
            issue.title
        );
    }
    println!();
}

/// Prints the final batch summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!("  Issues migrated: {}", summary.migrated);
    println!("  Comments replayed: {}", summary.comments_replayed);
    println!("  Failures: {}", summary.failed);
}

fn state_str(state: &IssueState) -> &'static str {
    match state {
        IssueState::Open => "open",
        IssueState::Closed => "closed",
        _ => "unknown",
    }
}
