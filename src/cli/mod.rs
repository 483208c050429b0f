//! CLI definition and the run loop

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use console::style;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::{error, info};

use crate::config::{self, BackfillConfig};
use crate::git::{CommitStamp, GitRepo};
use crate::plan::{self, CommitPlan, DateSpec};

/// Pause between successive commits so git records strictly increasing
/// creation order even when wall-clock resolution is coarse.
const COMMIT_SPACING: Duration = Duration::from_millis(200);

/// Streakfill - keep a contribution graph continuous
#[derive(Parser, Debug)]
#[command(name = "streakfill")]
#[command(
    version,
    about = "Backfill missing days in a git contribution graph with empty, back-dated commits",
    after_help = "\
Examples:
  streakfill                                      Fill every day since the last commit
  streakfill --date 2025-11-01                    One specific day
  streakfill --dates 2025-11-01,2025-11-03        Several specific days
  streakfill --start-date 2025-10-28 --end-date 2025-10-30
  streakfill --time 09:30:00 --tz +02:00          Custom commit time of day
  streakfill --no-push --dry-run                  Show the plan, touch nothing
  streakfill --lookup-email                       Use the verified GitHub email (needs GITHUB_TOKEN)"
)]
pub struct Cli {
    /// Path to repository (default: current directory)
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,

    /// Single target date (YYYY-MM-DD, or a full ISO-8601 timestamp)
    #[arg(long)]
    pub date: Option<String>,

    /// Explicit target dates, comma separated or repeated
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub dates: Vec<String>,

    /// Range start, inclusive (YYYY-MM-DD)
    #[arg(long, requires = "end_date")]
    pub start_date: Option<String>,

    /// Range end, inclusive (YYYY-MM-DD)
    #[arg(long, requires = "start_date")]
    pub end_date: Option<String>,

    /// Time of day appended to date-only inputs
    #[arg(long, default_value = config::DEFAULT_TIME)]
    pub time: String,

    /// Timezone token appended to date-only inputs (Z, +02:00, ...)
    #[arg(long, default_value = config::DEFAULT_TZ)]
    pub tz: String,

    /// Commit message template; {date} is replaced with the bare date
    #[arg(long, default_value = config::DEFAULT_TEMPLATE)]
    pub message: String,

    /// Commit author/committer name (default: git config, else a fixed fallback)
    #[arg(long)]
    pub name: Option<String>,

    /// Commit author/committer email (default: git config, else a fixed fallback)
    #[arg(long)]
    pub email: Option<String>,

    /// Do not derive dates from the last commit when no dates are given
    #[arg(long)]
    pub no_auto: bool,

    /// Do not push after creating commits
    #[arg(long)]
    pub no_push: bool,

    /// Override the email with the account's verified address from the
    /// GitHub API (reads GITHUB_TOKEN)
    #[arg(long)]
    pub lookup_email: bool,

    /// Print the plan without creating commits or pushing
    #[arg(long)]
    pub dry_run: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,
}

/// Outcome of one run, feeds the final summary.
#[derive(Debug, Default)]
struct RunResult {
    created: usize,
    pushed: bool,
}

pub fn run(cli: Cli) -> Result<()> {
    let repo = GitRepo::open(&cli.repo)?;
    let identity = config::resolve_identity(cli.name, cli.email, &repo, cli.lookup_email);
    let cfg = BackfillConfig {
        identity,
        template: cli.message,
        time: cli.time,
        tz: cli.tz,
        push: !cli.no_push,
        dry_run: cli.dry_run,
    };

    let spec = DateSpec::from_args(cli.dates, cli.start_date, cli.end_date, cli.date, !cli.no_auto)?;
    let last_commit_day = matches!(spec, DateSpec::Auto)
        .then(|| repo.last_author_date().and_then(|iso| plan::utc_day_of(&iso)))
        .flatten();
    let dates = plan::resolve_dates(&spec, last_commit_day, Utc::now().date_naive())?;

    if dates.is_empty() {
        println!("Nothing to do: the last commit is already from today.");
        return Ok(());
    }
    info!(count = dates.len(), "resolved target dates");

    let mut result = RunResult {
        created: backfill(&repo, &cfg, &dates),
        ..Default::default()
    };

    if result.created > 0 && cfg.push && !cfg.dry_run {
        if let Err(e) = repo.push() {
            eprintln!("{e}");
            // Surface git's own status as ours
            std::process::exit(e.status.max(1));
        }
        result.pushed = true;
    }

    summary(&repo, &cfg, &result);
    Ok(())
}

/// The commit loop. Malformed dates and failed commits are skipped, never
/// fatal; partial success is expected.
fn backfill(repo: &GitRepo, cfg: &BackfillConfig, dates: &[String]) -> usize {
    let mut created = 0;
    for (i, date) in dates.iter().enumerate() {
        let plan = match CommitPlan::build(date, &cfg.time, &cfg.tz, &cfg.template) {
            Ok(plan) => plan,
            Err(e) => {
                error!("skipping {date}: {e}");
                continue;
            }
        };

        if cfg.dry_run {
            println!(
                "{} {}  {}",
                style("would commit").yellow(),
                plan.timestamp,
                plan.message
            );
            continue;
        }

        let stamp = CommitStamp {
            name: cfg.identity.name.clone(),
            email: cfg.identity.email.clone(),
            timestamp: plan.timestamp.clone(),
        };
        match repo.commit_empty(&plan.message, &stamp) {
            Ok(()) => {
                created += 1;
                println!("Created commit for {}", plan.timestamp);
                if i + 1 < dates.len() {
                    thread::sleep(COMMIT_SPACING);
                }
            }
            Err(e) => error!("commit for {date} failed: {e}"),
        }
    }
    created
}

fn summary(repo: &GitRepo, cfg: &BackfillConfig, result: &RunResult) {
    println!();
    if cfg.dry_run {
        println!("{}", style("Dry run - nothing was committed.").yellow().bold());
    } else {
        println!("{}", style("Backfill complete.").green().bold());
    }
    println!(
        "Identity: {} <{}>",
        cfg.identity.name, cfg.identity.email
    );
    println!("Commits created: {}", result.created);
    if result.pushed {
        println!("Pushed to upstream.");
    }
    if !cfg.dry_run && result.created > 0 {
        match repo.head_detail() {
            Ok(detail) => println!("\n{detail}"),
            Err(e) => error!("could not show HEAD: {e}"),
        }
    }
}
