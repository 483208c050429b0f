//! End-to-end tests driving the streakfill binary against throwaway repos.
//!
//! Covers the contract surface: inclusive range enumeration, per-date skip
//! behavior, auto mode's nothing-to-do case, dry runs, and push failure
//! being fatal while commit failures are not.

use std::path::Path;
use std::process::Command;

fn streakfill_bin() -> String {
    env!("CARGO_BIN_EXE_streakfill").to_string()
}

fn run_git(repo_dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn make_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    run_git(dir.path(), &["init"]);
    run_git(dir.path(), &["config", "user.name", "test-user"]);
    run_git(dir.path(), &["config", "user.email", "test@example.com"]);
    run_git(dir.path(), &["commit", "--allow-empty", "-m", "initial"]);
    dir
}

fn run_fill(dir: &Path, extra_args: &[&str]) -> (i32, String, String) {
    let mut cmd = Command::new(streakfill_bin());
    cmd.arg("--repo").arg(dir);
    cmd.args(["--name", "Backfill Bot", "--email", "bot@example.com"]);
    for arg in extra_args {
        cmd.arg(arg);
    }
    // Never hit the network from tests
    cmd.env_remove("GITHUB_TOKEN");
    let output = cmd.output().expect("failed to run streakfill");
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

fn commit_count(dir: &Path) -> usize {
    run_git(dir, &["rev-list", "--count", "HEAD"])
        .trim()
        .parse()
        .unwrap()
}

/// Author dates of all commits after the initial one, oldest first.
fn backfilled_author_dates(dir: &Path) -> Vec<String> {
    run_git(dir, &["log", "--reverse", "--format=%aI"])
        .lines()
        .skip(1)
        .map(str::to_string)
        .collect()
}

#[test]
fn range_creates_one_commit_per_day_inclusive() {
    let repo = make_repo();
    let (code, _, stderr) = run_fill(
        repo.path(),
        &[
            "--start-date",
            "2025-10-28",
            "--end-date",
            "2025-10-30",
            "--no-push",
        ],
    );
    assert_eq!(code, 0, "stderr: {stderr}");
    assert_eq!(commit_count(repo.path()), 4);

    let dates = backfilled_author_dates(repo.path());
    assert_eq!(dates.len(), 3);
    assert!(dates[0].starts_with("2025-10-28T12:00:00"));
    assert!(dates[1].starts_with("2025-10-29T12:00:00"));
    assert!(dates[2].starts_with("2025-10-30T12:00:00"));

    let subjects = run_git(repo.path(), &["log", "--format=%s"]);
    assert!(subjects.contains("Restore streak for 2025-10-29"));
}

#[test]
fn reversed_range_fails_before_any_commit() {
    let repo = make_repo();
    let (code, _, _) = run_fill(
        repo.path(),
        &[
            "--start-date",
            "2025-10-30",
            "--end-date",
            "2025-10-28",
            "--no-push",
        ],
    );
    assert_ne!(code, 0);
    assert_eq!(commit_count(repo.path()), 1, "no commits should be created");
}

#[test]
fn malformed_list_entry_is_skipped_not_fatal() {
    let repo = make_repo();
    let (code, _, _) = run_fill(
        repo.path(),
        &["--dates", "2025-11-01,not-a-date,2025-11-03", "--no-push"],
    );
    assert_eq!(code, 0, "a bad date must not abort the run");
    assert_eq!(commit_count(repo.path()), 3);

    let dates = backfilled_author_dates(repo.path());
    assert!(dates[0].starts_with("2025-11-01"));
    assert!(dates[1].starts_with("2025-11-03"));
}

#[test]
fn custom_time_zone_and_template_apply() {
    let repo = make_repo();
    let (code, _, _) = run_fill(
        repo.path(),
        &[
            "--date",
            "2025-11-01",
            "--time",
            "09:30:00",
            "--tz",
            "+02:00",
            "--message",
            "Backfill {date} done",
            "--no-push",
        ],
    );
    assert_eq!(code, 0);

    let dates = backfilled_author_dates(repo.path());
    assert_eq!(dates, vec!["2025-11-01T09:30:00+02:00"]);

    let subject = run_git(repo.path(), &["log", "-1", "--format=%s"]);
    assert_eq!(subject.trim(), "Backfill 2025-11-01 done");
}

#[test]
fn full_timestamp_date_passes_through() {
    let repo = make_repo();
    let (code, _, _) = run_fill(repo.path(), &["--date", "2025-11-01T08:00:00Z", "--no-push"]);
    assert_eq!(code, 0);

    let dates = backfilled_author_dates(repo.path());
    assert_eq!(dates.len(), 1);
    assert!(dates[0].starts_with("2025-11-01T08:00:00"));
}

#[test]
fn auto_mode_with_fresh_commit_does_nothing() {
    let repo = make_repo();
    // The initial commit is from right now, so there is no gap to fill.
    // Push stays enabled: zero commits means no push is attempted, and a
    // push in this upstream-less repo would fail loudly.
    let (code, stdout, stderr) = run_fill(repo.path(), &[]);
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.contains("Nothing to do"), "stdout: {stdout}");
    assert_eq!(commit_count(repo.path()), 1);
}

#[test]
fn no_auto_without_dates_is_an_error() {
    let repo = make_repo();
    let (code, _, stderr) = run_fill(repo.path(), &["--no-auto", "--no-push"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("no target dates"), "stderr: {stderr}");
}

#[test]
fn push_failure_is_fatal_but_commits_survive() {
    let repo = make_repo();
    // No upstream configured, so the push must fail after the commits land.
    let (code, _, _) = run_fill(
        repo.path(),
        &["--start-date", "2025-10-01", "--end-date", "2025-10-02"],
    );
    assert_ne!(code, 0);
    assert_eq!(commit_count(repo.path()), 3, "commits are kept locally");
}

#[test]
fn dry_run_touches_nothing() {
    let repo = make_repo();
    let (code, stdout, _) = run_fill(
        repo.path(),
        &[
            "--dry-run",
            "--start-date",
            "2025-10-28",
            "--end-date",
            "2025-10-30",
        ],
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("would commit"), "stdout: {stdout}");
    assert_eq!(commit_count(repo.path()), 1);
}

#[test]
fn identity_falls_back_to_git_config() {
    let repo = make_repo();
    let mut cmd = Command::new(streakfill_bin());
    cmd.arg("--repo").arg(repo.path());
    cmd.args(["--date", "2025-11-01", "--no-push"]);
    cmd.env_remove("GITHUB_TOKEN");
    let output = cmd.output().unwrap();
    assert_eq!(output.status.code(), Some(0));

    let line = run_git(repo.path(), &["log", "-1", "--format=%an <%ae>"]);
    assert_eq!(line.trim(), "test-user <test@example.com>");
}
