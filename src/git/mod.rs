//! Git collaborator
//!
//! Thin wrappers around the `git` command line. Streakfill never links a git
//! library; every operation (config read, last-commit query, empty commit,
//! push) shells out to the tool the user already has.

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::debug;

/// Identity and timestamp applied to a single commit.
///
/// Passed as per-process environment on the spawned `git commit` only, so
/// nothing leaks into this process's environment and nothing needs cleanup
/// on any exit path.
#[derive(Debug, Clone)]
pub struct CommitStamp {
    pub name: String,
    pub email: String,
    /// Full ISO-8601 timestamp, e.g. `2025-11-01T12:00:00Z`.
    pub timestamp: String,
}

/// Push failure carrying git's own exit status, which becomes ours.
#[derive(Error, Debug)]
#[error("git push failed (exit {status}): {stderr}")]
pub struct PushFailure {
    pub status: i32,
    pub stderr: String,
}

/// Handle on a local repository, addressed by working directory.
pub struct GitRepo {
    path: PathBuf,
}

impl GitRepo {
    /// Open a repository, verifying the path is inside a git work tree.
    pub fn open(path: &Path) -> Result<Self> {
        let output = Command::new("git")
            .args(["rev-parse", "--is-inside-work-tree"])
            .current_dir(path)
            .output()
            .context("failed to run git (is it installed?)")?;
        if !output.status.success() {
            return Err(anyhow!("not a git repository: {}", path.display()));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Read a single config value, e.g. `user.name`. Absent keys yield None.
    pub fn config_get(&self, key: &str) -> Option<String> {
        let output = Command::new("git")
            .args(["config", "--get", key])
            .current_dir(&self.path)
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!value.is_empty()).then_some(value)
    }

    /// Author timestamp of the most recent commit, ISO-8601.
    ///
    /// Returns None when the query fails or the repository has no commits;
    /// auto mode falls back to "yesterday" in that case.
    pub fn last_author_date(&self) -> Option<String> {
        let output = Command::new("git")
            .args(["log", "-1", "--format=%aI"])
            .current_dir(&self.path)
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!value.is_empty()).then_some(value)
    }

    /// Create an empty commit with author and committer both set to `stamp`.
    pub fn commit_empty(&self, message: &str, stamp: &CommitStamp) -> Result<()> {
        debug!(timestamp = %stamp.timestamp, "creating empty commit");
        let output = Command::new("git")
            .args(["commit", "--allow-empty", "--no-verify", "-m", message])
            .env("GIT_AUTHOR_NAME", &stamp.name)
            .env("GIT_AUTHOR_EMAIL", &stamp.email)
            .env("GIT_AUTHOR_DATE", &stamp.timestamp)
            .env("GIT_COMMITTER_NAME", &stamp.name)
            .env("GIT_COMMITTER_EMAIL", &stamp.email)
            .env("GIT_COMMITTER_DATE", &stamp.timestamp)
            .current_dir(&self.path)
            .output()
            .context("failed to run git commit")?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("git commit failed: {}", stderr.trim()));
        }
        Ok(())
    }

    /// Push the current branch to its upstream.
    pub fn push(&self) -> Result<(), PushFailure> {
        let output = Command::new("git")
            .args(["push"])
            .current_dir(&self.path)
            .output()
            .map_err(|e| PushFailure {
                status: 1,
                stderr: format!("failed to run git push: {e}"),
            })?;
        if !output.status.success() {
            return Err(PushFailure {
                status: output.status.code().unwrap_or(1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }

    /// HEAD commit in full detail (fuller format shows both author and
    /// committer dates, which is the whole point here).
    pub fn head_detail(&self) -> Result<String> {
        let output = Command::new("git")
            .args(["show", "--no-patch", "--format=fuller", "HEAD"])
            .current_dir(&self.path)
            .output()
            .context("failed to run git show")?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("git show HEAD failed: {}", stderr.trim()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    }
}
