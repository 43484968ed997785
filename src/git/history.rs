//! Reading the mainline history of a checkout.
//!
//! Version references are found by their release commit subject; canary
//! references are commit hashes and resolved by git directly. The candidate
//! list between two commits is ordered oldest first and includes both ends.

use std::path::Path;

use crate::types::{Reference, Sha};

use super::{GitError, GitResult, is_ancestor, rev_parse, run_git_stdout};

/// One commit of the mainline history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub sha: Sha,
    pub subject: String,
}

/// Parses `git log --format=%H%x09%s` output.
fn parse_log(output: &str) -> GitResult<Vec<LogEntry>> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let (sha, subject) = line.split_once('\t').unwrap_or((line, ""));
            let sha = Sha::parse(sha)?;
            Ok(LogEntry {
                sha,
                subject: subject.to_string(),
            })
        })
        .collect()
}

/// Mainline history reachable from HEAD, newest first.
pub fn history(workdir: &Path) -> GitResult<Vec<LogEntry>> {
    let output = run_git_stdout(
        workdir,
        &["log", "--first-parent", "--format=%H%x09%s", "HEAD"],
    )?;
    parse_log(&output)
}

/// The newest entry whose subject contains `marker`.
pub fn find_commit_with<'a>(entries: &'a [LogEntry], marker: &str) -> Option<&'a LogEntry> {
    entries.iter().find(|entry| entry.subject.contains(marker))
}

/// Resolves a user-supplied reference to a commit in `workdir`.
///
/// `entries` is the history returned by [`history`]; version references are
/// looked up there by their release marker.
pub fn resolve(workdir: &Path, entries: &[LogEntry], reference: &Reference) -> GitResult<Sha> {
    let not_found = || GitError::RefNotFound {
        reference: reference.to_string(),
    };

    match reference {
        Reference::Version { .. } => {
            let marker = reference.release_marker().ok_or_else(not_found)?;
            let entry = find_commit_with(entries, &marker).ok_or_else(not_found)?;
            tracing::debug!(%reference, sha = %entry.sha, subject = %entry.subject, "resolved release");
            Ok(entry.sha.clone())
        }
        Reference::Canary(hash) => {
            let rev = format!("{hash}^{{commit}}");
            let sha = run_git_stdout(workdir, &["rev-parse", "--verify", "--quiet", &rev])
                .map_err(|err| match err {
                    GitError::CommandFailed { .. } => not_found(),
                    other => other,
                })?;
            Ok(Sha::parse(sha)?)
        }
    }
}

/// Mainline commits from `from` to `to` inclusive, oldest first.
///
/// `from` must be on the first-parent chain of `to`: an ancestor that is
/// only reachable through a merged side branch is rejected, since the
/// mainline commits after it would not start where it left off.
pub fn candidates_between(workdir: &Path, from: &Sha, to: &Sha) -> GitResult<Vec<Sha>> {
    if !is_ancestor(workdir, from, to)? {
        return Err(GitError::NotAncestor {
            from: from.clone(),
            to: to.clone(),
        });
    }

    let range = format!("{from}..{to}");
    let output = run_git_stdout(workdir, &["log", "--first-parent", "--format=%H", &range])?;

    let mut candidates = output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| Sha::parse(line).map_err(GitError::from))
        .collect::<GitResult<Vec<_>>>()?;

    // The oldest listed commit must sit directly on top of `from`.
    if let Some(oldest) = candidates.last() {
        let parent = rev_parse(workdir, &format!("{oldest}^1"))?;
        if parent != *from {
            return Err(GitError::NotOnMainline {
                from: from.clone(),
                to: to.clone(),
            });
        }
    }

    candidates.push(from.clone());
    candidates.reverse();

    tracing::debug!(%from, %to, count = candidates.len(), "listed candidates");
    Ok(candidates)
}
