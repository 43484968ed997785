//! Canary Bisect - find the toolchain commit where a script's behavior changed.
//!
//! The library is split into a search engine that knows nothing about git
//! or toolchains ([`search`], driven through the traits in [`oracle`]) and
//! the plumbing that turns release versions and canary hashes into an
//! ordered list of commits to search ([`git`], [`types`]).

pub mod git;
pub mod oracle;
pub mod report;
pub mod search;
pub mod types;

#[cfg(test)]
mod test_utils;
