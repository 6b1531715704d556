use serde::Deserialize;

/// A commit on the compared range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Full commit message (subject + body)
    pub message: String,
    pub sha: String,
}

/// A single file touched by the comparison, as reported by the GitHub compare API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChangedFile {
    /// File path (e.g., "src/widget.js")
    pub filename: String,
    /// "added", "removed", "modified", "renamed", ...
    pub status: String,
    #[serde(default)]
    pub additions: usize,
    #[serde(default)]
    pub deletions: usize,
    /// Usually additions + deletions; not validated
    #[serde(default)]
    pub changes: usize,
}

/// An issue referenced from a commit message with a closing keyword.
/// Best-effort: may miss references or pick up coincidental matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedIssue {
    pub number: u64,
    pub title: String,
    /// "open" or "closed"
    pub state: String,
    pub url: String,
}

/// Commits and files returned by one compare query.
#[derive(Debug, Clone, Default)]
pub struct Comparison {
    pub commits: Vec<Commit>,
    pub files: Vec<ChangedFile>,
}

/// Everything gathered for one generation attempt. Never cached across attempts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evidence {
    pub base: String,
    pub head: String,
    pub commits: Vec<Commit>,
    pub files: Vec<ChangedFile>,
    pub issues: Vec<LinkedIssue>,
}

/// Base and head refs of an existing pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchPair {
    pub base: String,
    pub head: String,
}

/// Components recovered from a GitHub page path.
/// Produced by `location::resolve()`; any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLocation {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub compare: Option<BranchPair>,
    pub pull_number: Option<u64>,
}

/// Raw file content as served by the contents API.
#[derive(Debug, Clone)]
pub struct EncodedContent {
    pub content: String,
    /// "base64" for regular files
    pub encoding: String,
}
