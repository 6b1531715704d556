use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use super::types::Commit;

/// Keywords that mark an issue reference as intended-to-close.
pub const CLOSING_KEYWORDS: [&str; 9] = [
    "fixes", "fixed", "fix", "closes", "closed", "close", "resolves", "resolved", "resolve",
];

static ISSUE_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"(?i)(?:{})\s+#(\d+)", CLOSING_KEYWORDS.join("|"));
    Regex::new(&pattern).expect("valid issue reference regex")
});

/// Collect the issue numbers referenced as `<keyword> #<n>` across all commit messages.
///
/// Matching is case-insensitive and deduplicated. A bare `#n` that is not
/// directly preceded by a keyword and whitespace is ignored. Numbers too large
/// for `u64` are skipped.
pub fn referenced_issue_numbers(commits: &[Commit]) -> BTreeSet<u64> {
    commits
        .iter()
        .flat_map(|commit| {
            let message = commit.message.to_lowercase();
            ISSUE_REF_RE
                .captures_iter(&message)
                .filter_map(|caps| caps.get(1)?.as_str().parse::<u64>().ok())
                .collect::<Vec<_>>()
        })
        .collect()
}
