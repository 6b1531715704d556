use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, instrument, warn};

use super::host::RepositoryHost;
use super::issues::referenced_issue_numbers;
use super::types::{Comparison, Evidence, LinkedIssue};
use super::EvidenceError;

/// Gathers commits, changed files, and linked issues for a comparison.
///
/// Every sub-fetch degrades to an empty result on failure; the only hard error
/// is an empty owner or repo.
pub struct EvidenceCollector {
    host: Arc<dyn RepositoryHost>,
}

impl EvidenceCollector {
    pub fn new(host: Arc<dyn RepositoryHost>) -> Self {
        Self { host }
    }

    #[instrument(skip(self))]
    pub async fn collect(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        head: &str,
    ) -> Result<Evidence, EvidenceError> {
        if owner.trim().is_empty() || repo.trim().is_empty() {
            return Err(EvidenceError::InvalidRepository {
                owner: owner.to_string(),
                repo: repo.to_string(),
            });
        }

        let comparison = match self.host.compare(owner, repo, base, head).await {
            Ok(comparison) => comparison,
            Err(err) => {
                warn!(error = %err, "comparison unavailable, continuing without commits and files");
                Comparison::default()
            }
        };

        let issues = self.linked_issues(owner, repo, &comparison).await;
        debug!(
            commits = comparison.commits.len(),
            head_sha = comparison.commits.last().map(|c| c.sha.as_str()).unwrap_or(""),
            files = comparison.files.len(),
            changed_lines = comparison.files.iter().map(|f| f.changes).sum::<usize>(),
            issues = issues.len(),
            "collected evidence"
        );

        Ok(Evidence {
            base: base.to_string(),
            head: head.to_string(),
            commits: comparison.commits,
            files: comparison.files,
            issues,
        })
    }

    /// Resolve every referenced issue concurrently; failed lookups are dropped.
    async fn linked_issues(&self, owner: &str, repo: &str, comparison: &Comparison) -> Vec<LinkedIssue> {
        let numbers = referenced_issue_numbers(&comparison.commits);
        if numbers.is_empty() {
            return Vec::new();
        }
        debug!(?numbers, "resolving referenced issues");

        let lookups = numbers.into_iter().map(|number| async move {
            match self.host.issue(owner, repo, number).await {
                Ok(issue) => {
                    debug!(issue = issue.number, state = %issue.state, url = %issue.url, "resolved linked issue");
                    Some(issue)
                }
                Err(err) => {
                    warn!(issue = number, error = %err, "dropping unresolvable issue reference");
                    None
                }
            }
        });

        join_all(lookups).await.into_iter().flatten().collect()
    }
}
