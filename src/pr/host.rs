use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::types::{BranchPair, ChangedFile, Commit, Comparison, EncodedContent, LinkedIssue};
use super::HostError;
use crate::config::GitHubConfig;

/// Read-only view of a code-hosting platform.
///
/// The pipeline only depends on this trait, so tests and alternative hosts can
/// stand in for GitHub.
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    /// Commits and changed files between `base` and `head`.
    async fn compare(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        head: &str,
    ) -> Result<Comparison, HostError>;

    /// A single issue by number.
    async fn issue(&self, owner: &str, repo: &str, number: u64) -> Result<LinkedIssue, HostError>;

    /// Encoded content of a file on the default branch.
    async fn file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<EncodedContent, HostError>;

    /// Base and head refs of an existing pull request.
    async fn pull_request_branches(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<BranchPair, HostError>;
}

/// `RepositoryHost` backed by the GitHub REST API.
pub struct GitHubHost {
    client: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompareResponse {
    #[serde(default)]
    commits: Vec<CompareCommit>,
    #[serde(default)]
    files: Vec<ChangedFile>,
}

#[derive(Debug, Deserialize)]
struct CompareCommit {
    sha: String,
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
struct IssueResponse {
    number: u64,
    title: String,
    state: String,
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    content: String,
    #[serde(default)]
    encoding: String,
}

#[derive(Debug, Deserialize)]
struct PullResponse {
    base: GitRef,
    head: GitRef,
}

#[derive(Debug, Deserialize)]
struct GitRef {
    #[serde(rename = "ref")]
    name: String,
}

impl From<CompareResponse> for Comparison {
    fn from(response: CompareResponse) -> Self {
        Comparison {
            commits: response
                .commits
                .into_iter()
                .map(|c| Commit {
                    message: c.commit.message,
                    sha: c.sha,
                })
                .collect(),
            files: response.files,
        }
    }
}

impl From<IssueResponse> for LinkedIssue {
    fn from(response: IssueResponse) -> Self {
        LinkedIssue {
            number: response.number,
            title: response.title,
            state: response.state,
            url: response.html_url,
        }
    }
}

impl GitHubHost {
    pub fn new(config: &GitHubConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: config.api_base().trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, HostError> {
        let url = format!("{}{}", self.api_base, path);
        let mut request = self
            .client
            .get(&url)
            .header("User-Agent", "pr-describer")
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), %url, "GitHub request unsuccessful");
            return Err(HostError::Status {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl RepositoryHost for GitHubHost {
    #[instrument(skip(self))]
    async fn compare(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        head: &str,
    ) -> Result<Comparison, HostError> {
        let path = format!("/repos/{owner}/{repo}/compare/{base}...{head}");
        let response: CompareResponse = self.get_json(&path).await?;
        debug!(
            commits = response.commits.len(),
            files = response.files.len(),
            "received comparison"
        );
        Ok(response.into())
    }

    #[instrument(skip(self))]
    async fn issue(&self, owner: &str, repo: &str, number: u64) -> Result<LinkedIssue, HostError> {
        let path = format!("/repos/{owner}/{repo}/issues/{number}");
        let response: IssueResponse = self.get_json(&path).await?;
        Ok(response.into())
    }

    #[instrument(skip(self))]
    async fn file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<EncodedContent, HostError> {
        let api_path = format!("/repos/{owner}/{repo}/contents/{path}");
        let response: ContentResponse = self.get_json(&api_path).await?;
        Ok(EncodedContent {
            content: response.content,
            encoding: response.encoding,
        })
    }

    #[instrument(skip(self))]
    async fn pull_request_branches(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<BranchPair, HostError> {
        let path = format!("/repos/{owner}/{repo}/pulls/{number}");
        let response: PullResponse = self.get_json(&path).await?;
        Ok(BranchPair {
            base: response.base.name,
            head: response.head.name,
        })
    }
}
