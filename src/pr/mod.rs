pub mod evidence;
#[cfg(test)]
pub mod fake;
pub mod host;
pub mod issues;
pub mod location;
pub mod types;

pub use evidence::EvidenceCollector;
pub use host::{GitHubHost, RepositoryHost};
pub use types::{BranchPair, Evidence, PageLocation};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("GitHub API request failed: {0}")]
    ApiRequest(#[from] reqwest::Error),

    #[error("GitHub API returned {status} for {url}")]
    Status { status: u16, url: String },
}

#[derive(Debug, Error)]
pub enum EvidenceError {
    #[error("Invalid repository identifier: owner={owner:?} repo={repo:?}")]
    InvalidRepository { owner: String, repo: String },
}
