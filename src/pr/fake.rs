//! Scripted `RepositoryHost` shared by the pipeline tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::host::RepositoryHost;
use super::types::{BranchPair, Comparison, EncodedContent, LinkedIssue};
use super::HostError;

#[derive(Default)]
pub struct FakeHost {
    pub comparison: Option<Comparison>,
    pub issues: HashMap<u64, LinkedIssue>,
    pub files: HashMap<String, EncodedContent>,
    pub pull: Option<BranchPair>,
    pub compare_calls: AtomicUsize,
    pub requested_issues: Mutex<Vec<u64>>,
    pub probed_paths: Mutex<Vec<String>>,
}

fn not_found(what: &str) -> HostError {
    HostError::Status {
        status: 404,
        url: what.to_string(),
    }
}

impl FakeHost {
    pub fn with_comparison(mut self, comparison: Comparison) -> Self {
        self.comparison = Some(comparison);
        self
    }

    pub fn with_issue(mut self, number: u64, title: &str) -> Self {
        self.issues.insert(
            number,
            LinkedIssue {
                number,
                title: title.to_string(),
                state: "open".to_string(),
                url: format!("https://github.com/acme/widgets/issues/{number}"),
            },
        );
        self
    }

    /// Store `text` as base64 content, wrapped at 60 columns like GitHub does.
    pub fn with_file(mut self, path: &str, text: &str) -> Self {
        use base64::Engine;
        let encoded = base64::engine::general_purpose::STANDARD.encode(text);
        let wrapped = encoded
            .as_bytes()
            .chunks(60)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect::<Vec<_>>()
            .join("\n");
        self.files.insert(
            path.to_string(),
            EncodedContent {
                content: wrapped,
                encoding: "base64".to_string(),
            },
        );
        self
    }

    /// Store contents exactly as given, for payloads that must not decode.
    pub fn with_raw_file(mut self, path: &str, content: &str, encoding: &str) -> Self {
        self.files.insert(
            path.to_string(),
            EncodedContent {
                content: content.to_string(),
                encoding: encoding.to_string(),
            },
        );
        self
    }

    pub fn with_pull(mut self, base: &str, head: &str) -> Self {
        self.pull = Some(BranchPair {
            base: base.to_string(),
            head: head.to_string(),
        });
        self
    }
}

#[async_trait]
impl RepositoryHost for FakeHost {
    async fn compare(
        &self,
        _owner: &str,
        _repo: &str,
        base: &str,
        head: &str,
    ) -> Result<Comparison, HostError> {
        self.compare_calls.fetch_add(1, Ordering::SeqCst);
        self.comparison
            .clone()
            .ok_or_else(|| not_found(&format!("compare/{base}...{head}")))
    }

    async fn issue(&self, _owner: &str, _repo: &str, number: u64) -> Result<LinkedIssue, HostError> {
        self.requested_issues.lock().unwrap().push(number);
        self.issues
            .get(&number)
            .cloned()
            .ok_or_else(|| not_found(&format!("issues/{number}")))
    }

    async fn file_content(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
    ) -> Result<EncodedContent, HostError> {
        self.probed_paths.lock().unwrap().push(path.to_string());
        self.files.get(path).cloned().ok_or_else(|| not_found(path))
    }

    async fn pull_request_branches(
        &self,
        _owner: &str,
        _repo: &str,
        number: u64,
    ) -> Result<BranchPair, HostError> {
        self.pull
            .clone()
            .ok_or_else(|| not_found(&format!("pulls/{number}")))
    }
}
