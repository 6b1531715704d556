use std::path::PathBuf;
use std::sync::Arc;

use base64::Engine;
use futures::future::join_all;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::pr::{HostError, RepositoryHost};

/// Conventional pull request template locations, in priority order.
pub const TEMPLATE_PATHS: [&str; 3] = [
    ".github/pull_request_template.md",
    ".github/PULL_REQUEST_TEMPLATE.md",
    "docs/pull_request_template.md",
];

/// Present in the field text while GitHub is still asking the user to pick
/// one of several named templates.
pub const TEMPLATE_PICKER_MARKER: &str = "?expand=1&template=";

const BUNDLED_TEMPLATE: &str = include_str!("../../assets/default_template.md");

/// Why a template source was skipped. Always absorbed by the resolver.
#[derive(Debug, Error)]
pub enum TemplateUnavailable {
    #[error("{0}")]
    Host(#[from] HostError),

    #[error("unsupported content encoding '{0}'")]
    Encoding(String),

    #[error("invalid base64 content: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("template is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("failed to read fallback template: {0}")]
    Fallback(#[from] std::io::Error),
}

/// Where the last-resort template comes from.
#[derive(Debug, Clone, Default)]
pub enum FallbackTemplate {
    #[default]
    Bundled,
    File(PathBuf),
}

impl FallbackTemplate {
    async fn load(&self) -> Result<String, TemplateUnavailable> {
        match self {
            FallbackTemplate::Bundled => Ok(BUNDLED_TEMPLATE.to_string()),
            FallbackTemplate::File(path) => Ok(tokio::fs::read_to_string(path).await?),
        }
    }
}

/// Picks the template text a description should follow. Never fails: every
/// miss degrades toward the fallback, then toward no template at all.
pub struct TemplateResolver {
    host: Arc<dyn RepositoryHost>,
    fallback: FallbackTemplate,
}

impl TemplateResolver {
    pub fn new(host: Arc<dyn RepositoryHost>, fallback: FallbackTemplate) -> Self {
        Self { host, fallback }
    }

    #[instrument(skip(self, current_field_text))]
    pub async fn resolve(&self, owner: &str, repo: &str, current_field_text: &str) -> String {
        if is_user_content(current_field_text) {
            debug!("keeping text already in the description field");
            return current_field_text.to_string();
        }

        if let Some(template) = self.probe_repository(owner, repo).await {
            return template;
        }

        match self.fallback.load().await {
            Ok(template) => {
                debug!(fallback = ?self.fallback, "using fallback template");
                template
            }
            Err(err) => {
                warn!(error = %err, "fallback template unavailable, continuing without one");
                String::new()
            }
        }
    }

    /// Fetch every candidate path at once, then take the first usable one in
    /// priority order.
    async fn probe_repository(&self, owner: &str, repo: &str) -> Option<String> {
        let probes = TEMPLATE_PATHS
            .iter()
            .map(|path| self.fetch_template(owner, repo, path));
        let results = join_all(probes).await;

        for (path, result) in TEMPLATE_PATHS.iter().zip(results) {
            match result {
                Ok(template) => {
                    debug!(path, "using repository template");
                    return Some(template);
                }
                Err(err) => debug!(path, error = %err, "template probe missed"),
            }
        }
        None
    }

    async fn fetch_template(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<String, TemplateUnavailable> {
        let content = self.host.file_content(owner, repo, path).await?;
        decode_content(&content.content, &content.encoding)
    }
}

fn is_user_content(text: &str) -> bool {
    !text.trim().is_empty() && !text.contains(TEMPLATE_PICKER_MARKER)
}

/// Decode contents-API payloads. GitHub wraps base64 at 60 columns.
pub fn decode_content(content: &str, encoding: &str) -> Result<String, TemplateUnavailable> {
    if !encoding.is_empty() && encoding != "base64" {
        return Err(TemplateUnavailable::Encoding(encoding.to_string()));
    }
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD.decode(compact)?;
    Ok(String::from_utf8(bytes)?)
}
