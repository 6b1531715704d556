pub mod surface;

pub use surface::DescriptionSurface;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::config::{Config, ProviderConfig};
use crate::generation::{GenerationClient, GenerationError, GenerationRequest};
use crate::pr::location;
use crate::pr::{BranchPair, EvidenceCollector, EvidenceError, PageLocation, RepositoryHost};
use crate::prompt;
use crate::template::{FallbackTemplate, TemplateResolver};
use surface::{
    is_placeholder, GATHERING_LABEL, GATHERING_PLACEHOLDER, GENERATED_LABEL, GENERATING_LABEL,
    GENERATING_PLACEHOLDER,
};

/// Used when neither the page nor the caller names a branch pair.
const FALLBACK_BASE: &str = "main";

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Could not determine the repository from '{0}'")]
    NotARepositoryPage(String),

    #[error(transparent)]
    Evidence(#[from] EvidenceError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationState {
    Idle,
    Gathering,
    Generating,
    Done,
    Error(String),
}

/// How long transient UI feedback stays visible.
#[derive(Debug, Clone, Copy)]
pub struct DisplayTimings {
    pub success: Duration,
    pub error: Duration,
}

impl DisplayTimings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            success: Duration::from_millis(config.ui.success_display_ms),
            error: Duration::from_millis(config.ui.error_display_ms),
        }
    }
}

/// What the user asked to describe: a page path plus optional branch overrides.
#[derive(Debug, Clone, Default)]
pub struct Trigger {
    pub path: String,
    pub base: Option<String>,
    pub head: Option<String>,
}

/// Drives one generation attempt from trigger to filled-in description.
///
/// `run` takes `&mut self`, so a second attempt cannot start while one is in
/// flight.
pub struct Orchestrator<S: DescriptionSurface> {
    host: Arc<dyn RepositoryHost>,
    collector: EvidenceCollector,
    templates: TemplateResolver,
    generator: GenerationClient,
    provider: ProviderConfig,
    timings: DisplayTimings,
    surface: S,
    state: GenerationState,
}

impl<S: DescriptionSurface> Orchestrator<S> {
    pub fn new(
        host: Arc<dyn RepositoryHost>,
        fallback: FallbackTemplate,
        generator: GenerationClient,
        provider: ProviderConfig,
        timings: DisplayTimings,
        surface: S,
    ) -> Self {
        Self {
            collector: EvidenceCollector::new(host.clone()),
            templates: TemplateResolver::new(host.clone(), fallback),
            host,
            generator,
            provider,
            timings,
            surface,
            state: GenerationState::Idle,
        }
    }

    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    #[cfg(test)]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Run a full attempt. On failure the error has already been shown on the
    /// surface; it is returned so callers can set an exit status.
    pub async fn run(&mut self, trigger: &Trigger) -> Result<String, OrchestratorError> {
        let original_label = self.surface.trigger_label();
        let existing_text = self.surface.field_text();

        self.transition(GenerationState::Gathering);
        self.surface.set_trigger_enabled(false);
        self.surface.set_trigger_label(GATHERING_LABEL);
        self.surface.set_field_text(GATHERING_PLACEHOLDER);

        let span = info_span!("generate_description", path = %trigger.path);
        match self.attempt(trigger, &existing_text).instrument(span).await {
            Ok(description) => {
                self.surface.set_field_text(&description);
                self.surface.set_trigger_label(GENERATED_LABEL);
                self.surface.set_trigger_enabled(true);
                self.transition(GenerationState::Done);

                if self.surface.holds_transient_status() {
                    tokio::time::sleep(self.timings.success).await;
                }
                self.surface.set_trigger_label(&original_label);
                Ok(description)
            }
            Err(err) => {
                let message = err.to_string();
                warn!(error = %message, "description generation failed");
                self.transition(GenerationState::Error(message.clone()));

                self.surface.show_error(&message);
                if is_placeholder(&self.surface.field_text()) {
                    self.surface.set_field_text("");
                }
                self.surface.set_trigger_label(&original_label);
                self.surface.set_trigger_enabled(true);

                if self.surface.holds_transient_status() {
                    tokio::time::sleep(self.timings.error).await;
                }
                self.surface.clear_error();
                Err(err)
            }
        }
    }

    async fn attempt(
        &mut self,
        trigger: &Trigger,
        existing_text: &str,
    ) -> Result<String, OrchestratorError> {
        let page = location::resolve(&trigger.path);
        let (owner, repo) = match (&page.owner, &page.repo) {
            (Some(owner), Some(repo)) => (owner.clone(), repo.clone()),
            _ => return Err(OrchestratorError::NotARepositoryPage(trigger.path.clone())),
        };
        let branches = self.branches(&owner, &repo, &page, trigger).await;
        info!(%owner, %repo, base = %branches.base, head = %branches.head, "gathering pull request data");

        let (evidence, template) = tokio::join!(
            self.collector
                .collect(&owner, &repo, &branches.base, &branches.head),
            self.templates.resolve(&owner, &repo, existing_text),
        );
        let evidence = evidence?;

        self.transition(GenerationState::Generating);
        self.surface.set_trigger_label(GENERATING_LABEL);
        self.surface.set_field_text(GENERATING_PLACEHOLDER);

        let prompt = prompt::compose(&template, &evidence);
        debug!(prompt_bytes = prompt.len(), "composed prompt");
        let request = GenerationRequest::new(prompt, &self.provider);
        Ok(self.generator.generate(&request).await?)
    }

    /// Explicit overrides first, then the compare pair from the path, then the
    /// refs of the pull request named in the path.
    async fn branches(
        &self,
        owner: &str,
        repo: &str,
        page: &PageLocation,
        trigger: &Trigger,
    ) -> BranchPair {
        let from_page = match (&page.compare, page.pull_number) {
            (Some(pair), _) => Some(pair.clone()),
            (None, Some(number)) => match self.host.pull_request_branches(owner, repo, number).await {
                Ok(pair) => Some(pair),
                Err(err) => {
                    warn!(pull = number, error = %err, "could not look up pull request branches");
                    None
                }
            },
            (None, None) => None,
        };
        let (page_base, page_head) = match from_page {
            Some(pair) => (pair.base, pair.head),
            None => (FALLBACK_BASE.to_string(), String::new()),
        };

        BranchPair {
            base: trigger.base.clone().unwrap_or(page_base),
            head: trigger.head.clone().unwrap_or(page_head),
        }
    }

    fn transition(&mut self, next: GenerationState) {
        debug!(from = ?self.state, to = ?next, "state transition");
        self.state = next;
    }
}
