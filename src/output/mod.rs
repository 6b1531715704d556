use colored::Colorize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::generation::models::{self, Provider};
use crate::orchestrator::surface::{DescriptionSurface, IDLE_LABEL};

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write description file: {0}")]
    FileWrite(#[from] std::io::Error),
}

/// `DescriptionSurface` for the command line.
///
/// The field lives in memory and is emitted once the run ends; label and error
/// changes are echoed to stderr so stdout stays clean for the description.
pub struct TerminalSurface {
    field: String,
    label: String,
}

impl TerminalSurface {
    /// Start with `draft` already in the field (empty for a fresh description).
    pub fn new(draft: String) -> Self {
        Self {
            field: draft,
            label: IDLE_LABEL.to_string(),
        }
    }

    pub fn into_field_text(self) -> String {
        self.field
    }
}

impl DescriptionSurface for TerminalSurface {
    fn field_text(&self) -> String {
        self.field.clone()
    }

    fn set_field_text(&mut self, text: &str) {
        self.field = text.to_string();
    }

    fn trigger_label(&self) -> String {
        self.label.clone()
    }

    fn set_trigger_label(&mut self, label: &str) {
        if label != self.label && label != IDLE_LABEL {
            eprintln!("{}", label.cyan().bold());
        }
        self.label = label.to_string();
    }

    fn set_trigger_enabled(&mut self, enabled: bool) {
        debug!(enabled, "trigger toggled");
    }

    fn show_error(&mut self, message: &str) {
        eprintln!("{} {}", "error:".red().bold(), message);
    }

    fn clear_error(&mut self) {}

    fn holds_transient_status(&self) -> bool {
        false
    }
}

/// Print the description to stdout, or write it to `output_path`.
#[instrument(skip(description), fields(chars = description.len()))]
pub fn write_description(description: &str, output_path: Option<&Path>) -> Result<(), OutputError> {
    match output_path {
        None => {
            debug!("writing description to terminal");
            println!("{description}");
            Ok(())
        }
        Some(path) => {
            debug!(path = %path.display(), "writing description to file");
            std::fs::write(path, ensure_trailing_newline(description))?;
            eprintln!("{} {}", "Description written to".green(), path.display());
            Ok(())
        }
    }
}

fn ensure_trailing_newline(text: &str) -> String {
    if text.ends_with('\n') {
        text.to_string()
    } else {
        format!("{text}\n")
    }
}

/// Render both providers' model catalogs, marking the active model.
pub fn format_model_catalog(active_provider: Provider, active_model: &str) -> String {
    let mut out = String::new();
    for provider in [Provider::OpenAi, Provider::Anthropic] {
        out.push_str(&format!("{provider}:\n"));
        for model in models::catalog(provider) {
            let marker = if provider == active_provider && model.id == active_model {
                "*"
            } else {
                " "
            };
            out.push_str(&format!("  {marker} {:<26} {}\n", model.id, model.label));
        }
    }
    out
}
