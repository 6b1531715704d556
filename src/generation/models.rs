use serde::Deserialize;

/// Supported text-generation services.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    #[value(name = "openai")]
    OpenAi,
    Anthropic,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::OpenAi => write!(f, "OpenAI"),
            Provider::Anthropic => write!(f, "Anthropic"),
        }
    }
}

impl Provider {
    /// Environment variable consulted when no key is configured.
    pub fn key_env_var(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelInfo {
    pub id: &'static str,
    pub label: &'static str,
}

const OPENAI_MODELS: &[ModelInfo] = &[
    ModelInfo {
        id: "gpt-4",
        label: "GPT-4 (Most capable & Most Expensive)",
    },
    ModelInfo {
        id: "gpt-4-turbo-preview",
        label: "GPT-4 Turbo (Faster)",
    },
    ModelInfo {
        id: "gpt-3.5-turbo",
        label: "GPT-3.5 (Fastest & Cheapest)",
    },
];

const ANTHROPIC_MODELS: &[ModelInfo] = &[
    ModelInfo {
        id: "claude-3-opus-latest",
        label: "Claude-3 Opus (Most powerful & Most Expensive)",
    },
    ModelInfo {
        id: "claude-3-5-sonnet-latest",
        label: "Claude-3.5 Sonnet (Most intelligent)",
    },
    ModelInfo {
        id: "claude-3-5-haiku-latest",
        label: "Claude-3.5 Haiku (Fastest & Cheapest)",
    },
];

/// Known models for a provider, most capable first.
pub fn catalog(provider: Provider) -> &'static [ModelInfo] {
    match provider {
        Provider::OpenAi => OPENAI_MODELS,
        Provider::Anthropic => ANTHROPIC_MODELS,
    }
}

/// The cheapest, fastest entry: used when no model is configured.
pub fn default_model(provider: Provider) -> &'static str {
    match provider {
        Provider::OpenAi => OPENAI_MODELS[2].id,
        Provider::Anthropic => ANTHROPIC_MODELS[2].id,
    }
}

pub fn is_known(provider: Provider, model_id: &str) -> bool {
    catalog(provider).iter().any(|m| m.id == model_id)
}

/// Comma-separated ids, for error messages.
pub fn available_ids(provider: Provider) -> String {
    catalog(provider)
        .iter()
        .map(|m| m.id)
        .collect::<Vec<_>>()
        .join(", ")
}
