mod config;
mod generation;
mod orchestrator;
mod output;
mod pr;
mod prompt;
mod template;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info, info_span};
use tracing_subscriber::EnvFilter;

use generation::{GenerationClient, HttpTransport, Provider};
use orchestrator::{DisplayTimings, Orchestrator, Trigger};
use template::FallbackTemplate;

/// PR Describer: drafts a GitHub Pull Request description from the commits,
/// changed files, and linked issues of a comparison, using an LLM.
#[derive(Parser, Debug)]
#[command(name = "pr-describer", version, about)]
struct Cli {
    /// GitHub compare or pull request URL, or just its path
    /// (e.g., https://github.com/org/repo/compare/main...feature)
    ///
    /// Not required when --list-models is used.
    target: Option<String>,

    /// Base branch, overriding the one in the URL
    #[arg(long)]
    base: Option<String>,

    /// Head branch, overriding the one in the URL
    #[arg(long)]
    head: Option<String>,

    /// Existing description draft; used as the template when non-empty
    #[arg(long)]
    body: Option<PathBuf>,

    /// Optional output file path for the generated description
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Provider for this run, overriding the config file
    #[arg(long, value_enum)]
    provider: Option<Provider>,

    /// Model id for this run, overriding the config file
    #[arg(long)]
    model: Option<String>,

    /// Config file to use instead of ./.pr-describer.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the known models for each provider and exit
    #[arg(long)]
    list_models: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("loading configuration");
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = config::Config::load_from(path)?;
            config.apply_env();
            config
        }
        None => config::Config::load()?,
    };
    config.override_provider(cli.provider, cli.model.clone());
    let active = config.active_provider();
    debug!(provider = %active.provider, model = %active.model_id, "active provider");

    if cli.list_models {
        print!("{}", output::format_model_catalog(active.provider, &active.model_id));
        return Ok(ExitCode::SUCCESS);
    }

    let target = cli.target.as_deref().ok_or(
        "A compare or pull request URL is required. Usage: pr-describer <URL> or pr-describer --list-models",
    )?;
    let _main_span = info_span!("pr_describe", target = %target).entered();

    let draft = match &cli.body {
        Some(path) => std::fs::read_to_string(path)?,
        None => String::new(),
    };

    let host = Arc::new(pr::GitHubHost::new(&config.github));
    let generator = GenerationClient::new(Arc::new(HttpTransport::new()), config.retry_base_delay());
    let fallback = match &config.template.fallback_path {
        Some(path) => FallbackTemplate::File(path.clone()),
        None => FallbackTemplate::Bundled,
    };

    let mut orchestrator = Orchestrator::new(
        host,
        fallback,
        generator,
        active,
        DisplayTimings::from_config(&config),
        output::TerminalSurface::new(draft),
    );

    let trigger = Trigger {
        path: pr::location::page_path(target),
        base: cli.base.clone(),
        head: cli.head.clone(),
    };

    info!("generating description");
    if orchestrator.run(&trigger).await.is_err() {
        debug!(state = ?orchestrator.state(), "generation did not complete");
        return Ok(ExitCode::FAILURE);
    }

    let description = orchestrator.into_surface().into_field_text();
    output::write_description(&description, cli.output.as_deref())?;
    info!("done");

    Ok(ExitCode::SUCCESS)
}
