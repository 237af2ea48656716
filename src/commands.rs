use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use transcribe_runner::catalog::{language_choices, OptionCatalog};
use transcribe_runner::config::{platform_config_path, Config};
use transcribe_runner::job::{AuthToken, JobConfig, JobTarget};
use transcribe_runner::present::render;
use transcribe_runner::transcribe::command::CommandBackend;
use transcribe_runner::transcribe::progress::LogProgress;
use transcribe_runner::transcribe::runner::{Orchestrator, OutputLayout};

use crate::cli::RunArgs;

/// Resolve the input, run one job and print the result.
/// Returns whether the job succeeded.
pub fn run_transcription(
    config: &Config,
    args: &RunArgs,
    catalog: &dyn OptionCatalog,
) -> Result<bool> {
    let target = resolve_target(args)?;
    let job = build_job_config(config, args, target);
    warn_unknown_options(catalog, &job);

    let backend = CommandBackend::from_config(&config.backend)?;
    let layout = if args.per_job_dir {
        OutputLayout::PerJob
    } else {
        config.output.layout
    };
    let orchestrator = Orchestrator::new(Box::new(backend)).with_layout(layout);

    let outcome = orchestrator.run_job(job, &LogProgress);

    let view = args.view.unwrap_or(config.output.view);
    render(&mut std::io::stdout().lock(), &outcome, view, args.json)?;
    Ok(outcome.is_success())
}

fn resolve_target(args: &RunArgs) -> Result<JobTarget> {
    let target = if args.input.is_some() {
        JobTarget::from_combined(args.input.as_deref())?
    } else {
        JobTarget::resolve(args.url.as_deref(), args.file.as_deref())?
    };
    Ok(target)
}

/// Merge command-line flags over config defaults.
fn build_job_config(config: &Config, args: &RunArgs, target: JobTarget) -> JobConfig {
    let defaults = &config.job;
    JobConfig {
        target,
        output_dir: args
            .output_dir
            .clone()
            .unwrap_or_else(|| config.output.directory.clone()),
        model: args.model.clone().unwrap_or_else(|| defaults.model.clone()),
        language: Some(
            args.language
                .clone()
                .unwrap_or_else(|| defaults.language.clone()),
        ),
        device: args.device.unwrap_or(defaults.device),
        task: args.task.unwrap_or(defaults.task),
        auth_token: args
            .hf_token
            .clone()
            .and_then(AuthToken::new)
            .or_else(|| config.backend.resolve_hf_token()),
        initial_prompt: Some(
            args.initial_prompt
                .clone()
                .unwrap_or_else(|| defaults.initial_prompt.clone()),
        )
        .filter(|p| !p.trim().is_empty()),
    }
}

// The backend is the authority on what it accepts, so these only warn.
fn warn_unknown_options(catalog: &dyn OptionCatalog, job: &JobConfig) {
    if let Some(language) = job.dispatch_language() {
        if !catalog.has_language(language) {
            tracing::warn!("Language '{}' is not in the known language list", language);
        }
    }
    if !catalog.has_model(&job.model) {
        tracing::warn!(
            "Model '{}' is not a known model; passing it to the backend as is",
            job.model
        );
    }
}

/// Print the models, language choices and tasks from `catalog`.
pub fn show_options(catalog: &dyn OptionCatalog, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "Models:")?;
    for model in catalog.models() {
        writeln!(out, "  {}", model)?;
    }
    writeln!(out, "Languages:")?;
    let languages: Vec<String> = language_choices(catalog)
        .iter()
        .map(|c| c.to_string())
        .collect();
    writeln!(out, "  {}", languages.join(" "))?;
    writeln!(out, "Tasks:")?;
    for task in catalog.tasks() {
        writeln!(out, "  {}", task)?;
    }
    Ok(())
}

/// Write the commented default config to `path` (or the platform config
/// location). Refuses to overwrite unless `force` is set.
pub fn init_config(path: Option<&Path>, force: bool) -> Result<PathBuf> {
    let target = match path {
        Some(p) => p.to_path_buf(),
        None => platform_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine the config directory"))?,
    };

    if target.exists() && !force {
        anyhow::bail!(
            "Config file already exists: {} (use --force to overwrite)",
            target.display()
        );
    }

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&target, Config::generate_default_commented())
        .with_context(|| format!("Failed to write {}", target.display()))?;

    println!("Wrote config: {}", target.display());
    Ok(target)
}
