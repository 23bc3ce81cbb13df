//! Review command implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use hexaudit_core::{
    AdvisorRef, ReviewConfig, Reviewer, SnippetWindowExtractor,
};
use hexaudit_validators::{default_project_validators, default_validators};

use super::output;
use crate::advisor::OpenAiAdvisor;
use crate::OutputFormat;

/// Config file names searched in the reviewed project, in priority order.
const CONFIG_CANDIDATES: &[&str] = &["hexaudit.toml", ".hexaudit.toml"];

/// Default endpoint when none is configured.
const DEFAULT_BASE_URL: &str = "https://api.deepinfra.com/v1/openai";

/// Default model when none is configured.
const DEFAULT_MODEL: &str = "Qwen/Qwen2.5-Coder-32B-Instruct";

/// Everything the review subcommand needs.
pub struct ReviewArgs {
    /// Path to review.
    pub path: PathBuf,
    /// Output format.
    pub format: OutputFormat,
    /// Extension override.
    pub extension: Option<String>,
    /// Concurrency override.
    pub concurrency: Option<usize>,
    /// Window padding override.
    pub pad: Option<usize>,
    /// Additional exclude patterns.
    pub exclude: Vec<String>,
    /// Model override.
    pub model: Option<String>,
    /// Base URL override.
    pub base_url: Option<String>,
    /// Advisor API key.
    pub api_key: Option<String>,
    /// Skip model-driven passes.
    pub no_model: bool,
    /// Explicit config file path.
    pub config: Option<PathBuf>,
}

/// Runs the review command.
///
/// Exits with code 1 when the report contains findings, mirroring the
/// usual lint-tool convention.
pub fn run(args: ReviewArgs) -> Result<()> {
    let config = resolve_config(&args)?;

    let mut builder = Reviewer::builder()
        .root(&args.path)
        .config(config.clone());

    if !args.no_model {
        let advisor = build_advisor(&args, &config)?;
        builder = builder
            .advisor(advisor.clone())
            .validator_boxes(default_validators(&advisor));
        for validator in default_project_validators(&advisor) {
            builder = builder.project_validator_box(validator);
        }
    }

    let reviewer = builder.build();
    tracing::info!("reviewing {}", args.path.display());
    let report = reviewer.review().context("review failed")?;

    let annotated = SnippetWindowExtractor::new(config.context_pad)
        .annotate(window_root(&args.path), &report);
    output::print(&annotated, args.format)?;

    if !report.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

/// Windows are extracted relative to the reviewed directory; for a
/// single-file root, relative to its parent.
fn window_root(path: &Path) -> &Path {
    if path.is_file() {
        path.parent().unwrap_or(path)
    } else {
        path
    }
}

/// Loads config from the explicit path, a candidate file in the reviewed
/// project, or defaults; then applies command-line overrides.
fn resolve_config(args: &ReviewArgs) -> Result<ReviewConfig> {
    let mut config = match &args.config {
        Some(path) => ReviewConfig::from_file(path)
            .with_context(|| format!("failed to load config: {}", path.display()))?,
        None => find_project_config(&args.path)?.unwrap_or_default(),
    };

    if let Some(extension) = &args.extension {
        config.extension.clone_from(extension);
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(pad) = args.pad {
        config.context_pad = pad;
    }
    config.exclude.extend(args.exclude.iter().cloned());
    if args.model.is_some() {
        config.model.clone_from(&args.model);
    }
    if args.base_url.is_some() {
        config.base_url.clone_from(&args.base_url);
    }
    Ok(config)
}

/// Looks for a candidate config file next to the reviewed project.
fn find_project_config(path: &Path) -> Result<Option<ReviewConfig>> {
    let dir = if path.is_file() {
        path.parent().unwrap_or(path)
    } else {
        path
    };
    for candidate in CONFIG_CANDIDATES {
        let candidate_path = dir.join(candidate);
        if candidate_path.exists() {
            let config = ReviewConfig::from_file(&candidate_path).with_context(|| {
                format!("failed to load config: {}", candidate_path.display())
            })?;
            return Ok(Some(config));
        }
    }
    Ok(None)
}

fn build_advisor(args: &ReviewArgs, config: &ReviewConfig) -> Result<AdvisorRef> {
    let Some(api_key) = &args.api_key else {
        bail!(
            "an advisor API key is required for model-driven review; \
             pass --api-key, set HEXAUDIT_API_KEY, or use --no-model"
        );
    };
    let base_url = config
        .base_url
        .clone()
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let model = config
        .model
        .clone()
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    Ok(Arc::new(OpenAiAdvisor::new(base_url, model, api_key)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(path: PathBuf) -> ReviewArgs {
        ReviewArgs {
            path,
            format: OutputFormat::Text,
            extension: None,
            concurrency: None,
            pad: None,
            exclude: vec![],
            model: None,
            base_url: None,
            api_key: None,
            no_model: true,
            config: None,
        }
    }

    #[test]
    fn overrides_win_over_config_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("hexaudit.toml"),
            "concurrency = 9\ncontext_pad = 2\n",
        )
        .expect("write");

        let mut a = args(dir.path().to_path_buf());
        a.concurrency = Some(3);
        let config = resolve_config(&a).expect("resolve");
        assert_eq!(config.concurrency, 3);
        assert_eq!(config.context_pad, 2);
    }

    #[test]
    fn defaults_apply_without_config_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = resolve_config(&args(dir.path().to_path_buf())).expect("resolve");
        assert_eq!(config.extension, ".py");
        assert_eq!(config.concurrency, 5);
    }

    #[test]
    fn missing_api_key_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = args(dir.path().to_path_buf());
        let config = ReviewConfig::default();
        assert!(build_advisor(&a, &config).is_err());
    }
}
