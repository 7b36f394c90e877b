// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Sub-command implementations and the helpers they share.

pub mod capabilities;
pub mod export;
pub mod inspect;
pub mod params;

use export_pipeline::{install_root, PipelineConfig, PipelineError};
use std::path::PathBuf;

/// Command-line values that take precedence over the configuration file.
pub struct Overrides {
    pub revision: Option<u32>,
    pub seed: Option<u64>,
    pub parity_tolerance: Option<f32>,
}

/// Installs the global subscriber. `RUST_LOG` wins over `-v`.
pub fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity > 1)
        .init();
}

/// Builds the run configuration: explicit file, else `<root>/export.toml`,
/// else defaults; then command-line overrides.
pub fn resolve_config(
    root: Option<PathBuf>,
    config: Option<PathBuf>,
    overrides: &Overrides,
) -> anyhow::Result<PipelineConfig> {
    let root = match root {
        Some(root) => root,
        None => install_root()?,
    };
    tracing::debug!("install root: {}", root.display());

    let mut config = match config {
        Some(path) => PipelineConfig::from_file(&path)?.resolve(&root),
        None => PipelineConfig::for_install_root(&root)?,
    };
    if let Some(revision) = overrides.revision {
        config.target_revision = revision;
    }
    if let Some(seed) = overrides.seed {
        config.validation_seed = Some(seed);
    }
    if let Some(tolerance) = overrides.parity_tolerance {
        config.parity_tolerance = Some(tolerance);
    }
    config.check()?;
    Ok(config)
}

/// Prints a failure and, when there is one, its remediation hint.
pub fn report_failure(error: &anyhow::Error) {
    println!();
    for line in failure_lines(error) {
        println!("{line}");
    }
}

/// The message, the causes it does not already spell out, then the hint.
fn failure_lines(error: &anyhow::Error) -> Vec<String> {
    let mut shown = error.to_string();
    let mut lines = vec![format!("  ✗ {shown}")];
    for cause in error.chain().skip(1) {
        let text = cause.to_string();
        if !shown.contains(&text) {
            lines.push(format!("    caused by: {text}"));
        }
        shown = text;
    }
    if let Some(hint) = error.downcast_ref::<PipelineError>().and_then(PipelineError::hint) {
        lines.extend(hint.lines().map(|line| format!("    hint: {line}")));
    }
    lines
}

pub fn banner(title: &str) {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║  {:<52}║", format!("export-onnx · {title}"));
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
}

/// Truncates a string to `max_len` with ellipsis if needed.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("float_input", 20), "float_input");
        assert_eq!(truncate("a_very_long_tensor_name", 10), "a_very_...");
    }

    #[test]
    fn test_embedded_causes_not_repeated() {
        use export_pipeline::{BackendError, ValidationError};

        let error = anyhow::Error::from(PipelineError::Validation(ValidationError::Backend {
            backend: "tract-onnx".into(),
            source: BackendError::Run("shape mismatch".into()),
        }));
        let lines = failure_lines(&error);
        assert!(lines[0].contains("inference failed: shape mismatch"));
        assert!(!lines.iter().any(|l| l.contains("caused by")));
        assert!(lines.iter().any(|l| l.contains("hint:")));
    }

    #[test]
    fn test_context_cause_is_shown() {
        let error = anyhow::Error::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such file",
        ))
        .context("reading graph 'g.onnx'");
        let lines = failure_lines(&error);
        assert_eq!(lines[0], "  ✗ reading graph 'g.onnx'");
        assert_eq!(lines[1], "    caused by: no such file");
    }

    #[test]
    fn test_overrides_apply() {
        let overrides = Overrides {
            revision: Some(17),
            seed: Some(3),
            parity_tolerance: None,
        };
        let missing = std::path::PathBuf::from("/nonexistent/export.toml");
        assert!(resolve_config(None, Some(missing), &overrides).is_err());

        let dir = tempfile::tempdir().unwrap();
        let config = resolve_config(Some(dir.path().to_path_buf()), None, &overrides).unwrap();
        assert_eq!(config.target_revision, 17);
        assert_eq!(config.validation_seed, Some(3));
        assert_eq!(config.parity_tolerance, None);
        assert!(config.output_path.starts_with(dir.path()));
    }
}
