// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Pipeline configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! artifact_path = "models/classifier_model.safetensors"
//! descriptor_path = "models/model_metadata.json"
//! output_path = "models/classifier_model.onnx"
//! params_path = "models/classifier_params.json"
//! target_revision = 13
//! validation_seed = 42
//! parity_tolerance = 1e-4
//! ```
//!
//! Relative paths resolve against the install root, never the caller's
//! working directory.

use crate::PipelineError;
use graph_converter::DEFAULT_REVISION;
use std::path::{Path, PathBuf};

/// Name of the optional configuration file looked up in the install root.
pub const CONFIG_FILE_NAME: &str = "export.toml";

/// Configuration for one export run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Persisted classifier (SafeTensors).
    pub artifact_path: PathBuf,
    /// JSON descriptor, read and rewritten in place.
    pub descriptor_path: PathBuf,
    /// Where the ONNX graph is written.
    pub output_path: PathBuf,
    /// Where `export-onnx params` writes the raw parameters.
    pub params_path: PathBuf,
    /// ONNX opset revision to target.
    pub target_revision: u32,
    /// Seed for the synthetic validation input; entropy when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_seed: Option<u64>,
    /// When set, the graph's outputs must match the native model within
    /// this absolute tolerance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parity_tolerance: Option<f32>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            artifact_path: PathBuf::from("models/classifier_model.safetensors"),
            descriptor_path: PathBuf::from("models/model_metadata.json"),
            output_path: PathBuf::from("models/classifier_model.onnx"),
            params_path: PathBuf::from("models/classifier_params.json"),
            target_revision: DEFAULT_REVISION,
            validation_seed: None,
            parity_tolerance: None,
        }
    }
}

impl PipelineConfig {
    /// Configuration for an install root: `<root>/export.toml` if present,
    /// defaults otherwise, with relative paths resolved against `root`.
    pub fn for_install_root(root: &Path) -> Result<Self, PipelineError> {
        let file = root.join(CONFIG_FILE_NAME);
        let config = if file.is_file() {
            tracing::info!("using configuration '{}'", file.display());
            Self::from_file(&file)?
        } else {
            Self::default()
        };
        Ok(config.resolve(root))
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, PipelineError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, PipelineError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| PipelineError::Config(format!("TOML parse error: {e}")))?;
        config.check()?;
        Ok(config)
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, PipelineError> {
        toml::to_string_pretty(self)
            .map_err(|e| PipelineError::Config(format!("TOML serialise error: {e}")))
    }

    /// Joins every relative path onto `root`.
    pub fn resolve(mut self, root: &Path) -> Self {
        for path in [
            &mut self.artifact_path,
            &mut self.descriptor_path,
            &mut self.output_path,
            &mut self.params_path,
        ] {
            if path.is_relative() {
                *path = root.join(&*path);
            }
        }
        self
    }

    /// Rejects values no run could succeed with.
    pub fn check(&self) -> Result<(), PipelineError> {
        if let Some(tol) = self.parity_tolerance {
            if !tol.is_finite() || tol < 0.0 {
                return Err(PipelineError::Config(format!(
                    "parity_tolerance must be a non-negative number, got {tol}"
                )));
            }
        }
        Ok(())
    }
}

/// Directory the default paths resolve against: the executable's directory,
/// or its parent when the executable sits in a `bin/` directory.
pub fn install_root() -> Result<PathBuf, PipelineError> {
    let exe = std::env::current_exe()
        .map_err(|e| PipelineError::Config(format!("cannot locate executable: {e}")))?;
    let dir = exe
        .parent()
        .ok_or_else(|| PipelineError::Config("executable has no parent directory".into()))?;
    Ok(install_root_for(dir))
}

fn install_root_for(exe_dir: &Path) -> PathBuf {
    match (exe_dir.file_name(), exe_dir.parent()) {
        (Some(name), Some(parent)) if name == "bin" => parent.to_path_buf(),
        _ => exe_dir.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let c = PipelineConfig::default();
        assert_eq!(c.target_revision, 13);
        assert_eq!(c.output_path, PathBuf::from("models/classifier_model.onnx"));
        assert!(c.validation_seed.is_none());
        assert!(c.parity_tolerance.is_none());
    }

    #[test]
    fn test_from_toml_partial() {
        let c = PipelineConfig::from_toml("target_revision = 17\nvalidation_seed = 7\n").unwrap();
        assert_eq!(c.target_revision, 17);
        assert_eq!(c.validation_seed, Some(7));
        assert_eq!(c.descriptor_path, PathBuf::from("models/model_metadata.json"));
    }

    #[test]
    fn test_from_toml_rejects_bad_tolerance() {
        assert!(matches!(
            PipelineConfig::from_toml("parity_tolerance = -1.0"),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn test_from_toml_syntax_error() {
        assert!(matches!(
            PipelineConfig::from_toml("target_revision = ["),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let c = PipelineConfig {
            parity_tolerance: Some(1e-4),
            ..Default::default()
        };
        let back = PipelineConfig::from_toml(&c.to_toml().unwrap()).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_resolve_keeps_absolute() {
        let c = PipelineConfig {
            output_path: PathBuf::from("/abs/out.onnx"),
            ..Default::default()
        }
        .resolve(Path::new("/opt/app"));
        assert_eq!(c.output_path, PathBuf::from("/abs/out.onnx"));
        assert_eq!(
            c.artifact_path,
            PathBuf::from("/opt/app/models/classifier_model.safetensors")
        );
    }

    #[test]
    fn test_for_install_root_reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "output_path = \"out/graph.onnx\"\n",
        )
        .unwrap();
        let c = PipelineConfig::for_install_root(dir.path()).unwrap();
        assert_eq!(c.output_path, dir.path().join("out/graph.onnx"));
        assert_eq!(c.descriptor_path, dir.path().join("models/model_metadata.json"));
    }

    #[test]
    fn test_install_root_skips_bin() {
        assert_eq!(
            install_root_for(Path::new("/opt/app/bin")),
            PathBuf::from("/opt/app")
        );
        assert_eq!(
            install_root_for(Path::new("/opt/app")),
            PathBuf::from("/opt/app")
        );
    }
}
