//! Configuration handling for ci-build.
//! Settings come from three layers, highest precedence first: command-line
//! flags, a standalone `buildplugin.{json,yml,yaml}` file, and the
//! `custom.buildPlugin` block of the service descriptor.

use crate::constants::CONFIG_FILES;
use crate::error::{Error, Result};
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The recognized configuration keys. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildPluginConfig {
    /// Stage literal the service was packaged with
    pub template_stage: Option<String>,
    /// Region literal the service was packaged with
    pub template_region: Option<String>,
    /// Replacement text for the stage literal
    pub stage: Option<String>,
    /// Replacement text for the region literal
    pub region: Option<String>,
    /// Replacement text for the artifact path prefix
    pub artifact_path: Option<String>,
    pub build_directory: Option<PathBuf>,
    pub deployment_bucket: Option<String>,
}

impl BuildPluginConfig {
    /// Layers `self` over `lower`: keys set in `self` win.
    pub fn or(self, lower: BuildPluginConfig) -> BuildPluginConfig {
        BuildPluginConfig {
            template_stage: self.template_stage.or(lower.template_stage),
            template_region: self.template_region.or(lower.template_region),
            stage: self.stage.or(lower.stage),
            region: self.region.or(lower.region),
            artifact_path: self.artifact_path.or(lower.artifact_path),
            build_directory: self.build_directory.or(lower.build_directory),
            deployment_bucket: self.deployment_bucket.or(lower.deployment_bucket),
        }
    }
}

/// Finds the first standalone configuration file in `project_dir`.
pub fn find_config_file<P: AsRef<Path>>(project_dir: P, config_files: &[&str]) -> Option<PathBuf> {
    config_files
        .iter()
        .map(|file| project_dir.as_ref().join(file))
        .find(|path| path.exists())
}

/// Parses configuration content, trying JSON first and YAML second.
///
/// # Errors
/// * `Error::ConfigError` if the content is neither
pub fn parse_config(content: &str) -> Result<BuildPluginConfig> {
    match serde_json::from_str(content) {
        Ok(config) => Ok(config),
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid configuration format: {}", e))),
    }
}

/// Loads the standalone configuration layer.
///
/// An explicit `config_path` must exist. Without one, the supported file
/// names are probed in `project_dir` and a missing file yields defaults.
pub fn load_config<P: AsRef<Path>>(
    project_dir: P,
    config_path: Option<&Path>,
) -> Result<BuildPluginConfig> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => match find_config_file(&project_dir, &CONFIG_FILES) {
            Some(path) => path,
            None => {
                debug!("No configuration file found (tried: {})", CONFIG_FILES.join(", "));
                return Ok(BuildPluginConfig::default());
            }
        },
    };

    debug!("Loading configuration from {}", path.display());
    let content = std::fs::read_to_string(&path).map_err(|e| {
        Error::ConfigError(format!("cannot read {}: {}", path.display(), e))
    })?;
    parse_config(&content)
}
