//! Build orchestration.
//! Reads the packaged template and service descriptor, parameterizes the
//! template, writes it to the build directory and collects the artifacts.

use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use crate::{
    collector::collect_artifacts,
    config::{load_config, BuildPluginConfig},
    constants::{DEFAULT_BUILD_DIR, PACKAGE_DIR, STATE_FILE, TEMPLATE_FILE, TEMPLATE_J2_FILE},
    context::{DeployContext, Overrides},
    descriptor::ServiceDescriptor,
    error::{Error, Result},
    parameterize::parameterize,
    template::Template,
};

/// Options for one build run.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Service root containing the `.serverless` package output
    pub project_dir: PathBuf,
    /// Explicit standalone configuration file
    pub config_path: Option<PathBuf>,
    /// Highest-precedence configuration layer
    pub overrides: BuildPluginConfig,
}

/// Summary of a completed build.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    pub build_dir: PathBuf,
    pub templates: Vec<PathBuf>,
    pub artifacts: Vec<String>,
    pub artifact_prefix: Option<String>,
    pub divergent_prefixes: Vec<String>,
}

/// Merges the configuration layers: flags, config file, descriptor.
pub fn resolve_config(
    options: &BuildOptions,
    descriptor: &ServiceDescriptor,
) -> Result<BuildPluginConfig> {
    let file = load_config(&options.project_dir, options.config_path.as_deref())?;
    Ok(options
        .overrides
        .clone()
        .or(file)
        .or(descriptor.build_plugin()))
}

/// Builds the deploy context. The stage and region literals fall back to the
/// provider settings the service was packaged with.
///
/// # Errors
/// * `Error::ConfigError` if the stage or region literal cannot be determined
pub fn resolve_context(
    config: &BuildPluginConfig,
    descriptor: &ServiceDescriptor,
) -> Result<DeployContext> {
    let provider = descriptor.provider();
    let stage = config
        .template_stage
        .clone()
        .or_else(|| provider.stage.clone())
        .ok_or_else(|| Error::ConfigError("cannot determine the packaged stage".to_string()))?;
    let region = config
        .template_region
        .clone()
        .or_else(|| provider.region.clone())
        .ok_or_else(|| Error::ConfigError("cannot determine the packaged region".to_string()))?;

    debug!("Packaged with stage '{}' in region '{}'", stage, region);

    Ok(DeployContext::new(stage, region, descriptor.name()?)
        .with_overrides(Overrides {
            stage: config.stage.clone(),
            region: config.region.clone(),
            artifact_path: config.artifact_path.clone(),
        })
        .with_deployment_bucket(config.deployment_bucket.clone()))
}

/// Directory outputs are written to, relative paths anchored at the project.
pub fn resolve_build_dir(project_dir: &Path, config: &BuildPluginConfig) -> PathBuf {
    let build_dir = config
        .build_directory
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_BUILD_DIR));
    if build_dir.is_absolute() {
        build_dir
    } else {
        project_dir.join(build_dir)
    }
}

/// Writes the same content to every target, creating the build directory.
fn write_templates(content: &str, build_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(build_dir)?;
    let mut written = Vec::new();
    for name in [TEMPLATE_FILE, TEMPLATE_J2_FILE] {
        let path = build_dir.join(name);
        fs::write(&path, content)?;
        info!("Created template {}", path.display());
        written.push(path);
    }
    Ok(written)
}

/// Runs a full build.
///
/// # Flow
/// 1. Loads the service descriptor and resolves configuration
/// 2. Loads and parameterizes the packaged template
/// 3. Writes the template twice, as `.json` and `.json.j2`
/// 4. Copies the distinct function artifacts
pub fn run_build(options: &BuildOptions) -> Result<BuildReport> {
    let package_dir = options.project_dir.join(PACKAGE_DIR);

    let descriptor = ServiceDescriptor::load(package_dir.join(STATE_FILE))?;
    let config = resolve_config(options, &descriptor)?;
    let context = resolve_context(&config, &descriptor)?;
    let build_dir = resolve_build_dir(&options.project_dir, &config);

    let template = Template::load(package_dir.join(TEMPLATE_FILE))?;
    let result = parameterize(template.into_value(), &context)?;
    let content = result.template.to_json()?;

    let templates = write_templates(&content, &build_dir)?;
    let artifacts = collect_artifacts(
        descriptor.functions(),
        descriptor.fallback_artifact(),
        &options.project_dir,
        &build_dir,
    )?;

    Ok(BuildReport {
        build_dir,
        templates,
        artifacts,
        artifact_prefix: result.artifact_prefix,
        divergent_prefixes: result.divergent_prefixes,
    })
}
