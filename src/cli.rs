//! Command-line interface implementation for ci-build.
//! Provides argument parsing using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::BuildPluginConfig;
use crate::processor::BuildOptions;

/// Command-line arguments structure for ci-build.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "ci-build: parameterize a packaged serverless service for CI/CD deployment",
    long_about = None
)]
pub struct Args {
    /// Service directory containing the `.serverless` package output
    #[arg(value_name = "PROJECT_DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Configuration file (defaults to buildplugin.json/.yml/.yaml in PROJECT_DIR)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory the parameterized artifacts are written to
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Stage literal the service was packaged with
    #[arg(long)]
    pub template_stage: Option<String>,

    /// Region literal the service was packaged with
    #[arg(long)]
    pub template_region: Option<String>,

    /// Text replacing the stage literal (default: ${Stage})
    #[arg(long)]
    pub stage: Option<String>,

    /// Text replacing the region literal (default: ${AWS::Region})
    #[arg(long)]
    pub region: Option<String>,

    /// Text replacing the artifact path prefix (default: ${ArtifactPath})
    #[arg(long)]
    pub artifact_path: Option<String>,

    /// Default value of the ServerlessDeploymentBucket parameter
    #[arg(long)]
    pub deployment_bucket: Option<String>,

    /// Print a fresh pair of unique stage/region tokens to package with, then exit
    #[arg(long)]
    pub tokens: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            project_dir: self.project_dir.clone(),
            config_path: self.config.clone(),
            overrides: BuildPluginConfig {
                template_stage: self.template_stage.clone(),
                template_region: self.template_region.clone(),
                stage: self.stage.clone(),
                region: self.region.clone(),
                artifact_path: self.artifact_path.clone(),
                build_directory: self.output_dir.clone(),
                deployment_bucket: self.deployment_bucket.clone(),
            },
        }
    }
}

/// Parses command line arguments and returns the Args structure.
pub fn get_args() -> Args {
    Args::parse()
}
