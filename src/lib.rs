//! ci-build prepares a packaged serverless service for deployment by an
//! external CI/CD pipeline. It parameterizes the generated template so it is
//! environment independent and gathers the packaged artifacts next to it.

/// Command-line interface module for the ci-build application
pub mod cli;

/// Artifact collection into the build directory
pub mod collector;

/// Configuration handling
/// Supports JSON and YAML formats (buildplugin.json, buildplugin.yml, buildplugin.yaml)
pub mod config;

pub mod constants;

/// Explicit deploy context threaded through parameterization
pub mod context;

/// Service descriptor (serverless-state.json) parsing
pub mod descriptor;

/// Error types and handling for the ci-build application
pub mod error;

pub mod logger;

/// Stage, region and artifact path substitution
pub mod parameterize;

/// Core build orchestration
/// Combines all components to produce the final output
pub mod processor;

/// Template document model
pub mod template;

pub mod tokens;
