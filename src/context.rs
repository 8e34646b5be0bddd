//! Deploy context passed explicitly through parameterization.

use crate::constants::{ARTIFACT_PLACEHOLDER, REGION_PLACEHOLDER, STAGE_PLACEHOLDER};

/// Replacement text chosen by the user instead of the default placeholders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub stage: Option<String>,
    pub region: Option<String>,
    pub artifact_path: Option<String>,
}

/// The stage/region pair the service was packaged with, plus everything
/// needed to rewrite it.
#[derive(Debug, Clone, PartialEq)]
pub struct DeployContext {
    /// Literal stage as it appears in the packaged template
    pub stage: String,
    /// Literal region as it appears in the packaged template
    pub region: String,
    pub service_name: String,
    pub overrides: Overrides,
    /// Default value for the deployment bucket parameter
    pub deployment_bucket: Option<String>,
}

impl DeployContext {
    pub fn new(
        stage: impl Into<String>,
        region: impl Into<String>,
        service_name: impl Into<String>,
    ) -> Self {
        Self {
            stage: stage.into(),
            region: region.into(),
            service_name: service_name.into(),
            overrides: Overrides::default(),
            deployment_bucket: None,
        }
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_deployment_bucket(mut self, bucket: Option<String>) -> Self {
        self.deployment_bucket = bucket;
        self
    }

    pub fn stage_replacement(&self) -> &str {
        self.overrides.stage.as_deref().unwrap_or(STAGE_PLACEHOLDER)
    }

    pub fn region_replacement(&self) -> &str {
        self.overrides.region.as_deref().unwrap_or(REGION_PLACEHOLDER)
    }

    pub fn artifact_replacement(&self) -> &str {
        self.overrides.artifact_path.as_deref().unwrap_or(ARTIFACT_PLACEHOLDER)
    }
}
