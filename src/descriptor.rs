//! Service descriptor (`serverless-state.json`) handling.

use crate::config::BuildPluginConfig;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageDef {
    pub artifact: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FunctionDef {
    #[serde(default)]
    pub package: PackageDef,
}

impl FunctionDef {
    pub fn artifact(&self) -> Option<&Path> {
        self.package.artifact.as_deref()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Provider {
    pub stage: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Custom {
    #[serde(rename = "buildPlugin")]
    pub build_plugin: Option<BuildPluginConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceObject {
    pub name: String,
}

/// The parts of the service the build needs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Older descriptors store the name directly
    pub service: Option<String>,
    pub service_object: Option<ServiceObject>,
    #[serde(default)]
    pub provider: Provider,
    #[serde(default)]
    pub custom: Custom,
    #[serde(default)]
    pub functions: IndexMap<String, FunctionDef>,
    pub artifact: Option<PathBuf>,
    #[serde(default)]
    pub package: PackageDef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceDescriptor {
    pub service: Service,
}

impl ServiceDescriptor {
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::InvalidDescriptor(e.to_string()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::InvalidDescriptor(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content)
            .map_err(|e| Error::InvalidDescriptor(format!("{}: {}", path.display(), e)))
    }

    /// # Errors
    /// * `Error::InvalidDescriptor` if neither name field is present
    pub fn name(&self) -> Result<&str> {
        self.service
            .service
            .as_deref()
            .or_else(|| self.service.service_object.as_ref().map(|s| s.name.as_str()))
            .ok_or_else(|| Error::InvalidDescriptor("service name is missing".to_string()))
    }

    pub fn functions(&self) -> &IndexMap<String, FunctionDef> {
        &self.service.functions
    }

    /// Artifact used by functions that do not carry their own.
    pub fn fallback_artifact(&self) -> Option<&Path> {
        self.service
            .artifact
            .as_deref()
            .or(self.service.package.artifact.as_deref())
    }

    pub fn build_plugin(&self) -> BuildPluginConfig {
        self.service.custom.build_plugin.clone().unwrap_or_default()
    }

    pub fn provider(&self) -> &Provider {
        &self.service.provider
    }
}
