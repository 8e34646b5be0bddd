//! Deployment template document handling.
//! Wraps the parsed JSON tree and exposes the few sections parameterization
//! touches: `Resources` and `Parameters`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

pub const RESOURCES_KEY: &str = "Resources";
pub const PARAMETERS_KEY: &str = "Parameters";

/// Key of a conditional-substitution node, e.g. `{"Fn::Sub": "${Stage}-table"}`
pub const SUB_KEY: &str = "Fn::Sub";

pub const DEPLOYMENT_BUCKET: &str = "ServerlessDeploymentBucket";
pub const DEPLOYMENT_BUCKET_POLICY: &str = "ServerlessDeploymentBucketPolicy";
pub const STAGE_PARAMETER: &str = "Stage";
pub const ARTIFACT_PATH_PARAMETER: &str = "ArtifactPath";

/// A template parameter declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParameterDecl {
    #[serde(rename = "Type")]
    pub kind: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl ParameterDecl {
    fn string(description: &str) -> Self {
        Self {
            kind: "String".to_string(),
            description: description.to_string(),
            allowed_pattern: None,
            default: None,
        }
    }

    pub fn deployment_bucket(default: Option<String>) -> Self {
        Self {
            default,
            ..Self::string("Deployment Bucket Name")
        }
    }

    pub fn stage() -> Self {
        Self::string("Serverless Stage")
    }

    /// Artifact paths are prefixes and must end with a slash.
    pub fn artifact_path() -> Self {
        Self {
            allowed_pattern: Some(".*/".to_string()),
            ..Self::string("Artifact path")
        }
    }
}

/// A template document known to carry a `Resources` mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    root: Map<String, Value>,
}

impl Template {
    /// Validates the document shape.
    ///
    /// # Errors
    /// * `Error::InvalidTemplate` if the root is not an object, `Resources` is
    ///   absent or not an object, or `Parameters` is present but not an object
    pub fn from_value(value: Value) -> Result<Self> {
        let root = match value {
            Value::Object(root) => root,
            other => {
                return Err(Error::InvalidTemplate(format!(
                    "expected a JSON object at the root, found {}",
                    kind_of(&other)
                )))
            }
        };

        match root.get(RESOURCES_KEY) {
            Some(Value::Object(_)) => {}
            Some(other) => {
                return Err(Error::InvalidTemplate(format!(
                    "'{}' must be an object, found {}",
                    RESOURCES_KEY,
                    kind_of(other)
                )))
            }
            None => {
                return Err(Error::InvalidTemplate(format!("missing '{}' section", RESOURCES_KEY)))
            }
        }

        if let Some(params) = root.get(PARAMETERS_KEY) {
            if !params.is_object() {
                return Err(Error::InvalidTemplate(format!(
                    "'{}' must be an object, found {}",
                    PARAMETERS_KEY,
                    kind_of(params)
                )));
            }
        }

        Ok(Self { root })
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| Error::InvalidTemplate(format!("not valid JSON: {}", e)))?;
        Self::from_value(value)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::InvalidTemplate(format!("cannot read {}: {}", path.display(), e))
        })?;
        let value: Value = serde_json::from_str(&content).map_err(|e| {
            Error::InvalidTemplate(format!("{} is not valid JSON: {}", path.display(), e))
        })?;
        Self::from_value(value)
    }

    pub fn resources(&self) -> &Map<String, Value> {
        match self.root.get(RESOURCES_KEY) {
            Some(Value::Object(resources)) => resources,
            _ => unreachable!("Resources validated on construction"),
        }
    }

    fn resources_mut(&mut self) -> &mut Map<String, Value> {
        match self.root.get_mut(RESOURCES_KEY) {
            Some(Value::Object(resources)) => resources,
            _ => unreachable!("Resources validated on construction"),
        }
    }

    pub fn parameters(&self) -> Option<&Map<String, Value>> {
        self.root.get(PARAMETERS_KEY).and_then(Value::as_object)
    }

    fn parameters_mut(&mut self) -> &mut Map<String, Value> {
        let params = self
            .root
            .entry(PARAMETERS_KEY)
            .or_insert_with(|| Value::Object(Map::new()));
        match params {
            Value::Object(params) => params,
            _ => unreachable!("Parameters validated on construction"),
        }
    }

    /// Removes the framework-managed deployment bucket and its policy.
    /// Returns the logical names that were actually removed.
    pub fn remove_deployment_bucket(&mut self) -> Vec<&'static str> {
        let resources = self.resources_mut();
        [DEPLOYMENT_BUCKET, DEPLOYMENT_BUCKET_POLICY]
            .into_iter()
            .filter(|name| resources.shift_remove(*name).is_some())
            .collect()
    }

    /// Ensures `Parameters` exists and declares `name` unless it already is.
    /// Returns true when the declaration was added.
    pub fn declare_parameter(&mut self, name: &str, decl: &ParameterDecl) -> Result<bool> {
        let params = self.parameters_mut();
        if params.contains_key(name) {
            return Ok(false);
        }
        let value = serde_json::to_value(decl).map_err(|e| {
            Error::SerializationError(format!("parameter '{}': {}", name, e))
        })?;
        params.insert(name.to_string(), value);
        Ok(true)
    }

    pub(crate) fn root_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.root
    }

    /// Compact JSON, keys in document order.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.root).map_err(|e| Error::SerializationError(e.to_string()))
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejects_missing_resources() {
        let err = Template::from_value(json!({"Outputs": {}})).unwrap_err();
        assert!(matches!(err, Error::InvalidTemplate(_)));
        assert!(err.to_string().contains("Resources"));
    }

    #[test]
    fn test_rejects_malformed_sections() {
        assert!(Template::from_value(json!({"Resources": []})).is_err());
        assert!(Template::from_value(json!({"Resources": {}, "Parameters": "x"})).is_err());
        assert!(Template::from_value(json!([1, 2])).is_err());
        assert!(Template::from_json("{not json").is_err());
    }

    #[test]
    fn test_load_reports_path_once() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("t.json");
        std::fs::write(&path, "{nope").unwrap();

        let message = Template::load(&path).unwrap_err().to_string();
        assert!(message.starts_with("Invalid template: "));
        assert_eq!(message.matches("Invalid template").count(), 1);
        assert!(message.contains("t.json"));
    }

    #[test]
    fn test_remove_deployment_bucket_is_idempotent() {
        let mut template = Template::from_value(json!({
            "Resources": {
                "ServerlessDeploymentBucket": {"Type": "AWS::S3::Bucket"},
                "ServerlessDeploymentBucketPolicy": {"Type": "AWS::S3::BucketPolicy"},
                "F": {"Type": "AWS::Lambda::Function"}
            }
        }))
        .unwrap();

        assert_eq!(
            template.remove_deployment_bucket(),
            vec![DEPLOYMENT_BUCKET, DEPLOYMENT_BUCKET_POLICY]
        );
        assert!(template.remove_deployment_bucket().is_empty());
        assert_eq!(template.resources().keys().collect::<Vec<_>>(), vec!["F"]);
    }

    #[test]
    fn test_declare_parameter_keeps_existing() {
        let mut template = Template::from_value(json!({
            "Resources": {},
            "Parameters": {"Stage": {"Type": "String", "Description": "mine"}}
        }))
        .unwrap();

        assert!(!template.declare_parameter(STAGE_PARAMETER, &ParameterDecl::stage()).unwrap());
        assert!(template
            .declare_parameter(ARTIFACT_PATH_PARAMETER, &ParameterDecl::artifact_path())
            .unwrap());
        assert_eq!(
            template.to_json().unwrap(),
            r#"{"Resources":{},"Parameters":{"Stage":{"Type":"String","Description":"mine"},"ArtifactPath":{"Type":"String","Description":"Artifact path","AllowedPattern":".*/"}}}"#
        );
    }

    #[test]
    fn test_deployment_bucket_default() {
        let decl = ParameterDecl::deployment_bucket(Some("my-bucket".to_string()));
        assert_eq!(
            serde_json::to_value(&decl).unwrap(),
            json!({"Type": "String", "Description": "Deployment Bucket Name", "Default": "my-bucket"})
        );
    }
}
