//! Unique stage/region tokens for packaging.
//! Packaging with tokens instead of real names (`--stage <token>`) makes every
//! occurrence in the generated template unambiguous to find afterwards.

use serde::Serialize;
use uuid::Uuid;

/// A configuration snippet naming the tokens used at package time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderTokens {
    pub template_stage: String,
    pub template_region: String,
}

impl PlaceholderTokens {
    pub fn generate() -> Self {
        Self {
            template_stage: Uuid::new_v4().to_string(),
            template_region: Uuid::new_v4().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_unique() {
        let tokens = PlaceholderTokens::generate();
        assert_ne!(tokens.template_stage, tokens.template_region);
        assert_eq!(tokens.template_stage.len(), 36);
        assert_ne!(tokens, PlaceholderTokens::generate());

        let value = serde_json::to_value(&tokens).unwrap();
        assert!(value.get("templateStage").is_some());
        assert!(value.get("templateRegion").is_some());
    }
}
