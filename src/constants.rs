//! Common constants used throughout ci-build.

/// Directory the framework writes packaging output into
pub const PACKAGE_DIR: &str = ".serverless";

/// Template produced by the framework's package step
pub const TEMPLATE_FILE: &str = "cloudformation-template-update-stack.json";

/// Jinja-flavoured copy of the parameterized template
pub const TEMPLATE_J2_FILE: &str = "cloudformation-template-update-stack.json.j2";

/// Service descriptor produced by the framework's package step
pub const STATE_FILE: &str = "serverless-state.json";

/// Default output directory for parameterized artifacts
pub const DEFAULT_BUILD_DIR: &str = ".buildPlugin";

/// Supported standalone configuration file names
pub const CONFIG_FILES: [&str; 3] = ["buildplugin.json", "buildplugin.yml", "buildplugin.yaml"];

/// Default placeholders written in place of the literals
pub const STAGE_PLACEHOLDER: &str = "${Stage}";
pub const REGION_PLACEHOLDER: &str = "${AWS::Region}";
pub const ARTIFACT_PLACEHOLDER: &str = "${ArtifactPath}";
