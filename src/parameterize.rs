//! Template parameterization.
//! Rewrites the stage, region and artifact-path literals baked into a packaged
//! template into placeholders, so one template can be deployed to any
//! environment.
//!
//! Every string leaf is classified by where it sits in the tree:
//! - inside an `Fn::Sub` template string it is already an expression, so
//!   literals are substituted in place;
//! - inside `Parameters` it is a declaration and stays a plain string;
//! - anywhere else a substituted string must be resolved at deploy time and is
//!   emitted as a `{"Fn::Sub": ...}` node.

use std::borrow::Cow;

use log::{debug, warn};
use regex::{NoExpand, Regex};
use serde_json::{Map, Value};

use crate::context::DeployContext;
use crate::error::{Error, Result};
use crate::template::{
    ParameterDecl, Template, ARTIFACT_PATH_PARAMETER, DEPLOYMENT_BUCKET, PARAMETERS_KEY,
    STAGE_PARAMETER, SUB_KEY,
};

/// Result of a parameterization run.
#[derive(Debug, Clone)]
pub struct Parameterized {
    pub template: Template,
    /// First artifact-path prefix found in the document
    pub artifact_prefix: Option<String>,
    /// Artifact-path prefixes that differ from `artifact_prefix`. They are
    /// replaced as well but deserve a manual look.
    pub divergent_prefixes: Vec<String>,
}

/// Where a value sits in the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Plain,
    /// Template string of an `Fn::Sub` node
    Expression,
    /// Anything under the top-level `Parameters` section
    ParameterDecl,
}

/// What happens to a string leaf.
#[derive(Debug, PartialEq, Eq)]
enum Rewrite {
    Untouched,
    Literal(String),
    Expression(String),
}

/// Compiled substitution patterns for one deploy context.
struct Substituter<'a> {
    stage: Option<Regex>,
    region: Option<Regex>,
    artifact: Regex,
    ctx: &'a DeployContext,
}

impl<'a> Substituter<'a> {
    fn new(ctx: &'a DeployContext) -> Result<Self> {
        let artifact_pattern = format!(
            "serverless/{}/.+/[0-9T:.Z-]+/",
            regex::escape(&ctx.service_name)
        );
        Ok(Self {
            stage: literal_pattern("stage", &ctx.stage)?,
            region: literal_pattern("region", &ctx.region)?,
            artifact: compile(&artifact_pattern)?,
            ctx,
        })
    }
}

/// Literals are matched verbatim; an empty literal disables its substitution.
fn literal_pattern(name: &str, literal: &str) -> Result<Option<Regex>> {
    if literal.is_empty() {
        debug!("Empty {} literal, skipping its substitution", name);
        return Ok(None);
    }
    compile(&regex::escape(literal)).map(Some)
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| Error::ConfigError(format!("invalid pattern '{}': {}", pattern, e)))
}

/// Replaces every match of `re`, returning `None` when nothing matched.
fn replace_all(re: &Regex, text: &str, with: &str) -> Option<String> {
    match re.replace_all(text, NoExpand(with)) {
        Cow::Borrowed(_) => None,
        Cow::Owned(replaced) => Some(replaced),
    }
}

struct Walker<'a> {
    subst: Substituter<'a>,
    artifact_prefix: Option<String>,
    divergent_prefixes: Vec<String>,
}

impl Walker<'_> {
    fn walk_root(&mut self, root: &mut Map<String, Value>) {
        for (key, value) in root.iter_mut() {
            match value {
                Value::Object(params) if key == PARAMETERS_KEY => self.walk_parameters(params),
                _ => self.walk(value, Scope::Plain),
            }
        }
    }

    /// Declarations this tool manages carry configured values and are left alone.
    fn walk_parameters(&mut self, params: &mut Map<String, Value>) {
        for (name, decl) in params.iter_mut() {
            if !MANAGED_PARAMETERS.contains(&name.as_str()) {
                self.walk(decl, Scope::ParameterDecl);
            }
        }
    }

    fn walk(&mut self, value: &mut Value, scope: Scope) {
        match value {
            Value::String(text) => match self.rewrite(text, scope) {
                Rewrite::Untouched => {}
                Rewrite::Literal(text) => *value = Value::String(text),
                Rewrite::Expression(text) => *value = sub_node(text),
            },
            Value::Array(items) => {
                for item in items {
                    self.walk(item, scope);
                }
            }
            Value::Object(map) => {
                for (key, child) in map.iter_mut() {
                    if key == SUB_KEY && scope != Scope::ParameterDecl {
                        self.walk_sub(child);
                    } else {
                        self.walk(child, scope);
                    }
                }
            }
            _ => {}
        }
    }

    /// `Fn::Sub` takes either a template string or `[template, variables]`.
    fn walk_sub(&mut self, value: &mut Value) {
        match value {
            Value::String(_) => self.walk(value, Scope::Expression),
            Value::Array(items) => {
                for (index, item) in items.iter_mut().enumerate() {
                    let scope = if index == 0 && item.is_string() {
                        Scope::Expression
                    } else {
                        Scope::Plain
                    };
                    self.walk(item, scope);
                }
            }
            _ => self.walk(value, Scope::Plain),
        }
    }

    fn rewrite(&mut self, text: &str, scope: Scope) -> Rewrite {
        match (self.substitute(text), scope) {
            (None, _) => Rewrite::Untouched,
            (Some(text), Scope::Plain) => Rewrite::Expression(text),
            (Some(text), Scope::Expression | Scope::ParameterDecl) => Rewrite::Literal(text),
        }
    }

    /// Artifact path first, since it embeds the stage; then stage, then region.
    fn substitute(&mut self, text: &str) -> Option<String> {
        let ctx = self.subst.ctx;
        let mut current: Option<String> = None;

        let found: Vec<String> = self
            .subst
            .artifact
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect();
        for prefix in found {
            self.record_prefix(prefix);
        }

        let steps = [
            (Some(&self.subst.artifact), ctx.artifact_replacement()),
            (self.subst.stage.as_ref(), ctx.stage_replacement()),
            (self.subst.region.as_ref(), ctx.region_replacement()),
        ];
        for (re, with) in steps {
            let Some(re) = re else { continue };
            let source = current.as_deref().unwrap_or(text);
            if let Some(replaced) = replace_all(re, source, with) {
                current = Some(replaced);
            }
        }
        current
    }

    fn record_prefix(&mut self, prefix: String) {
        match &self.artifact_prefix {
            None => {
                debug!("Detected artifact path prefix '{}'", prefix);
                self.artifact_prefix = Some(prefix);
            }
            Some(first) if *first == prefix => {}
            Some(first) => {
                if !self.divergent_prefixes.contains(&prefix) {
                    warn!(
                        "Artifact path '{}' differs from the first detected '{}'; both were parameterized, review the template",
                        prefix, first
                    );
                    self.divergent_prefixes.push(prefix);
                }
            }
        }
    }
}

const MANAGED_PARAMETERS: [&str; 3] = [DEPLOYMENT_BUCKET, STAGE_PARAMETER, ARTIFACT_PATH_PARAMETER];

fn sub_node(text: String) -> Value {
    let mut node = Map::new();
    node.insert(SUB_KEY.to_string(), Value::String(text));
    Value::Object(node)
}

/// Parameterizes a packaged template for the given deploy context.
///
/// # Flow
/// 1. Drops the framework-managed deployment bucket and its policy
/// 2. Declares the `ServerlessDeploymentBucket`, `Stage` and `ArtifactPath`
///    parameters unless already declared
/// 3. Substitutes artifact path, stage and region literals in every string leaf
///
/// # Errors
/// * `Error::InvalidTemplate` if the document has no `Resources` object
pub fn parameterize(document: Value, ctx: &DeployContext) -> Result<Parameterized> {
    let mut template = Template::from_value(document)?;

    for removed in template.remove_deployment_bucket() {
        debug!("Removed resource {}", removed);
    }

    let declarations = [
        (
            DEPLOYMENT_BUCKET,
            ParameterDecl::deployment_bucket(ctx.deployment_bucket.clone()),
        ),
        (STAGE_PARAMETER, ParameterDecl::stage()),
        (ARTIFACT_PATH_PARAMETER, ParameterDecl::artifact_path()),
    ];
    for (name, decl) in &declarations {
        if template.declare_parameter(name, decl)? {
            debug!("Declared parameter {}", name);
        }
    }

    let mut walker = Walker {
        subst: Substituter::new(ctx)?,
        artifact_prefix: None,
        divergent_prefixes: Vec::new(),
    };
    walker.walk_root(template.root_mut());

    Ok(Parameterized {
        template,
        artifact_prefix: walker.artifact_prefix,
        divergent_prefixes: walker.divergent_prefixes,
    })
}
