//! Infrastructure-as-code generators.
//!
//! Each target owns a type-mapping table and picks one of two output
//! shapes: an imperative program (Terraform, Pulumi) rendered through
//! handlebars templates, or a declarative document (ARM, CloudFormation)
//! built as a value tree. Both shapes render from the same [`plan::Plan`],
//! which does the node/edge traversal, name sanitization and dependency
//! ordering once.
//!
//! Generation is deterministic: ordered maps everywhere, no timestamps and
//! no random identifiers in the output.

pub mod arm;
pub mod cloudformation;
pub mod plan;
pub mod pulumi;
pub mod sanitize;
pub mod templates;
pub mod terraform;

use crate::graph::InfraGraph;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

pub use plan::{Plan, PlannedResource};
pub use sanitize::{sanitize_alphanumeric, sanitize_identifier, IdentifierStyle, NameAllocator};

/// Supported target ecosystems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    Terraform,
    Pulumi,
    Arm,
    Cloudformation,
}

impl TargetFormat {
    pub const ALL: [TargetFormat; 4] = [
        TargetFormat::Terraform,
        TargetFormat::Pulumi,
        TargetFormat::Arm,
        TargetFormat::Cloudformation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetFormat::Terraform => "terraform",
            TargetFormat::Pulumi => "pulumi",
            TargetFormat::Arm => "arm",
            TargetFormat::Cloudformation => "cloudformation",
        }
    }

    /// Longest resource identifier the target accepts
    pub fn max_identifier_len(&self) -> usize {
        match self {
            TargetFormat::Terraform => 64,
            TargetFormat::Pulumi => 64,
            TargetFormat::Arm => 24,
            TargetFormat::Cloudformation => 32,
        }
    }

    pub fn shape(&self) -> OutputShape {
        match self {
            TargetFormat::Terraform | TargetFormat::Pulumi => OutputShape::Program,
            TargetFormat::Arm | TargetFormat::Cloudformation => OutputShape::Document,
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetFormat {
    type Err = CodegenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "terraform" | "tf" | "hcl" => Ok(TargetFormat::Terraform),
            "pulumi" | "typescript" => Ok(TargetFormat::Pulumi),
            "arm" | "azure-arm" => Ok(TargetFormat::Arm),
            "cloudformation" | "cfn" => Ok(TargetFormat::Cloudformation),
            other => Err(CodegenError::UnknownTarget(other.to_string())),
        }
    }
}

/// Canonical output families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputShape {
    /// Ordered statements with a trailing dependency clause and exports
    Program,
    /// One tree with parameters, variables, resources and outputs
    Document,
}

/// Literal used in a mapping's default property bag
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    Text(&'static str),
    Number(i64),
    Bool(bool),
}

impl PropertyValue {
    pub fn to_value(self) -> Value {
        match self {
            PropertyValue::Text(s) => Value::from(s),
            PropertyValue::Number(n) => Value::from(n),
            PropertyValue::Bool(b) => Value::from(b),
        }
    }
}

/// Target resource descriptor for one component type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceMapping {
    pub resource_type: &'static str,
    pub api_version: Option<&'static str>,
    pub defaults: &'static [(&'static str, PropertyValue)],
}

impl ResourceMapping {
    pub const fn new(
        resource_type: &'static str,
        defaults: &'static [(&'static str, PropertyValue)],
    ) -> Self {
        Self {
            resource_type,
            api_version: None,
            defaults,
        }
    }

    pub const fn versioned(mut self, api_version: &'static str) -> Self {
        self.api_version = Some(api_version);
        self
    }
}

/// Component type to resource descriptor table
pub type MappingTable = &'static [(&'static str, ResourceMapping)];

pub(crate) fn lookup(table: MappingTable, component_type: &str) -> Option<&'static ResourceMapping> {
    table
        .iter()
        .find(|(key, _)| *key == component_type)
        .map(|(_, mapping)| mapping)
}

/// One code-generation backend
pub trait Target {
    fn format(&self) -> TargetFormat;

    fn max_identifier_len(&self) -> usize {
        self.format().max_identifier_len()
    }

    fn shape(&self) -> OutputShape {
        self.format().shape()
    }

    fn identifier_style(&self) -> IdentifierStyle {
        IdentifierStyle::Snake
    }

    /// Names the rendered output already uses for its own declarations
    fn reserved_names(&self) -> &'static [&'static str] {
        &[]
    }

    fn mapping(&self, component_type: &str) -> Option<&'static ResourceMapping>;

    /// Render the planned resources into named documents
    fn render(&self, plan: &Plan<'_>) -> Result<Vec<GeneratedDocument>, CodegenError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DocumentBody {
    Text { content: String },
    /// Value tree plus its serialized form
    Structured { value: Value, content: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedDocument {
    pub name: String,
    pub body: DocumentBody,
}

impl GeneratedDocument {
    pub fn text(name: impl Into<String>, content: String) -> Self {
        Self {
            name: name.into(),
            body: DocumentBody::Text { content },
        }
    }

    pub fn structured(name: impl Into<String>, value: Value, content: String) -> Self {
        Self {
            name: name.into(),
            body: DocumentBody::Structured { value, content },
        }
    }

    pub fn content(&self) -> &str {
        match &self.body {
            DocumentBody::Text { content } | DocumentBody::Structured { content, .. } => content,
        }
    }

    pub fn value(&self) -> Option<&Value> {
        match &self.body {
            DocumentBody::Structured { value, .. } => Some(value),
            DocumentBody::Text { .. } => None,
        }
    }
}

/// Node left out of the generated output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedNode {
    pub node_id: String,
    pub component_type: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedArtifact {
    pub format: TargetFormat,
    pub documents: Vec<GeneratedDocument>,
    /// Sanitized resource name to node id
    pub name_map: BTreeMap<String, String>,
    pub skipped: Vec<SkippedNode>,
    pub warnings: Vec<String>,
    pub resource_count: usize,
    pub dependency_count: usize,
}

impl GeneratedArtifact {
    fn from_plan(format: TargetFormat, plan: &Plan<'_>) -> Self {
        Self {
            format,
            documents: Vec::new(),
            name_map: plan.name_map(),
            skipped: plan.skipped.clone(),
            warnings: plan.warnings.clone(),
            resource_count: plan.resources.len(),
            dependency_count: plan.dependency_count(),
        }
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn document(&self, name: &str) -> Option<&GeneratedDocument> {
        self.documents.iter().find(|doc| doc.name == name)
    }

    /// Generated name for a node, if it was emitted
    pub fn name_for(&self, node_id: &str) -> Option<&str> {
        self.name_map
            .iter()
            .find(|(_, id)| id.as_str() == node_id)
            .map(|(name, _)| name.as_str())
    }
}

#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("Unknown target format: {0}")]
    UnknownTarget(String),

    #[error("Cannot serialize node `{node_id}`: {message}")]
    Serialization { node_id: String, message: String },

    #[error("Template error: {0}")]
    Template(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<handlebars::TemplateError> for CodegenError {
    fn from(err: handlebars::TemplateError) -> Self {
        CodegenError::Template(err.to_string())
    }
}

impl From<handlebars::RenderError> for CodegenError {
    fn from(err: handlebars::RenderError) -> Self {
        CodegenError::Template(err.to_string())
    }
}

/// A failed generation together with whatever was produced before it
#[derive(Debug, Error)]
#[error("{format} generation failed: {error}")]
pub struct GenerationFailure {
    pub format: TargetFormat,
    #[source]
    pub error: CodegenError,
    pub partial: GeneratedArtifact,
}

pub type GenerationResult = Result<GeneratedArtifact, GenerationFailure>;

pub fn generate(graph: &InfraGraph, format: TargetFormat) -> GenerationResult {
    match format {
        TargetFormat::Terraform => generate_terraform(graph),
        TargetFormat::Pulumi => generate_pulumi(graph),
        TargetFormat::Arm => generate_arm(graph),
        TargetFormat::Cloudformation => generate_cloudformation(graph),
    }
}

pub fn generate_terraform(graph: &InfraGraph) -> GenerationResult {
    generate_with(graph, &terraform::TerraformTarget)
}

pub fn generate_pulumi(graph: &InfraGraph) -> GenerationResult {
    generate_with(graph, &pulumi::PulumiTarget)
}

pub fn generate_arm(graph: &InfraGraph) -> GenerationResult {
    generate_with(graph, &arm::ArmTarget)
}

pub fn generate_cloudformation(graph: &InfraGraph) -> GenerationResult {
    generate_with(graph, &cloudformation::CloudFormationTarget)
}

pub fn generate_with(graph: &InfraGraph, target: &dyn Target) -> GenerationResult {
    let plan = Plan::build(graph, target);
    let mut artifact = GeneratedArtifact::from_plan(target.format(), &plan);

    match target.render(&plan) {
        Ok(documents) => {
            debug!(
                target = %target.format(),
                resources = artifact.resource_count,
                skipped = artifact.skipped.len(),
                "generation complete"
            );
            artifact.documents = documents;
            Ok(artifact)
        }
        Err(error) => {
            if let CodegenError::Serialization { node_id, .. } = &error {
                artifact.resource_count = plan
                    .resources
                    .iter()
                    .position(|resource| &resource.node.id == node_id)
                    .unwrap_or(0);
            }
            Err(GenerationFailure {
                format: target.format(),
                error,
                partial: artifact,
            })
        }
    }
}
