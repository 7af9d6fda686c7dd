//! In-memory infrastructure graph.
//!
//! Nodes are placed component instances, edges read "source feeds/enables
//! target". Every analysis in this crate borrows an [`InfraGraph`] read-only;
//! nothing here mutates a snapshot once it has been loaded.

pub mod config;
pub mod roles;

use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::path::Path;

pub use crate::catalog::catalog_entry;
pub use config::{Configuration, Flag, NodeConfig};
pub use roles::Role;

/// Cloud vendor a component belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Aws,
    Azure,
    Gcp,
    #[serde(other)]
    Generic,
}

impl Default for Provider {
    fn default() -> Self {
        Provider::Generic
    }
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Aws => "aws",
            Provider::Azure => "azure",
            Provider::Gcp => "gcp",
            Provider::Generic => "generic",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Provider {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aws" => Ok(Provider::Aws),
            "azure" => Ok(Provider::Azure),
            "gcp" | "google" => Ok(Provider::Gcp),
            "generic" => Ok(Provider::Generic),
            other => Err(GraphError::UnknownProvider(other.to_string())),
        }
    }
}

/// Broad component category, mirrored from the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Compute,
    Storage,
    Database,
    Network,
    Security,
    Monitoring,
    Integration,
    Frontend,
    Container,
    #[serde(other)]
    Other,
}

impl Default for Category {
    fn default() -> Self {
        Category::Other
    }
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Compute => "compute",
            Category::Storage => "storage",
            Category::Database => "database",
            Category::Network => "network",
            Category::Security => "security",
            Category::Monitoring => "monitoring",
            Category::Integration => "integration",
            Category::Frontend => "frontend",
            Category::Container => "container",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A placed infrastructure component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub component_type: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub provider: Provider,
    #[serde(default)]
    pub configuration: Configuration,
    #[serde(default)]
    pub label: String,
}

impl Node {
    pub fn new(id: impl Into<String>, component_type: impl Into<String>) -> Self {
        let component_type = component_type.into();
        let (category, provider) = crate::catalog::catalog_entry(&component_type)
            .map(|entry| (entry.category, entry.provider))
            .unwrap_or_default();

        Self {
            id: id.into(),
            component_type,
            category,
            provider,
            configuration: Configuration::default(),
            label: String::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_config(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.configuration.insert(key, value.into());
        self
    }

    /// Typed view over the configuration bag
    pub fn config(&self) -> NodeConfig<'_> {
        NodeConfig::for_node(self)
    }

    pub fn has_role(&self, role: Role) -> bool {
        role.matches(&self.component_type)
    }

    /// Label if set, otherwise the component type
    pub fn display_name(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.component_type
        } else {
            &self.label
        }
    }
}

/// Directed relationship, `source` feeds/enables `target`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl Edge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// Graph snapshot consumed by every analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InfraGraph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

/// Errors raised while loading a graph snapshot
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Failed to read graph file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid graph JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid graph YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Duplicate node id: {0}")]
    DuplicateNode(String),
}

impl InfraGraph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn from_json_str(input: &str) -> Result<Self, GraphError> {
        let graph: InfraGraph = serde_json::from_str(input)?;
        graph.check_unique_ids()?;
        Ok(graph)
    }

    pub fn from_yaml_str(input: &str) -> Result<Self, GraphError> {
        let graph: InfraGraph = serde_yaml::from_str(input)?;
        graph.check_unique_ids()?;
        Ok(graph)
    }

    /// Load a snapshot, picking YAML for `.yaml`/`.yml` and JSON otherwise
    pub fn from_path(path: &Path) -> Result<Self, GraphError> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }

    fn check_unique_ids(&self) -> Result<(), GraphError> {
        let mut seen = HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(GraphError::DuplicateNode(node.id.clone()));
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Nodes whose component type satisfies `role`, in declaration order
    pub fn nodes_by_role(&self, role: Role) -> Vec<&Node> {
        self.nodes.iter().filter(|node| node.has_role(role)).collect()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.nodes.iter().any(|node| node.has_role(role))
    }

    /// Edges where `node_id` is either endpoint
    pub fn edges_touching(&self, node_id: &str) -> Vec<&Edge> {
        self.edges.iter().filter(|edge| edge.touches(node_id)).collect()
    }

    /// Targets of edges leaving `node_id`
    pub fn outgoing(&self, node_id: &str) -> Vec<&Node> {
        self.edges
            .iter()
            .filter(|edge| edge.source == node_id)
            .filter_map(|edge| self.node(&edge.target))
            .collect()
    }

    /// Breadth-first search along edge direction. Returns the first node
    /// (other than `from`) that satisfies `predicate`. Terminates on cycles.
    pub fn reachable<F>(&self, from: &str, predicate: F) -> Option<&Node>
    where
        F: Fn(&Node) -> bool,
    {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        visited.insert(from);
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            for next in self.outgoing(current) {
                if !visited.insert(next.id.as_str()) {
                    continue;
                }
                if predicate(next) {
                    return Some(next);
                }
                queue.push_back(next.id.as_str());
            }
        }

        None
    }
}

/// Free-function form of [`InfraGraph::nodes_by_role`]
pub fn nodes_by_role(graph: &InfraGraph, role: Role) -> Vec<&Node> {
    graph.nodes_by_role(role)
}

/// Free-function form of [`InfraGraph::edges_touching`]
pub fn edges_touching<'g>(graph: &'g InfraGraph, node_id: &str) -> Vec<&'g Edge> {
    graph.edges_touching(node_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> InfraGraph {
        InfraGraph::new(
            vec![
                Node::new("lb", "aws-alb"),
                Node::new("vm", "aws-ec2"),
                Node::new("db", "aws-rds"),
            ],
            vec![Edge::new("e1", "lb", "vm"), Edge::new("e2", "vm", "db")],
        )
    }

    #[test]
    fn test_node_defaults_from_catalog() {
        let node = Node::new("db", "aws-rds");
        assert_eq!(node.category, Category::Database);
        assert_eq!(node.provider, Provider::Aws);

        let unknown = Node::new("x", "quantum-mainframe");
        assert_eq!(unknown.category, Category::Other);
        assert_eq!(unknown.provider, Provider::Generic);
    }

    #[test]
    fn test_nodes_by_role_and_edges_touching() {
        let graph = sample();
        let databases = graph.nodes_by_role(Role::Database);
        assert_eq!(databases.len(), 1);
        assert_eq!(databases[0].id, "db");

        assert_eq!(graph.edges_touching("vm").len(), 2);
        assert_eq!(edges_touching(&graph, "lb").len(), 1);
        assert!(graph.edges_touching("missing").is_empty());
    }

    #[test]
    fn test_reachable_follows_direction() {
        let graph = sample();
        assert!(graph.reachable("lb", |n| n.has_role(Role::Database)).is_some());
        assert!(graph.reachable("db", |n| n.has_role(Role::LoadBalancer)).is_none());
    }

    #[test]
    fn test_reachable_terminates_on_cycle() {
        let graph = InfraGraph::new(
            vec![Node::new("a", "aws-ec2"), Node::new("b", "aws-ec2")],
            vec![Edge::new("e1", "a", "b"), Edge::new("e2", "b", "a")],
        );
        assert!(graph.reachable("a", |n| n.has_role(Role::Database)).is_none());
    }

    #[test]
    fn test_parse_json_snapshot() {
        let input = r#"{
            "nodes": [
                {"id": "n1", "componentType": "azure-sql", "category": "database",
                 "provider": "azure", "label": "Orders", "configuration": {"encryption": true}},
                {"id": "n2", "componentType": "azure-vm", "provider": "oracle"}
            ],
            "edges": [{"id": "e1", "source": "n2", "target": "n1"}]
        }"#;

        let graph = InfraGraph::from_json_str(input).unwrap();
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[0].configuration.flag("encryption"), Some(true));
        assert_eq!(graph.nodes[1].provider, Provider::Generic);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let input = r#"{"nodes": [{"id": "a", "componentType": "aws-s3"}, {"id": "a", "componentType": "aws-s3"}]}"#;
        assert!(matches!(
            InfraGraph::from_json_str(input),
            Err(GraphError::DuplicateNode(_))
        ));
    }
}
