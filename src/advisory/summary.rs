//! Compact graph description sent to the chat model.

use crate::graph::{Configuration, InfraGraph};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub component_type: String,
    pub label: String,
    pub configuration: Configuration,
}

#[derive(Debug, Clone, Serialize)]
pub struct EdgeSummary {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSummary {
    pub nodes: Vec<NodeSummary>,
    pub edges: Vec<EdgeSummary>,
    pub node_count: usize,
    pub edge_count: usize,
    pub by_category: BTreeMap<String, usize>,
    pub by_provider: BTreeMap<String, usize>,
}

impl GraphSummary {
    pub fn from_graph(graph: &InfraGraph) -> Self {
        let mut by_category = BTreeMap::new();
        let mut by_provider = BTreeMap::new();
        for node in &graph.nodes {
            *by_category.entry(node.category.to_string()).or_insert(0) += 1;
            *by_provider.entry(node.provider.to_string()).or_insert(0) += 1;
        }

        Self {
            nodes: graph
                .nodes
                .iter()
                .map(|node| NodeSummary {
                    id: node.id.clone(),
                    component_type: node.component_type.clone(),
                    label: node.display_name().to_string(),
                    configuration: node.configuration.clone(),
                })
                .collect(),
            edges: graph
                .edges
                .iter()
                .map(|edge| EdgeSummary {
                    from: edge.source.clone(),
                    to: edge.target.clone(),
                })
                .collect(),
            node_count: graph.nodes.len(),
            edge_count: graph.edges.len(),
            by_category,
            by_provider,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Node};

    #[test]
    fn test_counts_and_edges() {
        let graph = InfraGraph::new(
            vec![
                Node::new("a", "aws-ec2"),
                Node::new("b", "aws-rds"),
                Node::new("c", "gcp-cloud-sql"),
            ],
            vec![Edge::new("e", "a", "b")],
        );
        let summary = GraphSummary::from_graph(&graph);
        assert_eq!(summary.node_count, 3);
        assert_eq!(summary.by_category["database"], 2);
        assert_eq!(summary.by_provider["aws"], 2);
        assert_eq!(summary.edges[0].from, "a");

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["nodes"][0]["type"], "aws-ec2");
    }
}
