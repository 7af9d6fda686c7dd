//! Shared traversal for every target.
//!
//! The planner maps nodes to resources, allocates sanitized names, turns
//! edges into dependencies and orders the result so every resource comes
//! after the resources it depends on.

use super::{NameAllocator, ResourceMapping, SkippedNode, Target};
use crate::graph::{InfraGraph, Node};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct PlannedResource<'g> {
    pub name: String,
    pub node: &'g Node,
    pub mapping: &'static ResourceMapping,
    /// Mapping defaults overlaid with the node's configuration
    pub properties: BTreeMap<String, Value>,
    /// Names of the resources this one depends on, in edge order
    pub depends_on: Vec<String>,
}

impl PlannedResource<'_> {
    /// Properties with keys rewritten by `convert`. When two keys convert to
    /// the same name the one from the node's configuration wins over the
    /// mapping default.
    pub fn properties_keyed<F>(&self, convert: F) -> BTreeMap<String, Value>
    where
        F: Fn(&str) -> String,
    {
        let mut out = BTreeMap::new();
        for (key, value) in &self.properties {
            let converted = convert(key);
            if out.contains_key(&converted) && self.node.configuration.get(key).is_none() {
                continue;
            }
            out.insert(converted, value.clone());
        }
        out
    }
}

#[derive(Debug, Clone, Default)]
pub struct Plan<'g> {
    /// Topologically ordered, declaration order breaks ties
    pub resources: Vec<PlannedResource<'g>>,
    pub skipped: Vec<SkippedNode>,
    pub warnings: Vec<String>,
}

impl<'g> Plan<'g> {
    pub fn build(graph: &'g InfraGraph, target: &dyn Target) -> Self {
        let mut plan = Plan::default();
        let mut names = NameAllocator::new(target.max_identifier_len())
            .with_style(target.identifier_style())
            .with_reserved(target.reserved_names());
        let mut planned: Vec<PlannedResource<'g>> = Vec::new();
        let mut index_of: HashMap<&str, usize> = HashMap::new();

        for node in &graph.nodes {
            let Some(mapping) = target.mapping(&node.component_type) else {
                plan.skipped.push(SkippedNode {
                    node_id: node.id.clone(),
                    component_type: node.component_type.clone(),
                    reason: format!(
                        "no {} mapping for component type `{}`",
                        target.format(),
                        node.component_type
                    ),
                });
                continue;
            };

            let raw_name = if node.label.trim().is_empty() {
                node.id.as_str()
            } else {
                node.label.as_str()
            };

            let mut properties: BTreeMap<String, Value> = mapping
                .defaults
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_value()))
                .collect();
            for (key, value) in node.configuration.iter() {
                properties.insert(key.clone(), value.clone());
            }

            index_of.insert(node.id.as_str(), planned.len());
            planned.push(PlannedResource {
                name: names.allocate(raw_name),
                node,
                mapping,
                properties,
                depends_on: Vec::new(),
            });
        }

        // dependencies[b] holds every a with an accepted edge a -> b
        let mut dependencies: Vec<Vec<usize>> = vec![Vec::new(); planned.len()];
        for edge in &graph.edges {
            let (Some(&from), Some(&to)) = (
                index_of.get(edge.source.as_str()),
                index_of.get(edge.target.as_str()),
            ) else {
                continue;
            };
            if dependencies[to].contains(&from) {
                continue;
            }
            if from == to || depends_transitively(&dependencies, from, to) {
                let message = format!(
                    "dropped edge `{}` ({} -> {}): it would create a dependency cycle",
                    edge.id, edge.source, edge.target
                );
                warn!("{}", message);
                plan.warnings.push(message);
                continue;
            }
            dependencies[to].push(from);
        }

        for (index, deps) in dependencies.iter().enumerate() {
            planned[index].depends_on = deps.iter().map(|&d| planned[d].name.clone()).collect();
        }

        plan.resources = topological_order(planned, &dependencies);
        plan
    }

    pub fn dependency_count(&self) -> usize {
        self.resources
            .iter()
            .map(|resource| resource.depends_on.len())
            .sum()
    }

    pub fn name_map(&self) -> BTreeMap<String, String> {
        self.resources
            .iter()
            .map(|resource| (resource.name.clone(), resource.node.id.clone()))
            .collect()
    }

    pub fn resource(&self, name: &str) -> Option<&PlannedResource<'g>> {
        self.resources.iter().find(|resource| resource.name == name)
    }
}

/// Whether `start` already depends on `goal` through accepted edges
fn depends_transitively(dependencies: &[Vec<usize>], start: usize, goal: usize) -> bool {
    let mut visited = HashSet::new();
    let mut stack = vec![start];
    while let Some(current) = stack.pop() {
        if current == goal {
            return true;
        }
        if visited.insert(current) {
            stack.extend(dependencies[current].iter().copied());
        }
    }
    false
}

/// Kahn's algorithm, always releasing the lowest declaration index first
fn topological_order<'g>(
    planned: Vec<PlannedResource<'g>>,
    dependencies: &[Vec<usize>],
) -> Vec<PlannedResource<'g>> {
    let mut remaining: Vec<usize> = dependencies.iter().map(Vec::len).collect();
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); planned.len()];
    for (index, deps) in dependencies.iter().enumerate() {
        for &dep in deps {
            dependents[dep].push(index);
        }
    }

    let mut ready: BTreeSet<usize> = remaining
        .iter()
        .enumerate()
        .filter(|(_, count)| **count == 0)
        .map(|(index, _)| index)
        .collect();

    let mut order = Vec::with_capacity(planned.len());
    while let Some(index) = ready.pop_first() {
        order.push(index);
        for &dependent in &dependents[index] {
            remaining[dependent] -= 1;
            if remaining[dependent] == 0 {
                ready.insert(dependent);
            }
        }
    }

    let mut slots: Vec<Option<PlannedResource<'g>>> = planned.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|index| slots[index].take())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::terraform::TerraformTarget;
    use crate::graph::Edge;

    fn names(plan: &Plan<'_>) -> Vec<String> {
        plan.resources.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn test_dependencies_come_first() {
        let graph = InfraGraph::new(
            vec![
                Node::new("db", "aws-rds"),
                Node::new("vm", "aws-ec2"),
                Node::new("lb", "aws-alb"),
            ],
            vec![Edge::new("e1", "lb", "vm"), Edge::new("e2", "vm", "db")],
        );
        let plan = Plan::build(&graph, &TerraformTarget);
        assert_eq!(names(&plan), vec!["lb", "vm", "db"]);
        assert_eq!(plan.resource("db").unwrap().depends_on, vec!["vm"]);
        assert_eq!(plan.dependency_count(), 2);
    }

    #[test]
    fn test_declaration_order_breaks_ties() {
        let graph = InfraGraph::new(
            vec![
                Node::new("c", "aws-s3"),
                Node::new("a", "aws-s3"),
                Node::new("b", "aws-s3"),
            ],
            vec![],
        );
        let plan = Plan::build(&graph, &TerraformTarget);
        assert_eq!(names(&plan), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_cycle_back_edge_is_dropped() {
        let graph = InfraGraph::new(
            vec![Node::new("a", "aws-ec2"), Node::new("b", "aws-ec2")],
            vec![
                Edge::new("e1", "a", "b"),
                Edge::new("e2", "b", "a"),
                Edge::new("e3", "a", "a"),
            ],
        );
        let plan = Plan::build(&graph, &TerraformTarget);
        assert_eq!(names(&plan), vec!["a", "b"]);
        assert_eq!(plan.dependency_count(), 1);
        assert_eq!(plan.warnings.len(), 2);
    }

    #[test]
    fn test_duplicate_edges_wire_once() {
        let graph = InfraGraph::new(
            vec![Node::new("a", "aws-ec2"), Node::new("b", "aws-rds")],
            vec![Edge::new("e1", "a", "b"), Edge::new("e2", "a", "b")],
        );
        let plan = Plan::build(&graph, &TerraformTarget);
        assert_eq!(plan.dependency_count(), 1);
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn test_labels_drive_names() {
        let graph = InfraGraph::new(
            vec![
                Node::new("n1", "aws-ec2").with_label("Web Server"),
                Node::new("n2", "aws-ec2").with_label("web server"),
            ],
            vec![],
        );
        let plan = Plan::build(&graph, &TerraformTarget);
        assert_eq!(names(&plan), vec!["web_server", "web_server_2"]);
        assert_eq!(plan.name_map()["web_server_2"], "n2");
    }
}
