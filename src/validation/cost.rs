//! Cost suite: a coarse monthly estimate and oversized SKU detection.

use super::{InfrastructureTest, TestStatus, TestType, ValidationConfig};
use crate::graph::{InfraGraph, Node, Role};
use crate::rules::patterns::{is_large_size, LARGE_INSTANCE_SIZES};

/// Unit cost for nodes that satisfy no priced role
const DEFAULT_UNIT_COST: f64 = 20.0;

/// Default monthly cost of one instance of a role
fn role_unit_cost(role: Role) -> f64 {
    match role {
        Role::Compute => 150.0,
        Role::Backend => 100.0,
        Role::Database => 400.0,
        Role::Cache => 120.0,
        Role::LoadBalancer => 25.0,
        Role::Storage => 30.0,
        Role::Backup => 50.0,
        Role::Firewall => 10.0,
        Role::Waf => 30.0,
        Role::Cdn => 40.0,
        Role::Monitoring => 15.0,
        Role::Frontend => 10.0,
        Role::Container => 0.0,
    }
}

/// Highest role cost for the node, times its replica count
pub fn node_monthly_cost(node: &Node) -> f64 {
    let roles = Role::roles_of(&node.component_type);
    let unit = if roles.is_empty() {
        DEFAULT_UNIT_COST
    } else {
        roles.into_iter().map(role_unit_cost).fold(0.0, f64::max)
    };
    unit * node.config().replicas() as f64
}

pub fn estimate_monthly_cost(graph: &InfraGraph) -> f64 {
    graph.nodes.iter().map(node_monthly_cost).sum()
}

pub fn run(graph: &InfraGraph, config: &ValidationConfig) -> Vec<InfrastructureTest> {
    let mut tests = Vec::new();
    if graph.is_empty() {
        return tests;
    }

    let estimate = estimate_monthly_cost(graph);
    let ceiling = config.monthly_cost_ceiling;
    let status = if estimate > ceiling {
        TestStatus::Fail
    } else if estimate > ceiling * config.cost_warning_ratio {
        TestStatus::Warning
    } else {
        TestStatus::Pass
    };
    tests.push(
        InfrastructureTest::new(
            "cost-monthly-estimate",
            "Monthly cost estimate",
            TestType::Cost,
            status,
            format!("Estimated ${:.2}/month against a ${:.2} ceiling", estimate, ceiling),
        )
        .with_details(format!("{} resource(s) priced", graph.nodes.len())),
    );

    for node in graph.nodes_by_role(Role::Compute) {
        let Some(size) = node.config().instance_size() else {
            continue;
        };
        let (status, message) = if is_large_size(size, LARGE_INSTANCE_SIZES) {
            (
                TestStatus::Warning,
                format!("{} uses oversized SKU {}", node.display_name(), size),
            )
        } else {
            (
                TestStatus::Pass,
                format!("{} uses SKU {}", node.display_name(), size),
            )
        };
        tests.push(
            InfrastructureTest::new(
                format!("cost-instance-size:{}", node.id),
                "Instance size",
                TestType::Cost,
                status,
                message,
            )
            .with_nodes([node.id.clone()]),
        );
    }

    tests
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_uses_replicas() {
        let node = Node::new("vm", "aws-ec2").with_config("replicas", 3);
        assert_eq!(node_monthly_cost(&node), 450.0);
        assert_eq!(node_monthly_cost(&Node::new("q", "aws-sqs")), DEFAULT_UNIT_COST);
    }

    #[test]
    fn test_ceiling_levels() {
        let graph = InfraGraph::new(vec![Node::new("db", "aws-rds")], vec![]);
        let status = |ceiling: f64| {
            let config = ValidationConfig {
                monthly_cost_ceiling: ceiling,
                ..ValidationConfig::default()
            };
            run(&graph, &config)[0].status
        };
        assert_eq!(status(5000.0), TestStatus::Pass);
        assert_eq!(status(450.0), TestStatus::Warning);
        assert_eq!(status(300.0), TestStatus::Fail);
    }

    #[test]
    fn test_oversized_only_when_size_set() {
        let graph = InfraGraph::new(
            vec![
                Node::new("a", "aws-ec2").with_config("instanceType", "m5.24xlarge"),
                Node::new("b", "aws-ec2"),
            ],
            vec![],
        );
        let tests = run(&graph, &ValidationConfig::default());
        assert_eq!(tests.len(), 2);
        assert_eq!(tests[1].id, "cost-instance-size:a");
        assert_eq!(tests[1].status, TestStatus::Warning);
    }

    #[test]
    fn test_empty_graph() {
        assert!(run(&InfraGraph::default(), &ValidationConfig::default()).is_empty());
    }
}
