//! Security suite.

use super::{InfrastructureTest, TestStatus, TestType};
use crate::graph::{Flag, InfraGraph, Role};

pub fn run(graph: &InfraGraph) -> Vec<InfrastructureTest> {
    let mut tests = Vec::new();

    for node in graph.nodes_by_role(Role::Storage) {
        let encrypted = node.config().flag(Flag::Encryption) == Some(true);
        let test = if encrypted {
            InfrastructureTest::new(
                format!("sec-storage-encryption:{}", node.id),
                "Storage encryption",
                TestType::Security,
                TestStatus::Pass,
                format!("{} encrypts data at rest", node.display_name()),
            )
        } else {
            InfrastructureTest::new(
                format!("sec-storage-encryption:{}", node.id),
                "Storage encryption",
                TestType::Security,
                TestStatus::Fail,
                format!("{} does not enable encryption", node.display_name()),
            )
            .with_details("Set `encryption: true` on the storage resource.")
        };
        tests.push(test.with_nodes([node.id.clone()]));
    }

    for node in graph.nodes_by_role(Role::Database) {
        let public = node.config().flag(Flag::PublicAccess) == Some(true);
        let (status, message) = if public {
            (
                TestStatus::Fail,
                format!("{} is reachable from the public internet", node.display_name()),
            )
        } else {
            (
                TestStatus::Pass,
                format!("{} is not publicly accessible", node.display_name()),
            )
        };
        tests.push(
            InfrastructureTest::new(
                format!("sec-database-public-access:{}", node.id),
                "Database public access",
                TestType::Security,
                status,
                message,
            )
            .with_nodes([node.id.clone()]),
        );
    }

    if graph.has_role(Role::Compute) {
        let firewalls = graph.nodes_by_role(Role::Firewall);
        let test = if firewalls.is_empty() {
            InfrastructureTest::new(
                "sec-network-security-group",
                "Network security group",
                TestType::Security,
                TestStatus::Fail,
                "Compute resources exist without a security group or firewall",
            )
            .with_nodes(
                graph
                    .nodes_by_role(Role::Compute)
                    .into_iter()
                    .map(|node| node.id.clone()),
            )
        } else {
            InfrastructureTest::new(
                "sec-network-security-group",
                "Network security group",
                TestType::Security,
                TestStatus::Pass,
                format!("{} security group(s) protect compute", firewalls.len()),
            )
            .with_nodes(firewalls.into_iter().map(|node| node.id.clone()))
        };
        tests.push(test);
    }

    for node in graph.nodes_by_role(Role::LoadBalancer) {
        let tls = node.config().flag(Flag::Tls) == Some(true);
        let (status, message) = if tls {
            (
                TestStatus::Pass,
                format!("{} terminates TLS", node.display_name()),
            )
        } else {
            (
                TestStatus::Fail,
                format!("{} serves plain HTTP", node.display_name()),
            )
        };
        tests.push(
            InfrastructureTest::new(
                format!("sec-lb-tls:{}", node.id),
                "Load balancer TLS",
                TestType::Security,
                status,
                message,
            )
            .with_nodes([node.id.clone()]),
        );
    }

    tests
}
