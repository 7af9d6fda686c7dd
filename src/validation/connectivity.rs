//! Connectivity suite: tier reachability, load-balancer fan-out, orphans.

use super::{InfrastructureTest, TestStatus, TestType};
use crate::graph::{InfraGraph, Role};
use std::collections::BTreeSet;

/// Roles that legitimately have no edges
const EDGELESS_ROLES: &[Role] = &[Role::Container, Role::Backup, Role::Monitoring];

pub fn run(graph: &InfraGraph) -> Vec<InfrastructureTest> {
    let mut tests = Vec::new();
    tests.extend(tier_reachability(
        graph,
        Role::Frontend,
        Role::Backend,
        "conn-frontend-backend",
        "Frontend reaches backend",
    ));
    tests.extend(tier_reachability(
        graph,
        Role::Backend,
        Role::Database,
        "conn-backend-database",
        "Backend reaches database",
    ));
    tests.extend(load_balancer_fan_out(graph));
    tests.extend(orphans(graph));
    tests
}

/// One verdict per `from` node, only when some `to` node exists
fn tier_reachability(
    graph: &InfraGraph,
    from: Role,
    to: Role,
    id: &str,
    name: &str,
) -> Vec<InfrastructureTest> {
    if !graph.has_role(to) {
        return Vec::new();
    }

    graph
        .nodes_by_role(from)
        .into_iter()
        .map(|node| {
            let test_id = format!("{}:{}", id, node.id);
            match graph.reachable(&node.id, |candidate| candidate.has_role(to)) {
                Some(target) => InfrastructureTest::new(
                    test_id,
                    name,
                    TestType::Connectivity,
                    TestStatus::Pass,
                    format!("{} reaches {} {}", node.display_name(), to, target.display_name()),
                )
                .with_nodes([node.id.clone(), target.id.clone()]),
                None => InfrastructureTest::new(
                    test_id,
                    name,
                    TestType::Connectivity,
                    TestStatus::Fail,
                    format!("{} has no path to any {} node", node.display_name(), to),
                )
                .with_details(format!("Add an edge from {} toward a {} node.", node.id, to))
                .with_nodes([node.id.clone()]),
            }
        })
        .collect()
}

fn load_balancer_fan_out(graph: &InfraGraph) -> Vec<InfrastructureTest> {
    if !graph.has_role(Role::Compute) {
        return Vec::new();
    }

    graph
        .nodes_by_role(Role::LoadBalancer)
        .into_iter()
        .map(|lb| {
            // parallel edges to one node count once
            let mut seen = BTreeSet::new();
            let targets: Vec<String> = graph
                .outgoing(&lb.id)
                .into_iter()
                .filter(|node| node.has_role(Role::Compute))
                .filter(|node| seen.insert(node.id.as_str()))
                .map(|node| node.id.clone())
                .collect();

            let (status, message) = match targets.len() {
                0 => (
                    TestStatus::Fail,
                    format!("{} does not route to any compute node", lb.display_name()),
                ),
                1 => (
                    TestStatus::Warning,
                    format!("{} routes to a single compute node", lb.display_name()),
                ),
                n => (
                    TestStatus::Pass,
                    format!("{} distributes traffic across {} compute nodes", lb.display_name(), n),
                ),
            };

            let mut nodes = vec![lb.id.clone()];
            nodes.extend(targets);
            InfrastructureTest::new(
                format!("conn-lb-fan-out:{}", lb.id),
                "Load balancer fan-out",
                TestType::Connectivity,
                status,
                message,
            )
            .with_nodes(nodes)
        })
        .collect()
}

/// Single verdict for the whole graph
fn orphans(graph: &InfraGraph) -> Option<InfrastructureTest> {
    let candidates: Vec<_> = graph
        .nodes
        .iter()
        .filter(|node| !EDGELESS_ROLES.iter().any(|role| node.has_role(*role)))
        .collect();
    if candidates.is_empty() {
        return None;
    }

    let orphaned: Vec<_> = candidates
        .into_iter()
        .filter(|node| graph.edges_touching(&node.id).is_empty())
        .collect();

    let test = if orphaned.is_empty() {
        InfrastructureTest::new(
            "conn-orphans",
            "Orphaned resources",
            TestType::Connectivity,
            TestStatus::Pass,
            "Every resource is connected",
        )
    } else {
        let names: Vec<&str> = orphaned.iter().map(|node| node.display_name()).collect();
        InfrastructureTest::new(
            "conn-orphans",
            "Orphaned resources",
            TestType::Connectivity,
            TestStatus::Warning,
            format!("Unconnected resources: {}", names.join(", ")),
        )
        .with_nodes(orphaned.iter().map(|node| node.id.clone()))
    };
    Some(test)
}
