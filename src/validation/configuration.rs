//! Configuration suite: replicas, database HA, backup presence.

use super::{InfrastructureTest, TestStatus, TestType};
use crate::graph::{Flag, InfraGraph, Role};

const MIN_REPLICAS: i64 = 2;

pub fn run(graph: &InfraGraph) -> Vec<InfrastructureTest> {
    let mut tests = Vec::new();

    for node in graph.nodes_by_role(Role::Compute) {
        let replicas = node.config().replicas();
        let (status, message) = if replicas >= MIN_REPLICAS {
            (
                TestStatus::Pass,
                format!("{} runs {} replicas", node.display_name(), replicas),
            )
        } else {
            (
                TestStatus::Warning,
                format!("{} runs a single replica", node.display_name()),
            )
        };
        tests.push(
            InfrastructureTest::new(
                format!("cfg-replicas:{}", node.id),
                "Compute replicas",
                TestType::Configuration,
                status,
                message,
            )
            .with_nodes([node.id.clone()]),
        );
    }

    let databases = graph.nodes_by_role(Role::Database);
    for node in &databases {
        let ha = node.config().flag(Flag::HighAvailability) == Some(true);
        let (status, message) = if ha {
            (
                TestStatus::Pass,
                format!("{} has replication enabled", node.display_name()),
            )
        } else {
            (
                TestStatus::Warning,
                format!("{} has no replication or standby", node.display_name()),
            )
        };
        tests.push(
            InfrastructureTest::new(
                format!("cfg-database-ha:{}", node.id),
                "Database high availability",
                TestType::Configuration,
                status,
                message,
            )
            .with_nodes([node.id.clone()]),
        );
    }

    if !databases.is_empty() {
        let backups = graph.nodes_by_role(Role::Backup);
        let test = if backups.is_empty() {
            InfrastructureTest::new(
                "cfg-backup",
                "Backup configured",
                TestType::Configuration,
                TestStatus::Fail,
                "Databases exist but no backup service is defined",
            )
            .with_nodes(databases.iter().map(|node| node.id.clone()))
        } else {
            InfrastructureTest::new(
                "cfg-backup",
                "Backup configured",
                TestType::Configuration,
                TestStatus::Pass,
                format!("{} backup service(s) defined", backups.len()),
            )
            .with_nodes(backups.into_iter().map(|node| node.id.clone()))
        };
        tests.push(test);
    }

    tests
}
