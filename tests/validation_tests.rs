mod common;

use infragraph::graph::{Edge, InfraGraph, Node};
use infragraph::validation::{
    connectivity, cost, run_tests, run_tests_with, TestRunSummary, TestStatus, TestType,
    ValidationConfig,
};

#[test]
fn test_isolated_node_warns_then_passes_once_connected() {
    let lonely = InfraGraph::new(vec![Node::new("q", "aws-sqs").with_label("jobs")], vec![]);
    let tests = connectivity::run(&lonely);
    assert_eq!(tests.len(), 1);
    assert_eq!(tests[0].status, TestStatus::Warning);
    assert!(tests[0].message.contains("jobs"));
    assert_eq!(tests[0].affected_nodes, vec!["q".to_string()]);

    let connected = InfraGraph::new(
        vec![
            Node::new("q", "aws-sqs").with_label("jobs"),
            Node::new("q2", "aws-sqs").with_label("dead-letters"),
        ],
        vec![Edge::new("e", "q", "q2")],
    );
    let tests = connectivity::run(&connected);
    assert_eq!(tests.len(), 1);
    assert_eq!(tests[0].status, TestStatus::Pass);
}

#[test]
fn test_ambient_roles_are_not_orphans() {
    let graph = InfraGraph::new(
        vec![
            Node::new("vpc", "aws-vpc"),
            Node::new("bk", "aws-backup"),
            Node::new("cw", "aws-cloudwatch"),
        ],
        vec![],
    );
    assert!(connectivity::run(&graph).is_empty());
}

#[test]
fn test_three_tier_has_no_failures() {
    let tests = run_tests(&common::three_tier());
    let summary = TestRunSummary::from_tests(&tests);
    let failed: Vec<&str> = tests
        .iter()
        .filter(|test| test.status == TestStatus::Fail)
        .map(|test| test.id.as_str())
        .collect();
    assert!(summary.passed(), "failing: {:?}", failed);
    assert_eq!(
        summary.total,
        summary.passed + summary.failed + summary.warnings + summary.skipped
    );
}

#[test]
fn test_suites_run_in_fixed_order() {
    let tests = run_tests(&common::three_tier());
    let order: Vec<TestType> = tests.iter().map(|test| test.test_type).collect();
    let mut sorted = order.clone();
    sorted.sort_by_key(|test_type| match test_type {
        TestType::Connectivity => 0,
        TestType::Security => 1,
        TestType::Cost => 2,
        TestType::Configuration => 3,
    });
    assert_eq!(order, sorted);
}

#[test]
fn test_run_is_idempotent() {
    let graph = common::three_tier();
    assert_eq!(run_tests(&graph), run_tests(&graph));
}

#[test]
fn test_missing_backup_fails_and_insecure_pieces_are_flagged() {
    let graph = common::database_and_load_balancer();
    let tests = run_tests(&graph);
    let status = |id: &str| {
        tests
            .iter()
            .find(|test| test.id == id)
            .map(|test| test.status)
    };

    assert_eq!(status("cfg-backup"), Some(TestStatus::Fail));
    assert_eq!(status("sec-lb-tls:lb"), Some(TestStatus::Fail));
    assert_eq!(status("cfg-database-ha:db"), Some(TestStatus::Warning));
    // no compute, so no security-group or fan-out verdict
    assert_eq!(status("sec-network-security-group"), None);
    assert_eq!(status("conn-lb-fan-out:lb"), None);
    assert!(!TestRunSummary::from_tests(&tests).passed());
}

#[test]
fn test_cost_ceiling_is_configurable() {
    let graph = common::three_tier();
    let estimate = cost::estimate_monthly_cost(&graph);
    assert!(estimate > 0.0);

    let tight = ValidationConfig {
        monthly_cost_ceiling: estimate / 2.0,
        ..ValidationConfig::default()
    };
    let verdict = run_tests_with(&graph, &tight)
        .into_iter()
        .find(|test| test.id == "cost-monthly-estimate")
        .unwrap();
    assert_eq!(verdict.status, TestStatus::Fail);
}

#[test]
fn test_empty_graph_yields_no_tests() {
    assert!(run_tests(&InfraGraph::default()).is_empty());
}
