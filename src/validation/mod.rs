//! Infrastructure test suites.
//!
//! A CI-style gate over the graph: every check instance yields exactly one
//! pass/fail/warning verdict, and a check with no applicable nodes yields
//! nothing at all. Suites run independently and are concatenated in a fixed
//! order (connectivity, security, cost, configuration).

pub mod configuration;
pub mod connectivity;
pub mod cost;
pub mod security;

use crate::graph::InfraGraph;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    Connectivity,
    Security,
    Cost,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pass,
    Fail,
    Warning,
    Skipped,
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TestStatus::Pass => "pass",
            TestStatus::Fail => "fail",
            TestStatus::Warning => "warning",
            TestStatus::Skipped => "skipped",
        };
        f.write_str(label)
    }
}

/// One verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureTest {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub test_type: TestType,
    pub status: TestStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affected_nodes: Vec<String>,
}

impl InfrastructureTest {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        test_type: TestType,
        status: TestStatus,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            test_type,
            status,
            message: message.into(),
            details: None,
            affected_nodes: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_nodes<I, S>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.affected_nodes = nodes.into_iter().map(Into::into).collect();
        self
    }
}

/// Knobs for the cost suite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Monthly cost ceiling for the aggregate estimate
    pub monthly_cost_ceiling: f64,
    /// Fraction of the ceiling above which the estimate is a warning
    pub cost_warning_ratio: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            monthly_cost_ceiling: 5000.0,
            cost_warning_ratio: 0.8,
        }
    }
}

pub fn run_tests(graph: &InfraGraph) -> Vec<InfrastructureTest> {
    run_tests_with(graph, &ValidationConfig::default())
}

pub fn run_tests_with(graph: &InfraGraph, config: &ValidationConfig) -> Vec<InfrastructureTest> {
    let mut tests = connectivity::run(graph);
    tests.extend(security::run(graph));
    tests.extend(cost::run(graph, config));
    tests.extend(configuration::run(graph));

    debug!(tests = tests.len(), "infrastructure tests complete");
    tests
}

/// Status counts for a test run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TestRunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub warnings: usize,
    pub skipped: usize,
}

impl TestRunSummary {
    pub fn from_tests(tests: &[InfrastructureTest]) -> Self {
        let mut summary = Self {
            total: tests.len(),
            ..Self::default()
        };
        for test in tests {
            match test.status {
                TestStatus::Pass => summary.passed += 1,
                TestStatus::Fail => summary.failed += 1,
                TestStatus::Warning => summary.warnings += 1,
                TestStatus::Skipped => summary.skipped += 1,
            }
        }
        summary
    }

    /// Gate verdict: no failures
    pub fn passed(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Node};

    #[test]
    fn test_empty_graph_has_no_tests() {
        assert!(run_tests(&InfraGraph::default()).is_empty());
    }

    #[test]
    fn test_suite_order() {
        let graph = InfraGraph::new(
            vec![
                Node::new("vm", "aws-ec2"),
                Node::new("s3", "aws-s3").with_config("encryption", true),
            ],
            vec![Edge::new("e", "vm", "s3")],
        );
        let tests = run_tests(&graph);
        let types: Vec<TestType> = tests.iter().map(|t| t.test_type).collect();
        let mut sorted = types.clone();
        sorted.sort_by_key(|t| match t {
            TestType::Connectivity => 0,
            TestType::Security => 1,
            TestType::Cost => 2,
            TestType::Configuration => 3,
        });
        assert_eq!(types, sorted);
    }

    #[test]
    fn test_summary_gate() {
        let tests = vec![
            InfrastructureTest::new("a", "a", TestType::Cost, TestStatus::Pass, "ok"),
            InfrastructureTest::new("b", "b", TestType::Cost, TestStatus::Warning, "hm"),
        ];
        let summary = TestRunSummary::from_tests(&tests);
        assert!(summary.passed());
        assert_eq!(summary.warnings, 1);

        let mut failing = tests;
        failing.push(InfrastructureTest::new(
            "c",
            "c",
            TestType::Security,
            TestStatus::Fail,
            "bad",
        ));
        assert!(!TestRunSummary::from_tests(&failing).passed());
    }
}
