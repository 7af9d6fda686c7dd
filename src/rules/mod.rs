//! Rule engine.
//!
//! Rules are named static records ([`RuleRecord`]) that pair metadata with a
//! reusable [`Pattern`]. Two families exist:
//!
//! - framework rules (CIS, GDPR, SOC 2, PCI-DSS, HIPAA), scored into a
//!   [`ComplianceReport`] by [`evaluate_framework`]
//! - heuristic rules (security, cost, reliability, performance), returned as
//!   a flat list by [`evaluate_heuristics`]
//!
//! Evaluation is a pure function of the graph and runs rules in declaration
//! order, so repeated calls yield identical, identically ordered output.

pub mod frameworks;
pub mod heuristics;
pub mod patterns;

use crate::graph::{InfraGraph, Node};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

pub use patterns::{Pattern, UnsafeWhen};

/// Finding severity, normalised to four levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Map free-form severity text onto the four levels. `info` and anything
    /// unrecognised become `Low`.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "critical" | "blocker" => Severity::Critical,
            "high" | "error" | "major" => Severity::High,
            "medium" | "moderate" | "warning" | "warn" => Severity::Medium,
            _ => Severity::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    fn weight(&self) -> u32 {
        match self {
            Severity::Low => 1,
            Severity::Medium => 5,
            Severity::High => 10,
            Severity::Critical => 25,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    Compliance,
    Security,
    Cost,
    Reliability,
    Performance,
    Advisory,
}

/// One rule evaluation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub id: String,
    pub rule_id: String,
    pub severity: Severity,
    pub category: RuleCategory,
    pub title: String,
    pub description: String,
    pub affected_resources: Vec<String>,
    pub remediation: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_fixable: Option<bool>,
}

/// How a record turns offenders into findings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// One finding listing every offender
    Aggregate,
    /// One finding per offender when the pattern is node scoped
    PerNode,
}

/// Common contract for anything that produces findings from a graph
pub trait Rule: Send + Sync {
    fn id(&self) -> &str;

    fn category(&self) -> RuleCategory;

    fn evaluate(&self, graph: &InfraGraph) -> Vec<Finding>;
}

/// Named, statically declared rule
#[derive(Debug, Clone, Copy)]
pub struct RuleRecord {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub severity: Severity,
    pub category: RuleCategory,
    pub remediation: &'static str,
    pub references: &'static [&'static str],
    pub auto_fixable: bool,
    pub scope: Scope,
    pub pattern: Pattern,
}

impl RuleRecord {
    fn finding(&self, id: String, title: String, description: String, nodes: &[&Node]) -> Finding {
        Finding {
            id,
            rule_id: self.id.to_string(),
            severity: self.severity,
            category: self.category,
            title,
            description,
            affected_resources: nodes.iter().map(|node| node.id.clone()).collect(),
            remediation: self.remediation.to_string(),
            references: self.references.iter().map(|r| r.to_string()).collect(),
            auto_fixable: Some(self.auto_fixable),
        }
    }
}

impl Rule for RuleRecord {
    fn id(&self) -> &str {
        self.id
    }

    fn category(&self) -> RuleCategory {
        self.category
    }

    fn evaluate(&self, graph: &InfraGraph) -> Vec<Finding> {
        let offenders = self.pattern.offenders(graph);
        if offenders.is_empty() {
            return Vec::new();
        }

        if self.scope == Scope::PerNode && self.pattern.node_scoped() {
            return offenders
                .iter()
                .map(|node| {
                    self.finding(
                        format!("{}:{}", self.id, node.id),
                        format!("{}: {}", self.title, node.display_name()),
                        self.description.to_string(),
                        std::slice::from_ref(node),
                    )
                })
                .collect();
        }

        let names: Vec<&str> = offenders.iter().map(|node| node.display_name()).collect();
        vec![self.finding(
            self.id.to_string(),
            self.title.to_string(),
            format!("{} Affected: {}.", self.description, names.join(", ")),
            &offenders,
        )]
    }
}

/// Run `rules` in order and concatenate their findings
pub fn run_rules<R: Rule>(rules: &[R], graph: &InfraGraph) -> Vec<Finding> {
    rules.iter().flat_map(|rule| rule.evaluate(graph)).collect()
}

/// Supported compliance frameworks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Framework {
    #[serde(rename = "cis")]
    Cis,
    #[serde(rename = "gdpr")]
    Gdpr,
    #[serde(rename = "soc2")]
    Soc2,
    #[serde(rename = "pci-dss")]
    PciDss,
    #[serde(rename = "hipaa")]
    Hipaa,
}

impl Framework {
    pub const ALL: [Framework; 5] = [
        Framework::Cis,
        Framework::Gdpr,
        Framework::Soc2,
        Framework::PciDss,
        Framework::Hipaa,
    ];

    /// Number of checks the framework is scored against. Fixed per
    /// framework; checks without a rule count as passed.
    pub fn total_checks(&self) -> usize {
        match self {
            Framework::Cis => 25,
            Framework::Gdpr => 15,
            Framework::Soc2 => 20,
            Framework::PciDss => 30,
            Framework::Hipaa => 18,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Framework::Cis => "cis",
            Framework::Gdpr => "gdpr",
            Framework::Soc2 => "soc2",
            Framework::PciDss => "pci-dss",
            Framework::Hipaa => "hipaa",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Framework::Cis => "CIS Benchmarks",
            Framework::Gdpr => "GDPR",
            Framework::Soc2 => "SOC 2",
            Framework::PciDss => "PCI-DSS",
            Framework::Hipaa => "HIPAA",
        }
    }

    pub fn rules(&self) -> &'static [RuleRecord] {
        match self {
            Framework::Cis => frameworks::CIS_RULES,
            Framework::Gdpr => frameworks::GDPR_RULES,
            Framework::Soc2 => frameworks::SOC2_RULES,
            Framework::PciDss => frameworks::PCI_DSS_RULES,
            Framework::Hipaa => frameworks::HIPAA_RULES,
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown compliance framework: {0}")]
pub struct UnknownFramework(pub String);

impl std::str::FromStr for Framework {
    type Err = UnknownFramework;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cis" => Ok(Framework::Cis),
            "gdpr" => Ok(Framework::Gdpr),
            "soc2" | "soc-2" => Ok(Framework::Soc2),
            "pci-dss" | "pci" | "pcidss" => Ok(Framework::PciDss),
            "hipaa" => Ok(Framework::Hipaa),
            other => Err(UnknownFramework(other.to_string())),
        }
    }
}

/// Scored result of one framework evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    pub framework: Framework,
    pub score: u8,
    pub findings: Vec<Finding>,
    pub passed_checks: usize,
    pub total_checks: usize,
    pub timestamp: DateTime<Utc>,
}

impl ComplianceReport {
    pub fn new(framework: Framework, findings: Vec<Finding>, timestamp: DateTime<Utc>) -> Self {
        let total_checks = framework.total_checks();
        let passed_checks = total_checks.saturating_sub(findings.len());
        let score = ((passed_checks as f64 / total_checks as f64) * 100.0).round() as u8;

        Self {
            framework,
            score,
            findings,
            passed_checks,
            total_checks,
            timestamp,
        }
    }

    pub fn failed_checks(&self) -> usize {
        self.total_checks - self.passed_checks
    }
}

pub fn evaluate_framework(graph: &InfraGraph, framework: Framework) -> ComplianceReport {
    evaluate_framework_at(graph, framework, Utc::now())
}

/// Same as [`evaluate_framework`] with a caller-chosen timestamp
pub fn evaluate_framework_at(
    graph: &InfraGraph,
    framework: Framework,
    timestamp: DateTime<Utc>,
) -> ComplianceReport {
    let findings = run_rules(framework.rules(), graph);
    debug!(
        framework = framework.id(),
        rules = framework.rules().len(),
        findings = findings.len(),
        "framework evaluated"
    );
    ComplianceReport::new(framework, findings, timestamp)
}

pub fn evaluate_all_frameworks(graph: &InfraGraph) -> Vec<ComplianceReport> {
    let timestamp = Utc::now();
    Framework::ALL
        .iter()
        .map(|framework| evaluate_framework_at(graph, *framework, timestamp))
        .collect()
}

/// Deterministic security/cost/reliability/performance findings
pub fn evaluate_heuristics(graph: &InfraGraph) -> Vec<Finding> {
    let findings = run_rules(heuristics::HEURISTIC_RULES, graph);
    debug!(findings = findings.len(), "heuristics evaluated");
    findings
}

pub fn rule_ids(framework: Framework) -> Vec<&'static str> {
    framework.rules().iter().map(|rule| rule.id).collect()
}

pub fn heuristic_rule_ids() -> Vec<&'static str> {
    heuristics::HEURISTIC_RULES.iter().map(|rule| rule.id).collect()
}

/// Severity breakdown of a findings list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub total: usize,
    pub by_severity: BTreeMap<Severity, usize>,
    pub by_category: BTreeMap<RuleCategory, usize>,
    /// 100 minus severity-weighted penalties, floored at 0
    pub health_score: u8,
}

impl AnalysisSummary {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut summary = Self {
            total: findings.len(),
            ..Self::default()
        };
        let mut penalty = 0u32;

        for finding in findings {
            *summary.by_severity.entry(finding.severity).or_insert(0) += 1;
            *summary.by_category.entry(finding.category).or_insert(0) += 1;
            penalty += finding.severity.weight();
        }

        summary.health_score = 100u32.saturating_sub(penalty) as u8;
        summary
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.by_severity.get(&severity).copied().unwrap_or(0)
    }
}
