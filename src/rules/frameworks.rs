//! Compliance framework rule sets.
//!
//! Each framework is scored against a fixed number of checks (see
//! [`Framework::total_checks`](super::Framework::total_checks)); the records
//! below are the checks that are automated today. Framework rules are
//! aggregate scoped: one finding per failed check.

use super::patterns::{Pattern, UnsafeWhen, EU_REGIONS};
use super::{RuleCategory, RuleRecord, Scope, Severity};
use crate::graph::{Flag, Role};

const WORKLOADS: &[Role] = &[Role::Compute, Role::Backend, Role::Database, Role::Storage];
const DATA_STORES: &[Role] = &[Role::Database, Role::Storage];
const AMBIENT: &[Role] = &[Role::Container, Role::Backup, Role::Monitoring];

#[allow(clippy::too_many_arguments)]
const fn check(
    id: &'static str,
    title: &'static str,
    severity: Severity,
    pattern: Pattern,
    description: &'static str,
    remediation: &'static str,
    references: &'static [&'static str],
    auto_fixable: bool,
) -> RuleRecord {
    RuleRecord {
        id,
        title,
        description,
        severity,
        category: RuleCategory::Compliance,
        remediation,
        references,
        auto_fixable,
        scope: Scope::Aggregate,
        pattern,
    }
}

pub static CIS_RULES: &[RuleRecord] = &[
    check(
        "cis-1.1",
        "No network security group protecting compute",
        Severity::High,
        Pattern::RoleAbsence {
            present: &[Role::Compute],
            absent: Role::Firewall,
        },
        "Compute resources are deployed without a network security group or firewall.",
        "Add a network security group or firewall and restrict inbound traffic to required ports.",
        &["CIS Controls v8 12.2"],
        false,
    ),
    check(
        "cis-2.1",
        "Storage encryption disabled",
        Severity::High,
        Pattern::ConfigFlag {
            roles: &[Role::Storage],
            flag: Flag::Encryption,
            unsafe_when: UnsafeWhen::NotTrue,
        },
        "Storage resources do not enable encryption at rest.",
        "Enable server-side encryption with a managed or customer-managed key.",
        &["CIS Controls v8 3.11"],
        true,
    ),
    check(
        "cis-2.2",
        "Database encryption disabled",
        Severity::High,
        Pattern::ConfigFlag {
            roles: &[Role::Database],
            flag: Flag::Encryption,
            unsafe_when: UnsafeWhen::NotTrue,
        },
        "Databases do not enable encryption at rest.",
        "Enable transparent data encryption or storage-level encryption for every database.",
        &["CIS Controls v8 3.11"],
        true,
    ),
    check(
        "cis-2.3",
        "Publicly accessible storage",
        Severity::Critical,
        Pattern::ConfigFlag {
            roles: &[Role::Storage],
            flag: Flag::PublicAccess,
            unsafe_when: UnsafeWhen::True,
        },
        "Storage resources allow public access.",
        "Block public access and grant access through scoped identities or signed URLs.",
        &["CIS Controls v8 3.3"],
        true,
    ),
    check(
        "cis-3.1",
        "No TLS on load balancer",
        Severity::High,
        Pattern::ConfigFlag {
            roles: &[Role::LoadBalancer],
            flag: Flag::Tls,
            unsafe_when: UnsafeWhen::NotTrue,
        },
        "Load balancers accept traffic without TLS termination.",
        "Configure an HTTPS listener with a valid certificate and redirect plain HTTP.",
        &["CIS Controls v8 3.10"],
        true,
    ),
    check(
        "cis-4.1",
        "No backup configured",
        Severity::Critical,
        Pattern::RoleAbsence {
            present: &[Role::Database],
            absent: Role::Backup,
        },
        "Databases exist but no backup service is part of the architecture.",
        "Add a backup vault or service and attach a retention policy to each database.",
        &["CIS Controls v8 11.2"],
        false,
    ),
    check(
        "cis-5.1",
        "No monitoring configured",
        Severity::Medium,
        Pattern::RoleAbsence {
            present: WORKLOADS,
            absent: Role::Monitoring,
        },
        "Workloads are deployed without a monitoring or logging service.",
        "Add a monitoring service and forward resource logs and metrics to it.",
        &["CIS Controls v8 8.2"],
        false,
    ),
    check(
        "cis-6.1",
        "Database publicly accessible",
        Severity::Critical,
        Pattern::ConfigFlag {
            roles: &[Role::Database],
            flag: Flag::PublicAccess,
            unsafe_when: UnsafeWhen::True,
        },
        "Databases are reachable from the public internet.",
        "Disable public network access and connect through private endpoints.",
        &["CIS Controls v8 12.2"],
        true,
    ),
];

pub static GDPR_RULES: &[RuleRecord] = &[
    check(
        "gdpr-art44",
        "Personal data stored outside the EU",
        Severity::High,
        Pattern::Geography {
            roles: DATA_STORES,
            allowed: EU_REGIONS,
        },
        "Data stores are placed in regions outside the European Union.",
        "Move data stores to an EU region or document an approved transfer mechanism.",
        &["GDPR Art. 44"],
        false,
    ),
    check(
        "gdpr-art32-encryption",
        "Personal data not encrypted at rest",
        Severity::High,
        Pattern::ConfigFlag {
            roles: DATA_STORES,
            flag: Flag::Encryption,
            unsafe_when: UnsafeWhen::NotTrue,
        },
        "Data stores holding personal data do not enable encryption at rest.",
        "Enable encryption at rest on every database and storage resource.",
        &["GDPR Art. 32(1)(a)"],
        true,
    ),
    check(
        "gdpr-art32-availability",
        "No backup for personal data",
        Severity::Medium,
        Pattern::RoleAbsence {
            present: &[Role::Database],
            absent: Role::Backup,
        },
        "Personal data cannot be restored in a timely manner without backups.",
        "Add a backup service covering every database.",
        &["GDPR Art. 32(1)(c)"],
        false,
    ),
    check(
        "gdpr-art30",
        "Database audit logging disabled",
        Severity::Medium,
        Pattern::ConfigFlag {
            roles: &[Role::Database],
            flag: Flag::AuditLogging,
            unsafe_when: UnsafeWhen::NotTrue,
        },
        "Processing of personal data is not recorded by database audit logs.",
        "Enable audit logging on databases and retain the logs.",
        &["GDPR Art. 30"],
        true,
    ),
    check(
        "gdpr-art25",
        "Personal data publicly accessible",
        Severity::Critical,
        Pattern::ConfigFlag {
            roles: DATA_STORES,
            flag: Flag::PublicAccess,
            unsafe_when: UnsafeWhen::True,
        },
        "Data stores are reachable without network restriction.",
        "Disable public access so personal data is private by default.",
        &["GDPR Art. 25"],
        true,
    ),
];

pub static SOC2_RULES: &[RuleRecord] = &[
    check(
        "soc2-cc6.1",
        "Logical access controls missing",
        Severity::High,
        Pattern::RoleAbsence {
            present: &[Role::Compute],
            absent: Role::Firewall,
        },
        "Compute resources are not protected by a firewall or security group.",
        "Place compute behind a network security group with least-privilege rules.",
        &["SOC 2 CC6.1"],
        false,
    ),
    check(
        "soc2-cc6.7",
        "Data in transit not encrypted",
        Severity::High,
        Pattern::ConfigFlag {
            roles: &[Role::LoadBalancer],
            flag: Flag::Tls,
            unsafe_when: UnsafeWhen::NotTrue,
        },
        "Load balancers terminate traffic without TLS.",
        "Enable TLS on every load balancer listener.",
        &["SOC 2 CC6.7"],
        true,
    ),
    check(
        "soc2-cc7.2",
        "System monitoring missing",
        Severity::High,
        Pattern::RoleAbsence {
            present: WORKLOADS,
            absent: Role::Monitoring,
        },
        "No monitoring service observes the deployed workloads.",
        "Add a monitoring service with alerting on security-relevant events.",
        &["SOC 2 CC7.2"],
        false,
    ),
    check(
        "soc2-a1.2",
        "Backup and recovery missing",
        Severity::High,
        Pattern::RoleAbsence {
            present: &[Role::Database],
            absent: Role::Backup,
        },
        "Databases have no backup service for recovery.",
        "Add a backup service and test restores periodically.",
        &["SOC 2 A1.2"],
        false,
    ),
    check(
        "soc2-a1.1",
        "Single point of failure in compute tier",
        Severity::Medium,
        Pattern::SinglePointOfFailure {
            role: Role::Compute,
        },
        "Every compute resource runs a single instance.",
        "Run at least two replicas behind a load balancer.",
        &["SOC 2 A1.1"],
        false,
    ),
    check(
        "soc2-cc8.1",
        "Unmanaged resources",
        Severity::Low,
        Pattern::Isolation { exempt: AMBIENT },
        "Resources are not connected to the rest of the architecture and may be unmanaged.",
        "Connect or remove orphaned resources and record them in the change log.",
        &["SOC 2 CC8.1"],
        false,
    ),
];

pub static PCI_DSS_RULES: &[RuleRecord] = &[
    check(
        "pci-1.2",
        "Cardholder environment lacks a firewall",
        Severity::Critical,
        Pattern::RoleAbsence {
            present: &[Role::Compute, Role::Backend],
            absent: Role::Firewall,
        },
        "Workloads run without network security controls.",
        "Install network security controls between trusted and untrusted networks.",
        &["PCI DSS v4.0 1.2"],
        false,
    ),
    check(
        "pci-1.3",
        "Database reachable from the internet",
        Severity::Critical,
        Pattern::ConfigFlag {
            roles: &[Role::Database],
            flag: Flag::PublicAccess,
            unsafe_when: UnsafeWhen::True,
        },
        "Databases that may hold cardholder data are publicly accessible.",
        "Restrict database access to the cardholder data environment.",
        &["PCI DSS v4.0 1.3"],
        true,
    ),
    check(
        "pci-3.5",
        "Stored account data not encrypted",
        Severity::Critical,
        Pattern::ConfigFlag {
            roles: DATA_STORES,
            flag: Flag::Encryption,
            unsafe_when: UnsafeWhen::NotTrue,
        },
        "Data stores do not render stored data unreadable.",
        "Enable strong encryption at rest on all data stores.",
        &["PCI DSS v4.0 3.5"],
        true,
    ),
    check(
        "pci-4.2",
        "Transmission not protected with strong cryptography",
        Severity::Critical,
        Pattern::ConfigFlag {
            roles: &[Role::LoadBalancer],
            flag: Flag::Tls,
            unsafe_when: UnsafeWhen::NotTrue,
        },
        "Load balancers transmit data without TLS.",
        "Require TLS 1.2 or later on every public listener.",
        &["PCI DSS v4.0 4.2"],
        true,
    ),
    check(
        "pci-6.4",
        "Public web application without WAF",
        Severity::High,
        Pattern::RoleAbsence {
            present: &[Role::LoadBalancer, Role::Frontend],
            absent: Role::Waf,
        },
        "Public-facing applications are not protected by a web application firewall.",
        "Deploy a web application firewall in front of public endpoints.",
        &["PCI DSS v4.0 6.4.2"],
        false,
    ),
    check(
        "pci-10.2",
        "Database audit logs disabled",
        Severity::High,
        Pattern::ConfigFlag {
            roles: &[Role::Database],
            flag: Flag::AuditLogging,
            unsafe_when: UnsafeWhen::NotTrue,
        },
        "Access to databases is not captured in audit logs.",
        "Enable audit logging on all databases.",
        &["PCI DSS v4.0 10.2"],
        true,
    ),
    check(
        "pci-10.4",
        "No log review capability",
        Severity::High,
        Pattern::RoleAbsence {
            present: WORKLOADS,
            absent: Role::Monitoring,
        },
        "No monitoring service collects logs for review.",
        "Add a monitoring service that aggregates and alerts on logs.",
        &["PCI DSS v4.0 10.4"],
        false,
    ),
];

pub static HIPAA_RULES: &[RuleRecord] = &[
    check(
        "hipaa-164.312a",
        "Access control safeguards missing",
        Severity::High,
        Pattern::RoleAbsence {
            present: &[Role::Compute],
            absent: Role::Firewall,
        },
        "Systems handling ePHI are not protected by network access controls.",
        "Add a firewall or network security group around compute resources.",
        &["45 CFR 164.312(a)(1)"],
        false,
    ),
    check(
        "hipaa-164.312a2iv",
        "ePHI not encrypted at rest",
        Severity::High,
        Pattern::ConfigFlag {
            roles: DATA_STORES,
            flag: Flag::Encryption,
            unsafe_when: UnsafeWhen::NotTrue,
        },
        "Data stores that may hold ePHI do not enable encryption.",
        "Enable encryption at rest on every database and storage resource.",
        &["45 CFR 164.312(a)(2)(iv)"],
        true,
    ),
    check(
        "hipaa-164.312b",
        "Audit controls missing",
        Severity::High,
        Pattern::RoleAbsence {
            present: WORKLOADS,
            absent: Role::Monitoring,
        },
        "No mechanism records activity in systems that contain ePHI.",
        "Add a monitoring service and enable activity logs.",
        &["45 CFR 164.312(b)"],
        false,
    ),
    check(
        "hipaa-164.312e",
        "Transmission security missing",
        Severity::High,
        Pattern::ConfigFlag {
            roles: &[Role::LoadBalancer],
            flag: Flag::Tls,
            unsafe_when: UnsafeWhen::NotTrue,
        },
        "ePHI can be transmitted over unencrypted connections.",
        "Enable TLS on load balancers.",
        &["45 CFR 164.312(e)(1)"],
        true,
    ),
    check(
        "hipaa-164.308a7",
        "No contingency backup plan",
        Severity::Critical,
        Pattern::RoleAbsence {
            present: &[Role::Database],
            absent: Role::Backup,
        },
        "No data backup plan exists for databases.",
        "Add a backup service with retrievable exact copies of ePHI.",
        &["45 CFR 164.308(a)(7)(ii)(A)"],
        false,
    ),
    check(
        "hipaa-164.308a7-ha",
        "Database without high availability",
        Severity::Medium,
        Pattern::ConfigFlag {
            roles: &[Role::Database],
            flag: Flag::HighAvailability,
            unsafe_when: UnsafeWhen::NotTrue,
        },
        "Databases run without replication, risking unavailability of ePHI.",
        "Enable high availability or replication for databases.",
        &["45 CFR 164.308(a)(7)(ii)(C)"],
        true,
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{InfraGraph, Node};
    use crate::rules::run_rules;

    fn ids(findings: &[crate::rules::Finding]) -> Vec<&str> {
        findings.iter().map(|f| f.rule_id.as_str()).collect()
    }

    #[test]
    fn test_cis_on_database_and_load_balancer() {
        let graph = InfraGraph::new(
            vec![Node::new("db", "aws-rds"), Node::new("lb", "aws-alb")],
            vec![],
        );
        let findings = run_rules(CIS_RULES, &graph);
        let ids = ids(&findings);
        assert!(ids.contains(&"cis-4.1"));
        assert!(ids.contains(&"cis-3.1"));
        assert!(!ids.contains(&"cis-1.1"));
    }

    #[test]
    fn test_gdpr_residency() {
        let graph = InfraGraph::new(
            vec![
                Node::new("eu", "azure-sql")
                    .with_config("location", "westeurope")
                    .with_config("encryption", true)
                    .with_config("auditLogging", true),
                Node::new("bk", "azure-backup"),
            ],
            vec![],
        );
        assert!(run_rules(GDPR_RULES, &graph).is_empty());

        let graph = InfraGraph::new(
            vec![Node::new("us", "aws-s3")
                .with_config("region", "us-east-1")
                .with_config("encryption", true)],
            vec![],
        );
        assert_eq!(ids(&run_rules(GDPR_RULES, &graph)), vec!["gdpr-art44"]);
    }

    #[test]
    fn test_pci_waf_required_for_public_entry_points() {
        let graph = InfraGraph::new(
            vec![
                Node::new("lb", "aws-alb").with_config("tls", true),
                Node::new("waf", "aws-waf"),
            ],
            vec![],
        );
        assert!(!ids(&run_rules(PCI_DSS_RULES, &graph)).contains(&"pci-6.4"));
    }

    #[test]
    fn test_well_built_graph_passes_hipaa() {
        let graph = InfraGraph::new(
            vec![
                Node::new("vm", "aws-ec2").with_config("replicas", 2),
                Node::new("sg", "aws-security-group"),
                Node::new("lb", "aws-alb").with_config("tls", true),
                Node::new("db", "aws-rds")
                    .with_config("encryption", true)
                    .with_config("multiAz", true),
                Node::new("bk", "aws-backup"),
                Node::new("cw", "aws-cloudwatch"),
            ],
            vec![],
        );
        assert!(run_rules(HIPAA_RULES, &graph).is_empty());
    }
}
