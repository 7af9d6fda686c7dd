//! Framework-independent heuristic rules.

use super::patterns::{Pattern, UnsafeWhen, LARGE_INSTANCE_SIZES};
use super::{RuleCategory, RuleRecord, Scope, Severity};
use crate::graph::{Flag, Role};

const fn heuristic(
    id: &'static str,
    title: &'static str,
    severity: Severity,
    category: RuleCategory,
    pattern: Pattern,
    description: &'static str,
    remediation: &'static str,
) -> RuleRecord {
    RuleRecord {
        id,
        title,
        description,
        severity,
        category,
        remediation,
        references: &[],
        auto_fixable: false,
        scope: Scope::PerNode,
        pattern,
    }
}

pub static HEURISTIC_RULES: &[RuleRecord] = &[
    // Security
    heuristic(
        "sec-public-database",
        "Database exposed publicly",
        Severity::Critical,
        RuleCategory::Security,
        Pattern::ConfigFlag {
            roles: &[Role::Database, Role::Cache],
            flag: Flag::PublicAccess,
            unsafe_when: UnsafeWhen::True,
        },
        "The data store accepts connections from the public internet.",
        "Disable public access and use private networking.",
    ),
    heuristic(
        "sec-unencrypted-storage",
        "Storage without encryption",
        Severity::High,
        RuleCategory::Security,
        Pattern::ConfigFlag {
            roles: &[Role::Storage, Role::Database],
            flag: Flag::Encryption,
            unsafe_when: UnsafeWhen::NotTrue,
        },
        "Data at rest is not encrypted.",
        "Set encryption to true for this resource.",
    ),
    heuristic(
        "sec-missing-firewall",
        "Compute without a firewall",
        Severity::High,
        RuleCategory::Security,
        Pattern::RoleAbsence {
            present: &[Role::Compute],
            absent: Role::Firewall,
        },
        "Compute resources exist but no firewall or security group is defined.",
        "Add a network security group and attach it to the compute subnet.",
    ),
    heuristic(
        "sec-lb-without-tls",
        "Load balancer without TLS",
        Severity::High,
        RuleCategory::Security,
        Pattern::ConfigFlag {
            roles: &[Role::LoadBalancer],
            flag: Flag::Tls,
            unsafe_when: UnsafeWhen::NotTrue,
        },
        "The load balancer does not terminate TLS.",
        "Enable an HTTPS listener.",
    ),
    heuristic(
        "sec-public-storage",
        "Storage bucket is public",
        Severity::Critical,
        RuleCategory::Security,
        Pattern::ConfigFlag {
            roles: &[Role::Storage],
            flag: Flag::PublicAccess,
            unsafe_when: UnsafeWhen::True,
        },
        "Objects in this storage resource can be read anonymously.",
        "Block public access on the bucket or account.",
    ),
    // Cost
    heuristic(
        "cost-oversized-instance",
        "Oversized instance size",
        Severity::Medium,
        RuleCategory::Cost,
        Pattern::Cardinality {
            roles: &[Role::Compute, Role::Database],
            large_sizes: LARGE_INSTANCE_SIZES,
            threshold: 0,
        },
        "Instances use very large SKUs that are rarely needed at launch.",
        "Right-size the instances and scale out instead of up.",
    ),
    heuristic(
        "cost-idle-resource",
        "Potentially idle resource",
        Severity::Low,
        RuleCategory::Cost,
        Pattern::Isolation {
            exempt: &[Role::Container, Role::Backup, Role::Monitoring],
        },
        "The resource has no connections and may be idle or orphaned.",
        "Connect the resource to its consumers or remove it.",
    ),
    // Reliability
    heuristic(
        "rel-no-backup",
        "No backup strategy",
        Severity::Critical,
        RuleCategory::Reliability,
        Pattern::RoleAbsence {
            present: &[Role::Database],
            absent: Role::Backup,
        },
        "Databases exist but nothing backs them up.",
        "Add a backup service with a retention policy.",
    ),
    heuristic(
        "rel-single-point-of-failure",
        "Single point of failure",
        Severity::High,
        RuleCategory::Reliability,
        Pattern::SinglePointOfFailure {
            role: Role::Compute,
        },
        "All compute resources run a single replica.",
        "Increase replicas to at least two.",
    ),
    heuristic(
        "rel-replicas-without-lb",
        "Replicas without load balancer",
        Severity::Medium,
        RuleCategory::Reliability,
        Pattern::UnbalancedReplicas {
            role: Role::Compute,
            balancer: Role::LoadBalancer,
        },
        "Multiple replicas are deployed but no load balancer distributes traffic.",
        "Add a load balancer in front of the replicas.",
    ),
    heuristic(
        "rel-database-no-ha",
        "Database without high availability",
        Severity::Medium,
        RuleCategory::Reliability,
        Pattern::ConfigFlag {
            roles: &[Role::Database],
            flag: Flag::HighAvailability,
            unsafe_when: UnsafeWhen::NotTrue,
        },
        "The database has no replication or standby.",
        "Enable high availability or a read replica.",
    ),
    // Performance
    heuristic(
        "perf-no-cache",
        "Database without cache",
        Severity::Low,
        RuleCategory::Performance,
        Pattern::RoleAbsence {
            present: &[Role::Database],
            absent: Role::Cache,
        },
        "Every read goes to the database; no caching layer exists.",
        "Add a cache in front of read-heavy queries.",
    ),
    heuristic(
        "perf-no-cdn",
        "Frontend without CDN",
        Severity::Low,
        RuleCategory::Performance,
        Pattern::RoleAbsence {
            present: &[Role::Frontend],
            absent: Role::Cdn,
        },
        "Static assets are served without a content delivery network.",
        "Serve the frontend through a CDN.",
    ),
];
