//! Reusable rule predicates.
//!
//! Every concrete rule in the framework and heuristic sets is one of these
//! patterns plus metadata. A pattern only answers "which nodes offend"; the
//! owning [`RuleRecord`](super::RuleRecord) turns the answer into findings.

use crate::graph::{Flag, InfraGraph, Node, Role};

/// Which configuration value counts as unsafe for a [`Pattern::ConfigFlag`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsafeWhen {
    /// Flag explicitly set to `true` (e.g. `publicAccess`)
    True,
    /// Flag unset, wrongly typed, or `false` (e.g. `encryption`, `tls`)
    NotTrue,
}

impl UnsafeWhen {
    fn is_unsafe(&self, value: Option<bool>) -> bool {
        match self {
            UnsafeWhen::True => value == Some(true),
            UnsafeWhen::NotTrue => value != Some(true),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Pattern {
    /// Any of `present` exists and no `absent` node exists. Offenders are
    /// the `present` nodes.
    RoleAbsence {
        present: &'static [Role],
        absent: Role,
    },
    /// Nodes of `roles` whose `flag` holds an unsafe value
    ConfigFlag {
        roles: &'static [Role],
        flag: Flag,
        unsafe_when: UnsafeWhen,
    },
    /// `role` nodes with more than one replica while no `balancer` exists
    UnbalancedReplicas { role: Role, balancer: Role },
    /// `role` nodes exist and every one of them runs a single replica
    SinglePointOfFailure { role: Role },
    /// Nodes with no incident edge, except those holding an `exempt` role
    Isolation { exempt: &'static [Role] },
    /// Nodes of `roles` with a configured region outside `allowed`
    Geography {
        roles: &'static [Role],
        allowed: &'static [&'static str],
    },
    /// More than `threshold` nodes of `roles` use a size from `large_sizes`
    Cardinality {
        roles: &'static [Role],
        large_sizes: &'static [&'static str],
        threshold: usize,
    },
}

fn has_any_role(node: &Node, roles: &[Role]) -> bool {
    roles.iter().any(|role| node.has_role(*role))
}

impl Pattern {
    /// Offending nodes in graph declaration order
    pub fn offenders<'g>(&self, graph: &'g InfraGraph) -> Vec<&'g Node> {
        match *self {
            Pattern::RoleAbsence { present, absent } => {
                if graph.has_role(absent) {
                    return Vec::new();
                }
                graph
                    .nodes
                    .iter()
                    .filter(|node| has_any_role(node, present))
                    .collect()
            }
            Pattern::ConfigFlag {
                roles,
                flag,
                unsafe_when,
            } => graph
                .nodes
                .iter()
                .filter(|node| has_any_role(node, roles))
                .filter(|node| unsafe_when.is_unsafe(node.config().flag(flag)))
                .collect(),
            Pattern::UnbalancedReplicas { role, balancer } => {
                if graph.has_role(balancer) {
                    return Vec::new();
                }
                graph
                    .nodes_by_role(role)
                    .into_iter()
                    .filter(|node| node.config().replicas() > 1)
                    .collect()
            }
            Pattern::SinglePointOfFailure { role } => {
                let nodes = graph.nodes_by_role(role);
                if !nodes.is_empty() && nodes.iter().all(|node| node.config().replicas() == 1) {
                    nodes
                } else {
                    Vec::new()
                }
            }
            Pattern::Isolation { exempt } => graph
                .nodes
                .iter()
                .filter(|node| !has_any_role(node, exempt))
                .filter(|node| !graph.edges.iter().any(|edge| edge.touches(&node.id)))
                .collect(),
            Pattern::Geography { roles, allowed } => graph
                .nodes
                .iter()
                .filter(|node| has_any_role(node, roles))
                .filter(|node| match node.config().region() {
                    Some(region) => !allowed
                        .iter()
                        .any(|candidate| candidate.eq_ignore_ascii_case(region.trim())),
                    None => false,
                })
                .collect(),
            Pattern::Cardinality {
                roles,
                large_sizes,
                threshold,
            } => {
                let large: Vec<&Node> = graph
                    .nodes
                    .iter()
                    .filter(|node| has_any_role(node, roles))
                    .filter(|node| match node.config().instance_size() {
                        Some(size) => is_large_size(size, large_sizes),
                        None => false,
                    })
                    .collect();
                if large.len() > threshold {
                    large
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Whether offenders are reported one finding per node (heuristic use)
    /// or make sense only as a set
    pub fn node_scoped(&self) -> bool {
        matches!(
            self,
            Pattern::ConfigFlag { .. }
                | Pattern::Isolation { .. }
                | Pattern::Geography { .. }
                | Pattern::UnbalancedReplicas { .. }
        )
    }
}

pub fn is_large_size(size: &str, large_sizes: &[&str]) -> bool {
    large_sizes
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(size.trim()))
}

/// Instance SKUs treated as oversized for typical workloads
pub const LARGE_INSTANCE_SIZES: &[&str] = &[
    "m5.8xlarge",
    "m5.12xlarge",
    "m5.16xlarge",
    "m5.24xlarge",
    "c5.9xlarge",
    "c5.18xlarge",
    "r5.12xlarge",
    "r5.24xlarge",
    "x1.32xlarge",
    "Standard_D32s_v5",
    "Standard_D48s_v5",
    "Standard_D64s_v5",
    "Standard_E64s_v5",
    "Standard_M128s",
    "n2-standard-32",
    "n2-standard-64",
    "n2-highmem-64",
    "m1-ultramem-160",
    "xlarge",
    "2xlarge",
];

/// Regions accepted for EU data residency
pub const EU_REGIONS: &[&str] = &[
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "eu-central-1",
    "eu-central-2",
    "eu-north-1",
    "eu-south-1",
    "eu-south-2",
    "westeurope",
    "northeurope",
    "francecentral",
    "germanywestcentral",
    "swedencentral",
    "italynorth",
    "polandcentral",
    "europe-west1",
    "europe-west2",
    "europe-west3",
    "europe-west4",
    "europe-west6",
    "europe-north1",
    "europe-central2",
];
