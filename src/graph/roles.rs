//! Semantic roles and the role → component-type table.
//!
//! Rules and tests never look at component-type strings directly; they ask
//! for a role. Recognising a new component type is a one-line edit to
//! [`Role::type_keys`].

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Database,
    Cache,
    LoadBalancer,
    Backup,
    Firewall,
    Compute,
    Backend,
    Frontend,
    Storage,
    Monitoring,
    Cdn,
    Waf,
    /// Network scaffolding (VPCs, subnets, resource groups) that holds other
    /// resources rather than talking to them
    Container,
}

impl Role {
    pub const ALL: [Role; 13] = [
        Role::Database,
        Role::Cache,
        Role::LoadBalancer,
        Role::Backup,
        Role::Firewall,
        Role::Compute,
        Role::Backend,
        Role::Frontend,
        Role::Storage,
        Role::Monitoring,
        Role::Cdn,
        Role::Waf,
        Role::Container,
    ];

    /// Component types satisfying this role. A type may appear under
    /// several roles.
    pub fn type_keys(&self) -> &'static [&'static str] {
        match self {
            Role::Database => &[
                "aws-rds",
                "aws-aurora",
                "aws-dynamodb",
                "azure-sql",
                "azure-cosmosdb",
                "azure-postgresql",
                "gcp-cloud-sql",
                "gcp-firestore",
                "database",
            ],
            Role::Cache => &["aws-elasticache", "azure-redis", "gcp-memorystore", "cache"],
            Role::LoadBalancer => &[
                "aws-elb",
                "aws-alb",
                "azure-load-balancer",
                "azure-app-gateway",
                "gcp-load-balancer",
                "load-balancer",
            ],
            Role::Backup => &["aws-backup", "azure-backup", "gcp-backup-dr", "backup"],
            Role::Firewall => &[
                "aws-security-group",
                "azure-nsg",
                "azure-firewall",
                "gcp-firewall",
                "firewall",
            ],
            Role::Compute => &[
                "aws-ec2",
                "aws-ecs",
                "aws-eks",
                "azure-vm",
                "azure-aks",
                "gcp-compute-engine",
                "gcp-gke",
                "virtual-machine",
            ],
            Role::Backend => &[
                "api-server",
                "aws-lambda",
                "aws-ecs",
                "azure-app-service",
                "azure-functions",
                "gcp-cloud-run",
                "gcp-cloud-functions",
            ],
            Role::Frontend => &["web-frontend", "mobile-app", "azure-static-web-app"],
            Role::Storage => &[
                "aws-s3",
                "aws-efs",
                "azure-storage",
                "azure-blob-storage",
                "gcp-cloud-storage",
                "object-storage",
            ],
            Role::Monitoring => &[
                "aws-cloudwatch",
                "azure-monitor",
                "gcp-cloud-monitoring",
                "monitoring",
            ],
            Role::Cdn => &[
                "aws-cloudfront",
                "azure-cdn",
                "azure-front-door",
                "gcp-cloud-cdn",
                "cdn",
            ],
            Role::Waf => &["aws-waf", "azure-waf-policy", "gcp-cloud-armor", "waf"],
            Role::Container => &[
                "aws-vpc",
                "aws-subnet",
                "azure-vnet",
                "azure-subnet",
                "azure-resource-group",
                "gcp-vpc",
            ],
        }
    }

    pub fn matches(&self, component_type: &str) -> bool {
        self.type_keys().contains(&component_type)
    }

    /// Every role `component_type` satisfies, in [`Role::ALL`] order
    pub fn roles_of(component_type: &str) -> Vec<Role> {
        Self::ALL
            .iter()
            .copied()
            .filter(|role| role.matches(component_type))
            .collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Database => "database",
            Role::Cache => "cache",
            Role::LoadBalancer => "load-balancer",
            Role::Backup => "backup",
            Role::Firewall => "firewall",
            Role::Compute => "compute",
            Role::Backend => "backend",
            Role::Frontend => "frontend",
            Role::Storage => "storage",
            Role::Monitoring => "monitoring",
            Role::Cdn => "cdn",
            Role::Waf => "waf",
            Role::Container => "container",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
