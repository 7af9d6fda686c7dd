//! Static component catalog.
//!
//! Maps a component-type key to display metadata, provider, category and a
//! rough monthly cost range. Pure lookup, no behaviour.

use crate::graph::{Category, Provider};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Estimated monthly cost band
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostRange {
    pub min_monthly: f64,
    pub max_monthly: f64,
    pub currency: &'static str,
}

impl CostRange {
    const fn usd(min_monthly: f64, max_monthly: f64) -> Self {
        Self {
            min_monthly,
            max_monthly,
            currency: "USD",
        }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min_monthly + self.max_monthly) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub component_type: &'static str,
    pub display_name: &'static str,
    pub provider: Provider,
    pub category: Category,
    pub cost_range: CostRange,
}

const fn entry(
    component_type: &'static str,
    display_name: &'static str,
    provider: Provider,
    category: Category,
    cost_range: CostRange,
) -> CatalogEntry {
    CatalogEntry {
        component_type,
        display_name,
        provider,
        category,
        cost_range,
    }
}

use Category::*;
use Provider::{Aws, Azure, Gcp, Generic};

static ENTRIES: &[CatalogEntry] = &[
    // AWS
    entry("aws-ec2", "EC2 Instance", Aws, Compute, CostRange::usd(8.0, 2500.0)),
    entry("aws-lambda", "Lambda Function", Aws, Compute, CostRange::usd(0.0, 200.0)),
    entry("aws-ecs", "ECS Service", Aws, Compute, CostRange::usd(30.0, 1500.0)),
    entry("aws-eks", "EKS Cluster", Aws, Compute, CostRange::usd(73.0, 5000.0)),
    entry("aws-rds", "RDS Database", Aws, Database, CostRange::usd(15.0, 4000.0)),
    entry("aws-aurora", "Aurora Cluster", Aws, Database, CostRange::usd(60.0, 6000.0)),
    entry("aws-dynamodb", "DynamoDB Table", Aws, Database, CostRange::usd(1.0, 1000.0)),
    entry("aws-elasticache", "ElastiCache", Aws, Database, CostRange::usd(12.0, 2000.0)),
    entry("aws-s3", "S3 Bucket", Aws, Storage, CostRange::usd(1.0, 500.0)),
    entry("aws-efs", "EFS File System", Aws, Storage, CostRange::usd(3.0, 800.0)),
    entry("aws-elb", "Classic Load Balancer", Aws, Network, CostRange::usd(18.0, 100.0)),
    entry("aws-alb", "Application Load Balancer", Aws, Network, CostRange::usd(16.0, 150.0)),
    entry("aws-vpc", "VPC", Aws, Container, CostRange::usd(0.0, 0.0)),
    entry("aws-subnet", "Subnet", Aws, Container, CostRange::usd(0.0, 0.0)),
    entry("aws-security-group", "Security Group", Aws, Security, CostRange::usd(0.0, 0.0)),
    entry("aws-waf", "WAF Web ACL", Aws, Security, CostRange::usd(5.0, 300.0)),
    entry("aws-kms", "KMS Key", Aws, Security, CostRange::usd(1.0, 30.0)),
    entry("aws-backup", "AWS Backup Vault", Aws, Storage, CostRange::usd(5.0, 400.0)),
    entry("aws-cloudwatch", "CloudWatch", Aws, Monitoring, CostRange::usd(3.0, 300.0)),
    entry("aws-cloudfront", "CloudFront Distribution", Aws, Network, CostRange::usd(1.0, 600.0)),
    entry("aws-api-gateway", "API Gateway", Aws, Network, CostRange::usd(3.5, 500.0)),
    entry("aws-sqs", "SQS Queue", Aws, Integration, CostRange::usd(0.0, 100.0)),
    entry("aws-route53", "Route 53 Zone", Aws, Network, CostRange::usd(0.5, 50.0)),
    // Azure
    entry("azure-vm", "Virtual Machine", Azure, Compute, CostRange::usd(10.0, 3000.0)),
    entry("azure-functions", "Function App", Azure, Compute, CostRange::usd(0.0, 200.0)),
    entry("azure-app-service", "App Service", Azure, Compute, CostRange::usd(13.0, 900.0)),
    entry("azure-aks", "AKS Cluster", Azure, Compute, CostRange::usd(70.0, 5000.0)),
    entry("azure-sql", "Azure SQL Database", Azure, Database, CostRange::usd(5.0, 4500.0)),
    entry("azure-cosmosdb", "Cosmos DB", Azure, Database, CostRange::usd(24.0, 3000.0)),
    entry("azure-postgresql", "PostgreSQL Flexible Server", Azure, Database, CostRange::usd(12.0, 3000.0)),
    entry("azure-redis", "Azure Cache for Redis", Azure, Database, CostRange::usd(16.0, 2500.0)),
    entry("azure-storage", "Storage Account", Azure, Storage, CostRange::usd(1.0, 500.0)),
    entry("azure-blob-storage", "Blob Container", Azure, Storage, CostRange::usd(1.0, 400.0)),
    entry("azure-load-balancer", "Load Balancer", Azure, Network, CostRange::usd(18.0, 120.0)),
    entry("azure-app-gateway", "Application Gateway", Azure, Network, CostRange::usd(140.0, 900.0)),
    entry("azure-vnet", "Virtual Network", Azure, Container, CostRange::usd(0.0, 0.0)),
    entry("azure-subnet", "Subnet", Azure, Container, CostRange::usd(0.0, 0.0)),
    entry("azure-resource-group", "Resource Group", Azure, Container, CostRange::usd(0.0, 0.0)),
    entry("azure-nsg", "Network Security Group", Azure, Security, CostRange::usd(0.0, 0.0)),
    entry("azure-firewall", "Azure Firewall", Azure, Security, CostRange::usd(900.0, 1800.0)),
    entry("azure-key-vault", "Key Vault", Azure, Security, CostRange::usd(1.0, 50.0)),
    entry("azure-waf-policy", "WAF Policy", Azure, Security, CostRange::usd(20.0, 400.0)),
    entry("azure-backup", "Recovery Services Vault", Azure, Storage, CostRange::usd(5.0, 500.0)),
    entry("azure-monitor", "Azure Monitor", Azure, Monitoring, CostRange::usd(2.0, 400.0)),
    entry("azure-cdn", "CDN Profile", Azure, Network, CostRange::usd(1.0, 500.0)),
    entry("azure-front-door", "Front Door", Azure, Network, CostRange::usd(35.0, 800.0)),
    entry("azure-service-bus", "Service Bus", Azure, Integration, CostRange::usd(0.0, 700.0)),
    entry("azure-static-web-app", "Static Web App", Azure, Frontend, CostRange::usd(0.0, 9.0)),
    // GCP
    entry("gcp-compute-engine", "Compute Engine VM", Gcp, Compute, CostRange::usd(6.0, 2800.0)),
    entry("gcp-cloud-run", "Cloud Run Service", Gcp, Compute, CostRange::usd(0.0, 400.0)),
    entry("gcp-cloud-functions", "Cloud Function", Gcp, Compute, CostRange::usd(0.0, 200.0)),
    entry("gcp-gke", "GKE Cluster", Gcp, Compute, CostRange::usd(73.0, 5000.0)),
    entry("gcp-cloud-sql", "Cloud SQL", Gcp, Database, CostRange::usd(10.0, 4000.0)),
    entry("gcp-firestore", "Firestore", Gcp, Database, CostRange::usd(0.0, 800.0)),
    entry("gcp-memorystore", "Memorystore", Gcp, Database, CostRange::usd(35.0, 2000.0)),
    entry("gcp-cloud-storage", "Cloud Storage Bucket", Gcp, Storage, CostRange::usd(1.0, 500.0)),
    entry("gcp-load-balancer", "Cloud Load Balancing", Gcp, Network, CostRange::usd(18.0, 200.0)),
    entry("gcp-vpc", "VPC Network", Gcp, Container, CostRange::usd(0.0, 0.0)),
    entry("gcp-firewall", "Firewall Rule", Gcp, Security, CostRange::usd(0.0, 0.0)),
    entry("gcp-cloud-armor", "Cloud Armor Policy", Gcp, Security, CostRange::usd(5.0, 300.0)),
    entry("gcp-backup-dr", "Backup and DR", Gcp, Storage, CostRange::usd(5.0, 500.0)),
    entry("gcp-cloud-monitoring", "Cloud Monitoring", Gcp, Monitoring, CostRange::usd(0.0, 300.0)),
    entry("gcp-cloud-cdn", "Cloud CDN", Gcp, Network, CostRange::usd(1.0, 500.0)),
    entry("gcp-pubsub", "Pub/Sub Topic", Gcp, Integration, CostRange::usd(0.0, 300.0)),
    // Generic
    entry("web-frontend", "Web Frontend", Generic, Frontend, CostRange::usd(0.0, 50.0)),
    entry("mobile-app", "Mobile App", Generic, Frontend, CostRange::usd(0.0, 0.0)),
    entry("api-server", "API Server", Generic, Compute, CostRange::usd(20.0, 800.0)),
    entry("virtual-machine", "Virtual Machine", Generic, Compute, CostRange::usd(10.0, 2000.0)),
    entry("database", "Database", Generic, Database, CostRange::usd(15.0, 3000.0)),
    entry("cache", "Cache", Generic, Database, CostRange::usd(10.0, 1500.0)),
    entry("object-storage", "Object Storage", Generic, Storage, CostRange::usd(1.0, 400.0)),
    entry("load-balancer", "Load Balancer", Generic, Network, CostRange::usd(15.0, 150.0)),
    entry("firewall", "Firewall", Generic, Security, CostRange::usd(0.0, 1000.0)),
    entry("waf", "Web Application Firewall", Generic, Security, CostRange::usd(5.0, 400.0)),
    entry("backup", "Backup Service", Generic, Storage, CostRange::usd(5.0, 400.0)),
    entry("monitoring", "Monitoring", Generic, Monitoring, CostRange::usd(0.0, 300.0)),
    entry("cdn", "CDN", Generic, Network, CostRange::usd(1.0, 500.0)),
    entry("message-queue", "Message Queue", Generic, Integration, CostRange::usd(0.0, 300.0)),
];

static INDEX: Lazy<HashMap<&'static str, &'static CatalogEntry>> = Lazy::new(|| {
    ENTRIES
        .iter()
        .map(|entry| (entry.component_type, entry))
        .collect()
});

/// Look up a component type
pub fn catalog_entry(component_type: &str) -> Option<&'static CatalogEntry> {
    INDEX.get(component_type).copied()
}

/// All entries in declaration order
pub fn entries() -> &'static [CatalogEntry] {
    ENTRIES
}

pub fn entries_for(provider: Provider) -> impl Iterator<Item = &'static CatalogEntry> {
    ENTRIES.iter().filter(move |entry| entry.provider == provider)
}
