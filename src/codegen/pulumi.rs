//! Pulumi (TypeScript) generator.

use super::templates::{TemplateManager, PULUMI_INDEX, PULUMI_PROJECT};
use super::{
    lookup, CodegenError, GeneratedDocument, MappingTable, Plan, PropertyValue, ResourceMapping,
    Target, TargetFormat,
};
use serde::Serialize;
use std::collections::BTreeSet;

use PropertyValue::{Bool, Number, Text};

static MAPPINGS: MappingTable = &[
    // AWS
    ("aws-ec2", ResourceMapping::new("aws.ec2.Instance", &[("ami", Text("ami-0c55b159cbfafe1f0")), ("instanceType", Text("t3.micro"))])),
    ("aws-lambda", ResourceMapping::new("aws.lambda.Function", &[("runtime", Text("nodejs18.x")), ("handler", Text("index.handler"))])),
    ("aws-ecs", ResourceMapping::new("aws.ecs.Service", &[("desiredCount", Number(1))])),
    ("aws-eks", ResourceMapping::new("aws.eks.Cluster", &[])),
    ("aws-rds", ResourceMapping::new("aws.rds.Instance", &[("engine", Text("postgres")), ("instanceClass", Text("db.t3.micro")), ("allocatedStorage", Number(20))])),
    ("aws-aurora", ResourceMapping::new("aws.rds.Cluster", &[("engine", Text("aurora-postgresql"))])),
    ("aws-dynamodb", ResourceMapping::new("aws.dynamodb.Table", &[("billingMode", Text("PAY_PER_REQUEST")), ("hashKey", Text("id"))])),
    ("aws-elasticache", ResourceMapping::new("aws.elasticache.Cluster", &[("engine", Text("redis")), ("nodeType", Text("cache.t3.micro")), ("numCacheNodes", Number(1))])),
    ("aws-s3", ResourceMapping::new("aws.s3.Bucket", &[])),
    ("aws-efs", ResourceMapping::new("aws.efs.FileSystem", &[])),
    ("aws-alb", ResourceMapping::new("aws.lb.LoadBalancer", &[("loadBalancerType", Text("application")), ("internal", Bool(false))])),
    ("aws-elb", ResourceMapping::new("aws.elb.LoadBalancer", &[])),
    ("aws-vpc", ResourceMapping::new("aws.ec2.Vpc", &[("cidrBlock", Text("10.0.0.0/16"))])),
    ("aws-subnet", ResourceMapping::new("aws.ec2.Subnet", &[("cidrBlock", Text("10.0.1.0/24"))])),
    ("aws-security-group", ResourceMapping::new("aws.ec2.SecurityGroup", &[])),
    ("aws-waf", ResourceMapping::new("aws.wafv2.WebAcl", &[("scope", Text("REGIONAL"))])),
    ("aws-kms", ResourceMapping::new("aws.kms.Key", &[("enableKeyRotation", Bool(true))])),
    ("aws-backup", ResourceMapping::new("aws.backup.Vault", &[])),
    ("aws-cloudwatch", ResourceMapping::new("aws.cloudwatch.LogGroup", &[("retentionInDays", Number(30))])),
    ("aws-cloudfront", ResourceMapping::new("aws.cloudfront.Distribution", &[("enabled", Bool(true))])),
    ("aws-sqs", ResourceMapping::new("aws.sqs.Queue", &[])),
    // Azure
    ("azure-resource-group", ResourceMapping::new("azure_native.resources.ResourceGroup", &[])),
    ("azure-vm", ResourceMapping::new("azure_native.compute.VirtualMachine", &[])),
    ("azure-app-service", ResourceMapping::new("azure_native.web.WebApp", &[])),
    ("azure-functions", ResourceMapping::new("azure_native.web.WebApp", &[("kind", Text("functionapp"))])),
    ("azure-aks", ResourceMapping::new("azure_native.containerservice.ManagedCluster", &[])),
    ("azure-sql", ResourceMapping::new("azure_native.sql.Database", &[])),
    ("azure-cosmosdb", ResourceMapping::new("azure_native.documentdb.DatabaseAccount", &[("databaseAccountOfferType", Text("Standard"))])),
    ("azure-redis", ResourceMapping::new("azure_native.cache.Redis", &[])),
    ("azure-storage", ResourceMapping::new("azure_native.storage.StorageAccount", &[("kind", Text("StorageV2"))])),
    ("azure-vnet", ResourceMapping::new("azure_native.network.VirtualNetwork", &[])),
    ("azure-nsg", ResourceMapping::new("azure_native.network.NetworkSecurityGroup", &[])),
    ("azure-load-balancer", ResourceMapping::new("azure_native.network.LoadBalancer", &[])),
    ("azure-app-gateway", ResourceMapping::new("azure_native.network.ApplicationGateway", &[])),
    ("azure-key-vault", ResourceMapping::new("azure_native.keyvault.Vault", &[])),
    // GCP
    ("gcp-compute-engine", ResourceMapping::new("gcp.compute.Instance", &[("machineType", Text("e2-medium"))])),
    ("gcp-cloud-run", ResourceMapping::new("gcp.cloudrunv2.Service", &[])),
    ("gcp-gke", ResourceMapping::new("gcp.container.Cluster", &[("initialNodeCount", Number(1))])),
    ("gcp-cloud-sql", ResourceMapping::new("gcp.sql.DatabaseInstance", &[("databaseVersion", Text("POSTGRES_15"))])),
    ("gcp-cloud-storage", ResourceMapping::new("gcp.storage.Bucket", &[("location", Text("EU"))])),
    ("gcp-vpc", ResourceMapping::new("gcp.compute.Network", &[("autoCreateSubnetworks", Bool(false))])),
    ("gcp-firewall", ResourceMapping::new("gcp.compute.Firewall", &[])),
    ("gcp-memorystore", ResourceMapping::new("gcp.redis.Instance", &[("memorySizeGb", Number(1))])),
    ("gcp-pubsub", ResourceMapping::new("gcp.pubsub.Topic", &[])),
];

/// Import alias to npm module
const PACKAGES: &[(&str, &str)] = &[
    ("aws", "@pulumi/aws"),
    ("azure_native", "@pulumi/azure-native"),
    ("gcp", "@pulumi/gcp"),
];

/// Identifiers `index.ts` declares besides the resource variables, plus
/// words that cannot name a variable
const RESERVED: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "enum", "export", "extends", "false", "finally", "for", "function", "if", "import",
    "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw", "true", "try",
    "typeof", "var", "void", "while", "with", "let", "static", "yield", "await", "pulumi", "aws",
    "azure_native", "gcp", "ids",
];

#[derive(Serialize)]
struct PackageContext {
    alias: &'static str,
    module: &'static str,
}

#[derive(Serialize)]
struct ResourceContext<'a> {
    name: String,
    resource_type: &'a str,
    properties: String,
    depends_on: Vec<String>,
}

#[derive(Serialize)]
struct IndexContext<'a> {
    packages: Vec<PackageContext>,
    resources: Vec<ResourceContext<'a>>,
}

#[derive(Serialize)]
struct ProjectContext {
    project: &'static str,
    description: &'static str,
}

pub struct PulumiTarget;

impl Target for PulumiTarget {
    fn format(&self) -> TargetFormat {
        TargetFormat::Pulumi
    }

    fn reserved_names(&self) -> &'static [&'static str] {
        RESERVED
    }

    fn mapping(&self, component_type: &str) -> Option<&'static ResourceMapping> {
        lookup(MAPPINGS, component_type)
    }

    fn render(&self, plan: &Plan<'_>) -> Result<Vec<GeneratedDocument>, CodegenError> {
        let templates = TemplateManager::new()?;

        let mut resources = Vec::with_capacity(plan.resources.len());
        for resource in &plan.resources {
            let properties = serde_json::to_string_pretty(&resource.properties).map_err(|err| {
                CodegenError::Serialization {
                    node_id: resource.node.id.clone(),
                    message: err.to_string(),
                }
            })?;
            resources.push(ResourceContext {
                name: resource.name.clone(),
                resource_type: resource.mapping.resource_type,
                properties,
                depends_on: resource.depends_on.clone(),
            });
        }

        let aliases: BTreeSet<&str> = resources
            .iter()
            .filter_map(|r| r.resource_type.split('.').next())
            .collect();
        let packages = PACKAGES
            .iter()
            .filter(|(alias, _)| aliases.contains(alias))
            .map(|&(alias, module)| PackageContext { alias, module })
            .collect();

        let index = templates.render(
            PULUMI_INDEX,
            &IndexContext {
                packages,
                resources,
            },
        )?;
        let project = templates.render(
            PULUMI_PROJECT,
            &ProjectContext {
                project: "infragraph-stack",
                description: "Infrastructure program generated by infragraph",
            },
        )?;

        Ok(vec![
            GeneratedDocument::text("index.ts", index),
            GeneratedDocument::text("Pulumi.yaml", project),
        ])
    }
}
