//! Terraform (HCL) generator.

use super::templates::{TemplateManager, TERRAFORM_MAIN, TERRAFORM_OUTPUTS};
use super::{
    lookup, CodegenError, GeneratedDocument, MappingTable, Plan, PlannedResource, PropertyValue,
    ResourceMapping, Target, TargetFormat,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use PropertyValue::{Bool, Number, Text};

static ATTRIBUTE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z_][a-z0-9_-]*$").expect("attribute pattern is valid"));

static MAPPINGS: MappingTable = &[
    // AWS
    ("aws-ec2", ResourceMapping::new("aws_instance", &[("ami", Text("ami-0c55b159cbfafe1f0")), ("instance_type", Text("t3.micro"))])),
    ("aws-lambda", ResourceMapping::new("aws_lambda_function", &[("runtime", Text("nodejs18.x")), ("handler", Text("index.handler"))])),
    ("aws-ecs", ResourceMapping::new("aws_ecs_service", &[("desired_count", Number(1))])),
    ("aws-eks", ResourceMapping::new("aws_eks_cluster", &[])),
    ("aws-rds", ResourceMapping::new("aws_db_instance", &[("engine", Text("postgres")), ("instance_class", Text("db.t3.micro")), ("allocated_storage", Number(20))])),
    ("aws-aurora", ResourceMapping::new("aws_rds_cluster", &[("engine", Text("aurora-postgresql"))])),
    ("aws-dynamodb", ResourceMapping::new("aws_dynamodb_table", &[("billing_mode", Text("PAY_PER_REQUEST")), ("hash_key", Text("id"))])),
    ("aws-elasticache", ResourceMapping::new("aws_elasticache_cluster", &[("engine", Text("redis")), ("node_type", Text("cache.t3.micro")), ("num_cache_nodes", Number(1))])),
    ("aws-s3", ResourceMapping::new("aws_s3_bucket", &[])),
    ("aws-efs", ResourceMapping::new("aws_efs_file_system", &[])),
    ("aws-elb", ResourceMapping::new("aws_elb", &[])),
    ("aws-alb", ResourceMapping::new("aws_lb", &[("load_balancer_type", Text("application")), ("internal", Bool(false))])),
    ("aws-vpc", ResourceMapping::new("aws_vpc", &[("cidr_block", Text("10.0.0.0/16"))])),
    ("aws-subnet", ResourceMapping::new("aws_subnet", &[("cidr_block", Text("10.0.1.0/24"))])),
    ("aws-security-group", ResourceMapping::new("aws_security_group", &[])),
    ("aws-waf", ResourceMapping::new("aws_wafv2_web_acl", &[("scope", Text("REGIONAL"))])),
    ("aws-kms", ResourceMapping::new("aws_kms_key", &[("enable_key_rotation", Bool(true))])),
    ("aws-backup", ResourceMapping::new("aws_backup_vault", &[])),
    ("aws-cloudwatch", ResourceMapping::new("aws_cloudwatch_log_group", &[("retention_in_days", Number(30))])),
    ("aws-cloudfront", ResourceMapping::new("aws_cloudfront_distribution", &[("enabled", Bool(true))])),
    ("aws-api-gateway", ResourceMapping::new("aws_api_gateway_rest_api", &[])),
    ("aws-sqs", ResourceMapping::new("aws_sqs_queue", &[])),
    ("aws-route53", ResourceMapping::new("aws_route53_zone", &[])),
    // Azure
    ("azure-vm", ResourceMapping::new("azurerm_linux_virtual_machine", &[("size", Text("Standard_B2s"))])),
    ("azure-functions", ResourceMapping::new("azurerm_linux_function_app", &[])),
    ("azure-app-service", ResourceMapping::new("azurerm_linux_web_app", &[])),
    ("azure-aks", ResourceMapping::new("azurerm_kubernetes_cluster", &[])),
    ("azure-sql", ResourceMapping::new("azurerm_mssql_database", &[("sku_name", Text("S0"))])),
    ("azure-cosmosdb", ResourceMapping::new("azurerm_cosmosdb_account", &[("offer_type", Text("Standard"))])),
    ("azure-postgresql", ResourceMapping::new("azurerm_postgresql_flexible_server", &[("version", Text("15"))])),
    ("azure-redis", ResourceMapping::new("azurerm_redis_cache", &[("capacity", Number(1)), ("family", Text("C")), ("sku_name", Text("Basic"))])),
    ("azure-storage", ResourceMapping::new("azurerm_storage_account", &[("account_tier", Text("Standard")), ("account_replication_type", Text("LRS"))])),
    ("azure-blob-storage", ResourceMapping::new("azurerm_storage_container", &[])),
    ("azure-load-balancer", ResourceMapping::new("azurerm_lb", &[])),
    ("azure-app-gateway", ResourceMapping::new("azurerm_application_gateway", &[])),
    ("azure-vnet", ResourceMapping::new("azurerm_virtual_network", &[])),
    ("azure-subnet", ResourceMapping::new("azurerm_subnet", &[])),
    ("azure-resource-group", ResourceMapping::new("azurerm_resource_group", &[("location", Text("westeurope"))])),
    ("azure-nsg", ResourceMapping::new("azurerm_network_security_group", &[])),
    ("azure-firewall", ResourceMapping::new("azurerm_firewall", &[])),
    ("azure-key-vault", ResourceMapping::new("azurerm_key_vault", &[("sku_name", Text("standard"))])),
    ("azure-backup", ResourceMapping::new("azurerm_recovery_services_vault", &[("sku", Text("Standard"))])),
    ("azure-monitor", ResourceMapping::new("azurerm_log_analytics_workspace", &[])),
    ("azure-cdn", ResourceMapping::new("azurerm_cdn_profile", &[])),
    ("azure-front-door", ResourceMapping::new("azurerm_cdn_frontdoor_profile", &[])),
    ("azure-service-bus", ResourceMapping::new("azurerm_servicebus_namespace", &[("sku", Text("Standard"))])),
    ("azure-static-web-app", ResourceMapping::new("azurerm_static_web_app", &[])),
    // GCP
    ("gcp-compute-engine", ResourceMapping::new("google_compute_instance", &[("machine_type", Text("e2-medium"))])),
    ("gcp-cloud-run", ResourceMapping::new("google_cloud_run_v2_service", &[])),
    ("gcp-cloud-functions", ResourceMapping::new("google_cloudfunctions2_function", &[])),
    ("gcp-gke", ResourceMapping::new("google_container_cluster", &[("initial_node_count", Number(1))])),
    ("gcp-cloud-sql", ResourceMapping::new("google_sql_database_instance", &[("database_version", Text("POSTGRES_15"))])),
    ("gcp-firestore", ResourceMapping::new("google_firestore_database", &[("type", Text("FIRESTORE_NATIVE"))])),
    ("gcp-memorystore", ResourceMapping::new("google_redis_instance", &[("memory_size_gb", Number(1))])),
    ("gcp-cloud-storage", ResourceMapping::new("google_storage_bucket", &[("location", Text("EU"))])),
    ("gcp-load-balancer", ResourceMapping::new("google_compute_url_map", &[])),
    ("gcp-vpc", ResourceMapping::new("google_compute_network", &[("auto_create_subnetworks", Bool(false))])),
    ("gcp-firewall", ResourceMapping::new("google_compute_firewall", &[])),
    ("gcp-cloud-armor", ResourceMapping::new("google_compute_security_policy", &[])),
    ("gcp-cloud-monitoring", ResourceMapping::new("google_monitoring_alert_policy", &[])),
    ("gcp-pubsub", ResourceMapping::new("google_pubsub_topic", &[])),
];

/// Provider block derived from a resource type prefix
struct ProviderSpec {
    prefix: &'static str,
    name: &'static str,
    source: &'static str,
    body: &'static [&'static str],
}

const PROVIDERS: &[ProviderSpec] = &[
    ProviderSpec {
        prefix: "aws_",
        name: "aws",
        source: "hashicorp/aws",
        body: &["region = \"us-east-1\""],
    },
    ProviderSpec {
        prefix: "azurerm_",
        name: "azurerm",
        source: "hashicorp/azurerm",
        body: &["features {}"],
    },
    ProviderSpec {
        prefix: "google_",
        name: "google",
        source: "hashicorp/google",
        body: &["region = \"europe-west1\""],
    },
];

#[derive(Serialize)]
struct ProviderContext {
    name: &'static str,
    source: &'static str,
    body: &'static [&'static str],
}

#[derive(Serialize)]
struct ResourceContext<'a> {
    resource_type: &'a str,
    name: &'a str,
    attributes: Vec<String>,
    depends_on: Vec<String>,
}

#[derive(Serialize)]
struct MainContext<'a> {
    providers: Vec<ProviderContext>,
    resources: Vec<ResourceContext<'a>>,
}

pub struct TerraformTarget;

impl Target for TerraformTarget {
    fn format(&self) -> TargetFormat {
        TargetFormat::Terraform
    }

    fn mapping(&self, component_type: &str) -> Option<&'static ResourceMapping> {
        lookup(MAPPINGS, component_type)
    }

    fn render(&self, plan: &Plan<'_>) -> Result<Vec<GeneratedDocument>, CodegenError> {
        let templates = TemplateManager::new()?;

        let mut resources = Vec::with_capacity(plan.resources.len());
        for resource in &plan.resources {
            resources.push(ResourceContext {
                resource_type: resource.mapping.resource_type,
                name: &resource.name,
                attributes: attributes(resource)?,
                depends_on: resource
                    .depends_on
                    .iter()
                    .map(|dep| address(plan, dep))
                    .collect(),
            });
        }

        let used: BTreeSet<&str> = resources.iter().map(|r| r.resource_type).collect();
        let providers = PROVIDERS
            .iter()
            .filter(|provider| used.iter().any(|ty| ty.starts_with(provider.prefix)))
            .map(|provider| ProviderContext {
                name: provider.name,
                source: provider.source,
                body: provider.body,
            })
            .collect();

        let context = MainContext {
            providers,
            resources,
        };
        let main = templates.render(TERRAFORM_MAIN, &context)?;
        let outputs = templates.render(TERRAFORM_OUTPUTS, &context)?;

        Ok(vec![
            GeneratedDocument::text("main.tf", main),
            GeneratedDocument::text("outputs.tf", outputs),
        ])
    }
}

/// `type.name` reference for a planned resource
fn address(plan: &Plan<'_>, name: &str) -> String {
    match plan.resource(name) {
        Some(resource) => format!("{}.{}", resource.mapping.resource_type, name),
        None => name.to_string(),
    }
}

/// `key = value` lines, keys converted to snake_case. When a configuration
/// key and a mapping default land on the same attribute the configuration
/// wins.
fn attributes(resource: &PlannedResource<'_>) -> Result<Vec<String>, CodegenError> {
    let mut lines: BTreeMap<String, String> = BTreeMap::new();
    for (key, value) in &resource.properties {
        let attribute = to_snake_case(key);
        if !ATTRIBUTE_NAME.is_match(&attribute) {
            return Err(CodegenError::Serialization {
                node_id: resource.node.id.clone(),
                message: format!("configuration key `{}` is not a valid HCL attribute name", key),
            });
        }
        let from_config = resource.node.configuration.get(key).is_some();
        if lines.contains_key(&attribute) && !from_config {
            continue;
        }
        let line = format!("{} = {}", attribute, hcl_value(value, 2));
        lines.insert(attribute, line);
    }
    Ok(lines.into_values().collect())
}

pub fn to_snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 && !out.ends_with('_') {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// HCL expression for a JSON value, `indent` is the column of the owning line
pub fn hcl_value(value: &Value, indent: usize) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => hcl_string(s),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(|item| hcl_value(item, indent)).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => {
            if map.is_empty() {
                return "{}".to_string();
            }
            let pad = " ".repeat(indent + 2);
            let mut out = String::from("{\n");
            for (key, item) in map {
                let key = if ATTRIBUTE_NAME.is_match(key) {
                    key.clone()
                } else {
                    hcl_string(key)
                };
                out.push_str(&format!("{}{} = {}\n", pad, key, hcl_value(item, indent + 2)));
            }
            out.push_str(&" ".repeat(indent));
            out.push('}');
            out
        }
    }
}

/// JSON escaping plus `${` / `%{` template escapes
fn hcl_string(s: &str) -> String {
    Value::from(s)
        .to_string()
        .replace("${", "$${")
        .replace("%{", "%%{")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::generate_terraform;
    use crate::graph::{Edge, InfraGraph, Node};
    use serde_json::json;

    fn main_tf(graph: &InfraGraph) -> String {
        generate_terraform(graph)
            .unwrap()
            .document("main.tf")
            .unwrap()
            .content()
            .to_string()
    }

    #[test]
    fn test_resource_blocks_and_dependencies() {
        let graph = InfraGraph::new(
            vec![
                Node::new("net", "aws-vpc").with_label("Main VPC"),
                Node::new("vm", "aws-ec2")
                    .with_label("Web")
                    .with_config("instanceType", "t3.large"),
            ],
            vec![Edge::new("e", "net", "vm")],
        );
        let main = main_tf(&graph);
        assert!(main.contains("resource \"aws_vpc\" \"main_vpc\" {"));
        assert!(main.contains("resource \"aws_instance\" \"web\" {"));
        assert!(main.contains("instance_type = \"t3.large\""));
        assert!(!main.contains("t3.micro"));
        assert!(main.contains("depends_on = [aws_vpc.main_vpc]"));
        assert!(main.contains("source = \"hashicorp/aws\""));
        assert!(!main.contains("hashicorp/google"));
    }

    #[test]
    fn test_outputs_per_resource() {
        let graph = InfraGraph::new(vec![Node::new("b", "gcp-cloud-storage")], vec![]);
        let artifact = generate_terraform(&graph).unwrap();
        let outputs = artifact.document("outputs.tf").unwrap().content();
        assert!(outputs.contains("output \"b_id\""));
        assert!(outputs.contains("value = google_storage_bucket.b.id"));
    }

    #[test]
    fn test_invalid_key_is_a_serialization_failure() {
        let graph = InfraGraph::new(
            vec![
                Node::new("ok", "aws-s3"),
                Node::new("bad", "aws-s3").with_config("cost center", "x"),
            ],
            vec![],
        );
        let failure = generate_terraform(&graph).unwrap_err();
        assert!(matches!(failure.error, CodegenError::Serialization { ref node_id, .. } if node_id == "bad"));
        assert_eq!(failure.partial.resource_count, 1);
        assert!(failure.partial.documents.is_empty());
    }

    #[test]
    fn test_hcl_values() {
        assert_eq!(hcl_value(&json!("a\"b"), 2), r#""a\"b""#);
        assert_eq!(hcl_value(&json!("${x}"), 2), r#""$${x}""#);
        assert_eq!(hcl_value(&json!([1, true]), 2), "[1, true]");
        assert_eq!(
            hcl_value(&json!({"Name": "web", "env": "prod"}), 2),
            "{\n    \"Name\" = \"web\"\n    env = \"prod\"\n  }"
        );
        assert_eq!(to_snake_case("multiAz"), "multi_az");
        assert_eq!(to_snake_case("instance_type"), "instance_type");
    }
}
