//! Azure Resource Manager template generator.

use super::{
    lookup, CodegenError, GeneratedDocument, MappingTable, Plan, PropertyValue, ResourceMapping,
    Target, TargetFormat,
};
use serde_json::{json, Map, Value};

use PropertyValue::{Bool, Text};

const SCHEMA: &str =
    "https://schema.management.azure.com/schemas/2019-04-01/deploymentTemplate.json#";

/// Configuration keys that sit beside `properties` in a resource entry
const TOP_LEVEL_KEYS: &[&str] = &["kind", "location", "sku", "tags", "zones"];

static MAPPINGS: MappingTable = &[
    ("azure-vm", ResourceMapping::new("Microsoft.Compute/virtualMachines", &[]).versioned("2023-03-01")),
    ("azure-aks", ResourceMapping::new("Microsoft.ContainerService/managedClusters", &[]).versioned("2023-08-01")),
    ("azure-app-service", ResourceMapping::new("Microsoft.Web/sites", &[("httpsOnly", Bool(true))]).versioned("2022-09-01")),
    ("azure-functions", ResourceMapping::new("Microsoft.Web/sites", &[("kind", Text("functionapp"))]).versioned("2022-09-01")),
    ("azure-static-web-app", ResourceMapping::new("Microsoft.Web/staticSites", &[]).versioned("2022-09-01")),
    ("azure-sql", ResourceMapping::new("Microsoft.Sql/servers", &[]).versioned("2022-05-01-preview")),
    ("azure-cosmosdb", ResourceMapping::new("Microsoft.DocumentDB/databaseAccounts", &[("databaseAccountOfferType", Text("Standard"))]).versioned("2023-04-15")),
    ("azure-postgresql", ResourceMapping::new("Microsoft.DBforPostgreSQL/flexibleServers", &[("version", Text("15"))]).versioned("2022-12-01")),
    ("azure-redis", ResourceMapping::new("Microsoft.Cache/redis", &[]).versioned("2023-04-01")),
    ("azure-storage", ResourceMapping::new("Microsoft.Storage/storageAccounts", &[("kind", Text("StorageV2"))]).versioned("2023-01-01")),
    ("azure-blob-storage", ResourceMapping::new("Microsoft.Storage/storageAccounts/blobServices/containers", &[]).versioned("2023-01-01")),
    ("azure-load-balancer", ResourceMapping::new("Microsoft.Network/loadBalancers", &[]).versioned("2023-04-01")),
    ("azure-app-gateway", ResourceMapping::new("Microsoft.Network/applicationGateways", &[]).versioned("2023-04-01")),
    ("azure-vnet", ResourceMapping::new("Microsoft.Network/virtualNetworks", &[]).versioned("2023-04-01")),
    ("azure-subnet", ResourceMapping::new("Microsoft.Network/virtualNetworks/subnets", &[]).versioned("2023-04-01")),
    ("azure-nsg", ResourceMapping::new("Microsoft.Network/networkSecurityGroups", &[]).versioned("2023-04-01")),
    ("azure-firewall", ResourceMapping::new("Microsoft.Network/azureFirewalls", &[]).versioned("2023-04-01")),
    ("azure-waf-policy", ResourceMapping::new("Microsoft.Network/ApplicationGatewayWebApplicationFirewallPolicies", &[]).versioned("2023-04-01")),
    ("azure-front-door", ResourceMapping::new("Microsoft.Cdn/profiles", &[]).versioned("2023-05-01")),
    ("azure-cdn", ResourceMapping::new("Microsoft.Cdn/profiles", &[]).versioned("2023-05-01")),
    ("azure-key-vault", ResourceMapping::new("Microsoft.KeyVault/vaults", &[]).versioned("2023-02-01")),
    ("azure-backup", ResourceMapping::new("Microsoft.RecoveryServices/vaults", &[]).versioned("2023-04-01")),
    ("azure-monitor", ResourceMapping::new("Microsoft.OperationalInsights/workspaces", &[]).versioned("2022-10-01")),
    ("azure-service-bus", ResourceMapping::new("Microsoft.ServiceBus/namespaces", &[]).versioned("2022-10-01-preview")),
];

pub struct ArmTarget;

impl Target for ArmTarget {
    fn format(&self) -> TargetFormat {
        TargetFormat::Arm
    }

    fn mapping(&self, component_type: &str) -> Option<&'static ResourceMapping> {
        lookup(MAPPINGS, component_type)
    }

    fn render(&self, plan: &Plan<'_>) -> Result<Vec<GeneratedDocument>, CodegenError> {
        let mut variables = Map::new();
        let mut resources = Vec::with_capacity(plan.resources.len());
        let mut outputs = Map::new();

        for resource in &plan.resources {
            let resource_type = resource.mapping.resource_type;
            variables.insert(variable_name(&resource.name), json!(resource.name));

            let mut entry = Map::new();
            entry.insert("type".into(), json!(resource_type));
            entry.insert(
                "apiVersion".into(),
                json!(resource.mapping.api_version.unwrap_or("2023-01-01")),
            );
            entry.insert("name".into(), json!(name_expression(&resource.name)));
            entry.insert("location".into(), json!("[parameters('location')]"));

            let mut properties = Map::new();
            for (key, value) in resource.properties_keyed(|key| key.to_string()) {
                if TOP_LEVEL_KEYS.contains(&key.as_str()) {
                    entry.insert(key, value);
                } else {
                    properties.insert(key, value);
                }
            }
            entry.insert("properties".into(), Value::Object(properties));

            let depends_on: Vec<Value> = resource
                .depends_on
                .iter()
                .filter_map(|dep| plan.resource(dep))
                .map(|dep| json!(resource_id(dep.mapping.resource_type, &dep.name)))
                .collect();
            entry.insert("dependsOn".into(), Value::Array(depends_on));
            resources.push(Value::Object(entry));

            outputs.insert(
                format!("{}Id", resource.name),
                json!({
                    "type": "string",
                    "value": resource_id(resource_type, &resource.name),
                }),
            );
        }

        let template = json!({
            "$schema": SCHEMA,
            "contentVersion": "1.0.0.0",
            "parameters": {
                "location": {
                    "type": "string",
                    "defaultValue": "[resourceGroup().location]",
                    "metadata": { "description": "Location for all resources" }
                }
            },
            "variables": variables,
            "resources": resources,
            "outputs": outputs,
        });

        let content = serde_json::to_string_pretty(&template)?;
        Ok(vec![GeneratedDocument::structured(
            "azuredeploy.json",
            template,
            content,
        )])
    }
}

fn variable_name(name: &str) -> String {
    format!("{}Name", name)
}

fn name_expression(name: &str) -> String {
    format!("[variables('{}')]", variable_name(name))
}

/// `resourceId` expression referencing a generated resource
pub fn resource_id(resource_type: &str, name: &str) -> String {
    format!(
        "[resourceId('{}', variables('{}'))]",
        resource_type,
        variable_name(name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::generate_arm;
    use crate::graph::{Edge, InfraGraph, Node};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_document_sections() {
        let graph = InfraGraph::new(
            vec![
                Node::new("net", "azure-vnet").with_label("vnet"),
                Node::new("vm", "azure-vm")
                    .with_label("app")
                    .with_config("vmSize", "Standard_B2s")
                    .with_config("zones", serde_json::json!(["1"])),
                Node::new("aws", "aws-ec2"),
            ],
            vec![Edge::new("e", "net", "vm")],
        );
        let artifact = generate_arm(&graph).unwrap();
        assert_eq!(artifact.skipped_count(), 1);

        let doc = artifact.document("azuredeploy.json").unwrap();
        let value = doc.value().unwrap();
        assert_eq!(value["variables"]["appName"], json!("app"));

        let resources = value["resources"].as_array().unwrap();
        assert_eq!(resources.len(), 2);
        let vm = &resources[1];
        assert_eq!(vm["type"], json!("Microsoft.Compute/virtualMachines"));
        assert_eq!(vm["name"], json!("[variables('appName')]"));
        assert_eq!(vm["zones"], json!(["1"]));
        assert_eq!(vm["properties"]["vmSize"], json!("Standard_B2s"));
        assert_eq!(
            vm["dependsOn"],
            json!(["[resourceId('Microsoft.Network/virtualNetworks', variables('vnetName'))]"])
        );
        assert_eq!(resources[0]["dependsOn"], json!([]));
        assert!(value["outputs"]["appId"].is_object());
        assert!(doc.content().starts_with('{'));
    }

    #[test]
    fn test_names_fit_arm_bound() {
        let graph = InfraGraph::new(
            vec![Node::new("s", "azure-storage").with_label("Primary Storage Account For Logs")],
            vec![],
        );
        let artifact = generate_arm(&graph).unwrap();
        let name = artifact.name_for("s").unwrap();
        assert!(name.len() <= 24);
        assert_eq!(name, "primary_storage_account_");
    }
}
