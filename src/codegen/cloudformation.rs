//! AWS CloudFormation (YAML) generator.

use super::{
    lookup, CodegenError, GeneratedDocument, IdentifierStyle, MappingTable, Plan, PropertyValue,
    ResourceMapping, Target, TargetFormat,
};
use serde_json::{json, Map, Value};

use PropertyValue::{Bool, Number, Text};

static MAPPINGS: MappingTable = &[
    ("aws-ec2", ResourceMapping::new("AWS::EC2::Instance", &[("ImageId", Text("ami-0c55b159cbfafe1f0")), ("InstanceType", Text("t3.micro"))])),
    ("aws-lambda", ResourceMapping::new("AWS::Lambda::Function", &[("Runtime", Text("nodejs18.x")), ("Handler", Text("index.handler"))])),
    ("aws-ecs", ResourceMapping::new("AWS::ECS::Service", &[("DesiredCount", Number(1))])),
    ("aws-eks", ResourceMapping::new("AWS::EKS::Cluster", &[])),
    ("aws-rds", ResourceMapping::new("AWS::RDS::DBInstance", &[("Engine", Text("postgres")), ("DBInstanceClass", Text("db.t3.micro")), ("AllocatedStorage", Text("20"))])),
    ("aws-aurora", ResourceMapping::new("AWS::RDS::DBCluster", &[("Engine", Text("aurora-postgresql"))])),
    ("aws-dynamodb", ResourceMapping::new("AWS::DynamoDB::Table", &[("BillingMode", Text("PAY_PER_REQUEST"))])),
    ("aws-elasticache", ResourceMapping::new("AWS::ElastiCache::CacheCluster", &[("Engine", Text("redis")), ("CacheNodeType", Text("cache.t3.micro")), ("NumCacheNodes", Number(1))])),
    ("aws-s3", ResourceMapping::new("AWS::S3::Bucket", &[])),
    ("aws-efs", ResourceMapping::new("AWS::EFS::FileSystem", &[])),
    ("aws-elb", ResourceMapping::new("AWS::ElasticLoadBalancing::LoadBalancer", &[])),
    ("aws-alb", ResourceMapping::new("AWS::ElasticLoadBalancingV2::LoadBalancer", &[("Type", Text("application"))])),
    ("aws-vpc", ResourceMapping::new("AWS::EC2::VPC", &[("CidrBlock", Text("10.0.0.0/16"))])),
    ("aws-subnet", ResourceMapping::new("AWS::EC2::Subnet", &[("CidrBlock", Text("10.0.1.0/24"))])),
    ("aws-security-group", ResourceMapping::new("AWS::EC2::SecurityGroup", &[("GroupDescription", Text("Managed by infragraph"))])),
    ("aws-waf", ResourceMapping::new("AWS::WAFv2::WebACL", &[("Scope", Text("REGIONAL"))])),
    ("aws-kms", ResourceMapping::new("AWS::KMS::Key", &[("EnableKeyRotation", Bool(true))])),
    ("aws-backup", ResourceMapping::new("AWS::Backup::BackupVault", &[])),
    ("aws-cloudwatch", ResourceMapping::new("AWS::Logs::LogGroup", &[("RetentionInDays", Number(30))])),
    ("aws-cloudfront", ResourceMapping::new("AWS::CloudFront::Distribution", &[])),
    ("aws-api-gateway", ResourceMapping::new("AWS::ApiGateway::RestApi", &[])),
    ("aws-sqs", ResourceMapping::new("AWS::SQS::Queue", &[])),
    ("aws-route53", ResourceMapping::new("AWS::Route53::HostedZone", &[])),
];

pub struct CloudFormationTarget;

impl Target for CloudFormationTarget {
    fn format(&self) -> TargetFormat {
        TargetFormat::Cloudformation
    }

    /// Logical ids and mapping keys are alphanumeric
    fn identifier_style(&self) -> IdentifierStyle {
        IdentifierStyle::Alphanumeric
    }

    fn mapping(&self, component_type: &str) -> Option<&'static ResourceMapping> {
        lookup(MAPPINGS, component_type)
    }

    fn render(&self, plan: &Plan<'_>) -> Result<Vec<GeneratedDocument>, CodegenError> {
        let mut node_ids = Map::new();
        let mut resources = Map::new();
        let mut outputs = Map::new();

        for resource in &plan.resources {
            node_ids.insert(
                resource.name.clone(),
                json!({ "NodeId": resource.node.id }),
            );

            let properties: Map<String, Value> =
                resource.properties_keyed(pascal_case).into_iter().collect();
            resources.insert(
                resource.name.clone(),
                json!({
                    "Type": resource.mapping.resource_type,
                    "DependsOn": resource.depends_on,
                    "Properties": properties,
                }),
            );

            outputs.insert(
                format!("{}Ref", resource.name),
                json!({
                    "Description": format!("Reference to {}", resource.node.display_name()),
                    "Value": { "Ref": resource.name },
                }),
            );
        }

        let template = json!({
            "AWSTemplateFormatVersion": "2010-09-09",
            "Description": "Infrastructure template generated by infragraph",
            "Parameters": {
                "Environment": {
                    "Type": "String",
                    "Default": "dev",
                    "AllowedValues": ["dev", "staging", "prod"]
                }
            },
            "Mappings": { "ResourceNodes": node_ids },
            "Resources": resources,
            "Outputs": outputs,
        });

        let content = serde_yaml::to_string(&template)?;
        Ok(vec![GeneratedDocument::structured(
            "template.yaml",
            template,
            content,
        )])
    }
}

/// `instanceType` -> `InstanceType`
pub fn pascal_case(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::generate_cloudformation;
    use crate::graph::{Edge, InfraGraph, Node};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_template_shape() {
        let graph = InfraGraph::new(
            vec![
                Node::new("q", "aws-sqs").with_label("Jobs"),
                Node::new("fn", "aws-lambda")
                    .with_label("Worker")
                    .with_config("runtime", "python3.12"),
            ],
            vec![Edge::new("e", "q", "fn")],
        );
        let artifact = generate_cloudformation(&graph).unwrap();
        let doc = artifact.document("template.yaml").unwrap();
        let value = doc.value().unwrap();

        let worker = &value["Resources"]["worker"];
        assert_eq!(worker["Type"], json!("AWS::Lambda::Function"));
        assert_eq!(worker["DependsOn"], json!(["jobs"]));
        assert_eq!(worker["Properties"]["Runtime"], json!("python3.12"));
        assert_eq!(value["Mappings"]["ResourceNodes"]["worker"]["NodeId"], json!("fn"));
        assert_eq!(value["Outputs"]["workerRef"]["Value"]["Ref"], json!("worker"));

        let reparsed: serde_yaml::Value = serde_yaml::from_str(doc.content()).unwrap();
        assert!(reparsed.get("Resources").is_some());
    }

    #[test]
    fn test_logical_ids_are_alphanumeric() {
        let graph = InfraGraph::new(
            vec![
                Node::new("n1", "aws-ec2").with_label("Web Server"),
                Node::new("n2", "aws-ec2").with_label("web-server"),
                Node::new("n3", "aws-s3").with_label("2024 logs"),
            ],
            vec![Edge::new("e", "n1", "n2")],
        );
        let artifact = generate_cloudformation(&graph).unwrap();
        assert_eq!(artifact.name_for("n1"), Some("webserver"));
        assert_eq!(artifact.name_for("n2"), Some("webserver2"));
        assert_eq!(artifact.name_for("n3"), Some("r2024logs"));

        let value = artifact.document("template.yaml").unwrap().value().unwrap();
        let logical_ids: Vec<&String> = value["Resources"].as_object().unwrap().keys().collect();
        assert_eq!(logical_ids.len(), 3);
        assert!(logical_ids
            .iter()
            .all(|id| id.chars().all(|c| c.is_ascii_alphanumeric())));
        assert_eq!(value["Resources"]["webserver2"]["DependsOn"], json!(["webserver"]));
        assert!(value["Mappings"]["ResourceNodes"].get("r2024logs").is_some());
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("instanceType"), "InstanceType");
        assert_eq!(pascal_case("Engine"), "Engine");
        assert_eq!(pascal_case(""), "");
    }
}
