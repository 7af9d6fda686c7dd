//! Shared graph fixtures for integration tests.
#![allow(dead_code)]

use infragraph::graph::{Edge, InfraGraph, Node};

/// One database and one load balancer, nothing else
pub fn database_and_load_balancer() -> InfraGraph {
    InfraGraph::new(
        vec![
            Node::new("db", "aws-rds").with_label("orders-db"),
            Node::new("lb", "aws-alb").with_label("public-lb"),
        ],
        vec![],
    )
}

/// A small but complete AWS web stack
pub fn three_tier() -> InfraGraph {
    InfraGraph::new(
        vec![
            Node::new("vpc", "aws-vpc").with_label("main-vpc"),
            Node::new("sg", "aws-security-group").with_label("web-sg"),
            Node::new("lb", "aws-alb")
                .with_label("public-lb")
                .with_config("tls", true),
            Node::new("app-1", "aws-ec2")
                .with_label("app")
                .with_config("instanceType", "t3.medium")
                .with_config("replicas", 2),
            Node::new("app-2", "aws-ec2")
                .with_label("app")
                .with_config("instanceType", "t3.medium")
                .with_config("replicas", 2),
            Node::new("db", "aws-rds")
                .with_label("orders-db")
                .with_config("encryption", true)
                .with_config("highAvailability", true)
                .with_config("publicAccess", false),
            Node::new("assets", "aws-s3")
                .with_label("assets")
                .with_config("encryption", true),
            Node::new("backup", "aws-backup").with_label("nightly"),
            Node::new("metrics", "aws-cloudwatch").with_label("metrics"),
        ],
        vec![
            Edge::new("e1", "vpc", "sg"),
            Edge::new("e2", "sg", "lb"),
            Edge::new("e3", "lb", "app-1"),
            Edge::new("e4", "lb", "app-2"),
            Edge::new("e5", "app-1", "db"),
            Edge::new("e6", "app-2", "db"),
            Edge::new("e7", "app-1", "assets"),
        ],
    )
}

/// Two nodes of types no target knows or one target does not
pub fn with_unknown_node() -> InfraGraph {
    InfraGraph::new(
        vec![
            Node::new("mystery", "quantum-annealer"),
            Node::new("vm", "aws-ec2").with_label("worker"),
        ],
        vec![Edge::new("e1", "mystery", "vm")],
    )
}

/// Node ids drawn from every provider, used where every target needs input
pub fn mixed_providers() -> InfraGraph {
    InfraGraph::new(
        vec![
            Node::new("rg", "azure-resource-group").with_label("platform"),
            Node::new("vnet", "azure-vnet").with_label("core-net"),
            Node::new("vm", "azure-vm").with_label("build-agent"),
            Node::new("bucket", "aws-s3").with_label("artifacts"),
            Node::new("queue", "aws-sqs").with_label("jobs"),
            Node::new("sql", "gcp-cloud-sql").with_label("reports"),
        ],
        vec![
            Edge::new("e1", "rg", "vnet"),
            Edge::new("e2", "vnet", "vm"),
            Edge::new("e3", "bucket", "queue"),
        ],
    )
}

pub fn ids<T, F>(items: &[T], id: F) -> Vec<String>
where
    F: Fn(&T) -> &str,
{
    items.iter().map(|item| id(item).to_string()).collect()
}
