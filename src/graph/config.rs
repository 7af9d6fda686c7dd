//! Per-node configuration.
//!
//! The editor stores configuration as an open key/value bag whose shape
//! depends on the component type. [`Configuration`] keeps that bag verbatim
//! (ordered, so generated output is stable) and [`NodeConfig`] layers a typed
//! view on top for the component families rules actually inspect.
//!
//! Missing or wrongly typed values read as `None`. A node with garbage in its
//! configuration simply looks "not configured" to every rule.

use super::{Category, Node};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Ordered open configuration bag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration(BTreeMap<String, Value>);

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    pub fn integer(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(Value::as_i64)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str).filter(|s| !s.trim().is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// First key in `keys` holding a boolean
    fn first_flag(&self, keys: &[&str]) -> Option<bool> {
        keys.iter().find_map(|key| self.flag(key))
    }

    fn first_text(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.text(key))
    }
}

impl FromIterator<(String, Value)> for Configuration {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Boolean settings rules care about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    Encryption,
    PublicAccess,
    Tls,
    HighAvailability,
    AuditLogging,
    Versioning,
}

impl Flag {
    /// Configuration keys recognised for this flag, in lookup order
    pub fn keys(&self) -> &'static [&'static str] {
        match self {
            Flag::Encryption => &["encryption", "encrypted"],
            Flag::PublicAccess => &["publicAccess", "public"],
            Flag::Tls => &["tls", "https"],
            Flag::HighAvailability => &["highAvailability", "replication", "multiAz"],
            Flag::AuditLogging => &["auditLogging"],
            Flag::Versioning => &["versioning"],
        }
    }

    pub fn name(&self) -> &'static str {
        self.keys()[0]
    }
}

const REGION_KEYS: &[&str] = &["region", "location"];
const SIZE_KEYS: &[&str] = &["instanceSize", "instanceType", "vmSize", "machineType", "sku"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputeConfig<'a> {
    pub replicas: Option<i64>,
    pub instance_size: Option<&'a str>,
    pub region: Option<&'a str>,
    pub public_access: Option<bool>,
    pub encryption: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorageConfig<'a> {
    pub encryption: Option<bool>,
    pub public_access: Option<bool>,
    pub versioning: Option<bool>,
    pub region: Option<&'a str>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkConfig<'a> {
    pub tls: Option<bool>,
    pub public_access: Option<bool>,
    pub region: Option<&'a str>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatabaseConfig<'a> {
    pub encryption: Option<bool>,
    pub public_access: Option<bool>,
    pub high_availability: Option<bool>,
    pub audit_logging: Option<bool>,
    pub replicas: Option<i64>,
    pub instance_size: Option<&'a str>,
    pub region: Option<&'a str>,
}

/// Typed view over a node's configuration, keyed by component family
#[derive(Debug, Clone, PartialEq)]
pub enum NodeConfig<'a> {
    Compute(ComputeConfig<'a>),
    Storage(StorageConfig<'a>),
    Network(NetworkConfig<'a>),
    Database(DatabaseConfig<'a>),
    Generic(&'a Configuration),
}

impl<'a> NodeConfig<'a> {
    /// Pick the family from the catalog category, falling back to the
    /// category stored on the node.
    pub fn for_node(node: &'a Node) -> Self {
        let category = crate::catalog::catalog_entry(&node.component_type)
            .map(|entry| entry.category)
            .unwrap_or(node.category);
        Self::parse(category, &node.configuration)
    }

    pub fn parse(category: Category, bag: &'a Configuration) -> Self {
        match category {
            Category::Compute => NodeConfig::Compute(ComputeConfig {
                replicas: bag.integer("replicas"),
                instance_size: bag.first_text(SIZE_KEYS),
                region: bag.first_text(REGION_KEYS),
                public_access: bag.first_flag(Flag::PublicAccess.keys()),
                encryption: bag.first_flag(Flag::Encryption.keys()),
            }),
            Category::Storage => NodeConfig::Storage(StorageConfig {
                encryption: bag.first_flag(Flag::Encryption.keys()),
                public_access: bag.first_flag(Flag::PublicAccess.keys()),
                versioning: bag.first_flag(Flag::Versioning.keys()),
                region: bag.first_text(REGION_KEYS),
            }),
            Category::Network => NodeConfig::Network(NetworkConfig {
                tls: bag.first_flag(Flag::Tls.keys()),
                public_access: bag.first_flag(Flag::PublicAccess.keys()),
                region: bag.first_text(REGION_KEYS),
            }),
            Category::Database => NodeConfig::Database(DatabaseConfig {
                encryption: bag.first_flag(Flag::Encryption.keys()),
                public_access: bag.first_flag(Flag::PublicAccess.keys()),
                high_availability: bag.first_flag(Flag::HighAvailability.keys()),
                audit_logging: bag.first_flag(Flag::AuditLogging.keys()),
                replicas: bag.integer("replicas"),
                instance_size: bag.first_text(SIZE_KEYS),
                region: bag.first_text(REGION_KEYS),
            }),
            _ => NodeConfig::Generic(bag),
        }
    }

    pub fn flag(&self, flag: Flag) -> Option<bool> {
        match (self, flag) {
            (NodeConfig::Compute(c), Flag::Encryption) => c.encryption,
            (NodeConfig::Compute(c), Flag::PublicAccess) => c.public_access,
            (NodeConfig::Storage(s), Flag::Encryption) => s.encryption,
            (NodeConfig::Storage(s), Flag::PublicAccess) => s.public_access,
            (NodeConfig::Storage(s), Flag::Versioning) => s.versioning,
            (NodeConfig::Network(n), Flag::Tls) => n.tls,
            (NodeConfig::Network(n), Flag::PublicAccess) => n.public_access,
            (NodeConfig::Database(d), Flag::Encryption) => d.encryption,
            (NodeConfig::Database(d), Flag::PublicAccess) => d.public_access,
            (NodeConfig::Database(d), Flag::HighAvailability) => d.high_availability,
            (NodeConfig::Database(d), Flag::AuditLogging) => d.audit_logging,
            (NodeConfig::Generic(bag), flag) => bag.first_flag(flag.keys()),
            _ => None,
        }
    }

    /// Replica count; unset means a single instance
    pub fn replicas(&self) -> i64 {
        let explicit = match self {
            NodeConfig::Compute(c) => c.replicas,
            NodeConfig::Database(d) => d.replicas,
            NodeConfig::Generic(bag) => bag.integer("replicas"),
            _ => None,
        };
        explicit.filter(|n| *n > 0).unwrap_or(1)
    }

    pub fn region(&self) -> Option<&'a str> {
        match self {
            NodeConfig::Compute(c) => c.region,
            NodeConfig::Storage(s) => s.region,
            NodeConfig::Network(n) => n.region,
            NodeConfig::Database(d) => d.region,
            NodeConfig::Generic(bag) => bag.first_text(REGION_KEYS),
        }
    }

    pub fn instance_size(&self) -> Option<&'a str> {
        match self {
            NodeConfig::Compute(c) => c.instance_size,
            NodeConfig::Database(d) => d.instance_size,
            NodeConfig::Generic(bag) => bag.first_text(SIZE_KEYS),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bag(value: Value) -> Configuration {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_wrongly_typed_values_read_as_absent() {
        let config = bag(json!({"encryption": "yes", "replicas": "three", "region": 42}));
        let typed = NodeConfig::parse(Category::Database, &config);
        assert_eq!(typed.flag(Flag::Encryption), None);
        assert_eq!(typed.replicas(), 1);
        assert_eq!(typed.region(), None);
    }

    #[test]
    fn test_alias_keys() {
        let config = bag(json!({"https": true, "location": "westeurope"}));
        let typed = NodeConfig::parse(Category::Network, &config);
        assert_eq!(typed.flag(Flag::Tls), Some(true));
        assert_eq!(typed.region(), Some("westeurope"));
    }

    #[test]
    fn test_generic_fallback_reads_raw_keys() {
        let config = bag(json!({"versioning": false, "vmSize": "Standard_D64s_v5"}));
        let typed = NodeConfig::parse(Category::Other, &config);
        assert_eq!(typed.flag(Flag::Versioning), Some(false));
        assert_eq!(typed.instance_size(), Some("Standard_D64s_v5"));
    }

    #[test]
    fn test_flags_outside_family_are_absent() {
        let config = bag(json!({"tls": true}));
        let typed = NodeConfig::parse(Category::Storage, &config);
        assert_eq!(typed.flag(Flag::Tls), None);
    }

    #[test]
    fn test_non_positive_replicas_default_to_one() {
        let config = bag(json!({"replicas": 0}));
        assert_eq!(NodeConfig::parse(Category::Compute, &config).replicas(), 1);
        let config = bag(json!({"replicas": 4}));
        assert_eq!(NodeConfig::parse(Category::Compute, &config).replicas(), 4);
    }
}
