//! Pulling a findings array out of free-form model output.

use crate::graph::InfraGraph;
use crate::rules::{Finding, RuleCategory, Severity};
use serde::Deserialize;
use serde_json::Value;

/// First balanced `[...]` substring of `text`. Brackets inside JSON string
/// literals are ignored.
pub fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Loosely typed finding as a model tends to produce it
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AdvisoryItem {
    id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    severity: Option<String>,
    #[serde(alias = "affected_resources", alias = "resources", alias = "nodes")]
    affected_resources: Vec<String>,
    #[serde(alias = "recommendation", alias = "fix")]
    remediation: Option<String>,
    references: Vec<String>,
}

/// Parse the extracted array. A syntax error fails the whole batch; items
/// that are not objects or lack a title are dropped.
pub fn parse_findings(array: &str, graph: &InfraGraph) -> Result<Vec<Finding>, serde_json::Error> {
    let items: Vec<Value> = serde_json::from_str(array)?;

    let findings = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<AdvisoryItem>(item).ok())
        .filter(|item| item.title.as_deref().is_some_and(|t| !t.trim().is_empty()))
        .enumerate()
        .map(|(index, item)| into_finding(index, item, graph))
        .collect();
    Ok(findings)
}

fn into_finding(index: usize, item: AdvisoryItem, graph: &InfraGraph) -> Finding {
    let id = match item.id.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => format!("ai-{}", raw.trim_start_matches("ai-")),
        _ => format!("ai-{}", index + 1),
    };

    let mut affected: Vec<String> = Vec::new();
    for node_id in item.affected_resources {
        if graph.contains_node(&node_id) && !affected.contains(&node_id) {
            affected.push(node_id);
        }
    }

    Finding {
        id,
        rule_id: "advisory".to_string(),
        severity: Severity::normalize(item.severity.as_deref().unwrap_or("low")),
        category: RuleCategory::Advisory,
        title: item.title.unwrap_or_default(),
        description: item.description.unwrap_or_default(),
        affected_resources: affected,
        remediation: item.remediation.unwrap_or_default(),
        references: item.references,
        auto_fixable: None,
    }
}
