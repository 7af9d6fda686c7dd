//! Handlebars templates for the program-shaped targets.

use super::{CodegenError, TargetFormat};
use handlebars::{Context, Handlebars, Helper, HelperResult, Output, RenderContext};
use serde::Serialize;

/// A registered output template
#[derive(Debug, Clone)]
pub struct Template {
    pub name: &'static str,
    pub target: TargetFormat,
    pub description: &'static str,
    pub content: &'static str,
}

pub const TERRAFORM_MAIN: &str = "terraform_main";
pub const TERRAFORM_OUTPUTS: &str = "terraform_outputs";
pub const PULUMI_INDEX: &str = "pulumi_index";
pub const PULUMI_PROJECT: &str = "pulumi_project";

const BUILTIN_TEMPLATES: &[Template] = &[
    Template {
        name: TERRAFORM_MAIN,
        target: TargetFormat::Terraform,
        description: "Provider requirements and resource blocks",
        content: r#"# Generated by infragraph. Do not edit by hand.

terraform {
  required_providers {
{{#each providers}}
    {{name}} = {
      source = "{{source}}"
    }
{{/each}}
  }
}
{{#each providers}}

provider "{{name}}" {
{{#each body}}
  {{this}}
{{/each}}
}
{{/each}}
{{#each resources}}

resource "{{resource_type}}" "{{name}}" {
{{#each attributes}}
  {{this}}
{{/each}}
{{#if depends_on}}

  depends_on = [{{join depends_on ", "}}]
{{/if}}
}
{{/each}}
"#,
    },
    Template {
        name: TERRAFORM_OUTPUTS,
        target: TargetFormat::Terraform,
        description: "One output per resource",
        content: r#"# Generated by infragraph. Do not edit by hand.
{{#each resources}}

output "{{name}}_id" {
  value = {{resource_type}}.{{name}}.id
}
{{/each}}
"#,
    },
    Template {
        name: PULUMI_INDEX,
        target: TargetFormat::Pulumi,
        description: "TypeScript program declaring each resource",
        content: r#"// Generated by infragraph. Do not edit by hand.
import * as pulumi from "@pulumi/pulumi";
{{#each packages}}
import * as {{alias}} from "{{module}}";
{{/each}}
{{#each resources}}

const {{name}} = new {{resource_type}}({{quote name}}, {{properties}}{{#if depends_on}}, { dependsOn: [{{join depends_on ", "}}] }{{/if}});
{{/each}}
{{#if resources}}

export const ids = {
{{#each resources}}
  {{name}}: {{name}}.id,
{{/each}}
};
{{/if}}
"#,
    },
    Template {
        name: PULUMI_PROJECT,
        target: TargetFormat::Pulumi,
        description: "Pulumi project file",
        content: r#"name: {{project}}
runtime: nodejs
description: {{description}}
"#,
    },
];

/// Owns the handlebars registry used by the program targets
pub struct TemplateManager {
    handlebars: Handlebars<'static>,
    templates: Vec<Template>,
}

impl TemplateManager {
    /// Registry preloaded with the built-in templates and helpers
    pub fn new() -> Result<Self, CodegenError> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(true);

        handlebars.register_helper("join", Box::new(join_helper));
        handlebars.register_helper("quote", Box::new(quote_helper));

        for template in BUILTIN_TEMPLATES {
            handlebars.register_template_string(template.name, template.content)?;
        }

        Ok(Self {
            handlebars,
            templates: BUILTIN_TEMPLATES.to_vec(),
        })
    }

    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, CodegenError> {
        Ok(self.handlebars.render(name, data)?)
    }

    pub fn templates_for(&self, target: TargetFormat) -> impl Iterator<Item = &Template> {
        self.templates.iter().filter(move |t| t.target == target)
    }
}

// Handlebars helpers
fn join_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let separator = h.param(1).and_then(|v| v.value().as_str()).unwrap_or(", ");
    let joined = h
        .param(0)
        .and_then(|v| v.value().as_array())
        .map(|items| {
            items
                .iter()
                .map(|item| match item.as_str() {
                    Some(s) => s.to_string(),
                    None => item.to_string(),
                })
                .collect::<Vec<_>>()
                .join(separator)
        })
        .unwrap_or_default();
    out.write(&joined)?;
    Ok(())
}

fn quote_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let param = h.param(0).and_then(|v| v.value().as_str()).unwrap_or("");
    out.write(&serde_json::Value::from(param).to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builtins_register() {
        let manager = TemplateManager::new().unwrap();
        assert_eq!(manager.templates_for(TargetFormat::Terraform).count(), 2);
        assert_eq!(manager.templates_for(TargetFormat::Pulumi).count(), 2);
        assert_eq!(manager.templates_for(TargetFormat::Arm).count(), 0);
    }

    #[test]
    fn test_helpers_and_no_escaping() {
        let manager = TemplateManager::new().unwrap();
        let out = manager
            .render(
                TERRAFORM_OUTPUTS,
                &json!({ "resources": [{ "name": "web", "resource_type": "aws_instance" }] }),
            )
            .unwrap();
        assert!(out.contains("output \"web_id\" {"));
        assert!(out.contains("value = aws_instance.web.id"));
        assert!(!out.contains("&quot;"));
    }

    #[test]
    fn test_strict_mode_reports_missing_fields() {
        let manager = TemplateManager::new().unwrap();
        let err = manager.render(PULUMI_PROJECT, &json!({})).unwrap_err();
        assert!(matches!(err, CodegenError::Template(_)));
    }
}
