//! Email Template Engine
//!
//! Handlebars-based template rendering for quotation emails.

use anyhow::{Context, Result};
use handlebars::Handlebars;
use std::collections::HashMap;

pub const COSTING_DETAILS_TEMPLATE: &str = "costing_details";

/// Email template definition
#[derive(Debug, Clone)]
pub struct EmailTemplate {
    pub id: String,
    pub subject_template: String,
    pub body_text_template: String,
    /// Variables that must be present in the render context
    pub required_variables: Vec<String>,
}

/// Template rendering result
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEmail {
    pub subject: String,
    pub body_text: String,
}

/// Template engine
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
    templates: HashMap<String, EmailTemplate>,
}

impl TemplateEngine {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        // Plain-text mail: nothing to HTML-escape
        handlebars.register_escape_fn(handlebars::no_escape);

        let mut engine = Self {
            handlebars,
            templates: HashMap::new(),
        };

        engine.register_builtin_templates();

        engine
    }

    fn register_builtin_templates(&mut self) {
        let costing_details = EmailTemplate {
            id: COSTING_DETAILS_TEMPLATE.to_string(),
            subject_template: "{{subject}}".to_string(),
            body_text_template: r#"Dear Customer,

Thank you for your inquiry. Please find below the costing details:

Total Quantity: {{total_quantity}}
Total Cost: {{currency}}{{total_cost}}

{{#if has_attachment}}
The detailed costing sheet is attached for your reference.

{{/if}}
Best regards,
{{signature}}
"#
            .to_string(),
            required_variables: ["subject", "total_quantity", "total_cost", "currency", "signature"]
                .iter()
                .map(|name| name.to_string())
                .collect(),
        };

        self.templates.insert(costing_details.id.clone(), costing_details);
    }

    /// Render template with variables
    pub fn render(&self, template_id: &str, variables: &serde_json::Value) -> Result<RenderedEmail> {
        let template = self
            .templates
            .get(template_id)
            .with_context(|| format!("Template not found: {}", template_id))?;

        for name in &template.required_variables {
            if variables.get(name).is_none() {
                anyhow::bail!("Missing required template variable: {}", name);
            }
        }

        let subject = self
            .handlebars
            .render_template(&template.subject_template, variables)
            .context("Failed to render subject")?;

        let body_text = self
            .handlebars
            .render_template(&template.body_text_template, variables)
            .context("Failed to render text body")?;

        Ok(RenderedEmail { subject, body_text })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}
