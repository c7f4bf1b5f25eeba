//! Quotation Email Communication
//!
//! Renders the costing-details email for a quotation and delivers it over
//! SMTP with the costing sheet attached.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use std::path::PathBuf;

use quotation_models::{OutgoingEmail, Quotation};

pub mod smtp_client;
pub mod template_engine;

pub use smtp_client::{SmtpClient, SmtpConfig};
pub use template_engine::{EmailTemplate, RenderedEmail, TemplateEngine, COSTING_DETAILS_TEMPLATE};

/// Delivers a composed email. Returns the transport's response text.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<String>;
}

/// Builds the costing-details email from a quotation.
pub struct QuotationComposer {
    engine: TemplateEngine,
    subject: String,
    currency_symbol: String,
    signature: String,
}

impl QuotationComposer {
    pub fn new(
        subject: impl Into<String>,
        currency_symbol: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            engine: TemplateEngine::new(),
            subject: subject.into(),
            currency_symbol: currency_symbol.into(),
            signature: signature.into(),
        }
    }

    /// Totals are shown with two decimals.
    pub fn compose(
        &self,
        to: &str,
        quotation: &Quotation,
        attachment: Option<PathBuf>,
    ) -> Result<OutgoingEmail> {
        let rendered = self.engine.render(
            COSTING_DETAILS_TEMPLATE,
            &json!({
                "subject": self.subject,
                "total_quantity": format!("{:.2}", quotation.total_qty),
                "total_cost": format!("{:.2}", quotation.total_cost),
                "currency": self.currency_symbol,
                "signature": self.signature,
                "has_attachment": attachment.is_some(),
            }),
        )?;

        let email = OutgoingEmail::new(to, rendered.subject, rendered.body_text);
        Ok(match attachment {
            Some(path) => email.with_attachment(path),
            None => email,
        })
    }
}

impl Default for QuotationComposer {
    fn default() -> Self {
        Self::new("Costing Details", "$", "MORLY Team")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_formats_totals() {
        let composer = QuotationComposer::default();
        let email = composer
            .compose(
                "buyer@example.com",
                &Quotation::new(7.0, 70.0),
                Some(PathBuf::from("costing_sheet.xlsx")),
            )
            .unwrap();

        assert_eq!(email.to, "buyer@example.com");
        assert_eq!(email.subject, "Costing Details");
        assert!(email.body_text.contains("Total Quantity: 7.00"));
        assert!(email.body_text.contains("Total Cost: $70.00"));
        assert_eq!(email.attachment_name().as_deref(), Some("costing_sheet.xlsx"));
    }

    #[test]
    fn test_compose_without_attachment() {
        let composer = QuotationComposer::new("Quote", "€", "Sales");
        let email = composer
            .compose("buyer@example.com", &Quotation::new(13.0, 1300.0), None)
            .unwrap();

        assert_eq!(email.subject, "Quote");
        assert!(email.body_text.contains("Total Cost: €1300.00"));
        assert!(email.body_text.ends_with("Sales\n"));
        assert!(email.attachment.is_none());
    }
}
