use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

/// Plain-text email with at most one file attachment.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OutgoingEmail {
    #[validate(email)]
    pub to: String,
    #[validate(length(min = 1))]
    pub subject: String,
    pub body_text: String,
    pub attachment: Option<PathBuf>,
}

impl OutgoingEmail {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body_text: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body_text: body_text.into(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, path: impl Into<PathBuf>) -> Self {
        self.attachment = Some(path.into());
        self
    }

    /// File name shown to the recipient for the attachment.
    pub fn attachment_name(&self) -> Option<String> {
        self.attachment
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|name| name.to_string_lossy().into_owned())
    }
}

