use crate::error::{QuotationError, QuotationResult};
use std::path::Path;
use validator::{Validate, ValidationErrors};

/// Document extensions the order parser can read.
pub const SUPPORTED_DOCUMENT_TYPES: &[&str] = &["pdf", "csv", "xlsx", "xls"];

/// Spreadsheet extensions the costing sheet can be written as.
pub const SUPPORTED_SHEET_TYPES: &[&str] = &["xlsx", "csv"];

pub fn validate_model<T: Validate>(model: &T) -> QuotationResult<()> {
    match model.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let error_messages = format_validation_errors(&errors);
            Err(QuotationError::validation("model", error_messages))
        }
    }
}

pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();

    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let message = match error.code.as_ref() {
                "email" => format!("Invalid email format for field '{}'", field),
                "length" => format!("Length validation failed for field '{}'", field),
                "required" => format!("Field '{}' is required", field),
                code => format!("Validation failed for field '{}': {}", field, code),
            };
            messages.push(message);
        }
    }

    messages.sort();
    messages.join(", ")
}

pub fn validate_file_type(path: &Path, allowed_types: &[&str]) -> QuotationResult<()> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    if !allowed_types.contains(&extension.as_str()) {
        return Err(QuotationError::validation(
            "file_type",
            format!(
                "File type '{}' not allowed. Allowed types: {}",
                extension,
                allowed_types.join(", ")
            ),
        ));
    }

    Ok(())
}

/// Names of the `required_fields` that `has_key` reports missing, in order.
pub fn missing_required_fields<'a>(
    has_key: impl Fn(&str) -> bool,
    required_fields: &[&'a str],
) -> Vec<&'a str> {
    required_fields
        .iter()
        .filter(|field| !has_key(field))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_validate_file_type() {
        assert!(validate_file_type(Path::new("order.pdf"), SUPPORTED_DOCUMENT_TYPES).is_ok());
        assert!(validate_file_type(Path::new("ORDER.XLSX"), SUPPORTED_DOCUMENT_TYPES).is_ok());
        assert!(validate_file_type(Path::new("order.txt"), SUPPORTED_DOCUMENT_TYPES).is_err());
        assert!(validate_file_type(Path::new("order"), SUPPORTED_DOCUMENT_TYPES).is_err());
        assert!(validate_file_type(Path::new("sheet.xls"), SUPPORTED_SHEET_TYPES).is_err());
    }

    #[test]
    fn test_missing_required_fields() {
        let keys: HashSet<&str> = ["Placement", "Qty"].into_iter().collect();
        assert!(missing_required_fields(|k| keys.contains(k), &["Placement", "Qty"]).is_empty());

        let keys: HashSet<&str> = ["Qty", "Colour"].into_iter().collect();
        assert_eq!(
            missing_required_fields(|k| keys.contains(k), &["Placement", "Qty", "Per Rate"]),
            vec!["Placement", "Per Rate"]
        );
    }
}
