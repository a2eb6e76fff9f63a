//! Flattened field validation errors

use serde::Serialize;
use validator::{ValidationErrors, ValidationErrorsKind};

/// One failed field, addressed by a dotted path such as `links[1].link`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// All field failures of one form, sorted by field path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{}", self.summary())]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError {
                field: field.into(),
                message: message.into(),
            }],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// First message reported for `field`
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.message_for(field).is_some()
    }

    /// `field: message` pairs joined by commas
    fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn collect(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldError>) {
        for (field, kind) in errors.errors() {
            let path = if prefix.is_empty() {
                field.to_string()
            } else {
                format!("{prefix}.{field}")
            };
            match kind {
                ValidationErrorsKind::Field(list) => {
                    for err in list {
                        let message = err
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("invalid {}", err.code));
                        out.push(FieldError {
                            field: path.clone(),
                            message,
                        });
                    }
                }
                ValidationErrorsKind::Struct(inner) => Self::collect(&path, inner, out),
                ValidationErrorsKind::List(items) => {
                    for (index, inner) in items {
                        Self::collect(&format!("{path}[{index}]"), inner, out);
                    }
                }
            }
        }
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = Vec::new();
        Self::collect("", &errors, &mut out);
        out.sort_by(|a, b| a.field.cmp(&b.field));
        Self { errors: out }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lists_every_field() {
        let mut errors = FieldErrors::single("email", "Invalid email address");
        errors.errors.push(FieldError {
            field: "name".into(),
            message: "Store name is required".into(),
        });
        assert_eq!(
            errors.to_string(),
            "email: Invalid email address, name: Store name is required"
        );

        let boxed: Box<dyn std::error::Error> = Box::new(errors);
        assert!(boxed.source().is_none());
    }
}
