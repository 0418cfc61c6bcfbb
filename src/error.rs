//! # Error Handling
//!
//! Centralized error handling for the `content-repo` toolkit, built on
//! `thiserror`. The `Error` enum covers every anticipated failure mode of the
//! reconciliation engine; the `Result<T>` alias is used throughout the crate.
//!
//! Two conditions that look like errors are deliberately not part of this
//! taxonomy:
//!
//! - A content type that is not permitted on a target list is a silent no-op,
//!   surfaced as [`EnsureStatus::NotAllowed`](crate::provisioner::EnsureStatus)
//!   in the ensure report.
//! - A field id that cannot be resolved at the target scope is skipped and
//!   reported as [`FieldOutcome::Skipped`](crate::provisioner::FieldOutcome),
//!   never an error.
//!
//! No automatic retries exist anywhere in this crate; transient repository
//! failures propagate directly to the caller.

use thiserror::Error;

/// Main error type for content-repo operations
#[derive(Error, Debug)]
pub enum Error {
    /// An error occurred while parsing a content-type descriptor document.
    ///
    /// Includes the specific parsing issue and optionally a hint about how to
    /// fix it.
    #[error("Descriptor parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the descriptor issue
        hint: Option<String>,
    },

    /// A required input was missing or empty. Fatal; the call is aborted and
    /// nothing beyond already-completed steps is persisted.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The scope of a content-type collection could not be determined from
    /// its members. The provisioner recovers from this by falling back to
    /// plain root-style creation.
    #[error("Content-type collection scope could not be determined: {message}")]
    InvalidScope { message: String },

    /// An attempt was made to mutate a read-only content type. Fatal.
    #[error("Content type '{content_type}' is read-only and cannot be updated")]
    ReadOnly { content_type: String },

    /// A hierarchical content-type id could not be parsed.
    #[error("Invalid content type id '{value}': {message}")]
    InvalidId { value: String, message: String },

    /// A content type was not found where an operation expected it.
    #[error("Content type not found: {id}")]
    ContentTypeNotFound { id: String },

    /// A list was not found by its URL.
    #[error("List not found: {url}")]
    ListNotFound { url: String },

    /// A web was not found by its id.
    #[error("Web not found: {id}")]
    WebNotFound { id: String },

    /// Any other failure of the repository read/write surface.
    #[error("Repository operation error: {message}")]
    Repository { message: String },

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_config_parse() {
        let error = Error::ConfigParse {
            message: "Invalid YAML".to_string(),
            hint: None,
        };
        let display = format!("{}", error);
        assert!(display.contains("Descriptor parsing error"));
        assert!(display.contains("Invalid YAML"));
    }

    #[test]
    fn test_error_display_config_parse_with_hint() {
        let error = Error::ConfigParse {
            message: "Missing id field".to_string(),
            hint: Some("Add 'id:' to the content-type block".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("Missing id field"));
        assert!(display.contains("hint:"));
        assert!(display.contains("Add 'id:'"));
    }

    #[test]
    fn test_error_display_invalid_argument() {
        let error = Error::InvalidArgument {
            message: "display name resolved to an empty string".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Invalid argument"));
        assert!(display.contains("empty string"));
    }

    #[test]
    fn test_error_display_invalid_scope() {
        let error = Error::InvalidScope {
            message: "first member is anchored nowhere".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("scope could not be determined"));
        assert!(display.contains("anchored nowhere"));
    }

    #[test]
    fn test_error_display_read_only() {
        let error = Error::ReadOnly {
            content_type: "0x010073".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("read-only"));
        assert!(display.contains("0x010073"));
    }

    #[test]
    fn test_error_display_invalid_id() {
        let error = Error::InvalidId {
            value: "0xZZ".to_string(),
            message: "non-hex digit".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Invalid content type id"));
        assert!(display.contains("0xZZ"));
        assert!(display.contains("non-hex digit"));
    }

    #[test]
    fn test_error_display_not_found() {
        let error = Error::ListNotFound {
            url: "/sites/ops/lists/tasks".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("List not found"));
        assert!(display.contains("/sites/ops/lists/tasks"));
    }

    #[test]
    fn test_error_from_yaml_error() {
        let yaml_str = "invalid: [unclosed";
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>(yaml_str).unwrap_err();
        let error: Error = yaml_error.into();
        let display = format!("{}", error);
        assert!(display.contains("YAML parsing error"));
    }
}
