//! Shared test utilities for the integration suites.
//!
//! Provides descriptor YAML snippets and repository fixtures so individual
//! test files do not repeat the same setup.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//!
//! #[test]
//! fn test_example() {
//!     let mut repo = common::repo_with_fields();
//!     let provisioner = common::provisioner();
//!     // ... test code
//! }
//! ```

use content_repo::id::ContentTypeId;
use content_repo::localize::{StaticResources, StaticVariations};
use content_repo::model::{Field, LiveContentType, Scope};
use content_repo::provisioner::Provisioner;
use content_repo::repository::SiteRepository;

/// Common descriptor YAML snippets for testing.
#[allow(dead_code)]
pub mod descriptors {
    /// An invoice content type with two resolvable fields.
    pub const INVOICE: &str = r#"
id: "0x0100AB"
resource-file: "core.resx"
name-key: "ct_invoice_name"
description-key: "ct_invoice_desc"
group-key: "ct_invoice_group"
fields:
  - id: "f-title"
    internal-name: Title
    required: required
  - id: "f-amount"
    internal-name: Amount
"#;

    /// The invoice type with a hidden field and a declared visible order.
    pub const INVOICE_ORDERED: &str = r#"
id: "0x0100AB"
resource-file: "core.resx"
name-key: "ct_invoice_name"
fields:
  - id: "f-marker"
    internal-name: Marker
  - id: "f-title"
    internal-name: Title
  - id: "f-amount"
    internal-name: Amount
  - id: "f-notes"
    internal-name: Notes
field-order: [Notes, Title, Amount]
"#;

    /// A task content type carrying event bindings.
    pub const TASK_WITH_BINDINGS: &str = r#"
id: "0x0100C4"
resource-file: "core.resx"
name-key: "ct_task_name"
fields:
  - id: "f-title"
    internal-name: Title
event-bindings:
  - kind: item-added
    assembly: "Tracker.Handlers"
    class: "Tracker.Handlers.AuditReceiver"
    sync: synchronous
  - kind: item-updated
    assembly: "Tracker.Handlers"
    class: "Tracker.Handlers.AuditReceiver"
"#;
}

/// Parse a content-type id literal.
#[allow(dead_code)]
pub fn id(text: &str) -> ContentTypeId {
    ContentTypeId::parse(text).expect("test id literal must parse")
}

/// Resource entries covering the descriptor keys under the default locale.
pub fn resources() -> StaticResources {
    let mut resources = StaticResources::new();
    resources.insert("core.resx", "ct_invoice_name", "en-US", "Invoice");
    resources.insert("core.resx", "ct_invoice_desc", "en-US", "An invoice");
    resources.insert("core.resx", "ct_invoice_group", "en-US", "Finance");
    resources.insert("core.resx", "ct_task_name", "en-US", "Task");
    resources
}

/// A provisioner over [`resources`] with variations disabled.
pub fn provisioner() -> Provisioner {
    provisioner_with(resources())
}

/// A provisioner over explicit resources with variations disabled.
#[allow(dead_code)]
pub fn provisioner_with(resources: StaticResources) -> Provisioner {
    Provisioner::new(Box::new(resources), Box::new(StaticVariations::disabled()))
}

/// A repository with the field definitions the descriptors reference.
/// `f-marker` is a hidden field; the rest are plain.
pub fn repo_with_fields() -> SiteRepository {
    let mut repo = SiteRepository::new();
    repo.add_field(Field::new("f-title", "Title"));
    repo.add_field(Field::new("f-amount", "Amount"));
    repo.add_field(Field::new("f-notes", "Notes"));
    repo.add_field(Field::new("f-marker", "Marker").hidden());
    repo
}

/// [`repo_with_fields`] plus web `w1` carrying the given lists. Each list
/// collection is seeded with one linked content type so it can be
/// scope-classified.
#[allow(dead_code)]
pub fn repo_with_lists(urls: &[&str]) -> SiteRepository {
    let mut repo = repo_with_fields();
    repo.add_web("w1");
    for (index, url) in urls.iter().enumerate() {
        repo.add_list("w1", url).expect("web w1 exists");
        let seed = LiveContentType::new(
            id(&format!("0x0F{:02X}", index)),
            "Item",
            Scope::List(url.to_string()),
        );
        repo.add_content_type(seed).expect("seed id is unique");
    }
    repo
}

#[cfg(test)]
mod tests {
    use super::*;
    use content_repo::config;

    #[test]
    fn test_descriptors_are_valid() {
        for descriptor in [
            descriptors::INVOICE,
            descriptors::INVOICE_ORDERED,
            descriptors::TASK_WITH_BINDINGS,
        ] {
            config::parse(descriptor).expect("descriptor snippet should parse");
        }
    }

    #[test]
    fn test_fixture_lists_are_classifiable() {
        let repo = repo_with_lists(&["/lists/a"]);
        let handle = repo.list_collection("/lists/a").unwrap();
        assert_eq!(repo.members(&handle).unwrap().len(), 1);
    }
}
