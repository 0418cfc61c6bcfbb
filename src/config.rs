//! # Descriptor Schema and Parsing
//!
//! This module defines the declarative input of the reconciliation engine:
//! the content-type descriptor an operator writes once and re-applies across
//! environments. Descriptors are YAML documents; fields use kebab-case names.
//!
//! ## Example descriptor
//!
//! ```yaml
//! id: "0x0100A3F2"
//! resource-file: "provisioning.resx"
//! name-key: "ct_invoice_name"
//! description-key: "ct_invoice_desc"
//! group-key: "ct_group_finance"
//! fields:
//!   - id: "f-title"
//!     internal-name: Title
//!     required: required
//!   - id: "f-amount"
//!     internal-name: Amount
//! field-order: [Title, Amount]
//! event-bindings:
//!   - kind: item-added
//!     assembly: "Finance.Handlers"
//!     class: "Finance.Handlers.InvoiceReceiver"
//!     sync: synchronous
//! ```
//!
//! The [`parse`] function is the entry point; parse failures are reported as
//! [`Error::ConfigParse`] with a hint where a common mistake is recognizable.

use crate::error::{Error, Result};
use crate::id::{ContentTypeId, FieldId};
use crate::model::{EventKind, SyncMode};
use serde::{Deserialize, Serialize};

/// How a field link's required flag is derived from the descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequiredPolicy {
    /// Force the link to required.
    Required,
    /// Force the link to optional.
    NotRequired,
    /// Leave the field's own default requiredness untouched.
    #[default]
    Inherit,
}

/// Declarative description of one field reference on a content type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Stable field identifier, resolved against the target scope's
    /// available fields at ensure time.
    pub id: FieldId,
    /// Internal (non-localized) field name.
    #[serde(rename = "internal-name")]
    pub internal_name: String,
    /// Required/optional/inherit policy for the link.
    #[serde(default)]
    pub required: RequiredPolicy,
}

/// Declarative description of one event-receiver binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventBindingDescriptor {
    /// Event kind the handler reacts to.
    pub kind: EventKind,
    /// Assembly carrying the handler class.
    pub assembly: String,
    /// Fully-qualified handler class name. Together with `kind` this is the
    /// binding's identity.
    pub class: String,
    /// Synchronous/asynchronous execution mode.
    #[serde(default)]
    pub sync: SyncMode,
}

/// Declarative input of the provisioner: the desired state of one content
/// type. Immutable once constructed; supplied fresh per provisioning call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentTypeDescriptor {
    /// Hierarchical content-type id, parent-prefixed.
    pub id: ContentTypeId,
    /// Resource file the display-string keys resolve against.
    #[serde(rename = "resource-file")]
    pub resource_file: String,
    /// Resource key for the display name. Must resolve non-empty for the
    /// default locale.
    #[serde(rename = "name-key")]
    pub name_key: String,
    /// Resource key for the description, if any.
    #[serde(rename = "description-key", default)]
    pub description_key: Option<String>,
    /// Resource key for the group the type is filed under, if any.
    #[serde(rename = "group-key", default)]
    pub group_key: Option<String>,
    /// Fields the content type must link, in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    /// Target sequence for the visible field links. Names absent from the
    /// entity's links are ignored at reorder time.
    #[serde(rename = "field-order", default)]
    pub field_order: Vec<String>,
    /// Event-receiver bindings the content type must carry.
    #[serde(rename = "event-bindings", default)]
    pub event_bindings: Vec<EventBindingDescriptor>,
}

/// Parse a YAML descriptor document into a [`ContentTypeDescriptor`].
pub fn parse(content: &str) -> Result<ContentTypeDescriptor> {
    serde_yaml::from_str(content).map_err(|err| {
        let message = err.to_string();
        let hint = hint_for(&message);
        Error::ConfigParse { message, hint }
    })
}

/// Best-effort hint for common descriptor mistakes, keyed off the serde
/// error message.
fn hint_for(message: &str) -> Option<String> {
    if message.contains("missing field `id`") {
        return Some(
            "every descriptor needs a hierarchical content-type id, e.g. id: \"0x0100A3F2\""
                .to_string(),
        );
    }
    if message.contains("missing field `name-key`") || message.contains("missing field `name_key`")
    {
        return Some(
            "name-key names the resource key the display name resolves from".to_string(),
        );
    }
    if message.contains("missing field `resource-file`") {
        return Some("resource-file points at the resource bundle for this descriptor".to_string());
    }
    if message.contains("unknown variant") && message.contains("required") {
        return Some("required must be one of: required, not-required, inherit".to_string());
    }
    if message.contains("unknown variant") && message.contains("kind") {
        return Some(
            "kind must be one of: item-adding, item-added, item-updating, item-updated, \
             item-deleting, item-deleted"
                .to_string(),
        );
    }
    None
}
