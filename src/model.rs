//! Live content-model entities: the shapes that exist inside the repository
//! and are mutated by the reconciliation engine.

use crate::id::{ContentTypeId, FieldId};
use serde::{Deserialize, Serialize};

/// The level at which an entity is provisioned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Repository root, visible to every web and list.
    Root,
    /// A single web, identified by its id.
    Web(String),
    /// A single list, identified by its URL.
    List(String),
}

impl Scope {
    /// Whether this scope is list-local.
    pub fn is_list(&self) -> bool {
        matches!(self, Scope::List(_))
    }
}

/// A field definition available at some scope of the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Stable field identifier.
    pub id: FieldId,
    /// Internal (non-localized) name.
    pub internal_name: String,
    /// The field's own default requiredness, used when a link's policy is
    /// `Inherit`.
    pub required_by_default: bool,
    /// Whether links to this field default to hidden.
    pub hidden: bool,
}

impl Field {
    pub fn new(id: impl Into<FieldId>, internal_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            internal_name: internal_name.into(),
            required_by_default: false,
            hidden: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required_by_default = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

/// A content type's reference to a field definition, carrying a local
/// required override and a visibility flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLink {
    pub field_id: FieldId,
    pub internal_name: String,
    /// Effective required flag for this content type.
    pub required: bool,
    /// Hidden links never participate in declared ordering.
    pub hidden: bool,
}

impl FieldLink {
    /// Build a link from a field definition, taking the field's defaults.
    pub fn from_field(field: &Field) -> Self {
        Self {
            field_id: field.id.clone(),
            internal_name: field.internal_name.clone(),
            required: field.required_by_default,
            hidden: field.hidden,
        }
    }
}

/// The kind of repository event a binding reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    ItemAdding,
    ItemAdded,
    ItemUpdating,
    ItemUpdated,
    ItemDeleting,
    ItemDeleted,
}

/// Whether a bound handler runs synchronously with the triggering operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncMode {
    /// Platform default for the event kind.
    #[default]
    Default,
    Synchronous,
    Asynchronous,
}

/// An event-receiver binding attached to a content type.
///
/// Identity for "already bound" purposes is the (class name, event kind)
/// pair; assembly and sync mode are attributes, not identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventBinding {
    pub kind: EventKind,
    pub assembly: String,
    pub class_name: String,
    pub sync: SyncMode,
}

impl EventBinding {
    /// The composite key that makes a binding unique on its content type.
    pub fn identity(&self) -> (EventKind, &str) {
        (self.kind, self.class_name.as_str())
    }
}

/// Where a content-type usage is anchored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageAnchor {
    /// A list, by URL.
    List(String),
    /// A non-list anchor (a web item). Deletion semantics for these are
    /// intentionally undefined; the deleter retains and reports them.
    Web(String),
}

/// A record that an anchor has enabled and linked a given content type,
/// independent of current item counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Usage {
    pub content_type_id: ContentTypeId,
    pub anchor: UsageAnchor,
}

/// A provisioned content type inside the live repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveContentType {
    /// Hierarchical identity; prefix-comparable against ancestors.
    pub id: ContentTypeId,
    /// The definition this type derives from, if any. List-scoped copies
    /// point at the higher-scope definition they were linked from.
    pub parent_id: Option<ContentTypeId>,
    pub name: String,
    pub description: String,
    pub group: String,
    /// Ordered field-link set.
    pub field_links: Vec<FieldLink>,
    pub event_bindings: Vec<EventBinding>,
    pub scope: Scope,
    pub read_only: bool,
    /// Monotonic counter bumped by every persist.
    pub version: u64,
}

impl LiveContentType {
    pub fn new(id: ContentTypeId, name: impl Into<String>, scope: Scope) -> Self {
        Self {
            id,
            parent_id: None,
            name: name.into(),
            description: String::new(),
            group: String::new(),
            field_links: Vec::new(),
            event_bindings: Vec::new(),
            scope,
            read_only: false,
            version: 0,
        }
    }

    /// Whether a link for the given field id already exists.
    pub fn has_field_link(&self, field_id: &FieldId) -> bool {
        self.field_links.iter().any(|link| &link.field_id == field_id)
    }

    /// Find a binding by its (class, kind) identity.
    pub fn find_binding(&self, kind: EventKind, class_name: &str) -> Option<&EventBinding> {
        self.event_bindings
            .iter()
            .find(|b| b.identity() == (kind, class_name))
    }

    /// Internal names of the visible (non-hidden) field links, in order.
    pub fn visible_link_names(&self) -> Vec<String> {
        self.field_links
            .iter()
            .filter(|link| !link.hidden)
            .map(|link| link.internal_name.clone())
            .collect()
    }

    /// A lightweight locator for this entity within the repository.
    pub fn to_ref(&self) -> ContentTypeRef {
        ContentTypeRef {
            id: self.id.clone(),
            scope: self.scope.clone(),
        }
    }
}

/// (scope, id) locator for a live content type. Cheap to clone and pass into
/// operations that need to load a fresh working copy from the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTypeRef {
    pub id: ContentTypeId,
    pub scope: Scope,
}
