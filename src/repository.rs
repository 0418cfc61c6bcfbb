//! # Repository Handle
//!
//! `SiteRepository` is the live, hierarchical content-model tree the engine
//! reconciles against: a root-level content-type collection, webs with their
//! own collections and fields, and lists with linked content types and items.
//!
//! ## Design
//!
//! The repository is an explicit handle threaded through every operation —
//! there is no hidden global or service-locator access. The engine mutates
//! working copies of entities and persists them through
//! [`SiteRepository::update_content_type`], which is the only place the
//! persisted version counter is bumped and read-only entities are enforced.
//!
//! Content-type collections are stored centrally and addressed through the
//! opaque [`CollectionHandle`]; a collection carries no scope tag of its own.
//! The locator infers a collection's scope empirically from its members (see
//! [`crate::locator`]), which is why the handle stays opaque. Transport to a
//! real platform is out of scope; the in-memory tree stands in for the
//! already-connected repository.

use crate::error::{Error, Result};
use crate::id::{ContentTypeId, FieldId};
use crate::localize::Locale;
use crate::model::{Field, LiveContentType, Scope, Usage, UsageAnchor};
use log::debug;
use std::collections::BTreeMap;

/// Opaque handle to a content-type collection.
///
/// Handles are obtained from [`SiteRepository::root_collection`],
/// [`SiteRepository::web_collection`], [`SiteRepository::list_collection`],
/// or [`SiteRepository::detached_collection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionHandle {
    id: u64,
}

/// An item stored in a list, typed by a content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub content_type_id: ContentTypeId,
    pub title: String,
}

struct WebEntry {
    collection: u64,
    fields: Vec<Field>,
}

struct ListEntry {
    web_id: String,
    collection: u64,
    content_types_enabled: bool,
    /// `None` means any content type is allowed on the list.
    allowed_ids: Option<Vec<ContentTypeId>>,
    items: Vec<ListItem>,
}

/// The live content-model tree.
pub struct SiteRepository {
    display_locales: Vec<Locale>,
    multi_region: bool,
    fields: Vec<Field>,
    collections: BTreeMap<u64, Vec<LiveContentType>>,
    root_collection: u64,
    webs: BTreeMap<String, WebEntry>,
    lists: BTreeMap<String, ListEntry>,
    recorded_usages: Vec<Usage>,
    next_collection: u64,
    next_link_suffix: u16,
}

impl SiteRepository {
    /// Create an empty repository with `en-US` as the only display locale.
    pub fn new() -> Self {
        let mut collections = BTreeMap::new();
        collections.insert(0, Vec::new());
        Self {
            display_locales: vec![Locale::from("en-US")],
            multi_region: false,
            fields: Vec::new(),
            collections,
            root_collection: 0,
            webs: BTreeMap::new(),
            lists: BTreeMap::new(),
            recorded_usages: Vec::new(),
            next_collection: 1,
            next_link_suffix: 0,
        }
    }

    /// Replace the supported display locales. The first entry is the default
    /// locale; an empty list is rejected.
    pub fn set_display_locales(&mut self, locales: Vec<Locale>) -> Result<()> {
        if locales.is_empty() {
            return Err(Error::InvalidArgument {
                message: "at least one display locale is required".to_string(),
            });
        }
        self.display_locales = locales;
        Ok(())
    }

    /// Supported display locales, default first.
    pub fn display_locales(&self) -> &[Locale] {
        &self.display_locales
    }

    /// The default display locale.
    pub fn default_locale(&self) -> &Locale {
        // Non-empty by construction and by set_display_locales.
        &self.display_locales[0]
    }

    /// Mark the repository as supporting multi-region content, making the
    /// variation service relevant during metadata layering.
    pub fn set_multi_region(&mut self, multi_region: bool) {
        self.multi_region = multi_region;
    }

    pub fn is_multi_region(&self) -> bool {
        self.multi_region
    }

    //// Fields ////

    /// Register a field definition at repository root.
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Register a field definition on a web.
    pub fn add_web_field(&mut self, web_id: &str, field: Field) -> Result<()> {
        let web = self.webs.get_mut(web_id).ok_or_else(|| Error::WebNotFound {
            id: web_id.to_string(),
        })?;
        web.fields.push(field);
        Ok(())
    }

    /// The field definitions available at a scope: root fields everywhere,
    /// plus the owning web's fields for web and list scopes.
    pub fn available_fields(&self, scope: &Scope) -> Vec<Field> {
        let mut fields = self.fields.clone();
        let web_id = match scope {
            Scope::Root => None,
            Scope::Web(id) => Some(id.clone()),
            Scope::List(url) => self.lists.get(url).map(|l| l.web_id.clone()),
        };
        if let Some(id) = web_id {
            if let Some(web) = self.webs.get(&id) {
                fields.extend(web.fields.iter().cloned());
            }
        }
        fields
    }

    /// Look up a field definition by id among the fields available at a
    /// scope. A miss is not an error.
    pub fn field_at_scope(&self, scope: &Scope, field_id: &FieldId) -> Option<Field> {
        self.available_fields(scope)
            .into_iter()
            .find(|f| &f.id == field_id)
    }

    //// Structure ////

    /// Add a web and return the handle of its content-type collection.
    pub fn add_web(&mut self, web_id: &str) -> CollectionHandle {
        let collection = self.allocate_collection();
        self.webs.insert(
            web_id.to_string(),
            WebEntry {
                collection,
                fields: Vec::new(),
            },
        );
        CollectionHandle { id: collection }
    }

    /// Add a list under a web and return the handle of its collection.
    pub fn add_list(&mut self, web_id: &str, url: &str) -> Result<CollectionHandle> {
        if !self.webs.contains_key(web_id) {
            return Err(Error::WebNotFound {
                id: web_id.to_string(),
            });
        }
        let collection = self.allocate_collection();
        self.lists.insert(
            url.to_string(),
            ListEntry {
                web_id: web_id.to_string(),
                collection,
                content_types_enabled: false,
                allowed_ids: None,
                items: Vec::new(),
            },
        );
        Ok(CollectionHandle { id: collection })
    }

    /// Restrict the content types a list accepts. A content type is then
    /// allowed only when its id matches or descends from an allowed id.
    pub fn restrict_list(&mut self, url: &str, allowed: Vec<ContentTypeId>) -> Result<()> {
        self.list_mut(url)?.allowed_ids = Some(allowed);
        Ok(())
    }

    /// Whether the list accepts the given content type id.
    pub fn list_allows(&self, url: &str, id: &ContentTypeId) -> Result<bool> {
        let list = self.list(url)?;
        Ok(match &list.allowed_ids {
            None => true,
            Some(allowed) => allowed
                .iter()
                .any(|a| a == id || id.is_descendant_of(a)),
        })
    }

    /// Whether content-type support is enabled on the list.
    pub fn list_content_types_enabled(&self, url: &str) -> Result<bool> {
        Ok(self.list(url)?.content_types_enabled)
    }

    /// Enable content-type support on a list. Returns whether the flag
    /// changed.
    pub fn enable_content_types(&mut self, url: &str) -> Result<bool> {
        let list = self.list_mut(url)?;
        let changed = !list.content_types_enabled;
        list.content_types_enabled = true;
        if changed {
            debug!("enabled content-type support on list {}", url);
        }
        Ok(changed)
    }

    /// The id of the web owning a list.
    pub fn list_web_id(&self, url: &str) -> Result<String> {
        Ok(self.list(url)?.web_id.clone())
    }

    /// Add an item to a list.
    pub fn add_item(
        &mut self,
        url: &str,
        content_type_id: ContentTypeId,
        title: impl Into<String>,
    ) -> Result<()> {
        self.list_mut(url)?.items.push(ListItem {
            content_type_id,
            title: title.into(),
        });
        Ok(())
    }

    /// Count items in a list typed by the given content type, including
    /// items typed by one of its descendants. Descendants count because an
    /// item created under a list-scoped copy references the definition
    /// through its derived id.
    pub fn items_with_content_type(&self, url: &str, id: &ContentTypeId) -> Result<usize> {
        let list = self.list(url)?;
        Ok(list
            .items
            .iter()
            .filter(|item| {
                &item.content_type_id == id || item.content_type_id.is_descendant_of(id)
            })
            .count())
    }

    //// Collections ////

    /// The repository-root content-type collection.
    pub fn root_collection(&self) -> CollectionHandle {
        CollectionHandle {
            id: self.root_collection,
        }
    }

    /// The content-type collection of a web.
    pub fn web_collection(&self, web_id: &str) -> Result<CollectionHandle> {
        let web = self.webs.get(web_id).ok_or_else(|| Error::WebNotFound {
            id: web_id.to_string(),
        })?;
        Ok(CollectionHandle { id: web.collection })
    }

    /// The content-type collection of a list.
    pub fn list_collection(&self, url: &str) -> Result<CollectionHandle> {
        Ok(CollectionHandle {
            id: self.list(url)?.collection,
        })
    }

    /// Allocate a collection that is not anchored to the root, a web, or a
    /// list. Members of such a collection cannot be scope-classified.
    pub fn detached_collection(&mut self) -> CollectionHandle {
        CollectionHandle {
            id: self.allocate_collection(),
        }
    }

    /// The members of a collection, in order.
    pub fn members(&self, handle: &CollectionHandle) -> Result<&[LiveContentType]> {
        self.collections
            .get(&handle.id)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::Repository {
                message: format!("unknown collection handle {}", handle.id),
            })
    }

    /// Append an entity to an arbitrary collection. Duplicate ids within a
    /// collection are rejected.
    pub fn add_to_collection(
        &mut self,
        handle: &CollectionHandle,
        content_type: LiveContentType,
    ) -> Result<()> {
        let members = self
            .collections
            .get_mut(&handle.id)
            .ok_or_else(|| Error::Repository {
                message: format!("unknown collection handle {}", handle.id),
            })?;
        if members.iter().any(|ct| ct.id == content_type.id) {
            return Err(Error::Repository {
                message: format!(
                    "content type {} already exists in the collection",
                    content_type.id
                ),
            });
        }
        members.push(content_type);
        Ok(())
    }

    //// Content types ////

    /// Add an entity to the collection its scope designates. Duplicate ids
    /// within the scope are rejected.
    pub fn add_content_type(&mut self, content_type: LiveContentType) -> Result<()> {
        let handle = self.collection_for_scope(&content_type.scope)?;
        debug!(
            "adding content type {} at {:?}",
            content_type.id, content_type.scope
        );
        self.add_to_collection(&handle, content_type)
    }

    /// The entities of a scope's collection.
    pub fn scope_members(&self, scope: &Scope) -> Result<&[LiveContentType]> {
        let handle = self.collection_for_scope(scope)?;
        self.members(&handle)
    }

    /// Find an entity by exact id within a scope.
    pub fn find_content_type(&self, scope: &Scope, id: &ContentTypeId) -> Option<&LiveContentType> {
        self.scope_members(scope)
            .ok()?
            .iter()
            .find(|ct| &ct.id == id)
    }

    /// Load an entity by its (scope, id) locator.
    pub fn get_content_type(
        &self,
        scope: &Scope,
        id: &ContentTypeId,
    ) -> Result<&LiveContentType> {
        self.find_content_type(scope, id)
            .ok_or_else(|| Error::ContentTypeNotFound { id: id.to_string() })
    }

    /// Persist a mutated working copy back into the repository.
    ///
    /// The stored entity's read-only flag gates the write; on success the
    /// persisted version counter is bumped and returned.
    pub fn update_content_type(&mut self, updated: &LiveContentType) -> Result<u64> {
        let handle = self.collection_for_scope(&updated.scope)?;
        let members = self
            .collections
            .get_mut(&handle.id)
            .ok_or_else(|| Error::Repository {
                message: format!("unknown collection handle {}", handle.id),
            })?;
        let stored = members
            .iter_mut()
            .find(|ct| ct.id == updated.id)
            .ok_or_else(|| Error::ContentTypeNotFound {
                id: updated.id.to_string(),
            })?;
        if stored.read_only {
            return Err(Error::ReadOnly {
                content_type: stored.id.to_string(),
            });
        }
        let version = stored.version + 1;
        *stored = updated.clone();
        stored.version = version;
        debug!("persisted content type {} at v{}", stored.id, version);
        Ok(version)
    }

    /// Remove an entity from its scope's collection and return it.
    pub fn remove_content_type(
        &mut self,
        scope: &Scope,
        id: &ContentTypeId,
    ) -> Result<LiveContentType> {
        let handle = self.collection_for_scope(scope)?;
        let members = self
            .collections
            .get_mut(&handle.id)
            .ok_or_else(|| Error::Repository {
                message: format!("unknown collection handle {}", handle.id),
            })?;
        let position = members
            .iter()
            .position(|ct| &ct.id == id)
            .ok_or_else(|| Error::ContentTypeNotFound { id: id.to_string() })?;
        debug!("removing content type {} from {:?}", id, scope);
        Ok(members.remove(position))
    }

    /// Remove from a list's collection the entity matching the given id
    /// exactly or linked from it (parent match). Returns the removed id.
    pub fn delete_from_list(&mut self, url: &str, id: &ContentTypeId) -> Result<ContentTypeId> {
        let collection = self.list(url)?.collection;
        let members = self
            .collections
            .get_mut(&collection)
            .ok_or_else(|| Error::Repository {
                message: format!("list {} has no collection", url),
            })?;
        let position = members
            .iter()
            .position(|ct| &ct.id == id || ct.parent_id.as_ref() == Some(id))
            .ok_or_else(|| Error::ContentTypeNotFound { id: id.to_string() })?;
        let removed = members.remove(position);
        debug!("removed content type {} from list {}", removed.id, url);
        Ok(removed.id)
    }

    //// Usages ////

    /// Record an explicit usage, e.g. a content type anchored directly to a
    /// web item. List usages are derived and need no recording.
    pub fn record_usage(&mut self, usage: Usage) {
        self.recorded_usages.push(usage);
    }

    /// All usages of a content type: every list whose collection links the
    /// type (exact id or parent match), plus explicitly recorded usages.
    pub fn usages_of(&self, id: &ContentTypeId) -> Vec<Usage> {
        let mut usages = Vec::new();
        for (url, list) in &self.lists {
            if let Some(members) = self.collections.get(&list.collection) {
                let linked = members
                    .iter()
                    .any(|ct| &ct.id == id || ct.parent_id.as_ref() == Some(id));
                if linked {
                    usages.push(Usage {
                        content_type_id: id.clone(),
                        anchor: UsageAnchor::List(url.clone()),
                    });
                }
            }
        }
        usages.extend(
            self.recorded_usages
                .iter()
                .filter(|u| &u.content_type_id == id)
                .cloned(),
        );
        usages
    }

    //// Internals ////

    /// A fresh suffix for deriving list-scoped child ids.
    pub fn next_link_suffix(&mut self) -> [u8; 2] {
        self.next_link_suffix += 1;
        self.next_link_suffix.to_be_bytes()
    }

    /// Which anchor's collection contains the given entity id, if any.
    pub(crate) fn anchor_of(&self, id: &ContentTypeId) -> Option<Scope> {
        if self.contains(self.root_collection, id) {
            return Some(Scope::Root);
        }
        for (web_id, web) in &self.webs {
            if self.contains(web.collection, id) {
                return Some(Scope::Web(web_id.clone()));
            }
        }
        for (url, list) in &self.lists {
            if self.contains(list.collection, id) {
                return Some(Scope::List(url.clone()));
            }
        }
        None
    }

    fn contains(&self, collection: u64, id: &ContentTypeId) -> bool {
        self.collections
            .get(&collection)
            .map(|members| members.iter().any(|ct| &ct.id == id))
            .unwrap_or(false)
    }

    fn collection_for_scope(&self, scope: &Scope) -> Result<CollectionHandle> {
        match scope {
            Scope::Root => Ok(self.root_collection()),
            Scope::Web(id) => self.web_collection(id),
            Scope::List(url) => self.list_collection(url),
        }
    }

    fn allocate_collection(&mut self) -> u64 {
        let id = self.next_collection;
        self.next_collection += 1;
        self.collections.insert(id, Vec::new());
        id
    }

    fn list(&self, url: &str) -> Result<&ListEntry> {
        self.lists.get(url).ok_or_else(|| Error::ListNotFound {
            url: url.to_string(),
        })
    }

    fn list_mut(&mut self, url: &str) -> Result<&mut ListEntry> {
        self.lists.get_mut(url).ok_or_else(|| Error::ListNotFound {
            url: url.to_string(),
        })
    }
}

impl Default for SiteRepository {
    fn default() -> Self {
        Self::new()
    }
}
