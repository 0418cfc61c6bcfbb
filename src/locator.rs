//! Scope inference and best-match lookup for content-type collections.
//!
//! A collection handle carries no scope tag, so the locator works
//! empirically: it takes an existing member of the collection and finds
//! which anchor (list, web, or repository root) holds it. An empty
//! collection defaults to root scope; a member anchored nowhere makes the
//! scope undeterminable and the provisioner falls back to root-style
//! creation.

use crate::error::{Error, Result};
use crate::id::ContentTypeId;
use crate::model::{LiveContentType, Scope};
use crate::repository::{CollectionHandle, SiteRepository};
use log::debug;

/// Determine the scope a collection is anchored to.
pub fn resolve_scope(repo: &SiteRepository, collection: &CollectionHandle) -> Result<Scope> {
    let members = repo.members(collection)?;
    let Some(first) = members.first() else {
        debug!("collection is empty; defaulting to root scope");
        return Ok(Scope::Root);
    };
    match repo.anchor_of(&first.id) {
        Some(scope) => {
            debug!("collection resolved to {:?} via member {}", scope, first.id);
            Ok(scope)
        }
        None => Err(Error::InvalidScope {
            message: format!(
                "first member {} is not anchored to a list, a web, or the root",
                first.id
            ),
        }),
    }
}

/// Best-match lookup within a scope: an entity with the exact id, or one
/// whose parent id equals it (a derived type linked from the sought
/// definition).
pub fn find_in_scope<'a>(
    repo: &'a SiteRepository,
    scope: &Scope,
    id: &ContentTypeId,
) -> Option<&'a LiveContentType> {
    let members = repo.scope_members(scope).ok()?;
    members
        .iter()
        .find(|ct| &ct.id == id)
        .or_else(|| members.iter().find(|ct| ct.parent_id.as_ref() == Some(id)))
}

/// Find the definition of a content type at the scopes above a list: the
/// owning web first, then the repository root. Exact id match only.
pub fn find_definition_above<'a>(
    repo: &'a SiteRepository,
    web_id: &str,
    id: &ContentTypeId,
) -> Option<&'a LiveContentType> {
    repo.find_content_type(&Scope::Web(web_id.to_string()), id)
        .or_else(|| repo.find_content_type(&Scope::Root, id))
}
