//! Event-receiver bindings on content types.
//!
//! A binding's identity is the (handler class, event kind) pair: assembly
//! and sync mode are attributes, so re-ensuring the same class and kind
//! with a different assembly is a no-op that leaves the original binding
//! in place. Deletion is wider than identity: it removes every binding
//! whose event kind matches.

use crate::error::Result;
use crate::model::{ContentTypeRef, EventBinding, EventKind, SyncMode};
use crate::repository::SiteRepository;
use log::debug;

/// Ensure a binding exists on the content type.
///
/// Returns the newly created binding, or `None` when a binding with the
/// same (class, kind) identity was already present.
pub fn ensure_binding(
    repo: &mut SiteRepository,
    target: &ContentTypeRef,
    kind: EventKind,
    assembly: &str,
    class_name: &str,
    sync: SyncMode,
) -> Result<Option<EventBinding>> {
    let mut entity = repo.get_content_type(&target.scope, &target.id)?.clone();

    if entity.find_binding(kind, class_name).is_some() {
        debug!(
            "binding ({:?}, {}) already present on {}; keeping the original",
            kind, class_name, entity.id
        );
        return Ok(None);
    }

    let binding = EventBinding {
        kind,
        assembly: assembly.to_string(),
        class_name: class_name.to_string(),
        sync,
    };
    entity.event_bindings.push(binding.clone());
    repo.update_content_type(&entity)?;
    debug!("bound ({:?}, {}) on {}", kind, class_name, entity.id);
    Ok(Some(binding))
}

/// Remove every binding whose event kind matches, then persist. Returns
/// the number of bindings removed; zero removals skip the persist.
pub fn delete_binding(
    repo: &mut SiteRepository,
    target: &ContentTypeRef,
    kind: EventKind,
    class_name: &str,
) -> Result<usize> {
    let mut entity = repo.get_content_type(&target.scope, &target.id)?.clone();

    let before = entity.event_bindings.len();
    entity.event_bindings.retain(|binding| binding.kind != kind);
    let removed = before - entity.event_bindings.len();

    if removed > 0 {
        repo.update_content_type(&entity)?;
        debug!(
            "removed {} binding(s) of kind {:?} from {} (requested via {})",
            removed, kind, entity.id, class_name
        );
    }
    Ok(removed)
}
