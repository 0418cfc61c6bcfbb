//! Field resolution, linking, and ordering on live content types.

use crate::config::RequiredPolicy;
use crate::error::Result;
use crate::id::FieldId;
use crate::model::{Field, FieldLink, LiveContentType, Scope};
use crate::repository::SiteRepository;
use log::debug;
use std::collections::VecDeque;

/// Look up a field definition by stable identity among the fields available
/// at a scope. A miss is not an error; callers skip unresolvable fields.
pub fn resolve(repo: &SiteRepository, scope: &Scope, field_id: &FieldId) -> Option<Field> {
    repo.field_at_scope(scope, field_id)
}

/// Attach a resolved field to a content type's field-link set.
///
/// If a link for the field's id already exists this is a no-op returning
/// `false`. Otherwise a link is appended with the required policy applied
/// (`Required` → true, `NotRequired` → false, `Inherit` → the field's own
/// default), and the entity is persisted immediately only when `apply_now`
/// is set. Deferred mode exists so that bulk ensures cost one persistence
/// round trip instead of one per field; the caller owns the aggregate
/// persist.
pub fn attach(
    repo: &mut SiteRepository,
    entity: &mut LiveContentType,
    field: &Field,
    apply_now: bool,
    policy: RequiredPolicy,
) -> Result<bool> {
    if entity.has_field_link(&field.id) {
        debug!(
            "field {} already linked on {}; skipping",
            field.internal_name, entity.id
        );
        return Ok(false);
    }

    let mut link = FieldLink::from_field(field);
    match policy {
        RequiredPolicy::Required => link.required = true,
        RequiredPolicy::NotRequired => link.required = false,
        RequiredPolicy::Inherit => {}
    }
    entity.field_links.push(link);

    if apply_now {
        entity.version = repo.update_content_type(entity)?;
    }
    Ok(true)
}

/// Reorder a content type's visible field links to match `ordered`.
///
/// Every name in `ordered` is removed from the current visible sequence and
/// reinserted at its declared 0-based index (clamped to the sequence
/// length). Hidden links keep their original absolute slots. Names not
/// present among the entity's visible links are ignored. Persists once.
pub fn reorder(
    repo: &mut SiteRepository,
    entity: &mut LiveContentType,
    ordered: &[String],
) -> Result<()> {
    let visible: Vec<FieldLink> = entity
        .field_links
        .iter()
        .filter(|link| !link.hidden)
        .cloned()
        .collect();

    // Each declared name claims the first unclaimed link carrying it, so
    // links that share an internal name are never collapsed into one.
    let mut claimed = vec![false; visible.len()];
    let mut placements: Vec<(usize, usize)> = Vec::new();
    for (index, name) in ordered.iter().enumerate() {
        let slot = (0..visible.len()).find(|&i| !claimed[i] && visible[i].internal_name == *name);
        if let Some(i) = slot {
            claimed[i] = true;
            placements.push((index, i));
        }
    }

    let mut merged: Vec<FieldLink> = visible
        .iter()
        .enumerate()
        .filter(|(i, _)| !claimed[*i])
        .map(|(_, link)| link.clone())
        .collect();
    for (index, slot) in placements {
        let at = index.min(merged.len());
        merged.insert(at, visible[slot].clone());
    }

    let mut merged_links: VecDeque<FieldLink> = merged.into();

    entity.field_links = entity
        .field_links
        .iter()
        .map(|link| {
            if link.hidden {
                link.clone()
            } else {
                merged_links.pop_front().unwrap_or_else(|| link.clone())
            }
        })
        .collect();

    entity.version = repo.update_content_type(entity)?;
    Ok(())
}
