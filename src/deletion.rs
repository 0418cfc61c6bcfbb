//! Usage-aware content-type deletion.
//!
//! A content type is removed only where provably safe: globally when no
//! usage exists, or from individual list collections whose lists hold no
//! items typed by it. Usages that cannot be acted on are retained and
//! reported rather than guessed at.

use crate::error::Result;
use crate::model::{ContentTypeRef, Usage, UsageAnchor};
use crate::repository::SiteRepository;
use log::{debug, info};

/// Why a usage was left in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetainReason {
    /// The list still holds items typed by the content type (directly or
    /// through a derived id).
    HasItems { count: usize },
    /// The usage is anchored to something other than a list. Deletion
    /// semantics for these are undefined; they are reported, not touched.
    NonListUsage,
}

/// A usage the deleter refused to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetainedUsage {
    pub usage: Usage,
    pub reason: RetainReason,
}

/// Structured outcome of [`delete_if_unused`].
#[derive(Debug, Clone, Default)]
pub struct DeleteReport {
    /// Whether the definition was removed from its owning scope.
    pub deleted_definition: bool,
    /// URLs of the lists the content type was removed from.
    pub removed_from: Vec<String>,
    /// Usages that were left as-is, with the reason.
    pub retained: Vec<RetainedUsage>,
}

/// Delete a content type where safe.
///
/// With zero usages the definition is deleted unconditionally at its
/// owning scope. Otherwise each list usage whose list holds no items of
/// the type is unlinked from that list only; the definition and all other
/// usages stay.
pub fn delete_if_unused(
    repo: &mut SiteRepository,
    target: &ContentTypeRef,
) -> Result<DeleteReport> {
    let entity = repo.get_content_type(&target.scope, &target.id)?.clone();
    let usages = repo.usages_of(&entity.id);

    let mut report = DeleteReport::default();

    if usages.is_empty() {
        repo.remove_content_type(&entity.scope, &entity.id)?;
        info!("deleted unused content type {} at {:?}", entity.id, entity.scope);
        report.deleted_definition = true;
        return Ok(report);
    }

    for usage in usages {
        match &usage.anchor {
            UsageAnchor::List(url) => {
                let items = repo.items_with_content_type(url, &entity.id)?;
                if items == 0 {
                    repo.delete_from_list(url, &entity.id)?;
                    info!("removed content type {} from list {}", entity.id, url);
                    report.removed_from.push(url.clone());
                } else {
                    debug!(
                        "list {} holds {} item(s) of content type {}; keeping the usage",
                        url, items, entity.id
                    );
                    report.retained.push(RetainedUsage {
                        usage,
                        reason: RetainReason::HasItems { count: items },
                    });
                }
            }
            UsageAnchor::Web(anchor) => {
                debug!(
                    "usage of {} anchored to web {} has no deletion semantics; keeping",
                    entity.id, anchor
                );
                report.retained.push(RetainedUsage {
                    usage,
                    reason: RetainReason::NonListUsage,
                });
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::ContentTypeId;
    use crate::model::{LiveContentType, Scope};

    fn id(s: &str) -> ContentTypeId {
        ContentTypeId::parse(s).unwrap()
    }

    fn repo_with_definition() -> (SiteRepository, ContentTypeRef) {
        let mut repo = SiteRepository::new();
        let entity = LiveContentType::new(id("0x0100AB"), "Task", Scope::Root);
        let target = entity.to_ref();
        repo.add_content_type(entity).unwrap();
        (repo, target)
    }

    fn link_into_list(repo: &mut SiteRepository, definition: &ContentTypeId, url: &str) {
        let suffix = repo.next_link_suffix();
        let mut linked =
            LiveContentType::new(definition.derive(&suffix), "Task", Scope::List(url.to_string()));
        linked.parent_id = Some(definition.clone());
        repo.add_content_type(linked).unwrap();
    }

    #[test]
    fn test_unused_definition_is_deleted() {
        let (mut repo, target) = repo_with_definition();

        let report = delete_if_unused(&mut repo, &target).unwrap();

        assert!(report.deleted_definition);
        assert!(report.removed_from.is_empty());
        assert!(repo.find_content_type(&Scope::Root, &target.id).is_none());
    }

    #[test]
    fn test_empty_list_usage_is_unlinked_but_definition_stays() {
        let (mut repo, target) = repo_with_definition();
        repo.add_web("w1");
        repo.add_list("w1", "/lists/a").unwrap();
        repo.add_list("w1", "/lists/b").unwrap();
        link_into_list(&mut repo, &target.id, "/lists/a");
        link_into_list(&mut repo, &target.id, "/lists/b");

        assert_eq!(repo.usages_of(&target.id).len(), 2);

        // /lists/b still holds an item.
        repo.add_item("/lists/b", target.id.derive(&[0xFF]), "open task")
            .unwrap();

        let report = delete_if_unused(&mut repo, &target).unwrap();

        assert!(!report.deleted_definition);
        assert_eq!(report.removed_from, vec!["/lists/a".to_string()]);
        assert_eq!(report.retained.len(), 1);
        assert!(matches!(
            report.retained[0].reason,
            RetainReason::HasItems { count: 1 }
        ));

        // The definition survives at root and /lists/b keeps its link.
        assert!(repo.find_content_type(&Scope::Root, &target.id).is_some());
        assert_eq!(repo.usages_of(&target.id).len(), 1);
    }

    #[test]
    fn test_list_with_items_is_never_touched() {
        let (mut repo, target) = repo_with_definition();
        repo.add_web("w1");
        repo.add_list("w1", "/lists/a").unwrap();
        link_into_list(&mut repo, &target.id, "/lists/a");
        repo.add_item("/lists/a", target.id.derive(&[0x01]), "item").unwrap();

        let report = delete_if_unused(&mut repo, &target).unwrap();

        assert!(!report.deleted_definition);
        assert!(report.removed_from.is_empty());
        assert_eq!(report.retained.len(), 1);
        assert_eq!(repo.usages_of(&target.id).len(), 1);
    }

    #[test]
    fn test_non_list_usage_is_retained() {
        let (mut repo, target) = repo_with_definition();
        repo.record_usage(Usage {
            content_type_id: target.id.clone(),
            anchor: UsageAnchor::Web("w1".to_string()),
        });

        let report = delete_if_unused(&mut repo, &target).unwrap();

        assert!(!report.deleted_definition);
        assert_eq!(report.retained.len(), 1);
        assert_eq!(report.retained[0].reason, RetainReason::NonListUsage);
        assert!(repo.find_content_type(&Scope::Root, &target.id).is_some());
    }

    #[test]
    fn test_missing_entity_errors() {
        let mut repo = SiteRepository::new();
        let target = ContentTypeRef {
            id: id("0x0100"),
            scope: Scope::Root,
        };
        assert!(delete_if_unused(&mut repo, &target).is_err());
    }
}
