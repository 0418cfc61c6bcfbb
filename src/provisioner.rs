//! # Content-Type Provisioner
//!
//! The top-level orchestrator of the reconciliation engine. Given a
//! declarative [`ContentTypeDescriptor`] and a target collection, it
//! creates-or-reuses the content type at the correct scope (enforcing the
//! root-before-list convention), links the declared fields, and layers
//! localized metadata across every discovered locale before persisting.
//!
//! ## Scope handling
//!
//! The locator classifies the target collection empirically. For a
//! list-scoped target the provisioner short-circuits when the type is
//! already linked, silently does nothing when the list does not allow the
//! id, enables content-type support when needed, and links a derived child
//! of the higher-scope definition — forcing that definition into existence
//! at repository root (with a warning) when it is missing. For web- and
//! root-scoped targets the type is created in place or reused.
//!
//! ## Locale layering
//!
//! Display locales are applied in reverse order so the default locale is
//! applied last and wins as the persisted baseline. Variation locales (for
//! a multi-region repository with variations enabled) are applied first and
//! never displace the default.
//!
//! The provisioner is idempotent: re-applying the same descriptor against
//! an unchanged repository performs zero duplicate creations. It provides
//! no isolation — a concurrent actor creating the same id between the
//! existence check and the create call is an accepted limitation.

use crate::config::{ContentTypeDescriptor, EventBindingDescriptor, FieldDescriptor};
use crate::error::{Error, Result};
use crate::events;
use crate::fields;
use crate::id::FieldId;
use crate::localize::{Locale, LocalizationResolver, VariationService};
use crate::locator;
use crate::model::{ContentTypeRef, LiveContentType, Scope};
use crate::repository::{CollectionHandle, SiteRepository};
use log::{debug, info, warn};

/// How an ensure call concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureStatus {
    /// A new entity was created (and, for list targets, linked).
    Created,
    /// The entity already existed and was reused.
    Reused,
    /// The id is not permitted on the target list; nothing was created.
    /// This is a silent no-op, not an error.
    NotAllowed,
}

/// Per-field result of an ensure, distinguishing applied from skipped
/// fields so callers do not have to infer omissions from list lengths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome {
    /// The field resolved at the target scope.
    Applied {
        field_id: FieldId,
        /// False when the link already existed.
        newly_linked: bool,
    },
    /// The field id was not available at the target scope and was skipped.
    Skipped { field_id: FieldId },
}

impl FieldOutcome {
    pub fn field_id(&self) -> &FieldId {
        match self {
            FieldOutcome::Applied { field_id, .. } => field_id,
            FieldOutcome::Skipped { field_id } => field_id,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, FieldOutcome::Applied { .. })
    }
}

/// Structured result of [`Provisioner::ensure_content_type`].
#[derive(Debug, Clone)]
pub struct EnsureReport {
    pub status: EnsureStatus,
    /// The live entity, absent only for [`EnsureStatus::NotAllowed`].
    pub content_type: Option<LiveContentType>,
    pub fields: Vec<FieldOutcome>,
}

/// Orchestrates content-type reconciliation against a repository handle,
/// consulting the localization and variation services it was built with.
pub struct Provisioner {
    resolver: Box<dyn LocalizationResolver>,
    variations: Box<dyn VariationService>,
}

impl Provisioner {
    pub fn new(
        resolver: Box<dyn LocalizationResolver>,
        variations: Box<dyn VariationService>,
    ) -> Self {
        Self {
            resolver,
            variations,
        }
    }

    /// Ensure the described content type exists at the scope the target
    /// collection resolves to, with its declared fields linked and its
    /// localized metadata applied.
    pub fn ensure_content_type(
        &self,
        repo: &mut SiteRepository,
        descriptor: &ContentTypeDescriptor,
        target: &CollectionHandle,
    ) -> Result<EnsureReport> {
        let default_locale = repo.default_locale().clone();
        let title = self
            .resolver
            .resolve(&descriptor.resource_file, &descriptor.name_key, &default_locale)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| Error::InvalidArgument {
                message: format!(
                    "name key '{}' did not resolve to a non-empty string for default locale {}",
                    descriptor.name_key, default_locale
                ),
            })?;

        let scope = match locator::resolve_scope(repo, target) {
            Ok(scope) => scope,
            Err(Error::InvalidScope { message }) => {
                debug!("{}; falling back to root-style creation", message);
                Scope::Root
            }
            Err(other) => return Err(other),
        };

        let (mut entity, status) = match &scope {
            Scope::List(url) => {
                let url = url.clone();
                if let Some(existing) = locator::find_in_scope(repo, &scope, &descriptor.id) {
                    debug!(
                        "content type {} already linked on list {}; returning unchanged",
                        descriptor.id, url
                    );
                    return Ok(EnsureReport {
                        status: EnsureStatus::Reused,
                        content_type: Some(existing.clone()),
                        fields: Vec::new(),
                    });
                }
                if !repo.list_allows(&url, &descriptor.id)? {
                    debug!(
                        "content type {} is not allowed on list {}; nothing to do",
                        descriptor.id, url
                    );
                    return Ok(EnsureReport {
                        status: EnsureStatus::NotAllowed,
                        content_type: None,
                        fields: Vec::new(),
                    });
                }
                repo.enable_content_types(&url)?;

                let web_id = repo.list_web_id(&url)?;
                let definition =
                    match locator::find_definition_above(repo, &web_id, &descriptor.id) {
                        Some(found) => found.clone(),
                        None => {
                            warn!(
                                "content type {} does not exist above list {}; forcing creation at repository root",
                                descriptor.id, url
                            );
                            let forced = LiveContentType::new(
                                descriptor.id.clone(),
                                title.clone(),
                                Scope::Root,
                            );
                            repo.add_content_type(forced.clone())?;
                            forced
                        }
                    };

                let suffix = repo.next_link_suffix();
                let mut linked = LiveContentType::new(
                    definition.id.derive(&suffix),
                    title.clone(),
                    Scope::List(url.clone()),
                );
                linked.parent_id = Some(definition.id.clone());
                linked.field_links = definition.field_links.clone();
                repo.add_content_type(linked.clone())?;
                info!(
                    "linked content type {} into list {} as {}",
                    definition.id, url, linked.id
                );
                (linked, EnsureStatus::Created)
            }
            Scope::Web(_) | Scope::Root => {
                if let Some(existing) = repo.find_content_type(&scope, &descriptor.id) {
                    debug!("content type {} exists at {:?}; reusing", descriptor.id, scope);
                    (existing.clone(), EnsureStatus::Reused)
                } else {
                    let created = LiveContentType::new(
                        descriptor.id.clone(),
                        title.clone(),
                        scope.clone(),
                    );
                    repo.add_content_type(created.clone())?;
                    info!("created content type {} at {:?}", descriptor.id, scope);
                    (created, EnsureStatus::Created)
                }
            }
        };

        let fields = self.link_declared_fields(repo, &mut entity, &descriptor.fields)?;
        self.apply_localized_metadata(repo, &mut entity, descriptor);
        entity.version = repo.update_content_type(&entity)?;

        Ok(EnsureReport {
            status,
            content_type: Some(entity),
            fields,
        })
    }

    /// Ensure the declared fields on an already-provisioned content type.
    ///
    /// Fields are linked in deferred mode and persisted once in aggregate,
    /// and only when at least one link was newly added. Unresolvable field
    /// ids are skipped, never errors.
    pub fn ensure_fields(
        &self,
        repo: &mut SiteRepository,
        target: &ContentTypeRef,
        declared: &[FieldDescriptor],
    ) -> Result<Vec<FieldOutcome>> {
        let mut entity = repo.get_content_type(&target.scope, &target.id)?.clone();
        self.link_declared_fields(repo, &mut entity, declared)
    }

    /// Apply a descriptor end to end: ensure the content type, apply the
    /// declared field order, and ensure the declared event bindings.
    pub fn apply(
        &self,
        repo: &mut SiteRepository,
        descriptor: &ContentTypeDescriptor,
        target: &CollectionHandle,
    ) -> Result<EnsureReport> {
        let mut report = self.ensure_content_type(repo, descriptor, target)?;
        let Some(entity) = report.content_type.take() else {
            return Ok(report);
        };
        let target_ref = entity.to_ref();

        if !descriptor.field_order.is_empty() {
            let mut working = repo.get_content_type(&target_ref.scope, &target_ref.id)?.clone();
            fields::reorder(repo, &mut working, &descriptor.field_order)?;
        }
        self.ensure_declared_bindings(repo, &target_ref, &descriptor.event_bindings)?;

        report.content_type = Some(
            repo.get_content_type(&target_ref.scope, &target_ref.id)?
                .clone(),
        );
        Ok(report)
    }

    fn ensure_declared_bindings(
        &self,
        repo: &mut SiteRepository,
        target: &ContentTypeRef,
        declared: &[EventBindingDescriptor],
    ) -> Result<()> {
        for binding in declared {
            events::ensure_binding(
                repo,
                target,
                binding.kind,
                &binding.assembly,
                &binding.class,
                binding.sync,
            )?;
        }
        Ok(())
    }

    fn link_declared_fields(
        &self,
        repo: &mut SiteRepository,
        entity: &mut LiveContentType,
        declared: &[FieldDescriptor],
    ) -> Result<Vec<FieldOutcome>> {
        let mut outcomes = Vec::with_capacity(declared.len());
        let mut any_added = false;

        for field_descriptor in declared {
            match fields::resolve(repo, &entity.scope, &field_descriptor.id) {
                Some(field) => {
                    let newly_linked =
                        fields::attach(repo, entity, &field, false, field_descriptor.required)?;
                    any_added |= newly_linked;
                    outcomes.push(FieldOutcome::Applied {
                        field_id: field_descriptor.id.clone(),
                        newly_linked,
                    });
                }
                None => {
                    debug!(
                        "field {} ({}) is not available at {:?}; skipping",
                        field_descriptor.id, field_descriptor.internal_name, entity.scope
                    );
                    outcomes.push(FieldOutcome::Skipped {
                        field_id: field_descriptor.id.clone(),
                    });
                }
            }
        }

        if any_added {
            entity.version = repo.update_content_type(entity)?;
        }
        Ok(outcomes)
    }

    /// Apply name/description/group across every relevant locale. The
    /// default locale is applied last so its values win as the persisted
    /// baseline; variation locales go first.
    fn apply_localized_metadata(
        &self,
        repo: &SiteRepository,
        entity: &mut LiveContentType,
        descriptor: &ContentTypeDescriptor,
    ) {
        let main: Vec<Locale> = repo.display_locales().iter().rev().cloned().collect();
        let mut sequence: Vec<Locale> = Vec::new();

        if repo.is_multi_region() && self.variations.is_variation_enabled() {
            for label in self.variations.labels() {
                if !main.contains(&label.language) && !sequence.contains(&label.language) {
                    debug!("including variation locale {}", label.language);
                    sequence.push(label.language);
                }
            }
        }
        sequence.extend(main);

        for locale in &sequence {
            if let Some(name) = self.resolve_non_empty(descriptor, &descriptor.name_key, locale) {
                entity.name = name;
            }
            if let Some(key) = &descriptor.description_key {
                if let Some(description) = self.resolve_non_empty(descriptor, key, locale) {
                    entity.description = description;
                }
            }
            if let Some(key) = &descriptor.group_key {
                if let Some(group) = self.resolve_non_empty(descriptor, key, locale) {
                    entity.group = group;
                }
            }
        }
    }

    fn resolve_non_empty(
        &self,
        descriptor: &ContentTypeDescriptor,
        key: &str,
        locale: &Locale,
    ) -> Option<String> {
        self.resolver
            .resolve(&descriptor.resource_file, key, locale)
            .filter(|value| !value.trim().is_empty())
    }
}
