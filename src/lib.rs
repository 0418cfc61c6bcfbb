//! # Content Repository Library
//!
//! This library provides a declarative reconciliation engine for the content
//! model of a hierarchical site repository: content types, field links,
//! localized metadata, event bindings, and usage-aware deletion. It is
//! designed to be embedded by provisioning tools that converge a repository
//! toward descriptors rather than scripting individual mutations.
//!
//! ## Quick Example
//!
//! ```
//! use content_repo::config;
//! use content_repo::localize::{StaticResources, StaticVariations};
//! use content_repo::model::Field;
//! use content_repo::provisioner::Provisioner;
//! use content_repo::repository::SiteRepository;
//!
//! // A repository with one site-level field definition.
//! let mut repo = SiteRepository::new();
//! repo.add_field(Field::new("f-title", "Title"));
//!
//! // Display strings come from a resource lookup, not the descriptor.
//! let mut resources = StaticResources::new();
//! resources.insert("core.resx", "ct_invoice_name", "en-US", "Invoice");
//!
//! // Parse a content-type descriptor
//! let descriptor = config::parse(r#"
//! id: "0x0100AB"
//! resource-file: "core.resx"
//! name-key: "ct_invoice_name"
//! fields:
//!   - id: "f-title"
//!     internal-name: Title
//!     required: required
//! "#).unwrap();
//!
//! // Converge the repository toward the descriptor.
//! let provisioner = Provisioner::new(
//!     Box::new(resources),
//!     Box::new(StaticVariations::disabled()),
//! );
//! let target = repo.root_collection();
//! let report = provisioner.apply(&mut repo, &descriptor, &target).unwrap();
//! assert_eq!(report.content_type.unwrap().name, "Invoice");
//! ```
//!
//! ## Core Concepts
//!
//! The library is built around a few key concepts:
//!
//! - **Descriptors (`config`)**: The YAML schema declaring a content type's
//!   identity, resource keys, fields, field order, and event bindings.
//! - **Hierarchical Identity (`id`)**: Byte-string content-type ids whose
//!   prefix structure encodes ancestry, with derived child ids for list links.
//! - **Repository State (`repository`, `model`)**: The live site hierarchy of
//!   webs, lists, collections, fields, and content types the engine mutates.
//! - **Scope Location (`locator`)**: Empirical classification of an opaque
//!   target collection as root-, web-, or list-scoped.
//! - **Provisioning (`provisioner`, `fields`, `events`)**: Idempotent
//!   create-or-reuse of content types, field linking and ordering, and
//!   event-binding reconciliation.
//! - **Localization (`localize`)**: Trait seams for resource lookup and
//!   locale variations, layered so the default locale always wins.
//! - **Deletion (`deletion`)**: Usage-aware removal that only deletes where
//!   provably safe and reports every retained usage.
//!
//! ## Execution Flow
//!
//! The main entry point is [`provisioner::Provisioner::apply`], which
//! executes the following high-level steps:
//!
//! 1.  **Precondition**: Resolve the name key under the default locale;
//!     refuse to act when it is missing or empty.
//! 2.  **Location**: Classify the target collection's scope.
//! 3.  **Ensure**: Create or reuse the content type at that scope, linking a
//!     derived child for list targets (root definition first).
//! 4.  **Fields**: Link declared fields, skipping unresolvable ids, with one
//!     aggregate persist.
//! 5.  **Localization**: Layer name/description/group across variation and
//!     display locales, default last.
//! 6.  **Order and Bindings**: Apply the declared field order and ensure the
//!     declared event bindings.

pub mod config;
pub mod deletion;
pub mod error;
pub mod events;
pub mod fields;
pub mod id;
pub mod localize;
pub mod locator;
pub mod model;
pub mod provisioner;
pub mod repository;

#[cfg(test)]
mod order_proptest;
