//! Property-based tests for field-link reordering.
//!
//! These tests use proptest to generate arbitrary link sets and order
//! declarations and verify that the reorder invariants hold for all inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::config::RequiredPolicy;
    use crate::fields::{attach, reorder};
    use crate::id::ContentTypeId;
    use crate::model::{Field, LiveContentType, Scope};
    use crate::repository::SiteRepository;
    use proptest::prelude::*;

    fn build_entity(links: &[(String, bool)]) -> (SiteRepository, LiveContentType) {
        let mut repo = SiteRepository::new();
        let mut entity = LiveContentType::new(
            ContentTypeId::parse("0x0100").unwrap(),
            "Subject",
            Scope::Root,
        );
        repo.add_content_type(entity.clone()).unwrap();
        for (index, (name, hidden)) in links.iter().enumerate() {
            let mut field = Field::new(format!("f-{}", index), name.clone());
            if *hidden {
                field = field.hidden();
            }
            attach(&mut repo, &mut entity, &field, false, RequiredPolicy::Inherit).unwrap();
        }
        (repo, entity)
    }

    /// Link sets with unique names and arbitrary hidden flags.
    fn links_strategy() -> impl Strategy<Value = Vec<(String, bool)>> {
        prop::collection::vec(any::<bool>(), 1..10).prop_map(|hidden_flags| {
            hidden_flags
                .into_iter()
                .enumerate()
                .map(|(index, hidden)| (format!("F{}", index), hidden))
                .collect()
        })
    }

    /// A link set together with a shuffled subset of its visible names.
    fn links_and_order() -> impl Strategy<Value = (Vec<(String, bool)>, Vec<String>)> {
        links_strategy().prop_flat_map(|links| {
            let visible: Vec<String> = links
                .iter()
                .filter(|(_, hidden)| !hidden)
                .map(|(name, _)| name.clone())
                .collect();
            let upper = visible.len();
            (
                Just(links),
                prop::sample::subsequence(visible, 0..=upper).prop_shuffle(),
            )
        })
    }

    /// Like [`links_and_order`], but adjacent links share internal names so
    /// name collisions are exercised.
    fn shared_name_links_and_order() -> impl Strategy<Value = (Vec<(String, bool)>, Vec<String>)> {
        prop::collection::vec(any::<bool>(), 1..10).prop_flat_map(|hidden_flags| {
            let links: Vec<(String, bool)> = hidden_flags
                .into_iter()
                .enumerate()
                .map(|(index, hidden)| (format!("F{}", index / 2), hidden))
                .collect();
            let visible: Vec<String> = links
                .iter()
                .filter(|(_, hidden)| !hidden)
                .map(|(name, _)| name.clone())
                .collect();
            let upper = visible.len();
            (
                Just(links),
                prop::sample::subsequence(visible, 0..=upper).prop_shuffle(),
            )
        })
    }

    proptest! {
        /// Property: reordering never adds, drops, or duplicates links.
        #[test]
        fn reorder_preserves_link_set((links, ordered) in links_and_order()) {
            let (mut repo, mut entity) = build_entity(&links);
            let mut before: Vec<String> = entity
                .field_links
                .iter()
                .map(|l| l.internal_name.clone())
                .collect();

            reorder(&mut repo, &mut entity, &ordered).unwrap();

            let mut after: Vec<String> = entity
                .field_links
                .iter()
                .map(|l| l.internal_name.clone())
                .collect();
            before.sort();
            after.sort();
            prop_assert_eq!(before, after);
        }

        /// Property: links that share an internal name are all kept, each
        /// exactly once.
        #[test]
        fn reorder_preserves_links_sharing_names((links, ordered) in shared_name_links_and_order()) {
            let (mut repo, mut entity) = build_entity(&links);
            let mut before: Vec<(String, String)> = entity
                .field_links
                .iter()
                .map(|l| (l.field_id.to_string(), l.internal_name.clone()))
                .collect();

            reorder(&mut repo, &mut entity, &ordered).unwrap();

            let mut after: Vec<(String, String)> = entity
                .field_links
                .iter()
                .map(|l| (l.field_id.to_string(), l.internal_name.clone()))
                .collect();
            before.sort();
            after.sort();
            prop_assert_eq!(before, after);
        }

        /// Property: hidden links keep their absolute slots.
        #[test]
        fn reorder_pins_hidden_links((links, ordered) in links_and_order()) {
            let (mut repo, mut entity) = build_entity(&links);
            let hidden_before: Vec<(usize, String)> = entity
                .field_links
                .iter()
                .enumerate()
                .filter(|(_, l)| l.hidden)
                .map(|(i, l)| (i, l.internal_name.clone()))
                .collect();

            reorder(&mut repo, &mut entity, &ordered).unwrap();

            let hidden_after: Vec<(usize, String)> = entity
                .field_links
                .iter()
                .enumerate()
                .filter(|(_, l)| l.hidden)
                .map(|(i, l)| (i, l.internal_name.clone()))
                .collect();
            prop_assert_eq!(hidden_before, hidden_after);
        }

        /// Property: declared names that exist on the entity end up in
        /// declaration order within the visible sequence.
        #[test]
        fn reorder_respects_declaration_order((links, ordered) in links_and_order()) {
            let (mut repo, mut entity) = build_entity(&links);

            reorder(&mut repo, &mut entity, &ordered).unwrap();

            let visible = entity.visible_link_names();
            let positions: Vec<usize> = ordered
                .iter()
                .filter_map(|name| visible.iter().position(|v| v == name))
                .collect();
            for pair in positions.windows(2) {
                prop_assert!(pair[0] < pair[1], "declared order violated: {:?}", positions);
            }
        }

        /// Property: reordering twice with the same declaration is stable.
        #[test]
        fn reorder_is_idempotent((links, ordered) in links_and_order()) {
            let (mut repo, mut entity) = build_entity(&links);

            reorder(&mut repo, &mut entity, &ordered).unwrap();
            let first = entity.field_links.clone();
            reorder(&mut repo, &mut entity, &ordered).unwrap();

            prop_assert_eq!(first, entity.field_links);
        }
    }
}
