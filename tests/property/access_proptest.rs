//! Property-based tests for the access rules

use proptest::prelude::*;
use uuid::Uuid;

use editsync::backend::access::{
    add_collaborator, can_delete, can_edit, can_manage_collaborators, can_view,
    remove_collaborator, replace_collaborators,
};
use editsync::shared::{Document, DocumentKind, UserId};

/// A small pool of identities so generated documents and callers overlap
fn identity() -> impl Strategy<Value = UserId> {
    (0u8..6).prop_map(|n| UserId(Uuid::from_u128(n as u128 + 1)))
}

fn document() -> impl Strategy<Value = Document> {
    (identity(), prop::collection::vec(identity(), 0..5), any::<bool>()).prop_map(
        |(owner, collaborators, is_public)| {
            let mut doc = Document::new(owner, "Doc".into(), String::new(), DocumentKind::Markdown);
            doc.collaborators = collaborators.into_iter().filter(|c| *c != owner).collect();
            doc.collaborators.dedup();
            doc.is_public = is_public;
            doc
        },
    )
}

proptest! {
    #[test]
    fn test_permissions_are_nested(doc in document(), user in identity()) {
        if can_edit(&doc, user) {
            prop_assert!(can_view(&doc, user));
        }
        if can_manage_collaborators(&doc, user) {
            prop_assert!(can_edit(&doc, user));
            prop_assert_eq!(user, doc.owner);
        }
        if can_delete(&doc, user) {
            prop_assert_eq!(user, doc.owner);
        }
    }

    #[test]
    fn test_public_never_grants_edit(doc in document(), user in identity()) {
        let public = Document { is_public: true, ..doc.clone() };
        prop_assert!(can_view(&public, user));
        prop_assert_eq!(can_edit(&public, user), can_edit(&doc, user));
    }

    #[test]
    fn test_owner_cannot_be_removed(doc in document()) {
        prop_assert!(remove_collaborator(&doc, doc.owner).is_err());
    }

    #[test]
    fn test_replace_reflects_exactly_the_new_set(
        doc in document(),
        ids in prop::collection::vec(identity(), 0..6),
    ) {
        let ids: Vec<UserId> = ids.into_iter().filter(|id| *id != doc.owner).collect();
        let updated = replace_collaborators(&doc, &ids).unwrap();

        for id in &ids {
            prop_assert!(updated.collaborators.contains(id));
        }
        for id in &updated.collaborators {
            prop_assert!(ids.contains(id));
        }
        let mut unique = updated.collaborators.clone();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), updated.collaborators.len());
        prop_assert_eq!(updated.owner, doc.owner);
    }

    #[test]
    fn test_add_collaborator_is_idempotent(doc in document(), user in identity()) {
        prop_assume!(user != doc.owner);
        let once = add_collaborator(&doc, user).unwrap();
        let twice = add_collaborator(&once, user).unwrap();
        prop_assert_eq!(once.collaborators.clone(), twice.collaborators);
        prop_assert_eq!(once.collaborators.iter().filter(|c| **c == user).count(), 1);
    }
}
