/**
 * Access Rules
 *
 * Predicates answering what an identity may do with a document, and the
 * collaborator-set transitions that must respect the ownership invariants.
 * Transitions return a new `Document`; the caller persists it.
 */

use crate::backend::error::BackendError;
use crate::shared::{Document, UserId};

/// Owner, collaborator, or anyone when the document is public
pub fn can_view(doc: &Document, user: UserId) -> bool {
    doc.is_public || can_edit(doc, user)
}

/// Owner or collaborator; public visibility never grants edit
pub fn can_edit(doc: &Document, user: UserId) -> bool {
    doc.owner == user || doc.has_collaborator(user)
}

/// Owner only
pub fn can_manage_collaborators(doc: &Document, user: UserId) -> bool {
    doc.owner == user
}

/// Owner only
pub fn can_delete(doc: &Document, user: UserId) -> bool {
    doc.owner == user
}

/// Add `user` to the collaborator set.
///
/// Adding an existing collaborator returns the document unchanged. The owner
/// cannot be added.
pub fn add_collaborator(doc: &Document, user: UserId) -> Result<Document, BackendError> {
    if doc.owner == user {
        return Err(BackendError::invalid_operation(
            "The owner cannot be added as a collaborator",
        ));
    }
    let mut updated = doc.clone();
    if !updated.has_collaborator(user) {
        updated.collaborators.push(user);
    }
    Ok(updated)
}

/// Remove `user` from the collaborator set.
pub fn remove_collaborator(doc: &Document, user: UserId) -> Result<Document, BackendError> {
    if doc.owner == user {
        return Err(BackendError::forbidden("Cannot remove the document owner"));
    }
    if !doc.has_collaborator(user) {
        return Err(BackendError::not_found("User is not a collaborator"));
    }
    let mut updated = doc.clone();
    updated.collaborators.retain(|id| *id != user);
    Ok(updated)
}

/// Replace the whole collaborator set with `users`.
///
/// Duplicates collapse to one entry; first occurrence order is kept. The
/// owner's id is rejected.
pub fn replace_collaborators(doc: &Document, users: &[UserId]) -> Result<Document, BackendError> {
    let mut collaborators: Vec<UserId> = Vec::with_capacity(users.len());
    for &user in users {
        if user == doc.owner {
            return Err(BackendError::invalid_operation(
                "The owner cannot be added as a collaborator",
            ));
        }
        if !collaborators.contains(&user) {
            collaborators.push(user);
        }
    }
    Ok(Document {
        collaborators,
        ..doc.clone()
    })
}
