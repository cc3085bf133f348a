//! Access Control Module
//!
//! This module holds every document access decision in the backend. The
//! functions are pure: they look at a document's owner, collaborator set and
//! public flag, and never touch a store.
//!
//! # Architecture
//!
//! - **`rules`** - predicates (`can_view`, `can_edit`, ...) and the
//!   collaborator-set transitions built on them
//!
//! # Access tiers
//!
//! | Caller | view | edit | manage / delete |
//! |---|---|---|---|
//! | owner | yes | yes | yes |
//! | collaborator | yes | yes | no |
//! | anyone, document public | yes | no | no |
//! | anyone else | no | no | no |
//!
//! `DocumentService` and the realtime join flow consult these and nothing
//! else when deciding what a caller may do.

/// Access predicates and collaborator transitions
pub mod rules;

pub use rules::{
    add_collaborator, can_delete, can_edit, can_manage_collaborators, can_view,
    remove_collaborator, replace_collaborators,
};
