//! Nested entity form controllers for the Verdant admin client.
//!
//! A screen creates a [`FormController`] for one [`EntityForm`] (project,
//! farm, tree species), mounts it, drives edits through the draft
//! operations, and calls `save`. Drafts live in memory only; nothing reaches
//! the API until an explicit save.

pub mod controller;
pub mod error;
pub mod farm;
pub mod form;
pub mod project;
pub mod tree_species;

pub use controller::{FormController, FormState};
pub use error::{FormError, FormErrorKind, LastError};
pub use form::EntityForm;
