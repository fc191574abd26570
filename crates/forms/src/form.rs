//! The contract every entity form implements.
//!
//! An [`EntityForm`] ties together the draft a screen edits, the record the
//! backend returns, the payload it accepts, and an optional lookup list the
//! screen needs for its selects. [`FormController`](crate::controller::FormController)
//! drives any implementation through the same mount/edit/save lifecycle.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;
use verdant_core::error::CoreError;

pub trait EntityForm: Send + Sync + 'static {
    /// In-memory working state while the form is open.
    type Draft: Default + Clone + PartialEq + Debug + Send + Sync;
    /// Record returned by `GET /{RESOURCE}/{id}` and by create/update.
    type Remote: DeserializeOwned + Debug + Send + Sync;
    /// Body sent on create/update.
    type Payload: Serialize + Debug + Send + Sync;
    /// Entry of the lookup list fetched at mount.
    type Reference: DeserializeOwned + Clone + Debug + Send + Sync;

    /// Resource path segment, e.g. `projects`.
    const RESOURCE: &'static str;

    /// Resource of the lookup list, if the form needs one.
    const REFERENCE_RESOURCE: Option<&'static str> = None;

    /// Map a fetched record into a draft.
    fn hydrate(remote: &Self::Remote) -> Self::Draft;

    /// Validate a draft and build its submission payload. Never mutates the
    /// draft.
    fn to_payload(draft: &Self::Draft) -> Result<Self::Payload, CoreError>;
}
