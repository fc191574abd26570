use verdant_client::ClientError;
use verdant_core::error::CoreError;
use verdant_core::types::DbId;

/// Which recoverable failure a form is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormErrorKind {
    /// The fetch-for-edit failed; the draft stayed at its defaults.
    HydrationFailure,
    /// Validation or the create/update call failed; the draft is intact.
    SaveFailure,
    /// A lookup list failed to load and is treated as empty.
    ReferenceListFailure,
}

/// The error banner state of a form. Persists until dismissed or
/// superseded by a new attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastError {
    pub kind: FormErrorKind,
    pub message: String,
}

/// Errors returned by the network-backed form operations.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("Failed to load {resource} {id}: {source}")]
    Hydration {
        resource: &'static str,
        id: DbId,
        source: ClientError,
    },

    #[error("Failed to save {resource}: {source}")]
    Save {
        resource: &'static str,
        source: ClientError,
    },

    #[error("Failed to load {resource} list: {source}")]
    ReferenceList {
        resource: &'static str,
        source: ClientError,
    },

    /// The draft did not pass save-time validation. Nothing was sent.
    #[error(transparent)]
    Invalid(#[from] CoreError),

    /// Another save is still outstanding; this request was ignored.
    #[error("A save is already in progress")]
    SaveInProgress,

    /// The record being edited has not loaded yet; this request was ignored.
    #[error("The form is still loading")]
    StillLoading,

    /// The form was unmounted; the response was discarded.
    #[error("Form was closed before the request completed")]
    Unmounted,
}

impl FormError {
    /// Banner classification, or `None` for errors that never surface as a
    /// banner.
    pub fn kind(&self) -> Option<FormErrorKind> {
        match self {
            FormError::Hydration { .. } => Some(FormErrorKind::HydrationFailure),
            FormError::Save { .. } | FormError::Invalid(_) => Some(FormErrorKind::SaveFailure),
            FormError::ReferenceList { .. } => Some(FormErrorKind::ReferenceListFailure),
            FormError::SaveInProgress | FormError::StillLoading | FormError::Unmounted => None,
        }
    }

    pub fn to_last_error(&self) -> Option<LastError> {
        self.kind().map(|kind| LastError {
            kind,
            message: self.to_string(),
        })
    }
}
