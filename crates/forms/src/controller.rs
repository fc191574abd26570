//! Generic form controller: owns one draft for the lifetime of a mounted
//! screen and synchronizes it with the REST API.
//!
//! The only suspension points are the hydration fetch (edit mode, once),
//! the reference-list fetch (once, independent) and the save submission (at
//! most one outstanding). Everything else is a synchronous state transition
//! on the draft followed by a change notification on the revision channel.
//!
//! [`FormController`] is a cheap `Clone` handle; all clones share state.
//! After [`unmount`](FormController::unmount), results of outstanding
//! requests are discarded instead of being written back.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, RwLock};
use tokio_util::sync::CancellationToken;
use verdant_client::{create_entity, fetch_entity, fetch_list, update_entity, Collaborator};
use verdant_core::types::DbId;

use crate::error::{FormError, LastError};
use crate::form::EntityForm;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Everything a screen renders from.
pub struct FormState<F: EntityForm> {
    pub is_edit_mode: bool,
    pub is_loading: bool,
    /// Filled in by [`FormController::snapshot`]; the live flag sits outside
    /// the state lock.
    pub is_saving: bool,
    pub is_loading_references: bool,
    pub last_error: Option<LastError>,
    pub draft: F::Draft,
    /// Lookup list for selects. Empty until loaded or when loading failed.
    pub references: Vec<F::Reference>,
    mounted: bool,
}

impl<F: EntityForm> FormState<F> {
    fn new(is_edit_mode: bool) -> Self {
        Self {
            is_edit_mode,
            is_loading: false,
            is_saving: false,
            is_loading_references: false,
            last_error: None,
            draft: F::Draft::default(),
            references: Vec::new(),
            mounted: false,
        }
    }
}

impl<F: EntityForm> Clone for FormState<F> {
    fn clone(&self) -> Self {
        Self {
            is_edit_mode: self.is_edit_mode,
            is_loading: self.is_loading,
            is_saving: self.is_saving,
            is_loading_references: self.is_loading_references,
            last_error: self.last_error.clone(),
            draft: self.draft.clone(),
            references: self.references.clone(),
            mounted: self.mounted,
        }
    }
}

impl<F: EntityForm> std::fmt::Debug for FormState<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormState")
            .field("is_edit_mode", &self.is_edit_mode)
            .field("is_loading", &self.is_loading)
            .field("is_saving", &self.is_saving)
            .field("is_loading_references", &self.is_loading_references)
            .field("last_error", &self.last_error)
            .field("draft", &self.draft)
            .field("references", &self.references.len())
            .finish()
    }
}

/// Holds the in-flight flag for one save. Dropping it clears the flag,
/// including when the save future itself is dropped mid-request.
struct SaveInFlight<'a> {
    saving: &'a AtomicBool,
}

impl<'a> SaveInFlight<'a> {
    /// Claim the flag, or `None` if another save holds it.
    fn claim(saving: &'a AtomicBool) -> Option<Self> {
        saving
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { saving })
    }
}

impl Drop for SaveInFlight<'_> {
    fn drop(&mut self) {
        self.saving.store(false, Ordering::Release);
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

struct Inner<F: EntityForm, C: ?Sized> {
    entity_id: Option<DbId>,
    client: Arc<C>,
    state: RwLock<FormState<F>>,
    saving: AtomicBool,
    revision: watch::Sender<u64>,
    unmounted: CancellationToken,
}

pub struct FormController<F: EntityForm, C: Collaborator + ?Sized> {
    inner: Arc<Inner<F, C>>,
}

impl<F: EntityForm, C: Collaborator + ?Sized> Clone for FormController<F, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F: EntityForm, C: Collaborator + ?Sized> FormController<F, C> {
    /// Create a controller. Supplying `entity_id` puts it in edit mode.
    ///
    /// Nothing is fetched until [`mount`](Self::mount).
    pub fn new(client: Arc<C>, entity_id: Option<DbId>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                entity_id,
                client,
                state: RwLock::new(FormState::new(entity_id.is_some())),
                saving: AtomicBool::new(false),
                revision,
                unmounted: CancellationToken::new(),
            }),
        }
    }

    pub fn entity_id(&self) -> Option<DbId> {
        self.inner.entity_id
    }

    pub fn is_edit_mode(&self) -> bool {
        self.inner.entity_id.is_some()
    }

    /// Receiver whose value increments on every state change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    /// Current revision number.
    pub fn revision(&self) -> u64 {
        *self.inner.revision.borrow()
    }

    /// Mark the controller dead. Outstanding requests are abandoned and
    /// their results never touch the state.
    pub fn unmount(&self) {
        tracing::debug!(resource = F::RESOURCE, "Form unmounted");
        self.inner.unmounted.cancel();
    }

    pub fn is_unmounted(&self) -> bool {
        self.inner.unmounted.is_cancelled()
    }

    /// Clone of the full state.
    pub async fn snapshot(&self) -> FormState<F> {
        let mut state = self.inner.state.read().await.clone();
        state.is_saving = self.is_saving();
        state
    }

    pub async fn draft(&self) -> F::Draft {
        self.inner.state.read().await.draft.clone()
    }

    pub async fn references(&self) -> Vec<F::Reference> {
        self.inner.state.read().await.references.clone()
    }

    pub async fn last_error(&self) -> Option<LastError> {
        self.inner.state.read().await.last_error.clone()
    }

    /// Whether a save is outstanding. Never waits on the state lock.
    pub fn is_saving(&self) -> bool {
        self.inner.saving.load(Ordering::Acquire)
    }

    /// Clear the error banner.
    pub async fn dismiss_error(&self) {
        let changed = self.inner.state.write().await.last_error.take().is_some();
        if changed {
            self.notify();
        }
    }

    /// Apply a synchronous edit to the draft and notify observers.
    pub async fn update<R>(&self, edit: impl FnOnce(&mut F::Draft) -> R) -> R {
        let out = {
            let mut state = self.inner.state.write().await;
            edit(&mut state.draft)
        };
        self.notify();
        out
    }

    /// Like [`update`](Self::update), with read access to the loaded
    /// reference list.
    pub async fn update_with_references<R>(
        &self,
        edit: impl FnOnce(&mut F::Draft, &[F::Reference]) -> R,
    ) -> R {
        let out = {
            let mut guard = self.inner.state.write().await;
            let state = &mut *guard;
            edit(&mut state.draft, &state.references)
        };
        self.notify();
        out
    }

    // -----------------------------------------------------------------------
    // Mount
    // -----------------------------------------------------------------------

    /// Load the reference list and, in edit mode, hydrate the draft.
    ///
    /// Both run concurrently and fail independently. Only the first call
    /// does anything.
    pub async fn mount(&self) {
        {
            let mut state = self.inner.state.write().await;
            if state.mounted {
                return;
            }
            state.mounted = true;
            state.is_loading = self.is_edit_mode();
            state.is_loading_references = F::REFERENCE_RESOURCE.is_some();
        }
        self.notify();

        tokio::join!(self.load_references(), self.hydrate());
    }

    async fn hydrate(&self) {
        let Some(id) = self.inner.entity_id else {
            return;
        };
        tracing::debug!(resource = F::RESOURCE, id, "Hydrating form");

        let fetched = self
            .until_unmounted(fetch_entity::<F::Remote, C>(
                &*self.inner.client,
                F::RESOURCE,
                id,
            ))
            .await;
        let Some(result) = fetched else {
            tracing::debug!(resource = F::RESOURCE, id, "Discarding hydration after unmount");
            return;
        };

        {
            let mut state = self.inner.state.write().await;
            if self.is_unmounted() {
                return;
            }
            state.is_loading = false;
            match result {
                Ok(remote) => {
                    state.draft = F::hydrate(&remote);
                    tracing::info!(resource = F::RESOURCE, id, "Form hydrated");
                }
                Err(source) => {
                    let err = FormError::Hydration {
                        resource: F::RESOURCE,
                        id,
                        source,
                    };
                    tracing::warn!(error = %err, "Hydration failed, keeping empty draft");
                    state.last_error = err.to_last_error();
                }
            }
        }
        self.notify();
    }

    async fn load_references(&self) {
        let Some(resource) = F::REFERENCE_RESOURCE else {
            return;
        };

        let fetched = self
            .until_unmounted(fetch_list::<F::Reference, C>(&*self.inner.client, resource))
            .await;
        let Some(result) = fetched else {
            return;
        };

        {
            let mut state = self.inner.state.write().await;
            if self.is_unmounted() {
                return;
            }
            state.is_loading_references = false;
            match result {
                Ok(list) => {
                    tracing::debug!(resource, count = list.len(), "Reference list loaded");
                    state.references = list;
                }
                Err(source) => {
                    let err = FormError::ReferenceList { resource, source };
                    tracing::warn!(error = %err, "Reference list unavailable, using empty list");
                    state.references = Vec::new();
                    // Never mask a hydration or save error.
                    if state.last_error.is_none() {
                        state.last_error = err.to_last_error();
                    }
                }
            }
        }
        self.notify();
    }

    // -----------------------------------------------------------------------
    // Save
    // -----------------------------------------------------------------------

    /// Validate the draft and submit it: `PUT` in edit mode, `POST`
    /// otherwise.
    ///
    /// On failure the error is recorded in `last_error` and also returned,
    /// and the draft is left exactly as it was. A call made while another
    /// save is outstanding returns [`FormError::SaveInProgress`], and one
    /// made before hydration has landed returns [`FormError::StillLoading`];
    /// neither changes anything.
    pub async fn save(&self) -> Result<F::Remote, FormError> {
        if self.is_unmounted() {
            return Err(FormError::Unmounted);
        }

        let (payload, in_flight) = {
            let mut state = self.inner.state.write().await;
            if state.is_loading {
                tracing::debug!(resource = F::RESOURCE, "Save ignored, form still loading");
                return Err(FormError::StillLoading);
            }
            let Some(in_flight) = SaveInFlight::claim(&self.inner.saving) else {
                tracing::debug!(resource = F::RESOURCE, "Save ignored, another is in flight");
                return Err(FormError::SaveInProgress);
            };
            // A new attempt supersedes the previous banner.
            state.last_error = None;
            match F::to_payload(&state.draft) {
                Ok(payload) => (payload, in_flight),
                Err(e) => {
                    drop(in_flight);
                    let err = FormError::Invalid(e);
                    tracing::info!(
                        resource = F::RESOURCE,
                        error = %err,
                        "Save blocked by validation"
                    );
                    state.last_error = err.to_last_error();
                    drop(state);
                    self.notify();
                    return Err(err);
                }
            }
        };
        self.notify();

        let client = &*self.inner.client;
        let submitted = match self.inner.entity_id {
            Some(id) => {
                tracing::debug!(resource = F::RESOURCE, id, "Updating entity");
                self.until_unmounted(update_entity::<F::Payload, F::Remote, C>(
                    client,
                    F::RESOURCE,
                    id,
                    &payload,
                ))
                .await
            }
            None => {
                tracing::debug!(resource = F::RESOURCE, "Creating entity");
                self.until_unmounted(create_entity::<F::Payload, F::Remote, C>(
                    client,
                    F::RESOURCE,
                    &payload,
                ))
                .await
            }
        };

        let Some(result) = submitted else {
            tracing::debug!(resource = F::RESOURCE, "Discarding save result after unmount");
            return Err(FormError::Unmounted);
        };

        let outcome = {
            let mut state = self.inner.state.write().await;
            if self.is_unmounted() {
                return Err(FormError::Unmounted);
            }
            match result {
                Ok(remote) => {
                    tracing::info!(
                        resource = F::RESOURCE,
                        id = ?self.inner.entity_id,
                        "Entity saved"
                    );
                    Ok(remote)
                }
                Err(source) => {
                    let err = FormError::Save {
                        resource: F::RESOURCE,
                        source,
                    };
                    tracing::warn!(error = %err, "Save failed, draft preserved");
                    state.last_error = err.to_last_error();
                    Err(err)
                }
            }
        };
        drop(in_flight);
        self.notify();
        outcome
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn notify(&self) {
        self.inner.revision.send_modify(|rev| *rev += 1);
    }

    /// Run `fut` unless the controller is unmounted first.
    async fn until_unmounted<T>(&self, fut: impl Future<Output = T>) -> Option<T> {
        tokio::select! {
            biased;
            _ = self.inner.unmounted.cancelled() => None,
            out = fut => Some(out),
        }
    }
}
