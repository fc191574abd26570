//! Remote collaborator for the Verdant admin client.
//!
//! [`Collaborator`] is the seam between form controllers and the REST API:
//! three verbs on already-unwrapped JSON. [`HttpCollaborator`] implements it
//! over reqwest; tests substitute an in-memory double. The typed helpers
//! below build resource paths and (de)serialize records.

pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod session;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use verdant_core::types::DbId;

pub use config::ClientConfig;
pub use error::ClientError;
pub use http::HttpCollaborator;
pub use session::SessionContext;

/// Convenience type alias for collaborator results.
pub type ClientResult<T> = Result<T, ClientError>;

/// The REST API as seen by the form layer.
///
/// Paths are relative to the API base (e.g. `projects/3`). Every method
/// returns the response `data` with the envelope already removed.
#[async_trait]
pub trait Collaborator: Send + Sync {
    async fn get(&self, path: &str) -> ClientResult<Value>;

    async fn post(&self, path: &str, body: Value) -> ClientResult<Value>;

    async fn put(&self, path: &str, body: Value) -> ClientResult<Value>;
}

/// Path of a single entity: `{resource}/{id}`.
pub fn entity_path(resource: &str, id: DbId) -> String {
    format!("{resource}/{id}")
}

/// `GET /{resource}/{id}` decoded into `T`.
pub async fn fetch_entity<T, C>(client: &C, resource: &str, id: DbId) -> ClientResult<T>
where
    T: DeserializeOwned,
    C: Collaborator + ?Sized,
{
    let data = client.get(&entity_path(resource, id)).await?;
    Ok(serde_json::from_value(data)?)
}

/// `GET /{resource}` decoded into a list of `T`.
///
/// A `null` body decodes as an empty list.
pub async fn fetch_list<T, C>(client: &C, resource: &str) -> ClientResult<Vec<T>>
where
    T: DeserializeOwned,
    C: Collaborator + ?Sized,
{
    let data = client.get(resource).await?;
    if data.is_null() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_value(data)?)
}

/// `POST /{resource}` with `payload`, decoding the created entity.
pub async fn create_entity<P, T, C>(client: &C, resource: &str, payload: &P) -> ClientResult<T>
where
    P: Serialize + ?Sized,
    T: DeserializeOwned,
    C: Collaborator + ?Sized,
{
    let body = serde_json::to_value(payload)?;
    let data = client.post(resource, body).await?;
    Ok(serde_json::from_value(data)?)
}

/// `PUT /{resource}/{id}` with `payload`, decoding the updated entity.
pub async fn update_entity<P, T, C>(
    client: &C,
    resource: &str,
    id: DbId,
    payload: &P,
) -> ClientResult<T>
where
    P: Serialize + ?Sized,
    T: DeserializeOwned,
    C: Collaborator + ?Sized,
{
    let body = serde_json::to_value(payload)?;
    let data = client.put(&entity_path(resource, id), body).await?;
    Ok(serde_json::from_value(data)?)
}
