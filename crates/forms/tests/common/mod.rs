//! Shared test double for the REST collaborator.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Notify;
use verdant_client::{ClientError, ClientResult, Collaborator};

/// Id assigned to entities created through `POST`.
pub const CREATED_ID: i64 = 101;

/// One request seen by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

/// In-memory collaborator with scripted responses.
///
/// - `GET` returns the value registered for the path, or HTTP 404.
/// - `POST`/`PUT` echo the body back with an `id`, unless writes are set to
///   fail.
/// - Gates hold a request until the test calls `notify_one()`.
#[derive(Default)]
pub struct MockCollaborator {
    entities: HashMap<String, Value>,
    failing_gets: HashSet<String>,
    failing_write_status: Option<u16>,
    get_gate: Option<Arc<Notify>>,
    write_gate: Option<Arc<Notify>>,
    calls: Mutex<Vec<Call>>,
}

impl MockCollaborator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entity(mut self, path: &str, data: Value) -> Self {
        self.entities.insert(path.to_string(), data);
        self
    }

    pub fn failing_get(mut self, path: &str) -> Self {
        self.failing_gets.insert(path.to_string());
        self
    }

    pub fn failing_writes(mut self, status: u16) -> Self {
        self.failing_write_status = Some(status);
        self
    }

    pub fn gate_gets(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.get_gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    pub fn gate_writes(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.write_gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Bodies of every `POST`/`PUT`, in order.
    pub fn written_bodies(&self) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter(|c| c.method != "GET")
            .filter_map(|c| c.body)
            .collect()
    }

    fn record(&self, method: &'static str, path: &str, body: Option<Value>) {
        self.calls.lock().unwrap().push(Call {
            method,
            path: path.to_string(),
            body,
        });
    }

    async fn write(
        &self,
        method: &'static str,
        path: &str,
        body: Value,
        id: i64,
    ) -> ClientResult<Value> {
        self.record(method, path, Some(body.clone()));
        if let Some(gate) = &self.write_gate {
            gate.notified().await;
        }
        if let Some(status) = self.failing_write_status {
            return Err(ClientError::HttpStatus(status));
        }
        let mut echoed = body;
        if let Some(obj) = echoed.as_object_mut() {
            obj.insert("id".to_string(), json!(id));
        }
        Ok(echoed)
    }
}

#[async_trait]
impl Collaborator for MockCollaborator {
    async fn get(&self, path: &str) -> ClientResult<Value> {
        self.record("GET", path, None);
        if let Some(gate) = &self.get_gate {
            gate.notified().await;
        }
        if self.failing_gets.contains(path) {
            return Err(ClientError::HttpStatus(500));
        }
        self.entities
            .get(path)
            .cloned()
            .ok_or(ClientError::HttpStatus(404))
    }

    async fn post(&self, path: &str, body: Value) -> ClientResult<Value> {
        self.write("POST", path, body, CREATED_ID).await
    }

    async fn put(&self, path: &str, body: Value) -> ClientResult<Value> {
        let id = path
            .rsplit('/')
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();
        self.write("PUT", path, body, id).await
    }
}

/// A small tree-species catalogue for reference-list tests.
pub fn species_catalogue() -> Value {
    json!([
        { "id": 7, "commonName": "Acacia", "pricePerTree": 1.25 },
        { "id": 9, "commonName": "Grevillea", "scientificName": "Grevillea robusta" }
    ])
}

/// Wait until `check` holds, yielding to the runtime in between.
pub async fn wait_until<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..1000 {
        if check().await {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}
