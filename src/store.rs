//! Record store contract and the in-memory store.
//!
//! Handlers depend only on [`RecordStore`]. The store decides the status of
//! inserts and deletes; the handlers pass it through untouched.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use http::StatusCode;
use tokio::sync::RwLock;
use tracing::error;

use crate::person::Person;
use crate::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already carries id {0}; ids are assigned by the store")]
    IdAssigned(u64),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Store failures reach the client as a bare `500`.
impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        error!("record store failed: {self}");
        Response::status(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Persistence for person records. Must be safe for concurrent use.
pub trait RecordStore: Send + Sync + 'static {
    /// All records, in the store's order.
    fn list(&self) -> impl Future<Output = Result<Vec<Person>, StoreError>> + Send;

    /// Persists `person` (which carries `id = 0`) and reports the status to send.
    fn insert(&self, person: Person) -> impl Future<Output = Result<StatusCode, StoreError>> + Send;

    /// Removes the record with `id` and reports the status to send.
    fn delete(&self, id: u64) -> impl Future<Output = Result<StatusCode, StoreError>> + Send;

    /// Whether the store is reachable.
    fn ping(&self) -> impl Future<Output = bool> + Send;
}

impl<S: RecordStore> RecordStore for Arc<S> {
    fn list(&self) -> impl Future<Output = Result<Vec<Person>, StoreError>> + Send {
        (**self).list()
    }

    fn insert(&self, person: Person) -> impl Future<Output = Result<StatusCode, StoreError>> + Send {
        (**self).insert(person)
    }

    fn delete(&self, id: u64) -> impl Future<Output = Result<StatusCode, StoreError>> + Send {
        (**self).delete(id)
    }

    fn ping(&self) -> impl Future<Output = bool> + Send {
        (**self).ping()
    }
}

/// Process-local store. Ids count up from 1 and are never reused.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Records>,
}

#[derive(Debug, Default)]
struct Records {
    last_id: u64,
    by_id: BTreeMap<u64, Person>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Person>, StoreError> {
        Ok(self.inner.read().await.by_id.values().cloned().collect())
    }

    async fn insert(&self, mut person: Person) -> Result<StatusCode, StoreError> {
        if person.id != 0 {
            return Err(StoreError::IdAssigned(person.id));
        }
        let mut records = self.inner.write().await;
        records.last_id += 1;
        person.id = records.last_id;
        records.by_id.insert(person.id, person);
        Ok(StatusCode::CREATED)
    }

    /// Deleting an unknown id is not an error.
    async fn delete(&self, id: u64) -> Result<StatusCode, StoreError> {
        self.inner.write().await.by_id.remove(&id);
        Ok(StatusCode::NO_CONTENT)
    }

    async fn ping(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unsaved(first_name: &str) -> Person {
        Person {
            id: 0,
            first_name: first_name.into(),
            last_name: "Doe".into(),
            age: 40,
            address: "Main St".into(),
            workplace: "Mill".into(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let store = MemoryStore::new();
        assert_eq!(store.insert(unsaved("Ann")).await.unwrap(), StatusCode::CREATED);
        assert_eq!(store.insert(unsaved("Ben")).await.unwrap(), StatusCode::CREATED);

        let people = store.list().await.unwrap();
        let ids: Vec<u64> = people.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(people[1].first_name, "Ben");
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = MemoryStore::new();
        store.insert(unsaved("Ann")).await.unwrap();
        store.delete(1).await.unwrap();
        store.insert(unsaved("Ben")).await.unwrap();

        let people = store.list().await.unwrap();
        assert_eq!(people.len(), 1);
        assert_eq!(people[0].id, 2);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryStore::new();
        store.insert(unsaved("Ann")).await.unwrap();
        assert_eq!(store.delete(1).await.unwrap(), StatusCode::NO_CONTENT);
        assert_eq!(store.delete(1).await.unwrap(), StatusCode::NO_CONTENT);
        assert_eq!(store.delete(77).await.unwrap(), StatusCode::NO_CONTENT);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_preassigned_id() {
        let store = MemoryStore::new();
        let mut person = unsaved("Ann");
        person.id = 9;
        assert!(matches!(store.insert(person).await, Err(StoreError::IdAssigned(9))));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn shared_store_is_reachable() {
        let store = Arc::new(MemoryStore::new());
        assert!(store.ping().await);
    }

    #[test]
    fn store_error_is_bare_500() {
        let res = StoreError::Unavailable("connection refused".into()).into_response();
        assert_eq!(res.code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(res.body().is_empty());
    }
}
