//! Remote collection store: the session's copy of one resource's records.

use crate::errors::AppError;
use crate::resource::{Record, RecordId, Resource, ResourceClient, SyncPolicy};
use crate::transport::Transport;

/// In-memory list of records for resource `R`.
///
/// Only [`Store::load`] talks to the network. The `apply_*` methods patch the
/// list after a mutation the server has already accepted.
pub struct Store<R: Resource> {
    records: Vec<R::Record>,
    loading: bool,
    error: Option<String>,
}

impl<R: Resource> Default for Store<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

impl<R: Resource> Store<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `records`, as if loaded.
    pub fn with_records(records: Vec<R::Record>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    pub fn records(&self) -> &[R::Record] {
        &self.records
    }

    pub fn get(&self, id: &RecordId) -> Option<&R::Record> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn first(&self) -> Option<&R::Record> {
        self.records.first()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True while a collection load is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Banner message from the last failed load.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub(crate) fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    /// Fetch the whole collection and replace the list.
    ///
    /// On failure the previous list is kept and the error message is set.
    /// Nothing is retried.
    pub async fn load<T: Transport>(
        &mut self,
        client: &ResourceClient<R, T>,
    ) -> Result<(), AppError> {
        self.loading = true;
        let result = client.list().await;
        self.loading = false;

        match result {
            Ok(records) => {
                tracing::debug!("Loaded {} {}", records.len(), R::PLURAL);
                self.records = records;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", R::PLURAL, e);
                self.error = Some(e.user_message(&format!("Failed to fetch {}", R::PLURAL)));
                Err(e)
            }
        }
    }

    /// Append a newly created record.
    pub fn apply_created(&mut self, record: R::Record) {
        self.records.push(record);
    }

    /// Replace the record with `id`. Unknown ids leave the list unchanged.
    pub fn apply_updated(&mut self, id: &RecordId, record: R::Record) {
        match self.records.iter_mut().find(|r| r.id() == id) {
            Some(slot) => *slot = record,
            None => tracing::debug!("No {} {} in store to update", R::SINGULAR, id),
        }
    }

    /// Remove the record with `id`; returns whether one was removed.
    pub fn apply_deleted(&mut self, id: &RecordId) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id() != id);
        self.records.len() != before
    }

    pub(crate) async fn sync_created<T: Transport>(
        &mut self,
        client: &ResourceClient<R, T>,
        created: Option<R::Record>,
    ) {
        match (R::sync_policy(), created) {
            (SyncPolicy::Patch, Some(record)) => self.apply_created(record),
            _ => self.reload_after_mutation(client).await,
        }
    }

    pub(crate) async fn sync_updated<T: Transport>(
        &mut self,
        client: &ResourceClient<R, T>,
        id: &RecordId,
        updated: Option<R::Record>,
    ) {
        match (R::sync_policy(), updated) {
            (SyncPolicy::Patch, Some(record)) => self.apply_updated(id, record),
            _ => self.reload_after_mutation(client).await,
        }
    }

    pub(crate) async fn sync_deleted<T: Transport>(
        &mut self,
        client: &ResourceClient<R, T>,
        id: &RecordId,
    ) {
        match R::sync_policy() {
            SyncPolicy::Patch => {
                self.apply_deleted(id);
            }
            SyncPolicy::Refetch => self.reload_after_mutation(client).await,
        }
    }

    async fn reload_after_mutation<T: Transport>(&mut self, client: &ResourceClient<R, T>) {
        // The mutation itself succeeded; a failed reload only sets the banner.
        let _ = self.load(client).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Member, Members};
    use crate::testing::FakeTransport;
    use serde_json::json;

    fn member(id: &str, name: &str) -> Member {
        Member {
            id: RecordId::from(id),
            member_name: name.to_string(),
            member_image: None,
            slug: None,
        }
    }

    #[tokio::test]
    async fn test_load_replaces_list() {
        let transport = FakeTransport::new();
        transport.respond(
            200,
            json!({ "members": [
                { "_id": "1", "memberName": "Alice" },
                { "_id": "2", "memberName": "Bob" }
            ]}),
        );
        let client = ResourceClient::<Members, _>::new(&transport);
        let mut store = Store::<Members>::with_records(vec![member("9", "Old")]);

        store.load(&client).await.unwrap();

        assert_eq!(store.len(), 2);
        assert!(store.get(&RecordId::from("9")).is_none());
        assert!(store.error().is_none());
        assert!(!store.is_loading());
        assert_eq!(transport.last_request().unwrap().path, "members/get");
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_list() {
        let transport = FakeTransport::new();
        transport.respond(500, json!({}));
        let client = ResourceClient::<Members, _>::new(&transport);
        let mut store = Store::<Members>::with_records(vec![member("1", "Alice")]);

        assert!(store.load(&client).await.is_err());

        assert_eq!(store.records(), &[member("1", "Alice")]);
        assert_eq!(store.error(), Some("Failed to fetch members"));
    }

    #[tokio::test]
    async fn test_failed_load_surfaces_server_message() {
        let transport = FakeTransport::new();
        transport.respond(503, json!({ "message": "Database offline" }));
        let client = ResourceClient::<Members, _>::new(&transport);
        let mut store = Store::<Members>::new();

        let _ = store.load(&client).await;

        assert_eq!(store.error(), Some("Database offline"));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_non_json_page_keeps_previous_list() {
        let transport = FakeTransport::new();
        transport.respond(200, json!({ "members": [{ "_id": "1", "memberName": "Alice" }] }));
        // An HTML maintenance page reaches the store as a null body.
        transport.respond(200, serde_json::Value::Null);
        let client = ResourceClient::<Members, _>::new(&transport);
        let mut store = Store::<Members>::new();
        store.load(&client).await.unwrap();

        let err = store.load(&client).await.unwrap_err();

        assert!(matches!(err, AppError::Decode(_)));
        assert_eq!(store.records(), &[member("1", "Alice")]);
        assert_eq!(store.error(), Some("Failed to fetch members"));
    }

    #[test]
    fn test_apply_updated_unknown_id_is_noop() {
        let mut store = Store::<Members>::with_records(vec![member("1", "Alice")]);
        store.apply_updated(&RecordId::from("7"), member("7", "Ghost"));
        assert_eq!(store.records(), &[member("1", "Alice")]);
    }

    #[test]
    fn test_apply_created_appends_and_deleted_removes() {
        let mut store = Store::<Members>::with_records(vec![member("1", "Alice")]);
        store.apply_created(member("2", "Bob"));
        assert_eq!(store.records()[1].member_name, "Bob");

        assert!(store.apply_deleted(&RecordId::from("1")));
        assert!(!store.apply_deleted(&RecordId::from("1")));
        assert_eq!(store.records(), &[member("2", "Bob")]);
    }
}
