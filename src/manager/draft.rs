//! Form/edit controller: the single draft record of a manager screen.

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;

use super::store::Store;
use crate::attachment::{validate_image, LocalFile, Preview};
use crate::config::Config;
use crate::errors::AppError;
use crate::resource::{
    default_fields, fields_from_value, value_text, Encoding, Fields, Record, RecordId, Resource,
    ResourceClient,
};
use crate::transport::{FormPayload, RequestBody, Transport};

/// A validated submission ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    /// Set when the draft edits an existing record
    pub editing_id: Option<RecordId>,
    pub body: RequestBody,
}

/// Draft state for resource `R`.
///
/// A draft with an editing id updates that record on submit; without one it
/// creates a new record.
pub struct Draft<R: Resource> {
    fields: Fields,
    editing_id: Option<RecordId>,
    file: Option<LocalFile>,
    preview: Option<Preview>,
    error: Option<String>,
    submitting: bool,
    config: Arc<Config>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Draft<R> {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            fields: default_fields(R::fields()),
            editing_id: None,
            file: None,
            preview: None,
            error: None,
            submitting: false,
            config,
            _resource: PhantomData,
        }
    }

    /// Reset to a blank creation form.
    pub fn start_create(&mut self) {
        self.fields = default_fields(R::fields());
        self.editing_id = None;
        self.file = None;
        self.preview = None;
        self.error = None;
        self.submitting = false;
    }

    /// Load `record` into the form for editing.
    pub fn start_edit(&mut self, record: &R::Record) -> Result<(), AppError> {
        let value = serde_json::to_value(record)?;
        self.fields = fields_from_value(R::fields(), &value);
        self.editing_id = Some(record.id().clone());
        self.file = None;
        self.preview = record
            .image_path()
            .filter(|path| !path.trim().is_empty())
            .map(|path| Preview::Remote(self.config.resolve_image_url(path)));
        self.error = None;
        Ok(())
    }

    /// Abandon an edit and go back to a blank form.
    pub fn cancel_edit(&mut self) {
        self.start_create();
    }

    /// Update one scalar field from raw form input.
    pub fn set_field(&mut self, name: &str, raw: &str) -> Result<(), AppError> {
        let result = match R::field(name) {
            Some(spec) => spec.parse(raw),
            None if is_identifier(name) => Err(AppError::Validation(
                "The identifier of a record cannot be changed".to_string(),
            )),
            None => Err(AppError::Validation(format!(
                "Unknown field '{}' for {}",
                name,
                R::SINGULAR
            ))),
        };

        match result {
            Ok(value) => {
                self.fields.insert(name.to_string(), value);
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.message());
                Err(e)
            }
        }
    }

    /// Attach an image, replacing any earlier pick.
    ///
    /// Rejected files leave the current attachment and preview untouched.
    pub fn set_file(&mut self, file: LocalFile) -> Result<(), AppError> {
        let result = match R::attachment() {
            Some(_) => validate_image(&file, self.config.max_upload_bytes),
            None => Err(AppError::Validation(format!(
                "{} do not take images",
                capitalize(R::PLURAL)
            ))),
        };

        if let Err(e) = result {
            self.error = Some(e.message());
            return Err(e);
        }

        self.preview = Some(Preview::Local(file.data_url()));
        self.file = Some(file);
        self.error = None;
        Ok(())
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn editing_id(&self) -> Option<&RecordId> {
        self.editing_id.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    pub fn file(&self) -> Option<&LocalFile> {
        self.file.as_ref()
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    /// Inline error shown above the form.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True while a submission is in flight; the submit control stays disabled.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Client-side checks run before anything is sent.
    pub fn validate(&self) -> Result<(), AppError> {
        if !R::writable() {
            return Err(AppError::Validation(format!(
                "{} are read-only",
                capitalize(R::PLURAL)
            )));
        }

        for spec in R::fields() {
            let value = self.fields.get(spec.name).cloned().unwrap_or(Value::Null);
            spec.check(&value)?;
        }

        if let Some(attachment) = R::attachment() {
            if attachment.is_required(self.is_editing()) && self.file.is_none() {
                return Err(AppError::Validation("Please select an image".to_string()));
            }
        }

        Ok(())
    }

    /// Validate and mark the draft busy.
    ///
    /// Every successful call must be paired with [`Draft::finish_submit`].
    pub fn begin_submit(&mut self) -> Result<Submission, AppError> {
        if self.submitting {
            return Err(AppError::Busy);
        }

        if let Err(e) = self.validate() {
            self.error = Some(e.message());
            return Err(e);
        }

        self.submitting = true;
        self.error = None;
        Ok(Submission {
            editing_id: self.editing_id.clone(),
            body: self.request_body(),
        })
    }

    /// Release the busy flag. Success clears the form; failure keeps it for a retry.
    pub fn finish_submit(&mut self, outcome: &Result<(), AppError>) {
        self.submitting = false;
        match outcome {
            Ok(()) => self.start_create(),
            Err(e) => {
                self.error = Some(e.user_message(&format!("Failed to save {}", R::SINGULAR)));
            }
        }
    }

    /// Create or update the record on the server and sync `store`.
    pub async fn submit<T: Transport>(
        &mut self,
        client: &ResourceClient<R, T>,
        store: &mut Store<R>,
    ) -> Result<(), AppError> {
        let submission = self.begin_submit()?;
        let in_flight = InFlight(self);

        let outcome = match &submission.editing_id {
            Some(id) => match client.update(id, submission.body).await {
                Ok(updated) => {
                    tracing::info!("Updated {} {}", R::SINGULAR, id);
                    store.sync_updated(client, id, updated).await;
                    Ok(())
                }
                Err(e) => Err(e),
            },
            None => match client.create(submission.body).await {
                Ok(created) => {
                    tracing::info!("Created {}", R::SINGULAR);
                    store.sync_created(client, created).await;
                    Ok(())
                }
                Err(e) => Err(e),
            },
        };

        if let Err(e) = &outcome {
            tracing::warn!("Failed to save {}: {}", R::SINGULAR, e);
        }
        in_flight.0.finish_submit(&outcome);
        outcome
    }

    fn request_body(&self) -> RequestBody {
        match R::encoding() {
            Encoding::Json => {
                let body: Fields = R::fields()
                    .iter()
                    .filter_map(|spec| {
                        self.fields
                            .get(spec.name)
                            .map(|value| (spec.name.to_string(), value.clone()))
                    })
                    .collect();
                RequestBody::Json(Value::Object(body))
            }
            Encoding::Multipart => {
                let fields = R::fields()
                    .iter()
                    .filter_map(|spec| {
                        self.fields
                            .get(spec.name)
                            .map(|value| (spec.name.to_string(), value_text(value)))
                    })
                    .collect();
                let file = match (R::attachment(), &self.file) {
                    (Some(attachment), Some(file)) => {
                        Some((attachment.field.to_string(), file.clone()))
                    }
                    _ => None,
                };
                RequestBody::Multipart(FormPayload { fields, file })
            }
        }
    }
}

/// Releases the busy flag when a submission future is dropped before it completes.
struct InFlight<'a, R: Resource>(&'a mut Draft<R>);

impl<R: Resource> Drop for InFlight<'_, R> {
    fn drop(&mut self) {
        self.0.submitting = false;
    }
}

fn is_identifier(name: &str) -> bool {
    matches!(name, "_id" | "id" | "slug")
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Blogs, Honor, Honors, Mails, Member, Members, Players};
    use crate::testing::{FakeTransport, StalledTransport};
    use crate::transport::Method;
    use serde_json::json;
    use std::time::Duration;

    const PNG: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    fn config() -> Arc<Config> {
        Arc::new(Config::default())
    }

    fn honor() -> Honor {
        Honor {
            id: RecordId::from("h1"),
            tournament_name: "County Cup".to_string(),
            win_count: 3,
            last_win_date: Some("2024-04-27T00:00:00.000Z".to_string()),
        }
    }

    #[test]
    fn test_start_create_resets_everything() {
        let mut draft = Draft::<Honors>::new(config());
        draft.start_edit(&honor()).unwrap();
        draft.set_field("tournamentName", "League Cup").unwrap();

        draft.start_create();

        assert!(draft.editing_id().is_none());
        assert_eq!(draft.field("tournamentName"), Some(&json!("")));
        assert_eq!(draft.field("winCount"), Some(&json!(0)));
        assert_eq!(draft.field("lastWinDate"), Some(&json!("")));
        assert!(draft.file().is_none());
        assert!(draft.preview().is_none());
    }

    #[test]
    fn test_start_edit_copies_fields() {
        let mut draft = Draft::<Honors>::new(config());
        draft.start_edit(&honor()).unwrap();

        assert_eq!(draft.editing_id(), Some(&RecordId::from("h1")));
        assert_eq!(draft.field("tournamentName"), Some(&json!("County Cup")));
        assert_eq!(draft.field("winCount"), Some(&json!(3)));
        assert_eq!(draft.field("lastWinDate"), Some(&json!("2024-04-27")));
    }

    #[test]
    fn test_start_edit_previews_remote_image() {
        let mut draft = Draft::<Members>::new(config());
        let member = Member {
            id: RecordId::from("m1"),
            member_name: "Alice".to_string(),
            member_image: Some("members\\alice.png".to_string()),
            slug: None,
        };

        draft.start_edit(&member).unwrap();

        assert_eq!(
            draft.preview(),
            Some(&Preview::Remote(
                "http://127.0.0.1:5000/uploads/members/alice.png".to_string()
            ))
        );
        assert!(draft.file().is_none());
    }

    #[test]
    fn test_set_field_rejects_identifier_and_unknown() {
        let mut draft = Draft::<Members>::new(config());
        assert!(draft.set_field("_id", "other").is_err());
        assert_eq!(
            draft.error(),
            Some("The identifier of a record cannot be changed")
        );
        assert!(draft.set_field("shirtNumber", "9").is_err());
        assert!(draft.field("_id").is_none());
    }

    #[test]
    fn test_set_file_rejects_non_image() {
        let mut draft = Draft::<Members>::new(config());
        draft
            .set_file(LocalFile::new("crest.png", "image/png", PNG.to_vec()))
            .unwrap();

        let err = draft
            .set_file(LocalFile::new("notes.pdf", "application/pdf", b"%PDF".to_vec()))
            .unwrap_err();

        assert_eq!(err.message(), "notes.pdf is not an image file");
        assert_eq!(draft.file().unwrap().file_name, "crest.png");
        assert!(draft.error().is_some());
    }

    #[test]
    fn test_set_file_sets_local_preview() {
        let mut draft = Draft::<Members>::new(config());
        draft
            .set_file(LocalFile::new("crest.png", "image/png", PNG.to_vec()))
            .unwrap();

        let preview = draft.preview().unwrap();
        assert!(preview.is_local());
        assert!(preview.url().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_set_file_on_resource_without_images() {
        let mut draft = Draft::<Honors>::new(config());
        let err = draft
            .set_file(LocalFile::new("crest.png", "image/png", PNG.to_vec()))
            .unwrap_err();
        assert_eq!(err.message(), "Honors do not take images");
    }

    #[tokio::test]
    async fn test_required_field_blocks_submission() {
        let transport = FakeTransport::new();
        let client = ResourceClient::<Members, _>::new(&transport);
        let mut store = Store::new();
        let mut draft = Draft::<Members>::new(config());

        let err = draft.submit(&client, &mut store).await.unwrap_err();

        assert_eq!(err.message(), "Member name is required");
        assert_eq!(transport.request_count(), 0);
        assert!(!draft.is_submitting());
    }

    #[test]
    fn test_player_needs_image_on_create_only() {
        let mut draft = Draft::<Players>::new(config());
        draft.set_field("playerName", "Sam Keeper").unwrap();
        assert_eq!(
            draft.validate().unwrap_err().message(),
            "Please select an image"
        );

        let player = crate::models::Player {
            id: RecordId::from("p1"),
            player_name: "Sam Keeper".to_string(),
            player_image: Some("players/sam.png".to_string()),
        };
        draft.start_edit(&player).unwrap();
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_read_only_resource_cannot_submit() {
        let mut draft = Draft::<Mails>::new(config());
        assert_eq!(
            draft.begin_submit().unwrap_err().message(),
            "Emails are read-only"
        );
    }

    #[test]
    fn test_busy_guard() {
        let mut draft = Draft::<Blogs>::new(config());
        draft.set_field("title", "Cup run").unwrap();
        draft.set_field("content", "<p>We won.</p>").unwrap();

        let first = draft.begin_submit().unwrap();
        assert!(draft.is_submitting());
        assert_eq!(draft.begin_submit().unwrap_err(), AppError::Busy);

        draft.finish_submit(&Err(AppError::Network("down".to_string())));
        assert!(!draft.is_submitting());
        assert_eq!(draft.error(), Some("Failed to save blog post"));
        assert_eq!(draft.field("title"), Some(&json!("Cup run")));

        let second = draft.begin_submit().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_multipart_body_carries_fields_and_file() {
        let mut draft = Draft::<Members>::new(config());
        draft.set_field("memberName", "Bob").unwrap();
        draft
            .set_file(LocalFile::new("bob.png", "image/png", PNG.to_vec()))
            .unwrap();

        let submission = draft.begin_submit().unwrap();

        match submission.body {
            RequestBody::Multipart(payload) => {
                assert_eq!(payload.text("memberName"), Some("Bob"));
                let (field, file) = payload.file.unwrap();
                assert_eq!(field, "memberImage");
                assert_eq!(file.file_name, "bob.png");
            }
            other => panic!("expected multipart body, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_draft() {
        let transport = FakeTransport::new();
        transport.respond(422, json!({ "message": "Tournament already exists" }));
        let client = ResourceClient::<Honors, _>::new(&transport);
        let mut store = Store::new();
        let mut draft = Draft::<Honors>::new(config());
        draft.set_field("tournamentName", "County Cup").unwrap();
        draft.set_field("lastWinDate", "2024-04-27").unwrap();

        let err = draft.submit(&client, &mut store).await.unwrap_err();

        assert_eq!(err.status(), Some(422));
        assert_eq!(draft.error(), Some("Tournament already exists"));
        assert_eq!(draft.field("tournamentName"), Some(&json!("County Cup")));
        assert_eq!(transport.count_method(Method::Post), 1);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_abandoned_submit_releases_busy_flag() {
        let mut store = Store::new();
        let mut draft = Draft::<Members>::new(config());
        draft.set_field("memberName", "Bob").unwrap();

        let stalled = StalledTransport;
        let stalled_client = ResourceClient::<Members, _>::new(&stalled);
        let timed_out = tokio::time::timeout(
            Duration::from_millis(20),
            draft.submit(&stalled_client, &mut store),
        )
        .await;

        assert!(timed_out.is_err());
        assert!(!draft.is_submitting());
        assert_eq!(draft.field("memberName"), Some(&json!("Bob")));

        let transport = FakeTransport::new();
        transport.respond(201, json!({ "member": { "_id": "m1", "memberName": "Bob" } }));
        let client = ResourceClient::<Members, _>::new(&transport);
        draft.submit(&client, &mut store).await.unwrap();

        assert_eq!(transport.count_method(Method::Post), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_start_create_clears_busy_flag() {
        let mut draft = Draft::<Members>::new(config());
        draft.set_field("memberName", "Bob").unwrap();
        draft.begin_submit().unwrap();

        draft.start_create();

        assert!(!draft.is_submitting());
    }
}
