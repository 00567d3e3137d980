//! Messages received through the public contact form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::resource::{Envelope, FieldSpec, Record, RecordId, Resource, Routes, SyncPolicy};

/// An inbox entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mail {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Mail {
    pub fn received_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.created_at.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// First `max_chars` characters of the message, for the inbox table.
    pub fn excerpt(&self, max_chars: usize) -> String {
        let mut chars = self.message.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{}...", head)
        } else {
            head
        }
    }
}

impl Record for Mail {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

/// Inbox. Mails are listed and deleted, never edited.
pub struct Mails;

impl Resource for Mails {
    type Record = Mail;

    const SINGULAR: &'static str = "email";
    const PLURAL: &'static str = "emails";

    fn routes() -> Routes {
        Routes::standard("email").with_list("email/get-mails")
    }

    fn envelope() -> Envelope {
        Envelope::keyed("data", &["data"])
    }

    fn fields() -> &'static [FieldSpec] {
        &[]
    }

    fn sync_policy() -> SyncPolicy {
        SyncPolicy::Patch
    }

    fn writable() -> bool {
        false
    }
}
