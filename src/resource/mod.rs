//! Declarative description of one managed resource.
//!
//! Every admin screen manages a different record type over the same REST
//! shape. A [`Resource`] names its routes, response envelope, field schema and
//! attachment rules so the generic manager never special-cases a resource.

mod client;
mod schema;

pub use client::ResourceClient;
pub use schema::{
    default_fields, fields_from_value, value_text, AttachmentRule, AttachmentSpec, FieldKind,
    FieldSpec, Fields,
};

use std::fmt;

use serde::de::{self, DeserializeOwned, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Server-assigned identifier: a Mongo id, a slug, or a number.
///
/// Accepts both JSON strings and numbers and always renders as a path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl<'de> Visitor<'de> for IdVisitor {
            type Value = RecordId;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a string or integer identifier")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<RecordId, E> {
                Ok(RecordId::new(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<RecordId, E> {
                Ok(RecordId::new(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<RecordId, E> {
                Ok(RecordId::new(v.to_string()))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// A record held in a collection store.
pub trait Record: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync {
    fn id(&self) -> &RecordId;

    /// Relative path of the record's stored image, if any.
    fn image_path(&self) -> Option<&str> {
        None
    }
}

/// How mutation payloads are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Json,
    Multipart,
}

/// How the store is reconciled after a successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPolicy {
    /// Reload the whole collection
    Refetch,
    /// Apply the record returned by the server; reload if none came back
    Patch,
}

/// Route layout of a resource, relative to the API base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    pub list: String,
    pub create: String,
    pub update: String,
    pub delete: String,
}

impl Routes {
    /// `{prefix}/get`, `{prefix}/post`, `{prefix}/update/{id}`, `{prefix}/delete/{id}`.
    pub fn standard(prefix: &str) -> Self {
        Self {
            list: format!("{}/get", prefix),
            create: format!("{}/post", prefix),
            update: format!("{}/update", prefix),
            delete: format!("{}/delete", prefix),
        }
    }

    pub fn with_list(mut self, list: impl Into<String>) -> Self {
        self.list = list.into();
        self
    }

    pub fn with_create(mut self, create: impl Into<String>) -> Self {
        self.create = create.into();
        self
    }

    pub fn update_path(&self, id: &RecordId) -> String {
        format!("{}/{}", self.update, id)
    }

    pub fn delete_path(&self, id: &RecordId) -> String {
        format!("{}/{}", self.delete, id)
    }
}

/// Where the payload sits in a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope {
    /// Key holding the collection array; `None` for a bare array
    pub collection: Option<&'static str>,
    /// Keys that may hold a single record, tried in order
    pub record: &'static [&'static str],
}

impl Envelope {
    pub const fn keyed(collection: &'static str, record: &'static [&'static str]) -> Self {
        Self {
            collection: Some(collection),
            record,
        }
    }

    pub const fn bare(record: &'static [&'static str]) -> Self {
        Self {
            collection: None,
            record,
        }
    }

    /// Extract the collection array.
    ///
    /// A missing or `null` key in an object body is an empty list; a body that
    /// is not an object at all is rejected.
    pub fn collection_items(&self, body: &Value) -> Option<Vec<Value>> {
        let target = match self.collection {
            Some(key) => match body.as_object()?.get(key) {
                None | Some(Value::Null) => return Some(Vec::new()),
                Some(inner) => inner,
            },
            None => body,
        };
        target.as_array().cloned()
    }

    /// Extract a single record object, if the body carries one.
    ///
    /// With no record keys the body itself is the record.
    pub fn record_item<'a>(&self, body: &'a Value) -> Option<&'a Value> {
        if self.record.is_empty() {
            return body.as_object().map(|_| body);
        }
        self.record
            .iter()
            .filter_map(|key| body.get(*key))
            .find(|value| value.is_object())
    }
}

/// Declarative description of one resource type.
pub trait Resource: Send + Sync + 'static {
    type Record: Record;

    /// Singular name used in messages, e.g. `member`
    const SINGULAR: &'static str;
    /// Plural name used in messages, e.g. `members`
    const PLURAL: &'static str;

    fn routes() -> Routes;

    fn envelope() -> Envelope;

    /// Editable scalar fields, in form order.
    fn fields() -> &'static [FieldSpec];

    fn attachment() -> Option<AttachmentSpec> {
        None
    }

    fn encoding() -> Encoding {
        Encoding::Json
    }

    fn sync_policy() -> SyncPolicy {
        SyncPolicy::Refetch
    }

    /// Read-only resources can only be listed and deleted.
    fn writable() -> bool {
        true
    }

    fn field(name: &str) -> Option<&'static FieldSpec> {
        Self::fields().iter().find(|spec| spec.name == name)
    }
}
