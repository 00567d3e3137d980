//! Club member (board, staff) records.

use serde::{Deserialize, Serialize};

use crate::resource::{
    AttachmentRule, AttachmentSpec, Encoding, Envelope, FieldSpec, Record, RecordId, Resource,
    Routes, SyncPolicy,
};

/// A club member shown on the members page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    pub member_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl Record for Member {
    fn id(&self) -> &RecordId {
        &self.id
    }

    fn image_path(&self) -> Option<&str> {
        self.member_image.as_deref()
    }
}

/// Members collection.
pub struct Members;

const MEMBER_FIELDS: &[FieldSpec] = &[FieldSpec::text("memberName", "Member name").required()];

impl Resource for Members {
    type Record = Member;

    const SINGULAR: &'static str = "member";
    const PLURAL: &'static str = "members";

    fn routes() -> Routes {
        Routes::standard("members")
    }

    fn envelope() -> Envelope {
        Envelope::keyed("members", &["member", "data"])
    }

    fn fields() -> &'static [FieldSpec] {
        MEMBER_FIELDS
    }

    fn attachment() -> Option<AttachmentSpec> {
        Some(AttachmentSpec::new("memberImage", AttachmentRule::Optional))
    }

    fn encoding() -> Encoding {
        Encoding::Multipart
    }

    fn sync_policy() -> SyncPolicy {
        SyncPolicy::Patch
    }
}
