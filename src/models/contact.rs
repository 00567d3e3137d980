//! Club contact details. The backend keeps a single contact record.

use serde::{Deserialize, Serialize};

use crate::resource::{
    AttachmentRule, AttachmentSpec, Encoding, Envelope, FieldKind, FieldSpec, Record, RecordId,
    Resource, Routes,
};

/// Phone numbers, email, address and crest image shown in the header and footer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    #[serde(default)]
    pub phone_one: String,
    #[serde(default)]
    pub phone_two: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ContactInfo {
    /// Non-empty phone numbers, primary first.
    pub fn phones(&self) -> Vec<&str> {
        [self.phone_one.as_str(), self.phone_two.as_str()]
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .collect()
    }
}

impl Record for ContactInfo {
    fn id(&self) -> &RecordId {
        &self.id
    }

    fn image_path(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

/// Contact info collection.
pub struct ContactInfos;

const CONTACT_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("phoneOne", "Primary phone"),
    FieldSpec::text("phoneTwo", "Secondary phone"),
    FieldSpec::new("email", "Email", FieldKind::Email),
    FieldSpec::text("location", "Location"),
];

impl Resource for ContactInfos {
    type Record = ContactInfo;

    const SINGULAR: &'static str = "contact info";
    const PLURAL: &'static str = "contact info";

    fn routes() -> Routes {
        Routes::standard("contact").with_list("contact/getAll")
    }

    fn envelope() -> Envelope {
        Envelope::keyed("data", &["data", "contact"])
    }

    fn fields() -> &'static [FieldSpec] {
        CONTACT_FIELDS
    }

    fn attachment() -> Option<AttachmentSpec> {
        Some(AttachmentSpec::new("image", AttachmentRule::Optional))
    }

    fn encoding() -> Encoding {
        Encoding::Multipart
    }
}
