//! "About us" page content, a single record edited from the dashboard.

use serde::{Deserialize, Serialize};

use crate::resource::{
    AttachmentRule, AttachmentSpec, Encoding, Envelope, FieldKind, FieldSpec, Record, RecordId,
    Resource, Routes,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutContent {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    #[serde(default)]
    pub about_us_title: String,
    #[serde(default)]
    pub about_us_sub_title: String,
    #[serde(default)]
    pub about_us_header: String,
    #[serde(default)]
    pub about_us_description: String,
    #[serde(default)]
    pub about_us_philosophy_title: String,
    #[serde(default)]
    pub about_us_philosophy_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about_us_image: Option<String>,
}

impl Record for AboutContent {
    fn id(&self) -> &RecordId {
        &self.id
    }

    fn image_path(&self) -> Option<&str> {
        self.about_us_image.as_deref()
    }
}

pub struct AboutContents;

const ABOUT_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("aboutUsTitle", "Title").required(),
    FieldSpec::text("aboutUsSubTitle", "Subtitle"),
    FieldSpec::text("aboutUsHeader", "Header"),
    FieldSpec::new("aboutUsDescription", "Description", FieldKind::RichText),
    FieldSpec::text("aboutUsPhilosophyTitle", "Philosophy title"),
    FieldSpec::new(
        "aboutUsPhilosophyDescription",
        "Philosophy description",
        FieldKind::RichText,
    ),
];

impl Resource for AboutContents {
    type Record = AboutContent;

    const SINGULAR: &'static str = "about content";
    const PLURAL: &'static str = "about content";

    fn routes() -> Routes {
        Routes::standard("about").with_list("about/getAll")
    }

    fn envelope() -> Envelope {
        Envelope::keyed("data", &["data", "about"])
    }

    fn fields() -> &'static [FieldSpec] {
        ABOUT_FIELDS
    }

    fn attachment() -> Option<AttachmentSpec> {
        Some(AttachmentSpec::new("aboutUsImage", AttachmentRule::Optional))
    }

    fn encoding() -> Encoding {
        Encoding::Multipart
    }
}
