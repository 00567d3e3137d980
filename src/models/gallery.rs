//! Gallery and homepage slider images. Both are image-only records.

use serde::{Deserialize, Serialize};

use crate::resource::{
    AttachmentRule, AttachmentSpec, Encoding, Envelope, FieldSpec, Record, RecordId, Resource,
    Routes,
};

/// A picture in the public gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    #[serde(alias = "imageUrl")]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Record for GalleryImage {
    fn id(&self) -> &RecordId {
        &self.id
    }

    fn image_path(&self) -> Option<&str> {
        Some(&self.image)
    }
}

/// Gallery collection. Replacing an image always uploads a new file.
pub struct GalleryImages;

impl Resource for GalleryImages {
    type Record = GalleryImage;

    const SINGULAR: &'static str = "image";
    const PLURAL: &'static str = "images";

    fn routes() -> Routes {
        Routes::standard("gallery").with_list("gallery/getAll")
    }

    fn envelope() -> Envelope {
        Envelope::keyed("images", &["image", "data"])
    }

    fn fields() -> &'static [FieldSpec] {
        &[]
    }

    fn attachment() -> Option<AttachmentSpec> {
        Some(AttachmentSpec::new("image", AttachmentRule::Always))
    }

    fn encoding() -> Encoding {
        Encoding::Multipart
    }
}

/// A homepage slideshow picture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderImage {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    #[serde(alias = "image")]
    pub image_url: String,
}

impl Record for SliderImage {
    fn id(&self) -> &RecordId {
        &self.id
    }

    fn image_path(&self) -> Option<&str> {
        Some(&self.image_url)
    }
}

/// Slider collection. New images are added at `slider/add`.
pub struct SliderImages;

impl Resource for SliderImages {
    type Record = SliderImage;

    const SINGULAR: &'static str = "slider image";
    const PLURAL: &'static str = "slider images";

    fn routes() -> Routes {
        Routes::standard("slider").with_create("slider/add")
    }

    fn envelope() -> Envelope {
        Envelope::keyed("images", &["image", "data"])
    }

    fn fields() -> &'static [FieldSpec] {
        &[]
    }

    fn attachment() -> Option<AttachmentSpec> {
        Some(AttachmentSpec::new("imageUrl", AttachmentRule::Always))
    }

    fn encoding() -> Encoding {
        Encoding::Multipart
    }
}
