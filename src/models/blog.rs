//! News posts. Posts are addressed by slug rather than by id.

use serde::{Deserialize, Serialize};

use crate::resource::{Envelope, FieldKind, FieldSpec, Record, RecordId, Resource, Routes};

/// A news article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub slug: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Record for Blog {
    fn id(&self) -> &RecordId {
        &self.slug
    }
}

/// Blog collection. The list endpoint returns a bare array.
pub struct Blogs;

const BLOG_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("title", "Title").required(),
    FieldSpec::new("description", "Description", FieldKind::Text),
    FieldSpec::new("content", "Content", FieldKind::RichText).required(),
];

impl Resource for Blogs {
    type Record = Blog;

    const SINGULAR: &'static str = "blog post";
    const PLURAL: &'static str = "blog posts";

    fn routes() -> Routes {
        Routes::standard("blog").with_list("blog/get/all")
    }

    fn envelope() -> Envelope {
        Envelope::bare(&["blog", "data"])
    }

    fn fields() -> &'static [FieldSpec] {
        BLOG_FIELDS
    }
}
