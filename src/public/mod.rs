//! Read-only client for the public site pages, plus the contact form.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::errors::AppError;
use crate::models::{
    AboutContent, AboutContents, Blog, Blogs, ContactInfo, ContactInfos, GalleryImage,
    GalleryImages, Honor, Honors, LastMatch, LastMatches, Member, Members, NextMatch, NextMatches,
    Player, Players, SliderImages,
};
use crate::resource::{FieldKind, FieldSpec, Record, Resource, ResourceClient};
use crate::transport::{ApiRequest, RequestBody, Transport};

/// A message sent from the public contact page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

const CONTACT_FORM_FIELDS: [FieldSpec; 3] = [
    FieldSpec::text("name", "Name").required(),
    FieldSpec::new("email", "Email", FieldKind::Email).required(),
    FieldSpec::text("message", "Message").required(),
];

impl ContactMessage {
    pub fn validate(&self) -> Result<(), AppError> {
        let values = [&self.name, &self.email, &self.message];
        for (spec, value) in CONTACT_FORM_FIELDS.iter().zip(values) {
            spec.check(&Value::String(value.clone()))?;
        }
        Ok(())
    }
}

/// Fetches what the public pages render.
pub struct PublicSite<T: Transport> {
    transport: T,
    config: Arc<Config>,
}

impl<T: Transport + Sync> PublicSite<T> {
    pub fn new(transport: T, config: Arc<Config>) -> Self {
        Self { transport, config }
    }

    async fn list<R: Resource>(&self) -> Result<Vec<R::Record>, AppError> {
        ResourceClient::<R, &T>::new(&self.transport).list().await
    }

    /// The next `limit` fixtures, in the order the server lists them.
    pub async fn upcoming_matches(&self, limit: usize) -> Result<Vec<NextMatch>, AppError> {
        let mut matches = self.list::<NextMatches>().await?;
        matches.truncate(limit);
        Ok(matches)
    }

    pub async fn latest_results(&self) -> Result<Vec<LastMatch>, AppError> {
        self.list::<LastMatches>().await
    }

    pub async fn players(&self) -> Result<Vec<Player>, AppError> {
        self.list::<Players>().await
    }

    pub async fn members(&self) -> Result<Vec<Member>, AppError> {
        self.list::<Members>().await
    }

    pub async fn honors(&self) -> Result<Vec<Honor>, AppError> {
        self.list::<Honors>().await
    }

    pub async fn gallery(&self) -> Result<Vec<GalleryImage>, AppError> {
        self.list::<GalleryImages>().await
    }

    pub async fn news(&self) -> Result<Vec<Blog>, AppError> {
        self.list::<Blogs>().await
    }

    /// Slideshow image URLs, resolved against the upload host.
    pub async fn slider_urls(&self) -> Result<Vec<String>, AppError> {
        let images = self.list::<SliderImages>().await?;
        Ok(images
            .iter()
            .filter_map(|image| image.image_path())
            .map(|path| self.config.resolve_image_url(path))
            .collect())
    }

    /// The club's contact record, if one has been set up.
    pub async fn contact_info(&self) -> Result<Option<ContactInfo>, AppError> {
        Ok(self.list::<ContactInfos>().await?.into_iter().next())
    }

    pub async fn about(&self) -> Result<Option<AboutContent>, AppError> {
        Ok(self.list::<AboutContents>().await?.into_iter().next())
    }

    /// Member detail page, addressed by slug.
    pub async fn member(&self, slug: &str) -> Result<Member, AppError> {
        self.detail(&format!("members/get/{}", slug), &["data", "member"])
            .await
    }

    /// News article page, addressed by slug.
    pub async fn news_post(&self, slug: &str) -> Result<Blog, AppError> {
        self.detail(&format!("blog/get/{}", slug), &["data", "blog"])
            .await
    }

    pub async fn submit_contact_form(&self, message: &ContactMessage) -> Result<(), AppError> {
        message.validate()?;
        let body = RequestBody::Json(serde_json::to_value(message)?);
        self.transport
            .send(ApiRequest::post("send/submit-form", body))
            .await?
            .error_for_status()?;
        tracing::info!("Contact form submitted by {}", message.email);
        Ok(())
    }

    pub fn image_url(&self, path: &str) -> String {
        self.config.resolve_image_url(path)
    }

    async fn detail<D: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        keys: &[&str],
    ) -> Result<D, AppError> {
        let response = self
            .transport
            .send(ApiRequest::get(path))
            .await?
            .error_for_status()?;

        // Detail routes either wrap the record or return it bare.
        let item = keys
            .iter()
            .filter_map(|key| response.body.get(*key))
            .find(|value| value.is_object())
            .unwrap_or(&response.body);

        Ok(serde_json::from_value(item.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeTransport;
    use serde_json::json;

    fn site(transport: &FakeTransport) -> PublicSite<&FakeTransport> {
        PublicSite::new(transport, Arc::new(Config::default()))
    }

    #[tokio::test]
    async fn test_upcoming_matches_limited() {
        let transport = FakeTransport::new();
        transport.respond(
            200,
            json!({ "matches": [
                { "_id": "1", "homeTeam": "A", "awayTeam": "B", "matchDate": "2025-03-01" },
                { "_id": "2", "homeTeam": "C", "awayTeam": "D", "matchDate": "2025-03-08" },
                { "_id": "3", "homeTeam": "E", "awayTeam": "F", "matchDate": "2025-03-15" }
            ]}),
        );

        let matches = site(&transport).upcoming_matches(2).await.unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[1].home_team, "C");
    }

    #[tokio::test]
    async fn test_news_post_bare_and_wrapped() {
        let transport = FakeTransport::new();
        transport.respond(200, json!({ "slug": "cup-final", "title": "Cup final" }));
        transport.respond(
            200,
            json!({ "data": { "slug": "derby", "title": "Derby day" } }),
        );
        let site = site(&transport);

        assert_eq!(site.news_post("cup-final").await.unwrap().title, "Cup final");
        assert_eq!(site.news_post("derby").await.unwrap().slug.as_str(), "derby");
        assert_eq!(transport.requests()[1].path, "blog/get/derby");
    }

    #[tokio::test]
    async fn test_contact_info_first_record() {
        let transport = FakeTransport::new();
        transport.respond(200, json!({ "data": [] }));
        transport.respond(
            200,
            json!({ "data": [{ "_id": "c1", "email": "info@club.example" }, { "_id": "c2" }] }),
        );
        let site = site(&transport);

        assert!(site.contact_info().await.unwrap().is_none());
        assert_eq!(site.contact_info().await.unwrap().unwrap().id.as_str(), "c1");
    }

    #[tokio::test]
    async fn test_slider_urls_resolved() {
        let transport = FakeTransport::new();
        transport.respond(200, json!({ "images": [{ "_id": "s1", "imageUrl": "slider/one.jpg" }] }));

        let urls = site(&transport).slider_urls().await.unwrap();

        assert_eq!(urls, vec!["http://127.0.0.1:5000/uploads/slider/one.jpg"]);
    }

    #[tokio::test]
    async fn test_contact_form_validation() {
        let transport = FakeTransport::new();
        let message = ContactMessage {
            name: "Jo".to_string(),
            email: "not-an-email".to_string(),
            message: "Trials?".to_string(),
        };

        let err = site(&transport)
            .submit_contact_form(&message)
            .await
            .unwrap_err();

        assert_eq!(err.message(), "Email is not valid");
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_contact_form_submits() {
        let transport = FakeTransport::new();
        transport.respond(200, json!({ "message": "sent" }));
        let message = ContactMessage {
            name: "Jo".to_string(),
            email: "jo@example.com".to_string(),
            message: "Trials?".to_string(),
        };

        site(&transport).submit_contact_form(&message).await.unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.path, "send/submit-form");
        assert_eq!(
            request.body,
            RequestBody::Json(json!({ "name": "Jo", "email": "jo@example.com", "message": "Trials?" }))
        );
    }
}
