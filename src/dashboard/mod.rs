//! Dashboard summary counts.

use serde_json::Value;

use crate::errors::AppError;
use crate::transport::{ApiRequest, Transport};

/// Totals shown on the dashboard landing page. `None` means the count failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardCounts {
    pub players: Option<u64>,
    pub members: Option<u64>,
    pub blog_posts: Option<u64>,
    pub contact_messages: Option<u64>,
}

impl DashboardCounts {
    /// Fetch every count. One failing endpoint does not fail the others.
    pub async fn fetch<T: Transport>(transport: &T) -> Self {
        Self {
            players: count(transport, "players/count", "totalPlayers").await,
            members: count(transport, "members/count", "totalMembers").await,
            blog_posts: count(transport, "blog/count", "count").await,
            contact_messages: count(transport, "send/submit-count", "totalContacts").await,
        }
    }
}

async fn count<T: Transport>(transport: &T, path: &str, key: &str) -> Option<u64> {
    match fetch_count(transport, path, key).await {
        Ok(n) => Some(n),
        Err(e) => {
            tracing::warn!("Failed to fetch {}: {}", path, e);
            None
        }
    }
}

async fn fetch_count<T: Transport>(transport: &T, path: &str, key: &str) -> Result<u64, AppError> {
    let response = transport
        .send(ApiRequest::get(path))
        .await?
        .error_for_status()?;

    match response.body.get(key) {
        Some(Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| AppError::Decode(format!("{} is not a count", key))),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| AppError::Decode(format!("{} is not a count", key))),
        _ => Err(AppError::Decode(format!("Missing {} in {} response", key, path))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_counts_tolerate_failures() {
        let transport = FakeTransport::new();
        transport.respond(200, json!({ "totalPlayers": 24 }));
        transport.respond(500, json!({ "message": "boom" }));
        transport.respond(200, json!({ "count": "7" }));
        transport.fail("timed out");

        let counts = DashboardCounts::fetch(&transport).await;

        assert_eq!(
            counts,
            DashboardCounts {
                players: Some(24),
                members: None,
                blog_posts: Some(7),
                contact_messages: None,
            }
        );
        assert_eq!(transport.request_count(), 4);
    }
}
