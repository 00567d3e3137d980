//! Squad player records.

use serde::{Deserialize, Serialize};

use crate::resource::{
    AttachmentRule, AttachmentSpec, Encoding, Envelope, FieldSpec, Record, RecordId, Resource,
    Routes,
};

/// A first-team player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    pub player_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_image: Option<String>,
}

impl Record for Player {
    fn id(&self) -> &RecordId {
        &self.id
    }

    fn image_path(&self) -> Option<&str> {
        self.player_image.as_deref()
    }
}

/// Players collection. Every new player needs a photo.
pub struct Players;

const PLAYER_FIELDS: &[FieldSpec] = &[FieldSpec::text("playerName", "Player name").required()];

impl Resource for Players {
    type Record = Player;

    const SINGULAR: &'static str = "player";
    const PLURAL: &'static str = "players";

    fn routes() -> Routes {
        Routes::standard("players")
    }

    fn envelope() -> Envelope {
        Envelope::keyed("players", &["player", "data"])
    }

    fn fields() -> &'static [FieldSpec] {
        PLAYER_FIELDS
    }

    fn attachment() -> Option<AttachmentSpec> {
        Some(AttachmentSpec::new(
            "playerImage",
            AttachmentRule::RequiredOnCreate,
        ))
    }

    fn encoding() -> Encoding {
        Encoding::Multipart
    }
}
