//! Trophy cabinet.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::resource::{Envelope, FieldKind, FieldSpec, Record, RecordId, Resource, Routes};

/// A tournament the club has won, with its tally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Honor {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    pub tournament_name: String,
    #[serde(default)]
    pub win_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_win_date: Option<String>,
}

impl Honor {
    pub fn last_win_day(&self) -> Option<NaiveDate> {
        let raw = self.last_win_date.as_deref()?;
        let day = raw.split_once('T').map(|(d, _)| d).unwrap_or(raw);
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }
}

impl Record for Honor {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

/// Honors collection.
pub struct Honors;

const HONOR_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("tournamentName", "Tournament name").required(),
    FieldSpec::new("winCount", "Win count", FieldKind::Number),
    FieldSpec::new("lastWinDate", "Last win date", FieldKind::Date).required(),
];

impl Resource for Honors {
    type Record = Honor;

    const SINGULAR: &'static str = "honor";
    const PLURAL: &'static str = "honors";

    fn routes() -> Routes {
        Routes::standard("honors").with_list("honors/getAll")
    }

    fn envelope() -> Envelope {
        Envelope::keyed("data", &["honor", "data"])
    }

    fn fields() -> &'static [FieldSpec] {
        HONOR_FIELDS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_last_win_day() {
        let honor: Honor = serde_json::from_value(json!({
            "_id": "h1",
            "tournamentName": "County Cup",
            "winCount": 3,
            "lastWinDate": "2024-04-27T00:00:00.000Z"
        }))
        .unwrap();

        assert_eq!(honor.last_win_day(), NaiveDate::from_ymd_opt(2024, 4, 27));
    }
}
