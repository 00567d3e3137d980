//! Upcoming fixtures and past results.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::resource::{Envelope, FieldKind, FieldSpec, Record, RecordId, Resource, Routes};

/// Status of an upcoming fixture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    #[default]
    Upcoming,
    Live,
    Postponed,
    Cancelled,
}

impl MatchStatus {
    pub const ALL: &'static [&'static str] = &["upcoming", "live", "postponed", "cancelled"];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Upcoming => "upcoming",
            MatchStatus::Live => "live",
            MatchStatus::Postponed => "postponed",
            MatchStatus::Cancelled => "cancelled",
        }
    }
}

/// A scheduled match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextMatch {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    #[serde(default)]
    pub league: String,
    pub home_team: String,
    pub away_team: String,
    pub match_date: String,
    #[serde(default)]
    pub match_time: String,
    #[serde(default)]
    pub status: MatchStatus,
}

impl NextMatch {
    pub fn match_day(&self) -> Option<NaiveDate> {
        parse_day(&self.match_date)
    }

    pub fn kick_off(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(self.match_time.trim(), "%H:%M").ok()
    }
}

impl Record for NextMatch {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

/// A played match with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMatch {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    #[serde(default)]
    pub league: String,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub home_score: i64,
    #[serde(default)]
    pub away_score: i64,
    #[serde(default)]
    pub match_date: String,
}

impl LastMatch {
    pub fn match_day(&self) -> Option<NaiveDate> {
        parse_day(&self.match_date)
    }

    pub fn scoreline(&self) -> String {
        format!(
            "{} {} - {} {}",
            self.home_team, self.home_score, self.away_score, self.away_team
        )
    }
}

impl Record for LastMatch {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let day = raw.split_once('T').map(|(d, _)| d).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Upcoming fixtures collection.
pub struct NextMatches;

const NEXT_MATCH_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("league", "League"),
    FieldSpec::text("homeTeam", "Home team").required(),
    FieldSpec::text("awayTeam", "Away team").required(),
    FieldSpec::new("matchDate", "Match date", FieldKind::Date).required(),
    FieldSpec::new("matchTime", "Kick-off time", FieldKind::Time),
    FieldSpec::new("status", "Status", FieldKind::Choice(MatchStatus::ALL)),
];

impl Resource for NextMatches {
    type Record = NextMatch;

    const SINGULAR: &'static str = "match";
    const PLURAL: &'static str = "matches";

    fn routes() -> Routes {
        Routes::standard("nextmatch").with_list("nextmatch/getAll")
    }

    fn envelope() -> Envelope {
        Envelope::keyed("matches", &["match", "data"])
    }

    fn fields() -> &'static [FieldSpec] {
        NEXT_MATCH_FIELDS
    }
}

/// Results collection.
pub struct LastMatches;

const LAST_MATCH_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("league", "League"),
    FieldSpec::text("homeTeam", "Home team").required(),
    FieldSpec::text("awayTeam", "Away team").required(),
    FieldSpec::new("homeScore", "Home score", FieldKind::Number),
    FieldSpec::new("awayScore", "Away score", FieldKind::Number),
    FieldSpec::new("matchDate", "Match date", FieldKind::Date),
];

impl Resource for LastMatches {
    type Record = LastMatch;

    const SINGULAR: &'static str = "result";
    const PLURAL: &'static str = "results";

    fn routes() -> Routes {
        Routes::standard("lastmatch")
    }

    fn envelope() -> Envelope {
        Envelope::keyed("matches", &["match", "data"])
    }

    fn fields() -> &'static [FieldSpec] {
        LAST_MATCH_FIELDS
    }
}
