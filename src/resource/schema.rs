//! Field schema: how each scalar form field is defaulted, parsed and checked.

use chrono::{NaiveDate, NaiveTime};
use serde_json::{Map, Value};

use crate::errors::AppError;

/// Draft field values keyed by wire name.
pub type Fields = Map<String, Value>;

/// Kind of a scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// HTML produced by the rich-text editor; stored as-is
    RichText,
    Email,
    /// Whole number; empty input means zero
    Number,
    /// `YYYY-MM-DD`
    Date,
    /// `HH:MM`
    Time,
    /// One of a fixed set of values; the first is the default
    Choice(&'static [&'static str]),
}

/// One editable field of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Wire name, e.g. `homeTeam`
    pub name: &'static str,
    /// Human label used in validation messages
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
        }
    }

    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(&self) -> Value {
        match self.kind {
            FieldKind::Number => Value::from(0),
            FieldKind::Choice(options) => {
                Value::String(options.first().copied().unwrap_or_default().to_string())
            }
            _ => Value::String(String::new()),
        }
    }

    /// Convert raw form input into a field value.
    pub fn parse(&self, raw: &str) -> Result<Value, AppError> {
        match self.kind {
            FieldKind::Number => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Ok(Value::from(0));
                }
                trimmed.parse::<i64>().map(Value::from).map_err(|_| {
                    AppError::Validation(format!("{} must be a whole number", self.label))
                })
            }
            FieldKind::Choice(options) => {
                if options.contains(&raw) {
                    Ok(Value::String(raw.to_string()))
                } else {
                    Err(AppError::Validation(format!(
                        "{} must be one of: {}",
                        self.label,
                        options.join(", ")
                    )))
                }
            }
            FieldKind::Date => Ok(Value::String(date_part(raw).to_string())),
            _ => Ok(Value::String(raw.to_string())),
        }
    }

    /// Copy a field out of a stored record. Missing values become the default.
    pub fn from_record(&self, value: Option<&Value>) -> Value {
        match (self.kind, value) {
            (_, None) | (_, Some(Value::Null)) => self.default_value(),
            (FieldKind::Date, Some(Value::String(s))) => Value::String(date_part(s).to_string()),
            (FieldKind::Number, Some(Value::String(s))) => {
                s.trim().parse::<i64>().map(Value::from).unwrap_or_else(|_| Value::from(0))
            }
            (_, Some(value)) => value.clone(),
        }
    }

    /// Client-side validation run before a submission.
    pub fn check(&self, value: &Value) -> Result<(), AppError> {
        let text = value_text(value);
        let text = text.trim();

        if text.is_empty() {
            if self.required {
                return Err(AppError::Validation(format!("{} is required", self.label)));
            }
            return Ok(());
        }

        let valid = match self.kind {
            FieldKind::Date => NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok(),
            FieldKind::Time => NaiveTime::parse_from_str(text, "%H:%M").is_ok(),
            FieldKind::Email => is_plausible_email(text),
            FieldKind::Number => value.is_i64() || text.parse::<i64>().is_ok(),
            FieldKind::Choice(options) => options.contains(&text),
            FieldKind::Text | FieldKind::RichText => true,
        };

        if valid {
            Ok(())
        } else {
            Err(AppError::Validation(format!("{} is not valid", self.label)))
        }
    }
}

/// Whether attachments are optional or required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentRule {
    Optional,
    /// New records need an image; edits may keep the stored one
    RequiredOnCreate,
    /// Every submission uploads a new image
    Always,
}

/// The single image attachment a resource may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentSpec {
    /// Multipart field name, e.g. `memberImage`
    pub field: &'static str,
    pub rule: AttachmentRule,
}

impl AttachmentSpec {
    pub const fn new(field: &'static str, rule: AttachmentRule) -> Self {
        Self { field, rule }
    }

    pub fn is_required(&self, editing: bool) -> bool {
        match self.rule {
            AttachmentRule::Optional => false,
            AttachmentRule::RequiredOnCreate => !editing,
            AttachmentRule::Always => true,
        }
    }
}

/// Default values for every field in `specs`.
pub fn default_fields(specs: &[FieldSpec]) -> Fields {
    specs
        .iter()
        .map(|spec| (spec.name.to_string(), spec.default_value()))
        .collect()
}

/// Schema fields copied out of a serialized record.
pub fn fields_from_value(specs: &[FieldSpec], record: &Value) -> Fields {
    specs
        .iter()
        .map(|spec| (spec.name.to_string(), spec.from_record(record.get(spec.name))))
        .collect()
}

/// Text form of a value, as sent in multipart bodies.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn date_part(raw: &str) -> &str {
    let raw = raw.trim();
    raw.split_once('T').map(|(date, _)| date).unwrap_or(raw)
}

fn is_plausible_email(text: &str) -> bool {
    match text.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !text.contains(' ')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const STATUSES: &[&str] = &["upcoming", "live"];

    #[test]
    fn test_number_parse() {
        let spec = FieldSpec::new("winCount", "Win count", FieldKind::Number);
        assert_eq!(spec.parse("").unwrap(), json!(0));
        assert_eq!(spec.parse(" 4 ").unwrap(), json!(4));
        assert_eq!(
            spec.parse("four").unwrap_err().message(),
            "Win count must be a whole number"
        );
    }

    #[test]
    fn test_choice_parse() {
        let spec = FieldSpec::new("status", "Status", FieldKind::Choice(STATUSES));
        assert_eq!(spec.default_value(), json!("upcoming"));
        assert_eq!(spec.parse("live").unwrap(), json!("live"));
        assert!(spec.parse("abandoned").is_err());
    }

    #[test]
    fn test_date_is_cut_from_timestamp() {
        let spec = FieldSpec::new("lastWinDate", "Last win date", FieldKind::Date);
        assert_eq!(
            spec.from_record(Some(&json!("2023-05-20T00:00:00.000Z"))),
            json!("2023-05-20")
        );
        assert_eq!(spec.from_record(None), json!(""));
        assert!(spec.check(&json!("2023-05-20")).is_ok());
        assert!(spec.check(&json!("20/05/2023")).is_err());
    }

    #[test]
    fn test_required_check() {
        let spec = FieldSpec::text("memberName", "Member name").required();
        assert_eq!(
            spec.check(&json!("   ")).unwrap_err().message(),
            "Member name is required"
        );
        assert!(spec.check(&json!("Alice")).is_ok());
    }

    #[test]
    fn test_email_and_time_checks() {
        let email = FieldSpec::new("email", "Email", FieldKind::Email);
        assert!(email.check(&json!("club@example.com")).is_ok());
        assert!(email.check(&json!("club.example.com")).is_err());
        assert!(email.check(&json!("")).is_ok());

        let time = FieldSpec::new("matchTime", "Kick-off time", FieldKind::Time);
        assert!(time.check(&json!("19:45")).is_ok());
        assert!(time.check(&json!("7pm")).is_err());
    }

    #[test]
    fn test_fields_from_value() {
        let specs = [
            FieldSpec::text("tournamentName", "Tournament").required(),
            FieldSpec::new("winCount", "Win count", FieldKind::Number),
        ];
        let record = json!({ "_id": "h1", "tournamentName": "League Cup", "winCount": "3" });
        let fields = fields_from_value(&specs, &record);

        assert_eq!(fields.len(), 2);
        assert_eq!(fields["tournamentName"], json!("League Cup"));
        assert_eq!(fields["winCount"], json!(3));
        assert!(!fields.contains_key("_id"));
    }

    #[test]
    fn test_attachment_rules() {
        let on_create = AttachmentSpec::new("playerImage", AttachmentRule::RequiredOnCreate);
        assert!(on_create.is_required(false));
        assert!(!on_create.is_required(true));
        assert!(AttachmentSpec::new("image", AttachmentRule::Always).is_required(true));
    }
}
