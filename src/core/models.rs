use crate::core::error::BotError;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "approved",
            HomeworkStatus::Reviewing => "reviewing",
            HomeworkStatus::Rejected => "rejected",
        }
    }

    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(HomeworkStatus::Approved),
            "reviewing" => Ok(HomeworkStatus::Reviewing),
            "rejected" => Ok(HomeworkStatus::Rejected),
            other => Err(BotError::UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fields of one entry of the `homeworks` array the bot cares about.
#[derive(Debug, Clone, Serialize)]
pub struct HomeworkRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub status: HomeworkStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_updated: Option<DateTime<Utc>>,
}

impl HomeworkRecord {
    /// Reads a record out of raw JSON. `homework_name` is checked before `status`.
    pub fn from_json(homework: &Value) -> Result<Self, BotError> {
        let name = match required(homework, "homework_name")? {
            Value::String(s) => s,
            other => {
                return Err(BotError::UnexpectedResponse(format!(
                    "\"homework_name\" is not a string: {}",
                    other
                )))
            }
        };
        let status: HomeworkStatus = match required(homework, "status")? {
            Value::String(s) => s.parse()?,
            other => return Err(BotError::UnknownStatus(other.to_string())),
        };

        Ok(Self {
            id: homework.get("id").and_then(Value::as_i64),
            name: name.to_string(),
            status,
            lesson_name: optional_str(homework, "lesson_name"),
            reviewer_comment: optional_str(homework, "reviewer_comment")
                .filter(|c| !c.is_empty()),
            date_updated: optional_str(homework, "date_updated")
                .and_then(|d| DateTime::parse_from_rfc3339(&d).ok())
                .map(|d| d.with_timezone(&Utc)),
        })
    }

    pub fn message(&self) -> String {
        format!(
            "Изменился статус проверки работы \"{}\". {}",
            self.name,
            self.status.verdict()
        )
    }
}

fn required<'a>(homework: &'a Value, field: &'static str) -> Result<&'a Value, BotError> {
    match homework.get(field) {
        None | Some(Value::Null) => Err(BotError::MissingField(field)),
        Some(value) => Ok(value),
    }
}

fn optional_str(homework: &Value, field: &str) -> Option<String> {
    homework.get(field).and_then(Value::as_str).map(str::to_string)
}

/// Formats the chat message for a single homework entry.
pub fn parse_status(homework: &Value) -> Result<String, BotError> {
    let record = HomeworkRecord::from_json(homework)?;
    tracing::debug!(homework = %record.name, status = %record.status, "Parsed homework status");
    Ok(record.message())
}

/// Unix timestamp sent as `from_date`. Starts at the epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PollCursor(i64);

impl PollCursor {
    pub fn new(timestamp: i64) -> Self {
        Self(timestamp)
    }

    pub fn timestamp(&self) -> i64 {
        self.0
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.0, 0).single()
    }
}

impl fmt::Display for PollCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_status_approved() {
        let homework = json!({"homework_name": "hw1", "status": "approved"});
        assert_eq!(
            parse_status(&homework).unwrap(),
            "Изменился статус проверки работы \"hw1\". Работа проверена: ревьюеру всё понравилось. Ура!"
        );
    }

    #[test]
    fn test_parse_status_all_verdicts() {
        let cases = [
            ("reviewing", "Работа взята на проверку ревьюером."),
            ("rejected", "Работа проверена: у ревьюера есть замечания."),
        ];
        for (status, verdict) in cases {
            let homework = json!({"homework_name": "project_sprint_7", "status": status});
            let message = parse_status(&homework).unwrap();
            assert!(message.starts_with("Изменился статус проверки работы \"project_sprint_7\". "));
            assert!(message.ends_with(verdict));
        }
    }

    #[test]
    fn test_missing_name() {
        let homework = json!({"status": "approved"});
        assert!(matches!(
            parse_status(&homework),
            Err(BotError::MissingField("homework_name"))
        ));

        let homework = json!({"homework_name": null, "status": "approved"});
        assert!(matches!(
            parse_status(&homework),
            Err(BotError::MissingField("homework_name"))
        ));
    }

    #[test]
    fn test_missing_status() {
        let homework = json!({"homework_name": "hw1"});
        assert!(matches!(
            parse_status(&homework),
            Err(BotError::MissingField("status"))
        ));
    }

    #[test]
    fn test_non_string_fields() {
        let homework = json!({"homework_name": 42, "status": "approved"});
        assert!(matches!(
            parse_status(&homework),
            Err(BotError::UnexpectedResponse(_))
        ));

        let homework = json!({"homework_name": "hw1", "status": 1});
        match parse_status(&homework) {
            Err(BotError::UnknownStatus(value)) => assert_eq!(value, "1"),
            other => panic!("expected UnknownStatus, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_status() {
        for status in ["done", "APPROVED", ""] {
            let homework = json!({"homework_name": "hw1", "status": status});
            match parse_status(&homework) {
                Err(BotError::UnknownStatus(value)) => assert_eq!(value, status),
                other => panic!("expected UnknownStatus, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_record_optional_fields() {
        let homework = json!({
            "id": 124,
            "status": "rejected",
            "homework_name": "username__hw_python_oop.zip",
            "reviewer_comment": "Код не по PEP8",
            "date_updated": "2020-02-13T16:42:47Z",
            "lesson_name": "Итоговый проект"
        });
        let record = HomeworkRecord::from_json(&homework).unwrap();
        assert_eq!(record.id, Some(124));
        assert_eq!(record.status, HomeworkStatus::Rejected);
        assert_eq!(record.lesson_name.as_deref(), Some("Итоговый проект"));
        assert_eq!(record.reviewer_comment.as_deref(), Some("Код не по PEP8"));
        assert_eq!(
            record.date_updated,
            Utc.with_ymd_and_hms(2020, 2, 13, 16, 42, 47).single()
        );
    }

    #[test]
    fn test_status_serde_names() {
        let status: HomeworkStatus = serde_json::from_str("\"reviewing\"").unwrap();
        assert_eq!(status, HomeworkStatus::Reviewing);
        assert_eq!(serde_json::to_string(&HomeworkStatus::Approved).unwrap(), "\"approved\"");
    }

    #[test]
    fn test_cursor_defaults_to_epoch() {
        let cursor = PollCursor::default();
        assert_eq!(cursor.timestamp(), 0);
        assert_eq!(
            cursor.as_datetime(),
            Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).single()
        );
    }
}
