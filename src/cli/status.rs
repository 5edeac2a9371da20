use crate::core::credentials::Credentials;
use crate::core::error::BotError;
use crate::core::models::{HomeworkRecord, PollCursor};
use crate::core::settings::Settings;
use crate::providers::{check_response, current_date, HomeworkSource, PracticumClient};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct StatusOutput {
    from_date: PollCursor,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_date: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    latest: Option<HomeworkStatusView>,
    #[serde(with = "chrono::serde::ts_seconds")]
    fetched_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct HomeworkStatusView {
    #[serde(flatten)]
    record: HomeworkRecord,
    message: String,
}

/// Fetches once and prints the latest homework status. Never notifies.
pub async fn run(
    settings: &Settings,
    credentials: &Credentials,
    json: bool,
    from_date: PollCursor,
) -> Result<()> {
    let client = PracticumClient::new(&settings.api, credentials)?;
    let response = client.fetch(from_date).await?;
    let output = build_output(&response, from_date)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_text_output(&output);
    }

    Ok(())
}

fn build_output(response: &serde_json::Value, from_date: PollCursor) -> Result<StatusOutput, BotError> {
    let latest = match check_response(response) {
        Ok(homeworks) => homeworks
            .first()
            .map(HomeworkRecord::from_json)
            .transpose()?
            .map(|record| HomeworkStatusView {
                message: record.message(),
                record,
            }),
        Err(BotError::EmptyAnswers) => None,
        Err(e) => return Err(e),
    };

    Ok(StatusOutput {
        from_date,
        current_date: current_date(response),
        latest,
        fetched_at: Utc::now(),
    })
}

fn print_text_output(output: &StatusOutput) {
    let Some(latest) = &output.latest else {
        println!("No homework updates since {}", format_cursor(output.from_date));
        return;
    };

    let record = &latest.record;
    println!("{}", record.name);
    if let Some(lesson) = &record.lesson_name {
        println!("  Lesson:   {}", lesson);
    }
    println!("  Status:   {}", record.status);
    if let Some(updated) = record.date_updated {
        println!("  Updated:  {}", updated.format("%Y-%m-%d %H:%M UTC"));
    }
    if let Some(comment) = &record.reviewer_comment {
        println!("  Comment:  {}", comment);
    }
    println!();
    println!("{}", latest.message);
}

fn format_cursor(cursor: PollCursor) -> String {
    match cursor.as_datetime() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => cursor.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::HomeworkStatus;
    use serde_json::json;

    #[test]
    fn test_build_output_with_homework() {
        let response = json!({
            "homeworks": [{"homework_name": "hw1", "status": "reviewing", "lesson_name": "Спринт 1"}],
            "current_date": 1000
        });

        let output = build_output(&response, PollCursor::default()).unwrap();
        let latest = output.latest.unwrap();
        assert_eq!(latest.record.status, HomeworkStatus::Reviewing);
        assert_eq!(
            latest.message,
            "Изменился статус проверки работы \"hw1\". Работа взята на проверку ревьюером."
        );
        assert_eq!(output.current_date, Some(1000));
    }

    #[test]
    fn test_build_output_without_homework() {
        let output = build_output(&json!({"homeworks": []}), PollCursor::new(5)).unwrap();
        assert!(output.latest.is_none());

        let output = build_output(&json!({}), PollCursor::new(5)).unwrap();
        assert!(output.latest.is_none());
        assert!(output.current_date.is_none());
    }

    #[test]
    fn test_build_output_rejects_bad_shape() {
        assert!(build_output(&json!([]), PollCursor::default()).is_err());
        assert!(matches!(
            build_output(&json!({"homeworks": [{"homework_name": "hw1"}]}), PollCursor::default()),
            Err(BotError::MissingField("status"))
        ));
    }

    #[test]
    fn test_json_output_shape() {
        let response = json!({
            "homeworks": [{"homework_name": "hw1", "status": "approved"}],
            "current_date": 1000
        });
        let output = build_output(&response, PollCursor::new(10)).unwrap();
        let value = serde_json::to_value(&output).unwrap();

        assert_eq!(value["from_date"], 10);
        assert_eq!(value["latest"]["name"], "hw1");
        assert_eq!(value["latest"]["status"], "approved");
        assert!(value["latest"].get("lesson_name").is_none());
        assert!(value["fetched_at"].is_i64());
    }

    #[test]
    fn test_format_cursor() {
        assert_eq!(format_cursor(PollCursor::new(0)), "1970-01-01 00:00 UTC");
        assert_eq!(format_cursor(PollCursor::new(1_000_000_000)), "2001-09-09 01:46 UTC");
    }
}
