use crate::core::error::BotError;
use serde_json::Value;

/// Checks the overall shape of an API answer and returns its `homeworks`.
pub fn check_response(response: &Value) -> Result<&[Value], BotError> {
    tracing::debug!("Checking API response");

    let Some(object) = response.as_object() else {
        return Err(BotError::UnexpectedResponse(format!(
            "expected a JSON object, got {}",
            json_type(response)
        )));
    };

    let Some(homeworks) = object.get("homeworks") else {
        return Err(BotError::EmptyAnswers);
    };

    match homeworks {
        Value::Array(items) => Ok(items.as_slice()),
        other => Err(BotError::UnexpectedResponse(format!(
            "\"homeworks\" must be a list, got {}",
            json_type(other)
        ))),
    }
}

/// Server time of the answer, used as the next `from_date`.
pub fn current_date(response: &Value) -> Option<i64> {
    response.get("current_date").and_then(Value::as_i64)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
