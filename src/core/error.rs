use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification the poll loop branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Non-200 status or the request never completed.
    Transport,
    /// The JSON body does not have the expected structure.
    Shape,
    /// A homework record is incomplete or carries an unknown status.
    Domain,
    /// The API answered without a `homeworks` key. Nothing to report yet.
    Empty,
}

#[derive(Debug, Error)]
pub enum BotError {
    #[error("API endpoint returned {status} {reason}: {body}")]
    EndpointStatus {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("request to \"{url}\" with params \"{params}\" failed: {source}")]
    Connection {
        url: String,
        params: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected API response: {0}")]
    UnexpectedResponse(String),

    #[error("API response has no homeworks")]
    EmptyAnswers,

    #[error("homework has no \"{0}\" field")]
    MissingField(&'static str),

    #[error("unknown homework status: {0}")]
    UnknownStatus(String),
}

impl BotError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BotError::EndpointStatus { .. } | BotError::Connection { .. } => ErrorKind::Transport,
            BotError::UnexpectedResponse(_) => ErrorKind::Shape,
            BotError::MissingField(_) | BotError::UnknownStatus(_) => ErrorKind::Domain,
            BotError::EmptyAnswers => ErrorKind::Empty,
        }
    }

    /// Whether the failure is worth a chat message.
    pub fn should_notify(&self) -> bool {
        self.kind() != ErrorKind::Empty
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let status = BotError::EndpointStatus {
            status: 500,
            reason: "Internal Server Error".to_string(),
            body: String::new(),
        };
        assert_eq!(status.kind(), ErrorKind::Transport);
        assert_eq!(
            BotError::UnexpectedResponse("x".to_string()).kind(),
            ErrorKind::Shape
        );
        assert_eq!(BotError::MissingField("status").kind(), ErrorKind::Domain);
        assert_eq!(
            BotError::UnknownStatus("done".to_string()).kind(),
            ErrorKind::Domain
        );
        assert_eq!(BotError::EmptyAnswers.kind(), ErrorKind::Empty);
    }

    #[test]
    fn test_only_empty_answers_is_silent() {
        assert!(!BotError::EmptyAnswers.should_notify());
        assert!(BotError::MissingField("homework_name").should_notify());
        assert!(BotError::UnexpectedResponse("not an object".to_string()).should_notify());
    }

    #[test]
    fn test_endpoint_status_message_includes_code_reason_and_body() {
        let err = BotError::EndpointStatus {
            status: 503,
            reason: "Service Unavailable".to_string(),
            body: "maintenance".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("503"));
        assert!(message.contains("Service Unavailable"));
        assert!(message.contains("maintenance"));
    }

    #[test]
    fn test_missing_credentials_lists_all_names() {
        let err = ConfigError::MissingCredentials(vec!["PRACTICUM_TOKEN", "TELEGRAM_CHAT_ID"]);
        assert_eq!(
            err.to_string(),
            "missing required environment variables: PRACTICUM_TOKEN, TELEGRAM_CHAT_ID"
        );
    }
}
