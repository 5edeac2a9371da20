use crate::core::error::BotError;
use crate::core::models::{parse_status, PollCursor};
use crate::notifier::Notifier;
use crate::providers::{check_response, current_date, HomeworkSource};
use std::time::Duration;

pub const DEFAULT_RETRY_PERIOD: Duration = Duration::from_secs(600);

/// Prefix of the chat message sent when a cycle fails.
pub const FAILURE_PREFIX: &str = "Сбой в работе программы";

/// What the poller remembers between cycles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportState {
    pub cursor: PollCursor,
    pub last_message: Option<String>,
}

impl ReportState {
    fn is_new(&self, message: &str) -> bool {
        self.last_message.as_deref() != Some(message)
    }
}

/// Result of a single poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A new status message was delivered.
    Notified(String),
    /// The message matched the last one sent, so nothing went out.
    Unchanged,
    /// The notifier failed; the message will be retried next cycle.
    SendFailed(String),
    /// The API returned an empty homework list.
    NoHomeworks,
    /// The API answer had no `homeworks` key.
    EmptyAnswer,
    /// Fetching or parsing failed. `notified` tells whether the chat was told.
    Failed { message: String, notified: bool },
}

pub struct Poller<S, N> {
    source: S,
    notifier: N,
    retry_period: Duration,
    state: ReportState,
}

impl<S, N> Poller<S, N>
where
    S: HomeworkSource,
    N: Notifier,
{
    pub fn new(source: S, notifier: N) -> Self {
        Self {
            source,
            notifier,
            retry_period: DEFAULT_RETRY_PERIOD,
            state: ReportState::default(),
        }
    }

    pub fn with_retry_period(mut self, retry_period: Duration) -> Self {
        self.retry_period = retry_period;
        self
    }

    pub fn with_cursor(mut self, cursor: PollCursor) -> Self {
        self.state.cursor = cursor;
        self
    }

    #[allow(dead_code)]
    pub fn state(&self) -> &ReportState {
        &self.state
    }

    /// Polls forever, sleeping a fixed period after every cycle.
    pub async fn run(&mut self) {
        tracing::info!(
            retry_period = ?self.retry_period,
            cursor = %self.state.cursor,
            "Polling loop started"
        );

        loop {
            match self.run_cycle().await {
                CycleOutcome::Notified(message) => {
                    tracing::info!(text = %message, cursor = %self.state.cursor, "Status change reported")
                }
                CycleOutcome::SendFailed(message) => {
                    tracing::warn!(text = %message, "Status change not delivered, retrying next cycle")
                }
                CycleOutcome::Failed { message, notified } => {
                    tracing::debug!(text = %message, notified, "Poll cycle failed")
                }
                outcome => tracing::debug!(?outcome, "Poll cycle finished"),
            }
            tokio::time::sleep(self.retry_period).await;
        }
    }

    /// A single poll. Errors never escape; they end up in the returned
    /// [`CycleOutcome`].
    #[tracing::instrument(skip_all, fields(cursor = %self.state.cursor))]
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        match self.check().await {
            Ok(Some((message, next_cursor))) => self.report(message, next_cursor).await,
            Ok(None) => {
                tracing::debug!("No homework updates yet");
                CycleOutcome::NoHomeworks
            }
            Err(e) if !e.should_notify() => {
                tracing::debug!(error = %e, "Empty answer from API");
                CycleOutcome::EmptyAnswer
            }
            Err(e) => self.report_failure(e).await,
        }
    }

    async fn check(&self) -> Result<Option<(String, PollCursor)>, BotError> {
        let response = self.source.fetch(self.state.cursor).await?;
        let homeworks = check_response(&response)?;

        let Some(latest) = homeworks.first() else {
            return Ok(None);
        };

        let message = parse_status(latest)?;
        let next_cursor = current_date(&response)
            .map(PollCursor::new)
            .unwrap_or(self.state.cursor);

        Ok(Some((message, next_cursor)))
    }

    async fn report(&mut self, message: String, next_cursor: PollCursor) -> CycleOutcome {
        if !self.state.is_new(&message) {
            tracing::debug!("Homework status unchanged");
            return CycleOutcome::Unchanged;
        }

        if !self.notifier.notify(&message).await {
            return CycleOutcome::SendFailed(message);
        }

        self.state.cursor = next_cursor;
        self.state.last_message = Some(message.clone());
        CycleOutcome::Notified(message)
    }

    async fn report_failure(&mut self, error: BotError) -> CycleOutcome {
        let message = format!("{}: {}", FAILURE_PREFIX, error);
        tracing::error!(kind = ?error.kind(), error = %error, "{}", FAILURE_PREFIX);

        if !self.state.is_new(&message) {
            return CycleOutcome::Failed {
                message,
                notified: false,
            };
        }

        let notified = self.notifier.notify(&message).await;
        self.state.last_message = Some(message.clone());
        CycleOutcome::Failed { message, notified }
    }
}
