mod practicum;
mod validate;

use crate::core::error::BotError;
use crate::core::models::PollCursor;
use async_trait::async_trait;
use serde_json::Value;

pub use practicum::PracticumClient;
pub use validate::{check_response, current_date};

/// Where homework statuses come from.
#[async_trait]
pub trait HomeworkSource: Send + Sync {
    /// Fetches the raw API answer for homeworks updated since `from_date`.
    async fn fetch(&self, from_date: PollCursor) -> Result<Value, BotError>;
}
