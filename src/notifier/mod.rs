mod telegram;

use async_trait::async_trait;

pub use telegram::TelegramNotifier;

/// Delivers chat messages. Failures are logged and reported as `false`,
/// never propagated.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str) -> bool;
}
