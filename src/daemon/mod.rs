mod polling;

use crate::core::credentials::Credentials;
use crate::core::models::PollCursor;
use crate::core::settings::Settings;
use crate::notifier::TelegramNotifier;
use crate::providers::PracticumClient;
use anyhow::Result;

use polling::Poller;

/// Runs the polling loop until Ctrl-C.
pub async fn run(settings: &Settings, credentials: &Credentials, from_date: PollCursor) -> Result<()> {
    tracing::info!(endpoint = %settings.api.endpoint, "Starting homework bot");

    let source = PracticumClient::new(&settings.api, credentials)?;
    let notifier = TelegramNotifier::new(&settings.telegram, credentials)?;
    let mut poller = Poller::new(source, notifier)
        .with_retry_period(settings.polling.retry_period())
        .with_cursor(from_date);

    tokio::select! {
        _ = poller.run() => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!("Received Ctrl-C, shutting down");
        }
    }

    Ok(())
}
