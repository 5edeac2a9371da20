use crate::core::credentials::Credentials;
use crate::core::settings::Settings;
use anyhow::Result;
use std::path::Path;

pub fn run(settings: &Settings, credentials: &Credentials, config_path: Option<&Path>) -> Result<()> {
    let source = Settings::resolve_path(config_path)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());

    println!("Configuration OK ({})", source);
    println!("  Endpoint:      {}", settings.api.endpoint);
    println!("  Telegram API:  {}", settings.telegram.api_url);
    println!("  Chat ID:       {}", credentials.telegram_chat_id);
    println!("  Retry period:  {}s", settings.polling.retry_period_secs);
    println!(
        "  Log file:      {}",
        settings
            .logging
            .file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "none".to_string())
    );

    Ok(())
}
