use anyhow::Result;
use tracing::{info, warn};

use application_tracker::{pipeline, Config, InMemoryMailbox, MessageSource};

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Logs go to stderr so the summary on stdout stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("application_tracker=info")),
        )
        .init();

    let config = Config::load()?;
    info!("Application tracker v{}", application_tracker::VERSION);

    let source = open_source(&config)?;
    let summary = pipeline::run(source.as_ref(), &config)?;
    summary.print();

    Ok(())
}

/// Offline export when configured, Gmail otherwise
fn open_source(config: &Config) -> Result<Box<dyn MessageSource>> {
    if let Some(path) = &config.mailbox_file {
        info!("Reading mailbox export {}", path.display());
        let mailbox = InMemoryMailbox::from_json_file(path, config.page_size)?;
        if mailbox.is_empty() {
            warn!("Mailbox export {} has no messages", path.display());
        }
        return Ok(Box::new(mailbox));
    }

    open_gmail(config)
}

#[cfg(feature = "gmail")]
fn open_gmail(config: &Config) -> Result<Box<dyn MessageSource>> {
    info!("Using Gmail API at {}", config.gmail_api_url);
    let client = application_tracker::GmailClient::from_token_file(
        &config.token_path,
        &config.gmail_api_url,
        config.page_size,
    )?;
    Ok(Box::new(client))
}

#[cfg(not(feature = "gmail"))]
fn open_gmail(_config: &Config) -> Result<Box<dyn MessageSource>> {
    anyhow::bail!(
        "Gmail support not compiled in. Set TRACKER_MAILBOX_FILE to a mailbox export,\n\
         or rebuild with: cargo build --features gmail"
    )
}
