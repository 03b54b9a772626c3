use studio::config::StudioConfig;
use studio::session::EditingSession;

/// Insert every asset reference given on the command line into a fresh
/// session and print the resulting scene snapshot as JSON.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = match StudioConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };
    if config.api_url.is_none() {
        tracing::warn!("STUDIO_API_URL not set; placement hints and background removal disabled");
    }

    let mut session = match EditingSession::from_config(&config) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(error = %e, "session init failed");
            std::process::exit(1);
        }
    };

    for reference in std::env::args().skip(1) {
        match session.insert_asset(&reference).await {
            Ok(inserted) => tracing::info!(
                asset = %reference,
                id = %inserted.id,
                strategy = ?inserted.placement.strategy,
                "placed"
            ),
            Err(e) => tracing::warn!(asset = %reference, error = %e, "skipped"),
        }
    }

    match serde_json::to_string_pretty(&session.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            tracing::error!(error = %e, "snapshot serialization failed");
            std::process::exit(1);
        }
    }
}
