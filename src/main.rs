// Video link extractor HTTP service
//
// Loads a page in headless Chromium, finds the "play all" anchor and answers
// with its link. Listens on port 3001 unless configured otherwise.

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use video_link_extractor::{ChromiumLauncher, ExtractorConfig, serve};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "video_link_extractor=info,chromiumoxide::conn=off".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = match ExtractorConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };
    info!(
        "Starting video link extractor (headless: {}, locator timeout: {}s)",
        config.headless(),
        config.locator_timeout().as_secs()
    );

    let launcher = ChromiumLauncher::from_config(&config);
    if let Err(e) = serve(config, launcher).await {
        error!("Server error: {:#}", e);
        std::process::exit(1);
    }
}
