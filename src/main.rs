use std::error::Error;

use ai_improver_service::{
    AiImprover, CycleError, FileDocument, config::default_config::options_from_env, telemetry,
};
use tracing::{Level, error, info};
use tracing_subscriber::{Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Page rewritten when `IMPROVER_PAGE` is not set.
const DEFAULT_PAGE: &str = "index.html";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env is fine; everything has a default.
    dotenvy::dotenv().ok();

    let filter = telemetry::env_filter_with_level("info", Level::DEBUG);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_filter(
            tracing_subscriber::filter::filter_fn(|meta| {
                !meta.target().starts_with(telemetry::TARGET_PREFIX)
            }),
        ))
        .with(telemetry::layer())
        .init();

    let improver = AiImprover::from_options(options_from_env()?)?;
    let page = std::env::var("IMPROVER_PAGE").unwrap_or_else(|_| DEFAULT_PAGE.to_string());

    let mut doc = FileDocument::new(&page);
    let current = doc.read()?;
    info!(
        page = %page,
        endpoint = %improver.config().endpoint_url,
        model = %improver.config().model_id,
        gpu_layers = improver.config().gpu_layers,
        "starting improvement cycle"
    );

    match improver.run_cycle(&current, &mut doc).await {
        Ok(html) => {
            info!(page = %page, bytes = html.len(), "page replaced");
            Ok(())
        }
        Err(CycleError::Improve(e)) => {
            error!(page = %page, error = %e, "improvement failed; page left unchanged");
            Err(e.into())
        }
        Err(CycleError::Document(e)) => {
            error!(page = %page, error = %e, "failed to install improved page");
            Err(e.into())
        }
    }
}
