use std::process::ExitCode;

use tracing::{Level, error};
use tracing_subscriber::{
    Layer, filter::filter_fn, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine; the process environment may carry everything.
    let dotenv = dotenvy::dotenv();

    let filter = ai_llm_service::telemetry::env_filter_with_level("info", Level::INFO);
    let app_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_filter(filter_fn(|meta| {
            !ai_llm_service::telemetry::is_provider_target(meta.target())
        }));

    tracing_subscriber::registry()
        .with(filter)
        .with(app_layer)
        .with(ai_llm_service::telemetry::layer())
        .init();

    if let Err(e) = dotenv {
        if !e.not_found() {
            error!(error = %e, ".env could not be loaded");
            return ExitCode::FAILURE;
        }
    }

    match api::start().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, code = e.error_code(), "sakhi backend stopped with an error");
            ExitCode::FAILURE
        }
    }
}
