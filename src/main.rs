use std::sync::Arc;

use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod error;
mod resolver;
mod services;

use api::routes::{create_router, AppState};
use config::Settings;
use resolver::{ContentStore, Resolver};
use services::{HttpSpeechClient, LibreTranslateClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let addr = settings.bind_addr()?;

    tracing::info!("EduNova resolver v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Starting server on http://{}", addr);
    tracing::info!("Content base: {}", settings.content_base_url);
    tracing::info!("Translation service: {}", settings.translate_url);
    tracing::info!("Speech service: {}", settings.speech_url);

    // One shared HTTP client for all external services
    let http = reqwest::Client::builder()
        .user_agent(concat!("edunova-resolver/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(error::ConfigError::from)?;

    let language = Arc::new(LibreTranslateClient::new(
        http.clone(),
        settings.translate_url.clone(),
        settings.translate_api_key.clone(),
    ));
    let speech = Arc::new(HttpSpeechClient::new(http, settings.speech_url.clone()));

    let resolver = Resolver::new(
        language.clone(),
        language,
        speech,
        ContentStore::new(settings.content_base_url.clone()),
    );

    let state = Arc::new(AppState { resolver });
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
