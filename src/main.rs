use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use naija_tts_backend::infrastructure::config::{Config, LogFormat};
use naija_tts_backend::infrastructure::http::{build_router, start_http_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Naija TTS Backend on {}:{}",
        config.host,
        config.port
    );

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate shared state
    tracing::info!("Instantiating shared state...");
    let voice_registry = Arc::new(naija_tts_backend::domain::voice::VoiceRegistry::with_builtin_voices(
        &config.default_voice,
    ));
    let usage_repo = Arc::new(naija_tts_backend::infrastructure::repositories::UsageRepository::new());
    let cache = config.tts_cache_enabled.then(|| {
        naija_tts_backend::infrastructure::cache::AudioCache::new(
            config.tts_cache_max_entries,
            config.tts_cache_dir.clone(),
        )
    });
    let gate = Arc::new(naija_tts_backend::infrastructure::auth::ApiKeyGate::new(
        config.api_keys.clone(),
    ));

    if gate.is_open() {
        tracing::warn!("API_KEYS is empty, /speak is open to everyone");
    }

    // 2. Instantiate engines
    tracing::info!("Instantiating TTS engines...");
    let backoff = Duration::from_millis(config.retry_backoff_ms);
    let registrations = naija_tts_backend::infrastructure::engines::build_engines(&config)
        .await
        .into_iter()
        .map(|engine| {
            naija_tts_backend::domain::tts::EngineRegistration::new(engine, config.max_retries, backoff)
        })
        .collect();
    let cascade = naija_tts_backend::domain::tts::EngineCascade::new(registrations, usage_repo.clone());

    // 3. Instantiate services
    tracing::info!("Instantiating services...");
    let tts_service = Arc::new(naija_tts_backend::domain::tts::TtsService::new(
        voice_registry.clone(),
        usage_repo.clone(),
        cascade,
        cache,
    ));
    let voice_service = Arc::new(naija_tts_backend::domain::voice::VoiceService::new(
        voice_registry.clone(),
        config.voice_samples_dir.clone(),
    ));

    // 4. Instantiate controllers
    tracing::info!("Instantiating controllers...");
    let health_controller = Arc::new(naija_tts_backend::controllers::health::HealthController::new(
        voice_registry.clone(),
        usage_repo.clone(),
        tts_service.engine_names(),
        config.tts_cache_enabled,
        !gate.is_open(),
    ));
    let tts_controller = Arc::new(naija_tts_backend::controllers::tts::TtsController::new(
        tts_service,
        voice_registry.default_voice_id().to_string(),
        naija_tts_backend::domain::shared::tier::TextLimits::new(
            config.demo_max_text_length,
            config.max_text_length,
        ),
    ));
    let voice_controller = Arc::new(naija_tts_backend::controllers::voices::VoiceController::new(
        voice_service,
    ));

    // Start HTTP server with all routes
    let router = build_router(gate, health_controller, tts_controller, voice_controller);
    start_http_server(config, router).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "naija_tts_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "naija_tts_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
