use async_openai::{config::OpenAIConfig, Client as OpenAiClient};
use std::sync::Arc;
use std::time::Duration;

use crate::infrastructure::{
    config::Config,
    repositories::{
        CloningTtsRepository, EspeakTtsRepository, OpenAiTtsRepository, PlaceholderTtsRepository,
        PollyTtsRepository, TtsRepository, WebTtsRepository,
    },
};

/// Instantiate the engines named in `TTS_ENGINES`, in order.
///
/// Unknown names and engines that cannot be built are skipped with a warning.
/// The placeholder engine always goes last when enabled.
pub async fn build_engines(config: &Config) -> Vec<Arc<dyn TtsRepository>> {
    let timeout = Duration::from_secs(config.engine_timeout_secs);
    let mut engines: Vec<Arc<dyn TtsRepository>> = Vec::new();

    for name in &config.tts_engines {
        let engine: Option<Arc<dyn TtsRepository>> = match name.as_str() {
            "polly" => Some(Arc::new(PollyTtsRepository::new(Arc::new(
                polly_client(config, timeout).await,
            )))),
            "openai" => match &config.openai_api_key {
                Some(key) => {
                    let client = OpenAiClient::with_config(OpenAIConfig::new().with_api_key(key));
                    Some(Arc::new(OpenAiTtsRepository::new(
                        Arc::new(client),
                        config.openai_tts_model.clone(),
                        timeout,
                    )))
                }
                None => {
                    tracing::warn!("OPENAI_API_KEY not set, skipping openai engine");
                    None
                }
            },
            "xtts" => match &config.xtts_server_url {
                Some(url) => match CloningTtsRepository::new(url.clone(), timeout) {
                    Ok(repo) => Some(Arc::new(repo)),
                    Err(e) => {
                        tracing::warn!(error = %e, "Skipping xtts engine");
                        None
                    }
                },
                None => {
                    tracing::warn!("XTTS_SERVER_URL not set, skipping xtts engine");
                    None
                }
            },
            "web" => match WebTtsRepository::new(config.web_tts_url.clone(), timeout) {
                Ok(repo) => Some(Arc::new(repo)),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping web engine");
                    None
                }
            },
            "espeak" if config.offline_fallback_enabled => Some(Arc::new(
                EspeakTtsRepository::new(config.espeak_binary.clone(), timeout),
            )),
            "espeak" => {
                tracing::info!("Offline fallback disabled, skipping espeak engine");
                None
            }
            // Registered below so it is always last
            "placeholder" => None,
            other => {
                tracing::warn!(engine = other, "Unknown TTS engine in TTS_ENGINES, skipping");
                None
            }
        };

        if let Some(engine) = engine {
            if engines.iter().any(|e| e.name() == engine.name()) {
                tracing::warn!(engine = engine.name(), "Duplicate TTS engine, skipping");
                continue;
            }
            tracing::info!(engine = engine.name(), "TTS engine registered");
            engines.push(engine);
        }
    }

    if config.placeholder_enabled {
        engines.push(Arc::new(PlaceholderTtsRepository));
    }

    if engines.is_empty() {
        tracing::warn!("No TTS engines registered, every /speak request will fail");
    }

    engines
}

async fn polly_client(config: &Config, timeout: Duration) -> aws_sdk_polly::Client {
    tracing::info!("Initializing AWS Polly client with region: {}", config.aws_region);

    let has_access_key = std::env::var("AWS_ACCESS_KEY_ID").is_ok();
    let has_secret_key = std::env::var("AWS_SECRET_ACCESS_KEY").is_ok();
    if !has_access_key || !has_secret_key {
        tracing::warn!("AWS credentials not found in environment variables. Will attempt to use other credential providers (instance metadata, etc.)");
    }

    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.aws_region.clone()))
        .timeout_config(
            aws_config::timeout::TimeoutConfig::builder()
                .operation_timeout(timeout)
                .build(),
        )
        .load()
        .await;

    tracing::info!(region = ?aws_config.region(), "AWS configuration loaded");

    aws_sdk_polly::Client::new(&aws_config)
}
