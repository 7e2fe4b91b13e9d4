use axum::{
    extract::DefaultBodyLimit,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::any::Any;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{
    controllers::{
        health::HealthController,
        tts::TtsController,
        voices::{VoiceController, MAX_SAMPLE_BYTES},
    },
    error::AppError,
    infrastructure::{
        auth::{api_key_middleware, request_id_middleware, ApiKeyGate},
        config::Config,
    },
};

/// Multipart framing on top of the sample itself
const UPLOAD_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the application router with all routes and middleware
pub fn build_router(
    gate: Arc<ApiKeyGate>,
    health_controller: Arc<HealthController>,
    tts_controller: Arc<TtsController>,
    voice_controller: Arc<VoiceController>,
) -> Router {
    // Speech routes (need an API key when keys are configured)
    let tts_routes = Router::new()
        .route("/speak", get(TtsController::speak).post(TtsController::speak))
        .route("/test", get(TtsController::test))
        .route("/stats", get(TtsController::stats))
        .with_state(tts_controller)
        .layer(middleware::from_fn_with_state(gate.clone(), api_key_middleware));

    // Voice cloning upload (needs an API key when keys are configured)
    let clone_routes = Router::new()
        .route("/clone-voice", post(VoiceController::clone_voice))
        .with_state(voice_controller.clone())
        .layer(DefaultBodyLimit::max(MAX_SAMPLE_BYTES + UPLOAD_OVERHEAD_BYTES))
        .layer(middleware::from_fn_with_state(gate, api_key_middleware));

    // Public routes
    let voice_routes = Router::new()
        .route("/voices", get(VoiceController::list_voices))
        .with_state(voice_controller);

    Router::new()
        .route("/", get(HealthController::index))
        .route("/health", get(HealthController::health))
        .with_state(health_controller)
        .merge(voice_routes)
        .merge(tts_routes)
        .merge(clone_routes)
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    router: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, router).await?;

    Ok(())
}

async fn not_found() -> AppError {
    AppError::NotFound("Endpoint not found".to_string())
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::Internal(format!("handler panicked: {}", detail)).into_response()
}
