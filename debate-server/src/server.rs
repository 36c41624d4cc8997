use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State, rejection::JsonRejection},
    http::Uri,
    middleware,
    routing::{get, post},
};
use chrono::Utc;
use debate_model::{GeminiModel, Llm};
use debate_rag::RetrievalPipeline;
use debate_synth::{SynthesisMode, Synthesizer};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::{
    config::ServerConfig,
    error::ApiError,
    protocol::{
        CounterArgumentsRequest, CounterArgumentsResponse, HealthResponse, LanguageModelStatus,
        LegacyListResponse, LegacyMessage, LlmDebateRequest, LlmDebateResponse, RagStatusResponse,
        RetrievalStatus,
    },
    rate_limit::{RateLimiter, rate_limit},
    service::DebateService,
    validation::{MIN_STANCE_CHARS, MISSING_COUNTER_ARGUMENT_FIELDS, MISSING_DEBATE_FIELDS, validate_input},
};

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

const FEATURES: &[&str] = &[
    "Web Search Simulation",
    "Semantic Chunking",
    "Vector Similarity Matching",
    "Gemini AI Generation",
    "Source Attribution",
];

const LEGACY_REDIRECT: &str = "Use /api/generate-counter-arguments instead";

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<DebateService>,
    /// `None` disables rate limiting.
    pub limiter: Option<Arc<RateLimiter>>,
}

impl AppState {
    pub fn new(service: DebateService) -> Self {
        Self { service: Arc::new(service), limiter: None }
    }

    pub fn with_rate_limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = Some(Arc::new(limiter));
        self
    }
}

/// Assemble the service graph described by `config`.
pub fn build_state(config: &ServerConfig) -> anyhow::Result<AppState> {
    let mut synthesizer = Synthesizer::new(config.synthesis);
    match &config.language_model {
        Some(settings) => {
            let mut model = GeminiModel::new(settings.api_key.clone(), settings.model.clone())
                .context("failed to configure Gemini model")?
                .with_timeout(settings.timeout)
                .context("failed to build Gemini HTTP client")?;
            if let Some(base_url) = &settings.base_url {
                model = model.with_base_url(base_url.clone());
            }
            info!(model = %settings.model, base_url = model.base_url(), "language model configured");
            synthesizer = synthesizer.with_llm(Arc::new(model) as Arc<dyn Llm>);
        }
        None if config.synthesis == SynthesisMode::LanguageModel => {
            warn!("language model synthesis requested but GEMINI_API_KEY is not set, using keyword heuristic");
        }
        None => {}
    }

    let service = DebateService::new(RetrievalPipeline::mock(config.retrieval.clone()), synthesizer);
    let mut state = AppState::new(service);
    if config.rate_limit.enabled() {
        state = state.with_rate_limiter(RateLimiter::new(
            config.rate_limit.max_requests,
            config.rate_limit.window,
        ));
    }
    Ok(state)
}

pub fn app_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let limited = Router::new()
        .route("/api/generate-counter-arguments", post(generate_counter_arguments))
        .route("/api/llm-debate", post(llm_debate))
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit));

    Router::new()
        .route("/health", get(health))
        .route("/api/rag-status", get(rag_status))
        .route("/api/debates", get(legacy_debates).post(legacy_post))
        .route("/api/ai-debates", get(legacy_ai_debates).post(legacy_post))
        .merge(limited)
        .fallback(not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Bind, serve, and wait for ctrl-c or SIGTERM.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let state = build_state(&config)?;
    let app = app_router(state);
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid host/port {}:{}", config.host, config.port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(
        synthesis = %config.synthesis,
        language_model = config.language_model.is_some(),
        "debate server listening on http://{}",
        addr
    );

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("debate server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}

// ── handlers ────────────────────────────────────────────────────────

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        language_model_configured: state.service.synthesizer().model_name().is_some(),
    })
}

async fn rag_status(State(state): State<AppState>) -> Json<RagStatusResponse> {
    let synthesizer = state.service.synthesizer();
    Json(RagStatusResponse {
        rag_system_active: true,
        features: FEATURES,
        synthesis_mode: synthesizer.mode(),
        language_model: LanguageModelStatus {
            configured: synthesizer.model_name().is_some(),
            model: synthesizer.model_name().map(str::to_string),
        },
        retrieval: RetrievalStatus {
            config: state.service.pipeline().config().clone(),
            scoring: "term_overlap",
        },
    })
}

async fn generate_counter_arguments(
    State(state): State<AppState>,
    body: Result<Json<CounterArgumentsRequest>, JsonRejection>,
) -> Result<Json<CounterArgumentsResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let input = validate_input(
        request.topic.as_deref(),
        request.user_stance.as_deref(),
        MISSING_COUNTER_ARGUMENT_FIELDS,
        MIN_STANCE_CHARS,
    )?;

    let response = state
        .service
        .counter_arguments(&input, request.include_rag.unwrap_or(true))
        .await?;
    Ok(Json(response))
}

async fn llm_debate(
    State(state): State<AppState>,
    body: Result<Json<LlmDebateRequest>, JsonRejection>,
) -> Result<Json<LlmDebateResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    // stances here may be a bare position such as `FOR`
    let input = validate_input(request.topic.as_deref(), request.stance.as_deref(), MISSING_DEBATE_FIELDS, 0)?;

    let response = state.service.converse(&input, &request.conversation_history).await?;
    Ok(Json(response))
}

async fn legacy_debates() -> Json<LegacyListResponse> {
    Json(LegacyListResponse {
        success: true,
        data: Vec::new(),
        message: "Debates endpoint - now using counter-arguments",
    })
}

async fn legacy_ai_debates() -> Json<LegacyListResponse> {
    Json(LegacyListResponse {
        success: true,
        data: Vec::new(),
        message: "AI debates endpoint - now using counter-arguments",
    })
}

async fn legacy_post() -> Json<LegacyMessage> {
    Json(LegacyMessage { success: true, message: LEGACY_REDIRECT })
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound { path: uri.path().to_string() }
}
