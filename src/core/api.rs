//! HTTP + WebSocket API for VisionToy
//!
//! Endpoints:
//! - GET /health - Health check
//! - POST /session/new - Create new session
//! - GET /session/{id} - Get session status and current list
//! - POST /session/{id}/frame - Offer one classifier frame
//! - POST /session/{id}/audio - Enable / disable announcements
//! - WS /ws/{id} - Live cycle outputs

use axum::{
    extract::{Path, State, WebSocketUpgrade, ws::{Message, WebSocket}},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};

use crate::config::DemoConfig;
use crate::core::{ClassificationPipeline, ObservationParser};
use crate::error::{ApiError, ApiResult};
use crate::types::{ClassificationSequence, CycleOutput, Observation, UtteranceAction};

/// Session state
#[derive(Debug)]
pub struct Session {
    pub id: String,
    pub pipeline: ClassificationPipeline,
    pub update_tx: broadcast::Sender<CycleOutput>,
}

/// App state
pub struct AppState {
    pub sessions: RwLock<HashMap<String, Session>>,
    pub config: DemoConfig,
    parser: ObservationParser,
    next_id: AtomicU64,
}

/// Create new session request
#[derive(Debug, Default, Deserialize)]
pub struct NewSessionRequest {
    pub audio_enabled: Option<bool>,
    pub analysis_period_ms: Option<u64>,
}

/// Create new session response
#[derive(Debug, Serialize)]
pub struct NewSessionResponse {
    pub session_id: String,
    pub websocket_url: String,
}

/// Session status response
#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub session_id: String,
    pub cycle_count: u64,
    pub audio_enabled: bool,
    pub last_spoken: Option<String>,
    pub classifications: ClassificationSequence,
}

/// Frame request: structured observations or a text feed line
#[derive(Debug, Deserialize)]
pub struct FrameRequest {
    pub observations: Option<Vec<Observation>>,
    pub line: Option<String>,
}

/// Frame response
#[derive(Debug, Serialize)]
pub struct FrameResponse {
    /// False when the throttle skipped this frame
    pub accepted: bool,
    pub output: Option<CycleOutput>,
}

/// Audio toggle request
#[derive(Debug, Deserialize)]
pub struct AudioRequest {
    pub enabled: bool,
}

/// Audio toggle response
#[derive(Debug, Serialize)]
pub struct AudioResponse {
    pub audio_enabled: bool,
    pub utterance: Option<UtteranceAction>,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sessions_active: usize,
}

/// Create the API router
pub fn create_router(config: DemoConfig) -> Router {
    let state = Arc::new(AppState {
        sessions: RwLock::new(HashMap::new()),
        config,
        parser: ObservationParser::new(),
        next_id: AtomicU64::new(1),
    });

    Router::new()
        .route("/health", get(health))
        .route("/session/new", post(create_session))
        .route("/session/:id", get(get_session))
        .route("/session/:id/frame", post(submit_frame))
        .route("/session/:id/audio", post(set_audio))
        .route("/ws/:id", get(websocket_handler))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let sessions = state.sessions.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        sessions_active: sessions.len(),
    })
}

/// Create new session
async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewSessionRequest>,
) -> ApiResult<Json<NewSessionResponse>> {
    let session_id = generate_session_id(state.next_id.fetch_add(1, Ordering::Relaxed));

    let mut config = state.config.clone();
    if let Some(enabled) = req.audio_enabled {
        config.audio_enabled = enabled;
    }
    if let Some(period) = req.analysis_period_ms {
        config.analysis_period_ms = period;
    }

    let (tx, _) = broadcast::channel(100);
    let session = Session {
        id: session_id.clone(),
        pipeline: ClassificationPipeline::new(&config),
        update_tx: tx,
    };

    let mut sessions = state.sessions.write().await;
    sessions.insert(session_id.clone(), session);
    info!(session = %session_id, period_ms = config.analysis_period_ms, "session created");

    Ok(Json(NewSessionResponse {
        session_id: session_id.clone(),
        websocket_url: format!("/ws/{}", session_id),
    }))
}

/// Get session status
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<SessionStatusResponse>> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or_else(|| ApiError::not_found(format!("session {}", id)))?;

    Ok(Json(SessionStatusResponse {
        session_id: session.id.clone(),
        cycle_count: session.pipeline.cycle_count(),
        audio_enabled: session.pipeline.audio_enabled(),
        last_spoken: session.pipeline.last_spoken().map(str::to_string),
        classifications: session.pipeline.current().clone(),
    }))
}

/// Offer a frame to the session; the write lock serializes cycles
async fn submit_frame(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<FrameRequest>,
) -> ApiResult<Json<FrameResponse>> {
    let observations = match (req.observations, req.line) {
        (Some(observations), _) => observations,
        (None, Some(line)) => state.parser.parse_frame(&line)?,
        (None, None) => return Err(ApiError::bad_request("expected 'observations' or 'line'")),
    };

    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or_else(|| ApiError::not_found(format!("session {}", id)))?;

    let output = session.pipeline.offer_frame(&observations, Instant::now());
    if let Some(output) = &output {
        // No subscribers is fine
        let _ = session.update_tx.send(output.clone());
    } else {
        debug!(session = %id, "frame skipped");
    }

    Ok(Json(FrameResponse {
        accepted: output.is_some(),
        output,
    }))
}

/// Enable or disable announcements
async fn set_audio(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<AudioRequest>,
) -> ApiResult<Json<AudioResponse>> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or_else(|| ApiError::not_found(format!("session {}", id)))?;

    let utterance = session.pipeline.set_audio_enabled(req.enabled);

    Ok(Json(AudioResponse {
        audio_enabled: session.pipeline.audio_enabled(),
        utterance,
    }))
}

/// WebSocket handler for live updates
async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> ApiResult<impl IntoResponse> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or_else(|| ApiError::not_found(format!("session {}", id)))?;
    let rx = session.update_tx.subscribe();
    drop(sessions);

    Ok(ws.on_upgrade(move |socket| async move {
        handle_websocket(socket, rx).await;
    }))
}

/// Forward cycle outputs until either side goes away
async fn handle_websocket(socket: WebSocket, mut rx: broadcast::Receiver<CycleOutput>) {
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            update = rx.recv() => {
                let update = match update {
                    Ok(update) => update,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "websocket client lagging");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                let json = serde_json::to_string(&update).unwrap_or_default();
                if sender.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }
}

/// Generate session ID
fn generate_session_id(sequence: u64) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    format!("session_{:x}_{}", nanos, sequence)
}

/// Run the API server
pub async fn run_server(addr: &str, config: DemoConfig) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router(config);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("VisionToy API running on {}", addr);
    println!("  POST /session/new        - Create session");
    println!("  GET  /session/:id        - Get status");
    println!("  POST /session/:id/frame  - Offer frame");
    println!("  POST /session/:id/audio  - Toggle audio");
    println!("  WS   /ws/:id             - Live updates");
    println!("  GET  /health             - Health check");
    axum::serve(listener, router).await?;
    Ok(())
}
