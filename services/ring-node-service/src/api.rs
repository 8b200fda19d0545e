//! API handlers for the ring node service.

use actix_web::{web, HttpMessage, HttpRequest, HttpResponse, Result as ActixResult};
use base64::{engine::general_purpose::STANDARD, Engine};
use ringrelay_ring::NodeRole;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ServiceError;
use crate::wire::{RegisterNodeResponse, RelayRequest};
use crate::AppState;

/// Configure API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/register-node", web::post().to(register_node))
        .route("/relay", web::post().to(relay))
        .route("/play", web::post().to(play))
        .route("/health", web::get().to(health_check));
}

/// Query parameters of `POST /register-node`.
#[derive(Debug, Deserialize)]
pub struct RegisterQuery {
    pub host: String,
    pub port: u16,
    // carried on the wire for operators; registration itself does not use it
    pub name: Option<String>,
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    service: String,
    version: String,
    role: String,
    ring_members: usize,
}

async fn register_node(
    state: web::Data<AppState>,
    query: web::Query<RegisterQuery>,
) -> HttpResponse {
    info!(
        host = %query.host,
        port = query.port,
        name = query.name.as_deref().unwrap_or("-"),
        "registration request"
    );

    let grant = state.node.register_peer(&query.host, query.port);
    HttpResponse::Ok().json(RegisterNodeResponse::from(grant))
}

async fn relay(
    state: web::Data<AppState>,
    body: web::Json<RelayRequest>,
) -> ActixResult<HttpResponse, ServiceError> {
    let request = body.into_inner();
    let payload = STANDARD
        .decode(&request.message)
        .map_err(|e| ServiceError::BadPayload(e.to_string()))?;

    let signature = state
        .node
        .relay_message(&payload, &request.content_type, request.signatures)
        .await?;
    Ok(HttpResponse::Ok().json(signature))
}

async fn play(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> ActixResult<HttpResponse, ServiceError> {
    let content_type = match req.content_type() {
        "" => "application/octet-stream",
        other => other,
    };

    let result = state.node.originate(&body, content_type).await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let role = match state.node.role() {
        NodeRole::Origin => "origin",
        NodeRole::Relay { .. } => "relay",
    };

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: "ring-node-service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        role: role.to_string(),
        ring_members: state.node.ring_members(),
    })
}
