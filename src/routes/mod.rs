pub mod webhook;
pub mod wizard;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use reqwest::Client;
use sqlx::{Pool, Postgres};
use tower_http::cors::CorsLayer;

use crate::api::LookupConfig;
use crate::config::Config;
use crate::services::SessionStore;

#[derive(Clone)]
pub struct AppState {
	pub config: Config,
	pub http: Client,
	pub db: Option<Pool<Postgres>>,
	pub lookup: LookupConfig,
	pub sessions: SessionStore,
}

pub fn build_router(state: AppState) -> Router {
	let proxy_body_limit = state.config.proxy_body_limit;

	Router::new()
		.route("/api/health", get(health))
		.route("/api/n8n/webhook", post(webhook::proxy_webhook))
		.route("/api/kora/sessions", post(wizard::create_session))
		.route("/api/kora/sessions/{id}", get(wizard::get_session))
		.route("/api/kora/sessions/{id}/profile", post(wizard::submit_profile))
		.route("/api/kora/sessions/{id}/generate", post(wizard::generate))
		.route("/api/kora/sessions/{id}/feedback", post(wizard::feedback))
		.route("/api/kora/sessions/{id}/accept", post(wizard::accept))
		.layer(DefaultBodyLimit::max(proxy_body_limit))
		.layer(CorsLayer::permissive())
		.with_state(Arc::new(state))
}

async fn health() -> impl IntoResponse {
	Json(serde_json::json!({ "status": "ok", "service": "kora" }))
}
