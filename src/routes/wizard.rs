use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::KoraError;
use crate::models::{FeedbackInput, GenerateInput, ProfileInput, WizardSession};
use crate::routes::AppState;
use crate::services::wizard as wizard_service;

pub async fn create_session(
	State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<WizardSession>) {
	let session = state.sessions.create().await;
	(StatusCode::CREATED, Json(session))
}

pub async fn get_session(
	State(state): State<Arc<AppState>>,
	Path(id): Path<Uuid>,
) -> Result<Json<WizardSession>, KoraError> {
	Ok(Json(state.sessions.get(&id).await?))
}

pub async fn submit_profile(
	State(state): State<Arc<AppState>>,
	Path(id): Path<Uuid>,
	Json(input): Json<ProfileInput>,
) -> Result<Json<WizardSession>, KoraError> {
	let session = wizard_service::submit_profile(&state.sessions, &id, input).await?;
	Ok(Json(session))
}

pub async fn generate(
	State(state): State<Arc<AppState>>,
	Path(id): Path<Uuid>,
	Json(input): Json<GenerateInput>,
) -> Result<Json<WizardSession>, KoraError> {
	let session = wizard_service::generate(
		&state.sessions,
		&state.http,
		&state.config,
		state.db.as_ref(),
		&state.lookup,
		&id,
		input,
	)
	.await?;
	Ok(Json(session))
}

pub async fn feedback(
	State(state): State<Arc<AppState>>,
	Path(id): Path<Uuid>,
	Json(input): Json<FeedbackInput>,
) -> Result<Json<WizardSession>, KoraError> {
	let session = wizard_service::feedback(
		&state.sessions,
		&state.http,
		&state.config,
		state.db.as_ref(),
		&state.lookup,
		&id,
		input,
	)
	.await?;
	Ok(Json(session))
}

pub async fn accept(
	State(state): State<Arc<AppState>>,
	Path(id): Path<Uuid>,
) -> Result<Json<Value>, KoraError> {
	wizard_service::accept(&state.sessions, &id).await?;
	Ok(Json(json!({ "status": "ok" })))
}
