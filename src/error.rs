use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::models::WizardStep;

#[derive(Debug, Error)]
pub enum KoraError {
	#[error("{0}")]
	Validation(String),
	#[error("la imagen supera el tamaño máximo permitido ({actual} de {limit} bytes)")]
	PayloadTooLarge { actual: usize, limit: usize },
	#[error("error del webhook de n8n: {status} {detail}")]
	Upstream { status: u16, detail: String },
	#[error("respuesta inválida de n8n: no trae imagen")]
	MissingImage,
	#[error("no pudimos generar tu render, probá de nuevo en un momento")]
	RenderFailed,
	#[error("no se pudo procesar la imagen: {0}")]
	Image(String),
	#[error("sesión no encontrada")]
	SessionNotFound,
	#[error("la sesión no admite esta operación en el paso actual")]
	InvalidStep(WizardStep),
	#[error("ya hay una generación en curso para esta sesión")]
	GenerationInFlight,
	#[error(transparent)]
	Transport(#[from] reqwest::Error),
}

impl KoraError {
	pub fn status_code(&self) -> StatusCode {
		match self {
			KoraError::Validation(_) | KoraError::Image(_) => StatusCode::BAD_REQUEST,
			KoraError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
			KoraError::Upstream { .. }
			| KoraError::MissingImage
			| KoraError::RenderFailed
			| KoraError::Transport(_) => StatusCode::BAD_GATEWAY,
			KoraError::SessionNotFound => StatusCode::NOT_FOUND,
			KoraError::InvalidStep(_) | KoraError::GenerationInFlight => StatusCode::CONFLICT,
		}
	}
}

impl IntoResponse for KoraError {
	fn into_response(self) -> Response {
		let status = self.status_code();
		(status, Json(json!({ "error": self.to_string() }))).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn status_codes() {
		assert_eq!(
			KoraError::Validation(String::from("x")).status_code(),
			StatusCode::BAD_REQUEST
		);
		assert_eq!(
			KoraError::PayloadTooLarge { actual: 2, limit: 1 }.status_code(),
			StatusCode::PAYLOAD_TOO_LARGE
		);
		assert_eq!(KoraError::MissingImage.status_code(), StatusCode::BAD_GATEWAY);
		assert_eq!(
			KoraError::InvalidStep(WizardStep::Result).status_code(),
			StatusCode::CONFLICT
		);
	}
}
