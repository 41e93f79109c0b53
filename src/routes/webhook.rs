use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};

use crate::routes::AppState;

/// Relay del webhook de n8n: mismo body hacia arriba, mismo status y cuerpo de
/// vuelta. Existe para esquivar CORS y no exponer la URL del upstream en el
/// cliente. Un 413 del upstream vuelve como 413, no se lo traga nadie.
pub async fn proxy_webhook(State(state): State<Arc<AppState>>, body: Bytes) -> impl IntoResponse {
	let payload: Value = serde_json::from_slice(&body).unwrap_or_else(|_| json!({}));
	let pagina = payload.get("pagina").and_then(Value::as_str);
	let target = state.config.webhook_url_for(pagina);

	match state.http.post(target).json(&payload).send().await {
		Ok(response) => {
			let status = StatusCode::from_u16(response.status().as_u16())
				.unwrap_or(StatusCode::BAD_GATEWAY);
			let text = response.text().await.unwrap_or_default();
			let payload: Value =
				serde_json::from_str(&text).unwrap_or_else(|_| json!({ "raw": text }));
			(status, Json(payload))
		}
		Err(e) => {
			log::error!("falló el proxy hacia n8n: {}", e);
			(
				StatusCode::BAD_GATEWAY,
				Json(json!({ "message": "Proxy error to n8n", "error": e.to_string() })),
			)
		}
	}
}
