use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::KoraError;
use crate::models::{
	N8nFeedbackPayload, N8nInitialPayload, N8nResponse, PAGINA_FEEDBACK, PAGINA_INICIAL,
};
use crate::processing::normalize_response;

/// Primer pedido de render: una respuesta sin imagen extraíble es un error,
/// aunque el HTTP haya salido bien
pub async fn send_initial_request(
	http: &Client,
	config: &Config,
	user_id: &str,
	caption: &str,
	image_base64: &str,
) -> Result<N8nResponse, KoraError> {
	let payload = N8nInitialPayload {
		pagina: String::from(PAGINA_INICIAL),
		caption: caption.to_string(),
		image: image_base64.to_string(),
		user_id: user_id.to_string(),
	};

	let raw = post_webhook(http, config.webhook_url_for(Some(PAGINA_INICIAL)), &payload).await?;
	require_image(normalize_response(&raw))
}

pub async fn send_feedback_request(
	http: &Client,
	config: &Config,
	user_id: &str,
	comentarios: &str,
	seleccion_anterior: &str,
	image_base64: &str,
) -> Result<N8nResponse, KoraError> {
	let payload = N8nFeedbackPayload {
		pagina: String::from(PAGINA_FEEDBACK),
		comentarios: comentarios.to_string(),
		seleccion_anterior: seleccion_anterior.to_string(),
		user_id: user_id.to_string(),
		image: image_base64.to_string(),
	};

	let raw = post_webhook(http, config.webhook_url_for(Some(PAGINA_FEEDBACK)), &payload).await?;
	require_image(normalize_response(&raw))
}

async fn post_webhook<T: Serialize>(
	http: &Client,
	url: &str,
	payload: &T,
) -> Result<Value, KoraError> {
	let response = http.post(url).json(payload).send().await?;
	let status = response.status();
	let text = response.text().await.unwrap_or_default();

	if !status.is_success() {
		log::error!("error del webhook de n8n: {} {}", status, &text);
		return Err(KoraError::Upstream {
			status: status.as_u16(),
			detail: text,
		});
	}

	serde_json::from_str::<Value>(&text).map_err(|e| {
		log::error!("n8n devolvió un cuerpo que no es JSON: {}", e);
		KoraError::Upstream {
			status: status.as_u16(),
			detail: String::from("cuerpo no JSON"),
		}
	})
}

fn require_image(response: N8nResponse) -> Result<N8nResponse, KoraError> {
	if response.image_url.is_none() {
		return Err(KoraError::MissingImage);
	}
	Ok(response)
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn payload_field_names_match_the_webhook_contract() {
		let payload = N8nInitialPayload {
			pagina: String::from(PAGINA_INICIAL),
			caption: String::from("living moderno"),
			image: String::from("QUJD"),
			user_id: String::from("u-1"),
		};
		let value = serde_json::to_value(&payload).unwrap();
		assert_eq!(value["pagina"], "inicial");
		assert_eq!(value["userId"], "u-1");

		let payload = N8nFeedbackPayload {
			pagina: String::from(PAGINA_FEEDBACK),
			comentarios: String::from("más luz"),
			seleccion_anterior: String::from("nórdico"),
			user_id: String::from("u-1"),
			image: String::from("QUJD"),
		};
		let value = serde_json::to_value(&payload).unwrap();
		assert_eq!(value["pagina"], "feedback");
		assert_eq!(value["seleccion_anterior"], "nórdico");
	}

	#[test]
	fn response_without_image_is_an_error() {
		let raw = json!([{ "json": { "style": "boho", "productos": { "0": { "name": "Sofá" } } } }]);
		let result = require_image(normalize_response(&raw));
		assert!(matches!(result, Err(KoraError::MissingImage)));
	}

	#[test]
	fn response_with_image_passes() {
		let raw = json!({ "imageBase64": "QUJD" });
		let response = require_image(normalize_response(&raw)).unwrap();
		assert_eq!(
			response.image_url.as_deref(),
			Some("data:image/png;base64,QUJD")
		);
	}
}
