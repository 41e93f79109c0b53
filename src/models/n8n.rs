use serde::{Deserialize, Serialize};

use crate::models::RenderProduct;

pub const PAGINA_INICIAL: &str = "inicial";
pub const PAGINA_FEEDBACK: &str = "feedback";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct N8nInitialPayload {
	pub pagina: String,
	pub caption: String,
	pub image: String,
	#[serde(rename = "userId")]
	pub user_id: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct N8nFeedbackPayload {
	pub pagina: String,
	pub comentarios: String,
	pub seleccion_anterior: String,
	#[serde(rename = "userId")]
	pub user_id: String,
	pub image: String,
}

/// Sobre normalizado de lo que devuelve n8n, sin importar la forma del JSON
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct N8nResponse {
	pub image_url: Option<String>,
	pub style: Option<String>,
	pub products: Vec<RenderProduct>,
	pub status: Option<String>,
	pub message: Option<String>,
}
