use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum ProductId {
	Number(i64),
	Text(String),
}

impl std::fmt::Display for ProductId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ProductId::Number(n) => write!(f, "{}", n),
			ProductId::Text(s) => write!(f, "{}", s),
		}
	}
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RenderProduct {
	pub id: Option<ProductId>,
	pub product: Option<String>,
	pub name: Option<String>,
	pub description: Option<String>,
	pub image: Option<String>,
	#[serde(rename = "mimeType")]
	pub mime_type: Option<String>,
	pub price: Option<f64>,
	pub url: Option<String>,
}

impl RenderProduct {
	/// Nombre visible: `product` primero, `name` como respaldo
	pub fn title(&self) -> Option<&str> {
		self.product
			.as_deref()
			.or(self.name.as_deref())
			.filter(|s| !s.trim().is_empty())
	}
}
