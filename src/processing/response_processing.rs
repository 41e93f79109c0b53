use serde_json::Value;

use crate::models::{N8nResponse, ProductId, RenderProduct};

/// Nombres históricos bajo los que n8n devolvió la imagen del render
const LEGACY_IMAGE_FIELDS: [&str; 4] = ["imageBase64", "image_base64", "image", "img"];

/// Campos técnicos que n8n mezcla entre los productos reales del mismo objeto
const DISQUALIFYING_FIELDS: [&str; 4] = ["debug", "caption", "binary", "pairedItem"];

const DEFAULT_IMAGE_MIME: &str = "image/png";
const DEFAULT_PRODUCT_MIME: &str = "image/jpeg";

pub fn normalize_response(raw: &Value) -> N8nResponse {
	N8nResponse {
		image_url: extract_image(raw),
		style: extract_style(raw),
		products: extract_products(raw),
		status: passthrough_string(raw, "status"),
		message: passthrough_string(raw, "message"),
	}
}

/// Estrategias en orden: la forma anidada de inlineData y después los campos planos
pub fn extract_image(raw: &Value) -> Option<String> {
	extract_inline_data_image(raw).or_else(|| extract_legacy_image(raw))
}

/// `[0].json.candidates[0].content.parts[*].inlineData.{data,mimeType}`
pub fn extract_inline_data_image(raw: &Value) -> Option<String> {
	let parts = item_json(raw)
		.get("candidates")?
		.get(0)?
		.get("content")?
		.get("parts")?
		.as_array()?;

	parts.iter().find_map(|part| {
		let inline = part.get("inlineData")?;
		let data = inline
			.get("data")
			.and_then(Value::as_str)
			.filter(|d| !d.trim().is_empty())?;
		let mime = inline
			.get("mimeType")
			.and_then(Value::as_str)
			.unwrap_or(DEFAULT_IMAGE_MIME);
		Some(data_url(mime, data))
	})
}

/// Campos planos al tope o en el primer elemento del array
pub fn extract_legacy_image(raw: &Value) -> Option<String> {
	for source in [raw, first_item(raw)] {
		let mime = source.get("mimeType").and_then(Value::as_str);
		for field in LEGACY_IMAGE_FIELDS {
			let image = source
				.get(field)
				.and_then(Value::as_str)
				.filter(|v| !v.trim().is_empty());
			if let Some(image) = image {
				return Some(to_image_url(image, mime, DEFAULT_IMAGE_MIME));
			}
		}
	}
	None
}

pub fn extract_style(raw: &Value) -> Option<String> {
	item_json(raw)
		.get("style")
		.and_then(Value::as_str)
		.filter(|v| !v.trim().is_empty())
		.map(str::to_string)
}

/// `productos` llega como array o como objeto indexado por claves numéricas
pub fn extract_products(raw: &Value) -> Vec<RenderProduct> {
	let Some(productos) = item_json(raw).get("productos") else {
		return Vec::new();
	};

	let entries: Vec<&Value> = match productos {
		Value::Array(items) => items.iter().collect(),
		Value::Object(map) => {
			let mut keyed: Vec<(&String, &Value)> = map.iter().collect();
			keyed.sort_by_key(|(key, _)| numeric_key(key.as_str()));
			keyed.into_iter().map(|(_, value)| value).collect()
		}
		_ => return Vec::new(),
	};

	entries.into_iter().filter_map(parse_product).collect()
}

/// Si ya viene con prefijo `data:` o es una URL se deja igual, si no se arma el data URL
pub fn to_image_url(image: &str, mime_type: Option<&str>, default_mime: &str) -> String {
	if image.starts_with("data:") || image.starts_with("http") {
		return image.to_string();
	}
	data_url(mime_type.unwrap_or(default_mime), image)
}

fn data_url(mime: &str, data: &str) -> String {
	format!("data:{};base64,{}", mime, data)
}

fn first_item(raw: &Value) -> &Value {
	raw.get(0).unwrap_or(raw)
}

fn item_json(raw: &Value) -> &Value {
	let item = first_item(raw);
	item.get("json").unwrap_or(item)
}

fn passthrough_string(raw: &Value, field: &str) -> Option<String> {
	for source in [raw, first_item(raw), item_json(raw)] {
		let value = source.get(field).and_then(Value::as_str);
		if let Some(value) = value {
			return Some(value.to_string());
		}
	}
	None
}

// claves no numéricas quedan al final, en su propio orden
fn numeric_key(key: &str) -> u64 {
	key.trim().parse::<u64>().unwrap_or(u64::MAX)
}

fn parse_product(entry: &Value) -> Option<RenderProduct> {
	let obj = entry.as_object()?;

	if DISQUALIFYING_FIELDS.iter().any(|field| obj.contains_key(*field)) {
		return None;
	}

	let product = string_field(obj, "product");
	let name = string_field(obj, "name");
	if product.is_none() && name.is_none() {
		return None;
	}

	let mime_type = string_field(obj, "mimeType");
	let image = flatten_image(obj.get("image"), mime_type.as_deref());

	Some(RenderProduct {
		id: parse_id(obj.get("id")),
		product,
		name,
		description: string_field(obj, "description"),
		image,
		mime_type,
		price: obj.get("price").and_then(Value::as_f64),
		url: string_field(obj, "url"),
	})
}

/// Un campo de imagen que es a su vez un objeto `{data, mimeType}` se aplana a un data URL
fn flatten_image(value: Option<&Value>, mime_type: Option<&str>) -> Option<String> {
	match value? {
		Value::String(image) if !image.trim().is_empty() => {
			Some(to_image_url(image, mime_type, DEFAULT_PRODUCT_MIME))
		}
		Value::Object(obj) => {
			let data = obj
				.get("data")
				.and_then(Value::as_str)
				.filter(|d| !d.trim().is_empty())?;
			let mime = obj
				.get("mimeType")
				.and_then(Value::as_str)
				.or(mime_type)
				.unwrap_or(DEFAULT_PRODUCT_MIME);
			Some(data_url(mime, data))
		}
		_ => None,
	}
}

fn parse_id(value: Option<&Value>) -> Option<ProductId> {
	match value? {
		Value::Number(n) => n.as_i64().map(ProductId::Number),
		Value::String(s) if !s.trim().is_empty() => Some(ProductId::Text(s.clone())),
		_ => None,
	}
}

fn string_field(obj: &serde_json::Map<String, Value>, field: &str) -> Option<String> {
	obj.get(field)
		.and_then(Value::as_str)
		.filter(|v| !v.trim().is_empty())
		.map(str::to_string)
}
