use serde_json::Value;
use sqlx::{Pool, Postgres};
use std::env;

use crate::models::{ProductId, RenderProduct};
use crate::processing::to_image_url;

/// El esquema del catálogo no se conoce al compilar: se prueban tablas y
/// columnas candidatas en orden, la variable de entorno va primera si existe.
const TABLE_CANDIDATES: [&str; 5] = ["products", "catalog", "items", "productos", "catalog_items"];
const NAME_COLS: [&str; 4] = ["name", "title", "product_name", "product"];
const DESC_COLS: [&str; 5] = ["description", "desc", "details", "summary", "short_description"];
const IMAGE_COLS: [&str; 7] = [
	"image_url",
	"image",
	"thumbnail",
	"photo_url",
	"cover",
	"url",
	"picture",
];
const PRICE_COLS: [&str; 5] = ["price", "amount", "cost", "usd_price", "ars_price"];
const URL_COLS: [&str; 4] = ["url", "link", "permalink", "product_url"];

const DEFAULT_PRODUCT_MIME: &str = "image/jpeg";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
	NameFirst,
	IdFirst,
}

impl MatchStrategy {
	pub fn parse(value: &str) -> MatchStrategy {
		match value.trim() {
			"id_first" => MatchStrategy::IdFirst,
			_ => MatchStrategy::NameFirst,
		}
	}
}

#[derive(Debug, Clone)]
pub struct LookupConfig {
	pub tables: Vec<String>,
	pub name_cols: Vec<String>,
	pub desc_cols: Vec<String>,
	pub image_cols: Vec<String>,
	pub price_cols: Vec<String>,
	pub url_cols: Vec<String>,
	pub strategy: MatchStrategy,
}

impl LookupConfig {
	pub fn init() -> LookupConfig {
		LookupConfig {
			tables: env_list("PRODUCTS_TABLE", &TABLE_CANDIDATES),
			name_cols: env_list("PRODUCTS_NAME_COL", &NAME_COLS),
			desc_cols: env_list("PRODUCTS_DESC_COL", &DESC_COLS),
			image_cols: env_list("PRODUCTS_IMAGE_COL", &IMAGE_COLS),
			price_cols: env_list("PRODUCTS_PRICE_COL", &PRICE_COLS),
			url_cols: env_list("PRODUCTS_URL_COL", &URL_COLS),
			strategy: MatchStrategy::parse(
				&env::var("PRODUCTS_MATCH_STRATEGY").unwrap_or_default(),
			),
		}
	}
}

fn env_list(key: &str, defaults: &[&str]) -> Vec<String> {
	let mut out: Vec<String> = Vec::new();
	if let Ok(value) = env::var(key) {
		let value = value.trim();
		if !value.is_empty() {
			out.push(value.to_string());
		}
	}
	out.extend(defaults.iter().map(|d| d.to_string()));
	out
}

/// Completa precio/url/imagen de cada candidato con lo que haya en el catálogo.
/// Nunca falla: sin pool, sin tabla o con cualquier error de consulta devuelve
/// los productos tal cual llegaron.
pub async fn enrich_products(
	db: Option<&Pool<Postgres>>,
	config: &LookupConfig,
	products: Vec<RenderProduct>,
) -> Vec<RenderProduct> {
	let Some(db) = db else {
		return products;
	};
	if products.is_empty() {
		return products;
	}

	log::info!("enriqueciendo {} productos contra el catálogo", products.len());

	let mut results = Vec::with_capacity(products.len());
	for product in products {
		match find_best_row(db, config, &product).await {
			Some(row) => results.push(merge_product(&product, &row, config)),
			None => results.push(product),
		}
	}

	let matched = results
		.iter()
		.filter(|p| p.url.is_some() || p.price.is_some())
		.count();
	log::info!("enriquecimiento terminado, con match: {}", matched);

	results
}

async fn find_best_row(
	db: &Pool<Postgres>,
	config: &LookupConfig,
	product: &RenderProduct,
) -> Option<Value> {
	let name = product.title().map(str::trim).unwrap_or("");

	for table in &config.tables {
		let mut row = None;

		match config.strategy {
			MatchStrategy::IdFirst => {
				if let Some(id) = &product.id {
					row = find_row_by_id(db, table, id).await;
				}
				if row.is_none() && !name.is_empty() {
					row = find_row_by_name(db, config, table, name).await;
				}
			}
			MatchStrategy::NameFirst => {
				if !name.is_empty() {
					row = find_row_by_name(db, config, table, name).await;
				}
				if row.is_none() {
					if let Some(id) = &product.id {
						row = find_row_by_id(db, table, id).await;
					}
				}
			}
		}

		if row.is_some() {
			return row;
		}
	}

	None
}

async fn find_row_by_name(
	db: &Pool<Postgres>,
	config: &LookupConfig,
	table: &str,
	name: &str,
) -> Option<Value> {
	for col in &config.name_cols {
		let sql = format!(
			"SELECT row_to_json(t.*) FROM {} AS t WHERE t.{}::text ILIKE $1 LIMIT 1",
			&table, &col
		);
		let row = query_single(db, table, &sql, &format!("%{}%", name)).await;
		if row.is_some() {
			return row;
		}
	}
	None
}

async fn find_row_by_id(db: &Pool<Postgres>, table: &str, id: &ProductId) -> Option<Value> {
	let sql = format!(
		"SELECT row_to_json(t.*) FROM {} AS t WHERE t.id::text = $1 LIMIT 1",
		&table
	);
	query_single(db, table, &sql, &id.to_string()).await
}

async fn query_single(db: &Pool<Postgres>, table: &str, sql: &str, bind: &str) -> Option<Value> {
	let query_result = sqlx::query_scalar::<_, Value>(sql)
		.bind(bind)
		.fetch_optional(db)
		.await;

	match query_result {
		Ok(row) => row,
		Err(e) => {
			log::warn!("algo salió mal durante la consulta sobre {}: {}", table, e);
			None
		}
	}
}

/// Mezcla pura: lo autoritativo de la fila pisa al candidato solo cuando existe
pub fn merge_product(base: &RenderProduct, row: &Value, config: &LookupConfig) -> RenderProduct {
	let resolved_name = pick_string(row, &config.name_cols)
		.or(base.product.clone())
		.or(base.name.clone());
	let resolved_desc = pick_string(row, &config.desc_cols).or(base.description.clone());
	let resolved_image = pick_string(row, &config.image_cols).or(base.image.clone());
	let resolved_price = pick_number(row, &config.price_cols).or(base.price);
	let resolved_url = pick_string(row, &config.url_cols).or(base.url.clone());

	let mime = base.mime_type.as_deref().unwrap_or(DEFAULT_PRODUCT_MIME);
	let image = resolved_image
		.map(|img| to_image_url(&img, Some(mime), DEFAULT_PRODUCT_MIME))
		.or(base.image.clone());

	RenderProduct {
		id: row_id(row).or(base.id.clone()),
		product: resolved_name.clone(),
		name: resolved_name,
		description: resolved_desc,
		image,
		mime_type: base.mime_type.clone(),
		price: resolved_price,
		url: resolved_url,
	}
}

pub fn pick_string(row: &Value, cols: &[String]) -> Option<String> {
	for col in cols {
		let value = row
			.get(col)
			.and_then(Value::as_str)
			.filter(|v| !v.trim().is_empty());
		if let Some(value) = value {
			return Some(value.to_string());
		}
	}
	None
}

pub fn pick_number(row: &Value, cols: &[String]) -> Option<f64> {
	for col in cols {
		if let Some(value) = row.get(col).and_then(Value::as_f64) {
			return Some(value);
		}
	}
	None
}

fn row_id(row: &Value) -> Option<ProductId> {
	match row.get("id")? {
		Value::Number(n) => n.as_i64().map(ProductId::Number),
		Value::String(s) if !s.trim().is_empty() => Some(ProductId::Text(s.clone())),
		_ => None,
	}
}
