use std::env;

const DEFAULT_INITIAL_WEBHOOK: &str =
	"https://n8n.tucbbs.com.ar/webhook/c0205606-9a90-4050-a811-d03bab2f09b4";
const DEFAULT_FEEDBACK_WEBHOOK: &str = "https://n8n.tucbbs.com.ar/webhook/feedback-kora";

#[derive(Debug, Clone)]
pub struct Config {
	pub host: String,
	pub port: u16,
	pub database_url: Option<String>,
	pub n8n_initial_webhook_url: String,
	pub n8n_feedback_webhook_url: String,
	/// Techo del body del proxy, los renders llegan inline en base64
	pub proxy_body_limit: usize,
	/// Techo de la foto ya comprimida, se controla antes de llamar a n8n
	pub photo_payload_limit: usize,
	pub max_photo_width: u32,
	pub max_photo_height: u32,
	pub photo_quality: u8,
}

impl Config {
	pub fn init() -> Config {
		let host = env::var("HOST").unwrap_or(String::from("0.0.0.0"));
		let port = env::var("PORT")
			.ok()
			.and_then(|v| v.parse::<u16>().ok())
			.unwrap_or(8080);
		let database_url = env::var("DATABASE_URL").ok().filter(|v| !v.trim().is_empty());
		let n8n_initial_webhook_url = env::var("N8N_INITIAL_WEBHOOK_URL")
			.unwrap_or(String::from(DEFAULT_INITIAL_WEBHOOK));
		let n8n_feedback_webhook_url = env::var("N8N_FEEDBACK_WEBHOOK_URL")
			.unwrap_or(String::from(DEFAULT_FEEDBACK_WEBHOOK));
		let proxy_body_limit = env_usize("PROXY_BODY_LIMIT", 12 * 1024 * 1024);
		let photo_payload_limit = env_usize("PHOTO_PAYLOAD_LIMIT", 10 * 1024 * 1024);
		let max_photo_width = env::var("MAX_PHOTO_WIDTH")
			.ok()
			.and_then(|v| v.parse::<u32>().ok())
			.unwrap_or(1920);
		let max_photo_height = env::var("MAX_PHOTO_HEIGHT")
			.ok()
			.and_then(|v| v.parse::<u32>().ok())
			.unwrap_or(1080);
		let photo_quality = env::var("PHOTO_QUALITY")
			.ok()
			.and_then(|v| v.parse::<u8>().ok())
			.unwrap_or(80);

		Config {
			host,
			port,
			database_url,
			n8n_initial_webhook_url,
			n8n_feedback_webhook_url,
			proxy_body_limit,
			photo_payload_limit,
			max_photo_width,
			max_photo_height,
			photo_quality,
		}
	}

	pub fn webhook_url_for(&self, pagina: Option<&str>) -> &str {
		match pagina {
			Some("feedback") => &self.n8n_feedback_webhook_url,
			_ => &self.n8n_initial_webhook_url,
		}
	}
}

fn env_usize(key: &str, default: usize) -> usize {
	env::var(key)
		.ok()
		.and_then(|v| v.parse::<usize>().ok())
		.unwrap_or(default)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn feedback_selects_feedback_target() {
		let config = Config {
			host: String::from("127.0.0.1"),
			port: 0,
			database_url: None,
			n8n_initial_webhook_url: String::from("http://upstream/inicial"),
			n8n_feedback_webhook_url: String::from("http://upstream/feedback"),
			proxy_body_limit: 0,
			photo_payload_limit: 0,
			max_photo_width: 0,
			max_photo_height: 0,
			photo_quality: 0,
		};

		assert_eq!(config.webhook_url_for(Some("feedback")), "http://upstream/feedback");
		assert_eq!(config.webhook_url_for(Some("inicial")), "http://upstream/inicial");
		// cualquier otro valor cae en el webhook inicial
		assert_eq!(config.webhook_url_for(Some("otro")), "http://upstream/inicial");
		assert_eq!(config.webhook_url_for(None), "http://upstream/inicial");
	}
}
