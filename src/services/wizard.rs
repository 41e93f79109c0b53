use reqwest::Client;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::api::{enrich_products, LookupConfig};
use crate::config::Config;
use crate::error::KoraError;
use crate::models::{
	FeedbackInput, GenerateInput, ProfileInput, RenderOutcome, WizardData, WizardSession,
	WizardStep,
};
use crate::processing::{compress_photo, estimate_decoded_size};
use crate::services::n8n_client;
use crate::services::session_store::SessionStore;

/// Perfil → Fotos, sólo con un nombre no vacío
pub async fn submit_profile(
	store: &SessionStore,
	id: &Uuid,
	input: ProfileInput,
) -> Result<WizardSession, KoraError> {
	store
		.update(id, |session| {
			if session.step != WizardStep::Profile {
				return Err(KoraError::InvalidStep(session.step));
			}
			if input.user_name.trim().is_empty() {
				return Err(KoraError::Validation(String::from(
					"el nombre no puede quedar vacío",
				)));
			}

			session.data.user_name = input.user_name.trim().to_string();
			// identificador opaco generado por el cliente, si no vino se inventa uno
			session.data.user_id = input
				.user_id
				.clone()
				.filter(|v| !v.trim().is_empty())
				.unwrap_or_else(|| Uuid::new_v4().to_string());
			session.data.living_style = input.living_style.clone().unwrap_or_default();
			session.data.preferences = input.preferences.clone().unwrap_or_default();
			session.step = WizardStep::Photos;
			session.error = None;
			Ok(session.clone())
		})
		.await
}

/// Fotos → Loading → Result. La llamada a n8n es sincrónica; si algo falla la
/// sesión vuelve a Fotos con un mensaje genérico y el detalle queda en el log.
pub async fn generate(
	store: &SessionStore,
	http: &Client,
	config: &Config,
	db: Option<&Pool<Postgres>>,
	lookup: &LookupConfig,
	id: &Uuid,
	input: GenerateInput,
) -> Result<WizardSession, KoraError> {
	let session = store.get(id).await?;
	match session.step {
		WizardStep::Photos => {}
		WizardStep::Loading => return Err(KoraError::GenerationInFlight),
		other => return Err(KoraError::InvalidStep(other)),
	}
	if input.photos.is_empty() {
		return Err(KoraError::Validation(String::from(
			"subí al menos una foto de tu espacio",
		)));
	}
	if input.prompt.trim().is_empty() {
		return Err(KoraError::Validation(String::from(
			"contanos qué querés lograr en tu espacio",
		)));
	}

	// compresión y control de tamaño antes de cualquier viaje a la red
	let mut photos = Vec::with_capacity(input.photos.len());
	let mut previews = Vec::with_capacity(input.photos.len());
	for photo in &input.photos {
		let compressed = compress_photo(
			photo,
			config.max_photo_width,
			config.max_photo_height,
			config.photo_quality,
		)?;
		let estimated = estimate_decoded_size(&compressed);
		if estimated > config.photo_payload_limit {
			return Err(KoraError::PayloadTooLarge {
				actual: estimated,
				limit: config.photo_payload_limit,
			});
		}
		previews.push(format!("data:image/jpeg;base64,{}", &compressed));
		photos.push(compressed);
	}

	// reclamo atómico del paso Loading, una sola generación por sesión
	let (user_id, caption, image) = store
		.update(id, |session| {
			match session.step {
				WizardStep::Photos => {}
				WizardStep::Loading => return Err(KoraError::GenerationInFlight),
				other => return Err(KoraError::InvalidStep(other)),
			}
			session.data.photos = photos.clone();
			session.data.photo_previews = previews.clone();
			session.data.prompt = input.prompt.trim().to_string();
			session.data.style = input.style.clone().unwrap_or_default();
			session.data.room = input.room.clone().unwrap_or_default();
			session.data.budget = input.budget.clone().unwrap_or_default();
			session.step = WizardStep::Loading;
			session.error = None;
			Ok((
				session.data.user_id.clone(),
				build_caption(&session.data),
				session.data.photos[0].clone(),
			))
		})
		.await?;

	let result = n8n_client::send_initial_request(http, config, &user_id, &caption, &image).await;
	finish_generation(store, db, lookup, id, result).await
}

/// Result → Loading → Result, reusando la foto guardada y la selección anterior
pub async fn feedback(
	store: &SessionStore,
	http: &Client,
	config: &Config,
	db: Option<&Pool<Postgres>>,
	lookup: &LookupConfig,
	id: &Uuid,
	input: FeedbackInput,
) -> Result<WizardSession, KoraError> {
	if input.comentarios.trim().is_empty() {
		return Err(KoraError::Validation(String::from(
			"contanos qué te gustaría cambiar",
		)));
	}

	let (user_id, seleccion_anterior, image) = store
		.update(id, |session| {
			match session.step {
				WizardStep::Result => {}
				WizardStep::Loading => return Err(KoraError::GenerationInFlight),
				other => return Err(KoraError::InvalidStep(other)),
			}
			let image = session
				.data
				.photos
				.first()
				.cloned()
				.ok_or(KoraError::Validation(String::from(
					"la sesión no tiene una foto guardada",
				)))?;
			session.step = WizardStep::Loading;
			session.error = None;
			Ok((
				session.data.user_id.clone(),
				session.previous_selection.clone().unwrap_or_default(),
				image,
			))
		})
		.await?;

	let result = n8n_client::send_feedback_request(
		http,
		config,
		&user_id,
		input.comentarios.trim(),
		&seleccion_anterior,
		&image,
	)
	.await;
	finish_generation(store, db, lookup, id, result).await
}

/// Aceptar termina el asistente: la sesión se descarta, no hay vuelta atrás
pub async fn accept(store: &SessionStore, id: &Uuid) -> Result<(), KoraError> {
	let session = store.get(id).await?;
	if session.step != WizardStep::Result {
		return Err(KoraError::InvalidStep(session.step));
	}
	store.remove(id).await?;
	Ok(())
}

async fn finish_generation(
	store: &SessionStore,
	db: Option<&Pool<Postgres>>,
	lookup: &LookupConfig,
	id: &Uuid,
	result: Result<crate::models::N8nResponse, KoraError>,
) -> Result<WizardSession, KoraError> {
	match result {
		Ok(response) => {
			let products = enrich_products(db, lookup, response.products).await;
			let image_url = response.image_url.unwrap_or_default();
			let outcome = RenderOutcome {
				image_url,
				style: response.style,
				products,
				message: response.message,
			};

			store
				.update(id, |session| {
					session.previous_selection = Some(
						outcome
							.style
							.clone()
							.unwrap_or_else(|| outcome.image_url.clone()),
					);
					session.outcome = Some(outcome.clone());
					session.step = WizardStep::Result;
					session.error = None;
					Ok(session.clone())
				})
				.await
		}
		Err(e) => {
			log::error!("falló la generación del render: {}", e);
			let _ = store
				.update(id, |session| {
					session.step = WizardStep::Photos;
					session.error = Some(KoraError::RenderFailed.to_string());
					Ok(())
				})
				.await;
			Err(KoraError::RenderFailed)
		}
	}
}

/// Arma el caption para n8n con el estilo, el ambiente y el presupuesto elegidos
pub fn build_caption(data: &WizardData) -> String {
	let personality = if data.preferences.is_empty() {
		String::new()
	} else {
		format!(" User personality: {}.", data.preferences.join(", "))
	};
	let custom = if data.prompt.trim().is_empty() {
		String::new()
	} else {
		format!(" Custom requirements: {}", data.prompt)
	};

	format!(
		"Create a {} style interior design for a {}. Living style preference: {}.{} Budget context: {}.{} Focus on creating a space that feels authentic to the user's personality and practical needs.",
		&data.style,
		&data.room,
		&data.living_style,
		&personality,
		budget_context(&data.budget),
		&custom,
	)
}

fn budget_context(budget: &str) -> String {
	if let Some(amount) = budget.strip_prefix("personalizado:") {
		return format!("Custom budget of {}", amount);
	}

	match budget {
		"economico" => "Budget-conscious transformation with smart, affordable updates",
		"equilibrado" => "Balanced approach mixing higher and lower cost items",
		"premium" => "High-quality materials and designer pieces",
		"personalizado" => "Custom budget requirements",
		_ => "Standard budget approach",
	}
	.to_string()
}

#[cfg(test)]
mod tests {
	use super::*;

	const TINY_PNG: &str =
		"iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";

	fn test_config() -> Config {
		Config {
			host: String::from("127.0.0.1"),
			port: 0,
			database_url: None,
			n8n_initial_webhook_url: String::from("http://127.0.0.1:9/inicial"),
			n8n_feedback_webhook_url: String::from("http://127.0.0.1:9/feedback"),
			proxy_body_limit: 12 * 1024 * 1024,
			photo_payload_limit: 10 * 1024 * 1024,
			max_photo_width: 1920,
			max_photo_height: 1080,
			photo_quality: 80,
		}
	}

	fn profile_input(name: &str) -> ProfileInput {
		ProfileInput {
			user_name: String::from(name),
			user_id: None,
			living_style: Some(String::from("relajado")),
			preferences: Some(vec![String::from("plantas")]),
		}
	}

	#[tokio::test]
	async fn profile_requires_a_name() {
		let store = SessionStore::new();
		let id = store.create().await.session_id;

		let result = submit_profile(&store, &id, profile_input("   ")).await;
		assert!(matches!(result, Err(KoraError::Validation(_))));
		assert_eq!(store.get(&id).await.unwrap().step, WizardStep::Profile);

		let session = submit_profile(&store, &id, profile_input("Clara")).await.unwrap();
		assert_eq!(session.step, WizardStep::Photos);
		assert!(!session.data.user_id.is_empty());
	}

	#[tokio::test]
	async fn client_user_id_is_kept() {
		let store = SessionStore::new();
		let id = store.create().await.session_id;

		let mut input = profile_input("Clara");
		input.user_id = Some(String::from("u-persistente"));
		let session = submit_profile(&store, &id, input).await.unwrap();
		assert_eq!(session.data.user_id, "u-persistente");
	}

	#[tokio::test]
	async fn generate_requires_photos_and_prompt() {
		let store = SessionStore::new();
		let id = store.create().await.session_id;
		submit_profile(&store, &id, profile_input("Clara")).await.unwrap();

		let config = test_config();
		let http = Client::new();
		let lookup = LookupConfig::init();

		// sin fotos no hay viaje a la red y la sesión sigue en Fotos
		let input = GenerateInput {
			photos: vec![],
			prompt: String::from("más luz"),
			style: None,
			room: None,
			budget: None,
		};
		let result = generate(&store, &http, &config, None, &lookup, &id, input).await;
		assert!(matches!(result, Err(KoraError::Validation(_))));
		assert_eq!(store.get(&id).await.unwrap().step, WizardStep::Photos);

		// con foto pero sin prompt tampoco
		let input = GenerateInput {
			photos: vec![String::from(TINY_PNG)],
			prompt: String::from("  "),
			style: None,
			room: None,
			budget: None,
		};
		let result = generate(&store, &http, &config, None, &lookup, &id, input).await;
		assert!(matches!(result, Err(KoraError::Validation(_))));
		assert_eq!(store.get(&id).await.unwrap().step, WizardStep::Photos);
	}

	#[tokio::test]
	async fn generate_rejects_wrong_step() {
		let store = SessionStore::new();
		let id = store.create().await.session_id;

		let config = test_config();
		let http = Client::new();
		let lookup = LookupConfig::init();
		let input = GenerateInput {
			photos: vec![String::from(TINY_PNG)],
			prompt: String::from("más luz"),
			style: None,
			room: None,
			budget: None,
		};

		// todavía en Perfil
		let result = generate(&store, &http, &config, None, &lookup, &id, input).await;
		assert!(matches!(result, Err(KoraError::InvalidStep(WizardStep::Profile))));
	}

	#[tokio::test]
	async fn oversized_photo_is_rejected_before_the_network() {
		let store = SessionStore::new();
		let id = store.create().await.session_id;
		submit_profile(&store, &id, profile_input("Clara")).await.unwrap();

		let mut config = test_config();
		config.photo_payload_limit = 1;
		let http = Client::new();
		let lookup = LookupConfig::init();
		let input = GenerateInput {
			photos: vec![String::from(TINY_PNG)],
			prompt: String::from("más luz"),
			style: None,
			room: None,
			budget: None,
		};

		let result = generate(&store, &http, &config, None, &lookup, &id, input).await;
		assert!(matches!(result, Err(KoraError::PayloadTooLarge { .. })));
		assert_eq!(store.get(&id).await.unwrap().step, WizardStep::Photos);
	}

	#[tokio::test]
	async fn feedback_and_accept_need_a_result() {
		let store = SessionStore::new();
		let id = store.create().await.session_id;

		let config = test_config();
		let http = Client::new();
		let lookup = LookupConfig::init();

		let result = feedback(
			&store,
			&http,
			&config,
			None,
			&lookup,
			&id,
			FeedbackInput {
				comentarios: String::from("más luz"),
			},
		)
		.await;
		assert!(matches!(result, Err(KoraError::InvalidStep(_))));

		let result = accept(&store, &id).await;
		assert!(matches!(result, Err(KoraError::InvalidStep(_))));
	}

	#[test]
	fn caption_includes_preferences_and_budget() {
		let data = WizardData {
			style: String::from("escandinavo"),
			room: String::from("living"),
			living_style: String::from("relajado"),
			preferences: vec![String::from("plantas"), String::from("lectura")],
			prompt: String::from("más luz natural"),
			budget: String::from("premium"),
			..WizardData::default()
		};

		let caption = build_caption(&data);
		assert!(caption.contains("escandinavo"));
		assert!(caption.contains("User personality: plantas, lectura."));
		assert!(caption.contains("High-quality materials"));
		assert!(caption.contains("Custom requirements: más luz natural"));
	}

	#[test]
	fn custom_budget_amount_is_quoted() {
		assert_eq!(budget_context("personalizado:300"), "Custom budget of 300");
		assert_eq!(budget_context("equilibrado"), "Balanced approach mixing higher and lower cost items");
		assert_eq!(budget_context("otro"), "Standard budget approach");
	}
}
