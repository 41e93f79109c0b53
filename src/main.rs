mod api;
mod config;
mod error;
mod models;
mod processing;
mod routes;
mod services;

use api::LookupConfig;
use config::Config;
use dotenv::dotenv;
use routes::{build_router, AppState};
use services::SessionStore;
use sqlx::postgres::PgPoolOptions;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
	dotenv().ok();

	if std::env::var_os("RUST_LOG").is_none() {
		std::env::set_var("RUST_LOG", "kora=info,tower_http=info");
	}
	env_logger::init();

	let config = Config::init();
	println!("Starting Kora render service...");

	// el catálogo es best-effort: sin base el servicio arranca igual y los
	// productos salen sin enriquecer
	let pool = match &config.database_url {
		Some(database_url) => {
			match PgPoolOptions::new()
				.max_connections(10)
				.connect(database_url)
				.await
			{
				Ok(pool) => {
					println!("✅ Connection to the database is successful!");
					Some(pool)
				}
				Err(err) => {
					println!("🔥 Failed to connect to the database: {:?}", err);
					None
				}
			}
		}
		None => {
			println!("DATABASE_URL not set, catálogo deshabilitado");
			None
		}
	};

	let state = AppState {
		http: reqwest::Client::new(),
		db: pool,
		lookup: LookupConfig::init(),
		sessions: SessionStore::new(),
		config: config.clone(),
	};

	let addr = format!("{}:{}", &config.host, &config.port);
	let listener = tokio::net::TcpListener::bind(&addr).await?;
	println!("Kora escuchando en http://{}", &addr);

	axum::serve(listener, build_router(state)).await?;

	Ok(())
}
