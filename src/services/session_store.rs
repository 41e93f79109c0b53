use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::KoraError;
use crate::models::WizardSession;

/// Almacén en memoria de sesiones del asistente, con interfaz explícita:
/// crear / leer / mutar por id. El lock nunca se mantiene a través de un
/// await de red, el paso `Loading` es el que marca la generación en curso.
#[derive(Clone, Default)]
pub struct SessionStore {
	sessions: Arc<Mutex<HashMap<Uuid, WizardSession>>>,
}

impl SessionStore {
	pub fn new() -> SessionStore {
		SessionStore::default()
	}

	pub async fn create(&self) -> WizardSession {
		let session = WizardSession::new();
		self.sessions
			.lock()
			.await
			.insert(session.session_id, session.clone());
		session
	}

	pub async fn get(&self, id: &Uuid) -> Result<WizardSession, KoraError> {
		self.sessions
			.lock()
			.await
			.get(id)
			.cloned()
			.ok_or(KoraError::SessionNotFound)
	}

	/// Mutación atómica de una sesión, un solo escritor por clave
	pub async fn update<F, T>(&self, id: &Uuid, apply: F) -> Result<T, KoraError>
	where
		F: FnOnce(&mut WizardSession) -> Result<T, KoraError>,
	{
		let mut guard = self.sessions.lock().await;
		let session = guard.get_mut(id).ok_or(KoraError::SessionNotFound)?;
		let out = apply(session)?;
		session.touch();
		Ok(out)
	}

	pub async fn remove(&self, id: &Uuid) -> Result<WizardSession, KoraError> {
		self.sessions
			.lock()
			.await
			.remove(id)
			.ok_or(KoraError::SessionNotFound)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::models::WizardStep;

	#[tokio::test]
	async fn create_get_update_remove() {
		let store = SessionStore::new();
		let session = store.create().await;
		let id = session.session_id;

		let fetched = store.get(&id).await.unwrap();
		assert_eq!(fetched.step, WizardStep::Profile);

		store
			.update(&id, |s| {
				s.step = WizardStep::Photos;
				Ok(())
			})
			.await
			.unwrap();
		assert_eq!(store.get(&id).await.unwrap().step, WizardStep::Photos);

		store.remove(&id).await.unwrap();
		assert!(matches!(
			store.get(&id).await,
			Err(KoraError::SessionNotFound)
		));
	}

	#[tokio::test]
	async fn update_error_leaves_session_intact() {
		let store = SessionStore::new();
		let id = store.create().await.session_id;

		let result: Result<(), KoraError> = store
			.update(&id, |_| Err(KoraError::Validation(String::from("nope"))))
			.await;
		assert!(result.is_err());
		assert_eq!(store.get(&id).await.unwrap().step, WizardStep::Profile);
	}

	#[tokio::test]
	async fn unknown_id_is_not_found() {
		let store = SessionStore::new();
		let id = Uuid::new_v4();
		assert!(matches!(store.get(&id).await, Err(KoraError::SessionNotFound)));
		assert!(matches!(
			store.remove(&id).await,
			Err(KoraError::SessionNotFound)
		));
	}
}
