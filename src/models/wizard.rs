use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct WizardData {
	pub photos: Vec<String>,
	pub photo_previews: Vec<String>,
	pub style: String,
	pub budget: String,
	pub room: String,
	pub preferences: Vec<String>,
	pub prompt: String,
	pub user_name: String,
	pub living_style: String,
	pub user_id: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProfileInput {
	pub user_name: String,
	pub user_id: Option<String>,
	pub living_style: Option<String>,
	pub preferences: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GenerateInput {
	pub photos: Vec<String>,
	pub prompt: String,
	pub style: Option<String>,
	pub room: Option<String>,
	pub budget: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedbackInput {
	pub comentarios: String,
}
