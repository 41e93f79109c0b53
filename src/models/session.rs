use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{RenderProduct, WizardData};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
	Profile,
	Photos,
	Loading,
	Result,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RenderOutcome {
	pub image_url: String,
	pub style: Option<String>,
	pub products: Vec<RenderProduct>,
	pub message: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct WizardSession {
	pub session_id: Uuid,
	pub step: WizardStep,
	pub data: WizardData,
	pub outcome: Option<RenderOutcome>,
	pub previous_selection: Option<String>,
	pub error: Option<String>,
	pub created_ts: DateTime<Utc>,
	pub updated_ts: DateTime<Utc>,
}

impl WizardSession {
	pub fn new() -> Self {
		let now = Utc::now();
		WizardSession {
			session_id: Uuid::new_v4(),
			step: WizardStep::Profile,
			data: WizardData::default(),
			outcome: None,
			previous_selection: None,
			error: None,
			created_ts: now,
			updated_ts: now,
		}
	}

	pub fn touch(&mut self) {
		self.updated_ts = Utc::now();
	}
}
