//! RAG settings domain
//!
//! Retrieval behavior: whether retrieval runs at all, how documents are
//! chunked and fetched, and which embedding model indexes them. Chunking and
//! the embedding model are admin-level; users may only tune `top_k` and
//! citation display.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use tessello_types::prelude::Patch;

use crate::settings::resolve::{OverrideGates, Resolved, SettingSource, resolve_field};

// Tier records //
//**************//

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgRagSettings {
	pub enabled: bool,
	pub top_k: u32,
	pub chunk_size: u32,
	pub chunk_overlap: u32,
	pub citations: bool,
	pub hybrid_search: bool,
	pub embedding_model: Box<str>,
	pub allow_team_customization: bool,
	pub allow_user_customization: bool,
}

impl Default for OrgRagSettings {
	fn default() -> Self {
		Self {
			enabled: true,
			top_k: 5,
			chunk_size: 1000,
			chunk_overlap: 200,
			citations: true,
			hybrid_search: false,
			embedding_model: "auto".into(),
			allow_team_customization: true,
			allow_user_customization: true,
		}
	}
}

#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamRagSettings {
	pub enabled: Option<bool>,
	pub top_k: Option<u32>,
	pub chunk_size: Option<u32>,
	pub chunk_overlap: Option<u32>,
	pub citations: Option<bool>,
	pub hybrid_search: Option<bool>,
	pub embedding_model: Option<Box<str>>,
	pub allow_user_customization: bool,
}

impl Default for TeamRagSettings {
	fn default() -> Self {
		Self {
			enabled: None,
			top_k: None,
			chunk_size: None,
			chunk_overlap: None,
			citations: None,
			hybrid_search: None,
			embedding_model: None,
			allow_user_customization: true,
		}
	}
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRagSettings {
	pub top_k: Option<u32>,
	pub citations: Option<bool>,
}

// Resolution //
//************//

#[derive(Clone, Debug, PartialEq)]
pub struct RagResolution {
	pub enabled: Resolved<bool>,
	pub top_k: Resolved<u32>,
	pub chunk_size: Resolved<u32>,
	pub chunk_overlap: Resolved<u32>,
	pub citations: Resolved<bool>,
	pub hybrid_search: Resolved<bool>,
	pub embedding_model: Resolved<Box<str>>,
	pub gates: OverrideGates,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EffectiveRagSettings {
	pub enabled: bool,
	pub top_k: u32,
	pub chunk_size: u32,
	pub chunk_overlap: u32,
	pub citations: bool,
	pub hybrid_search: bool,
	pub embedding_model: Box<str>,
	pub settings_source: SettingSource,
}

#[must_use]
pub fn resolve(
	org: &OrgRagSettings,
	team: Option<&TeamRagSettings>,
	user: Option<&UserRagSettings>,
) -> RagResolution {
	let gates = OverrideGates::new(
		org.allow_team_customization,
		org.allow_user_customization,
		team.map(|t| t.allow_user_customization),
	);

	RagResolution {
		enabled: resolve_field(gates, org.enabled, team.and_then(|t| t.enabled), None),
		top_k: resolve_field(
			gates,
			org.top_k,
			team.and_then(|t| t.top_k),
			user.and_then(|u| u.top_k),
		),
		chunk_size: resolve_field(gates, org.chunk_size, team.and_then(|t| t.chunk_size), None),
		chunk_overlap: resolve_field(
			gates,
			org.chunk_overlap,
			team.and_then(|t| t.chunk_overlap),
			None,
		),
		citations: resolve_field(
			gates,
			org.citations,
			team.and_then(|t| t.citations),
			user.and_then(|u| u.citations),
		),
		hybrid_search: resolve_field(
			gates,
			org.hybrid_search,
			team.and_then(|t| t.hybrid_search),
			None,
		),
		embedding_model: resolve_field(
			gates,
			org.embedding_model.clone(),
			team.and_then(|t| t.embedding_model.clone()),
			None,
		),
		gates,
	}
}

impl RagResolution {
	#[must_use]
	pub fn settings_source(&self) -> SettingSource {
		[
			self.enabled.source,
			self.top_k.source,
			self.chunk_size.source,
			self.chunk_overlap.source,
			self.citations.source,
			self.hybrid_search.source,
			self.embedding_model.source,
		]
		.into_iter()
		.max()
		.unwrap_or(SettingSource::Org)
	}

	#[must_use]
	pub fn into_effective(self) -> EffectiveRagSettings {
		let settings_source = self.settings_source();
		EffectiveRagSettings {
			enabled: self.enabled.value,
			top_k: self.top_k.value,
			chunk_size: self.chunk_size.value,
			chunk_overlap: self.chunk_overlap.value,
			citations: self.citations.value,
			hybrid_search: self.hybrid_search.value,
			embedding_model: self.embedding_model.value,
			settings_source,
		}
	}
}

// Update payloads //
//*****************//

#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgRagPatch {
	pub enabled: Option<bool>,
	pub top_k: Option<u32>,
	pub chunk_size: Option<u32>,
	pub chunk_overlap: Option<u32>,
	pub citations: Option<bool>,
	pub hybrid_search: Option<bool>,
	pub embedding_model: Option<Box<str>>,
	pub allow_team_customization: Option<bool>,
	pub allow_user_customization: Option<bool>,
}

impl OrgRagPatch {
	pub fn apply(self, settings: &mut OrgRagSettings) {
		if let Some(v) = self.enabled {
			settings.enabled = v;
		}
		if let Some(v) = self.top_k {
			settings.top_k = v;
		}
		if let Some(v) = self.chunk_size {
			settings.chunk_size = v;
		}
		if let Some(v) = self.chunk_overlap {
			settings.chunk_overlap = v;
		}
		if let Some(v) = self.citations {
			settings.citations = v;
		}
		if let Some(v) = self.hybrid_search {
			settings.hybrid_search = v;
		}
		if let Some(v) = self.embedding_model {
			settings.embedding_model = v;
		}
		if let Some(v) = self.allow_team_customization {
			settings.allow_team_customization = v;
		}
		if let Some(v) = self.allow_user_customization {
			settings.allow_user_customization = v;
		}
	}
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct TeamRagPatch {
	pub enabled: Patch<bool>,
	pub top_k: Patch<u32>,
	pub chunk_size: Patch<u32>,
	pub chunk_overlap: Patch<u32>,
	pub citations: Patch<bool>,
	pub hybrid_search: Patch<bool>,
	pub embedding_model: Patch<Box<str>>,
	pub allow_user_customization: Option<bool>,
}

impl TeamRagPatch {
	pub fn apply(self, settings: &mut TeamRagSettings) {
		settings.enabled = self.enabled.apply_to(settings.enabled.take());
		settings.top_k = self.top_k.apply_to(settings.top_k.take());
		settings.chunk_size = self.chunk_size.apply_to(settings.chunk_size.take());
		settings.chunk_overlap = self.chunk_overlap.apply_to(settings.chunk_overlap.take());
		settings.citations = self.citations.apply_to(settings.citations.take());
		settings.hybrid_search = self.hybrid_search.apply_to(settings.hybrid_search.take());
		settings.embedding_model = self.embedding_model.apply_to(settings.embedding_model.take());
		if let Some(v) = self.allow_user_customization {
			settings.allow_user_customization = v;
		}
	}
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserRagPatch {
	pub top_k: Patch<u32>,
	pub citations: Patch<bool>,
}

impl UserRagPatch {
	pub fn apply(self, settings: &mut UserRagSettings) {
		settings.top_k = self.top_k.apply_to(settings.top_k.take());
		settings.citations = self.citations.apply_to(settings.citations.take());
	}
}


// vim: ts=4
