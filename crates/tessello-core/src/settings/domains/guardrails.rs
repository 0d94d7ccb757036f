//! Guardrails settings domain
//!
//! Content controls: blocked terms, PII redaction, moderation level, and the
//! daily message cap. This domain has no user tier at all; individual users
//! never loosen or tighten guardrails, so resolution runs over the org and
//! team tiers only and the org record carries a single team gate.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use tessello_types::prelude::Patch;

use crate::settings::resolve::{OverrideGates, Resolved, SettingSource, resolve_field};

/// How aggressively content is moderated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationLevel {
	Off,
	Low,
	#[default]
	Standard,
	Strict,
}

// Tier records //
//**************//

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgGuardrailsSettings {
	pub enabled: bool,
	/// Terms that block a message outright. Resolves as a whole list.
	pub blocked_terms: Vec<Box<str>>,
	pub pii_redaction: bool,
	pub moderation_level: ModerationLevel,
	/// Messages per member per day; 0 means no cap.
	pub daily_message_cap: u32,
	pub allow_team_customization: bool,
}

impl Default for OrgGuardrailsSettings {
	fn default() -> Self {
		Self {
			enabled: true,
			blocked_terms: Vec::new(),
			pii_redaction: false,
			moderation_level: ModerationLevel::Standard,
			daily_message_cap: 0,
			allow_team_customization: true,
		}
	}
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamGuardrailsSettings {
	pub enabled: Option<bool>,
	pub blocked_terms: Option<Vec<Box<str>>>,
	pub pii_redaction: Option<bool>,
	pub moderation_level: Option<ModerationLevel>,
	pub daily_message_cap: Option<u32>,
}

// Resolution //
//************//

#[derive(Clone, Debug, PartialEq)]
pub struct GuardrailsResolution {
	pub enabled: Resolved<bool>,
	pub blocked_terms: Resolved<Vec<Box<str>>>,
	pub pii_redaction: Resolved<bool>,
	pub moderation_level: Resolved<ModerationLevel>,
	pub daily_message_cap: Resolved<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EffectiveGuardrailsSettings {
	pub enabled: bool,
	pub blocked_terms: Vec<Box<str>>,
	pub pii_redaction: bool,
	pub moderation_level: ModerationLevel,
	pub daily_message_cap: u32,
	pub settings_source: SettingSource,
}

#[must_use]
pub fn resolve(
	org: &OrgGuardrailsSettings,
	team: Option<&TeamGuardrailsSettings>,
) -> GuardrailsResolution {
	let gates = OverrideGates::new(org.allow_team_customization, false, None);

	GuardrailsResolution {
		enabled: resolve_field(gates, org.enabled, team.and_then(|t| t.enabled), None),
		blocked_terms: resolve_field(
			gates,
			org.blocked_terms.clone(),
			team.and_then(|t| t.blocked_terms.clone()),
			None,
		),
		pii_redaction: resolve_field(
			gates,
			org.pii_redaction,
			team.and_then(|t| t.pii_redaction),
			None,
		),
		moderation_level: resolve_field(
			gates,
			org.moderation_level,
			team.and_then(|t| t.moderation_level),
			None,
		),
		daily_message_cap: resolve_field(
			gates,
			org.daily_message_cap,
			team.and_then(|t| t.daily_message_cap),
			None,
		),
	}
}

impl GuardrailsResolution {
	#[must_use]
	pub fn settings_source(&self) -> SettingSource {
		[
			self.enabled.source,
			self.blocked_terms.source,
			self.pii_redaction.source,
			self.moderation_level.source,
			self.daily_message_cap.source,
		]
		.into_iter()
		.max()
		.unwrap_or(SettingSource::Org)
	}

	#[must_use]
	pub fn into_effective(self) -> EffectiveGuardrailsSettings {
		let settings_source = self.settings_source();
		EffectiveGuardrailsSettings {
			enabled: self.enabled.value,
			blocked_terms: self.blocked_terms.value,
			pii_redaction: self.pii_redaction.value,
			moderation_level: self.moderation_level.value,
			daily_message_cap: self.daily_message_cap.value,
			settings_source,
		}
	}
}

// Update payloads //
//*****************//

#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgGuardrailsPatch {
	pub enabled: Option<bool>,
	pub blocked_terms: Option<Vec<Box<str>>>,
	pub pii_redaction: Option<bool>,
	pub moderation_level: Option<ModerationLevel>,
	pub daily_message_cap: Option<u32>,
	pub allow_team_customization: Option<bool>,
}

impl OrgGuardrailsPatch {
	pub fn apply(self, settings: &mut OrgGuardrailsSettings) {
		if let Some(v) = self.enabled {
			settings.enabled = v;
		}
		if let Some(v) = self.blocked_terms {
			settings.blocked_terms = v;
		}
		if let Some(v) = self.pii_redaction {
			settings.pii_redaction = v;
		}
		if let Some(v) = self.moderation_level {
			settings.moderation_level = v;
		}
		if let Some(v) = self.daily_message_cap {
			settings.daily_message_cap = v;
		}
		if let Some(v) = self.allow_team_customization {
			settings.allow_team_customization = v;
		}
	}
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct TeamGuardrailsPatch {
	pub enabled: Patch<bool>,
	pub blocked_terms: Patch<Vec<Box<str>>>,
	pub pii_redaction: Patch<bool>,
	pub moderation_level: Patch<ModerationLevel>,
	pub daily_message_cap: Patch<u32>,
}

impl TeamGuardrailsPatch {
	pub fn apply(self, settings: &mut TeamGuardrailsSettings) {
		settings.enabled = self.enabled.apply_to(settings.enabled.take());
		settings.blocked_terms = self.blocked_terms.apply_to(settings.blocked_terms.take());
		settings.pii_redaction = self.pii_redaction.apply_to(settings.pii_redaction.take());
		settings.moderation_level =
			self.moderation_level.apply_to(settings.moderation_level.take());
		settings.daily_message_cap =
			self.daily_message_cap.apply_to(settings.daily_message_cap.take());
	}
}


// vim: ts=4
