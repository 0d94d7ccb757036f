//! LLM settings domain
//!
//! Provider and model selection plus sampling parameters, in three tiers.
//! This is the only domain with a per-request override path: the org-level
//! `allow_per_request_model_selection` gate lets a single call pass ad-hoc
//! values that bypass the stored tiers entirely.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use tessello_types::prelude::{Error, Patch, TsResult};

use crate::settings::resolve::{OverrideGates, Resolved, SettingSource, resolve_field};

// Tier records //
//**************//

/// Org tier: concrete defaults for every field plus the override gates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgLlmSettings {
	pub provider: Box<str>,
	pub model: Box<str>,
	pub temperature: f32,
	pub top_p: f32,
	pub max_tokens: u32,
	pub system_prompt: Box<str>,
	/// Models to fall back to when the primary is unavailable. Resolves as a
	/// whole list.
	pub fallback_models: Vec<Box<str>>,
	/// Models no one in this scope may select. Resolves as a whole list.
	pub disabled_models: Vec<Box<str>>,
	pub allow_team_customization: bool,
	pub allow_user_customization: bool,
	pub allow_per_request_model_selection: bool,
}

impl Default for OrgLlmSettings {
	fn default() -> Self {
		Self {
			provider: "openai".into(),
			model: "auto".into(),
			temperature: 0.7,
			top_p: 1.0,
			max_tokens: 4096,
			system_prompt: "".into(),
			fallback_models: Vec::new(),
			disabled_models: Vec::new(),
			allow_team_customization: true,
			allow_user_customization: true,
			allow_per_request_model_selection: false,
		}
	}
}

/// Team tier: every value optional, plus the team's own user gate.
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamLlmSettings {
	pub provider: Option<Box<str>>,
	pub model: Option<Box<str>>,
	pub temperature: Option<f32>,
	pub top_p: Option<f32>,
	pub max_tokens: Option<u32>,
	pub system_prompt: Option<Box<str>>,
	pub fallback_models: Option<Vec<Box<str>>>,
	pub disabled_models: Option<Vec<Box<str>>>,
	pub allow_user_customization: bool,
}

impl Default for TeamLlmSettings {
	fn default() -> Self {
		Self {
			provider: None,
			model: None,
			temperature: None,
			top_p: None,
			max_tokens: None,
			system_prompt: None,
			fallback_models: None,
			disabled_models: None,
			allow_user_customization: true,
		}
	}
}

/// User tier: terminal personal preferences, no further gate. Provider and
/// the model lists stay admin-controlled and have no user override.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserLlmSettings {
	pub model: Option<Box<str>>,
	pub temperature: Option<f32>,
	pub top_p: Option<f32>,
	pub max_tokens: Option<u32>,
	pub system_prompt: Option<Box<str>>,
}

// Resolution //
//************//

/// Ad-hoc values for one call, honored only under the org per-request gate.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmRequestOverrides {
	pub model: Option<Box<str>>,
	pub temperature: Option<f32>,
	pub top_p: Option<f32>,
	pub max_tokens: Option<u32>,
}

/// Per-field resolution result, carrying each field's provenance.
#[derive(Clone, Debug, PartialEq)]
pub struct LlmResolution {
	pub provider: Resolved<Box<str>>,
	pub model: Resolved<Box<str>>,
	pub temperature: Resolved<f32>,
	pub top_p: Resolved<f32>,
	pub max_tokens: Resolved<u32>,
	pub system_prompt: Resolved<Box<str>>,
	pub fallback_models: Resolved<Vec<Box<str>>>,
	pub disabled_models: Resolved<Vec<Box<str>>>,
	pub gates: OverrideGates,
	pub per_request_selection_allowed: bool,
}

/// Resolved settings in the wire shape.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EffectiveLlmSettings {
	pub provider: Box<str>,
	pub model: Box<str>,
	pub temperature: f32,
	pub top_p: f32,
	pub max_tokens: u32,
	pub system_prompt: Box<str>,
	pub fallback_models: Vec<Box<str>>,
	pub disabled_models: Vec<Box<str>>,
	pub settings_source: SettingSource,
	pub can_change_model: bool,
	pub can_change_parameters: bool,
	pub per_request_selection_allowed: bool,
}

/// Resolves the three tiers of the LLM domain field by field.
#[must_use]
pub fn resolve(
	org: &OrgLlmSettings,
	team: Option<&TeamLlmSettings>,
	user: Option<&UserLlmSettings>,
) -> LlmResolution {
	let gates = OverrideGates::new(
		org.allow_team_customization,
		org.allow_user_customization,
		team.map(|t| t.allow_user_customization),
	);

	LlmResolution {
		provider: resolve_field(gates, org.provider.clone(), team.and_then(|t| t.provider.clone()), None),
		model: resolve_field(
			gates,
			org.model.clone(),
			team.and_then(|t| t.model.clone()),
			user.and_then(|u| u.model.clone()),
		),
		temperature: resolve_field(
			gates,
			org.temperature,
			team.and_then(|t| t.temperature),
			user.and_then(|u| u.temperature),
		),
		top_p: resolve_field(gates, org.top_p, team.and_then(|t| t.top_p), user.and_then(|u| u.top_p)),
		max_tokens: resolve_field(
			gates,
			org.max_tokens,
			team.and_then(|t| t.max_tokens),
			user.and_then(|u| u.max_tokens),
		),
		system_prompt: resolve_field(
			gates,
			org.system_prompt.clone(),
			team.and_then(|t| t.system_prompt.clone()),
			user.and_then(|u| u.system_prompt.clone()),
		),
		fallback_models: resolve_field(
			gates,
			org.fallback_models.clone(),
			team.and_then(|t| t.fallback_models.clone()),
			None,
		),
		disabled_models: resolve_field(
			gates,
			org.disabled_models.clone(),
			team.and_then(|t| t.disabled_models.clone()),
			None,
		),
		gates,
		per_request_selection_allowed: org.allow_per_request_model_selection,
	}
}

impl LlmResolution {
	/// Overlays per-request values. A request model is checked against the
	/// effective disabled-model list and rejected when disabled; a closed
	/// per-request gate ignores the overrides entirely.
	pub fn apply_request(mut self, request: &LlmRequestOverrides) -> TsResult<LlmResolution> {
		if !self.per_request_selection_allowed {
			return Ok(self);
		}
		if let Some(model) = &request.model {
			if self.disabled_models.value.iter().any(|m| m == model) {
				return Err(Error::ValidationError(format!(
					"model '{model}' is disabled in this scope"
				)));
			}
		}
		self.model = self.model.with_request(request.model.clone());
		self.temperature = self.temperature.with_request(request.temperature);
		self.top_p = self.top_p.with_request(request.top_p);
		self.max_tokens = self.max_tokens.with_request(request.max_tokens);
		Ok(self)
	}

	/// The most specific tier that won any field.
	#[must_use]
	pub fn settings_source(&self) -> SettingSource {
		[
			self.provider.source,
			self.model.source,
			self.temperature.source,
			self.top_p.source,
			self.max_tokens.source,
			self.system_prompt.source,
			self.fallback_models.source,
			self.disabled_models.source,
		]
		.into_iter()
		.max()
		.unwrap_or(SettingSource::Org)
	}

	#[must_use]
	pub fn into_effective(self) -> EffectiveLlmSettings {
		let settings_source = self.settings_source();
		EffectiveLlmSettings {
			provider: self.provider.value,
			model: self.model.value,
			temperature: self.temperature.value,
			top_p: self.top_p.value,
			max_tokens: self.max_tokens.value,
			system_prompt: self.system_prompt.value,
			fallback_models: self.fallback_models.value,
			disabled_models: self.disabled_models.value,
			settings_source,
			can_change_model: self.gates.user,
			can_change_parameters: self.gates.user,
			per_request_selection_allowed: self.per_request_selection_allowed,
		}
	}
}

// Update payloads //
//*****************//

/// Org-tier partial update. Absent fields keep their stored value; the field
/// names are a strict subset of the read shape.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgLlmPatch {
	pub provider: Option<Box<str>>,
	pub model: Option<Box<str>>,
	pub temperature: Option<f32>,
	pub top_p: Option<f32>,
	pub max_tokens: Option<u32>,
	pub system_prompt: Option<Box<str>>,
	pub fallback_models: Option<Vec<Box<str>>>,
	pub disabled_models: Option<Vec<Box<str>>>,
	pub allow_team_customization: Option<bool>,
	pub allow_user_customization: Option<bool>,
	pub allow_per_request_model_selection: Option<bool>,
}

impl OrgLlmPatch {
	pub fn apply(self, settings: &mut OrgLlmSettings) {
		if let Some(v) = self.provider {
			settings.provider = v;
		}
		if let Some(v) = self.model {
			settings.model = v;
		}
		if let Some(v) = self.temperature {
			settings.temperature = v;
		}
		if let Some(v) = self.top_p {
			settings.top_p = v;
		}
		if let Some(v) = self.max_tokens {
			settings.max_tokens = v;
		}
		if let Some(v) = self.system_prompt {
			settings.system_prompt = v;
		}
		if let Some(v) = self.fallback_models {
			settings.fallback_models = v;
		}
		if let Some(v) = self.disabled_models {
			settings.disabled_models = v;
		}
		if let Some(v) = self.allow_team_customization {
			settings.allow_team_customization = v;
		}
		if let Some(v) = self.allow_user_customization {
			settings.allow_user_customization = v;
		}
		if let Some(v) = self.allow_per_request_model_selection {
			settings.allow_per_request_model_selection = v;
		}
	}
}

/// Team-tier update. `Patch` fields are tri-state: absent leaves the stored
/// override, `null` clears it back to inherit, a value sets it.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct TeamLlmPatch {
	pub provider: Patch<Box<str>>,
	pub model: Patch<Box<str>>,
	pub temperature: Patch<f32>,
	pub top_p: Patch<f32>,
	pub max_tokens: Patch<u32>,
	pub system_prompt: Patch<Box<str>>,
	pub fallback_models: Patch<Vec<Box<str>>>,
	pub disabled_models: Patch<Vec<Box<str>>>,
	pub allow_user_customization: Option<bool>,
}

impl TeamLlmPatch {
	pub fn apply(self, settings: &mut TeamLlmSettings) {
		settings.provider = self.provider.apply_to(settings.provider.take());
		settings.model = self.model.apply_to(settings.model.take());
		settings.temperature = self.temperature.apply_to(settings.temperature.take());
		settings.top_p = self.top_p.apply_to(settings.top_p.take());
		settings.max_tokens = self.max_tokens.apply_to(settings.max_tokens.take());
		settings.system_prompt = self.system_prompt.apply_to(settings.system_prompt.take());
		settings.fallback_models = self.fallback_models.apply_to(settings.fallback_models.take());
		settings.disabled_models = self.disabled_models.apply_to(settings.disabled_models.take());
		if let Some(v) = self.allow_user_customization {
			settings.allow_user_customization = v;
		}
	}
}

/// User-tier update, same tri-state semantics as the team patch.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserLlmPatch {
	pub model: Patch<Box<str>>,
	pub temperature: Patch<f32>,
	pub top_p: Patch<f32>,
	pub max_tokens: Patch<u32>,
	pub system_prompt: Patch<Box<str>>,
}

impl UserLlmPatch {
	pub fn apply(self, settings: &mut UserLlmSettings) {
		settings.model = self.model.apply_to(settings.model.take());
		settings.temperature = self.temperature.apply_to(settings.temperature.take());
		settings.top_p = self.top_p.apply_to(settings.top_p.take());
		settings.max_tokens = self.max_tokens.apply_to(settings.max_tokens.take());
		settings.system_prompt = self.system_prompt.apply_to(settings.system_prompt.take());
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn team_with_temperature(temperature: f32, allow_user: bool) -> TeamLlmSettings {
		TeamLlmSettings {
			temperature: Some(temperature),
			allow_user_customization: allow_user,
			..TeamLlmSettings::default()
		}
	}

	fn user_with_temperature(temperature: f32) -> UserLlmSettings {
		UserLlmSettings { temperature: Some(temperature), ..UserLlmSettings::default() }
	}

	#[test]
	fn test_org_defaults_resolve_as_org() {
		let org = OrgLlmSettings::default();
		let resolution = resolve(&org, None, None);
		assert_eq!(resolution.temperature.value, 0.7);
		assert_eq!(resolution.temperature.source, SettingSource::Org);
		assert_eq!(resolution.model.value.as_ref(), "auto");
		assert_eq!(resolution.settings_source(), SettingSource::Org);
	}

	#[test]
	fn test_team_wins_when_user_gate_closed_by_team() {
		// Org default 0.7, team 0.2 with its user gate closed, user 0.9.
		let org = OrgLlmSettings::default();
		let team = team_with_temperature(0.2, false);
		let user = user_with_temperature(0.9);

		let resolution = resolve(&org, Some(&team), Some(&user));
		assert_eq!(resolution.temperature.value, 0.2);
		assert_eq!(resolution.temperature.source, SettingSource::Team);
	}

	#[test]
	fn test_stored_team_value_inert_under_closed_org_gate() {
		let org = OrgLlmSettings { allow_team_customization: false, ..OrgLlmSettings::default() };
		let team = team_with_temperature(0.2, true);

		let resolution = resolve(&org, Some(&team), None);
		assert_eq!(resolution.temperature.value, 0.7);
		assert_eq!(resolution.temperature.source, SettingSource::Org);
		// The stored record is untouched; reopening the gate revives it.
		assert_eq!(team.temperature, Some(0.2));
	}

	#[test]
	fn test_user_override_wins_through_open_gates() {
		let org = OrgLlmSettings::default();
		let team = team_with_temperature(0.2, true);
		let user = user_with_temperature(0.9);

		let resolution = resolve(&org, Some(&team), Some(&user));
		assert_eq!(resolution.temperature.value, 0.9);
		assert_eq!(resolution.temperature.source, SettingSource::User);
		assert_eq!(resolution.settings_source(), SettingSource::User);
	}

	#[test]
	fn test_effective_reports_user_gate_chain() {
		let org = OrgLlmSettings::default();
		let team = team_with_temperature(0.2, false);

		let effective = resolve(&org, Some(&team), None).into_effective();
		assert!(!effective.can_change_model);
		assert!(!effective.can_change_parameters);

		let effective_teamless = resolve(&org, None, None).into_effective();
		assert!(effective_teamless.can_change_model);
	}

	#[test]
	fn test_request_override_needs_the_org_gate() {
		let org = OrgLlmSettings::default();
		let request =
			LlmRequestOverrides { model: Some("large".into()), ..LlmRequestOverrides::default() };

		let resolution = resolve(&org, None, None).apply_request(&request).expect("apply");
		// Gate is closed by default: the override is ignored, not an error.
		assert_eq!(resolution.model.value.as_ref(), "auto");
		assert_eq!(resolution.model.source, SettingSource::Org);
	}

	#[test]
	fn test_request_model_validated_against_disabled_list() {
		let org = OrgLlmSettings {
			disabled_models: vec!["large".into()],
			allow_per_request_model_selection: true,
			..OrgLlmSettings::default()
		};
		let request =
			LlmRequestOverrides { model: Some("large".into()), ..LlmRequestOverrides::default() };

		let err = resolve(&org, None, None).apply_request(&request).unwrap_err();
		assert!(matches!(err, Error::ValidationError(msg) if msg.contains("large")));
	}

	#[test]
	fn test_request_override_reports_request_source() {
		let org = OrgLlmSettings {
			allow_per_request_model_selection: true,
			..OrgLlmSettings::default()
		};
		let request = LlmRequestOverrides {
			model: Some("small".into()),
			temperature: Some(0.1),
			..LlmRequestOverrides::default()
		};

		let resolution = resolve(&org, None, None).apply_request(&request).expect("apply");
		assert_eq!(resolution.model.source, SettingSource::Request);
		assert_eq!(resolution.temperature.value, 0.1);
		assert_eq!(resolution.settings_source(), SettingSource::Request);

		let effective = resolution.into_effective();
		assert_eq!(effective.settings_source, SettingSource::Request);
	}

	#[test]
	fn test_partial_stored_row_fills_from_defaults() {
		let row = serde_json::json!({ "temperature": 0.4 });
		let org: OrgLlmSettings = serde_json::from_value(row).expect("deserialize");
		assert_eq!(org.temperature, 0.4);
		assert_eq!(org.model.as_ref(), "auto");
		assert!(org.allow_team_customization);
	}

	#[test]
	fn test_org_patch_fields_subset_of_read_shape() {
		let patch = OrgLlmPatch {
			provider: Some("anthropic".into()),
			model: Some("large".into()),
			temperature: Some(0.3),
			top_p: Some(0.95),
			max_tokens: Some(2048),
			system_prompt: Some("be brief".into()),
			fallback_models: Some(vec!["small".into()]),
			disabled_models: Some(vec![]),
			allow_team_customization: Some(false),
			allow_user_customization: Some(false),
			allow_per_request_model_selection: Some(true),
		};
		let patch_json = serde_json::to_value(&patch).expect("serialize");
		let read_json = serde_json::to_value(OrgLlmSettings::default()).expect("serialize");

		let patch_keys: Vec<&String> =
			patch_json.as_object().map(|o| o.keys().collect()).unwrap_or_default();
		let read_obj = read_json.as_object().cloned().unwrap_or_default();
		for key in patch_keys {
			assert!(read_obj.contains_key(key), "patch-only field: {key}");
		}
	}

	#[test]
	fn test_team_patch_tristate() {
		let mut settings = team_with_temperature(0.2, true);
		settings.model = Some("large".into());

		// model untouched, temperature cleared, top_p set
		let patch: TeamLlmPatch =
			serde_json::from_value(serde_json::json!({ "temperature": null, "top_p": 0.5 }))
				.expect("parse");
		patch.apply(&mut settings);

		assert_eq!(settings.model.as_deref(), Some("large"));
		assert_eq!(settings.temperature, None);
		assert_eq!(settings.top_p, Some(0.5));
	}
}

// vim: ts=4
