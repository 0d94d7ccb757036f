//! Chat feature settings domain
//!
//! Which chat features are switched on for a scope, and how long chats are
//! kept. Users may toggle streaming and the prompt library for themselves;
//! uploads, image input, and retention are admin-level.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use tessello_types::prelude::Patch;

use crate::settings::resolve::{OverrideGates, Resolved, SettingSource, resolve_field};

// Tier records //
//**************//

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgChatSettings {
	pub streaming: bool,
	pub file_uploads: bool,
	pub image_input: bool,
	pub prompt_library: bool,
	/// Days before a chat is purged; 0 means keep forever.
	pub retention_days: u32,
	pub allow_team_customization: bool,
	pub allow_user_customization: bool,
}

impl Default for OrgChatSettings {
	fn default() -> Self {
		Self {
			streaming: true,
			file_uploads: true,
			image_input: false,
			prompt_library: true,
			retention_days: 90,
			allow_team_customization: true,
			allow_user_customization: true,
		}
	}
}

#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamChatSettings {
	pub streaming: Option<bool>,
	pub file_uploads: Option<bool>,
	pub image_input: Option<bool>,
	pub prompt_library: Option<bool>,
	pub retention_days: Option<u32>,
	pub allow_user_customization: bool,
}

impl Default for TeamChatSettings {
	fn default() -> Self {
		Self {
			streaming: None,
			file_uploads: None,
			image_input: None,
			prompt_library: None,
			retention_days: None,
			allow_user_customization: true,
		}
	}
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserChatSettings {
	pub streaming: Option<bool>,
	pub prompt_library: Option<bool>,
}

// Resolution //
//************//

#[derive(Clone, Debug, PartialEq)]
pub struct ChatResolution {
	pub streaming: Resolved<bool>,
	pub file_uploads: Resolved<bool>,
	pub image_input: Resolved<bool>,
	pub prompt_library: Resolved<bool>,
	pub retention_days: Resolved<u32>,
	pub gates: OverrideGates,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EffectiveChatSettings {
	pub streaming: bool,
	pub file_uploads: bool,
	pub image_input: bool,
	pub prompt_library: bool,
	pub retention_days: u32,
	pub settings_source: SettingSource,
}

#[must_use]
pub fn resolve(
	org: &OrgChatSettings,
	team: Option<&TeamChatSettings>,
	user: Option<&UserChatSettings>,
) -> ChatResolution {
	let gates = OverrideGates::new(
		org.allow_team_customization,
		org.allow_user_customization,
		team.map(|t| t.allow_user_customization),
	);

	ChatResolution {
		streaming: resolve_field(
			gates,
			org.streaming,
			team.and_then(|t| t.streaming),
			user.and_then(|u| u.streaming),
		),
		file_uploads: resolve_field(
			gates,
			org.file_uploads,
			team.and_then(|t| t.file_uploads),
			None,
		),
		image_input: resolve_field(gates, org.image_input, team.and_then(|t| t.image_input), None),
		prompt_library: resolve_field(
			gates,
			org.prompt_library,
			team.and_then(|t| t.prompt_library),
			user.and_then(|u| u.prompt_library),
		),
		retention_days: resolve_field(
			gates,
			org.retention_days,
			team.and_then(|t| t.retention_days),
			None,
		),
		gates,
	}
}

impl ChatResolution {
	#[must_use]
	pub fn settings_source(&self) -> SettingSource {
		[
			self.streaming.source,
			self.file_uploads.source,
			self.image_input.source,
			self.prompt_library.source,
			self.retention_days.source,
		]
		.into_iter()
		.max()
		.unwrap_or(SettingSource::Org)
	}

	#[must_use]
	pub fn into_effective(self) -> EffectiveChatSettings {
		let settings_source = self.settings_source();
		EffectiveChatSettings {
			streaming: self.streaming.value,
			file_uploads: self.file_uploads.value,
			image_input: self.image_input.value,
			prompt_library: self.prompt_library.value,
			retention_days: self.retention_days.value,
			settings_source,
		}
	}
}

// Update payloads //
//*****************//

#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgChatPatch {
	pub streaming: Option<bool>,
	pub file_uploads: Option<bool>,
	pub image_input: Option<bool>,
	pub prompt_library: Option<bool>,
	pub retention_days: Option<u32>,
	pub allow_team_customization: Option<bool>,
	pub allow_user_customization: Option<bool>,
}

impl OrgChatPatch {
	pub fn apply(self, settings: &mut OrgChatSettings) {
		if let Some(v) = self.streaming {
			settings.streaming = v;
		}
		if let Some(v) = self.file_uploads {
			settings.file_uploads = v;
		}
		if let Some(v) = self.image_input {
			settings.image_input = v;
		}
		if let Some(v) = self.prompt_library {
			settings.prompt_library = v;
		}
		if let Some(v) = self.retention_days {
			settings.retention_days = v;
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
pub struct TeamChatPatch {
	pub streaming: Patch<bool>,
	pub file_uploads: Patch<bool>,
	pub image_input: Patch<bool>,
	pub prompt_library: Patch<bool>,
	pub retention_days: Patch<u32>,
	pub allow_user_customization: Option<bool>,
}

impl TeamChatPatch {
	pub fn apply(self, settings: &mut TeamChatSettings) {
		settings.streaming = self.streaming.apply_to(settings.streaming.take());
		settings.file_uploads = self.file_uploads.apply_to(settings.file_uploads.take());
		settings.image_input = self.image_input.apply_to(settings.image_input.take());
		settings.prompt_library = self.prompt_library.apply_to(settings.prompt_library.take());
		settings.retention_days = self.retention_days.apply_to(settings.retention_days.take());
		if let Some(v) = self.allow_user_customization {
			settings.allow_user_customization = v;
		}
	}
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserChatPatch {
	pub streaming: Patch<bool>,
	pub prompt_library: Patch<bool>,
}

impl UserChatPatch {
	pub fn apply(self, settings: &mut UserChatSettings) {
		settings.streaming = self.streaming.apply_to(settings.streaming.take());
		settings.prompt_library = self.prompt_library.apply_to(settings.prompt_library.take());
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_user_streaming_preference() {
		let org = OrgChatSettings::default();
		let user = UserChatSettings { streaming: Some(false), prompt_library: None };
		let effective = resolve(&org, None, Some(&user)).into_effective();

		assert!(!effective.streaming);
		assert_eq!(effective.settings_source, SettingSource::User);
	}

	#[test]
	fn test_retention_is_admin_level() {
		let org = OrgChatSettings::default();
		let team =
			TeamChatSettings { retention_days: Some(30), ..TeamChatSettings::default() };
		let resolution = resolve(&org, Some(&team), None);

		assert_eq!(resolution.retention_days.value, 30);
		assert_eq!(resolution.retention_days.source, SettingSource::Team);
	}

	#[test]
	fn test_patch_apply() {
		let mut org = OrgChatSettings::default();
		let patch = OrgChatPatch {
			image_input: Some(true),
			retention_days: Some(30),
			..OrgChatPatch::default()
		};
		patch.apply(&mut org);
		assert!(org.image_input);
		assert_eq!(org.retention_days, 30);
		assert!(org.streaming);

		let mut team =
			TeamChatSettings { streaming: Some(false), ..TeamChatSettings::default() };
		let patch: TeamChatPatch =
			serde_json::from_value(serde_json::json!({ "streaming": null, "file_uploads": false }))
				.expect("parse");
		patch.apply(&mut team);
		assert_eq!(team.streaming, None);
		assert_eq!(team.file_uploads, Some(false));

		let mut user = UserChatSettings::default();
		let patch: UserChatPatch =
			serde_json::from_value(serde_json::json!({ "prompt_library": false })).expect("parse");
		patch.apply(&mut user);
		assert_eq!(user.prompt_library, Some(false));
		assert_eq!(user.streaming, None);
	}
}

// vim: ts=4
