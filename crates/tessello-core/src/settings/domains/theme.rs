//! Theme settings domain
//!
//! Branding and display. Logo and welcome message are org/team branding;
//! mode and accent color are personal preferences users may override when
//! the gates allow.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use tessello_types::prelude::Patch;

use crate::settings::resolve::{OverrideGates, Resolved, SettingSource, resolve_field};

/// Display mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
	Light,
	Dark,
	#[default]
	System,
}

// Tier records //
//**************//

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgThemeSettings {
	pub mode: ThemeMode,
	pub accent_color: Box<str>,
	pub custom_logo: bool,
	pub welcome_message: Box<str>,
	pub allow_team_customization: bool,
	pub allow_user_customization: bool,
}

impl Default for OrgThemeSettings {
	fn default() -> Self {
		Self {
			mode: ThemeMode::System,
			accent_color: "#6750a4".into(),
			custom_logo: false,
			welcome_message: "".into(),
			allow_team_customization: true,
			allow_user_customization: true,
		}
	}
}

#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamThemeSettings {
	pub mode: Option<ThemeMode>,
	pub accent_color: Option<Box<str>>,
	pub custom_logo: Option<bool>,
	pub welcome_message: Option<Box<str>>,
	pub allow_user_customization: bool,
}

impl Default for TeamThemeSettings {
	fn default() -> Self {
		Self {
			mode: None,
			accent_color: None,
			custom_logo: None,
			welcome_message: None,
			allow_user_customization: true,
		}
	}
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserThemeSettings {
	pub mode: Option<ThemeMode>,
	pub accent_color: Option<Box<str>>,
}

// Resolution //
//************//

#[derive(Clone, Debug, PartialEq)]
pub struct ThemeResolution {
	pub mode: Resolved<ThemeMode>,
	pub accent_color: Resolved<Box<str>>,
	pub custom_logo: Resolved<bool>,
	pub welcome_message: Resolved<Box<str>>,
	pub gates: OverrideGates,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EffectiveThemeSettings {
	pub mode: ThemeMode,
	pub accent_color: Box<str>,
	pub custom_logo: bool,
	pub welcome_message: Box<str>,
	pub settings_source: SettingSource,
}

#[must_use]
pub fn resolve(
	org: &OrgThemeSettings,
	team: Option<&TeamThemeSettings>,
	user: Option<&UserThemeSettings>,
) -> ThemeResolution {
	let gates = OverrideGates::new(
		org.allow_team_customization,
		org.allow_user_customization,
		team.map(|t| t.allow_user_customization),
	);

	ThemeResolution {
		mode: resolve_field(
			gates,
			org.mode,
			team.and_then(|t| t.mode),
			user.and_then(|u| u.mode),
		),
		accent_color: resolve_field(
			gates,
			org.accent_color.clone(),
			team.and_then(|t| t.accent_color.clone()),
			user.and_then(|u| u.accent_color.clone()),
		),
		custom_logo: resolve_field(gates, org.custom_logo, team.and_then(|t| t.custom_logo), None),
		welcome_message: resolve_field(
			gates,
			org.welcome_message.clone(),
			team.and_then(|t| t.welcome_message.clone()),
			None,
		),
		gates,
	}
}

impl ThemeResolution {
	#[must_use]
	pub fn settings_source(&self) -> SettingSource {
		[
			self.mode.source,
			self.accent_color.source,
			self.custom_logo.source,
			self.welcome_message.source,
		]
		.into_iter()
		.max()
		.unwrap_or(SettingSource::Org)
	}

	#[must_use]
	pub fn into_effective(self) -> EffectiveThemeSettings {
		let settings_source = self.settings_source();
		EffectiveThemeSettings {
			mode: self.mode.value,
			accent_color: self.accent_color.value,
			custom_logo: self.custom_logo.value,
			welcome_message: self.welcome_message.value,
			settings_source,
		}
	}
}

// Update payloads //
//*****************//

#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgThemePatch {
	pub mode: Option<ThemeMode>,
	pub accent_color: Option<Box<str>>,
	pub custom_logo: Option<bool>,
	pub welcome_message: Option<Box<str>>,
	pub allow_team_customization: Option<bool>,
	pub allow_user_customization: Option<bool>,
}

impl OrgThemePatch {
	pub fn apply(self, settings: &mut OrgThemeSettings) {
		if let Some(v) = self.mode {
			settings.mode = v;
		}
		if let Some(v) = self.accent_color {
			settings.accent_color = v;
		}
		if let Some(v) = self.custom_logo {
			settings.custom_logo = v;
		}
		if let Some(v) = self.welcome_message {
			settings.welcome_message = v;
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
pub struct TeamThemePatch {
	pub mode: Patch<ThemeMode>,
	pub accent_color: Patch<Box<str>>,
	pub custom_logo: Patch<bool>,
	pub welcome_message: Patch<Box<str>>,
	pub allow_user_customization: Option<bool>,
}

impl TeamThemePatch {
	pub fn apply(self, settings: &mut TeamThemeSettings) {
		settings.mode = self.mode.apply_to(settings.mode.take());
		settings.accent_color = self.accent_color.apply_to(settings.accent_color.take());
		settings.custom_logo = self.custom_logo.apply_to(settings.custom_logo.take());
		settings.welcome_message = self.welcome_message.apply_to(settings.welcome_message.take());
		if let Some(v) = self.allow_user_customization {
			settings.allow_user_customization = v;
		}
	}
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserThemePatch {
	pub mode: Patch<ThemeMode>,
	pub accent_color: Patch<Box<str>>,
}

impl UserThemePatch {
	pub fn apply(self, settings: &mut UserThemeSettings) {
		settings.mode = self.mode.apply_to(settings.mode.take());
		settings.accent_color = self.accent_color.apply_to(settings.accent_color.take());
	}
}


// vim: ts=4
