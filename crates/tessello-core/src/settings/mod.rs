//! Tiered settings subsystem
//!
//! Settings cascade through three tiers (organization, team, user) per
//! domain. The org tier always exists, materialized from documented defaults
//! when no row was ever written; the team and user tiers are optional
//! overrides whose effect is gated by the ancestor tiers' customization
//! flags. [`resolve`] holds the pure precedence pipeline, [`domains`] the
//! per-domain record shapes, and [`service`] the stateful layer that loads
//! snapshots, caches them, and applies tier updates.

pub mod domains;
pub mod resolve;
pub mod service;

pub use resolve::{OverrideGates, Resolved, SettingSource, resolve_field};
pub use service::SettingsService;

use tessello_types::directory_adapter::SettingsDomain;

/// Ties a tier record type to its domain and tier, so the service can load
/// and store it without the caller repeating (and possibly mismatching) the
/// domain.
pub trait TierRecord: serde::Serialize + serde::de::DeserializeOwned + Default {
	const DOMAIN: SettingsDomain;
	/// `"org"`, `"team"`, or `"user"`; must match the scope it is used with.
	const TIER: &'static str;
}

macro_rules! tier_record {
	($type:ty, $domain:expr, $tier:literal) => {
		impl TierRecord for $type {
			const DOMAIN: SettingsDomain = $domain;
			const TIER: &'static str = $tier;
		}
	};
}

tier_record!(domains::llm::OrgLlmSettings, SettingsDomain::Llm, "org");
tier_record!(domains::llm::TeamLlmSettings, SettingsDomain::Llm, "team");
tier_record!(domains::llm::UserLlmSettings, SettingsDomain::Llm, "user");
tier_record!(domains::rag::OrgRagSettings, SettingsDomain::Rag, "org");
tier_record!(domains::rag::TeamRagSettings, SettingsDomain::Rag, "team");
tier_record!(domains::rag::UserRagSettings, SettingsDomain::Rag, "user");
tier_record!(domains::theme::OrgThemeSettings, SettingsDomain::Theme, "org");
tier_record!(domains::theme::TeamThemeSettings, SettingsDomain::Theme, "team");
tier_record!(domains::theme::UserThemeSettings, SettingsDomain::Theme, "user");
tier_record!(domains::guardrails::OrgGuardrailsSettings, SettingsDomain::Guardrails, "org");
tier_record!(domains::guardrails::TeamGuardrailsSettings, SettingsDomain::Guardrails, "team");
tier_record!(domains::chat::OrgChatSettings, SettingsDomain::Chat, "org");
tier_record!(domains::chat::TeamChatSettings, SettingsDomain::Chat, "team");
tier_record!(domains::chat::UserChatSettings, SettingsDomain::Chat, "user");

// vim: ts=4
