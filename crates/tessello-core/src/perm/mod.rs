//! Permission namespaces and role tables
//!
//! Permissions are closed enumerations with stable `resource:action` string
//! tokens, partitioned into an organization namespace and a team namespace.
//! A role maps to its permission set through a static match table in
//! [`roles`]; the tables are fixed at compile time and safe for concurrent
//! reads from anywhere.

pub mod roles;

pub use roles::{
	has_org_permission, has_team_permission, implied_org_permission, org_role_permissions,
	team_role_permissions,
};

use serde::{Deserialize, Serialize};

// OrgPermission //
//***************//

/// An action inside the organization namespace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrgPermission {
	OrgRead,
	OrgUpdate,
	OrgDelete,
	OrgTransfer,
	MembersRead,
	MembersInvite,
	MembersUpdate,
	MembersRemove,
	TeamsRead,
	TeamsCreate,
	TeamsUpdate,
	TeamsDelete,
	TeamsAdmin,
	SettingsRead,
	SettingsUpdate,
	ProvidersRead,
	ProvidersUpdate,
	GuardrailsUpdate,
	BillingRead,
	BillingUpdate,
	UsageRead,
	AuditRead,
}

impl OrgPermission {
	pub const ALL: [OrgPermission; 22] = [
		OrgPermission::OrgRead,
		OrgPermission::OrgUpdate,
		OrgPermission::OrgDelete,
		OrgPermission::OrgTransfer,
		OrgPermission::MembersRead,
		OrgPermission::MembersInvite,
		OrgPermission::MembersUpdate,
		OrgPermission::MembersRemove,
		OrgPermission::TeamsRead,
		OrgPermission::TeamsCreate,
		OrgPermission::TeamsUpdate,
		OrgPermission::TeamsDelete,
		OrgPermission::TeamsAdmin,
		OrgPermission::SettingsRead,
		OrgPermission::SettingsUpdate,
		OrgPermission::ProvidersRead,
		OrgPermission::ProvidersUpdate,
		OrgPermission::GuardrailsUpdate,
		OrgPermission::BillingRead,
		OrgPermission::BillingUpdate,
		OrgPermission::UsageRead,
		OrgPermission::AuditRead,
	];

	/// Stable wire token, `resource:action`.
	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			OrgPermission::OrgRead => "org:read",
			OrgPermission::OrgUpdate => "org:update",
			OrgPermission::OrgDelete => "org:delete",
			OrgPermission::OrgTransfer => "org:transfer",
			OrgPermission::MembersRead => "members:read",
			OrgPermission::MembersInvite => "members:invite",
			OrgPermission::MembersUpdate => "members:update",
			OrgPermission::MembersRemove => "members:remove",
			OrgPermission::TeamsRead => "teams:read",
			OrgPermission::TeamsCreate => "teams:create",
			OrgPermission::TeamsUpdate => "teams:update",
			OrgPermission::TeamsDelete => "teams:delete",
			OrgPermission::TeamsAdmin => "teams:admin",
			OrgPermission::SettingsRead => "settings:read",
			OrgPermission::SettingsUpdate => "settings:update",
			OrgPermission::ProvidersRead => "providers:read",
			OrgPermission::ProvidersUpdate => "providers:update",
			OrgPermission::GuardrailsUpdate => "guardrails:update",
			OrgPermission::BillingRead => "billing:read",
			OrgPermission::BillingUpdate => "billing:update",
			OrgPermission::UsageRead => "usage:read",
			OrgPermission::AuditRead => "audit:read",
		}
	}
}

impl std::fmt::Display for OrgPermission {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

// TeamPermission //
//****************//

/// An action inside the team namespace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TeamPermission {
	TeamRead,
	TeamUpdate,
	TeamDelete,
	MembersRead,
	MembersAdd,
	MembersUpdate,
	MembersRemove,
	SettingsRead,
	SettingsUpdate,
	GuardrailsUpdate,
	PromptsRead,
	PromptsManage,
	SourcesRead,
	SourcesManage,
	ChatsRead,
	ChatsManage,
	UsageRead,
}

impl TeamPermission {
	pub const ALL: [TeamPermission; 17] = [
		TeamPermission::TeamRead,
		TeamPermission::TeamUpdate,
		TeamPermission::TeamDelete,
		TeamPermission::MembersRead,
		TeamPermission::MembersAdd,
		TeamPermission::MembersUpdate,
		TeamPermission::MembersRemove,
		TeamPermission::SettingsRead,
		TeamPermission::SettingsUpdate,
		TeamPermission::GuardrailsUpdate,
		TeamPermission::PromptsRead,
		TeamPermission::PromptsManage,
		TeamPermission::SourcesRead,
		TeamPermission::SourcesManage,
		TeamPermission::ChatsRead,
		TeamPermission::ChatsManage,
		TeamPermission::UsageRead,
	];

	/// Stable wire token, `resource:action`.
	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			TeamPermission::TeamRead => "team:read",
			TeamPermission::TeamUpdate => "team:update",
			TeamPermission::TeamDelete => "team:delete",
			TeamPermission::MembersRead => "members:read",
			TeamPermission::MembersAdd => "members:add",
			TeamPermission::MembersUpdate => "members:update",
			TeamPermission::MembersRemove => "members:remove",
			TeamPermission::SettingsRead => "settings:read",
			TeamPermission::SettingsUpdate => "settings:update",
			TeamPermission::GuardrailsUpdate => "guardrails:update",
			TeamPermission::PromptsRead => "prompts:read",
			TeamPermission::PromptsManage => "prompts:manage",
			TeamPermission::SourcesRead => "sources:read",
			TeamPermission::SourcesManage => "sources:manage",
			TeamPermission::ChatsRead => "chats:read",
			TeamPermission::ChatsManage => "chats:manage",
			TeamPermission::UsageRead => "usage:read",
		}
	}
}

impl std::fmt::Display for TeamPermission {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}


// vim: ts=4
