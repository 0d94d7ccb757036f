//! Tenant directory adapter interface.
//!
//! The directory holds the tenant graph (organizations, teams, membership
//! rows) and the raw settings rows attached to each tier of it. Every read is
//! parameterized by the owning organization, so an adapter implementation can
//! never be tricked into returning another tenant's row: a cross-tenant id
//! simply does not match and the lookup comes back `None`.
//!
//! Adapters store settings rows as raw JSON. Typed interpretation of a row
//! (which fields exist per domain, how tiers merge) lives above the adapter,
//! in `tessello-core`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TsResult;
use crate::types::{MemberId, OrgId, TeamId, TeamMemberId, Timestamp, UserId, serialize_timestamp_iso};

// Roles //
//*******//

/// Role of a user inside an organization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrgRole {
	Owner,
	Admin,
	Member,
}

impl OrgRole {
	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			OrgRole::Owner => "owner",
			OrgRole::Admin => "admin",
			OrgRole::Member => "member",
		}
	}
}

impl std::fmt::Display for OrgRole {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Role of an organization member inside a team.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamRole {
	Admin,
	Member,
	Viewer,
}

impl TeamRole {
	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			TeamRole::Admin => "admin",
			TeamRole::Member => "member",
			TeamRole::Viewer => "viewer",
		}
	}
}

impl std::fmt::Display for TeamRole {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

// Records //
//*********//

/// Root tenant boundary. Everything else hangs off an organization.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
	pub org_id: OrgId,
	pub name: Box<str>,
	#[serde(serialize_with = "serialize_timestamp_iso")]
	pub created_at: Timestamp,
}

/// One user's membership in one organization. At most one row per
/// (user, organization) pair.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgMember {
	pub member_id: MemberId,
	pub org_id: OrgId,
	pub user_id: UserId,
	pub role: OrgRole,
	#[serde(serialize_with = "serialize_timestamp_iso")]
	pub created_at: Timestamp,
}

/// A team inside an organization.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
	pub team_id: TeamId,
	pub org_id: OrgId,
	pub name: Box<str>,
	#[serde(serialize_with = "serialize_timestamp_iso")]
	pub created_at: Timestamp,
}

/// One organization member's membership in one team. The referenced member
/// must belong to the same organization as the team.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
	pub team_member_id: TeamMemberId,
	pub team_id: TeamId,
	pub member_id: MemberId,
	pub role: TeamRole,
	#[serde(serialize_with = "serialize_timestamp_iso")]
	pub created_at: Timestamp,
}

// Settings rows //
//***************//

/// Storage scope of one settings tier row.
///
/// Team and user scopes carry the owning organization so adapters can key
/// rows under the tenant and cascade deletes with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SettingsScope {
	Org(OrgId),
	Team(OrgId, TeamId),
	User(OrgId, UserId),
}

impl SettingsScope {
	#[must_use]
	pub fn org_id(&self) -> OrgId {
		match self {
			SettingsScope::Org(org_id)
			| SettingsScope::Team(org_id, _)
			| SettingsScope::User(org_id, _) => *org_id,
		}
	}
}

/// Configuration domain. Each domain has its own record shapes per tier and
/// its own settings row per scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingsDomain {
	Llm,
	Rag,
	Theme,
	Guardrails,
	Chat,
}

impl SettingsDomain {
	pub const ALL: [SettingsDomain; 5] = [
		SettingsDomain::Llm,
		SettingsDomain::Rag,
		SettingsDomain::Theme,
		SettingsDomain::Guardrails,
		SettingsDomain::Chat,
	];

	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			SettingsDomain::Llm => "llm",
			SettingsDomain::Rag => "rag",
			SettingsDomain::Theme => "theme",
			SettingsDomain::Guardrails => "guardrails",
			SettingsDomain::Chat => "chat",
		}
	}
}

impl std::fmt::Display for SettingsDomain {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One consistent snapshot of the tier rows feeding a resolution. Tiers the
/// caller did not ask for (or that have no stored row) are `None`.
#[derive(Clone, Debug, Default)]
pub struct SettingsChain {
	pub org: Option<serde_json::Value>,
	pub team: Option<serde_json::Value>,
	pub user: Option<serde_json::Value>,
}

// DirectoryAdapter //
//******************//

#[async_trait]
pub trait DirectoryAdapter: std::fmt::Debug + Send + Sync {
	// # Organizations
	//
	/// Reads one organization, `None` if absent.
	async fn read_org(&self, org_id: OrgId) -> TsResult<Option<Organization>>;
	/// Creates an organization. Membership is not created here; callers that
	/// need an initial owner add one explicitly.
	async fn create_org(&self, name: &str) -> TsResult<Organization>;
	/// Renames an organization. `NotFound` if absent.
	async fn update_org_name(&self, org_id: OrgId, name: &str) -> TsResult<Organization>;
	/// Deletes an organization and everything under it: members, teams, team
	/// members, settings rows at every tier. `NotFound` if absent.
	async fn delete_org(&self, org_id: OrgId) -> TsResult<()>;

	// # Organization members
	//
	/// Reads one membership row by id, scoped to the organization.
	async fn read_member(&self, org_id: OrgId, member_id: MemberId)
	-> TsResult<Option<OrgMember>>;
	/// Reads the membership row of a user in an organization, `None` when the
	/// user is not a member.
	async fn read_member_of_user(
		&self,
		org_id: OrgId,
		user_id: UserId,
	) -> TsResult<Option<OrgMember>>;
	/// Lists all membership rows of an organization.
	async fn list_members(&self, org_id: OrgId) -> TsResult<Vec<OrgMember>>;
	/// Adds a user to an organization. `ValidationError` if the user already
	/// has a membership row there, `NotFound` if the organization is absent.
	async fn create_member(
		&self,
		org_id: OrgId,
		user_id: UserId,
		role: OrgRole,
	) -> TsResult<OrgMember>;
	/// Changes a member's organization role. `NotFound` if the row is absent.
	async fn update_member_role(
		&self,
		org_id: OrgId,
		member_id: MemberId,
		role: OrgRole,
	) -> TsResult<OrgMember>;
	/// Removes a member, cascading their team memberships and their user-tier
	/// settings rows in this organization. `NotFound` if the row is absent.
	async fn delete_member(&self, org_id: OrgId, member_id: MemberId) -> TsResult<()>;

	// # Teams
	//
	/// Reads one team, scoped to the organization. A team id that exists under
	/// a different organization is `None`.
	async fn read_team(&self, org_id: OrgId, team_id: TeamId) -> TsResult<Option<Team>>;
	/// Lists the teams of an organization.
	async fn list_teams(&self, org_id: OrgId) -> TsResult<Vec<Team>>;
	/// Creates a team. `NotFound` if the organization is absent.
	async fn create_team(&self, org_id: OrgId, name: &str) -> TsResult<Team>;
	/// Renames a team. `NotFound` if absent in this organization.
	async fn update_team_name(
		&self,
		org_id: OrgId,
		team_id: TeamId,
		name: &str,
	) -> TsResult<Team>;
	/// Deletes a team, cascading its team members and its team-tier settings
	/// rows. `NotFound` if absent in this organization.
	async fn delete_team(&self, org_id: OrgId, team_id: TeamId) -> TsResult<()>;

	// # Team members
	//
	/// Reads one member's row in a team, `None` when they are not in it.
	async fn read_team_member(
		&self,
		team_id: TeamId,
		member_id: MemberId,
	) -> TsResult<Option<TeamMember>>;
	/// Lists the membership rows of a team.
	async fn list_team_members(&self, team_id: TeamId) -> TsResult<Vec<TeamMember>>;
	/// Lists all team memberships of one organization member.
	async fn list_team_memberships(
		&self,
		org_id: OrgId,
		member_id: MemberId,
	) -> TsResult<Vec<TeamMember>>;
	/// Adds an organization member to a team. `ValidationError` if the member
	/// belongs to a different organization than the team or is already in the
	/// team, `NotFound` if the team or member row is absent.
	async fn create_team_member(
		&self,
		org_id: OrgId,
		team_id: TeamId,
		member_id: MemberId,
		role: TeamRole,
	) -> TsResult<TeamMember>;
	/// Changes a member's team role. `NotFound` if the row is absent.
	async fn update_team_member_role(
		&self,
		team_id: TeamId,
		member_id: MemberId,
		role: TeamRole,
	) -> TsResult<TeamMember>;
	/// Removes a member from a team. `NotFound` if the row is absent.
	async fn delete_team_member(&self, team_id: TeamId, member_id: MemberId) -> TsResult<()>;

	// # Settings rows
	//
	/// Reads the raw settings row of one scope and domain, `None` when no row
	/// was ever written there.
	async fn read_settings(
		&self,
		scope: SettingsScope,
		domain: SettingsDomain,
	) -> TsResult<Option<serde_json::Value>>;
	/// Reads the org row plus the team and user rows the caller asks for, as
	/// one consistent snapshot.
	async fn read_settings_chain(
		&self,
		org_id: OrgId,
		team_id: Option<TeamId>,
		user_id: Option<UserId>,
		domain: SettingsDomain,
	) -> TsResult<SettingsChain>;
	/// Writes (`Some`) or clears (`None`) the settings row of one scope and
	/// domain. Writing to a scope whose owner is absent is `NotFound`.
	async fn update_settings(
		&self,
		scope: SettingsScope,
		domain: SettingsDomain,
		value: Option<serde_json::Value>,
	) -> TsResult<()>;
}

// vim: ts=4
