//! In-memory directory adapter
//!
//! Keeps the whole tenant graph behind one `RwLock`, which is what makes
//! `read_settings_chain` a consistent snapshot: no settings write can land
//! between reading the org row and reading the user row. Meant for tests
//! and single-process deployments; nothing survives a restart.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use tessello::prelude::*;

type SettingsKey = (SettingsScope, SettingsDomain);

#[derive(Debug, Default)]
struct Store {
	orgs: HashMap<OrgId, Organization>,
	members: HashMap<MemberId, OrgMember>,
	teams: HashMap<TeamId, Team>,
	team_members: HashMap<TeamMemberId, TeamMember>,
	settings: HashMap<SettingsKey, serde_json::Value>,
}

impl Store {
	fn member_in_org(&self, org_id: OrgId, member_id: MemberId) -> Option<&OrgMember> {
		self.members.get(&member_id).filter(|member| member.org_id == org_id)
	}

	fn team_in_org(&self, org_id: OrgId, team_id: TeamId) -> Option<&Team> {
		self.teams.get(&team_id).filter(|team| team.org_id == org_id)
	}

	fn team_member_row(&self, team_id: TeamId, member_id: MemberId) -> Option<&TeamMember> {
		self.team_members
			.values()
			.find(|row| row.team_id == team_id && row.member_id == member_id)
	}

	fn user_is_member(&self, org_id: OrgId, user_id: UserId) -> bool {
		self.members
			.values()
			.any(|member| member.org_id == org_id && member.user_id == user_id)
	}

	/// Whether the scope's owner row still exists. Settings rows must never
	/// outlive what they configure.
	fn scope_owner_exists(&self, scope: SettingsScope) -> bool {
		match scope {
			SettingsScope::Org(org_id) => self.orgs.contains_key(&org_id),
			SettingsScope::Team(org_id, team_id) => self.team_in_org(org_id, team_id).is_some(),
			SettingsScope::User(org_id, user_id) => self.user_is_member(org_id, user_id),
		}
	}

	fn drop_team(&mut self, team_id: TeamId) {
		self.team_members.retain(|_, row| row.team_id != team_id);
		self.settings.retain(|(scope, _), _| {
			!matches!(scope, SettingsScope::Team(_, scoped) if *scoped == team_id)
		});
	}
}

// MemDirectoryAdapter //
//*********************//

#[derive(Debug, Default)]
pub struct MemDirectoryAdapter {
	store: RwLock<Store>,
}

impl MemDirectoryAdapter {
	#[must_use]
	pub fn new() -> Self {
		Self { store: RwLock::new(Store::default()) }
	}
}

#[async_trait]
impl DirectoryAdapter for MemDirectoryAdapter {
	// # Organizations

	async fn read_org(&self, org_id: OrgId) -> TsResult<Option<Organization>> {
		Ok(self.store.read().orgs.get(&org_id).cloned())
	}

	async fn create_org(&self, name: &str) -> TsResult<Organization> {
		let org = Organization {
			org_id: OrgId::new(),
			name: name.into(),
			created_at: Timestamp::now(),
		};
		self.store.write().orgs.insert(org.org_id, org.clone());
		Ok(org)
	}

	async fn update_org_name(&self, org_id: OrgId, name: &str) -> TsResult<Organization> {
		let mut store = self.store.write();
		let org = store.orgs.get_mut(&org_id).ok_or(Error::NotFound)?;
		org.name = name.into();
		Ok(org.clone())
	}

	async fn delete_org(&self, org_id: OrgId) -> TsResult<()> {
		let mut store = self.store.write();
		store.orgs.remove(&org_id).ok_or(Error::NotFound)?;
		store.members.retain(|_, member| member.org_id != org_id);
		let team_ids: Vec<TeamId> = store
			.teams
			.values()
			.filter(|team| team.org_id == org_id)
			.map(|team| team.team_id)
			.collect();
		for team_id in team_ids {
			store.teams.remove(&team_id);
			store.team_members.retain(|_, row| row.team_id != team_id);
		}
		store.settings.retain(|(scope, _), _| scope.org_id() != org_id);
		Ok(())
	}

	// # Organization members

	async fn read_member(
		&self,
		org_id: OrgId,
		member_id: MemberId,
	) -> TsResult<Option<OrgMember>> {
		Ok(self.store.read().member_in_org(org_id, member_id).cloned())
	}

	async fn read_member_of_user(
		&self,
		org_id: OrgId,
		user_id: UserId,
	) -> TsResult<Option<OrgMember>> {
		let store = self.store.read();
		Ok(store
			.members
			.values()
			.find(|member| member.org_id == org_id && member.user_id == user_id)
			.cloned())
	}

	async fn list_members(&self, org_id: OrgId) -> TsResult<Vec<OrgMember>> {
		let store = self.store.read();
		let mut members: Vec<OrgMember> =
			store.members.values().filter(|member| member.org_id == org_id).cloned().collect();
		members.sort_by_key(|member| (member.created_at, member.member_id));
		Ok(members)
	}

	async fn create_member(
		&self,
		org_id: OrgId,
		user_id: UserId,
		role: OrgRole,
	) -> TsResult<OrgMember> {
		let mut store = self.store.write();
		if !store.orgs.contains_key(&org_id) {
			return Err(Error::NotFound);
		}
		if store.user_is_member(org_id, user_id) {
			return Err(Error::ValidationError(
				"user is already a member of this organization".into(),
			));
		}
		let member = OrgMember {
			member_id: MemberId::new(),
			org_id,
			user_id,
			role,
			created_at: Timestamp::now(),
		};
		store.members.insert(member.member_id, member.clone());
		Ok(member)
	}

	async fn update_member_role(
		&self,
		org_id: OrgId,
		member_id: MemberId,
		role: OrgRole,
	) -> TsResult<OrgMember> {
		let mut store = self.store.write();
		let member = store
			.members
			.get_mut(&member_id)
			.filter(|member| member.org_id == org_id)
			.ok_or(Error::NotFound)?;
		member.role = role;
		Ok(member.clone())
	}

	async fn delete_member(&self, org_id: OrgId, member_id: MemberId) -> TsResult<()> {
		let mut store = self.store.write();
		let Some(member) = store.member_in_org(org_id, member_id).cloned() else {
			return Err(Error::NotFound);
		};
		store.members.remove(&member_id);
		store.team_members.retain(|_, row| row.member_id != member_id);
		store.settings.retain(|(scope, _), _| {
			!matches!(scope, SettingsScope::User(scoped_org, scoped_user)
				if *scoped_org == org_id && *scoped_user == member.user_id)
		});
		Ok(())
	}

	// # Teams

	async fn read_team(&self, org_id: OrgId, team_id: TeamId) -> TsResult<Option<Team>> {
		Ok(self.store.read().team_in_org(org_id, team_id).cloned())
	}

	async fn list_teams(&self, org_id: OrgId) -> TsResult<Vec<Team>> {
		let store = self.store.read();
		let mut teams: Vec<Team> =
			store.teams.values().filter(|team| team.org_id == org_id).cloned().collect();
		teams.sort_by_key(|team| (team.created_at, team.team_id));
		Ok(teams)
	}

	async fn create_team(&self, org_id: OrgId, name: &str) -> TsResult<Team> {
		let mut store = self.store.write();
		if !store.orgs.contains_key(&org_id) {
			return Err(Error::NotFound);
		}
		let team = Team {
			team_id: TeamId::new(),
			org_id,
			name: name.into(),
			created_at: Timestamp::now(),
		};
		store.teams.insert(team.team_id, team.clone());
		Ok(team)
	}

	async fn update_team_name(
		&self,
		org_id: OrgId,
		team_id: TeamId,
		name: &str,
	) -> TsResult<Team> {
		let mut store = self.store.write();
		let team = store
			.teams
			.get_mut(&team_id)
			.filter(|team| team.org_id == org_id)
			.ok_or(Error::NotFound)?;
		team.name = name.into();
		Ok(team.clone())
	}

	async fn delete_team(&self, org_id: OrgId, team_id: TeamId) -> TsResult<()> {
		let mut store = self.store.write();
		if store.team_in_org(org_id, team_id).is_none() {
			return Err(Error::NotFound);
		}
		store.teams.remove(&team_id);
		store.drop_team(team_id);
		Ok(())
	}

	// # Team members

	async fn read_team_member(
		&self,
		team_id: TeamId,
		member_id: MemberId,
	) -> TsResult<Option<TeamMember>> {
		Ok(self.store.read().team_member_row(team_id, member_id).cloned())
	}

	async fn list_team_members(&self, team_id: TeamId) -> TsResult<Vec<TeamMember>> {
		let store = self.store.read();
		let mut rows: Vec<TeamMember> =
			store.team_members.values().filter(|row| row.team_id == team_id).cloned().collect();
		rows.sort_by_key(|row| (row.created_at, row.team_member_id));
		Ok(rows)
	}

	async fn list_team_memberships(
		&self,
		org_id: OrgId,
		member_id: MemberId,
	) -> TsResult<Vec<TeamMember>> {
		let store = self.store.read();
		let mut rows: Vec<TeamMember> = store
			.team_members
			.values()
			.filter(|row| {
				row.member_id == member_id
					&& store.team_in_org(org_id, row.team_id).is_some()
			})
			.cloned()
			.collect();
		rows.sort_by_key(|row| (row.created_at, row.team_member_id));
		Ok(rows)
	}

	async fn create_team_member(
		&self,
		org_id: OrgId,
		team_id: TeamId,
		member_id: MemberId,
		role: TeamRole,
	) -> TsResult<TeamMember> {
		let mut store = self.store.write();
		if store.team_in_org(org_id, team_id).is_none() {
			return Err(Error::NotFound);
		}
		let Some(member) = store.members.get(&member_id) else {
			return Err(Error::NotFound);
		};
		if member.org_id != org_id {
			return Err(Error::ValidationError(
				"member belongs to a different organization than the team".into(),
			));
		}
		if store.team_member_row(team_id, member_id).is_some() {
			return Err(Error::ValidationError("member is already in this team".into()));
		}
		let row = TeamMember {
			team_member_id: TeamMemberId::new(),
			team_id,
			member_id,
			role,
			created_at: Timestamp::now(),
		};
		store.team_members.insert(row.team_member_id, row.clone());
		Ok(row)
	}

	async fn update_team_member_role(
		&self,
		team_id: TeamId,
		member_id: MemberId,
		role: TeamRole,
	) -> TsResult<TeamMember> {
		let mut store = self.store.write();
		let row_id = store.team_member_row(team_id, member_id).map(|row| row.team_member_id);
		let Some(row_id) = row_id else {
			return Err(Error::NotFound);
		};
		let row = store.team_members.get_mut(&row_id).ok_or(Error::NotFound)?;
		row.role = role;
		Ok(row.clone())
	}

	async fn delete_team_member(&self, team_id: TeamId, member_id: MemberId) -> TsResult<()> {
		let mut store = self.store.write();
		let row_id = store.team_member_row(team_id, member_id).map(|row| row.team_member_id);
		let Some(row_id) = row_id else {
			return Err(Error::NotFound);
		};
		store.team_members.remove(&row_id);
		Ok(())
	}

	// # Settings rows

	async fn read_settings(
		&self,
		scope: SettingsScope,
		domain: SettingsDomain,
	) -> TsResult<Option<serde_json::Value>> {
		Ok(self.store.read().settings.get(&(scope, domain)).cloned())
	}

	async fn read_settings_chain(
		&self,
		org_id: OrgId,
		team_id: Option<TeamId>,
		user_id: Option<UserId>,
		domain: SettingsDomain,
	) -> TsResult<SettingsChain> {
		let store = self.store.read();
		Ok(SettingsChain {
			org: store.settings.get(&(SettingsScope::Org(org_id), domain)).cloned(),
			team: team_id.and_then(|team_id| {
				store.settings.get(&(SettingsScope::Team(org_id, team_id), domain)).cloned()
			}),
			user: user_id.and_then(|user_id| {
				store.settings.get(&(SettingsScope::User(org_id, user_id), domain)).cloned()
			}),
		})
	}

	async fn update_settings(
		&self,
		scope: SettingsScope,
		domain: SettingsDomain,
		value: Option<serde_json::Value>,
	) -> TsResult<()> {
		let mut store = self.store.write();
		match value {
			Some(value) => {
				if !store.scope_owner_exists(scope) {
					return Err(Error::NotFound);
				}
				store.settings.insert((scope, domain), value);
			}
			None => {
				store.settings.remove(&(scope, domain));
			}
		}
		Ok(())
	}
}

// Tests //
//*******//


// vim: ts=4
