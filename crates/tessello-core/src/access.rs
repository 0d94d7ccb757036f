//! Tenancy and permission gate over the directory
//!
//! Every caller-facing operation funnels through here, and the shape is
//! always the same: resolve a context (which proves the resource exists
//! inside the caller's organization), check the permission the operation
//! needs, then touch the adapters. A resource outside the caller's
//! organization resolves to `NotFound` before any permission is looked at,
//! so an outsider cannot tell "absent" from "not yours"; a caller inside
//! the organization who lacks the permission gets `PermissionDenied`.

use tracing::warn;

use tessello_types::directory_adapter::{
	OrgMember, OrgRole, Organization, SettingsDomain, SettingsScope, Team, TeamMember, TeamRole,
};
use tessello_types::prelude::{Error, MemberId, OrgId, TeamId, TsResult, UserId};
use tessello_types::vault_adapter::SecretScope;

use crate::app::App;
use crate::perm::{
	OrgPermission, TeamPermission, has_org_permission, has_team_permission, implied_org_permission,
};
use crate::settings::TierRecord;
use crate::settings::domains::{chat, guardrails, llm, rag, theme};

// Caller //
//********//

/// The authenticated principal behind a request. Authentication itself
/// happens upstream; by the time a `Caller` exists the user id is trusted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Caller {
	pub user_id: UserId,
	/// Operator accounts of the platform itself. They bypass membership and
	/// permission checks, and every bypass is logged.
	pub is_platform_admin: bool,
}

impl Caller {
	#[must_use]
	pub fn user(user_id: UserId) -> Self {
		Self { user_id, is_platform_admin: false }
	}

	#[must_use]
	pub fn platform_admin(user_id: UserId) -> Self {
		Self { user_id, is_platform_admin: true }
	}
}

// OrgContext //
//************//

/// A caller bound to one organization. Holding one proves the organization
/// exists and the caller is allowed to know that: they are a member, or a
/// platform admin (in which case `membership` is `None`).
#[derive(Clone, Debug)]
pub struct OrgContext {
	pub org: Organization,
	pub caller: Caller,
	pub membership: Option<OrgMember>,
}

impl OrgContext {
	/// The caller's organization role, `None` for a non-member platform admin.
	#[must_use]
	pub fn role(&self) -> Option<OrgRole> {
		self.membership.as_ref().map(|member| member.role)
	}

	/// The caller's own membership row id, `None` for a non-member.
	#[must_use]
	pub fn member_id(&self) -> Option<MemberId> {
		self.membership.as_ref().map(|member| member.member_id)
	}

	#[must_use]
	pub fn has(&self, perm: OrgPermission) -> bool {
		match &self.membership {
			Some(member) if has_org_permission(member.role, perm) => true,
			_ => self.caller.is_platform_admin,
		}
	}

	pub fn require(&self, perm: OrgPermission) -> TsResult<()> {
		if let Some(member) = &self.membership {
			if has_org_permission(member.role, perm) {
				return Ok(());
			}
		}
		if self.caller.is_platform_admin {
			warn!(subject = %self.caller.user_id, org_id = %self.org.org_id, perm = %perm,
				"platform admin bypass");
			return Ok(());
		}
		Err(Error::PermissionDenied)
	}
}

// TeamContext //
//*************//

/// An organization context narrowed to one of its teams. `membership` is the
/// caller's row in the team, `None` when they are not in it; in that case
/// permission checks fall back to the organization role through
/// [`implied_org_permission`].
#[derive(Clone, Debug)]
pub struct TeamContext {
	pub org: OrgContext,
	pub team: Team,
	pub membership: Option<TeamMember>,
}

impl TeamContext {
	/// The caller's team role, `None` when they are not in the team.
	#[must_use]
	pub fn role(&self) -> Option<TeamRole> {
		self.membership.as_ref().map(|member| member.role)
	}

	#[must_use]
	pub fn has(&self, perm: TeamPermission) -> bool {
		match &self.membership {
			Some(member) if has_team_permission(member.role, perm) => true,
			_ => self.org.has(implied_org_permission(perm)),
		}
	}

	pub fn require(&self, perm: TeamPermission) -> TsResult<()> {
		if let Some(member) = &self.membership {
			if has_team_permission(member.role, perm) {
				return Ok(());
			}
		}
		self.org.require(implied_org_permission(perm))
	}
}

// Context resolution //
//********************//

/// Binds a caller to an organization. Absent organizations and organizations
/// the caller is not a member of both come back as `NotFound`.
pub async fn resolve_org(app: &App, caller: Caller, org_id: OrgId) -> TsResult<OrgContext> {
	let Some(org) = app.directory.read_org(org_id).await? else {
		return Err(Error::NotFound);
	};
	let membership = app.directory.read_member_of_user(org_id, caller.user_id).await?;
	if membership.is_none() && !caller.is_platform_admin {
		return Err(Error::NotFound);
	}
	Ok(OrgContext { org, caller, membership })
}

/// Narrows an organization context to one team. The lookup carries the
/// organization id, so a team id that lives under a different organization
/// is `NotFound` here, never a permission error.
pub async fn resolve_team(app: &App, org: OrgContext, team_id: TeamId) -> TsResult<TeamContext> {
	let Some(team) = app.directory.read_team(org.org.org_id, team_id).await? else {
		return Err(Error::NotFound);
	};
	let membership = match org.member_id() {
		Some(member_id) => app.directory.read_team_member(team_id, member_id).await?,
		None => None,
	};
	Ok(TeamContext { org, team, membership })
}

// Organization ops //
//******************//

pub fn read_org(ctx: &OrgContext) -> TsResult<&Organization> {
	ctx.require(OrgPermission::OrgRead)?;
	Ok(&ctx.org)
}

pub async fn update_org_name(app: &App, ctx: &OrgContext, name: &str) -> TsResult<Organization> {
	ctx.require(OrgPermission::OrgUpdate)?;
	app.directory.update_org_name(ctx.org.org_id, name).await
}

/// Deletes the organization with everything under it. The directory cascades
/// members, teams and settings rows; cached settings snapshots are dropped
/// here since the writes happened underneath the settings service.
pub async fn delete_org(app: &App, ctx: &OrgContext) -> TsResult<()> {
	ctx.require(OrgPermission::OrgDelete)?;
	app.directory.delete_org(ctx.org.org_id).await?;
	app.settings.invalidate();
	Ok(())
}

/// Moves the owner role to another member. The previous owner becomes an
/// admin, so the organization always has exactly one owner. This is the only
/// operation that assigns or removes the owner role.
pub async fn transfer_ownership(app: &App, ctx: &OrgContext, to: MemberId) -> TsResult<()> {
	ctx.require(OrgPermission::OrgTransfer)?;
	let members = app.directory.list_members(ctx.org.org_id).await?;
	let Some(owner) = members.iter().find(|member| member.role == OrgRole::Owner) else {
		return Err(Error::Internal("organization has no owner".into()));
	};
	let Some(target) = members.iter().find(|member| member.member_id == to) else {
		return Err(Error::NotFound);
	};
	if target.member_id == owner.member_id {
		return Err(Error::ValidationError("member is already the owner".into()));
	}
	// Promote first so there is never a moment without an owner.
	app.directory.update_member_role(ctx.org.org_id, target.member_id, OrgRole::Owner).await?;
	app.directory.update_member_role(ctx.org.org_id, owner.member_id, OrgRole::Admin).await?;
	Ok(())
}

// Member ops //
//************//

pub async fn list_members(app: &App, ctx: &OrgContext) -> TsResult<Vec<OrgMember>> {
	ctx.require(OrgPermission::MembersRead)?;
	app.directory.list_members(ctx.org.org_id).await
}

/// Reads one membership row. Members may always read their own row, even
/// without `members:read`.
pub async fn read_member(app: &App, ctx: &OrgContext, member_id: MemberId) -> TsResult<OrgMember> {
	if ctx.member_id() != Some(member_id) {
		ctx.require(OrgPermission::MembersRead)?;
	}
	let Some(member) = app.directory.read_member(ctx.org.org_id, member_id).await? else {
		return Err(Error::NotFound);
	};
	Ok(member)
}

/// Adds a user to the organization. The owner role cannot be granted here.
pub async fn invite_member(
	app: &App,
	ctx: &OrgContext,
	user_id: UserId,
	role: OrgRole,
) -> TsResult<OrgMember> {
	ctx.require(OrgPermission::MembersInvite)?;
	if role == OrgRole::Owner {
		return Err(Error::ValidationError(
			"organizations have a single owner; use ownership transfer".into(),
		));
	}
	app.directory.create_member(ctx.org.org_id, user_id, role).await
}

/// Changes a member's role. The owner role can be neither assigned nor taken
/// away here; that path is [`transfer_ownership`].
pub async fn update_member_role(
	app: &App,
	ctx: &OrgContext,
	member_id: MemberId,
	role: OrgRole,
) -> TsResult<OrgMember> {
	ctx.require(OrgPermission::MembersUpdate)?;
	if role == OrgRole::Owner {
		return Err(Error::ValidationError(
			"the owner role is assigned through ownership transfer".into(),
		));
	}
	let Some(target) = app.directory.read_member(ctx.org.org_id, member_id).await? else {
		return Err(Error::NotFound);
	};
	if target.role == OrgRole::Owner {
		return Err(Error::ValidationError(
			"the owner's role is changed through ownership transfer".into(),
		));
	}
	app.directory.update_member_role(ctx.org.org_id, member_id, role).await
}

/// Removes a member. Their team memberships and personal settings rows go
/// with them, so cached settings snapshots are dropped.
pub async fn remove_member(app: &App, ctx: &OrgContext, member_id: MemberId) -> TsResult<()> {
	ctx.require(OrgPermission::MembersRemove)?;
	let Some(target) = app.directory.read_member(ctx.org.org_id, member_id).await? else {
		return Err(Error::NotFound);
	};
	if target.role == OrgRole::Owner {
		return Err(Error::ValidationError(
			"the owner cannot be removed; transfer ownership first".into(),
		));
	}
	app.directory.delete_member(ctx.org.org_id, member_id).await?;
	app.settings.invalidate();
	Ok(())
}

// Team ops //
//**********//

pub async fn create_team(app: &App, ctx: &OrgContext, name: &str) -> TsResult<Team> {
	ctx.require(OrgPermission::TeamsCreate)?;
	app.directory.create_team(ctx.org.org_id, name).await
}

pub async fn list_teams(app: &App, ctx: &OrgContext) -> TsResult<Vec<Team>> {
	ctx.require(OrgPermission::TeamsRead)?;
	app.directory.list_teams(ctx.org.org_id).await
}

pub fn read_team(ctx: &TeamContext) -> TsResult<&Team> {
	ctx.require(TeamPermission::TeamRead)?;
	Ok(&ctx.team)
}

pub async fn update_team_name(app: &App, ctx: &TeamContext, name: &str) -> TsResult<Team> {
	ctx.require(TeamPermission::TeamUpdate)?;
	app.directory.update_team_name(ctx.org.org.org_id, ctx.team.team_id, name).await
}

/// Deletes the team; its member rows and team-tier settings cascade in the
/// directory, so cached settings snapshots are dropped.
pub async fn delete_team(app: &App, ctx: &TeamContext) -> TsResult<()> {
	ctx.require(TeamPermission::TeamDelete)?;
	app.directory.delete_team(ctx.org.org.org_id, ctx.team.team_id).await?;
	app.settings.invalidate();
	Ok(())
}

// Team member ops //
//*****************//

pub async fn add_team_member(
	app: &App,
	ctx: &TeamContext,
	member_id: MemberId,
	role: TeamRole,
) -> TsResult<TeamMember> {
	ctx.require(TeamPermission::MembersAdd)?;
	app.directory
		.create_team_member(ctx.org.org.org_id, ctx.team.team_id, member_id, role)
		.await
}

pub async fn list_team_members(app: &App, ctx: &TeamContext) -> TsResult<Vec<TeamMember>> {
	ctx.require(TeamPermission::MembersRead)?;
	app.directory.list_team_members(ctx.team.team_id).await
}

/// Reads one team membership row. As with organization membership, a member
/// may always read their own row.
pub async fn read_team_member(
	app: &App,
	ctx: &TeamContext,
	member_id: MemberId,
) -> TsResult<TeamMember> {
	if ctx.org.member_id() != Some(member_id) {
		ctx.require(TeamPermission::MembersRead)?;
	}
	let Some(member) = app.directory.read_team_member(ctx.team.team_id, member_id).await? else {
		return Err(Error::NotFound);
	};
	Ok(member)
}

pub async fn update_team_member_role(
	app: &App,
	ctx: &TeamContext,
	member_id: MemberId,
	role: TeamRole,
) -> TsResult<TeamMember> {
	ctx.require(TeamPermission::MembersUpdate)?;
	app.directory.update_team_member_role(ctx.team.team_id, member_id, role).await
}

pub async fn remove_team_member(app: &App, ctx: &TeamContext, member_id: MemberId) -> TsResult<()> {
	ctx.require(TeamPermission::MembersRemove)?;
	app.directory.delete_team_member(ctx.team.team_id, member_id).await
}

// Settings ops //
//**************//

// Guardrails carry their own update permission; every other domain falls
// under the generic settings one. Reads are all settings:read.
fn org_update_perm(domain: SettingsDomain) -> OrgPermission {
	match domain {
		SettingsDomain::Guardrails => OrgPermission::GuardrailsUpdate,
		_ => OrgPermission::SettingsUpdate,
	}
}

fn team_update_perm(domain: SettingsDomain) -> TeamPermission {
	match domain {
		SettingsDomain::Guardrails => TeamPermission::GuardrailsUpdate,
		_ => TeamPermission::SettingsUpdate,
	}
}

pub async fn read_org_settings<T: TierRecord>(app: &App, ctx: &OrgContext) -> TsResult<T> {
	ctx.require(OrgPermission::SettingsRead)?;
	app.settings.read_tier(SettingsScope::Org(ctx.org.org_id)).await
}

pub async fn update_org_settings<T: TierRecord>(
	app: &App,
	ctx: &OrgContext,
	apply: impl FnOnce(&mut T),
) -> TsResult<T> {
	ctx.require(org_update_perm(T::DOMAIN))?;
	app.settings.update_tier(SettingsScope::Org(ctx.org.org_id), apply).await
}

/// Resets one org-tier domain to its defaults.
pub async fn clear_org_settings(
	app: &App,
	ctx: &OrgContext,
	domain: SettingsDomain,
) -> TsResult<()> {
	ctx.require(org_update_perm(domain))?;
	app.settings.clear_tier(SettingsScope::Org(ctx.org.org_id), domain).await
}

pub async fn read_team_settings<T: TierRecord>(app: &App, ctx: &TeamContext) -> TsResult<T> {
	ctx.require(TeamPermission::SettingsRead)?;
	app.settings.read_tier(SettingsScope::Team(ctx.org.org.org_id, ctx.team.team_id)).await
}

pub async fn update_team_settings<T: TierRecord>(
	app: &App,
	ctx: &TeamContext,
	apply: impl FnOnce(&mut T),
) -> TsResult<T> {
	ctx.require(team_update_perm(T::DOMAIN))?;
	app.settings.update_tier(SettingsScope::Team(ctx.org.org.org_id, ctx.team.team_id), apply).await
}

/// Drops the team's override row for one domain so the team falls back to
/// the organization defaults.
pub async fn clear_team_settings(
	app: &App,
	ctx: &TeamContext,
	domain: SettingsDomain,
) -> TsResult<()> {
	ctx.require(team_update_perm(domain))?;
	app.settings.clear_tier(SettingsScope::Team(ctx.org.org.org_id, ctx.team.team_id), domain).await
}

/// Reads the caller's own preference row. Personal preferences need no
/// permission beyond membership.
pub async fn read_user_settings<T: TierRecord>(app: &App, ctx: &OrgContext) -> TsResult<T> {
	if ctx.membership.is_none() {
		return Err(Error::PermissionDenied);
	}
	app.settings.read_tier(SettingsScope::User(ctx.org.org_id, ctx.caller.user_id)).await
}

/// Writes the caller's own preference row. The write is accepted even while
/// the customization gates above are closed; it stays inert until they open.
pub async fn update_user_settings<T: TierRecord>(
	app: &App,
	ctx: &OrgContext,
	apply: impl FnOnce(&mut T),
) -> TsResult<T> {
	if ctx.membership.is_none() {
		return Err(Error::PermissionDenied);
	}
	app.settings.update_tier(SettingsScope::User(ctx.org.org_id, ctx.caller.user_id), apply).await
}

/// Drops the caller's own preference row for one domain.
pub async fn clear_user_settings(
	app: &App,
	ctx: &OrgContext,
	domain: SettingsDomain,
) -> TsResult<()> {
	if ctx.membership.is_none() {
		return Err(Error::PermissionDenied);
	}
	app.settings.clear_tier(SettingsScope::User(ctx.org.org_id, ctx.caller.user_id), domain).await
}

// Effective settings //
//********************//

// Effective views are resolved for the caller: their own preference rows
// participate whenever the gates allow them to.

pub async fn org_effective_llm(
	app: &App,
	ctx: &OrgContext,
	request: Option<&llm::LlmRequestOverrides>,
) -> TsResult<llm::EffectiveLlmSettings> {
	ctx.require(OrgPermission::SettingsRead)?;
	app.settings.effective_llm(ctx.org.org_id, None, Some(ctx.caller.user_id), request).await
}

pub async fn team_effective_llm(
	app: &App,
	ctx: &TeamContext,
	request: Option<&llm::LlmRequestOverrides>,
) -> TsResult<llm::EffectiveLlmSettings> {
	ctx.require(TeamPermission::SettingsRead)?;
	app.settings
		.effective_llm(
			ctx.org.org.org_id,
			Some(ctx.team.team_id),
			Some(ctx.org.caller.user_id),
			request,
		)
		.await
}

pub async fn org_effective_rag(
	app: &App,
	ctx: &OrgContext,
) -> TsResult<rag::EffectiveRagSettings> {
	ctx.require(OrgPermission::SettingsRead)?;
	app.settings.effective_rag(ctx.org.org_id, None, Some(ctx.caller.user_id)).await
}

pub async fn team_effective_rag(
	app: &App,
	ctx: &TeamContext,
) -> TsResult<rag::EffectiveRagSettings> {
	ctx.require(TeamPermission::SettingsRead)?;
	app.settings
		.effective_rag(ctx.org.org.org_id, Some(ctx.team.team_id), Some(ctx.org.caller.user_id))
		.await
}

pub async fn org_effective_theme(
	app: &App,
	ctx: &OrgContext,
) -> TsResult<theme::EffectiveThemeSettings> {
	ctx.require(OrgPermission::SettingsRead)?;
	app.settings.effective_theme(ctx.org.org_id, None, Some(ctx.caller.user_id)).await
}

pub async fn team_effective_theme(
	app: &App,
	ctx: &TeamContext,
) -> TsResult<theme::EffectiveThemeSettings> {
	ctx.require(TeamPermission::SettingsRead)?;
	app.settings
		.effective_theme(ctx.org.org.org_id, Some(ctx.team.team_id), Some(ctx.org.caller.user_id))
		.await
}

pub async fn org_effective_guardrails(
	app: &App,
	ctx: &OrgContext,
) -> TsResult<guardrails::EffectiveGuardrailsSettings> {
	ctx.require(OrgPermission::SettingsRead)?;
	app.settings.effective_guardrails(ctx.org.org_id, None).await
}

pub async fn team_effective_guardrails(
	app: &App,
	ctx: &TeamContext,
) -> TsResult<guardrails::EffectiveGuardrailsSettings> {
	ctx.require(TeamPermission::SettingsRead)?;
	app.settings.effective_guardrails(ctx.org.org.org_id, Some(ctx.team.team_id)).await
}

pub async fn org_effective_chat(
	app: &App,
	ctx: &OrgContext,
) -> TsResult<chat::EffectiveChatSettings> {
	ctx.require(OrgPermission::SettingsRead)?;
	app.settings.effective_chat(ctx.org.org_id, None, Some(ctx.caller.user_id)).await
}

pub async fn team_effective_chat(
	app: &App,
	ctx: &TeamContext,
) -> TsResult<chat::EffectiveChatSettings> {
	ctx.require(TeamPermission::SettingsRead)?;
	app.settings
		.effective_chat(ctx.org.org.org_id, Some(ctx.team.team_id), Some(ctx.org.caller.user_id))
		.await
}

// Provider secrets //
//******************//

/// Stores a provider credential and returns the opaque reference token to
/// put into provider settings.
pub async fn set_provider_secret(
	app: &App,
	ctx: &OrgContext,
	name: &str,
	plaintext: &str,
) -> TsResult<Box<str>> {
	ctx.require(OrgPermission::ProvidersUpdate)?;
	app.vault.set_secret(&SecretScope::new(ctx.org.org_id, name), plaintext).await
}

pub async fn has_provider_secret(app: &App, ctx: &OrgContext, name: &str) -> TsResult<bool> {
	ctx.require(OrgPermission::ProvidersRead)?;
	app.vault.has_secret(&SecretScope::new(ctx.org.org_id, name)).await
}

pub async fn delete_provider_secret(app: &App, ctx: &OrgContext, name: &str) -> TsResult<()> {
	ctx.require(OrgPermission::ProvidersUpdate)?;
	app.vault.delete_secret(&SecretScope::new(ctx.org.org_id, name)).await
}

// Tests //
//*******//


// vim: ts=4
