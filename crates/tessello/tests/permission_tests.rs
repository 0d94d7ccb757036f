//! Permission model integration tests
//!
//! Walks the role ladders through real operations instead of the static
//! tables: each tier of both namespaces gets operations it can and cannot
//! perform, plus the org-role fallback into teams, the owner-only actions
//! and the platform-admin bypass.

mod common;

use common::*;

use tessello::access::{self, Caller};
use tessello::directory_adapter::{OrgRole, TeamRole};
use tessello::error::Error;
use tessello::perm::{OrgPermission, TeamPermission};
use tessello::settings::domains::guardrails::TeamGuardrailsSettings;
use tessello::settings::domains::llm::{OrgLlmSettings, TeamLlmSettings};
use tessello::types::UserId;

#[tokio::test]
async fn test_org_roles_ladder_through_operations() {
	setup_test_logging();
	let app = build_app();
	let org = seed_org(&app, "acme").await;
	let (admin, _) = add_member(&app, org.org_id, OrgRole::Admin).await;
	let (member, _) = add_member(&app, org.org_id, OrgRole::Member).await;

	// MEMBER reads but does not shape the organization.
	let member_ctx = org_ctx(&app, member, org.org_id).await;
	assert_eq!(access::read_org(&member_ctx).expect("read").name.as_ref(), "acme");
	access::list_teams(&app, &member_ctx).await.expect("list teams");
	let err = access::create_team(&app, &member_ctx, "skunkworks").await.unwrap_err();
	assert_eq!(err, Error::PermissionDenied);
	let err = access::update_org_settings(&app, &member_ctx, |s: &mut OrgLlmSettings| {
		s.temperature = 0.5;
	})
	.await
	.unwrap_err();
	assert_eq!(err, Error::PermissionDenied);

	// ADMIN manages everything short of the owner-only actions.
	let admin_ctx = org_ctx(&app, admin, org.org_id).await;
	access::create_team(&app, &admin_ctx, "skunkworks").await.expect("create team");
	access::update_org_settings(&app, &admin_ctx, |s: &mut OrgLlmSettings| {
		s.temperature = 0.5;
	})
	.await
	.expect("update settings");
	assert!(!admin_ctx.has(OrgPermission::BillingRead));
	let err = access::delete_org(&app, &admin_ctx).await.unwrap_err();
	assert_eq!(err, Error::PermissionDenied);

	// OWNER holds the whole namespace, including deletion.
	let owner_ctx = org_ctx(&app, org.owner, org.org_id).await;
	assert!(owner_ctx.has(OrgPermission::BillingRead));
	access::delete_org(&app, &owner_ctx).await.expect("delete org");
	let err = access::resolve_org(&app, org.owner, org.org_id).await.unwrap_err();
	assert_eq!(err, Error::NotFound);
}

#[tokio::test]
async fn test_team_roles_ladder_through_operations() {
	setup_test_logging();
	let app = build_app();
	let org = seed_org(&app, "acme").await;
	let team_id = seed_team(&app, org.org_id, "research").await;
	let (viewer, viewer_id) = add_member(&app, org.org_id, OrgRole::Member).await;
	let (worker, worker_id) = add_member(&app, org.org_id, OrgRole::Member).await;
	let (lead, lead_id) = add_member(&app, org.org_id, OrgRole::Member).await;
	join_team(&app, org.org_id, team_id, viewer_id, TeamRole::Viewer).await;
	join_team(&app, org.org_id, team_id, worker_id, TeamRole::Member).await;
	join_team(&app, org.org_id, team_id, lead_id, TeamRole::Admin).await;

	// VIEWER reads the team but changes nothing.
	let viewer_ctx = team_ctx(&app, viewer, org.org_id, team_id).await;
	access::read_team(&viewer_ctx).expect("read team");
	access::list_team_members(&app, &viewer_ctx).await.expect("list members");
	assert!(!viewer_ctx.has(TeamPermission::PromptsManage));
	let err = access::update_team_settings(&app, &viewer_ctx, |s: &mut TeamLlmSettings| {
		s.temperature = Some(0.2);
	})
	.await
	.unwrap_err();
	assert_eq!(err, Error::PermissionDenied);

	// MEMBER works inside the team but does not administer it.
	let worker_ctx = team_ctx(&app, worker, org.org_id, team_id).await;
	assert!(worker_ctx.has(TeamPermission::PromptsManage));
	let err = access::update_team_settings(&app, &worker_ctx, |s: &mut TeamLlmSettings| {
		s.temperature = Some(0.2);
	})
	.await
	.unwrap_err();
	assert_eq!(err, Error::PermissionDenied);
	let err = access::update_team_member_role(&app, &worker_ctx, viewer_id, TeamRole::Member)
		.await
		.unwrap_err();
	assert_eq!(err, Error::PermissionDenied);

	// ADMIN holds the whole team namespace.
	let lead_ctx = team_ctx(&app, lead, org.org_id, team_id).await;
	access::update_team_name(&app, &lead_ctx, "applied research").await.expect("rename");
	access::update_team_settings(&app, &lead_ctx, |s: &mut TeamLlmSettings| {
		s.temperature = Some(0.2);
	})
	.await
	.expect("update settings");
	access::update_team_member_role(&app, &lead_ctx, viewer_id, TeamRole::Member)
		.await
		.expect("promote viewer");
	access::remove_team_member(&app, &lead_ctx, worker_id).await.expect("remove member");
}

#[tokio::test]
async fn test_org_admins_manage_teams_they_are_not_in() {
	setup_test_logging();
	let app = build_app();
	let org = seed_org(&app, "acme").await;
	let team_id = seed_team(&app, org.org_id, "research").await;
	let (admin, _) = add_member(&app, org.org_id, OrgRole::Admin).await;
	let (member, member_id) = add_member(&app, org.org_id, OrgRole::Member).await;

	// The org admin has no team row; teams:admin carries every check.
	let admin_ctx = team_ctx(&app, admin, org.org_id, team_id).await;
	assert!(admin_ctx.role().is_none());
	access::update_team_name(&app, &admin_ctx, "labs").await.expect("rename");
	access::add_team_member(&app, &admin_ctx, member_id, TeamRole::Viewer).await.expect("add");
	access::update_team_settings(&app, &admin_ctx, |s: &mut TeamGuardrailsSettings| {
		s.pii_redaction = Some(true);
	})
	.await
	.expect("guardrails");

	// A plain org member outside the team cannot even read it.
	let other_team = seed_team(&app, org.org_id, "ops").await;
	let member_ctx = team_ctx(&app, member, org.org_id, other_team).await;
	let err = access::read_team(&member_ctx).unwrap_err();
	assert_eq!(err, Error::PermissionDenied);
	let err = access::list_team_members(&app, &member_ctx).await.unwrap_err();
	assert_eq!(err, Error::PermissionDenied);
}

#[tokio::test]
async fn test_ownership_transfer_lifecycle() {
	setup_test_logging();
	let app = build_app();
	let org = seed_org(&app, "acme").await;
	let (admin, admin_member_id) = add_member(&app, org.org_id, OrgRole::Admin).await;

	// Only the owner may transfer, and the owner role is never granted
	// through the normal member operations.
	let admin_ctx = org_ctx(&app, admin, org.org_id).await;
	let err =
		access::transfer_ownership(&app, &admin_ctx, admin_member_id).await.unwrap_err();
	assert_eq!(err, Error::PermissionDenied);

	let owner_ctx = org_ctx(&app, org.owner, org.org_id).await;
	let err = access::invite_member(&app, &owner_ctx, UserId::new(), OrgRole::Owner)
		.await
		.unwrap_err();
	assert!(matches!(err, Error::ValidationError(_)));
	let err = access::remove_member(&app, &owner_ctx, org.owner_member_id).await.unwrap_err();
	assert!(matches!(err, Error::ValidationError(_)));

	access::transfer_ownership(&app, &owner_ctx, admin_member_id).await.expect("transfer");

	// Roles swapped: the old owner is an admin now and cannot transfer back.
	let new_owner_ctx = org_ctx(&app, admin, org.org_id).await;
	assert_eq!(new_owner_ctx.role(), Some(OrgRole::Owner));
	let old_owner_ctx = org_ctx(&app, org.owner, org.org_id).await;
	assert_eq!(old_owner_ctx.role(), Some(OrgRole::Admin));
	let err = access::transfer_ownership(&app, &old_owner_ctx, org.owner_member_id)
		.await
		.unwrap_err();
	assert_eq!(err, Error::PermissionDenied);

	access::transfer_ownership(&app, &new_owner_ctx, org.owner_member_id)
		.await
		.expect("transfer back");
	let restored = org_ctx(&app, org.owner, org.org_id).await;
	assert_eq!(restored.role(), Some(OrgRole::Owner));
}

#[tokio::test]
async fn test_platform_admin_operates_without_membership() {
	setup_test_logging();
	let app = build_app();
	let org = seed_org(&app, "acme").await;
	let team_id = seed_team(&app, org.org_id, "research").await;
	let operator = Caller::platform_admin(UserId::new());

	let ctx = org_ctx(&app, operator, org.org_id).await;
	assert!(ctx.role().is_none());
	assert_eq!(access::read_org(&ctx).expect("read").name.as_ref(), "acme");
	access::update_org_settings(&app, &ctx, |s: &mut OrgLlmSettings| {
		s.allow_per_request_model_selection = true;
	})
	.await
	.expect("update settings");

	let team = team_ctx(&app, operator, org.org_id, team_id).await;
	access::update_team_name(&app, &team, "renamed by support").await.expect("rename");
}

#[tokio::test]
async fn test_provider_secret_permissions_split() {
	setup_test_logging();
	let app = build_app();
	let org = seed_org(&app, "acme").await;
	let (admin, _) = add_member(&app, org.org_id, OrgRole::Admin).await;
	let (member, _) = add_member(&app, org.org_id, OrgRole::Member).await;

	// providers:read lets a member check presence, not manage credentials.
	let member_ctx = org_ctx(&app, member, org.org_id).await;
	assert!(!access::has_provider_secret(&app, &member_ctx, "openai").await.expect("has"));
	let err = access::set_provider_secret(&app, &member_ctx, "openai", "sk-live-1")
		.await
		.unwrap_err();
	assert_eq!(err, Error::PermissionDenied);

	let admin_ctx = org_ctx(&app, admin, org.org_id).await;
	let token = access::set_provider_secret(&app, &admin_ctx, "openai", "sk-live-1")
		.await
		.expect("set");
	assert!(token.starts_with("vlt_"));
	assert!(access::has_provider_secret(&app, &member_ctx, "openai").await.expect("has"));

	access::delete_provider_secret(&app, &admin_ctx, "openai").await.expect("delete");
	assert!(!access::has_provider_secret(&app, &member_ctx, "openai").await.expect("has"));
}

#[tokio::test]
async fn test_permission_tokens_are_wire_stable() {
	// The string forms appear in audit logs and API responses; renaming one
	// is a breaking change.
	assert_eq!(OrgPermission::OrgRead.as_str(), "org:read");
	assert_eq!(OrgPermission::TeamsAdmin.as_str(), "teams:admin");
	assert_eq!(OrgPermission::GuardrailsUpdate.as_str(), "guardrails:update");
	assert_eq!(OrgPermission::BillingRead.as_str(), "billing:read");
	assert_eq!(TeamPermission::TeamRead.as_str(), "team:read");
	assert_eq!(TeamPermission::GuardrailsUpdate.as_str(), "guardrails:update");
	assert_eq!(TeamPermission::ChatsManage.as_str(), "chats:manage");
}

// vim: ts=4
