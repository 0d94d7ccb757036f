//! Common test utilities and helpers
//!
//! Shared fixtures for the integration tests: an app over the in-memory
//! adapters, plus seeding helpers for organizations, members, and teams.
//! Seeding goes straight through the directory adapter; the tests themselves
//! exercise the access and settings layers.

use std::sync::Arc;

use tessello::access::{self, Caller, OrgContext, TeamContext};
use tessello::app::{App, AppBuilder};
use tessello::directory_adapter::{OrgRole, TeamRole};
use tessello::types::{MemberId, OrgId, TeamId, UserId};

use tessello_directory_adapter_mem::MemDirectoryAdapter;
use tessello_vault_adapter_mem::MemVaultAdapter;

/// Initialize tracing for test debugging. Safe to call from every test.
pub fn setup_test_logging() {
	let _ = tracing_subscriber::fmt()
		.with_test_writer()
		.with_max_level(tracing::Level::DEBUG)
		.try_init();
}

pub fn build_app() -> App {
	let mut builder = AppBuilder::new();
	builder
		.directory_adapter(Arc::new(MemDirectoryAdapter::new()))
		.vault_adapter(Arc::new(MemVaultAdapter::new()));
	builder.build().expect("app should build with both adapters")
}

/// An organization seeded with its owner.
pub struct TestOrg {
	pub org_id: OrgId,
	pub owner: Caller,
	pub owner_member_id: MemberId,
}

pub async fn seed_org(app: &App, name: &str) -> TestOrg {
	let created = tessello::bootstrap::create_organization(
		app,
		tessello::bootstrap::CreateOrganizationOptions {
			name,
			owner_user_id: UserId::new(),
		},
	)
	.await
	.expect("seed org");
	TestOrg {
		org_id: created.org.org_id,
		owner: Caller::user(created.owner.user_id),
		owner_member_id: created.owner.member_id,
	}
}

pub async fn add_member(app: &App, org_id: OrgId, role: OrgRole) -> (Caller, MemberId) {
	let caller = Caller::user(UserId::new());
	let member = app
		.directory
		.create_member(org_id, caller.user_id, role)
		.await
		.expect("seed member");
	(caller, member.member_id)
}

pub async fn seed_team(app: &App, org_id: OrgId, name: &str) -> TeamId {
	app.directory.create_team(org_id, name).await.expect("seed team").team_id
}

pub async fn join_team(app: &App, org_id: OrgId, team_id: TeamId, member_id: MemberId, role: TeamRole) {
	app.directory
		.create_team_member(org_id, team_id, member_id, role)
		.await
		.expect("seed team member");
}

pub async fn org_ctx(app: &App, caller: Caller, org_id: OrgId) -> OrgContext {
	access::resolve_org(app, caller, org_id).await.expect("org context")
}

pub async fn team_ctx(app: &App, caller: Caller, org_id: OrgId, team_id: TeamId) -> TeamContext {
	let ctx = org_ctx(app, caller, org_id).await;
	access::resolve_team(app, ctx, team_id).await.expect("team context")
}

// vim: ts=4
