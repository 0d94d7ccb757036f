//! Route middleware for tenancy and permission checks
//!
//! The factories here return cloneable middleware functions for
//! `axum::middleware::from_fn_with_state`. Each one parses the scope ids
//! out of the route path, resolves the caller's context (absent and foreign
//! resources come back `NotFound` here), optionally checks one permission,
//! and hands the resolved context to the handler through request extensions.
//!
//! Routes whose handlers need finer checks than a single permission (the
//! self-read exception, per-domain settings permissions) mount the plain
//! scope variants and let the handler call into [`crate::access`].

use axum::{
	extract::{RawPathParams, Request, State},
	middleware::Next,
	response::Response,
};
use std::future::Future;
use std::pin::Pin;
use tracing::warn;

use tessello_types::prelude::{Error, OrgId, TeamId};

use crate::access::{self, Caller};
use crate::app::App;
use crate::extract::{Auth, OrgScope, TeamScope};
use crate::perm::{OrgPermission, TeamPermission};

pub type PermissionCheckOutput = Pin<Box<dyn Future<Output = Result<Response, Error>> + Send>>;

// Factories //
//***********//

/// Resolves the `{org_id}` path parameter into an [`OrgScope`] without
/// checking any permission.
pub fn org_scope()
-> impl Fn(State<App>, Auth, RawPathParams, Request, Next) -> PermissionCheckOutput + Clone {
	move |state, auth, params, req, next| {
		Box::pin(org_permission_check(state, auth, params, req, next, None))
	}
}

/// Resolves the `{org_id}` path parameter and requires one organization
/// permission on top.
pub fn check_perm_org(
	perm: OrgPermission,
) -> impl Fn(State<App>, Auth, RawPathParams, Request, Next) -> PermissionCheckOutput + Clone {
	move |state, auth, params, req, next| {
		Box::pin(org_permission_check(state, auth, params, req, next, Some(perm)))
	}
}

/// Resolves `{org_id}` and `{team_id}` into a [`TeamScope`] without checking
/// any permission.
pub fn team_scope()
-> impl Fn(State<App>, Auth, RawPathParams, Request, Next) -> PermissionCheckOutput + Clone {
	move |state, auth, params, req, next| {
		Box::pin(team_permission_check(state, auth, params, req, next, None))
	}
}

/// Resolves `{org_id}` and `{team_id}` and requires one team permission,
/// falling back to the caller's organization role where they are not in the
/// team.
pub fn check_perm_team(
	perm: TeamPermission,
) -> impl Fn(State<App>, Auth, RawPathParams, Request, Next) -> PermissionCheckOutput + Clone {
	move |state, auth, params, req, next| {
		Box::pin(team_permission_check(state, auth, params, req, next, Some(perm)))
	}
}

// Checks //
//********//

async fn org_permission_check(
	State(app): State<App>,
	Auth(caller): Auth,
	params: RawPathParams,
	mut req: Request,
	next: Next,
	perm: Option<OrgPermission>,
) -> Result<Response, Error> {
	let org_id: OrgId = parse_param(&params, "org_id")?;
	let ctx = access::resolve_org(&app, caller, org_id).await?;
	if let Some(perm) = perm {
		if let Err(err) = ctx.require(perm) {
			warn!(subject = %caller.user_id, org_id = %org_id, perm = %perm,
				"org permission denied");
			return Err(err);
		}
	}
	req.extensions_mut().insert(OrgScope(ctx));
	Ok(next.run(req).await)
}

async fn team_permission_check(
	State(app): State<App>,
	Auth(caller): Auth,
	params: RawPathParams,
	mut req: Request,
	next: Next,
	perm: Option<TeamPermission>,
) -> Result<Response, Error> {
	let org_id: OrgId = parse_param(&params, "org_id")?;
	let team_id: TeamId = parse_param(&params, "team_id")?;
	let org_ctx = access::resolve_org(&app, caller, org_id).await?;
	let ctx = access::resolve_team(&app, org_ctx, team_id).await?;
	if let Some(perm) = perm {
		if let Err(err) = ctx.require(perm) {
			warn!(subject = %caller.user_id, org_id = %org_id, team_id = %team_id,
				perm = %perm, "team permission denied");
			return Err(err);
		}
	}
	req.extensions_mut().insert(TeamScope(ctx));
	Ok(next.run(req).await)
}

/// Picks one named capture out of the route path. A missing capture is a
/// routing bug; a malformed value is the caller's `ValidationError`.
fn parse_param<T>(params: &RawPathParams, name: &str) -> Result<T, Error>
where
	T: std::str::FromStr<Err = Error>,
{
	let Some(raw) = params.iter().find_map(|(key, value)| (key == name).then_some(value)) else {
		return Err(Error::Internal(format!("missing path parameter '{name}'")));
	};
	raw.parse()
}

// Tests //
//*******//


// vim: ts=4
