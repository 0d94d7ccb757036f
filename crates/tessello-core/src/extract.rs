//! Request extractors
//!
//! Authentication happens in the host server; it verifies credentials and
//! puts an [`Auth`] into the request extensions. The scope extractors pick
//! up what the permission middleware resolved, so handlers never look up
//! tenancy themselves.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use tessello_types::prelude::Error;

use crate::access::{Caller, OrgContext, TeamContext};

// Auth //
//******//

/// The authenticated caller. Missing auth is `Unauthorized`, which keeps
/// "who are you" failures apart from "you may not" ones.
#[derive(Clone, Copy, Debug)]
pub struct Auth(pub Caller);

impl<S> FromRequestParts<S> for Auth
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		if let Some(auth) = parts.extensions.get::<Auth>().copied() {
			Ok(auth)
		} else {
			Err(Error::Unauthorized)
		}
	}
}

// OrgScope //
//**********//

/// The organization context resolved by the scope middleware. Extracting it
/// on a route without that middleware is a wiring bug, not a caller error.
#[derive(Clone, Debug)]
pub struct OrgScope(pub OrgContext);

impl<S> FromRequestParts<S> for OrgScope
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		if let Some(scope) = parts.extensions.get::<OrgScope>().cloned() {
			Ok(scope)
		} else {
			Err(Error::Internal("organization scope missing; check middleware order".into()))
		}
	}
}

// TeamScope //
//***********//

/// The team context resolved by the scope middleware.
#[derive(Clone, Debug)]
pub struct TeamScope(pub TeamContext);

impl<S> FromRequestParts<S> for TeamScope
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		if let Some(scope) = parts.extensions.get::<TeamScope>().cloned() {
			Ok(scope)
		} else {
			Err(Error::Internal("team scope missing; check middleware order".into()))
		}
	}
}

// vim: ts=4
