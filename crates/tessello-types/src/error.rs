//! Error types shared by every Tessello crate.
//!
//! The variants map one-to-one onto HTTP status codes, and the mapping is
//! deliberately coarse: a caller probing another tenant's resources must not
//! be able to distinguish "does not exist" from "exists but not yours", so
//! both collapse into [`Error::NotFound`].

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub type TsResult<T> = Result<T, Error>;

// Error //
//*******//

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
	/// No caller identity was presented (401).
	Unauthorized,
	/// The caller is inside the tenant but lacks the required permission (403).
	PermissionDenied,
	/// Absent resource, or a resource outside the caller's tenant (404).
	NotFound,
	/// Malformed identifier or payload (422).
	ValidationError(String),
	/// Stored data violates an integrity rule the resolver relies on (500).
	ConfigError(String),
	/// Storage backend failure (500).
	DbError,
	/// Anything else (500).
	Internal(String),
}

impl Error {
	pub fn status(&self) -> StatusCode {
		match self {
			Error::Unauthorized => StatusCode::UNAUTHORIZED,
			Error::PermissionDenied => StatusCode::FORBIDDEN,
			Error::NotFound => StatusCode::NOT_FOUND,
			Error::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
			Error::ConfigError(_) | Error::DbError | Error::Internal(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}

	/// Stable machine-readable code for the response body.
	pub fn code(&self) -> &'static str {
		match self {
			Error::Unauthorized => "unauthorized",
			Error::PermissionDenied => "permission-denied",
			Error::NotFound => "not-found",
			Error::ValidationError(_) => "validation",
			Error::ConfigError(_) => "config",
			Error::DbError => "db",
			Error::Internal(_) => "internal",
		}
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::Unauthorized => write!(f, "unauthorized"),
			Error::PermissionDenied => write!(f, "permission denied"),
			Error::NotFound => write!(f, "not found"),
			Error::ValidationError(msg) => write!(f, "validation error: {msg}"),
			Error::ConfigError(msg) => write!(f, "config error: {msg}"),
			Error::DbError => write!(f, "database error"),
			Error::Internal(msg) => write!(f, "internal error: {msg}"),
		}
	}
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
	fn into_response(self) -> axum::response::Response {
		// Server-side faults keep their detail out of the wire body.
		let body = match &self {
			Error::ValidationError(msg) => json!({ "error": self.code(), "message": msg }),
			_ => json!({ "error": self.code() }),
		};
		(self.status(), Json(body)).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn status_codes_follow_the_taxonomy() {
		assert_eq!(Error::Unauthorized.status(), StatusCode::UNAUTHORIZED);
		assert_eq!(Error::PermissionDenied.status(), StatusCode::FORBIDDEN);
		assert_eq!(Error::NotFound.status(), StatusCode::NOT_FOUND);
		assert_eq!(
			Error::ValidationError("bad id".into()).status(),
			StatusCode::UNPROCESSABLE_ENTITY
		);
		assert_eq!(
			Error::ConfigError("owner missing".into()).status(),
			StatusCode::INTERNAL_SERVER_ERROR
		);
		assert_eq!(Error::DbError.status(), StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(
			Error::Internal("boom".into()).status(),
			StatusCode::INTERNAL_SERVER_ERROR
		);
	}

	#[test]
	fn display_includes_validation_detail() {
		let err = Error::ValidationError("invalid organization id: 'nope'".into());
		assert_eq!(
			err.to_string(),
			"validation error: invalid organization id: 'nope'"
		);
		assert_eq!(Error::NotFound.to_string(), "not found");
	}
}

// vim: ts=4
