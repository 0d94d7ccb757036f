//! Secrets vault adapter interface.
//!
//! Provider credentials (LLM API keys and the like) never sit next to the
//! settings that reference them. The vault stores the plaintext and hands
//! back an opaque reference token; everything outside the vault only ever
//! sees the token.

use async_trait::async_trait;

use crate::error::TsResult;
use crate::types::OrgId;

/// Addresses one secret: scoped to the owning organization plus a name
/// chosen by the caller ("openai-api-key", "embedding-key", ...).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SecretScope {
	pub org_id: OrgId,
	pub name: Box<str>,
}

impl SecretScope {
	#[must_use]
	pub fn new(org_id: OrgId, name: &str) -> Self {
		Self { org_id, name: name.into() }
	}
}

#[async_trait]
pub trait VaultAdapter: std::fmt::Debug + Send + Sync {
	/// Stores a secret and returns an opaque reference token. The token must
	/// not reveal the plaintext, and storing the same plaintext under two
	/// scopes must not produce correlatable tokens.
	async fn set_secret(&self, scope: &SecretScope, plaintext: &str) -> TsResult<Box<str>>;
	/// Whether a secret is stored under this scope.
	async fn has_secret(&self, scope: &SecretScope) -> TsResult<bool>;
	/// Removes a secret. Removing an absent secret is not an error.
	async fn delete_secret(&self, scope: &SecretScope) -> TsResult<()>;
}

// vim: ts=4
