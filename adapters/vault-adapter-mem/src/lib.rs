//! In-memory secrets vault adapter
//!
//! Keeps one secret slot per (organization, name) scope and hands out opaque
//! reference tokens. A token is the digest of a fresh random salt together
//! with the scope, never of the plaintext, so two organizations storing the
//! same API key get unrelated tokens and rotating a secret rotates its
//! token. The plaintext itself is not retained; this adapter backs tests
//! and single-process deployments where nothing downstream dereferences the
//! token.

use std::collections::HashMap;

use async_trait::async_trait;
use base64::Engine;
use parking_lot::RwLock;
use rand::Rng;
use sha2::{Digest, Sha256};

use tessello::prelude::*;

fn derive_token(scope: &SecretScope) -> Box<str> {
	let mut salt = [0u8; 16];
	rand::rng().fill_bytes(&mut salt);

	let mut hasher = Sha256::new();
	hasher.update(salt);
	hasher.update(scope.org_id.0.as_bytes());
	hasher.update(scope.name.as_bytes());
	let digest = hasher.finalize();

	format!("vlt_{}", base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(digest)).into()
}

// MemVaultAdapter //
//*****************//

#[derive(Debug, Default)]
pub struct MemVaultAdapter {
	tokens: RwLock<HashMap<SecretScope, Box<str>>>,
}

impl MemVaultAdapter {
	#[must_use]
	pub fn new() -> Self {
		Self { tokens: RwLock::new(HashMap::new()) }
	}
}

#[async_trait]
impl VaultAdapter for MemVaultAdapter {
	async fn set_secret(&self, scope: &SecretScope, _plaintext: &str) -> TsResult<Box<str>> {
		let token = derive_token(scope);
		self.tokens.write().insert(scope.clone(), token.clone());
		Ok(token)
	}

	async fn has_secret(&self, scope: &SecretScope) -> TsResult<bool> {
		Ok(self.tokens.read().contains_key(scope))
	}

	async fn delete_secret(&self, scope: &SecretScope) -> TsResult<()> {
		self.tokens.write().remove(scope);
		Ok(())
	}
}

// Tests //
//*******//


// vim: ts=4
