//! Settings service with snapshot loading, caching, and tier updates
//!
//! The service sits between the directory adapter's raw JSON rows and the
//! typed resolution pipeline. Chain reads go through an LRU cache keyed by
//! (org, team, user, domain); any settings write clears the whole cache, so
//! a resolution started after a gate flip always observes the new flag.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{debug, info};

use tessello_types::directory_adapter::{
	DirectoryAdapter, SettingsChain, SettingsDomain, SettingsScope,
};
use tessello_types::prelude::{Error, OrgId, TeamId, TsResult, UserId};

use super::TierRecord;
use super::domains::{chat, guardrails, llm, rag, theme};

type ChainKey = (OrgId, Option<TeamId>, Option<UserId>, SettingsDomain);

// SettingsCache //
//***************//

/// LRU cache over chain snapshots.
struct SettingsCache {
	cache: parking_lot::RwLock<LruCache<ChainKey, SettingsChain>>,
}

impl SettingsCache {
	fn new(capacity: usize) -> Self {
		let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
		Self { cache: parking_lot::RwLock::new(LruCache::new(capacity)) }
	}

	fn get(&self, key: &ChainKey) -> Option<SettingsChain> {
		self.cache.write().get(key).cloned()
	}

	fn put(&self, key: ChainKey, chain: SettingsChain) {
		self.cache.write().put(key, chain);
	}

	fn clear(&self) {
		self.cache.write().clear();
	}
}

// SettingsService //
//*****************//

pub struct SettingsService {
	directory: Arc<dyn DirectoryAdapter>,
	cache: SettingsCache,
}

impl SettingsService {
	pub fn new(directory: Arc<dyn DirectoryAdapter>, cache_size: usize) -> Self {
		Self { directory, cache: SettingsCache::new(cache_size) }
	}

	/// Drops every cached snapshot. Called on every settings write; callers
	/// that mutate the directory underneath the service (cascading deletes)
	/// must call it themselves.
	pub fn invalidate(&self) {
		self.cache.clear();
	}

	async fn chain(
		&self,
		org_id: OrgId,
		team_id: Option<TeamId>,
		user_id: Option<UserId>,
		domain: SettingsDomain,
	) -> TsResult<SettingsChain> {
		let key = (org_id, team_id, user_id, domain);
		if let Some(chain) = self.cache.get(&key) {
			debug!(org = %org_id, domain = %domain, "settings chain cache hit");
			return Ok(chain);
		}
		let chain = self.directory.read_settings_chain(org_id, team_id, user_id, domain).await?;
		self.cache.put(key, chain.clone());
		Ok(chain)
	}

	// # Effective settings

	pub async fn effective_llm(
		&self,
		org_id: OrgId,
		team_id: Option<TeamId>,
		user_id: Option<UserId>,
		request: Option<&llm::LlmRequestOverrides>,
	) -> TsResult<llm::EffectiveLlmSettings> {
		let chain = self.chain(org_id, team_id, user_id, SettingsDomain::Llm).await?;
		let org: llm::OrgLlmSettings = decode_or_default(chain.org, SettingsDomain::Llm, "org")?;
		let team: Option<llm::TeamLlmSettings> = decode(chain.team, SettingsDomain::Llm, "team")?;
		let user: Option<llm::UserLlmSettings> = decode(chain.user, SettingsDomain::Llm, "user")?;

		let mut resolution = llm::resolve(&org, team.as_ref(), user.as_ref());
		if let Some(request) = request {
			resolution = resolution.apply_request(request)?;
		}
		Ok(resolution.into_effective())
	}

	pub async fn effective_rag(
		&self,
		org_id: OrgId,
		team_id: Option<TeamId>,
		user_id: Option<UserId>,
	) -> TsResult<rag::EffectiveRagSettings> {
		let chain = self.chain(org_id, team_id, user_id, SettingsDomain::Rag).await?;
		let org: rag::OrgRagSettings = decode_or_default(chain.org, SettingsDomain::Rag, "org")?;
		let team: Option<rag::TeamRagSettings> = decode(chain.team, SettingsDomain::Rag, "team")?;
		let user: Option<rag::UserRagSettings> = decode(chain.user, SettingsDomain::Rag, "user")?;
		Ok(rag::resolve(&org, team.as_ref(), user.as_ref()).into_effective())
	}

	pub async fn effective_theme(
		&self,
		org_id: OrgId,
		team_id: Option<TeamId>,
		user_id: Option<UserId>,
	) -> TsResult<theme::EffectiveThemeSettings> {
		let chain = self.chain(org_id, team_id, user_id, SettingsDomain::Theme).await?;
		let org: theme::OrgThemeSettings =
			decode_or_default(chain.org, SettingsDomain::Theme, "org")?;
		let team: Option<theme::TeamThemeSettings> =
			decode(chain.team, SettingsDomain::Theme, "team")?;
		let user: Option<theme::UserThemeSettings> =
			decode(chain.user, SettingsDomain::Theme, "user")?;
		Ok(theme::resolve(&org, team.as_ref(), user.as_ref()).into_effective())
	}

	/// Guardrails have no user tier; the chain stops at the team.
	pub async fn effective_guardrails(
		&self,
		org_id: OrgId,
		team_id: Option<TeamId>,
	) -> TsResult<guardrails::EffectiveGuardrailsSettings> {
		let chain = self.chain(org_id, team_id, None, SettingsDomain::Guardrails).await?;
		let org: guardrails::OrgGuardrailsSettings =
			decode_or_default(chain.org, SettingsDomain::Guardrails, "org")?;
		let team: Option<guardrails::TeamGuardrailsSettings> =
			decode(chain.team, SettingsDomain::Guardrails, "team")?;
		Ok(guardrails::resolve(&org, team.as_ref()).into_effective())
	}

	pub async fn effective_chat(
		&self,
		org_id: OrgId,
		team_id: Option<TeamId>,
		user_id: Option<UserId>,
	) -> TsResult<chat::EffectiveChatSettings> {
		let chain = self.chain(org_id, team_id, user_id, SettingsDomain::Chat).await?;
		let org: chat::OrgChatSettings = decode_or_default(chain.org, SettingsDomain::Chat, "org")?;
		let team: Option<chat::TeamChatSettings> =
			decode(chain.team, SettingsDomain::Chat, "team")?;
		let user: Option<chat::UserChatSettings> =
			decode(chain.user, SettingsDomain::Chat, "user")?;
		Ok(chat::resolve(&org, team.as_ref(), user.as_ref()).into_effective())
	}

	// # Tier records

	/// Reads one tier record, materializing the documented defaults when no
	/// row was ever written.
	pub async fn read_tier<T: TierRecord>(&self, scope: SettingsScope) -> TsResult<T> {
		check_scope::<T>(&scope)?;
		let row = self.directory.read_settings(scope, T::DOMAIN).await?;
		Ok(decode(row, T::DOMAIN, T::TIER)?.unwrap_or_default())
	}

	/// Read-modify-write of one tier record. The record is loaded (defaults
	/// when absent), `apply` mutates it, and the result is stored as the new
	/// row. Storing an override under a closed gate is accepted; the value
	/// just stays inert until the gate opens.
	pub async fn update_tier<T: TierRecord>(
		&self,
		scope: SettingsScope,
		apply: impl FnOnce(&mut T),
	) -> TsResult<T> {
		check_scope::<T>(&scope)?;
		let row = self.directory.read_settings(scope, T::DOMAIN).await?;
		let mut record: T = decode(row, T::DOMAIN, T::TIER)?.unwrap_or_default();
		apply(&mut record);

		let value = serde_json::to_value(&record).map_err(|err| {
			Error::Internal(format!("serialize {} {} settings: {err}", T::TIER, T::DOMAIN))
		})?;
		self.directory.update_settings(scope, T::DOMAIN, Some(value)).await?;
		self.cache.clear();
		info!(scope = ?scope, domain = %T::DOMAIN, "settings tier updated");
		Ok(record)
	}

	/// Deletes one tier row so the scope falls back to inheriting.
	pub async fn clear_tier(&self, scope: SettingsScope, domain: SettingsDomain) -> TsResult<()> {
		self.directory.update_settings(scope, domain, None).await?;
		self.cache.clear();
		info!(scope = ?scope, domain = %domain, "settings tier cleared");
		Ok(())
	}

	/// Integrity check: decodes every org-tier row of the organization so a
	/// corrupt row surfaces as `ConfigError` here instead of failing later
	/// on a request path.
	pub async fn validate_org(&self, org_id: OrgId) -> TsResult<()> {
		let scope = SettingsScope::Org(org_id);
		self.read_tier::<llm::OrgLlmSettings>(scope).await?;
		self.read_tier::<rag::OrgRagSettings>(scope).await?;
		self.read_tier::<theme::OrgThemeSettings>(scope).await?;
		self.read_tier::<guardrails::OrgGuardrailsSettings>(scope).await?;
		self.read_tier::<chat::OrgChatSettings>(scope).await?;
		Ok(())
	}
}

impl std::fmt::Debug for SettingsService {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SettingsService").finish_non_exhaustive()
	}
}

fn scope_tier(scope: &SettingsScope) -> &'static str {
	match scope {
		SettingsScope::Org(_) => "org",
		SettingsScope::Team(_, _) => "team",
		SettingsScope::User(_, _) => "user",
	}
}

fn check_scope<T: TierRecord>(scope: &SettingsScope) -> TsResult<()> {
	if scope_tier(scope) == T::TIER {
		Ok(())
	} else {
		Err(Error::Internal(format!(
			"settings tier mismatch: {} record used with {} scope",
			T::TIER,
			scope_tier(scope)
		)))
	}
}

fn decode<T: serde::de::DeserializeOwned>(
	row: Option<serde_json::Value>,
	domain: SettingsDomain,
	tier: &str,
) -> TsResult<Option<T>> {
	match row {
		Some(value) => serde_json::from_value(value).map(Some).map_err(|err| {
			Error::ConfigError(format!("corrupt {domain} settings row at {tier} tier: {err}"))
		}),
		None => Ok(None),
	}
}

fn decode_or_default<T: serde::de::DeserializeOwned + Default>(
	row: Option<serde_json::Value>,
	domain: SettingsDomain,
	tier: &str,
) -> TsResult<T> {
	Ok(decode(row, domain, tier)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::settings::resolve::SettingSource;
	use tessello_directory_adapter_mem::MemDirectoryAdapter;

	async fn setup() -> (Arc<dyn DirectoryAdapter>, SettingsService, OrgId) {
		let directory: Arc<dyn DirectoryAdapter> = Arc::new(MemDirectoryAdapter::new());
		let service = SettingsService::new(directory.clone(), 64);
		let org = directory.create_org("acme").await.expect("create org");
		(directory, service, org.org_id)
	}

	#[tokio::test]
	async fn test_effective_llm_defaults_when_nothing_stored() {
		let (_, service, org_id) = setup().await;
		let effective =
			service.effective_llm(org_id, None, None, None).await.expect("effective");

		assert_eq!(effective.temperature, 0.7);
		assert_eq!(effective.model.as_ref(), "auto");
		assert_eq!(effective.settings_source, SettingSource::Org);
	}

	#[tokio::test]
	async fn test_update_invalidates_cached_chain() {
		let (_, service, org_id) = setup().await;

		// Prime the cache.
		let before = service.effective_llm(org_id, None, None, None).await.expect("effective");
		assert_eq!(before.temperature, 0.7);

		service
			.update_tier(SettingsScope::Org(org_id), |s: &mut llm::OrgLlmSettings| {
				s.temperature = 0.3;
			})
			.await
			.expect("update");

		let after = service.effective_llm(org_id, None, None, None).await.expect("effective");
		assert_eq!(after.temperature, 0.3);
	}

	#[tokio::test]
	async fn test_clear_tier_reverts_to_inherit() {
		let (directory, service, org_id) = setup().await;
		let user_id = UserId::new();
		directory
			.create_member(org_id, user_id, tessello_types::prelude::OrgRole::Owner)
			.await
			.expect("member");

		let scope = SettingsScope::User(org_id, user_id);
		service
			.update_tier(scope, |s: &mut llm::UserLlmSettings| s.temperature = Some(0.9))
			.await
			.expect("update");
		let effective =
			service.effective_llm(org_id, None, Some(user_id), None).await.expect("effective");
		assert_eq!(effective.temperature, 0.9);

		service.clear_tier(scope, SettingsDomain::Llm).await.expect("clear");
		let reverted =
			service.effective_llm(org_id, None, Some(user_id), None).await.expect("effective");
		assert_eq!(reverted.temperature, 0.7);
		assert_eq!(reverted.settings_source, SettingSource::Org);
	}

	#[tokio::test]
	async fn test_corrupt_org_row_is_a_config_error() {
		let (directory, service, org_id) = setup().await;
		directory
			.update_settings(
				SettingsScope::Org(org_id),
				SettingsDomain::Llm,
				Some(serde_json::json!({ "temperature": "hot" })),
			)
			.await
			.expect("store");

		let err = service.effective_llm(org_id, None, None, None).await.unwrap_err();
		assert!(matches!(err, Error::ConfigError(_)));

		let err = service.validate_org(org_id).await.unwrap_err();
		assert!(matches!(err, Error::ConfigError(_)));
	}

	#[tokio::test]
	async fn test_validate_org_passes_on_fresh_org() {
		let (_, service, org_id) = setup().await;
		service.validate_org(org_id).await.expect("validate");
	}

	#[tokio::test]
	async fn test_tier_scope_mismatch_is_internal() {
		let (_, service, org_id) = setup().await;
		let err = service
			.read_tier::<llm::UserLlmSettings>(SettingsScope::Org(org_id))
			.await
			.unwrap_err();
		assert!(matches!(err, Error::Internal(_)));
	}
}

// vim: ts=4
