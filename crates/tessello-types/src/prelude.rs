//! Convenience re-exports for adapter and core crates.

pub use crate::error::{Error, TsResult};
pub use crate::types::{MemberId, OrgId, Patch, TeamId, TeamMemberId, Timestamp, UserId};

pub use crate::directory_adapter::{
	DirectoryAdapter, OrgMember, OrgRole, Organization, SettingsChain, SettingsDomain,
	SettingsScope, Team, TeamMember, TeamRole,
};
pub use crate::vault_adapter::{SecretScope, VaultAdapter};

// vim: ts=4
