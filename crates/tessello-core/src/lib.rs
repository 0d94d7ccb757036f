//! Core services of the Tessello platform.
//!
//! This crate holds everything between the storage adapters and an HTTP
//! surface: the role and permission model, tenancy-scoped access control,
//! the settings tiers with their resolution pipeline, and the app state
//! that ties the adapters together. It is embedded by a host server, which
//! authenticates callers and mounts the middleware from [`middleware`].

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod access;
pub mod app;
pub mod bootstrap;
pub mod extract;
pub mod middleware;
pub mod perm;
pub mod prelude;
pub mod settings;

// Re-export commonly used types
pub use app::{App, AppBuilder, AppBuilderOpts, AppState};
pub use extract::{Auth, OrgScope, TeamScope};
pub use middleware::{
	PermissionCheckOutput, check_perm_org, check_perm_team, org_scope, team_scope,
};
pub use perm::{OrgPermission, TeamPermission};
pub use settings::{SettingSource, SettingsService};

// vim: ts=4
