//! Tessello is a multi-tenant platform core for AI workspaces.
//!
//! # Features
//!
//! - Tenant directory
//!     - organizations as the hard isolation boundary
//!     - teams and memberships with org and team roles
//! - Access control
//!     - fixed role-to-permission tables, checked at compile time
//!     - org roles reach into teams through permission inheritance
//!     - absent and foreign resources are indistinguishable to outsiders
//! - Tiered settings
//!     - LLM, retrieval, theme, guardrails, and chat domains
//!     - org defaults, gated team and user overrides, per-request overrides
//!     - field-level provenance in every resolved view
//! - Provider secrets behind opaque vault references
//!
//! The crate ships no HTTP server of its own: a host embeds [`App`], mounts
//! the middleware from [`middleware`], and maps its own routes onto the
//! operations in [`access`].

// Re-export shared types and adapter traits from tessello-types
pub use tessello_types::directory_adapter;
pub use tessello_types::error;
pub use tessello_types::types;
pub use tessello_types::vault_adapter;

// Core re-exports
pub use tessello_core::access;
pub use tessello_core::app;
pub use tessello_core::bootstrap;
pub use tessello_core::extract;
pub use tessello_core::middleware;
pub use tessello_core::perm;
pub use tessello_core::prelude;
pub use tessello_core::settings;

pub use tessello_core::{App, AppBuilder, AppBuilderOpts, AppState};
pub use tessello_core::{Auth, OrgScope, TeamScope};

// vim: ts=4
