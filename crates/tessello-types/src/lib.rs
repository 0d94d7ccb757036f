//! # Tessello shared types
//!
//! Types shared between the Tessello core crates and the storage adapters:
//! identifier newtypes, the error taxonomy, and the adapter traits an
//! implementation plugs in ([`directory_adapter::DirectoryAdapter`] for the
//! tenant graph and settings rows, [`vault_adapter::VaultAdapter`] for
//! provider secrets).
//!
//! Adapter crates depend on this crate alone, so a storage backend can be
//! built without pulling in the resolution and access-control machinery.

pub mod directory_adapter;
pub mod error;
pub mod prelude;
pub mod types;
pub mod vault_adapter;

pub use error::{Error, TsResult};

// vim: ts=4
