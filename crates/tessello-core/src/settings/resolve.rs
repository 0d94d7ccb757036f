//! Tier precedence pipeline
//!
//! The resolution algorithm shared by every settings domain. Inputs are the
//! already-fetched tier records (org always present, team and user optional)
//! plus the override gates in effect; output is one value per field together
//! with the tier it came from. The pipeline is a pure function: it never
//! mutates its inputs and the same snapshots always resolve to the same
//! result.
//!
//! Gate semantics: a descendant tier's stored value only wins when every
//! ancestor gate on its path is open. A value stored while its gate is
//! closed stays in storage untouched; it becomes effective again the moment
//! the gate reopens.

use serde::{Deserialize, Serialize};

// SettingSource //
//***************//

/// Tier that supplied a resolved value, ordered least to most specific.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingSource {
	Org,
	Team,
	User,
	Request,
}

impl SettingSource {
	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			SettingSource::Org => "org",
			SettingSource::Team => "team",
			SettingSource::User => "user",
			SettingSource::Request => "request",
		}
	}
}

impl std::fmt::Display for SettingSource {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

// OverrideGates //
//***************//

/// The gate pair in effect for one resolution, precomputed from the org
/// record and the team record (when a team tier participates).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OverrideGates {
	/// Team values may win: the org-level team gate.
	pub team: bool,
	/// User values may win: the org-level user gate, further restricted by
	/// the team-level user gate when a team record is present.
	pub user: bool,
}

impl OverrideGates {
	/// Computes the effective gates. `team_allow_user` is the team record's
	/// own user gate, `None` when no team record participates. The team's
	/// user gate applies whenever the record exists, even while the team's
	/// own values are inert under a closed org team gate.
	#[must_use]
	pub fn new(allow_team: bool, allow_user: bool, team_allow_user: Option<bool>) -> Self {
		Self { team: allow_team, user: allow_user && team_allow_user.unwrap_or(true) }
	}
}

// Resolution //
//************//

/// One resolved field with its provenance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Resolved<T> {
	pub value: T,
	pub source: SettingSource,
}

impl<T> Resolved<T> {
	/// Overlays a per-request value. The caller holds the per-request gate;
	/// this only records the replacement and its provenance.
	#[must_use]
	pub fn with_request(self, request: Option<T>) -> Resolved<T> {
		match request {
			Some(value) => Resolved { value, source: SettingSource::Request },
			None => self,
		}
	}
}

/// Resolves one field through the tier pipeline.
///
/// Starts from the org value, then lets the team and user overrides win in
/// turn when their gate is open and the override is stored. List-valued
/// fields pass through whole; there is no per-element merging.
#[must_use]
pub fn resolve_field<T>(gates: OverrideGates, org: T, team: Option<T>, user: Option<T>) -> Resolved<T> {
	let mut resolved = Resolved { value: org, source: SettingSource::Org };
	if gates.team {
		if let Some(value) = team {
			resolved = Resolved { value, source: SettingSource::Team };
		}
	}
	if gates.user {
		if let Some(value) = user {
			resolved = Resolved { value, source: SettingSource::User };
		}
	}
	resolved
}


// vim: ts=4
