//! Static role to permission tables
//!
//! One match table per namespace, fixed at compile time. The grant sets are
//! strict supersets down the role ladder (OWNER over ADMIN over MEMBER, team
//! ADMIN over MEMBER over VIEWER) with one carve-out: the owner-only actions
//! (organization deletion, ownership transfer, billing) never appear in the
//! ADMIN set. The subset relations are asserted in tests rather than encoded
//! structurally.

use tessello_types::prelude::{OrgRole, TeamRole};

use super::{OrgPermission, TeamPermission};

// Org namespace //
//***************//

/// Whether the organization role grants the permission.
#[must_use]
pub fn has_org_permission(role: OrgRole, perm: OrgPermission) -> bool {
	match role {
		OrgRole::Owner => true,
		OrgRole::Admin => !matches!(
			perm,
			OrgPermission::OrgDelete
				| OrgPermission::OrgTransfer
				| OrgPermission::BillingRead
				| OrgPermission::BillingUpdate
		),
		OrgRole::Member => matches!(
			perm,
			OrgPermission::OrgRead
				| OrgPermission::MembersRead
				| OrgPermission::TeamsRead
				| OrgPermission::SettingsRead
				| OrgPermission::ProvidersRead
				| OrgPermission::UsageRead
		),
	}
}

/// The full grant set of an organization role, in token-table order.
#[must_use]
pub fn org_role_permissions(role: OrgRole) -> Vec<OrgPermission> {
	OrgPermission::ALL.iter().copied().filter(|perm| has_org_permission(role, *perm)).collect()
}

// Team namespace //
//****************//

/// Whether the team role grants the permission. This is the table lookup
/// only; the org-inheritance fallback lives in the context check in
/// [`crate::access`].
#[must_use]
pub fn has_team_permission(role: TeamRole, perm: TeamPermission) -> bool {
	match role {
		TeamRole::Admin => true,
		TeamRole::Member => matches!(
			perm,
			TeamPermission::TeamRead
				| TeamPermission::MembersRead
				| TeamPermission::SettingsRead
				| TeamPermission::PromptsRead
				| TeamPermission::PromptsManage
				| TeamPermission::SourcesRead
				| TeamPermission::SourcesManage
				| TeamPermission::ChatsRead
				| TeamPermission::ChatsManage
				| TeamPermission::UsageRead
		),
		TeamRole::Viewer => matches!(
			perm,
			TeamPermission::TeamRead
				| TeamPermission::MembersRead
				| TeamPermission::SettingsRead
				| TeamPermission::PromptsRead
				| TeamPermission::SourcesRead
				| TeamPermission::ChatsRead
		),
	}
}

/// The full grant set of a team role, in token-table order.
#[must_use]
pub fn team_role_permissions(role: TeamRole) -> Vec<TeamPermission> {
	TeamPermission::ALL.iter().copied().filter(|perm| has_team_permission(role, *perm)).collect()
}

/// The org-namespace permission a team action falls back to when the caller
/// has no sufficient team role. Team structure changes map to their org
/// counterparts; everything else maps to the blanket `teams:admin` grant, so
/// an org ADMIN or OWNER can manage any team without holding a team role.
#[must_use]
pub fn implied_org_permission(perm: TeamPermission) -> OrgPermission {
	match perm {
		TeamPermission::TeamUpdate => OrgPermission::TeamsUpdate,
		TeamPermission::TeamDelete => OrgPermission::TeamsDelete,
		TeamPermission::TeamRead
		| TeamPermission::MembersRead
		| TeamPermission::MembersAdd
		| TeamPermission::MembersUpdate
		| TeamPermission::MembersRemove
		| TeamPermission::SettingsRead
		| TeamPermission::SettingsUpdate
		| TeamPermission::GuardrailsUpdate
		| TeamPermission::PromptsRead
		| TeamPermission::PromptsManage
		| TeamPermission::SourcesRead
		| TeamPermission::SourcesManage
		| TeamPermission::ChatsRead
		| TeamPermission::ChatsManage
		| TeamPermission::UsageRead => OrgPermission::TeamsAdmin,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashSet;

	fn org_set(role: OrgRole) -> HashSet<OrgPermission> {
		org_role_permissions(role).into_iter().collect()
	}

	fn team_set(role: TeamRole) -> HashSet<TeamPermission> {
		team_role_permissions(role).into_iter().collect()
	}

	#[test]
	fn test_org_superset_chain() {
		let owner = org_set(OrgRole::Owner);
		let admin = org_set(OrgRole::Admin);
		let member = org_set(OrgRole::Member);

		assert!(admin.is_subset(&owner));
		assert!(member.is_subset(&admin));
		assert!(owner.len() > admin.len());
		assert!(admin.len() > member.len());
	}

	#[test]
	fn test_org_set_sizes() {
		assert_eq!(org_set(OrgRole::Owner).len(), 22);
		assert_eq!(org_set(OrgRole::Admin).len(), 18);
		assert_eq!(org_set(OrgRole::Member).len(), 6);
	}

	#[test]
	fn test_owner_only_exclusions() {
		// The documented owner-only list, and nothing else.
		let owner = org_set(OrgRole::Owner);
		let admin = org_set(OrgRole::Admin);
		let owner_only: HashSet<OrgPermission> = owner.difference(&admin).copied().collect();
		let expected: HashSet<OrgPermission> = [
			OrgPermission::OrgDelete,
			OrgPermission::OrgTransfer,
			OrgPermission::BillingRead,
			OrgPermission::BillingUpdate,
		]
		.into_iter()
		.collect();
		assert_eq!(owner_only, expected);
	}

	#[test]
	fn test_team_superset_chain() {
		let admin = team_set(TeamRole::Admin);
		let member = team_set(TeamRole::Member);
		let viewer = team_set(TeamRole::Viewer);

		assert!(member.is_subset(&admin));
		assert!(viewer.is_subset(&member));
		assert_eq!(admin.len(), 17);
		assert_eq!(member.len(), 10);
		assert_eq!(viewer.len(), 6);
	}

	#[test]
	fn test_member_lacks_admin_actions() {
		assert!(!has_org_permission(OrgRole::Member, OrgPermission::TeamsAdmin));
		assert!(!has_org_permission(OrgRole::Member, OrgPermission::SettingsUpdate));
		assert!(!has_org_permission(OrgRole::Admin, OrgPermission::OrgDelete));
		assert!(!has_team_permission(TeamRole::Viewer, TeamPermission::ChatsManage));
		assert!(!has_team_permission(TeamRole::Member, TeamPermission::SettingsUpdate));
	}

	#[test]
	fn test_implied_org_permission_mapping() {
		assert_eq!(
			implied_org_permission(TeamPermission::TeamUpdate),
			OrgPermission::TeamsUpdate
		);
		assert_eq!(
			implied_org_permission(TeamPermission::TeamDelete),
			OrgPermission::TeamsDelete
		);
		assert_eq!(implied_org_permission(TeamPermission::TeamRead), OrgPermission::TeamsAdmin);
		assert_eq!(
			implied_org_permission(TeamPermission::SettingsUpdate),
			OrgPermission::TeamsAdmin
		);
	}

	#[test]
	fn test_sets_are_order_independent() {
		// Two computations of the same role's set are the same set.
		assert_eq!(org_set(OrgRole::Admin), org_set(OrgRole::Admin));
		assert_eq!(team_set(TeamRole::Member), team_set(TeamRole::Member));
	}
}

// vim: ts=4
