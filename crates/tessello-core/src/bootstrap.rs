//! Bootstrap for new organizations

use tracing::{info, warn};

use tessello_types::directory_adapter::{OrgMember, OrgRole, Organization};
use tessello_types::prelude::{Error, TsResult, UserId};

use crate::app::App;

/// Options for creating a fully set up organization
pub struct CreateOrganizationOptions<'a> {
	pub name: &'a str,
	/// The user who becomes the organization's owner.
	pub owner_user_id: UserId,
}

#[derive(Debug)]
pub struct CreatedOrganization {
	pub org: Organization,
	pub owner: OrgMember,
}

/// Creates an organization together with its initial owner membership and
/// verifies its settings rows decode. Used by registration flows and by test
/// fixtures; an organization without an owner is never observable through
/// this path.
pub async fn create_organization(
	app: &App,
	opts: CreateOrganizationOptions<'_>,
) -> TsResult<CreatedOrganization> {
	let name = opts.name.trim();
	if name.is_empty() {
		return Err(Error::ValidationError("organization name must not be empty".into()));
	}

	let org = app.directory.create_org(name).await?;
	info!(org_id = %org.org_id, name = name, "organization created");

	let owner = app
		.directory
		.create_member(org.org_id, opts.owner_user_id, OrgRole::Owner)
		.await
		.map_err(|err| {
			warn!(
				error = %err,
				org_id = %org.org_id,
				owner = %opts.owner_user_id,
				"failed to create owner membership"
			);
			err
		})?;
	info!(org_id = %org.org_id, member_id = %owner.member_id, "owner membership created");

	app.settings.validate_org(org.org_id).await?;

	Ok(CreatedOrganization { org, owner })
}

// Tests //
//*******//


// vim: ts=4
