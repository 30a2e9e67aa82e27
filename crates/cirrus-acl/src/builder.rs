//! Chained construction of access-control policies.

use crate::error::BuilderError;
use crate::types::{Acp, Grant, Grantee, Group, Permission};

/// Mutable accumulator for an [`Acp`].
///
/// Mutating methods return `&mut Self` for chaining. [`AcpBuilder::build`]
/// snapshots the current state into an independent immutable [`Acp`]; the
/// builder stays usable afterwards, and later mutation never affects
/// policies already built.
///
/// Not synchronized: one builder per logical policy under construction.
#[derive(Debug, Default, Clone)]
pub struct AcpBuilder {
    owner: Option<Grantee>,
    grants: Vec<Grant>,
}

impl AcpBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the policy owner by canonical ID. Last write wins.
    pub fn set_owner(&mut self, id: impl Into<String>) -> &mut Self {
        self.owner = Some(Grantee::canonical_user(id));
        self
    }

    /// Set a display name on the current owner, if one is set.
    pub fn set_owner_display_name(&mut self, name: impl Into<String>) -> &mut Self {
        if let Some(Grantee::CanonicalUser { display_name, .. }) = &mut self.owner {
            *display_name = Some(name.into());
        }
        self
    }

    /// Grant `permission` to the account with the given canonical ID.
    pub fn add_grant_for_user(
        &mut self,
        permission: Permission,
        canonical_id: impl Into<String>,
    ) -> &mut Self {
        self.grants
            .push(Grant::new(permission, Grantee::canonical_user(canonical_id)));
        self
    }

    /// Grant `permission` to the account identified by email address.
    pub fn add_grant_for_email(
        &mut self,
        permission: Permission,
        email: impl Into<String>,
    ) -> &mut Self {
        self.grants
            .push(Grant::new(permission, Grantee::email(email)));
        self
    }

    /// Grant `permission` to a predefined group.
    pub fn add_grant_for_group(&mut self, permission: Permission, group: Group) -> &mut Self {
        self.grants
            .push(Grant::new(permission, Grantee::group(group)));
        self
    }

    /// Snapshot the accumulated state into an immutable [`Acp`].
    ///
    /// Fails with [`BuilderError::MissingOwner`] if no owner was set. Grants
    /// appear in the policy in the order they were added.
    pub fn build(&self) -> Result<Acp, BuilderError> {
        let owner = self.owner.clone().ok_or(BuilderError::MissingOwner)?;
        Ok(Acp::new(owner, self.grants.clone()))
    }
}
