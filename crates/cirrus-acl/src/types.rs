//! The access-control-policy object model.
//!
//! An [`Acp`] pairs an owner [`Grantee`] with an ordered sequence of
//! [`Grant`]s. These are plain immutable value objects; constructing them is
//! the job of [`AcpBuilder`](crate::AcpBuilder), and serializing them to the
//! provider's wire format is the job of the request layer, not this crate.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Permission — the closed set of grantable permissions
// ---------------------------------------------------------------------------

/// Permissions grantable on a storage resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    FullControl,
    Read,
    Write,
    ReadAcp,
    WriteAcp,
}

impl Permission {
    /// The provider wire value for this permission.
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::FullControl => "FULL_CONTROL",
            Permission::Read => "READ",
            Permission::Write => "WRITE",
            Permission::ReadAcp => "READ_ACP",
            Permission::WriteAcp => "WRITE_ACP",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Group — predefined grantee groups
// ---------------------------------------------------------------------------

/// Predefined groups a permission can be granted to, identified on the wire
/// by a fixed URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Group {
    /// Anyone, authenticated or not.
    AllUsers,
    /// Any account holder.
    AuthenticatedUsers,
    /// The access-log delivery group.
    LogDelivery,
}

impl Group {
    pub fn uri(self) -> &'static str {
        match self {
            Group::AllUsers => "http://acs.amazonaws.com/groups/global/AllUsers",
            Group::AuthenticatedUsers => {
                "http://acs.amazonaws.com/groups/global/AuthenticatedUsers"
            }
            Group::LogDelivery => "http://acs.amazonaws.com/groups/s3/LogDelivery",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uri())
    }
}

// ---------------------------------------------------------------------------
// Grantee — the principal receiving a grant
// ---------------------------------------------------------------------------

/// The principal a permission is granted to.
///
/// Exactly one identifying value per variant: a canonical account ID, an
/// email address, or a predefined group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grantee {
    CanonicalUser {
        id: String,
        display_name: Option<String>,
    },
    EmailAddress(String),
    Group(Group),
}

impl Grantee {
    pub fn canonical_user(id: impl Into<String>) -> Self {
        Grantee::CanonicalUser {
            id: id.into(),
            display_name: None,
        }
    }

    pub fn email(address: impl Into<String>) -> Self {
        Grantee::EmailAddress(address.into())
    }

    pub fn group(group: Group) -> Self {
        Grantee::Group(group)
    }

    pub fn is_canonical_user(&self) -> bool {
        matches!(self, Grantee::CanonicalUser { .. })
    }

    pub fn is_amazon_customer_by_email(&self) -> bool {
        matches!(self, Grantee::EmailAddress(_))
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Grantee::Group(_))
    }

    /// The wire `xsi:type` discriminator for this grantee.
    pub fn type_str(&self) -> &'static str {
        match self {
            Grantee::CanonicalUser { .. } => "CanonicalUser",
            Grantee::EmailAddress(_) => "AmazonCustomerByEmail",
            Grantee::Group(_) => "Group",
        }
    }

    /// The identifying value: canonical ID, email address, or group URI.
    pub fn identifier(&self) -> &str {
        match self {
            Grantee::CanonicalUser { id, .. } => id,
            Grantee::EmailAddress(address) => address,
            Grantee::Group(group) => group.uri(),
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        match self {
            Grantee::CanonicalUser { display_name, .. } => display_name.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for Grantee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.type_str(), self.identifier())
    }
}

// ---------------------------------------------------------------------------
// Grant — one permission paired with one grantee
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    permission: Permission,
    grantee: Grantee,
}

impl Grant {
    pub fn new(permission: Permission, grantee: Grantee) -> Self {
        Self {
            permission,
            grantee,
        }
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }

    pub fn grantee(&self) -> &Grantee {
        &self.grantee
    }
}

// ---------------------------------------------------------------------------
// Acp — the built access control policy
// ---------------------------------------------------------------------------

/// An immutable access-control policy: one owner plus an ordered sequence of
/// grants, in the order they were added to the builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acp {
    owner: Grantee,
    grants: Vec<Grant>,
}

impl Acp {
    pub(crate) fn new(owner: Grantee, grants: Vec<Grant>) -> Self {
        Self { owner, grants }
    }

    pub fn owner(&self) -> &Grantee {
        &self.owner
    }

    pub fn grants(&self) -> &[Grant] {
        &self.grants
    }
}
