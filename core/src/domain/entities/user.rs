//! User record as seen by the credential layer.
//!
//! The account store owns users; this crate only carries an immutable
//! snapshot (`id` + `email`) inside each credential record.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Length of the canonical owner id text embedded in every token
pub const OWNER_ID_LEN: usize = 32;

/// Unique user identifier
///
/// The canonical text form is fixed width: 32 lowercase hex digits with no
/// dashes. Parsing accepts any UUID spelling (dashed, upper-case, braced),
/// so differently formatted copies of the same id compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Mint a fresh random id
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The zero id; never a valid token owner
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    /// Wrap an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse any UUID spelling into a normalised id
    pub fn parse(value: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(value.trim()).map(Self)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Canonical fixed-width text (`OWNER_ID_LEN` bytes)
    pub fn to_fixed_string(&self) -> String {
        self.0.simple().to_string()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for UserId {
    type Error = uuid::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.to_fixed_string()
    }
}

impl From<Uuid> for UserId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// User snapshot carried by credential records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: UserId,

    /// Normalised email address
    pub email: String,
}

impl User {
    /// Creates a user with a fresh id
    pub fn new(email: impl AsRef<str>) -> Self {
        Self::with_id(UserId::generate(), email)
    }

    /// Creates a user snapshot for an existing id
    pub fn with_id(id: UserId, email: impl AsRef<str>) -> Self {
        Self {
            id,
            email: normalize_email(email.as_ref()),
        }
    }

    /// Whether both records refer to the same account
    pub fn same_user(&self, other: &User) -> bool {
        self.id == other.id
    }

    /// A zero-value user (nil id) is never a legitimate token owner
    pub fn is_zero(&self) -> bool {
        self.id.is_nil()
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "User[{}, email:{}]", self.id, self.email)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
