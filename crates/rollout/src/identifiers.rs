//! Newtype domain identifiers.
//!
//! Every name that crosses the host boundary is represented as a distinct
//! newtype wrapping a primitive. This prevents accidentally interchanging, for
//! example, a [`RepositoryName`] with a [`BranchName`] even though both are
//! `String` under the hood.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Declares a name newtype that is never blank and carries no surrounding
/// whitespace.
macro_rules! name_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Trims `value`, returning `None` if nothing is left.
            pub fn new(value: impl AsRef<str>) -> Option<Self> {
                match value.as_ref().trim() {
                    "" => None,
                    trimmed => Some(Self(trimmed.to_owned())),
                }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers - service-integer-backed
// ---------------------------------------------------------------------------

/// Identifies a pull request created by the rollout.
///
/// Wraps the `pullRequestId` assigned by the hosting service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PullRequestId(u64);

impl PullRequestId {
    /// Creates a new identifier from a raw integer.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying integer value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PullRequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identifiers - UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies a single rollout execution (one invocation of the binary).
///
/// Generated fresh for every run; attached to the root tracing span so all
/// activity from a single run can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    /// Generates a new random run identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a [`RunId`] from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the underlying [`Uuid`].
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identifiers - String-backed (service / Git names)
// ---------------------------------------------------------------------------

name_type! {
    /// The name of a Git repository, unique within one project.
    RepositoryName
}

name_type! {
    /// A short Git branch name (e.g. `"dev"`, `"feature/add-pr-template"`).
    ///
    /// The hosting service addresses branches by their fully qualified ref
    /// name; use [`BranchName::ref_name`] when building requests.
    BranchName
}

name_type! {
    /// A Git commit object id as returned by the hosting service.
    CommitSha
}

impl BranchName {
    /// Returns the fully qualified ref name, `refs/heads/<branch>`.
    pub fn ref_name(&self) -> String {
        format!("refs/heads/{}", self.0)
    }

    /// Returns the ref filter used to query this branch, `heads/<branch>`.
    ///
    /// The service matches refs by prefix, so the filter may return more
    /// than one ref.
    pub fn ref_filter(&self) -> String {
        format!("heads/{}", self.0)
    }
}

/// Object id that, used as the *old* object id of a ref update, tells the
/// service the ref does not exist yet and must be created.
pub const NULL_OBJECT_ID: &str = "0000000000000000000000000000000000000000";
