//! Caller identity as established by the surrounding authentication layer.
//!
//! Authentication itself happens outside this crate; the core only reads
//! the resulting identity for logging.

use serde::{Deserialize, Serialize};

/// The authenticated identity of a caller.
///
/// # Example
///
/// ```
/// use edge_core::CallerIdentity;
///
/// let identity = CallerIdentity::user("broker-1");
/// assert_eq!(identity.user_id(), Some("broker-1"));
/// assert_eq!(CallerIdentity::Anonymous.log_id(), "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CallerIdentity {
    /// An authenticated user.
    User {
        /// The authenticated user id.
        user_id: String,
        /// Roles granted to the user.
        #[serde(default)]
        roles: Vec<String>,
    },
    /// No credentials were presented.
    #[default]
    Anonymous,
}

impl CallerIdentity {
    /// Creates a user identity without roles.
    #[must_use]
    pub fn user(user_id: impl Into<String>) -> Self {
        Self::User {
            user_id: user_id.into(),
            roles: Vec::new(),
        }
    }

    /// Returns the authenticated user id, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::User { user_id, .. } => Some(user_id),
            Self::Anonymous => None,
        }
    }

    /// Returns the value logged as the request user: the user id, or an
    /// empty string for anonymous callers.
    #[must_use]
    pub fn log_id(&self) -> String {
        self.user_id().unwrap_or_default().to_string()
    }

    /// Returns the caller's roles.
    #[must_use]
    pub fn roles(&self) -> &[String] {
        match self {
            Self::User { roles, .. } => roles,
            Self::Anonymous => &[],
        }
    }
}
