use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user-lifecycle audit record as returned by `/audit/user-events`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserEvent {
    pub id: i64,
    pub event_type: UserEventType,
    #[serde(with = "super::timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub target_user_id: Option<i64>,
    #[serde(default)]
    pub actor_user_id: Option<i64>,
    #[serde(default)]
    pub old_value: Option<String>,
    #[serde(default)]
    pub new_value: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub target_user_name: Option<String>,
    #[serde(default)]
    pub actor_user_name: Option<String>,
}

/// Kinds of user event. Types this client does not know yet are kept
/// verbatim in `Other` so one new server type cannot fail a whole page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserEventType {
    UserCreated,
    UserDeactivated,
    UserReactivated,
    RoleChanged,
    PasswordChanged,
    RequestCreated,
    RequestApproved,
    RequestDenied,
    Other(String),
}

impl UserEventType {
    /// The known types, in filter-menu order.
    pub const ALL: [UserEventType; 8] = [
        UserEventType::UserCreated,
        UserEventType::UserDeactivated,
        UserEventType::UserReactivated,
        UserEventType::RoleChanged,
        UserEventType::PasswordChanged,
        UserEventType::RequestCreated,
        UserEventType::RequestApproved,
        UserEventType::RequestDenied,
    ];

    /// Wire name, also used for the `event_type` query parameter.
    pub fn as_str(&self) -> &str {
        match self {
            UserEventType::UserCreated => "USER_CREATED",
            UserEventType::UserDeactivated => "USER_DEACTIVATED",
            UserEventType::UserReactivated => "USER_REACTIVATED",
            UserEventType::RoleChanged => "ROLE_CHANGED",
            UserEventType::PasswordChanged => "PASSWORD_CHANGED",
            UserEventType::RequestCreated => "REQUEST_CREATED",
            UserEventType::RequestApproved => "REQUEST_APPROVED",
            UserEventType::RequestDenied => "REQUEST_DENIED",
            UserEventType::Other(s) => s,
        }
    }

    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl fmt::Display for UserEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for UserEventType {
    fn from(s: String) -> Self {
        match Self::ALL.into_iter().find(|t| t.as_str() == s) {
            Some(known) => known,
            None => UserEventType::Other(s),
        }
    }
}

impl From<UserEventType> for String {
    fn from(t: UserEventType) -> Self {
        match t {
            UserEventType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

/// Parses filter input. Only known types are accepted.
impl FromStr for UserEventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(' ', "_").to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| format!("Unknown user event type: {s}"))
    }
}
