mod repository;
mod service;

pub use repository::*;
pub use service::*;

use serde::{Deserialize, Serialize};

/// Role of a [`User`].
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "user_role")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    #[sqlx(rename = "MEMBER")]
    Member,
    #[sqlx(rename = "ADMIN")]
    Admin,
}

/// Lifecycle state of a [`User`] account.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "user_status")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserStatus {
    #[default]
    #[sqlx(rename = "PENDING")]
    Pending,
    #[sqlx(rename = "APPROVED")]
    Approved,
    #[sqlx(rename = "REJECTED")]
    Rejected,
    #[sqlx(rename = "SUSPENDED")]
    Suspended,
}

/// User as saved on database.
#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub role: Role,
    pub status: UserStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Admin decision applied to a pending account.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdminAction {
    Approve,
    Reject,
    Suspend,
}

impl AdminAction {
    /// Parse the action segment of `/api/admin/users/{id}/{action}`.
    pub fn parse(segment: &str) -> Option<Self> {
        match segment {
            "approve" => Some(Self::Approve),
            "reject" => Some(Self::Reject),
            "suspend" => Some(Self::Suspend),
            _ => None,
        }
    }

    /// Status the target account ends up in.
    ///
    /// Transitions are unconditional: re-approving a rejected or suspended
    /// account is allowed.
    pub fn target_status(self) -> UserStatus {
        match self {
            Self::Approve => UserStatus::Approved,
            Self::Reject => UserStatus::Rejected,
            Self::Suspend => UserStatus::Suspended,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parsing() {
        assert_eq!(AdminAction::parse("approve"), Some(AdminAction::Approve));
        assert_eq!(AdminAction::parse("reject"), Some(AdminAction::Reject));
        assert_eq!(AdminAction::parse("suspend"), Some(AdminAction::Suspend));
        assert_eq!(AdminAction::parse("promote"), None);
        assert_eq!(AdminAction::parse("APPROVE"), None);
    }

    #[test]
    fn test_action_targets() {
        assert_eq!(
            AdminAction::Approve.target_status(),
            UserStatus::Approved
        );
        assert_eq!(AdminAction::Reject.target_status(), UserStatus::Rejected);
        assert_eq!(
            AdminAction::Suspend.target_status(),
            UserStatus::Suspended
        );
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""ADMIN""#);
        assert_eq!(
            serde_json::to_string(&UserStatus::Pending).unwrap(),
            r#""PENDING""#
        );
    }
}
