//! Permission view of an authenticated identity.

use serde::{Deserialize, Serialize};

use crate::domain::entities::token::Claims;
use crate::domain::entities::user::UserRole;

/// Permissions of an authenticated user, derived from verified access claims
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserPermissions {
    pub user_id: i64,
    pub role: UserRole,
    pub permissions: Vec<String>,
    pub team_id: Option<i64>,
    pub course_id: Option<i64>,
    pub can_send_notifications: bool,
    pub can_manage_team: bool,
    pub can_manage_course: bool,
}

impl UserPermissions {
    /// Creates a permission view; capability flags follow the role
    pub fn new(user_id: i64, role: UserRole, permissions: Vec<String>) -> Self {
        Self {
            user_id,
            role,
            permissions,
            team_id: None,
            course_id: None,
            can_send_notifications: role.can_send_notifications(),
            can_manage_team: role.can_manage_team(),
            can_manage_course: role.can_manage_course(),
        }
    }

    /// Builds the view from access token claims
    ///
    /// Returns `None` when the claims carry no known role (refresh tokens).
    pub fn from_claims(claims: &Claims) -> Option<Self> {
        let role = claims.user_role()?;
        let mut permissions = Self::new(claims.user_id, role, claims.permissions());
        permissions.team_id = claims.team_id;
        permissions.course_id = claims.course_id;
        Some(permissions)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}
