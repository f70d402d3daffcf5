//! Authentication response value objects returned by login and refresh.

use serde::{Deserialize, Serialize};

use crate::domain::entities::user::{User, UserRole};

/// Identity summary returned alongside issued tokens
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: i64,
    pub email: String,
    pub role: UserRole,
    pub team_id: Option<i64>,
    pub course_id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
            team_id: user.team_id,
            course_id: user.course_id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            full_name: user.full_name(),
        }
    }
}

/// Authentication response containing the token pair and the identity summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// JWT access token for API authentication
    pub token: String,

    /// JWT refresh token for obtaining a new pair
    pub refresh_token: String,

    pub user_info: UserInfo,
}

impl AuthResponse {
    /// Creates a new authentication response
    pub fn new(token: String, refresh_token: String, user_info: UserInfo) -> Self {
        Self {
            token,
            refresh_token,
            user_info,
        }
    }
}
