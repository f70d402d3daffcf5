//! User entity representing a registered member of the platform.

use serde::{Deserialize, Serialize};

/// Role assigned to a platform user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Platform administrator
    Admin,
    /// Course professor
    Professor,
    /// Teaching assistant
    Ta,
    /// Enrolled student
    Student,
}

impl UserRole {
    /// Canonical role name as stored in tokens ("ADMIN", "PROFESSOR", "TA", "STUDENT")
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Professor => "PROFESSOR",
            UserRole::Ta => "TA",
            UserRole::Student => "STUDENT",
        }
    }

    /// Fine-grained permissions granted by this role
    pub fn permissions(&self) -> &'static [&'static str] {
        match self {
            UserRole::Admin => &[
                "user:create",
                "user:read",
                "user:update",
                "user:delete",
                "team:create",
                "team:read",
                "team:update",
                "team:delete",
                "course:create",
                "course:read",
                "course:update",
                "course:delete",
                "notification:send",
                "grade:assign",
                "grade:view",
                "system:configure",
            ],
            UserRole::Professor => &[
                "user:read",
                "team:read",
                "team:update",
                "course:create",
                "course:read",
                "course:update",
                "notification:send",
                "grade:assign",
                "grade:view",
            ],
            UserRole::Ta => &[
                "user:read",
                "team:read",
                "course:read",
                "notification:send",
                "grade:view",
            ],
            UserRole::Student => &["team:read", "course:read", "project:submit", "grade:view"],
        }
    }

    /// Authorities embedded in access tokens: the role authority followed by its permissions
    pub fn authorities(&self) -> Vec<String> {
        std::iter::once(format!("ROLE_{}", self.as_str()))
            .chain(self.permissions().iter().map(|p| p.to_string()))
            .collect()
    }

    /// Whether this role may send notifications
    pub fn can_send_notifications(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Professor | UserRole::Ta)
    }

    /// Whether this role may manage teams
    pub fn can_manage_team(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Professor)
    }

    /// Whether this role may manage courses
    pub fn can_manage_course(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Professor)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ADMIN" => Ok(UserRole::Admin),
            "PROFESSOR" => Ok(UserRole::Professor),
            "TA" => Ok(UserRole::Ta),
            "STUDENT" => Ok(UserRole::Student),
            other => Err(format!("Invalid role: {}", other)),
        }
    }
}

/// User entity as returned by the identity store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: i64,

    /// Institutional email, also the token subject
    pub email: String,

    /// bcrypt hash of the user's password
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Role of the user
    pub role: UserRole,

    pub first_name: Option<String>,

    pub last_name: Option<String>,

    /// Team the user belongs to, if any
    pub team_id: Option<i64>,

    /// Course the user is enrolled in or teaches, if any
    pub course_id: Option<i64>,

    /// Whether the account is enabled
    pub enabled: bool,

    /// Whether the account is not locked
    pub account_non_locked: bool,
}

impl User {
    /// Creates an enabled, unlocked user without names or team/course assignment
    pub fn new(id: i64, email: impl Into<String>, password_hash: impl Into<String>, role: UserRole) -> Self {
        Self {
            id,
            email: email.into(),
            password_hash: password_hash.into(),
            role,
            first_name: None,
            last_name: None,
            team_id: None,
            course_id: None,
            enabled: true,
            account_non_locked: true,
        }
    }

    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self.last_name = Some(last_name.into());
        self
    }

    pub fn with_team(mut self, team_id: i64) -> Self {
        self.team_id = Some(team_id);
        self
    }

    pub fn with_course(mut self, course_id: i64) -> Self {
        self.course_id = Some(course_id);
        self
    }

    /// "First Last" when both names are present
    pub fn full_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            _ => None,
        }
    }

    /// Whether the account may authenticate
    pub fn is_active(&self) -> bool {
        self.enabled && self.account_non_locked
    }
}
