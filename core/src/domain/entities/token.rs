//! Token claims carried by access and refresh JWTs.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::{User, UserRole};
use crate::errors::TokenError;

/// Kind of identity token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived token presented on every request
    #[default]
    Access,
    /// Long-lived token exchanged for a new token pair
    Refresh,
}

/// Claims structure for JWT payload
///
/// Access tokens carry the full identity (email, role, team/course, authorities).
/// Refresh tokens carry only the subject, the user id and `type = "refresh"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user email)
    pub sub: String,

    /// Numeric user identifier
    #[serde(rename = "userId")]
    pub user_id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Role name ("ADMIN", "PROFESSOR", "TA", "STUDENT")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(rename = "teamId", default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<i64>,

    #[serde(rename = "courseId", default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<i64>,

    /// Full name, present when both names are known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Comma-separated authorities (role authority followed by permissions)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorities: Option<String>,

    /// Token kind; tokens without the claim are treated as access tokens
    #[serde(rename = "type", default)]
    pub kind: TokenKind,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// JWT ID (unique identifier for the token)
    pub jti: String,
}

impl Claims {
    /// Creates access token claims for a resolved identity
    ///
    /// # Arguments
    ///
    /// * `user` - The identity the token is issued for
    /// * `issued_at` - Issuance instant
    /// * `ttl_seconds` - Lifetime of the token
    ///
    /// Fails with [`TokenError::GenerationFailed`] when the expiry is not representable.
    pub fn new_access_token(
        user: &User,
        issued_at: DateTime<Utc>,
        ttl_seconds: i64,
    ) -> Result<Self, TokenError> {
        let expiry = expiry_after(issued_at, ttl_seconds)?;

        Ok(Self {
            sub: user.email.clone(),
            user_id: user.id,
            email: Some(user.email.clone()),
            role: Some(user.role.as_str().to_string()),
            team_id: user.team_id,
            course_id: user.course_id,
            name: user.full_name(),
            authorities: Some(user.role.authorities().join(",")),
            kind: TokenKind::Access,
            iat: issued_at.timestamp(),
            exp: expiry.timestamp(),
            jti: Uuid::new_v4().to_string(),
        })
    }

    /// Creates refresh token claims; no role or authorities are embedded
    pub fn new_refresh_token(
        user: &User,
        issued_at: DateTime<Utc>,
        ttl_seconds: i64,
    ) -> Result<Self, TokenError> {
        let expiry = expiry_after(issued_at, ttl_seconds)?;

        Ok(Self {
            sub: user.email.clone(),
            user_id: user.id,
            email: None,
            role: None,
            team_id: None,
            course_id: None,
            name: None,
            authorities: None,
            kind: TokenKind::Refresh,
            iat: issued_at.timestamp(),
            exp: expiry.timestamp(),
            jti: Uuid::new_v4().to_string(),
        })
    }

    /// Whether these claims belong to a refresh token
    pub fn is_refresh(&self) -> bool {
        self.kind == TokenKind::Refresh
    }

    /// Expiration as a UTC instant
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Issuance as a UTC instant
    pub fn issued_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.iat, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Parsed role, if the claim is present and known
    pub fn user_role(&self) -> Option<UserRole> {
        self.role.as_deref().and_then(|r| r.parse().ok())
    }

    /// Permissions from the authorities claim, without the `ROLE_` authority
    pub fn permissions(&self) -> Vec<String> {
        self.authorities
            .as_deref()
            .map(|a| {
                a.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty() && !p.starts_with("ROLE_"))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn expiry_after(issued_at: DateTime<Utc>, ttl_seconds: i64) -> Result<DateTime<Utc>, TokenError> {
    Duration::try_seconds(ttl_seconds)
        .and_then(|ttl| issued_at.checked_add_signed(ttl))
        .ok_or(TokenError::GenerationFailed)
}
