//! Value objects representing immutable domain concepts.

pub mod auth_response;
pub mod logout_response;
pub mod user_permissions;

pub use auth_response::{AuthResponse, UserInfo};
pub use logout_response::LogoutResponse;
pub use user_permissions::UserPermissions;
