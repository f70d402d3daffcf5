//! Token revocation store

mod service;


pub use service::{RevocationService, BLACKLIST_PREFIX};
