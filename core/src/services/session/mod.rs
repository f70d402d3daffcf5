//! Session registry

mod service;

#[cfg(test)]
mod tests;

pub use service::{SessionRegistry, SESSION_PREFIX};
