#[path = "trait.rs"]
mod trait_;
#[cfg(test)]
pub mod mock;

pub use trait_::KeyValueStore;
#[cfg(test)]
pub use mock::MockKeyValueStore;
