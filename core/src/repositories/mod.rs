pub mod store;
pub mod user;

pub use store::KeyValueStore;
pub use user::UserRepository;

#[cfg(test)]
pub use store::MockKeyValueStore;
#[cfg(test)]
pub use user::MockUserRepository;
