#[path = "trait.rs"]
mod trait_;
#[cfg(test)]
pub mod mock;

pub use trait_::UserRepository;
#[cfg(test)]
pub use mock::MockUserRepository;
