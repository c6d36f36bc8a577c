pub mod cache;
pub mod credential;

pub use cache::{KeyValueCache, MemoryCache};
pub use credential::{CredentialRepository, CredentialStore};

#[cfg(test)]
pub use cache::FailingCache;
