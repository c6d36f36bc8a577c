pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;
pub mod store;

pub use r#trait::CredentialRepository;
pub use store::CredentialStore;
