pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;
pub mod memory;

pub use memory::MemoryCache;
pub use r#trait::KeyValueCache;

#[cfg(test)]
pub mod failing;
#[cfg(test)]
pub use failing::FailingCache;
