mod error;
mod traits;

pub mod memory;

pub use error::StoreError;
pub use memory::InMemoryStore;
pub use traits::{EntityStore, HackathonQuery};
