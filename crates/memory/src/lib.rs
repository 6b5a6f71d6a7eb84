pub mod state_store;
pub mod types;

pub use state_store::{StateStore, StoreError};
pub use types::*;
