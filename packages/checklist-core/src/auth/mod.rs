//! Authentication state for the inspection API client.
//!
//! Provides session storage and the refresh-and-retry policy applied to
//! authenticated calls.

mod refresh;
mod token_store;

pub use refresh::Attempt;
#[cfg(feature = "keyring-storage")]
pub use token_store::KeyringTokenStore;
pub use token_store::{
    default_token_store, get_storage_info, FileTokenStore, MemoryTokenStore, Session, TokenStore,
};
