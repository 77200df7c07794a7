//! zettel-cache – fluechtiger Key-Value-Cache mit TTL
//!
//! Dieses Crate definiert die Token-Store-Schnittstelle, gegen die der
//! Session-Manager arbeitet, sowie eine In-Memory-Implementierung mit
//! Ablauf-Semantik. Der Store wird explizit konstruiert und als Handle
//! uebergeben; es gibt keinen modulweiten Singleton.

pub mod error;
pub mod memory;
pub mod store;

pub use error::{CacheError, CacheResult};
pub use memory::MemoryCache;
pub use store::TokenStore;
