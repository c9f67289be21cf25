//! Database module exports.

mod memory;
mod mongo;
mod repository;

pub mod models;
pub mod store;

pub use memory::MemoryStore;
pub use mongo::Database;
pub use repository::{HandleRepository, MapBindingRepository, VerdictRepository};
