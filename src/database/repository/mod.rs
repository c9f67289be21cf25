//! Repository module - MongoDB-backed store implementations.

mod handle_repository;
mod map_repository;
mod verdict_repository;

pub use handle_repository::HandleRepository;
pub use map_repository::MapBindingRepository;
pub use verdict_repository::VerdictRepository;
