//! Persistent data models.

mod handle;
mod map_binding;
mod verdict;

pub use handle::{Handle, ProfileKey, Region};
pub use map_binding::MapBinding;
pub use verdict::ClassificationEntry;
