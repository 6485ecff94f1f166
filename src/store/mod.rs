//! Persistence for user-saved messages.

pub mod json_file;
pub mod memory;
pub mod traits;

pub use json_file::JsonFileSavedStore;
pub use memory::MemorySavedStore;
pub use traits::{SavedStore, saved_view};
