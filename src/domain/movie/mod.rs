pub mod entity;
pub mod invariants;

pub use entity::{SavedMovie, WatchStatus};
pub use invariants::validate_saved_movie;
