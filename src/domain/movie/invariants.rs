use super::entity::SavedMovie;
use crate::domain::{DomainError, DomainResult};

/// Validates all SavedMovie invariants before a write
pub fn validate_saved_movie(movie: &SavedMovie) -> DomainResult<()> {
    if movie.id == 0 {
        return Err(DomainError::InvariantViolation(
            "Movie id cannot be zero".to_string(),
        ));
    }

    if movie.title.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Movie title cannot be empty".to_string(),
        ));
    }

    if movie.created_at > movie.updated_at {
        return Err(DomainError::InvariantViolation(format!(
            "Created at {} cannot be after updated at {}",
            movie.created_at, movie.updated_at
        )));
    }

    Ok(())
}

/// Invariants that must hold true for SavedMovie:
///
/// 1. At most one record per (user, id); writes merge by id
/// 2. Created timestamp never changes after the first write
/// 3. Updated timestamp advances on every write
/// 4. Title cannot be empty
