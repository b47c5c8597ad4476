// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// CRITICAL PRINCIPLES:
// - DTOs are UI-friendly representations
// - DTOs are simple, serializable structs
// - Conversion FROM domain entities only (never TO)

use serde::{Deserialize, Serialize};

use crate::application::view_state::MovieRow;
use crate::domain::{poster_url, Identity, PosterSize, SavedMovie, Session};
use crate::services::DeletionOutcome;

// ============================================================================
// SESSION DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityDto {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub providers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDto {
    pub loading: bool,
    pub user: Option<IdentityDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpDto {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

// ============================================================================
// MOVIE DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieRowDto {
    pub id: u64,
    pub title: String,
    pub year: Option<i32>,
    pub poster_url: Option<String>,
    /// "toWatch" | "watched" | None when not saved
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedMovieDto {
    pub id: u64,
    pub title: String,
    pub year: Option<i32>,
    pub poster_url: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

// ============================================================================
// ACCOUNT DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionResultDto {
    pub deleted: bool,
    pub reauthenticated: bool,
    /// "deleted" | "declined" | "reauth_cancelled" | "reauth_unavailable" | "failed" | "no_user"
    pub outcome: String,
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<&Identity> for IdentityDto {
    fn from(identity: &Identity) -> Self {
        Self {
            uid: identity.uid.clone(),
            email: identity.email.clone(),
            display_name: identity.display_name.clone(),
            providers: identity
                .providers
                .iter()
                .map(|p| p.provider_id().to_string())
                .collect(),
        }
    }
}

impl From<Session> for SessionDto {
    fn from(session: Session) -> Self {
        Self {
            loading: session.loading,
            user: session.identity.as_ref().map(IdentityDto::from),
        }
    }
}

impl From<MovieRow> for MovieRowDto {
    fn from(row: MovieRow) -> Self {
        Self {
            poster_url: poster_url(row.poster_path.as_deref(), PosterSize::default()),
            id: row.id,
            title: row.title,
            year: row.year,
            status: row.status.map(|s| s.as_str().to_string()),
        }
    }
}

impl From<SavedMovie> for SavedMovieDto {
    fn from(movie: SavedMovie) -> Self {
        Self {
            poster_url: poster_url(movie.poster_path.as_deref(), PosterSize::default()),
            id: movie.id,
            title: movie.title,
            year: movie.year,
            status: movie.status.as_str().to_string(),
            created_at: movie.created_at.to_rfc3339(),
            updated_at: movie.updated_at.to_rfc3339(),
        }
    }
}

impl From<&DeletionOutcome> for DeletionResultDto {
    fn from(outcome: &DeletionOutcome) -> Self {
        let (deleted, reauthenticated, label) = match outcome {
            DeletionOutcome::Deleted { reauthenticated } => (true, *reauthenticated, "deleted"),
            DeletionOutcome::Declined => (false, false, "declined"),
            DeletionOutcome::ReauthCancelled => (false, false, "reauth_cancelled"),
            DeletionOutcome::ReauthUnavailable => (false, false, "reauth_unavailable"),
            DeletionOutcome::Failed(_) => (false, false, "failed"),
        };
        Self {
            deleted,
            reauthenticated,
            outcome: label.to_string(),
        }
    }
}
