use std::fmt;
use thiserror::Error;

/// The kind of record an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Board,
    Stage,
    Department,
    User,
}

impl Entity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::Board => "Board",
            Entity::Stage => "Stage",
            Entity::Department => "Department",
            Entity::User => "User",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discrete error kind callers branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound(Entity),
    InvalidArgument,
    Conflict,
    Unauthenticated,
    Forbidden,
    Storage,
    Internal,
}

impl ErrorKind {
    /// User-facing kinds map to exit code 1, storage and internal failures to 2
    pub fn is_user_error(&self) -> bool {
        !matches!(self, ErrorKind::Storage | ErrorKind::Internal)
    }
}

/// Error type for every library operation.
///
/// Precondition checks run before any write, so an error other than
/// `Storage` never leaves partial state behind.
#[derive(Debug, Error)]
pub enum CrmError {
    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: i64 },

    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("database error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("invalid validation pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl CrmError {
    pub fn not_found(entity: Entity, id: i64) -> Self {
        CrmError::NotFound { entity, id }
    }

    pub fn invalid(detail: impl Into<String>) -> Self {
        CrmError::InvalidArgument(detail.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CrmError::NotFound { entity, .. } => ErrorKind::NotFound(*entity),
            CrmError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            CrmError::Conflict(_) => ErrorKind::Conflict,
            CrmError::Unauthenticated(_) => ErrorKind::Unauthenticated,
            CrmError::Forbidden(_) => ErrorKind::Forbidden,
            CrmError::Storage(_) => ErrorKind::Storage,
            CrmError::Pattern(_) => ErrorKind::Internal,
        }
    }
}

pub type Result<T, E = CrmError> = std::result::Result<T, E>;
