use std::fmt;

use thiserror::Error;

/// Which bucket/limits an upload is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    ProfilePicture,
    WorkoutVideo,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ProfilePicture => "profile picture",
            Self::WorkoutVideo => "workout video",
        };

        write!(f, "{}", s)
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Rejected before anything left the machine. No state was touched.
    #[error("invalid {kind}: {msg}")]
    Validation { kind: AssetKind, msg: String },

    /// The remote object store refused or never answered. Local state is unchanged.
    #[error("upload failed: {0}")]
    Upload(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl AppError {
    pub fn validation(kind: AssetKind, msg: impl Into<String>) -> Self {
        Self::Validation {
            kind,
            msg: msg.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
