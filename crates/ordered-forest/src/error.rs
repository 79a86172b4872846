use thiserror::Error;

/// Why a [`crate::Position`] was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionFault {
    /// Issued by a different map instance.
    ForeignTree,
    /// The node it referred to has been removed.
    Removed,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("INVALID_POSITION: {0:?}")]
    InvalidPosition(PositionFault),
}
