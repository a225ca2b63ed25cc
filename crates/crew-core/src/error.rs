use thiserror::Error;

/// Every engine failure, grouped by what the caller can do about it.
///
/// Operations never partially apply: when one of these is returned the input
/// state is untouched and no new state was produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The move breaks the rules of play (turn order, following suit, hints).
    #[error("illegal move: {0}")]
    IllegalMove(String),
    /// The requested task difficulty cannot be met from the catalog.
    #[error("invalid allocation: {0}")]
    InvalidAllocation(String),
    /// The state is not in the phase the operation needs.
    #[error("precondition violated: {0}")]
    Precondition(String),
    /// A player, task or card could not be found.
    #[error("lookup failed: {0}")]
    Lookup(String),
}

impl GameError {
    pub fn illegal(reason: impl Into<String>) -> Self {
        Self::IllegalMove(reason.into())
    }

    pub fn allocation(reason: impl Into<String>) -> Self {
        Self::InvalidAllocation(reason.into())
    }

    pub fn precondition(reason: impl Into<String>) -> Self {
        Self::Precondition(reason.into())
    }

    pub fn lookup(reason: impl Into<String>) -> Self {
        Self::Lookup(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
