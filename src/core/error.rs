//! Engine error taxonomy.
//!
//! Only configuration and lifecycle misuse surface as errors. Command
//! rejection and write conflicts are ordinary simulation outcomes: a
//! rejected command fails its own response, and corruption is reported
//! through cell state, never thrown.

use thiserror::Error;

use crate::grid::CellState;

/// Errors raised by game configuration and lifecycle misuse.
///
/// None of these corrupt engine state; the failing call simply has no
/// effect.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    /// `start` was called with a zero round budget.
    #[error("number of rounds must be greater than zero")]
    InvalidRounds,

    /// `start` was called twice.
    #[error("game has already been started")]
    AlreadyStarted,

    /// A round was requested before `start`.
    #[error("game has not been started")]
    NotStarted,

    /// `register_player` was called after `start`.
    #[error("players can only register before the game starts")]
    RegistrationClosed,

    /// The roster is limited by the width of `PlayerId`.
    #[error("at most 255 players can register")]
    RosterFull,

    /// The initial grid may only contain stored states; the owner-masked
    /// variants exist solely in scan output.
    #[error("{0:?} is not a storable cell state")]
    InvalidInitialState(CellState),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            GameError::InvalidRounds.to_string(),
            "number of rounds must be greater than zero"
        );
        assert_eq!(
            GameError::InvalidInitialState(CellState::OwnedAllocated).to_string(),
            "OwnedAllocated is not a storable cell state"
        );
    }
}
