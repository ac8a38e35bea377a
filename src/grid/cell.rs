//! The cell state machine and its per-round write bookkeeping.
//!
//! A cell takes at most one successful write per round. The first write
//! attempt claims the slot whether or not the operation takes hold; any
//! later attempt in the same round forces the cell to `Corrupt`,
//! whatever operation was tried. `System` and `Fortified` cells are
//! permanently write-immune and refuse attempts without consuming
//! anything.
//!
//! Stored state never includes the `Owned*` variants: those exist only
//! in viewer-relative reads, so only the owner learns a cell is theirs.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// Cell state enumeration.
///
/// The first five variants are storable grid states. `OwnedAllocated`
/// and `OwnedFortified` are reporting-only: the owner's view of their
/// own allocated and fortified cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    Free,
    Allocated,
    Fortified,
    System,
    Corrupt,
    /// `Allocated`, as reported to the owning player.
    OwnedAllocated,
    /// `Fortified`, as reported to the owning player.
    OwnedFortified,
}

impl CellState {
    /// Whether a grid cell can hold this state. The owner-masked
    /// variants only appear in viewer-relative reads.
    #[must_use]
    pub fn is_stored(self) -> bool {
        !matches!(self, CellState::OwnedAllocated | CellState::OwnedFortified)
    }
}

/// One slot of the grid arena.
///
/// Identity is positional: a cell is addressed by its arena index, and
/// a successful swap exchanges whole slots, so the record carries no id
/// of its own.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    state: CellState,
    owner: Option<PlayerId>,
    written: bool,
    fortify_intent: bool,
    failed_swap: bool,
}

impl Cell {
    /// Create a cell in a stored state with no owner.
    #[must_use]
    pub fn new(state: CellState) -> Self {
        debug_assert!(state.is_stored());
        Self {
            state,
            owner: None,
            written: false,
            fortify_intent: false,
            failed_swap: false,
        }
    }

    /// Stored state, unmasked.
    #[must_use]
    pub fn state(&self) -> CellState {
        self.state
    }

    /// Viewer-relative state: the owner sees the `Owned*` variants,
    /// every other viewer (including none) the unmasked state.
    #[must_use]
    pub fn state_for(&self, viewer: Option<PlayerId>) -> CellState {
        if self.owner.is_some() && self.owner == viewer {
            match self.state {
                CellState::Allocated => return CellState::OwnedAllocated,
                CellState::Fortified => return CellState::OwnedFortified,
                _ => {}
            }
        }
        self.state
    }

    /// The owning player, if any. Remains set on a corrupt cell until
    /// the cell is freed or recovered.
    #[must_use]
    pub fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    /// Claim this round's write slot.
    ///
    /// `System` and `Fortified` cells refuse without side effect. The
    /// first claim in a round succeeds; every later claim forces the
    /// cell to `Corrupt` and fails, idempotently.
    pub fn can_write(&mut self) -> bool {
        if matches!(self.state, CellState::System | CellState::Fortified) {
            return false;
        }
        if self.written {
            self.state = CellState::Corrupt;
            return false;
        }
        self.written = true;
        true
    }

    /// Whether this cell took a write this round that still stands.
    #[must_use]
    pub fn valid_write(&self) -> bool {
        self.written && self.state != CellState::Corrupt
    }

    /// Clear per-round bookkeeping. State and owner persist.
    pub fn reset_round(&mut self) {
        self.written = false;
        self.fortify_intent = false;
        self.failed_swap = false;
    }

    /// Claim a free cell for `player`.
    pub fn allocate(&mut self, player: PlayerId) {
        if self.can_write() && self.state == CellState::Free {
            self.state = CellState::Allocated;
            self.owner = Some(player);
        }
    }

    /// Release an allocated or corrupt cell.
    pub fn free(&mut self) {
        if self.can_write() && matches!(self.state, CellState::Allocated | CellState::Corrupt) {
            self.state = CellState::Free;
            self.owner = None;
        }
    }

    /// Repair a corrupt cell, taking ownership of it. Recovering a
    /// healthy (`Free` or `Allocated`) cell corrupts it instead: the
    /// operation is a gamble, not a no-op.
    pub fn recover(&mut self, player: PlayerId) {
        if self.can_write() {
            match self.state {
                CellState::Corrupt => {
                    self.state = CellState::Allocated;
                    self.owner = Some(player);
                }
                CellState::Allocated | CellState::Free => {
                    self.state = CellState::Corrupt;
                }
                _ => {}
            }
        }
    }

    /// Record fortify intent. No state change until settle.
    pub fn begin_fortify(&mut self) {
        self.fortify_intent = true;
    }

    /// Resolve fortify intent at settle time. Consumes the write slot
    /// now, so a competing write earlier in the round corrupts the cell
    /// like any other conflict.
    pub fn finish_fortify(&mut self) -> bool {
        if self.fortify_intent && self.can_write() && self.state == CellState::Allocated {
            self.state = CellState::Fortified;
            true
        } else {
            false
        }
    }

    /// Mark this cell as part of a failed swap component. Write-immune
    /// cells keep their state; the failure flag is still recorded so
    /// chained swap responses report the loss.
    pub(crate) fn corrupt_from_swap(&mut self) {
        self.failed_swap = true;
        if !matches!(self.state, CellState::System | CellState::Fortified) {
            self.state = CellState::Corrupt;
        }
    }

    /// True iff no swap cascade touched this cell this round.
    #[must_use]
    pub fn successfully_swapped(&self) -> bool {
        !self.failed_swap
    }
}
