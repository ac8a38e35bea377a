//! Ownership-relative scoring over the settled grid.
//!
//! Scores are derived fresh on every request: the grid is the only
//! source of truth. A complete block in one player's hands earns a flat
//! bonus on top of the per-cell count; three cells out of four earn
//! nothing extra.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;
use crate::grid::{CellState, Grid, BLOCK_CELLS};

/// Bonus for owning every cell of a block.
pub const BLOCK_BONUS: u32 = 4;

/// One player's standing, recomputed from grid state on request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerScore {
    pub player: PlayerId,
    /// Cells held in any owned state (allocated or fortified).
    pub owned_cells: u32,
    /// Held cells that are fortified.
    pub fortified_cells: u32,
    /// Blocks held in full.
    pub owned_blocks: u32,
    /// `owned_cells` plus [`BLOCK_BONUS`] per complete block.
    pub total: u32,
}

impl PlayerScore {
    /// Derive a player's score from the current grid.
    #[must_use]
    pub fn compute(player: PlayerId, grid: &Grid) -> Self {
        let mut owned_cells = 0;
        let mut fortified_cells = 0;
        let mut owned_blocks = 0;

        for block in grid.blocks() {
            let mut held: u32 = 0;
            for cell in block {
                if cell.owner() != Some(player) {
                    continue;
                }
                match cell.state() {
                    CellState::Allocated => held += 1,
                    CellState::Fortified => {
                        held += 1;
                        fortified_cells += 1;
                    }
                    // A corrupt cell keeps its owner but scores nothing.
                    _ => {}
                }
            }
            owned_cells += held;
            if block.len() == BLOCK_CELLS && held == BLOCK_CELLS as u32 {
                owned_blocks += 1;
            }
        }

        Self {
            player,
            owned_cells,
            fortified_cells,
            owned_blocks,
            total: owned_cells + BLOCK_BONUS * owned_blocks,
        }
    }
}
