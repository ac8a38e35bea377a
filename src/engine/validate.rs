//! Structural command acceptance.
//!
//! Validation is purely structural: index bounds, block alignment and
//! cardinality. Whether an operation can take hold on the targeted
//! cells is decided by the cells themselves during resolution.

use crate::core::{Command, TargetList};
use crate::grid::block_of;

/// Check a command's structure against the grid size.
///
/// - Scan: the one target index must be in bounds.
/// - Allocate/Free/Recover/Fortify: at most two targets; `None`
///   entries are no-ops; all present indices in bounds and in the same
///   block.
/// - Swap: both indices in bounds; no block restriction.
/// - Stats: always valid.
#[must_use]
pub fn validate(command: &Command, grid_len: usize) -> bool {
    match command {
        Command::Scan { cell, .. } => *cell < grid_len,
        Command::Swap { a, b, .. } => *a < grid_len && *b < grid_len,
        Command::Stats { .. } => true,
        Command::Allocate { cells, .. }
        | Command::Free { cells, .. }
        | Command::Recover { cells, .. }
        | Command::Fortify { cells, .. } => block_targets_valid(cells, grid_len),
    }
}

fn block_targets_valid(cells: &TargetList, grid_len: usize) -> bool {
    if cells.len() > 2 {
        return false;
    }
    let mut block = None;
    for index in cells.iter().copied().flatten() {
        if index >= grid_len {
            return false;
        }
        let b = block_of(index);
        if *block.get_or_insert(b) != b {
            return false;
        }
    }
    true
}
