//! The round orchestrator.
//!
//! Owns the grid, the player roster and the per-round swap graph, and
//! drives the round protocol: reset transient state, gate and validate
//! the batch, apply speculative effects in batch order, then settle and
//! build responses from the final grid. Every speculative write
//! completes before any response is computed, so the settle phase never
//! observes a half-applied round.
//!
//! Batch order decides which of two competing writers claims a cell's
//! write slot; that order sensitivity is an accepted property of the
//! domain, not something the engine hides.

use std::fmt::Write as _;

use crate::core::{
    Command, GameError, GridStats, PlayerId, PlayerMap, Response, Roster, RoundOutcome, TargetList,
};
use crate::engine::conflict::SwapGraph;
use crate::engine::validate::validate;
use crate::grid::{Cell, CellState, Grid, BLOCK_CELLS};
use crate::score::PlayerScore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
    NotStarted,
    InProgress,
    Finished,
}

/// The rules engine for one contest.
///
/// Lifecycle: register players, `start` once, then one `next_round`
/// call per round until the budget is spent. Scores and the diagnostic
/// rendering are available at any time.
#[derive(Clone, Debug)]
pub struct Game {
    roster: Roster,
    grid: Grid,
    conflicts: SwapGraph,
    moved: PlayerMap<bool>,
    lifecycle: Lifecycle,
    max_rounds: u32,
    round: u32,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Create a game awaiting registration and `start`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            roster: Roster::new(),
            grid: Grid::default(),
            conflicts: SwapGraph::new(),
            moved: PlayerMap::with_value(0, false),
            lifecycle: Lifecycle::NotStarted,
            max_rounds: 0,
            round: 0,
        }
    }

    /// Register a player. Only possible before the game starts.
    pub fn register_player(&mut self, name: impl Into<String>) -> Result<PlayerId, GameError> {
        if self.lifecycle != Lifecycle::NotStarted {
            return Err(GameError::RegistrationClosed);
        }
        self.roster.register(name).ok_or(GameError::RosterFull)
    }

    /// Fix the grid from an initial state list and set the round
    /// budget. Grid size is immutable from here on.
    pub fn start(&mut self, initial: Vec<CellState>, rounds: u32) -> Result<(), GameError> {
        if self.lifecycle != Lifecycle::NotStarted {
            return Err(GameError::AlreadyStarted);
        }
        if rounds == 0 {
            return Err(GameError::InvalidRounds);
        }
        if let Some(state) = initial.iter().copied().find(|state| !state.is_stored()) {
            return Err(GameError::InvalidInitialState(state));
        }

        log::info!(
            "game started: {} cells, {} rounds, {} players",
            initial.len(),
            rounds,
            self.roster.len()
        );
        self.grid = Grid::from_states(initial);
        self.moved = PlayerMap::with_value(self.roster.len(), false);
        self.max_rounds = rounds;
        self.round = 0;
        self.lifecycle = Lifecycle::InProgress;
        Ok(())
    }

    /// Rounds resolved so far.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// The round budget fixed at `start`.
    #[must_use]
    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    /// Rounds still to be played.
    #[must_use]
    pub fn rounds_left(&self) -> u32 {
        self.max_rounds - self.round
    }

    /// Whether the round budget has been spent.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.lifecycle == Lifecycle::Finished
    }

    /// Read access to the grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Read access to the roster.
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Resolve one round against a batch of commands.
    ///
    /// Returns one response per command (scan responses appended after
    /// all others), or [`RoundOutcome::GameOver`] once the budget is
    /// spent. An invalid or conflicting command fails its own response
    /// and never aborts the batch.
    pub fn next_round(&mut self, batch: &[Command]) -> Result<RoundOutcome, GameError> {
        match self.lifecycle {
            Lifecycle::NotStarted => return Err(GameError::NotStarted),
            Lifecycle::Finished => {
                log::info!("round requested after game over");
                return Ok(RoundOutcome::GameOver);
            }
            Lifecycle::InProgress => {}
        }
        self.round += 1;

        self.reset_round();
        let accepted = self.apply_batch(batch);
        let responses = self.settle(batch, &accepted);

        if self.round >= self.max_rounds {
            self.lifecycle = Lifecycle::Finished;
            log::info!("round budget exhausted after {} rounds", self.max_rounds);
        }
        Ok(RoundOutcome::Responses(responses))
    }

    /// Current scores, one per registered player, derived from grid
    /// state alone.
    #[must_use]
    pub fn scores(&self) -> Vec<PlayerScore> {
        self.roster
            .ids()
            .map(|player| PlayerScore::compute(player, &self.grid))
            .collect()
    }

    /// Snapshot of grid-wide counters.
    #[must_use]
    pub fn stats(&self) -> GridStats {
        let mut stats = GridStats {
            rounds_left: self.rounds_left(),
            ..GridStats::default()
        };
        for cell in self.grid.iter() {
            match cell.state() {
                CellState::Free => stats.free += 1,
                CellState::Allocated => stats.allocated += 1,
                CellState::Fortified => stats.fortified += 1,
                CellState::System => stats.system += 1,
                CellState::Corrupt => stats.corrupt += 1,
                // Never stored.
                CellState::OwnedAllocated | CellState::OwnedFortified => {}
            }
        }
        stats
    }

    /// Diagnostic rendering of grid, roster and round counters. Not
    /// part of the protocol contract.
    #[must_use]
    pub fn visualize(&self) -> String {
        let mut out = String::new();
        for (_, name) in self.roster.iter() {
            let _ = writeln!(out, "Player: {name}");
        }
        for (block, cells) in self.grid.blocks().enumerate() {
            let row: Vec<String> = cells
                .iter()
                .enumerate()
                .map(|(offset, cell)| self.render_cell(block * BLOCK_CELLS + offset, cell))
                .collect();
            let _ = writeln!(out, "[{}]", row.join(" "));
        }
        let _ = writeln!(out, "max rounds: {}", self.max_rounds);
        let _ = write!(out, "current round: {}", self.round);
        out
    }

    fn render_cell(&self, index: usize, cell: &Cell) -> String {
        let glyph = match cell.state() {
            CellState::System => return format!("{index}: (SYS )"),
            CellState::Free => return format!("{index}: (FREE)"),
            CellState::Allocated => 'A',
            CellState::Fortified => '#',
            CellState::Corrupt => 'C',
            CellState::OwnedAllocated | CellState::OwnedFortified => '?',
        };
        let tag = cell
            .owner()
            .and_then(|player| self.roster.name(player))
            .map_or_else(|| "--".to_string(), |name| name.chars().take(2).collect());
        format!("{index}: ({glyph}:{tag})")
    }

    /// Clear all transient round state: write slots, fortify intents,
    /// swap failure flags, the conflict graph and the move gate.
    fn reset_round(&mut self) {
        self.grid.reset_round();
        self.conflicts.clear();
        for (_, flag) in self.moved.iter_mut() {
            *flag = false;
        }
    }

    /// Gate, validate and speculatively apply each command in batch
    /// order, returning the per-command acceptance flags.
    fn apply_batch(&mut self, batch: &[Command]) -> Vec<bool> {
        batch
            .iter()
            .map(|command| {
                let accepted = self.admit(command) && validate(command, self.grid.len());
                if accepted {
                    self.apply(command);
                } else {
                    log::debug!("rejected command from {}: {command:?}", command.player());
                }
                accepted
            })
            .collect()
    }

    /// The one-move gate. A write command consumes its player's move
    /// for the round, first in batch order, even if the command then
    /// fails structural validation. Reads pass freely.
    fn admit(&mut self, command: &Command) -> bool {
        let player = command.player();
        if !self.roster.contains(player) {
            return false;
        }
        if command.is_mutating() {
            if self.moved[player] {
                return false;
            }
            self.moved[player] = true;
        }
        true
    }

    /// Speculative effect of one accepted command.
    fn apply(&mut self, command: &Command) {
        match command {
            Command::Allocate { player, cells } => {
                for index in cells.iter().copied().flatten() {
                    self.grid[index].allocate(*player);
                }
            }
            Command::Free { cells, .. } => {
                for index in cells.iter().copied().flatten() {
                    self.grid[index].free();
                }
            }
            Command::Recover { player, cells } => {
                for index in cells.iter().copied().flatten() {
                    self.grid[index].recover(*player);
                }
            }
            Command::Fortify { cells, .. } => {
                for index in cells.iter().copied().flatten() {
                    self.grid[index].begin_fortify();
                }
            }
            Command::Swap { a, b, .. } => self.apply_swap(*a, *b),
            Command::Scan { .. } | Command::Stats { .. } => {}
        }
    }

    /// Record the attempt, claim both write slots, then either exchange
    /// the two slots or corrupt the whole connected component of this
    /// round's attempts.
    fn apply_swap(&mut self, a: usize, b: usize) {
        self.conflicts.record(a, b);
        let first = self.grid[a].can_write();
        let second = self.grid[b].can_write();
        if first && second {
            self.grid.swap_slots(a, b);
        } else {
            for index in self.conflicts.component(a, b) {
                self.grid[index].corrupt_from_swap();
            }
        }
    }

    /// Build one response per command from the settled grid. Fortify
    /// resolves here, consuming its write slot; scans are appended
    /// after all other responses.
    fn settle(&mut self, batch: &[Command], accepted: &[bool]) -> Vec<Response> {
        let mut responses = Vec::with_capacity(batch.len());
        let mut scans = Vec::new();
        for (command, &ok) in batch.iter().zip(accepted) {
            match command {
                Command::Allocate { player, cells } => {
                    let cells = self.settled_targets(cells, ok, |cell| {
                        cell.state() == CellState::Allocated && cell.owner() == Some(*player)
                    });
                    responses.push(Response::Success { player: *player, cells });
                }
                Command::Free { player, cells } => {
                    let cells = self.settled_targets(cells, ok, |cell| {
                        cell.valid_write() && cell.state() == CellState::Free
                    });
                    responses.push(Response::Success { player: *player, cells });
                }
                Command::Recover { player, cells } => {
                    let cells = self.settled_targets(cells, ok, |cell| {
                        cell.valid_write()
                            && cell.state() == CellState::Allocated
                            && cell.owner() == Some(*player)
                    });
                    responses.push(Response::Success { player: *player, cells });
                }
                Command::Fortify { player, cells } => {
                    let mut held = Vec::new();
                    if ok {
                        for index in cells.iter().copied().flatten() {
                            if self.grid[index].finish_fortify() {
                                held.push(index);
                            }
                        }
                    }
                    responses.push(Response::Success { player: *player, cells: held });
                }
                Command::Swap { player, a, b } => {
                    let swapped = ok
                        && self.grid[*a].successfully_swapped()
                        && self.grid[*b].successfully_swapped();
                    responses.push(Response::Success {
                        player: *player,
                        cells: if swapped { vec![*a, *b] } else { Vec::new() },
                    });
                }
                Command::Stats { player } => {
                    responses.push(Response::Stats {
                        player: *player,
                        stats: self.stats(),
                    });
                }
                Command::Scan { player, cell } => {
                    scans.push(self.scan_response(*player, *cell, ok));
                }
            }
        }
        responses.append(&mut scans);
        responses
    }

    /// Target indices whose settled cell passes the per-operation
    /// success test. Rejected commands report nothing.
    fn settled_targets(
        &self,
        cells: &TargetList,
        accepted: bool,
        took_hold: impl Fn(&Cell) -> bool,
    ) -> Vec<usize> {
        if !accepted {
            return Vec::new();
        }
        cells
            .iter()
            .copied()
            .flatten()
            .filter(|&index| took_hold(&self.grid[index]))
            .collect()
    }

    fn scan_response(&self, player: PlayerId, cell: usize, accepted: bool) -> Response {
        if accepted {
            Response::Scan {
                player,
                block_start: Some(cell - cell % BLOCK_CELLS),
                states: self.grid.block_states(cell, Some(player)),
            }
        } else {
            Response::Scan {
                player,
                block_start: None,
                states: Vec::new(),
            }
        }
    }
}
