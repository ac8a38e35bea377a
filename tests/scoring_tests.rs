//! Scoring tests against full games.
//!
//! Scores are derived from the settled grid on demand: per-cell count,
//! fortified count, and a flat bonus for each block held in full.

use memgrid::{CellState, Command, Game, PlayerId, RoundOutcome, BLOCK_BONUS};

fn started_game(cells: usize, rounds: u32, players: &[&str]) -> (Game, Vec<PlayerId>) {
    let mut game = Game::new();
    let ids = players
        .iter()
        .map(|name| game.register_player(*name).unwrap())
        .collect();
    game.start(vec![CellState::Free; cells], rounds).unwrap();
    (game, ids)
}

fn run_round(game: &mut Game, batch: &[Command]) {
    match game.next_round(batch).unwrap() {
        RoundOutcome::Responses(_) => {}
        RoundOutcome::GameOver => panic!("game over before the round budget"),
    }
}

#[test]
fn test_scores_before_start_are_empty() {
    let game = Game::new();
    assert!(game.scores().is_empty());
}

#[test]
fn test_scores_zero_for_fresh_players() {
    let (game, ids) = started_game(8, 1, &["P", "Q"]);

    let scores = game.scores();
    assert_eq!(scores.len(), 2);
    for (score, id) in scores.iter().zip(ids) {
        assert_eq!(score.player, id);
        assert_eq!(score.total, 0);
    }
}

/// Owning a whole block is worth the four cells plus the block bonus.
#[test]
fn test_full_block_earns_bonus() {
    let (mut game, ids) = started_game(8, 2, &["P"]);
    let p = ids[0];

    run_round(&mut game, &[Command::allocate(p, [Some(0), Some(1)])]);
    run_round(&mut game, &[Command::allocate(p, [Some(2), Some(3)])]);

    let score = game.scores()[0];
    assert_eq!(score.owned_cells, 4);
    assert_eq!(score.owned_blocks, 1);
    assert_eq!(score.total, 4 + BLOCK_BONUS);
}

/// Three cells of four earn no bonus.
#[test]
fn test_partial_block_earns_no_bonus() {
    let (mut game, ids) = started_game(8, 2, &["P"]);
    let p = ids[0];

    run_round(&mut game, &[Command::allocate(p, [Some(0), Some(1)])]);
    run_round(&mut game, &[Command::allocate(p, [Some(2)])]);

    let score = game.scores()[0];
    assert_eq!(score.owned_cells, 3);
    assert_eq!(score.owned_blocks, 0);
    assert_eq!(score.total, 3);
}

/// Fortified cells stay part of the block for scoring purposes.
#[test]
fn test_fortified_block_still_counts() {
    let (mut game, ids) = started_game(8, 3, &["P"]);
    let p = ids[0];

    run_round(&mut game, &[Command::allocate(p, [Some(0), Some(1)])]);
    run_round(&mut game, &[Command::allocate(p, [Some(2), Some(3)])]);
    run_round(&mut game, &[Command::fortify(p, [Some(0)])]);

    let score = game.scores()[0];
    assert_eq!(score.owned_cells, 4);
    assert_eq!(score.fortified_cells, 1);
    assert_eq!(score.owned_blocks, 1);
    assert_eq!(score.total, 4 + BLOCK_BONUS);
}

/// A corrupted cell knocks its block out of the bonus even though the
/// owner reference survives corruption.
#[test]
fn test_corruption_breaks_the_block() {
    let (mut game, ids) = started_game(8, 3, &["P", "Q"]);
    let (p, q) = (ids[0], ids[1]);

    run_round(&mut game, &[Command::allocate(p, [Some(0), Some(1)])]);
    run_round(&mut game, &[Command::allocate(p, [Some(2), Some(3)])]);
    assert_eq!(game.scores()[0].total, 4 + BLOCK_BONUS);

    run_round(&mut game, &[Command::recover(q, [Some(3)])]);

    let score = game.scores()[0];
    assert_eq!(score.owned_cells, 3);
    assert_eq!(score.owned_blocks, 0);
    assert_eq!(score.total, 3);
}

/// Scores track the grid as it changes between requests; nothing is
/// cached.
#[test]
fn test_scores_follow_the_grid() {
    let (mut game, ids) = started_game(8, 2, &["P", "Q"]);
    let (p, q) = (ids[0], ids[1]);

    run_round(
        &mut game,
        &[
            Command::allocate(p, [Some(0), Some(1)]),
            Command::allocate(q, [Some(4)]),
        ],
    );
    assert_eq!(game.scores()[0].total, 2);
    assert_eq!(game.scores()[1].total, 1);

    run_round(&mut game, &[Command::free(p, [Some(0), Some(1)])]);
    assert_eq!(game.scores()[0].total, 0);
    assert_eq!(game.scores()[1].total, 1);
}
