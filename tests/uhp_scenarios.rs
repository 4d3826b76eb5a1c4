//! Scenario tests: full games replayed from UHP session strings, with the
//! generated moves for one tile checked against known-good move lists.
//!
//! Each scenario exercises one bug's movement rule in a midgame position.
//! The expected lists name every cell the tile may reach (one encoding
//! per cell); the generator may add further reference-tile encodings for
//! the same cells, so the assertions compare resolved destinations and
//! additionally require every listed encoding verbatim.

use std::collections::BTreeSet;

use hive_engine::uhp;
use hive_engine::{decode_move, HiveMove, HiveState, Tile};

/// Replay a session string; panics if any move fails to validate.
fn replay(session: &str) -> HiveState {
    HiveState::from_uhp(session).expect("scenario session must replay")
}

/// Destination cells of every legal action that moves `tile`.
fn generated_destinations(state: &HiveState, tile: Tile) -> BTreeSet<(i8, i8, i8)> {
    state
        .legal_actions()
        .into_iter()
        .filter_map(|action| match decode_move(action) {
            HiveMove::Play { tile: t, reference, dir } if t == tile => {
                let pos = state.board().destination_of(reference, dir);
                Some((pos.q, pos.r, pos.h))
            }
            _ => None,
        })
        .collect()
}

/// Destination cells of the expected move strings that move `tile`.
fn expected_destinations(state: &HiveState, expected: &str, tile: Tile) -> BTreeSet<(i8, i8, i8)> {
    expected
        .split(';')
        .filter_map(|move_str| {
            let mv = uhp::parse_move(move_str).expect("expected move must parse");
            match mv {
                HiveMove::Play { tile: t, reference, dir } if t == tile => {
                    let pos = state.board().destination_of(reference, dir);
                    Some((pos.q, pos.r, pos.h))
                }
                _ => None,
            }
        })
        .collect()
}

/// Assert that every expected move string is legal, and that `tile`'s
/// reachable cells are exactly those of its expected moves.
fn assert_scenario(session: &str, tile: Tile, expected: &str) {
    let state = replay(session);
    let legal = state.legal_actions();

    for move_str in expected.split(';') {
        let action = uhp::string_to_action(move_str).expect("expected move must parse");
        assert!(legal.contains(&action), "expected move `{move_str}` was not generated");
    }

    assert_eq!(
        generated_destinations(&state, tile),
        expected_destinations(&state, expected, tile),
        "destination set mismatch for {tile}",
    );
}

#[test]
fn opening_two_moves() {
    let state = replay("Base+MLP;InProgress;White[2];wG1;bG1 wG1-");
    assert_eq!(state.move_number(), 2);
    assert_eq!(state.board().played_tiles().len(), 2);
    assert_eq!(state.board().position_of(Tile::WG1).grounded().q, 0);
    assert_eq!(state.board().position_of(Tile::BG1), hive_engine::Position::new(1, 0, 0));
}

#[test]
fn queen_moves() {
    assert_scenario(
        r"Base+MLP;InProgress;White[12];wG1;bG1 wG1-;wQ \wG1;bQ bG1-;wG2 /wG1;bA1 bQ/;wG3 /wG2;bA1 bQ-;wB1 -wG3;bA1 bQ/;wB2 \wB1;bA1 bQ-;wS1 \wB2;bA1 bQ/;wS2 wS1/;bA1 bQ-;wA1 \wS2;bA1 bQ/;wA2 wA1/;bA1 bQ-;wA3 wA2/;bA1 wA3-",
        Tile::WQ,
        r"wQ \bG1;wQ -wG1",
    );
}

#[test]
fn grasshopper_moves() {
    let session = r"Base+MLP;InProgress;White[11];wG1;bG1 wG1-;wQ /wG1;bQ bG1-;wS1 wQ\;bA1 bQ-;wB1 /wS1;bA1 -wQ;wB1 wS1\;bA2 bQ-;wB1 /wS1;bA2 wG1\;wB1 wS1\;bA3 bQ-;wB1 /wS1;bS1 bQ\;wB1 wS1;bS1 wB1\;wB1 /wB1;bA3 -wB1";
    assert_scenario(
        session,
        Tile::WG1,
        r"wG1 bQ-;wG1 bA2\;wG1 bA1\;wG2 \wG1;wS2 \wG1;wA1 \wG1;wB2 \wG1",
    );

    // a jump lands strictly past the contiguous occupied run
    let state = replay(session);
    for (q, r, h) in generated_destinations(&state, Tile::WG1) {
        let pos = hive_engine::Position::new(q, r, h);
        assert_eq!(h, 0);
        assert!(state.board().top_tile_at(pos).is_none());
    }
}

#[test]
fn ant_moves() {
    assert_scenario(
        r"Base+MLP;InProgress;White[13];wS1;bB1 wS1-;wQ -wS1;bQ bB1-;wB1 \wQ;bG1 bQ/;wB2 \wB1;bG2 bG1/;wS2 \wB2;bS1 bG2/;wA1 \wS1;bB2 bS1/;wA2 \wS2;bG3 \bB2;wA1 -bG1;bA1 \bG3;wG1 wA2/;bS2 -bA1;wG2 wG1/;bA2 -bS2;wA3 wG2-;bA3 bS2\;wG3 wA3\;bA3 wG3\",
        Tile::WA1,
        r"wA1 -bG2;wA1 -bS1;wA1 /bG3;wA1 bS2\;wA1 bA2\;wA1 /bA2;wA1 bA3-;wA1 bA3\;wA1 /bA3;wA1 /wG3;wA1 wG2\;wA1 wG1\;wA1 wB2/;wA1 wB1/;wA1 \wS1;wA1 \bB1",
    );
}

#[test]
fn spider_moves() {
    assert_scenario(
        r"Base+MLP;InProgress;White[12];wG1;bA1 wG1-;wS1 \wG1;bQ bA1-;wQ /wG1;bG1 bQ\;wG2 wQ\;bB1 /bG1;wB1 /wG2;bG2 bG1\;wG3 /wB1;bG2 -bB1;wB2 wG3\;bA1 bG1\;wA1 wB2-;bA1 bB1\;wA2 wA1/;bA1 bG1-;wS2 wA2-;bA1 bG1\;wA3 wS2\;bA1 wA3-",
        Tile::WS1,
        r"wS1 \bQ;wS1 /bQ;wS1 wG1\;wS1 /wQ",
    );
}

#[test]
fn spider_moves_second_position() {
    assert_scenario(
        r"Base+MLP;InProgress;White[12];wG1;bA1 wG1/;wB1 /wG1;bA2 bA1-;wQ wB1\;bQ bA2\;wB2 /wQ;bG1 bQ\;wS1 wG1\;bB1 /bG1;wG2 /wB2;bG2 bG1\;wG3 wG2\;bG2 wS1\;wA1 wG3-;bA1 -wB1;wS2 wA1/;bA3 bG1\;wA2 wS2-;bA2 \wG1;wA3 wA2\;bA3 wA3-",
        Tile::WS1,
        r"wS1 bA2/;wS1 bQ/;wS1 wG1/;wS1 \bQ",
    );
}

#[test]
fn beetle_moves() {
    let session = r"Base+MLP;InProgress;White[12];wB1;bB1 wB1-;wQ \wB1;bQ bB1/;wG1 /wB1;bB2 bB1\;wA1 /wG1;bA1 bQ\;wG2 -wA1;bQ \bB1;wB2 /wG2;bA2 \bA1;wG3 wB2\;bA2 \wQ;wA2 wG3-;bB2 wB1\;wS1 wA2\;bA1 bB1\;wS2 wS1-;bA1 bB1-;wA3 wS2/;bA1 \wA3";
    assert_scenario(session, Tile::WB1, r"wB1 wQ;wB1 bQ;wB1 bB1;wB1 bB2;wB1 wG1");

    // every move is a climb onto a neighbouring tile
    let state = replay(session);
    for (_, _, h) in generated_destinations(&state, Tile::WB1) {
        assert_eq!(h, 1);
    }
}

#[test]
fn mosquito_moves() {
    assert_scenario(
        r"Base+M;InProgress;White[13];wM;bG1 wM-;wS1 /wM;bQ bG1-;wQ /wS1;bB1 bG1\;wB1 /wQ;bB1 wM\;wS2 /wB1;bA1 bQ-;wB2 wS2\;bA1 bQ\;wG1 wB2-;bA1 bQ-;wG2 wG1/;bA1 bQ\;wG3 wG2/;bA1 bQ-;wA1 wG3-;bA1 bQ/;wA2 wA1-;bA1 bQ-;wA3 wA2\;bA1 /wA3",
        Tile::WM,
        r"wM bQ-;wM bB1\;wM /wS2;wM \bG1;wM bG1;wM bB1;wM wS1;wM \wS1;wM bQ/;wM -wQ",
    );
}

#[test]
fn ladybug_moves() {
    let session = r"Base+L;InProgress;White[14];wL;bL wL/;wQ -wL;bQ bL/;wQ -bL;bA1 bQ/;wB1 \wQ;bA1 bQ-;wS1 \wB1;bA1 bQ/;wB2 \wS1;bA1 bQ-;wS2 wB2/;bA1 bQ/;wA1 wS2-;bA1 bQ-;wG1 wA1/;bA1 bQ/;wG2 wG1-;bA1 bQ-;wA2 wG2\;bA1 bQ/;wA3 wA2-;bA1 bQ-;wG3 wA3/;bA1 \wG3";
    assert_scenario(
        session,
        Tile::WL,
        r"wL wB1/;wL -bQ;wL /wB1;wL /wS1;wL bQ\;wL bL\;wL \bQ;wL bQ/;wL bQ-;wL /wQ",
    );

    // every ladybug destination is an empty ground cell away from home
    let state = replay(session);
    let home = state.board().position_of(Tile::WL);
    for (q, r, h) in generated_destinations(&state, Tile::WL) {
        let pos = hive_engine::Position::new(q, r, h);
        assert_eq!(h, 0);
        assert_ne!(pos, home);
        assert!(state.board().top_tile_at(pos).is_none());
        assert!(home.distance_to(pos) <= 3);
    }
}

#[test]
fn pillbug_cannot_throw_the_last_moved_tile() {
    let session = r"Base+P;InProgress;White[15];wP;bS1 wP-;wQ /wP;bQ bS1-;wB1 -wQ;bB1 bS1\;wG1 wB1\;bB1 wP\;wS1 wG1\;bQ bS1/;wB1 -wP;bB1 wQ;wG2 wS1\;bB1 wB1;wG3 wG2\;bA1 bQ\;wS2 wG3-;bA1 bS1\;wA1 wS2/;bA1 bQ\;wA2 wA1/;bA1 bS1\;wA3 wA2/;bA1 bQ\;wB2 wA3/;bA1 wB2/;pass;bQ \bS1";
    let state = replay(session);
    let legal = state.legal_actions();

    // white's only options are pillbug throws of black's spider: both its
    // own tiles and the just-moved black queen are off limits
    assert_scenario(session, Tile::BS1, r"bS1 -bQ;bS1 wP\");
    for &action in &legal {
        match decode_move(action) {
            HiveMove::Play { tile, .. } => assert_eq!(tile, Tile::BS1),
            HiveMove::Pass => panic!("throws are available, pass must not be"),
        }
    }

    // the excluded encoding from the last-moved rule
    let excluded = uhp::string_to_action("bS1 wQ/").expect("must parse");
    assert!(!legal.contains(&excluded));
}

#[test]
fn queen_must_be_placed_by_fourth_turn() {
    let state = replay(
        r"Base+MLP;InProgress;White[4];wS1;bS1 wS1-;wA1 \wS1;bA1 bS1\;wG1 wA1/;bG1 bA1/",
    );
    // white's fourth placement: every legal action places the white queen
    for action in state.legal_actions() {
        match decode_move(action) {
            HiveMove::Play { tile, .. } => assert_eq!(tile, Tile::WQ),
            HiveMove::Pass => {}
        }
    }
}

#[test]
fn surrounding_ends_the_game() {
    // white walls in its own queen; black's ant closes the sixth cell
    let session = r"Base+MLP;InProgress;White[7];wG1;bG1 wG1-;wQ -wG1;bQ bG1-;wA1 \wG1;bA1 bQ-;wA2 -wQ;bA2 bQ/;wA3 \wQ;bA3 bQ\;wG2 /wQ;bA3 wQ\";
    let state = replay(session);
    assert!(state.is_terminal());
    assert_eq!(state.returns(), [-1.0, 1.0]);
    assert_eq!(state.current_player(), hive_engine::PLAYER_TERMINAL);
    assert!(state.legal_actions().is_empty());
    assert!(state.to_uhp().contains("BlackWins"));
}
