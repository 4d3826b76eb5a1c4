//! # Universal Hive Protocol Strings
//!
//! The textual surface of the engine: tile names (`wA2`, `bQ`), move
//! strings (`wA2 /bQ`, "white's second ant to the south-west of black's
//! queen"), game-type strings (`Base+MLP`) and the four-field session
//! string `GameType;State;Turn;Moves`.
//!
//! A move string names the moved tile and a reference tile decorated with
//! `\`, `-` or `/`: as a prefix the mark means NW, W or SW of the
//! reference, as a suffix SE, E or NE, and a bare reference means on top of
//! it. See
//! <https://github.com/jonthysell/Mzinga/wiki/UniversalHiveProtocol>.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::board::HiveMove;
use crate::hex::Direction;
use crate::state::{self, Action, GameParameters, HiveState};
use crate::tile::{BugType, Colour, Expansions, Tile};

/// Failures parsing UHP text. Fatal for the caller; the engine never
/// recovers internally.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum UhpError {
    #[error("unknown tile name `{0}`")]
    UnknownTile(String),
    #[error("malformed move string `{0}`")]
    MalformedMove(String),
    #[error("unknown game type `{0}`")]
    UnknownGameType(String),
    #[error("malformed session string `{0}`")]
    MalformedSession(String),
    #[error("illegal move `{0}` in session string")]
    IllegalMove(String),
}

impl FromStr for Tile {
    type Err = UhpError;

    /// Parses a tile name: colour letter, bug letter, and the ordinal digit
    /// exactly when the bug type has more than one copy.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || UhpError::UnknownTile(s.to_string());
        let mut chars = s.chars();
        let colour = match chars.next() {
            Some('w') => Colour::White,
            Some('b') => Colour::Black,
            _ => return Err(error()),
        };
        let bug = chars.next().and_then(BugType::from_letter).ok_or_else(error)?;
        let ordinal = match (chars.next(), bug.tile_count()) {
            (None, 1) => 1,
            (Some(digit), count) if count > 1 && chars.next().is_none() => {
                digit.to_digit(10).ok_or_else(error)? as u8
            }
            _ => return Err(error()),
        };
        Tile::from_parts(colour, bug, ordinal).ok_or_else(error)
    }
}

/// Moves format as UHP move strings.
impl fmt::Display for HiveMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            HiveMove::Pass => write!(f, "pass"),
            // the opening play has no reference tile
            HiveMove::Play { tile, reference: None, .. } => write!(f, "{tile}"),
            HiveMove::Play { tile, reference: Some(reference), dir } => match dir {
                Direction::NE => write!(f, "{tile} {reference}/"),
                Direction::E => write!(f, "{tile} {reference}-"),
                Direction::SE => write!(f, "{tile} {reference}\\"),
                Direction::SW => write!(f, "{tile} /{reference}"),
                Direction::W => write!(f, "{tile} -{reference}"),
                Direction::NW => write!(f, "{tile} \\{reference}"),
                Direction::Above => write!(f, "{tile} {reference}"),
            },
        }
    }
}

/// Parse a UHP move string.
pub fn parse_move(s: &str) -> Result<HiveMove, UhpError> {
    let trimmed = s.trim();
    if trimmed == "pass" {
        return Ok(HiveMove::Pass);
    }

    let error = || UhpError::MalformedMove(s.to_string());
    let mut parts = trimmed.split_whitespace();
    let tile: Tile = parts.next().ok_or_else(error)?.parse()?;
    let Some(second) = parts.next() else {
        return Ok(HiveMove::Play { tile, reference: None, dir: Direction::Above });
    };
    if parts.next().is_some() {
        return Err(error());
    }

    // a mark before the reference tile points west-ish, after it east-ish
    let dir = match second.chars().next() {
        Some('\\') => Direction::NW,
        Some('-') => Direction::W,
        Some('/') => Direction::SW,
        _ => match second.chars().last() {
            Some('\\') => Direction::SE,
            Some('-') => Direction::E,
            Some('/') => Direction::NE,
            _ => Direction::Above,
        },
    };
    let name = second.trim_matches(|c| matches!(c, '\\' | '-' | '/'));
    let reference: Tile = name.parse()?;
    Ok(HiveMove::Play { tile, reference: Some(reference), dir })
}

/// Parse a UHP move string straight to an action id.
pub fn string_to_action(s: &str) -> Result<Action, UhpError> {
    parse_move(s).map(state::encode_move)
}

/// Format an action id as a UHP move string.
pub fn action_to_string(action: Action) -> String {
    state::decode_move(action).to_string()
}

/// The UHP game-type string: `Base` plus the enabled expansions in M, L, P
/// order.
pub fn game_type_string(expansions: Expansions) -> String {
    let mut s = String::from("Base");
    if expansions != Expansions::BASE {
        s.push('+');
        if expansions.mosquito {
            s.push('M');
        }
        if expansions.ladybug {
            s.push('L');
        }
        if expansions.pillbug {
            s.push('P');
        }
    }
    s
}

pub fn parse_game_type(s: &str) -> Result<Expansions, UhpError> {
    let error = || UhpError::UnknownGameType(s.to_string());
    let rest = s.strip_prefix("Base").ok_or_else(error)?;
    if rest.is_empty() {
        return Ok(Expansions::BASE);
    }

    let mut expansions = Expansions::BASE;
    for c in rest.strip_prefix('+').ok_or_else(error)?.chars() {
        match c {
            'M' if !expansions.mosquito => expansions.mosquito = true,
            'L' if !expansions.ladybug => expansions.ladybug = true,
            'P' if !expansions.pillbug => expansions.pillbug = true,
            _ => return Err(error()),
        }
    }
    if expansions == Expansions::BASE {
        return Err(error());
    }
    Ok(expansions)
}

/// The four-field session string for a state:
/// `GameTypeString;StateString;TurnString;MovesString`.
pub fn session_string(state: &HiveState) -> String {
    format!(
        "{};{};{};{}",
        game_type_string(state.board().expansions()),
        state.progress_string(),
        state.turn_string(),
        state.moves_string()
    )
}

/// Rebuild a state by replaying a session string's move list on a fresh
/// game of the session's game type. Every replayed move must be legal,
/// though not necessarily in the engine's own encoding: UHP allows a tile
/// on top of a stack to use itself as the reference, where the generator
/// encodes the tile underneath, so unmatched ids fall back to comparing
/// the moved tile and the resolved destination.
pub fn parse_session(session: &str) -> Result<HiveState, UhpError> {
    let error = || UhpError::MalformedSession(session.to_string());
    let mut fields = session.splitn(4, ';');
    let game_type = fields.next().ok_or_else(error)?;
    let _progress = fields.next().ok_or_else(error)?;
    let _turn = fields.next().ok_or_else(error)?;
    let moves = fields.next().unwrap_or("");

    let expansions = parse_game_type(game_type)?;
    let mut state = HiveState::new(GameParameters { expansions, ..GameParameters::default() });
    for move_str in moves.split(';') {
        let move_str = move_str.trim();
        if move_str.is_empty() {
            continue;
        }
        let mv = parse_move(move_str)?;
        let action = state::encode_move(mv);
        let legal = state.legal_actions();
        if !legal.contains(&action) && !is_equivalent_to_legal(&state, &legal, mv) {
            return Err(UhpError::IllegalMove(move_str.to_string()));
        }
        state.apply_action(action);
    }
    Ok(state)
}

/// Whether `mv` moves the same tile to the same cell as some legal action.
fn is_equivalent_to_legal(state: &HiveState, legal: &[Action], mv: HiveMove) -> bool {
    let HiveMove::Play { tile, reference, dir } = mv else {
        return false;
    };
    if reference.is_some_and(|r| !state.board().is_in_play(r)) {
        return false;
    }
    let destination = state.board().destination_of(reference, dir);
    legal.iter().any(|&action| match state::decode_move(action) {
        HiveMove::Play { tile: t, reference: r, dir: d } => {
            t == tile && state.board().destination_of(r, d) == destination
        }
        HiveMove::Pass => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PASS_ACTION;

    #[test]
    fn test_tile_names_round_trip() {
        for tile in Tile::ALL {
            let parsed: Tile = tile.to_string().parse().expect("own name must parse");
            assert_eq!(parsed, tile);
        }
    }

    #[test]
    fn test_tile_name_rejects_garbage() {
        for bad in ["", "w", "xQ", "wQ1", "wA", "wA4", "wA11", "bX2", "Q"] {
            assert!(bad.parse::<Tile>().is_err(), "`{bad}` should not parse");
        }
    }

    #[test]
    fn test_move_string_directions() {
        let mv = |dir| HiveMove::Play { tile: Tile::WA2, reference: Some(Tile::BQ), dir };
        assert_eq!(mv(Direction::NE).to_string(), "wA2 bQ/");
        assert_eq!(mv(Direction::E).to_string(), "wA2 bQ-");
        assert_eq!(mv(Direction::SE).to_string(), "wA2 bQ\\");
        assert_eq!(mv(Direction::SW).to_string(), "wA2 /bQ");
        assert_eq!(mv(Direction::W).to_string(), "wA2 -bQ");
        assert_eq!(mv(Direction::NW).to_string(), "wA2 \\bQ");
        assert_eq!(mv(Direction::Above).to_string(), "wA2 bQ");
        for dir in Direction::CARDINALS {
            assert_eq!(parse_move(&mv(dir).to_string()), Ok(mv(dir)));
        }
        assert_eq!(parse_move("wA2 bQ"), Ok(mv(Direction::Above)));
    }

    #[test]
    fn test_opening_and_pass_strings() {
        let opening = HiveMove::Play { tile: Tile::WG1, reference: None, dir: Direction::Above };
        assert_eq!(opening.to_string(), "wG1");
        assert_eq!(parse_move("wG1"), Ok(opening));
        assert_eq!(parse_move("pass"), Ok(HiveMove::Pass));
        assert_eq!(string_to_action("pass"), Ok(PASS_ACTION));
        assert_eq!(action_to_string(PASS_ACTION), "pass");
    }

    #[test]
    fn test_move_string_rejects_garbage() {
        assert!(parse_move("").is_err());
        assert!(parse_move("wA2 bQ extra").is_err());
        assert!(parse_move("wA2 |bQ").is_err());
        assert!(parse_move("wX1 bQ-").is_err());
    }

    #[test]
    fn test_game_type_round_trip() {
        let cases = [
            ("Base", Expansions::BASE),
            ("Base+M", Expansions { mosquito: true, ..Expansions::BASE }),
            ("Base+L", Expansions { ladybug: true, ..Expansions::BASE }),
            ("Base+P", Expansions { pillbug: true, ..Expansions::BASE }),
            ("Base+MP", Expansions { mosquito: true, pillbug: true, ..Expansions::BASE }),
            ("Base+MLP", Expansions::default()),
        ];
        for (text, expansions) in cases {
            assert_eq!(parse_game_type(text), Ok(expansions), "{text}");
            assert_eq!(game_type_string(expansions), text);
        }
        assert!(parse_game_type("Chess").is_err());
        assert!(parse_game_type("Base+").is_err());
        assert!(parse_game_type("Base+X").is_err());
        assert!(parse_game_type("Base+MM").is_err());
    }

    #[test]
    fn test_session_string_of_fresh_game() {
        let state = HiveState::default();
        assert_eq!(state.to_uhp(), "Base+MLP;NotStarted;White[1];");
    }

    #[test]
    fn test_session_round_trip_after_moves() {
        let mut state = HiveState::default();
        for _ in 0..6 {
            let actions = state.legal_actions();
            state.apply_action(actions[0]);
        }
        let session = state.to_uhp();
        let replayed = HiveState::from_uhp(&session).expect("own session must replay");
        assert_eq!(replayed.to_uhp(), session);
        assert_eq!(replayed.history(), state.history());
        assert_eq!(replayed.current_player(), state.current_player());
    }

    #[test]
    fn test_session_rejects_illegal_move() {
        // the second move must touch white's opening tile
        let err = HiveState::from_uhp("Base;InProgress;White[2];wS1;bS1 wS1").unwrap_err();
        assert_eq!(err, UhpError::IllegalMove("bS1 wS1".to_string()));
    }
}
