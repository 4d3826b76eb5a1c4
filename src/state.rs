//! # Game State
//!
//! [`HiveState`] ties the board to turn order, terminal detection and the
//! integer action space a game-playing framework drives the engine
//! through. A state is created from [`GameParameters`], mutated in place by
//! [`HiveState::apply_action`], and cloned by value; all containers are
//! bounded, so a clone is a deep, independent copy.
//!
//! ## Action Encoding
//! A non-pass action indexes the 3-d space `[from][reference][direction]`
//! as `from * 196 + reference * 7 + direction` for the 28 tiles and 7
//! directions. White's opening play (which has no reference tile) is
//! encoded as the tile played "onto itself" with direction `Above`, and
//! the single id past the move space (`28 * 28 * 7`) is the pass.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::board::{HexBoard, HiveMove, DEFAULT_BOARD_RADIUS};
use crate::hex::{Direction, Position, NUM_DIRECTIONS};
use crate::tile::{BugType, Colour, Expansions, Tile, NUM_TILES};
use crate::{uhp, GameState};

/// A move in integer form, as exchanged with the framework.
pub type Action = u16;

/// Size of the `[from][reference][direction]` move space.
pub const NUM_MOVE_ACTIONS: usize = NUM_TILES * NUM_TILES * NUM_DIRECTIONS;

/// The reserved action id for a pass.
pub const PASS_ACTION: Action = NUM_MOVE_ACTIONS as Action;

/// Total number of distinct action ids, pass included.
pub const NUM_DISTINCT_ACTIONS: usize = NUM_MOVE_ACTIONS + 1;

pub const PLAYER_WHITE: i32 = 0;
pub const PLAYER_BLACK: i32 = 1;

/// Returned by [`HiveState::current_player`] once the game has ended.
pub const PLAYER_TERMINAL: i32 = -1;

/// Games longer than this are drawn.
pub const MAX_GAME_LENGTH: u32 = 1000;

/// Construction parameters: board radius and the expansion bugs in play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameParameters {
    pub board_size: i8,
    pub expansions: Expansions,
}

impl Default for GameParameters {
    fn default() -> Self {
        Self { board_size: DEFAULT_BOARD_RADIUS, expansions: Expansions::default() }
    }
}

/// Encode a move as an action id.
pub fn encode_move(mv: HiveMove) -> Action {
    match mv {
        HiveMove::Pass => PASS_ACTION,
        HiveMove::Play { tile, reference, dir } => {
            let from = tile.index();
            // the opening play has no reference: encode the tile onto itself
            let to = reference.map_or(from, Tile::index);
            (from * NUM_TILES * NUM_DIRECTIONS + to * NUM_DIRECTIONS + dir as usize) as Action
        }
    }
}

/// Decode an action id. Ids outside the action space are a caller contract
/// violation; debug builds assert on them.
pub fn decode_move(action: Action) -> HiveMove {
    if action == PASS_ACTION {
        return HiveMove::Pass;
    }

    let action = action as usize;
    let dir = Direction::from_index((action % NUM_DIRECTIONS) as u8);
    let to = Tile::from_index((action / NUM_DIRECTIONS) % NUM_TILES);
    let from = Tile::from_index(action / (NUM_TILES * NUM_DIRECTIONS));
    match (from, to, dir) {
        (Some(tile), Some(reference), Some(dir)) if tile == reference && dir == Direction::Above => {
            HiveMove::Play { tile, reference: None, dir }
        }
        (Some(tile), Some(reference), Some(dir)) => {
            HiveMove::Play { tile, reference: Some(reference), dir }
        }
        _ => {
            debug_assert!(false, "malformed action id {action}");
            HiveMove::Pass
        }
    }
}

/// A full game position: the board plus turn bookkeeping.
#[derive(Clone, Debug)]
pub struct HiveState {
    board: HexBoard,
    to_move: Colour,
    move_number: u32,
    force_terminal: bool,
    history: Vec<Action>,
}

impl HiveState {
    pub fn new(params: GameParameters) -> Self {
        Self {
            board: HexBoard::new(params.board_size, params.expansions),
            to_move: Colour::White,
            move_number: 0,
            force_terminal: false,
            history: Vec::new(),
        }
    }

    pub fn board(&self) -> &HexBoard {
        &self.board
    }

    /// Number of actions applied so far (two per full round).
    pub fn move_number(&self) -> u32 {
        self.move_number
    }

    /// The colour to move, regardless of terminality.
    pub fn to_move(&self) -> Colour {
        self.to_move
    }

    /// Action ids applied so far, in order.
    pub fn history(&self) -> &[Action] {
        &self.history
    }

    /// The player to act, or [`PLAYER_TERMINAL`] once the game has ended.
    pub fn current_player(&self) -> i32 {
        if self.is_terminal() {
            PLAYER_TERMINAL
        } else {
            self.to_move as i32
        }
    }

    /// All legal action ids, sorted and deduplicated. A lone pass when the
    /// player has nothing else; empty only at a terminal state.
    pub fn legal_actions(&self) -> Vec<Action> {
        if self.is_terminal() {
            return Vec::new();
        }

        let mut moves = Vec::new();
        self.board.generate_all_moves(&mut moves, self.to_move, self.move_number);

        // several reference tiles may encode the same destination, and the
        // mosquito may reach one destination through several copied types
        let unique: BTreeSet<Action> = moves.into_iter().map(encode_move).collect();
        if unique.is_empty() {
            vec![PASS_ACTION]
        } else {
            unique.into_iter().collect()
        }
    }

    /// Apply an action produced by [`HiveState::legal_actions`]. Applying a
    /// malformed id is a caller contract violation. A move that would leave
    /// the fixed board latches a terminal draw instead of mutating the
    /// board; it still consumes the turn.
    pub fn apply_action(&mut self, action: Action) {
        debug_assert!((action as usize) < NUM_DISTINCT_ACTIONS);
        match decode_move(action) {
            HiveMove::Pass => self.board.pass(),
            HiveMove::Play { tile, reference, dir } => {
                if !self.board.move_tile(tile, reference, dir) {
                    warn!(action, "board overflow: game ends in a draw");
                    self.force_terminal = true;
                }
            }
        }
        self.history.push(action);
        self.move_number += 1;
        self.to_move = self.to_move.other();
    }

    /// Whether `player` has won: the opposing queen is fully surrounded.
    pub fn win_condition_met(&self, player: i32) -> bool {
        let colour = if player == PLAYER_BLACK { Colour::Black } else { Colour::White };
        self.board.is_queen_surrounded(colour.other())
    }

    pub fn is_terminal(&self) -> bool {
        self.win_condition_met(PLAYER_WHITE)
            || self.win_condition_met(PLAYER_BLACK)
            || self.move_number >= MAX_GAME_LENGTH
            || self.force_terminal
    }

    /// Terminal returns in player order: +1 winner / -1 loser, zeros on a
    /// draw or while the game is running.
    pub fn returns(&self) -> [f64; 2] {
        let white_won = self.win_condition_met(PLAYER_WHITE);
        let black_won = self.win_condition_met(PLAYER_BLACK);
        if white_won ^ black_won {
            if white_won {
                [1.0, -1.0]
            } else {
                [-1.0, 1.0]
            }
        } else {
            [0.0, 0.0]
        }
    }

    /// The rendered board; identical for both players (perfect
    /// information).
    pub fn observation_string(&self, player: i32) -> String {
        debug_assert!(player == PLAYER_WHITE || player == PLAYER_BLACK);
        self.to_string()
    }

    /// The move history in UHP notation; identical for both players.
    pub fn information_state_string(&self, player: i32) -> String {
        debug_assert!(player == PLAYER_WHITE || player == PLAYER_BLACK);
        self.moves_string()
    }

    /// Shape of the observation tensor: one plane per enabled bug type per
    /// player, then pinned/placeable/covered pairs, over the square grid.
    pub fn observation_shape(&self) -> [usize; 3] {
        let dims = self.board.square_dimensions();
        [2 * self.board.expansions().num_bug_types() + 6, dims, dims]
    }

    /// The flattened observation tensor from `player`'s perspective. Plane
    /// order: my bug types, opponent bug types, my/opp pinned, my/opp
    /// placeable, my/opp covered. Cell `(q, r)` maps to `[r + R][q + R]`.
    pub fn observation_tensor(&self, player: i32) -> Vec<f32> {
        debug_assert!(player == PLAYER_WHITE || player == PLAYER_BLACK);
        let [planes, dims, _] = self.observation_shape();
        let num_types = self.board.expansions().num_bug_types();
        let mut tensor = vec![0.0_f32; planes * dims * dims];

        let my_colour = if player == PLAYER_BLACK { Colour::Black } else { Colour::White };
        let radius = i32::from(self.board.radius());
        let plane_len = dims * dims;
        let cell = |pos: Position| {
            let row = (i32::from(pos.r) + radius) as usize;
            let col = (i32::from(pos.q) + radius) as usize;
            row * dims + col
        };

        let pinned_base = 2 * num_types;
        let placeable_base = pinned_base + 2;
        let covered_base = placeable_base + 2;

        for &tile in self.board.played_tiles() {
            let pos = self.board.position_of(tile);
            let opposing = tile.colour() != my_colour;
            let offset = cell(pos);

            if let Some(type_index) = self.bug_type_tensor_index(tile.bug_type()) {
                let plane = type_index + if opposing { num_types } else { 0 };
                tensor[plane * plane_len + offset] = 1.0;
            }
            if self.board.is_pinned_at(pos) {
                tensor[(pinned_base + usize::from(opposing)) * plane_len + offset] = 1.0;
            }
            if self.board.is_covered(tile) {
                tensor[(covered_base + usize::from(opposing)) * plane_len + offset] = 1.0;
            }
        }

        for r in -radius..=radius {
            for q in -radius..=radius {
                let pos = Position::new(q as i8, r as i8, 0);
                let offset = cell(pos);
                if self.board.is_placeable(my_colour, pos) {
                    tensor[placeable_base * plane_len + offset] = 1.0;
                } else if self.board.is_placeable(my_colour.other(), pos) {
                    tensor[(placeable_base + 1) * plane_len + offset] = 1.0;
                }
            }
        }

        tensor
    }

    /// Position of a bug type among the enabled types' tensor planes.
    fn bug_type_tensor_index(&self, bug: BugType) -> Option<usize> {
        let expansions = self.board.expansions();
        let mut index = 0;
        for candidate in BugType::ALL {
            if !expansions.enables(candidate) {
                continue;
            }
            if candidate == bug {
                return Some(index);
            }
            index += 1;
        }
        None
    }

    /// The UHP session string for this game.
    pub fn to_uhp(&self) -> String {
        uhp::session_string(self)
    }

    /// Reconstruct a state by replaying a UHP session string.
    pub fn from_uhp(session: &str) -> Result<Self, uhp::UhpError> {
        uhp::parse_session(session)
    }

    /// The UHP `StateString`: progress or result of the game.
    pub(crate) fn progress_string(&self) -> &'static str {
        if self.move_number == 0 {
            return "NotStarted";
        }

        let white_won = self.win_condition_met(PLAYER_WHITE);
        let black_won = self.win_condition_met(PLAYER_BLACK);
        if white_won ^ black_won {
            if white_won {
                "WhiteWins"
            } else {
                "BlackWins"
            }
        } else if (white_won && black_won)
            || self.move_number >= MAX_GAME_LENGTH
            || self.force_terminal
        {
            "Draw"
        } else {
            "InProgress"
        }
    }

    /// The UHP `TurnString`: the colour to move and the 1-indexed round.
    pub(crate) fn turn_string(&self) -> String {
        let colour = match self.to_move {
            Colour::White => "White",
            Colour::Black => "Black",
        };
        format!("{}[{}]", colour, (self.move_number + 2) / 2)
    }

    /// The UHP `MovesString`: every applied move, `;`-separated.
    pub(crate) fn moves_string(&self) -> String {
        self.history
            .iter()
            .map(|&action| uhp::action_to_string(action))
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl Default for HiveState {
    fn default() -> Self {
        Self::new(GameParameters::default())
    }
}

impl GameState for HiveState {
    type Move = HiveMove;

    fn get_num_players(&self) -> i32 {
        2
    }

    fn get_current_player(&self) -> i32 {
        self.current_player()
    }

    fn get_possible_moves(&self) -> Vec<HiveMove> {
        self.legal_actions().into_iter().map(decode_move).collect()
    }

    fn make_move(&mut self, mv: &HiveMove) {
        self.apply_action(encode_move(*mv));
    }

    fn is_terminal(&self) -> bool {
        HiveState::is_terminal(self)
    }

    fn get_winner(&self) -> Option<i32> {
        match (self.win_condition_met(PLAYER_WHITE), self.win_condition_met(PLAYER_BLACK)) {
            (true, false) => Some(PLAYER_WHITE),
            (false, true) => Some(PLAYER_BLACK),
            _ => None,
        }
    }
}

/// Renders the hexagon with one 5-column cell per tile, `^` marking a tile
/// somewhere above the ground, `*` marking the tile moved last turn (or
/// the cell it left), and the stacks spelled out underneath.
impl fmt::Display for HiveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let radius = i32::from(self.board.radius());
        let mut elevated: Vec<Tile> = Vec::new();

        for r in -radius..=radius {
            let indent = (r.unsigned_abs() as usize * 5) / 2;
            write!(f, "{:indent$}", "")?;

            for q in (-radius).max(-r - radius)..=radius.min(-r + radius) {
                let pos = Position::new(q as i8, r as i8, 0);
                match self.board.top_tile_at(pos) {
                    Some(tile) => {
                        let mut label = tile.to_string();
                        if self.board.position_of(tile).h > 0 {
                            label.insert(0, '^');
                            elevated.push(tile);
                        }
                        if self.board.last_moved() == Some(tile) {
                            label.push('*');
                        }
                        write!(f, "{label:^5}")?;
                    }
                    None if self.board.last_moved().is_some()
                        && self.board.last_moved_from() == pos =>
                    {
                        write!(f, "  *  ")?;
                    }
                    None => write!(f, "  -  ")?,
                }
            }
            writeln!(f)?;
            writeln!(f)?;
        }

        for tile in elevated {
            write!(f, "{tile}")?;
            let mut pos = self.board.position_of(tile);
            while pos.h > 0 {
                match self.board.tile_below(pos) {
                    Some(below) => {
                        write!(f, " > {below}")?;
                        pos = self.board.position_of(below);
                    }
                    None => break,
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
