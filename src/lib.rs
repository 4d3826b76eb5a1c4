//! # Hive Rules Engine
//!
//! A deterministic, perfect-information, two-player, zero-sum rules engine
//! for the board game Hive (base game plus the Mosquito, Ladybug and
//! Pillbug expansions), built to slot into a generic game-playing
//! framework: search, reinforcement learning, self-play.
//!
//! ## Rules Overview
//! Hive is played without a board: the tiles themselves form the playing
//! surface, the *hive*. Players alternate placing tiles from hand next to
//! their own colour, or moving tiles already in play:
//! - **Queen Bee**: one sliding step; must be placed by each player's
//!   fourth placement. Surrounding the opposing queen wins the game.
//! - **Ant**: slides any distance around the hive.
//! - **Spider**: slides exactly three steps without backtracking.
//! - **Grasshopper**: jumps a straight occupied line.
//! - **Beetle**: one step, may climb on top of the hive and bury tiles.
//! - **Mosquito**: copies each neighbouring bug type for the turn.
//! - **Ladybug**: two steps over the hive, then down.
//! - **Pillbug**: moves like the queen, and may throw an adjacent tile
//!   over itself.
//!
//! The hive must stay in one piece at all times (the One-Hive rule):
//! tiles on a cut vertex of the hive graph are pinned, and sliding tiles
//! cannot squeeze through gates or let go of the hive mid-move.
//!
//! ## Architecture
//! - [`hex`]: axial-coordinate geometry for the hex grid.
//! - [`tile`]: the closed set of 28 physical tile identities.
//! - [`board`]: the hive itself: grid, stacks, influence and
//!   articulation indices, and move application.
//! - [`state`]: turn order, terminal detection, the integer action space
//!   and the observation tensor.
//! - [`uhp`]: Universal Hive Protocol strings: moves, game types and
//!   session round-trips.
//!
//! Move generation lives on [`board::HexBoard`]; everything a framework
//! needs is on [`state::HiveState`], which also implements [`GameState`].
//!
//! ## Example
//! ```rust
//! use hive_engine::{GameParameters, HiveState};
//!
//! let mut state = HiveState::new(GameParameters::default());
//! while !state.is_terminal() {
//!     let actions = state.legal_actions();
//!     state.apply_action(actions[0]);
//! }
//! let [white, black] = state.returns();
//! assert_eq!(white + black, 0.0);
//! ```

pub mod board;
pub mod hex;
mod movegen;
pub mod state;
pub mod tile;
pub mod uhp;

pub use board::{HexBoard, HiveMove, DEFAULT_BOARD_RADIUS, MAX_BOARD_RADIUS};
pub use hex::{Direction, Position};
pub use state::{
    decode_move, encode_move, Action, GameParameters, HiveState, MAX_GAME_LENGTH,
    NUM_DISTINCT_ACTIONS, PASS_ACTION, PLAYER_BLACK, PLAYER_TERMINAL, PLAYER_WHITE,
};
pub use tile::{BugType, Colour, Expansions, Tile};
pub use uhp::UhpError;

/// The contract a game exposes to a generic game-playing framework.
///
/// Implementations must be cheap to clone: search engines copy states
/// freely and mutate the copies. Distinct states share nothing, so
/// independent games can be driven from different threads without
/// coordination.
pub trait GameState: Clone + Send + Sync {
    /// The move type of the game.
    ///
    /// Must be cloneable, comparable, hashable, debuggable and
    /// thread-safe; frameworks use moves as keys in tree nodes and
    /// transposition tables.
    type Move: Clone + Eq + std::hash::Hash + std::fmt::Debug + Send + Sync + 'static;

    /// Number of players in the game.
    fn get_num_players(&self) -> i32;

    /// The player whose turn it is, or a negative sentinel once the game
    /// has ended.
    fn get_current_player(&self) -> i32;

    /// Every legal move for the current player. Non-empty for any
    /// non-terminal state.
    fn get_possible_moves(&self) -> Vec<Self::Move>;

    /// Apply a move produced by [`GameState::get_possible_moves`],
    /// mutating the state and advancing the turn.
    fn make_move(&mut self, mv: &Self::Move);

    /// Whether the game has ended.
    fn is_terminal(&self) -> bool;

    /// The winning player, or `None` for a draw or a running game.
    fn get_winner(&self) -> Option<i32>;
}
