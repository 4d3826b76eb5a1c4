//! # Hex Board
//!
//! The hive stored in finite form: a fixed-radius hexagonal grid of
//! top-of-stack tiles, a side list for buried tiles, and the per-tile
//! position table. The board also maintains the two derived indices that
//! placement and movement legality depend on:
//!
//! - **influence**: per colour, the set of ground positions adjacent to at
//!   least one uncovered tile of that colour (placement legality), and
//! - **articulation points**: the cut vertices of the hive's ground-level
//!   adjacency graph (the One-Hive pin test).
//!
//! An axial position `(q, r)` lives at the flattened index
//! `q + R + (r + R) * (2R + 1)`, so the full grid is one `(2R+1)²` array.
//! The board is an approximation of Hive's unbounded table: a move that
//! would leave the radius fails, and the caller ends the game as a draw.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::hex::{Direction, Position};
use crate::tile::{Colour, Expansions, Tile, NUM_TILES};

/// Default board radius (distance from the origin to the edge).
pub const DEFAULT_BOARD_RADIUS: i8 = 8;

/// Largest supported board radius.
pub const MAX_BOARD_RADIUS: i8 = 14;

/// At most 7 tiles can ever be buried: six climbers on top of a stack of
/// ground tiles, plus the mosquito riding them.
const MAX_COVERED_TILES: usize = 7;

/// A move in reference-tile form, as the Universal Hive Protocol encodes
/// them: play `tile` one step in `dir` from `reference`. `reference == None`
/// (with `dir == Above`) is white's opening play at the origin. The same
/// shape covers placements from hand, movements, and Pillbug throws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HiveMove {
    /// Put `tile` adjacent to (or on top of) `reference`.
    Play {
        tile: Tile,
        reference: Option<Tile>,
        dir: Direction,
    },
    /// Forfeit the turn. Only legal when no other move is.
    Pass,
}

impl HiveMove {
    pub fn is_pass(self) -> bool {
        self == HiveMove::Pass
    }
}

/// The hive: grid, stacks, and the derived legality indices.
#[derive(Clone, Debug)]
pub struct HexBoard {
    radius: i8,
    expansions: Expansions,

    /// Top-of-stack tile for each axial cell, flattened row-major.
    grid: Vec<Option<Tile>>,
    /// Tiles buried under another tile, in covering order (lowest first
    /// per cell). Their entry in `positions` stays valid.
    covered: [Option<Tile>; MAX_COVERED_TILES],
    /// Current position of every tile; `Position::NULL` while unplayed.
    positions: [Position; NUM_TILES],
    /// Every tile ever placed, in placement order.
    played: Vec<Tile>,

    last_moved: Option<Tile>,
    last_moved_from: Position,

    /// Ground positions adjacent to an uncovered tile of each colour.
    influence: [FxHashSet<Position>; 2],
    /// Cut vertices of the ground-level hive graph.
    articulation_points: FxHashSet<Position>,

    /// Largest hex distance from the origin any move has reached, including
    /// the move that overflowed the board, if any.
    largest_radius: i32,
}

impl HexBoard {
    pub fn new(radius: i8, expansions: Expansions) -> Self {
        let radius = radius.min(MAX_BOARD_RADIUS);
        let dims = Self::dims_for(radius);
        Self {
            radius,
            expansions,
            grid: vec![None; dims * dims],
            covered: [None; MAX_COVERED_TILES],
            positions: [Position::NULL; NUM_TILES],
            played: Vec::with_capacity(NUM_TILES),
            last_moved: None,
            last_moved_from: Position::NULL,
            influence: [FxHashSet::default(), FxHashSet::default()],
            articulation_points: FxHashSet::default(),
            largest_radius: 0,
        }
    }

    fn dims_for(radius: i8) -> usize {
        radius as usize * 2 + 1
    }

    pub fn radius(&self) -> i8 {
        self.radius
    }

    /// Side length of the square grid backing the hex board.
    pub fn square_dimensions(&self) -> usize {
        Self::dims_for(self.radius)
    }

    pub fn expansions(&self) -> Expansions {
        self.expansions
    }

    /// Largest origin distance reached so far; exceeds `radius()` only when
    /// a move overflowed the board.
    pub fn largest_radius(&self) -> i32 {
        self.largest_radius
    }

    fn index_of(&self, pos: Position) -> usize {
        let radius = i32::from(self.radius);
        let q = i32::from(pos.q) + radius;
        let r = i32::from(pos.r) + radius;
        (q + r * (radius * 2 + 1)) as usize
    }

    fn in_bounds(&self, pos: Position) -> bool {
        pos.distance_to(Position::ORIGIN) <= i32::from(self.radius)
    }

    /// The top-of-stack tile at an axial cell, or `None` when the cell is
    /// empty or outside the board.
    pub fn top_tile_at(&self, pos: Position) -> Option<Tile> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.grid[self.index_of(pos)]
    }

    /// The tile directly underneath `pos`. Meaningful only for `pos.h > 0`.
    pub fn tile_below(&self, pos: Position) -> Option<Tile> {
        debug_assert!(pos.h > 0);
        let below = pos - Direction::Above.offset();
        // the tile below is either the cell's visible top...
        if let Some(top) = self.top_tile_at(below) {
            if self.positions[top.index()] == below {
                return Some(top);
            }
        }
        // ...or buried in the covered list
        self.covered
            .iter()
            .flatten()
            .copied()
            .find(|tile| self.positions[tile.index()] == below)
    }

    /// Current position of a tile; `Position::NULL` while unplayed.
    pub fn position_of(&self, tile: Tile) -> Position {
        self.positions[tile.index()]
    }

    /// Every tile ever placed, in placement order.
    pub fn played_tiles(&self) -> &[Tile] {
        &self.played
    }

    pub fn is_in_play(&self, tile: Tile) -> bool {
        self.positions[tile.index()].is_in_play()
    }

    /// The tile moved by the previous turn, if it was not a pass.
    pub fn last_moved(&self) -> Option<Tile> {
        self.last_moved
    }

    /// Where the previously moved tile came from (`NULL` for a placement).
    pub fn last_moved_from(&self) -> Position {
        self.last_moved_from
    }

    /// A buried tile cannot move and exerts no influence.
    pub fn is_covered(&self, tile: Tile) -> bool {
        self.covered.iter().flatten().any(|&covered| covered == tile)
    }

    /// Whether the tile at exactly `pos` is buried under another tile.
    pub fn is_covered_at(&self, pos: Position) -> bool {
        self.covered
            .iter()
            .flatten()
            .any(|&tile| self.positions[tile.index()] == pos)
    }

    /// A tile on a cut vertex of the hive graph cannot move without
    /// splitting the hive. Stacked tiles (`h > 0`) are never pinned: the
    /// tile underneath keeps the hive connected.
    pub fn is_pinned(&self, tile: Tile) -> bool {
        self.is_in_play(tile) && self.is_pinned_at(self.positions[tile.index()])
    }

    pub fn is_pinned_at(&self, pos: Position) -> bool {
        self.articulation_points.contains(&pos)
    }

    /// Whether a colour's queen is in play with all six neighbours occupied.
    pub fn is_queen_surrounded(&self, colour: Colour) -> bool {
        let queen = Tile::queen(colour);
        if !self.is_in_play(queen) {
            return false;
        }
        self.positions[queen.index()]
            .neighbours()
            .iter()
            .all(|&pos| self.top_tile_at(pos).is_some())
    }

    /// Placement legality: inside the colour's influence, outside the
    /// opponent's, and empty.
    pub fn is_placeable(&self, colour: Colour, pos: Position) -> bool {
        self.influence[colour.index()].contains(&pos)
            && !self.influence[colour.other().index()].contains(&pos)
            && self.top_tile_at(pos).is_none()
    }

    pub(crate) fn influence(&self, colour: Colour) -> &FxHashSet<Position> {
        &self.influence[colour.index()]
    }

    /// Whether `pos` touches the hive when the mover's start cell `ignore`
    /// is treated as empty (One-Hive during motion).
    pub(crate) fn is_connected(&self, pos: Position, ignore: Position) -> bool {
        pos.neighbours()
            .iter()
            .any(|&n| n != ignore && self.top_tile_at(n).is_some())
    }

    /// The freedom-to-move gate for a step from `pos` in `dir`, with the
    /// mover's start cell `ignore` treated as empty (pass `Position::NULL`
    /// for none). The two cells flanking the traversed edge block the step
    /// when their stacks reach the moving height; at ground level the step
    /// additionally requires exactly one flank occupied so the slider keeps
    /// touching the hive.
    pub(crate) fn is_gated(&self, pos: Position, dir: Direction, ignore: Position) -> bool {
        let cw = pos + dir.clockwise().offset();
        let ccw = pos + dir.counter_clockwise().offset();
        let cw_blocked = cw != ignore && self.stack_reaches(cw, pos.h);
        let ccw_blocked = ccw != ignore && self.stack_reaches(ccw, pos.h);
        if pos.h == 0 {
            cw_blocked == ccw_blocked
        } else {
            cw_blocked && ccw_blocked
        }
    }

    /// Whether the stack at `pos`'s axial cell reaches height `h`.
    fn stack_reaches(&self, pos: Position, h: i8) -> bool {
        self.top_tile_at(pos)
            .is_some_and(|top| self.positions[top.index()].h >= h)
    }

    /// Resolve the cell a move lands on: one step in `dir` from the
    /// reference tile, dropped onto the actual top of the destination pile
    /// (the reference may sit high on a stack). No reference encodes the
    /// opening play at the origin.
    pub fn destination_of(&self, reference: Option<Tile>, dir: Direction) -> Position {
        let Some(reference) = reference else {
            return Position::ORIGIN;
        };
        debug_assert!(self.is_in_play(reference));
        let mut pos = self.positions[reference.index()] + dir.offset();
        if pos.h > 0 {
            pos.h = match self.top_tile_at(pos) {
                Some(top) => self.positions[top.index()].h + 1,
                None => 0,
            };
        }
        pos
    }

    /// Apply a non-pass move: resolve the destination from the reference
    /// tile, land on the actual pile top, and refresh the derived indices.
    /// Returns `false` without mutating when the destination falls outside
    /// the fixed radius (the caller ends the game as a draw).
    pub fn move_tile(
        &mut self,
        tile: Tile,
        reference: Option<Tile>,
        dir: Direction,
    ) -> bool {
        let new_pos = self.destination_of(reference, dir);
        let dist = new_pos.distance_to(Position::ORIGIN);
        self.largest_radius = self.largest_radius.max(dist);
        if dist > i32::from(self.radius) {
            warn!(?tile, ?new_pos, radius = self.radius, "destination outside the board");
            return false;
        }

        let old_pos = self.positions[tile.index()];
        if old_pos == Position::NULL {
            self.played.push(tile);
        }
        if new_pos != old_pos {
            self.last_moved_from = old_pos;
        }

        // whatever was on top of the destination cell is now buried
        let new_idx = self.index_of(new_pos);
        if let Some(buried) = self.grid[new_idx] {
            debug_assert!(new_pos.h > 0);
            if let Some(slot) = self.covered.iter_mut().find(|slot| slot.is_none()) {
                *slot = Some(buried);
            } else {
                debug_assert!(false, "covered-tile list overflow");
            }
        }

        self.grid[new_idx] = Some(tile);
        self.positions[tile.index()] = new_pos;
        self.last_moved = Some(tile);

        if old_pos.h > 0 {
            self.uncover_top_at(old_pos);
        } else if old_pos != Position::NULL {
            let old_idx = self.index_of(old_pos);
            self.grid[old_idx] = None;
        }

        debug!(%tile, ?old_pos, ?new_pos, "applied move");

        self.update_influence(tile.colour());
        // a stack changed height: the buried/unburied tile's colour may
        // have gained or lost influence too
        if old_pos.h > 0 || new_pos.h > 0 {
            self.update_influence(tile.colour().other());
        }
        self.update_articulation_points();

        true
    }

    /// Reinstate the highest buried tile at the cell a climber vacated.
    fn uncover_top_at(&mut self, old_pos: Position) {
        // covering order means a reverse scan meets the highest tile first
        for i in (0..self.covered.len()).rev() {
            let Some(tile) = self.covered[i] else { continue };
            if self.positions[tile.index()].grounded() == old_pos.grounded() {
                let old_idx = self.index_of(old_pos);
                self.grid[old_idx] = Some(tile);
                // compact so the list stays in covering order
                self.covered[i] = None;
                self.covered[i..].rotate_left(1);
                return;
            }
        }
        debug_assert!(false, "no buried tile under a vacated stack cell");
    }

    /// Clear the turn-scoped state. A pass frees the previously moved tile
    /// to move again.
    pub fn pass(&mut self) {
        self.last_moved = None;
        self.last_moved_from = Position::NULL;
    }

    /// Rebuild a colour's influence set: every uncovered tile of the colour
    /// exerts influence on its six neighbour cells, folded to the ground so
    /// that stacked tiles influence the cells around them rather than
    /// positions in the air.
    fn update_influence(&mut self, colour: Colour) {
        let mut influence = std::mem::take(&mut self.influence[colour.index()]);
        influence.clear();
        for &tile in &self.played {
            if tile.colour() != colour || self.is_covered(tile) {
                continue;
            }
            for pos in self.positions[tile.index()].neighbours() {
                influence.insert(pos.grounded());
            }
        }
        self.influence[colour.index()] = influence;
    }

    /// Recompute the hive's cut vertices with Tarjan's lowlink algorithm
    /// over the ground-level adjacency graph. Only axial cells are
    /// vertices: a tile at `h > 0` rests on the tile below it and never
    /// carries connectivity.
    fn update_articulation_points(&mut self) {
        let mut search = CutVertexSearch::default();

        // any in-play anchor works; prefer the queens since movement rules
        // guarantee one is placed whenever a tile may move
        let anchor = [Tile::WQ, Tile::BQ]
            .into_iter()
            .find(|&tile| self.is_in_play(tile))
            .or_else(|| self.played.first().copied());
        if let Some(anchor) = anchor {
            let root = self.positions[anchor.index()].grounded();
            self.cut_vertex_dfs(&mut search, root, Position::NULL, true);
        }

        self.articulation_points = search.found;
    }

    /// One vertex of the lowlink DFS; returns the vertex's lowlink. A
    /// non-root vertex is a cut vertex when some child's lowlink cannot
    /// reach above the vertex's entry time; the root is one when it has
    /// more than one DFS child.
    fn cut_vertex_dfs(
        &self,
        search: &mut CutVertexSearch,
        vertex: Position,
        parent: Position,
        is_root: bool,
    ) -> u32 {
        let entry = search.clock;
        search.clock += 1;
        search.entry.insert(vertex, entry);

        let mut low = entry;
        let mut children = 0;
        for next in vertex.neighbours() {
            if self.top_tile_at(next).is_none() || next == parent {
                continue;
            }
            if let Some(&next_entry) = search.entry.get(&next) {
                low = low.min(next_entry);
            } else {
                let child_low = self.cut_vertex_dfs(search, next, vertex, false);
                children += 1;
                low = low.min(child_low);
                if child_low >= entry && !is_root {
                    search.found.insert(vertex);
                }
            }
        }

        if is_root && children > 1 {
            search.found.insert(vertex);
        }
        low
    }
}

/// Bookkeeping for one cut-vertex recomputation.
#[derive(Default)]
struct CutVertexSearch {
    entry: FxHashMap<Position, u32>,
    clock: u32,
    found: FxHashSet<Position>,
}
