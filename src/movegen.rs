//! # Move Generation
//!
//! Enumerates every legal [`HiveMove`] for a position: placements from hand
//! (with the opening special cases and the queen-by-turn-4 rule) and
//! per-bug movement. Each bug type resolves to a set of destination
//! positions which are then attached to reference tiles to produce
//! UHP-shaped moves; the Mosquito and Pillbug emit moves directly because
//! their options depend on more than a destination set.
//!
//! Duplicate moves (one destination reachable around several reference
//! tiles, or via several copied bug types) are allowed here; the state
//! layer deduplicates action ids.

use rustc_hash::FxHashSet;

use crate::board::{HexBoard, HiveMove};
use crate::hex::{Direction, Position};
use crate::tile::{BugType, Colour, Tile, NUM_BUG_TYPES};

/// Shared bookkeeping for one sliding search, passed explicitly through the
/// recursion: the mover's start cell (treated as empty by every occupancy
/// check), the exact step count (`None` for the Ant's unbounded slide), and
/// the cells already on the current path.
struct SlideSearch {
    start: Position,
    limit: Option<u8>,
    visited: FxHashSet<Position>,
}

impl HexBoard {
    /// All legal moves for `to_move` at `move_number`, appended to `out`.
    /// May contain duplicates; never contains a pass.
    pub fn generate_all_moves(&self, out: &mut Vec<HiveMove>, to_move: Colour, move_number: u32) {
        self.generate_placements(out, to_move, move_number);

        // tiles may move only once the mover's queen is placed, and the
        // tile moved last turn has to sit a turn out
        if self.is_in_play(Tile::queen(to_move)) {
            for &tile in self.played_tiles() {
                if tile.colour() == to_move && self.last_moved() != Some(tile) {
                    self.generate_moves_for(out, tile, tile.bug_type(), to_move);
                }
            }
        }
    }

    /// Placements from hand. The first two moves of the game have special
    /// rules: white opens at the origin, black must join white's tile, and
    /// neither may open with the queen.
    fn generate_placements(&self, out: &mut Vec<HiveMove>, to_move: Colour, move_number: u32) {
        if move_number == 0 {
            for tile in Tile::for_colour(to_move) {
                if tile.bug_type() == BugType::Queen || !self.expansions().enables(tile.bug_type())
                {
                    continue;
                }
                out.push(HiveMove::Play { tile, reference: None, dir: Direction::Above });
            }
            return;
        }

        if move_number == 1 {
            let Some(&opening) = self.played_tiles().first() else { return };
            for tile in Tile::for_colour(to_move) {
                if tile.bug_type() == BugType::Queen || !self.expansions().enables(tile.bug_type())
                {
                    continue;
                }
                for dir in Direction::CARDINALS {
                    out.push(HiveMove::Play { tile, reference: Some(opening), dir });
                }
            }
            return;
        }

        // the queen must be down by each player's fourth placement
        let queen_placed = move_number >= 8 || self.is_in_play(Tile::queen(to_move));
        for tile in Tile::for_colour(to_move) {
            if self.is_in_play(tile) || !self.expansions().enables(tile.bug_type()) {
                continue;
            }
            if (move_number == 6 || move_number == 7)
                && !queen_placed
                && tile.bug_type() != BugType::Queen
            {
                continue;
            }

            for &pos in self.influence(to_move) {
                if self.top_tile_at(pos).is_some() {
                    continue;
                }
                if self.influence(to_move.other()).contains(&pos) {
                    continue;
                }
                // any neighbouring tile serves as the reference
                for dir in Direction::CARDINALS {
                    if let Some(neighbour) = self.top_tile_at(pos + dir.offset()) {
                        out.push(HiveMove::Play {
                            tile,
                            reference: Some(neighbour),
                            dir: dir.opposite(),
                        });
                    }
                }
            }
        }
    }

    /// Moves for one tile acting as `acting` (which differs from the tile's
    /// own type only for the Mosquito's copied turns).
    pub(crate) fn generate_moves_for(
        &self,
        out: &mut Vec<HiveMove>,
        tile: Tile,
        acting: BugType,
        to_move: Colour,
    ) {
        let start = self.position_of(tile);
        let mut destinations = FxHashSet::default();

        match acting {
            BugType::Queen => self.slide_destinations(tile, start, Some(1), &mut destinations),
            BugType::Ant => self.slide_destinations(tile, start, None, &mut destinations),
            BugType::Grasshopper => self.grasshopper_destinations(tile, start, &mut destinations),
            BugType::Spider => self.slide_destinations(tile, start, Some(3), &mut destinations),
            BugType::Beetle => {
                self.climb_destinations(tile, start, &mut destinations);
                if start.h == 0 {
                    self.slide_destinations(tile, start, Some(1), &mut destinations);
                }
            }
            BugType::Mosquito => {
                self.mosquito_moves(out, tile, start, to_move);
            }
            BugType::Ladybug => self.ladybug_destinations(tile, start, &mut destinations),
            BugType::Pillbug => {
                self.slide_destinations(tile, start, Some(1), &mut destinations);
                // the special constructs its own moves: it moves other tiles
                self.pillbug_specials(out, tile, start);
            }
        }

        self.emit_moves(out, tile, start, &destinations);
    }

    /// Attach each destination to its reference tiles. On top of the hive
    /// the reference is the destination stack's current top; on the ground
    /// every occupied neighbour yields one encoding, with the mover's own
    /// stack represented by the tile underneath it.
    fn emit_moves(
        &self,
        out: &mut Vec<HiveMove>,
        tile: Tile,
        start: Position,
        destinations: &FxHashSet<Position>,
    ) {
        for &to_pos in destinations {
            if to_pos.h > 0 {
                if let Some(top) = self.top_tile_at(to_pos) {
                    out.push(HiveMove::Play {
                        tile,
                        reference: Some(top),
                        dir: Direction::Above,
                    });
                }
                continue;
            }

            for dir in Direction::CARDINALS {
                let Some(neighbour) = self.top_tile_at(to_pos + dir.offset()) else {
                    continue;
                };
                if neighbour == tile {
                    // the mover itself: only usable as a reference when it
                    // sits on a stack that stays behind
                    if start.h > 0 {
                        if let Some(below) = self.tile_below(start) {
                            out.push(HiveMove::Play {
                                tile,
                                reference: Some(below),
                                dir: dir.opposite(),
                            });
                        }
                    }
                } else {
                    out.push(HiveMove::Play {
                        tile,
                        reference: Some(neighbour),
                        dir: dir.opposite(),
                    });
                }
            }
        }
    }

    /// Ground-level sliding: DFS over steps that are empty, un-gated and
    /// hive-connected with the mover's start cell vacated. `limit` is the
    /// exact distance to emit at (queen 1, spider 3); `None` emits every
    /// reachable cell (ant).
    fn slide_destinations(
        &self,
        tile: Tile,
        start: Position,
        limit: Option<u8>,
        out: &mut FxHashSet<Position>,
    ) {
        if self.is_pinned(tile) || self.is_covered(tile) {
            return;
        }
        let mut search = SlideSearch { start, limit, visited: FxHashSet::default() };
        self.slide_step(&mut search, out, start, None, 1);
    }

    fn slide_step(
        &self,
        search: &mut SlideSearch,
        out: &mut FxHashSet<Position>,
        pos: Position,
        arrived_from: Option<Direction>,
        depth: u8,
    ) {
        search.visited.insert(pos);
        for dir in Direction::CARDINALS {
            if arrived_from == Some(dir) {
                continue;
            }
            let next = pos + dir.offset();
            if search.visited.contains(&next) || self.top_tile_at(next).is_some() {
                continue;
            }
            if self.is_gated(pos, dir, search.start) || !self.is_connected(next, search.start) {
                continue;
            }

            match search.limit {
                None => {
                    out.insert(next);
                    self.slide_step(search, out, next, Some(dir.opposite()), depth + 1);
                }
                Some(limit) if depth == limit => {
                    out.insert(next);
                }
                Some(_) => {
                    // a fixed-distance slide may not revisit cells within a
                    // path, but other paths may: backtrack the mark
                    self.slide_step(search, out, next, Some(dir.opposite()), depth + 1);
                    search.visited.remove(&next);
                }
            }
        }
    }

    /// One climbing step in any direction: up onto an adjacent stack,
    /// across the hive, or down (onto a lower stack or empty ground).
    /// Upward steps are gated at the target height, lateral and downward
    /// steps at the mover's current height.
    fn climb_destinations(&self, tile: Tile, start: Position, out: &mut FxHashSet<Position>) {
        if self.is_pinned(tile) || self.is_covered(tile) {
            return;
        }

        let ground = start.grounded();
        for dir in Direction::CARDINALS {
            match self.top_tile_at(ground + dir.offset()) {
                Some(neighbour) => {
                    let to_pos = self.position_of(neighbour) + Direction::Above.offset();
                    if to_pos.h > start.h {
                        let at_target_height = Position::new(start.q, start.r, to_pos.h);
                        if !self.is_gated(at_target_height, dir, Position::NULL) {
                            out.insert(to_pos);
                        }
                    } else if !self.is_gated(start, dir, Position::NULL) {
                        out.insert(to_pos);
                    }
                }
                None => {
                    let to_pos = ground + dir.offset();
                    if to_pos.h < start.h && !self.is_gated(start, dir, Position::NULL) {
                        out.insert(to_pos);
                    }
                }
            }
        }
    }

    /// Straight-line jumps: over the contiguous run of occupied cells in
    /// each direction, landing on the first empty cell past it.
    fn grasshopper_destinations(&self, tile: Tile, start: Position, out: &mut FxHashSet<Position>) {
        if self.is_pinned(tile) || self.is_covered(tile) {
            return;
        }

        for dir in Direction::CARDINALS {
            let mut pos = start + dir.offset();
            if self.top_tile_at(pos).is_none() {
                continue;
            }
            while self.top_tile_at(pos).is_some() {
                pos += dir.offset();
            }
            out.insert(pos);
        }
    }

    /// Exactly three climbing steps: up onto the hive, across the top, and
    /// down to an empty ground cell that is not the starting cell.
    fn ladybug_destinations(&self, tile: Tile, start: Position, out: &mut FxHashSet<Position>) {
        if self.is_pinned(tile) || self.is_covered(tile) {
            return;
        }

        let mut first = FxHashSet::default();
        self.climb_destinations(tile, start, &mut first);

        let mut second = FxHashSet::default();
        for &pos in &first {
            self.climb_destinations(tile, pos, &mut second);
        }

        let above_start = start + Direction::Above.offset();
        let mut third = FxHashSet::default();
        for &pos in &second {
            // the middle step stays on top of the hive and may not perch on
            // the ladybug's own stack
            if pos.h == 0 || pos == above_start {
                continue;
            }
            self.climb_destinations(tile, pos, &mut third);
        }

        for &pos in &third {
            if pos.h == 0 {
                out.insert(pos);
            }
        }
    }

    /// Copy the movement of each distinct neighbouring bug type for this
    /// turn. Adjacent mosquitoes copy nothing; the Queen's and Spider's
    /// slides are subsumed by an adjacent Ant's. On top of the hive a
    /// mosquito is just a beetle.
    fn mosquito_moves(&self, out: &mut Vec<HiveMove>, tile: Tile, start: Position, to_move: Colour) {
        // no pin check here: a pinned mosquito next to a pillbug may still
        // copy the throw
        if self.is_covered(tile) {
            return;
        }

        if start.h > 0 {
            self.generate_moves_for(out, tile, BugType::Beetle, to_move);
            return;
        }

        let mut seen = [false; NUM_BUG_TYPES];
        for dir in Direction::CARDINALS {
            if let Some(neighbour) = self.top_tile_at(start + dir.offset()) {
                seen[neighbour.bug_type() as usize] = true;
            }
        }

        for bug in BugType::ALL {
            if !seen[bug as usize] || bug == BugType::Mosquito {
                continue;
            }
            if matches!(bug, BugType::Queen | BugType::Spider) && seen[BugType::Ant as usize] {
                continue;
            }
            self.generate_moves_for(out, tile, bug, to_move);
        }
    }

    /// The Pillbug's throw: lift an adjacent ground-level tile over itself
    /// and drop it on an adjacent empty cell. Both the lift and the drop
    /// pass over the pillbug at height 1, so either is blocked by a gate up
    /// there. Works while the pillbug itself is pinned, but never moves a
    /// pinned, covered or just-moved target.
    fn pillbug_specials(&self, out: &mut Vec<HiveMove>, tile: Tile, start: Position) {
        if self.is_covered(tile) {
            return;
        }

        let above = start + Direction::Above.offset();
        let mut targets: Vec<Tile> = Vec::new();
        let mut drops: Vec<Position> = Vec::new();

        for dir in Direction::CARDINALS {
            if self.is_gated(above, dir, Position::NULL) {
                continue;
            }
            let pos = start + dir.offset();
            match self.top_tile_at(pos) {
                Some(target) => {
                    if !self.is_pinned(target)
                        && !self.is_covered(target)
                        && self.last_moved() != Some(target)
                        && self.position_of(target).h == 0
                    {
                        targets.push(target);
                    }
                }
                None => drops.push(pos),
            }
        }

        for &target in &targets {
            for &drop in &drops {
                for dir in Direction::CARDINALS {
                    let Some(reference) = self.top_tile_at(drop + dir.offset()) else {
                        continue;
                    };
                    if reference != target {
                        out.push(HiveMove::Play {
                            tile: target,
                            reference: Some(reference),
                            dir: dir.opposite(),
                        });
                    }
                }
            }
        }
    }
}
