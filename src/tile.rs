//! # Tile Identities
//!
//! The closed set of the 28 physical tiles in a game of Hive with all three
//! expansions: per colour one Queen, three Ants, three Grasshoppers, two
//! Spiders, two Beetles, one Mosquito, one Ladybug and one Pillbug.
//!
//! A [`Tile`] is a dense `u8`-backed identity, usable directly as an array
//! index, from which colour, bug type and ordinal are pure decodings. Tiles
//! are fixed at game creation and never allocated or freed; only their
//! positions change.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of physical tiles across both colours.
pub const NUM_TILES: usize = 28;

/// Number of physical tiles per colour.
pub const NUM_TILES_PER_COLOUR: usize = 14;

/// Number of distinct bug types (all expansions enabled).
pub const NUM_BUG_TYPES: usize = 8;

/// How many copies of each bug type a player owns, indexed by [`BugType`].
pub const BUG_COUNTS: [u8; NUM_BUG_TYPES] = [1, 3, 3, 2, 2, 1, 1, 1];

/// The eight bug types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum BugType {
    Queen = 0,
    Ant,
    Grasshopper,
    Spider,
    Beetle,
    Mosquito,
    Ladybug,
    Pillbug,
}

impl BugType {
    pub const ALL: [BugType; NUM_BUG_TYPES] = [
        BugType::Queen,
        BugType::Ant,
        BugType::Grasshopper,
        BugType::Spider,
        BugType::Beetle,
        BugType::Mosquito,
        BugType::Ladybug,
        BugType::Pillbug,
    ];

    /// How many copies of this type each player owns.
    pub fn tile_count(self) -> u8 {
        BUG_COUNTS[self as usize]
    }

    /// The UHP letter for this type.
    pub fn letter(self) -> char {
        match self {
            BugType::Queen => 'Q',
            BugType::Ant => 'A',
            BugType::Grasshopper => 'G',
            BugType::Spider => 'S',
            BugType::Beetle => 'B',
            BugType::Mosquito => 'M',
            BugType::Ladybug => 'L',
            BugType::Pillbug => 'P',
        }
    }

    pub fn from_letter(letter: char) -> Option<BugType> {
        match letter {
            'Q' => Some(BugType::Queen),
            'A' => Some(BugType::Ant),
            'G' => Some(BugType::Grasshopper),
            'S' => Some(BugType::Spider),
            'B' => Some(BugType::Beetle),
            'M' => Some(BugType::Mosquito),
            'L' => Some(BugType::Ladybug),
            'P' => Some(BugType::Pillbug),
            _ => None,
        }
    }

    /// Offset of this type's first tile within a colour's 14-tile block.
    fn base_offset(self) -> u8 {
        let mut offset = 0;
        let mut i = 0;
        while i < self as usize {
            offset += BUG_COUNTS[i];
            i += 1;
        }
        offset
    }
}

/// Tile colours. Distinct from the player index on purpose: a Pillbug throw
/// moves a tile whose colour need not match the player performing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Colour {
    White = 0,
    Black = 1,
}

impl Colour {
    pub fn other(self) -> Colour {
        match self {
            Colour::White => Colour::Black,
            Colour::Black => Colour::White,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Which expansion bug types are in the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expansions {
    pub mosquito: bool,
    pub ladybug: bool,
    pub pillbug: bool,
}

impl Default for Expansions {
    fn default() -> Self {
        Self { mosquito: true, ladybug: true, pillbug: true }
    }
}

impl Expansions {
    /// The base game: no expansion bugs.
    pub const BASE: Expansions = Expansions { mosquito: false, ladybug: false, pillbug: false };

    pub fn enables(self, bug: BugType) -> bool {
        match bug {
            BugType::Mosquito => self.mosquito,
            BugType::Ladybug => self.ladybug,
            BugType::Pillbug => self.pillbug,
            _ => true,
        }
    }

    /// Number of bug types in play: 5 for the base game plus one per
    /// enabled expansion.
    pub fn num_bug_types(self) -> usize {
        5 + usize::from(self.mosquito) + usize::from(self.ladybug) + usize::from(self.pillbug)
    }
}

/// One of the 28 physical tiles, named as in the Universal Hive Protocol.
///
/// The discriminants are dense: white's 14 tiles are `0..14` in the order
/// Queen, Ants, Grasshoppers, Spiders, Beetles, Mosquito, Ladybug, Pillbug,
/// and black's mirror them at `14..28`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
#[allow(clippy::upper_case_acronyms)]
pub enum Tile {
    WQ = 0,
    WA1,
    WA2,
    WA3,
    WG1,
    WG2,
    WG3,
    WS1,
    WS2,
    WB1,
    WB2,
    WM,
    WL,
    WP,
    BQ,
    BA1,
    BA2,
    BA3,
    BG1,
    BG2,
    BG3,
    BS1,
    BS2,
    BB1,
    BB2,
    BM,
    BL,
    BP,
}

impl Tile {
    pub const ALL: [Tile; NUM_TILES] = [
        Tile::WQ,
        Tile::WA1,
        Tile::WA2,
        Tile::WA3,
        Tile::WG1,
        Tile::WG2,
        Tile::WG3,
        Tile::WS1,
        Tile::WS2,
        Tile::WB1,
        Tile::WB2,
        Tile::WM,
        Tile::WL,
        Tile::WP,
        Tile::BQ,
        Tile::BA1,
        Tile::BA2,
        Tile::BA3,
        Tile::BG1,
        Tile::BG2,
        Tile::BG3,
        Tile::BS1,
        Tile::BS2,
        Tile::BB1,
        Tile::BB2,
        Tile::BM,
        Tile::BL,
        Tile::BP,
    ];

    /// The dense index of this tile, for keying flat arrays.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Tile> {
        Tile::ALL.get(index).copied()
    }

    /// The 14 tiles of one colour, in canonical order.
    pub fn for_colour(colour: Colour) -> [Tile; NUM_TILES_PER_COLOUR] {
        let base = colour.index() * NUM_TILES_PER_COLOUR;
        let mut tiles = [Tile::WQ; NUM_TILES_PER_COLOUR];
        let mut i = 0;
        while i < NUM_TILES_PER_COLOUR {
            tiles[i] = Tile::ALL[base + i];
            i += 1;
        }
        tiles
    }

    /// The queen of a colour.
    pub fn queen(colour: Colour) -> Tile {
        match colour {
            Colour::White => Tile::WQ,
            Colour::Black => Tile::BQ,
        }
    }

    /// Look a tile up by its parts. `None` when `ordinal` is not in
    /// `1..=count` for the bug type.
    pub fn from_parts(colour: Colour, bug: BugType, ordinal: u8) -> Option<Tile> {
        if ordinal == 0 || ordinal > bug.tile_count() {
            return None;
        }
        let index =
            colour.index() * NUM_TILES_PER_COLOUR + bug.base_offset() as usize + ordinal as usize - 1;
        Tile::from_index(index)
    }

    pub fn colour(self) -> Colour {
        if self.index() < NUM_TILES_PER_COLOUR {
            Colour::White
        } else {
            Colour::Black
        }
    }

    pub fn bug_type(self) -> BugType {
        match self.index() % NUM_TILES_PER_COLOUR {
            0 => BugType::Queen,
            1..=3 => BugType::Ant,
            4..=6 => BugType::Grasshopper,
            7..=8 => BugType::Spider,
            9..=10 => BugType::Beetle,
            11 => BugType::Mosquito,
            12 => BugType::Ladybug,
            _ => BugType::Pillbug,
        }
    }

    /// Whether this is the first, second or third copy of its bug type.
    pub fn ordinal(self) -> u8 {
        let offset = (self.index() % NUM_TILES_PER_COLOUR) as u8;
        offset - self.bug_type().base_offset() + 1
    }
}

/// Tiles format as their UHP names: colour letter, bug letter, and the
/// ordinal digit for bug types with more than one copy (`wA2`, `bQ`).
impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let colour = match self.colour() {
            Colour::White => 'w',
            Colour::Black => 'b',
        };
        let bug = self.bug_type();
        write!(f, "{}{}", colour, bug.letter())?;
        if bug.tile_count() > 1 {
            write!(f, "{}", self.ordinal())?;
        }
        Ok(())
    }
}
