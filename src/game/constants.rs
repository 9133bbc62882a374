//! Table limits and default settings.

use super::entities::Chips;

/// Seats available at a single table.
pub const MAX_PLAYERS: usize = 6;

/// A hand of poker needs at least two contestants.
pub const MIN_PLAYERS: usize = 2;

/// Starting stack for a freshly seated player.
pub const DEFAULT_BUY_IN: Chips = 100;

/// The big blind doubles as the table's minimum bet.
pub const DEFAULT_MIN_BET: Chips = 2;

/// The table deck is built from this many standard 52-card decks.
pub const DEFAULT_NUM_DECKS: usize = 2;

/// Hole cards dealt to each player.
pub const HOLE_SIZE: usize = 2;

/// Community cards dealt per hand.
pub const BOARD_SIZE: usize = 5;

/// Cards visible to a player at showdown (hole + board).
pub const HAND_SIZE: usize = HOLE_SIZE + BOARD_SIZE;

/// Number of betting streets in a hand.
pub const NUM_STREETS: usize = 4;

/// How many illegal responses a single turn tolerates before the
/// round gives up on the action provider.
pub const MAX_REPROMPTS: usize = 100;

/// Player names longer than this are truncated.
pub const MAX_NAME_LENGTH: usize = 16;
