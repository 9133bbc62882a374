//! Hold'em rules engine: turn ring, betting rounds, pot ledger, hand
//! evaluation, and showdown resolution.
//!
//! The pieces compose bottom-up:
//! - [`ring`]: index-based circular roster of live seats
//! - [`betting`]: one street of action over the ring
//! - [`ledger`]: FIFO pot ledger with side-pot layering
//! - [`eval`]: pure best-of-seven hand evaluation
//! - [`showdown`]: pot resolution, tie-breaks, and payouts
//! - [`table`]: a full hand from blinds to payouts

use serde::{Deserialize, Serialize};
use thiserror::Error;

use entities::Username;

pub mod betting;
pub mod constants;
pub mod entities;
pub mod eval;
pub mod events;
pub mod ledger;
pub mod providers;
pub mod ring;
pub mod showdown;
pub mod table;

/// Unrecoverable engine failures. Rule violations by a provider are not
/// errors; they re-prompt. These indicate a broken invariant or a table
/// that cannot continue.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum GameError {
    #[error("the deck ran out of cards")]
    DeckExhausted,
    #[error("dequeued from an empty pot ledger")]
    EmptyLedger,
    #[error("the turn ring is empty")]
    EmptyRing,
    #[error("need 2+ players, got {0}")]
    NotEnoughPlayers(usize),
    #[error("no eligible winner for a pot")]
    NoEligibleWinner,
    #[error("{username} kept choosing illegal actions")]
    ProviderStalled { username: Username },
    #[error("too many players for the table, got {0}")]
    TooManyPlayers(usize),
}
