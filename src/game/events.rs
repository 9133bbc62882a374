//! Queued presentation events.
//!
//! The engine never prints; everything worth narrating is pushed onto the
//! table's event queue and drained by the caller.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::betting::Action;
use super::entities::{Card, Chips, HandRank, Street, Username};

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum GameEvent {
    SmallBlindPosted(Username, Chips),
    BigBlindPosted(Username, Chips),
    PlayerActed(Username, Action),
    PlayerQuit(Username),
    PlayerBusted(Username),
    StreetDealt(Street, Vec<Card>),
    HandRevealed(Username, HandRank),
    PotAwarded(Username, Chips),
    PotSplit(Vec<Username>, Chips),
    OddChipAwarded(Username),
    UncontestedWin(Username, Chips),
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::SmallBlindPosted(username, amount) => {
                format!("{username} posts the small blind ({amount})")
            }
            Self::BigBlindPosted(username, amount) => {
                format!("{username} posts the big blind ({amount})")
            }
            Self::PlayerActed(username, action) => format!("{username} {action}"),
            Self::PlayerQuit(username) => format!("{username} quit the table"),
            Self::PlayerBusted(username) => format!("{username} is out of chips"),
            Self::StreetDealt(street, cards) => {
                let cards = cards
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{street}: {cards}")
            }
            Self::HandRevealed(username, rank) => format!("{username} shows a {rank}"),
            Self::PotAwarded(username, amount) => format!("{username} wins {amount} chips"),
            Self::PotSplit(usernames, share) => {
                let usernames = usernames
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("split pot: {usernames} win {share} chips each")
            }
            Self::OddChipAwarded(username) => format!("{username} takes the odd chip"),
            Self::UncontestedWin(username, amount) => {
                format!("{username} takes {amount} chips uncontested")
            }
        };
        write!(f, "{repr}")
    }
}
