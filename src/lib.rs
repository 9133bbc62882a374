//! # Hold'em Engine
//!
//! A Texas Hold'em rules engine built around a handful of explicit data
//! structures rather than a tangle of table state:
//!
//! - a circular [`Ring`](game::ring::Ring) of live seats drives turn
//!   order, blinds, and button rotation
//! - a FIFO [`PotLedger`](game::ledger::PotLedger) layers side pots so
//!   short all-ins are settled exactly
//! - a pure best-of-seven evaluator ranks hands without ever mutating a
//!   card
//! - betting decisions come in through an
//!   [`ActionProvider`](game::betting::ActionProvider) port and dealt
//!   cards go out through a [`RecordSink`](game::table::RecordSink), so
//!   the engine itself has no I/O
//!
//! ## Example
//!
//! ```
//! use holdem_engine::{CallingProvider, NullRecorder, Table, TableSettings, Username};
//!
//! let names = ["alice", "bob", "carol"].map(Username::new);
//! let mut table = Table::new(TableSettings::default(), names).unwrap();
//! let mut provider = CallingProvider;
//! table.play_hand(&mut provider, &mut NullRecorder).unwrap();
//! for event in table.drain_events() {
//!     println!("{event}");
//! }
//! ```

pub mod game;
pub use game::{
    GameError,
    betting::{Action, ActionChoice, ActionChoices, ActionProvider, BettingRound, TurnPrompt},
    constants,
    entities::{
        Card, Chips, Deck, HandRank, HandValue, Player, SeatIndex, Street, Suit, TableSettings,
        Username, Value,
    },
    eval::evaluate,
    events::GameEvent,
    ledger::{Pot, PotLedger},
    providers::{CallingProvider, FoldingProvider, ScriptedProvider, TableProvider},
    ring::{NodeId, Ring},
    showdown::{find_winners, resolve_showdown},
    table::{MemoryRecorder, NullRecorder, RecordSink, Table},
};
