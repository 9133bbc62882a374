//! Street betting state machine.
//!
//! A [`BettingRound`] walks the live ring from a starting seat, soliciting
//! one [`Action`] at a time from an [`ActionProvider`]. Raises are
//! *raise-to*: the provider names the target total for the street, and the
//! round validates it against the minimum-raise rule. Illegal or
//! unaffordable actions never mutate state; the provider is simply asked
//! again.

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem::discriminant;

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

use super::GameError;
use super::constants;
use super::entities::{Chips, Player, SeatIndex, Username};
use super::events::GameEvent;
use super::ring::{NodeId, Ring};

/// What a player chose to do on their turn. `Bet` and `Raise` carry the
/// target street total, not the increment.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Action {
    AllIn,
    Bet(Chips),
    Call,
    Check,
    Fold,
    Quit,
    Raise(Chips),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::AllIn => "goes all-in",
            Self::Bet(amount) => &format!("bets {amount}"),
            Self::Call => "calls",
            Self::Check => "checks",
            Self::Fold => "folds",
            Self::Quit => "quits the table",
            Self::Raise(amount) => &format!("raises to {amount}"),
        };
        write!(f, "{repr}")
    }
}

/// An action offered to a player, annotated with the relevant amount
/// (chips to call, or the smallest legal target total).
#[derive(Clone, Debug, Deserialize, Serialize)]
pub enum ActionChoice {
    AllIn,
    Bet(Chips),
    Call(Chips),
    Check,
    Fold,
    Quit,
    Raise(Chips),
}

impl fmt::Display for ActionChoice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::AllIn => "all-in".to_string(),
            Self::Bet(amount) => format!("bet (>= {amount})"),
            Self::Call(amount) => format!("call (== {amount})"),
            Self::Check => "check".to_string(),
            Self::Fold => "fold".to_string(),
            Self::Quit => "quit".to_string(),
            Self::Raise(amount) => format!("raise (>= {amount})"),
        };
        write!(f, "{repr}")
    }
}

// The amounts within `ActionChoice::Call` and friends are advisory; set
// membership is by variant only. Amount validation happens when the
// action is applied.
impl Eq for ActionChoice {}

impl Hash for ActionChoice {
    fn hash<H: Hasher>(&self, state: &mut H) {
        discriminant(self).hash(state);
    }
}

impl PartialEq for ActionChoice {
    fn eq(&self, other: &Self) -> bool {
        discriminant(self) == discriminant(other)
    }
}

/// The set of actions legal for one turn.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ActionChoices(pub HashSet<ActionChoice>);

impl ActionChoices {
    #[must_use]
    pub fn contains(&self, action: &Action) -> bool {
        // ActionChoice hashes by variant discriminant, so the amounts
        // here are irrelevant.
        let choice = match action {
            Action::AllIn => ActionChoice::AllIn,
            Action::Bet(_) => ActionChoice::Bet(0),
            Action::Call => ActionChoice::Call(0),
            Action::Check => ActionChoice::Check,
            Action::Fold => ActionChoice::Fold,
            Action::Quit => ActionChoice::Quit,
            Action::Raise(_) => ActionChoice::Raise(0),
        };
        self.0.contains(&choice)
    }
}

impl fmt::Display for ActionChoices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let num_options = self.0.len();
        let repr = self
            .0
            .iter()
            .enumerate()
            .map(|(i, choice)| {
                let repr = choice.to_string();
                match i {
                    0 if num_options == 1 => repr,
                    i if i == num_options - 1 => format!("or {repr}"),
                    _ => format!("{repr}, "),
                }
            })
            .collect::<String>();
        write!(f, "{repr}")
    }
}

/// Everything a provider gets to see when asked to act.
#[derive(Clone, Debug)]
pub struct TurnPrompt {
    pub seat: SeatIndex,
    pub name: Username,
    /// Highest total committed on this street so far.
    pub stake: Chips,
    /// Size of the last raise increment on this street.
    pub last_raise: Chips,
    pub min_bet: Chips,
    pub money: Chips,
    pub current_bet: Chips,
    pub choices: ActionChoices,
}

/// Decision port for the betting round. Implementations answer one prompt
/// at a time; dispatch is via `enum_dispatch` over the built-in providers.
#[enum_dispatch]
pub trait ActionProvider {
    fn act(&mut self, prompt: &TurnPrompt) -> Action;
}

/// Compute the set of actions legal for `player` against the current
/// street stake. All-in, fold, and quit are always available; calling
/// (or checking) requires money left over after the call, and opening or
/// raising additionally requires covering the minimum raise increment.
#[must_use]
pub fn legal_choices(
    player: &Player,
    stake: Chips,
    last_raise: Chips,
    min_bet: Chips,
) -> ActionChoices {
    let mut choices = HashSet::from([ActionChoice::AllIn, ActionChoice::Fold, ActionChoice::Quit]);
    let to_call = stake.saturating_sub(player.current_bet);
    let min_increase = min_bet.max(2 * last_raise);
    if player.money > to_call {
        if to_call > 0 {
            choices.insert(ActionChoice::Call(to_call));
        } else {
            choices.insert(ActionChoice::Check);
        }
        if player.money >= to_call + min_increase {
            if stake == 0 {
                choices.insert(ActionChoice::Bet(min_increase));
            } else {
                choices.insert(ActionChoice::Raise(stake + min_increase));
            }
        }
    }
    ActionChoices(choices)
}

/// What a finished round hands back to the table.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RoundOutcome {
    /// Final street stake.
    pub stake: Chips,
    /// Final raise increment.
    pub last_raise: Chips,
    /// Seats that quit during the round. Quitting folds the hand and
    /// removes the player from the roster after the hand ends.
    pub eliminated: Vec<SeatIndex>,
}

/// One street of betting over the live ring.
#[derive(Debug)]
pub struct BettingRound {
    stake: Chips,
    last_raise: Chips,
    min_bet: Chips,
    /// The seat that opened or last raised; play closes when action
    /// returns here unraised.
    start: NodeId,
    cursor: NodeId,
}

impl BettingRound {
    #[must_use]
    pub fn new(start: NodeId, stake: Chips, last_raise: Chips, min_bet: Chips) -> Self {
        Self {
            stake,
            last_raise,
            min_bet,
            start,
            cursor: start,
        }
    }

    /// Drive the round to completion. Folded seats are deleted from the
    /// ring as they fold; on closure every remaining seat's street bet is
    /// reset to zero. Chips stay accounted in pot contributions for the
    /// following settlement.
    pub fn run<P: ActionProvider>(
        mut self,
        ring: &mut Ring<SeatIndex>,
        players: &mut [Player],
        provider: &mut P,
        events: &mut VecDeque<GameEvent>,
    ) -> Result<RoundOutcome, GameError> {
        let mut eliminated: Vec<SeatIndex> = Vec::new();
        let mut first_turn = true;

        while ring.len() > 1 {
            let seat = self.seat_at(ring, self.cursor)?;

            // Action has come back around to an unraised opener.
            if !first_turn && self.cursor == self.start {
                let opener = &players[seat];
                if opener.all_in || opener.current_bet == self.stake {
                    break;
                }
            }

            if players[seat].all_in {
                if ring.iter().all(|&s| players[s].all_in) {
                    break;
                }
                first_turn = false;
                self.cursor = ring.next(self.cursor).ok_or(GameError::EmptyRing)?;
                continue;
            }

            // A matched player with no live opponent left to respond
            // cannot be bet into again.
            if players[seat].current_bet >= self.stake && !self.another_actor(ring, players) {
                break;
            }

            let folded = self.solicit(seat, players, provider, events, &mut eliminated)?;

            let next = ring.next(self.cursor).ok_or(GameError::EmptyRing)?;
            if folded {
                // The opener folding hands the opener role to their
                // successor; the round must still reach everyone.
                if self.cursor == self.start {
                    self.start = next;
                }
                ring.delete_by(&seat, |s| *s);
            } else {
                first_turn = false;
            }
            self.cursor = next;
        }

        for &seat in ring.iter() {
            players[seat].current_bet = 0;
        }

        Ok(RoundOutcome {
            stake: self.stake,
            last_raise: self.last_raise,
            eliminated,
        })
    }

    /// Prompt the current seat until it produces a legal action, then
    /// apply it. Returns whether the seat folded out of the ring.
    fn solicit<P: ActionProvider>(
        &mut self,
        seat: SeatIndex,
        players: &mut [Player],
        provider: &mut P,
        events: &mut VecDeque<GameEvent>,
        eliminated: &mut Vec<SeatIndex>,
    ) -> Result<bool, GameError> {
        for _ in 0..constants::MAX_REPROMPTS {
            let prompt = self.prompt(seat, &players[seat]);
            let action = provider.act(&prompt);
            if !prompt.choices.contains(&action) {
                continue;
            }
            let name = players[seat].name.clone();
            match action {
                Action::Check => {
                    if players[seat].current_bet != self.stake {
                        continue;
                    }
                }
                Action::Call => {
                    if players[seat].current_bet >= self.stake {
                        continue;
                    }
                    players[seat].call(self.stake);
                }
                Action::Bet(total) | Action::Raise(total) => {
                    if total < self.min_bet || total <= self.stake {
                        continue;
                    }
                    let increase = total - self.stake;
                    if increase < self.min_bet.max(2 * self.last_raise) {
                        continue;
                    }
                    let cost = total - players[seat].current_bet;
                    if players[seat].raise_or_bet(cost).is_none() {
                        continue;
                    }
                    self.last_raise = increase;
                    self.stake = total;
                    self.start = self.cursor;
                }
                Action::AllIn => {
                    let new_bet = players[seat].go_all_in();
                    // A covering all-in re-opens action but leaves the
                    // raise increment unchanged (short all-ins do not
                    // reprice the minimum raise).
                    if new_bet > self.stake {
                        self.stake = new_bet;
                        self.start = self.cursor;
                    }
                }
                Action::Fold => {
                    players[seat].fold();
                    events.push_back(GameEvent::PlayerActed(name, action));
                    return Ok(true);
                }
                Action::Quit => {
                    players[seat].fold();
                    eliminated.push(seat);
                    events.push_back(GameEvent::PlayerQuit(name));
                    return Ok(true);
                }
            }
            events.push_back(GameEvent::PlayerActed(name, action));
            return Ok(false);
        }
        Err(GameError::ProviderStalled {
            username: players[seat].name.clone(),
        })
    }

    fn prompt(&self, seat: SeatIndex, player: &Player) -> TurnPrompt {
        TurnPrompt {
            seat,
            name: player.name.clone(),
            stake: self.stake,
            last_raise: self.last_raise,
            min_bet: self.min_bet,
            money: player.money,
            current_bet: player.current_bet,
            choices: legal_choices(player, self.stake, self.last_raise, self.min_bet),
        }
    }

    /// Whether any seat besides the cursor can still act. Scans the ring
    /// from the cursor's successor all the way around, excluding the
    /// cursor itself.
    fn another_actor(&self, ring: &Ring<SeatIndex>, players: &[Player]) -> bool {
        let Some(next) = ring.next(self.cursor) else {
            return false;
        };
        ring.search_by(&false, Some(next), Some(self.cursor), |seat| {
            players[*seat].all_in
        })
        .is_some()
    }

    fn seat_at(&self, ring: &Ring<SeatIndex>, node: NodeId) -> Result<SeatIndex, GameError> {
        ring.value(node).copied().ok_or(GameError::EmptyRing)
    }
}
