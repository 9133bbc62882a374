//! Pots and the FIFO pot ledger.
//!
//! A hand opens with a single main pot covering every dealt-in seat. After
//! each street the newest pot absorbs that street's contributions a layer
//! at a time: the lowest contribution among its eligible seats is moved in
//! for each of them, and any seats left with chips on the table spawn a
//! side pot scoped to exactly those seats. Settlement order is significant,
//! so the ledger is strictly first-in, first-out: the main pot is always
//! settled before the side pots it spawned.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use super::GameError;
use super::entities::{Chips, Player, SeatIndex};

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Pot {
    pub total: Chips,
    /// Seats whose contribution reached this layer. A seat that folds
    /// later in the hand stays listed here; the showdown filters the
    /// folded out by intersecting with the live ring.
    pub eligible: Vec<SeatIndex>,
}

impl Pot {
    #[must_use]
    pub fn new(eligible: Vec<SeatIndex>) -> Self {
        Self { total: 0, eligible }
    }

    /// Absorb one contribution layer: move the lowest current contribution
    /// among the eligible seats into this pot (once per seat) and knock
    /// that amount off every seat's outstanding contribution. Seats still
    /// holding chips afterwards form the next side pot, returned for the
    /// caller to enqueue.
    pub fn absorb(&mut self, players: &mut [Player]) -> Option<Pot> {
        let lowest = self
            .eligible
            .iter()
            .map(|&seat| players[seat].current_pot_contrib)
            .min()?;

        let mut leftover = Vec::new();
        for &seat in &self.eligible {
            players[seat].current_pot_contrib -= lowest;
            self.total += lowest;
            if players[seat].current_pot_contrib > 0 {
                leftover.push(seat);
            }
        }

        if leftover.is_empty() {
            None
        } else {
            Some(Pot::new(leftover))
        }
    }
}

impl fmt::Display for Pot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} chips, {} seats", self.total, self.eligible.len())
    }
}

/// FIFO sequence of pots, oldest (main) first.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct PotLedger {
    pots: VecDeque<Pot>,
}

impl PotLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a fresh pot at the back of the ledger.
    pub fn open(&mut self, eligible: Vec<SeatIndex>) {
        self.pots.push_back(Pot::new(eligible));
    }

    /// Remove and return the oldest pot. An empty ledger here means
    /// settlement was attempted with no pots at all, which is an
    /// invariant violation, not a recoverable state.
    pub fn pop_front(&mut self) -> Result<Pot, GameError> {
        self.pots.pop_front().ok_or(GameError::EmptyLedger)
    }

    /// Settle one street: layer the outstanding contributions into the
    /// newest pot, pushing one side pot per distinct leftover level.
    pub fn settle_street(&mut self, players: &mut [Player]) -> Result<(), GameError> {
        let newest = self.pots.back_mut().ok_or(GameError::EmptyLedger)?;
        let mut spawned = newest.absorb(players);
        while let Some(mut pot) = spawned {
            spawned = pot.absorb(players);
            self.pots.push_back(pot);
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pots.is_empty()
    }

    /// Chips sitting in all pots combined.
    #[must_use]
    pub fn total(&self) -> Chips {
        self.pots.iter().map(|pot| pot.total).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pot> {
        self.pots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::Username;

    fn players_with_contribs(contribs: &[Chips]) -> Vec<Player> {
        contribs
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let mut p = Player::new(Username::new(&format!("p{i}")), 0);
                p.current_pot_contrib = c;
                p.total_pot_contrib = c;
                p
            })
            .collect()
    }

    #[test]
    fn test_equal_contributions_single_pot() {
        let mut players = players_with_contribs(&[20, 20, 20]);
        let mut ledger = PotLedger::new();
        ledger.open(vec![0, 1, 2]);
        ledger.settle_street(&mut players).unwrap();

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.total(), 60);
        assert!(players.iter().all(|p| p.current_pot_contrib == 0));
    }

    #[test]
    fn test_unequal_all_ins_layer_into_side_pots() {
        // Contributions 50/100/200: layers of 50, 50, 100 over 3, 2, 1
        // contributors.
        let mut players = players_with_contribs(&[50, 100, 200]);
        let mut ledger = PotLedger::new();
        ledger.open(vec![0, 1, 2]);
        ledger.settle_street(&mut players).unwrap();

        let pots: Vec<_> = ledger.iter().cloned().collect();
        assert_eq!(pots.len(), 3);
        assert_eq!(pots[0].total, 150);
        assert_eq!(pots[0].eligible, vec![0, 1, 2]);
        assert_eq!(pots[1].total, 100);
        assert_eq!(pots[1].eligible, vec![1, 2]);
        assert_eq!(pots[2].total, 100);
        assert_eq!(pots[2].eligible, vec![2]);
        assert_eq!(ledger.total(), 350);
    }

    #[test]
    fn test_zero_contribution_seat_spawns_side_pot() {
        // A seat that never put chips in this street holds the layer at
        // zero; everyone else's chips move to a side pot without them.
        let mut players = players_with_contribs(&[0, 30, 30]);
        let mut ledger = PotLedger::new();
        ledger.open(vec![0, 1, 2]);
        ledger.settle_street(&mut players).unwrap();

        let pots: Vec<_> = ledger.iter().cloned().collect();
        assert_eq!(pots.len(), 2);
        assert_eq!(pots[0].total, 0);
        assert_eq!(pots[1].total, 60);
        assert_eq!(pots[1].eligible, vec![1, 2]);
    }

    #[test]
    fn test_settlement_across_two_streets() {
        // Street one: even money. Street two: one seat short.
        let mut players = players_with_contribs(&[10, 10, 10]);
        let mut ledger = PotLedger::new();
        ledger.open(vec![0, 1, 2]);
        ledger.settle_street(&mut players).unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.total(), 30);

        for (seat, amount) in [(0usize, 5u32), (1, 20), (2, 20)] {
            players[seat].current_pot_contrib = amount;
        }
        ledger.settle_street(&mut players).unwrap();

        let pots: Vec<_> = ledger.iter().cloned().collect();
        assert_eq!(pots.len(), 2);
        assert_eq!(pots[0].total, 45); // 30 + 5 from each of three seats
        assert_eq!(pots[1].total, 30);
        assert_eq!(pots[1].eligible, vec![1, 2]);
    }

    #[test]
    fn test_pop_front_is_fifo() {
        let mut players = players_with_contribs(&[50, 100, 100]);
        let mut ledger = PotLedger::new();
        ledger.open(vec![0, 1, 2]);
        ledger.settle_street(&mut players).unwrap();

        let main = ledger.pop_front().unwrap();
        assert_eq!(main.eligible, vec![0, 1, 2]);
        let side = ledger.pop_front().unwrap();
        assert_eq!(side.eligible, vec![1, 2]);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_empty_ledger_dequeue_is_fatal() {
        let mut ledger = PotLedger::new();
        assert!(matches!(ledger.pop_front(), Err(GameError::EmptyLedger)));
        let mut players = players_with_contribs(&[]);
        assert!(matches!(
            ledger.settle_street(&mut players),
            Err(GameError::EmptyLedger)
        ));
    }

    #[test]
    fn test_conservation_through_settlement() {
        let contribs = [37u32, 12, 99, 40];
        let before: Chips = contribs.iter().sum();
        let mut players = players_with_contribs(&contribs);
        let mut ledger = PotLedger::new();
        ledger.open(vec![0, 1, 2, 3]);
        ledger.settle_street(&mut players).unwrap();

        let outstanding: Chips = players.iter().map(|p| p.current_pot_contrib).sum();
        assert_eq!(outstanding, 0);
        assert_eq!(ledger.total(), before);
    }
}
