//! One-table hand orchestration.
//!
//! [`Table`] owns the roster, deck, board, ring, and pot ledger, and runs
//! a complete hand: blinds, hole cards, four betting streets with a pot
//! settlement after each, then the showdown. Decisions come in through an
//! [`ActionProvider`] and dealt hole cards go out through a
//! [`RecordSink`]; the engine itself touches neither terminal nor disk.

use std::collections::{HashMap, VecDeque};
use std::mem;

use super::GameError;
use super::betting::{ActionProvider, BettingRound};
use super::constants;
use super::entities::{Card, Chips, Deck, Player, SeatIndex, Street, TableSettings, Username};
use super::events::GameEvent;
use super::ledger::PotLedger;
use super::ring::Ring;
use super::showdown;

/// Write-only sink for dealt hole cards, so each player's cards can be
/// delivered privately however the embedding application sees fit.
pub trait RecordSink {
    fn record(&mut self, name: &Username, card: Card);
    fn clear(&mut self, name: &Username);
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRecorder;

impl RecordSink for NullRecorder {
    fn record(&mut self, _name: &Username, _card: Card) {}

    fn clear(&mut self, _name: &Username) {}
}

/// Keeps dealt cards in memory, keyed by player name.
#[derive(Debug, Default)]
pub struct MemoryRecorder {
    records: HashMap<Username, Vec<Card>>,
}

impl MemoryRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn cards(&self, name: &Username) -> &[Card] {
        self.records.get(name).map_or(&[], Vec::as_slice)
    }
}

impl RecordSink for MemoryRecorder {
    fn record(&mut self, name: &Username, card: Card) {
        self.records.entry(name.clone()).or_default().push(card);
    }

    fn clear(&mut self, name: &Username) {
        self.records.remove(name);
    }
}

#[derive(Debug)]
pub struct Table {
    settings: TableSettings,
    players: Vec<Player>,
    deck: Deck,
    community: Vec<Card>,
    ledger: PotLedger,
    ring: Ring<SeatIndex>,
    events: VecDeque<GameEvent>,
}

impl Table {
    /// Seat the named players with the configured buy-in.
    pub fn new<I>(settings: TableSettings, names: I) -> Result<Self, GameError>
    where
        I: IntoIterator<Item = Username>,
    {
        let players: Vec<Player> = names
            .into_iter()
            .map(|name| Player::new(name, settings.buy_in))
            .collect();
        if players.len() < constants::MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers(players.len()));
        }
        if players.len() > settings.max_seats {
            return Err(GameError::TooManyPlayers(players.len()));
        }
        let deck = Deck::new(settings.num_decks);
        Ok(Self {
            settings,
            players,
            deck,
            community: Vec::with_capacity(constants::BOARD_SIZE),
            ledger: PotLedger::new(),
            ring: Ring::new(),
            events: VecDeque::new(),
        })
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn community(&self) -> &[Card] {
        &self.community
    }

    #[must_use]
    pub fn settings(&self) -> &TableSettings {
        &self.settings
    }

    /// Take everything queued since the last drain.
    pub fn drain_events(&mut self) -> VecDeque<GameEvent> {
        mem::take(&mut self.events)
    }

    /// Rebuild the ring from seats that can still pay, reset per-hand
    /// player state, then deal hole cards round-robin and the full board.
    fn deal<R: RecordSink>(&mut self, recorder: &mut R) -> Result<(), GameError> {
        self.ring = Ring::new();
        self.community.clear();
        for (seat, player) in self.players.iter_mut().enumerate() {
            if player.money > 0 {
                player.reset_hand();
                recorder.clear(&player.name);
                self.ring.insert_tail(seat);
            }
        }
        if self.ring.len() < constants::MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers(self.ring.len()));
        }

        self.deck.shuffle();
        let order = self.ring.to_vec();
        for _ in 0..constants::HOLE_SIZE {
            for &seat in &order {
                let card = self.deck.deal_card()?;
                self.players[seat].deal_hole_card(card);
                recorder.record(&self.players[seat].name, card);
            }
        }
        for _ in 0..constants::BOARD_SIZE {
            self.community.push(self.deck.deal_card()?);
        }
        Ok(())
    }

    /// Post a blind, going all-in when the stack cannot cover it.
    fn post_blind(&mut self, seat: SeatIndex, amount: Chips) -> Chips {
        let player = &mut self.players[seat];
        match player.raise_or_bet(amount) {
            Some(bet) => bet,
            None => player.go_all_in(),
        }
    }

    /// Play one complete hand.
    ///
    /// The button sits at the ring tail, so the small blind is the head
    /// and the big blind follows it; pre-flop action starts after the
    /// big blind. After the hand the ledger is empty, quitters and
    /// busted players are unseated, and the roster head rotates to the
    /// tail so the button advances.
    pub fn play_hand<P, R>(&mut self, provider: &mut P, recorder: &mut R) -> Result<(), GameError>
    where
        P: ActionProvider,
        R: RecordSink,
    {
        self.deal(recorder)?;
        let min_bet = self.settings.min_bet;

        let sb_node = self.ring.head().ok_or(GameError::EmptyRing)?;
        let bb_node = self.ring.next(sb_node).ok_or(GameError::EmptyRing)?;
        let sb_seat = *self.ring.value(sb_node).ok_or(GameError::EmptyRing)?;
        let bb_seat = *self.ring.value(bb_node).ok_or(GameError::EmptyRing)?;

        let posted = self.post_blind(bb_seat, min_bet);
        self.events.push_back(GameEvent::BigBlindPosted(
            self.players[bb_seat].name.clone(),
            posted,
        ));
        let posted = self.post_blind(sb_seat, min_bet / 2);
        self.events.push_back(GameEvent::SmallBlindPosted(
            self.players[sb_seat].name.clone(),
            posted,
        ));
        let button_node = self.ring.tail().ok_or(GameError::EmptyRing)?;
        let button_seat = *self.ring.value(button_node).ok_or(GameError::EmptyRing)?;
        log::debug!(
            "hand start: {} seats, button {}",
            self.ring.len(),
            self.players[button_seat].name
        );

        self.ledger.open(self.ring.to_vec());
        let first_actor = self.ring.next(bb_node).ok_or(GameError::EmptyRing)?;

        let mut eliminated: Vec<SeatIndex> = Vec::new();
        for street in Street::ALL {
            if self.ring.len() <= 1 {
                break;
            }
            let (start, stake) = match street {
                Street::PreFlop => (first_actor, min_bet),
                Street::Flop => {
                    self.events.push_back(GameEvent::StreetDealt(
                        street,
                        self.community[..3].to_vec(),
                    ));
                    (self.ring.head().ok_or(GameError::EmptyRing)?, 0)
                }
                Street::Turn | Street::River => {
                    let index = if street == Street::Turn { 3 } else { 4 };
                    self.events.push_back(GameEvent::StreetDealt(
                        street,
                        vec![self.community[index]],
                    ));
                    (self.ring.head().ok_or(GameError::EmptyRing)?, 0)
                }
            };
            let round = BettingRound::new(start, stake, 0, min_bet);
            let outcome = round.run(&mut self.ring, &mut self.players, provider, &mut self.events)?;
            eliminated.extend(outcome.eliminated);
            self.ledger.settle_street(&mut self.players)?;
            log::debug!("{street} settled, pot stands at {}", self.ledger.total());
        }

        if self.ring.len() <= 1 {
            showdown::resolve_uncontested(
                &mut self.ledger,
                &mut self.players,
                &self.ring,
                &mut self.events,
            )?;
        } else {
            showdown::resolve_showdown(
                &mut self.ledger,
                &mut self.players,
                &self.ring,
                &self.community,
                &mut self.events,
            )?;
        }

        self.recycle_cards();
        self.unseat(&mut eliminated);
        if !self.players.is_empty() {
            self.players.rotate_left(1);
        }
        Ok(())
    }

    /// Return every dealt card to the deck for the next shuffle.
    fn recycle_cards(&mut self) {
        for player in &mut self.players {
            let hole = mem::take(&mut player.hole);
            self.deck.add_cards(hole);
        }
        let board = mem::take(&mut self.community);
        self.deck.add_cards(board);
    }

    /// Remove quitters and busted players from the roster. Seat indices
    /// shift, which is fine between hands: the ring and ledger are both
    /// rebuilt by the next deal.
    fn unseat(&mut self, eliminated: &mut Vec<SeatIndex>) {
        for (seat, player) in self.players.iter().enumerate() {
            if player.money == 0 && !eliminated.contains(&seat) {
                self.events
                    .push_back(GameEvent::PlayerBusted(player.name.clone()));
                eliminated.push(seat);
            }
        }
        eliminated.sort_unstable();
        eliminated.dedup();
        for &seat in eliminated.iter().rev() {
            let player = self.players.remove(seat);
            log::info!("{} leaves the table with {} chips", player.name, player.money);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::betting::Action;
    use crate::game::providers::{CallingProvider, ScriptedProvider};

    fn table_of(count: usize) -> Table {
        let names = (0..count).map(|i| Username::new(&format!("p{i}")));
        Table::new(TableSettings::default(), names).expect("valid table")
    }

    fn total_money(table: &Table) -> Chips {
        table.players().iter().map(|p| p.money).sum()
    }

    #[test]
    fn test_new_rejects_bad_seat_counts() {
        let one = vec![Username::new("solo")];
        assert!(matches!(
            Table::new(TableSettings::default(), one),
            Err(GameError::NotEnoughPlayers(1))
        ));
        let crowd = (0..7).map(|i| Username::new(&format!("p{i}")));
        assert!(matches!(
            Table::new(TableSettings::default(), crowd),
            Err(GameError::TooManyPlayers(7))
        ));
    }

    #[test]
    fn test_checked_down_hand_conserves_chips() {
        let mut table = table_of(3);
        let before = total_money(&table);
        let mut provider = CallingProvider;
        table.play_hand(&mut provider, &mut NullRecorder).unwrap();
        assert_eq!(total_money(&table), before);
        // Street bets and contributions are all swept.
        assert!(
            table
                .players()
                .iter()
                .all(|p| p.current_bet == 0 && p.current_pot_contrib == 0)
        );
    }

    #[test]
    fn test_button_rotates_between_hands() {
        let mut table = table_of(3);
        let first = table.players()[0].name.clone();
        let mut provider = CallingProvider;
        table.play_hand(&mut provider, &mut NullRecorder).unwrap();
        if table.players().len() == 3 {
            assert_eq!(table.players()[2].name, first);
        }
    }

    #[test]
    fn test_quitter_is_unseated() {
        let mut table = table_of(3);
        let before = total_money(&table);
        // Seat 2 acts first pre-flop (after the big blind) and quits.
        let mut provider = ScriptedProvider::new([(2, vec![Action::Quit])]);
        table.play_hand(&mut provider, &mut NullRecorder).unwrap();
        assert_eq!(table.players().len(), 2);
        // The quitter left with their stack, everything else stays.
        assert_eq!(total_money(&table), before - 100);
    }

    #[test]
    fn test_hole_cards_reach_the_recorder() {
        let mut table = table_of(2);
        let names: Vec<Username> = table.players().iter().map(|p| p.name.clone()).collect();
        let mut recorder = MemoryRecorder::new();
        let mut provider = CallingProvider;
        table.play_hand(&mut provider, &mut recorder).unwrap();
        for name in &names {
            assert_eq!(recorder.cards(name).len(), constants::HOLE_SIZE);
        }
    }

    #[test]
    fn test_deck_is_replenished_across_hands() {
        let mut table = table_of(3);
        let mut provider = CallingProvider;
        // Far more hands than a two-deck shoe could cover without the
        // recycle step.
        for _ in 0..20 {
            if table.players().len() < constants::MIN_PLAYERS {
                break;
            }
            table.play_hand(&mut provider, &mut NullRecorder).unwrap();
        }
    }

    #[test]
    fn test_events_narrate_the_hand() {
        let mut table = table_of(3);
        let mut provider = CallingProvider;
        table.play_hand(&mut provider, &mut NullRecorder).unwrap();
        let events = table.drain_events();
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::BigBlindPosted(_, 2)))
        );
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::SmallBlindPosted(_, 1)))
        );
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::StreetDealt(Street::Flop, cards) if cards.len() == 3))
        );
        assert!(table.drain_events().is_empty());
    }
}
