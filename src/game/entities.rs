use rand::seq::SliceRandom;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::{GameError, constants};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Clubs,
    Spades,
    Diamonds,
    Hearts,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Spades, Suit::Diamonds, Suit::Hearts];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Clubs => "Clubs",
            Self::Spades => "Spades",
            Self::Diamonds => "Diamonds",
            Self::Hearts => "Hearts",
        };
        write!(f, "{repr}")
    }
}

/// Card strength. Deuce is 2, face cards run Jack=11 through Ace=14.
/// Straight evaluation may treat an Ace as 1 locally, but a stored card
/// always carries its canonical value.
pub type Value = u8;

/// A card is a tuple of strength value and suit. Identity, equality, and
/// hashing are (value, suit) only.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card(pub Value, pub Suit);

impl Card {
    #[must_use]
    pub fn rank_name(&self) -> String {
        match self.0 {
            11 => "Jack".to_string(),
            12 => "Queen".to_string(),
            13 => "King".to_string(),
            1 | 14 => "Ace".to_string(),
            v => v.to_string(),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} of {}", self.rank_name(), self.1)
    }
}

/// Type alias for whole chips. All bets and stacks are whole chips;
/// there's no point arguing over fractions of a chip.
pub type Chips = u32;

/// Type alias for seat positions during a hand.
pub type SeatIndex = usize;

/// The ten hand categories, numbered 1 (best) through 10. The derived
/// ordering puts `RoyalFlush` first, so the *minimum* rank wins a showdown.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum HandRank {
    RoyalFlush = 1,
    StraightFlush,
    FourOfAKind,
    FullHouse,
    Flush,
    Straight,
    ThreeOfAKind,
    TwoPair,
    Pair,
    HighCard,
}

impl HandRank {
    #[must_use]
    pub fn as_number(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::RoyalFlush => "Royal Flush",
            Self::StraightFlush => "Straight Flush",
            Self::FourOfAKind => "Four Of A Kind",
            Self::FullHouse => "Full House",
            Self::Flush => "Flush",
            Self::Straight => "Straight",
            Self::ThreeOfAKind => "Three Of A Kind",
            Self::TwoPair => "Two Pair",
            Self::Pair => "Pair",
            Self::HighCard => "High Card",
        };
        write!(f, "{repr}")
    }
}

/// Result of evaluating a 7-card hand: the category, the best cards
/// (highest impact first), and any kickers used only for tie-breaks.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct HandValue {
    pub rank: HandRank,
    pub best: Vec<Card>,
    pub kickers: Vec<Card>,
}

/// One betting phase of a hand.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Street {
    PreFlop,
    Flop,
    Turn,
    River,
}

impl Street {
    pub const ALL: [Street; constants::NUM_STREETS] =
        [Street::PreFlop, Street::Flop, Street::Turn, Street::River];
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::PreFlop => "pre-flop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Username(String);

impl Username {
    pub fn new(s: &str) -> Self {
        let mut username: String = s
            .chars()
            .map(|c| if c.is_ascii_whitespace() { '_' } else { c })
            .collect();
        username.truncate(constants::MAX_NAME_LENGTH);
        Self(username)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<'de> Deserialize<'de> for Username {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}

impl From<String> for Username {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<&str> for Username {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Table configuration.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TableSettings {
    pub buy_in: Chips,
    /// The big blind; doubles as the minimum bet unit.
    pub min_bet: Chips,
    pub num_decks: usize,
    pub max_seats: usize,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self::new(
            constants::DEFAULT_BUY_IN,
            constants::DEFAULT_MIN_BET,
            constants::DEFAULT_NUM_DECKS,
            constants::MAX_PLAYERS,
        )
    }
}

impl TableSettings {
    #[must_use]
    pub const fn new(buy_in: Chips, min_bet: Chips, num_decks: usize, max_seats: usize) -> Self {
        Self {
            buy_in,
            min_bet,
            num_decks,
            max_seats,
        }
    }
}

#[derive(Debug)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    #[must_use]
    pub fn new(num_decks: usize) -> Self {
        let mut cards = Vec::with_capacity(52 * num_decks);
        for _ in 0..num_decks {
            for value in 2..=14u8 {
                for suit in Suit::ALL {
                    cards.push(Card(value, suit));
                }
            }
        }
        Self { cards }
    }

    pub fn shuffle(&mut self) {
        self.cards.shuffle(&mut rand::rng());
    }

    /// Removes and returns the top card.
    pub fn deal_card(&mut self) -> Result<Card, GameError> {
        if self.cards.is_empty() {
            return Err(GameError::DeckExhausted);
        }
        Ok(self.cards.remove(0))
    }

    /// Returns cards to the bottom of the deck, recycling them for the
    /// next hand.
    pub fn add_cards(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.cards.extend(cards);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new(constants::DEFAULT_NUM_DECKS)
    }
}

/// A seated participant. Betting actions and the showdown evaluator are
/// the only mutators; everything hand-scoped is wiped by
/// [`Player::reset_hand`] at the start of each deal.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Player {
    pub name: Username,
    pub money: Chips,
    /// Amount committed on the current street.
    pub current_bet: Chips,
    /// Chips contributed since the last pot settlement.
    pub current_pot_contrib: Chips,
    /// Chips contributed across the whole hand.
    pub total_pot_contrib: Chips,
    pub folded: bool,
    pub all_in: bool,
    /// The two dealt hole cards, fixed for the hand.
    pub hole: Vec<Card>,
    /// Working 7-card hand (hole + community), sorted ascending before
    /// evaluation.
    pub hand: Vec<Card>,
    /// Best cards found by the evaluator, highest impact first.
    pub best: Vec<Card>,
    pub kickers: Vec<Card>,
    /// `None` until the showdown evaluates this player; doubles as the
    /// evaluation cache flag so no hand is ranked twice.
    pub hand_rank: Option<HandRank>,
}

impl Player {
    #[must_use]
    pub fn new(name: Username, buy_in: Chips) -> Self {
        Self {
            name,
            money: buy_in,
            current_bet: 0,
            current_pot_contrib: 0,
            total_pot_contrib: 0,
            folded: false,
            all_in: false,
            hole: Vec::with_capacity(constants::HOLE_SIZE),
            hand: Vec::with_capacity(constants::HAND_SIZE),
            best: Vec::new(),
            kickers: Vec::new(),
            hand_rank: None,
        }
    }

    pub fn reset_hand(&mut self) {
        self.current_bet = 0;
        self.current_pot_contrib = 0;
        self.total_pot_contrib = 0;
        self.folded = false;
        self.all_in = false;
        self.hole.clear();
        self.hand.clear();
        self.best.clear();
        self.kickers.clear();
        self.hand_rank = None;
    }

    pub fn deal_hole_card(&mut self, card: Card) {
        self.hole.push(card);
        self.hand.push(card);
    }

    /// Match the table stake exactly, moving the delta from money into
    /// pot contributions. The caller guarantees the player can cover it.
    pub fn call(&mut self, stake: Chips) -> Chips {
        let delta = stake.saturating_sub(self.current_bet);
        debug_assert!(self.money >= delta, "call offered without funds to cover it");
        self.money -= delta;
        self.current_bet = stake;
        self.current_pot_contrib += delta;
        self.total_pot_contrib += delta;
        self.current_bet
    }

    /// Increase the player's bet by `increase` chips. Returns the new bet
    /// on success, or `None` (with no state change) if the player cannot
    /// afford it. Spending the whole stack flips the all-in flag.
    pub fn raise_or_bet(&mut self, increase: Chips) -> Option<Chips> {
        if self.money < increase {
            return None;
        }
        self.money -= increase;
        self.current_bet += increase;
        self.current_pot_contrib += increase;
        self.total_pot_contrib += increase;
        if self.money == 0 {
            self.all_in = true;
        }
        Some(self.current_bet)
    }

    /// Commit the entire remaining stack. Returns the new bet.
    pub fn go_all_in(&mut self) -> Chips {
        let total = self.money;
        self.current_bet += total;
        self.current_pot_contrib += total;
        self.total_pot_contrib += total;
        self.money = 0;
        self.all_in = true;
        self.current_bet
    }

    pub fn fold(&mut self) {
        self.folded = true;
    }
}
