//! Best-of-seven hand evaluation.
//!
//! [`evaluate`] is a pure function over exactly seven cards sorted
//! ascending by strength. Ace-low straights are handled with
//! evaluation-local values: an Ace is aliased to 1 inside this module's
//! scratch data, and the stored cards are never touched.

use std::collections::HashMap;

use super::constants;
use super::entities::{Card, HandRank, HandValue, Suit, Value};

/// A card paired with its strength for this evaluation only. For a wheel
/// the Ace appears here with value 1 while the card itself still reads 14.
#[derive(Clone, Copy, Debug)]
struct EvalCard {
    value: Value,
    card: Card,
}

/// Rank a 7-card hand (2 hole + 5 community).
///
/// # Panics
///
/// The input must be exactly [`constants::HAND_SIZE`] cards sorted
/// ascending by value; anything else is an invariant violation with no
/// defined behavior, so it aborts the hand.
#[must_use]
pub fn evaluate(cards: &[Card]) -> HandValue {
    assert_eq!(
        cards.len(),
        constants::HAND_SIZE,
        "hand evaluation requires exactly {} cards",
        constants::HAND_SIZE
    );
    assert!(
        cards.windows(2).all(|w| w[0].0 <= w[1].0),
        "hand evaluation requires cards sorted ascending by value"
    );

    let run = find_straight_run(cards);

    // Straight and royal flushes preempt everything else.
    if let Some((lo, hi)) = run {
        let window = straight_window(cards, lo, hi);
        if let Some(flush_run) = straight_flush(&window) {
            let rank = if flush_run[flush_run.len() - 1].value == 14 {
                HandRank::RoyalFlush
            } else {
                HandRank::StraightFlush
            };
            let best = flush_run.iter().rev().take(5).map(|ec| ec.card).collect();
            return HandValue {
                rank,
                best,
                kickers: Vec::new(),
            };
        }
    }

    // Group adjacent equal values; ascending, so the last group is highest.
    let mut groups: Vec<(Value, Vec<usize>)> = Vec::new();
    for (i, card) in cards.iter().enumerate() {
        match groups.last_mut() {
            Some((value, indices)) if *value == card.0 => indices.push(i),
            _ => groups.push((card.0, vec![i])),
        }
    }

    if let Some((_, indices)) = groups.iter().rev().find(|(_, idxs)| idxs.len() >= 4) {
        let used: Vec<usize> = indices[indices.len() - 4..].to_vec();
        let best: Vec<Card> = used.iter().map(|&i| cards[i]).collect();
        let kickers = kickers_from(cards, &used, 1);
        return HandValue {
            rank: HandRank::FourOfAKind,
            best,
            kickers,
        };
    }

    let trips: Vec<&(Value, Vec<usize>)> =
        groups.iter().filter(|(_, idxs)| idxs.len() == 3).collect();
    let pairs: Vec<&(Value, Vec<usize>)> =
        groups.iter().filter(|(_, idxs)| idxs.len() == 2).collect();

    if let Some((_, trip_idxs)) = trips.last() {
        // The pair half of a full house is the best pair, or the top two
        // cards of a second three-of-a-kind.
        let spare_trip = trips.len().checked_sub(2).map(|i| trips[i]);
        let pair_half: Option<&[usize]> = match (pairs.last(), spare_trip) {
            (Some((pv, _)), Some((tv, ti))) if tv > pv => Some(&ti[1..]),
            (Some((_, pi)), _) => Some(pi.as_slice()),
            (None, Some((_, ti))) => Some(&ti[1..]),
            (None, None) => None,
        };
        if let Some(pair_idxs) = pair_half {
            let mut best: Vec<Card> = trip_idxs.iter().map(|&i| cards[i]).collect();
            best.extend(pair_idxs.iter().map(|&i| cards[i]));
            return HandValue {
                rank: HandRank::FullHouse,
                best,
                kickers: Vec::new(),
            };
        }
    }

    let mut by_suit: HashMap<Suit, Vec<usize>> = HashMap::new();
    for (i, card) in cards.iter().enumerate() {
        by_suit.entry(card.1).or_default().push(i);
    }
    if let Some(indices) = by_suit.values().find(|idxs| idxs.len() >= 5) {
        let best = indices.iter().rev().take(5).map(|&i| cards[i]).collect();
        return HandValue {
            rank: HandRank::Flush,
            best,
            kickers: Vec::new(),
        };
    }

    if let Some((lo, hi)) = run {
        let window = straight_window(cards, lo, hi);
        // One representative per value, top five of the run.
        let mut best = Vec::with_capacity(5);
        for value in (hi - 4..=hi).rev() {
            if let Some(ec) = window.iter().find(|ec| ec.value == value) {
                best.push(ec.card);
            }
        }
        return HandValue {
            rank: HandRank::Straight,
            best,
            kickers: Vec::new(),
        };
    }

    if let Some((_, trip_idxs)) = trips.last() {
        let best = trip_idxs.iter().rev().map(|&i| cards[i]).collect();
        let kickers = kickers_from(cards, trip_idxs, 2);
        return HandValue {
            rank: HandRank::ThreeOfAKind,
            best,
            kickers,
        };
    }

    match pairs.len() {
        n if n >= 2 => {
            let (_, high) = pairs[n - 1];
            let (_, low) = pairs[n - 2];
            let mut used: Vec<usize> = high.clone();
            used.extend(low);
            let best = used.iter().map(|&i| cards[i]).collect();
            let kickers = kickers_from(cards, &used, 1);
            HandValue {
                rank: HandRank::TwoPair,
                best,
                kickers,
            }
        }
        1 => {
            let (_, pair_idxs) = pairs[0];
            let best = pair_idxs.iter().map(|&i| cards[i]).collect();
            let kickers = kickers_from(cards, pair_idxs, 3);
            HandValue {
                rank: HandRank::Pair,
                best,
                kickers,
            }
        }
        _ => {
            let top = cards.len() - 1;
            HandValue {
                rank: HandRank::HighCard,
                best: vec![cards[top]],
                kickers: kickers_from(cards, &[top], 4),
            }
        }
    }
}

/// Scan for a run of five or more consecutive distinct values, returning
/// its inclusive value bounds. Duplicates bridge a run without breaking
/// it. An Ace is additionally tried as value 1 so the wheel is found.
fn find_straight_run(cards: &[Card]) -> Option<(Value, Value)> {
    let mut distinct: Vec<Value> = Vec::with_capacity(cards.len() + 1);
    if cards[cards.len() - 1].0 == 14 {
        distinct.push(1);
    }
    for card in cards {
        if distinct.last() != Some(&card.0) {
            distinct.push(card.0);
        }
    }

    let mut run = None;
    let mut start = 0;
    for i in 0..distinct.len() {
        if i > 0 && distinct[i] != distinct[i - 1] + 1 {
            start = i;
        }
        if i - start + 1 >= 5 {
            run = Some((distinct[start], distinct[i]));
        }
    }
    run
}

/// The run's cards in ascending evaluation order, duplicates included so
/// the flush scan can weigh alternative suits. When the run is ace-low,
/// Aces lead the window with local value 1.
fn straight_window(cards: &[Card], lo: Value, hi: Value) -> Vec<EvalCard> {
    let mut window = Vec::new();
    if lo == 1 {
        window.extend(
            cards
                .iter()
                .filter(|c| c.0 == 14)
                .map(|&card| EvalCard { value: 1, card }),
        );
    }
    window.extend(
        cards
            .iter()
            .filter(|c| c.0 >= lo.max(2) && c.0 <= hi)
            .map(|&card| EvalCard { value: card.0, card }),
    );
    window
}

/// Look for five suited cards inside a straight window.
///
/// The boundary case is a window holding equal values of differing suits
/// (e.g. a three-of-a-kind mid-straight): a card that merely matches the
/// previous value is remembered as a secondary candidate suit, and the
/// scan switches to that suit if it turns out to continue.
fn straight_flush(window: &[EvalCard]) -> Option<Vec<EvalCard>> {
    let mut suit = window[0].card.1;
    let mut run = vec![window[0]];
    let mut extra: HashMap<Suit, EvalCard> = HashMap::new();

    for i in 1..window.len() {
        let current = window[i];
        let prev = window[i - 1];
        if current.value == prev.value && current.card.1 == prev.card.1 {
            // Identical copy from a second deck.
            continue;
        } else if current.card.1 == suit {
            run.push(current);
        } else if i > 3 {
            // Too deep into the window for a fresh suit to reach five.
            break;
        } else if let Some(&seed) = extra.get(&current.card.1) {
            suit = current.card.1;
            run = vec![seed, current];
            extra.clear();
        } else if current.value == prev.value {
            extra.insert(current.card.1, current);
        } else {
            suit = current.card.1;
            run = vec![current];
        }
    }

    (run.len() >= 5).then_some(run)
}

/// The `count` highest cards outside `used`, highest first.
fn kickers_from(cards: &[Card], used: &[usize], count: usize) -> Vec<Card> {
    (0..cards.len())
        .rev()
        .filter(|i| !used.contains(i))
        .take(count)
        .map(|i| cards[i])
        .collect()
}
