//! Showdown resolution and payouts.
//!
//! Pots are resolved oldest first. For each pot the eligible seats are
//! intersected with the live ring; a lone contender is paid outright,
//! otherwise contenders' hands are evaluated (once, cached on the player)
//! and tie-breaks narrow the field position by position.

use std::collections::VecDeque;

use super::GameError;
use super::entities::{Card, Chips, Player, SeatIndex, Value};
use super::eval;
use super::events::GameEvent;
use super::ledger::PotLedger;
use super::ring::Ring;

/// Evaluate a player's 7-card hand if it has not been ranked yet. The
/// rank doubles as the cache flag, so repeated calls are free.
pub fn ensure_evaluated(player: &mut Player, community: &[Card]) {
    if player.hand_rank.is_some() {
        return;
    }
    player.hand.clear();
    player.hand.extend_from_slice(&player.hole);
    player.hand.extend_from_slice(community);
    player.hand.sort();
    let value = eval::evaluate(&player.hand);
    player.hand_rank = Some(value.rank);
    player.best = value.best;
    player.kickers = value.kickers;
}

/// Narrow tied candidates to those sharing the highest key value.
fn narrow_by<F>(candidates: &[SeatIndex], players: &[Player], key: F) -> Vec<SeatIndex>
where
    F: Fn(&Player) -> Value,
{
    let Some(top) = candidates.iter().map(|&seat| key(&players[seat])).max() else {
        return Vec::new();
    };
    candidates
        .iter()
        .copied()
        .filter(|&seat| key(&players[seat]) == top)
        .collect()
}

/// All seats holding the winning hand among `candidates`, every one of
/// which must already be evaluated. The best category wins; ties are
/// broken positionally over the best cards, then over the kickers.
#[must_use]
pub fn find_winners(candidates: &[SeatIndex], players: &[Player]) -> Vec<SeatIndex> {
    let Some(best_rank) = candidates
        .iter()
        .filter_map(|&seat| players[seat].hand_rank)
        .min()
    else {
        return Vec::new();
    };
    let mut winners: Vec<SeatIndex> = candidates
        .iter()
        .copied()
        .filter(|&seat| players[seat].hand_rank == Some(best_rank))
        .collect();

    // Within one category every hand has the same shape, so positional
    // comparison is well defined.
    let best_len = players[winners[0]].best.len();
    for i in 0..best_len {
        if winners.len() == 1 {
            return winners;
        }
        winners = narrow_by(&winners, players, |p| p.best[i].0);
    }
    let kicker_len = players[winners[0]].kickers.len();
    for i in 0..kicker_len {
        if winners.len() == 1 {
            return winners;
        }
        winners = narrow_by(&winners, players, |p| p.kickers[i].0);
    }
    winners
}

/// Pay one pot out to its winners. Split pots divide evenly; any odd
/// chips go to the tied winner seated nearest the ring head.
fn split_pot(
    total: Chips,
    winners: &[SeatIndex],
    players: &mut [Player],
    ring: &Ring<SeatIndex>,
    events: &mut VecDeque<GameEvent>,
) -> Result<(), GameError> {
    match winners {
        [] => Err(GameError::NoEligibleWinner),
        [seat] => {
            players[*seat].money += total;
            events.push_back(GameEvent::PotAwarded(players[*seat].name.clone(), total));
            Ok(())
        }
        _ => {
            let count = winners.len() as Chips;
            let share = total / count;
            let remainder = total % count;
            for &seat in winners {
                players[seat].money += share;
            }
            let names = winners
                .iter()
                .map(|&seat| players[seat].name.clone())
                .collect();
            events.push_back(GameEvent::PotSplit(names, share));
            if remainder > 0 {
                let node = ring
                    .search_by(&true, None, None, |seat| winners.contains(seat))
                    .ok_or(GameError::NoEligibleWinner)?;
                let seat = *ring.value(node).ok_or(GameError::EmptyRing)?;
                players[seat].money += remainder;
                events.push_back(GameEvent::OddChipAwarded(players[seat].name.clone()));
            }
            Ok(())
        }
    }
}

/// Resolve every pot in the ledger, oldest first. A side pot is never
/// paid before the pot that spawned it.
pub fn resolve_showdown(
    ledger: &mut PotLedger,
    players: &mut [Player],
    ring: &Ring<SeatIndex>,
    community: &[Card],
    events: &mut VecDeque<GameEvent>,
) -> Result<(), GameError> {
    let live = ring.to_vec();
    while !ledger.is_empty() {
        let pot = ledger.pop_front()?;
        let contenders: Vec<SeatIndex> = pot
            .eligible
            .iter()
            .copied()
            .filter(|seat| live.contains(seat) && !players[*seat].folded)
            .collect();
        match contenders.as_slice() {
            [] => {
                log::error!("pot of {} chips has no live contender", pot.total);
                return Err(GameError::NoEligibleWinner);
            }
            [seat] => {
                players[*seat].money += pot.total;
                events.push_back(GameEvent::PotAwarded(players[*seat].name.clone(), pot.total));
                continue;
            }
            _ => {}
        }
        for &seat in &contenders {
            if players[seat].hand_rank.is_none() {
                ensure_evaluated(&mut players[seat], community);
                if let Some(rank) = players[seat].hand_rank {
                    events.push_back(GameEvent::HandRevealed(players[seat].name.clone(), rank));
                }
            }
        }
        let winners = find_winners(&contenders, players);
        split_pot(pot.total, &winners, players, ring, events)?;
    }
    Ok(())
}

/// Sweep every pot to the last player standing without any evaluation.
pub fn resolve_uncontested(
    ledger: &mut PotLedger,
    players: &mut [Player],
    ring: &Ring<SeatIndex>,
    events: &mut VecDeque<GameEvent>,
) -> Result<(), GameError> {
    let head = ring.head().ok_or(GameError::EmptyRing)?;
    let seat = *ring.value(head).ok_or(GameError::EmptyRing)?;
    let mut won = 0;
    while !ledger.is_empty() {
        won += ledger.pop_front()?.total;
    }
    players[seat].money += won;
    events.push_back(GameEvent::UncontestedWin(players[seat].name.clone(), won));
    Ok(())
}
