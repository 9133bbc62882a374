//! Deal random 7-card hands from a two-deck shoe and print how the
//! evaluator ranks them.
//!
//! ```sh
//! cargo run --example hand_evaluation
//! ```

use holdem_engine::{Card, Deck, evaluate};

fn main() {
    let mut deck = Deck::default();
    deck.shuffle();

    for hand_number in 1..=5 {
        let mut cards: Vec<Card> = (0..7)
            .map(|_| deck.deal_card().expect("two decks cover five hands"))
            .collect();
        cards.sort();

        let value = evaluate(&cards);
        let dealt = cards
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let best = value
            .best
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        println!("hand {hand_number}: {dealt}");
        println!("  -> {} ({})", value.rank, best);
        if !value.kickers.is_empty() {
            let kickers = value
                .kickers
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            println!("  kickers: {kickers}");
        }
    }
}
