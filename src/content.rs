// src/content.rs

use crate::models::{Card, CardKind};
use log::{debug, warn};

/// Parses the card bank compiled into the binary.
// Note: This relies on the file strictly existing in src/data/
pub fn builtin_cards() -> Vec<Card> {
    let data = include_str!("data/aice_cards.json");
    let cards: Vec<Card> = serde_json::from_str(data).expect("Error parsing card bank JSON");
    debug!("loaded {} cards from the embedded bank", cards.len());
    audit(&cards);
    cards
}

/// Data-quality pass over a freshly loaded bank. A code card without a
/// snippet falls back to its prose answer and can then never be graded
/// correct from generated options; surface that in the log instead of
/// rejecting the bank.
pub fn audit(cards: &[Card]) {
    for card in cards {
        if card.kind == CardKind::Code && card.code.as_deref().map_or(true, str::is_empty) {
            warn!("card {} is a code card without a code snippet", card.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_bank_parses() {
        let cards = builtin_cards();
        assert!(!cards.is_empty());
    }

    #[test]
    fn embedded_bank_has_unique_ids() {
        let cards = builtin_cards();
        for (i, card) in cards.iter().enumerate() {
            assert!(
                cards[i + 1..].iter().all(|c| c.id != card.id),
                "duplicate card id {}",
                card.id
            );
        }
    }

    #[test]
    fn embedded_code_cards_carry_snippets() {
        for card in builtin_cards() {
            if card.kind == CardKind::Code {
                assert!(
                    card.code.as_deref().is_some_and(|c| !c.is_empty()),
                    "code card {} has no snippet",
                    card.id
                );
            }
        }
    }
}
