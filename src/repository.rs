// src/repository.rs

use crate::models::{Card, CardKind, Difficulty};
use rand::seq::SliceRandom;
use rand::Rng;

/// In-memory view over the static card bank. Listing and filtering preserve
/// the bank's insertion order; only sampling consumes randomness.
pub struct CardRepository {
    cards: Vec<Card>,
}

impl CardRepository {
    pub fn new(cards: Vec<Card>) -> Self {
        CardRepository { cards }
    }

    /// Repository over the bank compiled into the binary.
    pub fn builtin() -> Self {
        CardRepository::new(crate::content::builtin_cards())
    }

    pub fn all(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn by_category(&self, category: &str) -> Vec<&Card> {
        self.cards.iter().filter(|c| c.category == category).collect()
    }

    pub fn by_difficulty(&self, difficulty: Difficulty) -> Vec<&Card> {
        self.cards
            .iter()
            .filter(|c| c.difficulty == difficulty)
            .collect()
    }

    pub fn by_kind(&self, kind: CardKind) -> Vec<&Card> {
        self.cards.iter().filter(|c| c.kind == kind).collect()
    }

    pub fn by_section(&self, section: &str) -> Vec<&Card> {
        self.cards.iter().filter(|c| c.section == section).collect()
    }

    /// Distinct categories, in first-occurrence order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for card in &self.cards {
            if !seen.contains(&card.category.as_str()) {
                seen.push(&card.category);
            }
        }
        seen
    }

    /// Distinct sections, in first-occurrence order.
    pub fn sections(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for card in &self.cards {
            if !seen.contains(&card.section.as_str()) {
                seen.push(&card.section);
            }
        }
        seen
    }

    /// Draws `n` cards without replacement. Asking for more than the bank
    /// holds returns the whole bank, shuffled.
    pub fn random_sample<R: Rng>(&self, n: usize, rng: &mut R) -> Vec<&Card> {
        let mut deck: Vec<&Card> = self.cards.iter().collect();
        deck.shuffle(rng);
        deck.truncate(n);
        deck
    }
}
