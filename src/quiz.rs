// src/quiz.rs

use crate::constants::{CODE_SWAPS, OPTION_COUNT, PLACEHOLDER_OPTION, TEXT_SWAPS};
use crate::models::{Card, CardKind};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

/// Builds the multiple-choice set for a card: its canonical answer plus
/// heuristic distractors drawn from the rest of the bank.
///
/// Candidates are gathered in priority order — the canonical answer, one
/// same-kind/same-category peer, one arbitrary other card, and a mechanical
/// transform of the card's own answer — then de-duplicated keeping first
/// occurrences, padded with [`PLACEHOLDER_OPTION`] to exactly
/// [`OPTION_COUNT`] entries, and shuffled.
///
/// The canonical answer survives de-duplication because it is gathered
/// first, but a colliding distractor collapses into it and the padding may
/// then repeat the placeholder, so the set is not guaranteed to hold four
/// *distinct* strings. With a single-card bank the result is the canonical
/// answer plus three placeholders.
///
/// Two calls never promise the same set or order; callers wanting a stable
/// set for a session must cache the result per card id.
pub fn generate_options<R: Rng>(card: &Card, bank: &[Card], rng: &mut R) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::with_capacity(OPTION_COUNT);
    candidates.push(card.canonical_answer().to_string());

    // Near distractor: another card asking about the same kind of thing in
    // the same category.
    let peers: Vec<&Card> = bank
        .iter()
        .filter(|c| c.kind == card.kind && c.category == card.category && c.id != card.id)
        .collect();
    if let Some(peer) = peers.choose(rng) {
        candidates.push(peer.canonical_answer().to_string());
    }

    // Far distractor: any other card at all.
    let others: Vec<&Card> = bank.iter().filter(|c| c.id != card.id).collect();
    if let Some(other) = others.choose(rng) {
        candidates.push(other.canonical_answer().to_string());
    }

    // Always producible, even from a one-card bank.
    candidates.push(distort_answer(card));

    let mut options: Vec<String> = Vec::with_capacity(OPTION_COUNT);
    for candidate in candidates {
        if !options.contains(&candidate) {
            options.push(candidate);
        }
    }
    if options.len() < OPTION_COUNT {
        debug!(
            "card {}: only {} distinct options, padding",
            card.id,
            options.len()
        );
        while options.len() < OPTION_COUNT {
            options.push(PLACEHOLDER_OPTION.to_string());
        }
    }

    options.shuffle(rng);
    options.truncate(OPTION_COUNT);
    options
}

/// Mechanically mangles the card's canonical answer into a near-miss:
/// alias swaps for code answers, lead-in-marker swaps for prose.
pub fn distort_answer(card: &Card) -> String {
    let has_snippet = card.kind == CardKind::Code
        && card.code.as_deref().is_some_and(|c| !c.is_empty());
    let swaps: &[(&str, &str)] = if has_snippet { &CODE_SWAPS } else { &TEXT_SWAPS };

    let mut distorted = card.canonical_answer().to_string();
    for (from, to) in swaps {
        distorted = distorted.replace(from, to);
    }
    distorted
}

/// Grades a selection against a previously generated option set.
///
/// Option order is randomized at generation time, so correctness is decided
/// by value: re-derive the canonical answer and compare strings. A fixed
/// "index 0 is correct" convention breaks the moment the set is shuffled.
/// An out-of-range index grades as incorrect.
pub fn grade(card: &Card, options: &[String], selected: usize) -> bool {
    options
        .get(selected)
        .map_or(false, |choice| choice == card.canonical_answer())
}
