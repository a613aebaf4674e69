// src/models.rs

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::constants::REVIEW_INTERVAL_HOURS;

// --- Card Model ---

/// Discriminates which field of a [`Card`] holds the canonical answer:
/// code cards answer with their snippet, everything else with prose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    Concept,
    Code,
    Interpretation,
}

impl CardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardKind::Concept => "concept",
            CardKind::Code => "code",
            CardKind::Interpretation => "interpretation",
        }
    }
}

impl FromStr for CardKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "concept" => Ok(CardKind::Concept),
            "code" => Ok(CardKind::Code),
            "interpretation" => Ok(CardKind::Interpretation),
            other => Err(format!("unknown card kind: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy = 1,
    Medium = 2,
    Hard = 3,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Ok(Difficulty::Medium), // Default fallback
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HintKind {
    Library,
    Concept,
    Tip,
    Code,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hint {
    pub kind: HintKind,
    pub content: String,
}

/// One unit of study content. Cards are static: loaded once from the bank
/// and never mutated at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub kind: CardKind,
    pub category: String,
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub section: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<Hint>,
}

impl Card {
    /// The string that option generation must include and grading compares
    /// against: the code snippet for a code card that has one, the prose
    /// answer otherwise.
    pub fn canonical_answer(&self) -> &str {
        match self.code.as_deref() {
            Some(code) if self.kind == CardKind::Code && !code.is_empty() => code,
            _ => &self.answer,
        }
    }
}

// --- Progress Model ---

/// Per-card study state for one learner. At most one record exists per card;
/// every grading event merges into it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub card_id: String,
    pub completed: bool,
    pub correct: bool,
    pub attempts: u32,
    pub last_studied: DateTime<Utc>,
    pub next_review: DateTime<Utc>,
}

impl ProgressRecord {
    pub fn first_attempt(card_id: &str, correct: bool, now: DateTime<Utc>) -> Self {
        ProgressRecord {
            card_id: card_id.to_string(),
            completed: true,
            correct,
            attempts: 1,
            last_studied: now,
            next_review: now + Duration::hours(REVIEW_INTERVAL_HOURS),
        }
    }

    /// Folds one more grading event into the record. `correct` is
    /// most-recent-wins, not cumulative; prior outcomes are not retained.
    pub fn register(&mut self, correct: bool, now: DateTime<Utc>) {
        self.completed = true;
        self.correct = correct;
        self.attempts += 1;
        self.last_studied = now;
        self.next_review = now + Duration::hours(REVIEW_INTERVAL_HOURS);
    }
}

/// Aggregate numbers for a learner, always derived from the full record set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyStats {
    pub total_cards: usize,
    pub completed_cards: usize,
    pub correct_cards: usize,
    pub accuracy: f64,
    pub streak: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_studied: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_card(code: Option<&str>) -> Card {
        Card {
            id: "c-1".to_string(),
            kind: CardKind::Code,
            category: "Library imports".to_string(),
            question: "Import NumPy under its conventional alias.".to_string(),
            answer: "Bring in NumPy aliased as np.".to_string(),
            code: code.map(str::to_string),
            keywords: vec![],
            difficulty: Difficulty::Easy,
            explanation: None,
            section: "type-1".to_string(),
            hints: vec![],
        }
    }

    #[test]
    fn code_card_answers_with_snippet() {
        let card = code_card(Some("import numpy as np"));
        assert_eq!(card.canonical_answer(), "import numpy as np");
    }

    #[test]
    fn code_card_without_snippet_falls_back_to_prose() {
        assert_eq!(
            code_card(None).canonical_answer(),
            "Bring in NumPy aliased as np."
        );
        assert_eq!(
            code_card(Some("")).canonical_answer(),
            "Bring in NumPy aliased as np."
        );
    }

    #[test]
    fn register_is_most_recent_wins() {
        let t0 = Utc::now();
        let mut rec = ProgressRecord::first_attempt("c-1", true, t0);
        assert!(rec.completed);
        assert_eq!(rec.attempts, 1);

        let t1 = t0 + Duration::minutes(5);
        rec.register(false, t1);
        assert!(rec.completed);
        assert!(!rec.correct);
        assert_eq!(rec.attempts, 2);
        assert_eq!(rec.last_studied, t1);
        assert_eq!(rec.next_review, t1 + Duration::hours(REVIEW_INTERVAL_HOURS));
    }

    #[test]
    fn progress_record_wire_format_is_camel_case() {
        let rec = ProgressRecord::first_attempt("c-1", true, Utc::now());
        let json = serde_json::to_string(&rec).unwrap();
        assert!(json.contains("\"cardId\""));
        assert!(json.contains("\"lastStudied\""));
        assert!(json.contains("\"nextReview\""));
    }
}
