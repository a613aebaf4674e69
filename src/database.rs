// src/database.rs

use chrono::Utc;
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::str::FromStr;

use crate::models::{Card, CardKind, Difficulty, ProgressRecord, StudyStats};
use crate::storage::{ProgressStore, Result};

/// Relational store: the mirrored card bank, one progress row per
/// (user, card) and one wholesale stats row per user.
///
/// Every operation is scoped to the learner identity supplied at
/// construction. Without one, reads come back empty and writes silently do
/// nothing, matching the hosted variant's behavior when no session exists.
pub struct SqliteStore {
    conn: Connection,
    user_id: Option<String>,
}

impl SqliteStore {
    pub fn new(conn: Connection, user_id: Option<String>) -> Result<Self> {
        init_schema(&conn)?;
        Ok(SqliteStore { conn, user_id })
    }

    /// Mirrors the card bank into the `cards` table, replacing stale rows.
    pub fn seed_cards(&self, cards: &[Card]) -> Result<()> {
        let now = Utc::now();
        let mut stmt = self.conn.prepare(
            "INSERT INTO cards (card_id, kind, category, question, answer, code, keywords, difficulty, explanation, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
             ON CONFLICT(card_id) DO UPDATE SET
                kind = excluded.kind,
                category = excluded.category,
                question = excluded.question,
                answer = excluded.answer,
                code = excluded.code,
                keywords = excluded.keywords,
                difficulty = excluded.difficulty,
                explanation = excluded.explanation,
                updated_at = excluded.updated_at",
        )?;
        for card in cards {
            let keywords = serde_json::to_string(&card.keywords)?;
            stmt.execute(params![
                card.id,
                card.kind.as_str(),
                card.category,
                card.question,
                card.answer,
                card.code,
                keywords,
                card.difficulty.as_str(),
                card.explanation,
                now,
            ])?;
        }
        info!("seeded {} cards into the store", cards.len());
        Ok(())
    }

    pub fn card_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT count(*) FROM cards", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Reads the mirrored bank back out, in insertion order. The mirror
    /// does not carry sections or hints, so those come back empty.
    pub fn load_cards(&self) -> Result<Vec<Card>> {
        let mut stmt = self.conn.prepare(
            "SELECT card_id, kind, category, question, answer, code, keywords, difficulty, explanation
             FROM cards ORDER BY id",
        )?;
        let cards = stmt
            .query_map([], |row| {
                let kind: String = row.get(1)?;
                let keywords: String = row.get(6)?;
                let difficulty: String = row.get(7)?;
                Ok(Card {
                    id: row.get(0)?,
                    kind: CardKind::from_str(&kind).unwrap_or(CardKind::Concept),
                    category: row.get(2)?,
                    question: row.get(3)?,
                    answer: row.get(4)?,
                    code: row.get(5)?,
                    keywords: serde_json::from_str(&keywords).unwrap_or_default(),
                    difficulty: Difficulty::from_str(&difficulty).unwrap_or(Difficulty::Medium),
                    explanation: row.get(8)?,
                    section: String::new(),
                    hints: Vec::new(),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(cards)
    }

    /// The learner's persisted stats row, if one has been written.
    pub fn load_stats(&self) -> Result<Option<StudyStats>> {
        let Some(user_id) = self.user_id.as_deref() else {
            return Ok(None);
        };
        let stats = self
            .conn
            .query_row(
                "SELECT total_cards, completed_cards, correct_cards, accuracy, streak, last_studied
                 FROM study_stats WHERE user_id = ?",
                [user_id],
                |row| {
                    Ok(StudyStats {
                        total_cards: row.get::<_, i64>(0)? as usize,
                        completed_cards: row.get::<_, i64>(1)? as usize,
                        correct_cards: row.get::<_, i64>(2)? as usize,
                        accuracy: row.get(3)?,
                        streak: row.get(4)?,
                        last_studied: row.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(stats)
    }
}

impl ProgressStore for SqliteStore {
    fn load(&mut self) -> Result<Vec<ProgressRecord>> {
        let Some(user_id) = self.user_id.as_deref() else {
            return Ok(Vec::new());
        };
        let mut stmt = self.conn.prepare(
            "SELECT card_id, completed, correct, attempts, last_studied, next_review
             FROM study_progress
             WHERE user_id = ?
             ORDER BY last_studied DESC",
        )?;
        let records = stmt
            .query_map([user_id], |row| {
                Ok(ProgressRecord {
                    card_id: row.get(0)?,
                    completed: row.get(1)?,
                    correct: row.get(2)?,
                    attempts: row.get(3)?,
                    last_studied: row.get(4)?,
                    next_review: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    fn upsert_attempt(&mut self, record: &ProgressRecord) -> Result<()> {
        let Some(user_id) = self.user_id.as_deref() else {
            debug!("no learner identity, skipping progress write");
            return Ok(());
        };
        // The attempt counter is bumped inside the statement so concurrent
        // sessions for the same learner add up instead of overwriting each
        // other.
        self.conn.execute(
            "INSERT INTO study_progress
                (user_id, card_id, completed, correct, attempts, last_studied, next_review, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, 1, ?5, ?6, ?5, ?5)
             ON CONFLICT(user_id, card_id) DO UPDATE SET
                completed = excluded.completed,
                correct = excluded.correct,
                attempts = study_progress.attempts + 1,
                last_studied = excluded.last_studied,
                next_review = excluded.next_review,
                updated_at = excluded.updated_at",
            params![
                user_id,
                record.card_id,
                record.completed,
                record.correct,
                record.last_studied,
                record.next_review,
            ],
        )?;
        Ok(())
    }

    fn save_stats(&mut self, stats: &StudyStats) -> Result<()> {
        let Some(user_id) = self.user_id.as_deref() else {
            return Ok(());
        };
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO study_stats
                (user_id, total_cards, completed_cards, correct_cards, accuracy, streak, last_studied, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
             ON CONFLICT(user_id) DO UPDATE SET
                total_cards = excluded.total_cards,
                completed_cards = excluded.completed_cards,
                correct_cards = excluded.correct_cards,
                accuracy = excluded.accuracy,
                streak = excluded.streak,
                last_studied = excluded.last_studied,
                updated_at = excluded.updated_at",
            params![
                user_id,
                stats.total_cards as i64,
                stats.completed_cards as i64,
                stats.correct_cards as i64,
                stats.accuracy,
                stats.streak,
                stats.last_studied,
                now,
            ],
        )?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        let Some(user_id) = self.user_id.as_deref() else {
            return Ok(());
        };
        self.conn
            .execute("DELETE FROM study_progress WHERE user_id = ?", [user_id])?;
        self.conn
            .execute("DELETE FROM study_stats WHERE user_id = ?", [user_id])?;
        Ok(())
    }
}

fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS cards (
            id INTEGER PRIMARY KEY,
            card_id TEXT UNIQUE NOT NULL,
            kind TEXT NOT NULL CHECK (kind IN ('concept','code','interpretation')),
            category TEXT NOT NULL,
            question TEXT NOT NULL,
            answer TEXT NOT NULL,
            code TEXT,
            keywords TEXT NOT NULL DEFAULT '[]',
            difficulty TEXT NOT NULL CHECK (difficulty IN ('easy','medium','hard')),
            explanation TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS study_progress (
            id INTEGER PRIMARY KEY,
            user_id TEXT NOT NULL,
            card_id TEXT NOT NULL,
            completed INTEGER NOT NULL DEFAULT 0,
            correct INTEGER NOT NULL DEFAULT 0,
            attempts INTEGER NOT NULL DEFAULT 0,
            last_studied TEXT NOT NULL,
            next_review TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (user_id, card_id)
        );
        CREATE TABLE IF NOT EXISTS study_stats (
            id INTEGER PRIMARY KEY,
            user_id TEXT UNIQUE NOT NULL,
            total_cards INTEGER NOT NULL DEFAULT 0,
            completed_cards INTEGER NOT NULL DEFAULT 0,
            correct_cards INTEGER NOT NULL DEFAULT 0,
            accuracy REAL NOT NULL DEFAULT 0.0,
            streak INTEGER NOT NULL DEFAULT 0,
            last_studied TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        ",
    )
}
