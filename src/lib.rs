// src/lib.rs

//! Quiz study engine for AICE certification prep.
//!
//! A static card bank feeds an option generator that builds shuffled
//! four-way multiple-choice sets, grading compares selections against the
//! card's canonical answer by value, and a progress tracker keeps one
//! attempt record per card with a flat 24-hour review interval, persisted
//! to a local JSON file or to SQLite.

pub mod constants;
pub mod content;
pub mod database;
pub mod models;
pub mod progress;
pub mod quiz;
pub mod repository;
pub mod storage;

pub use database::SqliteStore;
pub use models::{Card, CardKind, Difficulty, ProgressRecord, StudyStats};
pub use progress::ProgressTracker;
pub use repository::CardRepository;
pub use storage::{JsonFileStore, ProgressStore, StorageError};
