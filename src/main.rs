// src/main.rs

use std::fs;
use std::io::{self, BufRead, Write};

use chrono::Utc;
use log::info;
use rusqlite::Connection;

use aice_trainer::models::Card;
use aice_trainer::progress::ProgressTracker;
use aice_trainer::quiz;
use aice_trainer::repository::CardRepository;
use aice_trainer::SqliteStore;

const SESSION_SIZE: usize = 10;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting AICE trainer...");

    let data_dir = dirs::data_local_dir()
        .expect("failed to resolve local data dir")
        .join("aice-trainer");
    if !data_dir.exists() {
        fs::create_dir_all(&data_dir).expect("failed to create data dir");
    }

    let db_path = data_dir.join("aice_trainer.db");
    info!("Database path: {:?}", db_path);
    let conn = Connection::open(db_path).expect("Failed to open DB");

    let repository = CardRepository::builtin();
    let user = std::env::var("AICE_USER").unwrap_or_else(|_| "local".to_string());
    let store = SqliteStore::new(conn, Some(user)).expect("Failed to init store");
    store
        .seed_cards(repository.all())
        .expect("Failed to seed cards");

    let mut tracker =
        ProgressTracker::new(store, repository.len()).expect("Failed to load progress");

    let mut rng = rand::thread_rng();
    let now = Utc::now();
    let due: Vec<String> = tracker
        .due_for_review(now)
        .into_iter()
        .map(str::to_string)
        .collect();

    let session: Vec<&Card> = if due.is_empty() {
        repository.random_sample(SESSION_SIZE, &mut rng)
    } else {
        info!("{} cards due for review", due.len());
        due.iter().filter_map(|id| repository.get(id)).collect()
    };

    let stdin = io::stdin();
    let mut score = 0usize;

    for (i, card) in session.iter().enumerate() {
        println!(
            "\n[{}/{}] {} ({})",
            i + 1,
            session.len(),
            card.category,
            card.difficulty.as_str()
        );
        println!("{}", card.question);

        let options = quiz::generate_options(card, repository.all(), &mut rng);
        for (n, option) in options.iter().enumerate() {
            println!("  {}. {}", n + 1, option);
        }
        print!("> ");
        io::stdout().flush().expect("stdout flush");

        let mut line = String::new();
        stdin.lock().read_line(&mut line).expect("stdin read");
        let selected = line
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1));

        let correct = selected.map_or(false, |idx| quiz::grade(card, &options, idx));
        if correct {
            score += 1;
            println!("Correct!");
        } else {
            println!("Wrong. The answer was:\n{}", card.canonical_answer());
        }
        if let Some(explanation) = &card.explanation {
            println!("{explanation}");
        }

        // A failed save should not end the session; the next attempt will
        // try the store again.
        if let Err(e) = tracker.record_attempt(&card.id, correct) {
            eprintln!("could not save progress: {e}");
        }
    }

    let stats = tracker.stats();
    println!("\nThis session: {}/{}", score, session.len());
    println!(
        "Overall: {}/{} cards studied, {:.0}% accuracy",
        stats.completed_cards, stats.total_cards, stats.accuracy
    );
}
