// src/constants.rs

// --- Review Scheduling ---
pub const REVIEW_INTERVAL_HOURS: i64 = 24;

// --- Option Generation ---
pub const OPTION_COUNT: usize = 4;

/// Filler choice used when the bank cannot supply enough distinct distractors.
pub const PLACEHOLDER_OPTION: &str = "other answer";

/// Substitutions that mangle a code answer into a plausible near-miss.
pub const CODE_SWAPS: [(&str, &str); 3] = [
    ("import", "from"),
    ("as np", "as numpy"),
    ("as pd", "as pandas"),
];

/// Substitutions that mangle a prose answer by swapping its lead-in markers.
pub const TEXT_SWAPS: [(&str, &str); 2] = [
    ("Key point:", "Caution:"),
    ("Rationale:", "Reason:"),
];
