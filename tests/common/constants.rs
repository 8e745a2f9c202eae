//! Shared constants for end-to-end tests
//!
//! When test data changes (user credentials, seeded songs), update only this file.
#![allow(dead_code)]

// ============================================================================
// Test User Credentials
// ============================================================================

pub const TEST_USER: &str = "testuser";

pub const TEST_EMAIL: &str = "testuser@moodtunes.test";

pub const TEST_PASS: &str = "testpass123";

pub const OTHER_USER: &str = "otheruser";

pub const OTHER_EMAIL: &str = "otheruser@moodtunes.test";

pub const OTHER_PASS: &str = "otherpass123";

// ============================================================================
// Seeded Songs
// ============================================================================

/// Songs seeded for each of the four moods.
pub const SONGS_PER_MOOD: usize = 5;

pub const SEEDED_SONGS_COUNT: usize = 20;

pub const SEEDED_MOODS: [&str; 4] = ["happy", "sad", "angry", "relaxed"];

/// First seeded song, "Happy" by Pharrell Williams.
pub const FIRST_SONG_ID: u64 = 1;

// ============================================================================
// Timeouts
// ============================================================================

pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 10;

pub const REQUEST_TIMEOUT_SECS: u64 = 5;
