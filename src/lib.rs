//! Spaced repetition scheduling engine
//!
//! This crate decides which memorizable items (vocabulary words or
//! flashcards) are due for review, in what order a session presents
//! them, and how a grading outcome reschedules each item:
//! - SM-2 interval and ease factor updates with a 1.3 ease floor
//! - Due-subset selection over a collection at an explicit instant
//! - Shuffled review sessions that re-test forgotten items before
//!   completing, staging results for an all-or-nothing commit
//! - Optional JSON file storage for named collections
//!
//! The engine is synchronous and deterministic: "now" is an explicit
//! parameter everywhere and session shuffling accepts an injectable RNG.

pub mod algorithm;
pub mod models;
pub mod session;
pub mod storage;

pub use models::{Grade, ReviewItem, ReviewStats};
pub use session::{ReviewSession, SessionError, SessionStatus};
pub use storage::{CollectionStore, StorageError};
