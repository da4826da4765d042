//! Vocabulary and length-targeted generation.
//!
//! - Vocabulary entries and the two entry pools (`VocabularyStore`)
//! - Generation parameters (`Parameters`)
//! - The length-targeted generator (`Generator`)

/// Length-targeted generator.
///
/// Fills a requested number of characters with phrases and words,
/// splitting long targets and completing short phrases.
pub mod generator;

/// Phrase and word pools with nearest-length lookup.
///
/// Shared behind a read/write lock between generation and administration.
pub mod vocabulary;

/// Tunable generation parameters.
pub mod parameters;

/// A single vocabulary item.
mod entry;

pub use entry::VocabularyEntry;
