use thiserror::Error;

use crate::model::vocabulary::Pool;

/// Errors raised by the vocabulary, the generator and the converter.
///
/// A conversion never returns partial output: the first error aborts the
/// whole request and is handed back to the caller as is.
#[derive(Debug, Error)]
pub enum Error {
	/// A lookup was made against a pool holding no entries.
	#[error("The {0} pool is empty")]
	EmptyPool(Pool),

	/// An entry was added with an empty text.
	#[error("Vocabulary entries cannot be empty")]
	EmptyEntry,

	/// A writer panicked while holding the vocabulary lock.
	#[error("Vocabulary lock poisoned")]
	LockPoisoned,

	/// The background conversion thread panicked.
	#[error("Conversion worker failed: {0}")]
	Worker(String),
}

pub type Result<T> = std::result::Result<T, Error>;
