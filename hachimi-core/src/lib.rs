//! Hachimi placeholder-language converter.
//!
//! This crate rewrites arbitrary text into vocabulary-sourced placeholder
//! syllables while keeping the text's shape:
//! - Line structure, whitespace and punctuation are left in place
//! - Every run of letters, digits or ideographs is replaced by generated
//!   text of roughly the same length
//! - Input and output significant-character counts are reported
//!
//! The vocabulary is shared behind a lock so entries can be added and
//! parameters changed while conversions run.

/// Vocabulary pools, generation parameters and the length-targeted generator.
pub mod model;

/// Line segmentation and whole-text conversion.
pub mod text;

/// Error type shared by the whole crate.
pub mod error;

/// I/O helpers (file and stdin loading).
pub mod io;

pub use error::{Error, Result};
pub use model::VocabularyEntry;
pub use model::generator::Generator;
pub use model::parameters::Parameters;
pub use model::vocabulary::{Pool, Vocabulary, VocabularyStore};
pub use text::converter::{
	convert_in_background, count_significant, Conversion, Converter, PendingConversion,
};
