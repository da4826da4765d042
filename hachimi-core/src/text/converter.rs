use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use super::line::LineTransformer;
use crate::error::{Error, Result};
use crate::model::generator::Generator;
use crate::model::vocabulary::VocabularyStore;

/// Characters left out of the significant count.
pub const INSIGNIFICANT: [char; 4] = [' ', '\t', '\r', '\n'];

/// Counts every character of `s` except space, tab, CR and LF.
///
/// Punctuation and any other whitespace (e.g. U+3000) are counted.
pub fn count_significant(s: &str) -> usize {
	s.chars().filter(|c| !INSIGNIFICANT.contains(c)).count()
}

/// Characters that end a line. `\r\n` is read as a single terminator.
pub const LINE_TERMINATORS: [char; 10] = [
	'\n', '\r', '\u{0b}', '\u{0c}', '\u{1c}', '\u{1d}', '\u{1e}', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Splits `text` into lines on any of `LINE_TERMINATORS`.
///
/// - `\r\n` ends one line, not two
/// - Interior empty lines are kept
/// - A trailing terminator does not open an extra line
pub fn split_lines(text: &str) -> Vec<&str> {
	let mut lines = Vec::new();
	let mut start = 0;
	let mut chars = text.char_indices().peekable();

	while let Some((index, c)) = chars.next() {
		if !LINE_TERMINATORS.contains(&c) {
			continue;
		}
		lines.push(&text[start..index]);
		start = index + c.len_utf8();
		if c == '\r' && chars.next_if(|&(_, next)| next == '\n').is_some() {
			start += 1;
		}
	}
	if start < text.len() {
		lines.push(&text[start..]);
	}

	lines
}

/// Result of a whole-text conversion.
///
/// The counts are informational: they report how far the generated text
/// drifted from the input length.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Conversion {
	pub output: String,
	pub input_count: usize,
	pub output_count: usize,
}

impl Conversion {
	fn empty() -> Self {
		Self { output: String::new(), input_count: 0, output_count: 0 }
	}

	/// Absolute difference between the input and output counts.
	pub fn diff(&self) -> usize {
		self.input_count.abs_diff(self.output_count)
	}
}

/// Converts whole texts line by line.
#[derive(Debug, Clone, Copy)]
pub struct Converter<'a> {
	store: &'a VocabularyStore,
}

impl<'a> Converter<'a> {
	pub fn new(store: &'a VocabularyStore) -> Self {
		Self { store }
	}

	/// Converts `text` with the thread-local RNG.
	pub fn convert(&self, text: &str) -> Result<Conversion> {
		self.convert_with_rng(text, &mut rand::rng())
	}

	/// Converts `text` reproducibly: the same seed and vocabulary always
	/// give the same output.
	pub fn convert_seeded(&self, text: &str, seed: u64) -> Result<Conversion> {
		self.convert_with_rng(text, &mut StdRng::seed_from_u64(seed))
	}

	/// Converts `text`, drawing every random decision from `rng`.
	///
	/// # Behavior
	/// - Empty or whitespace-only text gives `("", 0, 0)` without touching
	///   the vocabulary.
	/// - Otherwise each line is transformed and the lines are joined with
	///   `\n`, whatever terminators the input used.
	///
	/// # Errors
	/// The first error aborts the conversion; no partial output is returned.
	pub fn convert_with_rng<R: Rng + ?Sized>(
		&self,
		text: &str,
		rng: &mut R,
	) -> Result<Conversion> {
		if text.trim().is_empty() {
			return Ok(Conversion::empty());
		}

		let transformer = LineTransformer::new(Generator::new(self.store));
		let lines = split_lines(text);
		debug!("Converting {} lines", lines.len());

		let output = lines
			.iter()
			.map(|line| transformer.transform_line(line, &mut *rng))
			.collect::<Result<Vec<_>>>()?
			.join("\n");

		let conversion = Conversion {
			input_count: count_significant(text),
			output_count: count_significant(&output),
			output,
		};
		info!(
			"Converted {} lines: input {} chars, output {} chars, diff {}",
			lines.len(), conversion.input_count, conversion.output_count, conversion.diff()
		);
		Ok(conversion)
	}
}

/// A conversion running on its own thread.
///
/// Yields exactly one outcome: the conversion, its error, or
/// `Error::Worker` if the thread died.
#[derive(Debug)]
pub struct PendingConversion {
	receiver: Receiver<Result<Conversion>>,
}

impl PendingConversion {
	/// Blocks until the conversion finishes.
	pub fn wait(self) -> Result<Conversion> {
		self.receiver
			.recv()
			.unwrap_or_else(|_| Err(Error::Worker("worker exited without a result".to_owned())))
	}

	/// Returns the outcome if ready, or gives the pending conversion back.
	pub fn try_wait(self) -> std::result::Result<Result<Conversion>, Self> {
		match self.receiver.try_recv() {
			Ok(result) => Ok(result),
			Err(TryRecvError::Empty) => Err(self),
			Err(TryRecvError::Disconnected) => {
				Ok(Err(Error::Worker("worker exited without a result".to_owned())))
			}
		}
	}
}

/// Starts converting `text` off the calling thread.
///
/// `seed` makes the run reproducible, as `Converter::convert_seeded`.
/// The conversion cannot be cancelled once started.
pub fn convert_in_background(
	store: Arc<VocabularyStore>,
	text: String,
	seed: Option<u64>,
) -> PendingConversion {
	let (tx, rx) = mpsc::channel();

	thread::spawn(move || {
		let converter = Converter::new(&store);
		let result = match seed {
			Some(seed) => converter.convert_seeded(&text, seed),
			None => converter.convert(&text),
		};
		// The receiver may be gone; nobody is left to notify
		let _ = tx.send(result);
	});

	PendingConversion { receiver: rx }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::VocabularyEntry;
	use crate::model::parameters::Parameters;
	use crate::model::vocabulary::{Pool, Vocabulary};

	fn words_store(words: &[(&str, usize)]) -> VocabularyStore {
		let words = words
			.iter()
			.map(|(text, length)| VocabularyEntry::new(text, Some(*length)).unwrap())
			.collect();
		VocabularyStore::new(Vocabulary::new(Vec::new(), words, Parameters::new(0.0, 4)))
	}

	fn empty_store() -> VocabularyStore {
		VocabularyStore::new(Vocabulary::new(Vec::new(), Vec::new(), Parameters::new(0.0, 4)))
	}

	#[test]
	fn significant_count_skips_only_four_whitespace_chars() {
		assert_eq!(count_significant(" a\tb\r\nc "), 3);
		assert_eq!(count_significant("Hi!"), 3);
		assert_eq!(count_significant("\u{3000}，。"), 3);
		assert_eq!(count_significant(""), 0);
	}

	#[test]
	fn lines_split_on_every_terminator() {
		assert_eq!(split_lines("a\nb\r\nc\rd"), vec!["a", "b", "c", "d"]);
		assert_eq!(split_lines("A\n\nB"), vec!["A", "", "B"]);
		assert_eq!(split_lines("a\n"), vec!["a"]);
		assert_eq!(split_lines("\n\na"), vec!["", "", "a"]);
		assert_eq!(split_lines("a\r\n\r\nb"), vec!["a", "", "b"]);
		assert_eq!(split_lines("a\u{2028}b\u{0c}c\u{85}d"), vec!["a", "b", "c", "d"]);
		assert_eq!(
			split_lines("a\u{0b}b\u{1c}c\u{1d}d\u{1e}e\u{2029}"),
			vec!["a", "b", "c", "d", "e"]
		);
		assert_eq!(split_lines("a\r\u{85}b"), vec!["a", "", "b"]);
	}

	#[test]
	fn empty_and_blank_texts_short_circuit() {
		// No pool at all: any lookup would fail
		let store = empty_store();
		let converter = Converter::new(&store);
		assert_eq!(converter.convert("").unwrap(), Conversion::empty());
		assert_eq!(converter.convert("   \n\t").unwrap(), Conversion::empty());
	}

	#[test]
	fn exact_words_give_matching_counts() {
		let store = words_store(&[("哈", 1), ("哈哈", 2)]);
		let conversion = Converter::new(&store).convert_seeded("Hi!", 1).unwrap();
		assert_eq!(conversion.output, "哈哈!");
		assert_eq!(conversion.input_count, 3);
		assert_eq!(conversion.output_count, 3);
		assert_eq!(conversion.diff(), 0);
	}

	#[test]
	fn nearest_word_drift_is_reported() {
		let store = words_store(&[("哈", 1)]);
		let conversion = Converter::new(&store).convert_seeded("Hi!", 1).unwrap();
		assert_eq!(conversion.output, "哈!");
		assert_eq!(conversion.input_count, 3);
		assert_eq!(conversion.output_count, 2);
		assert_eq!(conversion.diff(), 1);
	}

	#[test]
	fn empty_middle_line_is_preserved() {
		let store = words_store(&[("哈", 1)]);
		let conversion = Converter::new(&store).convert_seeded("A\n\nB", 3).unwrap();
		assert_eq!(conversion.output, "哈\n\n哈");
		assert_eq!(split_lines(&conversion.output).len(), 3);
	}

	#[test]
	fn crlf_input_is_joined_with_lf() {
		let store = words_store(&[("哈", 1)]);
		let conversion = Converter::new(&store).convert_seeded("a\r\nb", 3).unwrap();
		assert_eq!(conversion.output, "哈\n哈");
		assert_eq!(conversion.input_count, 2);
	}

	#[test]
	fn unicode_separators_split_lines() {
		let store = words_store(&[("X", 1)]);
		let text = "a\u{2028}b\u{0c}c\u{85}d";
		let conversion = Converter::new(&store).convert_seeded(text, 3).unwrap();
		assert_eq!(conversion.output, "X\nX\nX\nX");
		// U+0085 and U+2028 are not in the insignificant set
		assert_eq!(conversion.input_count, 7);
		assert_eq!(conversion.output_count, 4);
	}

	#[test]
	fn whitespace_only_lines_are_kept_verbatim() {
		let store = words_store(&[("哈", 1)]);
		let conversion = Converter::new(&store).convert_seeded("a\n  \nb", 3).unwrap();
		assert_eq!(conversion.output, "哈\n  \n哈");
	}

	#[test]
	fn empty_pool_fails_the_whole_conversion() {
		let store = empty_store();
		let err = Converter::new(&store).convert("ok\nfine").unwrap_err();
		assert!(matches!(err, Error::EmptyPool(Pool::Words)));
	}

	#[test]
	fn seeded_conversion_is_reproducible() {
		let store = VocabularyStore::seeded();
		let converter = Converter::new(&store);
		let text = "Never gonna give you up,\nnever gonna let you down.\n\n哈基米 123";
		assert_eq!(
			converter.convert_seeded(text, 77).unwrap(),
			converter.convert_seeded(text, 77).unwrap()
		);
	}

	#[test]
	fn background_conversion_delivers_one_outcome() {
		let store = Arc::new(words_store(&[("哈", 1), ("哈哈", 2)]));
		let pending = convert_in_background(store, "Hi!".to_owned(), Some(5));
		let conversion = pending.wait().unwrap();
		assert_eq!(conversion.output, "哈哈!");
	}

	#[test]
	fn background_conversion_can_be_polled() {
		let store = Arc::new(words_store(&[("哈", 1), ("哈哈", 2)]));
		let mut pending = convert_in_background(store, "Hi!\nyo".to_owned(), Some(5));
		let conversion = loop {
			match pending.try_wait() {
				Ok(outcome) => break outcome.unwrap(),
				Err(still_running) => {
					pending = still_running;
					thread::yield_now();
				}
			}
		};
		assert_eq!(conversion.output, "哈哈!\n哈哈");
	}

	#[test]
	fn try_wait_gives_back_an_unfinished_conversion() {
		let (tx, rx) = mpsc::channel();
		let pending = PendingConversion { receiver: rx };
		let pending = pending.try_wait().unwrap_err();

		tx.send(Ok(Conversion::empty())).unwrap();
		assert_eq!(pending.try_wait().unwrap().unwrap(), Conversion::empty());
	}

	#[test]
	fn dropped_worker_is_reported() {
		let (tx, rx) = mpsc::channel::<Result<Conversion>>();
		drop(tx);
		let pending = PendingConversion { receiver: rx };
		assert!(matches!(pending.try_wait(), Ok(Err(Error::Worker(_)))));

		let (tx, rx) = mpsc::channel::<Result<Conversion>>();
		drop(tx);
		let pending = PendingConversion { receiver: rx };
		assert!(matches!(pending.wait(), Err(Error::Worker(_))));
	}

	#[test]
	fn background_conversion_reports_errors() {
		let store = Arc::new(empty_store());
		let pending = convert_in_background(store, "Hi!".to_owned(), None);
		assert!(matches!(pending.wait(), Err(Error::EmptyPool(Pool::Words))));
	}
}
