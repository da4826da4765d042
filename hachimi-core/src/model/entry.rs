use serde::Serialize;

use crate::error::{Error, Result};

/// A single vocabulary item.
///
/// `selection_length` is the key used for length lookups. It usually equals
/// the character count of `text`, but it does not have to: an entry may be
/// registered under any length, and the generator trusts that key when
/// picking candidates.
///
/// ## Invariants
/// - `text` is never empty
/// - Entries are never modified once stored
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct VocabularyEntry {
	text: String,
	selection_length: usize,
}

impl VocabularyEntry {
	/// Creates an entry keyed by `selection_length`, or by the character count
	/// of `text` when no length is given.
	///
	/// # Errors
	/// `Error::EmptyEntry` if `text` is empty.
	pub fn new(text: &str, selection_length: Option<usize>) -> Result<Self> {
		if text.is_empty() {
			return Err(Error::EmptyEntry);
		}
		let selection_length = selection_length.unwrap_or_else(|| text.chars().count());
		Ok(Self { text: text.to_owned(), selection_length })
	}

	pub fn text(&self) -> &str {
		&self.text
	}

	pub fn selection_length(&self) -> usize {
		self.selection_length
	}

	/// Distance between the selection key and a requested length.
	pub fn distance(&self, target_length: usize) -> usize {
		self.selection_length.abs_diff(target_length)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn length_defaults_to_char_count() {
		let entry = VocabularyEntry::new("哈基米", None).unwrap();
		assert_eq!(entry.selection_length(), 3);
	}

	#[test]
	fn explicit_length_overrides_char_count() {
		let entry = VocabularyEntry::new("哈基米打败绿豆", Some(6)).unwrap();
		assert_eq!(entry.selection_length(), 6);
		assert_eq!(entry.text().chars().count(), 7);
	}

	#[test]
	fn empty_text_is_rejected() {
		assert!(matches!(VocabularyEntry::new("", Some(1)), Err(Error::EmptyEntry)));
	}

	#[test]
	fn distance_is_symmetric() {
		let entry = VocabularyEntry::new("曼波", None).unwrap();
		assert_eq!(entry.distance(5), 3);
		assert_eq!(entry.distance(0), 2);
		assert_eq!(entry.distance(2), 0);
	}
}
