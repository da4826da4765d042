use log::debug;
use rand::Rng;

use super::vocabulary::{Pool, VocabularyStore};
use crate::error::Result;

/// Longest target served by a single word lookup.
pub const MAX_WORD_TARGET: usize = 3;

/// Length-targeted text generator backed by a `VocabularyStore`.
///
/// # Responsibilities
/// - Produce text whose length roughly matches a requested target
/// - Mix fixed phrases and words according to the store parameters
/// - Draw every random decision from the caller's RNG, so a seeded RNG
///   gives reproducible output
///
/// The output length is approximate on purpose: a short target is filled
/// with the closest word available, whatever its real length.
#[derive(Debug, Clone, Copy)]
pub struct Generator<'a> {
	store: &'a VocabularyStore,
}

impl<'a> Generator<'a> {
	pub fn new(store: &'a VocabularyStore) -> Self {
		Self { store }
	}

	/// Generates text for `target_length` characters.
	///
	/// # Behavior
	/// For each pending target:
	/// - `0` produces nothing.
	/// - With probability `phrase_probability`, and only when the target
	///   reaches `min_phrase_length`, a phrase is drawn. A shorter phrase is
	///   completed by generating the remainder; a longer one is truncated
	///   to the target (char level).
	/// - Otherwise a target of at most `MAX_WORD_TARGET` takes the closest
	///   word as is, and a longer target is split at a random point in
	///   `[1, target - 1]`, left part first.
	///
	/// # Notes
	/// - Parameters are read once, when the call starts.
	/// - Pending targets live on an explicit stack instead of the call stack,
	///   so very long runs cannot overflow it. The pop order reproduces the
	///   left-to-right recursive order, including the order of RNG draws.
	///
	/// # Errors
	/// `Error::EmptyPool` if a required pool is empty, `Error::LockPoisoned`
	/// if the store lock is poisoned. No partial output is returned.
	pub fn generate<R: Rng + ?Sized>(&self, target_length: usize, rng: &mut R) -> Result<String> {
		if target_length == 0 {
			return Ok(String::new());
		}

		let parameters = self.store.parameters()?;
		debug!("Generating {} characters", target_length);

		let mut output = String::new();
		let mut pending = vec![target_length];

		while let Some(target) = pending.pop() {
			if target == 0 {
				continue;
			}

			let use_phrase = parameters.allows_phrase(target)
				&& rng.random::<f64>() < parameters.phrase_probability;

			if use_phrase {
				let phrase = self.store.select_by_length(Pool::Phrases, target, rng)?;
				let length = phrase.chars().count();
				if length < target {
					output.push_str(&phrase);
					pending.push(target - length);
				} else {
					output.extend(phrase.chars().take(target));
				}
			} else if target <= MAX_WORD_TARGET {
				output.push_str(&self.store.select_by_length(Pool::Words, target, rng)?);
			} else {
				let split_point = rng.random_range(1..target);
				// Right part first, so the left part is popped next
				pending.push(target - split_point);
				pending.push(split_point);
			}
		}

		Ok(output)
	}
}
