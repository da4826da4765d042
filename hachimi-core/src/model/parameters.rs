use serde::{Deserialize, Serialize};

/// Default probability of drawing from the phrase pool.
pub const DEFAULT_PHRASE_PROBABILITY: f64 = 0.6;

/// Default minimum target length for which a phrase may be drawn.
pub const DEFAULT_MIN_PHRASE_LENGTH: usize = 4;

/// Tunable generation parameters.
///
/// # Fields
/// - `phrase_probability`: chance, in `[0.0, 1.0]`, that a generation step
///   draws a fixed phrase instead of combining words.
/// - `min_phrase_length`: shortest target length eligible for a phrase.
///
/// # Out-of-range values
/// Values are stored as given, never clamped:
/// - `phrase_probability <= 0.0` (or NaN) never selects a phrase.
/// - `phrase_probability >= 1.0` always selects a phrase once the target
///   reaches `min_phrase_length`.
/// - `min_phrase_length == 0` behaves like `1`, because a target of zero
///   returns before the phrase decision is made.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Parameters {
	pub phrase_probability: f64,
	pub min_phrase_length: usize,
}

impl Parameters {
	pub fn new(phrase_probability: f64, min_phrase_length: usize) -> Self {
		Self { phrase_probability, min_phrase_length }
	}

	/// Whether a step of `target_length` is allowed to draw a phrase at all.
	///
	/// This is the deterministic half of the phrase decision; the random half
	/// is made by the generator.
	pub fn allows_phrase(&self, target_length: usize) -> bool {
		target_length >= self.min_phrase_length && self.phrase_probability > 0.0
	}
}

impl Default for Parameters {
	fn default() -> Self {
		Self::new(DEFAULT_PHRASE_PROBABILITY, DEFAULT_MIN_PHRASE_LENGTH)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_the_seeded_vocabulary_settings() {
		let parameters = Parameters::default();
		assert_eq!(parameters.phrase_probability, 0.6);
		assert_eq!(parameters.min_phrase_length, 4);
	}

	#[test]
	fn zero_probability_never_allows_phrases() {
		let parameters = Parameters::new(0.0, 1);
		assert!(!parameters.allows_phrase(100));
	}

	#[test]
	fn nan_probability_never_allows_phrases() {
		let parameters = Parameters::new(f64::NAN, 1);
		assert!(!parameters.allows_phrase(10));
	}

	#[test]
	fn short_targets_are_below_the_phrase_threshold() {
		let parameters = Parameters::new(1.0, 4);
		assert!(!parameters.allows_phrase(3));
		assert!(parameters.allows_phrase(4));
	}

	#[test]
	fn parameters_deserialize_from_json() {
		let parameters: Parameters =
			serde_json::from_str(r#"{"phrase_probability":0.25,"min_phrase_length":6}"#).unwrap();
		assert_eq!(parameters, Parameters::new(0.25, 6));
	}
}
