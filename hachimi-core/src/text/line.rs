use log::trace;
use rand::Rng;

use crate::error::Result;
use crate::model::generator::Generator;

/// A maximal run of token characters inside a line.
///
/// Positions are char indices, not byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenRun {
	pub start: usize,
	pub len: usize,
}

impl TokenRun {
	/// Char index one past the last character of the run.
	pub fn end(&self) -> usize {
		self.start + self.len
	}
}

/// Whether `c` is replaced by generated text.
///
/// Letters, digits and ideographs are tokens; whitespace, punctuation and
/// symbols are separators.
pub fn is_token(c: char) -> bool {
	c.is_alphanumeric()
}

/// Lists the token runs of `line`, left to right.
pub fn token_runs(line: &str) -> Vec<TokenRun> {
	let mut runs = Vec::new();
	let mut current: Option<TokenRun> = None;

	for (index, c) in line.chars().enumerate() {
		if !is_token(c) {
			runs.extend(current.take());
			continue;
		}
		match current.as_mut() {
			Some(run) => run.len += 1,
			None => current = Some(TokenRun { start: index, len: 1 }),
		}
	}
	runs.extend(current);

	runs
}

/// Rewrites single lines, replacing each token run with generated text.
#[derive(Debug, Clone, Copy)]
pub struct LineTransformer<'a> {
	generator: Generator<'a>,
}

impl<'a> LineTransformer<'a> {
	pub fn new(generator: Generator<'a>) -> Self {
		Self { generator }
	}

	/// Transforms one line (without its terminator).
	///
	/// # Behavior
	/// - Empty and whitespace-only lines are returned unchanged.
	/// - Every token run of length `L` is replaced by `generate(L)`, spliced
	///   at the run's own position. Runs are never located by content, so
	///   two runs with identical text are each replaced in place.
	/// - Separator characters are copied verbatim, in order.
	///
	/// # Errors
	/// Propagates the first generator error; no partial line is returned.
	pub fn transform_line<R: Rng + ?Sized>(&self, line: &str, rng: &mut R) -> Result<String> {
		if line.trim().is_empty() {
			return Ok(line.to_owned());
		}

		let chars: Vec<char> = line.chars().collect();
		let mut output = String::with_capacity(line.len());
		let mut cursor = 0;

		for run in token_runs(line) {
			output.extend(&chars[cursor..run.start]);
			let replacement = self.generator.generate(run.len, rng)?;
			trace!("Run {}..{} -> '{}'", run.start, run.end(), replacement);
			output.push_str(&replacement);
			cursor = run.end();
		}
		output.extend(&chars[cursor..]);

		Ok(output)
	}
}
