use std::fmt;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::debug;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;

use super::entry::VocabularyEntry;
use super::parameters::Parameters;
use crate::error::{Error, Result};

/// Number of closest candidates kept when no entry matches exactly.
pub const NEAREST_CANDIDATES: usize = 5;

const DEFAULT_PHRASES: [(&str, usize); 20] = [
	("哈基米那没路多", 7), ("阿西嘎哈呀库那路", 7), ("叮咚鸡大狗叫", 6), ("曼波马吉利", 5),
	("哇夏马自立曼波", 7), ("哈基米打败绿豆", 6), ("吉米阿西嘎阿西", 7), ("游哒游哒曼波", 6),
	("吉米哈压库纳鲁", 7), ("阿西噶哒布哒布", 7), ("哈基米我哪买绿豆", 8), ("阿西噶压库纳鲁", 7),
	("哈压库阿西噶", 6), ("西哈基米米", 5), ("哟罗西库呐", 6), ("马斯塔马斯塔", 6),
	("阿里嘎多那路", 7), ("多佐罗多佐罗", 6), ("哈耶克哈耶克", 6), ("咪西咪西", 5),
];

const DEFAULT_WORDS: [(&str, usize); 54] = [
	("哈基米", 3), ("阿西嘎", 3), ("哟罗西", 3), ("哇卡鲁", 3), ("索得斯", 3), ("米娜桑", 3),
	("多佐罗", 3), ("哈耶克", 3), ("马斯塔", 3), ("阿里嘎", 3), ("哦莫西", 3), ("考考油", 3),
	("斯国一", 3), ("乌拉拉", 3), ("咪西咪", 3), ("呀哈哟", 3), ("纳尼尼", 3), ("哆啦咪", 3),
	("呼啦哈", 3), ("啾咪啾", 3), ("曼波", 2), ("奶龙", 2), ("叮咚", 2), ("哦曼波", 3),
	("哈基", 2), ("阿西", 2), ("哟罗", 2), ("哇卡", 2), ("索得", 2), ("米娜", 2),
	("多佐", 2), ("哈耶", 2), ("马斯", 2), ("阿里", 2), ("哦莫", 2), ("考考", 2),
	("斯国", 2), ("乌拉", 2), ("咪西", 2), ("呀哈", 2), ("纳尼", 2), ("哆啦", 2),
	("呼啦", 2), ("啾咪", 2), ("哈", 1), ("啊", 1), ("哟", 1), ("哇", 1),
	("嗯", 1), ("咪", 1), ("西", 1), ("嘎", 1), ("鲁", 1), ("斯", 1),
];

fn to_entries(items: &[(&str, usize)]) -> Vec<VocabularyEntry> {
	items
		.iter()
		.filter_map(|(text, length)| VocabularyEntry::new(text, Some(*length)).ok())
		.collect()
}

/// The two entry collections a lookup can target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pool {
	Phrases,
	Words,
}

impl fmt::Display for Pool {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Pool::Phrases => f.write_str("phrase"),
			Pool::Words => f.write_str("word"),
		}
	}
}

/// Plain vocabulary data: both entry pools and the generation parameters.
///
/// The order of each pool is the insertion order, which is also the
/// tie-break order of nearest-length lookups.
#[derive(Serialize, Clone, Debug)]
pub struct Vocabulary {
	phrases: Vec<VocabularyEntry>,
	words: Vec<VocabularyEntry>,
	parameters: Parameters,
}

impl Vocabulary {
	/// Builds a vocabulary from explicit pools.
	///
	/// Pools may be empty; any lookup against an empty pool then fails with
	/// `Error::EmptyPool`.
	pub fn new(
		phrases: Vec<VocabularyEntry>,
		words: Vec<VocabularyEntry>,
		parameters: Parameters,
	) -> Self {
		Self { phrases, words, parameters }
	}

	/// The built-in hachimi vocabulary with default parameters.
	pub fn seeded() -> Self {
		Self::new(to_entries(&DEFAULT_PHRASES), to_entries(&DEFAULT_WORDS), Parameters::default())
	}

	pub fn pool(&self, pool: Pool) -> &[VocabularyEntry] {
		match pool {
			Pool::Phrases => &self.phrases,
			Pool::Words => &self.words,
		}
	}

	pub fn parameters(&self) -> Parameters {
		self.parameters
	}

	fn push(&mut self, pool: Pool, text: &str, selection_length: Option<usize>) -> Result<()> {
		let entry = VocabularyEntry::new(text, selection_length)?;
		debug!("Adding {} '{}' under length {}", pool, entry.text(), entry.selection_length());
		match pool {
			Pool::Phrases => self.phrases.push(entry),
			Pool::Words => self.words.push(entry),
		}
		Ok(())
	}

	/// Picks the text of an entry whose selection length is closest to
	/// `target_length`.
	///
	/// - Exact matches win: one of them is chosen uniformly.
	/// - Otherwise the `NEAREST_CANDIDATES` entries with the smallest
	///   distance are kept (earlier entries win ties) and one of them is
	///   chosen uniformly.
	///
	/// This is a linear scan; pools are small.
	///
	/// # Errors
	/// `Error::EmptyPool` if the pool holds no entries.
	pub fn select_by_length<R: Rng + ?Sized>(
		&self,
		pool: Pool,
		target_length: usize,
		rng: &mut R,
	) -> Result<String> {
		let entries = self.pool(pool);
		if entries.is_empty() {
			return Err(Error::EmptyPool(pool));
		}

		let exact: Vec<&VocabularyEntry> = entries
			.iter()
			.filter(|entry| entry.selection_length() == target_length)
			.collect();

		let candidates = if exact.is_empty() {
			// Stable sort keeps insertion order among equal distances
			let mut nearest: Vec<&VocabularyEntry> = entries.iter().collect();
			nearest.sort_by_key(|entry| entry.distance(target_length));
			nearest.truncate(NEAREST_CANDIDATES);
			nearest
		} else {
			exact
		};

		candidates
			.choose(rng)
			.map(|entry| entry.text().to_owned())
			.ok_or(Error::EmptyPool(pool))
	}
}

/// Thread-safe vocabulary shared between the generator and the
/// administration surface.
///
/// # Concurrency
/// - Every lookup holds the read lock for its whole scan, so it always sees
///   a consistent pool.
/// - Appends and reconfiguration take the write lock.
/// - Nothing spans several lookups: one generation may observe entries added
///   while it runs.
#[derive(Debug)]
pub struct VocabularyStore {
	inner: RwLock<Vocabulary>,
}

impl Default for VocabularyStore {
	fn default() -> Self {
		Self::seeded()
	}
}

impl VocabularyStore {
	pub fn new(vocabulary: Vocabulary) -> Self {
		Self { inner: RwLock::new(vocabulary) }
	}

	/// Store holding the built-in vocabulary.
	pub fn seeded() -> Self {
		Self::new(Vocabulary::seeded())
	}

	/// Store holding the built-in vocabulary with custom parameters.
	pub fn with_parameters(parameters: Parameters) -> Self {
		let mut vocabulary = Vocabulary::seeded();
		vocabulary.parameters = parameters;
		Self::new(vocabulary)
	}

	fn read(&self) -> Result<RwLockReadGuard<'_, Vocabulary>> {
		self.inner.read().map_err(|_| Error::LockPoisoned)
	}

	fn write(&self) -> Result<RwLockWriteGuard<'_, Vocabulary>> {
		self.inner.write().map_err(|_| Error::LockPoisoned)
	}

	/// Appends a fixed phrase, keyed by its char count unless a length is given.
	pub fn add_phrase(&self, text: &str, selection_length: Option<usize>) -> Result<()> {
		self.write()?.push(Pool::Phrases, text, selection_length)
	}

	/// Appends a word, keyed by its char count unless a length is given.
	pub fn add_word(&self, text: &str, selection_length: Option<usize>) -> Result<()> {
		self.write()?.push(Pool::Words, text, selection_length)
	}

	/// Replaces both generation parameters. Values are not validated, see
	/// `Parameters` for how out-of-range values behave.
	pub fn configure(&self, phrase_probability: f64, min_phrase_length: usize) -> Result<()> {
		self.set_parameters(Parameters::new(phrase_probability, min_phrase_length))
	}

	pub fn set_parameters(&self, parameters: Parameters) -> Result<()> {
		debug!(
			"Reconfiguring vocabulary: phrase_probability={}, min_phrase_length={}",
			parameters.phrase_probability, parameters.min_phrase_length
		);
		self.write()?.parameters = parameters;
		Ok(())
	}

	pub fn parameters(&self) -> Result<Parameters> {
		Ok(self.read()?.parameters())
	}

	/// Copy of one pool, in insertion order.
	pub fn entries(&self, pool: Pool) -> Result<Vec<VocabularyEntry>> {
		Ok(self.read()?.pool(pool).to_vec())
	}

	/// Copy of the whole vocabulary.
	pub fn snapshot(&self) -> Result<Vocabulary> {
		Ok(self.read()?.clone())
	}

	/// See `Vocabulary::select_by_length`.
	pub fn select_by_length<R: Rng + ?Sized>(
		&self,
		pool: Pool,
		target_length: usize,
		rng: &mut R,
	) -> Result<String> {
		self.read()?.select_by_length(pool, target_length, rng)
	}
}
