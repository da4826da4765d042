use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Reads a whole text file into memory.
///
/// Line terminators are kept as is; splitting is left to the converter.
pub fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<String> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents)
}

/// Reads standard input until EOF.
pub fn read_stdin() -> io::Result<String> {
	let mut contents = String::new();
	io::stdin().read_to_string(&mut contents)?;
	Ok(contents)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_file_is_an_io_error() {
		let err = read_file("./does/not/exist.txt").unwrap_err();
		assert_eq!(err.kind(), io::ErrorKind::NotFound);
	}

	#[test]
	fn file_contents_keep_their_terminators() {
		let path = std::env::temp_dir().join("hachimi-core-io-test.txt");
		std::fs::write(&path, "a\r\nb\n").unwrap();
		assert_eq!(read_file(&path).unwrap(), "a\r\nb\n");
		std::fs::remove_file(&path).unwrap();
	}
}
