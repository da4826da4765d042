use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use hachimi_core::io::{read_file, read_stdin};
use hachimi_core::{convert_in_background, VocabularyStore};

#[derive(Parser, Debug)]
#[command(name = "hachimi-exemple")]
#[command(about = "Convert lyrics into hachimi placeholder text")]
struct Args {
    /// Input file (stdin when omitted)
    file: Option<PathBuf>,

    /// Seed for a reproducible conversion
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    // Read the lyrics from the given file, or from stdin
    let text = match &args.file {
        Some(file) => {
            read_file(file).with_context(|| format!("Failed to read {}", file.display()))?
        }
        None => read_stdin().context("Failed to read stdin")?,
    };

    // The store starts with the built-in vocabulary
    let store = Arc::new(VocabularyStore::seeded());

    // Entries can be added at any time, with or without an explicit length
    store.add_word("哈基米", None)?;
    store.add_phrase("曼波曼波哈基米", Some(7))?;

    // Phrase probability (0.0..=1.0) and minimum phrase length
    store.configure(0.6, 4)?;

    // Empty entries are refused
    match store.add_word("", None) {
        Ok(_) => println!("Should not happen"),
        Err(e) => log::warn!("Refused entry: {e}"),
    }

    // Run the conversion off the main thread and wait for its single outcome
    let conversion = convert_in_background(Arc::clone(&store), text, args.seed).wait()?;

    println!("{}", conversion.output);
    println!(
        "input: {}, output: {}, diff: {}",
        conversion.input_count,
        conversion.output_count,
        conversion.diff()
    );

    Ok(())
}
