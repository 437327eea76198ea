use anyhow::{Context, Result};
use clap::Parser;
use fst::Map;
use readalong_core::LexEntry;

/// Print every pronunciation stored for a word.
#[derive(Parser)]
struct Args {
    fst_path: String,
    bincode_path: String,
    /// Word to look up (normalized: lower-case letters only)
    key: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let fst_data = std::fs::read(&args.fst_path).context("reading FST")?;
    let fst_map = Map::new(fst_data).context("parsing FST")?;

    let buffer = std::fs::read(&args.bincode_path).context("reading bincode")?;
    let entries: Vec<Vec<LexEntry>> =
        bincode::deserialize(&buffer).context("deserializing bincode")?;

    let Some(idx) = fst_map.get(&args.key) else {
        println!("Key '{}' not found in FST", args.key);
        return Ok(());
    };
    println!("Key '{}' found at index {}", args.key, idx);
    match entries.get(idx as usize) {
        Some(group) => {
            println!("Found {} entries:", group.len());
            for (i, entry) in group.iter().enumerate() {
                let phones: Vec<&str> = entry.phonemes.iter().map(|p| p.as_str()).collect();
                println!("  {}. {} (variant={})", i + 1, phones.join(" "), entry.variant);
            }
        }
        None => println!(
            "Error: Index {} out of range (total groups: {})",
            idx,
            entries.len()
        ),
    }
    Ok(())
}
