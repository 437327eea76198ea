use anyhow::{Context, Result};
use fst::MapBuilder;
use readalong_core::LexEntry;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{create_dir_all, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Summary written next to the artifacts.
#[derive(Debug, Serialize)]
pub struct BuildReport {
    pub inputs: Vec<PathBuf>,
    pub words: usize,
    pub pronunciations: usize,
    pub fst_bytes: u64,
    pub bincode_bytes: u64,
}

/// Merge one or more CMU dictionary files into `lexicon.fst` + `lexicon.bincode`.
///
/// Later inputs add pronunciations to words seen earlier; variant numbers are
/// kept so the loader can still prefer the primary one.
pub fn run(inputs: &[PathBuf], out_dir: &Path) -> Result<BuildReport> {
    let mut grouped: BTreeMap<String, Vec<LexEntry>> = BTreeMap::new();

    for input in inputs {
        let text = std::fs::read_to_string(input)
            .with_context(|| format!("reading {}", input.display()))?;
        let parsed = libphonics::cmudict::parse_grouped(&text)
            .with_context(|| format!("parsing {}", input.display()))?;
        for (word, entries) in parsed {
            let slot = grouped.entry(word).or_default();
            for entry in entries {
                if !slot.contains(&entry) {
                    slot.push(entry);
                }
            }
        }
    }

    create_dir_all(out_dir)?;
    let fst_path = out_dir.join("lexicon.fst");
    let bin_path = out_dir.join("lexicon.bincode");

    // Each key maps to the index of its payload group; BTreeMap order keeps
    // the FST insertion sorted.
    let mut map_builder = MapBuilder::new(BufWriter::new(File::create(&fst_path)?))?;
    let mut payloads: Vec<Vec<LexEntry>> = Vec::with_capacity(grouped.len());
    for (i, (word, entries)) in grouped.into_iter().enumerate() {
        map_builder.insert(&word, i as u64)?;
        payloads.push(entries);
    }
    map_builder.finish()?;

    let mut binf = BufWriter::new(File::create(&bin_path)?);
    bincode::serialize_into(&mut binf, &payloads)?;
    drop(binf);

    Ok(BuildReport {
        inputs: inputs.to_vec(),
        words: payloads.len(),
        pronunciations: payloads.iter().map(Vec::len).sum(),
        fst_bytes: std::fs::metadata(&fst_path)?.len(),
        bincode_bytes: std::fs::metadata(&bin_path)?.len(),
    })
}
