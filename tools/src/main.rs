mod build_lexicon;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// Build lexicon.fst + lexicon.bincode from CMU dictionary files.
#[derive(Parser)]
struct Args {
    /// One or more dictionary files, merged in order
    #[arg(long, num_args = 1.., required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory
    #[arg(long, default_value = "data")]
    out_dir: PathBuf,

    /// Also write build_report.json to the output directory
    #[arg(long)]
    report: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let report = build_lexicon::run(&args.inputs, &args.out_dir)?;
    println!(
        "Wrote {} words ({} pronunciations) to {}",
        report.words,
        report.pronunciations,
        args.out_dir.display()
    );

    if args.report {
        let path = args.out_dir.join("build_report.json");
        std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
        println!("Wrote report to {}", path.display());
    }
    Ok(())
}
