use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use zipf_heaps::corpus::merge_dir;

/// Appends every file under a directory tree to a single text corpus.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Set verbosity level
    #[arg(short, long, default_value_t = 1)]
    verbose: i32,

    /// Directory holding the per-article files
    #[arg(long, default_value = "./persian-data")]
    dir: PathBuf,

    /// Corpus file to append to
    #[arg(long, default_value = "allper.txt")]
    output: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.verbose > 0 {
        eprintln!("Merging files below {}", args.dir.display());
    }
    let merged = merge_dir(&args.dir, &args.output, args.verbose)?;
    if args.verbose > 0 {
        eprintln!("Appended {merged} file(s) to {}", args.output.display());
    }

    Ok(())
}
