use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use zipf_heaps::{normalize, word_frequencies};

#[derive(Parser, Debug)]
#[command(author, version, about = "Print word frequencies of a text corpus", long_about = None)]
struct Args {
    /// Minimum count threshold for words to be included in vocabulary
    #[arg(short, long, default_value_t = 1)]
    min_count: usize,

    /// Read the named column of a CSV file instead of plain text
    #[arg(long)]
    column: Option<String>,

    /// Input file path (if not provided, reads from stdin)
    #[arg(value_name = "FILE")]
    input: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let raw = match (&args.input, &args.column) {
        (Some(filename), Some(column)) => zipf_heaps::corpus::load_csv_column(filename, column)?,
        (Some(filename), None) => {
            let file = File::open(filename).with_context(|| format!("failed to open {filename}"))?;
            read_all(Box::new(BufReader::new(file)))?
        }
        (None, _) => read_all(Box::new(BufReader::new(io::stdin())))?,
    };

    // Sorted by frequency (descending), ties in order of first appearance
    let vocabulary = word_frequencies(&normalize(&raw));

    let mut out = BufWriter::new(io::stdout().lock());
    for (word, count) in vocabulary
        .iter()
        .filter(|(_, count)| *count >= args.min_count)
    {
        writeln!(out, "{word}\t{count}")?;
    }
    out.flush()?;

    Ok(())
}

fn read_all(mut reader: Box<dyn BufRead>) -> io::Result<String> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    Ok(content)
}
