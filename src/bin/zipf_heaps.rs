use anyhow::Result;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use zipf_heaps::Sources;
use zipf_heaps::driver::{self, Config};
use zipf_heaps::heaps::DEFAULT_SAMPLES;
use zipf_heaps::plot::PlotSize;

/// Interactive Heaps' and Zipf's law explorer for news corpora.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Set verbosity level
    #[arg(short, long, default_value_t = 1)]
    verbose: i32,

    /// CSV file of the English news dataset
    #[arg(long = "english-csv", default_value = "english_news/news.csv")]
    english_csv: PathBuf,

    /// Column of the English CSV holding article text
    #[arg(long = "english-column", default_value = "text")]
    english_column: String,

    /// Text file of the Persian news dataset
    #[arg(long = "persian-txt", default_value = "persian_news/news.txt")]
    persian_txt: PathBuf,

    /// Number of prefix lengths sampled for Heaps' law
    #[arg(long, default_value_t = DEFAULT_SAMPLES)]
    samples: usize,

    /// Shuffle tokens with this seed before Heaps sampling
    #[arg(long = "shuffle-seed")]
    shuffle_seed: Option<u64>,

    /// Zipf table rows printed before truncating
    #[arg(long = "max-rows", default_value_t = 10)]
    max_rows: usize,

    /// Number of ranks in the frequency bar plot
    #[arg(long = "top-n", default_value_t = 500)]
    top_n: usize,

    /// Number of words in the top words plot
    #[arg(long = "top-words", default_value_t = 50)]
    top_words: usize,

    /// Chart width in columns (default: terminal width)
    #[arg(long)]
    width: Option<usize>,

    /// Chart height in rows (default: terminal height)
    #[arg(long)]
    height: Option<usize>,
}

impl Args {
    fn into_config(self) -> Config {
        let size = match (self.width, self.height) {
            (None, None) => None,
            (w, h) => {
                let term = PlotSize::from_terminal();
                Some(PlotSize {
                    width: w.unwrap_or(term.width),
                    height: h.unwrap_or(term.height),
                })
            }
        };

        Config {
            sources: Sources {
                english_csv: self.english_csv,
                english_column: self.english_column,
                persian_txt: self.persian_txt,
            },
            samples: self.samples,
            shuffle_seed: self.shuffle_seed,
            max_rows: self.max_rows,
            frequency_top_n: self.top_n,
            top_words: self.top_words,
            size,
            verbose: self.verbose,
        }
    }
}

fn main() -> Result<()> {
    let config = Args::parse().into_config();

    if config.verbose > 1 {
        eprintln!("english corpus: {}", config.sources.english_csv.display());
        eprintln!("persian corpus: {}", config.sources.persian_txt.display());
        eprintln!("heaps samples: {}", config.samples);
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();
    driver::run(&config, &mut input, &mut stdout)
}
