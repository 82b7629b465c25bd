//! The interactive menu: pick a dataset, a law, then a chart.

use crate::corpus::{Dataset, Sources};
use crate::heaps::{self, DEFAULT_SAMPLES, HeapsParams};
use crate::normalize::{normalize, tokenize};
use crate::plot::{self, PlotSize};
use crate::zipf::ZipfTable;
use anyhow::Result;
use chrono::Local;
use std::io::{BufRead, Write};
use std::time::Instant;

/// Settings for one interactive session.
#[derive(Debug, Clone)]
pub struct Config {
    pub sources: Sources,
    /// Prefix lengths sampled for the Heaps curve.
    pub samples: usize,
    /// Shuffle tokens with this seed before Heaps sampling.
    pub shuffle_seed: Option<u64>,
    /// Rows printed before the Zipf table is cut to head and tail.
    pub max_rows: usize,
    pub frequency_top_n: usize,
    pub top_words: usize,
    /// Chart size; `None` follows the terminal.
    pub size: Option<PlotSize>,
    pub verbose: i32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            sources: Sources::default(),
            samples: DEFAULT_SAMPLES,
            shuffle_seed: None,
            max_rows: 10,
            frequency_top_n: 500,
            top_words: 50,
            size: None,
            verbose: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Law {
    Heaps,
    Zipf,
}

fn log_stage(config: &Config, msg: &str) {
    if config.verbose > 0 {
        let time_str = Local::now().format("%x - %I:%M.%S%p");
        eprintln!("{time_str}, {msg}");
    }
}

/// Reads one trimmed line, `None` at end of input.
fn read_choice<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut s = String::new();
    if input.read_line(&mut s)? == 0 {
        return Ok(None);
    }
    Ok(Some(s.trim().to_string()))
}

fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, question: &str) -> Result<Option<String>> {
    write!(out, "{question}")?;
    out.flush()?;
    read_choice(input)
}

/// Prints a chart and blocks until the user dismisses it.
fn show<R: BufRead, W: Write>(input: &mut R, out: &mut W, chart: &str) -> Result<()> {
    writeln!(out, "{chart}")?;
    write!(out, "(press Enter to close the plot)")?;
    out.flush()?;
    read_choice(input)?;
    writeln!(out)?;
    Ok(())
}

/// Runs the menu loop until the user quits, input ends, or a choice is
/// not recognised. Failing to load a corpus aborts the loop with an error.
pub fn run<R: BufRead, W: Write>(config: &Config, input: &mut R, out: &mut W) -> Result<()> {
    let size = config.size.unwrap_or_else(PlotSize::from_terminal);

    loop {
        writeln!(out, "\nEnter q to exit.\n\nDataSets:")?;
        writeln!(out, "    1. {}({})", Dataset::English.name(), Dataset::English.source_url())?;
        writeln!(out, "    2. {}({})", Dataset::Persian.name(), Dataset::Persian.source_url())?;

        let dataset = match prompt(input, out, "Which one?(1 or 2):")?.as_deref() {
            None | Some("q") => break,
            Some("1") => Dataset::English,
            Some("2") => Dataset::Persian,
            Some(_) => {
                writeln!(out, "Wrong!")?;
                break;
            }
        };

        let start = Instant::now();
        let raw = config.sources.load(dataset)?;
        let text = normalize(&raw);
        drop(raw);
        log_stage(config, &format!("loaded {}: {} bytes after cleaning", dataset.name(), text.len()));
        if config.verbose > 1 {
            eprintln!("load and clean took {:.2?}", start.elapsed());
        }

        writeln!(out, "\n    1. heaps law\n    2. zipfs law")?;
        let law = match prompt(input, out, "Which one?(1 or 2):")?.as_deref() {
            Some("1") => Law::Heaps,
            Some("2") => Law::Zipf,
            None => break,
            Some(_) => {
                writeln!(out, "Wrong!")?;
                break;
            }
        };

        let keep_going = match law {
            Law::Heaps => heaps_menu(config, &text, size, input, out)?,
            Law::Zipf => zipf_menu(config, &text, size, input, out)?,
        };
        if !keep_going {
            break;
        }
    }

    Ok(())
}

fn heaps_menu<R: BufRead, W: Write>(
    config: &Config,
    text: &str,
    size: PlotSize,
    input: &mut R,
    out: &mut W,
) -> Result<bool> {
    writeln!(out, "\n    1. loglog plot\n    2. frequency plot")?;

    let start = Instant::now();
    let words = tokenize(text);
    let samples = match config.shuffle_seed {
        Some(seed) => heaps::sample_shuffled(&words, config.samples, seed),
        None => heaps::sample(&words, config.samples),
    };
    if let Some((total, vocab)) = samples.last() {
        log_stage(config, &format!("heaps samples: {total} tokens, {vocab} distinct"));
    }
    if config.verbose > 1 {
        eprintln!("sampling took {:.2?}", start.elapsed());
    }

    match prompt(input, out, "Which one?(1 or 2):")?.as_deref() {
        Some("1") => {
            let fit = samples.fit()?;
            show(input, out, &plot::heaps_loglog(&samples, &fit, size))?;
        }
        Some("2") => {
            let params = HeapsParams::from_fit(&samples.fit()?);
            writeln!(out, "Heaps' parameters: k={:.2}, b={:.2}", params.k, params.b)?;
            show(input, out, &plot::heaps_linear(&samples, &params, size))?;
        }
        None => return Ok(false),
        Some(_) => {
            writeln!(out, "Wrong!")?;
            return Ok(false);
        }
    }
    Ok(true)
}

fn zipf_menu<R: BufRead, W: Write>(
    config: &Config,
    text: &str,
    size: PlotSize,
    input: &mut R,
    out: &mut W,
) -> Result<bool> {
    let start = Instant::now();
    let table = ZipfTable::from_text(text);
    log_stage(
        config,
        &format!("zipf table: {} tokens, {} distinct", table.total_tokens(), table.len()),
    );
    if config.verbose > 1 {
        eprintln!("counting took {:.2?}", start.elapsed());
    }

    writeln!(
        out,
        "\n    1. loglog plot\n    2. frequency plot\n    3. top {} words\n    4. print table",
        config.top_words
    )?;
    match prompt(input, out, "Which one?(1 or 2 or 3 or 4):")?.as_deref() {
        Some("1") => {
            if let Ok(fit) = table.fit() {
                writeln!(out, "Zipf exponent: s={:.3} (R^2={:.3})", -fit.slope, fit.r_squared)?;
            }
            show(input, out, &plot::zipf_loglog(&table, size))?;
        }
        Some("2") => show(
            input,
            out,
            &plot::frequency_plot(&table, config.frequency_top_n, size),
        )?,
        Some("3") => show(input, out, &plot::top_words_plot(&table, config.top_words, size))?,
        Some("4") => write!(out, "{}", table.render(config.max_rows))?,
        None => return Ok(false),
        Some(_) => {
            writeln!(out, "Wrong!")?;
            return Ok(false);
        }
    }
    Ok(true)
}
