use crate::fit::{LinearFit, fit_loglog};
use crate::normalize::tokenize;
use anyhow::Result;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fmt::Write;

// tokens per counting task
const CHUNK_SIZE: usize = 1 << 16;

/// One rank of the Zipf table.
#[derive(Debug, Clone, PartialEq)]
pub struct ZipfRow {
    pub rank: usize,
    pub word: String,
    /// Observed occurrences.
    pub total: usize,
    /// Zipf's relative frequency as a fraction label, `1/rank`.
    pub relative: String,
    /// Expected occurrences under Zipf's law: top frequency / rank.
    pub zipf: f64,
    /// `total - zipf`
    pub difference: f64,
    /// `total / zipf * 100`
    pub difference_percent: f64,
}

/// Words ranked by descending frequency with their Zipf statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZipfTable {
    rows: Vec<ZipfRow>,
}

/// Counts whitespace separated words of a normalized text and returns them
/// by descending count. Words with equal counts keep the order in which
/// they first appear.
pub fn word_frequencies(text: &str) -> Vec<(String, usize)> {
    let words = tokenize(text);

    // word -> (count, position of first occurrence)
    let counts: HashMap<&str, (usize, usize)> = words
        .par_chunks(CHUNK_SIZE)
        .enumerate()
        .map(|(chunk_idx, chunk)| {
            let offset = chunk_idx * CHUNK_SIZE;
            let mut local: HashMap<&str, (usize, usize)> = HashMap::new();
            for (i, &word) in chunk.iter().enumerate() {
                local.entry(word).or_insert((0, offset + i)).0 += 1;
            }
            local
        })
        .reduce(HashMap::new, |mut acc, other| {
            for (word, (count, first)) in other {
                let entry = acc.entry(word).or_insert((0, first));
                entry.0 += count;
                entry.1 = entry.1.min(first);
            }
            acc
        });

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .map(|(word, count, _)| (word.to_string(), count))
        .collect()
}

impl ZipfTable {
    /// Builds the table from a normalized text.
    pub fn from_text(text: &str) -> Self {
        Self::from_frequencies(word_frequencies(text))
    }

    /// `frequencies` must already be sorted by descending count.
    pub fn from_frequencies(frequencies: Vec<(String, usize)>) -> Self {
        let Some(&(_, top)) = frequencies.first() else {
            return ZipfTable::default();
        };
        let top = top as f64;

        let rows = frequencies
            .into_par_iter()
            .enumerate()
            .map(|(i, (word, total))| {
                let rank = i + 1;
                let zipf = top / rank as f64;
                ZipfRow {
                    rank,
                    word,
                    total,
                    relative: format!("1/{rank}"),
                    zipf,
                    difference: total as f64 - zipf,
                    difference_percent: total as f64 / zipf * 100.0,
                }
            })
            .collect();

        ZipfTable { rows }
    }

    pub fn rows(&self) -> &[ZipfRow] {
        &self.rows
    }

    /// Row by 1-based rank.
    pub fn row(&self, rank: usize) -> Option<&ZipfRow> {
        self.rows.get(rank.checked_sub(1)?)
    }

    /// The `n` most frequent words.
    pub fn top(&self, n: usize) -> &[ZipfRow] {
        &self.rows[..n.min(self.rows.len())]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of tokens the table was built from.
    pub fn total_tokens(&self) -> usize {
        self.rows.iter().map(|r| r.total).sum()
    }

    /// Least-squares fit of `log10 frequency` against `log10 rank`. The
    /// Zipf exponent is the negated slope.
    pub fn fit(&self) -> Result<LinearFit> {
        let ranks: Vec<f64> = self.rows.iter().map(|r| r.rank as f64).collect();
        let totals: Vec<f64> = self.rows.iter().map(|r| r.total as f64).collect();
        fit_loglog(&ranks, &totals)
    }

    /// Formats the table with aligned columns. Tables longer than
    /// `max_rows` are cut to their head and tail around a `...` line.
    pub fn render(&self, max_rows: usize) -> String {
        const HEADERS: [&str; 7] = [
            "index",
            "word",
            "total",
            "relative",
            "zipf",
            "difference",
            "difference_percent",
        ];

        let shown: Vec<Option<&ZipfRow>> = if self.rows.len() > max_rows {
            let head = max_rows.div_ceil(2);
            let tail = max_rows / 2;
            self.rows[..head]
                .iter()
                .map(Some)
                .chain(std::iter::once(None))
                .chain(self.rows[self.rows.len() - tail..].iter().map(Some))
                .collect()
        } else {
            self.rows.iter().map(Some).collect()
        };

        let cells: Vec<[String; 7]> = shown
            .iter()
            .map(|row| match row {
                Some(r) => [
                    r.rank.to_string(),
                    r.word.clone(),
                    r.total.to_string(),
                    r.relative.clone(),
                    format!("{:.6}", r.zipf),
                    format!("{:.6}", r.difference),
                    format!("{:.6}", r.difference_percent),
                ],
                None => std::array::from_fn(|_| "...".to_string()),
            })
            .collect();

        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in &cells {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        let header: Vec<String> = HEADERS
            .iter()
            .zip(&widths)
            .map(|(h, &w)| format!("{h:>w$}"))
            .collect();
        let _ = writeln!(out, "{}", header.join("  "));
        for row in &cells {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(c, &w)| format!("{c:>w$}"))
                .collect();
            let _ = writeln!(out, "{}", line.join("  "));
        }
        let _ = writeln!(out, "\n[{} rows x {} columns]", self.rows.len(), HEADERS.len());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SENTENCE: &str = "the cat sat on the mat the cat ran";

    #[test]
    fn counts_example_sentence() {
        let freqs = word_frequencies(SENTENCE);
        let expected: Vec<(String, usize)> = [
            ("the", 3),
            ("cat", 2),
            ("sat", 1),
            ("on", 1),
            ("mat", 1),
            ("ran", 1),
        ]
        .iter()
        .map(|&(w, c)| (w.to_string(), c))
        .collect();
        assert_eq!(freqs, expected);
    }

    #[test]
    fn ties_keep_first_seen_order_across_chunks() {
        // enough tokens to span several counting chunks
        let mut text = String::new();
        for i in 0..(3 * CHUNK_SIZE) {
            text.push_str(["x", "y", "z"][i % 3]);
            text.push(' ');
        }
        text.push_str("late");
        let freqs = word_frequencies(&text);
        let order: Vec<&str> = freqs.iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(order, vec!["x", "y", "z", "late"]);
        assert_eq!(freqs[0].1, CHUNK_SIZE);
    }

    #[test]
    fn table_statistics() {
        let table = ZipfTable::from_text(SENTENCE);
        assert_eq!(table.len(), 6);

        let first = table.row(1).unwrap();
        assert_eq!(first.word, "the");
        assert_eq!(first.relative, "1/1");
        assert_eq!(first.zipf, 3.0);
        assert_eq!(first.difference, 0.0);
        assert_eq!(first.difference_percent, 100.0);

        let second = table.row(2).unwrap();
        assert_eq!(second.word, "cat");
        assert_eq!(second.zipf, 1.5);
        assert_eq!(second.difference, 0.5);
        assert!((second.difference_percent - 133.333_333).abs() < 1e-5);

        let last = table.row(6).unwrap();
        assert_eq!(last.word, "ran");
        assert_eq!(last.relative, "1/6");
        assert_eq!(last.zipf, 0.5);
        assert_eq!(last.difference_percent, 200.0);

        assert!(table.row(0).is_none());
        assert!(table.row(7).is_none());
    }

    #[test]
    fn totals_sum_to_token_count_and_rank_one_is_max() {
        let text = "b a b c a b d e b a c c c c".to_string();
        let table = ZipfTable::from_text(&text);
        assert_eq!(table.total_tokens(), tokenize(&text).len());

        let max = table.rows().iter().map(|r| r.total).max().unwrap();
        assert_eq!(table.row(1).unwrap().total, max);
        assert!(table.rows().windows(2).all(|w| w[0].total >= w[1].total));
        assert!(table.rows().iter().enumerate().all(|(i, r)| r.rank == i + 1));
    }

    #[test]
    fn empty_text_gives_empty_table() {
        let table = ZipfTable::from_text("");
        assert!(table.is_empty());
        assert_eq!(table.total_tokens(), 0);
        assert!(table.top(50).is_empty());
        assert!(table.fit().is_err());
    }

    #[test]
    fn top_is_clamped() {
        let table = ZipfTable::from_text(SENTENCE);
        assert_eq!(table.top(2).len(), 2);
        assert_eq!(table.top(100).len(), 6);
    }

    #[test]
    fn fit_of_ideal_zipf_distribution() {
        let freqs: Vec<(String, usize)> = (1..=100)
            .map(|r| (format!("w{r}"), 100_000 / r))
            .collect();
        let table = ZipfTable::from_frequencies(freqs);
        let fit = table.fit().unwrap();
        assert!((fit.slope + 1.0).abs() < 0.01);
        assert!(fit.r_squared > 0.999);
    }

    #[test]
    fn render_truncates_long_tables() {
        let table = ZipfTable::from_text(SENTENCE);

        let full = table.render(60);
        assert!(full.lines().next().unwrap().contains("difference_percent"));
        assert!(full.contains("cat"));
        assert!(!full.contains("..."));
        assert!(full.contains("[6 rows x 7 columns]"));

        let cut = table.render(4);
        assert!(cut.contains("..."));
        assert!(cut.contains("the") && cut.contains("cat"));
        assert!(cut.contains("mat") && cut.contains("ran"));
        assert!(!cut.contains(" sat "));
        assert!(cut.contains("[6 rows x 7 columns]"));
    }
}
