//! Text-mode charts for the terminal.
//!
//! Every renderer returns the finished chart as a `String`; the caller decides
//! where it goes. Points that cannot be placed on a log axis (values <= 0) are
//! skipped.

use crate::fit::LinearFit;
use crate::heaps::{HeapsParams, HeapsSamples};
use crate::zipf::ZipfTable;
use std::fmt::Write;

const Y_TICK_WIDTH: usize = 10;
const MIN_PLOT_WIDTH: usize = 10;
const MIN_PLOT_HEIGHT: usize = 5;

/// Outer dimensions of a chart in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotSize {
    pub width: usize,
    pub height: usize,
}

impl Default for PlotSize {
    fn default() -> Self {
        PlotSize {
            width: 100,
            height: 30,
        }
    }
}

impl PlotSize {
    /// Current terminal size, or the default when stdout is not a terminal.
    pub fn from_terminal() -> Self {
        match crossterm::terminal::size() {
            Ok((cols, rows)) if cols > 0 && rows > 0 => PlotSize {
                width: cols as usize,
                // leave room for the prompt under the chart
                height: (rows as usize).saturating_sub(2),
            },
            _ => PlotSize::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Linear,
    Log10,
}

impl Scale {
    fn forward(self, v: f64) -> Option<f64> {
        let t = match self {
            Scale::Linear => v,
            Scale::Log10 if v > 0.0 => v.log10(),
            Scale::Log10 => return None,
        };
        t.is_finite().then_some(t)
    }

    fn inverse(self, t: f64) -> f64 {
        match self {
            Scale::Linear => t,
            Scale::Log10 => 10f64.powf(t),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Points,
    Line,
    Dashed,
    /// Filled from the bottom of the plot up to each point.
    Bars,
}

#[derive(Debug, Clone)]
pub struct Series {
    pub label: String,
    pub marker: char,
    pub style: Style,
    pub points: Vec<(f64, f64)>,
}

impl Series {
    pub fn new(label: &str, marker: char, style: Style, points: Vec<(f64, f64)>) -> Self {
        Series {
            label: label.to_string(),
            marker,
            style,
            points,
        }
    }
}

/// A 2-D chart drawn with characters.
#[derive(Debug, Clone)]
pub struct Chart {
    title: String,
    x_label: String,
    y_label: String,
    x_scale: Scale,
    y_scale: Scale,
    x_range: Option<(f64, f64)>,
    y_range: Option<(f64, f64)>,
    series: Vec<Series>,
    labels: Vec<(f64, f64, String)>,
}

impl Chart {
    pub fn new(title: &str) -> Self {
        Chart {
            title: title.to_string(),
            x_label: String::new(),
            y_label: String::new(),
            x_scale: Scale::Linear,
            y_scale: Scale::Linear,
            x_range: None,
            y_range: None,
            series: Vec::new(),
            labels: Vec::new(),
        }
    }

    pub fn x_label(mut self, label: &str) -> Self {
        self.x_label = label.to_string();
        self
    }

    pub fn y_label(mut self, label: &str) -> Self {
        self.y_label = label.to_string();
        self
    }

    pub fn log_log(mut self) -> Self {
        self.x_scale = Scale::Log10;
        self.y_scale = Scale::Log10;
        self
    }

    /// Fixed x limits in data units.
    pub fn x_range(mut self, min: f64, max: f64) -> Self {
        self.x_range = Some((min, max));
        self
    }

    /// Fixed y limits in data units.
    pub fn y_range(mut self, min: f64, max: f64) -> Self {
        self.y_range = Some((min, max));
        self
    }

    pub fn series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    /// Text placed just right of a data point.
    pub fn label(mut self, x: f64, y: f64, text: &str) -> Self {
        self.labels.push((x, y, text.to_string()));
        self
    }

    fn limits(&self, range: Option<(f64, f64)>, scale: Scale, pick: fn(&(f64, f64)) -> f64) -> (f64, f64) {
        let (lo, hi) = match range.and_then(|(a, b)| Some((scale.forward(a)?, scale.forward(b)?))) {
            Some(r) => r,
            None => self
                .series
                .iter()
                .flat_map(|s| s.points.iter())
                .filter_map(|p| scale.forward(pick(p)))
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v))),
        };
        if !lo.is_finite() || !hi.is_finite() {
            (0.0, 1.0)
        } else if lo == hi {
            (lo - 0.5, hi + 0.5)
        } else {
            (lo, hi)
        }
    }

    pub fn render(&self, size: PlotSize) -> String {
        let legend: Vec<&Series> = self.series.iter().filter(|s| !s.label.is_empty()).collect();
        let pw = size.width.saturating_sub(Y_TICK_WIDTH + 2).max(MIN_PLOT_WIDTH);
        let ph = size
            .height
            .saturating_sub(6 + legend.len())
            .max(MIN_PLOT_HEIGHT);

        let (x_min, x_max) = self.limits(self.x_range, self.x_scale, |p| p.0);
        let (y_min, y_max) = self.limits(self.y_range, self.y_scale, |p| p.1);

        // screen coordinates as floats, row 0 at the top
        let to_screen = |x: f64, y: f64| -> Option<(f64, f64)> {
            let tx = self.x_scale.forward(x)?;
            let ty = self.y_scale.forward(y)?;
            let col = (tx - x_min) / (x_max - x_min) * (pw - 1) as f64;
            let row = (ph - 1) as f64 - (ty - y_min) / (y_max - y_min) * (ph - 1) as f64;
            Some((col, row))
        };

        let mut grid = vec![vec![' '; pw]; ph];
        let mut put = |col: f64, row: f64, c: char| {
            let (col, row) = (col.round(), row.round());
            if col >= 0.0 && row >= 0.0 && (col as usize) < pw && (row as usize) < ph {
                grid[row as usize][col as usize] = c;
            }
        };

        for s in &self.series {
            let screen: Vec<(f64, f64)> = s.points.iter().filter_map(|&(x, y)| to_screen(x, y)).collect();
            match s.style {
                Style::Points => {
                    for &(c, r) in &screen {
                        put(c, r, s.marker);
                    }
                }
                Style::Line | Style::Dashed => {
                    if let [(c, r)] = screen[..] {
                        put(c, r, s.marker);
                    }
                    let mut step_no = 0usize;
                    for w in screen.windows(2) {
                        let ((c0, r0), (c1, r1)) = (w[0], w[1]);
                        let steps = (c1 - c0).abs().max((r1 - r0).abs()).ceil().max(1.0) as usize;
                        for i in 0..=steps {
                            step_no += 1;
                            if s.style == Style::Dashed && step_no % 4 >= 2 {
                                continue;
                            }
                            let f = i as f64 / steps as f64;
                            put(c0 + (c1 - c0) * f, r0 + (r1 - r0) * f, s.marker);
                        }
                    }
                }
                Style::Bars => {
                    for &(c, r) in &screen {
                        let top = r.round().max(0.0) as usize;
                        for row in top..ph {
                            put(c, row as f64, s.marker);
                        }
                    }
                }
            }
        }

        for (x, y, text) in &self.labels {
            if let Some((c, r)) = to_screen(*x, *y) {
                for (i, ch) in text.chars().enumerate() {
                    put(c + 1.0 + i as f64, r, ch);
                }
            }
        }

        let mut out = String::new();
        let full_width = Y_TICK_WIDTH + 2 + pw;
        let _ = writeln!(out, "{}", center(&self.title, full_width));
        if !self.y_label.is_empty() {
            let _ = writeln!(out, "{}", self.y_label);
        } else {
            let _ = writeln!(out);
        }

        for (r, row) in grid.iter().enumerate() {
            let tick = if r == 0 {
                tick_label(self.y_scale.inverse(y_max))
            } else if r == ph - 1 {
                tick_label(self.y_scale.inverse(y_min))
            } else if r == ph / 2 {
                tick_label(self.y_scale.inverse((y_min + y_max) / 2.0))
            } else {
                String::new()
            };
            let line: String = row.iter().collect();
            let _ = writeln!(out, "{tick:>Y_TICK_WIDTH$} |{}", line.trim_end());
        }
        let _ = writeln!(out, "{:>Y_TICK_WIDTH$} +{}", "", "-".repeat(pw));

        let mut x_ticks = vec![' '; pw];
        let lo = tick_label(self.x_scale.inverse(x_min));
        let mid = tick_label(self.x_scale.inverse((x_min + x_max) / 2.0));
        let hi = tick_label(self.x_scale.inverse(x_max));
        place(&mut x_ticks, 0, &lo);
        place(&mut x_ticks, (pw / 2).saturating_sub(mid.chars().count() / 2), &mid);
        place(&mut x_ticks, pw.saturating_sub(hi.chars().count()), &hi);
        let x_ticks: String = x_ticks.into_iter().collect();
        let _ = writeln!(out, "{:>Y_TICK_WIDTH$}  {}", "", x_ticks.trim_end());
        let _ = writeln!(out, "{}", center(&self.x_label, full_width));

        for s in legend {
            let _ = writeln!(out, "{:>Y_TICK_WIDTH$}  {} {}", "", s.marker, s.label);
        }
        out
    }
}

fn center(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(text.chars().count()) / 2;
    format!("{}{}", " ".repeat(pad), text).trim_end().to_string()
}

fn place(buf: &mut [char], start: usize, text: &str) {
    for (slot, ch) in buf.iter_mut().skip(start).zip(text.chars()) {
        *slot = ch;
    }
}

/// Compact axis number: integers as-is, large or tiny values in exponent form.
pub fn tick_label(v: f64) -> String {
    let a = v.abs();
    if a >= 1e6 || (a > 0.0 && a < 1e-2) {
        format!("{v:.1e}")
    } else if (v - v.round()).abs() < 1e-9 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

/// Log-log Heaps plot with the fitted line dashed over it.
pub fn heaps_loglog(samples: &HeapsSamples, fit: &LinearFit, size: PlotSize) -> String {
    let observed: Vec<(f64, f64)> = samples
        .words_num
        .iter()
        .zip(&samples.distinct)
        .map(|(&t, &m)| ((t as f64).log10(), (m as f64).log10()))
        .collect();

    let x_lo = observed.first().map_or(0.0, |p| p.0);
    let x_hi = observed.last().map_or(1.0, |p| p.0);
    let estimate = vec![(x_lo, fit.predict(x_lo)), (x_hi, fit.predict(x_hi))];

    Chart::new("heaps law")
        .x_label("log10T")
        .y_label("log10M")
        .series(Series::new("observed", '*', Style::Line, observed))
        .series(Series::new("estimate", '-', Style::Dashed, estimate))
        .render(size)
}

/// Observed vocabulary growth against `k * T^b` on linear axes.
pub fn heaps_linear(samples: &HeapsSamples, params: &HeapsParams, size: PlotSize) -> String {
    let observed: Vec<(f64, f64)> = samples
        .words_num
        .iter()
        .zip(&samples.distinct)
        .map(|(&t, &m)| (t as f64, m as f64))
        .collect();
    let predicted: Vec<(f64, f64)> = samples
        .words_num
        .iter()
        .map(|&t| (t as f64, params.predict(t as f64)))
        .collect();

    let title = format!(
        "heap plot - Heap's parameters: k={:.2}, b={:.2}",
        params.k, params.b
    );
    Chart::new(&title)
        .x_label("number of words")
        .y_label("number of distinct words")
        .series(Series::new("observed", '*', Style::Line, observed))
        .series(Series::new("predicted", '+', Style::Line, predicted))
        .render(size)
}

/// Indices of roughly `n` log-spaced ranks to annotate, from the first rank
/// up to the third-last, without repeats.
pub fn annotation_indices(len: usize, n: usize) -> Vec<usize> {
    if len < 3 || n == 0 {
        return (0..len.min(n)).collect();
    }
    let start = -0.5f64;
    let stop = ((len - 2) as f64).log10();
    let mut indices: Vec<usize> = (0..n)
        .map(|i| {
            let e = if n == 1 {
                start
            } else {
                start + (stop - start) * i as f64 / (n - 1) as f64
            };
            (10f64.powf(e) as usize).min(len - 1)
        })
        .collect();
    indices.dedup();
    indices
}

/// Log-log rank/frequency plot with the ideal `f1 / r` line.
pub fn zipf_loglog(table: &ZipfTable, size: PlotSize) -> String {
    let Some(first) = table.row(1) else {
        return Chart::new("Zipf plot").render(size);
    };
    let top = first.total as f64;

    let mut upper = 0;
    while 10f64.powi(upper) < top {
        upper += 1;
    }
    let limit = 10f64.powi(upper + 1);

    let observed: Vec<(f64, f64)> = table
        .rows()
        .iter()
        .map(|r| (r.rank as f64, r.total as f64))
        .collect();

    let mut chart = Chart::new("Zipf plot")
        .x_label("Frequency rank of token")
        .y_label("Absolute frequency of token")
        .log_log()
        .x_range(1.0, limit)
        .y_range(1.0, limit)
        .series(Series::new("", '.', Style::Points, observed))
        .series(Series::new("f1 / rank", 'o', Style::Line, vec![(1.0, top), (top, 1.0)]));

    for idx in annotation_indices(table.len(), 25) {
        let row = &table.rows()[idx];
        chart = chart.label(row.rank as f64, row.total as f64, &row.word);
    }
    chart.render(size)
}

/// Bars of the `n` highest frequencies with the expected Zipf curve.
pub fn frequency_plot(table: &ZipfTable, n: usize, size: PlotSize) -> String {
    let top = table.top(n);
    let observed: Vec<(f64, f64)> = top
        .iter()
        .enumerate()
        .map(|(i, r)| (i as f64, r.total as f64))
        .collect();
    let expected: Vec<(f64, f64)> = top
        .iter()
        .enumerate()
        .map(|(i, r)| (i as f64, r.zipf))
        .collect();
    let y_max = top.first().map_or(1.0, |r| r.total as f64);

    Chart::new(&format!("Top {n} tokens in news"))
        .x_label("rank - 1")
        .y_label("Frequency")
        .y_range(0.0, y_max)
        .series(Series::new("observed", '#', Style::Bars, observed))
        .series(Series::new("expected zipf", '-', Style::Dashed, expected))
        .render(size)
}

/// Horizontal bar chart of the `n` most frequent words.
pub fn top_words_plot(table: &ZipfTable, n: usize, size: PlotSize) -> String {
    let top = table.top(n);
    let mut out = String::new();
    let _ = writeln!(out, "{}", center(&format!("Top {n} tokens in news"), size.width));

    let word_width = top.iter().map(|r| r.word.chars().count()).max().unwrap_or(0);
    let count_width = top.first().map_or(1, |r| r.total.to_string().len());
    let rank_width = top.len().to_string().len();
    let bar_width = size
        .width
        .saturating_sub(word_width + count_width + rank_width + 5)
        .max(MIN_PLOT_WIDTH);
    let max = top.first().map_or(1, |r| r.total.max(1));

    for r in top {
        let len = (r.total as f64 / max as f64 * bar_width as f64).round() as usize;
        let pad = word_width - r.word.chars().count();
        let _ = writeln!(
            out,
            "{:>rank_width$} {}{} |{} {:>count_width$}",
            r.rank,
            r.word,
            " ".repeat(pad),
            "#".repeat(len),
            r.total
        );
    }
    let _ = writeln!(out, "{}", center("Frequency", size.width));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: PlotSize = PlotSize {
        width: 60,
        height: 20,
    };

    fn sample_table() -> ZipfTable {
        ZipfTable::from_text("the cat sat on the mat the cat ran the end")
    }

    #[test]
    fn tick_labels() {
        assert_eq!(tick_label(0.0), "0");
        assert_eq!(tick_label(1000.0), "1000");
        assert_eq!(tick_label(2.5), "2.50");
        assert_eq!(tick_label(1.0e7), "1.0e7");
        assert_eq!(tick_label(0.001), "1.0e-3");
    }

    #[test]
    fn chart_fits_requested_size() {
        let chart = Chart::new("line")
            .x_label("x")
            .series(Series::new("y = x", '*', Style::Line, vec![(0.0, 0.0), (10.0, 10.0)]));
        let text = chart.render(SIZE);
        assert!(text.lines().all(|l| l.chars().count() <= SIZE.width));
        assert!(text.lines().count() <= SIZE.height);
        assert!(text.contains("* y = x"));
        assert!(text.lines().next().unwrap().trim() == "line");
    }

    #[test]
    fn line_runs_corner_to_corner() {
        let text = Chart::new("diag")
            .series(Series::new("", '*', Style::Line, vec![(0.0, 0.0), (1.0, 1.0)]))
            .render(SIZE);
        let rows: Vec<&str> = text.lines().filter(|l| l.contains(" |")).collect();
        assert!(rows.first().unwrap().ends_with('*'));
        assert!(rows.last().unwrap().contains(" |*"));
    }

    #[test]
    fn log_axes_skip_non_positive_points() {
        let text = Chart::new("log")
            .log_log()
            .series(Series::new("", 'x', Style::Points, vec![(0.0, 5.0), (-1.0, 1.0)]))
            .render(SIZE);
        let plotted = text
            .lines()
            .filter(|l| l.contains(" |"))
            .any(|l| l.split(" |").nth(1).is_some_and(|p| p.contains('x')));
        assert!(!plotted);
    }

    #[test]
    fn annotation_indices_are_log_spaced() {
        let idx = annotation_indices(10_000, 25);
        assert_eq!(idx[0], 0);
        assert!(idx.windows(2).all(|w| w[0] < w[1]));
        assert!(*idx.last().unwrap() <= 9_998);
        assert!(idx.len() <= 25);
        assert_eq!(annotation_indices(2, 25), vec![0, 1]);
        assert!(annotation_indices(0, 25).is_empty());
    }

    #[test]
    fn heaps_plots_render() {
        let samples = HeapsSamples::from_text(&"a b c a d e a f g a ".repeat(20), 50);
        let fit = samples.fit().unwrap();
        let loglog = heaps_loglog(&samples, &fit, SIZE);
        assert!(loglog.contains("heaps law"));
        assert!(loglog.contains("log10T"));
        assert!(loglog.contains("- estimate"));

        let params = HeapsParams::from_fit(&fit);
        let linear = heaps_linear(&samples, &params, SIZE);
        assert!(linear.contains(&format!("k={:.2}, b={:.2}", params.k, params.b)));
        assert!(linear.contains("+ predicted"));
    }

    #[test]
    fn zipf_plots_render() {
        let table = sample_table();
        let loglog = zipf_loglog(&table, SIZE);
        assert!(loglog.contains("Zipf plot"));
        assert!(loglog.contains("the"));

        let bars = frequency_plot(&table, 500, SIZE);
        assert!(bars.contains("Top 500 tokens in news"));
        assert!(bars.contains('#'));

        let top = top_words_plot(&table, 50, SIZE);
        let lines: Vec<&str> = top.lines().collect();
        assert!(lines[1].starts_with("1 the"));
        assert!(lines[1].ends_with(" 4"));
        assert_eq!(lines.len(), table.len() + 2);
    }

    #[test]
    fn empty_table_plots_do_not_panic() {
        let table = ZipfTable::default();
        zipf_loglog(&table, SIZE);
        frequency_plot(&table, 500, SIZE);
        top_words_plot(&table, 50, SIZE);
    }
}
