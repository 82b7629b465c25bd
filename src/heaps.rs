use crate::fit::{LinearFit, fit_loglog};
use crate::normalize::tokenize;
use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

/// Number of prefix lengths sampled when none is given.
pub const DEFAULT_SAMPLES: usize = 200;

/// Vocabulary growth curve: `distinct[i]` is the number of distinct words
/// among the first `words_num[i]` tokens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeapsSamples {
    pub words_num: Vec<usize>,
    pub distinct: Vec<usize>,
}

/// Heaps' law parameters for `M = k * T^b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeapsParams {
    pub k: f64,
    pub b: f64,
}

impl HeapsParams {
    /// The log-log line `log10 M = b * log10 T + log10 k`.
    pub fn from_fit(fit: &LinearFit) -> Self {
        HeapsParams {
            k: 10f64.powf(fit.intercept),
            b: fit.slope,
        }
    }

    /// Predicted vocabulary size after `t` tokens.
    pub fn predict(&self, t: f64) -> f64 {
        self.k * t.powf(self.b)
    }
}

/// `n` prefix lengths spaced evenly from 1 to `total` inclusive, truncated
/// to integers. Duplicates appear when `total < n`.
pub fn sample_points(total: usize, n: usize) -> Vec<usize> {
    if total == 0 || n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![1];
    }

    let step = (total - 1) as f64 / (n - 1) as f64;
    let mut points: Vec<usize> = (0..n).map(|i| (1.0 + step * i as f64) as usize).collect();
    // pin the endpoint against rounding
    points[n - 1] = total;
    points
}

/// Counts distinct words in each sampled prefix of `words`, in a single pass.
pub fn sample(words: &[&str], n: usize) -> HeapsSamples {
    let words_num = sample_points(words.len(), n);
    let mut distinct = Vec::with_capacity(words_num.len());

    let mut seen: HashSet<&str> = HashSet::new();
    let mut consumed = 0;
    for &prefix in &words_num {
        for &word in &words[consumed..prefix] {
            seen.insert(word);
        }
        consumed = prefix;
        distinct.push(seen.len());
    }

    HeapsSamples {
        words_num,
        distinct,
    }
}

/// Same as [`sample`] but on a seeded random permutation of the tokens,
/// which removes the effect of document order on the curve.
pub fn sample_shuffled(words: &[&str], n: usize, seed: u64) -> HeapsSamples {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut shuffled = words.to_vec();
    shuffled.shuffle(&mut rng);
    sample(&shuffled, n)
}

impl HeapsSamples {
    /// Samples an already normalized text.
    pub fn from_text(text: &str, n: usize) -> Self {
        sample(&tokenize(text), n)
    }

    pub fn len(&self) -> usize {
        self.words_num.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words_num.is_empty()
    }

    /// Total tokens and final vocabulary size.
    pub fn last(&self) -> Option<(usize, usize)> {
        Some((*self.words_num.last()?, *self.distinct.last()?))
    }

    /// Least-squares fit of `log10 M` against `log10 T`.
    pub fn fit(&self) -> Result<LinearFit> {
        let t: Vec<f64> = self.words_num.iter().map(|&x| x as f64).collect();
        let m: Vec<f64> = self.distinct.iter().map(|&x| x as f64).collect();
        fit_loglog(&t, &m)
    }

    /// Fitted Heaps' law parameters.
    pub fn params(&self) -> Result<HeapsParams> {
        Ok(HeapsParams::from_fit(&self.fit()?))
    }
}
