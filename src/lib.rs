pub mod corpus;
pub mod driver;
pub mod fit;
pub mod heaps;
pub mod normalize;
pub mod plot;
pub mod zipf;

pub use corpus::{Dataset, Sources};
pub use fit::{LinearFit, fit_linear, fit_loglog};
pub use heaps::{HeapsParams, HeapsSamples};
pub use normalize::{normalize, tokenize};
pub use zipf::{ZipfRow, ZipfTable, word_frequencies};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_text_through_both_laws() {
        let raw = "The cat sat on the mat. The cat ran!";
        let text = normalize(raw);

        let table = ZipfTable::from_text(&text);
        let counts: Vec<(&str, usize)> = table
            .rows()
            .iter()
            .map(|r| (r.word.as_str(), r.total))
            .collect();
        assert_eq!(
            counts,
            vec![("the", 3), ("cat", 2), ("sat", 1), ("on", 1), ("mat", 1), ("ran", 1)]
        );
        assert_eq!(table.total_tokens(), tokenize(&text).len());

        let samples = HeapsSamples::from_text(&text, 200);
        assert_eq!(samples.last(), Some((9, 6)));
        let params = samples.params().unwrap();
        assert!(params.b > 0.0 && params.b <= 1.0);
    }
}
