use std::ops::Range;
use std::slice;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smartstring::alias::String;
use tracing::debug;

mod data;
mod error;
pub mod keywords;
mod model;
#[cfg(feature = "test-cases")]
pub mod test_cases;
#[cfg(feature = "__test_data")]
pub mod test_data;

pub use data::parse_counts;
pub use error::ModelError;
pub use keywords::{Keyword, KeywordScorer, Order, DEFAULT_THRESHOLD};
pub use model::{Fallback, FrequencyModel, LengthPenalty, Uniform};

/// Finds the most probable sequence of words for unsegmented text
///
/// Every candidate sequence is scored as the product of its independent word probabilities,
/// taken from the wrapped `FrequencyModel`. Scores are summed in the log domain so that long
/// inputs don't underflow to zero.
#[cfg_attr(feature = "with-serde", derive(Deserialize, Serialize))]
pub struct Segmenter<F = LengthPenalty> {
    model: FrequencyModel<F>,
    limit: usize,
}

impl<F: Fallback> Segmenter<F> {
    /// Create a `Segmenter` scoring words with the given usage `model`
    pub fn new(model: FrequencyModel<F>) -> Self {
        Self {
            model,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Segment the text in `input`
    ///
    /// The words yielded by the returned iterator concatenate back to `input` exactly. The
    /// `search` parameter contains the caches used during segmentation; passing it in allows
    /// callers to reuse the cache allocations.
    pub fn segment<'a>(&self, input: &str, search: &'a mut Search) -> Segments<'a> {
        let score = SegmentState::new(input, self, search).run();
        Segments {
            words: search.result.iter(),
            score,
        }
    }

    /// Returns the log10 probability of the given sequence of words
    ///
    /// This is the score `segment()` maximizes. Will return `None` iff given an empty iterator.
    pub fn score_sentence<'a>(&self, mut words: impl Iterator<Item = &'a str>) -> Option<f64> {
        let first = words.next()?;
        let mut score = self.model.log_probability(first);
        for word in words {
            score += self.model.log_probability(word);
        }
        Some(score)
    }

    /// The usage model words are scored against
    pub fn model(&self) -> &FrequencyModel<F> {
        &self.model
    }

    /// Customize the maximum length (in chars) of the first word at each split point
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(1);
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

struct SegmentState<'a, F> {
    data: &'a Segmenter<F>,
    input: &'a str,
    search: &'a mut Search,
}

impl<'a, F: Fallback> SegmentState<'a, F> {
    fn new(input: &'a str, data: &'a Segmenter<F>, search: &'a mut Search) -> Self {
        search.clear();
        search
            .bounds
            .extend(input.char_indices().map(|(i, _)| i).chain(Some(input.len())));
        Self {
            data,
            input,
            search,
        }
    }

    /// Stores the best segmentation of the input in `search.result`, returning its score
    fn run(self) -> f64 {
        let len = self.search.bounds.len() - 1;
        self.search.memo.resize(len + 1, Candidate::default());

        // Suffixes are solved from shortest to longest, so every `rest` a split refers
        // to has been memoized by the time it is needed.
        for start in (0..len).rev() {
            let mut best = Candidate {
                score: f64::NEG_INFINITY,
                split: start + 1,
            };

            for split in start + 1..=len.min(start + self.data.limit) {
                let first = self.data.model.log_probability(self.word(start..split));
                let score = first + self.search.memo[split].score;
                if score > best.score {
                    best = Candidate { score, split };
                }
            }

            self.search.memo[start] = best;
        }

        let mut start = 0;
        while start < len {
            let split = self.search.memo[start].split;
            let word = self.word(start..split);
            self.search.result.push(word.into());
            start = split;
        }

        let score = self.search.memo[0].score;
        debug!(
            chars = len,
            words = self.search.result.len(),
            score,
            "segmented input"
        );
        score
    }

    /// Slice of the input covering the given range of chars
    fn word(&self, range: Range<usize>) -> &'a str {
        let input = self.input;
        &input[self.search.bounds[range.start]..self.search.bounds[range.end]]
    }
}

/// Reusable buffers for `Segmenter::segment()`
///
/// The memo table is scoped to a single call: it is cleared when the next segmentation starts.
/// A `Search` must not be shared between threads; give each worker its own.
#[derive(Clone, Default)]
pub struct Search {
    bounds: Vec<usize>,
    memo: Vec<Candidate>,
    result: Vec<String>,
}

impl Search {
    fn clear(&mut self) {
        self.bounds.clear();
        self.memo.clear();
        self.result.clear();
    }
}

/// Best segmentation of one suffix: its log10 score and the end of its first word
#[derive(Clone, Copy, Debug, Default)]
struct Candidate {
    score: f64,
    split: usize,
}

/// Words of the best segmentation, as returned by `Segmenter::segment()`
pub struct Segments<'a> {
    words: slice::Iter<'a, String>,
    score: f64,
}

impl<'a> Segments<'a> {
    /// Log10 probability of the whole sequence (`0.0` for empty input)
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Probability of the whole sequence
    ///
    /// This will underflow to zero for long inputs; compare `score()` values instead.
    pub fn probability(&self) -> f64 {
        10f64.powf(self.score)
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.words.next().map(|word| word.as_str())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.words.size_hint()
    }
}

impl<'a> ExactSizeIterator for Segments<'a> {}

type HashMap<K, V> = std::collections::HashMap<K, V, ahash::RandomState>;
type HashSet<T> = std::collections::HashSet<T, ahash::RandomState>;

pub const DEFAULT_LIMIT: usize = 20;

#[cfg(test)]
pub mod tests {
    use super::*;

    fn segmenter(counts: &[(&str, u64)], total: f64) -> Segmenter {
        let model =
            FrequencyModel::new(counts.iter().copied(), Some(total), LengthPenalty).unwrap();
        Segmenter::new(model)
    }

    /// All ways to split `text` into words of at most `limit` chars, in generation order
    fn all_splits(text: &[char], limit: usize) -> Vec<Vec<std::string::String>> {
        if text.is_empty() {
            return vec![vec![]];
        }

        let mut out = Vec::new();
        for split in 1..=text.len().min(limit) {
            let first = text[..split].iter().collect::<std::string::String>();
            for rest in all_splits(&text[split..], limit) {
                let mut words = vec![first.clone()];
                words.extend(rest);
                out.push(words);
            }
        }
        out
    }

    #[test]
    fn empty() {
        let segmenter = segmenter(&[("a", 1)], 10.0);
        let mut search = Search::default();
        let words = segmenter.segment("", &mut search);
        assert_eq!(words.len(), 0);
        assert_eq!(words.score(), 0.0);
    }

    #[test]
    fn single_char() {
        let segmenter = segmenter(&[("研究", 100)], 1000.0);
        let mut search = Search::default();
        let words = segmenter.segment("研", &mut search);
        let expected = segmenter.model().probability("研").log10();
        assert!((words.score() - expected).abs() < 1e-12);
        assert_eq!(words.collect::<Vec<_>>(), vec!["研"]);
    }

    #[test]
    fn best_of_all_splits() {
        let segmenter = segmenter(
            &[("研究", 100), ("生教育", 5), ("生", 50), ("研究生", 80)],
            1000.0,
        );

        let text = "研究生教育";
        let chars = text.chars().collect::<Vec<_>>();
        let mut best: Option<(f64, Vec<std::string::String>)> = None;
        for words in all_splits(&chars, DEFAULT_LIMIT) {
            let p = words
                .iter()
                .map(|w| segmenter.model().probability(w))
                .product::<f64>();
            if best.as_ref().map_or(true, |(max, _)| p > *max) {
                best = Some((p, words));
            }
        }
        let (max, expected) = best.unwrap();
        assert_eq!(expected, vec!["研究", "生教育"]);

        let mut search = Search::default();
        let words = segmenter.segment(text, &mut search);
        assert!((words.probability() - max).abs() < 1e-15);
        assert_eq!(words.collect::<Vec<_>>(), expected);
    }

    #[test]
    fn score_sentence() {
        let segmenter = segmenter(&[("研究", 100), ("生", 50)], 1000.0);
        assert_eq!(segmenter.score_sentence(std::iter::empty()), None);

        let mut search = Search::default();
        let words = segmenter.segment("研究生", &mut search);
        let score = words.score();
        let rescored = segmenter.score_sentence(words).unwrap();
        assert!((score - rescored).abs() < 1e-12);
        assert!((rescored - (0.1f64.log10() + 0.05f64.log10())).abs() < 1e-12);
    }

    #[test]
    fn coverage() {
        let segmenter = segmenter(&[("ab", 30), ("c", 5), ("abc", 2), ("研究", 9)], 100.0);
        let mut search = Search::default();
        let long = "a".repeat(40);
        for text in ["abcabc", "xyzab", "研究abé研", long.as_str()] {
            let words = segmenter.segment(text, &mut search);
            assert_eq!(words.collect::<std::string::String>(), text);
        }
    }

    #[test]
    fn deterministic() {
        let segmenter = segmenter(&[("ab", 30), ("c", 5), ("bc", 12)], 100.0);
        let mut search = Search::default();
        let first = segmenter
            .segment("abcbcab", &mut search)
            .map(|w| w.to_owned())
            .collect::<Vec<_>>();
        let second = segmenter
            .segment("abcbcab", &mut search)
            .map(|w| w.to_owned())
            .collect::<Vec<_>>();
        assert_eq!(first, second);
    }

    #[test]
    fn ties_prefer_shortest_first_word() {
        // "a" + "b" and "ab" both score 1/100
        let segmenter = segmenter(&[("a", 10), ("b", 10), ("ab", 1)], 100.0);
        let mut search = Search::default();
        let words = segmenter.segment("ab", &mut search);
        assert_eq!(words.collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn limit() {
        let mut segmenter = segmenter(&[("abcd", 50)], 100.0);
        let mut search = Search::default();
        assert_eq!(
            segmenter.segment("abcd", &mut search).collect::<Vec<_>>(),
            vec!["abcd"]
        );

        segmenter.set_limit(3);
        let words = segmenter.segment("abcd", &mut search).collect::<Vec<_>>();
        assert!(words.iter().all(|w| w.chars().count() <= 3));
        assert_eq!(words.concat(), "abcd");

        segmenter.set_limit(0);
        assert_eq!(segmenter.limit(), 1);
        assert_eq!(
            segmenter.segment("abcd", &mut search).collect::<Vec<_>>(),
            vec!["a", "b", "c", "d"]
        );
    }

    #[test]
    fn long_input() {
        let segmenter = segmenter(&[("a", 1)], 1.0);
        let mut search = Search::default();
        let text = "a".repeat(200);
        let mut words = segmenter.segment(&text, &mut search);
        assert_eq!(words.len(), 200);
        assert!(words.all(|w| w == "a"));
    }

    #[test]
    fn no_underflow() {
        // The product of 2000 probabilities of 1/2 is zero as an f64
        let segmenter = segmenter(&[("a", 50)], 100.0);
        let mut search = Search::default();
        let text = "a".repeat(2000);
        let words = segmenter.segment(&text, &mut search);
        assert_eq!(words.probability(), 0.0);
        assert!((words.score() - 2000.0 * 0.5f64.log10()).abs() < 1e-6);
        assert_eq!(words.len(), 2000);
    }
}
