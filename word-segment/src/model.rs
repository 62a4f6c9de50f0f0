use std::io::BufRead;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smartstring::alias::String;
use tracing::debug;

use crate::{parse_counts, HashMap, ModelError};

/// Word probabilities estimated from occurrence counts
///
/// Words seen in the training data get `count / total`; everything else is handed to the
/// `Fallback` estimator.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "with-serde", derive(Deserialize, Serialize))]
pub struct FrequencyModel<F = LengthPenalty> {
    counts: HashMap<String, u64>,
    total: f64,
    fallback: F,
}

impl<F: Fallback> FrequencyModel<F> {
    /// Create a `FrequencyModel` from `(word, count)` pairs
    ///
    /// Counts for repeated words are summed. If `total` is `None`, the sum of all counts is used;
    /// otherwise it must be positive and at least as large as that sum.
    ///
    /// Note: the `String` type used in this API is defined in the `smartstring` crate. Any `&str`
    /// or `String` can be converted into it by calling `into()` on it.
    pub fn new<I, W>(counts: I, total: Option<f64>, fallback: F) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = (W, u64)>,
        W: Into<String>,
    {
        let mut map = HashMap::<String, u64>::default();
        for (word, count) in counts {
            let entry = map.entry(word.into()).or_insert(0);
            *entry = entry.saturating_add(count);
        }

        let observed = map.values().map(|&count| count as f64).sum::<f64>();
        let total = match total {
            Some(total) if !(total.is_finite() && total > 0.0) => {
                return Err(ModelError::InvalidTotal(total))
            }
            Some(total) if total < observed => {
                return Err(ModelError::TotalBelowObserved { total, observed })
            }
            Some(total) => total,
            None if observed > 0.0 => observed,
            None => return Err(ModelError::InvalidTotal(observed)),
        };

        // Zero counts would yield a zero probability; treat those words as unseen instead
        map.retain(|_, count| *count > 0);
        debug!(words = map.len(), total, "built frequency model");

        Ok(Self {
            counts: map,
            total,
            fallback,
        })
    }

    /// Create a `FrequencyModel` from `word<delimiter>count` lines
    ///
    /// See `parse_counts()` for the accepted format.
    pub fn from_reader<R: BufRead>(
        reader: R,
        delimiter: char,
        total: Option<f64>,
        fallback: F,
    ) -> Result<Self, ModelError> {
        Self::new(parse_counts(reader, delimiter)?, total, fallback)
    }

    /// Probability of `word`, always positive for the built-in fallbacks
    pub fn probability(&self, word: &str) -> f64 {
        match self.counts.get(word) {
            Some(&count) => count as f64 / self.total,
            None => self.fallback.estimate(word, self.total),
        }
    }

    /// Log10 of the probability of `word`
    pub fn log_probability(&self, word: &str) -> f64 {
        match self.counts.get(word) {
            Some(&count) => (count as f64 / self.total).log10(),
            None => self.fallback.log_estimate(word, self.total),
        }
    }

    pub fn count(&self, word: &str) -> Option<u64> {
        self.counts.get(word).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.counts.contains_key(word)
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// Number of distinct words with a non-zero count
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn fallback(&self) -> &F {
        &self.fallback
    }
}

/// Estimates the probability of a word absent from the training counts
pub trait Fallback {
    /// Probability of the unseen `word`, given the `total` token count of the model
    fn estimate(&self, word: &str, total: f64) -> f64;

    /// Log10 of `estimate()`
    ///
    /// Implementations whose estimates get very small should override this to avoid
    /// underflowing to negative infinity.
    fn log_estimate(&self, word: &str, total: f64) -> f64 {
        self.estimate(word, total).log10()
    }
}

impl<T: Fn(&str, f64) -> f64> Fallback for T {
    fn estimate(&self, word: &str, total: f64) -> f64 {
        self(word, total)
    }
}

/// Penalizes unseen words according to their length: `10 / (total * 10^chars)`
///
/// Every extra char makes an unknown word ten times less likely, so the segmenter prefers
/// several short unknown words over inventing a long one. Estimates for very long words are
/// clamped to the smallest positive `f64` rather than rounding down to zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "with-serde", derive(Deserialize, Serialize))]
pub struct LengthPenalty;

impl Fallback for LengthPenalty {
    fn estimate(&self, word: &str, total: f64) -> f64 {
        10f64
            .powf(self.log_estimate(word, total))
            .max(f64::MIN_POSITIVE)
    }

    fn log_estimate(&self, word: &str, total: f64) -> f64 {
        1.0 - total.log10() - word.chars().count() as f64
    }
}

/// Gives every unseen word the probability of a single occurrence: `1 / total`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "with-serde", derive(Deserialize, Serialize))]
pub struct Uniform;

impl Fallback for Uniform {
    fn estimate(&self, _: &str, total: f64) -> f64 {
        1.0 / total
    }
}
