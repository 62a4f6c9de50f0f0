//! TF/IDF-style keyword ranking
//!
//! Words are scored by dividing their usage probability by their document-frequency
//! probability, so words used often but found in comparatively few documents rank highest.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smartstring::alias::String;
use tracing::trace;

use crate::{Fallback, FrequencyModel, HashSet, Uniform};

/// Ranks words against a usage model and a document-frequency model
pub struct KeywordScorer<'a, U, D = Uniform> {
    usage: &'a FrequencyModel<U>,
    documents: &'a FrequencyModel<D>,
    threshold: f64,
}

impl<'a, U: Fallback, D: Fallback> KeywordScorer<'a, U, D> {
    pub fn new(usage: &'a FrequencyModel<U>, documents: &'a FrequencyModel<D>) -> Self {
        Self {
            usage,
            documents,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    /// Customize the minimum document-frequency probability a keyword must exceed
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Relevance of `word`: usage probability over document-frequency probability
    ///
    /// Returns `0.0` if the document-frequency model estimates `word` at zero, which only
    /// happens with a custom fallback.
    pub fn relevance(&self, word: &str) -> f64 {
        let idf = self.documents.probability(word);
        if idf != 0.0 {
            self.usage.probability(word) / idf
        } else {
            0.0
        }
    }

    /// Distinct `words` whose document-frequency probability exceeds the threshold
    ///
    /// Keywords are returned in order of first occurrence.
    pub fn extract<'w, I>(&self, words: I) -> Vec<&'w str>
    where
        I: IntoIterator<Item = &'w str>,
    {
        let mut seen = HashSet::default();
        words
            .into_iter()
            .filter(|word| seen.insert(*word))
            .filter(|word| {
                let idf = self.documents.probability(word);
                if idf > self.threshold {
                    return true;
                }

                trace!(word, idf, "dropping word below document-frequency threshold");
                false
            })
            .collect()
    }

    /// Score `keywords` and sort them by relevance in the given `order`
    ///
    /// The sort is stable: keywords with equal scores keep their input order.
    pub fn rank<'w, I>(&self, keywords: I, order: Order) -> Vec<Keyword>
    where
        I: IntoIterator<Item = &'w str>,
    {
        let mut ranked = keywords
            .into_iter()
            .map(|word| Keyword {
                word: word.into(),
                score: self.relevance(word),
            })
            .collect::<Vec<_>>();

        ranked.sort_by(|a, b| {
            let cmp = a.score.total_cmp(&b.score);
            match order {
                Order::Ascending => cmp,
                Order::Descending => cmp.reverse(),
            }
        });
        ranked
    }

    /// Extract keywords from `words` and rank them
    pub fn extract_and_rank<'w, I>(&self, words: I, order: Order) -> Vec<Keyword>
    where
        I: IntoIterator<Item = &'w str>,
    {
        self.rank(self.extract(words), order)
    }
}

/// A word and its relevance score
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "with-serde", derive(Deserialize, Serialize))]
pub struct Keyword {
    pub word: String,
    pub score: f64,
}

/// Direction in which `KeywordScorer::rank()` sorts by relevance
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "lowercase"))]
pub enum Order {
    Ascending,
    Descending,
}

pub const DEFAULT_THRESHOLD: f64 = 1e-6;
