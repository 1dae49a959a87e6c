//! Exact flat nearest-neighbor index.
//!
//! Exhaustive squared-Euclidean search, no approximation and no pruning.
//! Each position pairs a vector with the text that produced it, so the
//! vector/text correspondence is structural rather than two arrays kept in
//! sync by convention.

use crate::error::{IndexError, Result};

/// One index position: a vector and the exact text it embeds.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub vector: Vec<f32>,
    pub text: String,
}

/// A search match. `label` is the entry's 0-based position in build order.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub label: usize,
    pub distance: f32,
    pub text: String,
}

/// Exact flat index over fixed-dimension vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatIndex {
    dimension: usize,
    entries: Vec<IndexEntry>,
}

impl FlatIndex {
    /// Build an index from positionally paired vectors and texts.
    ///
    /// # Errors
    ///
    /// Returns an error when the inputs are empty, their lengths differ,
    /// or any vector's dimension disagrees with the first one's.
    pub fn build(vectors: Vec<Vec<f32>>, texts: Vec<String>) -> Result<Self> {
        if vectors.len() != texts.len() {
            return Err(IndexError::LengthMismatch {
                vectors: vectors.len(),
                texts: texts.len(),
            });
        }
        let Some(first) = vectors.first() else {
            return Err(IndexError::EmptyIndex);
        };
        let dimension = first.len();

        let entries = vectors
            .into_iter()
            .zip(texts)
            .map(|(vector, text)| {
                if vector.len() == dimension {
                    Ok(IndexEntry { vector, text })
                } else {
                    Err(IndexError::DimensionMismatch {
                        expected: dimension,
                        actual: vector.len(),
                    })
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { dimension, entries })
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Top-k nearest entries by ascending squared-Euclidean distance.
    /// `k` is clamped to the index size.
    ///
    /// # Errors
    ///
    /// Fails loudly on a query dimension mismatch, and reports zero hits
    /// as an explicit error so callers can tell "no match" from success.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if query.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut hits: Vec<SearchHit> = self
            .entries
            .iter()
            .enumerate()
            .map(|(label, entry)| SearchHit {
                label,
                distance: squared_l2(query, &entry.vector),
                text: entry.text.clone(),
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(k.min(self.entries.len()));

        if hits.is_empty() {
            return Err(IndexError::NoMatches);
        }
        Ok(hits)
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
