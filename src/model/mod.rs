//! In-memory word-vector table.
//!
//! Provides [`VectorTable`], an immutable mapping from word to a fixed-size
//! dense vector, loaded once from a word2vec text artifact via
//! [`word2vec::load_text`]. Rows are L2-normalized at construction time, so
//! cosine similarity between two words is a plain dot product of their rows.

pub mod word2vec;

use std::collections::HashMap;

/// An immutable word → unit-vector table.
///
/// Lookups are exact-string-match only: no normalization, stemming, or fuzzy
/// matching. Built once by the loader and never mutated afterwards, so shared
/// references can be read concurrently without locking.
#[derive(Debug)]
pub struct VectorTable {
    words: Vec<String>,
    index: HashMap<String, usize>,
    /// Row-major storage, one unit-normalized row of `vector_size` floats per word.
    vectors: Vec<f32>,
    vector_size: usize,
}

impl VectorTable {
    /// Build a table from parsed `(word, vector)` rows. Rows are normalized
    /// here; duplicate words keep the first occurrence (gensim parity).
    pub(crate) fn from_rows(vector_size: usize, rows: Vec<(String, Vec<f32>)>) -> Self {
        let mut words = Vec::with_capacity(rows.len());
        let mut index = HashMap::with_capacity(rows.len());
        let mut vectors = Vec::with_capacity(rows.len() * vector_size);

        for (word, mut vector) in rows {
            debug_assert_eq!(vector.len(), vector_size);
            if index.contains_key(&word) {
                tracing::warn!(word = %word, "duplicate word in model, keeping first occurrence");
                continue;
            }
            l2_normalize_in_place(&mut vector);
            index.insert(word.clone(), words.len());
            words.push(word);
            vectors.extend_from_slice(&vector);
        }

        Self {
            words,
            index,
            vectors,
            vector_size,
        }
    }

    /// Number of words in the vocabulary.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Dimensionality shared by every vector in the table.
    pub fn vector_size(&self) -> usize {
        self.vector_size
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    /// Stable position of `word` in the table, if present.
    pub fn position(&self, word: &str) -> Option<usize> {
        self.index.get(word).copied()
    }

    pub fn word(&self, idx: usize) -> &str {
        &self.words[idx]
    }

    /// Unit-normalized vector row at `idx`.
    pub fn unit_vector(&self, idx: usize) -> &[f32] {
        let start = idx * self.vector_size;
        &self.vectors[start..start + self.vector_size]
    }

    /// Unit-normalized vector for `word`, if present.
    pub fn unit_vector_of(&self, word: &str) -> Option<&[f32]> {
        self.position(word).map(|idx| self.unit_vector(idx))
    }
}

/// Dot product. For unit vectors this is the cosine similarity.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// L2-normalize a vector in place. A zero vector is left as-is.
pub(crate) fn l2_normalize_in_place(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v {
            *x /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_l2_normalize() {
        let mut v = vec![3.0, 4.0];
        l2_normalize_in_place(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_l2_normalize_zero_vector() {
        let mut v = vec![0.0, 0.0, 0.0];
        l2_normalize_in_place(&mut v);
        assert_eq!(v, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn rows_are_unit_length() {
        let table = VectorTable::from_rows(
            2,
            vec![("a".into(), vec![3.0, 4.0]), ("b".into(), vec![0.0, 2.0])],
        );
        for idx in 0..table.len() {
            let row = table.unit_vector(idx);
            let norm: f32 = row.iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn duplicate_words_keep_first() {
        let table = VectorTable::from_rows(
            2,
            vec![
                ("a".into(), vec![1.0, 0.0]),
                ("a".into(), vec![0.0, 1.0]),
                ("b".into(), vec![0.0, 1.0]),
            ],
        );
        assert_eq!(table.len(), 2);
        let row = table.unit_vector_of("a").unwrap();
        assert!((row[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn lookups_are_exact_match() {
        let table = VectorTable::from_rows(1, vec![("Tokyo".into(), vec![1.0])]);
        assert!(table.contains("Tokyo"));
        assert!(!table.contains("tokyo"));
        assert!(!table.contains("Tokyo "));
    }
}
