//! The embedding query core.
//!
//! [`EmbeddingService`] owns one immutable [`VectorTable`] and answers four
//! query families against it: nearest neighbors to a word, vector-arithmetic
//! analogy, pairwise cosine similarity, and vocabulary introspection.
//!
//! The service is constructed in its final state ([`ServiceState::Loaded`] or
//! [`ServiceState::LoadFailed`]) before any query traffic reaches it, and every
//! query method takes `&self` — there is no interior mutability and no lock on
//! the query path, so a fully built table is the only thing a concurrent reader
//! can ever observe.
//!
//! Result contract, shared by `most_similar` and `analogy`:
//! - strictly non-increasing similarity score, ties broken lexicographically on
//!   word — deterministic for a fixed loaded table;
//! - seed words excluded from the candidate set;
//! - scores rounded to exactly 4 decimal places ([`round4`]).

use serde::Serialize;
use std::path::Path;
use tracing::{error, info};

use crate::error::QueryError;
use crate::model::{dot, word2vec, VectorTable};

/// Load lifecycle of the service. `Unloaded` exists only for instances that
/// never attempted a load; both post-load states are terminal.
pub enum ServiceState {
    Unloaded,
    Loaded(VectorTable),
    LoadFailed { reason: String },
}

impl ServiceState {
    /// Short tag for status reporting.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unloaded => "unloaded",
            Self::Loaded(_) => "loaded",
            Self::LoadFailed { .. } => "load_failed",
        }
    }
}

/// One ranked entry in an association or analogy result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredWord {
    pub word: String,
    pub similarity: f64,
}

/// Vocabulary metadata for a loaded model.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct VocabInfo {
    pub vocab_size: usize,
    pub vector_size: usize,
}

pub struct EmbeddingService {
    state: ServiceState,
}

impl EmbeddingService {
    /// A service that never attempted a load. Every query fails with
    /// [`QueryError::ModelUnavailable`].
    pub fn unloaded() -> Self {
        Self {
            state: ServiceState::Unloaded,
        }
    }

    /// Load the model artifact at `path`. Never panics and never returns an
    /// error: a failed load produces a service in the `LoadFailed` state so the
    /// process can keep running and report the failure instead of dying.
    pub fn load(path: &Path) -> Self {
        info!(model = %path.display(), "loading word vectors");
        match word2vec::load_text(path) {
            Ok(table) => {
                info!(
                    vocab_size = table.len(),
                    vector_size = table.vector_size(),
                    "model loaded"
                );
                Self {
                    state: ServiceState::Loaded(table),
                }
            }
            Err(e) => {
                let reason = format!("{e:#}");
                error!(reason = %reason, "model load failed");
                Self {
                    state: ServiceState::LoadFailed { reason },
                }
            }
        }
    }

    /// Wrap an already-built table. Used by tests to construct loaded
    /// instances without touching the filesystem.
    pub fn from_table(table: VectorTable) -> Self {
        Self {
            state: ServiceState::Loaded(table),
        }
    }

    pub fn state(&self) -> &ServiceState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, ServiceState::Loaded(_))
    }

    /// The recorded load-failure reason, if the load failed.
    pub fn load_failure(&self) -> Option<&str> {
        match &self.state {
            ServiceState::LoadFailed { reason } => Some(reason),
            _ => None,
        }
    }

    fn table(&self) -> Result<&VectorTable, QueryError> {
        match &self.state {
            ServiceState::Loaded(table) => Ok(table),
            _ => Err(QueryError::ModelUnavailable),
        }
    }

    /// Whether `word` is in the loaded vocabulary. Returns `false` (not an
    /// error) when no model is loaded; callers combine this with [`Self::state`]
    /// to tell "service unavailable" apart from "word unknown".
    pub fn contains(&self, word: &str) -> bool {
        match &self.state {
            ServiceState::Loaded(table) => table.contains(word),
            _ => false,
        }
    }

    pub fn vocab_info(&self) -> Result<VocabInfo, QueryError> {
        let table = self.table()?;
        Ok(VocabInfo {
            vocab_size: table.len(),
            vector_size: table.vector_size(),
        })
    }

    /// Cosine similarity between two vocabulary words, rounded to 4 decimals.
    /// A miss for either word (or both) is reported with the missing word(s).
    pub fn similarity(&self, word1: &str, word2: &str) -> Result<f64, QueryError> {
        let table = self.table()?;

        let mut missing = Vec::new();
        for word in [word1, word2] {
            if !table.contains(word) && !missing.iter().any(|m| m == word) {
                missing.push(word.to_string());
            }
        }
        if !missing.is_empty() {
            return Err(QueryError::VocabularyMiss { words: missing });
        }

        let a = table.unit_vector_of(word1).expect("checked above");
        let b = table.unit_vector_of(word2).expect("checked above");
        Ok(round4(dot(a, b) as f64))
    }

    /// The `topn` vocabulary words most similar to `word`, excluding `word`
    /// itself.
    pub fn most_similar(&self, word: &str, topn: usize) -> Result<Vec<ScoredWord>, QueryError> {
        validate_topn(topn)?;
        let table = self.table()?;

        let Some(idx) = table.position(word) else {
            return Err(QueryError::miss(word));
        };

        let target = table.unit_vector(idx).to_vec();
        Ok(rank(table, &target, &[idx], topn))
    }

    /// Analogy by vector arithmetic: rank the vocabulary by similarity to
    /// `Σ positive − Σ negative` (over unit vectors), excluding all seed words.
    ///
    /// Requires at least one positive word; every seed must be in vocabulary —
    /// the first miss fails the query, nothing is silently skipped.
    pub fn analogy(
        &self,
        positive: &[String],
        negative: &[String],
        topn: usize,
    ) -> Result<Vec<ScoredWord>, QueryError> {
        validate_topn(topn)?;
        if positive.is_empty() {
            return Err(QueryError::InvalidArgument(
                "positive must contain at least one word".into(),
            ));
        }
        let table = self.table()?;

        let mut target = vec![0.0f32; table.vector_size()];
        let mut seeds = Vec::with_capacity(positive.len() + negative.len());
        for (words, sign) in [(positive, 1.0f32), (negative, -1.0f32)] {
            for word in words {
                let Some(idx) = table.position(word) else {
                    return Err(QueryError::miss(word.clone()));
                };
                for (t, v) in target.iter_mut().zip(table.unit_vector(idx)) {
                    *t += sign * v;
                }
                seeds.push(idx);
            }
        }

        // Cosine against the target needs a unit target; ranking order is
        // unaffected by the scaling.
        let norm: f32 = target.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for t in &mut target {
                *t /= norm;
            }
        }

        Ok(rank(table, &target, &seeds, topn))
    }
}

fn validate_topn(topn: usize) -> Result<(), QueryError> {
    if topn == 0 {
        return Err(QueryError::InvalidArgument("topn must be at least 1".into()));
    }
    Ok(())
}

/// Rank all vocabulary words by similarity to `target`, skipping `exclude`
/// positions, and return the top `topn` entries.
///
/// Ordering is a total order — score descending (`f32::total_cmp`), then word
/// ascending — so results are deterministic for a fixed table. If `topn`
/// exceeds the candidate count, all candidates are returned.
fn rank(table: &VectorTable, target: &[f32], exclude: &[usize], topn: usize) -> Vec<ScoredWord> {
    let mut scored: Vec<(f32, usize)> = (0..table.len())
        .filter(|idx| !exclude.contains(idx))
        .map(|idx| (dot(table.unit_vector(idx), target), idx))
        .collect();

    let by_rank = |a: &(f32, usize), b: &(f32, usize)| {
        b.0.total_cmp(&a.0)
            .then_with(|| table.word(a.1).cmp(table.word(b.1)))
    };

    let n = topn.min(scored.len());
    if n == 0 {
        return Vec::new();
    }
    if n < scored.len() {
        scored.select_nth_unstable_by(n, by_rank);
        scored.truncate(n);
    }
    scored.sort_unstable_by(by_rank);

    scored
        .into_iter()
        .map(|(score, idx)| ScoredWord {
            word: table.word(idx).to_string(),
            similarity: round4(score as f64),
        })
        .collect()
}

/// Round to exactly 4 decimal places, half away from zero (`f64::round`):
/// `0.123456` reports as `0.1235`, `-0.00005` as `-0.0001`.
pub fn round4(score: f64) -> f64 {
    (score * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round4_half_away_from_zero() {
        assert_eq!(round4(0.123456), 0.1235);
        assert_eq!(round4(0.12344999), 0.1234);
        assert_eq!(round4(-0.00005), -0.0001);
        assert_eq!(round4(0.99995), 1.0);
        assert_eq!(round4(1.0), 1.0);
        assert_eq!(round4(-1.0), -1.0);
        assert_eq!(round4(0.0), 0.0);
    }

    fn toy_table() -> VectorTable {
        VectorTable::from_rows(
            2,
            vec![
                ("east".into(), vec![1.0, 0.0]),
                ("north".into(), vec![0.0, 1.0]),
                // deliberately identical vectors for tie-break coverage
                ("alpha".into(), vec![1.0, 1.0]),
                ("beta".into(), vec![1.0, 1.0]),
            ],
        )
    }

    #[test]
    fn equal_scores_order_lexicographically() {
        let service = EmbeddingService::from_table(toy_table());
        let results = service.most_similar("east", 3).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].word, "alpha");
        assert_eq!(results[1].word, "beta");
        assert_eq!(results[0].similarity, results[1].similarity);
        assert_eq!(results[2].word, "north");
    }

    #[test]
    fn tie_break_applies_at_the_cutoff() {
        let service = EmbeddingService::from_table(toy_table());
        // alpha and beta tie for the single slot; lexicographic rule picks alpha
        let results = service.most_similar("east", 1).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].word, "alpha");
    }

    #[test]
    fn zero_topn_is_invalid() {
        let service = EmbeddingService::from_table(toy_table());
        let err = service.most_similar("east", 0).unwrap_err();
        assert!(matches!(err, QueryError::InvalidArgument(_)));
        let err = service
            .analogy(&["east".into()], &[], 0)
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidArgument(_)));
    }

    #[test]
    fn state_labels() {
        assert_eq!(EmbeddingService::unloaded().state().label(), "unloaded");
        assert_eq!(
            EmbeddingService::from_table(toy_table()).state().label(),
            "loaded"
        );
        let failed = EmbeddingService::load(Path::new("/nonexistent/model.txt"));
        assert_eq!(failed.state().label(), "load_failed");
        assert!(failed.load_failure().unwrap().contains("/nonexistent"));
    }
}
