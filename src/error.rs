//! Query error taxonomy.
//!
//! Every query against the [`EmbeddingService`](crate::service::EmbeddingService)
//! either succeeds or returns exactly one of these variants. The HTTP layer
//! pattern-matches on the variant to choose a status code; the `Display`
//! messages are already caller-presentable and always name the offending
//! word(s) or argument.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The service is not in the `Loaded` state. The health route carries the
    /// load-failure reason, if any.
    #[error("embedding model is not loaded")]
    ModelUnavailable,

    /// One or more query words are absent from the loaded vocabulary.
    /// Expected and frequent; not a system fault.
    #[error("{}", vocabulary_miss_message(.words))]
    VocabularyMiss { words: Vec<String> },

    /// Structurally invalid query: empty positive seed list, out-of-range
    /// `topn`, and the like.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl QueryError {
    /// A miss for a single word.
    pub fn miss(word: impl Into<String>) -> Self {
        Self::VocabularyMiss {
            words: vec![word.into()],
        }
    }
}

fn vocabulary_miss_message(words: &[String]) -> String {
    let quoted: Vec<String> = words.iter().map(|w| format!("'{w}'")).collect();
    if quoted.len() == 1 {
        format!("{} is not in the model vocabulary", quoted[0])
    } else {
        format!("{} are not in the model vocabulary", quoted.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_message_names_the_word() {
        let err = QueryError::miss("猫");
        assert_eq!(err.to_string(), "'猫' is not in the model vocabulary");
    }

    #[test]
    fn miss_message_names_all_words() {
        let err = QueryError::VocabularyMiss {
            words: vec!["foo".into(), "bar".into()],
        };
        assert_eq!(
            err.to_string(),
            "'foo', 'bar' are not in the model vocabulary"
        );
    }

    #[test]
    fn invalid_argument_carries_detail() {
        let err = QueryError::InvalidArgument("topn must be at least 1".into());
        assert_eq!(err.to_string(), "invalid argument: topn must be at least 1");
    }
}
