#![allow(dead_code)]

use renso::service::EmbeddingService;
use std::path::PathBuf;
use tempfile::TempDir;

/// Toy word2vec vocabulary, 4 dimensions: royalty / male / female axes plus a
/// fourth "pet" axis for unrelated words. Crafted so `king − man + woman`
/// lands nearest to `queen`, and so `alpha`/`beta` share an identical vector
/// for tie-break coverage.
pub const TEST_MODEL: &str = "\
10 4
king 1.0 1.0 0.0 0.0
queen 1.0 0.0 1.0 0.0
man 0.0 1.0 0.0 0.0
woman 0.0 0.0 1.0 0.0
prince 0.9 0.8 0.0 0.1
princess 0.9 0.0 0.8 0.1
cat 0.0 0.0 0.0 1.0
dog 0.0 0.1 0.0 1.0
alpha 0.5 0.5 0.5 0.5
beta 0.5 0.5 0.5 0.5
";

/// Every word in [`TEST_MODEL`].
pub const TEST_WORDS: &[&str] = &[
    "king", "queen", "man", "woman", "prince", "princess", "cat", "dog", "alpha", "beta",
];

/// Write the toy model into `dir` and return its path.
pub fn write_test_model(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("test-vectors.txt");
    std::fs::write(&path, TEST_MODEL).unwrap();
    path
}

/// A service loaded with the toy model.
pub fn loaded_service() -> EmbeddingService {
    let dir = tempfile::tempdir().unwrap();
    let path = write_test_model(&dir);
    let service = EmbeddingService::load(&path);
    assert!(service.is_loaded(), "toy model must load");
    service
}
