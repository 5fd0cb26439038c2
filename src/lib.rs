//! Japanese word-association HTTP API backed by chiVe (word2vec) embeddings.
//!
//! `renso` loads a [chiVe](https://github.com/WorksApplications/chiVe) word2vec
//! model into an immutable in-memory vector table at startup, then serves
//! semantic queries over HTTP:
//!
//! | Route          | Query                                              |
//! |----------------|----------------------------------------------------|
//! | `/associate`   | nearest neighbors to a word (連想語)               |
//! | `/analogy`     | vector arithmetic — `king − man + woman ≈ queen`   |
//! | `/similarity`  | pairwise cosine similarity                         |
//! | `/vocab/check` | vocabulary membership                              |
//! | `/vocab/info`  | vocabulary size and vector dimensionality          |
//!
//! # Architecture
//!
//! - **Model**: standard word2vec text format (optionally gzipped), rows
//!   L2-normalized at load so cosine similarity is a dot product
//! - **Lifecycle**: load once before the listener binds; a failed load keeps
//!   the process alive and reporting the failure instead of crashing
//! - **Queries**: lock-free linear scan over the immutable table, descending
//!   score with lexicographic tie-break, scores rounded to 4 decimal places
//! - **Transport**: axum HTTP with permissive CORS
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`error`] — The query error taxonomy the HTTP layer maps to status codes
//! - [`model`] — The immutable vector table and the word2vec text loader
//! - [`service`] — The embedding query core: lifecycle and the four query families
//! - [`server`] — axum routes, payload records, and error mapping

pub mod config;
pub mod error;
pub mod model;
pub mod server;
pub mod service;
