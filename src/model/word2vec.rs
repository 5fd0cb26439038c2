//! word2vec text-format loader.
//!
//! The artifact is the standard word2vec text layout: a header line
//! `"<vocab_size> <vector_size>"` followed by one `word v1 v2 … vd` line per
//! entry, space-separated. A path ending in `.gz` is decompressed on the fly.
//! The header's vocabulary count is treated as a hint; the parsed count is
//! authoritative.

use anyhow::{ensure, Context, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::VectorTable;

/// Load a word2vec text artifact (plain or gzipped) into a [`VectorTable`].
pub fn load_text(path: &Path) -> Result<VectorTable> {
    let file = File::open(path)
        .with_context(|| format!("failed to open model artifact: {}", path.display()))?;

    if path.extension().is_some_and(|ext| ext == "gz") {
        parse(BufReader::new(GzDecoder::new(file)))
    } else {
        parse(BufReader::new(file))
    }
    .with_context(|| format!("failed to load model artifact: {}", path.display()))
}

/// Parse word2vec text from any buffered reader.
pub fn parse(reader: impl BufRead) -> Result<VectorTable> {
    let mut lines = reader.lines();

    let header = lines
        .next()
        .context("model artifact is empty")?
        .context("failed to read model header")?;
    let (declared_count, vector_size) = parse_header(&header)?;

    let mut rows: Vec<(String, Vec<f32>)> = Vec::with_capacity(declared_count);
    for (i, line) in lines.enumerate() {
        let line = line.context("failed to read model artifact")?;
        if line.is_empty() {
            continue;
        }
        let lineno = i + 2;

        let mut tokens = line.split_whitespace();
        let word = tokens
            .next()
            .with_context(|| format!("line {lineno}: missing word"))?;
        let vector = tokens
            .map(|t| {
                t.parse::<f32>()
                    .with_context(|| format!("line {lineno}: invalid vector component '{t}'"))
            })
            .collect::<Result<Vec<f32>>>()?;
        ensure!(
            vector.len() == vector_size,
            "line {lineno}: expected {vector_size} components for '{word}', got {}",
            vector.len()
        );

        rows.push((word.to_string(), vector));
    }

    ensure!(!rows.is_empty(), "model artifact contains no vectors");
    if rows.len() != declared_count {
        tracing::warn!(
            declared = declared_count,
            parsed = rows.len(),
            "vocabulary size differs from header"
        );
    }

    Ok(VectorTable::from_rows(vector_size, rows))
}

fn parse_header(header: &str) -> Result<(usize, usize)> {
    let mut parts = header.split_whitespace();
    let (Some(count), Some(dims), None) = (parts.next(), parts.next(), parts.next()) else {
        anyhow::bail!("malformed header '{header}': expected '<vocab_size> <vector_size>'");
    };
    let count: usize = count
        .parse()
        .with_context(|| format!("malformed vocabulary size in header '{header}'"))?;
    let dims: usize = dims
        .parse()
        .with_context(|| format!("malformed vector size in header '{header}'"))?;
    ensure!(dims >= 1, "vector size must be at least 1, got {dims}");
    Ok((count, dims))
}
