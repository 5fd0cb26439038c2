//! CLI subcommands for managing the chiVe model artifact.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;

use renso::config::{expand_tilde, ModelConfig};

const CHIVE_BASE_URL: &str = "https://sudachi.s3-ap-northeast-1.amazonaws.com/chive";

/// Known chiVe releases: name, artifact file, approximate download size.
/// `mc` is the minimum corpus count — higher means a smaller vocabulary.
const MODELS: &[(&str, &str, &str)] = &[
    ("v1.3-mc5", "chive-1.3-mc5.txt.gz", "~2.9GB"),
    ("v1.3-mc15", "chive-1.3-mc15.txt.gz", "~1.3GB"),
    ("v1.3-mc30", "chive-1.3-mc30.txt.gz", "~0.8GB"),
    ("v1.3-mc90", "chive-1.3-mc90.txt.gz", "~0.5GB"),
];

/// Download a chiVe model artifact into the cache directory.
///
/// `name` overrides the configured model; unknown names list the catalog.
pub async fn model_download(config: &ModelConfig, name: Option<&str>) -> Result<()> {
    let name = name.unwrap_or(&config.name);
    let Some((_, file, size)) = MODELS.iter().find(|(n, _, _)| *n == name) else {
        let known: Vec<&str> = MODELS.iter().map(|(n, _, _)| *n).collect();
        anyhow::bail!("unknown model: {name}. Known models: {}", known.join(", "));
    };

    let cache_dir = expand_tilde(&config.cache_dir);
    std::fs::create_dir_all(&cache_dir)
        .with_context(|| format!("failed to create cache dir: {}", cache_dir.display()))?;

    let dest = cache_dir.join(file);
    if dest.exists() {
        println!("Model already exists at {}", dest.display());
        return Ok(());
    }

    println!("Downloading {file} ({size})...");
    download_file(&format!("{CHIVE_BASE_URL}/{file}"), &dest).await?;
    println!("Model saved to {}", dest.display());
    println!("Model download complete. Start the server with `renso serve`.");
    Ok(())
}

/// Download a file from a URL with progress bar. Uses atomic write (tmp + rename).
async fn download_file(url: &str, dest: &PathBuf) -> Result<()> {
    let mut response = reqwest::get(url)
        .await
        .with_context(|| format!("HTTP request failed for {url}"))?;

    anyhow::ensure!(
        response.status().is_success(),
        "download failed with HTTP {}",
        response.status()
    );

    let total_size = response.content_length();
    let pb = if let Some(size) = total_size {
        let pb = ProgressBar::new(size);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  {bar:40.cyan/blue} {bytes}/{total_bytes} ({eta})")
                .expect("valid template")
                .progress_chars("##-"),
        );
        pb
    } else {
        ProgressBar::new_spinner()
    };

    let tmp_path = dest.with_extension("tmp");
    let mut file = tokio::fs::File::create(&tmp_path)
        .await
        .with_context(|| format!("failed to create temp file: {}", tmp_path.display()))?;

    while let Some(chunk) = response.chunk().await.context("error reading response")? {
        pb.inc(chunk.len() as u64);
        file.write_all(&chunk).await.context("error writing to file")?;
    }

    file.flush().await?;
    drop(file);

    tokio::fs::rename(&tmp_path, dest)
        .await
        .context("failed to rename temp file")?;

    pb.finish_and_clear();
    Ok(())
}
