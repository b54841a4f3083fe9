//! Host-side SHA-256 verification of local source archives.

use std::path::Path;

use osaft_docker_core::error::{OsaftError, Result};
use sha2::{Digest, Sha256};
use tokio::io::AsyncReadExt;

const CHUNK_SIZE: usize = 64 * 1024;

/// Compute the SHA-256 digest of a file as lowercase hex.
pub async fn sha256_file(path: &Path) -> Result<String> {
    let mut file = tokio::fs::File::open(path).await.map_err(|e| {
        OsaftError::Config(format!(
            "Failed to open archive {}: {}",
            path.display(),
            e
        ))
    })?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Verify a file against an expected lowercase hex digest.
pub async fn verify_file(path: &Path, expected: &str) -> Result<()> {
    let actual = sha256_file(path).await?;
    if actual != expected {
        return Err(OsaftError::ChecksumMismatch {
            path: path.display().to_string(),
            expected: expected.to_string(),
            actual,
        });
    }
    tracing::debug!(path = %path.display(), "Archive checksum verified");
    Ok(())
}
