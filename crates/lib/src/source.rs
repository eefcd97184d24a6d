//! Source stage: archive download, verification, and unpacking.
//!
//! The upstream release is fetched as an opaque archive, verified against
//! the recipe's SHA-256, and unpacked with the top-level archive root
//! stripped so the source directory holds the tree directly.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use sha2::{Digest, Sha256};
use tar::Archive;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::recipe::SourceSpec;

/// Errors from fetching or unpacking a source archive.
#[derive(Debug, Error)]
pub enum SourceError {
  #[error("fetch failed for {url}: {message}")]
  Fetch { url: String, message: String },

  #[error("hash mismatch for {url}: expected {expected}, got {actual}")]
  HashMismatch {
    url: String,
    expected: String,
    actual: String,
  },

  #[error("unsupported archive format: {0}")]
  UnsupportedArchive(String),

  #[error("failed to unpack {path}: {message}")]
  Unpack { path: PathBuf, message: String },

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

/// Fetch and unpack the source for one release.
///
/// The archive lands in `downloads_dir` (reused on later runs when its
/// hash still matches) and the tree is unpacked into `source_dir`.
pub async fn prepare(
  spec: &SourceSpec,
  source_dir: &Path,
  downloads_dir: &Path,
) -> Result<(), SourceError> {
  let archive = fetch_archive(&spec.url, &spec.sha256, downloads_dir).await?;
  unpack_archive(&archive, source_dir)
}

/// Download `url` into `downloads_dir`, verifying its SHA-256.
///
/// A previously downloaded file with a matching hash is reused without
/// touching the network.
pub async fn fetch_archive(
  url: &str,
  expected_sha256: &str,
  downloads_dir: &Path,
) -> Result<PathBuf, SourceError> {
  tokio::fs::create_dir_all(downloads_dir).await?;

  let filename = url_to_filename(url);
  let dest = downloads_dir.join(&filename);

  if dest.exists() {
    debug!(path = ?dest, "checking cached archive");
    if let Ok(actual) = hash_file(&dest) {
      if actual == expected_sha256 {
        info!(path = ?dest, "using cached archive");
        return Ok(dest);
      }
      debug!(path = ?dest, "cached archive hash mismatch, re-downloading");
    }
  }

  info!(url = %url, "fetching source archive");

  let response = reqwest::get(url).await.map_err(|e| SourceError::Fetch {
    url: url.to_string(),
    message: e.to_string(),
  })?;

  if !response.status().is_success() {
    return Err(SourceError::Fetch {
      url: url.to_string(),
      message: format!("HTTP {}", response.status()),
    });
  }

  let bytes = response.bytes().await.map_err(|e| SourceError::Fetch {
    url: url.to_string(),
    message: e.to_string(),
  })?;

  let actual = {
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    hex::encode(hasher.finalize())
  };
  if actual != expected_sha256 {
    return Err(SourceError::HashMismatch {
      url: url.to_string(),
      expected: expected_sha256.to_string(),
      actual,
    });
  }

  let mut file = tokio::fs::File::create(&dest).await?;
  file.write_all(&bytes).await?;
  file.flush().await?;

  info!(path = ?dest, size = bytes.len(), "download complete");
  Ok(dest)
}

/// Unpack an archive into `dest`, stripping the top-level root component.
///
/// Supports `.tar.gz`/`.tgz`, `.tar`, and `.zip` — the formats upstream
/// publishes releases in.
pub fn unpack_archive(archive_path: &Path, dest: &Path) -> Result<(), SourceError> {
  let name = archive_path.to_string_lossy();

  std::fs::create_dir_all(dest)?;

  if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
    let file = File::open(archive_path)?;
    unpack_tar(Archive::new(GzDecoder::new(BufReader::new(file))), dest)?;
  } else if name.ends_with(".tar") {
    let file = File::open(archive_path)?;
    unpack_tar(Archive::new(BufReader::new(file)), dest)?;
  } else if name.ends_with(".zip") {
    unpack_zip(archive_path, dest)?;
  } else {
    return Err(SourceError::UnsupportedArchive(name.into_owned()));
  }

  info!(path = ?dest, "unpacked source tree");
  Ok(())
}

fn unpack_tar<R: Read>(mut archive: Archive<R>, dest: &Path) -> Result<(), SourceError> {
  for entry in archive.entries()? {
    let mut entry = entry?;
    let path = entry.path()?;

    // Strip the root component (e.g. pjproject-2.15.1/)
    let stripped: PathBuf = path.components().skip(1).collect();
    if stripped.as_os_str().is_empty() {
      continue;
    }

    let dest_path = dest.join(&stripped);
    if let Some(parent) = dest_path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    entry.unpack(&dest_path)?;
  }
  Ok(())
}

fn unpack_zip(archive_path: &Path, dest: &Path) -> Result<(), SourceError> {
  let file = File::open(archive_path)?;
  let mut archive = zip::ZipArchive::new(BufReader::new(file)).map_err(|e| SourceError::Unpack {
    path: archive_path.to_path_buf(),
    message: e.to_string(),
  })?;

  for i in 0..archive.len() {
    let mut entry = archive.by_index(i).map_err(|e| SourceError::Unpack {
      path: archive_path.to_path_buf(),
      message: e.to_string(),
    })?;

    let Some(path) = entry.enclosed_name() else {
      return Err(SourceError::Unpack {
        path: archive_path.to_path_buf(),
        message: "invalid entry name".to_string(),
      });
    };

    let stripped: PathBuf = path.components().skip(1).collect();
    if stripped.as_os_str().is_empty() {
      continue;
    }

    let dest_path = dest.join(&stripped);
    if entry.is_dir() {
      std::fs::create_dir_all(&dest_path)?;
    } else {
      if let Some(parent) = dest_path.parent() {
        std::fs::create_dir_all(parent)?;
      }
      let mut outfile = File::create(&dest_path)?;
      std::io::copy(&mut entry, &mut outfile)?;

      #[cfg(unix)]
      {
        use std::os::unix::fs::PermissionsExt;
        if let Some(mode) = entry.unix_mode() {
          std::fs::set_permissions(&dest_path, std::fs::Permissions::from_mode(mode))?;
        }
      }
    }
  }
  Ok(())
}

/// SHA-256 of a file, as lowercase hex.
pub fn hash_file(path: &Path) -> Result<String, std::io::Error> {
  let mut file = File::open(path)?;
  let mut hasher = Sha256::new();
  let mut buffer = [0u8; 8192];
  loop {
    let n = file.read(&mut buffer)?;
    if n == 0 {
      break;
    }
    hasher.update(&buffer[..n]);
  }
  Ok(hex::encode(hasher.finalize()))
}

/// Derive a safe filename from a download URL.
fn url_to_filename(url: &str) -> String {
  if let Some(last) = url.rsplit('/').next() {
    let last = last.split('?').next().unwrap_or(last);
    let sanitized: String = last
      .chars()
      .map(|c| {
        if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
          c
        } else {
          '_'
        }
      })
      .collect();
    if !sanitized.is_empty() && sanitized != "." && sanitized != ".." {
      return sanitized;
    }
  }

  let mut hasher = Sha256::new();
  hasher.update(url.as_bytes());
  format!("archive_{}", &hex::encode(hasher.finalize())[..16])
}
