//! Metadata published for consumers of the packaged library.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;
use walkdir::WalkDir;

use crate::consts::{CMAKE_FILE_NAME, PKG_CONFIG_NAME};

/// What a consumer needs to locate and link the package.
#[derive(Debug, Clone, Serialize)]
pub struct PackageInfo {
  /// Lookup name for CMake's find machinery.
  pub cmake_file_name: String,
  /// Lookup name for pkg-config.
  pub pkg_config_name: String,
  /// Library artifacts produced by the build, in stable order.
  pub libs: Vec<String>,
}

impl PackageInfo {
  /// Collect metadata from a populated package directory.
  pub fn from_package(package_dir: &Path) -> std::io::Result<Self> {
    Ok(Self {
      cmake_file_name: CMAKE_FILE_NAME.to_string(),
      pkg_config_name: PKG_CONFIG_NAME.to_string(),
      libs: collect_libs(&package_dir.join("lib"))?,
    })
  }
}

/// Scan a `lib/` directory for produced library artifacts.
///
/// Names are returned with the `lib` prefix and platform extension
/// stripped, deduplicated, in lexicographic order. A missing directory
/// yields an empty set.
pub fn collect_libs(lib_dir: &Path) -> std::io::Result<Vec<String>> {
  if !lib_dir.exists() {
    return Ok(Vec::new());
  }

  let mut names = BTreeSet::new();
  for entry in WalkDir::new(lib_dir).max_depth(1) {
    let entry = entry.map_err(std::io::Error::other)?;
    if !entry.file_type().is_file() && !entry.file_type().is_symlink() {
      continue;
    }
    if let Some(name) = entry.file_name().to_str().and_then(lib_name) {
      names.insert(name);
    }
  }

  Ok(names.into_iter().collect())
}

/// The link name of a library file, or `None` for non-library files.
fn lib_name(filename: &str) -> Option<String> {
  if let Some(stem) = filename.strip_suffix(".lib") {
    return Some(stem.to_string());
  }

  let stem = filename.strip_prefix("lib")?;

  // Versioned shared objects (libfoo.so.2.15) collapse to the link name
  if let Some(idx) = stem.find(".so") {
    let name = &stem[..idx];
    return (!name.is_empty()).then(|| name.to_string());
  }
  if let Some(name) = stem.strip_suffix(".a") {
    return (!name.is_empty()).then(|| name.to_string());
  }
  if let Some(name) = stem.strip_suffix(".dylib") {
    let name = name.trim_end_matches(|c: char| c.is_ascii_digit() || c == '.');
    return (!name.is_empty()).then(|| name.to_string());
  }

  None
}
