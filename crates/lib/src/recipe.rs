//! Recipe data: per-version source archives and patches.
//!
//! The data lives in a TOML file next to the pipeline (see `sources.toml`
//! at the repository root) and is the only per-version input; everything
//! else derives from options and platform.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors loading or querying recipe data.
#[derive(Debug, Error)]
pub enum RecipeDataError {
  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    source: std::io::Error,
  },

  #[error("failed to parse {path}: {source}")]
  Parse {
    path: PathBuf,
    source: toml::de::Error,
  },

  #[error("no source declared for version {0}")]
  UnknownVersion(String),
}

/// Where to fetch one upstream release, and how to verify it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceSpec {
  pub url: String,
  /// Lowercase hex SHA-256 of the archive.
  pub sha256: String,
}

/// A patch applied to the unpacked source tree before building.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PatchSpec {
  /// Path to the patch file, relative to the recipe file's directory.
  pub file: PathBuf,
  /// Strip level passed to the patch tool.
  #[serde(default = "default_strip")]
  pub strip: u32,
  #[serde(default)]
  pub description: Option<String>,
}

fn default_strip() -> u32 {
  1
}

/// The parsed recipe file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeData {
  #[serde(default)]
  pub sources: BTreeMap<String, SourceSpec>,
  #[serde(default)]
  pub patches: BTreeMap<String, Vec<PatchSpec>>,
}

impl RecipeData {
  /// Load and parse a recipe file.
  pub fn load(path: &Path) -> Result<Self, RecipeDataError> {
    let text = std::fs::read_to_string(path).map_err(|source| RecipeDataError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    toml::from_str(&text).map_err(|source| RecipeDataError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// The source archive for `version`.
  pub fn source(&self, version: &str) -> Result<&SourceSpec, RecipeDataError> {
    self
      .sources
      .get(version)
      .ok_or_else(|| RecipeDataError::UnknownVersion(version.to_string()))
  }

  /// The patches declared for `version`, oldest first. Missing entries
  /// mean no patches.
  pub fn patches(&self, version: &str) -> &[PatchSpec] {
    self.patches.get(version).map(Vec::as_slice).unwrap_or(&[])
  }

  /// The newest version present in the recipe, by lexicographic order of
  /// the version keys.
  pub fn latest_version(&self) -> Option<&str> {
    self.sources.keys().next_back().map(String::as_str)
  }
}
