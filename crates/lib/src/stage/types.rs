//! Shared stage types: working directories, configuration, errors.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::apple::InstallNameError;
use crate::exec::ExecError;
use crate::source::SourceError;

/// The working directories of one pipeline run.
#[derive(Debug, Clone)]
pub struct StagePaths {
  /// Unpacked upstream tree.
  pub source_dir: PathBuf,
  /// Staged copy the external build runs in.
  pub build_dir: PathBuf,
  /// Final package layout.
  pub package_dir: PathBuf,
  /// Downloaded archives, reused across runs.
  pub downloads_dir: PathBuf,
}

impl StagePaths {
  /// The conventional layout under a single work directory.
  pub fn under(root: &Path) -> Self {
    Self {
      source_dir: root.join("src"),
      build_dir: root.join("build"),
      package_dir: root.join("package"),
      downloads_dir: root.join("downloads"),
    }
  }
}

/// Configuration for the external build.
#[derive(Debug, Clone)]
pub struct BuildConfig {
  /// Parallelism handed to make. This is the external tool's parallelism;
  /// the pipeline itself stays sequential.
  pub jobs: usize,
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self { jobs: num_cpus() }
  }
}

fn num_cpus() -> usize {
  std::thread::available_parallelism().map(|p| p.get()).unwrap_or(4)
}

/// Errors that can occur while running a stage.
#[derive(Debug, Error)]
pub enum StageError {
  #[error(transparent)]
  Exec(#[from] ExecError),

  #[error(transparent)]
  Source(#[from] SourceError),

  #[error(transparent)]
  InstallName(#[from] InstallNameError),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// The build stage needs a prepared source tree.
  #[error("no configure script at {path}; run the source stage first")]
  MissingSource { path: PathBuf },

  /// The license file must ship with the package.
  #[error("license file not found at {path}")]
  MissingLicense { path: PathBuf },
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn layout_under_work_dir() {
    let paths = StagePaths::under(Path::new("/work"));
    assert_eq!(paths.source_dir, Path::new("/work/src"));
    assert_eq!(paths.build_dir, Path::new("/work/build"));
    assert_eq!(paths.package_dir, Path::new("/work/package"));
    assert_eq!(paths.downloads_dir, Path::new("/work/downloads"));
  }

  #[test]
  fn default_jobs_is_positive() {
    assert!(BuildConfig::default().jobs >= 1);
  }
}
