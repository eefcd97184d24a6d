//! macOS install-name fixups for packaged dylibs.
//!
//! After `make install` the dylibs carry the staging prefix in their id
//! and in references to sibling libraries. Each packaged dylib gets the
//! id `@rpath/<filename>`, and load commands pointing at other packaged
//! dylibs are rewritten to the same form. Planning is pure; only the
//! `install_name_tool`/`otool` invocations touch the filesystem.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::exec::{self, ExecError, Invocation};

#[derive(Debug, Error)]
pub enum InstallNameError {
  #[error(transparent)]
  Exec(#[from] ExecError),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

/// A single `install_name_tool -change` to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
  pub old: String,
  pub new: String,
}

/// The `@rpath` id for a dylib filename.
pub fn rpath_id(filename: &str) -> String {
  format!("@rpath/{filename}")
}

/// Extract the referenced install names from `otool -L` output.
///
/// The first line names the inspected file; each following line is a load
/// command of the form `\t<path> (compatibility version ...)`.
pub fn parse_load_commands(otool_output: &str) -> Vec<String> {
  otool_output
    .lines()
    .skip(1)
    .filter_map(|line| line.split_whitespace().next())
    .map(str::to_string)
    .collect()
}

/// Plan the rewrites for one dylib given its load commands and the set of
/// packaged dylib filenames.
///
/// Only references to packaged siblings are touched; system libraries and
/// anything already in `@rpath` form are left alone.
pub fn plan_rewrites(load_commands: &[String], packaged: &BTreeSet<String>) -> Vec<Rewrite> {
  load_commands
    .iter()
    .filter(|cmd| !cmd.starts_with("@rpath/"))
    .filter_map(|cmd| {
      let basename = cmd.rsplit('/').next()?;
      packaged.contains(basename).then(|| Rewrite {
        old: cmd.clone(),
        new: rpath_id(basename),
      })
    })
    .collect()
}

/// All dylibs directly under `lib_dir`.
pub fn list_dylibs(lib_dir: &Path) -> std::io::Result<Vec<PathBuf>> {
  let mut dylibs = Vec::new();
  if !lib_dir.exists() {
    return Ok(dylibs);
  }
  for entry in std::fs::read_dir(lib_dir)? {
    let entry = entry?;
    let path = entry.path();
    if path.extension().is_some_and(|ext| ext == "dylib") {
      dylibs.push(path);
    }
  }
  dylibs.sort();
  Ok(dylibs)
}

/// Rewrite ids and sibling references for every packaged dylib.
pub async fn fix_install_names(lib_dir: &Path) -> Result<(), InstallNameError> {
  let dylibs = list_dylibs(lib_dir)?;
  if dylibs.is_empty() {
    debug!(path = ?lib_dir, "no dylibs to fix");
    return Ok(());
  }

  let packaged: BTreeSet<String> = dylibs
    .iter()
    .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
    .map(str::to_string)
    .collect();

  for dylib in &dylibs {
    let filename = dylib
      .file_name()
      .and_then(|n| n.to_str())
      .expect("dylib paths come from directory listing");

    info!(lib = %filename, "fixing install name");

    let set_id = Invocation::new("install_name_tool")
      .arg("-id")
      .arg(rpath_id(filename))
      .arg(dylib.display().to_string());
    exec::run(&set_id).await?;

    let otool = Invocation::new("otool").arg("-L").arg(dylib.display().to_string());
    let output = exec::run(&otool).await?;

    for rewrite in plan_rewrites(&parse_load_commands(&output), &packaged) {
      let change = Invocation::new("install_name_tool")
        .arg("-change")
        .arg(&rewrite.old)
        .arg(&rewrite.new)
        .arg(dylib.display().to_string());
      exec::run(&change).await?;
    }
  }

  Ok(())
}
