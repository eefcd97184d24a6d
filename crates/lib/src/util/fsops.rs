//! Filesystem staging helpers.

use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

/// Copy a directory tree into `dest`, overwriting files that already
/// exist. Directories are merged; Unix permissions come along with
/// `fs::copy`. Symlinks are recreated, not followed.
pub fn copy_tree(src: &Path, dest: &Path) -> std::io::Result<()> {
  for entry in WalkDir::new(src) {
    let entry = entry.map_err(std::io::Error::other)?;
    let rel = entry
      .path()
      .strip_prefix(src)
      .expect("walkdir yields paths under its root");
    if rel.as_os_str().is_empty() {
      continue;
    }

    let target = dest.join(rel);
    let file_type = entry.file_type();

    if file_type.is_dir() {
      std::fs::create_dir_all(&target)?;
    } else if file_type.is_symlink() {
      let link_target = std::fs::read_link(entry.path())?;
      if target.symlink_metadata().is_ok() {
        std::fs::remove_file(&target)?;
      }
      #[cfg(unix)]
      std::os::unix::fs::symlink(&link_target, &target)?;
      #[cfg(windows)]
      std::os::windows::fs::symlink_file(&link_target, &target)?;
    } else {
      if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
      }
      std::fs::copy(entry.path(), &target)?;
    }
  }

  debug!(src = ?src, dest = ?dest, "staged tree");
  Ok(())
}

/// Remove a directory tree if it exists. Absence is not an error.
pub fn remove_dir_if_exists(path: &Path) -> std::io::Result<()> {
  match std::fs::remove_dir_all(path) {
    Ok(()) => {
      debug!(path = ?path, "removed directory");
      Ok(())
    }
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
    Err(e) => Err(e),
  }
}
