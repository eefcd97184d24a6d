//! Package stage: license, install, prune, macOS fixups.
//!
//! Installs under a DESTDIR so the package directory mirrors the final
//! layout, then removes the generated pkg-config and shared-data
//! directories, which consumers must not see.

use std::path::Path;

use tracing::info;

use crate::apple;
use crate::consts::LICENSE_FILE;
use crate::exec::{self, Invocation};
use crate::platform::{BuildContext, Os};
use crate::stage::{StageError, StagePaths};
use crate::util::fsops::remove_dir_if_exists;

/// Run the whole package stage.
pub async fn run(paths: &StagePaths, ctx: &BuildContext) -> Result<(), StageError> {
  copy_license(&paths.source_dir, &paths.package_dir)?;

  let destdir = std::path::absolute(&paths.package_dir)?;
  exec::run(&install_invocation(&paths.build_dir, &destdir)).await?;

  prune_package(&paths.package_dir)?;

  if ctx.target_os() == Some(Os::MacOs) {
    apple::fix_install_names(&paths.package_dir.join("lib")).await?;
  }

  info!(path = ?paths.package_dir, "package complete");
  Ok(())
}

/// Copy the upstream license into `<package>/licenses/`.
pub fn copy_license(source_dir: &Path, package_dir: &Path) -> Result<(), StageError> {
  let license = source_dir.join(LICENSE_FILE);
  if !license.exists() {
    return Err(StageError::MissingLicense { path: license });
  }

  let licenses_dir = package_dir.join("licenses");
  std::fs::create_dir_all(&licenses_dir)?;
  std::fs::copy(&license, licenses_dir.join(LICENSE_FILE))?;
  Ok(())
}

/// The `make install` invocation. DESTDIR must be absolute since make
/// runs inside the build directory.
pub fn install_invocation(build_dir: &Path, destdir: &Path) -> Invocation {
  Invocation::new("make")
    .arg("install")
    .arg(format!("DESTDIR={}", destdir.display()))
    .cwd(build_dir)
}

/// Remove the generated pkg-config and shared-data directories.
///
/// Runs unconditionally; either directory may be absent depending on the
/// option set, and absence is fine.
pub fn prune_package(package_dir: &Path) -> Result<(), StageError> {
  remove_dir_if_exists(&package_dir.join("lib").join("pkgconfig"))?;
  remove_dir_if_exists(&package_dir.join("share"))?;
  Ok(())
}
