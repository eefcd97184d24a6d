//! Implementation of the `pjbuild package` command.
//!
//! Copies the license, runs the external install step into the package
//! layout, prunes the pkg-config and shared-data directories, and on
//! macOS rewrites the dylib install names.

use anyhow::{Context, Result};

use pjbuild_lib::pkginfo::PackageInfo;
use pjbuild_lib::stage;

use crate::args::{ContextArgs, DirArgs};
use crate::output::{print_stat, print_success};

pub fn cmd_package(context: &ContextArgs, dirs: &DirArgs) -> Result<()> {
  let paths = dirs.paths();
  let ctx = context.build_context();

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  rt.block_on(stage::package::run(&paths, &ctx))
    .context("package stage failed")?;

  let info = PackageInfo::from_package(&paths.package_dir)?;

  print_success("Package complete");
  print_stat("path", &paths.package_dir.display().to_string());
  print_stat("libs", &info.libs.join(", "));

  Ok(())
}
