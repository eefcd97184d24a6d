//! Implementation of the `pjbuild info` command.
//!
//! Prints the metadata a consumer needs to locate and link the packaged
//! library: the CMake and pkg-config lookup names and the collected
//! library artifacts.

use anyhow::Result;

use pjbuild_lib::pkginfo::PackageInfo;

use crate::args::DirArgs;
use crate::output::{OutputFormat, print_json, print_stat};

pub fn cmd_info(dirs: &DirArgs, format: OutputFormat) -> Result<()> {
  let info = PackageInfo::from_package(&dirs.paths().package_dir)?;

  if format.is_json() {
    return print_json(&info);
  }

  print_stat("cmake_file_name", &info.cmake_file_name);
  print_stat("pkg_config_name", &info.pkg_config_name);
  for lib in &info.libs {
    print_stat("lib", lib);
  }

  Ok(())
}
