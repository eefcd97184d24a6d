//! Build stage: patches, tree staging, configure, make.
//!
//! Mirrors the upstream flow: patch the unpacked sources, stage a full
//! copy into the build directory, then hand over to the external
//! configure/make sequence with the derived arguments and environment.

use std::path::Path;

use tracing::info;

use crate::exec::{self, Invocation};
use crate::platform::BuildContext;
use crate::recipe::PatchSpec;
use crate::stage::{BuildConfig, StageError, StagePaths};
use crate::toolchain::Toolchain;
use crate::util::fsops::copy_tree;

/// Run the whole build stage.
pub async fn run(
  paths: &StagePaths,
  patches: &[PatchSpec],
  recipe_dir: &Path,
  toolchain: &Toolchain,
  ctx: &BuildContext,
  config: &BuildConfig,
) -> Result<(), StageError> {
  let configure_script = paths.source_dir.join("configure");
  if !configure_script.exists() {
    return Err(StageError::MissingSource {
      path: configure_script,
    });
  }

  apply_patches(patches, recipe_dir, &paths.source_dir).await?;

  info!(src = ?paths.source_dir, dest = ?paths.build_dir, "staging source tree");
  copy_tree(&paths.source_dir, &paths.build_dir)?;

  exec::run(&configure_invocation(&paths.build_dir, toolchain, ctx)).await?;
  exec::run(&make_invocation(&paths.build_dir, toolchain, ctx, config)).await?;

  info!("build complete");
  Ok(())
}

/// Apply the declared patches to the source tree, in declaration order.
pub async fn apply_patches(
  patches: &[PatchSpec],
  recipe_dir: &Path,
  source_dir: &Path,
) -> Result<(), StageError> {
  for patch in patches {
    info!(file = ?patch.file, "applying patch");
    exec::run(&patch_invocation(patch, recipe_dir, source_dir)).await?;
  }
  Ok(())
}

/// The `patch` invocation for one declared patch.
pub fn patch_invocation(patch: &PatchSpec, recipe_dir: &Path, source_dir: &Path) -> Invocation {
  Invocation::new("patch")
    .arg(format!("-p{}", patch.strip))
    .arg("-i")
    .arg(recipe_dir.join(&patch.file).display().to_string())
    .cwd(source_dir)
}

/// The configure invocation for the staged tree.
pub fn configure_invocation(build_dir: &Path, toolchain: &Toolchain, ctx: &BuildContext) -> Invocation {
  Invocation::new(build_dir.join("configure").display().to_string())
    .args(toolchain.configure_args(ctx))
    .cwd(build_dir)
    .envs(&toolchain.env(ctx))
}

/// The make invocation for the staged tree.
pub fn make_invocation(
  build_dir: &Path,
  toolchain: &Toolchain,
  ctx: &BuildContext,
  config: &BuildConfig,
) -> Invocation {
  Invocation::new("make")
    .arg(format!("-j{}", config.jobs))
    .cwd(build_dir)
    .envs(&toolchain.env(ctx))
}
