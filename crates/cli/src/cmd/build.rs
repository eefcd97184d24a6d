//! Implementation of the `pjbuild build` command.
//!
//! Applies the recipe's patches, stages the source tree into the build
//! directory, and drives the external configure/make sequence with the
//! derived arguments. Failures from the external tools abort the command.

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use pjbuild_lib::stage::{self, BuildConfig};

use crate::args::{ContextArgs, DirArgs, OptionArgs, RecipeArgs};
use crate::output::{format_duration, print_success};

pub fn cmd_build(
  options: &OptionArgs,
  context: &ContextArgs,
  recipe: &RecipeArgs,
  dirs: &DirArgs,
  jobs: Option<usize>,
) -> Result<()> {
  let (data, version) = recipe.load()?;
  let patches = data.patches(&version);
  let paths = dirs.paths();
  let ctx = context.build_context();
  let toolchain = context.toolchain(options.to_options());

  let mut config = BuildConfig::default();
  if let Some(jobs) = jobs {
    config.jobs = jobs;
  }

  let started = Instant::now();
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  rt.block_on(stage::build::run(
    &paths,
    patches,
    &recipe.recipe_dir(),
    &toolchain,
    &ctx,
    &config,
  ))
  .with_context(|| format!("build failed for pjproject {version}"))?;

  print_success(&format!(
    "Built pjproject {version} in {}",
    format_duration(started.elapsed())
  ));
  info!(path = %paths.build_dir.display(), "build tree ready");

  Ok(())
}
