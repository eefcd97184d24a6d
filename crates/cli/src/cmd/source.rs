//! Implementation of the `pjbuild source` command.
//!
//! Resolves the requested release in the recipe, downloads its archive
//! (reusing a cached copy when the hash still matches), verifies it, and
//! unpacks it into the work directory.

use anyhow::{Context, Result};

use pjbuild_lib::source;

use crate::args::{DirArgs, RecipeArgs};
use crate::output::{print_stat, print_success};

pub fn cmd_source(recipe: &RecipeArgs, dirs: &DirArgs) -> Result<()> {
  let (data, version) = recipe.load()?;
  let spec = data.source(&version)?;
  let paths = dirs.paths();

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  rt.block_on(source::prepare(spec, &paths.source_dir, &paths.downloads_dir))
    .with_context(|| format!("failed to prepare pjproject {version}"))?;

  print_success(&format!("Source for pjproject {version} ready"));
  print_stat("url", &spec.url);
  print_stat("tree", &paths.source_dir.display().to_string());

  Ok(())
}
