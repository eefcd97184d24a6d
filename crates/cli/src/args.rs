//! Shared argument groups for the subcommands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use pjbuild_lib::options::BuildOptions;
use pjbuild_lib::platform::{BuildContext, Triple};
use pjbuild_lib::recipe::RecipeData;
use pjbuild_lib::stage::StagePaths;
use pjbuild_lib::toolchain::Toolchain;

/// The seven build options, phrased relative to their defaults.
#[derive(Debug, Args)]
pub struct OptionArgs {
  /// Build shared libraries instead of static archives
  #[arg(long)]
  pub shared: bool,

  /// Do not emit position-independent code for static builds
  #[arg(long = "no-fpic")]
  pub no_fpic: bool,

  /// Do not use libuuid for GUID generation
  #[arg(long = "no-uuid")]
  pub no_uuid: bool,

  /// Use libsamplerate for sample-rate conversion
  #[arg(long)]
  pub samplerate: bool,

  /// Disable the external-sound-device backend
  #[arg(long = "no-ext-sound")]
  pub no_ext_sound: bool,

  /// Build video support
  #[arg(long)]
  pub video: bool,

  /// Use fixed-point media processing
  #[arg(long = "no-floating-point")]
  pub no_floating_point: bool,
}

impl OptionArgs {
  pub fn to_options(&self) -> BuildOptions {
    BuildOptions {
      shared: self.shared,
      fpic: !self.no_fpic,
      uuid: !self.no_uuid,
      samplerate: self.samplerate,
      ext_sound: !self.no_ext_sound,
      video: self.video,
      floating_point: !self.no_floating_point,
    }
  }
}

/// Cross-compilation and dependency wiring.
#[derive(Debug, Args)]
pub struct ContextArgs {
  /// Target triple for cross builds (e.g. aarch64-unknown-linux-gnu)
  #[arg(long)]
  pub target: Option<String>,

  /// Install prefix of a resolved dependency; repeatable
  #[arg(long = "dep-prefix", value_name = "DIR")]
  pub dep_prefixes: Vec<PathBuf>,
}

impl ContextArgs {
  pub fn build_context(&self) -> BuildContext {
    BuildContext::detect(self.target.clone().map(Triple::new))
  }

  pub fn toolchain(&self, options: BuildOptions) -> Toolchain {
    let mut toolchain = Toolchain::new(options);
    for prefix in &self.dep_prefixes {
      toolchain = toolchain.with_dep_prefix(prefix);
    }
    toolchain
  }
}

/// Which recipe file and which upstream release to use.
#[derive(Debug, Args)]
pub struct RecipeArgs {
  /// Recipe data file with per-version sources and patches
  #[arg(long, default_value = "sources.toml")]
  pub recipe: PathBuf,

  /// Upstream release to build (defaults to the newest in the recipe)
  #[arg(long, value_name = "VERSION")]
  pub pjsip_version: Option<String>,
}

impl RecipeArgs {
  /// Load the recipe and resolve the requested version.
  pub fn load(&self) -> Result<(RecipeData, String)> {
    let data = RecipeData::load(&self.recipe)
      .with_context(|| format!("failed to load recipe {}", self.recipe.display()))?;

    let version = match &self.pjsip_version {
      Some(v) => v.clone(),
      None => data
        .latest_version()
        .context("recipe declares no sources")?
        .to_string(),
    };

    Ok((data, version))
  }

  /// The directory patch files are resolved against.
  pub fn recipe_dir(&self) -> PathBuf {
    self
      .recipe
      .parent()
      .filter(|p| !p.as_os_str().is_empty())
      .unwrap_or(Path::new("."))
      .to_path_buf()
  }
}

/// Where the pipeline stages its work.
#[derive(Debug, Args)]
pub struct DirArgs {
  /// Work directory holding src/, build/, package/, downloads/
  #[arg(long, default_value = "work")]
  pub work_dir: PathBuf,
}

impl DirArgs {
  pub fn paths(&self) -> StagePaths {
    StagePaths::under(&self.work_dir)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use clap::Parser;

  #[derive(Parser)]
  struct Harness {
    #[command(flatten)]
    options: OptionArgs,
  }

  #[test]
  fn no_flags_yield_the_defaults() {
    let harness = Harness::parse_from(["test"]);
    assert_eq!(harness.options.to_options(), BuildOptions::default());
  }

  #[test]
  fn flags_invert_their_option() {
    let harness = Harness::parse_from(["test", "--shared", "--no-uuid", "--samplerate"]);
    let options = harness.options.to_options();
    assert!(options.shared);
    assert!(!options.uuid);
    assert!(options.samplerate);
    assert!(options.ext_sound, "untouched options keep their defaults");
  }

  #[test]
  fn recipe_dir_falls_back_to_current_dir() {
    let args = RecipeArgs {
      recipe: PathBuf::from("sources.toml"),
      pjsip_version: None,
    };
    assert_eq!(args.recipe_dir(), PathBuf::from("."));

    let args = RecipeArgs {
      recipe: PathBuf::from("recipes/pjproject/sources.toml"),
      pjsip_version: None,
    };
    assert_eq!(args.recipe_dir(), PathBuf::from("recipes/pjproject"));
  }
}
