//! Translation of build options into configure arguments and environment.
//!
//! Everything here is pure list/map construction: the derived arguments are
//! a function of the option set and the build context, nothing else. The
//! actual invocation happens in the build stage.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::consts::{IPV6_DEFINE, WCWIDTH_WORKAROUND};
use crate::options::BuildOptions;
use crate::platform::{BuildContext, Os};

/// Derives the configure invocation for one pipeline run.
#[derive(Debug, Clone)]
pub struct Toolchain {
  pub options: BuildOptions,
  /// Install prefix baked into configure. The default `/` pairs with
  /// installing under a DESTDIR, so the package dir mirrors the final
  /// layout.
  pub prefix: PathBuf,
  /// Install prefixes of resolved dependencies, each contributing
  /// `include/` and `lib/` to the compiler and linker search paths.
  pub dep_prefixes: Vec<PathBuf>,
}

impl Toolchain {
  pub fn new(options: BuildOptions) -> Self {
    Self {
      options,
      prefix: PathBuf::from("/"),
      dep_prefixes: Vec::new(),
    }
  }

  pub fn with_prefix(mut self, prefix: impl Into<PathBuf>) -> Self {
    self.prefix = prefix.into();
    self
  }

  pub fn with_dep_prefix(mut self, prefix: impl Into<PathBuf>) -> Self {
    self.dep_prefixes.push(prefix.into());
    self
  }

  /// The ordered configure argument list.
  ///
  /// Each option contributes its flags independently; order carries no
  /// semantics.
  pub fn configure_args(&self, ctx: &BuildContext) -> Vec<String> {
    let opts = &self.options;
    let mut args = vec![format!("--prefix={}", self.prefix.display())];

    if ctx.is_cross() {
      if let Some(target) = &ctx.target {
        args.push(format!("--host={}", target));
      }
    }

    if opts.shared {
      args.push("--enable-shared".to_string());
      args.push("--disable-static".to_string());
    } else {
      args.push("--disable-shared".to_string());
      args.push("--enable-static".to_string());
    }

    if !opts.uuid {
      args.push("--disable-uuid".to_string());
    }
    if opts.samplerate {
      args.push("--enable-libsamplerate".to_string());
    }
    if !opts.video {
      args.push("--disable-video".to_string());
    }
    if !opts.floating_point {
      args.push("--disable-floating-point".to_string());
    }
    if opts.ext_sound {
      args.push("--enable-ext-sound".to_string());
    }

    if ctx.is_cross() {
      args.push(WCWIDTH_WORKAROUND.to_string());
    }

    args.push("--disable-install-examples".to_string());

    args
  }

  /// CFLAGS additions: IPv6 is always on, and static builds get `-fPIC`
  /// when requested. Shared builds emit PIC regardless, so the toggle only
  /// matters for static objects.
  pub fn cflags(&self) -> Vec<String> {
    let mut flags = vec![IPV6_DEFINE.to_string()];
    if !self.options.shared && self.options.fpic {
      flags.push("-fPIC".to_string());
    }
    flags
  }

  /// Environment for the configure/make invocations.
  ///
  /// Dependency prefixes feed CPPFLAGS/LDFLAGS. On native builds the
  /// dependency `lib/` dirs are also exposed through the loader path, since
  /// configure runs test executables that must find shared dependencies.
  pub fn env(&self, ctx: &BuildContext) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();
    env.insert("CFLAGS".to_string(), self.cflags().join(" "));

    if !self.dep_prefixes.is_empty() {
      let includes: Vec<String> = self
        .dep_prefixes
        .iter()
        .map(|p| format!("-I{}", p.join("include").display()))
        .collect();
      let libs: Vec<String> = self
        .dep_prefixes
        .iter()
        .map(|p| format!("-L{}", p.join("lib").display()))
        .collect();
      env.insert("CPPFLAGS".to_string(), includes.join(" "));
      env.insert("LDFLAGS".to_string(), libs.join(" "));

      if !ctx.is_cross() {
        let separator = if ctx.host_os == Some(Os::Windows) { ";" } else { ":" };
        let lib_dirs: Vec<String> = self
          .dep_prefixes
          .iter()
          .map(|p| p.join("lib").display().to_string())
          .collect();
        env.insert(
          run_library_path_var(ctx.host_os).to_string(),
          lib_dirs.join(separator),
        );
      }
    }

    env
  }
}

/// The loader search-path variable for the given host OS.
pub fn run_library_path_var(os: Option<Os>) -> &'static str {
  match os {
    Some(Os::MacOs) => "DYLD_LIBRARY_PATH",
    Some(Os::Windows) => "PATH",
    _ => "LD_LIBRARY_PATH",
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::platform::{Arch, Triple};

  fn native() -> BuildContext {
    BuildContext {
      host_os: Some(Os::Linux),
      host_arch: Some(Arch::X86_64),
      target: None,
    }
  }

  fn cross() -> BuildContext {
    BuildContext {
      host_os: Some(Os::Linux),
      host_arch: Some(Arch::X86_64),
      target: Some(Triple::new("aarch64-unknown-linux-gnu")),
    }
  }

  /// Build an option set from the low seven bits of `bits`.
  fn options_from_bits(bits: u8) -> BuildOptions {
    BuildOptions {
      shared: bits & 0x01 != 0,
      fpic: bits & 0x02 != 0,
      uuid: bits & 0x04 != 0,
      samplerate: bits & 0x08 != 0,
      ext_sound: bits & 0x10 != 0,
      video: bits & 0x20 != 0,
      floating_point: bits & 0x40 != 0,
    }
  }

  #[test]
  fn every_option_combination_maps_independently() {
    for bits in 0u8..128 {
      let opts = options_from_bits(bits);
      let args = Toolchain::new(opts).configure_args(&native());

      assert_eq!(args.contains(&"--disable-uuid".to_string()), !opts.uuid);
      assert_eq!(
        args.contains(&"--enable-libsamplerate".to_string()),
        opts.samplerate
      );
      assert_eq!(args.contains(&"--disable-video".to_string()), !opts.video);
      assert_eq!(
        args.contains(&"--disable-floating-point".to_string()),
        !opts.floating_point
      );
      assert_eq!(args.contains(&"--enable-ext-sound".to_string()), opts.ext_sound);
      assert_eq!(args.contains(&"--enable-shared".to_string()), opts.shared);
      assert_eq!(args.contains(&"--enable-static".to_string()), !opts.shared);
      assert!(args.contains(&"--disable-install-examples".to_string()));
      assert!(!args.contains(&WCWIDTH_WORKAROUND.to_string()));
    }
  }

  #[test]
  fn uuid_off_samplerate_on_flag_set() {
    let opts = BuildOptions {
      uuid: false,
      samplerate: true,
      video: false,
      floating_point: true,
      ext_sound: true,
      ..BuildOptions::default()
    };
    let args = Toolchain::new(opts).configure_args(&native());

    for expected in [
      "--disable-uuid",
      "--enable-libsamplerate",
      "--disable-video",
      "--enable-ext-sound",
      "--disable-install-examples",
    ] {
      assert!(args.contains(&expected.to_string()), "missing {expected}");
    }
    assert!(!args.contains(&"--disable-floating-point".to_string()));
  }

  #[test]
  fn cross_build_adds_wcwidth_workaround_and_host() {
    let args = Toolchain::new(BuildOptions::default()).configure_args(&cross());
    assert!(args.contains(&WCWIDTH_WORKAROUND.to_string()));
    assert!(args.contains(&"--host=aarch64-unknown-linux-gnu".to_string()));
  }

  #[test]
  fn default_prefix_is_root() {
    let args = Toolchain::new(BuildOptions::default()).configure_args(&native());
    assert_eq!(args[0], "--prefix=/");
  }

  #[test]
  fn cflags_always_enable_ipv6() {
    let tc = Toolchain::new(BuildOptions::default());
    assert!(tc.cflags().contains(&IPV6_DEFINE.to_string()));
  }

  #[test]
  fn fpic_applies_to_static_builds_only() {
    let mut opts = BuildOptions::default();
    opts.fpic = true;
    opts.shared = false;
    assert!(Toolchain::new(opts).cflags().contains(&"-fPIC".to_string()));

    opts.shared = true;
    assert!(!Toolchain::new(opts).cflags().contains(&"-fPIC".to_string()));

    opts.shared = false;
    opts.fpic = false;
    assert!(!Toolchain::new(opts).cflags().contains(&"-fPIC".to_string()));
  }

  #[test]
  fn dep_prefixes_feed_compiler_and_linker_paths() {
    let tc = Toolchain::new(BuildOptions::default()).with_dep_prefix("/opt/openssl");
    let env = tc.env(&native());

    assert!(env["CPPFLAGS"].contains("-I/opt/openssl/include"));
    assert!(env["LDFLAGS"].contains("-L/opt/openssl/lib"));
    assert_eq!(env["LD_LIBRARY_PATH"], "/opt/openssl/lib");
  }

  #[test]
  fn cross_build_does_not_expose_loader_path() {
    let tc = Toolchain::new(BuildOptions::default()).with_dep_prefix("/opt/openssl");
    let env = tc.env(&cross());

    assert!(env.contains_key("LDFLAGS"));
    assert!(!env.contains_key("LD_LIBRARY_PATH"));
  }

  #[test]
  fn env_without_deps_only_sets_cflags() {
    let env = Toolchain::new(BuildOptions::default()).env(&native());
    assert_eq!(env.len(), 1);
    assert!(env.contains_key("CFLAGS"));
  }
}
