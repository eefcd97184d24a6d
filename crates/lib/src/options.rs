//! Declared build options.
//!
//! Seven independent boolean toggles control how the pjproject tree is
//! configured. Each maps to configure flags on its own; no two options
//! interact, and every combination is valid.

use serde::{Deserialize, Serialize};

/// The option set for a single pipeline invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
  /// Build shared libraries instead of static archives.
  pub shared: bool,
  /// Emit position-independent code for static builds.
  pub fpic: bool,
  /// Use libuuid for GUID generation.
  pub uuid: bool,
  /// Use libsamplerate for sample-rate conversion.
  pub samplerate: bool,
  /// Enable the external-sound-device backend.
  pub ext_sound: bool,
  /// Build video support.
  pub video: bool,
  /// Use floating-point media processing.
  pub floating_point: bool,
}

impl Default for BuildOptions {
  fn default() -> Self {
    Self {
      shared: false,
      fpic: true,
      uuid: true,
      samplerate: false,
      ext_sound: true,
      video: false,
      floating_point: true,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_match_declared_option_table() {
    let opts = BuildOptions::default();
    assert!(!opts.shared);
    assert!(opts.fpic);
    assert!(opts.uuid);
    assert!(!opts.samplerate);
    assert!(opts.ext_sound);
    assert!(!opts.video);
    assert!(opts.floating_point);
  }

  #[test]
  fn partial_toml_fills_remaining_defaults() {
    let opts: BuildOptions = toml::from_str("shared = true\nvideo = true\n").unwrap();
    assert!(opts.shared);
    assert!(opts.video);
    assert!(opts.uuid, "unset fields keep their defaults");
    assert!(!opts.samplerate);
  }
}
