//! Declaration of required external libraries.
//!
//! The cryptography dependency is unconditional; UUID generation and
//! sample-rate conversion are pulled in by their respective options.
//! Whether a requirement can actually be satisfied is the caller's
//! concern; this module only declares.

use semver::{Version, VersionReq};
use serde::Serialize;

use crate::options::BuildOptions;

/// A named external library requirement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dependency {
  pub name: String,
  /// Semver requirement, rendered with the crates.io comparator syntax.
  #[serde(serialize_with = "serialize_req")]
  pub req: VersionReq,
}

fn serialize_req<S: serde::Serializer>(req: &VersionReq, s: S) -> Result<S::Ok, S::Error> {
  s.collect_str(req)
}

impl Dependency {
  fn new(name: &str, req: &str) -> Self {
    Self {
      name: name.to_string(),
      // Requirements here are string literals kept next to their names
      req: VersionReq::parse(req).expect("requirement literal must parse"),
    }
  }

  /// Whether `version` satisfies this requirement.
  pub fn satisfied_by(&self, version: &Version) -> bool {
    self.req.matches(version)
  }
}

/// Declare the dependency set for the given options.
///
/// Returns `openssl` unconditionally, plus `libuuid` and `libsamplerate`
/// when the corresponding option is set.
pub fn declare(options: &BuildOptions) -> Vec<Dependency> {
  let mut deps = vec![Dependency::new("openssl", ">=3, <4")];

  if options.uuid {
    deps.push(Dependency::new("libuuid", "=1.0.3"));
  }
  if options.samplerate {
    deps.push(Dependency::new("libsamplerate", "=0.2.2"));
  }

  deps
}

#[cfg(test)]
mod tests {
  use super::*;

  fn names(options: &BuildOptions) -> Vec<String> {
    declare(options).into_iter().map(|d| d.name).collect()
  }

  #[test]
  fn openssl_is_always_declared() {
    let mut options = BuildOptions::default();
    assert!(names(&options).contains(&"openssl".to_string()));

    options.uuid = false;
    options.samplerate = false;
    assert!(names(&options).contains(&"openssl".to_string()));
  }

  #[test]
  fn libuuid_follows_uuid_option() {
    let mut options = BuildOptions::default();
    options.uuid = true;
    assert!(names(&options).contains(&"libuuid".to_string()));

    options.uuid = false;
    assert!(!names(&options).contains(&"libuuid".to_string()));
  }

  #[test]
  fn libsamplerate_follows_samplerate_option() {
    let mut options = BuildOptions::default();
    options.samplerate = true;
    assert!(names(&options).contains(&"libsamplerate".to_string()));

    options.samplerate = false;
    assert!(!names(&options).contains(&"libsamplerate".to_string()));
  }

  #[test]
  fn openssl_requirement_spans_major_three() {
    let openssl = declare(&BuildOptions::default())
      .into_iter()
      .find(|d| d.name == "openssl")
      .unwrap();

    assert!(openssl.satisfied_by(&Version::new(3, 0, 0)));
    assert!(openssl.satisfied_by(&Version::new(3, 5, 1)));
    assert!(!openssl.satisfied_by(&Version::new(4, 0, 0)));
    assert!(!openssl.satisfied_by(&Version::new(1, 1, 1)));
  }

  #[test]
  fn conditional_requirements_are_pinned() {
    let mut options = BuildOptions::default();
    options.uuid = true;
    options.samplerate = true;
    let deps = declare(&options);

    let libuuid = deps.iter().find(|d| d.name == "libuuid").unwrap();
    assert!(libuuid.satisfied_by(&Version::new(1, 0, 3)));
    assert!(!libuuid.satisfied_by(&Version::new(1, 0, 4)));

    let libsamplerate = deps.iter().find(|d| d.name == "libsamplerate").unwrap();
    assert!(libsamplerate.satisfied_by(&Version::new(0, 2, 2)));
    assert!(!libsamplerate.satisfied_by(&Version::new(0, 2, 1)));
  }
}
