//! Build context: host platform plus an optional cross-compilation target.

use std::fmt;

use super::{Arch, Os};

/// A GNU-style target triple, e.g. `aarch64-unknown-linux-gnu`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple(String);

impl Triple {
  pub fn new(triple: impl Into<String>) -> Self {
    Self(triple.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// The architecture named by the leading component, if recognized.
  pub fn arch(&self) -> Option<Arch> {
    self.0.split('-').next().and_then(Arch::from_triple_component)
  }

  /// The operating system named by the remaining components, if recognized.
  pub fn os(&self) -> Option<Os> {
    let rest = self.0.splitn(2, '-').nth(1)?;
    Os::from_triple_component(rest)
  }
}

impl fmt::Display for Triple {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Host platform plus the requested target, when one was given.
#[derive(Debug, Clone)]
pub struct BuildContext {
  pub host_os: Option<Os>,
  pub host_arch: Option<Arch>,
  pub target: Option<Triple>,
}

impl BuildContext {
  /// Detect the host and record the requested target triple, if any.
  pub fn detect(target: Option<Triple>) -> Self {
    Self {
      host_os: Os::current(),
      host_arch: Arch::current(),
      target,
    }
  }

  /// Whether this is a cross build.
  ///
  /// True when a target triple was requested and its recognized os or arch
  /// differs from the host. A triple naming the host exactly is a native
  /// build; an unrecognized component is treated as foreign.
  pub fn is_cross(&self) -> bool {
    let Some(target) = &self.target else {
      return false;
    };
    target.os() != self.host_os || target.arch() != self.host_arch
  }

  /// The operating system the produced artifacts will run on.
  pub fn target_os(&self) -> Option<Os> {
    match &self.target {
      Some(triple) => triple.os(),
      None => self.host_os,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn context(host_os: Os, host_arch: Arch, target: Option<&str>) -> BuildContext {
    BuildContext {
      host_os: Some(host_os),
      host_arch: Some(host_arch),
      target: target.map(Triple::new),
    }
  }

  #[test]
  fn triple_parses_arch_and_os() {
    let triple = Triple::new("aarch64-unknown-linux-gnu");
    assert_eq!(triple.arch(), Some(Arch::Aarch64));
    assert_eq!(triple.os(), Some(Os::Linux));
  }

  #[test]
  fn no_target_means_native() {
    let ctx = context(Os::Linux, Arch::X86_64, None);
    assert!(!ctx.is_cross());
    assert_eq!(ctx.target_os(), Some(Os::Linux));
  }

  #[test]
  fn matching_triple_is_native() {
    let ctx = context(Os::Linux, Arch::X86_64, Some("x86_64-unknown-linux-gnu"));
    assert!(!ctx.is_cross());
  }

  #[test]
  fn foreign_os_is_cross() {
    let ctx = context(Os::Linux, Arch::X86_64, Some("x86_64-apple-darwin"));
    assert!(ctx.is_cross());
    assert_eq!(ctx.target_os(), Some(Os::MacOs));
  }

  #[test]
  fn foreign_arch_is_cross() {
    let ctx = context(Os::Linux, Arch::X86_64, Some("aarch64-unknown-linux-gnu"));
    assert!(ctx.is_cross());
    assert_eq!(ctx.target_os(), Some(Os::Linux));
  }
}
