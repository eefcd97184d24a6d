use std::fmt;

/// Operating system variants the pipeline knows how to target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
  Linux,
  MacOs,
  Windows,
}

impl Os {
  /// Detect the operating system this process runs on.
  pub fn current() -> Option<Self> {
    match std::env::consts::OS {
      "linux" => Some(Self::Linux),
      "macos" => Some(Self::MacOs),
      "windows" => Some(Self::Windows),
      _ => None,
    }
  }

  /// Recognize the OS from a target-triple component.
  pub fn from_triple_component(component: &str) -> Option<Self> {
    if component.contains("linux") {
      Some(Self::Linux)
    } else if component.contains("darwin") || component.contains("macos") {
      Some(Self::MacOs)
    } else if component.contains("windows") {
      Some(Self::Windows)
    } else {
      None
    }
  }

  /// Returns the lowercase string identifier for this OS.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Linux => "linux",
      Self::MacOs => "darwin",
      Self::Windows => "windows",
    }
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn current_returns_supported_os() {
    assert!(Os::current().is_some(), "current OS should be supported");
  }

  #[test]
  fn macos_uses_darwin_identifier() {
    assert_eq!(Os::MacOs.as_str(), "darwin");
  }

  #[test]
  fn triple_components_resolve() {
    assert_eq!(Os::from_triple_component("unknown-linux-gnu"), Some(Os::Linux));
    assert_eq!(Os::from_triple_component("apple-darwin"), Some(Os::MacOs));
    assert_eq!(Os::from_triple_component("pc-windows-msvc"), Some(Os::Windows));
    assert_eq!(Os::from_triple_component("none-eabi"), None);
  }
}
