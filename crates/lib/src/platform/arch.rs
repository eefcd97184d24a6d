use std::fmt;

/// CPU architecture variants the pipeline knows how to target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
  X86_64,
  Aarch64,
  Arm,
}

impl Arch {
  /// Detect the architecture this process runs on.
  pub fn current() -> Option<Self> {
    match std::env::consts::ARCH {
      "x86_64" => Some(Self::X86_64),
      "aarch64" => Some(Self::Aarch64),
      "arm" => Some(Self::Arm),
      _ => None,
    }
  }

  /// Recognize the architecture from the leading target-triple component.
  pub fn from_triple_component(component: &str) -> Option<Self> {
    match component {
      "x86_64" | "amd64" => Some(Self::X86_64),
      "aarch64" | "arm64" => Some(Self::Aarch64),
      c if c.starts_with("arm") => Some(Self::Arm),
      _ => None,
    }
  }

  /// Returns the architecture name as used in target triples.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::X86_64 => "x86_64",
      Self::Aarch64 => "aarch64",
      Self::Arm => "arm",
    }
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
