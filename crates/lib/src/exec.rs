//! External process runner.
//!
//! Every external invocation (`configure`, `make`, `patch`,
//! `install_name_tool`, `otool`) goes through [`run`], which logs the
//! command, captures output, and maps non-zero exit to a typed error.

use std::collections::BTreeMap;
use std::path::Path;
use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

/// Errors from launching or waiting on an external program.
#[derive(Debug, Error)]
pub enum ExecError {
  /// The program could not be started at all.
  #[error("failed to spawn {program}: {source}")]
  Spawn {
    program: String,
    source: std::io::Error,
  },

  /// The program ran and exited unsuccessfully.
  #[error("{program} exited with status {code:?}")]
  Failed { program: String, code: Option<i32> },
}

/// A single external invocation.
#[derive(Debug, Clone)]
pub struct Invocation {
  pub program: String,
  pub args: Vec<String>,
  pub cwd: Option<std::path::PathBuf>,
  pub env: BTreeMap<String, String>,
}

impl Invocation {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: None,
      env: BTreeMap::new(),
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
    self.cwd = Some(dir.as_ref().to_path_buf());
    self
  }

  pub fn envs(mut self, env: &BTreeMap<String, String>) -> Self {
    self.env.extend(env.iter().map(|(k, v)| (k.clone(), v.clone())));
    self
  }

  /// Render the invocation as a shell-like line, for display and logging.
  pub fn display_line(&self) -> String {
    let mut line = self.program.clone();
    for arg in &self.args {
      line.push(' ');
      if arg.contains(' ') {
        line.push('"');
        line.push_str(arg);
        line.push('"');
      } else {
        line.push_str(arg);
      }
    }
    line
  }
}

/// Run the invocation to completion and return its trimmed stdout.
///
/// The process inherits the pipeline's environment with `invocation.env`
/// merged on top; the external tools need the ambient PATH and compiler
/// settings. Failures carry the program name and exit code; the caller
/// propagates them unmodified.
pub async fn run(invocation: &Invocation) -> Result<String, ExecError> {
  info!(cmd = %invocation.display_line(), "executing command");

  let mut command = Command::new(&invocation.program);
  command
    .args(&invocation.args)
    .stdin(Stdio::null())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped());

  if let Some(cwd) = &invocation.cwd {
    command.current_dir(cwd);
  }
  for (key, value) in &invocation.env {
    command.env(key, value);
  }

  let output = command.output().await.map_err(|source| ExecError::Spawn {
    program: invocation.program.clone(),
    source,
  })?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stderr.is_empty() {
      debug!(stderr = %stderr, "command stderr");
    }
    if !stdout.is_empty() {
      debug!(stdout = %stdout, "command stdout");
    }
    return Err(ExecError::Failed {
      program: invocation.program.clone(),
      code: output.status.code(),
    });
  }

  let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
  if !stdout.is_empty() {
    debug!(stdout = %stdout, "command output");
  }

  Ok(stdout)
}
