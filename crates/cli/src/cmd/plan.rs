//! Implementation of the `pjbuild plan` command.
//!
//! Derives everything the build stage would hand to the external tools
//! (configure arguments, environment, dependency requirements) and prints
//! it without touching the filesystem.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::Serialize;

use pjbuild_lib::deps::{self, Dependency};
use pjbuild_lib::exec::Invocation;

use crate::args::{ContextArgs, OptionArgs};
use crate::output::{OutputFormat, print_info, print_json, print_stat};

#[derive(Serialize)]
struct PlanOutput {
  cross: bool,
  target: Option<String>,
  configure_args: Vec<String>,
  env: BTreeMap<String, String>,
  dependencies: Vec<Dependency>,
}

pub fn cmd_plan(options: &OptionArgs, context: &ContextArgs, format: OutputFormat) -> Result<()> {
  let options = options.to_options();
  let ctx = context.build_context();
  let toolchain = context.toolchain(options);

  let plan = PlanOutput {
    cross: ctx.is_cross(),
    target: ctx.target.as_ref().map(|t| t.as_str().to_string()),
    configure_args: toolchain.configure_args(&ctx),
    env: toolchain.env(&ctx),
    dependencies: deps::declare(&options),
  };

  if format.is_json() {
    return print_json(&plan);
  }

  let kind = if plan.cross { "cross" } else { "native" };
  print_info(&format!("plan for a {kind} build"));

  let configure = Invocation::new("./configure").args(plan.configure_args.clone());
  print_stat("configure", &configure.display_line());
  for (key, value) in &plan.env {
    print_stat(key, value);
  }

  print_info("dependencies");
  for dep in &plan.dependencies {
    print_stat(&dep.name, &dep.req.to_string());
  }

  Ok(())
}
