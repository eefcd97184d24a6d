use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod args;
mod cmd;
mod output;

use args::{ContextArgs, DirArgs, OptionArgs, RecipeArgs};
use output::OutputFormat;

/// pjbuild - Build and package the pjproject (PJSIP) multimedia stack
#[derive(Parser)]
#[command(name = "pjbuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Fetch and unpack the upstream source archive
  Source {
    #[command(flatten)]
    recipe: RecipeArgs,

    #[command(flatten)]
    dirs: DirArgs,
  },

  /// Show the derived configure invocation and dependencies without running anything
  Plan {
    #[command(flatten)]
    options: OptionArgs,

    #[command(flatten)]
    context: ContextArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },

  /// Patch, stage, configure, and build the source tree
  Build {
    #[command(flatten)]
    options: OptionArgs,

    #[command(flatten)]
    context: ContextArgs,

    #[command(flatten)]
    recipe: RecipeArgs,

    #[command(flatten)]
    dirs: DirArgs,

    /// Parallel jobs handed to make (defaults to the CPU count)
    #[arg(short, long)]
    jobs: Option<usize>,
  },

  /// Install the build into the package layout, prune it, and fix it up
  Package {
    #[command(flatten)]
    context: ContextArgs,

    #[command(flatten)]
    dirs: DirArgs,
  },

  /// Show metadata for a populated package directory
  Info {
    #[command(flatten)]
    dirs: DirArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },
}

fn main() {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
    )
    .without_time()
    .init();

  if let Err(e) = dispatch(cli) {
    output::print_error(&format!("{e:#}"));
    std::process::exit(1);
  }
}

fn dispatch(cli: Cli) -> Result<()> {
  match cli.command {
    Commands::Source { recipe, dirs } => cmd::cmd_source(&recipe, &dirs),
    Commands::Plan {
      options,
      context,
      format,
    } => cmd::cmd_plan(&options, &context, format),
    Commands::Build {
      options,
      context,
      recipe,
      dirs,
      jobs,
    } => cmd::cmd_build(&options, &context, &recipe, &dirs, jobs),
    Commands::Package { context, dirs } => cmd::cmd_package(&context, &dirs),
    Commands::Info { dirs, format } => cmd::cmd_info(&dirs, format),
  }
}
