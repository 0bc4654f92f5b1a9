use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod check;
mod compile;
mod inspect;

#[derive(Parser)]
#[command(name = "lens")]
#[command(about = "Compile, check and inspect ePI lenses", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed a lens script into its Library manifest
    Compile(CompileArgs),

    /// Run every ePI + IPS combination through the lenses
    Check(CheckArgs),

    /// Show fragments, class counts and marker matches for one ePI
    Inspect(InspectArgs),
}

#[derive(Args)]
pub(crate) struct CompileArgs {
    /// Directory holding `<base>.json` and `<base>.js`
    dir: PathBuf,

    /// Lens base name, e.g. `my-lens`
    base: String,

    /// Write the compiled manifest here instead of stdout
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Data root with `PePIs/` and `IPS/`
    #[arg(long, default_value = "testdata")]
    data: PathBuf,

    /// Directory with lens manifests and scripts
    #[arg(long, default_value = "lens")]
    lenses: PathBuf,

    /// TOML config file (overrides --data and --lenses)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Extra ePI directory on top of the bundled ones
    #[arg(long)]
    custom_pepis: Option<PathBuf>,

    /// Extra IPS directory on top of the bundled ones
    #[arg(long)]
    custom_ips: Option<PathBuf>,

    /// Minimum content preservation ratio
    #[arg(long)]
    threshold: Option<f64>,

    /// Write each transformed ePI to the output directory
    #[arg(long)]
    write_outputs: bool,
}

#[derive(Args)]
pub(crate) struct InspectArgs {
    /// ePI Bundle JSON file
    file: PathBuf,

    /// Class to count (repeatable; default: highlight and collapse)
    #[arg(long = "class")]
    classes: Vec<String>,

    /// Text to look for inside highlight / collapse elements
    #[arg(long)]
    text: Option<String>,

    /// Match the whole element text instead of a substring
    #[arg(long)]
    exact: bool,

    #[arg(long)]
    case_sensitive: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Compile(args) => compile::run(args)?,
        Commands::Check(args) => check::run(args).await?,
        Commands::Inspect(args) => inspect::run(args)?,
    }

    Ok(())
}
