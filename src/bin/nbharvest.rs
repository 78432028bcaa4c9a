//! nbharvest CLI - Harvest Python source into a Jupyter notebook.

use std::io;
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use nbharvest::builder::Harvest;
use nbharvest::errors::{exit_code, HarvestError};
use nbharvest::extract::ExtractMode;
use nbharvest::filter::SourceFilter;
use nbharvest::prompt::{AutoConfirm, ConsolePrompt};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nbharvest")]
#[command(about = "Harvest Python declarations into a Jupyter notebook")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk a folder and build a notebook from its Python files
    Extract(ExtractArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
struct ExtractArgs {
    /// Root folder to walk (asked for interactively when omitted)
    path: Option<PathBuf>,

    /// What to take from each file
    #[arg(long, value_enum, default_value = "declarations")]
    mode: ModeArg,

    /// Notebook file name inside the root folder
    #[arg(short, long)]
    output: Option<String>,

    /// Source file extension(s)
    #[arg(long, value_delimiter = ',', default_value = "py")]
    ext: Vec<String>,

    /// Skip files whose path below the root matches this glob
    #[arg(long)]
    exclude: Vec<String>,

    /// Enter every folder without asking
    #[arg(short, long)]
    yes: bool,

    /// Skip hidden files and directories
    #[arg(long)]
    skip_hidden: bool,

    /// Respect .gitignore files
    #[arg(long)]
    gitignore: bool,

    /// Maximum directory depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Log debug diagnostics to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, ValueEnum)]
enum ModeArg {
    /// Top-level functions and classes, one cell each
    Declarations,
    /// Whole file, one cell per file
    Content,
}

impl From<ModeArg> for ExtractMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Declarations => ExtractMode::Declarations,
            ModeArg::Content => ExtractMode::Content,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract(args) => {
            init_tracing(args.verbose);
            run_extract(args)
        }
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "nbharvest", &mut io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(exit_code(&e));
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run_extract(args: ExtractArgs) -> Result<(), HarvestError> {
    let mut console = ConsolePrompt::new(io::stdin().lock(), io::stdout());

    let root = match args.path {
        Some(path) => path,
        None => console.ask_root()?,
    };

    let filter = SourceFilter::new(&args.ext, &args.exclude)?;

    let mut harvest = Harvest::new(root)
        .mode(args.mode.into())
        .filter(filter)
        .include_hidden(!args.skip_hidden)
        .respect_gitignore(args.gitignore);
    if let Some(name) = args.output {
        harvest = harvest.output_name(name);
    }
    if let Some(depth) = args.max_depth {
        harvest = harvest.max_depth(depth);
    }

    let mut progress = io::stdout();
    let result = if args.yes {
        harvest.run(AutoConfirm, &mut progress)?
    } else {
        harvest.run(&mut console, &mut progress)?
    };

    let written = result.write()?;
    println!("Notebook written to {}", written.display());

    Ok(())
}
