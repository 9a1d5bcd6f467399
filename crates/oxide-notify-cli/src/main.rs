//! oxide-notify CLI
//!
//! Generates change-notifying Rust accessors from `.sq` files.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_notify_cli::{compile_dir, explain, generate, load_options};

/// Generates change-notifying Rust accessors from `.sq` files.
#[derive(Parser)]
#[command(name = "oxide-notify")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file with compiler options.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Honor @CustomKey and @NotifyCustomKey annotations.
    #[arg(long, env = "OXIDE_NOTIFY_CUSTOM_KEYS")]
    custom_keys: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile every .sq file and write the generated modules.
    Generate {
        /// Directory containing .sq files.
        input: PathBuf,

        /// Output directory for the generated modules.
        #[arg(short, long, default_value = "src/generated")]
        out: PathBuf,
    },

    /// Compile every .sq file without writing anything.
    Check {
        /// Directory containing .sq files.
        input: PathBuf,

        /// Print the keys each statement listens under or notifies.
        #[arg(long)]
        explain: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let options = load_options(cli.config.as_deref(), cli.custom_keys)?;

    match cli.command {
        Commands::Generate { input, out } => {
            let written = generate(&input, &out, &options)?;
            for path in &written {
                println!("{}", path.display());
            }
        }

        Commands::Check { input, explain: show } => {
            let compiled = compile_dir(&input, &options)?;
            if show {
                for file in &compiled {
                    print!("{}", explain(file));
                }
            }
            info!("{} file(s) OK", compiled.len());
        }
    }

    Ok(())
}
