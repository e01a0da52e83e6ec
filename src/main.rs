use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "redate", version)]
#[command(about = "Spread git commits evenly across a date range")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Redistribute commits as described by a plan file
    Run {
        /// Path to the plan TOML file
        plan: PathBuf,

        /// Directory for the mapping and filter script (overrides the plan)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Report the redistribution without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Print an annotated example plan
    Template,

    /// Add two numbers
    Add {
        #[arg(allow_negative_numbers = true)]
        a: String,
        #[arg(allow_negative_numbers = true)]
        b: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Run {
            plan,
            out_dir,
            dry_run,
        } => {
            let config = redate::RunConfig { out_dir, dry_run };
            redate::run(&plan, &config)
                .await
                .with_context(|| format!("running plan '{}'", plan.display()))?;
        }
        Command::Template => {
            print!("{}", redate::template());
        }
        Command::Add { a, b } => {
            let a: redate::Number = a.parse()?;
            let b: redate::Number = b.parse()?;
            println!("{}", redate::add(a, b)?);
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
