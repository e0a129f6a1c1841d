use clap::{Parser, Subcommand, ValueEnum};
use contest_gal::aggregate::Aggregator;
use contest_gal::{config, output};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "contest-gal")]
#[command(about = "Periodic photo contest listings from a directory tree")]
#[command(long_about = "\
Periodic photo contest listings from a directory tree

Every period is a folder; lock files drive its workflow.

Directory structure:

  contest/
  ├── config.toml                  # Settings (optional)
  ├── CW_12/                       # Period 12
  │   ├── alice_01.jpg             # Entry (jpg, jpeg, gif, png)
  │   ├── template.html            # Override template (optional)
  │   ├── upload.lock              # Present: submissions closed, voting open
  │   ├── vote.lock                # Present with upload.lock: closed, results shown
  │   └── votes.txt                # Ballots: voter:choice1:choice2:...
  └── CW_11/

Creator keys come from file names: alice_01.jpg and Alice2.png both
belong to 'alice'.

Set RUST_LOG=debug for cache and scan details.
Run 'contest-gal gen-config' to generate a documented config.toml.")]
#[command(version = env!("CONTEST_GAL_VERSION"))]
struct Cli {
    /// Base directory holding the period folders
    #[arg(long, default_value = ".", global = true)]
    dir: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text, global = true)]
    format: Format,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// List every period, newest first, with results for closed ones
    All,
    /// Show a single period (no results)
    Period {
        /// Period id, as in the folder name (CW_<id>)
        id: String,
    },
    /// Show one creator's entries across all periods
    Creator {
        /// Creator key, e.g. 'alice' for alice_01.jpg
        key: String,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let contest_config = match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            return Ok(ExitCode::SUCCESS);
        }
        _ => config::load_config(&cli.dir)?,
    };
    let slot_factor = contest_config.ballots.slot_factor;
    let aggregator = Aggregator::new(contest_config);

    let periods = match &cli.command {
        Command::Period { id } => aggregator
            .aggregate_period(&cli.dir, id)?
            .map(|period| vec![period]),
        Command::Creator { key } => aggregator.aggregate_by_creator(&cli.dir, key)?,
        Command::All | Command::GenConfig => Some(aggregator.aggregate_all(&cli.dir)?),
    };

    let Some(periods) = periods else {
        eprintln!("Not found");
        return Ok(ExitCode::from(2));
    };

    match cli.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&periods)?),
        Format::Text => {
            output::print_listing(&periods, slot_factor);
            println!("Thumbnails: {}", aggregator.thumbnails().stats());
        }
    }

    Ok(ExitCode::SUCCESS)
}
