use clap::{Parser, Subcommand};
use plusplace::{parser, Config, Location, PlaceIndex};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Place-anchored plus codes from the command line.
///
/// Examples:
///   plusplace resolve 51.525736 -0.083704
///   plusplace parse "G8+7GV, City of London England"
///   plusplace complete "G8+7GV, Sho"
#[derive(Parser)]
#[command(name = "plusplace", version, about, long_about = None)]
struct Cli {
    /// Place index file (.json extract or packed). Overrides PLUSPLACE_INDEX.
    #[arg(long, global = true)]
    index: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rank short codes for a coordinate.
    Resolve {
        /// Latitude (-90 to 90).
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        /// Longitude (-180 to 180).
        #[arg(allow_negative_numbers = true)]
        lon: f64,
        /// Maximum number of codes. Defaults to PLUSPLACE_LIMIT or 5.
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },
    /// Read a plus code or grid reference back to a coordinate.
    Parse {
        /// e.g. "G8+7GV, City of London" or "TQ 33035 82498"
        text: String,
    },
    /// Suggest completions for a partially typed short code.
    Complete {
        /// e.g. "G8+7GV, Sho"
        text: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(path) = cli.index {
        config.index_path = Some(path);
    }
    let index = PlaceIndex::load(&config)?;

    match cli.command {
        Command::Resolve { lat, lon, limit } => {
            let here = Location::from_lat_lon(lat, lon, &index);
            let limit = limit.unwrap_or(config.default_limit);

            let Some(full) = here.plus_code() else {
                println!("Cannot encode {lat}, {lon}");
                return Ok(());
            };
            println!("{full}");
            for (code, spoken) in here.short_codes(limit).iter().zip(here.phonetic_codes(limit)) {
                println!("  {code}");
                println!("    {spoken}");
            }
            match here.os_grid_ref() {
                Some(grid) => println!("  Grid: {grid}"),
                None => println!("  Grid: outside coverage"),
            }
        }
        Command::Parse { text } => {
            let here = Location::parse(&text, &index);
            match (here.latitude(), here.longitude()) {
                (Some(lat), Some(lon)) => {
                    println!("{lat:.6}, {lon:.6}");
                    if let Some(code) = here.plus_code() {
                        println!("  Code: {code}");
                    }
                }
                _ => println!("Could not resolve \"{text}\""),
            }
        }
        Command::Complete { text } => {
            let suggestions = parser::auto_complete(&text, &index);
            if suggestions.is_empty() {
                println!("No suggestions");
            }
            for suggestion in suggestions {
                println!("{suggestion}");
            }
        }
    }

    Ok(())
}
