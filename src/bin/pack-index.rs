use clap::Parser;
use plusplace::PlaceIndex;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Packs a place index into the compact binary format.
///
/// Strings are interned and coordinates stored as fixed-point integers.
#[derive(Parser)]
#[command(name = "pack-index", version, about, long_about = None)]
struct Args {
    /// places.json extract (or an already packed index)
    input: PathBuf,
    /// Output file.
    #[arg(default_value = "places.bin")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    println!("Reading places from: {}", args.input.display());

    let index = PlaceIndex::open(&args.input)?;

    println!("Packing {} places...", index.len());
    let encoded = index.to_database().to_bytes()?;
    std::fs::write(&args.output, &encoded)?;
    println!("Done! {} written ({} KB)", args.output.display(), encoded.len() / 1_000);
    Ok(())
}
