use audmeta::convert::{self, ConvertOptions, Direction};
use audmeta::formats::FormatKind;
use audmeta::hash::HashDictionary;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "audmeta", about = "Convert game audio metadata between binary and JSON")]
struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Hash word list used to resolve hashes to names
    #[arg(long, global = true, default_value = "Hashes.txt")]
    hashes: PathBuf,
    /// Write compact JSON instead of indenting it
    #[arg(long, global = true)]
    compact: bool,
    /// Do not add entry names to the hash dictionary
    #[arg(long, global = true)]
    no_register: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a binary metadata file to JSON
    Unpack {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Format: curves, categories, sounds, game (default: from the file name)
        #[arg(short, long)]
        format: Option<String>,
    },
    /// Convert a JSON file back to binary
    Pack {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long)]
        format: Option<String>,
    },
    /// Convert every well-known file in a game directory
    Batch {
        #[arg(short = 'C', long, default_value = ".")]
        dir: PathBuf,
        /// Pack `<name>.json` into `<name>.GEN` instead of unpacking
        #[arg(long = "gen")]
        generate: bool,
    },
    /// Decode and re-encode a file, comparing the bytes
    Verify {
        input: PathBuf,
        #[arg(short, long)]
        format: Option<String>,
    },
    /// Print the recomputed hash and archive offset tables
    Offsets {
        input: PathBuf,
        #[arg(short, long)]
        format: Option<String>,
    },
    /// Print the hash of each argument
    Hash {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("audmeta=info")),
        1 => EnvFilter::new("audmeta=debug"),
        _ => EnvFilter::new("audmeta=trace"),
    };
    fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).init();
    let base = ConvertOptions {
        pretty:         !cli.compact,
        register_names: !cli.no_register,
        ..ConvertOptions::default()
    };

    match cli.command {

        // ── Unpack ───────────────────────────────────────────────────────────
        Commands::Unpack { input, output, format } => {
            let opts = with_format(&base, format.as_deref())?;
            let mut dict = load_hashes(&cli.hashes)?;
            let summary = convert::unpack(&input, output.as_deref(), &mut dict, &opts)?;
            println!("  {} entries  {} → {}", summary.entries, input.display(), summary.output.display());
        }

        // ── Pack ─────────────────────────────────────────────────────────────
        Commands::Pack { input, output, format } => {
            let opts = with_format(&base, format.as_deref())?;
            let summary = convert::pack(&input, output.as_deref(), &opts)?;
            println!("  {} entries  {} → {}", summary.entries, input.display(), summary.output.display());
        }

        // ── Batch ────────────────────────────────────────────────────────────
        Commands::Batch { dir, generate } => {
            let mut dict = load_hashes(&cli.hashes)?;
            let direction = if generate { Direction::Pack } else { Direction::Unpack };
            let report = convert::batch(&dir, direction, &mut dict, &base);
            for s in &report.converted {
                println!("  {:<10} {:>6} entries  {}", s.format, s.entries, s.output.display());
            }
            for (path, e) in &report.failed {
                eprintln!("  FAILED {}: {}", path.display(), e);
            }
            println!(
                "{} converted, {} missing, {} failed",
                report.converted.len(),
                report.missing.len(),
                report.failed.len()
            );
            if !report.is_success() {
                std::process::exit(1);
            }
        }

        // ── Verify ───────────────────────────────────────────────────────────
        Commands::Verify { input, format } => {
            let opts = with_format(&base, format.as_deref())?;
            let mut dict = load_hashes(&cli.hashes)?;
            let r = convert::verify(&input, &mut dict, &opts)?;
            println!("── {} ({}) ─────────────────────────────", input.display(), r.format);
            println!("  Entries          {}", r.entries);
            println!("  Original CRC32   {:08x}", r.original_crc32);
            println!("  Re-encoded CRC32 {:08x}", r.reencoded_crc32);
            println!("  Binary identical {}", r.binary_identical);
            println!("  Text identical   {}", r.text_identical);
            if !r.binary_identical {
                std::process::exit(1);
            }
        }

        // ── Offsets ──────────────────────────────────────────────────────────
        Commands::Offsets { input, format } => {
            let opts = with_format(&base, format.as_deref())?;
            let dict = load_hashes(&cli.hashes)?;
            let report = convert::offsets(&input, &dict, &opts)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        // ── Hash ─────────────────────────────────────────────────────────────
        Commands::Hash { text } => {
            for t in &text {
                println!("{}  {}", HashDictionary::compute(t), t);
            }
        }
    }

    Ok(())
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn with_format(base: &ConvertOptions, name: Option<&str>) -> Result<ConvertOptions, Box<dyn std::error::Error>> {
    let format = match name {
        Some(n) => Some(FormatKind::from_name(n).ok_or_else(|| format!("unknown format '{n}'"))?),
        None    => None,
    };
    Ok(ConvertOptions { format, ..base.clone() })
}

/// A missing word list is not an error: hashes then render numerically.
fn load_hashes(path: &Path) -> Result<HashDictionary, Box<dyn std::error::Error>> {
    if !path.is_file() {
        tracing::warn!(path = %path.display(), "hash word list not found, hashes will render numerically");
        return Ok(HashDictionary::new());
    }
    let dict = HashDictionary::load(path)?;
    tracing::info!(path = %path.display(), hashes = dict.len(), "loaded hash word list");
    Ok(dict)
}
