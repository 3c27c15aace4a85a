//! Command-line front end: inspect inputs, plan partitions, generate datasets.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use edgestream::io::writer::{scrambled_edges, write_kron_dataset};
use edgestream::{CountingSink, Loader, LoaderConfig, open_source, plan_all};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "edgestream",
    version,
    about = "Stream binary edge lists the way a graph loader would",
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stream an input to the end and print its load report as JSON.
    Stat {
        #[arg(value_name = "PATH")]
        path: PathBuf,

        #[arg(long, value_name = "FILE", help = "JSON loader configuration")]
        config: Option<PathBuf>,

        #[arg(long, help = "Split the dataset into this many equal parts")]
        parts: Option<u64>,

        #[arg(long, help = "1-based part to load (requires --parts)", requires = "parts")]
        part: Option<u64>,

        #[arg(long, value_name = "FILE", help = "Also write the report to this file")]
        report: Option<PathBuf>,
    },
    /// Print every slice of an equal split of TOTAL edges into PARTS.
    Split {
        total: u64,
        parts: u64,
    },
    /// Write a pseudo-random kron-<n>-<m> dataset under DIR.
    Generate {
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        #[arg(long, help = "Node-count exponent n (2^n nodes)")]
        exponent: u32,

        #[arg(long, help = "Edges per node m")]
        multiplier: u64,

        #[arg(long, default_value_t = 1 << 20, help = "Records per block file")]
        edges_per_shard: u64,

        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Stat {
            path,
            config,
            parts,
            part,
            report,
        } => {
            let mut cfg = match config {
                Some(file) => LoaderConfig::from_json_file(&file)?,
                None => LoaderConfig::default(),
            };
            if let Some(parts) = parts {
                cfg.partial_load_num_parts = parts;
                cfg.partial_load_part = part.unwrap_or(1);
            }
            let mut source =
                open_source(&path, &cfg).with_context(|| format!("open {}", path.display()))?;
            let mut sink = CountingSink::default();
            let summary = Loader::new(cfg).load(&mut source, &mut sink)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            if let Some(out) = report {
                summary.save_to_file(out)?;
            }
        }
        Command::Split { total, parts } => {
            for (i, slice) in plan_all(total, parts)?.iter().enumerate() {
                println!("{}\t{}\t{}", i + 1, slice.begin, slice.length);
            }
        }
        Command::Generate {
            dir,
            exponent,
            multiplier,
            edges_per_shard,
            seed,
        } => {
            let out = write_kron_dataset(
                &dir,
                exponent,
                multiplier,
                edges_per_shard,
                scrambled_edges(exponent, multiplier, seed),
            )?;
            println!("{}", out.display());
        }
    }
    Ok(())
}
