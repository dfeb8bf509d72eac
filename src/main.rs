//! Command-line front end.
//!
//! ```bash
//! nmrshift hose "CC(=O)C"
//! nmrshift predict --db db/ "CC(=O)C"
//! nmrshift search --db db/ 14.0 23.0
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use nmrshift::{
    estimate, hose_code_with_spheres, predict, EstimateOptions, LookupOptions, MolView,
    ShiftStore, DEFAULT_MAX_SPHERES,
};

#[derive(Parser, Debug)]
#[command(name = "nmrshift")]
#[command(author, version, about = "HOSE-code NMR shift prediction", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the per-atom HOSE codes of a molecule
    Hose {
        /// Molecule as SMILES
        smiles: String,

        /// Sphere depth
        #[arg(long, default_value_t = DEFAULT_MAX_SPHERES)]
        spheres: usize,
    },

    /// Predict shifts for every target-nucleus atom of a molecule
    Predict {
        /// Molecule as SMILES
        smiles: String,

        /// Shift database directory (falls back to $NMRSHIFT_DB)
        #[arg(long, value_name = "DIR", env = "NMRSHIFT_DB")]
        db: PathBuf,

        /// Target nucleus
        #[arg(long, default_value = "13C")]
        nucleus: String,
    },

    /// Rank candidate structures against a list of observed peaks
    Search {
        /// Observed peaks in ppm
        #[arg(value_name = "PPM", required = true)]
        peaks: Vec<f64>,

        /// Shift database directory (falls back to $NMRSHIFT_DB)
        #[arg(long, value_name = "DIR", env = "NMRSHIFT_DB")]
        db: PathBuf,

        /// Target nucleus
        #[arg(long, default_value = "13C")]
        nucleus: String,

        /// Per-peak tolerance in ppm
        #[arg(long, default_value_t = 2.0)]
        tolerance: f64,

        /// Minimum matched peaks per candidate
        #[arg(long, default_value_t = 1)]
        min_matches: usize,

        /// Result cap
        #[arg(long, default_value_t = 50)]
        max_results: usize,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        Command::Hose { smiles, spheres } => {
            let mol = nmrshift::from_smiles(&smiles)?;
            let view = MolView::new(&mol);
            for i in 0..view.atom_count() {
                println!(
                    "{:>4}  {:<2}  {}",
                    i,
                    view.element(i).symbol(),
                    hose_code_with_spheres(&view, i, spheres)
                );
            }
        }
        Command::Predict {
            smiles,
            db,
            nucleus,
        } => {
            let store = ShiftStore::open(db)?;
            let options = LookupOptions {
                nucleus,
                ..Default::default()
            };
            let shifts = predict(&store, &smiles, &options)?;
            if shifts.is_empty() {
                println!("no matching environments");
                return Ok(());
            }
            println!("{:>4}  {:<2}  {:>8}  {}", "atom", "el", "ppm", "matched HOSE");
            for s in &shifts {
                println!(
                    "{:>4}  {:<2}  {:>8.1}  {}",
                    s.atom_index, s.atom, s.shift, s.hose
                );
            }
        }
        Command::Search {
            peaks,
            db,
            nucleus,
            tolerance,
            min_matches,
            max_results,
        } => {
            let store = ShiftStore::open(db)?;
            let options = EstimateOptions {
                nucleus,
                tolerance,
                min_matches,
                max_results,
            };
            let candidates = estimate(&store, &peaks, &options)?;
            if candidates.is_empty() {
                println!("no candidates");
                return Ok(());
            }
            println!("{:>5}  {:>7}  {:<24}  {}", "score", "matched", "smiles", "hose");
            for c in &candidates {
                println!(
                    "{:>5.3}  {:>7}  {:<24}  {}",
                    c.score, c.matched_peaks, c.smiles, c.hose
                );
            }
        }
    }
    Ok(())
}
