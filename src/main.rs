mod demo;

use actor_freq::cast::{CastDataset, DEFAULT_BLOCKED_NAMES, DEFAULT_CAST_COLUMN, NameFilter};
use actor_freq::experiment::{
    self, DEFAULT_CAPACITIES, DEFAULT_TOP_N, DEFAULT_TRIALS, ExperimentConfig,
};
use actor_freq::synthetic;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use xxhash_rust::xxh64::Xxh64Builder;

/// Compare exact, Morris and Frequent-Count item counting over a cast list.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Delimited file with one cast list per row
    #[arg(long, default_value = "data/amazon_prime_titles.csv")]
    dataset: PathBuf,

    /// Column holding the comma-separated cast list
    #[arg(long, default_value = DEFAULT_CAST_COLUMN)]
    column: String,

    /// Independent Morris runs
    #[arg(long, default_value_t = DEFAULT_TRIALS)]
    trials: usize,

    /// Frequent-Count capacities to sweep
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_CAPACITIES)]
    capacities: Vec<usize>,

    /// Number of top items to report
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    top: usize,

    /// Seed for the Morris trials (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Run trials and sweep on a single thread
    #[arg(long)]
    sequential: bool,

    /// Additional names to drop, case-insensitive
    #[arg(long, value_delimiter = ',')]
    block: Vec<String>,

    /// Use a seeded Zipf stream instead of the dataset
    #[arg(long)]
    synthetic: bool,

    /// Write a comparison chart to this PNG file
    #[arg(long)]
    plot: Option<PathBuf>,
}

impl Args {
    fn config(&self) -> ExperimentConfig {
        ExperimentConfig {
            top_n: self.top,
            trials: self.trials,
            capacities: self.capacities.clone(),
            seed: self.seed,
            parallel: !self.sequential,
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.config();

    // Maps use the Xxh64 hash function; any BuildHasher + Default works here.
    let report = if args.synthetic {
        println!("Source: synthetic Zipf stream (20000 items, 200000 draws)");
        let stream = synthetic::zipf_stream(20_000, 200_000, 1.1, 7);
        experiment::run::<Xxh64Builder, _>(&stream, &config)?
    } else {
        let mut filter = NameFilter::new(DEFAULT_BLOCKED_NAMES);
        for name in &args.block {
            filter.block(name);
        }
        let dataset = CastDataset::open(&args.dataset)?
            .with_column(args.column.as_str())
            .with_filter(filter);

        println!("Source: {}", dataset.path().display());
        let report = experiment::run::<Xxh64Builder, _>(&dataset, &config)?;

        let skipped = dataset.malformed_records();
        if skipped > 0 {
            eprintln!("warning: skipped {} malformed records", skipped);
        }
        report
    };

    demo::report::print(&report);

    if let Some(path) = &args.plot {
        demo::plot::plot_comparison(&report, path)?;
        println!("Plot saved to {}", path.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
