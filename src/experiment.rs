use crate::counters::{Counter, ExactCounter, FrequentCounter, MorrisCounter};
use crate::error::{Error, Result};
use crate::source::ItemSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::collections::HashMap;
use std::hash::BuildHasher;
use std::time::{Duration, Instant};

pub const DEFAULT_TRIALS: usize = 20;
pub const DEFAULT_CAPACITIES: [usize; 6] = [100, 500, 1000, 2500, 3500, 44000];
pub const DEFAULT_TOP_N: usize = 15;

#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentConfig {
    /// Size of the baseline ranking every later phase reports on.
    pub top_n: usize,
    /// Independent Morris runs.
    pub trials: usize,
    /// Frequent-Count capacities to sweep, in report order.
    pub capacities: Vec<usize>,
    /// Seed for the per-trial seeds. `None` draws one from the thread RNG.
    pub seed: Option<u64>,
    /// Fan trials and sweep out over the rayon pool.
    pub parallel: bool,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig {
            top_n: DEFAULT_TOP_N,
            trials: DEFAULT_TRIALS,
            capacities: DEFAULT_CAPACITIES.to_vec(),
            seed: None,
            parallel: true,
        }
    }
}

impl ExperimentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(Error::InvalidConfiguration(
                "top-n must be positive".to_string(),
            ));
        }
        if self.trials == 0 {
            return Err(Error::InvalidConfiguration(
                "trial count must be positive".to_string(),
            ));
        }
        if self.capacities.is_empty() {
            return Err(Error::InvalidConfiguration(
                "at least one capacity is required".to_string(),
            ));
        }
        if self.capacities.contains(&0) {
            return Err(Error::InvalidConfiguration(
                "capacities must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Phase A output: the exact pass.
#[derive(Debug, Clone)]
pub struct Baseline {
    /// Top items by exact count, in rank order.
    pub ranking: Vec<(String, u64)>,
    /// Exact count for every ranked item.
    pub exact: HashMap<String, u64>,
    pub stream_len: u64,
    pub distinct: usize,
    pub elapsed: Duration,
}

impl Baseline {
    pub fn items(&self) -> impl Iterator<Item = &str> {
        self.ranking.iter().map(|(item, _)| item.as_str())
    }
}

/// Morris estimates for one ranked item, aggregated over all trials.
#[derive(Debug, Clone, PartialEq)]
pub struct MorrisStats {
    pub item: String,
    pub exact: u64,
    pub mean: f64,
    pub min: u64,
    pub max: u64,
    pub std_dev: f64,
    /// `|mean - exact| / exact` in percent, 0 when `exact` is 0.
    pub relative_error: f64,
}

/// Phase B output.
#[derive(Debug, Clone)]
pub struct MorrisReport {
    pub trials: usize,
    pub seed: u64,
    pub rows: Vec<MorrisStats>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SweepColumn {
    pub capacity: usize,
    /// Items still tracked after the full pass.
    pub tracked: usize,
    /// `stream_len / (capacity + 1)`.
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SweepRow {
    pub item: String,
    pub exact: u64,
    /// One estimate per swept capacity, in column order.
    pub estimates: Vec<u64>,
}

/// Phase C output.
#[derive(Debug, Clone)]
pub struct CapacitySweep {
    pub columns: Vec<SweepColumn>,
    pub rows: Vec<SweepRow>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct ExperimentReport {
    pub baseline: Baseline,
    pub morris: MorrisReport,
    pub sweep: CapacitySweep,
}

/// Feeds one full pass of `source` into `counter`. Returns the pass length.
pub fn replay<I, C>(source: &I, counter: &mut C) -> Result<u64>
where
    I: ItemSource + ?Sized,
    C: Counter,
{
    let mut seen = 0;
    for item in source.items()? {
        counter.process(&item?);
        seen += 1;
    }
    Ok(seen)
}

/// `|estimate - exact| / exact` in percent, defined as 0 for `exact == 0`.
pub fn relative_error(estimate: f64, exact: u64) -> f64 {
    if exact == 0 {
        0.0
    } else {
        (estimate - exact as f64).abs() / exact as f64 * 100.0
    }
}

pub fn run_baseline<S, I>(source: &I, top_n: usize) -> Result<Baseline>
where
    S: BuildHasher + Default,
    I: ItemSource + ?Sized,
{
    let start = Instant::now();
    let mut counter = ExactCounter::<S>::default();
    let stream_len = replay(source, &mut counter)?;
    let elapsed = start.elapsed();

    let ranking = counter.top_n(top_n);
    let exact = ranking.iter().cloned().collect();

    Ok(Baseline {
        ranking,
        exact,
        stream_len,
        distinct: counter.distinct(),
        elapsed,
    })
}

fn morris_trial<S, I>(source: &I, items: &[&str], seed: u64) -> Result<Vec<u64>>
where
    S: BuildHasher + Default,
    I: ItemSource + ?Sized,
{
    let mut counter =
        MorrisCounter::<StdRng, S>::with_rng_and_hasher(StdRng::seed_from_u64(seed), S::default());
    replay(source, &mut counter)?;
    Ok(items.iter().map(|item| counter.query(item)).collect())
}

fn summarize(item: &str, exact: u64, estimates: &[u64]) -> MorrisStats {
    let n = estimates.len() as f64;
    let mean = estimates.iter().map(|&e| e as f64).sum::<f64>() / n;
    let variance = estimates
        .iter()
        .map(|&e| (e as f64 - mean).powi(2))
        .sum::<f64>()
        / n;

    MorrisStats {
        item: item.to_string(),
        exact,
        mean,
        min: estimates.iter().copied().min().unwrap_or(0),
        max: estimates.iter().copied().max().unwrap_or(0),
        std_dev: variance.sqrt(),
        relative_error: relative_error(mean, exact),
    }
}

/// Runs `trials` independent Morris passes and aggregates the estimates of
/// every baseline item.
///
/// Each trial gets its own counter and a `StdRng` seeded from a sequence drawn
/// up front from `seed`, so the result does not depend on `parallel`.
pub fn run_morris_trials<S, I>(
    source: &I,
    baseline: &Baseline,
    trials: usize,
    seed: u64,
    parallel: bool,
) -> Result<MorrisReport>
where
    S: BuildHasher + Default + Send + Sync,
    I: ItemSource + ?Sized,
{
    if trials == 0 {
        return Err(Error::InvalidConfiguration(
            "trial count must be positive".to_string(),
        ));
    }

    let start = Instant::now();
    let items: Vec<&str> = baseline.items().collect();
    let mut seeder = StdRng::seed_from_u64(seed);
    let seeds: Vec<u64> = (0..trials).map(|_| seeder.random()).collect();

    let per_trial: Vec<Vec<u64>> = if parallel {
        seeds
            .par_iter()
            .map(|&seed| morris_trial::<S, I>(source, &items, seed))
            .collect::<Result<_>>()?
    } else {
        seeds
            .iter()
            .map(|&seed| morris_trial::<S, I>(source, &items, seed))
            .collect::<Result<_>>()?
    };

    let rows = baseline
        .ranking
        .iter()
        .enumerate()
        .map(|(idx, (item, exact))| {
            let estimates: Vec<u64> = per_trial.iter().map(|trial| trial[idx]).collect();
            summarize(item, *exact, &estimates)
        })
        .collect();

    Ok(MorrisReport {
        trials,
        seed,
        rows,
        elapsed: start.elapsed(),
    })
}

fn sweep_capacity<S, I>(
    source: &I,
    items: &[&str],
    capacity: usize,
) -> Result<(SweepColumn, Vec<u64>)>
where
    S: BuildHasher + Default,
    I: ItemSource + ?Sized,
{
    let mut counter = FrequentCounter::with_hasher(capacity, S::default())?;
    replay(source, &mut counter)?;

    let column = SweepColumn {
        capacity,
        tracked: counter.len(),
        threshold: counter.guarantee_threshold(),
    };
    Ok((column, items.iter().map(|item| counter.query(item)).collect()))
}

/// One Frequent-Count pass per capacity, querying every baseline item.
pub fn run_capacity_sweep<S, I>(
    source: &I,
    baseline: &Baseline,
    capacities: &[usize],
    parallel: bool,
) -> Result<CapacitySweep>
where
    S: BuildHasher + Default + Send + Sync,
    I: ItemSource + ?Sized,
{
    let start = Instant::now();
    let items: Vec<&str> = baseline.items().collect();

    let per_capacity: Vec<(SweepColumn, Vec<u64>)> = if parallel {
        capacities
            .par_iter()
            .map(|&capacity| sweep_capacity::<S, I>(source, &items, capacity))
            .collect::<Result<_>>()?
    } else {
        capacities
            .iter()
            .map(|&capacity| sweep_capacity::<S, I>(source, &items, capacity))
            .collect::<Result<_>>()?
    };

    let rows = baseline
        .ranking
        .iter()
        .enumerate()
        .map(|(idx, (item, exact))| SweepRow {
            item: item.clone(),
            exact: *exact,
            estimates: per_capacity.iter().map(|(_, est)| est[idx]).collect(),
        })
        .collect();

    Ok(CapacitySweep {
        columns: per_capacity.into_iter().map(|(column, _)| column).collect(),
        rows,
        elapsed: start.elapsed(),
    })
}

/// Runs all three phases against `source`.
///
/// Nothing is returned unless every phase succeeds.
pub fn run<S, I>(source: &I, config: &ExperimentConfig) -> Result<ExperimentReport>
where
    S: BuildHasher + Default + Send + Sync,
    I: ItemSource + ?Sized,
{
    config.validate()?;

    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    let baseline = run_baseline::<S, I>(source, config.top_n)?;
    let morris =
        run_morris_trials::<S, I>(source, &baseline, config.trials, seed, config.parallel)?;
    let sweep =
        run_capacity_sweep::<S, I>(source, &baseline, &config.capacities, config.parallel)?;

    Ok(ExperimentReport {
        baseline,
        morris,
        sweep,
    })
}
