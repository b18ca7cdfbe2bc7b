use actor_freq::experiment::{Baseline, CapacitySweep, ExperimentReport, MorrisReport};
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct RankRow {
    #[tabled(rename = "Rank")]
    rank: String,
    #[tabled(rename = "Actor")]
    item: String,
    #[tabled(rename = "Count")]
    count: u64,
}

#[derive(Tabled)]
struct MorrisRow {
    #[tabled(rename = "Rank")]
    rank: String,
    #[tabled(rename = "Actor")]
    item: String,
    #[tabled(rename = "Real")]
    exact: u64,
    #[tabled(rename = "Avg (Est)")]
    mean: String,
    #[tabled(rename = "Rel Err %")]
    relative_error: String,
    #[tabled(rename = "Min")]
    min: u64,
    #[tabled(rename = "Max")]
    max: u64,
    #[tabled(rename = "Std Dev")]
    std_dev: String,
}

fn section(title: &str) {
    println!();
    println!("{:=<100}", "");
    println!(" {}", title);
    println!("{:=<100}", "");
}

fn print_baseline(baseline: &Baseline) {
    section("PHASE 1: Ground Truth (Exact Counter)");
    println!(
        "{} occurrences, {} distinct items, exact pass in {:?}",
        baseline.stream_len, baseline.distinct, baseline.elapsed
    );

    let rows = baseline
        .ranking
        .iter()
        .enumerate()
        .map(|(idx, (item, count))| RankRow {
            rank: format!("#{}", idx + 1),
            item: item.clone(),
            count: *count,
        });
    println!("{}", Table::new(rows).with(Style::modern()));
}

fn print_morris(morris: &MorrisReport) {
    section(&format!(
        "PHASE 2: Morris Counter (1/2^k), average of {} runs",
        morris.trials
    ));
    println!("seed {}, {} trials in {:?}", morris.seed, morris.trials, morris.elapsed);

    let rows = morris.rows.iter().enumerate().map(|(idx, stats)| MorrisRow {
        rank: format!("#{}", idx + 1),
        item: stats.item.clone(),
        exact: stats.exact,
        mean: format!("{:.1}", stats.mean),
        relative_error: format!("{:.1}%", stats.relative_error),
        min: stats.min,
        max: stats.max,
        std_dev: format!("{:.1}", stats.std_dev),
    });
    println!("{}", Table::new(rows).with(Style::modern()));
}

fn print_sweep(sweep: &CapacitySweep) {
    section("PHASE 3: Frequent-Count sensitivity to capacity (k)");
    println!("{} capacities in {:?}", sweep.columns.len(), sweep.elapsed);

    let mut builder = Builder::default();
    let mut header = vec!["Rank".to_string(), "Actor".to_string(), "Real".to_string()];
    header.extend(sweep.columns.iter().map(|c| format!("k={}", c.capacity)));
    builder.push_record(header);

    for (idx, row) in sweep.rows.iter().enumerate() {
        let mut record = vec![format!("#{}", idx + 1), row.item.clone(), row.exact.to_string()];
        record.extend(row.estimates.iter().map(|&estimate| match estimate {
            0 => "-".to_string(),
            e => e.to_string(),
        }));
        builder.push_record(record);
    }
    println!("{}", builder.build().with(Style::modern()));

    let mut builder = Builder::default();
    builder.push_record(["k", "Tracked", "Guaranteed above"]);
    for column in &sweep.columns {
        builder.push_record([
            column.capacity.to_string(),
            column.tracked.to_string(),
            format!("{:.1}", column.threshold),
        ]);
    }
    println!("{}", builder.build().with(Style::modern()));
}

pub fn print(report: &ExperimentReport) {
    print_baseline(&report.baseline);
    print_morris(&report.morris);
    print_sweep(&report.sweep);

    println!();
    println!("{:=<100}", "");
    println!(" EXPERIMENT COMPLETE");
    println!("{:=<100}", "");
}
