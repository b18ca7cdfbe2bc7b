//! End-to-end runs of the three experiment phases.

use actor_freq::cast::{CastDataset, NameFilter};
use actor_freq::experiment::{self, ExperimentConfig};
use actor_freq::source::{ItemSource, ItemStream};
use actor_freq::synthetic::{item_name, zipf_stream};
use actor_freq::Error;
use std::collections::hash_map::RandomState;
use std::fs;
use std::io;
use std::path::PathBuf;
use test_case::test_case;
use xxhash_rust::xxh64::Xxh64Builder;

fn config(trials: usize, capacities: Vec<usize>, parallel: bool) -> ExperimentConfig {
    ExperimentConfig {
        top_n: 5,
        trials,
        capacities,
        seed: Some(2024),
        parallel,
    }
}

#[test]
fn small_stream_report() {
    let stream = vec!["A", "A", "B", "A", "C", "B"];
    let report =
        experiment::run::<RandomState, _>(&stream, &config(10, vec![1, 2, 3], false)).unwrap();

    assert_eq!(
        report.baseline.ranking,
        vec![
            ("A".to_string(), 3),
            ("B".to_string(), 2),
            ("C".to_string(), 1),
        ]
    );

    let morris = &report.morris.rows;
    assert_eq!(morris.len(), 3);
    assert_eq!(morris[2].item, "C");
    assert_eq!((morris[2].min, morris[2].max), (1, 1));
    assert_eq!(morris[2].relative_error, 0.0);

    let sweep = &report.sweep;
    assert_eq!(sweep.columns.len(), 3);
    assert_eq!(sweep.rows[0].item, "A");
    // k=3 tracks everything exactly
    for row in &sweep.rows {
        assert_eq!(row.estimates[2], row.exact);
    }
    // k=2: C is dropped on arrival and A ends at 2
    assert_eq!(sweep.rows[0].estimates[1], 2);
    assert_eq!(sweep.rows[2].estimates[1], 0);
}

#[test]
fn parallel_matches_sequential() {
    let stream = zipf_stream(1_000, 20_000, 1.1, 11);
    let sequential =
        experiment::run::<Xxh64Builder, _>(&stream, &config(16, vec![10, 100, 1_000], false))
            .unwrap();
    let parallel =
        experiment::run::<Xxh64Builder, _>(&stream, &config(16, vec![10, 100, 1_000], true))
            .unwrap();

    assert_eq!(sequential.baseline.ranking, parallel.baseline.ranking);
    assert_eq!(sequential.morris.rows, parallel.morris.rows);
    assert_eq!(sequential.sweep.rows, parallel.sweep.rows);
    assert_eq!(sequential.sweep.columns, parallel.sweep.columns);
}

#[test_case(1 ; "one trial")]
#[test_case(25 ; "many trials")]
fn morris_stats_are_consistent(trials: usize) {
    let stream = zipf_stream(200, 10_000, 1.3, 12);
    let report =
        experiment::run::<RandomState, _>(&stream, &config(trials, vec![50], true)).unwrap();

    assert_eq!(report.morris.trials, trials);
    for stats in &report.morris.rows {
        assert!(stats.min as f64 <= stats.mean && stats.mean <= stats.max as f64);
        assert!((stats.max + 1).is_power_of_two());
        if trials == 1 {
            assert_eq!(stats.std_dev, 0.0);
        }
    }
}

#[test]
fn sweep_reports_guarantee() {
    let stream = zipf_stream(500, 12_000, 1.2, 13);
    let capacities = vec![5, 50, 500];
    let report =
        experiment::run::<RandomState, _>(&stream, &config(2, capacities.clone(), true)).unwrap();

    for (idx, column) in report.sweep.columns.iter().enumerate() {
        assert_eq!(column.capacity, capacities[idx]);
        assert!(column.tracked <= column.capacity);
        assert_eq!(column.threshold, 12_000.0 / (column.capacity + 1) as f64);

        for row in &report.sweep.rows {
            assert!(row.estimates[idx] <= row.exact);
            if row.exact as f64 > column.threshold {
                assert!(row.estimates[idx] > 0);
            }
        }
    }
    assert_eq!(report.baseline.ranking[0].0, item_name(1));
}

#[test_case(ExperimentConfig { trials: 0, ..config(1, vec![1], false) } ; "zero trials")]
#[test_case(config(3, vec![], false) ; "no capacities")]
#[test_case(config(3, vec![4, 0], false) ; "zero capacity")]
fn invalid_configuration_is_rejected(config: ExperimentConfig) {
    let stream = vec!["a"];
    let result = experiment::run::<RandomState, _>(&stream, &config);
    assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
}

struct BrokenSource;

impl ItemSource for BrokenSource {
    fn items(&self) -> actor_freq::Result<ItemStream<'_>> {
        let items = vec![
            Ok("a".to_string()),
            Err(Error::Io(io::Error::other("disk went away"))),
        ];
        Ok(Box::new(items.into_iter()))
    }
}

#[test]
fn stream_errors_abort_the_run() {
    let result = experiment::run::<RandomState, _>(&BrokenSource, &config(2, vec![1], true));
    assert!(matches!(result, Err(Error::Io(_))));
}

fn temp_csv(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("actor-freq-{}-{}.csv", std::process::id(), name));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn dataset_end_to_end() {
    let path = temp_csv(
        "titles",
        "show_id,type,title,cast,release_year\n\
         s1,Movie,First,\"Ana Lima, Bo Chen, Champion\",2001\n\
         s2,Movie,Second,\"Bo Chen, Cy Park\",2002\n\
         s3,TV Show,\"Third, Part 2\",\"Bo Chen, Ana Lima, 7\",2003\n\
         s4,Movie,Short Row,Bo Chen\n\
         s5,Movie,Fifth,,2005\n\
         s6,Movie\n\
         s7,Movie,\"Height, 6'2\"\",Cy Park,2007,extra\n",
    );

    let dataset = CastDataset::open(&path).unwrap();
    let report = experiment::run::<RandomState, _>(&dataset, &config(5, vec![1, 2, 10], true));
    fs::remove_file(&path).unwrap();
    let report = report.unwrap();

    assert_eq!(
        report.baseline.ranking,
        vec![
            ("Bo Chen".to_string(), 4),
            ("Ana Lima".to_string(), 2),
            ("Cy Park".to_string(), 2),
        ]
    );
    assert_eq!(report.baseline.stream_len, 8);
    assert_eq!(dataset.malformed_records(), 1);
}

#[test]
fn dataset_custom_filter_and_column() {
    let path = temp_csv("actors", "title,actors\nA,\"Ana Lima, Bo Chen\"\nB,Bo Chen\n");

    let dataset = CastDataset::open(&path)
        .unwrap()
        .with_column("actors")
        .with_filter(NameFilter::new(["bo chen"]));
    let items: Vec<String> = dataset.items().unwrap().map(|r| r.unwrap()).collect();
    fs::remove_file(&path).unwrap();

    assert_eq!(items, vec!["Ana Lima"]);
}

#[test]
fn missing_dataset_is_reported() {
    let result = CastDataset::open("does/not/exist.csv");
    match result {
        Err(err @ Error::SourceNotFound(_)) => {
            assert_eq!(err.to_string(), "dataset not found at 'does/not/exist.csv'");
        }
        _ => panic!("expected SourceNotFound"),
    }
}
